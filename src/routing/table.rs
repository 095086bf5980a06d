//! The fixed allowlist of public routes.
//!
//! Every route the gateway serves is a variant of [`Route`]; adding one is a
//! code change, never a runtime registration.

/// Immutable description of one allowlisted route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Path clients request. Also the cache key.
    pub public_path: &'static str,
    /// Path appended to the upstream base URL.
    pub upstream_path: &'static str,
    /// Content type used when the upstream omits one.
    pub default_content_type: &'static str,
}

/// An allowlisted route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Health,
    Report,
    Manifest,
    New,
    MustReads,
    MustReadsMarkdown,
    Summaries,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Health,
        Route::Report,
        Route::Manifest,
        Route::New,
        Route::MustReads,
        Route::MustReadsMarkdown,
        Route::Summaries,
    ];

    pub const fn descriptor(self) -> RouteDescriptor {
        match self {
            Route::Health => RouteDescriptor {
                public_path: "/health",
                upstream_path: "/health",
                default_content_type: "application/json",
            },
            Route::Report => RouteDescriptor {
                public_path: "/report",
                upstream_path: "/report",
                default_content_type: "text/markdown",
            },
            Route::Manifest => RouteDescriptor {
                public_path: "/manifest",
                upstream_path: "/manifest",
                default_content_type: "application/json",
            },
            Route::New => RouteDescriptor {
                public_path: "/new",
                upstream_path: "/new",
                default_content_type: "text/csv",
            },
            Route::MustReads => RouteDescriptor {
                public_path: "/api/must-reads",
                upstream_path: "/api/must-reads",
                default_content_type: "application/json",
            },
            Route::MustReadsMarkdown => RouteDescriptor {
                public_path: "/api/must-reads/md",
                upstream_path: "/api/must-reads/md",
                default_content_type: "text/markdown",
            },
            Route::Summaries => RouteDescriptor {
                public_path: "/api/summaries",
                upstream_path: "/api/summaries",
                default_content_type: "application/json",
            },
        }
    }

    pub const fn public_path(self) -> &'static str {
        self.descriptor().public_path
    }

    pub const fn upstream_path(self) -> &'static str {
        self.descriptor().upstream_path
    }

    pub const fn default_content_type(self) -> &'static str {
        self.descriptor().default_content_type
    }

    /// Short label for logs and metrics.
    pub const fn name(self) -> &'static str {
        match self {
            Route::Health => "health",
            Route::Report => "report",
            Route::Manifest => "manifest",
            Route::New => "new",
            Route::MustReads => "must_reads",
            Route::MustReadsMarkdown => "must_reads_md",
            Route::Summaries => "summaries",
        }
    }
}
