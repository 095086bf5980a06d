//! Client for the AciTracker gateway.

pub mod client;

pub use client::{GatewayClient, GatewayResponse};
