//! Yahoo Finance market-data provider.
//!
//! `YahooClient` implements the `analysis_core` provider traits over the
//! public chart, search and quoteSummary endpoints. Response decoding lives in
//! [`parse`] so it can be tested without the network.

pub mod client;
pub mod parse;

pub use client::{YahooClient, YahooConfig, DEFAULT_BASE_URL};
