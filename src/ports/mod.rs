//! Ports Layer - Boundaries between use cases and pricing sources.
//!
//! Port categories:
//! - `FairPriceSource`: anything that yields fair 1X2 probabilities

pub mod pricing;
