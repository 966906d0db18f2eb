//! Use Cases Layer - Application Business Logic
//!
//! Wires configured domain models to pricing sources and adds the
//! logging the domain layer stays free of.
//!
//! Use cases:
//! - `FixturePricer`: configured models plus per-fixture value reports
//! - `SlateAnalyzer`: parallel pricing of many fixtures

pub mod fixture_pricer;
pub mod slate;
