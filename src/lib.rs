//! Odds Engine - Library Root
//!
//! Football pricing models (Poisson goals, Elo ratings), bookmaker
//! margin removal, arbitrage and Kelly staking. Re-exports all modules
//! for the CLI, integration tests and benchmarks.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
