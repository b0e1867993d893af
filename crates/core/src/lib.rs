//! # Shinebook Core
//!
//! Domain types and the pure scheduling/pricing logic for the Shinebook
//! booking engine. Nothing in this crate performs I/O: handlers load an
//! organization's configuration and the day's ledger once per request and
//! pass both into the functions here.

pub mod errors;
pub mod models;
pub mod pricing;
pub mod scheduling;
