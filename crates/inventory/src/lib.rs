//! Inventory domain module.
//!
//! This crate contains the stock-versus-sales rules, implemented purely as
//! deterministic domain logic (no IO, no storage).

pub mod surplus;

pub use surplus::{SurplusError, compute_surplus};
