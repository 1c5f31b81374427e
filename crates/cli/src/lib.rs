//! Operator-facing binary support: prompting and command handling.

pub mod commands;
pub mod prompt;
