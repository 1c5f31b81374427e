//! Sales intake: turns operator-entered text into a sales row.
//!
//! Pure validation only (no IO, no prompting, no retry loop).

pub mod validator;

pub use validator::{SALES_SEPARATOR, parse_sales_line, validate};
