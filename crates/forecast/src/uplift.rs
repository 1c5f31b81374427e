use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Basis points in a factor of 1.0.
pub const BASIS_POINTS_PER_UNIT: u32 = 10_000;

const MAX_FRACTION_DIGITS: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpliftError {
    #[error("uplift factor {0:?} is not a decimal number with at most 4 fractional digits")]
    Malformed(String),

    #[error("uplift factor must be greater than zero")]
    NonPositive,
}

/// Multiplicative buffer applied to the trailing sales average.
///
/// Held as integer basis points so forecasts are exact at `X.5` boundaries
/// (`11_000` = 1.10, a 10% buffer).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpliftFactor(u32);

impl UpliftFactor {
    /// No buffer: the forecast is the rounded average.
    pub const NONE: UpliftFactor = UpliftFactor(BASIS_POINTS_PER_UNIT);

    pub fn from_basis_points(bp: u32) -> Result<Self, UpliftError> {
        if bp == 0 {
            return Err(UpliftError::NonPositive);
        }
        Ok(Self(bp))
    }

    /// Parse a decimal factor such as `"1.10"` or `"2"`.
    pub fn from_decimal_str(s: &str) -> Result<Self, UpliftError> {
        let malformed = || UpliftError::Malformed(s.to_string());
        let trimmed = s.trim();

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(malformed());
        }
        if fraction.len() > MAX_FRACTION_DIGITS
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(malformed());
        }

        let whole: u32 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| malformed())?
        };
        let fraction: u32 = if fraction.is_empty() {
            0
        } else {
            let padded = format!("{fraction:0<width$}", width = MAX_FRACTION_DIGITS);
            padded.parse().map_err(|_| malformed())?
        };

        let bp = whole
            .checked_mul(BASIS_POINTS_PER_UNIT)
            .and_then(|w| w.checked_add(fraction))
            .ok_or_else(malformed)?;
        Self::from_basis_points(bp)
    }

    pub fn basis_points(self) -> u32 {
        self.0
    }
}

impl Default for UpliftFactor {
    fn default() -> Self {
        Self(11_000)
    }
}

impl core::fmt::Display for UpliftFactor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}.{:04}",
            self.0 / BASIS_POINTS_PER_UNIT,
            self.0 % BASIS_POINTS_PER_UNIT
        )
    }
}

impl core::str::FromStr for UpliftFactor {
    type Err = UpliftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal_str(s)
    }
}
