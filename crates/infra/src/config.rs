//! Configuration loading and representation.
//!
//! Every setting has a default; environment variables override them. Parsing
//! goes through an injectable lookup so tests never touch the process
//! environment.

use std::num::NonZeroU32;
use std::path::PathBuf;

use thiserror::Error;

use restock_forecast::{DEFAULT_WINDOW, ForecastEngine, UpliftFactor};

pub const ENV_PRODUCT_LINES: &str = "RESTOCK_PRODUCT_LINES";
pub const ENV_WINDOW: &str = "RESTOCK_WINDOW";
pub const ENV_UPLIFT: &str = "RESTOCK_UPLIFT";
pub const ENV_MAX_ATTEMPTS: &str = "RESTOCK_MAX_ATTEMPTS";
pub const ENV_STORE_PATH: &str = "RESTOCK_STORE_PATH";
pub const ENV_SHEET_SALES: &str = "RESTOCK_SHEET_SALES";
pub const ENV_SHEET_STOCK: &str = "RESTOCK_SHEET_STOCK";
pub const ENV_SHEET_SURPLUS: &str = "RESTOCK_SHEET_SURPLUS";

const DEFAULT_PRODUCT_LINES: [&str; 6] = ["cheese", "ham", "egg salad", "chicken", "tuna", "turkey"];
const DEFAULT_STORE_PATH: &str = "restock.json";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {key}={value:?}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

impl ConfigError {
    fn new(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Names of the three worksheets the pipeline reads and appends to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetNames {
    pub sales: String,
    pub stock: String,
    pub surplus: String,
}

impl Default for WorksheetNames {
    fn default() -> Self {
        Self {
            sales: "sales".to_string(),
            stock: "stock".to_string(),
            surplus: "surplus".to_string(),
        }
    }
}

impl WorksheetNames {
    pub fn all(&self) -> [&str; 3] {
        [self.sales.as_str(), self.stock.as_str(), self.surplus.as_str()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestockConfig {
    /// One display name per tracked column. N is the number of names.
    pub product_lines: Vec<String>,
    /// Trailing sales values per product line used by the forecast.
    pub window: usize,
    pub uplift: UpliftFactor,
    /// Rejected inputs tolerated per run; `None` keeps prompting forever.
    pub max_attempts: Option<NonZeroU32>,
    pub store_path: PathBuf,
    pub worksheets: WorksheetNames,
}

impl Default for RestockConfig {
    fn default() -> Self {
        Self {
            product_lines: DEFAULT_PRODUCT_LINES.iter().map(|s| s.to_string()).collect(),
            window: DEFAULT_WINDOW,
            uplift: UpliftFactor::default(),
            max_attempts: None,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            worksheets: WorksheetNames::default(),
        }
    }
}

impl RestockConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from defaults, overriding each setting `lookup` returns a value for.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_PRODUCT_LINES) {
            let names: Vec<String> = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .collect();
            if names.iter().any(String::is_empty) {
                return Err(ConfigError::new(
                    ENV_PRODUCT_LINES,
                    &raw,
                    "product line names must be non-empty",
                ));
            }
            config.product_lines = names;
        }

        if let Some(raw) = lookup(ENV_WINDOW) {
            config.window = match raw.trim().parse::<usize>() {
                Ok(0) | Err(_) => {
                    return Err(ConfigError::new(ENV_WINDOW, &raw, "expected a positive integer"));
                }
                Ok(w) => w,
            };
        }

        if let Some(raw) = lookup(ENV_UPLIFT) {
            config.uplift = UpliftFactor::from_decimal_str(&raw)
                .map_err(|e| ConfigError::new(ENV_UPLIFT, &raw, e.to_string()))?;
        }

        if let Some(raw) = lookup(ENV_MAX_ATTEMPTS) {
            let n = raw.trim().parse::<u32>().map_err(|_| {
                ConfigError::new(ENV_MAX_ATTEMPTS, &raw, "expected a non-negative integer")
            })?;
            // 0 means unbounded, same as unset.
            config.max_attempts = NonZeroU32::new(n);
        }

        if let Some(raw) = lookup(ENV_STORE_PATH) {
            if raw.trim().is_empty() {
                return Err(ConfigError::new(ENV_STORE_PATH, &raw, "path must be non-empty"));
            }
            config.store_path = PathBuf::from(raw);
        }

        for (key, slot) in [
            (ENV_SHEET_SALES, &mut config.worksheets.sales),
            (ENV_SHEET_STOCK, &mut config.worksheets.stock),
            (ENV_SHEET_SURPLUS, &mut config.worksheets.surplus),
        ] {
            if let Some(raw) = lookup(key) {
                if raw.trim().is_empty() {
                    return Err(ConfigError::new(key, &raw, "worksheet name must be non-empty"));
                }
                *slot = raw.trim().to_string();
            }
        }

        Ok(config)
    }

    /// Number of tracked product lines (N).
    pub fn product_line_count(&self) -> usize {
        self.product_lines.len()
    }

    pub fn forecast_engine(&self) -> ForecastEngine {
        ForecastEngine::new(self.window, self.uplift)
    }
}
