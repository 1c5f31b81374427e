use restock_core::{InsufficientHistoryError, ItemVector};

use crate::uplift::{BASIS_POINTS_PER_UNIT, UpliftFactor};
use crate::window::HistoricalSalesWindow;

/// Trailing days used when nothing else is configured.
pub const DEFAULT_WINDOW: usize = 5;

/// Moving-average restocking forecast.
///
/// Model:
/// - Average each product line's trailing window of sales.
/// - Scale the average by the uplift factor.
/// - Round half to even.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastEngine {
    /// Trailing values per product line (must be >= 1 to produce a forecast).
    window: usize,
    uplift: UpliftFactor,
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            uplift: UpliftFactor::default(),
        }
    }
}

impl ForecastEngine {
    pub fn new(window: usize, uplift: UpliftFactor) -> Self {
        Self { window, uplift }
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_uplift(mut self, uplift: UpliftFactor) -> Self {
        self.uplift = uplift;
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn uplift(&self) -> UpliftFactor {
        self.uplift
    }

    /// Cut chronological sales columns down to this engine's window.
    pub fn window_from_columns<C>(&self, columns: impl IntoIterator<Item = C>) -> HistoricalSalesWindow
    where
        C: AsRef<[i64]>,
    {
        HistoricalSalesWindow::from_columns(columns, self.window)
    }

    pub fn forecast(&self, window: &HistoricalSalesWindow) -> Result<ItemVector, InsufficientHistoryError> {
        forecast_stock(window, self.uplift)
    }
}

/// Recommend next stock per product line: `round_half_even(mean(window) * uplift)`.
///
/// Fails on the first product line whose window is empty.
pub fn forecast_stock(
    window: &HistoricalSalesWindow,
    uplift: UpliftFactor,
) -> Result<ItemVector, InsufficientHistoryError> {
    window
        .lines()
        .enumerate()
        .map(|(product_line, values)| {
            recommend(values, uplift).ok_or(InsufficientHistoryError { product_line })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(ItemVector::new)
}

fn recommend(values: &[i64], uplift: UpliftFactor) -> Option<i64> {
    if values.is_empty() {
        return None;
    }

    let sum: i128 = values.iter().map(|&v| v as i128).sum();
    let numerator = sum * uplift.basis_points() as i128;
    let denominator = values.len() as i128 * BASIS_POINTS_PER_UNIT as i128;

    let rounded = div_round_half_even(numerator, denominator);
    // Saturate: only reachable with values near i64::MAX.
    Some(i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX }))
}

/// `numerator / denominator` rounded half to even. `denominator` must be positive.
fn div_round_half_even(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator.div_euclid(denominator);
    let twice_remainder = numerator.rem_euclid(denominator) * 2;

    match twice_remainder.cmp(&denominator) {
        core::cmp::Ordering::Less => quotient,
        core::cmp::Ordering::Greater => quotient + 1,
        core::cmp::Ordering::Equal if quotient % 2 == 0 => quotient,
        core::cmp::Ordering::Equal => quotient + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn single(values: &[i64]) -> HistoricalSalesWindow {
        HistoricalSalesWindow::from_newest_first(vec![values.to_vec()])
    }

    #[test]
    fn average_of_window_with_ten_percent_uplift() {
        // mean = 11, 11 * 1.1 = 12.1
        let forecast = forecast_stock(&single(&[10, 12, 11, 9, 13]), UpliftFactor::default()).unwrap();
        assert_eq!(forecast.as_slice(), &[12]);
    }

    #[test]
    fn order_within_a_line_does_not_matter() {
        let a = forecast_stock(&single(&[13, 9, 11, 12, 10]), UpliftFactor::default()).unwrap();
        let b = forecast_stock(&single(&[10, 12, 11, 9, 13]), UpliftFactor::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn half_rounds_to_even() {
        let uplift = UpliftFactor::default();
        // 5 * 1.1 = 5.5 -> 6
        assert_eq!(forecast_stock(&single(&[5]), uplift).unwrap().as_slice(), &[6]);
        // 15 * 1.1 = 16.5 -> 16
        assert_eq!(forecast_stock(&single(&[15]), uplift).unwrap().as_slice(), &[16]);
        // 25 * 1.1 = 27.5 -> 28
        assert_eq!(forecast_stock(&single(&[25]), uplift).unwrap().as_slice(), &[28]);
        // Exact decimal halves: 55 * 1.1 = 60.5 -> 60 and 95 * 1.1 = 104.5 -> 104,
        // where binary floating point lands just above the half and rounds up.
        assert_eq!(forecast_stock(&single(&[55]), uplift).unwrap().as_slice(), &[60]);
        assert_eq!(forecast_stock(&single(&[95]), uplift).unwrap().as_slice(), &[104]);
    }

    #[test]
    fn half_rounds_to_even_below_zero() {
        // -2.5 -> -2, -3.5 -> -4
        assert_eq!(div_round_half_even(-5, 2), -2);
        assert_eq!(div_round_half_even(-7, 2), -4);
        assert_eq!(div_round_half_even(-6, 4), -2);
        assert_eq!(div_round_half_even(-5, 4), -1);
    }

    #[test]
    fn fractional_averages_are_not_truncated() {
        // mean(1, 2) = 1.5 with no uplift -> 2 (even); mean(2, 3) = 2.5 -> 2
        assert_eq!(forecast_stock(&single(&[1, 2]), UpliftFactor::NONE).unwrap().as_slice(), &[2]);
        assert_eq!(forecast_stock(&single(&[2, 3]), UpliftFactor::NONE).unwrap().as_slice(), &[2]);
        // mean(1, 1, 2) = 1.333.. -> 1
        assert_eq!(forecast_stock(&single(&[1, 1, 2]), UpliftFactor::NONE).unwrap().as_slice(), &[1]);
    }

    #[test]
    fn preserves_product_line_order() {
        let window = HistoricalSalesWindow::from_newest_first(vec![vec![10], vec![20], vec![30]]);
        let forecast = forecast_stock(&window, UpliftFactor::default()).unwrap();
        assert_eq!(forecast.as_slice(), &[11, 22, 33]);
    }

    #[test]
    fn empty_line_is_insufficient_history() {
        let window = HistoricalSalesWindow::from_newest_first(vec![vec![10], vec![], vec![]]);
        let err = forecast_stock(&window, UpliftFactor::default()).unwrap_err();
        assert_eq!(err, InsufficientHistoryError { product_line: 1 });
    }

    #[test]
    fn engine_applies_its_window() {
        let engine = ForecastEngine::default().with_window(2);
        let window = engine.window_from_columns(vec![vec![100, 100, 10, 20]]);
        // newest two: 20, 10 -> mean 15 -> 16.5 -> 16
        assert_eq!(engine.forecast(&window).unwrap().as_slice(), &[16]);
    }

    #[test]
    fn engine_with_zero_window_has_no_history() {
        let engine = ForecastEngine::default().with_window(0);
        let window = engine.window_from_columns(vec![vec![1, 2, 3]]);
        assert!(engine.forecast(&window).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: forecasting is deterministic (same window = same forecast).
        #[test]
        fn forecast_is_deterministic(
            lines in prop::collection::vec(prop::collection::vec(0i64..10_000, 1..8), 1..8),
            bp in 1u32..30_000
        ) {
            let window = HistoricalSalesWindow::from_newest_first(lines);
            let uplift = UpliftFactor::from_basis_points(bp).unwrap();
            prop_assert_eq!(forecast_stock(&window, uplift), forecast_stock(&window, uplift));
        }

        /// Property: with no uplift, the forecast lies between the line's min and max.
        #[test]
        fn unscaled_forecast_is_bounded_by_history(
            values in prop::collection::vec(-10_000i64..10_000, 1..10)
        ) {
            let forecast = forecast_stock(&single(&values), UpliftFactor::NONE).unwrap();
            let f = forecast.get(0).unwrap();
            prop_assert!(f >= *values.iter().min().unwrap());
            prop_assert!(f <= *values.iter().max().unwrap());
        }

        /// Property: rounding is within half a unit of the exact quotient.
        #[test]
        fn rounding_stays_within_half(n in -1_000_000i128..1_000_000, d in 1i128..10_000) {
            let q = div_round_half_even(n, d);
            prop_assert!((2 * (n - q * d)).abs() <= d);
        }
    }
}
