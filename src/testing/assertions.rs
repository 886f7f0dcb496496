//! Assertions over reports and merged aggregations.

use crate::combiners::StationStats;
use crate::partition::Aggregation;
use crate::report::Report;

/// Rounded means may differ by one step when summation order moves a value
/// across a rounding midpoint.
const MEAN_TOLERANCE: f64 = 0.1 + 1e-9;

/// Assert two reports render identically.
///
/// # Panics
///
/// Panics with both renderings if they differ.
pub fn assert_reports_equal(actual: &Report, expected: &Report) {
    assert_eq!(
        actual.to_string(),
        expected.to_string(),
        "Report mismatch:\n  Expected: {expected}\n  Actual: {actual}"
    );
}

/// Assert two reports list the same stations with the same min and max and
/// means at most one rounding step apart.
///
/// # Panics
///
/// Panics on the first station that differs.
pub fn assert_reports_close(actual: &Report, expected: &Report) {
    let actual_names: Vec<_> = actual.iter().map(|(name, _)| name).collect();
    let expected_names: Vec<_> = expected.iter().map(|(name, _)| name).collect();
    assert_eq!(
        actual_names, expected_names,
        "Station set mismatch:\n  Expected: {expected_names:?}\n  Actual: {actual_names:?}"
    );

    for ((name, a), (_, e)) in actual.iter().zip(expected.iter()) {
        assert_eq!(a.min, e.min, "min mismatch for {name}: expected {e}, got {a}");
        assert_eq!(a.max, e.max, "max mismatch for {name}: expected {e}, got {a}");
        assert!(
            (a.mean - e.mean).abs() <= MEAN_TOLERANCE,
            "mean mismatch for {name}: expected {e}, got {a}"
        );
    }
}

/// Assert two merged aggregations agree: same stations, identical min, max and
/// count, and sums equal up to floating-point summation error. Assumes every
/// measurement lies within `±100`.
///
/// # Panics
///
/// Panics on the first station that differs.
#[allow(clippy::cast_precision_loss)]
pub fn assert_aggregations_match(
    actual: &Aggregation<StationStats>,
    expected: &Aggregation<StationStats>,
) {
    assert_eq!(actual.lines, expected.lines, "line count mismatch");
    assert_eq!(
        actual.stations.len(),
        expected.stations.len(),
        "station count mismatch"
    );

    for (name, e) in &expected.stations {
        let a = actual
            .stations
            .get(name)
            .unwrap_or_else(|| panic!("station {name} missing from actual aggregation"));
        assert_eq!(a.count(), e.count(), "count mismatch for {name}");
        assert_eq!(a.min(), e.min(), "min mismatch for {name}");
        assert_eq!(a.max(), e.max(), "max mismatch for {name}");
        // Recursive summation error is bounded by n * eps * sum(|x|), and every
        // |x| is below 100.
        let n = e.count() as f64;
        let tolerance = n * n * 100.0 * f64::EPSILON;
        assert!(
            (a.sum() - e.sum()).abs() <= tolerance,
            "sum mismatch for {name}: expected {}, got {}",
            e.sum(),
            a.sum()
        );
    }
}
