//! Share-of-total helpers behind the balance and activity bars.

/// Share of `a` in `a + b`, scaled to `0.0..=100.0`.
///
/// Both sides empty yields `0.0`: a channel with nothing on either side draws
/// an empty bar rather than a half-full one.
pub fn percent(a: u64, b: u64) -> f64 {
    let total = a as u128 + b as u128;
    if total == 0 {
        return 0.0;
    }
    (a as f64 / total as f64) * 100.0
}

/// `percent(local, remote)` as a `0.0..=1.0` ratio.
pub fn balancedness(local: u64, remote: u64) -> f64 {
    percent(local, remote) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_scenarios() {
        assert_eq!(percent(70, 30), 70.0);
        assert_eq!(percent(10, 0), 100.0);
        assert_eq!(percent(0, 10), 0.0);
        assert_eq!(percent(1, 1), 50.0);
    }

    #[test]
    fn test_percent_zero_total_is_zero() {
        let p = percent(0, 0);
        assert!(!p.is_nan());
        assert_eq!(p, 0.0);
        assert_eq!(balancedness(0, 0), 0.0);
    }

    #[test]
    fn test_percent_complements_sum_to_hundred() {
        let samples = [
            (1u64, 2u64),
            (3, 7),
            (999_999, 1),
            (123_456_789, 987_654_321),
            (u64::MAX, u64::MAX),
            (u64::MAX, 1),
            (0, 5),
        ];
        for (a, b) in samples {
            let sum = percent(a, b) + percent(b, a);
            assert!((sum - 100.0).abs() < 1e-9, "{a}/{b} summed to {sum}");
        }
    }

    #[test]
    fn test_percent_stays_in_range() {
        for (a, b) in [(0u64, 0u64), (u64::MAX, 0), (0, u64::MAX), (5, 5)] {
            let p = percent(a, b);
            assert!((0.0..=100.0).contains(&p));
        }
    }

    #[test]
    fn test_balancedness() {
        assert!((balancedness(70, 30) - 0.7).abs() < 1e-12);
        assert!((balancedness(2, 1) - 2.0 / 3.0).abs() < 1e-12);
    }
}
