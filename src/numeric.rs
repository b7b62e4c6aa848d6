//! Extended-precision comparisons and integer helpers shared by every rule engine.

use core::cmp::Ordering;

/// Absolute tolerance used by every float comparison in this crate.
pub const EPS: f64 = 1e-10;

/// `true` if `a` is strictly less than `b` outside of `EPS` tolerance.
pub fn less(a: f64, b: f64) -> bool {
    b - a > EPS
}

/// `true` if `a` is strictly greater than `b` outside of `EPS` tolerance.
pub fn greater(a: f64, b: f64) -> bool {
    a - b > EPS
}

/// `true` if `a` and `b` are within `EPS` of each other.
///
/// Not transitive: `equal(a, b) && equal(b, c)` does not imply `equal(a, c)`
/// for long chains of values each `EPS` apart from the next.
pub fn equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPS
}

/// `⌈a / b⌉` for integers, `b > 0`.
pub fn ceil_div(a: i64, b: i64) -> i64 {
    debug_assert!(b > 0);
    (a + b - 1).div_euclid(b)
}

/// `⌊x⌋`, without a libm dependency.
///
/// Valid for the magnitudes this crate deals with (costs and budgets, never
/// values near `i64`'s range boundary).
pub fn floor(x: f64) -> f64 {
    let truncated = x as i64 as f64;
    if truncated > x {
        truncated - 1.0
    } else {
        truncated
    }
}

/// `max(opt, v)`, treating an absent `opt` as `-infinity`.
pub fn optional_max(opt: Option<i64>, v: i64) -> Option<i64> {
    Some(match opt {
        Some(o) => o.max(v),
        None => v,
    })
}

/// `min(opt, v)`, treating an absent `opt` as `+infinity`.
pub fn optional_min(opt: Option<i64>, v: i64) -> Option<i64> {
    Some(match opt {
        Some(o) => o.min(v),
        None => v,
    })
}

/// A totally-ordered `f64`, for use as a priority-queue / sort key.
///
/// `f64` only implements `PartialOrd` because of `NaN`; every value this
/// crate ever orders (costs, loads, voter budgets) is finite, so a total
/// order via [`f64::total_cmp`] is safe and avoids `NaN`-panicking unwraps
/// at every call site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ordf64(pub f64);

impl Eq for Ordf64 {}

impl PartialOrd for Ordf64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ordf64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eps_tolerance() {
        assert!(equal(1.0, 1.0 + EPS / 2.0));
        assert!(!equal(1.0, 1.0 + EPS * 2.0));
        assert!(less(1.0, 1.0 + EPS * 2.0));
        assert!(greater(1.0 + EPS * 2.0, 1.0));
    }

    #[test]
    fn ceil_div_exact_and_inexact() {
        assert_eq!(ceil_div(10, 5), 2);
        assert_eq!(ceil_div(11, 5), 3);
        assert_eq!(ceil_div(0, 5), 0);
    }

    #[test]
    fn floor_matches_std() {
        assert_eq!(floor(3.7), 3.0);
        assert_eq!(floor(-3.2), -4.0);
        assert_eq!(floor(5.0), 5.0);
    }

    #[test]
    fn optional_fold_absent_is_identity() {
        assert_eq!(optional_max(None, 4), Some(4));
        assert_eq!(optional_max(Some(4), 2), Some(4));
        assert_eq!(optional_min(None, 4), Some(4));
        assert_eq!(optional_min(Some(4), 2), Some(2));
    }

    #[test]
    fn ordf64_orders_like_f64() {
        let mut v = vec![Ordf64(3.0), Ordf64(1.0), Ordf64(2.0)];
        v.sort();
        assert_eq!(v, vec![Ordf64(1.0), Ordf64(2.0), Ordf64(3.0)]);
    }
}
