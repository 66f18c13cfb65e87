//! Kitchen fractions: 1.5 -> 1 1/2, 0.333 -> 1/3

use num_rational::Ratio;
use num_traits::Zero;

/// Largest whole part we still render as a mixed fraction
const MAX_WHOLE: f64 = 1e12;

/// A value split into sign, whole part and proper fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixedFraction {
    pub negative: bool,
    pub whole: i64,
    pub fraction: Ratio<i64>,
}

impl MixedFraction {
    /// Approximate `value` by a fraction with denominator at most
    /// `max_denominator`, within `tolerance` of the fractional part.
    ///
    /// The smallest matching denominator wins. Returns `None` for
    /// non-finite or huge values and when no denominator is close enough.
    pub fn approximate(value: f64, max_denominator: i64, tolerance: f64) -> Option<MixedFraction> {
        if !value.is_finite() || value.abs() >= MAX_WHOLE {
            return None;
        }
        let abs = value.abs();
        let mut whole = abs.trunc() as i64;
        let frac = abs - abs.trunc();

        let (numer, denom) = (1..=max_denominator.max(1))
            .map(|d| ((frac * d as f64).round() as i64, d))
            .find(|&(n, d)| (frac - n as f64 / d as f64).abs() <= tolerance)?;

        let mut fraction = Ratio::new(numer, denom);
        if fraction >= Ratio::from_integer(1) {
            whole += 1;
            fraction = Ratio::zero();
        }

        Some(MixedFraction {
            negative: value < 0.0 && (whole != 0 || !fraction.is_zero()),
            whole,
            fraction,
        })
    }

    pub fn is_zero(&self) -> bool {
        self.whole == 0 && self.fraction.is_zero()
    }

    /// The displayed value as a float
    pub fn value(&self) -> f64 {
        let magnitude = self.whole as f64 + *self.fraction.numer() as f64 / *self.fraction.denom() as f64;
        if self.negative { -magnitude } else { magnitude }
    }

    /// Render with `whole` already formatted by the caller (for digit grouping)
    pub fn render(&self, whole: &str) -> String {
        let sign = if self.negative { "-" } else { "" };
        match (self.whole, self.fraction.is_zero()) {
            (_, true) => format!("{}{}", sign, whole),
            (0, false) => format!("{}{}/{}", sign, self.fraction.numer(), self.fraction.denom()),
            _ => format!("{}{} {}/{}", sign, whole, self.fraction.numer(), self.fraction.denom()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(value: f64) -> Option<MixedFraction> {
        MixedFraction::approximate(value, 8, 0.005)
    }

    fn shown(value: f64) -> Option<String> {
        approx(value).map(|m| m.render(&m.whole.to_string()))
    }

    #[test]
    fn test_simple_fractions() {
        assert_eq!(shown(0.25).as_deref(), Some("1/4"));
        assert_eq!(shown(0.5).as_deref(), Some("1/2"));
        assert_eq!(shown(0.75).as_deref(), Some("3/4"));
        assert_eq!(shown(0.125).as_deref(), Some("1/8"));
    }

    #[test]
    fn test_thirds_within_tolerance() {
        assert_eq!(shown(1.0 / 3.0).as_deref(), Some("1/3"));
        assert_eq!(shown(0.667).as_deref(), Some("2/3"));
    }

    #[test]
    fn test_mixed_and_whole() {
        assert_eq!(shown(1.5).as_deref(), Some("1 1/2"));
        assert_eq!(shown(2.0).as_deref(), Some("2"));
        assert_eq!(shown(2.999).as_deref(), Some("3"));
        assert_eq!(shown(-1.25).as_deref(), Some("-1 1/4"));
    }

    #[test]
    fn test_no_clean_fraction() {
        assert_eq!(approx(0.4142), None);
        assert_eq!(approx(f64::NAN), None);
        assert_eq!(approx(1e13), None);
    }

    #[test]
    fn test_value_of_fraction() {
        let m = approx(1.5).unwrap();
        assert_eq!(m.value(), 1.5);
        assert!(!m.is_zero());
        assert!(approx(0.001).unwrap().is_zero());
    }

    #[test]
    fn test_reduced_ratio() {
        let m = MixedFraction::approximate(0.5, 8, 0.0).unwrap();
        assert_eq!(m.fraction, Ratio::new(1, 2));
    }
}
