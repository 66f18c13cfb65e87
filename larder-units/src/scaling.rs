//! Recipe scaling by serving count

use larder_core::LarderError;
use crate::amount::Amount;
use crate::helpers::validate_positive;

/// Scale an ingredient amount from one serving count to another
///
/// `scaled = amount * (to_servings / from_servings)`, unit unchanged.
pub fn scale_servings(amount: Amount, from_servings: f64, to_servings: f64) -> Result<Amount, LarderError> {
    validate_positive(from_servings, "scale_servings", "from_servings")?;
    validate_positive(to_servings, "scale_servings", "to_servings")?;
    Ok(amount.scale(to_servings / from_servings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::UnitType;

    #[test]
    fn test_scale_up() {
        let scaled = scale_servings(Amount::new(2.0, UnitType::Cup), 4.0, 6.0).unwrap();
        assert_eq!(scaled, Amount::new(3.0, UnitType::Cup));
    }

    #[test]
    fn test_scale_down() {
        let scaled = scale_servings(Amount::new(100.0, UnitType::Gram), 12.0, 6.0).unwrap();
        assert_eq!(scaled, Amount::new(50.0, UnitType::Gram));
    }

    #[test]
    fn test_rejects_non_positive_servings() {
        let amount = Amount::new(1.0, UnitType::Tablespoon);
        let err = scale_servings(amount, 0.0, 4.0).unwrap_err();
        assert_eq!(err.code, larder_core::codes::DOMAIN_ERROR);
        assert!(err.message.contains("from_servings"));
        assert!(scale_servings(amount, 4.0, -2.0).is_err());
        assert!(scale_servings(amount, f64::NAN, 2.0).is_err());
        assert!(scale_servings(amount, 2.0, f64::INFINITY).is_err());
    }
}
