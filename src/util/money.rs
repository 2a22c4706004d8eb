use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MoneyError {
    #[error("Invalid amount format: {0}")]
    InvalidFormat(String),
    #[error("Amount must be greater than zero")]
    NonPositive,
}

/// Convert a display-currency amount ("150", "150.5", "150.00") to minor
/// units. The conversion happens exactly once, at the API boundary; the
/// stored value is always an integer number of minor units.
pub fn display_to_minor_units(input: &str) -> Result<i64, MoneyError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(MoneyError::InvalidFormat(input.to_string()));
    }

    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(MoneyError::InvalidFormat(input.to_string()));
    }
    if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(MoneyError::InvalidFormat(input.to_string()));
    }

    let whole: i64 = whole
        .parse()
        .map_err(|_| MoneyError::InvalidFormat(input.to_string()))?;

    // "5" -> 50, "50" -> 50, "" -> 0
    let frac_minor: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().unwrap_or(0) * 10,
        _ => frac.parse::<i64>().unwrap_or(0),
    };

    let minor = whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(frac_minor))
        .ok_or_else(|| MoneyError::InvalidFormat(input.to_string()))?;

    if minor <= 0 {
        return Err(MoneyError::NonPositive);
    }
    Ok(minor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_and_decimal_amounts() {
        assert_eq!(display_to_minor_units("150.00"), Ok(15000));
        assert_eq!(display_to_minor_units("150"), Ok(15000));
        assert_eq!(display_to_minor_units("150.5"), Ok(15050));
        assert_eq!(display_to_minor_units("0.99"), Ok(99));
        assert_eq!(display_to_minor_units(" 42.10 "), Ok(4210));
    }

    #[test]
    fn test_rejects_invalid_formats() {
        assert!(display_to_minor_units("").is_err());
        assert!(display_to_minor_units("abc").is_err());
        assert!(display_to_minor_units("1.234").is_err());
        assert!(display_to_minor_units("-5").is_err());
        assert!(display_to_minor_units("1.2.3").is_err());
        assert!(display_to_minor_units(".50").is_err());
    }

    #[test]
    fn test_rejects_zero() {
        assert_eq!(display_to_minor_units("0"), Err(MoneyError::NonPositive));
        assert_eq!(display_to_minor_units("0.00"), Err(MoneyError::NonPositive));
    }
}
