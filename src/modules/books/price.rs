//! Exact decimal prices as JSON number literals.
//!
//! Relies on `serde_json`'s `arbitrary_precision` feature: a [`serde_json::Number`]
//! keeps the literal text it was parsed from, so `29.99` is read and written as
//! those five characters and never as the nearest `f64`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

/// Parse a JSON number literal into a decimal without rounding.
///
/// The text must follow JSON number syntax exactly: no surrounding whitespace,
/// no leading `+`, no digit separators. Exponent forms such as `2.999e1` are
/// applied by moving the scale, and anything the 96-bit mantissa or the
/// 28-digit scale cannot hold is an error rather than a rounded value.
pub fn parse_decimal(text: &str) -> Result<Decimal, rust_decimal::Error> {
    let (mantissa, exponent) = split_number(text).ok_or_else(|| {
        rust_decimal::Error::ErrorString(format!("'{text}' is not a JSON number"))
    })?;

    let mut value = Decimal::from_str_exact(mantissa)?;
    // 0e100 and 0e-100 are exactly zero.
    if value.is_zero() || exponent == 0 {
        return Ok(value);
    }

    let scale = i64::from(value.scale());
    if exponent < 0 {
        let scale = u32::try_from(scale - exponent)
            .map_err(|_| rust_decimal::Error::ScaleExceedsMaximumPrecision(u32::MAX))?;
        value.set_scale(scale)?;
    } else if exponent <= scale {
        value.set_scale((scale - exponent) as u32)?;
    } else {
        value.set_scale(0)?;
        for _ in 0..(exponent - scale) {
            value = value
                .checked_mul(Decimal::TEN)
                .ok_or(rust_decimal::Error::ExceedsMaximumPossibleValue)?;
        }
    }
    Ok(value)
}

/// Split a JSON number into its mantissa text and exponent, or `None` when the
/// text is not JSON number syntax.
fn split_number(text: &str) -> Option<(&str, i64)> {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(at) => (&text[..at], Some(&text[at + 1..])),
        None => (text, None),
    };

    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    let unsigned = mantissa.strip_prefix('-').unwrap_or(mantissa);
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };
    if !digits(int) || (int.len() > 1 && int.starts_with('0')) {
        return None;
    }
    if frac.is_some_and(|frac| !digits(frac)) {
        return None;
    }

    let exponent = match exponent {
        None => 0,
        Some(exp) => {
            let magnitude = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            if !digits(magnitude) {
                return None;
            }
            // Past this bound a non-zero mantissa fails anyway; zero stays zero.
            let bound = i64::from(u32::MAX);
            match exp.parse::<i64>() {
                Ok(exp) => exp.clamp(-bound, bound),
                Err(_) if exp.starts_with('-') => -bound,
                Err(_) => bound,
            }
        }
    };
    Some((mantissa, exponent))
}

/// Render a decimal as a JSON number token with the same digits and scale.
pub fn to_number(value: &Decimal) -> Result<serde_json::Number, serde_json::Error> {
    serde_json::Number::from_str(&value.to_string())
}

/// `#[serde(serialize_with)]` helper writing the price as a JSON number.
pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    to_number(value)
        .map_err(ser::Error::custom)?
        .serialize(serializer)
}

/// `#[serde(deserialize_with)]` helper reading the price from a JSON number.
///
/// Strings are refused here; see `BookCodec` for opt-in string coercion.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    let text = number.to_string();
    parse_decimal(&text)
        .map_err(|err| de::Error::custom(format!("price {text} is not an exact decimal: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_scale_of_plain_literals() {
        let price = parse_decimal("29.990").unwrap();
        assert_eq!(price.scale(), 3);
        assert_eq!(price.to_string(), "29.990");
    }

    #[test]
    fn accepts_exponent_literals() {
        assert_eq!(parse_decimal("2.999e1").unwrap(), Decimal::new(2999, 2));
        assert_eq!(parse_decimal("2999E-2").unwrap(), Decimal::new(2999, 2));
    }

    #[test]
    fn rejects_literals_that_would_round() {
        assert!(parse_decimal("0.12345678901234567890123456789012").is_err());
        assert!(parse_decimal("twenty").is_err());
    }

    #[test]
    fn rejects_exponent_literals_that_would_round() {
        assert!(parse_decimal("0.12345678901234567890123456789012e0").is_err());
        assert!(parse_decimal("1.2345678901234567890123456789012345e1").is_err());
        assert!(parse_decimal("1e-29").is_err());
        assert!(parse_decimal("1e29").is_err());
    }

    #[test]
    fn exponent_keeps_exact_digits() {
        let price = parse_decimal("1.5e-3").unwrap();
        assert_eq!(price.to_string(), "0.0015");

        let price = parse_decimal("-1.25E+3").unwrap();
        assert_eq!(price, Decimal::new(-1250, 0));

        let price = parse_decimal("1e28").unwrap();
        assert_eq!(price.to_string(), "10000000000000000000000000000");
    }

    #[test]
    fn zero_with_any_exponent_is_zero() {
        assert!(parse_decimal("0e100").unwrap().is_zero());
        assert!(parse_decimal("0e-100").unwrap().is_zero());
        assert!(parse_decimal("-0.00E+7").unwrap().is_zero());
        assert!(parse_decimal("0e99999999999999999999").unwrap().is_zero());
        assert!(parse_decimal("1e99999999999999999999").is_err());
    }

    #[test]
    fn rejects_text_outside_json_number_syntax() {
        for text in [
            "1_000.00", " 29.99 ", "+29.99", "01.5", ".5", "5.", "-", "1e", "1e+", "1.5e2.0", "",
        ] {
            assert!(parse_decimal(text).is_err(), "accepted {text:?}");
        }
    }

    #[test]
    fn number_token_matches_decimal_text() {
        let number = to_number(&Decimal::new(2999, 2)).unwrap();
        assert_eq!(number.to_string(), "29.99");

        let negative = to_number(&Decimal::new(-150, 2)).unwrap();
        assert_eq!(negative.to_string(), "-1.50");
    }
}
