//! Pure, deterministic functions mapping SQL scalar values onto the backing store's
//! annotation representations, preserving order (spec §4.1).

use rust_decimal::Decimal;

use crate::data::{DataType, DataValue, DecimalOptions};
use crate::err::{DbError, Result};

/// Encodes a signed integer of the given bit width as an order-preserving u64
/// (spec §4.1.1 / §8.2): `encode(v) = (v + 2^63) mod 2^64`, equivalently XOR the sign
/// bit, the same transform for every width — only the legal range differs per width.
/// `width` must be one of 8/16/32/64.
pub fn encode_signed_int(v: i64, width: u8) -> Result<u64> {
    match width {
        8 => {
            i8::try_from(v).map_err(|_| DbError::data("integer out of range for TINYINT"))?;
        }
        16 => {
            i16::try_from(v).map_err(|_| DbError::data("integer out of range for SMALLINT"))?;
        }
        32 => {
            i32::try_from(v).map_err(|_| DbError::data("integer out of range for INTEGER"))?;
        }
        64 => {}
        _ => return Err(DbError::internal(format!("unsupported integer width {width}"))),
    }
    Ok((v as u64) ^ (1u64 << 63))
}

/// Inverse of [`encode_signed_int`].
pub fn decode_signed_int(u: u64, width: u8) -> Result<i64> {
    if !matches!(width, 8 | 16 | 32 | 64) {
        return Err(DbError::internal(format!("unsupported integer width {width}")));
    }
    Ok((u ^ (1u64 << 63)) as i64)
}

/// Boolean to annotation encoding (spec §4.1.2).
pub fn encode_bool(v: bool) -> u64 {
    if v {
        1
    } else {
        0
    }
}

pub fn decode_bool(u: u64) -> bool {
    u != 0
}

/// DATETIME to annotation encoding: Unix epoch seconds as u64 (spec §4.1.3). Rejects
/// values before 1970-01-01T00:00:00Z.
pub fn encode_datetime(unix_seconds: i64) -> Result<u64> {
    if unix_seconds < 0 {
        return Err(DbError::data(
            "DATETIME values before 1970-01-01T00:00:00Z are not representable",
        ));
    }
    Ok(unix_seconds as u64)
}

pub fn decode_datetime(u: u64) -> i64 {
    u as i64
}

/// DECIMAL(p,s) to ordered-string encoding (spec §4.1.4).
///
/// The source's own scheme keeps a literal `.` separator inside negative-encoded
/// strings, which breaks byte-lexicographic order at the integer/fractional boundary
/// for adjacent-magnitude negatives (spec §9, open question). This core instead uses a
/// distinct separator byte for negatives: `/` (0x2F), which sorts below every digit
/// (`0`-`9`, 0x30-0x39) and below the positive separator `.` (0x2E). Every character of
/// a negative encoding therefore compares less than every character of a positive
/// encoding at the same string position, and the digit-inversion of negatives still
/// yields reverse-magnitude order within the negative half. See the monotonicity test
/// in this module for the property this must hold.
pub fn encode_decimal(d: Decimal, opts: DecimalOptions) -> Result<String> {
    let scale = opts.scale as u32;
    let int_digits = opts.int_digits() as usize;

    if d.normalize().scale() > scale {
        return Err(DbError::data(format!(
            "numeric out of range for DECIMAL({},{})",
            opts.precision, opts.scale
        )));
    }

    let mut scaled = d;
    scaled.rescale(scale);

    let negative = scaled.is_sign_negative();
    let digits = scaled.mantissa().unsigned_abs().to_string();

    // `digits` is the full digit string of the rescaled mantissa; split at `scale` from
    // the right into integer/fractional halves.
    let digits = if digits.len() < scale as usize + 1 {
        format!("{:0>width$}", digits, width = scale as usize + 1)
    } else {
        digits
    };
    let split = digits.len() - scale as usize;
    let (int_part, frac_part) = digits.split_at(split);

    if int_part.len() > int_digits {
        return Err(DbError::data(format!(
            "numeric out of range for DECIMAL({},{})",
            opts.precision, opts.scale
        )));
    }

    let int_part = format!("{:0>width$}", int_part, width = int_digits);

    let (sep, frac_sep) = if negative { ('-', '/') } else { ('.', '.') };

    let invert = |s: &str| -> String {
        s.chars()
            .map(|c| {
                let d = c.to_digit(10).unwrap();
                std::char::from_digit(9 - d, 10).unwrap()
            })
            .collect()
    };

    let (int_part, frac_part) = if negative {
        (invert(&int_part), invert(frac_part))
    } else {
        (int_part, frac_part.to_owned())
    };

    Ok(if scale == 0 {
        format!("{sep}{int_part}")
    } else {
        format!("{sep}{int_part}{frac_sep}{frac_part}")
    })
}

/// Inverse of [`encode_decimal`].
pub fn decode_decimal(s: &str, opts: DecimalOptions) -> Result<Decimal> {
    let mut chars = s.chars();
    let sep = chars
        .next()
        .ok_or_else(|| DbError::internal("empty DECIMAL encoding"))?;
    let negative = match sep {
        '.' => false,
        '-' => true,
        _ => return Err(DbError::internal("malformed DECIMAL encoding: bad separator")),
    };
    let rest: String = chars.collect();

    let invert = |s: &str| -> String {
        s.chars()
            .map(|c| {
                let d = c.to_digit(10).unwrap();
                std::char::from_digit(9 - d, 10).unwrap()
            })
            .collect()
    };

    let (int_part, frac_part) = if opts.scale == 0 {
        (rest, String::new())
    } else {
        let frac_sep = if negative { '/' } else { '.' };
        let idx = rest
            .find(frac_sep)
            .ok_or_else(|| DbError::internal("malformed DECIMAL encoding: missing fraction separator"))?;
        (rest[..idx].to_owned(), rest[idx + 1..].to_owned())
    };

    let (int_part, frac_part) = if negative {
        (invert(&int_part), invert(&frac_part))
    } else {
        (int_part, frac_part)
    };

    let digits = format!("{int_part}{frac_part}");
    let mantissa: i128 = digits
        .parse()
        .map_err(|_| DbError::internal("malformed DECIMAL encoding: non-digit content"))?;
    let mantissa = if negative { -mantissa } else { mantissa };

    Decimal::try_from_i128_with_scale(mantissa, opts.scale as u32)
        .map_err(|e| DbError::internal(format!("DECIMAL out of native range: {e}")))
}

/// Validates a VARCHAR(n) value against its declared character length (spec §4.1.5).
pub fn validate_varchar_len(s: &str, max_chars: Option<u32>) -> Result<()> {
    if let Some(max) = max_chars {
        let len = s.chars().count() as u32;
        if len > max {
            return Err(DbError::data(format!(
                "string of length {len} exceeds VARCHAR({max})"
            )));
        }
    }
    Ok(())
}

/// Encodes an indexed column's value as the numeric annotation (spec §3.3) for every
/// type `DataType::is_numeric_annotation` accepts. Callers must not invoke this for a
/// `Null` value or a non-numeric-annotation type.
pub fn encode_annotation_u64(value: &DataValue, sql_type: &DataType) -> Result<u64> {
    Ok(match (value, sql_type) {
        (DataValue::TinyInt(v), DataType::TinyInt) => encode_signed_int(*v as i64, 8)?,
        (DataValue::SmallInt(v), DataType::SmallInt) => encode_signed_int(*v as i64, 16)?,
        (DataValue::Integer(v), DataType::Integer) => encode_signed_int(*v as i64, 32)?,
        (DataValue::BigInt(v), DataType::BigInt) => encode_signed_int(*v, 64)?,
        (DataValue::Boolean(v), DataType::Boolean) => encode_bool(*v),
        (DataValue::DateTime(dt), DataType::DateTime) => encode_datetime(dt.and_utc().timestamp())?,
        _ => {
            return Err(DbError::internal(format!(
                "value {value:?} does not match numeric-annotation type {sql_type:?}"
            )))
        }
    })
}

/// Encodes an indexed column's value as the string annotation (spec §3.3) for VARCHAR/
/// CHAR/TEXT (raw UTF-8, length-validated) and DECIMAL (lexicographic encoding). Returns
/// `None` for a type this core never stores as a string annotation.
pub fn encode_annotation_string(value: &DataValue, sql_type: &DataType) -> Result<Option<String>> {
    Ok(match (value, sql_type) {
        (DataValue::Utf8String(s), DataType::Varchar(opts)) => {
            validate_varchar_len(s, opts.length)?;
            Some(s.clone())
        }
        (DataValue::Utf8String(s), DataType::Char(opts)) => {
            validate_varchar_len(s, opts.length)?;
            Some(s.clone())
        }
        (DataValue::Utf8String(s), DataType::Text) => Some(s.clone()),
        (DataValue::Decimal(d), DataType::Decimal(opts)) => Some(encode_decimal(*d, *opts)?),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_signed_int_round_trip_and_monotonic_boundaries() {
        for width in [8u8, 16, 32, 64] {
            let (min, max): (i64, i64) = match width {
                8 => (i8::MIN as i64, i8::MAX as i64),
                16 => (i16::MIN as i64, i16::MAX as i64),
                32 => (i32::MIN as i64, i32::MAX as i64),
                64 => (i64::MIN, i64::MAX),
                _ => unreachable!(),
            };

            let samples = [min, min + 1, -1, 0, 1, max - 1, max];
            for &v in &samples {
                let enc = encode_signed_int(v, width).unwrap();
                assert_eq!(decode_signed_int(enc, width).unwrap(), v);
            }

            for w in samples.windows(2) {
                let (a, b) = (w[0], w[1]);
                if a < b {
                    assert!(encode_signed_int(a, width).unwrap() < encode_signed_int(b, width).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_signed_int_zero_maps_to_sign_bit_for_64() {
        assert_eq!(encode_signed_int(0, 64).unwrap(), 0x8000_0000_0000_0000);
    }

    #[test]
    fn test_signed_int_rejects_out_of_range() {
        assert!(encode_signed_int(i64::from(i8::MAX) + 1, 8).is_err());
    }

    #[test]
    fn test_datetime_monotonic_and_rejects_pre_epoch() {
        assert!(encode_datetime(-1).is_err());
        assert!(encode_datetime(0).unwrap() < encode_datetime(100).unwrap());
        assert_eq!(decode_datetime(encode_datetime(1_700_000_000).unwrap()), 1_700_000_000);
    }

    #[test]
    fn test_decimal_round_trip() {
        let opts = DecimalOptions::new(8, 2);
        for s in ["10.50", "-10.50", "0.00", "0.01", "-0.01", "99999.99", "-99999.99"] {
            let d = Decimal::from_str(s).unwrap();
            let enc = encode_decimal(d, opts).unwrap();
            let dec = decode_decimal(&enc, opts).unwrap();
            assert_eq!(dec, d, "round trip failed for {s}");
        }
    }

    #[test]
    fn test_decimal_monotonic() {
        let opts = DecimalOptions::new(8, 2);
        let values = ["-99999.99", "-10.50", "-0.01", "0.00", "0.01", "10.50", "99999.99"];
        let encoded: Vec<String> = values
            .iter()
            .map(|s| encode_decimal(Decimal::from_str(s).unwrap(), opts).unwrap())
            .collect();

        for w in encoded.windows(2) {
            assert!(w[0] < w[1], "{} should sort before {}", w[0], w[1]);
        }
    }

    #[test]
    fn test_decimal_random_monotonic_sample() {
        let opts = DecimalOptions::new(6, 2);
        let mut values = vec![];
        // deterministic pseudo-random walk, no RNG dependency
        let mut seed: i64 = 7;
        for _ in 0..200 {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345) % 99_999_999;
            let cents = seed % 999_999 - 499_999;
            values.push(Decimal::new(cents, 2));
        }

        let mut pairs: Vec<(Decimal, String)> = values
            .into_iter()
            .map(|d| {
                let enc = encode_decimal(d, opts).unwrap();
                (d, enc)
            })
            .collect();

        pairs.sort_by_key(|a| a.0);
        for w in pairs.windows(2) {
            if w[0].0 < w[1].0 {
                assert!(w[0].1 < w[1].1, "{:?} vs {:?}", w[0], w[1]);
            }
        }
    }

    #[test]
    fn test_decimal_rejects_over_precision() {
        let opts = DecimalOptions::new(4, 2);
        assert!(encode_decimal(Decimal::from_str("123.45").unwrap(), opts).is_err());
    }

    #[test]
    fn test_varchar_length_in_characters() {
        assert!(validate_varchar_len("hello", Some(5)).is_ok());
        assert!(validate_varchar_len("hello!", Some(5)).is_err());
        // multi-byte characters count once each, not per byte
        assert!(validate_varchar_len("héllo", Some(5)).is_ok());
    }
}
