//! Human-readable byte sizes.
//!
//! Units are binary (1KB = 1024 bytes) and the unit is picked from the raw
//! byte count. Above bytes, values carry one decimal place rounded
//! half-up, computed in integer arithmetic so ties never depend on float
//! representation. GB is the largest unit.

use crate::error::{Error, Result};

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Format a byte count, e.g. `500B`, `1.5KB`, `2.0MB`.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    match bytes {
        n if n < KB => format!("{n}B"),
        n if n < MB => format!("{}KB", one_decimal(n, KB)),
        n if n < GB => format!("{}MB", one_decimal(n, MB)),
        n => format!("{}GB", one_decimal(n, GB)),
    }
}

/// Format a signed byte count, as reported by some file APIs.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `bytes` is negative.
pub fn format_signed_size(bytes: i64) -> Result<String> {
    let bytes = u64::try_from(bytes)
        .map_err(|_| Error::InvalidInput(format!("size cannot be negative: {bytes}")))?;
    Ok(format_size(bytes))
}

/// `bytes / unit` rounded half-up to tenths.
fn one_decimal(bytes: u64, unit: u64) -> String {
    let unit = u128::from(unit);
    let tenths = (u128::from(bytes) * 10 + unit / 2) / unit;
    format!("{}.{}", tenths / 10, tenths % 10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bytes_have_no_decimal() {
        assert_eq!(format_size(0), "0B");
        assert_eq!(format_size(500), "500B");
        assert_eq!(format_size(1023), "1023B");
    }

    #[test]
    fn kilobytes() {
        assert_eq!(format_size(1024), "1.0KB");
        assert_eq!(format_size(1536), "1.5KB");
        assert_eq!(format_size(10 * 1024), "10.0KB");
    }

    #[test]
    fn megabytes() {
        assert_eq!(format_size(1_048_576), "1.0MB");
        assert_eq!(format_size(5 * 1_048_576 / 2), "2.5MB");
    }

    #[test]
    fn gigabytes() {
        assert_eq!(format_size(GB), "1.0GB");
        assert_eq!(format_size(3 * GB / 2), "1.5GB");
    }

    #[test]
    fn ties_round_up() {
        // 1280 bytes is exactly 1.25KB
        assert_eq!(format_size(1280), "1.3KB");
    }

    #[test]
    fn unit_follows_raw_count() {
        assert_eq!(format_size(MB - 1), "1024.0KB");
    }

    #[test]
    fn max_value_does_not_overflow() {
        assert!(format_size(u64::MAX).ends_with("GB"));
    }

    #[test]
    fn signed_negative_is_invalid() {
        let err = format_signed_size(-1).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn signed_positive_matches_unsigned() {
        assert_eq!(format_signed_size(2048).unwrap(), "2.0KB");
    }

    proptest! {
        #[test]
        fn below_kilobyte_is_plain(n in 0u64..1024) {
            prop_assert_eq!(format_size(n), format!("{n}B"));
        }

        #[test]
        fn scaled_values_have_one_decimal(n in 1024u64..u64::MAX) {
            let s = format_size(n);
            let number = s.trim_end_matches(char::is_alphabetic);
            let (_, frac) = number.split_once('.').unwrap();
            prop_assert_eq!(frac.len(), 1);
        }
    }
}
