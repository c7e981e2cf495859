//! Human-readable code minting
//!
//! Pure formatting of voucher and consignment codes. Sequence
//! allocation itself lives in the repositories; these functions only
//! turn an allocated sequence into the code handed to staff.

use chrono::NaiveDate;

use crate::utils::errors::AppError;

/// Build a voucher code: region prefix followed by the sequence
/// left-padded with zeros to `width` digits (e.g. `MAN0000007`).
///
/// A sequence that no longer fits in `width` digits is rejected
/// instead of silently producing a wider code, because codes must
/// stay lexicographically ordered per prefix.
pub fn format_voucher_code(prefix: &str, sequence: i64, width: usize) -> Result<String, AppError> {
    if sequence < 0 {
        return Err(AppError::BadRequest(format!(
            "voucher sequence must not be negative (got {})",
            sequence
        )));
    }

    let digits = sequence.to_string();
    if digits.len() > width {
        return Err(AppError::Internal(format!(
            "voucher sequence {} overflows the configured code width of {} digits",
            sequence, width
        )));
    }

    Ok(format!("{}{:0>width$}", prefix, digits, width = width))
}

/// Build a consignment code: `PREFIX-YYYYMMDD-NNN` with a per-day
/// sequence padded to three digits.
pub fn format_consignment_code(
    prefix: &str,
    date: NaiveDate,
    sequence: i64,
) -> Result<String, AppError> {
    if sequence < 0 {
        return Err(AppError::BadRequest(format!(
            "consignment sequence must not be negative (got {})",
            sequence
        )));
    }

    Ok(format!("{}-{}-{:03}", prefix, date.format("%Y%m%d"), sequence))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_voucher_code_pads_with_zeros() {
        assert_eq!(format_voucher_code("MAN", 7, 4).unwrap(), "MAN0007");
        assert_eq!(format_voucher_code("KUL", 1, 7).unwrap(), "KUL0000001");
    }

    #[test]
    fn test_format_voucher_code_exact_width() {
        assert_eq!(format_voucher_code("MAN", 9999, 4).unwrap(), "MAN9999");
    }

    #[test]
    fn test_format_voucher_code_overflow_fails_closed() {
        // The legacy system silently produced a wider string here,
        // which broke lexicographic ordering of codes.
        let err = format_voucher_code("MAN", 12345, 4).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_format_voucher_code_rejects_negative_sequence() {
        let err = format_voucher_code("MAN", -1, 4).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_codes_are_lexicographically_ordered() {
        let a = format_voucher_code("MAN", 8, 7).unwrap();
        let b = format_voucher_code("MAN", 9, 7).unwrap();
        let c = format_voucher_code("MAN", 10, 7).unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_format_consignment_code() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        assert_eq!(
            format_consignment_code("CON", date, 3).unwrap(),
            "CON-20260829-003"
        );
    }
}
