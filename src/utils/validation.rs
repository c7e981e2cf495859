//! Domain validation helpers
//!
//! Checks that go beyond what the `validator` derive can express.

use rust_decimal::Decimal;

use crate::models::user::{User, UserRole};
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// A voucher must travel between two different regions
pub fn ensure_distinct_regions(origin: i64, destination: i64) -> AppResult<()> {
    if origin == destination {
        return Err(AppError::BadRequest(
            "Origin and destination region must differ".to_string(),
        ));
    }
    Ok(())
}

/// Weights and amounts must be strictly positive
pub fn ensure_positive(field: &str, value: Decimal) -> AppResult<()> {
    if value <= Decimal::ZERO {
        return Err(AppError::BadRequest(format!(
            "{} must be greater than zero",
            field
        )));
    }
    Ok(())
}

/// A driver assignment must reference an existing account with the driver role
pub fn ensure_driver(driver_id: i64, user: Option<&User>) -> AppResult<()> {
    match user {
        None => Err(not_found_error("User", driver_id)),
        Some(user) if user.role != UserRole::Driver => Err(AppError::BadRequest(format!(
            "User '{}' is not a driver",
            user.username
        ))),
        Some(_) => Ok(()),
    }
}

/// Ids that were requested but are absent from the loaded rows
pub fn missing_ids(requested: &[i64], found: &[i64]) -> Vec<i64> {
    requested
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with_role(role: UserRole) -> User {
        User {
            id: 9,
            username: "kyaw".to_string(),
            password_hash: String::new(),
            full_name: "Kyaw Min".to_string(),
            role,
            region_id: Some(1),
            currency: "MMK".to_string(),
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_distinct_regions() {
        assert!(ensure_distinct_regions(1, 2).is_ok());
        assert!(ensure_distinct_regions(3, 3).is_err());
    }

    #[test]
    fn test_positive_decimal() {
        assert!(ensure_positive("weight", Decimal::new(25, 1)).is_ok());
        assert!(ensure_positive("weight", Decimal::ZERO).is_err());
        assert!(ensure_positive("weight", Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_ensure_driver_accepts_driver_accounts_only() {
        let driver = user_with_role(UserRole::Driver);
        assert!(ensure_driver(9, Some(&driver)).is_ok());

        let staff = user_with_role(UserRole::Staff);
        assert!(matches!(
            ensure_driver(9, Some(&staff)),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_ensure_driver_rejects_unknown_account() {
        assert!(matches!(
            ensure_driver(42, None),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_missing_ids_reports_each_absent_id() {
        assert!(missing_ids(&[1, 2], &[2, 1]).is_empty());
        assert_eq!(missing_ids(&[1, 2, 3], &[1, 3]), vec![2]);
        assert_eq!(missing_ids(&[5, 6], &[]), vec![5, 6]);
    }
}
