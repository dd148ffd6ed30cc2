//! Input validation
//!
//! Field-level checks run before anything reaches the services, each mapped
//! to its stable error code.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{ApiError, ErrorCode};
use crate::models::{NewItem, Rarity, UpdateItem};

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.is_empty() || email.len() > 254 {
        return Err(ErrorCode::InvalidEmail.into());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(ErrorCode::InvalidEmail.into());
    }

    Ok(())
}

/// Validate a registration payload: email format, password length,
/// nickname length
pub fn validate_register(email: &str, password: &str, nickname: &str) -> Result<(), ApiError> {
    validate_email(email)?;

    if password.len() < 6 {
        return Err(ErrorCode::PasswordTooShort.into());
    }

    let nickname = nickname.trim();
    if nickname.is_empty() || nickname.chars().count() > 20 {
        return Err(ErrorCode::NicknameLengthInvalid.into());
    }

    Ok(())
}

/// Validate a login payload
pub fn validate_login(email: &str, password: &str) -> Result<(), ApiError> {
    validate_email(email)?;

    if password.trim().is_empty() {
        return Err(ErrorCode::PasswordRequired.into());
    }

    Ok(())
}

/// Require a non-empty string field, mapping absence to the given code
pub fn require_non_empty(value: &str, code: ErrorCode) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(code.into());
    }
    Ok(())
}

fn validate_item_fields(
    name: Option<&str>,
    price: Option<i64>,
    description: Option<&str>,
    rarity: Option<&str>,
    stats: [Option<i32>; 4],
    cs_tag: Option<&str>,
    stock_quantity: Option<i32>,
    category_id: Option<i64>,
) -> Result<(), ApiError> {
    if let Some(name) = name {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > 100 {
            return Err(ErrorCode::ItemNameInvalid.into());
        }
    }

    if let Some(price) = price {
        if price < 0 {
            return Err(ErrorCode::ItemPriceMustBePositive.into());
        }
    }

    if let Some(description) = description {
        if description.chars().count() > 500 {
            return Err(ErrorCode::ItemDescriptionInvalid.into());
        }
    }

    if let Some(rarity) = rarity {
        if Rarity::parse(rarity).is_none() {
            return Err(ErrorCode::ItemRarityInvalid.into());
        }
    }

    for stat in stats.into_iter().flatten() {
        if stat < 0 {
            return Err(ErrorCode::ItemStatInvalid.into());
        }
    }

    if let Some(cs_tag) = cs_tag {
        if cs_tag.chars().count() > 50 {
            return Err(ErrorCode::ItemCategoryInvalid.into());
        }
    }

    if let Some(stock) = stock_quantity {
        if stock < 0 {
            return Err(ErrorCode::ItemStockInvalid.into());
        }
    }

    if let Some(category_id) = category_id {
        if category_id < 1 {
            return Err(ErrorCode::ItemCategoryInvalid.into());
        }
    }

    Ok(())
}

/// Validate an admin item-creation payload
pub fn validate_new_item(item: &NewItem) -> Result<(), ApiError> {
    validate_item_fields(
        Some(&item.name),
        Some(item.price),
        item.description.as_deref(),
        item.rarity.as_deref(),
        [item.stat_int, item.stat_str, item.stat_dex, item.stat_lck],
        item.cs_tag.as_deref(),
        item.stock_quantity,
        item.category_id,
    )
}

/// Validate an admin partial item update; all fields optional
pub fn validate_update_item(item: &UpdateItem) -> Result<(), ApiError> {
    validate_item_fields(
        item.name.as_deref(),
        item.price,
        item.description.as_deref(),
        item.rarity.as_deref(),
        [item.stat_int, item.stat_str, item.stat_dex, item.stat_lck],
        item.cs_tag.as_deref(),
        item.stock_quantity,
        item.category_id,
    )
}

/// Validate a cart quantity (add or update)
pub fn validate_quantity(quantity: i32) -> Result<(), ApiError> {
    if quantity < 1 {
        return Err(ApiError::with_details(
            ErrorCode::ValidationFailed,
            serde_json::json!({ "quantity": quantity }),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("a.b+c@sub.domain.io").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("user@nodot").is_err());
    }

    #[test]
    fn test_validate_register() {
        assert!(validate_register("user@example.com", "secret1", "wizard").is_ok());

        let short_pw = validate_register("user@example.com", "12345", "wizard").unwrap_err();
        assert_eq!(short_pw.code, ErrorCode::PasswordTooShort);

        let long_nick = "x".repeat(21);
        let bad_nick = validate_register("user@example.com", "secret1", &long_nick).unwrap_err();
        assert_eq!(bad_nick.code, ErrorCode::NicknameLengthInvalid);

        let empty_nick = validate_register("user@example.com", "secret1", "  ").unwrap_err();
        assert_eq!(empty_nick.code, ErrorCode::NicknameLengthInvalid);
    }

    #[test]
    fn test_validate_login() {
        assert!(validate_login("user@example.com", "pw").is_ok());
        let err = validate_login("user@example.com", "  ").unwrap_err();
        assert_eq!(err.code, ErrorCode::PasswordRequired);
    }

    #[test]
    fn test_validate_new_item() {
        let mut item = NewItem {
            name: "Stack Sword".to_string(),
            price: 1000,
            description: None,
            rarity: Some("rare".to_string()),
            stat_int: Some(3),
            stat_str: Some(5),
            stat_dex: None,
            stat_lck: None,
            cs_tag: Some("datastructure".to_string()),
            stock_quantity: Some(10),
            is_active: Some(true),
            category_id: Some(5),
        };
        assert!(validate_new_item(&item).is_ok());

        item.price = -1;
        assert_eq!(
            validate_new_item(&item).unwrap_err().code,
            ErrorCode::ItemPriceMustBePositive
        );
        item.price = 1000;

        item.rarity = Some("MYTHIC".to_string());
        assert_eq!(
            validate_new_item(&item).unwrap_err().code,
            ErrorCode::ItemRarityInvalid
        );
        item.rarity = None;

        item.stat_dex = Some(-2);
        assert_eq!(
            validate_new_item(&item).unwrap_err().code,
            ErrorCode::ItemStatInvalid
        );
        item.stat_dex = None;

        item.name = String::new();
        assert_eq!(
            validate_new_item(&item).unwrap_err().code,
            ErrorCode::ItemNameInvalid
        );
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }
}
