//! Query-string parsing for pagination, sorting, and range filters
//!
//! Parameters arrive as raw strings; anything out of range maps to
//! INVALID_QUERY_PARAM (or UNPROCESSABLE_ENTITY for an inverted range)
//! instead of a bare framework rejection.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::error::{ApiError, ErrorCode};

/// Parsed pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Zero-based page index
    pub page: u32,
    /// Page size, 1..=max
    pub size: u32,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

/// Parse page/size with defaults and an upper bound on size
pub fn parse_pagination(
    raw_page: Option<&str>,
    raw_size: Option<&str>,
    default_size: u32,
    max_size: u32,
) -> Result<Pagination, ApiError> {
    let page = match raw_page {
        None => 0,
        Some(raw) => raw.parse::<u32>().map_err(|_| {
            ApiError::with_details(ErrorCode::InvalidQueryParam, json!({ "page": raw }))
        })?,
    };

    let size = match raw_size {
        None => default_size,
        Some(raw) => {
            let size: u32 = raw.parse().map_err(|_| {
                ApiError::with_details(ErrorCode::InvalidQueryParam, json!({ "size": raw }))
            })?;
            if size == 0 || size > max_size {
                return Err(ApiError::with_details(
                    ErrorCode::InvalidQueryParam,
                    json!({ "size": raw }),
                ));
            }
            size
        }
    };

    Ok(Pagination { page, size })
}

/// A validated sort directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// SQL column name (from the allow-list, never client input)
    pub column: &'static str,
    pub descending: bool,
    /// Echo of the directive, e.g. "price,DESC"
    pub sort_string: String,
}

impl SortSpec {
    pub fn direction_sql(&self) -> &'static str {
        if self.descending { "DESC" } else { "ASC" }
    }
}

/// Parse a `field,DIRECTION` sort directive against an allow-list of
/// (api field, sql column) pairs
pub fn parse_sort(
    raw: Option<&str>,
    allowed: &[(&str, &'static str)],
    default_field: &str,
) -> Result<SortSpec, ApiError> {
    let (field, descending) = match raw {
        None => (default_field.to_string(), true),
        Some(raw) => {
            let mut parts = raw.splitn(2, ',');
            let field = parts.next().unwrap_or_default().to_string();
            let dir = parts.next().unwrap_or("DESC");
            let descending = match dir.to_ascii_lowercase().as_str() {
                "asc" => false,
                "desc" => true,
                _ => {
                    return Err(ApiError::with_details(
                        ErrorCode::InvalidQueryParam,
                        json!({ "sort": raw }),
                    ));
                }
            };
            (field, descending)
        }
    };

    let column = allowed
        .iter()
        .find(|(api, _)| *api == field)
        .map(|(_, col)| *col)
        .ok_or_else(|| {
            ApiError::with_details(
                ErrorCode::InvalidQueryParam,
                json!({
                    "sort": field,
                    "allowed": allowed.iter().map(|(api, _)| *api).collect::<Vec<_>>(),
                }),
            )
        })?;

    let sort_string = format!("{},{}", field, if descending { "DESC" } else { "ASC" });

    Ok(SortSpec {
        column,
        descending,
        sort_string,
    })
}

/// Parse an optional min/max numeric range; min > max is unprocessable
pub fn parse_range(
    raw_min: Option<&str>,
    raw_max: Option<&str>,
    field: &str,
) -> Result<(Option<i64>, Option<i64>), ApiError> {
    let parse = |raw: &str| {
        raw.parse::<i64>().map_err(|_| {
            ApiError::with_details(ErrorCode::InvalidQueryParam, json!({ field: raw }))
        })
    };

    let min = raw_min.map(parse).transpose()?;
    let max = raw_max.map(parse).transpose()?;

    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ApiError::with_details(
                ErrorCode::UnprocessableEntity,
                json!({ field: { "min": min, "max": max } }),
            ));
        }
    }

    Ok((min, max))
}

/// Parse a positive id from a query/path string
pub fn parse_positive_id(raw: &str, field: &str) -> Result<i64, ApiError> {
    let id: i64 = raw.parse().map_err(|_| {
        ApiError::with_details(ErrorCode::InvalidQueryParam, json!({ field: raw }))
    })?;
    if id < 1 {
        return Err(ApiError::with_details(
            ErrorCode::InvalidQueryParam,
            json!({ field: raw }),
        ));
    }
    Ok(id)
}

/// Parse an optional result limit with a default and hard cap
pub fn parse_limit(raw: Option<&str>, default: i64, max: i64) -> Result<i64, ApiError> {
    match raw {
        None => Ok(default),
        Some(raw) => {
            let limit: i64 = raw.parse().map_err(|_| {
                ApiError::with_details(ErrorCode::InvalidQueryParam, json!({ "limit": raw }))
            })?;
            if limit < 1 || limit > max {
                return Err(ApiError::with_details(
                    ErrorCode::InvalidQueryParam,
                    json!({ "limit": raw }),
                ));
            }
            Ok(limit)
        }
    }
}

/// Parse an inclusive `from`/`to` date range (YYYY-MM-DD); the upper bound
/// covers the whole `to` day
pub fn parse_date_range(
    raw_from: &str,
    raw_to: &str,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ApiError> {
    let parse = |raw: &str, field: &str| {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            ApiError::with_details(ErrorCode::InvalidQueryParam, json!({ field: raw }))
        })
    };

    let from = parse(raw_from, "from")?;
    let to = parse(raw_to, "to")?;

    if from > to {
        return Err(ApiError::with_details(
            ErrorCode::UnprocessableEntity,
            json!({ "from": raw_from, "to": raw_to }),
        ));
    }

    let from = from
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let to = to
        .and_hms_opt(23, 59, 59)
        .map(|dt| dt.and_utc())
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    Ok((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pagination_defaults() {
        let p = parse_pagination(None, None, 20, 50).unwrap();
        assert_eq!(p, Pagination { page: 0, size: 20 });
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_parse_pagination_bounds() {
        assert!(parse_pagination(Some("-1"), None, 20, 50).is_err());
        assert!(parse_pagination(Some("abc"), None, 20, 50).is_err());
        assert!(parse_pagination(None, Some("0"), 20, 50).is_err());
        assert!(parse_pagination(None, Some("51"), 20, 50).is_err());

        let p = parse_pagination(Some("3"), Some("10"), 20, 50).unwrap();
        assert_eq!(p.offset(), 30);
    }

    #[test]
    fn test_parse_sort() {
        let allowed = [("createdAt", "created_at"), ("price", "price")];

        let default = parse_sort(None, &allowed, "createdAt").unwrap();
        assert_eq!(default.column, "created_at");
        assert!(default.descending);
        assert_eq!(default.sort_string, "createdAt,DESC");

        let asc = parse_sort(Some("price,ASC"), &allowed, "createdAt").unwrap();
        assert_eq!(asc.column, "price");
        assert!(!asc.descending);
        assert_eq!(asc.direction_sql(), "ASC");

        // bare field defaults to DESC
        let bare = parse_sort(Some("price"), &allowed, "createdAt").unwrap();
        assert!(bare.descending);

        assert!(parse_sort(Some("password,ASC"), &allowed, "createdAt").is_err());
        assert!(parse_sort(Some("price,SIDEWAYS"), &allowed, "createdAt").is_err());
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range(None, None, "price").unwrap(), (None, None));
        assert_eq!(
            parse_range(Some("10"), Some("20"), "price").unwrap(),
            (Some(10), Some(20))
        );
        assert!(parse_range(Some("x"), None, "price").is_err());

        let inverted = parse_range(Some("20"), Some("10"), "price").unwrap_err();
        assert_eq!(inverted.code, ErrorCode::UnprocessableEntity);
    }

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id("7", "categoryId").unwrap(), 7);
        assert!(parse_positive_id("0", "categoryId").is_err());
        assert!(parse_positive_id("seven", "categoryId").is_err());
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None, 10, 100).unwrap(), 10);
        assert_eq!(parse_limit(Some("25"), 10, 100).unwrap(), 25);
        assert!(parse_limit(Some("0"), 10, 100).is_err());
        assert!(parse_limit(Some("101"), 10, 100).is_err());
    }

    #[test]
    fn test_parse_date_range() {
        let (from, to) = parse_date_range("2025-01-01", "2025-01-31").unwrap();
        assert!(from < to);

        let inverted = parse_date_range("2025-02-01", "2025-01-01").unwrap_err();
        assert_eq!(inverted.code, ErrorCode::UnprocessableEntity);

        assert!(parse_date_range("January", "2025-01-01").is_err());
    }
}
