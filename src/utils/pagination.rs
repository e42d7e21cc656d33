// src/utils/pagination.rs

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// A normalized page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    /// Lenient parsing: anything missing, unparsable or zero falls back to
    /// the defaults; `limit` is clamped to `1..=MAX_LIMIT` and `page` to `>= 1`.
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        let limit = match parse_number(limit) {
            Some(n) if n != 0 => n.clamp(1, MAX_LIMIT),
            _ => DEFAULT_LIMIT,
        };
        let page = match parse_number(page) {
            Some(n) if n != 0 => n.max(1),
            _ => 1,
        };

        Self {
            page,
            limit,
            offset: (page - 1) * limit,
        }
    }
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .map(|n| n.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = Pagination::from_params(None, None);
        assert_eq!(p, Pagination { page: 1, limit: 10, offset: 0 });
    }

    #[test]
    fn test_window() {
        let p = Pagination::from_params(Some("3"), Some("20"));
        assert_eq!(p, Pagination { page: 3, limit: 20, offset: 40 });
    }

    #[test]
    fn test_clamping_and_garbage() {
        assert_eq!(Pagination::from_params(None, Some("500")).limit, 100);
        assert_eq!(Pagination::from_params(None, Some("-5")).limit, 1);
        assert_eq!(Pagination::from_params(None, Some("0")).limit, 10);
        assert_eq!(Pagination::from_params(None, Some("abc")).limit, 10);
        assert_eq!(Pagination::from_params(Some("-2"), None).page, 1);
        assert_eq!(Pagination::from_params(Some("nope"), None).page, 1);
    }
}
