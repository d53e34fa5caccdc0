//! Optional brand handling
//!
//! A product without a brand is stored as SQL NULL. Forms and query strings
//! deliver "no brand" as a missing field, an empty string or the literal
//! `"null"`, so every path that writes or looks up the ledger goes through
//! [`normalize_brand`]. Lookups compare with the [`BRAND_MATCHES_SQL`]
//! fragment, which uses `IS` so NULL matches NULL. The ledger's unique
//! index keys on `COALESCE(brand, '')` for the same effect on upserts.

/// Null-safe brand comparison for ledger queries. Bind the normalized brand.
pub const BRAND_MATCHES_SQL: &str = "brand IS ?";

/// Collapse the various spellings of "no brand" into `None`
pub fn normalize_brand(brand: Option<&str>) -> Option<String> {
    let brand = brand?.trim();
    if brand.is_empty() || brand.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(brand.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_brand_absent_forms() {
        assert_eq!(normalize_brand(None), None);
        assert_eq!(normalize_brand(Some("")), None);
        assert_eq!(normalize_brand(Some("   ")), None);
        assert_eq!(normalize_brand(Some("null")), None);
        assert_eq!(normalize_brand(Some("NULL")), None);
    }

    #[test]
    fn test_normalize_brand_trims() {
        assert_eq!(normalize_brand(Some("  Acme ")), Some("Acme".to_string()));
    }
}
