//! Variant identifier normalization.

use crate::CoreError;

/// Prefix of a fully qualified Storefront product-variant global id.
pub const VARIANT_GID_PREFIX: &str = "gid://shopify/ProductVariant/";

/// Normalizes a variant identifier into the qualified global-id form the
/// cart API requires.
///
/// A fully qualified id passes through unchanged; a bare numeric string is
/// prefixed into the qualified form.
///
/// # Errors
///
/// Returns [`CoreError::InvalidVariantId`] for anything that is neither
/// qualified nor numeric — malformed input here would silently corrupt the
/// external cart, so it is treated as fatal.
pub fn normalize_variant_id(input: &str) -> Result<String, CoreError> {
    let trimmed = input.trim();
    if let Some(rest) = trimmed.strip_prefix(VARIANT_GID_PREFIX) {
        if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(trimmed.to_string());
        }
        return Err(CoreError::InvalidVariantId(input.to_string()));
    }
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(format!("{VARIANT_GID_PREFIX}{trimmed}"));
    }
    Err(CoreError::InvalidVariantId(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_id_passes_through() {
        let id = "gid://shopify/ProductVariant/123456789";
        assert_eq!(normalize_variant_id(id).expect("valid id"), id);
    }

    #[test]
    fn bare_numeric_id_is_prefixed() {
        assert_eq!(
            normalize_variant_id("123456789").expect("valid id"),
            "gid://shopify/ProductVariant/123456789"
        );
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        assert_eq!(
            normalize_variant_id("  42  ").expect("valid id"),
            "gid://shopify/ProductVariant/42"
        );
    }

    #[test]
    fn non_numeric_input_is_rejected() {
        assert!(matches!(
            normalize_variant_id("variant-abc"),
            Err(CoreError::InvalidVariantId(_))
        ));
    }

    #[test]
    fn qualified_prefix_with_junk_suffix_is_rejected() {
        assert!(matches!(
            normalize_variant_id("gid://shopify/ProductVariant/abc"),
            Err(CoreError::InvalidVariantId(_))
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            normalize_variant_id(""),
            Err(CoreError::InvalidVariantId(_))
        ));
    }
}
