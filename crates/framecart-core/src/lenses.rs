//! Lens catalog and pricing.
//!
//! Prices come from a lookup table keyed by a normalized string combining
//! the lens-type code, the index code (only when it differs from the base
//! 1.50 index) and a single coating token derived from the selected
//! coatings by tier priority. Missing entries fall back silently rather
//! than erroring so checkout is never blocked by a table gap.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Coating codes, ordered from highest to lowest tier. Exactly one tier
/// ever contributes to a price key.
pub mod coating {
    pub const PHOTO: &str = "PHOTO";
    pub const BLUE_AR: &str = "BLUE AR";
    pub const AR: &str = "AR";
    pub const HARD_COAT: &str = "HC";
}

/// The cheapest index; omitted from price keys.
pub const BASE_INDEX: &str = "1.50";

/// The lens type priced from zero, whose index upgrades fall back to a
/// coating-independent premium table.
pub const BASE_LENS_TYPE: &str = "SV";

/// A selectable catalog option: a stable code plus a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogOption {
    pub code: String,
    pub label: String,
}

/// One configured lens: type, index/thickness and chosen coatings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LensSelection {
    pub lens_type: String,
    pub index: String,
    #[serde(default)]
    pub coatings: Vec<String>,
}

impl LensSelection {
    /// Drops the photochromic coating when it is not offered with the rest
    /// of the selection: PHOTO is unavailable with BLUE AR and with the
    /// 1.74 index.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let has_blue = self.coatings.iter().any(|c| c == coating::BLUE_AR);
        if has_blue || self.index == "1.74" {
            self.coatings.retain(|c| c != coating::PHOTO);
        }
        self
    }
}

/// Derives the single coating token used in price keys, by tier priority
/// PHOTO > BLUE AR > AR > HC. An empty set is the hard-coat base tier.
#[must_use]
pub fn derive_coating_tier(coatings: &[String]) -> &'static str {
    for tier in [coating::PHOTO, coating::BLUE_AR, coating::AR] {
        if coatings.iter().any(|c| c == tier) {
            return tier;
        }
    }
    coating::HARD_COAT
}

fn price_key(lens_type: &str, index: &str, tier: &str) -> String {
    if index == BASE_INDEX {
        format!("{lens_type} {tier}")
    } else {
        format!("{lens_type} {index} {tier}")
    }
}

/// Lens types, indexes, coatings and the price table they key into.
#[derive(Debug, Clone)]
pub struct LensCatalog {
    types: Vec<CatalogOption>,
    indexes: Vec<CatalogOption>,
    coatings: Vec<CatalogOption>,
    prices: HashMap<String, Decimal>,
    sv_index_premiums: HashMap<String, Decimal>,
}

impl Default for LensCatalog {
    fn default() -> Self {
        fn opt(code: &str, label: &str) -> CatalogOption {
            CatalogOption {
                code: code.to_string(),
                label: label.to_string(),
            }
        }

        let prices = [
            // Single Vision
            ("SV HC", 0),
            ("SV AR", 40),
            ("SV BLUE AR", 50),
            ("SV PHOTO", 79),
            ("SV 1.60 AR", 60),
            ("SV 1.67 AR", 100),
            ("SV 1.74 AR", 140),
            ("SV 1.60 PHOTO", 139),
            ("SV 1.67 PHOTO", 179),
            // Bifocal
            ("BIF HC", 50),
            ("BIF AR", 90),
            ("BIF PHOTO", 129),
            ("BIF 1.60 AR", 100),
            ("BIF 1.67 AR", 150),
            ("BIF 1.74 AR", 190),
            ("BIF 1.60 PHOTO", 179),
            // Standard Varifocal
            ("STD VARI HC", 90),
            ("STD VARI AR", 130),
            ("STD VARI PHOTO", 169),
            ("STD VARI 1.60 AR", 150),
            ("STD VARI 1.67 AR", 190),
            ("STD VARI 1.74 AR", 230),
            ("STD VARI 1.60 PHOTO", 229),
            ("STD VARI 1.67 PHOTO", 269),
            // Elite Varifocal
            ("ELT VARI HC", 145),
            ("ELT VARI AR", 185),
            ("ELT VARI PHOTO", 224),
            ("ELT VARI 1.60 AR", 205),
            ("ELT VARI 1.67 AR", 245),
            ("ELT VARI 1.74 AR", 285),
            ("ELT VARI 1.60 PHOTO", 284),
            ("ELT VARI 1.67 PHOTO", 324),
            // Tailor-Made Varifocal
            ("TM VARI HC", 190),
            ("TM VARI AR", 230),
            ("TM VARI PHOTO", 269),
            ("TM VARI 1.60 AR", 250),
            ("TM VARI 1.67 AR", 290),
            ("TM VARI 1.74 AR", 330),
            ("TM VARI 1.60 PHOTO", 329),
            ("TM VARI 1.67 PHOTO", 369),
        ]
        .into_iter()
        .map(|(key, price)| (key.to_string(), Decimal::from(price)))
        .collect();

        let sv_index_premiums = [("1.60", 20), ("1.67", 60), ("1.74", 100)]
            .into_iter()
            .map(|(index, premium)| (index.to_string(), Decimal::from(premium)))
            .collect();

        Self {
            types: vec![
                opt("SV", "Single Vision"),
                opt("BIF", "Bifocal"),
                opt("STD VARI", "Standard Varifocal"),
                opt("ELT VARI", "Elite Varifocal"),
                opt("TM VARI", "Tailor-Made Varifocal"),
            ],
            indexes: vec![
                opt("1.50", "Standard (1.50)"),
                opt("1.60", "Thin (1.60)"),
                opt("1.67", "Ultra-thin (1.67)"),
                opt("1.74", "Extra Ultra-thin (1.74)"),
            ],
            coatings: vec![
                opt(coating::HARD_COAT, "Hard Coat"),
                opt(coating::AR, "Anti-Reflective"),
                opt(coating::BLUE_AR, "Blue Light Anti-Reflective"),
                opt(coating::PHOTO, "Photochromic (Transitions)"),
            ],
            prices,
            sv_index_premiums,
        }
    }
}

impl LensCatalog {
    #[must_use]
    pub fn types(&self) -> &[CatalogOption] {
        &self.types
    }

    #[must_use]
    pub fn indexes(&self) -> &[CatalogOption] {
        &self.indexes
    }

    #[must_use]
    pub fn coatings(&self) -> &[CatalogOption] {
        &self.coatings
    }

    #[must_use]
    pub fn lens_type(&self, code: &str) -> Option<&CatalogOption> {
        self.types.iter().find(|t| t.code == code)
    }

    #[must_use]
    pub fn index(&self, code: &str) -> Option<&CatalogOption> {
        self.indexes.iter().find(|i| i.code == code)
    }

    #[must_use]
    pub fn coating(&self, code: &str) -> Option<&CatalogOption> {
        self.coatings.iter().find(|c| c.code == code)
    }

    /// Prices a lens configuration. Never negative, never fails.
    ///
    /// Lookup order:
    /// 1. the exact normalized key;
    /// 2. for the base lens type, a coating-independent index premium;
    /// 3. otherwise the same lens type's AR price at the requested index;
    /// 4. zero.
    #[must_use]
    pub fn price(&self, lens_type: &str, index: &str, coatings: &[String]) -> Decimal {
        if self.lens_type(lens_type).is_none() {
            return Decimal::ZERO;
        }

        let tier = derive_coating_tier(coatings);
        if let Some(price) = self.prices.get(&price_key(lens_type, index, tier)) {
            return *price;
        }

        if lens_type == BASE_LENS_TYPE {
            return self
                .sv_index_premiums
                .get(index)
                .copied()
                .unwrap_or(Decimal::ZERO);
        }

        self.prices
            .get(&price_key(lens_type, index, coating::AR))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Prices a [`LensSelection`] after normalization.
    #[must_use]
    pub fn price_selection(&self, selection: &LensSelection) -> Decimal {
        let selection = selection.clone().normalized();
        self.price(&selection.lens_type, &selection.index, &selection.coatings)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    types: Vec<CatalogOption>,
    indexes: Vec<CatalogOption>,
    coatings: Vec<CatalogOption>,
    prices: HashMap<String, Decimal>,
    #[serde(default)]
    sv_index_premiums: HashMap<String, Decimal>,
}

/// Loads and validates a lens catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation (empty or duplicate codes, negative prices, price keys that
/// reference unknown lens types).
pub fn load_lens_catalog(path: &Path) -> Result<LensCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: CatalogFile = serde_yaml::from_str(&content)?;
    validate_catalog(&file)?;

    Ok(LensCatalog {
        types: file.types,
        indexes: file.indexes,
        coatings: file.coatings,
        prices: file.prices,
        sv_index_premiums: file.sv_index_premiums,
    })
}

fn validate_catalog(file: &CatalogFile) -> Result<(), ConfigError> {
    for (section, options) in [
        ("types", &file.types),
        ("indexes", &file.indexes),
        ("coatings", &file.coatings),
    ] {
        let mut seen = HashSet::new();
        for option in options {
            if option.code.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "lens catalog {section} entry has an empty code"
                )));
            }
            if !seen.insert(option.code.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate {section} code '{}' in lens catalog",
                    option.code
                )));
            }
        }
    }

    for (key, price) in &file.prices {
        if price.is_sign_negative() && !price.is_zero() {
            return Err(ConfigError::Validation(format!(
                "negative price for '{key}' in lens catalog"
            )));
        }
        if !file.types.iter().any(|t| key.starts_with(t.code.as_str())) {
            return Err(ConfigError::Validation(format!(
                "price key '{key}' does not start with a known lens type code"
            )));
        }
    }

    for (index, premium) in &file.sv_index_premiums {
        if premium.is_sign_negative() && !premium.is_zero() {
            return Err(ConfigError::Validation(format!(
                "negative index premium for '{index}' in lens catalog"
            )));
        }
    }

    Ok(())
}
