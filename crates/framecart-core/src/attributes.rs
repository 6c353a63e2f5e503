//! Cart line attribute composition.
//!
//! Downstream order processing parses these key/value pairs back out of
//! the external cart, so the key strings must round-trip exactly.

use serde::{Deserialize, Serialize};

use crate::lenses::{LensCatalog, LensSelection};
use crate::rx::{format_diopter, Prescription, UsageType};

/// Attribute keys pushed to the external cart as line-item metadata.
pub mod keys {
    pub const COLOUR: &str = "Colour";
    pub const LENS_TYPE: &str = "Lens Type";
    pub const LENS_TYPE_CODE: &str = "Lens Type Code";
    pub const LENS_INDEX: &str = "Lens Index";
    pub const LENS_INDEX_CODE: &str = "Lens Index Code";
    pub const COATINGS: &str = "Coatings";
    pub const COATINGS_CODE: &str = "Coatings Code";
    pub const RX_R_SPH: &str = "Rx R SPH";
    pub const RX_R_CYL: &str = "Rx R CYL";
    pub const RX_R_AXIS: &str = "Rx R AXIS";
    pub const RX_L_SPH: &str = "Rx L SPH";
    pub const RX_L_CYL: &str = "Rx L CYL";
    pub const RX_L_AXIS: &str = "Rx L AXIS";
    pub const PD: &str = "PD";
    pub const PD_LEFT: &str = "PD Left";
    pub const PD_RIGHT: &str = "PD Right";
    pub const INTERMEDIATE_ADD: &str = "Intermediate Add";
    pub const NEAR_ADD: &str = "Near Add";
    pub const RX_NOTES: &str = "Rx Notes";
    pub const USAGE_TYPE: &str = "Prescription Usage Type";
    pub const ASSOCIATED_FRAME: &str = "Associated Frame";

    /// Kind attribute kept on lens addon lines.
    pub const LENS_CONFIGURATION: &str = "Lens: Configuration";
    /// Kind attribute kept on photochromic addon lines.
    pub const LENS_PHOTOCHROMIC_TYPE: &str = "Lens: Photochromic Type";
}

/// A single key/value pair attached to a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAttribute {
    pub key: String,
    pub value: String,
}

impl LineAttribute {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Composes the frame line's attribute list from the configured colour,
/// lens selection and prescription. Empty fields are omitted entirely
/// rather than emitted with empty values.
#[must_use]
pub fn format_attributes(
    colour: Option<&str>,
    selection: &LensSelection,
    rx: &Prescription,
    usage: UsageType,
    catalog: &LensCatalog,
) -> Vec<LineAttribute> {
    let mut attributes = Vec::new();
    let mut push = |key: &str, value: String| {
        if !value.is_empty() {
            attributes.push(LineAttribute::new(key, value));
        }
    };

    if let Some(colour) = colour {
        push(keys::COLOUR, colour.to_string());
    }

    if let Some(lens_type) = catalog.lens_type(&selection.lens_type) {
        push(keys::LENS_TYPE_CODE, lens_type.code.clone());
        push(keys::LENS_TYPE, lens_type.label.clone());
    }

    if let Some(index) = catalog.index(&selection.index) {
        push(keys::LENS_INDEX_CODE, index.code.clone());
        push(keys::LENS_INDEX, index.label.clone());
    }

    if !selection.coatings.is_empty() {
        let known: Vec<&crate::lenses::CatalogOption> = selection
            .coatings
            .iter()
            .filter_map(|code| catalog.coating(code))
            .collect();
        if !known.is_empty() {
            push(
                keys::COATINGS_CODE,
                known
                    .iter()
                    .map(|c| c.code.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            push(
                keys::COATINGS,
                known
                    .iter()
                    .map(|c| c.label.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }
    }

    if let Some(sph) = rx.right.sph {
        push(keys::RX_R_SPH, format_diopter(sph));
    }
    if let Some(cyl) = rx.right.cyl {
        push(keys::RX_R_CYL, format_diopter(cyl));
    }
    if let Some(axis) = rx.right.axis {
        push(keys::RX_R_AXIS, axis.to_string());
    }
    if let Some(sph) = rx.left.sph {
        push(keys::RX_L_SPH, format_diopter(sph));
    }
    if let Some(cyl) = rx.left.cyl {
        push(keys::RX_L_CYL, format_diopter(cyl));
    }
    if let Some(axis) = rx.left.axis {
        push(keys::RX_L_AXIS, axis.to_string());
    }

    // Individual PD values are preferred; a combined value is only used
    // when per-eye values were never entered.
    match rx.pd {
        crate::rx::PdMeasurement::Split { left, right } => {
            push(keys::PD_LEFT, left.to_string());
            push(keys::PD_RIGHT, right.to_string());
        }
        crate::rx::PdMeasurement::Combined { total } => {
            push(keys::PD, total.to_string());
        }
        crate::rx::PdMeasurement::None => {}
    }

    if let Some(add) = rx.intermediate_add {
        push(keys::INTERMEDIATE_ADD, format_diopter(add));
    }
    if let Some(add) = rx.near_add {
        push(keys::NEAR_ADD, format_diopter(add));
    }
    if let Some(notes) = rx.notes.as_deref() {
        push(keys::RX_NOTES, notes.to_string());
    }

    push(keys::USAGE_TYPE, usage.to_string());

    attributes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rx::{PdMeasurement, PrescriptionEntry};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).expect("valid decimal literal")
    }

    fn full_prescription() -> Prescription {
        Prescription {
            right: PrescriptionEntry {
                sph: Some(d("-2.50")),
                cyl: Some(d("-0.75")),
                axis: Some(90),
            },
            left: PrescriptionEntry {
                sph: Some(d("-2.25")),
                cyl: None,
                axis: None,
            },
            pd: PdMeasurement::Split {
                left: d("31"),
                right: d("32"),
            },
            intermediate_add: None,
            near_add: Some(d("2.00")),
            notes: Some("no prism".to_string()),
        }
    }

    fn selection() -> LensSelection {
        LensSelection {
            lens_type: "SV".to_string(),
            index: "1.60".to_string(),
            coatings: vec!["AR".to_string()],
        }
    }

    fn value_of<'a>(attributes: &'a [LineAttribute], key: &str) -> Option<&'a str> {
        attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    #[test]
    fn formats_the_full_attribute_set() {
        let catalog = LensCatalog::default();
        let attributes = format_attributes(
            Some("Tortoise"),
            &selection(),
            &full_prescription(),
            UsageType::Reading,
            &catalog,
        );

        assert_eq!(value_of(&attributes, keys::COLOUR), Some("Tortoise"));
        assert_eq!(value_of(&attributes, keys::LENS_TYPE_CODE), Some("SV"));
        assert_eq!(value_of(&attributes, keys::LENS_TYPE), Some("Single Vision"));
        assert_eq!(value_of(&attributes, keys::LENS_INDEX_CODE), Some("1.60"));
        assert_eq!(value_of(&attributes, keys::LENS_INDEX), Some("Thin (1.60)"));
        assert_eq!(value_of(&attributes, keys::COATINGS_CODE), Some("AR"));
        assert_eq!(value_of(&attributes, keys::COATINGS), Some("Anti-Reflective"));
        assert_eq!(value_of(&attributes, keys::RX_R_SPH), Some("-2.50"));
        assert_eq!(value_of(&attributes, keys::RX_R_CYL), Some("-0.75"));
        assert_eq!(value_of(&attributes, keys::RX_R_AXIS), Some("90"));
        assert_eq!(value_of(&attributes, keys::RX_L_SPH), Some("-2.25"));
        assert_eq!(value_of(&attributes, keys::RX_L_CYL), None);
        assert_eq!(value_of(&attributes, keys::RX_L_AXIS), None);
        assert_eq!(value_of(&attributes, keys::PD_LEFT), Some("31"));
        assert_eq!(value_of(&attributes, keys::PD_RIGHT), Some("32"));
        assert_eq!(value_of(&attributes, keys::PD), None);
        assert_eq!(value_of(&attributes, keys::NEAR_ADD), Some("+2.00"));
        assert_eq!(value_of(&attributes, keys::INTERMEDIATE_ADD), None);
        assert_eq!(value_of(&attributes, keys::RX_NOTES), Some("no prism"));
        assert_eq!(value_of(&attributes, keys::USAGE_TYPE), Some("Reading"));
    }

    #[test]
    fn combined_pd_uses_the_single_pd_key() {
        let catalog = LensCatalog::default();
        let mut rx = full_prescription();
        rx.pd = PdMeasurement::Combined { total: d("62") };
        let attributes =
            format_attributes(None, &selection(), &rx, UsageType::Distance, &catalog);

        assert_eq!(value_of(&attributes, keys::PD), Some("62"));
        assert_eq!(value_of(&attributes, keys::PD_LEFT), None);
        assert_eq!(value_of(&attributes, keys::PD_RIGHT), None);
    }

    #[test]
    fn multiple_coatings_join_with_comma() {
        let catalog = LensCatalog::default();
        let selection = LensSelection {
            lens_type: "SV".to_string(),
            index: "1.50".to_string(),
            coatings: vec!["AR".to_string(), "PHOTO".to_string()],
        };
        let attributes = format_attributes(
            None,
            &selection,
            &Prescription::default(),
            UsageType::Distance,
            &catalog,
        );
        assert_eq!(value_of(&attributes, keys::COATINGS_CODE), Some("AR, PHOTO"));
        assert_eq!(
            value_of(&attributes, keys::COATINGS),
            Some("Anti-Reflective, Photochromic (Transitions)")
        );
    }

    #[test]
    fn empty_fields_are_omitted_not_blank() {
        let catalog = LensCatalog::default();
        let attributes = format_attributes(
            None,
            &LensSelection::default(),
            &Prescription::default(),
            UsageType::Distance,
            &catalog,
        );
        assert!(attributes.iter().all(|a| !a.value.is_empty()));
        // Only the usage type survives an empty configuration.
        assert_eq!(attributes.len(), 1);
        assert_eq!(value_of(&attributes, keys::USAGE_TYPE), Some("Distance"));
    }

    #[test]
    fn unknown_catalog_codes_are_skipped() {
        let catalog = LensCatalog::default();
        let selection = LensSelection {
            lens_type: "TRIFOCAL".to_string(),
            index: "9.99".to_string(),
            coatings: vec!["MYSTERY".to_string()],
        };
        let attributes = format_attributes(
            None,
            &selection,
            &Prescription::default(),
            UsageType::Distance,
            &catalog,
        );
        assert_eq!(value_of(&attributes, keys::LENS_TYPE_CODE), None);
        assert_eq!(value_of(&attributes, keys::LENS_INDEX_CODE), None);
        assert_eq!(value_of(&attributes, keys::COATINGS_CODE), None);
    }
}
