//! Prescription validation.
//!
//! Pure and deterministic: every rule violation is reported through the
//! [`ValidationReport`] error list, never as an `Err`. The caller decides
//! how to surface the messages and blocks checkout while `valid` is false.

use rust_decimal::Decimal;

use crate::meridian::meridians;
use crate::rx::{Eye, Prescription, PrescriptionEntry, UsageType, AXIS_RANGE};

/// Manufacturing limit on either principal meridian, in diopters.
#[must_use]
pub fn max_meridian() -> Decimal {
    Decimal::new(500, 2)
}

/// Generic explanation shown alongside the specific errors when a
/// prescription is rejected.
pub const LIMIT_EXPLANATION: &str = "This prescription exceeds our manufacturing limits when \
     configured for the selected use. Please adjust the prescription type or contact us for \
     assistance.";

/// Outcome of validating a complete prescription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validates both eyes independently plus the cross-eye cylinder-sign rule.
///
/// Errors from the right eye, the left eye and the cross-eye check are all
/// collected so the caller can display every violation at once.
#[must_use]
pub fn validate_prescription(rx: &Prescription, usage: UsageType) -> ValidationReport {
    let mut errors = Vec::new();

    if let Some(error) = validate_eye(&rx.right, usage, rx, Eye::Right) {
        errors.push(error);
    }
    if let Some(error) = validate_eye(&rx.left, usage, rx, Eye::Left) {
        errors.push(error);
    }

    // Both cylinders, when present and non-zero, must share a sign.
    let right_cyl = rx.right.cyl.unwrap_or(Decimal::ZERO);
    let left_cyl = rx.left.cyl.unwrap_or(Decimal::ZERO);
    if !right_cyl.is_zero()
        && !left_cyl.is_zero()
        && (right_cyl > Decimal::ZERO) != (left_cyl > Decimal::ZERO)
    {
        errors.push(
            "Both eyes must have the same CYL sign (both positive or both negative).".to_string(),
        );
    }

    ValidationReport::from_errors(errors)
}

/// Validates a single eye, returning the first violated rule.
fn validate_eye(
    entry: &PrescriptionEntry,
    usage: UsageType,
    rx: &Prescription,
    eye: Eye,
) -> Option<String> {
    let Some(sph) = entry.sph else {
        return Some(format!("{eye}: SPH is required"));
    };

    if entry.has_cyl() {
        match entry.axis {
            None => return Some(format!("{eye}: AXIS is required when CYL is not zero")),
            Some(axis) if !AXIS_RANGE.contains(&axis) => {
                return Some(format!("{eye}: AXIS must be between 1 and 180"));
            }
            Some(_) => {}
        }
    }

    let m = meridians(sph, entry.cyl, usage, rx.intermediate_add, rx.near_add);
    if m.highest.abs() > max_meridian() {
        return Some(format!(
            "{eye}: This prescription exceeds our manufacturing limits (maximum ±5.00 in \
             any meridian). The highest meridian is {:.2}.",
            m.highest
        ));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).expect("valid decimal literal")
    }

    fn entry(sph: &str, cyl: Option<&str>, axis: Option<u16>) -> PrescriptionEntry {
        PrescriptionEntry {
            sph: Some(d(sph)),
            cyl: cyl.map(d),
            axis,
        }
    }

    fn rx(right: PrescriptionEntry, left: PrescriptionEntry) -> Prescription {
        Prescription {
            right,
            left,
            ..Prescription::default()
        }
    }

    #[test]
    fn valid_prescription_produces_no_errors() {
        let report = validate_prescription(
            &rx(
                entry("-2.50", Some("-0.75"), Some(90)),
                entry("-2.25", None, None),
            ),
            UsageType::Distance,
        );
        assert!(report.valid, "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn missing_sph_is_reported_per_eye() {
        let report = validate_prescription(
            &rx(PrescriptionEntry::default(), PrescriptionEntry::default()),
            UsageType::Distance,
        );
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec![
                "Right Eye: SPH is required".to_string(),
                "Left Eye: SPH is required".to_string(),
            ]
        );
    }

    #[test]
    fn cyl_without_axis_is_rejected() {
        let report = validate_prescription(
            &rx(
                entry("-1.00", Some("-0.50"), None),
                entry("-1.00", None, None),
            ),
            UsageType::Distance,
        );
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec!["Right Eye: AXIS is required when CYL is not zero".to_string()]
        );
    }

    #[test]
    fn axis_out_of_range_is_rejected() {
        let report = validate_prescription(
            &rx(
                entry("-1.00", Some("-0.50"), Some(181)),
                entry("-1.00", None, None),
            ),
            UsageType::Distance,
        );
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec!["Right Eye: AXIS must be between 1 and 180".to_string()]
        );
    }

    #[test]
    fn zero_cyl_does_not_require_axis() {
        let report = validate_prescription(
            &rx(
                entry("-1.00", Some("0.00"), None),
                entry("-1.00", None, None),
            ),
            UsageType::Distance,
        );
        assert!(report.valid, "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn sph_beyond_limit_names_the_value() {
        let report = validate_prescription(
            &rx(
                entry("-6.00", Some("0.00"), None),
                entry("-1.00", None, None),
            ),
            UsageType::Distance,
        );
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        let error = &report.errors[0];
        assert!(
            error.contains("exceeds our manufacturing limits"),
            "error should mention the limit: {error}"
        );
        assert!(
            error.contains("-6.00"),
            "error should state the computed meridian: {error}"
        );
        assert!(error.starts_with("Right Eye:"), "error should be eye-labeled: {error}");
    }

    #[test]
    fn cyl_can_push_a_meridian_past_the_limit() {
        // m1 = -4.50, m2 = -5.25: only the second meridian exceeds 5.00.
        let report = validate_prescription(
            &rx(
                entry("-4.50", Some("-0.75"), Some(10)),
                entry("-1.00", None, None),
            ),
            UsageType::Distance,
        );
        assert!(!report.valid);
        assert!(report.errors[0].contains("-5.25"), "got: {:?}", report.errors);
    }

    #[test]
    fn reading_add_changes_the_effective_limit_check() {
        // -6.00 sphere is out of range for Distance but +2.00 near add
        // brings the reading power back to -4.00.
        let prescription = Prescription {
            right: entry("-6.00", None, None),
            left: entry("-4.00", None, None),
            near_add: Some(d("2.00")),
            ..Prescription::default()
        };
        let report = validate_prescription(&prescription, UsageType::Reading);
        assert!(report.valid, "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn opposite_cyl_signs_produce_single_combined_error() {
        let report = validate_prescription(
            &rx(
                entry("-1.00", Some("0.50"), Some(45)),
                entry("-1.00", Some("-0.50"), Some(45)),
            ),
            UsageType::Distance,
        );
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec![
                "Both eyes must have the same CYL sign (both positive or both negative)."
                    .to_string()
            ]
        );
    }

    #[test]
    fn sign_mismatch_reported_alongside_per_eye_errors() {
        // Right eye also exceeds the meridian limit; both errors surface.
        let report = validate_prescription(
            &rx(
                entry("-5.00", Some("-0.50"), Some(45)),
                entry("-1.00", Some("0.50"), Some(45)),
            ),
            UsageType::Distance,
        );
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1 + 1, "got: {:?}", report.errors);
        assert!(report.errors[0].starts_with("Right Eye:"));
        assert!(report.errors[1].contains("same CYL sign"));
    }

    #[test]
    fn matching_cyl_signs_pass_the_cross_eye_rule() {
        let report = validate_prescription(
            &rx(
                entry("-1.00", Some("-0.50"), Some(45)),
                entry("-1.00", Some("-0.75"), Some(120)),
            ),
            UsageType::Distance,
        );
        assert!(report.valid, "unexpected errors: {:?}", report.errors);
    }
}
