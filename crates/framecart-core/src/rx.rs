//! Prescription domain types: per-eye entries, PD measurements, usage types
//! and the selectable value grids for each field.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which eye a prescription entry belongs to. Display form matches the
/// labels used in validation messages and order paperwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Eye {
    Right,
    Left,
}

impl fmt::Display for Eye {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eye::Right => write!(f, "Right Eye"),
            Eye::Left => write!(f, "Left Eye"),
        }
    }
}

/// What the glasses are configured for. Intermediate and Reading fold the
/// corresponding add power into the effective spherical power.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsageType {
    #[default]
    Distance,
    Intermediate,
    Reading,
}

impl fmt::Display for UsageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageType::Distance => write!(f, "Distance"),
            UsageType::Intermediate => write!(f, "Intermediate"),
            UsageType::Reading => write!(f, "Reading"),
        }
    }
}

impl FromStr for UsageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Distance" => Ok(UsageType::Distance),
            "Intermediate" => Ok(UsageType::Intermediate),
            "Reading" => Ok(UsageType::Reading),
            other => Err(format!("unknown usage type: {other}")),
        }
    }
}

/// One eye's refraction values. `cyl` of `None` means "not required";
/// `axis` is only meaningful while `cyl` is present and non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionEntry {
    pub sph: Option<Decimal>,
    pub cyl: Option<Decimal>,
    pub axis: Option<u16>,
}

impl PrescriptionEntry {
    /// Returns `true` when a non-zero cylinder is present, which is the
    /// condition under which an axis is required.
    #[must_use]
    pub fn has_cyl(&self) -> bool {
        matches!(self.cyl, Some(c) if !c.is_zero())
    }

    /// Clears the axis whenever the cylinder is absent or zero, restoring
    /// the entry invariant after partial edits.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if !self.has_cyl() {
            self.axis = None;
        }
        self
    }
}

/// Pupillary distance in millimetres. A combined measurement splits evenly
/// across the eyes when per-eye values are needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PdMeasurement {
    #[default]
    None,
    Combined { total: Decimal },
    Split { left: Decimal, right: Decimal },
}

impl PdMeasurement {
    /// `true` when at least one complete measurement is available, the
    /// precondition for submitting an order.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !matches!(self, PdMeasurement::None)
    }

    /// Per-eye `(left, right)` values; a combined total splits in half.
    #[must_use]
    pub fn per_eye(&self) -> Option<(Decimal, Decimal)> {
        match *self {
            PdMeasurement::None => None,
            PdMeasurement::Combined { total } => {
                let half = total / Decimal::TWO;
                Some((half, half))
            }
            PdMeasurement::Split { left, right } => Some((left, right)),
        }
    }

    /// Near-vision PD adjustment: the eyes converge for closer tasks, so
    /// Intermediate subtracts 1.0 mm per eye and Reading 1.5 mm. Distance
    /// returns the measurement unchanged.
    #[must_use]
    pub fn adjusted_for(&self, usage: UsageType) -> PdMeasurement {
        let offset = match usage {
            UsageType::Distance => return *self,
            UsageType::Intermediate => Decimal::ONE,
            UsageType::Reading => Decimal::new(15, 1),
        };
        match self.per_eye() {
            Some((left, right)) => PdMeasurement::Split {
                left: left - offset,
                right: right - offset,
            },
            None => PdMeasurement::None,
        }
    }
}

/// A complete prescription as entered in the configurator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub right: PrescriptionEntry,
    pub left: PrescriptionEntry,
    #[serde(default)]
    pub pd: PdMeasurement,
    pub intermediate_add: Option<Decimal>,
    pub near_add: Option<Decimal>,
    pub notes: Option<String>,
}

/// Resolves a requested usage type against the prescription's add powers.
///
/// Intermediate requires a non-empty intermediate add and Reading a
/// non-empty near add; a request that fails the requirement reverts to
/// `Distance` and returns the user-facing message. Resolving an already
/// resolved value is a no-op, so the operation is idempotent.
#[must_use]
pub fn resolve_usage_type(
    requested: UsageType,
    rx: &Prescription,
) -> (UsageType, Option<String>) {
    match requested {
        UsageType::Intermediate if rx.intermediate_add.is_none() => (
            UsageType::Distance,
            Some("Intermediate Add is required to select Intermediate usage type.".to_string()),
        ),
        UsageType::Reading if rx.near_add.is_none() => (
            UsageType::Distance,
            Some("Near Add is required to select Reading usage type.".to_string()),
        ),
        other => (other, None),
    }
}

/// Formats a diopter value the way the picklists and cart attributes show
/// it: explicit sign for positive powers, two decimal places, `"0.00"` for
/// plano.
#[must_use]
pub fn format_diopter(value: Decimal) -> String {
    if value > Decimal::ZERO {
        format!("+{value:.2}")
    } else {
        format!("{value:.2}")
    }
}

/// Parses a picklist diopter string (`"+2.00"`, `"-0.50"`, `"0.00"`).
/// Empty input is "not required".
#[must_use]
pub fn parse_diopter(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

const QUARTER: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// SPH picklist: +5.00 down to +0.25, then 0.00 (plano), then −0.25 down
/// to −5.00, all on the 0.25 grid.
#[must_use]
pub fn sph_options() -> Vec<Decimal> {
    let limit = Decimal::new(500, 2);
    let mut options = Vec::new();
    let mut value = limit;
    while value >= QUARTER {
        options.push(value);
        value -= QUARTER;
    }
    options.push(Decimal::ZERO);
    let mut value = -QUARTER;
    while value >= -limit {
        options.push(value);
        value -= QUARTER;
    }
    options
}

/// CYL picklist: +2.00 down to +0.25 and −0.25 down to −2.00. "Not
/// required" is the absence of a value, so zero is not listed.
#[must_use]
pub fn cyl_options() -> Vec<Decimal> {
    let limit = Decimal::new(200, 2);
    let mut options = Vec::new();
    let mut value = limit;
    while value >= QUARTER {
        options.push(value);
        value -= QUARTER;
    }
    let mut value = -QUARTER;
    while value >= -limit {
        options.push(value);
        value -= QUARTER;
    }
    options
}

/// Add-power picklist: +0.25 up to +3.00.
#[must_use]
pub fn add_options() -> Vec<Decimal> {
    let limit = Decimal::new(300, 2);
    let mut options = Vec::new();
    let mut value = QUARTER;
    while value <= limit {
        options.push(value);
        value += QUARTER;
    }
    options
}

/// Valid axis range in degrees.
pub const AXIS_RANGE: std::ops::RangeInclusive<u16> = 1..=180;
