//! Principal-meridian arithmetic.
//!
//! All values are decimal diopters on the 0.25 grid; `Decimal` keeps the
//! sums exact (`-2.50 + 2.00` is `-0.50`, never `-0.4999…`).

use rust_decimal::Decimal;

use crate::rx::UsageType;

/// The two principal optical powers of an eye and whichever of them has the
/// greater magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meridians {
    pub m1: Decimal,
    pub m2: Decimal,
    pub highest: Decimal,
}

/// Effective spherical power for the selected usage type.
///
/// Distance uses the sphere unchanged; Intermediate and Reading fold the
/// corresponding add power in. A missing add counts as zero.
#[must_use]
pub fn effective_sph(
    sph: Decimal,
    usage: UsageType,
    intermediate_add: Option<Decimal>,
    near_add: Option<Decimal>,
) -> Decimal {
    match usage {
        UsageType::Distance => sph,
        UsageType::Intermediate => sph + intermediate_add.unwrap_or(Decimal::ZERO),
        UsageType::Reading => sph + near_add.unwrap_or(Decimal::ZERO),
    }
}

/// Derives the two principal meridians from sphere and cylinder.
///
/// `m1` is the effective sphere, `m2` adds the cylinder. `highest` is the
/// meridian with the greater absolute value; m1 wins ties because it is
/// checked first with a non-strict comparison.
#[must_use]
pub fn meridians(
    sph: Decimal,
    cyl: Option<Decimal>,
    usage: UsageType,
    intermediate_add: Option<Decimal>,
    near_add: Option<Decimal>,
) -> Meridians {
    let sph_used = effective_sph(sph, usage, intermediate_add, near_add);
    let m1 = sph_used;
    let m2 = sph_used + cyl.unwrap_or(Decimal::ZERO);
    let highest = if m1.abs() >= m2.abs() { m1 } else { m2 };
    Meridians { m1, m2, highest }
}
