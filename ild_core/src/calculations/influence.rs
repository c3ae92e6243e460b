//! Influence Lines
//!
//! Ordinates of the influence line diagrams of a simply supported span for a
//! moving unit load. The response of any quantity to the two-load system is
//! the superposition `W1 * eta(p1) + W2 * eta(p2)` over the loads on the span.
//!
//! For a unit load at `p` and a section at `s`:
//!
//! | Quantity | `p <= s`          | `p > s`           |
//! |----------|-------------------|-------------------|
//! | RA       | `(L - p) / L`     | `(L - p) / L`     |
//! | RB       | `p / L`           | `p / L`           |
//! | SF(s)    | `-p / L`          | `(L - p) / L`     |
//! | BM(s)    | `p (L - s) / L`   | `s (L - p) / L`   |
//!
//! A unit load standing exactly on the section is counted as passed, the same
//! rule the section force evaluator uses.
//!
//! ## Example
//! ```rust
//! use ild_core::calculations::influence::{InfluenceQuantity, ordinate};
//!
//! // Moment ILD at midspan of a 10 m span peaks at L/4 under the section
//! let eta = ordinate(10.0, InfluenceQuantity::Moment { section_m: 5.0 }, 5.0);
//! assert!((eta - 2.5).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use super::moving_load::MovingLoadInput;
use crate::errors::{CalcError, CalcResult};

/// Response quantity whose influence line is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "quantity")]
pub enum InfluenceQuantity {
    /// Reaction at support A
    ReactionA,
    /// Reaction at support B
    ReactionB,
    /// Shear force at a section (m from A)
    Shear { section_m: f64 },
    /// Bending moment at a section (m from A)
    Moment { section_m: f64 },
}

impl InfluenceQuantity {
    /// Section coordinate, if the quantity refers to one
    pub fn section_m(&self) -> Option<f64> {
        match self {
            InfluenceQuantity::Shear { section_m } | InfluenceQuantity::Moment { section_m } => {
                Some(*section_m)
            }
            _ => None,
        }
    }
}

/// Influence ordinate for a unit load at `unit_position_m`.
///
/// A unit load off the span has a zero ordinate.
pub fn ordinate(span_m: f64, quantity: InfluenceQuantity, unit_position_m: f64) -> f64 {
    let p = unit_position_m;
    if !(0.0..=span_m).contains(&p) {
        return 0.0;
    }
    let l = span_m;

    match quantity {
        InfluenceQuantity::ReactionA => (l - p) / l,
        InfluenceQuantity::ReactionB => p / l,
        InfluenceQuantity::Shear { section_m: s } => {
            if p <= s {
                -p / l
            } else {
                (l - p) / l
            }
        }
        InfluenceQuantity::Moment { section_m: s } => {
            if p <= s {
                p * (l - s) / l
            } else {
                s * (l - p) / l
            }
        }
    }
}

/// Response of `quantity` to the load pair with the lead load at `a`
/// (superposition of both loads' ordinates).
pub(crate) fn superposed(input: &MovingLoadInput, quantity: InfluenceQuantity, lead_position_m: f64) -> f64 {
    input
        .place(lead_position_m)
        .iter()
        .map(|load| load.effective_kn() * ordinate(input.span_m, quantity, load.position_m))
        .sum()
}

/// Response of `quantity` to the load pair with the lead load at `a`.
pub fn response(
    input: &MovingLoadInput,
    quantity: InfluenceQuantity,
    lead_position_m: f64,
) -> CalcResult<f64> {
    input.validate()?;
    input.check_lead_position(lead_position_m)?;
    check_quantity(input, quantity)?;
    Ok(superposed(input, quantity, lead_position_m))
}

/// Sample an influence line as (unit load position m, ordinate) pairs.
///
/// For shear lines the section itself is sampled twice, once either side of
/// the unit jump.
pub fn influence_line(
    span_m: f64,
    quantity: InfluenceQuantity,
    samples: usize,
) -> CalcResult<Vec<(f64, f64)>> {
    if !span_m.is_finite() || span_m <= 0.0 {
        return Err(CalcError::InvalidGeometry { span_m });
    }
    if samples < 2 {
        return Err(CalcError::invalid_input(
            "samples",
            samples.to_string(),
            "At least two sample points are required",
        ));
    }
    if let Some(section_m) = quantity.section_m() {
        if !(0.0..=span_m).contains(&section_m) {
            return Err(CalcError::OutOfRangeSection { section_m, span_m });
        }
    }

    let mut positions: Vec<f64> = (0..samples)
        .map(|i| span_m * i as f64 / (samples - 1) as f64)
        .collect();
    if let Some(section_m) = quantity.section_m() {
        positions.push(section_m);
    }
    positions.sort_by(f64::total_cmp);
    positions.dedup();

    let mut line = Vec::with_capacity(positions.len() + 1);
    for p in positions {
        if let InfluenceQuantity::Shear { section_m } = quantity {
            if p == section_m && p < span_m {
                // Left limit: unit load not yet on the section
                line.push((p, (span_m - p) / span_m));
            }
        }
        line.push((p, ordinate(span_m, quantity, p)));
    }
    Ok(line)
}

fn check_quantity(input: &MovingLoadInput, quantity: InfluenceQuantity) -> CalcResult<()> {
    match quantity.section_m() {
        Some(section_m) => input.check_section(section_m),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::beam_analysis::{compute_reactions, compute_section_forces};

    const TOL: f64 = 1e-9;

    #[test]
    fn test_reaction_ordinates_sum_to_one() {
        for i in 0..=10 {
            let p = i as f64;
            let sum = ordinate(10.0, InfluenceQuantity::ReactionA, p)
                + ordinate(10.0, InfluenceQuantity::ReactionB, p);
            assert!((sum - 1.0).abs() < TOL);
        }
    }

    #[test]
    fn test_off_span_ordinate_is_zero() {
        assert_eq!(ordinate(10.0, InfluenceQuantity::ReactionA, -1.0), 0.0);
        assert_eq!(
            ordinate(10.0, InfluenceQuantity::Moment { section_m: 5.0 }, 10.5),
            0.0
        );
    }

    #[test]
    fn test_shear_line_jumps_by_unity() {
        let line = influence_line(10.0, InfluenceQuantity::Shear { section_m: 4.0 }, 11).unwrap();
        let at_section: Vec<f64> = line
            .iter()
            .filter(|(p, _)| *p == 4.0)
            .map(|(_, eta)| *eta)
            .collect();
        assert_eq!(at_section.len(), 2);
        assert!((at_section[0] - 0.6).abs() < TOL);
        assert!((at_section[1] + 0.4).abs() < TOL);
    }

    #[test]
    fn test_superposition_matches_direct_evaluation() {
        let input = MovingLoadInput::new("G-1", 10.0, 40.0, 60.0, 2.0);
        for &a in &[0.0, 1.0, 2.0, 3.7, 6.0, 10.0] {
            let r = compute_reactions(&input, a).unwrap();
            let ra = response(&input, InfluenceQuantity::ReactionA, a).unwrap();
            let rb = response(&input, InfluenceQuantity::ReactionB, a).unwrap();
            assert!((ra - r.left_kn).abs() < TOL);
            assert!((rb - r.right_kn).abs() < TOL);

            for &s in &[0.0, 2.5, 4.0, 5.0, 9.0, 10.0] {
                let direct = compute_section_forces(&input, a, s).unwrap();
                let v = response(&input, InfluenceQuantity::Shear { section_m: s }, a).unwrap();
                let m = response(&input, InfluenceQuantity::Moment { section_m: s }, a).unwrap();
                assert!((v - direct.shear_kn).abs() < 1e-6, "shear a={} s={}", a, s);
                assert!((m - direct.moment_knm).abs() < 1e-6, "moment a={} s={}", a, s);
            }
        }
    }

    #[test]
    fn test_invalid_requests() {
        assert!(influence_line(0.0, InfluenceQuantity::ReactionA, 10).is_err());
        assert!(influence_line(10.0, InfluenceQuantity::ReactionA, 1).is_err());
        assert!(matches!(
            influence_line(10.0, InfluenceQuantity::Moment { section_m: 12.0 }, 10),
            Err(CalcError::OutOfRangeSection { .. })
        ));
        let input = MovingLoadInput::default();
        assert!(response(&input, InfluenceQuantity::Shear { section_m: -1.0 }, 2.0).is_err());
    }
}
