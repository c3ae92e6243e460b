//! Simply-Supported Beam Under a Moving Load Pair
//!
//! Equilibrium solver and section force evaluator for one instant of the
//! moving load system, plus the sampled diagrams handed to a renderer once per
//! animation frame.
//!
//! ## Sign Convention
//! - Positive reaction: upward
//! - Positive moment: tension on bottom fiber (sagging)
//! - Positive shear: left side up, right side down (left free body)
//! - A load standing exactly at the section counts as already passed, so
//!   the shear at a load's own position is the value just to its right
//!
//! ## Example
//! ```rust
//! use ild_core::calculations::beam_analysis::{compute_reactions, compute_section_forces};
//! use ild_core::calculations::moving_load::MovingLoadInput;
//!
//! // 40 kN leading 60 kN by 2 m on a 10 m span, lead load at 4 m
//! let input = MovingLoadInput::new("G-1", 10.0, 40.0, 60.0, 2.0);
//!
//! let reactions = compute_reactions(&input, 4.0).unwrap();
//! assert!((reactions.left_kn - 72.0).abs() < 1e-9);
//! assert!((reactions.right_kn - 28.0).abs() < 1e-9);
//!
//! let forces = compute_section_forces(&input, 4.0, 4.0).unwrap();
//! assert!((forces.moment_knm - 168.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use super::moving_load::{MovingLoadInput, PlacedLoad};
use crate::errors::CalcResult;

/// Minimum number of regular samples in a diagram
pub const MIN_DIAGRAM_SAMPLES: usize = 11;

/// Support reactions for one load position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    /// Reaction at support A (kN) - positive upward
    pub left_kn: f64,
    /// Reaction at support B (kN) - positive upward
    pub right_kn: f64,
}

impl Reactions {
    /// Sum of both reactions (kN)
    pub fn total_kn(&self) -> f64 {
        self.left_kn + self.right_kn
    }
}

/// Internal forces at one section for one load position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionForces {
    /// Shear force (kN)
    pub shear_kn: f64,
    /// Bending moment (kN·m)
    pub moment_knm: f64,
}

/// Compute support reactions with the lead load at `lead_position_m`.
///
/// Moments about B give RA; vertical equilibrium gives RB. Loads off the span
/// contribute nothing.
pub fn compute_reactions(input: &MovingLoadInput, lead_position_m: f64) -> CalcResult<Reactions> {
    input.validate()?;
    input.check_lead_position(lead_position_m)?;
    Ok(reactions_at(input.span_m, &input.place(lead_position_m)))
}

/// Compute shear force and bending moment at `section_m` with the lead load
/// at `lead_position_m`.
pub fn compute_section_forces(
    input: &MovingLoadInput,
    lead_position_m: f64,
    section_m: f64,
) -> CalcResult<SectionForces> {
    input.validate()?;
    input.check_lead_position(lead_position_m)?;
    input.check_section(section_m)?;

    let loads = input.place(lead_position_m);
    let reactions = reactions_at(input.span_m, &loads);
    Ok(section_forces_at(input.span_m, &loads, &reactions, section_m))
}

/// Reactions for already-placed loads (inputs assumed valid)
pub(crate) fn reactions_at(span_m: f64, loads: &[PlacedLoad]) -> Reactions {
    let on_span = || loads.iter().filter(|load| load.on_span);

    // Sum of moments about B: RA * L = sum(W * (L - p))
    let moment_about_b: f64 = on_span()
        .map(|load| load.magnitude_kn * (span_m - load.position_m))
        .sum();
    let total_kn: f64 = on_span().map(|load| load.magnitude_kn).sum();

    let left_kn = moment_about_b / span_m;
    Reactions {
        left_kn,
        right_kn: total_kn - left_kn,
    }
}

/// Section forces for already-placed loads (inputs assumed valid)
pub(crate) fn section_forces_at(
    span_m: f64,
    loads: &[PlacedLoad],
    reactions: &Reactions,
    section_m: f64,
) -> SectionForces {
    let passed = || {
        loads
            .iter()
            .filter(move |load| load.on_span && load.position_m <= section_m)
    };

    let shear_kn = reactions.left_kn - passed().map(|load| load.magnitude_kn).sum::<f64>();

    // Supports carry no moment; returned exactly rather than as round-off
    let moment_knm = if section_m <= 0.0 || section_m >= span_m {
        0.0
    } else {
        reactions.left_kn * section_m
            - passed()
                .map(|load| load.magnitude_kn * (section_m - load.position_m))
                .sum::<f64>()
    };

    SectionForces {
        shear_kn,
        moment_knm,
    }
}

/// Shear and moment curves for one animation frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramFrame {
    /// Lead load position `a` (m from A)
    pub lead_position_m: f64,
    /// Trailing load position `a - x` (m from A, may be off the span)
    pub trail_position_m: f64,
    /// Both loads as placed for this frame
    pub loads: [PlacedLoad; 2],
    /// Support reactions for this frame
    pub reactions: Reactions,
    /// Sampled (section m, shear kN) pairs
    pub shear_diagram: Vec<(f64, f64)>,
    /// Sampled (section m, moment kN·m) pairs
    pub moment_diagram: Vec<(f64, f64)>,
}

impl DiagramFrame {
    /// Short caption for the frame, e.g. "p1 = 4.00 m, p2 = 2.00 m"
    pub fn caption(&self) -> String {
        format!(
            "p1 = {:.2} m, p2 = {:.2} m",
            self.lead_position_m, self.trail_position_m
        )
    }

    /// Largest sagging moment among the samples, with its section
    pub fn peak_moment(&self) -> (f64, f64) {
        self.moment_diagram
            .iter()
            .fold((0.0, 0.0), |best, &(x, m)| if m > best.1 { (x, m) } else { best })
    }
}

/// Sample the shear and moment diagrams for one lead position.
///
/// `samples` regular points are taken across `[0, L]` (at least
/// [`MIN_DIAGRAM_SAMPLES`]); each on-span load adds a point just left of it and
/// one exactly at it so the shear jump plots as a vertical step.
pub fn sample_frame(
    input: &MovingLoadInput,
    lead_position_m: f64,
    samples: usize,
) -> CalcResult<DiagramFrame> {
    input.validate()?;
    input.check_lead_position(lead_position_m)?;
    Ok(frame_at(input, lead_position_m, samples))
}

/// Frame for a validated input and lead position
pub(crate) fn frame_at(input: &MovingLoadInput, lead_position_m: f64, samples: usize) -> DiagramFrame {
    let span_m = input.span_m;
    let loads = input.place(lead_position_m);
    let reactions = reactions_at(span_m, &loads);

    let positions = sample_positions(span_m, &loads, samples);
    let mut shear_diagram = Vec::with_capacity(positions.len());
    let mut moment_diagram = Vec::with_capacity(positions.len());
    for &x in &positions {
        let forces = section_forces_at(span_m, &loads, &reactions, x);
        shear_diagram.push((x, forces.shear_kn));
        moment_diagram.push((x, forces.moment_knm));
    }

    DiagramFrame {
        lead_position_m,
        trail_position_m: loads[1].position_m,
        loads,
        reactions,
        shear_diagram,
        moment_diagram,
    }
}

/// Regular sample positions plus the critical points around each load
fn sample_positions(span_m: f64, loads: &[PlacedLoad], samples: usize) -> Vec<f64> {
    let samples = samples.max(MIN_DIAGRAM_SAMPLES);
    let mut positions: Vec<f64> = (0..samples)
        .map(|i| span_m * i as f64 / (samples - 1) as f64)
        .collect();

    let epsilon = span_m * 1e-6;
    for load in loads.iter().filter(|load| load.on_span) {
        if load.position_m - epsilon > 0.0 {
            positions.push(load.position_m - epsilon);
        }
        positions.push(load.position_m);
    }

    positions.sort_by(f64::total_cmp);
    positions.dedup();
    positions
}
