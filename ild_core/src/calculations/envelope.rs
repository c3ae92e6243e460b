//! Moving-Load Envelope
//!
//! Worst-case reactions, section responses and global shear/moment maxima as
//! the load pair crosses the span (lead position `a` from `0` to `L`).
//!
//! ## Search
//!
//! Reactions vary linearly in `a` between the instants a load enters or leaves
//! the span, so their maxima come from the closed-form candidates
//! `a ∈ {0, x, L}`.
//!
//! Shear and moment are found by a dense scan of `a` at a fixed step of
//! `L / resolution`, independent of any animation frame rate. The scan is
//! augmented with the analytic critical positions:
//!
//! - the trailing load arriving on the span (`a = x`)
//! - the lone lead load at midspan (`a = L/2`)
//! - the classical positions where midspan bisects the distance between one
//!   load and the resultant of the pair
//! - for each observation section, each load standing on that section
//!
//! For point loads, shear and moment extremes along the beam only occur at the
//! supports and under the loads, so those are the only sections visited per
//! position. Moment maxima are therefore exact.
//!
//! A load standing on a section counts as passed, so a shear peak built up
//! while a load approaches a section from the right is a limit that no
//! position attains. Each position where a load arrives on a section
//! (`a = x` and, per observation section, `a = s` and `a = s + x`) is followed
//! by a shear-only position `L * 1e-9` further on, which brings those peaks
//! within a few parts per billion. Every reported shear is one that
//! [`compute_section_forces`](super::beam_analysis::compute_section_forces)
//! returns at the reported position and section.
//!
//! ## Example
//! ```rust
//! use ild_core::calculations::envelope::{compute_envelope, EnvelopeOptions};
//! use ild_core::calculations::moving_load::MovingLoadInput;
//!
//! // Two 50 kN loads together behave as one 100 kN load: M_max = PL/4
//! let input = MovingLoadInput::new("Coincident", 8.0, 50.0, 50.0, 0.0);
//! let envelope = compute_envelope(&input, &EnvelopeOptions::default()).unwrap();
//! assert!((envelope.max_moment.value - 200.0).abs() < 1e-9);
//! assert!((envelope.max_moment.section_m - 4.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::beam_analysis::{reactions_at, section_forces_at, Reactions};
use super::influence::{superposed, InfluenceQuantity};
use super::moving_load::{MovingLoadInput, PlacedLoad};
use crate::errors::{CalcError, CalcResult};

/// Default number of scan steps across the span
pub const DEFAULT_RESOLUTION: usize = 1000;

/// Smallest accepted resolution (step no coarser than L/100)
pub const MIN_RESOLUTION: usize = 100;

/// Largest accepted resolution
pub const MAX_RESOLUTION: usize = 1_000_000;

/// A section at which the response is tracked while the loads move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SectionLocation {
    /// Support A (x = 0)
    SupportA,
    /// Midspan (x = L/2)
    Midspan,
    /// Support B (x = L)
    SupportB,
    /// Arbitrary section (m from A)
    At { position_m: f64 },
}

impl SectionLocation {
    /// Section coordinate on a span of `span_m`
    pub fn resolve(&self, span_m: f64) -> f64 {
        match self {
            SectionLocation::SupportA => 0.0,
            SectionLocation::Midspan => 0.5 * span_m,
            SectionLocation::SupportB => span_m,
            SectionLocation::At { position_m } => *position_m,
        }
    }

    /// Human readable identifier
    pub fn label(&self) -> String {
        match self {
            SectionLocation::SupportA => "support A".to_string(),
            SectionLocation::Midspan => "midspan".to_string(),
            SectionLocation::SupportB => "support B".to_string(),
            SectionLocation::At { position_m } => format!("x = {:.3} m", position_m),
        }
    }
}

/// Options controlling the envelope search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeOptions {
    /// Number of scan steps across the span (step = L / resolution)
    pub resolution: usize,
    /// Sections tracked individually as the loads move
    pub observation_sections: Vec<SectionLocation>,
}

impl Default for EnvelopeOptions {
    fn default() -> Self {
        EnvelopeOptions {
            resolution: DEFAULT_RESOLUTION,
            observation_sections: vec![SectionLocation::SupportA, SectionLocation::Midspan],
        }
    }
}

impl EnvelopeOptions {
    /// Validate the options against a span
    pub fn validate(&self, span_m: f64) -> CalcResult<()> {
        if !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&self.resolution) {
            return Err(CalcError::invalid_input(
                "resolution",
                self.resolution.to_string(),
                format!(
                    "Resolution must be between {} and {}",
                    MIN_RESOLUTION, MAX_RESOLUTION
                ),
            ));
        }
        for location in &self.observation_sections {
            let section_m = location.resolve(span_m);
            if !section_m.is_finite() || !(0.0..=span_m).contains(&section_m) {
                return Err(CalcError::OutOfRangeSection { section_m, span_m });
            }
        }
        Ok(())
    }
}

/// Largest value of a support reaction and the lead position producing it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactionPeak {
    /// Reaction (kN)
    pub value_kn: f64,
    /// Lead load position (m from A)
    pub lead_position_m: f64,
}

/// Peak of a response at a fixed section and the lead position producing it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionPeak {
    /// Response value (kN or kN·m)
    pub value: f64,
    /// Lead load position (m from A)
    pub lead_position_m: f64,
}

/// Global extreme over all sections and load positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extreme {
    /// Response value (kN or kN·m), signed
    pub value: f64,
    /// Lead load position (m from A)
    pub lead_position_m: f64,
    /// Section where it occurs (m from A)
    pub section_m: f64,
}

impl Default for Extreme {
    fn default() -> Self {
        Extreme {
            value: 0.0,
            lead_position_m: 0.0,
            section_m: 0.0,
        }
    }
}

/// Response history of one observation section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionEnvelope {
    pub location: SectionLocation,
    /// Resolved section coordinate (m from A)
    pub section_m: f64,
    /// Shear with both loads on and W2 at A (a = x)
    pub shear_at_arrival_kn: f64,
    /// Largest positive shear
    pub max_shear: SectionPeak,
    /// Largest negative shear
    pub min_shear: SectionPeak,
    /// Largest sagging moment
    pub max_moment: SectionPeak,
}

/// Complete envelope for a moving load pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeResult {
    /// Label copied from the input
    pub label: String,
    /// Span (m)
    pub span_m: f64,
    /// Scan resolution used
    pub resolution: usize,
    /// Number of lead positions evaluated
    pub positions_scanned: usize,

    /// Reactions with both loads on and W2 at A (a = x)
    pub arrival_reactions: Reactions,
    /// Largest reaction at support A
    pub max_reaction_left: ReactionPeak,
    /// Largest reaction at support B
    pub max_reaction_right: ReactionPeak,

    /// Per-section responses, in the order requested
    pub sections: Vec<SectionEnvelope>,

    /// Shear of largest magnitude (signed)
    pub max_shear: Extreme,
    /// Largest sagging moment
    pub max_moment: Extreme,
}

impl EnvelopeResult {
    /// Look up a section envelope by location
    pub fn section(&self, location: SectionLocation) -> Option<&SectionEnvelope> {
        self.sections.iter().find(|s| s.location == location)
    }
}

/// Compute the envelope of the moving load pair.
///
/// Zero loads produce an all-zero result rather than an error.
pub fn compute_envelope(
    input: &MovingLoadInput,
    options: &EnvelopeOptions,
) -> CalcResult<EnvelopeResult> {
    input.validate()?;
    options.validate(input.span_m)?;

    let span_m = input.span_m;
    let sections: Vec<(SectionLocation, f64)> = options
        .observation_sections
        .iter()
        .map(|location| (*location, location.resolve(span_m)))
        .collect();
    let positions = scan_positions(input, options.resolution, &sections);

    let (max_reaction_left, max_reaction_right) = reaction_peaks(input);

    let mut max_shear = Extreme::default();
    let mut max_moment = Extreme::default();

    for &(a, moment_candidate) in &positions {
        let loads = input.place(a);
        let reactions = reactions_at(span_m, &loads);

        // Supports plus the on-span loads; an off-span load stands in as B
        let [lead, trail] = loads;
        let under = |load: PlacedLoad| if load.on_span { load.position_m } else { span_m };
        let candidates = [0.0, under(trail), under(lead), span_m];

        for &s in &candidates {
            let forces = section_forces_at(span_m, &loads, &reactions, s);
            if forces.shear_kn.abs() > max_shear.value.abs() {
                max_shear = Extreme {
                    value: forces.shear_kn,
                    lead_position_m: a,
                    section_m: s,
                };
            }
            if moment_candidate && forces.moment_knm > max_moment.value {
                max_moment = Extreme {
                    value: forces.moment_knm,
                    lead_position_m: a,
                    section_m: s,
                };
            }
        }
    }

    let sections = sections
        .iter()
        .map(|&(location, section_m)| section_envelope(input, &positions, location, section_m))
        .collect();

    debug!(
        label = %input.label,
        positions = positions.len(),
        max_shear_kn = max_shear.value,
        max_moment_knm = max_moment.value,
        "envelope scan complete"
    );

    Ok(EnvelopeResult {
        label: input.label.clone(),
        span_m,
        resolution: options.resolution,
        positions_scanned: positions.len(),
        arrival_reactions: reactions_at(span_m, &input.place(input.spacing_m)),
        max_reaction_left,
        max_reaction_right,
        sections,
        max_shear,
        max_moment,
    })
}

/// Closed-form reaction maxima: candidates a = 0, x, L
fn reaction_peaks(input: &MovingLoadInput) -> (ReactionPeak, ReactionPeak) {
    let mut left = ReactionPeak {
        value_kn: 0.0,
        lead_position_m: 0.0,
    };
    let mut right = left;

    for a in [0.0, input.spacing_m, input.span_m] {
        let reactions = reactions_at(input.span_m, &input.place(a));
        if reactions.left_kn > left.value_kn {
            left = ReactionPeak {
                value_kn: reactions.left_kn,
                lead_position_m: a,
            };
        }
        if reactions.right_kn > right.value_kn {
            right = ReactionPeak {
                value_kn: reactions.right_kn,
                lead_position_m: a,
            };
        }
    }
    (left, right)
}

/// Offset of the shear-only position after a load arrives on a section,
/// as a fraction of the span
const ARRIVAL_OFFSET: f64 = 1e-9;

/// Regular scan grid plus analytic critical positions, sorted and unique.
///
/// Each entry is `(a, moment_candidate)`; positions just past a load arrival
/// only feed the shear maxima.
fn scan_positions(
    input: &MovingLoadInput,
    resolution: usize,
    sections: &[(SectionLocation, f64)],
) -> Vec<(f64, bool)> {
    let span_m = input.span_m;
    let spacing_m = input.spacing_m;
    let offset_m = input.resultant_offset_m();

    let mut positions: Vec<(f64, bool)> = (0..=resolution)
        .map(|i| (span_m * i as f64 / resolution as f64, true))
        .collect();

    let mut arrivals = vec![spacing_m];
    for &(_, section_m) in sections {
        arrivals.push(section_m);
        arrivals.push(section_m + spacing_m);
    }
    for &a in &arrivals {
        positions.push((a, true));
        positions.push((a + span_m * ARRIVAL_OFFSET, false));
    }

    positions.push((0.5 * span_m, true));
    // Midspan bisects lead load and resultant
    positions.push((0.5 * (span_m + offset_m), true));
    // Midspan bisects trailing load and resultant
    positions.push((0.5 * (span_m + spacing_m + offset_m), true));

    positions.retain(|(a, _)| (0.0..=span_m).contains(a));
    // Moment candidates first so a shared position keeps its moment role
    positions.sort_by(|p, q| p.0.total_cmp(&q.0).then(q.1.cmp(&p.1)));
    positions.dedup_by(|later, kept| later.0 == kept.0);
    positions
}

/// Track one section's shear and moment as the loads move
fn section_envelope(
    input: &MovingLoadInput,
    positions: &[(f64, bool)],
    location: SectionLocation,
    section_m: f64,
) -> SectionEnvelope {
    let shear = InfluenceQuantity::Shear { section_m };
    let moment = InfluenceQuantity::Moment { section_m };

    let first = SectionPeak {
        value: 0.0,
        lead_position_m: 0.0,
    };
    let mut max_shear = first;
    let mut min_shear = first;
    let mut max_moment = first;

    for &(a, moment_candidate) in positions {
        let v = superposed(input, shear, a);
        if v > max_shear.value {
            max_shear = SectionPeak {
                value: v,
                lead_position_m: a,
            };
        }
        if v < min_shear.value {
            min_shear = SectionPeak {
                value: v,
                lead_position_m: a,
            };
        }
        if !moment_candidate {
            continue;
        }
        let m = superposed(input, moment, a);
        if m > max_moment.value {
            max_moment = SectionPeak {
                value: m,
                lead_position_m: a,
            };
        }
    }

    SectionEnvelope {
        location,
        section_m,
        shear_at_arrival_kn: superposed(input, shear, input.spacing_m),
        max_shear,
        min_shear,
        max_moment,
    }
}
