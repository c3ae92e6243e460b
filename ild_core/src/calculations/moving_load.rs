//! Two-Load Moving System
//!
//! Input definition for a simply supported span crossed by a pair of point
//! loads at fixed spacing, and the placement of those loads for a given lead
//! position.
//!
//! ## Direction Convention
//! - Support A is at `0`, support B at `span_m`
//! - The lead load W1 stands at `a` (measured from A)
//! - The trailing load W2 stands at `a - spacing_m`
//! - A load outside `[0, span_m]` is off the span and carries nothing
//!
//! ## Example
//! ```rust
//! use ild_core::calculations::moving_load::MovingLoadInput;
//!
//! let input = MovingLoadInput::new("Crane", 10.0, 40.0, 60.0, 2.0);
//! input.validate().unwrap();
//!
//! let [lead, trail] = input.place(4.0);
//! assert_eq!(lead.position_m, 4.0);
//! assert_eq!(trail.position_m, 2.0);
//! assert!(trail.on_span);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Which of the two loads a [`PlacedLoad`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadRole {
    /// W1, positioned at the lead position `a`
    Lead,
    /// W2, positioned `spacing_m` behind the lead load
    Trail,
}

/// A load of the moving system at a particular instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedLoad {
    pub role: LoadRole,
    /// Load magnitude (kN)
    pub magnitude_kn: f64,
    /// Position (m from support A); may be negative or beyond B
    pub position_m: f64,
    /// True when the load is on the beam (supports inclusive)
    pub on_span: bool,
}

impl PlacedLoad {
    /// Magnitude actually carried by the beam (zero when off the span)
    pub fn effective_kn(&self) -> f64 {
        if self.on_span {
            self.magnitude_kn
        } else {
            0.0
        }
    }
}

/// Input for a moving two-load analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingLoadInput {
    /// User label (e.g., "Crane girder G-1")
    pub label: String,
    /// Span between supports A and B (m)
    pub span_m: f64,
    /// Lead load W1 (kN)
    pub lead_load_kn: f64,
    /// Trailing load W2 (kN)
    pub trail_load_kn: f64,
    /// Distance from W1 back to W2 (m)
    pub spacing_m: f64,
}

impl Default for MovingLoadInput {
    fn default() -> Self {
        MovingLoadInput {
            label: "Moving load".to_string(),
            span_m: 10.0,
            lead_load_kn: 20.0,
            trail_load_kn: 30.0,
            spacing_m: 4.0,
        }
    }
}

impl MovingLoadInput {
    /// Create a new input
    pub fn new(
        label: impl Into<String>,
        span_m: f64,
        lead_load_kn: f64,
        trail_load_kn: f64,
        spacing_m: f64,
    ) -> Self {
        MovingLoadInput {
            label: label.into(),
            span_m,
            lead_load_kn,
            trail_load_kn,
            spacing_m,
        }
    }

    /// Validate the geometry and load magnitudes.
    ///
    /// This is the single validation point; every evaluator calls it once at
    /// its boundary and the internal math assumes it passed.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.span_m.is_finite() || self.span_m <= 0.0 {
            return Err(CalcError::InvalidGeometry {
                span_m: self.span_m,
            });
        }
        if !self.spacing_m.is_finite() || self.spacing_m < 0.0 || self.spacing_m > self.span_m {
            return Err(CalcError::InvalidSpacing {
                spacing_m: self.spacing_m,
                span_m: self.span_m,
            });
        }
        for (field, value) in [
            ("lead_load_kn", self.lead_load_kn),
            ("trail_load_kn", self.trail_load_kn),
        ] {
            if !value.is_finite() {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Load must be a finite number",
                ));
            }
            if value < 0.0 {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Load must be non-negative (downward)",
                ));
            }
        }
        Ok(())
    }

    /// Check that a lead position lies on the span
    pub fn check_lead_position(&self, lead_position_m: f64) -> CalcResult<()> {
        if !lead_position_m.is_finite() || lead_position_m < 0.0 || lead_position_m > self.span_m {
            return Err(CalcError::OutOfRangeLoadPosition {
                position_m: lead_position_m,
                span_m: self.span_m,
            });
        }
        Ok(())
    }

    /// Check that a section coordinate lies on the span
    pub fn check_section(&self, section_m: f64) -> CalcResult<()> {
        if !section_m.is_finite() || section_m < 0.0 || section_m > self.span_m {
            return Err(CalcError::OutOfRangeSection {
                section_m,
                span_m: self.span_m,
            });
        }
        Ok(())
    }

    /// Total of both load magnitudes (kN)
    pub fn total_load_kn(&self) -> f64 {
        self.lead_load_kn + self.trail_load_kn
    }

    /// Distance from the lead load back to the resultant of the pair (m).
    ///
    /// Zero when the pair carries no load.
    pub fn resultant_offset_m(&self) -> f64 {
        let total = self.total_load_kn();
        if total > 0.0 {
            self.trail_load_kn * self.spacing_m / total
        } else {
            0.0
        }
    }

    /// Place both loads for a lead position `a`.
    ///
    /// Never fails: positions off the span are reported with `on_span = false`.
    pub fn place(&self, lead_position_m: f64) -> [PlacedLoad; 2] {
        let trail_position_m = lead_position_m - self.spacing_m;
        [
            PlacedLoad {
                role: LoadRole::Lead,
                magnitude_kn: self.lead_load_kn,
                position_m: lead_position_m,
                on_span: self.is_on_span(lead_position_m),
            },
            PlacedLoad {
                role: LoadRole::Trail,
                magnitude_kn: self.trail_load_kn,
                position_m: trail_position_m,
                on_span: self.is_on_span(trail_position_m),
            },
        ]
    }

    /// Sum of the loads currently on the span for lead position `a` (kN)
    pub fn on_span_load_kn(&self, lead_position_m: f64) -> f64 {
        self.place(lead_position_m)
            .iter()
            .map(PlacedLoad::effective_kn)
            .sum()
    }

    fn is_on_span(&self, position_m: f64) -> bool {
        (0.0..=self.span_m).contains(&position_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(MovingLoadInput::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_span() {
        for span in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let input = MovingLoadInput::new("B", span, 10.0, 10.0, 0.0);
            let err = input.validate().unwrap_err();
            assert_eq!(err.error_code(), "INVALID_GEOMETRY");
        }
    }

    #[test]
    fn test_validate_rejects_bad_spacing() {
        let input = MovingLoadInput::new("B", 10.0, 10.0, 10.0, 10.5);
        assert!(matches!(
            input.validate(),
            Err(CalcError::InvalidSpacing { .. })
        ));

        let input = MovingLoadInput::new("B", 10.0, 10.0, 10.0, -0.1);
        assert!(matches!(
            input.validate(),
            Err(CalcError::InvalidSpacing { .. })
        ));

        // Spacing equal to the span is allowed
        let input = MovingLoadInput::new("B", 10.0, 10.0, 10.0, 10.0);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_load() {
        let input = MovingLoadInput::new("B", 10.0, 10.0, -5.0, 2.0);
        match input.validate() {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "trail_load_kn"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_place_trailing_load_behind_lead() {
        let input = MovingLoadInput::new("B", 10.0, 40.0, 60.0, 2.0);
        let [lead, trail] = input.place(1.0);
        assert_eq!(lead.role, LoadRole::Lead);
        assert!(lead.on_span);
        assert_eq!(trail.position_m, -1.0);
        assert!(!trail.on_span);
        assert_eq!(trail.effective_kn(), 0.0);
        assert_eq!(input.on_span_load_kn(1.0), 40.0);
        assert_eq!(input.on_span_load_kn(2.0), 100.0);
    }

    #[test]
    fn test_resultant_offset() {
        let input = MovingLoadInput::new("B", 10.0, 40.0, 60.0, 2.0);
        assert!((input.resultant_offset_m() - 1.2).abs() < 1e-12);

        let empty = MovingLoadInput::new("B", 10.0, 0.0, 0.0, 2.0);
        assert_eq!(empty.resultant_offset_m(), 0.0);
    }

    #[test]
    fn test_position_checks() {
        let input = MovingLoadInput::default();
        assert!(input.check_lead_position(0.0).is_ok());
        assert!(input.check_lead_position(10.0).is_ok());
        assert!(input.check_lead_position(10.01).is_err());
        assert!(input.check_section(-0.01).is_err());
        assert!(input.check_section(f64::NAN).is_err());
    }
}
