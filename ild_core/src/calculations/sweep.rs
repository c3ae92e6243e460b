//! Load Sweep
//!
//! Evenly spaced lead positions across the span for a caller-owned animation
//! loop. The sweep owns no timer: each call to `next` computes one frame and
//! the caller decides when to draw it.
//!
//! ## Example
//! ```rust
//! use ild_core::calculations::moving_load::MovingLoadInput;
//! use ild_core::calculations::sweep::LoadSweep;
//!
//! let input = MovingLoadInput::default();
//! let sweep = LoadSweep::new(&input, 5, 51).unwrap();
//! let leads: Vec<f64> = sweep.map(|frame| frame.lead_position_m).collect();
//! assert_eq!(leads, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
//! ```

use tracing::trace;

use super::beam_analysis::{frame_at, DiagramFrame};
use super::moving_load::MovingLoadInput;
use crate::errors::{CalcError, CalcResult};

/// Default number of animation frames per pass
pub const DEFAULT_FRAMES: usize = 100;

/// Default number of diagram samples per frame
pub const DEFAULT_DIAGRAM_SAMPLES: usize = 300;

/// Iterator over the diagram frames of one pass of the load pair
#[derive(Debug, Clone)]
pub struct LoadSweep {
    input: MovingLoadInput,
    frames: usize,
    samples: usize,
    next_frame: usize,
}

impl LoadSweep {
    /// Validate once and prepare a sweep of `frames` frames (at least two).
    pub fn new(input: &MovingLoadInput, frames: usize, samples: usize) -> CalcResult<Self> {
        input.validate()?;
        if frames < 2 {
            return Err(CalcError::invalid_input(
                "frames",
                frames.to_string(),
                "A sweep needs at least two frames",
            ));
        }
        Ok(LoadSweep {
            input: input.clone(),
            frames,
            samples,
            next_frame: 0,
        })
    }

    /// Lead position for a frame index
    pub fn lead_position(&self, frame: usize) -> f64 {
        if frame + 1 >= self.frames {
            // Land exactly on B
            self.input.span_m
        } else {
            self.input.span_m * frame as f64 / (self.frames - 1) as f64
        }
    }

    /// Total number of frames in one pass
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    /// Restart the pass from the first frame
    pub fn rewind(&mut self) {
        self.next_frame = 0;
    }
}

impl Iterator for LoadSweep {
    type Item = DiagramFrame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_frame >= self.frames {
            return None;
        }
        let a = self.lead_position(self.next_frame);
        trace!(frame = self.next_frame, lead_position_m = a, "sweep frame");
        self.next_frame += 1;
        Some(frame_at(&self.input, a, self.samples))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.frames - self.next_frame;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LoadSweep {}
