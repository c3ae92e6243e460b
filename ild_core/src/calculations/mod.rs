//! # Structural Calculations
//!
//! Moving-load analysis of a simply supported span. Each calculation follows
//! the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `compute_*(input, ...) -> Result<_, CalcError>` - Pure calculation function
//!
//! Validation happens once at each public entry point; the crate-internal
//! evaluators assume validated inputs.
//!
//! ## Available Calculations
//!
//! - [`moving_load`] - The two-load system and its placement on the span
//! - [`beam_analysis`] - Reactions, section forces and per-frame diagrams
//! - [`influence`] - Influence line ordinates for a unit load
//! - [`envelope`] - Maximum reactions, section peaks and global maxima
//! - [`sweep`] - Frame iterator for a caller-owned animation loop

pub mod beam_analysis;
pub mod envelope;
pub mod influence;
pub mod moving_load;
pub mod sweep;

// Re-export commonly used types
pub use beam_analysis::{
    compute_reactions, compute_section_forces, sample_frame, DiagramFrame, Reactions,
    SectionForces,
};
pub use envelope::{compute_envelope, EnvelopeOptions, EnvelopeResult, SectionLocation};
pub use influence::InfluenceQuantity;
pub use moving_load::{LoadRole, MovingLoadInput, PlacedLoad};
pub use sweep::LoadSweep;
