//! # ild_core - Moving-Load Beam Analysis Engine
//!
//! `ild_core` computes support reactions, shear force and bending moment in a
//! simply supported beam crossed by two point loads at a fixed spacing, using
//! influence line principles. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **Deterministic**: Identical inputs give bit-identical outputs
//! - **Validated at the boundary**: Invalid geometry is reported, never NaN
//! - **Renderer-agnostic**: Frames are plain data handed to the caller
//!
//! ## Quick Start
//!
//! ```rust
//! use ild_core::calculations::{compute_envelope, compute_reactions, EnvelopeOptions, MovingLoadInput};
//!
//! // 10 m span, 40 kN leading 60 kN by 2 m
//! let input = MovingLoadInput::new("G-1", 10.0, 40.0, 60.0, 2.0);
//!
//! let reactions = compute_reactions(&input, 4.0)?;
//! assert!((reactions.left_kn - 72.0).abs() < 1e-9);
//!
//! let envelope = compute_envelope(&input, &EnvelopeOptions::default())?;
//! println!("M_max = {:.1} kN·m", envelope.max_moment.value);
//! # Ok::<(), ild_core::CalcError>(())
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Reactions, section forces, influence lines, envelope, sweep
//! - [`project`] - Project container, metadata, and analysis settings
//! - [`errors`] - Structured error types
//! - [`file_io`] - File operations with atomic saves and locking

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod project;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, save_project, FileLock};
pub use project::{AnalysisSettings, Project, ProjectMetadata};
