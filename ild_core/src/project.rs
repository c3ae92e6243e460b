//! # Project Data Structures
//!
//! The `Project` struct is the root container for saved analyses.
//! Projects serialize to `.ild` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: AnalysisSettings (scan resolution, animation, sections)
//! └── cases: HashMap<Uuid, MovingLoadInput> (all load cases)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use ild_core::calculations::MovingLoadInput;
//! use ild_core::project::Project;
//!
//! let mut project = Project::new("Jane Engineer", "25-042");
//! let id = project.add_case(MovingLoadInput::new("Crane", 10.0, 40.0, 60.0, 2.0));
//!
//! let envelope = project.analyze_case(&id).unwrap();
//! assert!(envelope.max_moment.value > 0.0);
//!
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("Crane"));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::envelope::{compute_envelope, EnvelopeOptions, EnvelopeResult};
use crate::calculations::moving_load::MovingLoadInput;
use crate::calculations::sweep::{LoadSweep, DEFAULT_DIAGRAM_SAMPLES, DEFAULT_FRAMES};
use crate::errors::{CalcError, CalcResult};

/// Current schema version for .ild files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Analysis settings shared by every case
    pub settings: AnalysisSettings,

    /// All load cases, keyed by UUID
    pub cases: HashMap<Uuid, MovingLoadInput>,
}

impl Project {
    /// Create a new empty project.
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                created: now,
                modified: now,
            },
            settings: AnalysisSettings::default(),
            cases: HashMap::new(),
        }
    }

    /// Add a load case to the project.
    ///
    /// Returns the UUID assigned to the case.
    pub fn add_case(&mut self, case: MovingLoadInput) -> Uuid {
        let id = Uuid::new_v4();
        self.cases.insert(id, case);
        self.touch();
        id
    }

    /// Remove a load case by UUID.
    pub fn remove_case(&mut self, id: &Uuid) -> Option<MovingLoadInput> {
        let case = self.cases.remove(id);
        if case.is_some() {
            self.touch();
        }
        case
    }

    /// Get a load case by UUID.
    pub fn get_case(&self, id: &Uuid) -> Option<&MovingLoadInput> {
        self.cases.get(id)
    }

    /// Get a mutable reference to a load case, marking the project modified.
    pub fn get_case_mut(&mut self, id: &Uuid) -> Option<&mut MovingLoadInput> {
        if self.cases.contains_key(id) {
            self.meta.modified = Utc::now();
            self.cases.get_mut(id)
        } else {
            None
        }
    }

    /// Cases ordered by label, then by id, for stable listings
    pub fn cases_by_label(&self) -> Vec<(Uuid, &MovingLoadInput)> {
        let mut cases: Vec<(Uuid, &MovingLoadInput)> =
            self.cases.iter().map(|(id, case)| (*id, case)).collect();
        cases.sort_by(|a, b| a.1.label.cmp(&b.1.label).then(a.0.cmp(&b.0)));
        cases
    }

    /// Run the envelope search for one case with the project settings.
    pub fn analyze_case(&self, id: &Uuid) -> CalcResult<EnvelopeResult> {
        let case = self.cases.get(id).ok_or_else(|| {
            CalcError::invalid_input("case", id.to_string(), "No such load case in project")
        })?;
        compute_envelope(case, &self.settings.envelope)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Number of load cases
    pub fn case_count(&self) -> usize {
        self.cases.len()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Analysis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Envelope scan resolution and observation sections
    pub envelope: EnvelopeOptions,

    /// Regular samples per diagram frame
    pub diagram_samples: usize,

    /// Frames per animation pass
    pub animation_frames: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            envelope: EnvelopeOptions::default(),
            diagram_samples: DEFAULT_DIAGRAM_SAMPLES,
            animation_frames: DEFAULT_FRAMES,
        }
    }
}

impl AnalysisSettings {
    /// Build the animation sweep for a case using these settings
    pub fn sweep(&self, case: &MovingLoadInput) -> CalcResult<LoadSweep> {
        LoadSweep::new(case, self.animation_frames, self.diagram_samples)
    }
}
