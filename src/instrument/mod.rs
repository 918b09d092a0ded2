//! Instrument state: objectives, mosaic calibration and the stage
//!
//! A single `InstrumentState` exists for the process lifetime, shared behind
//! one reader/writer lock. Only successful real-mode command execution
//! mutates it; test-mode commands read through the same lock.

mod camera;
mod stage;

pub use camera::{CameraDriver, SimCamera};
pub use stage::{SimStage, StageDriver};

use anyhow::{bail, Result};

use crate::config::ObjectiveConfig;

/// Mosaic calibration relating stage coordinates to image space
#[derive(Debug, Clone, Copy)]
pub struct MosaicSettings {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// A microscope objective and its mosaic calibration
#[derive(Debug, Clone)]
pub struct Objective {
    /// Response field name used for mosaic queries (e.g. "obj1")
    pub id: String,
    /// Magnification label (e.g. "100x")
    pub name: String,
    pub mosaic: MosaicSettings,
}

impl Objective {
    /// Fixed-point descriptor consumed by mosaic software:
    /// `"<magnification>,<scale>,<offset_x>,<offset_y>"`, e.g. `"100x,0.160,0.0,0.0"`
    pub fn mosaic_descriptor(&self) -> String {
        format!(
            "{},{:.3},{:.1},{:.1}",
            self.name, self.mosaic.scale, self.mosaic.offset_x, self.mosaic.offset_y
        )
    }
}

impl From<&ObjectiveConfig> for Objective {
    fn from(config: &ObjectiveConfig) -> Self {
        Self {
            id: config.id.clone(),
            name: config.name.clone(),
            mosaic: MosaicSettings {
                scale: config.scale,
                offset_x: config.offset_x,
                offset_y: config.offset_y,
            },
        }
    }
}

/// Shared instrument state
pub struct InstrumentState {
    objectives: Vec<Objective>,
    current: usize,
    stage: Box<dyn StageDriver>,
}

impl InstrumentState {
    /// Create the instrument state; at least one objective is required
    pub fn new(objectives: Vec<Objective>, stage: Box<dyn StageDriver>) -> Result<Self> {
        if objectives.is_empty() {
            bail!("instrument needs at least one objective");
        }
        Ok(Self {
            objectives,
            current: 0,
            stage,
        })
    }

    /// The currently selected objective
    pub fn objective(&self) -> &Objective {
        &self.objectives[self.current]
    }

    /// All configured objectives, in nosepiece order
    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// Read access to the stage driver
    pub fn stage(&self) -> &dyn StageDriver {
        self.stage.as_ref()
    }

    /// Write access to the stage driver, for real-mode motion
    pub fn stage_mut(&mut self) -> &mut dyn StageDriver {
        self.stage.as_mut()
    }
}
