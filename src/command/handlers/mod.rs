//! Command handlers, one per command kind
//!
//! Handlers validate before they fork on `test_mode`, so an invalid request
//! fails identically in both modes; only the effectful half differs.

mod mosaic;
mod movie;
mod parameters;
mod stage;

pub use mosaic::{handle_get_mosaic_settings, handle_get_objective};
pub use movie::{handle_take_movie, movie_path, MOVIE_EXTENSION};
pub use parameters::handle_set_parameters;
pub use stage::{handle_get_stage_position, handle_move_stage};

use std::sync::Arc;

use tokio::sync::RwLock;

use scopelink_shared::Value;

use crate::instrument::{CameraDriver, InstrumentState};
use crate::parameters::ParameterStore;

/// Named fields of a success response
pub type Fields = Vec<(String, Value)>;

/// Context passed to command handlers
pub struct HandlerContext {
    pub state: Arc<RwLock<InstrumentState>>,
    pub params: Arc<RwLock<ParameterStore>>,
    pub camera: Arc<dyn CameraDriver>,
    /// Dry-run flag: validate and estimate, never mutate or write
    pub test_mode: bool,
}
