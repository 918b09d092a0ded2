//! Movie acquisition handler

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::info;

use super::{Fields, HandlerContext};
use crate::error::CommandError;
use scopelink_shared::{TakeMovie, Value};

/// File extension of raw movie artifacts
pub const MOVIE_EXTENSION: &str = "raw";

/// Placeholder acquisition-rate model for dry runs, seconds
const TEST_MODE_MOVIE_DURATION: f64 = 1.0;

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// Target artifact path for a movie request
pub fn movie_path(directory: &str, name: &str) -> PathBuf {
    Path::new(directory).join(format!("{}.{}", name, MOVIE_EXTENSION))
}

/// Handle TAKE_MOVIE
///
/// Parameter resolution and overwrite protection run before the mode fork.
/// Test mode then reports the size/duration estimates; real mode acquires
/// while holding the instrument write lock and reports measured values.
pub async fn handle_take_movie(
    ctx: &HandlerContext,
    cmd: &TakeMovie,
) -> Result<Fields, CommandError> {
    if cmd.directory.is_empty() || cmd.name.is_empty() {
        return Err(CommandError::InvalidRequest(
            "missing movie directory or name".into(),
        ));
    }
    if cmd.length == 0 {
        return Err(CommandError::InvalidRequest("zero-length movie".into()));
    }

    let set = {
        let params = ctx.params.read().await;
        params.resolve(cmd.parameters.as_deref())?.clone()
    };

    let path = movie_path(&cmd.directory, &cmd.name);
    if path.exists() && !cmd.overwrite {
        return Err(CommandError::OverwriteDenied(path));
    }

    if ctx.test_mode {
        return Ok(vec![
            (
                "disk_usage".to_string(),
                Value::real(set.movie_megabytes(cmd.length)),
            ),
            ("duration".to_string(), Value::real(TEST_MODE_MOVIE_DURATION)),
        ]);
    }

    // Acquisition holds the instrument write lock for its full duration
    let _state = ctx.state.write().await;

    let started = Instant::now();
    let written = ctx.camera.acquire(&set, cmd.length, &path).await?;
    let duration = started.elapsed().as_secs_f64();
    let disk_usage = written as f64 / BYTES_PER_MEGABYTE;

    info!(
        "Movie {}: {} frames of {}, {:.2} MB in {:.3}s",
        path.display(),
        cmd.length,
        set.name,
        disk_usage,
        duration
    );

    Ok(vec![
        ("disk_usage".to_string(), Value::real(disk_usage)),
        ("duration".to_string(), Value::real(duration)),
    ])
}
