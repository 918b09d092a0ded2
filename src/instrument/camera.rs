//! Camera acquisition driver seam
//!
//! The driver owns the artifact write; existence and overwrite policy belong
//! to the execution engine.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::time::{sleep, Duration};

use crate::parameters::ParameterSet;

/// Movie acquisition interface
#[async_trait]
pub trait CameraDriver: Send + Sync {
    /// Acquire `length` frames under `set` and write them to `path`;
    /// returns the number of bytes written
    async fn acquire(&self, set: &ParameterSet, length: u32, path: &Path) -> Result<u64>;
}

/// Simulated camera producing dark frames at the configured exposure
pub struct SimCamera;

#[async_trait]
impl CameraDriver for SimCamera {
    async fn acquire(&self, set: &ParameterSet, length: u32, path: &Path) -> Result<u64> {
        let frame = vec![0u8; set.per_frame_bytes() as usize];
        let mut file = File::create(path)
            .await
            .with_context(|| format!("creating movie file {}", path.display()))?;

        for _ in 0..length {
            sleep(Duration::from_secs_f64(set.exposure_ms / 1000.0)).await;
            file.write_all(&frame).await?;
        }
        file.flush().await?;

        Ok(u64::from(length) * frame.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_set() -> ParameterSet {
        ParameterSet {
            name: "16x16".into(),
            width: 16,
            height: 16,
            bytes_per_pixel: 2,
            exposure_ms: 0.1,
        }
    }

    #[tokio::test]
    async fn test_acquire_writes_all_frames() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("movie_01.raw");

        let written = SimCamera
            .acquire(&small_set(), 4, &path)
            .await
            .expect("acquire failed");

        assert_eq!(written, 4 * 16 * 16 * 2);
        assert_eq!(std::fs::metadata(&path).expect("metadata").len(), written);
    }

    #[tokio::test]
    async fn test_acquire_replaces_existing_artifact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("movie_01.raw");
        std::fs::write(&path, vec![0xffu8; 10]).expect("seed file");

        let written = SimCamera
            .acquire(&small_set(), 1, &path)
            .await
            .expect("acquire failed");

        assert_eq!(std::fs::metadata(&path).expect("metadata").len(), written);
    }
}
