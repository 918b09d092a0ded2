//! Parameter sets and the parameter store
//!
//! A parameter set bundles the acquisition geometry and timing of the camera.
//! Sets are registered by name; exactly one set is active at any time, and
//! the name "default" always resolves to the active set.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::CommandError;

/// Sentinel parameter name resolving to whatever set is currently active
pub const DEFAULT_PARAMETERS: &str = "default";

/// A named acquisition configuration; immutable once loaded
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterSet {
    /// Unique set name
    pub name: String,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel depth in bytes
    #[serde(default = "default_pixel_bytes")]
    pub bytes_per_pixel: u32,
    /// Exposure per frame in milliseconds
    #[serde(default = "default_exposure_ms")]
    pub exposure_ms: f64,
}

fn default_pixel_bytes() -> u32 {
    2
}

fn default_exposure_ms() -> f64 {
    10.0
}

impl ParameterSet {
    /// Size of one stored frame in bytes
    pub fn per_frame_bytes(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height) * u64::from(self.bytes_per_pixel)
    }

    /// Estimated movie size in megabytes for `length` frames
    pub fn movie_megabytes(&self, length: u32) -> f64 {
        (u64::from(length) * self.per_frame_bytes()) as f64 / (1024.0 * 1024.0)
    }
}

/// Registry of parameter sets with one active entry
///
/// Seeded with a 512x512, 2 byte/pixel "default" set so there is always an
/// active set to resolve against.
#[derive(Debug)]
pub struct ParameterStore {
    sets: Vec<ParameterSet>,
    active: usize,
}

impl ParameterStore {
    /// Create a store holding the startup default set
    pub fn new() -> Self {
        Self {
            sets: vec![ParameterSet {
                name: DEFAULT_PARAMETERS.into(),
                width: 512,
                height: 512,
                bytes_per_pixel: default_pixel_bytes(),
                exposure_ms: default_exposure_ms(),
            }],
            active: 0,
        }
    }

    /// Register a set, replacing any existing entry of the same name
    ///
    /// Replacement keeps the original slot so numeric indices stay stable.
    pub fn load(&mut self, set: ParameterSet) {
        match self.sets.iter().position(|s| s.name == set.name) {
            Some(i) => self.sets[i] = set,
            None => self.sets.push(set),
        }
    }

    /// Select the active set by name
    pub fn set_active_by_name(&mut self, name: &str) -> Result<(), CommandError> {
        let index = self
            .sets
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| CommandError::ParametersNotFound(name.to_string()))?;
        self.active = index;
        Ok(())
    }

    /// Select the active set by zero-based load order
    pub fn set_active_by_index(&mut self, index: u32) -> Result<(), CommandError> {
        if (index as usize) < self.sets.len() {
            self.active = index as usize;
            Ok(())
        } else {
            Err(CommandError::ParametersNotFound(index.to_string()))
        }
    }

    /// The currently active set
    pub fn active(&self) -> &ParameterSet {
        &self.sets[self.active]
    }

    /// Look up a set by name
    pub fn by_name(&self, name: &str) -> Option<&ParameterSet> {
        self.sets.iter().find(|s| s.name == name)
    }

    /// Look up a set by zero-based load order
    pub fn get(&self, index: u32) -> Option<&ParameterSet> {
        self.sets.get(index as usize)
    }

    /// Resolve an optional requested name to a set
    ///
    /// `None` and the "default" sentinel resolve to the active set.
    pub fn resolve(&self, requested: Option<&str>) -> Result<&ParameterSet, CommandError> {
        match requested {
            None | Some(DEFAULT_PARAMETERS) => Ok(self.active()),
            Some(name) => self
                .by_name(name)
                .ok_or_else(|| CommandError::ParametersNotFound(name.to_string())),
        }
    }

    /// Load every `*.toml` definition in a directory; returns the count
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut loaded = 0;
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("reading parameter dir {}", dir.display()))?
        {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "toml") {
                let text = std::fs::read_to_string(&path)?;
                let set: ParameterSet = toml::from_str(&text)
                    .with_context(|| format!("parsing parameter set {}", path.display()))?;
                self.load(set);
                loaded += 1;
            }
        }
        Ok(loaded)
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(name: &str, width: u32, height: u32, bytes_per_pixel: u32) -> ParameterSet {
        ParameterSet {
            name: name.into(),
            width,
            height,
            bytes_per_pixel,
            exposure_ms: 1.0,
        }
    }

    #[test]
    fn test_store_starts_with_default_active() {
        let store = ParameterStore::new();
        assert_eq!(store.active().name, DEFAULT_PARAMETERS);
        assert_eq!(store.active().width, 512);
    }

    #[test]
    fn test_load_is_an_upsert() {
        let mut store = ParameterStore::new();
        store.load(set("256x256", 256, 256, 2));
        store.load(set("128x128", 128, 128, 2));
        // Replacing keeps the slot, so index 1 still names 256x256
        store.load(set("256x256", 256, 256, 4));

        assert_eq!(store.get(1).map(|s| s.bytes_per_pixel), Some(4));
        assert_eq!(store.get(2).map(|s| s.name.as_str()), Some("128x128"));
    }

    #[test]
    fn test_set_active_by_name_and_index() {
        let mut store = ParameterStore::new();
        store.load(set("256x256", 256, 256, 2));

        store.set_active_by_name("256x256").expect("known name");
        assert_eq!(store.active().name, "256x256");

        store.set_active_by_index(0).expect("known index");
        assert_eq!(store.active().name, DEFAULT_PARAMETERS);

        assert!(matches!(
            store.set_active_by_name("512x512"),
            Err(CommandError::ParametersNotFound(_))
        ));
        assert!(store.set_active_by_index(9).is_err());
    }

    #[test]
    fn test_resolve_sentinel_follows_active() {
        let mut store = ParameterStore::new();
        store.load(set("256x256", 256, 256, 2));

        assert_eq!(store.resolve(None).expect("active").name, DEFAULT_PARAMETERS);
        assert_eq!(
            store.resolve(Some("default")).expect("sentinel").name,
            DEFAULT_PARAMETERS
        );

        store.set_active_by_name("256x256").expect("known name");
        assert_eq!(
            store.resolve(Some("default")).expect("sentinel").name,
            "256x256"
        );
        assert!(store.resolve(Some("nope")).is_err());
    }

    #[test]
    fn test_movie_size_estimates() {
        // 512x512 @ 2 bytes: 524288 bytes/frame, 50 frames = 25.0 MB
        assert_eq!(set("a", 512, 512, 2).movie_megabytes(50), 25.0);
        // 256x256 @ 2 bytes: 131072 bytes/frame, 50 frames = 6.25 MB
        assert_eq!(set("b", 256, 256, 2).movie_megabytes(50), 6.25);
        // 256x512 @ 4 bytes matches the 512x512 baseline
        assert_eq!(set("c", 256, 512, 4).movie_megabytes(50), 25.0);
    }
}
