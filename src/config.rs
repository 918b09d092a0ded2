//! Host configuration

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use scopelink_shared::limits;

/// One objective in the instrument's nosepiece
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectiveConfig {
    /// Identifier used as the mosaic response field name (e.g. "obj1")
    pub id: String,
    /// Magnification label (e.g. "100x")
    pub name: String,
    /// Mosaic calibration: image scale in micrometers per pixel
    pub scale: f64,
    /// Mosaic calibration: x offset
    #[serde(default)]
    pub offset_x: f64,
    /// Mosaic calibration: y offset
    #[serde(default)]
    pub offset_y: f64,
}

/// Configuration for the acquisition host
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// TCP bind address for the remote-control interface
    pub bind_addr: String,
    /// Stage speed in micrometers per second
    pub stage_speed_um_s: f64,
    /// Settling interval before a commanded stage position is readable, ms
    pub stage_settle_ms: u64,
    /// Per-command execution deadline, ms
    pub command_deadline_ms: u64,
    /// Directory of parameter-set definitions (*.toml), loaded at startup
    pub parameter_dir: Option<PathBuf>,
    /// Objectives available on the instrument; the first is selected at startup
    pub objectives: Vec<ObjectiveConfig>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("127.0.0.1:{}", limits::DEFAULT_PORT),
            stage_speed_um_s: 5000.0,
            stage_settle_ms: 200,
            command_deadline_ms: limits::COMMAND_DEADLINE_MS,
            parameter_dir: None,
            objectives: vec![ObjectiveConfig {
                id: "obj1".into(),
                name: "100x".into(),
                scale: 0.160,
                offset_x: 0.0,
                offset_y: 0.0,
            }],
        }
    }
}

impl HostConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: HostConfig =
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the host cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.objectives.is_empty() {
            bail!("configuration must define at least one objective");
        }
        if self.stage_speed_um_s <= 0.0 {
            bail!("stage speed must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = HostConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.objectives[0].name, "100x");
        assert_eq!(config.stage_settle_ms, 200);
    }

    #[test]
    fn test_parse_toml_overrides() {
        let config: HostConfig = toml::from_str(
            r#"
            bind_addr = "0.0.0.0:9400"
            stage_speed_um_s = 2500.0

            [[objectives]]
            id = "obj1"
            name = "60x"
            scale = 0.267
            "#,
        )
        .expect("parse failed");

        assert_eq!(config.bind_addr, "0.0.0.0:9400");
        assert_eq!(config.stage_speed_um_s, 2500.0);
        assert_eq!(config.objectives.len(), 1);
        assert_eq!(config.objectives[0].name, "60x");
        assert_eq!(config.objectives[0].offset_x, 0.0);
        // Unset fields fall back to the defaults
        assert_eq!(config.stage_settle_ms, 200);
    }

    #[test]
    fn test_empty_objectives_rejected() {
        let config = HostConfig {
            objectives: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
