use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::machine::{MachineState, PadBank};
use crate::types::pad::{default_kit, Pad, PadKey};

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MachineConfig {
    #[serde(default)]
    pub devices: DeviceConfig,

    /// Directory relative clip paths are resolved against
    #[serde(default = "default_samples_dir")]
    pub samples: PathBuf,

    /// Initial volume fraction (0.0 to 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Initial power state
    #[serde(default = "default_power")]
    pub power: bool,

    /// Pad table; the stock kit when omitted
    #[serde(default = "default_pads")]
    pub pads: Vec<PadConfig>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            devices: DeviceConfig::default(),
            samples: default_samples_dir(),
            volume: default_volume(),
            power: default_power(),
            pads: default_pads(),
        }
    }
}

impl MachineConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: MachineConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?;

        // Relative samples directories are relative to the config file
        if config.samples.is_relative() {
            if let Some(parent) = path.parent() {
                config.samples = parent.join(&config.samples);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(anyhow!("Volume must be between 0.0 and 1.0"));
        }

        for (idx, pad) in self.pads.iter().enumerate() {
            pad.validate()
                .with_context(|| format!("Invalid configuration for pad {}", idx))?;
        }

        // Count, uniqueness and reserved keys
        self.pad_bank()?;
        Ok(())
    }

    /// Build the validated pad bank
    pub fn pad_bank(&self) -> Result<PadBank> {
        let pads = self
            .pads
            .iter()
            .map(PadConfig::to_pad)
            .collect::<Result<Vec<_>>>()?;
        PadBank::new(pads)
    }

    /// Session state the machine starts in
    pub fn initial_state(&self) -> MachineState {
        MachineState {
            volume: self.volume,
            powered: self.power,
            ..MachineState::default()
        }
    }
}

/// Device configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeviceConfig {
    /// Output device index or name fragment; system default when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audioout: Option<String>,
}

/// Individual pad configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PadConfig {
    pub key: String,
    pub clip: PathBuf,
    pub label: String,
}

impl PadConfig {
    /// Validate this pad configuration
    pub fn validate(&self) -> Result<()> {
        if PadKey::parse(&self.key).is_none() {
            return Err(anyhow!(
                "Key must be a single letter or digit, got {:?}",
                self.key
            ));
        }
        if self.clip.as_os_str().is_empty() {
            return Err(anyhow!("Clip path must not be empty"));
        }
        if self.label.trim().is_empty() {
            return Err(anyhow!("Label must not be empty"));
        }
        Ok(())
    }

    pub fn to_pad(&self) -> Result<Pad> {
        let key = PadKey::parse(&self.key)
            .ok_or_else(|| anyhow!("Invalid pad key: {:?}", self.key))?;
        Ok(Pad {
            key,
            clip: self.clip.clone(),
            label: self.label.clone(),
        })
    }
}

impl From<&Pad> for PadConfig {
    fn from(pad: &Pad) -> Self {
        Self {
            key: pad.key.to_string(),
            clip: pad.clip.clone(),
            label: pad.label.clone(),
        }
    }
}

// Default value functions for serde
fn default_samples_dir() -> PathBuf {
    PathBuf::from("sounds")
}

fn default_volume() -> f32 {
    0.5
}

fn default_power() -> bool {
    true
}

fn default_pads() -> Vec<PadConfig> {
    default_kit().iter().map(PadConfig::from).collect()
}
