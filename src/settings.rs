//! Game settings and preferences
//!
//! Persisted separately from the high score: `settings.json` in the local
//! data dir natively, LocalStorage on web.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 256,
            QualityPreset::High => 1024,
        }
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects (capture bursts, pickup sparkles)
    pub particles: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// File name / storage key
    const STORAGE_NAME: &'static str = "settings.json";

    /// Switch preset by name. Unknown names leave the settings untouched.
    pub fn set_quality(&mut self, name: &str) -> bool {
        match QualityPreset::parse(name) {
            Some(preset) => {
                self.quality = preset;
                log::info!("Quality preset: {}", preset.as_str());
                true
            }
            None => {
                log::warn!(
                    "Unknown quality preset {:?}, keeping {}",
                    name,
                    self.quality.as_str()
                );
                false
            }
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Playback volume after mute and both sliders
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match storage::data_path(Self::STORAGE_NAME) {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("Could not determine data directory for settings");
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        match storage::data_path(Self::STORAGE_NAME) {
            Some(path) => self.save_to(&path),
            None => log::warn!("Could not determine data directory for saving settings"),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        storage::load_json(path).unwrap_or_default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) {
        storage::save_json(path, self);
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        storage::load_local(Self::STORAGE_NAME).unwrap_or_default()
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        storage::save_local(Self::STORAGE_NAME, self);
    }
}
