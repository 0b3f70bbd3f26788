use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hub::HubConfig;
use crate::level_gen::{GeneratorConfig, MAX_HALL_LENGTH};
use crate::physics::ControllerConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "MUPS_CONFIG";
/// Path tried when the environment variable is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/mups.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// World dimensions shared by the hub and every dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Y of the floor line. Falling to it in a dimension costs a life.
    pub floor_y: f32,
    /// Playable length of a dimension hall.
    pub hall_length: f32,
    pub tick_rate_hz: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 600.0,
            floor_y: 520.0,
            hall_length: 4000.0,
            tick_rate_hz: 60.0,
        }
    }
}

/// Top-level engine configuration, loaded from `config/mups.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub world: WorldConfig,
    pub generator: GeneratorConfig,
    pub controller: ControllerConfig,
    pub hub: HubConfig,
}

impl EngineConfig {
    /// Load config from `MUPS_CONFIG` or `config/mups.toml`. Falls back to
    /// defaults if the file is missing, unparseable, or fails validation.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        if !Path::new(&path).exists() {
            return Self::default();
        }
        match Self::from_path(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("Failed to load {path}: {e}, using defaults");
                Self::default()
            },
        }
    }

    /// Load and validate a specific file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        positive("world.screen_width", w.screen_width)?;
        positive("world.screen_height", w.screen_height)?;
        positive("world.tick_rate_hz", w.tick_rate_hz)?;
        if !(w.floor_y > 0.0 && w.floor_y <= w.screen_height) {
            return Err(ConfigError::Invalid(format!(
                "world.floor_y must be within (0, {}], got {}",
                w.screen_height, w.floor_y
            )));
        }

        let g = &self.generator;
        for (name, value) in [
            ("generator.platform_thickness", g.platform_thickness),
            ("generator.start_width", g.start_width),
            ("generator.door_width", g.door_width),
            ("generator.door_height", g.door_height),
            ("generator.beacon_size", g.beacon_size),
        ] {
            positive(name, value)?;
        }
        for (name, value) in [
            ("generator.min_floor_room", g.min_floor_room),
            ("generator.min_ceiling_room", g.min_ceiling_room),
            ("generator.door_clear_buffer", g.door_clear_buffer),
            ("generator.start_x", g.start_x),
            ("generator.start_rise", g.start_rise),
            ("generator.vertical_step_factor", g.vertical_step_factor),
            ("generator.horizontal_step_factor", g.horizontal_step_factor),
            ("generator.end_margin", g.end_margin),
            ("generator.door_inset", g.door_inset),
            ("generator.door_headroom", g.door_headroom),
            ("generator.door_min_top", g.door_min_top),
            ("generator.corridor_headroom", g.corridor_headroom),
            ("generator.corridor_min_ceiling", g.corridor_min_ceiling),
            ("generator.corridor_base_factor", g.corridor_base_factor),
            ("generator.corridor_variation_factor", g.corridor_variation_factor),
            ("generator.beacon_hover", g.beacon_hover),
            ("generator.beacon_min_platform_width", g.beacon_min_platform_width),
            ("generator.beacon_edge_margin", g.beacon_edge_margin),
        ] {
            non_negative(name, value)?;
        }

        let min_hall = g.start_x + g.start_width + g.door_clear_buffer;
        if !(w.hall_length > min_hall && w.hall_length <= MAX_HALL_LENGTH) {
            return Err(ConfigError::Invalid(format!(
                "world.hall_length must be within ({min_hall}, {MAX_HALL_LENGTH}], got {}",
                w.hall_length
            )));
        }
        if w.floor_y - g.min_floor_room - g.min_ceiling_room <= 0.0 {
            return Err(ConfigError::Invalid(
                "generator ceiling/floor room leaves no platform band".into(),
            ));
        }

        let c = &self.controller;
        positive("controller.move_speed", c.move_speed)?;
        positive("controller.player_width", c.player_width)?;
        positive("controller.player_height", c.player_height)?;
        non_negative("controller.wall_kick", c.wall_kick)?;
        non_negative("controller.beacon_pickup_margin", c.beacon_pickup_margin)?;
        if !(c.sprint_multiplier >= 1.0 && c.sprint_multiplier.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "controller.sprint_multiplier must be finite and >= 1, got {}",
                c.sprint_multiplier
            )));
        }

        positive("hub.gravity", self.hub.gravity)?;
        positive("hub.jump_strength", self.hub.jump_strength)?;
        if self.hub.contract_offers == 0 {
            tracing::warn!("hub.contract_offers is 0; the contract console will be empty");
        }
        Ok(())
    }
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{name} must be finite and > 0, got {value}"
        )))
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{name} must be finite and >= 0, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg = EngineConfig::from_toml_str(
            r#"
            [world]
            hall_length = 5000.0

            [controller]
            coyote_time_ms = 90
            "#,
        )
        .unwrap();
        assert_eq!(cfg.world.hall_length, 5000.0);
        assert_eq!(cfg.world.floor_y, 520.0);
        assert_eq!(cfg.controller.coyote_time_ms, 90);
        assert_eq!(cfg.controller.jump_buffer_ms, 140);
    }

    #[test]
    fn shipped_config_parses() {
        let cfg = EngineConfig::from_toml_str(include_str!("../../../config/mups.toml")).unwrap();
        assert_eq!(cfg.world.floor_y, 520.0);
        assert_eq!(cfg.hub.contract_offers, 3);
    }

    #[test]
    fn rejects_short_hall() {
        let err = EngineConfig::from_toml_str("[world]\nhall_length = 400.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err}");
    }

    #[test]
    fn rejects_unbounded_hall() {
        for hall in ["inf", "nan", "1e9"] {
            let err = EngineConfig::from_toml_str(&format!("[world]\nhall_length = {hall}\n"))
                .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{hall}: {err}");
        }
    }

    #[test]
    fn rejects_nan_physics() {
        let err =
            EngineConfig::from_toml_str("[hub]\ngravity = nan\n[controller]\nmove_speed = nan\n")
                .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err}");

        for (section, key, value) in [
            ("hub", "gravity", "nan"),
            ("hub", "jump_strength", "inf"),
            ("controller", "move_speed", "nan"),
            ("controller", "sprint_multiplier", "nan"),
            ("controller", "player_height", "-inf"),
            ("controller", "wall_kick", "nan"),
            ("world", "tick_rate_hz", "nan"),
            ("world", "floor_y", "nan"),
            ("world", "screen_width", "0.0"),
            ("generator", "door_width", "nan"),
            ("generator", "min_floor_room", "nan"),
            ("generator", "corridor_variation_factor", "inf"),
            ("generator", "vertical_step_factor", "-1.0"),
        ] {
            let toml = format!("[{section}]\n{key} = {value}\n");
            let err = EngineConfig::from_toml_str(&toml).unwrap_err();
            match err {
                ConfigError::Invalid(msg) => assert!(msg.contains(key), "{toml}: {msg}"),
                other => panic!("{toml}: unexpected {other}"),
            }
        }
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = EngineConfig::from_toml_str("[world\nfloor_y = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EngineConfig::from_path("definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
