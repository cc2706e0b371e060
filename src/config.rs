use std::fs::File;
use std::io::Read;
use json_comments::StripComments;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::hashmap::error::MapError;
use crate::hashmap::lib::{MAP_HIGH_BOUND, MAP_INITIAL_SIZE, MAP_LOW_BOUND};

pub const MAP_CONFIG_JSON: &str = "./hashmap_config.json";
pub const MAP_CONFIG_TOML: &str = "./hashmap_config.toml";

/// Tuning knobs of a [`HashMap`](crate::hashmap::hashmap::HashMap).
///
/// `min_capacity` is both the starting bucket count and the floor a shrink
/// never goes below. The map grows once `size / capacity` exceeds
/// `high_bound` and shrinks once it drops below `low_bound`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub min_capacity: usize,
    pub low_bound: f64,
    pub high_bound: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            min_capacity: MAP_INITIAL_SIZE,
            low_bound: MAP_LOW_BOUND,
            high_bound: MAP_HIGH_BOUND,
        }
    }
}

impl MapConfig {
    /// Reads the config from `path`, or from the default TOML/JSON paths when
    /// `path` is `None`. Any read, parse or validation failure falls back to
    /// [`MapConfig::default`].
    pub fn load(path: Option<&str>) -> Self {
        let config_path_show;
        let mut file = if let Some(path) = path {
            config_path_show = path;
            if let Ok(file) = File::open(path) {
                file
            } else {
                warn!("Config File: {} Read Fail, Use Default Config.", config_path_show);
                return MapConfig::default();
            }
        } else if let Ok(file) = File::open(MAP_CONFIG_TOML) {
            config_path_show = MAP_CONFIG_TOML;
            file
        } else if let Ok(file) = File::open(MAP_CONFIG_JSON) {
            config_path_show = MAP_CONFIG_JSON;
            file
        } else {
            info!("No Config File Found, Use Default Config.");
            return MapConfig::default();
        };
        let mut config_string = String::new();
        if let Err(e) = file.read_to_string(&mut config_string) {
            warn!("Config File: {} Read Fail ({e}), Use Default Config.", config_path_show);
            return MapConfig::default();
        }
        info!("Config File: {}", config_path_show);
        match Self::parse(&config_string) {
            Ok(config) => config,
            Err(e) => {
                warn!("Config File: {} {e}, Use Default Config.", config_path_show);
                MapConfig::default()
            }
        }
    }

    /// Parses TOML first, then JSON with comments stripped, and validates the result.
    pub fn parse(config_string: &str) -> Result<Self, MapError> {
        let config: MapConfig = match toml::from_str(config_string) {
            Ok(config) => config,
            Err(_) => {
                let stripped = StripComments::new(config_string.as_bytes());
                serde_json::from_reader(stripped)
                    .map_err(|e| MapError::InvalidConfig(e.to_string()))?
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MapError> {
        if !self.min_capacity.is_power_of_two() || self.min_capacity < MAP_INITIAL_SIZE {
            return Err(MapError::InvalidConfig(format!(
                "min_capacity {} is not a power of two of at least {}",
                self.min_capacity, MAP_INITIAL_SIZE
            )));
        }
        if !(self.low_bound > 0.0 && self.high_bound <= 1.0 && self.low_bound < self.high_bound) {
            return Err(MapError::InvalidConfig(format!(
                "load bounds ({}, {}) must satisfy 0 < low < high <= 1",
                self.low_bound, self.high_bound
            )));
        }
        // a doubling halves the factor and a halving doubles it
        if 2.0 * self.low_bound > self.high_bound {
            return Err(MapError::InvalidConfig(format!(
                "low bound {} is more than half of high bound {}",
                self.low_bound, self.high_bound
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = MapConfig::default();
        assert_eq!(config.min_capacity, 16);
        assert_eq!(config.low_bound, 0.25);
        assert_eq!(config.high_bound, 0.75);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_toml() -> Result<(), MapError> {
        let config = MapConfig::parse("min_capacity = 64\nlow_bound = 0.2\nhigh_bound = 0.8\n")?;
        assert_eq!(config.min_capacity, 64);
        assert_eq!(config.low_bound, 0.2);
        assert_eq!(config.high_bound, 0.8);
        Ok(())
    }

    #[test]
    fn parse_json_with_comments() -> Result<(), MapError> {
        let text = r#"{
            // bucket floor
            "min_capacity": 32,
            "high_bound": 0.9
        }"#;
        let config = MapConfig::parse(text)?;
        assert_eq!(config.min_capacity, 32);
        assert_eq!(config.low_bound, MAP_LOW_BOUND);
        assert_eq!(config.high_bound, 0.9);
        Ok(())
    }

    #[test]
    fn reject_invalid_configs() {
        let bad = [
            MapConfig { min_capacity: 12, ..MapConfig::default() },
            MapConfig { min_capacity: 0, ..MapConfig::default() },
            MapConfig { min_capacity: 2, ..MapConfig::default() },
            MapConfig { min_capacity: 8, ..MapConfig::default() },
            MapConfig { low_bound: 0.0, ..MapConfig::default() },
            MapConfig { high_bound: 1.5, ..MapConfig::default() },
            MapConfig { low_bound: 0.5, high_bound: 0.75, ..MapConfig::default() },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(MapError::InvalidConfig(_))), "{:?}", config);
        }
        assert!(matches!(MapConfig::parse("not a config"), Err(MapError::InvalidConfig(_))));
    }

    #[test]
    fn load_falls_back_to_default() {
        assert_eq!(MapConfig::load(Some("./does/not/exist.toml")), MapConfig::default());

        let path = std::env::temp_dir().join(format!("hashmap_config_{}.toml", std::process::id()));
        let mut file = File::create(&path).unwrap();
        writeln!(file, "min_capacity = 7").unwrap();
        drop(file);
        assert_eq!(MapConfig::load(path.to_str()), MapConfig::default());

        let mut file = File::create(&path).unwrap();
        writeln!(file, "min_capacity = 128").unwrap();
        drop(file);
        assert_eq!(MapConfig::load(path.to_str()).min_capacity, 128);
        std::fs::remove_file(&path).unwrap();
    }
}
