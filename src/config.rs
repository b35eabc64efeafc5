use crate::error::ConfigError;
use crate::generators::GeneratorConfig;
use crate::grids::Position;
use crate::playback::PlaybackConfig;
use crate::solver::{DEFAULT_SOLVER_URL, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub board: BoardConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Marker overrides; unset markers keep the board defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub start: Option<Position>,
    #[serde(default)]
    pub goal: Option<Position>,
}

fn default_url() -> String {
    DEFAULT_SOLVER_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Defaults when no path is given.
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load(path),
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod test_config {
    use super::*;
    use crate::grids::TerrainKind;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.generator.imperfection_count, 20);
        assert_eq!(config.generator.terrain_features.len(), 3);
        assert_eq!(config.playback.path_delay_ms, 50);
        assert_eq!(config.playback.search_delay_ms, 10);
        assert_eq!(config.solver.url, "http://127.0.0.1:5000");
        assert_eq!(config.solver.timeout(), Duration::from_secs(10));
        assert_eq!(config.board, BoardConfig::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_sections() {
        let config: Config = toml::from_str(
            r#"
            [generator]
            seed = 7

            [playback]
            path_delay_ms = 120

            [solver]
            url = "http://solver.local:8080"

            [board]
            start = [1, 1]
            "#,
        )
        .unwrap();

        assert_eq!(config.generator.seed, Some(7));
        assert_eq!(config.generator.imperfection_count, 20);
        assert_eq!(config.playback.path_delay_ms, 120);
        assert_eq!(config.playback.search_delay_ms, 10);
        assert_eq!(config.solver.url, "http://solver.local:8080");
        assert_eq!(config.solver.timeout_secs, 10);
        assert_eq!(config.board.start, Some((1, 1)));
        assert_eq!(config.board.goal, None);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let mut config = Config::default();
        config.generator.terrain_features[0].kind = TerrainKind::Forest;
        config.board.goal = Some((3, 4));

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_bad_files() {
        assert!(matches!(
            load(Path::new("/nonexistent/maze-viz.toml")),
            Err(ConfigError::Io(_))
        ));
        assert!(matches!(
            toml::from_str::<Config>("[generator]\nimperfection_count = \"many\"")
                .map_err(ConfigError::from),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(load_or_default(None).unwrap(), Config::default());
    }
}
