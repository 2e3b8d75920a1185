//! Game configuration, loadable from TOML.
//!
//! Every field is optional; missing ones take the defaults below.
//!
//! ```toml
//! fps  = 10
//! seed = 1234
//!
//! [grid]
//! width     = 600
//! height    = 600
//! cell_size = 20
//!
//! [speed]
//! base_cadence = 15
//! increment    = 2
//! min_cadence  = 3
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use snake_grid::{Grid, GridError, SpeedCurve};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] GridError),

    #[error("fps must be at least 1")]
    ZeroFps,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid:  Grid,
    pub speed: SpeedCurve,
    /// Ticks per second delivered by the frame source.
    pub fps:   u32,
    /// Food placement seed; entropy when absent.
    pub seed:  Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid:  Grid::default(),
            speed: SpeedCurve::default(),
            fps:   10,
            seed:  None,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.speed.validate()?;
        if self.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        Ok(())
    }

    /// Wall-clock time between ticks.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.grid.width, 600);
        assert_eq!(cfg.speed.base_cadence, 15);
        assert_eq!(cfg.frame_interval(), Duration::from_millis(100));
    }

    #[test]
    fn partial_tables_merge_with_defaults() {
        let cfg = GameConfig::from_toml_str(
            r#"
            seed = 99
            [grid]
            cell_size = 30
            [speed]
            min_cadence = 5
            "#,
        ).unwrap();
        assert_eq!(cfg.seed, Some(99));
        assert_eq!(cfg.grid, Grid { width: 600, height: 600, cell_size: 30 });
        assert_eq!(cfg.speed.min_cadence, 5);
        assert_eq!(cfg.speed.base_cadence, 15);
    }

    #[test]
    fn invalid_grid_rejected() {
        let err = GameConfig::from_toml_str("[grid]\ncell_size = 7").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(GridError::InvalidGeometry { .. })));
    }

    #[test]
    fn zero_fps_rejected() {
        assert!(matches!(GameConfig::from_toml_str("fps = 0"), Err(ConfigError::ZeroFps)));
    }

    #[test]
    fn zero_min_cadence_rejected() {
        let err = GameConfig::from_toml_str("[speed]\nmin_cadence = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(GridError::InvalidSpeedCurve(_))));
    }

    #[test]
    fn syntax_error_reported() {
        assert!(matches!(GameConfig::from_toml_str("fps = = 3"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fps = 30\n[grid]\nwidth = 400\nheight = 200").unwrap();
        let cfg = GameConfig::load(file.path()).unwrap();
        assert_eq!(cfg.fps, 30);
        assert_eq!(cfg.grid.columns(), 20);
        assert_eq!(cfg.grid.rows(), 10);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GameConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
