use arcwheel::portfolio::{Portfolio, PortfolioError};
use arcwheel::{LayoutParams, ParamError, RotationParams, WheelSizing};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::f64::consts::{FRAC_PI_2, PI};
use std::path::{Path, PathBuf};
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

/// Edge of the wheel where the first segment begins.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum StartEdge {
    #[default]
    #[strum(serialize = "top", serialize = "t", serialize = "north")]
    Top,
    #[strum(serialize = "right", serialize = "r", serialize = "east")]
    Right,
    #[strum(serialize = "bottom", serialize = "b", serialize = "south")]
    Bottom,
    #[strum(serialize = "left", serialize = "l", serialize = "west")]
    Left,
}

impl StartEdge {
    /// Screen angle of the edge (y grows downward).
    pub fn angle(&self) -> f64 {
        match self {
            Self::Top => -FRAC_PI_2,
            Self::Right => 0.0,
            Self::Bottom => FRAC_PI_2,
            Self::Left => PI,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub open_command: String,
    pub start_edge: StartEdge,
    pub portfolio: Option<PathBuf>,
    pub layout: LayoutParams,
    pub rotation: RotationParams,
    pub wheel: WheelSizing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            open_command: DEFAULT_OPEN_COMMAND.to_string(),
            start_edge: StartEdge::default(),
            portfolio: None,
            layout: LayoutParams::default(),
            rotation: RotationParams::default(),
            wheel: WheelSizing::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ParamError> {
        self.layout.validate()?;
        self.rotation.validate()?;
        self.wheel.validate()
    }

    /// Rotation settings with the start edge folded into the initial offset.
    pub fn rotation_params(&self) -> RotationParams {
        RotationParams {
            initial_offset: self.start_edge.angle() + self.rotation.initial_offset,
            ..self.rotation
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid setting: {0}")]
    Invalid(#[from] ParamError),
}

pub const DEFAULT_OPEN_COMMAND: &str =
    "xdg-open \"https://app.orbit.invest/properties/{property}\"";

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("org", "orbit", "orbit").ok_or(ConfigError::ConfigDirNotFound)
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

pub fn get_portfolio_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.config_dir().join("portfolio.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&get_config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("ORBIT").separator("__"))
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default settings: {}", e);
            Config::default()
        }
    }
}

/// Picks the portfolio file: explicit override, then the config entry, then the default.
pub fn resolve_portfolio_path(cli: Option<PathBuf>, config: &Config) -> Option<PathBuf> {
    cli.or_else(|| config.portfolio.clone())
        .or_else(|| get_portfolio_path().ok())
}

/// The portfolio file after a settings change, when it differs from `current`.
pub fn moved_portfolio_path(
    current: Option<&Path>,
    cli: Option<&Path>,
    config: &Config,
) -> Option<PathBuf> {
    resolve_portfolio_path(cli.map(Path::to_path_buf), config)
        .filter(|p| Some(p.as_path()) != current)
}

pub fn load_portfolio(path: &Path) -> Result<Portfolio, PortfolioError> {
    let portfolio = Portfolio::load(path)?;
    log::info!(
        "Loaded {} investments from {}",
        portfolio.investments.len(),
        path.display()
    );
    Ok(portfolio)
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

fn watch_parent(watcher: &mut RecommendedWatcher, file: &Path) {
    let Some(dir) = file.parent() else {
        return;
    };
    if let Err(e) = fs_err::create_dir_all(dir) {
        log::error!("Failed to create {} for watching: {}", dir.display(), e);
        return;
    }
    if let Err(e) = watcher.watch(dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch {}: {}", dir.display(), e);
    }
}

/// Forwards changes to the config file and the portfolio file to the UI. The portfolio
/// file is re-resolved whenever the settings change, with `cli_portfolio` taking priority.
pub async fn run_async_watcher(tx: Sender<AppEvent>, cli_portfolio: Option<PathBuf>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };

    let mut portfolio_path = resolve_portfolio_path(cli_portfolio.clone(), &load_or_default());

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    watch_parent(&mut watcher, &config_path);
    if let Some(path) = portfolio_path
        .as_deref()
        .filter(|p| p.parent() != config_path.parent())
    {
        watch_parent(&mut watcher, path);
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );
                if !meaningful_event {
                    continue;
                }

                let touches = |target: &Path| event.paths.iter().any(|p| p == target);
                let mut reloads = Vec::new();
                if touches(config_path.as_path()) {
                    reloads.push(AppEvent::ConfigReload);
                    if let Ok(config) = load_config() {
                        let moved = moved_portfolio_path(
                            portfolio_path.as_deref(),
                            cli_portfolio.as_deref(),
                            &config,
                        );
                        if let Some(path) = moved {
                            watch_parent(&mut watcher, &path);
                            portfolio_path = Some(path);
                        }
                    }
                }
                if portfolio_path.as_deref().is_some_and(touches) {
                    reloads.push(AppEvent::PortfolioReload);
                }

                for reload in reloads {
                    if tx.send(reload).await.is_err() {
                        return;
                    }
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_start_edge_deserialization() {
        let cases = vec![
            ("\"top\"", StartEdge::Top),
            ("\"Top\"", StartEdge::Top),
            ("\"T\"", StartEdge::Top),
            ("\"north\"", StartEdge::Top),
            ("\"r\"", StartEdge::Right),
            ("\"BOTTOM\"", StartEdge::Bottom),
            ("\"west\"", StartEdge::Left),
        ];

        for (json, expected) in cases {
            let deserialized: StartEdge = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert!(serde_json::from_str::<StartEdge>("\"up\"").is_err());
    }

    #[test]
    fn test_default_config_file_matches_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(DEFAULT_CONFIG.as_bytes()).unwrap();

        let loaded = load_config_from(file.path()).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(b"start_edge = \"left\"\n[layout]\ngap = 0.2\n")
            .unwrap();

        let loaded = load_config_from(file.path()).unwrap();
        assert_eq!(loaded.start_edge, StartEdge::Left);
        assert_eq!(loaded.layout.gap, 0.2);
        assert_eq!(loaded.layout.min_arc, LayoutParams::default().min_arc);
        assert_eq!(loaded.wheel, WheelSizing::default());
    }

    #[test]
    fn test_invalid_friction_is_rejected() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(b"[rotation]\nfriction = 1.5\n").unwrap();

        let err = load_config_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ParamError::Friction(_))));
    }

    #[test]
    fn test_portfolio_path_follows_settings() {
        let current = PathBuf::from("/data/old.toml");
        let config = Config {
            portfolio: Some(PathBuf::from("/data/new.toml")),
            ..Config::default()
        };

        assert_eq!(
            moved_portfolio_path(Some(&current), None, &config),
            Some(PathBuf::from("/data/new.toml"))
        );
        assert_eq!(
            moved_portfolio_path(Some(Path::new("/data/new.toml")), None, &config),
            None
        );
    }

    #[test]
    fn test_cli_portfolio_overrides_settings() {
        let cli = PathBuf::from("/tmp/cli.toml");
        let config = Config {
            portfolio: Some(PathBuf::from("/data/new.toml")),
            ..Config::default()
        };

        assert_eq!(
            resolve_portfolio_path(Some(cli.clone()), &config),
            Some(cli.clone())
        );
        assert_eq!(moved_portfolio_path(Some(&cli), Some(&cli), &config), None);
    }

    #[test]
    fn test_rotation_params_include_start_edge() {
        let config = Config {
            start_edge: StartEdge::Bottom,
            ..Config::default()
        };
        assert_eq!(config.rotation_params().initial_offset, FRAC_PI_2);
    }
}
