use crate::error::AppError;
use crate::storage::json_store::{DEFAULT_NOTES_FILE, DEFAULT_TASKS_FILE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKS_CONFIG_PATH";
const APP_DIR: &str = "tasks";
pub const DEFAULT_CREDENTIAL_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tasks_file: Option<PathBuf>,
    #[serde(default)]
    pub notes_file: Option<PathBuf>,
    #[serde(default)]
    pub generator: Option<GeneratorConfig>,
}

/// External program used as the text generator. It receives the prompt on
/// stdin and prints the generated text on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub command: Vec<String>,
    #[serde(default = "default_credential_env")]
    pub credential_env: String,
}

fn default_credential_env() -> String {
    DEFAULT_CREDENTIAL_ENV.to_string()
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub tasks_file: Option<PathBuf>,
    pub notes_file: Option<PathBuf>,
    pub credential_env: Option<String>,
}

/// Store locations after flags, overrides and the config file are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub tasks: PathBuf,
    pub notes: PathBuf,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::validation("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join(APP_DIR).join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::validation("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILE_NAME))
    }
}

/// Loads the config file, falling back to defaults. A missing file is not an
/// error; an unreadable or invalid one is reported alongside the defaults.
pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

pub fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path).map_err(|err| AppError::storage(path, err))?;
    let config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::malformed_document(path, format!("invalid config JSON: {err}"))
    })?;

    if let Some(generator) = config.generator.as_ref()
        && generator.command.is_empty()
    {
        return Err(AppError::malformed_document(
            path,
            "generator.command must name a program",
        ));
    }

    Ok(config)
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(path) = overrides.tasks_file.as_ref() {
        merged.tasks_file = Some(path.clone());
    }
    if let Some(path) = overrides.notes_file.as_ref() {
        merged.notes_file = Some(path.clone());
    }
    if let (Some(credential_env), Some(generator)) =
        (overrides.credential_env.as_ref(), merged.generator.as_mut())
    {
        generator.credential_env = credential_env.clone();
    }

    merged
}

/// Resolves both store paths. Explicit paths (CLI flags or their
/// environment variables) win over the config; notes default to a
/// `notes.json` beside the tasks file.
pub fn resolve_store_paths(
    config: &Config,
    tasks_flag: Option<&Path>,
    notes_flag: Option<&Path>,
) -> StorePaths {
    let tasks = tasks_flag
        .map(Path::to_path_buf)
        .or_else(|| config.tasks_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TASKS_FILE));

    let notes = notes_flag
        .map(Path::to_path_buf)
        .or_else(|| config.notes_file.clone())
        .unwrap_or_else(|| tasks.with_file_name(DEFAULT_NOTES_FILE));

    StorePaths { tasks, notes }
}
