//! Runtime settings resolved from env files and the process environment.
//!
//! Precedence, lowest first: `<root>/.env`, `<ENV_PATH>/.env`,
//! `<ENV_PATH>/.env.secret`, then the process environment.

use std::collections::HashMap;
use std::ffi::OsString;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Deployment tiers and the directory holding each tier's env files.
const ENV_DIRS: &[(&str, &str)] = &[
    ("dev", "."),
    ("prod", "/app/storage"),
    ("staging", "/app/storage"),
];

const DEFAULT_ENV: &str = "dev";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_file: String,
    pub template_folder: PathBuf,
    pub debug: bool,
    pub host: IpAddr,
    pub port: u16,
}

impl Config {
    /// Resolves settings for the current working directory and environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(Path::new("."), utf8_vars(std::env::vars_os()))
    }

    pub fn resolve(
        root: &Path,
        process_env: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, ConfigError> {
        let vars = resolve_vars(root, &process_env.into_iter().collect())?;
        Self::from_vars(&vars)
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| {
            vars.get(key)
                .map(String::as_str)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        };

        let host = get("HOST", "0.0.0.0");
        let port = get("PORT", "5000");

        Ok(Config {
            database_file: get("DATABASE_FILE", "todos.db"),
            template_folder: PathBuf::from(get("TEMPLATE_FOLDER", "templates")),
            debug: is_truthy(&get("DEBUG", "False")),
            host: host.parse().map_err(|_| ConfigError::Invalid {
                key: "HOST",
                value: host.clone(),
            })?,
            port: port.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: port.clone(),
            })?,
        })
    }
}

/// Produces the flat variable mapping after applying every layer.
pub fn resolve_vars(
    root: &Path,
    process_env: &HashMap<String, String>,
) -> Result<HashMap<String, String>, ConfigError> {
    let mut base = read_env_file(&root.join(".env"))?;
    base.extend(process_env.clone());

    let mut env = base
        .get("ENV")
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| DEFAULT_ENV.to_string());
    if tier_dir(&env).is_none() {
        env = DEFAULT_ENV.to_string();
    }
    let default_dir = tier_dir(&env).unwrap_or(".");
    let env_path = match base.get("ENV_PATH") {
        Some(path) if ENV_DIRS.iter().any(|(_, dir)| *dir == path.as_str()) => path.clone(),
        _ => default_dir.to_string(),
    };

    let dir = root.join(&env_path);
    let mut vars = base;
    vars.extend(read_env_file(&dir.join(".env"))?);
    vars.extend(read_env_file(&dir.join(".env.secret"))?);
    vars.extend(process_env.clone());

    // The tier actually used, not whatever was asked for.
    vars.insert("ENV".to_string(), env);
    vars.insert("ENV_PATH".to_string(), env_path);
    Ok(vars)
}

/// Keeps only variables whose name and value are both valid UTF-8.
fn utf8_vars(
    vars: impl IntoIterator<Item = (OsString, OsString)>,
) -> impl Iterator<Item = (String, String)> {
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

fn tier_dir(env: &str) -> Option<&'static str> {
    ENV_DIRS
        .iter()
        .find(|(name, _)| *name == env)
        .map(|(_, dir)| *dir)
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Reads a dotenv file. A missing file yields no variables.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let env_error = |source| ConfigError::EnvFile {
        path: path.display().to_string(),
        source,
    };
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) if err.not_found() => return Ok(HashMap::new()),
        Err(err) => return Err(env_error(err)),
    };
    iter.collect::<Result<HashMap<_, _>, _>>().map_err(env_error)
}
