use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_INPUT_FILE: &str = "/inputs/input.json";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid boolean value for {name}: '{value}'")]
    InvalidBool { name: String, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TerraformConfig {
    /// Directory holding the Terraform configuration to import into
    pub project_directory: PathBuf,
    /// Binary name or path, resolved through PATH
    pub binary_name: String,
    /// Write `backend.tf.json` from the provisioning context before importing
    pub write_backend: bool,
}

impl Default for TerraformConfig {
    fn default() -> Self {
        Self {
            project_directory: PathBuf::from("."),
            binary_name: "terraform".to_string(),
            write_backend: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub dry_run: bool,
    pub input_file: PathBuf,
    pub terraform: TerraformConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dry_run: false,
            input_file: PathBuf::from(DEFAULT_INPUT_FILE),
            terraform: TerraformConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(val) = non_empty("DRY_RUN") {
            config.dry_run = parse_bool("DRY_RUN", &val)?;
        }
        if let Some(path) = non_empty("ER_INPUT_FILE") {
            config.input_file = PathBuf::from(path);
        }
        if let Some(dir) = non_empty("TERRAFORM_DIR") {
            config.terraform.project_directory = PathBuf::from(dir);
        }
        if let Some(name) = non_empty("TERRAFORM_BINARY_NAME") {
            config.terraform.binary_name = name;
        }
        if let Some(val) = non_empty("ER_WRITE_BACKEND") {
            config.terraform.write_backend = parse_bool("ER_WRITE_BACKEND", &val)?;
        }

        Ok(config)
    }
}

/// Parse a bool-like environment value
pub fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.dry_run);
        assert_eq!(config.input_file, PathBuf::from(DEFAULT_INPUT_FILE));
        assert_eq!(config.terraform.binary_name, "terraform");
    }

    #[test]
    fn test_env_overrides() {
        let config = load(&[
            ("DRY_RUN", "True"),
            ("ER_INPUT_FILE", "/tmp/input.json"),
            ("TERRAFORM_DIR", "/work/module"),
            ("TERRAFORM_BINARY_NAME", "tofu"),
            ("ER_WRITE_BACKEND", "yes"),
        ])
        .unwrap();

        assert!(config.dry_run);
        assert_eq!(config.input_file, PathBuf::from("/tmp/input.json"));
        assert_eq!(
            config.terraform.project_directory,
            PathBuf::from("/work/module")
        );
        assert_eq!(config.terraform.binary_name, "tofu");
        assert!(config.terraform.write_backend);
    }

    #[test]
    fn test_parse_bool() {
        for value in ["1", "true", "True", "TRUE", "t", "yes", "Y", "on"] {
            assert_eq!(parse_bool("DRY_RUN", value), Ok(true), "{}", value);
        }
        for value in ["0", "false", "False", "f", "no", "N", "off"] {
            assert_eq!(parse_bool("DRY_RUN", value), Ok(false), "{}", value);
        }
    }

    #[test]
    fn test_invalid_bool() {
        let err = load(&[("DRY_RUN", "maybe")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidBool {
                name: "DRY_RUN".to_string(),
                value: "maybe".to_string()
            }
        );
    }
}
