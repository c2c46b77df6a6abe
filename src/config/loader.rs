// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::new()
//!   .add_yaml_file(req)
//!   .add_yaml_file_optional(opt)
//!   .add_yaml_str()
//!   .with_env_prefix()
//!   .set()
//!        |
//!        v
//!    build() --> SyncConfig (validated)
//! ```

use std::path::PathBuf;

use super::SyncConfig;
use crate::error::{ConfigError, Result};

/// Builder for loading configuration from multiple sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    files: Vec<(String, PathBuf)>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            files: Vec::new(),
        }
    }

    /// Adds a YAML configuration file to the loader.
    ///
    /// The file will be read when `build()` is called. If the file doesn't exist
    /// or contains invalid YAML, `build()` will return an error.
    #[must_use]
    pub fn add_yaml_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Yaml).required(true));
        self.files.push(("file".to_string(), p.to_path_buf()));
        self
    }

    #[must_use]
    pub fn add_yaml_file_optional<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Yaml).required(false));
        if p.exists() {
            self.files.push(("optional".to_string(), p.to_path_buf()));
        }
        self
    }

    #[must_use]
    pub fn add_yaml_str(mut self, content: &str) -> Self {
        use config::{File, FileFormat};
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Yaml));
        self.files
            .push(("string".to_string(), PathBuf::from("<string>")));
        self
    }

    /// Reads overrides from `<PREFIX>__<KEY>__<SUBKEY>` environment variables.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Sets a configuration override.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or if the value cannot be converted
    /// to a configuration value.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
        Ok(self)
    }

    /// Applies `key=value` overrides as given on the command line.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an entry without `=`.
    pub fn set_all(self, overrides: &[String]) -> Result<Self> {
        overrides.iter().try_fold(self, |loader, entry| {
            let (key, value) = entry.split_once('=').ok_or_else(|| ConfigError::InvalidValue {
                section: "--set".to_string(),
                key: entry.clone(),
                message: "expected KEY=VALUE".to_string(),
            })?;
            loader.set(key.trim(), value.trim())
        })
    }

    /// Builds the configuration from all added sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required configuration files are missing.
    /// - Configuration files have invalid YAML syntax.
    /// - The merged configuration cannot be deserialized into `SyncConfig`.
    /// - The configuration fails validation.
    pub fn build(self) -> Result<SyncConfig> {
        let sources = self.source_list();
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("__")
                    .separator("__"),
            ),
            None => self.builder,
        };
        let parse_error = |e: config::ConfigError| ConfigError::ParseError {
            path: sources.clone(),
            message: e.to_string(),
        };
        let cfg = builder.build().map_err(parse_error)?;
        let config: SyncConfig = cfg.try_deserialize().map_err(parse_error)?;
        config.validate()?;
        Ok(config)
    }

    fn source_list(&self) -> String {
        self.files
            .iter()
            .map(|(_, path)| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    #[must_use]
    pub fn loaded_files(&self) -> Vec<(String, PathBuf)> {
        self.files.clone()
    }

    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, (source, path))| format!("{}. [{}] {}", i + 1, source, path.display()))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
