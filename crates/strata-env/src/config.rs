//! Options loading with multi-source merging
//!
//! [`EnvOptions`] are resolved from, lowest precedence first:
//! 1. Built-in defaults
//! 2. An optional TOML file (flat keys, e.g. `use_direct_reads = true`)
//! 3. Environment variables (`STRATA_*`, e.g. `STRATA_BYTES_PER_SYNC=1048576`)

use std::path::{Path, PathBuf};

use strata_io::EnvOptions;

use crate::ConfigError;

/// Options loader with builder pattern
#[derive(Debug, Clone)]
pub struct OptionsLoader {
    file: Option<PathBuf>,
    env_prefix: String,
}

impl OptionsLoader {
    /// Create a loader that reads only defaults and `STRATA_*` variables
    pub fn new() -> Self {
        Self {
            file: None,
            env_prefix: "STRATA".to_string(),
        }
    }

    /// Layer a TOML file over the defaults. The file must exist.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix (default: "STRATA")
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load options from all sources with proper precedence
    pub fn load(self) -> Result<EnvOptions, ConfigError> {
        let defaults = EnvOptions::default();
        let mut builder = config::Config::builder().add_source(config::Config::try_from(&defaults)?);

        if let Some(path) = self.file {
            if !path.exists() {
                return Err(ConfigError::MissingFile { path });
            }
            builder = builder.add_source(
                config::File::from(path)
                    .required(true)
                    .format(config::FileFormat::Toml),
            );
        }

        // Field names contain '_', so nesting uses "__".
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let options: EnvOptions = builder.build()?.try_deserialize()?;
        tracing::debug!(?options, "loaded env options");
        Ok(options)
    }

    /// Parse options from an inline TOML document; missing keys keep defaults
    pub fn from_toml_str(document: &str) -> Result<EnvOptions, ConfigError> {
        Ok(toml::from_str(document)?)
    }
}

impl Default for OptionsLoader {
    fn default() -> Self {
        Self::new()
    }
}
