// =============================================================================
// CONFIGURATION - Load settings from shader_build.toml
// =============================================================================
//
// Everything here is optional. A missing file means defaults, a broken file
// is reported and also means defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::shader::ShaderSet;

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "shader_build.toml";

/// Root configuration structure
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub shaders: ShadersConfig,
    pub compiler: CompilerConfig,
    pub build: BuildConfig,
    pub logging: LoggingConfig,
}

/// Which files count as shader sources and what their artifacts are called
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ShadersConfig {
    pub extensions: Vec<String>,
    pub output_extension: String,
}

impl Default for ShadersConfig {
    fn default() -> Self {
        let set = ShaderSet::default();
        Self {
            extensions: set.source_extensions().to_vec(),
            output_extension: set.output_extension().to_string(),
        }
    }
}

/// Arguments forwarded to glslc
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CompilerConfig {
    pub extra_args: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct BuildConfig {
    pub fail_fast: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default file when `None`,
    /// falling back to defaults on any error
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Self::load_from_path(path).unwrap_or_else(|e| {
            log::warn!("Failed to load {:?}: {:#}. Using defaults.", path, e);
            Config::default()
        })
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        log::info!("Loaded configuration from {:?}", path);
        log::debug!("Config: {:?}", config);

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Shader classification described by the `[shaders]` section
    pub fn shader_set(&self) -> ShaderSet {
        if self.shaders.extensions.is_empty() {
            log::warn!("No shader extensions configured, using the default set");
            return ShaderSet::default();
        }
        ShaderSet::new(
            self.shaders.extensions.iter().map(|ext| ext.trim_start_matches('.')),
            self.shaders.output_extension.trim_start_matches('.'),
        )
    }

    /// Parse the configured log level
    pub fn log_level(&self) -> log::LevelFilter {
        self.logging.level.parse().unwrap_or_else(|_| {
            log::warn!(
                "Unknown log level '{}', defaulting to info",
                self.logging.level
            );
            log::LevelFilter::Info
        })
    }
}
