use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable pointing at an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "CEPWEATHER_CONFIG";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a summary of all errors, joined with `; `
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Behaviour shared by the per-service configuration structs.
///
/// Values are layered: serde defaults, then an optional TOML file, then
/// environment variables. Empty environment variables count as unset.
pub trait ServiceConfig: Default + DeserializeOwned {
    /// Service name, used for the default config file name
    const NAME: &'static str;

    /// Apply overrides from an environment lookup
    fn apply_env(&mut self, env: &dyn Fn(&str) -> Option<String>);

    /// Validate the configuration
    fn validate(&self) -> ValidationResult;

    /// Load configuration from file (if present) and the process environment
    fn load() -> Result<Self, ConfigError> {
        let mut config = match config_path(Self::NAME) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        config.apply_env(&|key| std::env::var(key).ok().filter(|v| !v.is_empty()));
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged. Returns an error if validation fails.
    fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        let validation = config.validate();

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        Ok(config)
    }

    /// Parse a TOML configuration file
    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("Loaded {} config from {}", Self::NAME, path.display());
        Ok(toml::from_str(&contents)?)
    }
}

/// Path of the configuration file for a service.
///
/// `$CEPWEATHER_CONFIG` wins; otherwise `<config dir>/cepweather/<name>.toml`.
pub fn config_path(name: &str) -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_PATH_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(explicit));
    }

    dirs::config_dir().map(|dir| dir.join("cepweather").join(format!("{}.toml", name)))
}

/// Socket address to bind for a port setting.
///
/// Accepts both `8080` and `:8080`.
pub fn listen_addr(port: &str) -> String {
    format!("0.0.0.0:{}", port.trim_start_matches(':'))
}

/// Resolution service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Listen port
    pub port: String,

    /// ViaCEP base URL
    pub viacep_base_url: String,

    /// WeatherAPI base URL
    pub weather_api_base_url: String,

    /// WeatherAPI key (required)
    pub weather_api_key: String,

    /// Timeout for each upstream HTTP request, in seconds
    pub request_timeout_secs: u64,

    /// Deadline for a whole resolution (both upstream calls), in seconds
    pub resolve_deadline_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: "8080".to_string(),
            viacep_base_url: "https://viacep.com.br/ws".to_string(),
            weather_api_base_url: "https://api.weatherapi.com/v1".to_string(),
            weather_api_key: String::new(),
            request_timeout_secs: 5,
            resolve_deadline_secs: 10,
        }
    }
}

impl ServiceConfig for ApiConfig {
    const NAME: &'static str = "api";

    fn apply_env(&mut self, env: &dyn Fn(&str) -> Option<String>) {
        if let Some(port) = env("PORT") {
            self.port = port;
        }
        if let Some(url) = env("VIACEP_BASE_URL") {
            self.viacep_base_url = url;
        }
        if let Some(url) = env("WEATHER_API_BASE_URL") {
            self.weather_api_base_url = url;
        }
        if let Some(key) = env("WEATHER_API_KEY") {
            self.weather_api_key = key;
        }
        apply_timeout_env(&mut self.request_timeout_secs, "REQUEST_TIMEOUT_SECS", env);
        apply_timeout_env(&mut self.resolve_deadline_secs, "RESOLVE_DEADLINE_SECS", env);
    }

    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_port(&self.port, &mut result);
        validate_url(&self.viacep_base_url, "viacep_base_url", &mut result);
        validate_url(&self.weather_api_base_url, "weather_api_base_url", &mut result);

        if self.weather_api_key.trim().is_empty() {
            result.add_error(
                "weather_api_key",
                "WEATHER_API_KEY environment variable is required",
            );
        }

        validate_timeout(self.request_timeout_secs, "request_timeout_secs", &mut result);
        validate_timeout(self.resolve_deadline_secs, "resolve_deadline_secs", &mut result);

        if self.resolve_deadline_secs < self.request_timeout_secs {
            result.add_warning(
                "resolve_deadline_secs",
                "Deadline is shorter than a single upstream request timeout",
            );
        }

        result
    }
}

/// Intake service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Listen port
    pub port: String,

    /// Base URL of the resolution service
    pub service_b_url: String,

    /// Timeout for the forwarded request, in seconds
    pub request_timeout_secs: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            port: "8081".to_string(),
            service_b_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl ServiceConfig for InputConfig {
    const NAME: &'static str = "input";

    fn apply_env(&mut self, env: &dyn Fn(&str) -> Option<String>) {
        if let Some(port) = env("PORT") {
            self.port = port;
        }
        if let Some(url) = env("SERVICE_B_URL") {
            self.service_b_url = url;
        }
        apply_timeout_env(&mut self.request_timeout_secs, "REQUEST_TIMEOUT_SECS", env);
    }

    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_port(&self.port, &mut result);
        validate_url(&self.service_b_url, "service_b_url", &mut result);
        validate_timeout(self.request_timeout_secs, "request_timeout_secs", &mut result);
        result
    }
}

fn apply_timeout_env(target: &mut u64, key: &str, env: &dyn Fn(&str) -> Option<String>) {
    if let Some(raw) = env(key) {
        match raw.trim().parse() {
            Ok(secs) => *target = secs,
            Err(_) => tracing::warn!("Ignoring {}={:?}: not a number of seconds", key, raw),
        }
    }
}

fn validate_port(port: &str, result: &mut ValidationResult) {
    match port.trim_start_matches(':').parse::<u16>() {
        Ok(0) => result.add_error("port", "Port cannot be 0"),
        Ok(_) => {}
        Err(_) => result.add_error("port", format!("Invalid port: {:?}", port)),
    }
}

fn validate_timeout(secs: u64, field_name: &str, result: &mut ValidationResult) {
    if secs == 0 {
        result.add_error(field_name, "Timeout must be greater than 0");
    } else if secs > 60 {
        result.add_warning(field_name, "Timeout is unusually long (>60 seconds)");
    }
}

/// Validate a URL field
fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}
