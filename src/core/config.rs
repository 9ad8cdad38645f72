use std::env;
use std::path::PathBuf;

/// Default location of the YAML store, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

pub const DEFAULT_SLACK_API_BASE_URL: &str = "https://slack.com/api";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub slack_api_base_url: String,
}

impl AppConfig {
    /// Read process settings from the environment, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but is not valid unicode.
    pub fn from_env() -> Result<Self, String> {
        let config_path = match env::var("SLACK_TOOLS_CONFIG") {
            Ok(path) => PathBuf::from(path),
            Err(env::VarError::NotPresent) => PathBuf::from(DEFAULT_CONFIG_PATH),
            Err(e) => return Err(format!("SLACK_TOOLS_CONFIG: {e}")),
        };
        let slack_api_base_url = match env::var("SLACK_API_BASE_URL") {
            Ok(url) => url.trim_end_matches('/').to_string(),
            Err(env::VarError::NotPresent) => DEFAULT_SLACK_API_BASE_URL.to_string(),
            Err(e) => return Err(format!("SLACK_API_BASE_URL: {e}")),
        };

        Ok(Self {
            config_path,
            slack_api_base_url,
        })
    }
}
