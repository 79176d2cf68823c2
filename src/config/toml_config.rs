use crate::config::settings::{LeaderboardSettings, RunnerConfig, SessionSettings, WorldConfig};
use crate::domain::model::ScriptedInput;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{MamError, Result};
use crate::utils::validation::{validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardSettings,
    pub monitoring: Option<MonitoringConfig>,
    #[serde(default)]
    pub inputs: Vec<ScriptedInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    pub report_file: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            report_file: None,
        }
    }
}

fn default_output_path() -> String {
    "./output".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"))
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        let config: TomlConfig = toml::from_str(&processed)?;
        Ok(config)
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn world(&self) -> WorldConfig {
        self.world.clone()
    }

    fn runner(&self) -> RunnerConfig {
        self.runner.clone()
    }

    fn session(&self) -> SessionSettings {
        self.session.clone()
    }

    fn leaderboard(&self) -> LeaderboardSettings {
        self.leaderboard.clone()
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn report_file(&self) -> Option<&str> {
        self.output.report_file.as_deref()
    }

    fn inputs(&self) -> Vec<ScriptedInput> {
        self.inputs.clone()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.session.validate()?;
        self.world.validate()?;
        self.runner.validate()?;
        self.leaderboard.validate()?;
        validate_path("output.path", &self.output.path)?;
        if let Some(file) = &self.output.report_file {
            validate_path("output.report_file", file)?;
        }

        if let Some(input) = self
            .inputs
            .iter()
            .find(|input| input.tick >= self.session.max_ticks)
        {
            return Err(MamError::InvalidConfigValueError {
                field: "inputs.tick".to_string(),
                value: input.tick.to_string(),
                reason: format!(
                    "Input would never fire; session.max_ticks is {}",
                    self.session.max_ticks
                ),
            });
        }

        Ok(())
    }
}
