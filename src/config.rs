//! Configuration management for the easycmd binary.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::execution::{CmdBuilder, CommandLine};
use crate::trace::TracingTracer;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Execution settings.
    pub execution: ExecutionSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Execution configuration section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionSection {
    /// Working directory; unset means the current directory.
    pub dir: Option<PathBuf>,
    /// Timeout in milliseconds; 0 disables it.
    pub timeout_ms: u64,
    /// `KEY=VALUE` entries replacing the inherited environment.
    pub env: Vec<String>,
    /// Shell wrapping applied to every command.
    pub shell: ShellMode,
    /// Print execution diagnostics to stderr.
    pub debug: bool,
}

/// How a command string is handed to the OS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellMode {
    /// Parse the string and run the program directly.
    #[default]
    None,
    /// Wrap with `bash -c`.
    Bash,
    /// Wrap with `powershell.exe -Command`.
    Powershell,
}

impl ShellMode {
    /// Apply this wrapping to a command.
    pub fn wrap(self, command: CommandLine) -> CommandLine {
        match self {
            Self::None => command,
            Self::Bash => command.shell_command(),
            Self::Powershell => command.powershell_command(),
        }
    }
}

impl FromStr for ShellMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "bash" | "sh" => Ok(Self::Bash),
            "powershell" | "pwsh" => Ok(Self::Powershell),
            _ => Err(ConfigError::InvalidValue("shell", s.to_string())),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Values that do not parse are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("EASYCMD_DIR") {
            self.execution.dir = Some(PathBuf::from(dir));
        }

        if let Some(timeout) = lookup("EASYCMD_TIMEOUT_MS") {
            if let Ok(timeout) = timeout.parse() {
                self.execution.timeout_ms = timeout;
            }
        }

        if let Some(shell) = lookup("EASYCMD_SHELL") {
            if let Ok(shell) = shell.parse() {
                self.execution.shell = shell;
            }
        }

        if let Some(debug) = lookup("EASYCMD_DEBUG") {
            self.execution.debug = matches!(debug.as_str(), "1" | "true" | "yes");
        }

        if let Some(level) = lookup("EASYCMD_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Some(level) = lookup("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref dir) = args.dir {
            self.execution.dir = Some(dir.clone());
        }

        if let Some(shell) = args.shell {
            self.execution.shell = shell;
        }

        if let Some(timeout) = args.timeout {
            self.execution.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        }

        if !args.env.is_empty() {
            self.execution.env = args.env.clone();
        }

        if args.debug {
            self.execution.debug = true;
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut config = Config::default();

        // Load from config file if specified
        if let Some(ref path) = args.config {
            config = Config::from_file(path)?;
        }

        // Apply environment variable overrides
        config.apply_env();

        // Apply CLI argument overrides (highest priority)
        config.apply_args(args);

        Ok(config)
    }

    /// Executor builder for these settings.
    ///
    /// Diagnostics go to stderr with `debug`; otherwise lifecycle events
    /// are forwarded to the log.
    pub fn to_builder(&self) -> CmdBuilder {
        let mut builder = CmdBuilder::new()
            .env(self.execution.env.iter().cloned())
            .timeout_millis(self.execution.timeout_ms);

        if let Some(ref dir) = self.execution.dir {
            builder = builder.dir(dir);
        }

        if self.execution.debug {
            builder.debug()
        } else {
            builder.tracer(TracingTracer)
        }
    }

    /// Apply the configured shell wrapping to a command string.
    pub fn command(&self, command_line: impl Into<String>) -> CommandLine {
        self.execution.shell.wrap(CommandLine::new(command_line))
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// Invalid setting value.
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::InvalidValue(name, value) => write!(f, "invalid {}: '{}'", name, value),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.execution.dir.is_none());
        assert_eq!(config.execution.timeout_ms, 0);
        assert_eq!(config.execution.shell, ShellMode::None);
        assert!(!config.execution.debug);
        assert_eq!(config.log_filter(), "warn");
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "execution": {
                "dir": "/srv/app",
                "timeout_ms": 1500,
                "env": ["A=1", "B=2"],
                "shell": "bash",
                "debug": true
            },
            "logging": {
                "level": "debug"
            }
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.execution.dir, Some(PathBuf::from("/srv/app")));
        assert_eq!(config.execution.timeout_ms, 1500);
        assert_eq!(config.execution.env, ["A=1", "B=2"]);
        assert_eq!(config.execution.shell, ShellMode::Bash);
        assert!(config.execution.debug);
        assert_eq!(config.log_filter(), "debug");
    }

    #[test]
    fn test_config_partial_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"execution": {"timeout_ms": 10}}"#)
            .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.execution.timeout_ms, 10);
        assert_eq!(config.execution.shell, ShellMode::None); // Default
        assert_eq!(config.log_filter(), "warn"); // Default
    }

    #[test]
    fn test_config_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn test_config_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/easycmd.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_apply_env() {
        let mut config = Config::default();
        config.apply_env_from(env_of(&[
            ("EASYCMD_DIR", "/work"),
            ("EASYCMD_TIMEOUT_MS", "250"),
            ("EASYCMD_SHELL", "PowerShell"),
            ("EASYCMD_DEBUG", "1"),
            ("RUST_LOG", "trace"),
        ]));

        assert_eq!(config.execution.dir, Some(PathBuf::from("/work")));
        assert_eq!(config.execution.timeout_ms, 250);
        assert_eq!(config.execution.shell, ShellMode::Powershell);
        assert!(config.execution.debug);
        assert_eq!(config.log_filter(), "trace");
    }

    #[test]
    fn test_apply_env_ignores_bad_values() {
        let mut config = Config::default();
        config.execution.timeout_ms = 99;
        config.apply_env_from(env_of(&[
            ("EASYCMD_TIMEOUT_MS", "soon"),
            ("EASYCMD_SHELL", "fish"),
            ("EASYCMD_LOG_LEVEL", "info"),
            ("RUST_LOG", "trace"),
        ]));

        assert_eq!(config.execution.timeout_ms, 99);
        assert_eq!(config.execution.shell, ShellMode::None);
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn test_apply_args() {
        let mut config = Config::default();
        config.execution.env = vec!["FROM_FILE=1".to_string()];

        let args = Args {
            dir: Some(PathBuf::from("/tmp")),
            shell: Some(ShellMode::Bash),
            timeout: Some(Duration::from_secs(2)),
            debug: true,
            log_level: Some("debug".to_string()),
            ..Args::default()
        };
        config.apply_args(&args);

        assert_eq!(config.execution.dir, Some(PathBuf::from("/tmp")));
        assert_eq!(config.execution.shell, ShellMode::Bash);
        assert_eq!(config.execution.timeout_ms, 2000);
        assert_eq!(config.execution.env, ["FROM_FILE=1"]);
        assert!(config.execution.debug);
        assert_eq!(config.log_filter(), "debug");
    }

    #[test]
    fn test_to_builder() {
        let config = Config {
            execution: ExecutionSection {
                dir: Some(PathBuf::from("/srv")),
                timeout_ms: 750,
                env: vec!["X=1".to_string()],
                ..ExecutionSection::default()
            },
            ..Config::default()
        };

        let run = config.to_builder().into_config();
        assert_eq!(run.dir(), Some(Path::new("/srv")));
        assert_eq!(run.timeout(), Some(Duration::from_millis(750)));
        assert_eq!(run.env(), ["X=1"]);
    }

    #[test]
    fn test_shell_mode_wrapping() {
        let mut config = Config::default();
        assert_eq!(config.command("ls -la").as_str(), "ls -la");

        config.execution.shell = ShellMode::Bash;
        assert_eq!(config.command("ls | wc").as_str(), "bash -c ls | wc");

        config.execution.shell = ShellMode::Powershell;
        assert_eq!(config.command("Get-Date").args(), ["-Command", "Get-Date"]);
    }

    #[test]
    fn test_shell_mode_parse() {
        assert_eq!("bash".parse::<ShellMode>().unwrap(), ShellMode::Bash);
        assert_eq!("none".parse::<ShellMode>().unwrap(), ShellMode::None);
        assert_eq!("pwsh".parse::<ShellMode>().unwrap(), ShellMode::Powershell);
        assert!("zsh".parse::<ShellMode>().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"timeout_ms\""));
        assert!(json.contains("\"shell\": \"none\""));

        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
