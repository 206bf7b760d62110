//! Command-line interface for easycmd.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::ShellMode;

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Command words; joined with spaces into the command string.
    pub command: Vec<String>,
    /// Working directory for the command.
    pub dir: Option<PathBuf>,
    /// Shell wrapping requested on the command line.
    pub shell: Option<ShellMode>,
    /// Execution timeout.
    pub timeout: Option<Duration>,
    /// `KEY=VALUE` environment entries.
    pub env: Vec<String>,
    /// Print execution diagnostics to stderr.
    pub debug: bool,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

impl Args {
    /// The command string to execute.
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
///
/// Options are only recognised before the command: the first positional
/// argument and everything after it belong to the command.
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('C') | Long("dir") => {
                result.dir = Some(parser.value()?.parse()?);
            }
            Short('s') | Long("shell") => {
                result.shell = Some(ShellMode::Bash);
            }
            Short('P') | Long("powershell") => {
                result.shell = Some(ShellMode::Powershell);
            }
            Short('t') | Long("timeout") => {
                let value: String = parser.value()?.parse()?;
                result.timeout = Some(
                    parse_duration(&value).ok_or(ArgsError::InvalidValue("timeout", value))?,
                );
            }
            Short('e') | Long("env") => {
                let value: String = parser.value()?.parse()?;
                if !value.contains('=') {
                    return Err(ArgsError::InvalidValue("env", value));
                }
                result.env.push(value);
            }
            Short('d') | Long("debug") => {
                result.debug = true;
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                result.command.push(val.string()?);
                for rest in parser.raw_args()? {
                    let word = rest.into_string().map_err(|raw| {
                        ArgsError::InvalidValue("command", raw.to_string_lossy().into())
                    })?;
                    result.command.push(word);
                }
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Parse a duration such as `500ms`, `2s`, `1m`; a bare number is seconds.
pub fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let (digits, millis_per_unit) = if let Some(n) = value.strip_suffix("ms") {
        (n, 1)
    } else if let Some(n) = value.strip_suffix('s') {
        (n, 1_000)
    } else if let Some(n) = value.strip_suffix('m') {
        (n, 60_000)
    } else {
        (value, 1_000)
    };
    digits
        .parse::<u64>()
        .ok()?
        .checked_mul(millis_per_unit)
        .map(Duration::from_millis)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"easycmd {version}
Run a command string as a child process

USAGE:
    easycmd [OPTIONS] [--] <COMMAND>...

OPTIONS:
    -C, --dir <DIR>         Working directory for the command
    -s, --shell             Run the command through `bash -c`
    -P, --powershell        Run the command through PowerShell
    -t, --timeout <DUR>     Kill the command after DUR (e.g. 500ms, 10s, 2m)
    -e, --env <KEY=VALUE>   Replace the environment (repeatable)
    -d, --debug             Print execution diagnostics to stderr
    -c, --config <FILE>     Path to configuration file (JSON)
    -l, --log-level <LVL>   Log level (error, warn, info, debug, trace)
    -h, --help              Print help
    -V, --version           Print version

ENVIRONMENT VARIABLES:
    EASYCMD_DIR             Working directory (overrides config)
    EASYCMD_TIMEOUT_MS      Timeout in milliseconds (overrides config)
    EASYCMD_SHELL           none, bash or powershell (overrides config)
    EASYCMD_DEBUG           Enable diagnostics when set to 1 or true
    EASYCMD_LOG_LEVEL       Log level (overrides config)
    RUST_LOG                Alternative log level setting

EXAMPLES:
    # Quoted words stay together
    easycmd git commit -m "'first commit'"

    # Let bash handle pipes and globs
    easycmd -s 'ls *.rs | wc -l'

    # Give up after two seconds
    easycmd -t 2s -- sleep 10
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("easycmd {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<OsString> {
        std::iter::once("easycmd")
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn test_default_args() {
        let result = parse_args_from(args(&[])).unwrap();
        assert!(result.command.is_empty());
        assert!(result.shell.is_none());
        assert!(result.timeout.is_none());
        assert!(!result.debug);
    }

    #[test]
    fn test_command_words() {
        let result = parse_args_from(args(&["echo", "hello", "world"])).unwrap();
        assert_eq!(result.command, ["echo", "hello", "world"]);
        assert_eq!(result.command_line(), "echo hello world");
    }

    #[test]
    fn test_options_after_command_belong_to_command() {
        let result = parse_args_from(args(&["-d", "ls", "-la", "--debug"])).unwrap();
        assert!(result.debug);
        assert_eq!(result.command, ["ls", "-la", "--debug"]);
    }

    #[test]
    fn test_double_dash() {
        let result = parse_args_from(args(&["-t", "2s", "--", "-weird", "arg"])).unwrap();
        assert_eq!(result.timeout, Some(Duration::from_secs(2)));
        assert_eq!(result.command, ["-weird", "arg"]);
    }

    #[test]
    fn test_shell_flags() {
        let result = parse_args_from(args(&["-s", "echo $HOME"])).unwrap();
        assert_eq!(result.shell, Some(ShellMode::Bash));

        let result = parse_args_from(args(&["--powershell", "Get-Date"])).unwrap();
        assert_eq!(result.shell, Some(ShellMode::Powershell));
    }

    #[test]
    fn test_dir_and_env() {
        let result =
            parse_args_from(args(&["-C", "/tmp", "-e", "A=1", "--env", "B=2", "env"])).unwrap();
        assert_eq!(result.dir, Some(PathBuf::from("/tmp")));
        assert_eq!(result.env, ["A=1", "B=2"]);
    }

    #[test]
    fn test_invalid_env() {
        let result = parse_args_from(args(&["-e", "NOEQUALS", "env"]));
        assert!(matches!(result, Err(ArgsError::InvalidValue("env", _))));
    }

    #[test]
    fn test_invalid_timeout() {
        let result = parse_args_from(args(&["-t", "soon", "ls"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_help_and_version_flags() {
        assert!(parse_args_from(args(&["-h"])).unwrap().help);
        assert!(parse_args_from(args(&["--help"])).unwrap().help);
        assert!(parse_args_from(args(&["-V"])).unwrap().version);
        assert!(parse_args_from(args(&["--version"])).unwrap().version);
    }

    #[test]
    fn test_config_and_log_level() {
        let result =
            parse_args_from(args(&["-c", "/etc/easycmd.json", "-l", "debug", "true"])).unwrap();
        assert_eq!(result.config, Some(PathBuf::from("/etc/easycmd.json")));
        assert_eq!(result.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_unknown_option() {
        assert!(parse_args_from(args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("3s"), Some(Duration::from_secs(3)));
        assert_eq!(parse_duration("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_duration("7"), Some(Duration::from_secs(7)));
        assert_eq!(parse_duration("ms"), None);
        assert_eq!(parse_duration("-1s"), None);
    }
}
