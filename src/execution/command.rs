//! Command string representation and shell wrapping.

use std::fmt;

use super::tokenizer::tokenize;

/// Literal prefix marking a command that runs through `bash -c`.
pub const BASH_PREFIX: &str = "bash -c ";

/// Literal prefix marking a command that runs through PowerShell.
pub const POWERSHELL_PREFIX: &str = "powershell.exe ";

/// A raw command string, parsed into a program and arguments on demand.
///
/// A command that starts with [`BASH_PREFIX`] or [`POWERSHELL_PREFIX`] is a
/// wrapped shell invocation: everything after the prefix is handed to the
/// shell as a single argument, untouched, so the shell does its own parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CommandLine(String);

impl CommandLine {
    /// Create a command from a raw command string.
    pub fn new(command_line: impl Into<String>) -> Self {
        Self(command_line.into())
    }

    /// Program to execute: the first token, or `""` when there is none.
    pub fn name(&self) -> String {
        tokenize(&self.0).into_iter().next().unwrap_or_default()
    }

    /// Arguments passed to the program.
    pub fn args(&self) -> Vec<String> {
        if let Some(script) = self.0.strip_prefix(BASH_PREFIX) {
            return vec!["-c".to_string(), script.to_string()];
        }
        if let Some(script) = self.0.strip_prefix(POWERSHELL_PREFIX) {
            return vec!["-Command".to_string(), script.to_string()];
        }

        tokenize(&self.0).into_iter().skip(1).collect()
    }

    /// This command wrapped for `bash -c`.
    pub fn shell_command(&self) -> CommandLine {
        Self(format!("{BASH_PREFIX}{}", self.0))
    }

    /// This command wrapped for PowerShell.
    pub fn powershell_command(&self) -> CommandLine {
        Self(format!("{POWERSHELL_PREFIX}{}", self.0))
    }

    /// The raw command string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the raw command string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommandLine {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CommandLine {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(cmd: &str) -> Vec<String> {
        CommandLine::new(cmd).args()
    }

    #[test]
    fn test_name() {
        assert_eq!(CommandLine::new("ls").name(), "ls");
        assert_eq!(CommandLine::new("ls -la").name(), "ls");
        assert_eq!(CommandLine::new("").name(), "");
        assert_eq!(CommandLine::new("   ").name(), "");
    }

    #[test]
    fn test_name_of_wrapped_commands() {
        assert_eq!(CommandLine::new("bash -c echo hello").name(), "bash");
        assert_eq!(
            CommandLine::new("powershell.exe Get-Process").name(),
            "powershell.exe"
        );
    }

    #[test]
    fn test_args_plain() {
        assert!(args_of("ls").is_empty());
        assert!(args_of("").is_empty());
        assert!(args_of("   ").is_empty());
        assert_eq!(args_of("ls -la"), ["-la"]);
        assert_eq!(args_of("git commit -m message"), ["commit", "-m", "message"]);
        assert_eq!(args_of("echo 'hello world'"), ["hello world"]);
    }

    #[test]
    fn test_args_bash_remainder_is_verbatim() {
        assert_eq!(args_of("bash -c ls"), ["-c", "ls"]);
        assert_eq!(args_of("bash -c echo hi"), ["-c", "echo hi"]);
        assert_eq!(args_of("bash -c echo hello && ls"), ["-c", "echo hello && ls"]);
        assert_eq!(
            args_of("bash -c cat file.txt | grep pattern"),
            ["-c", "cat file.txt | grep pattern"]
        );
        assert_eq!(
            args_of("bash -c echo 'bash -c test'"),
            ["-c", "echo 'bash -c test'"]
        );
        assert_eq!(args_of("bash -c "), ["-c", ""]);
    }

    #[test]
    fn test_args_powershell_remainder_is_verbatim() {
        assert_eq!(
            args_of("powershell.exe Get-Process"),
            ["-Command", "Get-Process"]
        );
        assert_eq!(
            args_of("powershell.exe Get-Process | Where-Object {$_.Name -eq 'chrome'}"),
            ["-Command", "Get-Process | Where-Object {$_.Name -eq 'chrome'}"]
        );
        assert_eq!(args_of("powershell.exe "), ["-Command", ""]);
    }

    #[test]
    fn test_prefix_must_match_exactly() {
        // No trailing space after -c: tokenized like any other command.
        assert_eq!(args_of("bash -c"), ["-c"]);
        assert_eq!(args_of(" bash -c echo hi"), ["-c", "echo", "hi"]);
        assert_eq!(args_of("bash -x echo"), ["-x", "echo"]);
    }

    #[test]
    fn test_shell_command() {
        assert_eq!(CommandLine::new("ls").shell_command().as_str(), "bash -c ls");
        assert_eq!(
            CommandLine::new("echo hello && ls").shell_command().as_str(),
            "bash -c echo hello && ls"
        );
        assert_eq!(CommandLine::new("").shell_command().to_string(), "bash -c ");
    }

    #[test]
    fn test_powershell_command() {
        assert_eq!(
            CommandLine::new("Get-Process").powershell_command().as_str(),
            "powershell.exe Get-Process"
        );
        assert_eq!(
            CommandLine::new("").powershell_command().as_str(),
            "powershell.exe "
        );
    }

    #[test]
    fn test_wrapping_round_trips_through_args() {
        let cmd = CommandLine::new(r#"echo "a  b" | tr a-z A-Z"#).shell_command();
        assert_eq!(cmd.name(), "bash");
        assert_eq!(cmd.args(), ["-c", r#"echo "a  b" | tr a-z A-Z"#]);
    }

    #[test]
    fn test_string_form_is_unchanged() {
        for raw in ["ls", "echo hello && ls", "", "  'x' "] {
            let cmd = CommandLine::from(raw);
            assert_eq!(cmd.to_string(), raw);
            assert_eq!(cmd.as_str(), raw);
        }
        assert!(CommandLine::default().is_empty());
        assert!(!CommandLine::from(String::from(" ")).is_empty());
    }
}
