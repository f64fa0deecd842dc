use crate::config::Config;
use crate::error::Error;
use log::debug;
use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::iter;
use std::process::Command;

/// Target language used by `convert` when none is given.
pub const DEFAULT_TARGET: &str = "ruby";

/// Source type selector for `convert`.
///
/// Built from a single string, or from an ordered sequence of segments
/// joined with `:` (`["ruby", "rb"]` becomes `"ruby:rb"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceType(String);

impl SourceType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SourceType {
    fn from(source: &str) -> Self {
        Self(source.to_string())
    }
}

impl From<String> for SourceType {
    fn from(source: String) -> Self {
        Self(source)
    }
}

impl<S: AsRef<str>> From<&[S]> for SourceType {
    fn from(segments: &[S]) -> Self {
        let joined: Vec<&str> = segments.iter().map(|s| s.as_ref()).collect();
        Self(joined.join(":"))
    }
}

impl<S: AsRef<str>> From<Vec<S>> for SourceType {
    fn from(segments: Vec<S>) -> Self {
        Self::from(segments.as_slice())
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for SourceType {
    fn from(segments: [S; N]) -> Self {
        Self::from(&segments[..])
    }
}

/// Executes the external `codify` program and normalizes the outcome.
///
/// Every call spawns one child process and blocks until it exits. The
/// runner holds no state beyond the resolved executable reference, so it
/// is cheap to clone and safe to share across threads.
#[derive(Debug, Clone)]
pub struct Runner {
    config: Config,
}

impl Runner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Construct a runner with the executable resolved from the
    /// environment (`CODIFY`, falling back to `codify`).
    pub fn from_env() -> Self {
        Self::new(Config::from_env())
    }

    pub fn program(&self) -> &str {
        &self.config.program
    }

    /// Run `<program> <command> <args...>` and capture its output.
    ///
    /// Arguments are passed as a discrete vector, never through a shell.
    /// Exit code 0 yields stdout with trailing whitespace trimmed; any
    /// other exit code yields [`Error::UnexpectedExit`] carrying the code
    /// and the trimmed stderr text. A program that cannot be found yields
    /// [`Error::NotAvailable`].
    pub fn execute<I, S>(&self, command: &str, args: I) -> Result<String, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.config.program);
        cmd.arg(command);
        for arg in args {
            cmd.arg(arg.as_ref());
        }

        debug!("executing {:?}", cmd);

        let output = match cmd.output() {
            Ok(output) => output,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::NotAvailable {
                    program: self.config.program.clone(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            Ok(stdout.trim_end().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(Error::UnexpectedExit {
                program: self.config.program.clone(),
                code: output.status.code().unwrap_or(1),
                stderr: stderr.trim_end().to_string(),
            })
        }
    }

    /// Run `convert <source-type> <target-language>`.
    ///
    /// `target` defaults to [`DEFAULT_TARGET`] when `None`.
    pub fn convert(
        &self,
        source: impl Into<SourceType>,
        target: Option<&str>,
    ) -> Result<String, Error> {
        let source = source.into();
        let target = target.unwrap_or(DEFAULT_TARGET);
        self.execute("convert", [source.as_str(), target])
    }

    /// Version of the external program, if available.
    ///
    /// Takes the last whitespace-separated token of the `--version`
    /// output (the program prints `codify <version>`). Any failure
    /// degrades to `None`; callers needing the failure detail should use
    /// [`Runner::execute`] directly.
    pub fn version(&self) -> Option<String> {
        let output = self.execute("--version", iter::empty::<&str>()).ok()?;
        output.split_whitespace().last().map(str::to_string)
    }

    /// Whether the external program is available. Never fails.
    pub fn available(&self) -> bool {
        self.version().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_from_string() {
        assert_eq!(SourceType::from("json").as_str(), "json");
        assert_eq!(SourceType::from("a:b".to_string()).as_str(), "a:b");
    }

    #[test]
    fn test_source_type_joins_segments() {
        assert_eq!(SourceType::from(["ruby", "rb"]).as_str(), "ruby:rb");
        assert_eq!(SourceType::from(vec!["a", "b", "c"]).as_str(), "a:b:c");
        let segments: &[&str] = &["x"];
        assert_eq!(SourceType::from(segments).as_str(), "x");
    }

    #[test]
    fn test_execute_missing_program_is_not_available() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("no-such-codify");
        let runner = Runner::new(Config::new(missing.to_string_lossy()));

        let err = runner.execute("x", iter::empty::<&str>()).unwrap_err();
        match err {
            Error::NotAvailable { ref program } => {
                assert!(program.ends_with("no-such-codify"));
            }
            other => panic!("expected NotAvailable, got {:?}", other),
        }

        assert!(!runner.available());
        assert_eq!(runner.version(), None);
    }

    #[cfg(unix)]
    mod with_fake_program {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        fn fake_program(dir: &TempDir, body: &str) -> Runner {
            let path = dir.path().join("codify");
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            Runner::new(Config::new(path.to_string_lossy()))
        }

        #[test]
        fn test_execute_trims_trailing_whitespace_only() {
            let dir = TempDir::new().unwrap();
            let runner = fake_program(&dir, "printf '  hello \\n'");
            assert_eq!(runner.execute("x", iter::empty::<&str>()).unwrap(), "  hello");
        }

        #[test]
        fn test_execute_nonzero_exit_carries_code_and_stderr() {
            let dir = TempDir::new().unwrap();
            let runner = fake_program(&dir, "echo 'bad input' >&2\nexit 2");

            let err = runner.execute("x", iter::empty::<&str>()).unwrap_err();
            match err {
                Error::UnexpectedExit { code, ref stderr, .. } => {
                    assert_eq!(code, 2);
                    assert_eq!(stderr, "bad input");
                }
                other => panic!("expected UnexpectedExit, got {:?}", other),
            }
        }

        #[test]
        fn test_execute_passes_metacharacters_literally() {
            let dir = TempDir::new().unwrap();
            let runner = fake_program(&dir, "printf '%s\\n' \"$@\"");

            let output = runner.execute("x", ["; rm -rf /", "$(whoami)"]).unwrap();
            assert_eq!(output, "x\n; rm -rf /\n$(whoami)");
        }

        #[test]
        fn test_convert_argument_vector() {
            let dir = TempDir::new().unwrap();
            let runner = fake_program(&dir, "printf '%s\\n' \"$@\"");

            let output = runner.convert(["ruby", "rb"], Some("python")).unwrap();
            assert_eq!(output, "convert\nruby:rb\npython");
        }

        #[test]
        fn test_convert_default_target() {
            let dir = TempDir::new().unwrap();
            let runner = fake_program(&dir, "printf '%s\\n' \"$@\"");

            let output = runner.convert("json", None).unwrap();
            assert_eq!(output, "convert\njson\nruby");
        }

        #[test]
        fn test_version_parses_last_token() {
            let dir = TempDir::new().unwrap();
            let runner = fake_program(&dir, "echo 'codify version 1.2.3'");

            assert_eq!(runner.version(), Some("1.2.3".to_string()));
            assert!(runner.available());
            // Unchanged program, unchanged answer.
            assert_eq!(runner.version(), Some("1.2.3".to_string()));
        }

        #[test]
        fn test_version_empty_output_is_absent() {
            let dir = TempDir::new().unwrap();
            let runner = fake_program(&dir, "true");

            assert_eq!(runner.version(), None);
            assert!(!runner.available());
        }
    }
}
