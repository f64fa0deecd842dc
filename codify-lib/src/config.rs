use std::env;

/// Environment variable that overrides the executable name or path.
pub const PROGRAM_ENV: &str = "CODIFY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub program: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            program: default_program(),
        }
    }
}

impl Config {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolve the executable reference from the environment.
    ///
    /// Reads `CODIFY`; an unset or empty variable falls back to the
    /// default name. Existence is not checked here, only at spawn time.
    pub fn from_env() -> Self {
        match env::var(PROGRAM_ENV) {
            Ok(program) if !program.is_empty() => Self { program },
            _ => Self::default(),
        }
    }
}

fn default_program() -> String {
    "codify".to_string()
}
