use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use codify_lib::{Config, Error, Runner, SourceType, DEFAULT_TARGET};
use std::process;

#[derive(Parser)]
#[command(name = "codify-cli")]
#[command(about = "A command-line porcelain for the codify conversion program")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the codify executable to invoke
    #[arg(long, global = true, env = "CODIFY")]
    program: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a source type to a target language
    Convert {
        /// Source type; multiple segments are joined with `:`
        #[arg(required = true)]
        source_type: Vec<String>,

        /// Target language
        #[arg(short, long, default_value = DEFAULT_TARGET)]
        target: String,
    },

    /// Print the version of the codify program
    Version {
        /// Output format
        #[arg(long, default_value = "human")]
        format: VersionFormat,
    },

    /// Check whether the codify program is available
    Check,

    /// Run a raw codify command and print its output
    Exec {
        /// Command verb passed to the program
        command: String,

        /// Additional arguments, passed through verbatim
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(clap::ValueEnum, Clone)]
enum VersionFormat {
    Human,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitCode {
    Success = 0,
    GenericError = 1,
    Unavailable = 69,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

fn main() {
    env_logger::init();

    match run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(ExitCode::GenericError.into());
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    // The CODIFY lookup happens here at the CLI edge (via the clap env
    // binding); the runner itself only ever sees an explicit value.
    let config = match cli.program {
        Some(program) if !program.is_empty() => Config::new(program),
        _ => Config::default(),
    };
    let runner = Runner::new(config);

    match cli.command {
        Commands::Convert {
            source_type,
            target,
        } => handle_convert(&runner, source_type, &target),
        Commands::Version { format } => handle_version(&runner, format),
        Commands::Check => handle_check(&runner),
        Commands::Exec { command, args } => handle_exec(&runner, &command, args),
        Commands::Completions { shell } => handle_completions(shell),
    }
}

fn handle_convert(runner: &Runner, source_type: Vec<String>, target: &str) -> Result<i32> {
    match runner.convert(SourceType::from(source_type), Some(target)) {
        Ok(output) => {
            println!("{output}");
            Ok(ExitCode::Success.into())
        }
        Err(err) => report_failure(err),
    }
}

fn handle_version(runner: &Runner, format: VersionFormat) -> Result<i32> {
    let version = runner.version();

    match format {
        VersionFormat::Human => match version {
            Some(version) => {
                println!("{version}");
                Ok(ExitCode::Success.into())
            }
            None => {
                eprintln!("the `{}` program is not available", runner.program());
                Ok(ExitCode::Unavailable.into())
            }
        },
        VersionFormat::Json => {
            use serde::Serialize;

            #[derive(Serialize)]
            struct VersionInfo<'a> {
                program: &'a str,
                available: bool,
                version: Option<String>,
            }

            let info = VersionInfo {
                program: runner.program(),
                available: version.is_some(),
                version,
            };

            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(ExitCode::Success.into())
        }
    }
}

fn handle_check(runner: &Runner) -> Result<i32> {
    if runner.available() {
        println!("`{}` is available", runner.program());
        Ok(ExitCode::Success.into())
    } else {
        println!("`{}` is not available", runner.program());
        Ok(ExitCode::Unavailable.into())
    }
}

fn handle_exec(runner: &Runner, command: &str, args: Vec<String>) -> Result<i32> {
    match runner.execute(command, args) {
        Ok(output) => {
            println!("{output}");
            Ok(ExitCode::Success.into())
        }
        Err(err) => report_failure(err),
    }
}

fn handle_completions(shell: Shell) -> Result<i32> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(ExitCode::Success.into())
}

// Failures from the external program keep their detail: a missing program
// maps to EX_UNAVAILABLE, a non-zero child exit is forwarded as our own
// exit code.
fn report_failure(err: Error) -> Result<i32> {
    match err {
        Error::NotAvailable { .. } => {
            eprintln!("{err}");
            Ok(ExitCode::Unavailable.into())
        }
        Error::UnexpectedExit { code, .. } => {
            eprintln!("{err}");
            Ok(code)
        }
        Error::Io(err) => Err(err.into()),
    }
}
