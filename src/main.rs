// =============================================================================
// SHADER BUILD - compile a GLSL tree to SPIR-V
// =============================================================================
//
// EXIT CODES:
//   0  every shader compiled
//   1  a shader failed to compile, or the tree could not be fully processed
//   2  bad invocation (missing directory, compiler or unsupported platform)

use anyhow::Result;
use clap::Parser;
use shader_build::{driver, BuildOptions, Config, HostPlatform, Invocation};
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_BUILD_FAILED: u8 = 1;
const EXIT_INVALID_INVOCATION: u8 = 2;

#[derive(Debug, Parser)]
#[command(version, about = "Compile every GLSL shader under SRC to SPIR-V under DST")]
struct Cli {
    /// Folder containing the glslc executable.
    vlkdir: PathBuf,

    /// Input folder containing all shaders to be compiled.
    src: PathBuf,

    /// Output folder where all the compiled shaders will be stored.
    dst: PathBuf,

    /// Path to a TOML configuration file (defaults to ./shader_build.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log every compiler invocation
    #[arg(short, long)]
    verbose: bool,
}

// =============================================================================
// ENTRY POINT
// =============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level_from_env = init_logging(cli.verbose);
    let config = Config::load(cli.config.as_deref());
    if !cli.verbose && !level_from_env {
        log::set_max_level(config.log_level());
    }

    match run(cli, &config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[ERROR] - {:#}", e);
            ExitCode::from(EXIT_BUILD_FAILED)
        }
    }
}

fn run(cli: Cli, config: &Config) -> Result<ExitCode> {
    let invocation = Invocation {
        tool_dir: cli.vlkdir,
        source_root: cli.src,
        dest_root: cli.dst,
    };

    let build = match driver::validate(invocation, std::env::consts::OS, HostPlatform::detect()) {
        Ok(build) => build,
        Err(e) => {
            // Printed directly so a silenced logger cannot hide it
            eprintln!("[ERROR] - {}", e);
            return Ok(ExitCode::from(EXIT_INVALID_INVOCATION));
        }
    };

    let report = build.run(&BuildOptions::from_config(config))?;
    report.log_summary();

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_BUILD_FAILED))
    }
}

/// Initialize logging. `RUST_LOG` wins over `--verbose`, which wins over the
/// config level applied once the config is loaded. Returns whether `RUST_LOG`
/// was set.
fn init_logging(verbose: bool) -> bool {
    use env_logger::{Builder, Env, DEFAULT_FILTER_ENV};
    use log::LevelFilter;

    let level_from_env = std::env::var_os(DEFAULT_FILTER_ENV).is_some();

    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Trace);
    builder.parse_env(Env::default());
    builder.format_timestamp(None);
    builder.init();

    if !level_from_env {
        log::set_max_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        });
    }
    level_from_env
}
