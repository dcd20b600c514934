// Platform capabilities
//
// The only things that differ between hosts are the compiler's file name and
// how it gets launched. Both live behind `CompilerPlatform` so the driver has
// a single code path.

use std::path::Path;
use std::process::Command;

use crate::report::CompileOutcome;

/// One "compile this file to that path" request
#[derive(Debug, Clone, Copy)]
pub struct CompileJob<'a> {
    pub compiler: &'a Path,
    pub source: &'a Path,
    pub output: &'a Path,
    pub extra_args: &'a [String],
}

pub trait CompilerPlatform {
    /// Human readable platform name used in logs
    fn name(&self) -> &str;

    /// File name of the compiler inside the tool directory
    fn executable_name(&self) -> &str;

    /// Run the compiler for one file and block until it finishes
    fn compile(&self, job: &CompileJob<'_>) -> CompileOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Windows,
    Linux,
}

impl HostPlatform {
    /// Map an OS name as reported by `std::env::consts::OS`
    pub fn from_os_name(os_name: &str) -> Option<Self> {
        match os_name {
            "windows" => Some(HostPlatform::Windows),
            "linux" => Some(HostPlatform::Linux),
            _ => None,
        }
    }

    pub fn detect() -> Option<Self> {
        Self::from_os_name(std::env::consts::OS)
    }
}

impl CompilerPlatform for HostPlatform {
    fn name(&self) -> &str {
        match self {
            HostPlatform::Windows => "Windows",
            HostPlatform::Linux => "Linux",
        }
    }

    fn executable_name(&self) -> &str {
        match self {
            HostPlatform::Windows => "glslc.exe",
            HostPlatform::Linux => "glslc",
        }
    }

    fn compile(&self, job: &CompileJob<'_>) -> CompileOutcome {
        run_glslc(job)
    }
}

/// Invoke a glslc-compatible compiler: `<compiler> <source> -o <output> [extra...]`
pub fn run_glslc(job: &CompileJob<'_>) -> CompileOutcome {
    log::debug!(
        "Running {:?} {:?} -o {:?} {:?}",
        job.compiler,
        job.source,
        job.output,
        job.extra_args
    );

    let result = Command::new(job.compiler)
        .arg(job.source)
        .arg("-o")
        .arg(job.output)
        .args(job.extra_args)
        .output();

    match result {
        Ok(output) if output.status.success() => {
            let warnings = String::from_utf8_lossy(&output.stderr);
            if !warnings.trim().is_empty() {
                log::warn!("{}", warnings.trim_end());
            }
            CompileOutcome::Compiled
        }
        Ok(output) => CompileOutcome::Failed {
            exit_code: output.status.code(),
            diagnostic: failure_diagnostic(&output.stderr, &output.stdout),
        },
        Err(e) => CompileOutcome::Failed {
            exit_code: None,
            diagnostic: format!("Failed to launch {:?}: {}", job.compiler, e),
        },
    }
}

/// stderr followed by any stdout the compiler produced
fn failure_diagnostic(stderr: &[u8], stdout: &[u8]) -> String {
    let mut diagnostic = String::from_utf8_lossy(stderr).into_owned();
    let stdout = String::from_utf8_lossy(stdout);
    if !stdout.trim().is_empty() {
        if !diagnostic.is_empty() && !diagnostic.ends_with('\n') {
            diagnostic.push('\n');
        }
        diagnostic.push_str(&stdout);
    }
    diagnostic
}
