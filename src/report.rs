// Compile outcomes and the end-of-run summary

use std::path::PathBuf;

/// Result of running the compiler on one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    Compiled,
    Failed {
        /// `None` when the process could not be started or was killed by a signal
        exit_code: Option<i32>,
        diagnostic: String,
    },
}

impl CompileOutcome {
    pub fn is_compiled(&self) -> bool {
        matches!(self, CompileOutcome::Compiled)
    }
}

#[derive(Debug, Clone)]
pub struct CompileFailure {
    pub source: PathBuf,
    pub output: PathBuf,
    pub exit_code: Option<i32>,
    pub diagnostic: String,
}

#[derive(Debug, Default)]
pub struct BuildReport {
    pub compiled: Vec<PathBuf>,
    pub failed: Vec<CompileFailure>,
    pub directories_mirrored: usize,
    pub files_ignored: usize,
    /// Entries the walk could not read
    pub traversal_errors: Vec<String>,
    /// Set when `fail_fast` cut the run short
    pub aborted: bool,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.traversal_errors.is_empty()
    }

    pub(crate) fn record(&mut self, source: PathBuf, output: PathBuf, outcome: CompileOutcome) {
        match outcome {
            CompileOutcome::Compiled => {
                log::info!("Compiled {:?} -> {:?}", source, output);
                self.compiled.push(output);
            }
            CompileOutcome::Failed {
                exit_code,
                diagnostic,
            } => {
                log::error!(
                    "Failed to compile {:?} (exit code {:?})",
                    source,
                    exit_code
                );
                self.failed.push(CompileFailure {
                    source,
                    output,
                    exit_code,
                    diagnostic,
                });
            }
        }
    }

    pub fn log_summary(&self) {
        log::info!(
            "Compiled {} shader(s), {} failed, mirrored {} director{}, ignored {} file(s)",
            self.compiled.len(),
            self.failed.len(),
            self.directories_mirrored,
            if self.directories_mirrored == 1 { "y" } else { "ies" },
            self.files_ignored,
        );

        for failure in &self.failed {
            let diagnostic = failure.diagnostic.trim();
            if diagnostic.is_empty() {
                log::error!(
                    "  {:?} -> {:?}: no diagnostic output",
                    failure.source,
                    failure.output
                );
            } else {
                log::error!(
                    "  {:?} -> {:?}:\n{}",
                    failure.source,
                    failure.output,
                    diagnostic
                );
            }
        }
        for error in &self.traversal_errors {
            log::error!("  {}", error);
        }
        if self.aborted {
            log::warn!("Build stopped after the first failure (fail_fast)");
        }
    }
}
