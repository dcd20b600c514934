// =============================================================================
// SHADER BUILD DRIVER
// =============================================================================
//
// PHASES:
// 1. Validate the invocation (nothing on disk is touched)
// 2. Create the source and destination roots
// 3. Walk the source tree, mirroring every directory under the destination
// 4. Compile every shader source into its mirrored directory
//
// Steps 3 and 4 are interleaved: a directory is always mirrored before any of
// the files inside it are compiled.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::ValidationError;
use crate::platform::{CompileJob, CompilerPlatform};
use crate::report::BuildReport;
use crate::shader::ShaderSet;

/// The three directories a run is started with
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Directory expected to contain the compiler executable
    pub tool_dir: PathBuf,
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub shaders: ShaderSet,
    /// Appended to every compiler command line
    pub extra_args: Vec<String>,
    /// Stop at the first failed compile instead of attempting every file
    pub fail_fast: bool,
}

impl BuildOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            shaders: config.shader_set(),
            extra_args: config.compiler.extra_args.clone(),
            fail_fast: config.build.fail_fast,
        }
    }
}

/// An invocation that passed validation, bound to the platform it runs on
#[derive(Debug)]
pub struct ValidatedBuild<P> {
    invocation: Invocation,
    platform: P,
    compiler: PathBuf,
}

/// Check the invocation, in order: tool directory, platform, compiler
/// executable, source root.
///
/// `platform` is `None` when `os_name` is not a supported platform.
pub fn validate<P: CompilerPlatform>(
    invocation: Invocation,
    os_name: &str,
    platform: Option<P>,
) -> Result<ValidatedBuild<P>, ValidationError> {
    if !invocation.tool_dir.is_dir() {
        return Err(ValidationError::ToolDirMissing(invocation.tool_dir));
    }

    let platform =
        platform.ok_or_else(|| ValidationError::UnsupportedPlatform(os_name.to_string()))?;

    let compiler = invocation.tool_dir.join(platform.executable_name());
    if !compiler.is_file() {
        return Err(ValidationError::CompilerMissing {
            tool_dir: invocation.tool_dir,
            executable: platform.executable_name().to_string(),
        });
    }

    if !invocation.source_root.is_dir() {
        return Err(ValidationError::SourceRootMissing(invocation.source_root));
    }

    Ok(ValidatedBuild {
        invocation,
        platform,
        compiler,
    })
}

impl<P: CompilerPlatform> ValidatedBuild<P> {
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Full path of the compiler executable
    pub fn compiler(&self) -> &Path {
        &self.compiler
    }

    /// Make sure both roots exist. Safe to call repeatedly.
    pub fn prepare_directories(&self) -> Result<()> {
        for root in [&self.invocation.source_root, &self.invocation.dest_root] {
            if !root.is_dir() {
                log::info!("Creating directory {:?}", root);
            }
            fs::create_dir_all(root)
                .with_context(|| format!("Failed to create directory {:?}", root))?;
        }
        Ok(())
    }

    /// Prepare, walk and compile. Individual compile failures end up in the
    /// report; only filesystem errors on the destination side abort the run.
    pub fn run(&self, options: &BuildOptions) -> Result<BuildReport> {
        let Invocation {
            source_root,
            dest_root,
            ..
        } = &self.invocation;

        log::info!(
            "Compiling shaders from {:?} into {:?} with {:?} ({})",
            source_root,
            dest_root,
            self.compiler,
            self.platform.name()
        );

        self.prepare_directories()?;

        let nested_dest = self.nested_destination()?;
        if let Some(skipped) = &nested_dest {
            log::debug!("Destination lies inside the source tree, skipping {:?}", skipped);
        }

        let mut report = BuildReport::default();
        let mut artifacts = HashSet::new();

        let walker = WalkDir::new(source_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                nested_dest
                    .as_deref()
                    .map_or(true, |skipped| entry.path() != skipped)
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    report.traversal_errors.push(e.to_string());
                    continue;
                }
            };

            let relative = entry
                .path()
                .strip_prefix(source_root)
                .with_context(|| format!("{:?} is not under {:?}", entry.path(), source_root))?;

            if entry.file_type().is_dir() {
                let mirrored = dest_root.join(relative);
                if !mirrored.is_dir() {
                    fs::create_dir_all(&mirrored)
                        .with_context(|| format!("Failed to create directory {:?}", mirrored))?;
                    log::debug!("Created {:?}", mirrored);
                }
                report.directories_mirrored += 1;
                continue;
            }

            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            let artifact = match options.shaders.artifact_name(entry.path()) {
                Some(artifact) if is_file => artifact,
                _ => {
                    log::trace!("Ignoring {:?}", entry.path());
                    report.files_ignored += 1;
                    continue;
                }
            };

            let output = dest_root.join(relative).with_file_name(artifact);
            if !artifacts.insert(output.clone()) {
                log::warn!(
                    "{:?} overwrites {:?}, which was produced by another source",
                    entry.path(),
                    output
                );
            }

            let outcome = self.platform.compile(&CompileJob {
                compiler: &self.compiler,
                source: entry.path(),
                output: &output,
                extra_args: &options.extra_args,
            });
            let failed = !outcome.is_compiled();
            report.record(entry.path().to_path_buf(), output, outcome);

            if failed && options.fail_fast {
                report.aborted = true;
                break;
            }
        }

        Ok(report)
    }

    /// Path (as the walk sees it) of the destination root when it sits
    /// strictly inside the source tree
    fn nested_destination(&self) -> Result<Option<PathBuf>> {
        let Invocation {
            source_root,
            dest_root,
            ..
        } = &self.invocation;

        let source = fs::canonicalize(source_root)
            .with_context(|| format!("Failed to resolve {:?}", source_root))?;
        let dest = fs::canonicalize(dest_root)
            .with_context(|| format!("Failed to resolve {:?}", dest_root))?;

        Ok(dest
            .strip_prefix(&source)
            .ok()
            .filter(|relative| !relative.as_os_str().is_empty())
            .map(|relative| source_root.join(relative)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HostPlatform;
    use tempfile::TempDir;

    fn invocation(root: &TempDir) -> Invocation {
        Invocation {
            tool_dir: root.path().join("tools"),
            source_root: root.path().join("src"),
            dest_root: root.path().join("out"),
        }
    }

    #[test]
    fn missing_tool_dir_is_reported_first() {
        let root = tempfile::tempdir().unwrap();
        let err = validate(invocation(&root), "plan9", None::<HostPlatform>).unwrap_err();
        assert!(matches!(err, ValidationError::ToolDirMissing(_)));
        assert!(!root.path().join("out").exists());
    }

    #[test]
    fn tool_dir_that_is_a_file_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("tools"), "").unwrap();

        let err = validate(invocation(&root), "linux", Some(HostPlatform::Linux)).unwrap_err();
        assert!(matches!(err, ValidationError::ToolDirMissing(_)));
        assert!(err.to_string().ends_with("does not exist or is not a directory"));
    }

    #[test]
    fn unsupported_platform_names_the_platform() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("tools")).unwrap();

        let err = validate(invocation(&root), "plan9", None::<HostPlatform>).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedPlatform(ref os) if os == "plan9"));
        assert_eq!(err.to_string(), "Platform plan9 not supported");
    }

    #[test]
    fn compiler_must_match_platform() {
        let root = tempfile::tempdir().unwrap();
        let tools = root.path().join("tools");
        fs::create_dir(&tools).unwrap();
        fs::write(tools.join("glslc.exe"), "").unwrap();

        let err = validate(invocation(&root), "linux", Some(HostPlatform::Linux)).unwrap_err();
        match err {
            ValidationError::CompilerMissing { executable, .. } => assert_eq!(executable, "glslc"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_source_root_creates_nothing() {
        let root = tempfile::tempdir().unwrap();
        let tools = root.path().join("tools");
        fs::create_dir(&tools).unwrap();
        fs::write(tools.join("glslc"), "").unwrap();

        let err = validate(invocation(&root), "linux", Some(HostPlatform::Linux)).unwrap_err();
        assert!(matches!(err, ValidationError::SourceRootMissing(_)));
        assert!(!root.path().join("src").exists());
        assert!(!root.path().join("out").exists());
    }

    #[test]
    fn prepare_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let tools = root.path().join("tools");
        fs::create_dir(&tools).unwrap();
        fs::write(tools.join("glslc"), "").unwrap();
        fs::create_dir(root.path().join("src")).unwrap();

        let build = validate(invocation(&root), "linux", Some(HostPlatform::Linux)).unwrap();
        assert_eq!(build.compiler(), tools.join("glslc"));

        build.prepare_directories().unwrap();
        build.prepare_directories().unwrap();
        assert!(root.path().join("out").is_dir());
    }
}
