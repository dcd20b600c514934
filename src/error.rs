use std::path::PathBuf;

/// Problems with the invocation itself, detected before anything on disk is
/// touched
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("The directory {0:?} does not exist or is not a directory")]
    ToolDirMissing(PathBuf),

    #[error("Platform {0} not supported")]
    UnsupportedPlatform(String),

    #[error("No GLSL to SPIR-V compiler ({executable}) in {tool_dir:?}")]
    CompilerMissing {
        tool_dir: PathBuf,
        executable: String,
    },

    #[error("The source directory {0:?} does not exist or is not a directory")]
    SourceRootMissing(PathBuf),
}
