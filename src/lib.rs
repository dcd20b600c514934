// Shader build driver library
//
// Walks a shader source tree, mirrors it under an output root and compiles
// every GLSL source to SPIR-V with an external glslc.

pub mod config;
pub mod driver;
pub mod error;
pub mod platform;
pub mod report;
pub mod shader;

pub use config::Config;
pub use driver::{validate, BuildOptions, Invocation, ValidatedBuild};
pub use error::ValidationError;
pub use platform::{CompileJob, CompilerPlatform, HostPlatform};
pub use report::{BuildReport, CompileFailure, CompileOutcome};
pub use shader::ShaderSet;
