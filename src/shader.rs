// Shader source classification
//
// A file is a shader source when its final extension is in the recognised
// set. Its compiled artifact keeps the file stem and swaps the extension.

use std::ffi::OsString;
use std::path::Path;

pub const DEFAULT_SOURCE_EXTENSIONS: [&str; 3] = ["glsl", "vert", "frag"];
pub const DEFAULT_OUTPUT_EXTENSION: &str = "spv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSet {
    source_extensions: Vec<String>,
    output_extension: String,
}

impl Default for ShaderSet {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_EXTENSIONS, DEFAULT_OUTPUT_EXTENSION)
    }
}

impl ShaderSet {
    pub fn new<I, S>(source_extensions: I, output_extension: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source_extensions: source_extensions.into_iter().map(Into::into).collect(),
            output_extension: output_extension.into(),
        }
    }

    pub fn source_extensions(&self) -> &[String] {
        &self.source_extensions
    }

    pub fn output_extension(&self) -> &str {
        &self.output_extension
    }

    /// Matching is case-sensitive: `shader.VERT` is not a source
    pub fn is_candidate(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.source_extensions.iter().any(|known| known == ext))
    }

    /// File name of the compiled artifact for `path`, or `None` when `path`
    /// is not a shader source
    pub fn artifact_name(&self, path: &Path) -> Option<OsString> {
        if !self.is_candidate(path) {
            return None;
        }
        let mut name = path.file_stem()?.to_os_string();
        name.push(".");
        name.push(&self.output_extension);
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_default_extensions() {
        let set = ShaderSet::default();
        for name in ["common.glsl", "cube.vert", "cube.frag", "a/b/deep.vert"] {
            assert!(set.is_candidate(Path::new(name)), "{name}");
        }
        for name in ["notes.txt", "cube.comp", "cube.VERT", "vert", "cube.vert.bak"] {
            assert!(!set.is_candidate(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn artifact_replaces_extension() {
        let set = ShaderSet::default();
        assert_eq!(set.artifact_name(Path::new("cube.vert")).unwrap(), "cube.spv");
        assert_eq!(
            set.artifact_name(Path::new("dir/post.fx.frag")).unwrap(),
            "post.fx.spv"
        );
        assert_eq!(set.artifact_name(Path::new("readme.md")), None);
    }

    #[test]
    fn stage_is_not_part_of_artifact_name() {
        let set = ShaderSet::default();
        assert_eq!(
            set.artifact_name(Path::new("mesh.vert")),
            set.artifact_name(Path::new("mesh.frag"))
        );
    }
}
