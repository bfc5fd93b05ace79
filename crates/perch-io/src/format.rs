use std::path::{Path, PathBuf};

use perch_base::LoadError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetFormat {
    Gltf,
    Glb,
    Fbx,
    Obj,
    SceneJson,
}

impl AssetFormat {
    pub const ALL: [AssetFormat; 5] = [
        AssetFormat::Gltf,
        AssetFormat::Glb,
        AssetFormat::Fbx,
        AssetFormat::Obj,
        AssetFormat::SceneJson,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            AssetFormat::Gltf => "gltf",
            AssetFormat::Glb => "glb",
            AssetFormat::Fbx => "fbx",
            AssetFormat::Obj => "obj",
            AssetFormat::SceneJson => "json",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim().trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(ext))
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| LoadError::UnsupportedFormat(path.display().to_string()))
    }
}

impl std::fmt::Display for AssetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Clone, Debug)]
pub enum AssetSource {
    Path(PathBuf),
    Bytes { data: Vec<u8>, format: AssetFormat },
}

impl AssetSource {
    pub fn format(&self) -> Result<AssetFormat, LoadError> {
        match self {
            AssetSource::Path(path) => AssetFormat::from_path(path),
            AssetSource::Bytes { format, .. } => Ok(*format),
        }
    }

    pub fn read(&self) -> Result<Vec<u8>, LoadError> {
        match self {
            AssetSource::Path(path) => Ok(std::fs::read(path)?),
            AssetSource::Bytes { data, .. } => Ok(data.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_matching_ignores_case() {
        assert_eq!(AssetFormat::from_extension("GLB"), Some(AssetFormat::Glb));
        assert_eq!(AssetFormat::from_extension(".obj"), Some(AssetFormat::Obj));
        assert_eq!(AssetFormat::from_extension("usdz"), None);
    }

    #[test]
    fn path_without_extension_is_unsupported() {
        let result = AssetFormat::from_path(Path::new("models/robot"));
        assert!(matches!(result, Err(LoadError::UnsupportedFormat(_))));
    }
}
