use perch_base::LoadError;
use perch_scene::LoadedScene;
use tracing::{info, warn};

use crate::format::{AssetFormat, AssetSource};
use crate::json::JsonSceneLoader;
use crate::obj::ObjLoader;

pub trait AssetLoader {
    fn formats(&self) -> &[AssetFormat];

    fn load(&self, data: &[u8]) -> Result<LoadedScene, LoadError>;
}

#[derive(Default)]
pub struct LoaderRegistry {
    loaders: Vec<Box<dyn AssetLoader>>,
}

impl LoaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(JsonSceneLoader);
        registry.register(ObjLoader);
        registry
    }

    pub fn register(&mut self, loader: impl AssetLoader + 'static) {
        self.loaders.push(Box::new(loader));
    }

    pub fn supports(&self, format: AssetFormat) -> bool {
        self.loader_for(format).is_some()
    }

    pub fn loader_for(&self, format: AssetFormat) -> Option<&dyn AssetLoader> {
        self.loaders
            .iter()
            .rev()
            .find(|loader| loader.formats().contains(&format))
            .map(|loader| &**loader)
    }

    pub fn load(&self, source: &AssetSource) -> Result<LoadedScene, LoadError> {
        let format = source.format()?;
        let loader = self
            .loader_for(format)
            .ok_or_else(|| LoadError::UnsupportedFormat(format.to_string()))?;
        let data = source.read()?;
        match loader.load(&data) {
            Ok(scene) => {
                info!(
                    %format,
                    bytes = data.len(),
                    nodes = scene.graph.as_ref().map_or(0, |graph| graph.len()),
                    clips = scene.clips.len(),
                    "asset loaded"
                );
                Ok(scene)
            }
            Err(err) => {
                warn!(%format, error = %err, "asset load failed");
                Err(err)
            }
        }
    }
}
