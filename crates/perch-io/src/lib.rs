pub mod format;
pub mod json;
pub mod obj;
pub mod registry;

pub use format::{AssetFormat, AssetSource};
pub use json::{JsonSceneLoader, SceneDocument};
pub use obj::ObjLoader;
pub use registry::{AssetLoader, LoaderRegistry};
