pub mod asset_index;
pub mod instance_config;
pub mod manifest;
pub mod version;

pub use asset_index::{AssetIndexMap, AssetObject};
pub use instance_config::InstanceConfigJson;
pub use manifest::Manifest;
pub use version::VersionDetails;
