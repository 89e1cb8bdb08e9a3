pub mod settings;

pub use settings::{ContentDirectory, SyncSettings, DEFAULT_REGISTRY_URL};
