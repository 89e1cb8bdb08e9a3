pub mod client;
pub mod models;
pub mod resolver;

pub use client::{ContentRegistry, ModrinthClient};
pub use models::{RegistryFile, RegistryProject, RegistryVersion};
pub use resolver::{content_type_for_loaders, RemoteResolver, LOADER_TYPES};
