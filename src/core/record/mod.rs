pub mod model;

pub use model::{ContentRecord, ContentType, SyncDescriptor, SYNC_VERSION};
