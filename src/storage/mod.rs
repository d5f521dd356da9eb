mod provider;

pub use provider::{StorageHandle, StorageProvider};
