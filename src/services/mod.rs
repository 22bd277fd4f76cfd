pub mod catalog;
pub mod storage;

pub use catalog::{Catalog, CatalogClient, CatalogError};
pub use storage::{JsonFileStorage, MemoryStorage, StorageError, StoragePort};
