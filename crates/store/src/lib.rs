pub mod fixtures;
pub mod repositories;

pub use fixtures::{SeedDataset, SeedResult};
pub use repositories::{CatalogError, CatalogRepository, InMemoryCatalog, JsonFileCatalog};
