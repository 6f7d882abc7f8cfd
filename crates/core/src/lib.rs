pub mod config;
pub mod domain;
pub mod errors;

pub use domain::product::{NewProduct, Product, ProductId, ProductPatch};
pub use errors::{ApplicationError, DomainError, InterfaceError};
