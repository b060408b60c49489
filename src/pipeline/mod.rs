//! Pipeline module - gains tables, scorers and data frame adapters

pub mod error;
pub mod evaluate;
pub mod gains;
pub mod loader;
pub mod scorer;
pub mod target;

pub use error::KsError;
pub use evaluate::*;
pub use gains::*;
pub use loader::*;
pub use scorer::*;
pub use target::*;
