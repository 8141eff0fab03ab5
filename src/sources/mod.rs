//! Built-in sources
//!
//! Catalog sources enumerate a fixed set of objects (files, in-memory
//! lists); text sources interpret the query itself (arithmetic, URLs).

mod address;
mod calculator;
mod directory;
mod leaves;
mod list;
mod registry;

pub use address::UrlSource;
pub use calculator::CalculatorSource;
pub use directory::DirectorySource;
pub use leaves::{FileLeaf, TextLeaf, UrlLeaf};
pub use list::ListSource;
pub use registry::SourceRegistry;
