#![doc = include_str!("../README.md")]

pub mod builtin;
pub mod passthrough;
pub mod query;
pub mod registry;
pub mod table;

pub use passthrough::JsonQuery;
pub use query::{DATESTAMP_FORMAT, Query, datestamp};
pub use registry::{QueryRegistry, QuerySelection, RegistryEntry};
pub use table::{Column, TableQuery};
