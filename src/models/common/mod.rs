pub mod tables;

pub use tables::{DistinctField, TableKind};
