//! Document addressing for the hierarchical document store

pub mod path;

pub use path::DocumentPath;
