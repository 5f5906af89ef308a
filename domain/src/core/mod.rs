//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: errors raised while building domain values
//! - [`string`]: text helpers (excerpts, document ids)

pub mod error;
pub mod string;
