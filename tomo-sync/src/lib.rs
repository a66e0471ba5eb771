#![forbid(unsafe_code)]
#![warn(missing_docs)]
//! Privacy wallet sync engine
//!
//! Entrypoints: [`crate::reconcile::reconcile`] and [`crate::ownership::scan_ownership`]

pub mod error;
#[cfg(any(test, feature = "test-elevation"))]
pub mod mocks;
pub mod ownership;
pub mod primitives;
pub mod reconcile;
pub mod traits;
pub mod utils;

pub use error::SyncError;
pub use traits::ChainProvider;
