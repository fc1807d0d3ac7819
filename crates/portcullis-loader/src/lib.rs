//! Dataset loading for `portcullis`
//!
//! The engine never performs I/O; this crate owns reading the three JSON
//! dataset documents (policies, subjects, context) from disk and handing
//! the engine a typed [`portcullis_types::Datasets`] bundle.
//!
//! Loading is per-source: a document that fails to read or parse is logged
//! and recorded as missing in the bundle, and the engine then refuses to
//! evaluate with an explicit data-unavailable error. Callers that prefer to
//! abort on the first failure use the strict per-source loads.

mod error;
mod loader;

pub use error::LoadError;
pub use loader::{
    DEFAULT_CONTEXT_FILE, DEFAULT_POLICY_FILE, DEFAULT_SUBJECT_FILE, DatasetLoader,
};
