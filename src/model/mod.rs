//! # Status Model
//!
//! Plain data shared by every layer: the loosely-typed documents the store
//! hands back, and the index states derived from them.
//!
//! Design rule: no I/O, no state, no async in this module.

pub mod value;
pub mod document;
pub mod status;

pub use value::Value;
pub use document::{Document, document, document_from_json};
pub use status::{IndexState, IndexStatus, PollAttempt, READY_SENTINEL};
