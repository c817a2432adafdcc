//! Foundation types for Grove.
//!
//! Every other Grove crate depends on `grove-types`. It deliberately holds
//! very little: the content-addressed [`ObjectId`] and the error produced
//! when parsing one.

pub mod error;
pub mod object;

pub use error::TypeError;
pub use object::{ObjectId, OBJECT_ID_LEN};
