//! Content hashing for Grove.
//!
//! Provides domain-separated BLAKE3 hashing so that a blob, a tree and a
//! commit with identical bytes never share an [`ObjectId`].
//!
//! [`ObjectId`]: grove_types::ObjectId

pub mod hasher;

pub use hasher::ContentHasher;
