//! Content hashing and object identity for the lit object store.
//!
//! This crate provides the `ObjectId` type, the streaming `Hasher` used to
//! content-address objects, and the hex encoding helpers shared by the rest
//! of the workspace.

mod error;
pub mod hex;
mod oid;
pub mod hasher;

pub use error::HashError;
pub use hasher::Hasher;
pub use oid::ObjectId;
