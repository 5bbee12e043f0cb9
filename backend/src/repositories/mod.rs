//! Document repositories
//!
//! Typed access to the collections of the document store.

pub mod user;

pub use user::{normalize_email, UserDocument, UserRepository};
