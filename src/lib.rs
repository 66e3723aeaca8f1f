//! Bookshelf application library
//!
//! Hosts the books module: its models, storage, and HTTP routes.

pub mod modules;

pub use modules::*;
