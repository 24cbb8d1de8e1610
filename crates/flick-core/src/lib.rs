//! Core types and trait definitions for the flick movie catalogue cache.
//!
//! No HTTP or database code lives here. The store, the remote catalogue
//! client and the data-access layer meet only through the traits declared
//! in [`store`] and [`catalogue`], whose methods return `Send` futures so
//! the façade can be driven from any tokio task.

pub mod catalogue;
pub mod error;
pub mod movie;
pub mod resource;
pub mod store;

pub use error::{Error, Result};
