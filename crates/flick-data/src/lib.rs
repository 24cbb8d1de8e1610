//! The flick data-access façade.
//!
//! [`DataAccess`] is the single writer gate in front of a
//! [`flick_core::store::MovieStore`]. Favorites and their children are read
//! and written straight through; listing pages are fetched from a
//! [`flick_core::catalogue::Catalogue`], cached, and read back. Every write
//! that changes rows is announced on a broadcast channel.
//!
//! ```rust,ignore
//! let data = DataAccess::new(store, tmdb, NetworkStatus::online());
//! let mut changes = data.subscribe();
//! let page = data.listing(SortOrder::Popular, 1).await?;
//! ```

mod access;
pub mod error;
mod network;
mod reconcile;

pub use access::{DataAccess, Refresh};
pub use error::{Error, Result};
pub use network::NetworkStatus;
