//! Point-in-time attribute store built on ordered, non-overlapping time windows.
//!
//! ## Features
//! - **Time windows**: half-open `[start, end)` intervals, unbounded windows
//!   and search probes with a containment-aware ordering
//! - **Timelines**: O(log n) "which value held at `t`" lookups, append-style
//!   open/close sequencing and safe boundary re-keying
//! - **Attribute stores**: one timeline per attribute name, with writes and
//!   removals that may land anywhere in history
//! - **Sync wrapper**: `SyncStore` for shared access (with `sync` feature)
//!
//! ```rust
//! use tempus::{Tempus, Value};
//!
//! let mut attrs = Tempus::new();
//! attrs.set_at("x", 1.0, 13.37)?;
//! attrs.set_at("x", 3.0, 4.2)?;
//! attrs.set_flag_at("visible", 0.0)?;
//!
//! assert_eq!(attrs.value_at("x", 2.0), Some(&Value::Number(13.37)));
//! assert_eq!(attrs.count_at(3.5), 2);
//!
//! // Retroactive removal leaves a gap in history.
//! attrs.remove_at("visible", 2.0);
//! assert!(attrs.has_at("visible", 1.0));
//! assert!(!attrs.has_at("visible", 2.0));
//! # Ok::<(), tempus::TempusError>(())
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod store;
pub mod timeline;

#[cfg(feature = "sync")]
pub mod sync;

pub use builder::StoreBuilder;
pub use config::Config;
pub use error::{Result, TempusError};
pub use store::{AttributeStore, KeyCursor};
pub use timeline::{Cursor, Timeline};

#[cfg(feature = "sync")]
pub use sync::SyncStore;

pub use tempus_types::stats::StoreStats;
pub use tempus_types::value::Value;
pub use tempus_types::window::{TimeWindow, WindowEnd};

/// Attribute store holding [`Value`] payloads.
pub type Tempus = AttributeStore<Value>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Result, StoreBuilder, Tempus, TempusError};

    pub use crate::{AttributeStore, Timeline};

    pub use crate::{TimeWindow, Value};

    pub use crate::Config;

    #[cfg(feature = "sync")]
    pub use crate::SyncStore;
}
