//! # tempus-types
//!
//! Core data types for the Tempus temporal attribute store.
//!
//! - **Windows**: `TimeWindow`, the half-open interval key with its
//!   containment-aware ordering, and `WindowEnd`
//! - **Values**: `Value`, the default attribute payload
//! - **Stats**: `StoreStats`
//!
//! All types are serializable with Serde.
//!
//! ## Examples
//!
//! ```rust
//! use tempus_types::window::TimeWindow;
//! use tempus_types::value::Value;
//!
//! let window = TimeWindow::closed(0.0, 10.0);
//! assert!(window.contains(5.0));
//! assert!(!window.overlaps(&TimeWindow::unbounded(10.0)));
//!
//! let value = Value::from("red");
//! assert_eq!(value.as_text(), Some("red"));
//! ```

pub mod stats;
pub mod value;
pub mod window;
