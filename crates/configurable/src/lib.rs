//! Property access controller: the reference [`Configurable`] implementation.
//!
//! A type declares its configuration surface once as a [`Schema`] and owns a
//! [`PropertyController`] built from it. The controller then enforces:
//! - accessibility on `set()` (restricted fields are refused),
//! - write-once locking through `immutable()`,
//! - boolean toggling through `switch()`.
//!
//! Values rejected by a field validator during assignment are reported on the
//! `tracing` diagnostic channel instead of being returned to the caller.
//!
//! ```
//! use configurable::{Configurable, PropertyController, Schema};
//!
//! let schema = Schema::builder()
//!     .public("name", "x")
//!     .restricted("token", "")
//!     .build()?;
//! let ctl = PropertyController::new(schema);
//!
//! ctl.immutable("token", "abc123".into())?;
//! assert_eq!(ctl.get("token")?.as_str(), Some("abc123"));
//! assert!(ctl.set("token", "zzz".into()).is_err());
//! # Ok::<(), configurable::ConfigurableError>(())
//! ```

pub mod controller;
pub mod schema;
pub mod snapshot;

pub use configurable_core::{
    Accessibility, ConfigValue, Configurable, ConfigurableError, FieldDescriptor, Result,
    SwitchSelector,
};
pub use controller::PropertyController;
pub use schema::{FieldSpec, Schema, SchemaBuilder, Validator};
pub use snapshot::Snapshot;
