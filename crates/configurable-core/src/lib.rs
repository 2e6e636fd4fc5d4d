//! The configurable capability: the operations every configurable object
//! supports, and the vocabulary types they exchange.
//!
//! Three mutation disciplines are exposed:
//! - `set()`: ordinary write, refused for restricted fields.
//! - `immutable()`: write-once, bypasses accessibility, then locks the field.
//! - `switch()`: boolean toggle of one or more fields.

pub mod error;
pub mod types;

pub use error::{ConfigurableError, Result};
pub use types::{Accessibility, ConfigValue, FieldDescriptor, SwitchSelector};

/// Contract implemented by every configurable object.
///
/// All operations take `&self`; implementations keep their state behind
/// interior mutability so a single instance can be shared between threads.
pub trait Configurable {
    /// Enumerate every declared field, whatever its accessibility, with its
    /// value at call time.
    fn defaults(&self) -> Vec<FieldDescriptor>;

    /// Replace each selected field with the complement of its truthiness.
    ///
    /// Toggling a non-boolean field is implementation-defined; see
    /// [`ConfigValue::is_truthy`] for the coercion the reference
    /// implementation applies. Restricted and locked fields are left
    /// untouched. Field validators are not run: the stored value is always a
    /// `Bool`, even for a field whose validator would reject one.
    ///
    /// There is no selector for toggling every boolean field at once.
    fn switch(&self, selector: SwitchSelector) -> Result<()>;

    /// Write `value` once, regardless of accessibility, and lock the field.
    /// A second call for an already locked field is a silent no-op.
    fn immutable(&self, name: &str, value: ConfigValue) -> Result<()>;

    /// Ordinary write.
    ///
    /// Fails with [`ConfigurableError::AccessDenied`] for restricted fields,
    /// even when they are also locked. Writes to locked fields are silent
    /// no-ops, and a value rejected during assignment is reported through
    /// diagnostics only, never through the return value.
    fn set(&self, name: &str, value: ConfigValue) -> Result<()>;

    /// Read the current value of a field.
    fn get(&self, name: &str) -> Result<ConfigValue>;
}
