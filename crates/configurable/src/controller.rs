//! Reference implementation of [`Configurable`].
//!
//! A `PropertyController` owns the current value of every declared field and
//! the lock set: the names committed through `immutable()`. Both live behind a
//! single per-instance mutex so that "check lock set, assign, extend lock set"
//! is atomic; two racing `immutable()` calls on one field cannot both win.
//! Validators run before the lock is taken and the lock set is checked again
//! once it is held.

use std::sync::{Mutex, MutexGuard, PoisonError};

use configurable_core::{
    Accessibility, ConfigValue, Configurable, ConfigurableError, FieldDescriptor, Result,
    SwitchSelector,
};

use crate::schema::{FieldSpec, Schema};

#[derive(Debug)]
pub(crate) struct State {
    pub(crate) values: Vec<ConfigValue>,
    /// `locked[i]` mirrors membership of field `i` in `lock_order`.
    pub(crate) locked: Vec<bool>,
    /// Lock set in commit order. Never shrinks.
    pub(crate) lock_order: Vec<usize>,
}

impl State {
    fn lock(&mut self, idx: usize) {
        if !self.locked[idx] {
            self.locked[idx] = true;
            self.lock_order.push(idx);
        }
    }
}

/// Owns the configuration surface of one instance.
#[derive(Debug)]
pub struct PropertyController {
    schema: Schema,
    state: Mutex<State>,
}

impl PropertyController {
    /// Create a controller whose fields start at their declared defaults and
    /// whose lock set is empty.
    pub fn new(schema: Schema) -> Self {
        let values = schema
            .fields()
            .iter()
            .map(|spec| spec.default_value().clone())
            .collect();
        let locked = vec![false; schema.len()];
        Self {
            schema,
            state: Mutex::new(State {
                values,
                locked,
                lock_order: Vec::new(),
            }),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validators run without the lock and every mutation is a single
    /// assignment, so a poisoned lock still guards consistent state.
    pub(crate) fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve(&self, name: &str) -> Result<(usize, &FieldSpec)> {
        let idx = self.schema.position(name)?;
        Ok((idx, &self.schema.fields()[idx]))
    }

    fn locked_at(&self, idx: usize) -> bool {
        self.state().locked[idx]
    }

    pub fn is_locked(&self, name: &str) -> Result<bool> {
        let idx = self.schema.position(name)?;
        Ok(self.state().locked[idx])
    }

    /// Names in the lock set, in the order they were committed.
    pub fn locked_fields(&self) -> Vec<String> {
        let state = self.state();
        state
            .lock_order
            .iter()
            .map(|&idx| self.schema.fields()[idx].name().to_string())
            .collect()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.schema.fields().iter().map(FieldSpec::name).collect()
    }

    pub fn accessibility(&self, name: &str) -> Result<Accessibility> {
        Ok(self.schema.field(name)?.accessibility())
    }
}

impl Configurable for PropertyController {
    fn defaults(&self) -> Vec<FieldDescriptor> {
        let state = self.state();
        self.schema
            .fields()
            .iter()
            .zip(state.values.iter().zip(state.locked.iter()))
            .map(|(spec, (value, &locked))| FieldDescriptor {
                name: spec.name().to_string(),
                accessibility: spec.accessibility(),
                value: value.clone(),
                locked,
            })
            .collect()
    }

    /// Unknown names are reported before any field changes. Restricted and
    /// locked fields are skipped. A name listed twice is toggled twice.
    fn switch(&self, selector: SwitchSelector) -> Result<()> {
        let targets = selector
            .names()
            .iter()
            .map(|name| self.schema.position(name))
            .collect::<Result<Vec<_>>>()?;

        let mut state = self.state();
        for idx in targets {
            let spec = &self.schema.fields()[idx];
            if !spec.accessibility().is_public() {
                tracing::debug!(field = %spec.name(), "Field is restricted, switch skipped");
                continue;
            }
            if state.locked[idx] {
                tracing::debug!(field = %spec.name(), "Field is locked, switch skipped");
                continue;
            }
            let flipped = !state.values[idx].is_truthy();
            state.values[idx] = ConfigValue::Bool(flipped);
        }
        Ok(())
    }

    fn immutable(&self, name: &str, value: ConfigValue) -> Result<()> {
        let (idx, spec) = self.resolve(name)?;

        if self.locked_at(idx) {
            tracing::debug!(field = %name, "Field already locked, immutable() ignored");
            return Ok(());
        }
        if !accepts(spec, &value) {
            return Ok(());
        }

        let mut state = self.state();
        // Another writer may have committed while the value was validated.
        if state.locked[idx] {
            tracing::debug!(field = %name, "Field already locked, immutable() ignored");
            return Ok(());
        }
        state.values[idx] = value;
        state.lock(idx);
        Ok(())
    }

    fn set(&self, name: &str, value: ConfigValue) -> Result<()> {
        let (idx, spec) = self.resolve(name)?;

        // Accessibility is checked before the lock set: a restricted field
        // fails here even after it has been locked.
        if !spec.accessibility().is_public() {
            tracing::debug!(field = %name, "set() refused for restricted field");
            return Err(ConfigurableError::AccessDenied {
                field: name.to_string(),
            });
        }

        if self.locked_at(idx) {
            tracing::debug!(field = %name, "Field is locked, set() ignored");
            return Ok(());
        }
        if !accepts(spec, &value) {
            return Ok(());
        }

        let mut state = self.state();
        if state.locked[idx] {
            tracing::debug!(field = %name, "Field is locked, set() ignored");
            return Ok(());
        }
        state.values[idx] = value;
        Ok(())
    }

    fn get(&self, name: &str) -> Result<ConfigValue> {
        let idx = self.schema.position(name)?;
        Ok(self.state().values[idx].clone())
    }
}

/// Run the field validator outside the state lock, so validators may read
/// the controller they belong to. Rejections are logged, never returned.
fn accepts(spec: &FieldSpec, value: &ConfigValue) -> bool {
    match spec.validate(value) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                field = %spec.name(),
                error = %format!("{e:#}"),
                "Rejected value for configurable field"
            );
            false
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
