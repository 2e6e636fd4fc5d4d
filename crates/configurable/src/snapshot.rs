//! Capture and restore of field values.

use serde::{Deserialize, Serialize};

use configurable_core::{ConfigValue, Result};

use crate::controller::PropertyController;

/// Field values captured by [`PropertyController::snapshot`], keyed by name
/// in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    values: Vec<(String, ConfigValue)>,
}

impl Snapshot {
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.values
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PropertyController {
    /// Capture the current value of every field. The lock set is not part of
    /// the snapshot.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state();
        let values = self
            .schema()
            .fields()
            .iter()
            .zip(state.values.iter())
            .map(|(spec, value)| (spec.name().to_string(), value.clone()))
            .collect();
        Snapshot { values }
    }

    /// Write snapshot values back into public fields that are still mutable.
    ///
    /// Restricted fields are only ever written through `immutable()`, so they
    /// are skipped, as are locked fields; the lock set is left as is.
    /// Validators are not consulted. Every name in the snapshot must be
    /// declared here, otherwise nothing is written. Returns the number of
    /// fields written.
    pub fn restore(&self, snapshot: &Snapshot) -> Result<usize> {
        let targets = snapshot
            .values
            .iter()
            .map(|(name, value)| self.schema().position(name).map(|idx| (idx, value)))
            .collect::<Result<Vec<_>>>()?;

        let mut state = self.state();
        let mut written = 0;
        for (idx, value) in targets {
            let spec = &self.schema().fields()[idx];
            if !spec.accessibility().is_public() {
                tracing::debug!(field = %spec.name(), "Field is restricted, restore skipped");
                continue;
            }
            if state.locked[idx] {
                continue;
            }
            state.values[idx] = value.clone();
            written += 1;
        }
        tracing::debug!(written, skipped = snapshot.len() - written, "Snapshot restored");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use configurable_core::{Configurable, ConfigurableError};

    fn controller() -> PropertyController {
        let schema = Schema::builder()
            .public("name", "x")
            .restricted("token", "")
            .public("debug", false)
            .build()
            .unwrap();
        PropertyController::new(schema)
    }

    #[test]
    fn test_snapshot_captures_all_fields_in_order() {
        let ctl = controller();
        ctl.set("name", "y".into()).unwrap();

        let snap = ctl.snapshot();
        let names: Vec<&str> = snap.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["name", "token", "debug"]);
        assert_eq!(snap.get("name"), Some(&ConfigValue::from("y")));
        assert_eq!(snap.get("missing"), None);
    }

    #[test]
    fn test_restore_rolls_back_mutable_fields() {
        let ctl = controller();
        let snap = ctl.snapshot();

        ctl.set("name", "changed".into()).unwrap();
        ctl.switch("debug".into()).unwrap();

        let written = ctl.restore(&snap).unwrap();
        assert_eq!(written, 2);
        assert_eq!(ctl.get("name").unwrap(), ConfigValue::from("x"));
        assert_eq!(ctl.get("debug").unwrap(), ConfigValue::Bool(false));
    }

    #[test]
    fn test_restore_skips_locked_fields() {
        let ctl = controller();
        let snap = ctl.snapshot();

        ctl.immutable("name", "pinned".into()).unwrap();
        ctl.switch("debug".into()).unwrap();

        let written = ctl.restore(&snap).unwrap();
        assert_eq!(written, 1);
        assert_eq!(ctl.get("name").unwrap(), ConfigValue::from("pinned"));
        assert!(ctl.is_locked("name").unwrap());
        assert_eq!(ctl.get("debug").unwrap(), ConfigValue::Bool(false));
    }

    #[test]
    fn test_restore_never_writes_restricted_field() {
        let ctl = controller();
        let forged: Snapshot =
            serde_json::from_str(r#"{"values":[["token","evil"],["name","y"]]}"#).unwrap();

        let written = ctl.restore(&forged).unwrap();
        assert_eq!(written, 1);
        assert_eq!(ctl.get("token").unwrap(), ConfigValue::from(""));
        assert!(!ctl.is_locked("token").unwrap());
        assert_eq!(ctl.get("name").unwrap(), ConfigValue::from("y"));

        ctl.immutable("token", "abc123".into()).unwrap();
        assert_eq!(ctl.get("token").unwrap(), ConfigValue::from("abc123"));
    }

    #[test]
    fn test_restore_foreign_snapshot_writes_nothing() {
        let ctl = controller();
        let other = PropertyController::new(
            Schema::builder()
                .public("name", "other")
                .public("extra", 1)
                .build()
                .unwrap(),
        );

        let err = ctl.restore(&other.snapshot()).unwrap_err();
        assert_eq!(err, ConfigurableError::NotFound("extra".into()));
        assert_eq!(ctl.get("name").unwrap(), ConfigValue::from("x"));
    }

    #[test]
    fn test_snapshot_serde_roundtrip() {
        let ctl = controller();
        let snap = ctl.snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
        assert_eq!(ctl.restore(&back).unwrap(), 2);
    }
}
