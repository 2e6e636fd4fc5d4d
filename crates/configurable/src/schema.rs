//! Per-type field metadata table.
//!
//! Each configurable type declares its fields once, with a name, an
//! accessibility level, a default value and an optional validator. The
//! controller enumerates fields and checks accessibility against this table.

use std::collections::HashMap;
use std::sync::Arc;

use configurable_core::{Accessibility, ConfigValue, ConfigurableError, Result};

/// Assignment-time check for a field. A rejection is reported as a
/// diagnostic and never reaches the caller of `set()` or `immutable()`.
pub type Validator = Arc<dyn Fn(&ConfigValue) -> anyhow::Result<()> + Send + Sync>;

/// Declaration of a single configurable field.
#[derive(Clone)]
pub struct FieldSpec {
    name: String,
    accessibility: Accessibility,
    default: ConfigValue,
    validator: Option<Validator>,
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("accessibility", &self.accessibility)
            .field("default", &self.default)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

impl FieldSpec {
    pub fn new(
        name: impl Into<String>,
        accessibility: Accessibility,
        default: impl Into<ConfigValue>,
    ) -> Self {
        Self {
            name: name.into(),
            accessibility,
            default: default.into(),
            validator: None,
        }
    }

    pub fn public(name: impl Into<String>, default: impl Into<ConfigValue>) -> Self {
        Self::new(name, Accessibility::Public, default)
    }

    pub fn restricted(name: impl Into<String>, default: impl Into<ConfigValue>) -> Self {
        Self::new(name, Accessibility::Restricted, default)
    }

    /// Attach a validator run before every `set()`/`immutable()` assignment.
    /// Defaults, `switch()` and `restore()` are not validated.
    ///
    /// Validators run without the controller's lock held, so they may read
    /// other fields of the same controller.
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&ConfigValue) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accessibility(&self) -> Accessibility {
        self.accessibility
    }

    pub fn default_value(&self) -> &ConfigValue {
        &self.default
    }

    pub(crate) fn validate(&self, value: &ConfigValue) -> anyhow::Result<()> {
        match &self.validator {
            Some(validator) => validator(value),
            None => Ok(()),
        }
    }
}

/// Ordered field table for one configurable type.
///
/// Cheap to clone; instances of the same type can share one schema.
#[derive(Clone, Debug)]
pub struct Schema {
    fields: Arc<[FieldSpec]>,
    index: Arc<HashMap<String, usize>>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Position of `name` in declaration order.
    pub fn position(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ConfigurableError::NotFound(name.to_string()))
    }

    pub fn field(&self, name: &str) -> Result<&FieldSpec> {
        let idx = self.position(name)?;
        Ok(&self.fields[idx])
    }
}

/// Collects field declarations; `build()` rejects duplicate names.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn public(self, name: impl Into<String>, default: impl Into<ConfigValue>) -> Self {
        self.field(FieldSpec::public(name, default))
    }

    pub fn restricted(self, name: impl Into<String>, default: impl Into<ConfigValue>) -> Self {
        self.field(FieldSpec::restricted(name, default))
    }

    pub fn build(self) -> Result<Schema> {
        let mut index = HashMap::with_capacity(self.fields.len());
        for (idx, spec) in self.fields.iter().enumerate() {
            if index.insert(spec.name.clone(), idx).is_some() {
                return Err(ConfigurableError::DuplicateField(spec.name.clone()));
            }
        }
        Ok(Schema {
            fields: self.fields.into(),
            index: Arc::new(index),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_preserves_declaration_order() {
        let schema = Schema::builder()
            .public("b", 1)
            .restricted("a", "")
            .public("c", true)
            .build()
            .unwrap();

        let names: Vec<&str> = schema.fields().iter().map(FieldSpec::name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(schema.position("c").unwrap(), 2);
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = Schema::builder()
            .public("name", "x")
            .restricted("name", "y")
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigurableError::DuplicateField("name".into()));
    }

    #[test]
    fn test_unknown_field_is_not_found() {
        let schema = Schema::builder().public("name", "x").build().unwrap();
        assert!(!schema.contains("other"));
        assert_eq!(
            schema.field("other").unwrap_err(),
            ConfigurableError::NotFound("other".into())
        );
    }

    #[test]
    fn test_empty_schema() {
        let schema = Schema::builder().build().unwrap();
        assert!(schema.is_empty());
    }

    #[test]
    fn test_validator_runs_only_when_attached() {
        let plain = FieldSpec::public("port", 80);
        assert!(plain.validate(&ConfigValue::from("nope")).is_ok());

        let checked = FieldSpec::public("port", 80).with_validator(|value| {
            if value.as_i64().is_none() {
                anyhow::bail!("expected an integer, got {}", value.kind());
            }
            Ok(())
        });
        let err = checked.validate(&ConfigValue::from("nope")).unwrap_err();
        assert_eq!(err.to_string(), "expected an integer, got string");
        assert!(checked.validate(&ConfigValue::Int(8080)).is_ok());
    }

    #[test]
    fn test_field_spec_debug_hides_validator_body() {
        let spec = FieldSpec::restricted("token", "").with_validator(|_| Ok(()));
        let debug = format!("{spec:?}");
        assert!(debug.contains("\"token\""));
        assert!(debug.contains("validator: true"));
        assert_eq!(spec.accessibility(), Accessibility::Restricted);
        assert_eq!(spec.default_value(), &ConfigValue::from(""));
    }
}
