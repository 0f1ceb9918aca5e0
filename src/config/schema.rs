//! Record schema definitions and record instances

use super::value::{FieldKind, FieldValue};
use crate::error::{Error, Result};

/// A declared field: name, type and default value
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub default: FieldValue,
}

impl FieldDef {
    pub fn kind(&self) -> FieldKind {
        self.default.kind()
    }
}

/// A named schema of typed fields. The name doubles as the INI section name.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordType {
    name: String,
    fields: Vec<FieldDef>,
}

impl RecordType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declare a field whose kind is taken from its default.
    ///
    /// Declaring a name twice replaces the earlier definition in place.
    pub fn field(mut self, name: impl Into<String>, default: impl Into<FieldValue>) -> Self {
        let def = FieldDef {
            name: name.into(),
            default: default.into(),
        };
        match self.fields.iter_mut().find(|f| f.name == def.name) {
            Some(existing) => *existing = def,
            None => self.fields.push(def),
        }
        self
    }

    pub fn string(self, name: impl Into<String>, default: impl Into<String>) -> Self {
        self.field(name, FieldValue::Str(default.into()))
    }

    pub fn int(self, name: impl Into<String>, default: i64) -> Self {
        self.field(name, FieldValue::Int(default))
    }

    pub fn float(self, name: impl Into<String>, default: f64) -> Self {
        self.field(name, FieldValue::Float(default))
    }

    pub fn boolean(self, name: impl Into<String>, default: bool) -> Self {
        self.field(name, FieldValue::Bool(default))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check that `instance` has exactly this type's fields with matching
    /// kinds, and return it with its values in schema order.
    pub fn conform(&self, instance: RecordInstance) -> Result<RecordInstance> {
        if instance.record != self.name {
            return Err(Error::RecordNotFound(instance.record));
        }
        for (field, value) in &instance.values {
            let def = self.get_field(field).ok_or_else(|| Error::FieldNotFound {
                record: self.name.clone(),
                field: field.clone(),
            })?;
            if def.kind() != value.kind() {
                return Err(Error::TypeMismatch {
                    record: self.name.clone(),
                    field: field.clone(),
                    expected: def.kind(),
                    found: value.kind(),
                });
            }
        }

        let mut values = Vec::with_capacity(self.fields.len());
        for def in &self.fields {
            let value = instance
                .values
                .iter()
                .find(|(k, _)| *k == def.name)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| Error::FieldNotFound {
                    record: self.name.clone(),
                    field: def.name.clone(),
                })?;
            values.push((def.name.clone(), value));
        }
        Ok(RecordInstance {
            record: self.name.clone(),
            values,
        })
    }

    /// Carry the values of `previous` over to this schema. Fields that are
    /// gone are dropped; new fields and fields whose kind changed get their
    /// defaults.
    pub fn refill(&self, previous: &RecordInstance) -> RecordInstance {
        let mut instance = RecordInstance::defaults(self);
        for (field, slot) in instance.values.iter_mut() {
            if let Ok(old) = previous.get(field) {
                if old.kind() == slot.kind() {
                    *slot = old.clone();
                }
            }
        }
        instance
    }
}

/// Concrete values for a [`RecordType`], kept in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordInstance {
    record: String,
    values: Vec<(String, FieldValue)>,
}

impl RecordInstance {
    /// Instance with every field at its declared default
    pub fn defaults(record_type: &RecordType) -> Self {
        Self {
            record: record_type.name.clone(),
            values: record_type
                .fields
                .iter()
                .map(|f| (f.name.clone(), f.default.clone()))
                .collect(),
        }
    }

    /// Name of the record type this instance belongs to
    pub fn record(&self) -> &str {
        &self.record
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, field: &str) -> Result<&FieldValue> {
        self.values
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v)
            .ok_or_else(|| self.not_found(field))
    }

    /// Replace a field value. The new value must match the declared kind.
    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) -> Result<()> {
        let value = value.into();
        let record = &self.record;
        let slot = self
            .values
            .iter_mut()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v)
            .ok_or_else(|| Error::FieldNotFound {
                record: record.clone(),
                field: field.to_string(),
            })?;

        if slot.kind() != value.kind() {
            return Err(Error::TypeMismatch {
                record: record.clone(),
                field: field.to_string(),
                expected: slot.kind(),
                found: value.kind(),
            });
        }
        *slot = value;
        Ok(())
    }

    pub fn get_str(&self, field: &str) -> Result<&str> {
        let value = self.get(field)?;
        value.as_str().ok_or_else(|| self.mismatch(field, FieldKind::Str, value))
    }

    pub fn get_int(&self, field: &str) -> Result<i64> {
        let value = self.get(field)?;
        value.as_int().ok_or_else(|| self.mismatch(field, FieldKind::Int, value))
    }

    pub fn get_float(&self, field: &str) -> Result<f64> {
        let value = self.get(field)?;
        value
            .as_float()
            .ok_or_else(|| self.mismatch(field, FieldKind::Float, value))
    }

    pub fn get_bool(&self, field: &str) -> Result<bool> {
        let value = self.get(field)?;
        value.as_bool().ok_or_else(|| self.mismatch(field, FieldKind::Bool, value))
    }

    fn not_found(&self, field: &str) -> Error {
        Error::FieldNotFound {
            record: self.record.clone(),
            field: field.to_string(),
        }
    }

    fn mismatch(&self, field: &str, expected: FieldKind, found: &FieldValue) -> Error {
        Error::TypeMismatch {
            record: self.record.clone(),
            field: field.to_string(),
            expected,
            found: found.kind(),
        }
    }
}
