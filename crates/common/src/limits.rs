//! Per-field constraint metadata served alongside a resource.
//!
//! A limit entry for a field means the server supports that field, even if
//! the resource currently has no value for it. Fields without an entry carry
//! no client-side constraint.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::result::ResultCode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanLimit {
    pub field_name: String,
    #[serde(default)]
    pub default: Option<bool>,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatLimit {
    pub field_name: String,
    #[serde(default)]
    pub default: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegerLimit {
    pub field_name: String,
    #[serde(default)]
    pub default: Option<i64>,
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
    #[serde(default)]
    pub read_only: bool,
}

/// Constraint on a list field whose elements come from `options`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLimit {
    pub field_name: String,
    #[serde(default)]
    pub default: Vec<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub max_items: Option<usize>,
    #[serde(default)]
    pub read_only: bool,
}

/// Nested object field; only presence and writability are described
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectLimit {
    pub field_name: String,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringLimit {
    pub field_name: String,
    #[serde(default)]
    pub default: Option<String>,
    /// Allowed values; empty means free text
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub read_only: bool,
}

/// Borrowed view of one field's limit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimitRef<'a> {
    Boolean(&'a BooleanLimit),
    Float(&'a FloatLimit),
    Integer(&'a IntegerLimit),
    List(&'a ListLimit),
    Object(&'a ObjectLimit),
    String(&'a StringLimit),
}

impl LimitRef<'_> {
    pub fn field_name(&self) -> &str {
        match self {
            LimitRef::Boolean(l) => &l.field_name,
            LimitRef::Float(l) => &l.field_name,
            LimitRef::Integer(l) => &l.field_name,
            LimitRef::List(l) => &l.field_name,
            LimitRef::Object(l) => &l.field_name,
            LimitRef::String(l) => &l.field_name,
        }
    }

    pub fn read_only(&self) -> bool {
        match self {
            LimitRef::Boolean(l) => l.read_only,
            LimitRef::Float(l) => l.read_only,
            LimitRef::Integer(l) => l.read_only,
            LimitRef::List(l) => l.read_only,
            LimitRef::Object(l) => l.read_only,
            LimitRef::String(l) => l.read_only,
        }
    }
}

/// Field limits of one resource, grouped by value type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    #[serde(default)]
    pub booleans: Vec<BooleanLimit>,
    #[serde(default)]
    pub floats: Vec<FloatLimit>,
    #[serde(default)]
    pub integers: Vec<IntegerLimit>,
    #[serde(default)]
    pub lists: Vec<ListLimit>,
    #[serde(default)]
    pub objects: Vec<ObjectLimit>,
    #[serde(default)]
    pub strings: Vec<StringLimit>,
}

impl Limits {
    pub fn get(&self, field: &str) -> Option<LimitRef<'_>> {
        self.iter().find(|l| l.field_name() == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = LimitRef<'_>> {
        self.booleans
            .iter()
            .map(LimitRef::Boolean)
            .chain(self.floats.iter().map(LimitRef::Float))
            .chain(self.integers.iter().map(LimitRef::Integer))
            .chain(self.lists.iter().map(LimitRef::List))
            .chain(self.objects.iter().map(LimitRef::Object))
            .chain(self.strings.iter().map(LimitRef::String))
    }

    pub fn len(&self) -> usize {
        self.booleans.len()
            + self.floats.len()
            + self.integers.len()
            + self.lists.len()
            + self.objects.len()
            + self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the server advertises the field at all
    pub fn is_supported(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn is_read_only(&self, field: &str) -> bool {
        self.get(field).map(|l| l.read_only()).unwrap_or(false)
    }

    fn writable(&self, field: &str) -> Result<()> {
        if self.is_read_only(field) {
            return Err(Error::rejected(field, ResultCode::ReadOnly, "field is read-only"));
        }
        Ok(())
    }

    pub fn check_bool(&self, field: &str) -> Result<()> {
        self.writable(field)
    }

    pub fn check_integer(&self, field: &str, value: i64) -> Result<()> {
        self.writable(field)?;
        if let Some(LimitRef::Integer(limit)) = self.get(field) {
            if limit.min.is_some_and(|min| value < min) || limit.max.is_some_and(|max| value > max) {
                return Err(Error::rejected(
                    field,
                    ResultCode::ValueOutOfRange,
                    format!("{} outside {:?}..={:?}", value, limit.min, limit.max),
                ));
            }
        }
        Ok(())
    }

    pub fn check_float(&self, field: &str, value: f64) -> Result<()> {
        self.writable(field)?;
        if let Some(LimitRef::Float(limit)) = self.get(field) {
            if limit.min.is_some_and(|min| value < min) || limit.max.is_some_and(|max| value > max) {
                return Err(Error::rejected(
                    field,
                    ResultCode::ValueOutOfRange,
                    format!("{} outside {:?}..={:?}", value, limit.min, limit.max),
                ));
            }
        }
        Ok(())
    }

    pub fn check_string(&self, field: &str, value: &str) -> Result<()> {
        self.writable(field)?;
        if let Some(LimitRef::String(limit)) = self.get(field) {
            if limit.max_length.is_some_and(|max| value.len() > max) {
                return Err(Error::invalid(field, "value exceeds maximum length"));
            }
            if !limit.options.is_empty() && !limit.options.iter().any(|o| o == value) {
                return Err(Error::rejected(
                    field,
                    ResultCode::UnsupportedValue,
                    format!("'{}' is not one of {:?}", value, limit.options),
                ));
            }
        }
        Ok(())
    }

    pub fn check_list(&self, field: &str, values: &[String]) -> Result<()> {
        self.writable(field)?;
        if let Some(LimitRef::List(limit)) = self.get(field) {
            if limit.max_items.is_some_and(|max| values.len() > max) {
                return Err(Error::rejected(field, ResultCode::ValueOutOfRange, "too many items"));
            }
            if !limit.options.is_empty() {
                if let Some(bad) = values.iter().find(|v| !limit.options.contains(*v)) {
                    return Err(Error::rejected(
                        field,
                        ResultCode::UnsupportedValue,
                        format!("'{}' is not an allowed option", bad),
                    ));
                }
            }
        }
        Ok(())
    }
}
