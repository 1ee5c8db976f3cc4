//! Materialized instances.
//!
//! An [`Instance`] is what a factory invocation returns: the target schema,
//! an ordered field map with every relation already resolved, and a primary
//! key when a persistence store produced it. Instances are plain values; the
//! engine keeps no reference to them after returning.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{FactoryError, FactoryResult};
use crate::schema::ModelSchema;
use crate::value::{FieldValue, Overrides};

/// A materialized model instance.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use reinhardt_factories::instance::Instance;
/// use reinhardt_factories::schema::ModelSchema;
/// use reinhardt_factories::value::Overrides;
///
/// let schema = Arc::new(ModelSchema::new("Author").with_field("name"));
/// let author = Instance::new(schema, Overrides::new().with("name", "Bill Watterson")).unwrap();
///
/// assert_eq!(author.model_name(), "Author");
/// assert_eq!(author.str_value("name"), Some("Bill Watterson"));
/// assert!(!author.is_persisted());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
	schema: Arc<ModelSchema>,
	fields: IndexMap<String, FieldValue>,
	pk: Option<Value>,
}

impl Instance {
	/// Constructs an in-memory instance.
	///
	/// Fails with [`FactoryError::UnknownField`] if any key does not name a
	/// schema field. Missing fields are tolerated; required-field validation
	/// belongs to the persistence layer.
	pub fn new(schema: Arc<ModelSchema>, fields: Overrides) -> FactoryResult<Self> {
		Self::from_fields(schema, fields.into_entries(), None)
	}

	/// Constructs a persisted instance carrying a store-assigned primary key.
	pub fn with_pk(schema: Arc<ModelSchema>, fields: Overrides, pk: Value) -> FactoryResult<Self> {
		Self::from_fields(schema, fields.into_entries(), Some(pk))
	}

	pub(crate) fn from_fields(
		schema: Arc<ModelSchema>,
		fields: IndexMap<String, FieldValue>,
		pk: Option<Value>,
	) -> FactoryResult<Self> {
		for key in fields.keys() {
			if !schema.has_field(key) {
				return Err(FactoryError::UnknownField {
					model: schema.model_name().to_string(),
					field: key.clone(),
				});
			}
		}
		Ok(Self { schema, fields, pk })
	}

	/// Returns the schema this instance was built from.
	pub fn schema(&self) -> &ModelSchema {
		&self.schema
	}

	/// Returns the model name.
	pub fn model_name(&self) -> &str {
		self.schema.model_name()
	}

	/// Gets a field value by name.
	pub fn get(&self, field: &str) -> Option<&FieldValue> {
		self.fields.get(field)
	}

	/// Gets a field's literal JSON value, if it holds one.
	pub fn value(&self, field: &str) -> Option<&Value> {
		self.get(field).and_then(FieldValue::as_value)
	}

	/// Gets a field's string value, if it holds a literal string.
	pub fn str_value(&self, field: &str) -> Option<&str> {
		self.value(field).and_then(Value::as_str)
	}

	/// Gets the resolved related instance stored in a relation field.
	pub fn related(&self, field: &str) -> Option<&Instance> {
		self.get(field).and_then(FieldValue::as_instance)
	}

	/// Iterates fields in insertion order.
	pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
		self.fields.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Returns the store-assigned primary key, if any.
	pub fn pk(&self) -> Option<&Value> {
		self.pk.as_ref()
	}

	/// Returns true if a persistence store produced this instance.
	pub fn is_persisted(&self) -> bool {
		self.pk.is_some()
	}

	/// Renders the instance as a JSON record (`model` / `pk` / `fields`),
	/// with related instances nested recursively.
	pub fn to_value(&self) -> Value {
		let mut fields = serde_json::Map::new();
		for (name, value) in &self.fields {
			let rendered = match value {
				FieldValue::Value(v) => v.clone(),
				FieldValue::Instance(instance) => instance.to_value(),
				other => Value::String(other.to_string()),
			};
			fields.insert(name.clone(), rendered);
		}

		let mut record = serde_json::Map::new();
		record.insert("model".to_string(), Value::String(self.model_name().to_string()));
		if let Some(pk) = &self.pk {
			record.insert("pk".to_string(), pk.clone());
		}
		record.insert("fields".to_string(), Value::Object(fields));
		Value::Object(record)
	}
}

impl fmt::Display for Instance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}(", self.model_name())?;
		for (index, (name, value)) in self.fields.iter().enumerate() {
			if index > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{name}={value}")?;
		}
		f.write_str(")")
	}
}

impl Serialize for Instance {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.to_value().serialize(serializer)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn author_schema() -> Arc<ModelSchema> {
		Arc::new(ModelSchema::new("Author").with_field("name").with_field("age"))
	}

	fn book_schema() -> Arc<ModelSchema> {
		Arc::new(
			ModelSchema::new("Book")
				.with_field("title")
				.with_related_field("author", "Author"),
		)
	}

	#[rstest]
	fn test_accessors() {
		let author = Instance::new(
			author_schema(),
			Overrides::new().with("name", "Default Author").with("age", 57i64),
		)
		.unwrap();

		assert_eq!(author.str_value("name"), Some("Default Author"));
		assert_eq!(author.value("age"), Some(&json!(57)));
		assert_eq!(author.value("missing"), None);
		assert_eq!(author.pk(), None);
	}

	#[rstest]
	fn test_unknown_field_is_rejected() {
		let result = Instance::new(author_schema(), Overrides::new().with("foo", "bar"));
		let error = result.unwrap_err();
		assert!(matches!(error, FactoryError::UnknownField { .. }));
		assert!(error.to_string().contains("foo"));
	}

	#[rstest]
	fn test_related_instance() {
		let author = Instance::new(author_schema(), Overrides::new().with("name", "A")).unwrap();
		let book = Instance::new(
			book_schema(),
			Overrides::new().with("title", "T").with("author", author),
		)
		.unwrap();

		assert_eq!(book.related("author").unwrap().str_value("name"), Some("A"));
		assert_eq!(book.related("title"), None);
	}

	#[rstest]
	fn test_to_value_record_shape() {
		let author = Instance::with_pk(
			author_schema(),
			Overrides::new().with("name", "A"),
			json!(7),
		)
		.unwrap();

		assert_eq!(
			author.to_value(),
			json!({"model": "Author", "pk": 7, "fields": {"name": "A"}})
		);
		assert!(author.is_persisted());
	}

	#[rstest]
	fn test_display() {
		let author = Instance::new(
			author_schema(),
			Overrides::new().with("name", "A").with("age", 3i64),
		)
		.unwrap();
		assert_eq!(author.to_string(), "Author(name='A', age=3)");
	}
}
