//! Explicit schema descriptions for factory targets.
//!
//! A factory never inspects a model type through reflection or ORM metadata;
//! it consumes a [`ModelSchema`] built once per model: an ordered list of
//! field descriptors, each knowing whether it references another model.

use std::fmt;

/// Metadata about a single schema field.
///
/// A field either holds a plain value or references another model
/// ("relation field"), in which case it names the related model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
	name: String,
	related_model: Option<String>,
}

impl FieldDescriptor {
	/// Creates a descriptor for a plain value field.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			related_model: None,
		}
	}

	/// Creates a descriptor for a relation field referencing `related_model`.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_factories::schema::FieldDescriptor;
	///
	/// let field = FieldDescriptor::related("author", "Author");
	/// assert!(field.is_relation());
	/// assert_eq!(field.related_model(), Some("Author"));
	/// ```
	pub fn related(name: impl Into<String>, related_model: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			related_model: Some(related_model.into()),
		}
	}

	/// Returns the field name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the related model name for relation fields.
	pub fn related_model(&self) -> Option<&str> {
		self.related_model.as_deref()
	}

	/// Returns true if this field references another model.
	pub fn is_relation(&self) -> bool {
		self.related_model.is_some()
	}
}

/// Ordered description of a model's fields.
///
/// Schemas are immutable once built and shared between factories via
/// `Arc<ModelSchema>`.
///
/// # Examples
///
/// ```
/// use reinhardt_factories::schema::ModelSchema;
///
/// let schema = ModelSchema::new("Book")
///     .with_field("title")
///     .with_related_field("author", "Author");
///
/// assert_eq!(schema.model_name(), "Book");
/// assert!(schema.has_field("title"));
/// assert!(schema.is_relation("author"));
/// assert_eq!(schema.relation_fields(), vec!["author"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSchema {
	model_name: String,
	fields: Vec<FieldDescriptor>,
}

impl ModelSchema {
	/// Creates an empty schema for the named model.
	pub fn new(model_name: impl Into<String>) -> Self {
		Self {
			model_name: model_name.into(),
			fields: Vec::new(),
		}
	}

	/// Appends a plain value field.
	pub fn with_field(mut self, name: impl Into<String>) -> Self {
		self.fields.push(FieldDescriptor::new(name));
		self
	}

	/// Appends a relation field referencing `related_model`.
	pub fn with_related_field(
		mut self,
		name: impl Into<String>,
		related_model: impl Into<String>,
	) -> Self {
		self.fields.push(FieldDescriptor::related(name, related_model));
		self
	}

	/// Appends an already-built field descriptor.
	pub fn add_field(&mut self, field: FieldDescriptor) {
		self.fields.push(field);
	}

	/// Returns the model name.
	pub fn model_name(&self) -> &str {
		&self.model_name
	}

	/// Returns all field descriptors in declaration order.
	pub fn fields(&self) -> &[FieldDescriptor] {
		&self.fields
	}

	/// Gets a field descriptor by name.
	pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
		self.fields.iter().find(|f| f.name == name)
	}

	/// Returns true if the schema declares a field with this name.
	pub fn has_field(&self, name: &str) -> bool {
		self.get_field(name).is_some()
	}

	/// Returns true if the named field is a relation field.
	pub fn is_relation(&self, name: &str) -> bool {
		self.get_field(name).is_some_and(FieldDescriptor::is_relation)
	}

	/// Returns the names of all relation fields, in declaration order.
	pub fn relation_fields(&self) -> Vec<&str> {
		self.fields
			.iter()
			.filter(|f| f.is_relation())
			.map(|f| f.name.as_str())
			.collect()
	}
}

impl fmt::Display for ModelSchema {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.model_name)
	}
}
