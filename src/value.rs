//! Field values, delegation markers and override mappings.
//!
//! Everything a factory merges is a [`FieldValue`]: a literal JSON value, an
//! already-resolved [`Instance`], a [`SubFactory`] delegation marker, or a
//! generated value produced freshly at each materialization. [`Overrides`] is
//! the ordered key/value mapping used both for declared defaults and for
//! invocation overrides.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use crate::instance::Instance;

/// Marker value for delegating a field's construction to another factory.
///
/// Placed into a factory's defaults (explicitly or by relation auto-wiring),
/// it means "resolve this field by invoking another factory": either the one
/// named explicitly, or the `{field}_factory` convention. A marker is always
/// replaced by the delegate's instance before materialization.
///
/// # Examples
///
/// ```
/// use reinhardt_factories::value::SubFactory;
///
/// assert_eq!(SubFactory::new().to_string(), "SubFactory()");
/// assert_eq!(
///     SubFactory::named("watterson_author_factory").to_string(),
///     "SubFactory(\"watterson_author_factory\")"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubFactory {
	factory_name: Option<String>,
}

impl SubFactory {
	/// Creates a convention-based marker, resolved as `{field}_factory`.
	pub fn new() -> Self {
		Self { factory_name: None }
	}

	/// Creates a marker resolved through the explicitly named factory.
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			factory_name: Some(name.into()),
		}
	}

	/// Returns the explicit target factory name, if any.
	pub fn factory_name(&self) -> Option<&str> {
		self.factory_name.as_deref()
	}

	/// Resolves the registry name this marker delegates `field` to.
	pub(crate) fn delegate_name(&self, field: &str) -> String {
		match &self.factory_name {
			Some(name) => name.clone(),
			None => format!("{field}_factory"),
		}
	}
}

impl fmt::Display for SubFactory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.factory_name {
			Some(name) => write!(f, "SubFactory(\"{name}\")"),
			None => write!(f, "SubFactory()"),
		}
	}
}

/// Closure wrapper producing a fresh value per materialization.
#[derive(Clone)]
pub struct ValueGenerator(Arc<dyn Fn() -> Value + Send + Sync>);

impl ValueGenerator {
	/// Wraps a closure as a generated default.
	pub fn new(generate: impl Fn() -> Value + Send + Sync + 'static) -> Self {
		Self(Arc::new(generate))
	}

	/// Produces the next value.
	pub fn generate(&self) -> Value {
		(self.0)()
	}
}

impl fmt::Debug for ValueGenerator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("ValueGenerator(..)")
	}
}

/// Auto-incrementing counter for unique generated values.
///
/// # Examples
///
/// ```
/// use reinhardt_factories::value::Sequence;
///
/// let seq = Sequence::new();
/// assert_eq!(seq.next(), 1);
/// assert_eq!(seq.next_string("Book "), "Book 2");
/// ```
#[derive(Debug, Default)]
pub struct Sequence {
	current: AtomicU64,
}

impl Sequence {
	/// Creates a sequence whose first value is 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next value in the sequence.
	pub fn next(&self) -> u64 {
		self.current.fetch_add(1, Ordering::SeqCst) + 1
	}

	/// Returns the next value formatted behind `prefix`.
	pub fn next_string(&self, prefix: &str) -> String {
		format!("{prefix}{}", self.next())
	}
}

/// A single field value as a factory sees it.
#[derive(Debug, Clone)]
pub enum FieldValue {
	/// Literal JSON value.
	Value(Value),
	/// Already-resolved related instance.
	Instance(Instance),
	/// Delegation marker, replaced before materialization.
	SubFactory(SubFactory),
	/// Generated default, realized freshly at each materialization.
	Generated(ValueGenerator),
}

impl FieldValue {
	/// Wraps a closure as a generated default value.
	pub fn generated(generate: impl Fn() -> Value + Send + Sync + 'static) -> Self {
		Self::Generated(ValueGenerator::new(generate))
	}

	/// Returns the literal value, if this is one.
	pub fn as_value(&self) -> Option<&Value> {
		match self {
			Self::Value(value) => Some(value),
			_ => None,
		}
	}

	/// Returns the resolved instance, if this is one.
	pub fn as_instance(&self) -> Option<&Instance> {
		match self {
			Self::Instance(instance) => Some(instance),
			_ => None,
		}
	}

	/// Returns the delegation marker, if this is one.
	pub fn as_sub_factory(&self) -> Option<&SubFactory> {
		match self {
			Self::SubFactory(marker) => Some(marker),
			_ => None,
		}
	}

	/// Returns true if this value is a delegation marker.
	pub fn is_sub_factory(&self) -> bool {
		matches!(self, Self::SubFactory(_))
	}
}

impl PartialEq for FieldValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Value(a), Self::Value(b)) => a == b,
			(Self::Instance(a), Self::Instance(b)) => a == b,
			(Self::SubFactory(a), Self::SubFactory(b)) => a == b,
			(Self::Generated(a), Self::Generated(b)) => Arc::ptr_eq(&a.0, &b.0),
			_ => false,
		}
	}
}

impl fmt::Display for FieldValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			// String literals render single-quoted, repr-style.
			Self::Value(Value::String(s)) => write!(f, "'{s}'"),
			Self::Value(value) => write!(f, "{value}"),
			Self::Instance(instance) => write!(f, "{instance}"),
			Self::SubFactory(marker) => write!(f, "{marker}"),
			Self::Generated(_) => f.write_str("<generated>"),
		}
	}
}

impl Serialize for FieldValue {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Value(value) => value.serialize(serializer),
			Self::Instance(instance) => instance.serialize(serializer),
			other => serializer.serialize_str(&other.to_string()),
		}
	}
}

impl From<Value> for FieldValue {
	fn from(value: Value) -> Self {
		Self::Value(value)
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		Self::Value(Value::from(value))
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		Self::Value(Value::from(value))
	}
}

impl From<bool> for FieldValue {
	fn from(value: bool) -> Self {
		Self::Value(Value::from(value))
	}
}

impl From<i64> for FieldValue {
	fn from(value: i64) -> Self {
		Self::Value(Value::from(value))
	}
}

impl From<u64> for FieldValue {
	fn from(value: u64) -> Self {
		Self::Value(Value::from(value))
	}
}

impl From<f64> for FieldValue {
	fn from(value: f64) -> Self {
		Self::Value(Value::from(value))
	}
}

impl From<Instance> for FieldValue {
	fn from(instance: Instance) -> Self {
		Self::Instance(instance)
	}
}

impl From<SubFactory> for FieldValue {
	fn from(marker: SubFactory) -> Self {
		Self::SubFactory(marker)
	}
}

impl From<ValueGenerator> for FieldValue {
	fn from(generator: ValueGenerator) -> Self {
		Self::Generated(generator)
	}
}

/// Ordered mapping from field keys to values.
///
/// Used for a factory's declared defaults, for invocation overrides, and for
/// the field set handed to a persistence store. Keys are either direct field
/// names or dunder paths (`author__name`) targeting a delegated sub-instance.
///
/// # Examples
///
/// ```
/// use reinhardt_factories::value::Overrides;
///
/// let overrides = Overrides::new()
///     .with("title", "Default Title")
///     .with("author__name", "Bill Watterson");
/// assert_eq!(overrides.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
	entries: IndexMap<String, FieldValue>,
}

impl Overrides {
	/// Creates an empty mapping.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets a key, chainable.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
		self.insert(key, value);
		self
	}

	/// Sets a key in place. A repeated key keeps its original position.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
		self.entries.insert(key.into(), value.into());
	}

	/// Gets a value by key.
	pub fn get(&self, key: &str) -> Option<&FieldValue> {
		self.entries.get(key)
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if there are no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Consumes the mapping into its ordered entries.
	pub fn into_entries(self) -> IndexMap<String, FieldValue> {
		self.entries
	}
}

impl From<IndexMap<String, FieldValue>> for Overrides {
	fn from(entries: IndexMap<String, FieldValue>) -> Self {
		Self { entries }
	}
}

impl IntoIterator for Overrides {
	type Item = (String, FieldValue);
	type IntoIter = indexmap::map::IntoIter<String, FieldValue>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Overrides {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			entries: iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}
}
