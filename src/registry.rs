//! Fixture registry for delegate lookup.
//!
//! The registry is the lookup collaborator factories resolve their delegates
//! through. It is an explicit value, populated during test-suite setup and
//! injected into an invocation context; nothing in this crate consults
//! process-global state.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::factory::FactoryDefinition;
use crate::instance::Instance;

/// A named entry in the registry.
///
/// Factories are the entries a `SubFactory` marker can delegate to; instance
/// and value entries are plain pre-built fixtures. Pointing a marker at a
/// non-factory entry is a wiring mistake and fails the invocation.
#[derive(Debug, Clone)]
pub enum Fixture {
	/// A factory definition, invocable as a delegate.
	Factory(Arc<FactoryDefinition>),
	/// A pre-built instance.
	Instance(Instance),
	/// A plain value.
	Value(Value),
}

impl Fixture {
	/// Returns a short label for the entry kind, used in diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Factory(_) => "factory",
			Self::Instance(_) => "instance",
			Self::Value(_) => "value",
		}
	}

	/// Returns the factory definition, if this entry is one.
	pub fn as_factory(&self) -> Option<&Arc<FactoryDefinition>> {
		match self {
			Self::Factory(definition) => Some(definition),
			_ => None,
		}
	}
}

impl From<FactoryDefinition> for Fixture {
	fn from(definition: FactoryDefinition) -> Self {
		Self::Factory(Arc::new(definition))
	}
}

impl From<Arc<FactoryDefinition>> for Fixture {
	fn from(definition: Arc<FactoryDefinition>) -> Self {
		Self::Factory(definition)
	}
}

impl From<Instance> for Fixture {
	fn from(instance: Instance) -> Self {
		Self::Instance(instance)
	}
}

impl From<Value> for Fixture {
	fn from(value: Value) -> Self {
		Self::Value(value)
	}
}

/// Registry mapping fixture names to entries.
///
/// The handle is cheap to clone; clones share the same underlying map, so a
/// registry can be handed to factories at construction time and to the
/// invocation context later.
///
/// # Example
///
/// ```ignore
/// let registry = FixtureRegistry::new();
/// registry.register_factory("author_factory", author_factory);
/// assert!(registry.contains("author_factory"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixtureRegistry {
	entries: Arc<RwLock<HashMap<String, Fixture>>>,
}

impl FixtureRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a fixture under a name, replacing any previous entry.
	pub fn register(&self, name: impl Into<String>, fixture: impl Into<Fixture>) {
		self.entries.write().insert(name.into(), fixture.into());
	}

	/// Registers a factory definition and returns the shared handle to it.
	pub fn register_factory(
		&self,
		name: impl Into<String>,
		definition: FactoryDefinition,
	) -> Arc<FactoryDefinition> {
		let definition = Arc::new(definition);
		self.register(name, Fixture::Factory(definition.clone()));
		definition
	}

	/// Looks up a fixture by name.
	///
	/// `None` means "not registered", which auto-wiring tolerates; a present
	/// entry of the wrong kind is reported by the invoker instead.
	pub fn lookup(&self, name: &str) -> Option<Fixture> {
		self.entries.read().get(name).cloned()
	}

	/// Returns true if a fixture is registered under this name.
	pub fn contains(&self, name: &str) -> bool {
		self.entries.read().contains_key(name)
	}

	/// Returns all registered fixture names.
	pub fn names(&self) -> Vec<String> {
		self.entries.read().keys().cloned().collect()
	}

	/// Returns the number of registered fixtures.
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	/// Returns true if no fixtures are registered.
	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}

	/// Clears all registered fixtures.
	///
	/// This is primarily useful for testing.
	pub fn clear(&self) {
		self.entries.write().clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::ModelSchema;
	use crate::value::Overrides;
	use rstest::rstest;
	use serde_json::json;

	fn author_factory(registry: &FixtureRegistry) -> FactoryDefinition {
		let schema = Arc::new(ModelSchema::new("Author").with_field("name"));
		FactoryDefinition::new(schema, Overrides::new().with("name", "Default Author"), registry)
	}

	#[rstest]
	fn test_register_and_lookup() {
		let registry = FixtureRegistry::new();
		let definition = author_factory(&registry);
		registry.register("author_factory", definition);

		assert!(registry.contains("author_factory"));
		assert!(!registry.contains("book_factory"));

		let fixture = registry.lookup("author_factory").unwrap();
		assert_eq!(fixture.kind(), "factory");
		assert!(fixture.as_factory().is_some());
	}

	#[rstest]
	fn test_register_factory_returns_shared_handle() {
		let registry = FixtureRegistry::new();
		let definition = author_factory(&registry);
		let handle = registry.register_factory("author_factory", definition);

		let looked_up = registry.lookup("author_factory").unwrap();
		assert!(Arc::ptr_eq(&handle, looked_up.as_factory().unwrap()));
	}

	#[rstest]
	fn test_non_factory_fixtures() {
		let registry = FixtureRegistry::new();
		registry.register("answer", json!(42));

		let fixture = registry.lookup("answer").unwrap();
		assert_eq!(fixture.kind(), "value");
		assert!(fixture.as_factory().is_none());
	}

	#[rstest]
	fn test_clones_share_entries() {
		let registry = FixtureRegistry::new();
		let clone = registry.clone();
		registry.register("answer", json!(1));

		assert!(clone.contains("answer"));
		assert_eq!(clone.len(), 1);
	}

	#[rstest]
	fn test_names_and_clear() {
		let registry = FixtureRegistry::new();
		registry.register("a", json!(1));
		registry.register("b", json!(2));

		let mut names = registry.names();
		names.sort();
		assert_eq!(names, vec!["a", "b"]);

		registry.clear();
		assert!(registry.is_empty());
	}
}
