//! Shared model schemas, registry wiring and test stores.

use std::sync::Arc;

use parking_lot::Mutex;
use reinhardt_factories::prelude::*;
use serde_json::json;

/// `Author { name, age }`
pub fn author_schema() -> Arc<ModelSchema> {
	Arc::new(ModelSchema::new("Author").with_field("name").with_field("age"))
}

/// `Book { title, author -> Author }`
pub fn book_schema() -> Arc<ModelSchema> {
	Arc::new(
		ModelSchema::new("Book")
			.with_field("title")
			.with_related_field("author", "Author"),
	)
}

/// `Chapter { title, book -> Book }`
pub fn chapter_schema() -> Arc<ModelSchema> {
	Arc::new(
		ModelSchema::new("Chapter")
			.with_field("title")
			.with_related_field("book", "Book"),
	)
}

/// Registry with the conventional author/book/chapter factories wired up.
///
/// Factories are registered dependency-first so relation auto-wiring finds
/// its delegates at construction time.
pub fn library_registry() -> FixtureRegistry {
	let registry = FixtureRegistry::new();
	registry.register_factory(
		"author_factory",
		FactoryDefinition::new(
			author_schema(),
			Overrides::new().with("name", "Default Author"),
			&registry,
		),
	);
	registry.register_factory(
		"book_factory",
		FactoryDefinition::new(
			book_schema(),
			Overrides::new().with("title", "Default Title"),
			&registry,
		),
	);
	registry.register_factory(
		"chapter_factory",
		FactoryDefinition::new(
			chapter_schema(),
			Overrides::new().with("title", "Chapter 1"),
			&registry,
		),
	);
	registry
}

/// Binds the named factory to an in-memory context.
pub fn bound(registry: &FixtureRegistry, name: &str) -> BoundFactory {
	let Some(Fixture::Factory(definition)) = registry.lookup(name) else {
		panic!("fixture {name} is not a registered factory");
	};
	InvocationContext::in_memory(registry.clone()).bind(definition)
}

/// In-memory store that records persisted instances and assigns sequential
/// primary keys.
#[derive(Default)]
pub struct RecordingStore {
	persisted: Mutex<Vec<Instance>>,
	pks: Sequence,
}

impl RecordingStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns every persisted instance, in persistence order.
	pub fn persisted(&self) -> Vec<Instance> {
		self.persisted.lock().clone()
	}

	/// Returns the number of persisted instances.
	pub fn count(&self) -> usize {
		self.persisted.lock().len()
	}
}

impl ModelStore for RecordingStore {
	fn persist(&self, schema: Arc<ModelSchema>, fields: Overrides) -> FactoryResult<Instance> {
		let instance = Instance::with_pk(schema, fields, json!(self.pks.next()))?;
		self.persisted.lock().push(instance.clone());
		Ok(instance)
	}
}

/// Store that rejects every write, for error propagation tests.
pub struct FailingStore;

impl ModelStore for FailingStore {
	fn persist(&self, _schema: Arc<ModelSchema>, _fields: Overrides) -> FactoryResult<Instance> {
		Err(FactoryError::Persistence("connection refused".to_string()))
	}
}
