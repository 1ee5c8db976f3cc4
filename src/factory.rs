//! Factory definitions and the override-resolution engine.
//!
//! A [`FactoryDefinition`] pairs a schema with declared defaults. Relation
//! fields without a manual default are auto-wired to a [`SubFactory`] marker
//! at construction time when a conventionally named `{field}_factory` exists
//! in the registry. Binding a definition to an [`InvocationContext`] yields a
//! [`BoundFactory`], whose `invoke` merges caller overrides onto the
//! defaults, slices dunder-path keys (`author__name`) into per-field
//! sub-overrides, recursively delegates relation fields to their factories
//! and materializes the result in memory or through the context's store.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{FactoryError, FactoryResult};
use crate::instance::Instance;
use crate::registry::FixtureRegistry;
use crate::schema::ModelSchema;
use crate::store::ModelStore;
use crate::value::{FieldValue, Overrides, SubFactory};

/// A reusable construction template: target schema plus declared defaults.
///
/// Definitions are created once during test-suite setup, registered under a
/// fixture name, and shared immutably afterwards; every invocation works on a
/// fresh copy of the defaults.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use reinhardt_factories::factory::FactoryDefinition;
/// use reinhardt_factories::registry::FixtureRegistry;
/// use reinhardt_factories::schema::ModelSchema;
/// use reinhardt_factories::value::Overrides;
///
/// let registry = FixtureRegistry::new();
/// let schema = Arc::new(ModelSchema::new("Author").with_field("name"));
/// let factory = FactoryDefinition::new(schema, Overrides::new().with("name", "foo"), &registry);
/// assert_eq!(factory.to_string(), "Factory(Author, name='foo')");
/// ```
#[derive(Debug)]
pub struct FactoryDefinition {
	schema: Arc<ModelSchema>,
	defaults: IndexMap<String, FieldValue>,
}

impl FactoryDefinition {
	/// Creates a definition and auto-wires relation defaults immediately.
	///
	/// For every relation field of `schema` that `defaults` does not cover,
	/// the registry is probed for a `{field}_factory` entry; if one exists
	/// the field's default becomes a convention-based [`SubFactory`] marker.
	/// Caller-supplied defaults are never overwritten, and relation fields
	/// without a discoverable factory are simply left absent — they must be
	/// supplied at invocation time or the construction layer will reject the
	/// incomplete instance.
	pub fn new(schema: Arc<ModelSchema>, defaults: Overrides, registry: &FixtureRegistry) -> Self {
		let mut definition = Self {
			schema,
			defaults: defaults.into_entries(),
		};
		definition.bind_relation_defaults(registry);
		definition
	}

	fn bind_relation_defaults(&mut self, registry: &FixtureRegistry) {
		for field in self.schema.relation_fields() {
			if self.defaults.contains_key(field) {
				continue;
			}
			if registry.contains(&format!("{field}_factory")) {
				self.defaults
					.insert(field.to_string(), FieldValue::SubFactory(SubFactory::new()));
			}
		}
	}

	/// Returns the target schema.
	pub fn schema(&self) -> &ModelSchema {
		&self.schema
	}

	/// Returns the stored defaults, auto-wired markers included.
	pub fn defaults(&self) -> &IndexMap<String, FieldValue> {
		&self.defaults
	}
}

impl fmt::Display for FactoryDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Factory({}", self.schema.model_name())?;
		for (key, value) in &self.defaults {
			write!(f, ", {key}={value}")?;
		}
		f.write_str(")")
	}
}

/// Everything an invocation needs besides the definition: the registry to
/// resolve delegates through, and optionally a store.
///
/// Persistence is a property of the context, not of a definition: the same
/// factory can be bound once in memory and once against a store. The mode is
/// fixed when [`bind`](Self::bind) captures the context.
#[derive(Clone)]
pub struct InvocationContext {
	registry: FixtureRegistry,
	store: Option<Arc<dyn ModelStore>>,
}

impl InvocationContext {
	/// Creates a context that materializes instances purely in memory.
	pub fn in_memory(registry: FixtureRegistry) -> Self {
		Self {
			registry,
			store: None,
		}
	}

	/// Creates a context that materializes instances through `store`.
	pub fn persisted(registry: FixtureRegistry, store: Arc<dyn ModelStore>) -> Self {
		Self {
			registry,
			store: Some(store),
		}
	}

	/// Returns the registry delegates are resolved through.
	pub fn registry(&self) -> &FixtureRegistry {
		&self.registry
	}

	/// Returns the persistence store, if this context carries one.
	pub fn store(&self) -> Option<&Arc<dyn ModelStore>> {
		self.store.as_ref()
	}

	/// Returns true if instances materialize through a store.
	pub fn is_persisted(&self) -> bool {
		self.store.is_some()
	}

	/// Binds a definition to this context, yielding the invocable factory.
	pub fn bind(&self, definition: Arc<FactoryDefinition>) -> BoundFactory {
		BoundFactory {
			definition,
			context: self.clone(),
		}
	}
}

impl fmt::Debug for InvocationContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InvocationContext")
			.field("registry", &self.registry)
			.field("persisted", &self.is_persisted())
			.finish()
	}
}

/// A factory definition bound to an invocation context.
///
/// This is the entry point a test calls: [`invoke`](Self::invoke) takes the
/// override keywords for one invocation and returns the materialized
/// instance with its whole relation subtree resolved.
#[derive(Debug, Clone)]
pub struct BoundFactory {
	definition: Arc<FactoryDefinition>,
	context: InvocationContext,
}

impl BoundFactory {
	/// Returns the underlying definition.
	pub fn definition(&self) -> &FactoryDefinition {
		&self.definition
	}

	/// Resolves overrides against the defaults and materializes an instance.
	///
	/// Direct override keys win over stored defaults unconditionally. Dunder
	/// keys are split on the first `__` and forwarded, grouped per field, to
	/// that field's delegate factory; a field is delegated exactly when its
	/// merged value is a [`SubFactory`] marker or it is a relation field with
	/// path overrides. All validation failures surface before any delegate
	/// runs.
	pub fn invoke(&self, overrides: Overrides) -> FactoryResult<Instance> {
		let merged = self.resolve(overrides)?;
		self.materialize(merged)
	}

	fn resolve(&self, overrides: Overrides) -> FactoryResult<IndexMap<String, FieldValue>> {
		let schema = self.definition.schema();
		let mut merged = self.definition.defaults.clone();
		let mut grouped: IndexMap<String, Overrides> = IndexMap::new();

		// Partition: direct keys overlay the defaults, dunder keys are
		// grouped by head field with the `{field}__` prefix stripped. The
		// remaining subpath may itself contain `__` and is handled by the
		// delegate's own resolver.
		for (key, value) in overrides {
			match key.split_once("__") {
				Some((field, subpath)) if !field.is_empty() && !subpath.is_empty() => {
					grouped
						.entry(field.to_string())
						.or_default()
						.insert(subpath.to_string(), value);
				}
				_ => {
					merged.insert(key, value);
				}
			}
		}

		// Every path-override group must target a delegated field; checked
		// before any sub-factory is invoked.
		for (field, sub) in &grouped {
			let key = match sub.iter().next() {
				Some((subpath, _)) => format!("{field}__{subpath}"),
				None => field.clone(),
			};
			if !schema.has_field(field) {
				return Err(FactoryError::UnknownField {
					model: schema.model_name().to_string(),
					field: key,
				});
			}
			match merged.get(field) {
				Some(FieldValue::SubFactory(_)) => {}
				Some(_) => {
					// A literal is an already-resolved value; refining it
					// through delegation is a conflict.
					return Err(FactoryError::AmbiguousOverride {
						field: field.clone(),
						key,
					});
				}
				None => {
					let convention = format!("{field}_factory");
					if !schema.is_relation(field) || !self.context.registry().contains(&convention)
					{
						return Err(FactoryError::MissingDelegate {
							field: field.clone(),
							name: convention,
						});
					}
				}
			}
		}

		let mut delegated: Vec<String> = merged
			.iter()
			.filter(|(_, value)| value.is_sub_factory())
			.map(|(field, _)| field.clone())
			.collect();
		for field in grouped.keys() {
			if !delegated.contains(field) {
				delegated.push(field.clone());
			}
		}

		for field in delegated {
			let marker = match merged.get(&field) {
				Some(FieldValue::SubFactory(marker)) => marker.clone(),
				_ => SubFactory::new(),
			};
			let name = marker.delegate_name(&field);
			let fixture = self.context.registry().lookup(&name).ok_or_else(|| {
				FactoryError::MissingDelegate {
					field: field.clone(),
					name: name.clone(),
				}
			})?;
			let Some(delegate) = fixture.as_factory().cloned() else {
				tracing::error!(
					field = %field,
					delegate = %name,
					kind = fixture.kind(),
					"delegate is not a factory; check your SubFactory wiring"
				);
				return Err(FactoryError::NotCallableDelegate {
					name,
					kind: fixture.kind(),
				});
			};
			let sub_overrides = grouped.swap_remove(&field).unwrap_or_default();
			tracing::debug!(field = %field, delegate = %name, "delegating field construction");
			let instance = self.context.bind(delegate).invoke(sub_overrides)?;
			merged.insert(field, FieldValue::Instance(instance));
		}

		Ok(merged)
	}

	fn materialize(&self, mut fields: IndexMap<String, FieldValue>) -> FactoryResult<Instance> {
		for value in fields.values_mut() {
			if let FieldValue::Generated(generator) = value {
				let produced = generator.generate();
				*value = FieldValue::Value(produced);
			}
		}

		let schema = Arc::clone(&self.definition.schema);
		match self.context.store() {
			Some(store) => {
				for key in fields.keys() {
					if !schema.has_field(key) {
						return Err(FactoryError::UnknownField {
							model: schema.model_name().to_string(),
							field: key.clone(),
						});
					}
				}
				store.persist(schema, Overrides::from(fields))
			}
			None => Instance::from_fields(schema, fields, None),
		}
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

	fn registry_with_author_factory() -> FixtureRegistry {
		let registry = FixtureRegistry::new();
		registry.register_factory(
			"author_factory",
			FactoryDefinition::new(
				author_schema(),
				Overrides::new().with("name", "Default Author"),
				&registry,
			),
		);
		registry
	}

	#[rstest]
	fn test_relation_default_is_auto_wired() {
		let registry = registry_with_author_factory();
		let book = FactoryDefinition::new(book_schema(), Overrides::new(), &registry);

		assert_eq!(
			book.defaults().get("author"),
			Some(&FieldValue::SubFactory(SubFactory::new()))
		);
	}

	#[rstest]
	fn test_auto_wiring_skips_unknown_factories() {
		let registry = FixtureRegistry::new();
		let book = FactoryDefinition::new(book_schema(), Overrides::new(), &registry);

		assert!(book.defaults().get("author").is_none());
	}

	#[rstest]
	fn test_auto_wiring_keeps_manual_defaults() {
		let registry = registry_with_author_factory();
		let marker = SubFactory::named("watterson_author_factory");
		let book = FactoryDefinition::new(
			book_schema(),
			Overrides::new().with("author", marker.clone()),
			&registry,
		);

		assert_eq!(
			book.defaults().get("author"),
			Some(&FieldValue::SubFactory(marker))
		);
	}

	#[rstest]
	fn test_factory_repr_with_auto_wired_default() {
		let registry = registry_with_author_factory();
		let book = FactoryDefinition::new(
			book_schema(),
			Overrides::new().with("title", "Default Title"),
			&registry,
		);

		assert_eq!(
			book.to_string(),
			"Factory(Book, title='Default Title', author=SubFactory())"
		);
	}

	#[rstest]
	fn test_invoke_merges_direct_overrides() {
		let registry = registry_with_author_factory();
		let context = InvocationContext::in_memory(registry.clone());
		let author = context.bind(
			registry
				.lookup("author_factory")
				.unwrap()
				.as_factory()
				.unwrap()
				.clone(),
		);

		let instance = author
			.invoke(Overrides::new().with("name", "Someone else").with("age", 57i64))
			.unwrap();
		assert_eq!(instance.str_value("name"), Some("Someone else"));
		assert_eq!(instance.value("age"), Some(&json!(57)));
	}

	#[rstest]
	fn test_invocation_does_not_mutate_defaults() {
		let registry = registry_with_author_factory();
		let book = registry.register_factory(
			"book_factory",
			FactoryDefinition::new(book_schema(), Overrides::new(), &registry),
		);
		let context = InvocationContext::in_memory(registry);

		context
			.bind(book.clone())
			.invoke(Overrides::new().with("author__name", "X"))
			.unwrap();

		// The stored default is still the marker, not the resolved instance.
		assert_eq!(
			book.defaults().get("author"),
			Some(&FieldValue::SubFactory(SubFactory::new()))
		);
	}
}
