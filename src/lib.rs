//! Model factories for test data generation.
//!
//! This crate builds structured test objects from reusable factory
//! definitions: declared defaults, selective overrides, and automatic
//! resolution of related objects through delegate factories.
//!
//! - **Explicit schemas**: a [`ModelSchema`] describes a model's fields and
//!   which of them reference other models — no ORM reflection involved.
//! - **Relation auto-wiring**: relation fields without a manual default are
//!   wired to the conventionally named `{field}_factory` delegate when one is
//!   registered.
//! - **Dunder-path overrides**: `author__name` targets a field of the
//!   delegated sub-instance without constructing it by hand, nesting to any
//!   depth (`book__author__name`).
//! - **Pluggable persistence**: an invocation context either materializes
//!   instances in memory or hands the resolved fields to a [`ModelStore`].
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use reinhardt_factories::prelude::*;
//!
//! // Describe the models once, explicitly.
//! let author = Arc::new(ModelSchema::new("Author").with_field("name"));
//! let book = Arc::new(
//!     ModelSchema::new("Book")
//!         .with_field("title")
//!         .with_related_field("author", "Author"),
//! );
//!
//! // Populate the registry during test-suite setup.
//! let registry = FixtureRegistry::new();
//! registry.register_factory(
//!     "author_factory",
//!     FactoryDefinition::new(author, Overrides::new().with("name", "Default Author"), &registry),
//! );
//! let book_factory = registry.register_factory(
//!     "book_factory",
//!     FactoryDefinition::new(book, Overrides::new().with("title", "Default Title"), &registry),
//! );
//!
//! // Bind and invoke: `author` is resolved through `author_factory`, and
//! // the dunder path refines the delegated construction.
//! let context = InvocationContext::in_memory(registry);
//! let book = context
//!     .bind(book_factory)
//!     .invoke(Overrides::new().with("author__name", "Bill Watterson"))?;
//!
//! assert_eq!(book.str_value("title"), Some("Default Title"));
//! assert_eq!(book.related("author").unwrap().str_value("name"), Some("Bill Watterson"));
//! # Ok::<(), reinhardt_factories::FactoryError>(())
//! ```
//!
//! # Architecture
//!
//! - [`ModelSchema`](schema::ModelSchema) / [`FieldDescriptor`](schema::FieldDescriptor) -
//!   ordered field descriptions with relation metadata
//! - [`FactoryDefinition`](factory::FactoryDefinition) - schema plus defaults,
//!   auto-wired at construction
//! - [`FixtureRegistry`](registry::FixtureRegistry) - explicit name-to-fixture
//!   mapping, injected rather than global
//! - [`InvocationContext`](factory::InvocationContext) /
//!   [`BoundFactory`](factory::BoundFactory) - per-context binding and the
//!   override-resolution engine
//! - [`Instance`](instance::Instance) - the materialized result
//! - [`ModelStore`](store::ModelStore) - persistence collaborator contract

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod factory;
pub mod instance;
pub mod prelude;
pub mod registry;
pub mod schema;
pub mod store;
pub mod value;

// Re-export commonly used types at crate root
pub use error::{FactoryError, FactoryResult};
pub use factory::{BoundFactory, FactoryDefinition, InvocationContext};
pub use instance::Instance;
pub use registry::{Fixture, FixtureRegistry};
pub use schema::{FieldDescriptor, ModelSchema};
pub use store::ModelStore;
pub use value::{FieldValue, Overrides, Sequence, SubFactory, ValueGenerator};
