//! Persistence collaborator contract.
//!
//! The engine itself never talks to a database. When an invocation context
//! carries a [`ModelStore`], materialization is delegated to it; otherwise
//! instances are built purely in memory.

use std::sync::Arc;

use crate::error::FactoryResult;
use crate::instance::Instance;
use crate::schema::ModelSchema;
use crate::value::Overrides;

/// Writes a resolved field set to a backing store.
///
/// Implementations receive the target schema and the fully merged fields
/// (every relation already resolved to an [`Instance`]) and return the
/// persisted instance, typically with a store-assigned primary key. Errors
/// are propagated to the caller verbatim; retry or recovery policy belongs to
/// the store, not to the engine.
pub trait ModelStore: Send + Sync {
	/// Persists one instance and returns it.
	fn persist(&self, schema: Arc<ModelSchema>, fields: Overrides) -> FactoryResult<Instance>;
}
