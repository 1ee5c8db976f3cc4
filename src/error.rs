//! Error types for factory resolution.
//!
//! This module defines the error types used throughout the reinhardt-factories crate.

use thiserror::Error;

/// Errors that can occur while resolving and materializing a factory invocation.
///
/// Every variant is fail-fast: an invocation either returns a fully resolved
/// instance or one of these errors, never a partially resolved object.
#[derive(Debug, Error)]
pub enum FactoryError {
	/// A keyword does not correspond to any schema field.
	#[error("Unknown field for {model}: {field}")]
	UnknownField {
		/// Model the offending keyword was aimed at.
		model: String,
		/// The offending keyword, verbatim (direct key or dunder path).
		field: String,
	},

	/// A field received both a literal value and path overrides into it.
	#[error("Ambiguous override for field {field}: a literal value and path overrides ({key}) were both supplied")]
	AmbiguousOverride {
		/// Field that was overridden twice.
		field: String,
		/// One of the conflicting dunder-path keys.
		key: String,
	},

	/// A field was expected to be delegated but no delegate factory is registered.
	#[error("Missing delegate for field {field}: {name} is not registered")]
	MissingDelegate {
		/// Field whose construction should have been delegated.
		field: String,
		/// Registry name that failed to resolve.
		name: String,
	},

	/// The resolved delegate exists in the registry but is not a factory.
	#[error("Delegate {name} is registered as {kind}, not a factory; check your SubFactory wiring")]
	NotCallableDelegate {
		/// Registry name of the bad delegate.
		name: String,
		/// What kind of fixture was found instead.
		kind: &'static str,
	},

	/// The external persistence collaborator failed.
	#[error("Persistence error: {0}")]
	Persistence(String),
}

/// Result type alias for factory operations.
pub type FactoryResult<T> = Result<T, FactoryError>;
