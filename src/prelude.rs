//! Convenience re-exports for common usage.
//!
//! This module provides a single import for the most commonly used items
//! from the reinhardt-factories crate.
//!
//! # Example
//!
//! ```
//! use reinhardt_factories::prelude::*;
//! ```

// Error types
pub use crate::error::{FactoryError, FactoryResult};

// Schema descriptions
pub use crate::schema::{FieldDescriptor, ModelSchema};

// Values and overrides
pub use crate::value::{FieldValue, Overrides, Sequence, SubFactory, ValueGenerator};

// Factories and invocation
pub use crate::factory::{BoundFactory, FactoryDefinition, InvocationContext};

// Registry
pub use crate::registry::{Fixture, FixtureRegistry};

// Instances and persistence
pub use crate::instance::Instance;
pub use crate::store::ModelStore;
