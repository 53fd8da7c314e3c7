//! Attrkit – attribute management for plain data records.
//!
//! Attrkit gives a record the attribute layer an active-record model has,
//! minus everything that touches a database:
//! * **Mass-assignment guarding** – `fillable` / `guarded` key lists decide
//!   what a bulk [`Model::fill`] may set, with a per-kind switch to turn
//!   guarding off ([`Model::unguarded`], [`Model::force_fill`]).
//! * **Mutators** – per-key get and set transforms registered by the kind.
//! * **Change tracking** – an `original` snapshot and a `changes` snapshot,
//!   both taken explicitly, drive [`Model::is_dirty`], [`Model::was_changed`]
//!   and friends.
//! * **Filtered serialization** – `hidden` / `visible` key lists decide what
//!   reaches [`Model::to_array`] and [`Model::to_json`].
//!
//! ## Modules
//! * [`model`] – The [`Model`] record façade.
//! * [`kind`] – The [`Kind`] trait a record type implements.
//! * [`guard`] – Guard lists and the process-wide unguard switches.
//! * [`visibility`] – Hidden / visible filtering.
//! * [`attributes`] – Attribute storage, snapshots and dirty checking.
//! * [`mutator`] – The per-kind mutator table.
//! * [`definition`] – Kind definitions, loadable from config files.
//! * [`json`] – JSON text encoding and its options.
//! * [`support`] – String helpers (`studly`).
//!
//! ## Values
//! Attribute values are [`serde_json::Value`]s kept in insertion ordered
//! [`serde_json::Map`]s, so serialized output lists keys in the order they
//! were first set.
//!
//! ## Quick Start
//! ```
//! use attrkit::{JsonOptions, Kind, Model, ModelError};
//! use serde_json::json;
//!
//! struct Post;
//! impl Kind for Post {}
//!
//! let mut post = Model::<Post>::default();
//! post.guard(["*"]);
//! let attributes = json!({"title": "Hello"}).as_object().cloned().unwrap_or_default();
//! assert!(matches!(post.fill(attributes.clone()), Err(ModelError::MassAssignment { .. })));
//! post.force_fill(attributes).unwrap();
//! assert_eq!(post.to_json(JsonOptions::empty()).unwrap(), r#"{"title":"Hello"}"#);
//! ```
//!
//! ## Shared state
//! Unguarding is a property of the kind, not of one record: it is kept in a
//! process-wide registry shared by every thread. Code that unguards a kind
//! from several threads at once must serialize those sections itself.

pub mod attributes;
pub mod definition;
pub mod error;
pub mod guard;
pub mod json;
pub mod kind;
pub mod model;
pub mod mutator;
pub mod support;
pub mod visibility;

pub use definition::Definition;
pub use error::{ModelError, Result};
pub use json::JsonOptions;
pub use kind::Kind;
pub use model::Model;
pub use mutator::Mutators;
pub use support::studly;
