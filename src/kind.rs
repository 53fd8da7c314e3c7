//! The record kind contract.
//!
//! A kind plays the part a class plays for an active record: it names the
//! record in error messages, hands every new instance its default guard and
//! visibility lists, registers the kind's mutators, and owns the class level
//! unguard switch (see [`crate::guard::unguard`]).
//!
//! ```
//! use attrkit::{Definition, Kind, Model, Mutators};
//! use serde_json::{json, Value};
//!
//! struct User;
//!
//! impl Kind for User {
//!     fn name() -> &'static str {
//!         "User"
//!     }
//!     fn definition() -> Definition {
//!         Definition::default().with_hidden(["password"])
//!     }
//!     fn mutators(mutators: &mut Mutators<Self>) {
//!         mutators.get("name", |_, value| match value {
//!             Value::String(name) => Value::String(name.to_uppercase()),
//!             other => other,
//!         });
//!     }
//! }
//!
//! let mut user = Model::<User>::default();
//! user.set("name", json!("ada")).set("password", json!("secret"));
//! assert_eq!(user.get("name"), json!("ADA"));
//! assert_eq!(user.to_string(), r#"{"name":"ada"}"#);
//! ```

use crate::definition::Definition;
use crate::mutator::Mutators;

pub trait Kind: Sized + 'static {
    /// Name reported by mass-assignment errors.
    fn name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Lists every new instance of the kind starts with.
    fn definition() -> Definition {
        Definition::default()
    }

    /// Registers the kind's get and set mutators.
    fn mutators(_mutators: &mut Mutators<Self>) {}
}
