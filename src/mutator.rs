use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::model::Model;
use crate::support::{studly, OtherHasher};

/// Transforms a stored value on its way out of the record.
pub type GetMutator<K> = fn(&Model<K>, Value) -> Value;

/// Takes over storing a value; writes through [`Model::set_raw_attribute`].
pub type SetMutator<K> = fn(&mut Model<K>, Value);

/// Per-kind table of mutators, keyed by the studly form of the attribute key,
/// so `first_name` and `first-name` share one `FirstName` entry.
pub struct Mutators<K> {
    getters: HashMap<String, GetMutator<K>, OtherHasher>,
    setters: HashMap<String, SetMutator<K>, OtherHasher>,
}

impl<K> Mutators<K> {
    pub fn new() -> Self {
        Self {
            getters: HashMap::default(),
            setters: HashMap::default(),
        }
    }
    pub fn get(&mut self, key: &str, mutator: GetMutator<K>) -> &mut Self {
        self.getters.insert(studly(key), mutator);
        self
    }
    pub fn set(&mut self, key: &str, mutator: SetMutator<K>) -> &mut Self {
        self.setters.insert(studly(key), mutator);
        self
    }
    pub fn getter(&self, key: &str) -> Option<GetMutator<K>> {
        self.getters.get(&studly(key)).copied()
    }
    pub fn setter(&self, key: &str) -> Option<SetMutator<K>> {
        self.setters.get(&studly(key)).copied()
    }
}

impl<K> Default for Mutators<K> {
    fn default() -> Self {
        Self::new()
    }
}

// derives would demand K: Clone / K: Debug
impl<K> Clone for Mutators<K> {
    fn clone(&self) -> Self {
        Self {
            getters: self.getters.clone(),
            setters: self.setters.clone(),
        }
    }
}

impl<K> fmt::Debug for Mutators<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Mutators")
            .field("getters", &self.getters.keys().collect::<Vec<_>>())
            .field("setters", &self.setters.keys().collect::<Vec<_>>())
            .finish()
    }
}
