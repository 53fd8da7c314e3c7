//! The record façade.
//!
//! [`Model`] glues the guard, visibility and attribute engines together and
//! dispatches through the kind's mutators. Reads return owned
//! [`serde_json::Value`]s because a get mutator may produce a value that is
//! not stored anywhere; an absent attribute reads as `Value::Null`.

use std::fmt;
use std::marker::PhantomData;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::attributes::{self, Attributes};
use crate::error::{ModelError, Result};
use crate::guard::{self, Assignment, Guard};
use crate::json::{self, JsonOptions};
use crate::kind::Kind;
use crate::mutator::Mutators;
use crate::visibility::{Condition, Visibility};

pub struct Model<K> {
    attributes: Attributes,
    guard: Guard<K>,
    visibility: Visibility,
    mutators: Mutators<K>,
    kind: PhantomData<fn() -> K>,
}

impl<K: Kind> Default for Model<K> {
    fn default() -> Self {
        let definition = K::definition();
        let mut mutators = Mutators::new();
        K::mutators(&mut mutators);
        Self {
            attributes: Attributes::new(),
            guard: Guard::new(definition.fillable, definition.guarded),
            visibility: Visibility::new(definition.hidden, definition.visible),
            mutators,
            kind: PhantomData,
        }
    }
}

impl<K: Kind> Model<K> {
    /// Creates a record and mass assigns `attributes` to it, guarded.
    pub fn new(attributes: Map<String, Value>) -> Result<Self> {
        let mut model = Self::default();
        model.fill(attributes)?;
        Ok(model)
    }

    /// Creates a fresh record of the same kind.
    pub fn new_instance(&self, attributes: Map<String, Value>) -> Result<Self> {
        Self::new(attributes)
    }

    /// Mass assigns `attributes`, honouring the guard lists.
    ///
    /// Keys that are not fillable are skipped, unless the record was totally
    /// guarded when the call started, in which case the first such key fails
    /// the fill. Keys applied before that point stay applied.
    pub fn fill(&mut self, attributes: Map<String, Value>) -> Result<&mut Self> {
        let totally_guarded = self.guard.totally_guarded();
        for (key, value) in self.guard.fillable_from_array(attributes) {
            match self.guard.assignment(&key, totally_guarded) {
                Assignment::Applied => {
                    self.set_attribute(&key, value);
                }
                Assignment::Dropped => debug!(kind = K::name(), key = %key, "dropping guarded attribute"),
                Assignment::Rejected => {
                    warn!(kind = K::name(), key = %key, "mass assignment on a totally guarded record");
                    return Err(ModelError::MassAssignment { key, kind: K::name() });
                }
            }
        }
        Ok(self)
    }

    /// Mass assigns `attributes` with guarding switched off for the kind.
    pub fn force_fill(&mut self, attributes: Map<String, Value>) -> Result<&mut Self> {
        guard::unguarded::<K, _>(|| self.fill(attributes).map(|_| ()))?;
        Ok(self)
    }

    // ------------- Dynamic access -------------
    pub fn get(&self, key: &str) -> Value {
        self.get_attribute(key)
    }
    pub fn set(&mut self, key: &str, value: Value) -> &mut Self {
        self.set_attribute(key, value)
    }
    /// True when the attribute reads as something other than null.
    pub fn isset(&self, key: &str) -> bool {
        !self.get_attribute(key).is_null()
    }
    /// Removes the stored value; mutators are not consulted.
    pub fn unset(&mut self, key: &str) -> &mut Self {
        self.attributes.remove(key);
        self
    }

    // Offsets are stringified, so `offset_get(0)` and `get("0")` agree.
    pub fn offset_get(&self, offset: impl fmt::Display) -> Value {
        self.get(&offset.to_string())
    }
    pub fn offset_set(&mut self, offset: impl fmt::Display, value: Value) -> &mut Self {
        self.set(&offset.to_string(), value)
    }
    pub fn offset_exists(&self, offset: impl fmt::Display) -> bool {
        self.isset(&offset.to_string())
    }
    pub fn offset_unset(&mut self, offset: impl fmt::Display) -> &mut Self {
        self.unset(&offset.to_string())
    }

    // ------------- Serialization -------------
    pub fn to_array(&self) -> Map<String, Value> {
        self.attributes_to_array()
    }
    pub fn json_serialize(&self) -> Map<String, Value> {
        self.to_array()
    }
    pub fn to_json(&self, options: JsonOptions) -> Result<String> {
        json::encode(&self.json_serialize(), options)
    }

    // ------------- Guarding -------------
    pub fn get_fillable(&self) -> &[String] {
        self.guard.get_fillable()
    }
    pub fn fillable<I: IntoIterator<Item = S>, S: Into<String>>(&mut self, fillable: I) -> &mut Self {
        self.guard.fillable(fillable);
        self
    }
    pub fn merge_fillable<I: IntoIterator<Item = S>, S: Into<String>>(&mut self, fillable: I) -> &mut Self {
        self.guard.merge_fillable(fillable);
        self
    }
    pub fn get_guarded(&self) -> &[String] {
        self.guard.get_guarded()
    }
    pub fn guard<I: IntoIterator<Item = S>, S: Into<String>>(&mut self, guarded: I) -> &mut Self {
        self.guard.guard(guarded);
        self
    }
    pub fn merge_guarded<I: IntoIterator<Item = S>, S: Into<String>>(&mut self, guarded: I) -> &mut Self {
        self.guard.merge_guarded(guarded);
        self
    }
    pub fn is_fillable(&self, key: &str) -> bool {
        self.guard.is_fillable(key)
    }
    pub fn is_guarded(&self, key: &str) -> bool {
        self.guard.is_guarded(key)
    }
    pub fn totally_guarded(&self) -> bool {
        self.guard.totally_guarded()
    }
    pub fn fillable_from_array(&self, attributes: Map<String, Value>) -> Map<String, Value> {
        self.guard.fillable_from_array(attributes)
    }
    /// Switches guarding off (or back on) for every record of kind `K`.
    pub fn unguard(state: bool) {
        guard::unguard::<K>(state);
    }
    pub fn reguard() {
        guard::reguard::<K>();
    }
    pub fn is_unguarded() -> bool {
        guard::is_unguarded::<K>()
    }
    pub fn unguarded<R>(callback: impl FnOnce() -> R) -> R {
        guard::unguarded::<K, R>(callback)
    }

    // ------------- Visibility -------------
    pub fn get_hidden(&self) -> &[String] {
        self.visibility.get_hidden()
    }
    pub fn set_hidden<I: IntoIterator<Item = S>, S: Into<String>>(&mut self, hidden: I) -> &mut Self {
        self.visibility.set_hidden(hidden);
        self
    }
    pub fn get_visible(&self) -> &[String] {
        self.visibility.get_visible()
    }
    pub fn set_visible<I: IntoIterator<Item = S>, S: Into<String>>(&mut self, visible: I) -> &mut Self {
        self.visibility.set_visible(visible);
        self
    }
    pub fn make_visible(&mut self, keys: &[&str]) -> &mut Self {
        self.visibility.make_visible(keys);
        self
    }
    /// Like [`Model::make_visible`], when `condition` holds for this record.
    pub fn make_visible_if(&mut self, condition: impl Condition<Self>, keys: &[&str]) -> &mut Self {
        let holds = condition.holds(self);
        self.visibility.make_visible_if(holds, keys);
        self
    }
    pub fn make_hidden(&mut self, keys: &[&str]) -> &mut Self {
        self.visibility.make_hidden(keys);
        self
    }
    pub fn make_hidden_if(&mut self, condition: impl Condition<Self>, keys: &[&str]) -> &mut Self {
        let holds = condition.holds(self);
        self.visibility.make_hidden_if(holds, keys);
        self
    }
    pub fn get_arrayable_items(&self, values: Map<String, Value>) -> Map<String, Value> {
        self.visibility.get_arrayable_items(values)
    }

    // ------------- Attributes -------------
    pub fn get_attributes(&self) -> &Map<String, Value> {
        self.attributes.get_attributes()
    }

    /// Reads `key` through its get mutator, if the kind has one.
    pub fn get_attribute(&self, key: &str) -> Value {
        match self.attributes.get(key) {
            Some(value) => self.transform_model_value(key, value.clone()),
            None => Value::Null,
        }
    }

    /// Reads each of `keys`; missing ones come back as null.
    pub fn only(&self, keys: &[&str]) -> Map<String, Value> {
        keys.iter()
            .map(|key| ((*key).to_owned(), self.get_attribute(key)))
            .collect()
    }

    /// Stores `value` under `key`, or hands it to the key's set mutator.
    pub fn set_attribute(&mut self, key: &str, value: Value) -> &mut Self {
        if let Some(mutator) = self.mutators.setter(key) {
            trace!(kind = K::name(), key, "set mutator");
            mutator(self, value);
            return self;
        }
        self.attributes.insert(key, value);
        self
    }

    /// Stores `value` under `key` as is. Set mutators write through this.
    pub fn set_raw_attribute(&mut self, key: &str, value: Value) -> &mut Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn set_raw_attributes(&mut self, attributes: Map<String, Value>, sync: bool) -> &mut Self {
        self.attributes.set_raw_attributes(attributes, sync);
        self
    }

    pub fn has_get_mutator(&self, key: &str) -> bool {
        self.mutators.getter(key).is_some()
    }
    pub fn has_set_mutator(&self, key: &str) -> bool {
        self.mutators.setter(key).is_some()
    }

    fn transform_model_value(&self, key: &str, value: Value) -> Value {
        match self.mutators.getter(key) {
            Some(mutator) => {
                trace!(kind = K::name(), key, "get mutator");
                mutator(self, value)
            }
            None => value,
        }
    }

    // ------------- Change tracking -------------
    pub fn sync_original(&mut self) -> &mut Self {
        self.attributes.sync_original();
        self
    }
    pub fn sync_original_attribute(&mut self, key: &str) -> &mut Self {
        self.attributes.sync_original_attribute(key);
        self
    }
    pub fn sync_original_attributes(&mut self, keys: &[&str]) -> &mut Self {
        self.attributes.sync_original_attributes(keys);
        self
    }
    pub fn sync_changes(&mut self) -> &mut Self {
        self.attributes.sync_changes();
        self
    }
    pub fn get_changes(&self) -> &Map<String, Value> {
        self.attributes.get_changes()
    }

    // a throwaway record holding the original values as its attributes,
    // so get mutators see them exactly as they would see current values
    fn rewound(&self) -> Self {
        let mut rewound = Self::default();
        rewound.set_raw_attributes(self.attributes.get_raw_original().clone(), true);
        rewound
    }

    /// Original value of `key` with its get mutator applied; null if absent.
    pub fn get_original(&self, key: &str) -> Value {
        self.get_original_or(key, Value::Null)
    }

    /// Original value of `key`, or `default` when it is missing or null. The
    /// result, default included, goes through the key's get mutator.
    pub fn get_original_or(&self, key: &str, default: Value) -> Value {
        let rewound = self.rewound();
        let value = rewound.attributes.get_raw_original_or(key, default);
        rewound.transform_model_value(key, value)
    }

    /// Every original value with get mutators applied.
    pub fn original(&self) -> Map<String, Value> {
        let rewound = self.rewound();
        rewound
            .attributes
            .get_raw_original()
            .iter()
            .map(|(key, value)| (key.clone(), rewound.transform_model_value(key, value.clone())))
            .collect()
    }

    pub fn get_raw_original(&self) -> &Map<String, Value> {
        self.attributes.get_raw_original()
    }
    pub fn get_raw_original_or(&self, key: &str, default: Value) -> Value {
        self.attributes.get_raw_original_or(key, default)
    }
    pub fn original_is_equivalent(&self, key: &str) -> bool {
        self.attributes.original_is_equivalent(key)
    }
    pub fn get_dirty(&self) -> Map<String, Value> {
        self.attributes.get_dirty()
    }
    pub fn is_dirty(&self, keys: &[&str]) -> bool {
        self.attributes.is_dirty(keys)
    }
    pub fn is_clean(&self, keys: &[&str]) -> bool {
        self.attributes.is_clean(keys)
    }
    pub fn was_changed(&self, keys: &[&str]) -> bool {
        self.attributes.was_changed(keys)
    }
    pub fn has_changes(&self, changes: &Map<String, Value>, keys: &[&str]) -> bool {
        attributes::has_changes(changes, keys)
    }

    /// Current raw attributes filtered by the visible and hidden lists.
    pub fn attributes_to_array(&self) -> Map<String, Value> {
        self.get_arrayable_items(self.attributes.get_attributes().clone())
    }
}

impl<K: Kind> Clone for Model<K> {
    fn clone(&self) -> Self {
        Self {
            attributes: self.attributes.clone(),
            guard: self.guard.clone(),
            visibility: self.visibility.clone(),
            mutators: self.mutators.clone(),
            kind: PhantomData,
        }
    }
}

impl<K: Kind> fmt::Debug for Model<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct(K::name())
            .field("attributes", &self.attributes)
            .field("guard", &self.guard)
            .field("visibility", &self.visibility)
            .field("mutators", &self.mutators)
            .finish()
    }
}

impl<K: Kind> fmt::Display for Model<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let json = self.to_json(JsonOptions::empty()).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl<K: Kind> Serialize for Model<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.json_serialize().serialize(serializer)
    }
}
