use serde_json::{Map, Value};

/// A condition for the `make_*_if` family: a plain `bool`, or a predicate
/// evaluated against the subject at call time.
pub trait Condition<T: ?Sized> {
    fn holds(self, subject: &T) -> bool;
}

impl<T: ?Sized> Condition<T> for bool {
    fn holds(self, _subject: &T) -> bool {
        self
    }
}

impl<T: ?Sized, F: FnOnce(&T) -> bool> Condition<T> for F {
    fn holds(self, subject: &T) -> bool {
        self(subject)
    }
}

/// Hidden and visible lists deciding which attributes reach serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visibility {
    hidden: Vec<String>,
    visible: Vec<String>,
}

impl Visibility {
    pub fn new(hidden: Vec<String>, visible: Vec<String>) -> Self {
        Self { hidden, visible }
    }
    pub fn get_hidden(&self) -> &[String] {
        &self.hidden
    }
    pub fn set_hidden<I, S>(&mut self, hidden: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden = hidden.into_iter().map(Into::into).collect();
        self
    }
    pub fn get_visible(&self) -> &[String] {
        &self.visible
    }
    pub fn set_visible<I, S>(&mut self, visible: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visible = visible.into_iter().map(Into::into).collect();
        self
    }

    /// Takes `keys` off the hidden list. If a visible list is in force the
    /// keys are appended to it too (no de-duplication).
    pub fn make_visible(&mut self, keys: &[&str]) -> &mut Self {
        self.hidden.retain(|hidden| !keys.contains(&hidden.as_str()));
        if !self.visible.is_empty() {
            self.visible.extend(keys.iter().map(|key| key.to_string()));
        }
        self
    }
    pub fn make_visible_if(&mut self, condition: bool, keys: &[&str]) -> &mut Self {
        if condition {
            self.make_visible(keys);
        }
        self
    }
    pub fn make_hidden(&mut self, keys: &[&str]) -> &mut Self {
        self.hidden.extend(keys.iter().map(|key| key.to_string()));
        self
    }
    pub fn make_hidden_if(&mut self, condition: bool, keys: &[&str]) -> &mut Self {
        if condition {
            self.make_hidden(keys);
        }
        self
    }

    /// Narrows `values` to the visible keys (when any are listed), then
    /// removes the hidden ones from what is left.
    pub fn get_arrayable_items(&self, mut values: Map<String, Value>) -> Map<String, Value> {
        if !self.visible.is_empty() {
            values.retain(|key, _| self.visible.contains(key));
        }
        if !self.hidden.is_empty() {
            values.retain(|key, _| !self.hidden.contains(key));
        }
        values
    }
}
