//! Mass-assignment guarding.
//!
//! Every record carries a `fillable` list (keys that may be mass assigned)
//! and a `guarded` list (keys that may not, `*` meaning all of them). On top
//! of those sits one switch per record *kind* that disables guarding
//! altogether. The switch is process state, shared by every instance and
//! every thread, exactly like a static property on a class would be.

use std::any::TypeId;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::{PoisonError, RwLock};

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};
use tracing::{trace, warn};

use crate::support::OtherHasher;

lazy_static! {
    // kinds currently unguarded; absence means guarded (the default)
    static ref UNGUARDED: RwLock<HashSet<TypeId, OtherHasher>> = RwLock::new(HashSet::default());
}

/// Disables (or, with `false`, re-enables) mass-assignment guarding for `K`.
pub fn unguard<K: 'static>(state: bool) {
    trace!(kind = std::any::type_name::<K>(), state, "unguard");
    let mut unguarded = UNGUARDED.write().unwrap_or_else(PoisonError::into_inner);
    if state {
        unguarded.insert(TypeId::of::<K>());
    } else {
        unguarded.remove(&TypeId::of::<K>());
    }
}

/// Re-enables mass-assignment guarding for `K`.
pub fn reguard<K: 'static>() {
    unguard::<K>(false);
}

pub fn is_unguarded<K: 'static>() -> bool {
    UNGUARDED
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains(&TypeId::of::<K>())
}

// clears the switch when dropped, so a panicking callback cannot leave it on
struct Reguard<K: 'static>(PhantomData<fn() -> K>);

impl<K: 'static> Drop for Reguard<K> {
    fn drop(&mut self) {
        reguard::<K>();
    }
}

/// Runs `callback` with guarding disabled for `K`.
///
/// When `K` is already unguarded the callback simply runs. Otherwise the
/// switch is turned on for the duration of the callback and turned off
/// afterwards, whether the callback returns or unwinds. Whatever the callback
/// returns, `Result`s included, is handed back untouched.
pub fn unguarded<K: 'static, R>(callback: impl FnOnce() -> R) -> R {
    if is_unguarded::<K>() {
        return callback();
    }
    unguard::<K>(true);
    let _reguard = Reguard::<K>(PhantomData);
    callback()
}

/// What `fill` does with a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    Applied,
    Dropped,
    Rejected,
}

/// The fillable and guarded lists of one record of kind `K`.
pub struct Guard<K> {
    fillable: Vec<String>,
    guarded: Vec<String>,
    // `^(?:entry|...)$`, case-insensitive; rebuilt whenever `guarded` changes
    pattern: Option<Regex>,
    kind: PhantomData<fn() -> K>,
}

fn guarded_pattern(guarded: &[String]) -> Option<Regex> {
    if guarded.is_empty() {
        return None;
    }
    let alternatives: Vec<String> = guarded.iter().map(|entry| regex::escape(entry)).collect();
    match RegexBuilder::new(&format!("^(?:{})$", alternatives.join("|")))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            warn!(error = %e, "guarded list too large for a pattern, comparing entries one by one");
            None
        }
    }
}

// case-insensitive equality under simple case folding, as the pattern does it
fn same_ignoring_case(left: &str, right: &str) -> bool {
    left.chars().count() == right.chars().count()
        && left.chars().flat_map(char::to_lowercase).eq(right.chars().flat_map(char::to_lowercase))
}

impl<K: 'static> Guard<K> {
    pub fn new(fillable: Vec<String>, guarded: Vec<String>) -> Self {
        Self {
            fillable,
            pattern: guarded_pattern(&guarded),
            guarded,
            kind: PhantomData,
        }
    }
    pub fn get_fillable(&self) -> &[String] {
        &self.fillable
    }
    pub fn fillable<I, S>(&mut self, fillable: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fillable = fillable.into_iter().map(Into::into).collect();
        self
    }
    pub fn merge_fillable<I, S>(&mut self, fillable: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fillable.extend(fillable.into_iter().map(Into::into));
        self
    }
    pub fn get_guarded(&self) -> &[String] {
        &self.guarded
    }
    pub fn guard<I, S>(&mut self, guarded: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.guarded = guarded.into_iter().map(Into::into).collect();
        self.pattern = guarded_pattern(&self.guarded);
        self
    }
    pub fn merge_guarded<I, S>(&mut self, guarded: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.guarded.extend(guarded.into_iter().map(Into::into));
        self.pattern = guarded_pattern(&self.guarded);
        self
    }

    fn guards_everything(&self) -> bool {
        self.guarded.len() == 1 && self.guarded[0] == "*"
    }

    pub fn is_fillable(&self, key: &str) -> bool {
        if is_unguarded::<K>() {
            return true;
        }
        // an explicitly fillable key wins over the guarded list
        if self.fillable.iter().any(|fillable| fillable == key) {
            return true;
        }
        if self.is_guarded(key) {
            return false;
        }
        self.fillable.is_empty() && !key.contains('.') && !key.starts_with('_')
    }

    /// True when `key` is guarded, either by `*` or by a case-insensitive
    /// exact match against one of the guarded entries.
    pub fn is_guarded(&self, key: &str) -> bool {
        if self.guarded.is_empty() {
            return false;
        }
        if self.guards_everything() {
            return true;
        }
        match &self.pattern {
            Some(pattern) => pattern.is_match(key),
            None => self.guarded.iter().any(|guarded| same_ignoring_case(guarded, key)),
        }
    }

    pub fn totally_guarded(&self) -> bool {
        self.fillable.is_empty() && self.guards_everything()
    }

    /// Narrows `attributes` to the fillable keys, unless nothing is listed as
    /// fillable or `K` is unguarded, in which case they come back as given.
    pub fn fillable_from_array(&self, mut attributes: Map<String, Value>) -> Map<String, Value> {
        if !self.fillable.is_empty() && !is_unguarded::<K>() {
            attributes.retain(|key, _| self.fillable.iter().any(|fillable| fillable == key));
        }
        attributes
    }

    /// Decides the fate of `key` during a fill that started out
    /// `totally_guarded` (or not).
    pub fn assignment(&self, key: &str, totally_guarded: bool) -> Assignment {
        if self.is_fillable(key) {
            Assignment::Applied
        } else if totally_guarded {
            Assignment::Rejected
        } else {
            Assignment::Dropped
        }
    }
}

impl<K: 'static> Default for Guard<K> {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl<K> Clone for Guard<K> {
    fn clone(&self) -> Self {
        Self {
            fillable: self.fillable.clone(),
            guarded: self.guarded.clone(),
            pattern: self.pattern.clone(),
            kind: PhantomData,
        }
    }
}

impl<K> std::fmt::Debug for Guard<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Guard")
            .field("fillable", &self.fillable)
            .field("guarded", &self.guarded)
            .finish()
    }
}
