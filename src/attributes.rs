//! Attribute storage and change tracking.
//!
//! [`Attributes`] keeps three mappings: the current attributes, the
//! `original` snapshot taken at the last [`Attributes::sync_original`] and
//! the `changes` captured at the last [`Attributes::sync_changes`]. Nothing
//! is synced automatically; callers decide when a snapshot is taken.
//!
//! All mappings keep insertion order, which is the order keys serialize in.

use serde_json::{Map, Number, Value};
use tracing::warn;

static NULL: Value = Value::Null;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    attributes: Map<String, Value>,
    original: Map<String, Value>,
    changes: Map<String, Value>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn get_attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
    /// Raw stored value, without any mutator applied.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.shift_remove(key)
    }
    pub fn set_raw_attributes(&mut self, attributes: Map<String, Value>, sync: bool) -> &mut Self {
        self.attributes = attributes;
        if sync {
            self.sync_original();
        }
        self
    }

    // ------------- Change tracking -------------
    pub fn sync_original(&mut self) -> &mut Self {
        self.original = self.attributes.clone();
        self
    }
    pub fn sync_original_attribute(&mut self, key: &str) -> &mut Self {
        self.sync_original_attributes(&[key])
    }
    /// Copies the current value of each key into the original snapshot.
    /// A key with no current value is recorded as `null`.
    pub fn sync_original_attributes(&mut self, keys: &[&str]) -> &mut Self {
        for key in keys {
            let current = match self.attributes.get(*key) {
                Some(value) => value.clone(),
                None => {
                    warn!(key, "syncing original of an attribute that is not set");
                    Value::Null
                }
            };
            self.original.insert((*key).to_owned(), current);
        }
        self
    }
    pub fn sync_changes(&mut self) -> &mut Self {
        self.changes = self.get_dirty();
        self
    }
    pub fn get_changes(&self) -> &Map<String, Value> {
        &self.changes
    }
    pub fn get_raw_original(&self) -> &Map<String, Value> {
        &self.original
    }
    /// Raw original value of `key`, or `default` when it is missing or null.
    pub fn get_raw_original_or(&self, key: &str, default: Value) -> Value {
        match self.original.get(key) {
            Some(value) if !value.is_null() => value.clone(),
            _ => default,
        }
    }

    /// True when `key` has an original value and the current value is either
    /// identical to it or numerically the same number written the same way.
    pub fn original_is_equivalent(&self, key: &str) -> bool {
        let Some(original) = self.original.get(key) else {
            return false;
        };
        let current = self.attributes.get(key).unwrap_or(&NULL);
        if identical(current, original) {
            return true;
        }
        match (numeric_form(current), numeric_form(original)) {
            (Some(current), Some(original)) => current == original,
            _ => false,
        }
    }

    pub fn get_dirty(&self) -> Map<String, Value> {
        self.attributes
            .iter()
            .filter(|(key, _)| !self.original_is_equivalent(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
    /// With no keys: is anything dirty? With keys: is any of them dirty?
    pub fn is_dirty(&self, keys: &[&str]) -> bool {
        has_changes(&self.get_dirty(), keys)
    }
    pub fn is_clean(&self, keys: &[&str]) -> bool {
        !self.is_dirty(keys)
    }
    /// Same as [`Attributes::is_dirty`], asked of the last synced changes.
    pub fn was_changed(&self, keys: &[&str]) -> bool {
        has_changes(&self.changes, keys)
    }
}

/// With no keys: is `changes` non-empty? With keys: does it hold any of them?
pub fn has_changes(changes: &Map<String, Value>, keys: &[&str]) -> bool {
    if keys.is_empty() {
        return !changes.is_empty();
    }
    keys.iter().any(|key| changes.contains_key(*key))
}

// Strict equality that also respects key order; `Map`'s own `==` does not.
fn identical(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right.iter())
                    .all(|((lk, lv), (rk, rv))| lk == rk && identical(lv, rv))
        }
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len() && left.iter().zip(right.iter()).all(|(l, r)| identical(l, r))
        }
        _ => left == right,
    }
}

// Canonical text of a numeric-looking value, None for anything else.
fn numeric_form(value: &Value) -> Option<String> {
    match value {
        Value::Number(number) => Some(number_form(number)),
        Value::String(text) if is_numeric(text) => Some(text.clone()),
        _ => None,
    }
}

// significant digits a float keeps when turned into text
const FLOAT_PRECISION: i32 = 14;

fn number_form(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(float) => float_form(float),
        None => number.to_string(),
    }
}

// `%.14G`: 14 significant digits, trailing zeros dropped, exponent form
// (`1.0E+25`, `1.0E-5`) below 1e-4 and from 1e14 up.
fn float_form(float: f64) -> String {
    let scientific = format!("{:.*e}", (FLOAT_PRECISION - 1) as usize, float);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };
    if exponent < -4 || exponent >= FLOAT_PRECISION {
        let mantissa = mantissa.trim_end_matches('0');
        let mantissa = match mantissa.strip_suffix('.') {
            Some(whole) => format!("{}.0", whole),
            None => mantissa.to_owned(),
        };
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}E{}{}", mantissa, sign, exponent.abs());
    }
    let decimals = (FLOAT_PRECISION - 1 - exponent).max(0) as usize;
    let fixed = format!("{:.*}", decimals, float);
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        fixed
    }
}

/// Whether `text` reads as a number: optional surrounding whitespace, an
/// optional sign, digits with at most one decimal point, and an optional
/// exponent. Hex, octal and binary prefixes do not count.
pub fn is_numeric(text: &str) -> bool {
    let text = text.trim_start_matches([' ', '\t', '\n', '\r', '\x0B', '\x0C']);
    let text = text.trim_end_matches([' ', '\t', '\n', '\r', '\x0B', '\x0C']);
    let bytes = text.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let integral = bytes[i..].iter().take_while(|b| b.is_ascii_digit()).count();
    i += integral;
    let mut fractional = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        fractional = bytes[i..].iter().take_while(|b| b.is_ascii_digit()).count();
        i += fractional;
    }
    if integral + fractional == 0 {
        return false;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exponent = bytes[i..].iter().take_while(|b| b.is_ascii_digit()).count();
        if exponent == 0 {
            return false;
        }
        i += exponent;
    }
    i == bytes.len()
}
