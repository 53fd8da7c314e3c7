//! String helpers shared by the engines.

use core::hash::BuildHasherDefault;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use lazy_static::lazy_static;
use seahash::SeaHasher;

pub type OtherHasher = BuildHasherDefault<SeaHasher>;

lazy_static! {
    // studly results are pure, so they are kept for the life of the process
    static ref STUDLY_CACHE: Mutex<HashMap<String, String, OtherHasher>> =
        Mutex::new(HashMap::default());
}

// same set of word delimiters as a classic `ucwords`
fn is_word_delimiter(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0C' | '\x0B')
}

/// Converts `first_name` / `first-name` / `first name` into `FirstName`.
///
/// `-` and `_` become word breaks, the first letter of every word is upper
/// cased (ASCII only) and the spaces are removed. Other whitespace survives.
pub fn studly(value: &str) -> String {
    let mut cache = STUDLY_CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(kept) = cache.get(value) {
        return kept.clone();
    }
    let mut studly = String::with_capacity(value.len());
    let mut capitalize = true;
    for c in value.chars() {
        let c = if c == '-' || c == '_' { ' ' } else { c };
        if capitalize {
            studly.push(c.to_ascii_uppercase());
        } else {
            studly.push(c);
        }
        capitalize = is_word_delimiter(c);
    }
    studly.retain(|c| c != ' ');
    cache.insert(value.to_owned(), studly.clone());
    studly
}
