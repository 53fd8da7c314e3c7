//! Declarative record definitions.
//!
//! A [`Definition`] carries the four lists a record starts out with. Kinds
//! return one from [`crate::Kind::definition`]; they can also be read from a
//! file, e.g. `user.toml`:
//!
//! ```toml
//! fillable = ["name", "email"]
//! hidden = ["password"]
//! ```
//!
//! Environment variables prefixed `ATTRKIT_` override file values, with
//! lists written comma separated (`ATTRKIT_HIDDEN=password,token`).

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::kind::Kind;
use crate::model::Model;

const ENV_PREFIX: &str = "ATTRKIT";
const LIST_KEYS: [&str; 4] = ["fillable", "guarded", "hidden", "visible"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default)]
    pub fillable: Vec<String>,
    #[serde(default)]
    pub guarded: Vec<String>,
    #[serde(default)]
    pub hidden: Vec<String>,
    #[serde(default)]
    pub visible: Vec<String>,
}

fn environment() -> Environment {
    let mut environment = Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(",");
    for key in LIST_KEYS {
        environment = environment.with_list_parse_key(key);
    }
    environment
}

fn strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

impl Definition {
    /// Reads a definition file, format picked by its extension, with
    /// environment overrides layered on top.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let definition: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        Ok(definition)
    }

    /// Parses a definition held in memory. No environment overrides apply.
    pub fn parse(text: &str, format: FileFormat) -> Result<Self> {
        let definition: Self = Config::builder()
            .add_source(File::from_str(text, format))
            .build()?
            .try_deserialize()?;
        Ok(definition)
    }

    pub fn with_fillable<I: IntoIterator<Item = S>, S: Into<String>>(mut self, fillable: I) -> Self {
        self.fillable = strings(fillable);
        self
    }
    pub fn with_guarded<I: IntoIterator<Item = S>, S: Into<String>>(mut self, guarded: I) -> Self {
        self.guarded = strings(guarded);
        self
    }
    pub fn with_hidden<I: IntoIterator<Item = S>, S: Into<String>>(mut self, hidden: I) -> Self {
        self.hidden = strings(hidden);
        self
    }
    pub fn with_visible<I: IntoIterator<Item = S>, S: Into<String>>(mut self, visible: I) -> Self {
        self.visible = strings(visible);
        self
    }

    /// Replaces the four lists of `model` with this definition's.
    pub fn apply<K: Kind>(&self, model: &mut Model<K>) {
        model
            .fillable(self.fillable.iter().cloned())
            .guard(self.guarded.iter().cloned())
            .set_hidden(self.hidden.iter().cloned())
            .set_visible(self.visible.iter().cloned());
    }
}
