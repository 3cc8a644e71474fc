//! Generation options with partial-update merge semantics.
//!
//! Every field is independently unset or set. Merging a patch overwrites the
//! fields the patch sets and leaves every other field alone.
//!
//! ```rust
//! use pprovider::Options;
//! use serde_json::json;
//!
//! let mut base = Options::new().with_temperature(0.2).with_max_tokens(256);
//! let patch = Options::from_json(&json!({ "max_tokens": 64, "user": "alice" }))
//!     .expect("patch should decode");
//!
//! base.update(&patch);
//! assert_eq!(base.temperature, Some(0.2));
//! assert_eq!(base.max_tokens, Some(64));
//! assert_eq!(base.user.as_deref(), Some("alice"));
//! ```

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stop sequences: the remote API accepts one string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stop {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Options {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Stop>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logit_bias: Option<BTreeMap<String, i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// A patch that does not decode as [`Options`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeError {
    pub message: String,
}

impl Display for MergeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid options patch: {}", self.message)
    }
}

impl Error for MergeError {}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a raw JSON patch. `null` decodes to an empty patch.
    pub fn from_json(value: &Value) -> Result<Self, MergeError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(_) => serde_json::from_value(value.clone()).map_err(|error| MergeError {
                message: error.to_string(),
            }),
            other => Err(MergeError {
                message: format!("expected a JSON object, got {other}"),
            }),
        }
    }

    /// Overwrites every field set in `patch`.
    pub fn update(&mut self, patch: &Options) {
        merge_field(&mut self.temperature, &patch.temperature);
        merge_field(&mut self.top_p, &patch.top_p);
        merge_field(&mut self.n, &patch.n);
        merge_field(&mut self.stream, &patch.stream);
        merge_field(&mut self.stop, &patch.stop);
        merge_field(&mut self.max_tokens, &patch.max_tokens);
        merge_field(&mut self.presence_penalty, &patch.presence_penalty);
        merge_field(&mut self.frequency_penalty, &patch.frequency_penalty);
        merge_field(&mut self.logit_bias, &patch.logit_bias);
        merge_field(&mut self.user, &patch.user);
    }

    /// Decodes `patch` and merges it. On error `self` is left untouched.
    pub fn update_from_json(&mut self, patch: &Value) -> Result<(), MergeError> {
        let patch = Self::from_json(patch)?;
        self.update(&patch);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_n(mut self, n: u32) -> Self {
        self.n = Some(n);
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = Some(stream);
        self
    }

    pub fn with_stop(mut self, stop: Stop) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_presence_penalty(mut self, penalty: f64) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }

    pub fn with_frequency_penalty(mut self, penalty: f64) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    pub fn with_logit_bias(mut self, bias: BTreeMap<String, i32>) -> Self {
        self.logit_bias = Some(bias);
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}

fn merge_field<T: Clone>(base: &mut Option<T>, patch: &Option<T>) {
    if let Some(value) = patch {
        *base = Some(value.clone());
    }
}
