//! Default header settings applied at construction time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::input::{Recipients, Substitution};

/// Default header settings recognized by
/// [`Headers::with_defaults`](crate::Headers::with_defaults).
///
/// Each present option is routed through the corresponding mutator, in the
/// fixed order `to`, `sub`, `unique`, `category`, `filters`, so defaults
/// combine with later mutator calls under exactly the same rules as the
/// calls themselves.
///
/// The struct deserializes with serde, so default headers can live inside a
/// caller's configuration file:
///
/// ```toml
/// to = ["a@example.com", "b@example.com"]
/// category = "newsletter"
///
/// [sub]
/// "%name%" = ["Alice", "Bob"]
///
/// [unique]
/// campaign = "spring2024"
///
/// [filters.clicktrack]
/// enable = 1
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    /// Additional recipients, a single address or a list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Recipients>,

    /// Substitution values keyed by placeholder name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<BTreeMap<String, Substitution>>,

    /// Unique tracking arguments, passed through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<Map<String, Value>>,

    /// Category under which the message is logged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Flat setting-to-value maps keyed by filter name. The nested
    /// `settings` wrapper of the wire format is added by the builder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<BTreeMap<String, Map<String, Value>>>,
}
