//! The X-SMTPAPI header document and its accumulation rules.

use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::{
    defaults::Defaults,
    error::Result,
    input::{Recipients, Substitution},
};

/// Settings for a single named content filter.
///
/// The wire format nests the settings map under a `settings` key; the map is
/// updated key-by-key, so unrelated settings under the same filter persist
/// across calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterSettings {
    /// Setting name to value.
    pub settings: Map<String, Value>,
}

/// The accumulated header document.
///
/// Every field is absent until a mutator inserts qualifying input, and
/// absent fields are skipped on serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<BTreeMap<String, Vec<String>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    unique_args: Option<Map<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    filters: Option<BTreeMap<String, FilterSettings>>,
}

/// Builder for the X-SMTPAPI header value.
///
/// Accumulates recipients, substitution variables, unique tracking
/// arguments, a category, and filter settings, then renders the current
/// document as a JSON string. Two instances never share state; cloning
/// produces an independent document.
///
/// # Examples
///
/// ```
/// use xsmtpapi::Headers;
///
/// let headers = Headers::new()
///     .add_to(["alice@example.com", "bob@example.com"])
///     .add_substitution("%name%", ["Alice", "Bob"])
///     .set_category("newsletter");
///
/// assert!(!headers.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Headers {
    document: Document,
}

impl Headers {
    /// Creates an empty header document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a header document seeded from `defaults`.
    ///
    /// Each present option is routed through the corresponding mutator, in
    /// the fixed order `to`, `sub`, `unique`, `category`, `filters`, so
    /// defaults and later mutator calls combine under the same rules.
    #[must_use]
    pub fn with_defaults(defaults: Defaults) -> Self {
        let mut headers = Self::new();

        if let Some(to) = defaults.to {
            headers = headers.add_to(to);
        }
        if let Some(sub) = defaults.sub {
            headers = headers.add_substitutions(sub);
        }
        if let Some(unique) = defaults.unique {
            headers = headers.set_unique_args(unique);
        }
        if let Some(category) = defaults.category {
            headers = headers.set_category(category);
        }
        if let Some(filters) = defaults.filters {
            for (filter, settings) in filters {
                headers = headers.add_filter_settings(filter, settings);
            }
        }

        headers
    }

    /// Adds to the recipient list.
    ///
    /// A single address is appended to the existing list (creating it if
    /// absent); a list of addresses replaces the existing list outright.
    ///
    /// # Examples
    ///
    /// ```
    /// use xsmtpapi::Headers;
    ///
    /// let headers = Headers::new()
    ///     .add_to("alice@example.com")
    ///     .add_to("bob@example.com");
    /// ```
    #[must_use]
    pub fn add_to(mut self, to: impl Into<Recipients>) -> Self {
        match to.into() {
            Recipients::One(address) => {
                trace!(%address, "appending recipient");
                self.document.to.get_or_insert_with(Vec::new).push(address);
            }
            Recipients::Many(addresses) => {
                debug!(count = addresses.len(), "replacing recipient list");
                self.document.to = Some(addresses);
            }
        }
        self
    }

    /// Sets the substitution values for a placeholder.
    ///
    /// In the message body, placeholders are replaced per-recipient using
    /// the value list, which aligns positionally with the recipient list. A
    /// single value is stored as a one-element list; a list is stored
    /// verbatim. Either replaces any prior entry at `key`.
    #[must_use]
    pub fn add_substitution(
        mut self,
        key: impl Into<String>,
        value: impl Into<Substitution>,
    ) -> Self {
        let key = key.into();
        let values = match value.into() {
            Substitution::One(value) => vec![value],
            Substitution::Many(values) => values,
        };

        trace!(key = %key, count = values.len(), "setting substitution values");
        self.document
            .sub
            .get_or_insert_with(BTreeMap::new)
            .insert(key, values);
        self
    }

    /// Sets substitution values for several placeholders at once.
    ///
    /// Each pair is routed through the single-key logic; this is a shallow
    /// bulk seed, not a merge primitive of its own.
    #[must_use]
    pub fn add_substitutions<K, V>(mut self, substitutions: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Substitution>,
    {
        for (key, value) in substitutions {
            self = self.add_substitution(key, value);
        }
        self
    }

    /// Sets the unique tracking arguments, replacing any prior set.
    ///
    /// Unique arguments are opaque key/value pairs attached to the message
    /// for later tracking and reporting; they pass through unchanged.
    #[must_use]
    pub fn set_unique_args(mut self, args: Map<String, Value>) -> Self {
        if self.document.unique_args.is_some() {
            debug!("replacing unique arguments");
        }
        self.document.unique_args = Some(args);
        self
    }

    /// Sets the category under which the message is logged.
    #[must_use]
    pub fn set_category(mut self, category: impl Into<String>) -> Self {
        self.document.category = Some(category.into());
        self
    }

    /// Sets one setting of a named content filter.
    ///
    /// The filter's settings map is created lazily on first reference to
    /// `filter`, then updated key-by-key: a repeated `setting` name
    /// overwrites its prior value, while unrelated settings under the same
    /// filter, and unrelated filters, are unaffected.
    ///
    /// # Examples
    ///
    /// ```
    /// use xsmtpapi::Headers;
    ///
    /// let headers = Headers::new()
    ///     .add_filter_setting("clicktrack", "enable", 1)
    ///     .add_filter_setting("footer", "text/plain", "Sent via example.com");
    /// ```
    #[must_use]
    pub fn add_filter_setting(
        mut self,
        filter: impl Into<String>,
        setting: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        let filter = filter.into();
        let setting = setting.into();

        trace!(filter = %filter, setting = %setting, "setting filter value");
        self.document
            .filters
            .get_or_insert_with(BTreeMap::new)
            .entry(filter)
            .or_default()
            .settings
            .insert(setting, value.into());
        self
    }

    /// Sets several settings of a named content filter at once.
    ///
    /// Each pair is routed through the single-setting logic.
    #[must_use]
    pub fn add_filter_settings<S, V>(
        mut self,
        filter: impl Into<String>,
        settings: impl IntoIterator<Item = (S, V)>,
    ) -> Self
    where
        S: Into<String>,
        V: Into<Value>,
    {
        let filter = filter.into();
        for (setting, value) in settings {
            self = self.add_filter_setting(filter.clone(), setting, value);
        }
        self
    }

    /// Returns `true` while no field has been populated.
    ///
    /// Callers use this to skip emitting the header altogether when nothing
    /// was set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.document == Document::default()
    }

    /// Renders the current document as a JSON string.
    ///
    /// The output reflects the live document, not a snapshot; fields that
    /// were never populated are absent. Consumers must not depend on key
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.document)?)
    }
}

impl Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json().map_err(|_| fmt::Error)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn parsed(headers: &Headers) -> Value {
        serde_json::from_str(&headers.to_json().unwrap()).unwrap()
    }

    #[test]
    fn empty_document_serializes_to_empty_object() {
        let headers = Headers::new();
        assert!(headers.is_empty());
        assert_eq!(headers.to_json().unwrap(), "{}");
    }

    #[test]
    fn single_addresses_append() {
        let headers = Headers::new()
            .add_to("a@example.com")
            .add_to("b@example.com");

        assert_eq!(
            parsed(&headers),
            json!({"to": ["a@example.com", "b@example.com"]})
        );
    }

    #[test]
    fn address_list_replaces_prior_recipients() {
        let headers = Headers::new()
            .add_to("a@example.com")
            .add_to(["c@example.com", "d@example.com"]);

        assert_eq!(
            parsed(&headers),
            json!({"to": ["c@example.com", "d@example.com"]})
        );
    }

    #[test]
    fn single_address_appends_after_list() {
        let headers = Headers::new()
            .add_to(["a@example.com"])
            .add_to("b@example.com");

        assert_eq!(
            parsed(&headers),
            json!({"to": ["a@example.com", "b@example.com"]})
        );
    }

    #[test]
    fn single_substitution_value_is_wrapped() {
        let headers = Headers::new().add_substitution("%name%", "Alice");

        assert_eq!(parsed(&headers), json!({"sub": {"%name%": ["Alice"]}}));
    }

    #[test]
    fn substitution_list_replaces_prior_entry() {
        let headers = Headers::new()
            .add_substitution("%name%", "Alice")
            .add_substitution("%name%", ["Bob", "Carol"]);

        assert_eq!(
            parsed(&headers),
            json!({"sub": {"%name%": ["Bob", "Carol"]}})
        );
    }

    #[test]
    fn bulk_substitutions_route_through_single_key_logic() {
        let headers = Headers::new()
            .add_substitutions([("%name%", "Alice"), ("%city%", "Berlin")]);

        assert_eq!(
            parsed(&headers),
            json!({"sub": {"%name%": ["Alice"], "%city%": ["Berlin"]}})
        );
    }

    #[test]
    fn unique_args_replace_wholesale() {
        let mut first = Map::new();
        first.insert("campaign".to_owned(), Value::from("spring2024"));
        let mut second = Map::new();
        second.insert("batch".to_owned(), Value::from(7));

        let headers = Headers::new()
            .set_unique_args(first)
            .set_unique_args(second);

        assert_eq!(parsed(&headers), json!({"unique_args": {"batch": 7}}));
    }

    #[test]
    fn category_is_set() {
        let headers = Headers::new().set_category("newsletter");
        assert_eq!(parsed(&headers), json!({"category": "newsletter"}));
    }

    #[test]
    fn distinct_filter_settings_are_retained() {
        let headers = Headers::new()
            .add_filter_setting("f", "s1", 1)
            .add_filter_setting("f", "s2", 2);

        assert_eq!(
            parsed(&headers),
            json!({"filters": {"f": {"settings": {"s1": 1, "s2": 2}}}})
        );
    }

    #[test]
    fn repeated_filter_setting_overwrites() {
        let headers = Headers::new()
            .add_filter_setting("f", "s1", 1)
            .add_filter_setting("f", "s1", 2);

        assert_eq!(
            parsed(&headers),
            json!({"filters": {"f": {"settings": {"s1": 2}}}})
        );
    }

    #[test]
    fn unrelated_filters_are_unaffected() {
        let headers = Headers::new()
            .add_filter_setting("clicktrack", "enable", 1)
            .add_filter_setting("footer", "text/plain", "Sent via example.com");

        assert_eq!(
            parsed(&headers),
            json!({
                "filters": {
                    "clicktrack": {"settings": {"enable": 1}},
                    "footer": {"settings": {"text/plain": "Sent via example.com"}}
                }
            })
        );
    }

    #[test]
    fn defaults_produce_no_extraneous_fields() {
        let defaults: Defaults =
            serde_json::from_str(r#"{"to": "a@example.com", "category": "promo"}"#).unwrap();
        let headers = Headers::with_defaults(defaults);

        assert_eq!(
            parsed(&headers),
            json!({"to": ["a@example.com"], "category": "promo"})
        );
    }

    #[test]
    fn defaults_combine_with_later_calls_under_the_same_rules() {
        let defaults: Defaults = serde_json::from_str(
            r#"{
                "to": ["a@example.com"],
                "sub": {"%name%": "Alice"},
                "unique": {"campaign": "spring2024"},
                "category": "promo",
                "filters": {"clicktrack": {"enable": 1}}
            }"#,
        )
        .unwrap();

        let headers = Headers::with_defaults(defaults)
            .add_to("b@example.com")
            .add_substitution("%name%", ["Alice", "Bob"])
            .set_category("newsletter")
            .add_filter_setting("clicktrack", "enable", 0);

        assert_eq!(
            parsed(&headers),
            json!({
                "to": ["a@example.com", "b@example.com"],
                "sub": {"%name%": ["Alice", "Bob"]},
                "unique_args": {"campaign": "spring2024"},
                "category": "newsletter",
                "filters": {"clicktrack": {"settings": {"enable": 0}}}
            })
        );
    }

    #[test]
    fn empty_bulk_calls_leave_fields_absent() {
        let headers = Headers::new()
            .add_substitutions(Vec::<(String, Substitution)>::new())
            .add_filter_settings("f", Vec::<(String, Value)>::new());

        assert!(headers.is_empty());
        assert_eq!(headers.to_json().unwrap(), "{}");
    }

    #[test]
    fn rendering_is_idempotent() {
        let headers = Headers::new()
            .add_to("a@example.com")
            .set_category("newsletter");

        assert_eq!(headers.to_json().unwrap(), headers.to_json().unwrap());
    }

    #[test]
    fn rendering_reflects_the_live_document() {
        let headers = Headers::new().set_category("promo");
        let before = headers.to_json().unwrap();

        let headers = headers.set_category("newsletter");
        let after = headers.to_json().unwrap();

        assert_ne!(before, after);
        assert_eq!(parsed(&headers), json!({"category": "newsletter"}));
    }

    #[test]
    fn clones_do_not_share_state() {
        let original = Headers::new().set_category("promo");
        let modified = original.clone().add_to("a@example.com");

        assert_eq!(parsed(&original), json!({"category": "promo"}));
        assert_eq!(
            parsed(&modified),
            json!({"category": "promo", "to": ["a@example.com"]})
        );
    }

    #[test]
    fn display_matches_to_json() {
        let headers = Headers::new().set_category("newsletter");
        assert_eq!(headers.to_string(), headers.to_json().unwrap());
    }
}
