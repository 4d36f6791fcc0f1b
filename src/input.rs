//! Tagged input types for the builder's string-or-sequence parameters.
//!
//! The delivery API accepts either a single value or a positional list in
//! several places, and the two shapes carry different merge semantics. The
//! shapes are kept as distinct variants here so the dispatch happens in the
//! type system instead of being sniffed at runtime.

use serde::{Deserialize, Serialize};

/// Recipient input for [`Headers::add_to`](crate::Headers::add_to).
///
/// A single address is appended to the current recipient list; a full list
/// replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    /// One address, appended to the recipient list.
    One(String),
    /// A full list, replacing the recipient list.
    Many(Vec<String>),
}

impl From<&str> for Recipients {
    fn from(address: &str) -> Self {
        Self::One(address.to_owned())
    }
}

impl From<String> for Recipients {
    fn from(address: String) -> Self {
        Self::One(address)
    }
}

impl From<Vec<String>> for Recipients {
    fn from(addresses: Vec<String>) -> Self {
        Self::Many(addresses)
    }
}

impl From<&[&str]> for Recipients {
    fn from(addresses: &[&str]) -> Self {
        Self::Many(addresses.iter().map(|address| (*address).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Recipients {
    fn from(addresses: [&str; N]) -> Self {
        Self::Many(addresses.iter().map(|address| (*address).to_owned()).collect())
    }
}

/// Substitution input for
/// [`Headers::add_substitution`](crate::Headers::add_substitution).
///
/// A single value is stored as a one-element list so the serialized entry
/// always aligns positionally with the recipient list; a list is stored
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Substitution {
    /// One value, wrapped in a one-element list on insertion.
    One(String),
    /// A list of values, one per recipient, stored verbatim.
    Many(Vec<String>),
}

impl From<&str> for Substitution {
    fn from(value: &str) -> Self {
        Self::One(value.to_owned())
    }
}

impl From<String> for Substitution {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for Substitution {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<&[&str]> for Substitution {
    fn from(values: &[&str]) -> Self {
        Self::Many(values.iter().map(|value| (*value).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Substitution {
    fn from(values: [&str; N]) -> Self {
        Self::Many(values.iter().map(|value| (*value).to_owned()).collect())
    }
}
