//! Builder for the SendGrid X-SMTPAPI email header.
//!
//! The X-SMTPAPI header is a single JSON-encoded value attached to an
//! outgoing message, instructing the delivery API to add recipients,
//! substitute per-recipient template variables, carry opaque tracking
//! arguments, log the message under a category, and configure named content
//! filters. This crate accumulates those settings and renders the JSON
//! value; it never transmits anything.
//!
//! # Examples
//!
//! ```
//! use xsmtpapi::{Headers, X_SMTPAPI};
//!
//! let headers = Headers::new()
//!     .add_to("alice@example.com")
//!     .add_substitution("%name%", "Alice")
//!     .set_category("newsletter")
//!     .add_filter_setting("clicktrack", "enable", 1);
//!
//! let header = format!("{X_SMTPAPI}: {}", headers.to_json()?);
//! # Ok::<(), xsmtpapi::HeaderError>(())
//! ```

pub mod defaults;
pub mod error;
pub mod headers;
pub mod input;

pub use defaults::Defaults;
pub use error::{HeaderError, Result};
pub use headers::{FilterSettings, Headers};
pub use input::{Recipients, Substitution};

/// Name of the transport header the serialized document rides in.
pub const X_SMTPAPI: &str = "X-SMTPAPI";
