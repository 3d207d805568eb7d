#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Read typed configuration values from environment variables.
//!
//! There are two ways to use this crate.
//!
//! **Direct lookup.** Read a variable and parse it immediately. An absent or empty
//! variable gives back the default:
//!
//! ```rust,no_run
//! use chrono::TimeDelta;
//! use envparse::OrExit;
//!
//! let port = envparse::int("PORT", 8080).or_exit();
//! let timeout = envparse::duration("TIMEOUT", TimeDelta::seconds(30)).or_exit();
//! let host = envparse::string("HOST", "127.0.0.1");
//! ```
//!
//! **Deferred registration.** Register every variable first, then resolve them together.
//! All invalid variables are reported in one go instead of stopping at the first:
//!
//! ```rust,no_run
//! use envparse::{OrExit, Registry};
//!
//! let mut registry = Registry::new();
//! let port = registry.int("PORT", 8080);
//! let host = registry.string("HOST", "127.0.0.1");
//! registry.parse().or_exit();
//!
//! println!("listening on {}:{}", host.get(), port.get());
//! ```
//!
//! Failures are returned as [`Error`] values. [`OrExit`] turns them into the usual command
//! line behaviour: one diagnostic line and exit status 1 for a bad variable, a panic for a
//! default that does not parse. Diagnostics go through the `log` facade when a logger is
//! installed, and to stderr otherwise.

use std::{error::Error as StdError, str::FromStr};

use chrono::{DateTime, FixedOffset, TimeDelta};

pub mod error;
mod lookup;
mod parse;
mod registry;
mod source;

pub use error::{Error, ErrorKind, Errors, NotUnicode, OrExit, Result};
pub use lookup::Lookup;
pub use parse::{DurationError, UrlError, UrlRef, parse_duration, parse_time};
pub use registry::{Registry, Slot};
pub use source::{MapEnv, SystemEnv, VarSource};

/// Get the environment variable `name` as an integer, see [`Lookup::int`].
pub fn int(name: &str, default: i64) -> Result<i64> {
    Lookup::new().int(name, default)
}

/// Get the environment variable `name` as a duration, see [`Lookup::duration`].
pub fn duration(name: &str, default: TimeDelta) -> Result<TimeDelta> {
    Lookup::new().duration(name, default)
}

/// Get the environment variable `name` as a timestamp, see [`Lookup::time`].
pub fn time(name: &str, format: &str, value: &str) -> Result<DateTime<FixedOffset>> {
    Lookup::new().time(name, format, value)
}

/// Get the environment variable `name` as a URL reference, see [`Lookup::url`].
pub fn url(name: &str, value: &str) -> Result<UrlRef> {
    Lookup::new().url(name, value)
}

/// Get the environment variable `name`, or `default` if it is absent or empty.
pub fn string(name: &str, default: &str) -> String {
    Lookup::new().string(name, default)
}

/// Get the environment variable `name` parsed with [`FromStr`], see [`Lookup::var`].
pub fn var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    Lookup::new().var(name, default)
}
