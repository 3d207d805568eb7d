//! Read a variable and parse it on the spot.

use std::{error::Error as StdError, str::FromStr};

use chrono::{DateTime, FixedOffset, TimeDelta};

use crate::{
    error::Result,
    parse::{self, UrlRef},
    source::{SystemEnv, VarSource},
};

/// Direct lookups against a [`VarSource`].
///
/// Every method reads the variable when called and keeps no state of its own. A variable
/// that is absent or set to the empty string resolves to the supplied default.
///
/// The crate-root functions ([`int`](crate::int), [`duration`](crate::duration), ...) are
/// shorthands for `Lookup::new()`, which reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lookup<S = SystemEnv> {
    source: S,
}

impl Lookup {
    pub const fn new() -> Self {
        Self { source: SystemEnv }
    }
}

impl<S: VarSource> Lookup<S> {
    pub const fn with_source(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get `name` as a base-10 integer with an optional sign.
    pub fn int(&self, name: &str, default: i64) -> Result<i64> {
        Ok(parse::resolve(&self.source, name, parse::int)?.unwrap_or(default))
    }

    /// Get `name` as a duration expression like `"1h30m"`, see [`parse_duration`](crate::parse_duration).
    pub fn duration(&self, name: &str, default: TimeDelta) -> Result<TimeDelta> {
        Ok(parse::resolve(&self.source, name, parse::parse_duration)?.unwrap_or(default))
    }

    /// Get `name` as a timestamp in the strftime `format`, see [`parse_time`](crate::parse_time).
    ///
    /// The default is given as a string in the same format and is parsed on every call,
    /// whether or not the variable is set.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidDefault`](crate::ErrorKind::InvalidDefault) if `value` does not
    /// match `format`, [`ErrorKind::InvalidValue`](crate::ErrorKind::InvalidValue) if the
    /// variable does not.
    pub fn time(&self, name: &str, format: &str, value: &str) -> Result<DateTime<FixedOffset>> {
        let default = parse::default(name, value, |s| parse::parse_time(format, s))?;
        let parsed = parse::resolve(&self.source, name, |s| parse::parse_time(format, s))?;
        Ok(parsed.unwrap_or(default))
    }

    /// Get `name` as an absolute URL or a relative reference, see [`UrlRef`].
    ///
    /// # Errors
    ///
    /// Same as [`time`](Self::time): a malformed `value` is an
    /// [`ErrorKind::InvalidDefault`](crate::ErrorKind::InvalidDefault).
    pub fn url(&self, name: &str, value: &str) -> Result<UrlRef> {
        let default = parse::default(name, value, parse::url)?;
        Ok(parse::resolve(&self.source, name, parse::url)?.unwrap_or(default))
    }

    /// Get `name` verbatim. Never fails.
    pub fn string(&self, name: &str, default: &str) -> String {
        parse::read_lossy(&self.source, name).unwrap_or_else(|| default.to_owned())
    }

    /// Get `name` parsed with its [`FromStr`] implementation.
    pub fn var<T>(&self, name: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: StdError + Send + Sync + 'static,
    {
        Ok(parse::resolve(&self.source, name, T::from_str)?.unwrap_or(default))
    }
}
