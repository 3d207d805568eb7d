//! Value parsers and the read-then-parse step shared by [`Lookup`](crate::Lookup) and
//! [`Registry`](crate::Registry).

use std::error::Error as StdError;

use crate::{
    error::{Error, NotUnicode, Result},
    source::VarSource,
};

mod duration;
mod time;
mod url_ref;

pub use duration::{DurationError, parse_duration};
pub use time::parse_time;
pub use url_ref::{UrlError, UrlRef};

/// Read `name`, treating an empty value the same as an absent one.
///
/// A value that is not valid unicode is reported as [`ErrorKind::InvalidValue`](crate::ErrorKind).
pub(crate) fn read<S: VarSource + ?Sized>(source: &S, name: &str) -> Result<Option<String>> {
    match source.var_os(name) {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => match raw.into_string() {
            Ok(value) => Ok(Some(value)),
            Err(raw) => Err(Error::invalid_value(
                name,
                &raw.to_string_lossy(),
                NotUnicode,
            )),
        },
    }
}

/// Like [`read`], but never fails: invalid unicode is replaced and a warning logged.
pub(crate) fn read_lossy<S: VarSource + ?Sized>(source: &S, name: &str) -> Option<String> {
    let raw = source.var_os(name).filter(|raw| !raw.is_empty())?;
    match raw.into_string() {
        Ok(value) => Some(value),
        Err(raw) => {
            let value = raw.to_string_lossy().into_owned();
            log::warn!("{name} is not valid unicode, using {value:?}");
            Some(value)
        }
    }
}

/// Read `name` and, if it is set, parse it with `parse`.
pub(crate) fn resolve<S, T, E, F>(source: &S, name: &str, parse: F) -> Result<Option<T>>
where
    S: VarSource + ?Sized,
    F: FnOnce(&str) -> std::result::Result<T, E>,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    match read(source, name)? {
        None => Ok(None),
        Some(value) => parse(&value)
            .map(Some)
            .map_err(|err| Error::invalid_value(name, &value, err)),
    }
}

/// Parse a caller-supplied default, which must always succeed for correct callers.
pub(crate) fn default<T, E, F>(name: &str, value: &str, parse: F) -> Result<T>
where
    F: FnOnce(&str) -> std::result::Result<T, E>,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    parse(value).map_err(|err| Error::invalid_default(name, value, err))
}

/// Base-10 integer with an optional sign.
pub(crate) fn int(value: &str) -> std::result::Result<i64, std::num::ParseIntError> {
    value.parse()
}

/// Absolute URL or relative reference.
pub(crate) fn url(value: &str) -> std::result::Result<UrlRef, UrlError> {
    UrlRef::parse(value)
}
