//! Error types for environment variable lookups.

use std::{error::Error as StdError, fmt};

/// What went wrong while resolving a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The default supplied by the caller could not be parsed.
    ///
    /// This is a bug in the calling code, not a problem with the environment.
    InvalidDefault,

    /// The variable is set but its value could not be parsed.
    InvalidValue,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDefault => f.write_str("invalid default"),
            Self::InvalidValue => f.write_str("invalid value"),
        }
    }
}

/// A variable or its default failed to parse.
///
/// Carries the variable name, the offending string and the parser error, so that a
/// single line is enough to tell the operator what to fix.
#[derive(Debug, thiserror::Error)]
pub struct Error {
    kind: ErrorKind,
    name: String,
    value: String,
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} for {}: {}",
            self.kind, self.value, self.name, self.source
        )
    }
}

impl Error {
    pub fn new(
        kind: ErrorKind,
        name: impl Into<String>,
        value: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            value: value.into(),
            source: source.into(),
        }
    }

    pub(crate) fn invalid_default(
        name: &str,
        value: &str,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self::new(ErrorKind::InvalidDefault, name, value, source)
    }

    pub(crate) fn invalid_value(
        name: &str,
        value: &str,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self::new(ErrorKind::InvalidValue, name, value, source)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Name of the variable being resolved.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The string that failed to parse, either the variable's value or the default.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Terminate the process the way a command line tool would.
    ///
    /// An [`ErrorKind::InvalidValue`] is reported as a single diagnostic line and the process
    /// exits with status 1. An [`ErrorKind::InvalidDefault`] is a programming error and panics
    /// instead, so it cannot be mistaken for a misconfigured environment.
    #[track_caller]
    pub fn exit(self) -> ! {
        match self.kind {
            ErrorKind::InvalidDefault => panic!("{self}"),
            ErrorKind::InvalidValue => {
                report(&self);
                std::process::exit(1)
            }
        }
    }
}

/// A value contained bytes that are not valid unicode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("not valid unicode")]
pub struct NotUnicode;

/// Every failure collected by one [`Registry::parse`](crate::Registry::parse) call, in
/// registration order.
#[derive(Debug)]
pub struct Errors(Vec<Error>);

impl Errors {
    pub(crate) fn new(errors: Vec<Error>) -> Self {
        debug_assert!(!errors.is_empty());
        Self(errors)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Error> {
        self.0
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl StdError for Errors {}

impl IntoIterator for Errors {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Unwrap a lookup result or terminate the process.
///
/// This restores the classic "parse or exit" behaviour for binaries that want it, while
/// the functions themselves stay usable from code that wants to handle the error.
///
/// # Examples
///
/// ```rust,no_run
/// use envparse::OrExit;
///
/// let port = envparse::int("PORT", 8080).or_exit();
/// ```
pub trait OrExit<T> {
    /// Return the value, or terminate as described in [`Error::exit`].
    fn or_exit(self) -> T;
}

impl<T> OrExit<T> for Result<T, Error> {
    #[track_caller]
    fn or_exit(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => err.exit(),
        }
    }
}

impl<T> OrExit<T> for Result<T, Errors> {
    /// Exit with status 1 if any variable failed.
    ///
    /// Nothing is printed here; `parse` has already reported every failure.
    fn or_exit(self) -> T {
        match self {
            Ok(value) => value,
            Err(_) => std::process::exit(1),
        }
    }
}

/// Emit one diagnostic line for `err`.
///
/// Goes through `log` when a logger is listening and falls back to stderr otherwise, so a
/// failure is never silent.
pub(crate) fn report(err: &Error) {
    if log::log_enabled!(log::Level::Error) {
        log::error!("{err}");
    } else {
        eprintln!("{err}");
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
