//! Where variables are read from.

use std::{
    collections::BTreeMap,
    ffi::{OsStr, OsString},
};

/// A read-only view of a set of environment variables.
///
/// Both the direct-lookup functions and the [`Registry`](crate::Registry) are generic over
/// this trait, so they can be pointed at the process environment ([`SystemEnv`]) or at a
/// fixed snapshot ([`MapEnv`]).
pub trait VarSource {
    /// Get the raw value of the variable `name`, or `None` if it is not set.
    fn var_os(&self, name: &str) -> Option<OsString>;
}

impl<S: VarSource + ?Sized> VarSource for &S {
    fn var_os(&self, name: &str) -> Option<OsString> {
        (**self).var_os(name)
    }
}

/// The environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl VarSource for SystemEnv {
    fn var_os(&self, name: &str) -> Option<OsString> {
        std::env::var_os(name)
    }
}

/// An in-memory set of variables that never touches the process environment.
///
/// # Examples
///
/// ```rust
/// use envparse::{Lookup, MapEnv};
///
/// let env = MapEnv::new().with_var("PORT", "9090");
/// let lookup = Lookup::with_source(env);
///
/// assert_eq!(lookup.int("PORT", 8080).unwrap(), 9090);
/// assert_eq!(lookup.int("WORKERS", 4).unwrap(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: BTreeMap<OsString, OsString>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a variable, consuming and returning `self`.
    pub fn with_var(mut self, name: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<OsString>, value: impl Into<OsString>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: impl AsRef<OsStr>) {
        self.vars.remove(name.as_ref());
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl VarSource for MapEnv {
    fn var_os(&self, name: &str) -> Option<OsString> {
        self.vars.get(OsStr::new(name)).cloned()
    }
}

impl<K: Into<OsString>, V: Into<OsString>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let vars = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { vars }
    }
}

impl<K: Into<OsString>, V: Into<OsString>> From<Vec<(K, V)>> for MapEnv {
    fn from(vars: Vec<(K, V)>) -> Self {
        vars.into_iter().collect()
    }
}
