//! Register variables up front, resolve them all at once.

use std::{
    cell::{Ref, RefCell},
    error::Error as StdError,
    fmt,
    rc::Rc,
    str::FromStr,
};

use chrono::{DateTime, FixedOffset, TimeDelta};

use crate::{
    error::{Error, Errors, Result, report},
    parse::{self, UrlRef},
    source::{SystemEnv, VarSource},
};

/// A value that is filled in by [`Registry::parse`].
///
/// Holds the default until `parse` runs. Cloning a slot gives another handle to the same
/// value.
pub struct Slot<T>(Rc<RefCell<T>>);

impl<T> Slot<T> {
    fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }

    /// Borrow the current value.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Take the value out if this is the last handle, otherwise give the slot back.
    pub fn try_into_inner(self) -> std::result::Result<T, Self> {
        Rc::try_unwrap(self.0)
            .map(RefCell::into_inner)
            .map_err(Self)
    }
}

impl<T: Clone> Slot<T> {
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Slot").field(&*self.0.borrow()).finish()
    }
}

type Resolver = Box<dyn FnOnce(&dyn VarSource) -> Result<()>>;

/// A batch of variables resolved together by [`parse`](Registry::parse).
///
/// Each registration returns a [`Slot`] holding the default right away. Nothing is read
/// from the environment until `parse`, which resolves every registered variable in
/// order, keeps going past failures, and reports all of them at once.
///
/// Slots share their value through `Rc`, so a registry and its slots stay on one thread.
///
/// # Examples
///
/// ```rust
/// use envparse::{MapEnv, Registry};
///
/// let mut registry = Registry::with_source(MapEnv::new().with_var("A", "bad"));
/// let a = registry.int("A", 1);
/// let b = registry.int("B", 2);
///
/// let errors = registry.parse().unwrap_err();
/// assert_eq!(errors.len(), 1);
/// assert_eq!(a.get(), 1);
/// assert_eq!(b.get(), 2);
/// ```
pub struct Registry<S = SystemEnv> {
    source: S,
    resolvers: Vec<Resolver>,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_source(SystemEnv)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: VarSource> Registry<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            resolvers: Vec::new(),
        }
    }

    /// Number of registered variables.
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    fn register<T, E, F>(&mut self, name: &str, default: T, parser: F) -> Slot<T>
    where
        T: 'static,
        F: FnOnce(&str) -> std::result::Result<T, E> + 'static,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        let slot = Slot::new(default);
        let dest = slot.clone();
        let name = name.to_owned();
        self.resolvers.push(Box::new(move |source: &dyn VarSource| {
            if let Some(value) = parse::resolve(source, &name, parser)? {
                dest.set(value);
            }
            Ok(())
        }));
        slot
    }

    /// Register `name` as a base-10 integer with an optional sign.
    pub fn int(&mut self, name: &str, default: i64) -> Slot<i64> {
        self.register(name, default, parse::int)
    }

    /// Register `name` as a duration expression like `"1h30m"`.
    pub fn duration(&mut self, name: &str, default: TimeDelta) -> Slot<TimeDelta> {
        self.register(name, default, parse::parse_duration)
    }

    /// Register `name` as a timestamp in the strftime `format`.
    ///
    /// The default `value` is parsed now; if it does not match `format` nothing is
    /// registered and an [`ErrorKind::InvalidDefault`](crate::ErrorKind::InvalidDefault)
    /// is returned.
    pub fn time(
        &mut self,
        name: &str,
        format: &str,
        value: &str,
    ) -> Result<Slot<DateTime<FixedOffset>>> {
        let default = parse::default(name, value, |s| parse::parse_time(format, s))?;
        let format = format.to_owned();
        Ok(self.register(name, default, move |s: &str| {
            parse::parse_time(&format, s)
        }))
    }

    /// Register `name` as a [`UrlRef`]. The default is checked like in [`time`](Self::time).
    pub fn url(&mut self, name: &str, value: &str) -> Result<Slot<UrlRef>> {
        let default = parse::default(name, value, parse::url)?;
        Ok(self.register(name, default, parse::url))
    }

    /// Register `name` as a plain string. It never fails to resolve.
    pub fn string(&mut self, name: &str, default: &str) -> Slot<String> {
        let slot = Slot::new(default.to_owned());
        let dest = slot.clone();
        let name = name.to_owned();
        self.resolvers.push(Box::new(move |source: &dyn VarSource| {
            if let Some(value) = parse::read_lossy(source, &name) {
                dest.set(value);
            }
            Ok(())
        }));
        slot
    }

    /// Register `name` to be parsed with its [`FromStr`] implementation.
    pub fn var<T>(&mut self, name: &str, default: T) -> Slot<T>
    where
        T: FromStr + 'static,
        T::Err: StdError + Send + Sync + 'static,
    {
        self.register(name, default, T::from_str)
    }

    /// Resolve every registered variable, in registration order.
    ///
    /// A failing variable does not stop the others from being resolved. Each failure is
    /// reported as one diagnostic line and leaves its slot at the default; if there were
    /// any, all of them are returned together.
    ///
    /// The registry is consumed, so variables are resolved exactly once.
    pub fn parse(self) -> std::result::Result<(), Errors> {
        let Self { source, resolvers } = self;
        let total = resolvers.len();

        let errors: Vec<Error> = resolvers
            .into_iter()
            .filter_map(|resolve| resolve(&source).err())
            .inspect(report)
            .collect();

        if errors.is_empty() {
            log::debug!("resolved {total} environment variables");
            Ok(())
        } else {
            log::debug!("{} of {total} environment variables are invalid", errors.len());
            Err(Errors::new(errors))
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("source", &self.source)
            .field("len", &self.resolvers.len())
            .finish()
    }
}
