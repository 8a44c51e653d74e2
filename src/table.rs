use std::fmt;

use tracing::debug;

use crate::coerce::{self, Coerce};
use crate::dispatch::{dispatch, DispatchReport};
use crate::{ConversionError, OptionError};

enum SetError {
    Conversion(ConversionError),
    Unselected,
}

impl From<ConversionError> for SetError {
    fn from(e: ConversionError) -> Self {
        SetError::Conversion(e)
    }
}

type Setter<T> = Box<dyn Fn(&mut T, &str) -> Result<(), SetError>>;

/// Maps option names to the fields of a `T` they assign.
///
/// Entries are tested in registration order and the first one whose name
/// equals the option name is used. Names nobody registered are ignored.
///
/// The `*_via` methods reach a field through something that may not exist
/// yet, typically a sub-object chosen by an earlier option. If it is still
/// missing when the option arrives, [`OptionTable::apply`] fails with
/// [`OptionError::NoDestination`]. Callers must list the selecting option
/// before the options that fill the selected object.
pub struct OptionTable<T> {
    entries: Vec<(String, Setter<T>)>,
}

impl<T> Default for OptionTable<T> {
    fn default() -> Self {
        OptionTable {
            entries: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for OptionTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionTable")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> OptionTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry<F>(mut self, name: impl Into<String>, setter: F) -> Self
    where
        F: Fn(&mut T, &str) -> Result<(), SetError> + 'static,
    {
        self.entries.push((name.into(), Box::new(setter)));
        self
    }

    /// Assigns a field using its [`Coerce`] conversion.
    pub fn define<V, F>(self, name: impl Into<String>, field: F) -> Self
    where
        V: Coerce,
        F: Fn(&mut T) -> &mut V + 'static,
    {
        self.entry(name, move |target, value| {
            coerce::define(field(target), value)?;
            Ok(())
        })
    }

    /// Like [`define`](Self::define), for a field behind an optional object.
    pub fn define_via<V, F>(self, name: impl Into<String>, field: F) -> Self
    where
        V: Coerce,
        F: Fn(&mut T) -> Option<&mut V> + 'static,
    {
        self.entry(name, move |target, value| {
            let dest = field(target).ok_or(SetError::Unselected)?;
            coerce::define(dest, value)?;
            Ok(())
        })
    }

    /// Builds the field from the value with `V::from`.
    pub fn object<V, F>(self, name: impl Into<String>, field: F) -> Self
    where
        V: for<'a> From<&'a str>,
        F: Fn(&mut T) -> &mut V + 'static,
    {
        self.entry(name, move |target, value| {
            coerce::object(field(target), value);
            Ok(())
        })
    }

    pub fn object_via<V, F>(self, name: impl Into<String>, field: F) -> Self
    where
        V: for<'a> From<&'a str>,
        F: Fn(&mut T) -> Option<&mut V> + 'static,
    {
        self.entry(name, move |target, value| {
            let dest = field(target).ok_or(SetError::Unselected)?;
            coerce::object(dest, value);
            Ok(())
        })
    }

    /// Stores `make(value)` in the field. This is how a polymorphic
    /// sub-object is selected: `make` picks the implementation from the value.
    pub fn transform<V, F, M>(self, name: impl Into<String>, field: F, make: M) -> Self
    where
        F: Fn(&mut T) -> &mut V + 'static,
        M: Fn(&str) -> V + 'static,
    {
        self.entry(name, move |target, value| {
            coerce::transform(field(target), value, &make);
            Ok(())
        })
    }

    pub fn transform_via<V, F, M>(self, name: impl Into<String>, field: F, make: M) -> Self
    where
        F: Fn(&mut T) -> Option<&mut V> + 'static,
        M: Fn(&str) -> V + 'static,
    {
        self.entry(name, move |target, value| {
            let dest = field(target).ok_or(SetError::Unselected)?;
            coerce::transform(dest, value, &make);
            Ok(())
        })
    }

    /// Like [`transform`](Self::transform) with a fallible `make`. Its error
    /// is reported as [`ConversionError::Custom`].
    pub fn try_transform<V, F, M, E>(self, name: impl Into<String>, field: F, make: M) -> Self
    where
        F: Fn(&mut T) -> &mut V + 'static,
        M: Fn(&str) -> Result<V, E> + 'static,
        E: fmt::Display,
    {
        self.entry(name, move |target, value| {
            coerce::try_transform(field(target), value, &make)?;
            Ok(())
        })
    }

    pub fn try_transform_via<V, F, M, E>(self, name: impl Into<String>, field: F, make: M) -> Self
    where
        F: Fn(&mut T) -> Option<&mut V> + 'static,
        M: Fn(&str) -> Result<V, E> + 'static,
        E: fmt::Display,
    {
        self.entry(name, move |target, value| {
            let dest = field(target).ok_or(SetError::Unselected)?;
            coerce::try_transform(dest, value, &make)?;
            Ok(())
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Registered names in matching order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Assigns one option to `target`. Returns `Ok(false)` for an unknown name.
    pub fn apply(&self, target: &mut T, name: &str, value: &str) -> Result<bool, OptionError> {
        let Some((_, setter)) = self.entries.iter().find(|(n, _)| n == name) else {
            debug!(name, "ignoring unknown option");
            return Ok(false);
        };
        setter(target, value).map_err(|e| {
            let err = match e {
                SetError::Conversion(source) => OptionError::Conversion {
                    name: name.to_string(),
                    source,
                },
                SetError::Unselected => OptionError::NoDestination {
                    name: name.to_string(),
                },
            };
            debug!(error = %err, "option rejected");
            err
        })?;
        Ok(true)
    }

    /// Handler that applies options to `target`, for use with a
    /// [`Dispatcher`](crate::Dispatcher).
    pub fn handler<'a>(
        &'a self,
        target: &'a mut T,
    ) -> impl FnMut(&str, &str) -> Result<(), OptionError> + 'a {
        move |name: &str, value: &str| self.apply(target, name, value).map(|_| ())
    }

    /// Dispatches every token to `target`, stopping at the first rejected value.
    pub fn load<I>(&self, target: &mut T, tokens: I) -> Result<DispatchReport, OptionError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        dispatch(tokens, self.handler(target))
    }
}
