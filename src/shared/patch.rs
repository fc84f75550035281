//! Explicit optional-field wrapper for partial updates.

/// A single field of a partial update.
///
/// `Unset` leaves the target untouched. Wrap nullable fields as
/// `Patch<Option<T>>` so that `Set(None)` clears the value while `Unset`
/// keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the current value unchanged.
    #[default]
    Unset,
    /// Overwrite the current value.
    Set(T),
}

impl<T> Patch<T> {
    /// Returns `true` when the patch overwrites the field.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// Returns the new value, if any.
    #[must_use]
    pub const fn as_set(&self) -> Option<&T> {
        match self {
            Self::Unset => None,
            Self::Set(value) => Some(value),
        }
    }

    /// Converts the inner value with a fallible function, keeping `Unset`
    /// as-is.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `f`.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Patch<U>, E> {
        match self {
            Self::Unset => Ok(Patch::Unset),
            Self::Set(value) => f(value).map(Patch::Set),
        }
    }

    /// Writes the value into `target` when set. Returns whether it wrote.
    pub fn apply_to(self, target: &mut T) -> bool {
        match self {
            Self::Unset => false,
            Self::Set(value) => {
                *target = value;
                true
            }
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unset, Self::Set)
    }
}
