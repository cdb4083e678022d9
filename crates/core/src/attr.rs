/// A typed attribute value carrying the host runtime's three presence states.
///
/// `Null` and `Unknown` are kept apart on purpose: an unknown plan value must
/// be omitted from requests, while a null value is an explicit absence.
#[derive(Debug, Clone, PartialEq)]
pub enum Attr<T> {
    /// Explicitly absent.
    Null,
    /// Not yet known; resolved after apply.
    Unknown,
    /// Present with a concrete value.
    Known(T),
}

impl<T> Default for Attr<T> {
    fn default() -> Self {
        Self::Null
    }
}

impl<T> From<Option<T>> for Attr<T> {
    fn from(value: Option<T>) -> Self {
        Self::from_option(value)
    }
}

impl<T> Attr<T> {
    /// Wraps a concrete value.
    #[must_use]
    pub fn known(value: T) -> Self {
        Self::Known(value)
    }

    /// Maps `None` to an explicit null.
    #[must_use]
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Known(value),
            None => Self::Null,
        }
    }

    /// Returns true when a concrete value is present.
    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Returns true for an explicit null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true while the value is not yet known.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Borrows the concrete value, if any.
    #[must_use]
    pub fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Null | Self::Unknown => None,
        }
    }

    /// Consumes the attribute and returns the concrete value, if any.
    #[must_use]
    pub fn into_known(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Null | Self::Unknown => None,
        }
    }

    /// Maps the concrete value, keeping null and unknown untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Attr<U> {
        match self {
            Self::Known(value) => Attr::Known(f(value)),
            Self::Null => Attr::Null,
            Self::Unknown => Attr::Unknown,
        }
    }

    /// Replaces an unknown value with an explicit null.
    #[must_use]
    pub fn resolve_unknown(self) -> Self {
        match self {
            Self::Unknown => Self::Null,
            other => other,
        }
    }

    /// Reconciles a user-authored attribute with the server's latest value.
    ///
    /// A reported value always wins. When the server omits the field the
    /// configured value is kept and an unresolved unknown becomes null.
    pub fn refresh(&mut self, server: Option<T>) {
        match server {
            Some(value) => *self = Self::Known(value),
            None => {
                if self.is_unknown() {
                    *self = Self::Null;
                }
            }
        }
    }
}

impl<T: Clone> Attr<T> {
    /// Clones the concrete value, if any.
    #[must_use]
    pub fn known_cloned(&self) -> Option<T> {
        self.as_known().cloned()
    }
}

impl Attr<String> {
    /// Borrows the concrete string, if any.
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.as_known().map(String::as_str)
    }

    /// Returns the concrete string when it is present and not blank.
    #[must_use]
    pub fn non_blank(&self) -> Option<&str> {
        self.as_deref().filter(|value| !value.trim().is_empty())
    }
}

impl Attr<bool> {
    /// Returns the flag, treating null and unknown as false.
    #[must_use]
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Known(true))
    }
}

#[cfg(test)]
mod tests {
    use super::Attr;

    #[test]
    fn refresh_prefers_server_value() {
        let mut value = Attr::known("local".to_owned());
        value.refresh(Some("remote".to_owned()));
        assert_eq!(value, Attr::known("remote".to_owned()));
    }

    #[test]
    fn refresh_keeps_configured_value_when_server_omits_field() {
        let mut value = Attr::known("local".to_owned());
        value.refresh(None);
        assert_eq!(value, Attr::known("local".to_owned()));

        let mut pending: Attr<String> = Attr::Unknown;
        pending.refresh(None);
        assert!(pending.is_null());
    }

    #[test]
    fn empty_string_is_not_null() {
        let value = Attr::from_option(Some(String::new()));
        assert!(value.is_known());
        assert_eq!(value.as_deref(), Some(""));
        assert_eq!(value.non_blank(), None);
    }
}
