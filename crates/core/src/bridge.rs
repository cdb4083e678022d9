//! Attribute bridge between [`HostValue`] and native typed values.
//!
//! Scalars reject null and unknown inputs; presence is carried by [`Attr`],
//! which implements [`HostType`] itself so lists of nullable records keep
//! per-element presence.

use std::collections::BTreeMap;

use crate::{Attr, AttributePath, Diagnostic, HostValue};

/// A native type with a host-runtime representation.
pub trait HostType: Sized {
    /// Converts a host value into the native type.
    fn from_host(value: &HostValue, path: &AttributePath) -> Result<Self, Diagnostic>;

    /// Converts the native value into its host representation.
    fn to_host(&self) -> HostValue;
}

fn type_mismatch(path: &AttributePath, expected: &str, found: &HostValue) -> Diagnostic {
    Diagnostic::attribute_error(
        path.clone(),
        "Invalid attribute value",
        format!("expected {expected}, found {}", found.type_name()),
    )
}

impl HostType for String {
    fn from_host(value: &HostValue, path: &AttributePath) -> Result<Self, Diagnostic> {
        match value {
            HostValue::String(text) => Ok(text.clone()),
            other => Err(type_mismatch(path, "string", other)),
        }
    }

    fn to_host(&self) -> HostValue {
        HostValue::String(self.clone())
    }
}

impl HostType for bool {
    fn from_host(value: &HostValue, path: &AttributePath) -> Result<Self, Diagnostic> {
        match value {
            HostValue::Bool(flag) => Ok(*flag),
            other => Err(type_mismatch(path, "bool", other)),
        }
    }

    fn to_host(&self) -> HostValue {
        HostValue::Bool(*self)
    }
}

impl HostType for i64 {
    fn from_host(value: &HostValue, path: &AttributePath) -> Result<Self, Diagnostic> {
        match value {
            HostValue::Int(number) => Ok(*number),
            HostValue::Float(number) if number.fract() == 0.0 && number.is_finite() => {
                Ok(*number as i64)
            }
            other => Err(type_mismatch(path, "whole number", other)),
        }
    }

    fn to_host(&self) -> HostValue {
        HostValue::Int(*self)
    }
}

impl HostType for i32 {
    fn from_host(value: &HostValue, path: &AttributePath) -> Result<Self, Diagnostic> {
        let wide = i64::from_host(value, path)?;
        i32::try_from(wide).map_err(|_| {
            Diagnostic::attribute_error(
                path.clone(),
                "Invalid attribute value",
                format!("{wide} does not fit in a 32-bit integer"),
            )
        })
    }

    fn to_host(&self) -> HostValue {
        HostValue::Int(i64::from(*self))
    }
}

impl HostType for f64 {
    fn from_host(value: &HostValue, path: &AttributePath) -> Result<Self, Diagnostic> {
        match value {
            HostValue::Float(number) => Ok(*number),
            HostValue::Int(number) => Ok(*number as f64),
            other => Err(type_mismatch(path, "number", other)),
        }
    }

    fn to_host(&self) -> HostValue {
        HostValue::Float(*self)
    }
}

impl HostType for f32 {
    fn from_host(value: &HostValue, path: &AttributePath) -> Result<Self, Diagnostic> {
        f64::from_host(value, path).map(|number| number as f32)
    }

    fn to_host(&self) -> HostValue {
        HostValue::Float(f64::from(*self))
    }
}

impl<T: HostType> HostType for Vec<T> {
    fn from_host(value: &HostValue, path: &AttributePath) -> Result<Self, Diagnostic> {
        match value {
            HostValue::List(items) | HostValue::Set(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| T::from_host(item, &path.index(index)))
                .collect(),
            other => Err(type_mismatch(path, "list", other)),
        }
    }

    fn to_host(&self) -> HostValue {
        HostValue::List(self.iter().map(HostType::to_host).collect())
    }
}

/// Membership-only collection; element order carries no meaning.
#[derive(Debug, Clone, Default)]
pub struct SetOf<T>(pub Vec<T>);

impl<T: PartialEq> PartialEq for SetOf<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self.0.iter().all(|item| other.0.contains(item))
            && other.0.iter().all(|item| self.0.contains(item))
    }
}

impl<T> SetOf<T> {
    /// Returns the members.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.0
    }

    /// Consumes the set and returns the members.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T> From<Vec<T>> for SetOf<T> {
    fn from(value: Vec<T>) -> Self {
        Self(value)
    }
}

impl<T: HostType> HostType for SetOf<T> {
    fn from_host(value: &HostValue, path: &AttributePath) -> Result<Self, Diagnostic> {
        match value {
            HostValue::List(_) | HostValue::Set(_) => Vec::<T>::from_host(value, path).map(Self),
            other => Err(type_mismatch(path, "set", other)),
        }
    }

    fn to_host(&self) -> HostValue {
        HostValue::Set(self.0.iter().map(HostType::to_host).collect())
    }
}

impl<T: HostType> HostType for Attr<T> {
    fn from_host(value: &HostValue, path: &AttributePath) -> Result<Self, Diagnostic> {
        match value {
            HostValue::Unknown => Ok(Self::Unknown),
            HostValue::Null => Ok(Self::Null),
            known => T::from_host(known, path).map(Self::Known),
        }
    }

    fn to_host(&self) -> HostValue {
        match self {
            Self::Unknown => HostValue::Unknown,
            Self::Null => HostValue::Null,
            Self::Known(value) => value.to_host(),
        }
    }
}

/// Reads typed attributes out of a host object value.
pub struct ObjectReader<'a> {
    fields: &'a BTreeMap<String, HostValue>,
    path: AttributePath,
}

impl<'a> ObjectReader<'a> {
    /// Opens an object value located at `path`.
    pub fn new(value: &'a HostValue, path: &AttributePath) -> Result<Self, Diagnostic> {
        match value {
            HostValue::Object(fields) => Ok(Self {
                fields,
                path: path.clone(),
            }),
            other => Err(type_mismatch(path, "object", other)),
        }
    }

    /// Reads one attribute; a missing field reads as null.
    pub fn attr<T: HostType>(&self, name: &str) -> Result<Attr<T>, Diagnostic> {
        match self.fields.get(name) {
            Some(value) => Attr::<T>::from_host(value, &self.path.child(name)),
            None => Ok(Attr::Null),
        }
    }

    /// Returns the path of the object being read.
    #[must_use]
    pub fn path(&self) -> &AttributePath {
        &self.path
    }
}

/// Builds a host object value from typed attributes.
#[derive(Debug, Default)]
pub struct ObjectWriter {
    fields: BTreeMap<String, HostValue>,
}

impl ObjectWriter {
    /// Starts an empty object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one attribute.
    #[must_use]
    pub fn attr<T: HostType>(mut self, name: &str, value: &Attr<T>) -> Self {
        self.fields.insert(name.to_owned(), value.to_host());
        self
    }

    /// Finishes the object.
    #[must_use]
    pub fn finish(self) -> HostValue {
        HostValue::Object(self.fields)
    }
}

/// Declares a host-facing record whose fields are all [`Attr`] values.
///
/// Each field maps to the host attribute of the same name unless renamed
/// with `as "name"`. The generated type implements [`HostType`].
#[macro_export]
macro_rules! host_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident $(as $host:literal)? : $kind:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $crate::Attr<$kind>,
            )*
        }

        impl $crate::HostType for $name {
            fn from_host(
                value: &$crate::HostValue,
                path: &$crate::AttributePath,
            ) -> Result<Self, $crate::Diagnostic> {
                let object = $crate::ObjectReader::new(value, path)?;
                Ok(Self {
                    $($field: object.attr($crate::__host_name!($field $($host)?))?,)*
                })
            }

            fn to_host(&self) -> $crate::HostValue {
                $crate::ObjectWriter::new()
                    $(.attr($crate::__host_name!($field $($host)?), &self.$field))*
                    .finish()
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __host_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident $host:literal) => {
        $host
    };
}
