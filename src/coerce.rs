//! Conversion of raw tokens into field values.
//!
//! A type takes part in parsing by implementing [`Value`]. Built-in
//! implementations cover the primitives, `String`, `PathBuf`, `OsString`
//! and `Option<V>`; fieldless enums get one from `#[derive(Value)]`, and any
//! other `FromStr` type can opt in with [`from_str_value!`](crate::from_str_value).

use std::{ffi::OsString, path::PathBuf};

/// Coarse classification of a value type, consulted when a schema is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `bool`: usable as a presence switch.
    Flag,
    /// Integers: usable as a counter switch.
    Count,
    /// `String`: usable as a remainder.
    Text,
    /// A fieldless enum parsed by member name.
    Enum,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoerceError {
    #[error("`{value}` is not a valid {ty}")]
    InvalidValue { value: String, ty: &'static str },
    #[error("invalid {ty} `{value}`: {message}")]
    Parse { value: String, ty: &'static str, message: String },
    #[error("no value supplied for {ty}")]
    Absent { ty: &'static str },
    #[error("{ty} has no property `{property}`")]
    UnknownProperty { property: String, ty: &'static str },
}

/// A type which can be built from a single command line token.
pub trait Value: Sized {
    const KIND: ValueKind = ValueKind::Other;

    /// Builds a value from one token.
    fn parse_token(token: &str) -> Result<Self, CoerceError>;

    /// The value to use when no token is available, if the type has one.
    fn absent() -> Option<Self> {
        None
    }

    /// Member names, for enumerations. Used by shell completion.
    fn variants() -> &'static [&'static str] {
        &[]
    }

    /// Records one occurrence of a switch bound to this value.
    ///
    /// Returns `false` for types that can't back a switch.
    fn switch_on(&mut self) -> bool {
        false
    }
}

/// Converts `token` (or its absence) into a `V`.
pub fn coerce<V: Value>(token: Option<&str>) -> Result<V, CoerceError> {
    match token {
        Some(token) => V::parse_token(token),
        None => V::absent().ok_or(CoerceError::Absent { ty: std::any::type_name::<V>() }),
    }
}

/// Finds `token` among `variants`, ignoring ASCII case.
pub fn variant_index(
    token: &str,
    variants: &[&str],
    ty: &'static str,
) -> Result<usize, CoerceError> {
    variants
        .iter()
        .position(|it| it.eq_ignore_ascii_case(token))
        .ok_or_else(|| CoerceError::InvalidValue { value: token.to_string(), ty })
}

/// Whether `candidate` starts with `prefix`, ignoring case.
pub(crate) fn starts_with_ignore_case(candidate: &str, prefix: &str) -> bool {
    let mut candidate = candidate.chars().flat_map(char::to_lowercase);
    prefix.chars().flat_map(char::to_lowercase).all(|p| candidate.next() == Some(p))
}

/// Implements [`Value`] for types through their `FromStr` implementation.
///
/// ```
/// #[derive(Debug, Default)]
/// struct Port(u16);
///
/// impl std::str::FromStr for Port {
///     type Err = std::num::ParseIntError;
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         s.parse().map(Port)
///     }
/// }
///
/// declflags::from_str_value!(Port);
///
/// let port: Port = declflags::coerce::coerce(Some("8080")).unwrap();
/// assert_eq!(port.0, 8080);
/// ```
#[macro_export]
macro_rules! from_str_value {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::Value for $ty {
            fn parse_token(token: &str) -> ::std::result::Result<Self, $crate::CoerceError> {
                token.parse::<$ty>().map_err(|err| $crate::CoerceError::Parse {
                    value: token.to_string(),
                    ty: stringify!($ty),
                    message: err.to_string(),
                })
            }
        }
    )*};
}

macro_rules! count_value {
    ($($ty:ty),*) => {$(
        impl Value for $ty {
            const KIND: ValueKind = ValueKind::Count;

            fn parse_token(token: &str) -> Result<Self, CoerceError> {
                token.parse::<$ty>().map_err(|err| CoerceError::Parse {
                    value: token.to_string(),
                    ty: stringify!($ty),
                    message: err.to_string(),
                })
            }

            fn absent() -> Option<Self> {
                Some(0)
            }

            fn switch_on(&mut self) -> bool {
                *self = self.saturating_add(1);
                true
            }
        }
    )*};
}

count_value!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

from_str_value!(f32, f64, char);

impl Value for bool {
    const KIND: ValueKind = ValueKind::Flag;

    fn parse_token(token: &str) -> Result<Self, CoerceError> {
        if token.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if token.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(CoerceError::InvalidValue { value: token.to_string(), ty: "bool" })
        }
    }

    fn absent() -> Option<Self> {
        Some(false)
    }

    fn switch_on(&mut self) -> bool {
        *self = true;
        true
    }
}

impl Value for String {
    const KIND: ValueKind = ValueKind::Text;

    fn parse_token(token: &str) -> Result<Self, CoerceError> {
        Ok(token.to_string())
    }
}

impl Value for PathBuf {
    fn parse_token(token: &str) -> Result<Self, CoerceError> {
        Ok(PathBuf::from(token))
    }
}

impl Value for OsString {
    fn parse_token(token: &str) -> Result<Self, CoerceError> {
        Ok(OsString::from(token))
    }
}

impl<V: Value> Value for Option<V> {
    // An optional value can't back a switch: there is no sensible "one more".
    const KIND: ValueKind = match V::KIND {
        ValueKind::Flag | ValueKind::Count => ValueKind::Other,
        kind => kind,
    };

    fn parse_token(token: &str) -> Result<Self, CoerceError> {
        V::parse_token(token).map(Some)
    }

    fn absent() -> Option<Self> {
        Some(None)
    }

    fn variants() -> &'static [&'static str] {
        V::variants()
    }
}
