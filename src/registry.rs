//! The conversion registry: string-to-value converters keyed by destination type.
//!
//! The engine hands every scalar to a [`ValueSetter`] together with the destination as
//! `&mut dyn Any`. [`Registry`] is the provided implementation: it looks the destination
//! up by [`TypeId`] and runs the converter registered for exactly that type.

use std::any::{Any, TypeId};
use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;
use serde::de::{DeserializeOwned, IntoDeserializer};

use crate::parse_scalars::{
    parse_char, parse_f32, parse_f64, parse_int_signed, parse_int_unsigned, parse_yaml11_bool,
};

/// Error returned by a converter. It is reported to the caller unchanged.
pub type ConvertError = Box<dyn std::error::Error + Send + Sync>;

type Converter = Box<dyn Fn(&mut dyn Any, &str) -> Result<(), ConvertError> + Send + Sync>;

/// Anything that can set a destination from a scalar's text.
pub trait ValueSetter {
    /// Convert `text` into `dest`.
    ///
    /// Returns `Ok(false)` when no converter applies to the destination's type; the
    /// engine then tries other ways of binding the node. `Ok(true)` means the value was
    /// written.
    fn set_value(&self, dest: &mut dyn Any, text: &str) -> Result<bool, ConvertError>;
}

/// Converters keyed by destination type.
///
/// A registry is built before decoding and only read afterwards; it is `Send + Sync`
/// and can be shared by concurrent decodes.
///
/// ```rust
/// use yaml_registry::{Registry, from_str};
///
/// #[derive(Debug, Default, PartialEq)]
/// enum Mode {
///     #[default]
///     Off,
///     Fast,
/// }
/// yaml_registry::leaf!(Mode);
///
/// let mut registry = Registry::new();
/// registry.register(|out: &mut Mode, text: &str| {
///     *out = match text {
///         "fast" => Mode::Fast,
///         "off" => Mode::Off,
///         other => return Err(format!("unknown mode {other}").into()),
///     };
///     Ok(())
/// });
///
/// assert_eq!(from_str::<Mode>("fast", &registry).unwrap(), Mode::Fast);
/// assert!(from_str::<Mode>("slow", &registry).is_err());
/// ```
#[derive(Default)]
pub struct Registry {
    converters: AHashMap<TypeId, Converter>,
}

impl Registry {
    /// An empty registry: every scalar is left unconverted.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with converters for `String`, `bool`, `char`, every integer width
    /// and both float widths.
    ///
    /// Integers accept `0x`, `0o` and `0b` prefixes and `_` separators, booleans also
    /// accept the YAML 1.1 forms (`yes`, `off`, ...), floats accept `Inf`, `-Inf` and
    /// `NaN`.
    pub fn primitives() -> Self {
        let mut registry = Self::new();
        registry.register(|out: &mut String, text: &str| {
            out.clear();
            out.push_str(text);
            Ok(())
        });
        registry.register(|out: &mut bool, text: &str| {
            *out = parse_yaml11_bool(text)?;
            Ok(())
        });
        registry.register(|out: &mut char, text: &str| {
            *out = parse_char(text)?;
            Ok(())
        });
        registry.register(|out: &mut f32, text: &str| {
            *out = parse_f32(text)?;
            Ok(())
        });
        registry.register(|out: &mut f64, text: &str| {
            *out = parse_f64(text)?;
            Ok(())
        });

        macro_rules! signed {
            ($($ty:ty),*) => {$(
                registry.register(|out: &mut $ty, text: &str| {
                    *out = parse_int_signed::<$ty>(text, stringify!($ty))?;
                    Ok(())
                });
            )*};
        }
        macro_rules! unsigned {
            ($($ty:ty),*) => {$(
                registry.register(|out: &mut $ty, text: &str| {
                    *out = parse_int_unsigned::<$ty>(text, stringify!($ty))?;
                    Ok(())
                });
            )*};
        }
        signed!(i8, i16, i32, i64, i128, isize);
        unsigned!(u8, u16, u32, u64, u128, usize);

        registry
    }

    /// Register `convert` for destinations of type `T`, replacing any previous
    /// converter for that type.
    pub fn register<T, F>(&mut self, convert: F) -> &mut Self
    where
        T: Any,
        F: Fn(&mut T, &str) -> Result<(), ConvertError> + Send + Sync + 'static,
    {
        let wrapped = move |dest: &mut dyn Any, text: &str| match dest.downcast_mut::<T>() {
            Some(out) => convert(out, text),
            None => Err(format!(
                "converter for {} received a different type",
                std::any::type_name::<T>()
            )
            .into()),
        };
        self.converters.insert(TypeId::of::<T>(), Box::new(wrapped));
        self
    }

    /// Register a converter that parses `T` with its [`FromStr`] implementation.
    pub fn register_from_str<T>(&mut self) -> &mut Self
    where
        T: FromStr + Any,
        T::Err: Into<ConvertError>,
    {
        self.register(|out: &mut T, text: &str| {
            *out = text.parse::<T>().map_err(Into::<ConvertError>::into)?;
            Ok(())
        })
    }

    /// Register a converter that deserializes `T` from the scalar text with `serde`.
    ///
    /// This suits unit-variant enums and other types that deserialize from a plain
    /// string.
    pub fn register_serde<T>(&mut self) -> &mut Self
    where
        T: DeserializeOwned + Any,
    {
        self.register(|out: &mut T, text: &str| {
            let de: serde::de::value::StrDeserializer<'_, serde::de::value::Error> =
                text.into_deserializer();
            *out = T::deserialize(de)?;
            Ok(())
        })
    }

    /// Whether a converter is registered for `T`.
    pub fn contains<T: Any>(&self) -> bool {
        self.converters.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl ValueSetter for Registry {
    fn set_value(&self, dest: &mut dyn Any, text: &str) -> Result<bool, ConvertError> {
        match self.converters.get(&(*dest).type_id()) {
            Some(convert) => convert(dest, text).map(|()| true),
            None => Ok(false),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("converters", &self.converters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_is_not_consumed() {
        let registry = Registry::new();
        let mut out = 0i32;
        assert!(!registry.set_value(&mut out, "5").unwrap());
        assert_eq!(out, 0);
    }

    #[test]
    fn lookup_uses_the_exact_type() {
        let registry = Registry::primitives();
        let mut small = 0u8;
        assert!(registry.set_value(&mut small, "200").unwrap());
        assert_eq!(small, 200);
        assert!(registry.set_value(&mut small, "300").is_err());

        let mut text = String::from("old");
        assert!(registry.set_value(&mut text, "new").unwrap());
        assert_eq!(text, "new");
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let mut registry = Registry::primitives();
        registry.register(|out: &mut i32, _text: &str| {
            *out = 42;
            Ok(())
        });
        let mut out = 0i32;
        registry.set_value(&mut out, "7").unwrap();
        assert_eq!(out, 42);
    }

    #[test]
    fn from_str_converter() {
        let mut registry = Registry::new();
        registry.register_from_str::<std::net::Ipv4Addr>();
        assert!(registry.contains::<std::net::Ipv4Addr>());

        let mut addr = std::net::Ipv4Addr::UNSPECIFIED;
        registry.set_value(&mut addr, "10.0.0.1").unwrap();
        assert_eq!(addr, std::net::Ipv4Addr::new(10, 0, 0, 1));
        assert!(registry.set_value(&mut addr, "10.0.0").is_err());
    }
}
