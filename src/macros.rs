//! Public macros: option construction and destination descriptors.

/// Construct [`crate::Options`] from `Default` and a list of field assignments.
///
/// ```rust
/// let options = yaml_registry::options! {
///     with_snippet: true,
///     crop_radius: 40,
/// };
/// assert!(options.with_snippet);
/// ```
#[macro_export]
macro_rules! options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::Options::default();
        $(
            opt.$field = $value;
        )*
        opt
    }};
}

/// Describe an existing struct as a record destination.
///
/// Lists the fields that participate in decoding, in declaration order. A field may
/// carry an external name with `as "name"`; it is then matched by that name *or* by
/// its identifier, first listed field wins. Fields not listed are never touched.
/// Every listed field's type must implement [`crate::Destination`].
///
/// ```rust
/// use yaml_registry::{Registry, from_str, record};
///
/// #[derive(Debug, Default)]
/// struct Pet {
///     name: String,
///     age: i64,
///     secret: u8,
/// }
/// record!(Pet { name as "pet_name", age });
///
/// let pet: Pet = from_str("pet_name: Rex\nage: 3\n", &Registry::primitives()).unwrap();
/// assert_eq!((pet.name.as_str(), pet.age, pet.secret), ("Rex", 3, 0));
/// ```
#[macro_export]
macro_rules! record {
    ( $ty:ty { $( $field:ident $( as $name:literal )? ),* $(,)? } ) => {
        impl $crate::Record for $ty {
            fn fields(&self) -> &'static [$crate::Field] {
                const FIELDS: &[$crate::Field] = &[
                    $( $crate::Field::new(stringify!($field), $crate::__field_name!($($name)?)), )*
                ];
                FIELDS
            }

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn field_mut(&mut self, index: usize) -> Option<&mut dyn $crate::Destination> {
                let mut at = 0usize;
                $(
                    if at == index {
                        return Some(&mut self.$field as &mut dyn $crate::Destination);
                    }
                    at += 1;
                )*
                None
            }
        }

        impl $crate::Destination for $ty {
            fn target(&mut self) -> $crate::Target<'_> {
                $crate::Target::Record(self)
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_name {
    () => {
        None
    };
    ($name:literal) => {
        Some($name)
    };
}

/// Mark types as leaf destinations, bound only through a registered converter.
///
/// ```rust
/// use yaml_registry::{Registry, from_str, leaf};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Version(u32, u32, u32);
/// leaf!(Version);
///
/// let mut registry = Registry::primitives();
/// registry.register(|out: &mut Version, text: &str| {
///     let mut parts = text.split('.').map(str::parse::<u32>);
///     let mut next = || parts.next().unwrap_or(Ok(0));
///     *out = Version(next()?, next()?, next()?);
///     Ok(())
/// });
///
/// let version: Version = from_str("1.2.3", &registry).unwrap();
/// assert_eq!(version, Version(1, 2, 3));
/// ```
#[macro_export]
macro_rules! leaf {
    ( $( $ty:ty ),* $(,)? ) => {
        $(
            impl $crate::Destination for $ty {
                fn target(&mut self) -> $crate::Target<'_> {
                    $crate::Target::Leaf
                }

                fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                    self
                }
            }
        )*
    };
}
