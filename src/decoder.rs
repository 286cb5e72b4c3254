//! Top-level decoding: input, preconditions and the per-document walk.

use std::io::Read;

use encoding_rs_io::DecodeReaderBytesBuilder;
use log::debug;

use crate::destination::Destination;
use crate::engine::{Binder, check_destination};
use crate::error::Error;
use crate::node::Stream;
use crate::options::Options;
use crate::registry::ValueSetter;
use crate::tree::parse_stream;

/// Decodes YAML read from `R` into destinations, converting scalars through a
/// [`ValueSetter`] (usually a [`crate::Registry`]).
///
/// ```rust
/// use yaml_registry::{Decoder, Registry, record};
///
/// #[derive(Debug, Default)]
/// struct Server {
///     host: String,
///     port: u16,
/// }
/// record!(Server { host, port });
///
/// let registry = Registry::primitives();
/// let mut server = Server::default();
/// Decoder::new("host: localhost\nport: 8080\n".as_bytes(), &registry)
///     .decode(&mut server)
///     .unwrap();
/// assert_eq!(server.port, 8080);
/// ```
pub struct Decoder<'s, R> {
    reader: R,
    setter: &'s dyn ValueSetter,
    options: Options,
}

impl<'s, R: Read> Decoder<'s, R> {
    pub fn new(reader: R, setter: &'s dyn ValueSetter) -> Self {
        Self::with_options(reader, setter, Options::default())
    }

    pub fn with_options(reader: R, setter: &'s dyn ValueSetter, options: Options) -> Self {
        Self {
            reader,
            setter,
            options,
        }
    }

    /// Read the whole input and bind every document, in order, into `out`.
    ///
    /// Later documents write over what earlier ones set. On error `out` may be partially
    /// written.
    pub fn decode<T: Destination>(&mut self, out: &mut T) -> Result<(), Error> {
        self.decode_dyn(Some(out))
    }

    /// Like [`Decoder::decode`], for a destination only known as a trait object.
    ///
    /// The destination is checked before any input is read: `None` fails with
    /// `invalid parameter 'out' must not be nil`, a shared `Rc`/`Arc` with
    /// `invalid parameter 'out' must be settable`.
    pub fn decode_dyn(&mut self, out: Option<&mut dyn Destination>) -> Result<(), Error> {
        let out = check_destination(out)?;

        // Sniff a byte order mark and decode to UTF-8.
        let mut input = String::new();
        DecodeReaderBytesBuilder::new()
            .encoding(None)
            .build(&mut self.reader)
            .read_to_string(&mut input)?;

        decode_text(&input, self.setter, &self.options, out)
    }
}

/// Decode a value of type `T` from a YAML string.
///
/// ```rust
/// use yaml_registry::{Registry, from_str};
///
/// let numbers: Vec<i64> = from_str("- 1\n- 0x10\n- -3\n", &Registry::primitives()).unwrap();
/// assert_eq!(numbers, vec![1, 16, -3]);
/// ```
pub fn from_str<T>(input: &str, setter: &dyn ValueSetter) -> Result<T, Error>
where
    T: Destination + Default,
{
    from_str_with_options(input, setter, Options::default())
}

/// Decode a value of type `T` from a YAML string with the given [`Options`].
pub fn from_str_with_options<T>(
    input: &str,
    setter: &dyn ValueSetter,
    options: Options,
) -> Result<T, Error>
where
    T: Destination + Default,
{
    let mut out = T::default();
    decode_text(input, setter, &options, &mut out)?;
    Ok(out)
}

/// Decode a value of type `T` from a reader. The input is read entirely first; a
/// UTF-8 or UTF-16 byte order mark is honored.
pub fn from_reader<R, T>(reader: R, setter: &dyn ValueSetter) -> Result<T, Error>
where
    R: Read,
    T: Destination + Default,
{
    let mut out = T::default();
    Decoder::new(reader, setter).decode(&mut out)?;
    Ok(out)
}

/// Bind an already built [`Stream`] into `out`.
///
/// This is the entry point for trees that come from somewhere other than
/// [`crate::parse_stream`].
pub fn bind_stream(
    stream: &Stream,
    setter: &dyn ValueSetter,
    out: &mut dyn Destination,
) -> Result<(), Error> {
    let out = check_destination(Some(out))?;
    bind_documents(stream, setter, out)
}

fn bind_documents(
    stream: &Stream,
    setter: &dyn ValueSetter,
    out: &mut dyn Destination,
) -> Result<(), Error> {
    let binder = Binder::new(setter);
    for (index, document) in stream.documents.iter().enumerate() {
        debug!(
            "binding document {index} at {}:{} into {}",
            document.location.line,
            document.location.column,
            out.type_name()
        );
        binder.bind_document(document, out)?;
    }
    Ok(())
}

fn decode_text(
    input: &str,
    setter: &dyn ValueSetter,
    options: &Options,
    out: &mut dyn Destination,
) -> Result<(), Error> {
    parse_stream(input, options)
        .and_then(|stream| bind_documents(&stream, setter, out))
        .map_err(|err| maybe_with_snippet(err, input, options))
}

#[cfg(feature = "snippets")]
fn maybe_with_snippet(err: Error, input: &str, options: &Options) -> Error {
    if options.with_snippet && options.crop_radius > 0 {
        err.with_snippet(input, options.crop_radius)
    } else {
        err
    }
}

#[cfg(not(feature = "snippets"))]
fn maybe_with_snippet(err: Error, _input: &str, _options: &Options) -> Error {
    err
}
