//! # tagfmt
//!
//! An allocation-free, type-aware string formatting engine with resumable,
//! chunked output.
//!
//! ## What is it?
//!
//! `tagfmt` formats a template such as `"{} is {:08x}"` against a short list of
//! type-tagged arguments. Instead of building the whole string at once, a
//! [`FormatState`] hands out the output in chunks into buffers you supply, so
//! the same machinery backs a bounded `snprintf`-style call, a streaming write
//! to any [`std::io::Write`], and a measure-then-allocate pass.
//!
//! ## Key Features
//!
//! - **Allocation-Free Core**: a fixed 64-byte scratch buffer per state; strings are never copied
//! - **Resumable**: output can be pulled in chunks of any size, down to a single byte
//! - **Positional Arguments**: `{1}{0}{1}` reuses arguments freely
//! - **Padding**: width, zero-fill, left/right alignment and pointer-aware zero padding
//! - **Pluggable Types**: caller-defined types render through an injected [`CustomFormatter`]
//! - **Best Effort**: malformed placeholders and bad indices render inline diagnostics instead of failing
//!
//! ## Quick Start
//!
//! ```rust
//! use tagfmt::{args, format_bounded, format_to_string};
//!
//! let text = format_to_string("hello {} {:05} 0x{:05x}", args!["hi", 123, 0xa66eu32]).unwrap();
//! assert_eq!(text, "hello hi 00123 0x0a66e");
//!
//! // snprintf semantics: truncate, terminate, report the full length
//! let mut buf = [0u8; 3];
//! assert_eq!(format_bounded(&mut buf, "abcd", args![]), 4);
//! assert_eq!(&buf, b"ab\0");
//! ```
//!
//! ### Placeholders
//!
//! ```text
//! {}          next argument
//! {1}         second argument
//! {:08}       width 8, zero padded
//! {:-8}       width 8, padded on the right
//! {:x} {:b}   hexadecimal, binary
//! {:c}        integer as a single byte
//! {:p}        any argument as a pointer
//! {|payload}  payload for the custom formatter
//! {{ }}       literal braces
//! ```
//!
//! See [`spec`] for the full grammar.
//!
//! ### Custom Types
//!
//! ```rust
//! use tagfmt::{args, Arg, Capture, CustomArg, CustomFormatter, CustomOutput, CustomTag, FormatSpec};
//! use std::fmt::Write;
//!
//! struct Point { x: i32, y: i32 }
//!
//! impl Capture for Point {
//!     fn capture(&self) -> Arg<'_> {
//!         Arg::Custom(CustomArg::new(CustomTag(1), self))
//!     }
//! }
//!
//! struct Geometry;
//!
//! impl CustomFormatter for Geometry {
//!     fn format_custom<'a>(&self, arg: CustomArg<'a>, _spec: &FormatSpec<'a>, out: &mut CustomOutput<'_, 'a>) -> bool {
//!         match arg.downcast_ref::<Point>() {
//!             Some(p) => write!(out, "{{{},{}}}", p.x, p.y).is_ok(),
//!             None => false,
//!         }
//!     }
//! }
//!
//! let p = Point { x: 1, y: 2 };
//! assert_eq!(tagfmt::format_to_string_with("point: {}", args![p], &Geometry).unwrap(), "point: {1,2}");
//! assert_eq!(tagfmt::format_to_string("point: {}", args![p]).unwrap(), "point: {unknown type}");
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Every call to [`FormatState::produce_chunk`] does bounded work
//! - Formatting never panics on malformed input; diagnostics are rendered inline
//!
//! ## Demos
//!
//! The `demos/` directory holds runnable programs:
//!
//! - **`simple.rs`** - Placeholders, padding and escapes
//! - **`custom_types.rs`** - A custom formatter for floats, points and timestamps
//! - **`chunked.rs`** - Driving the state machine by hand with a tiny buffer
//!
//! Run any demo with: `cargo run --example <name>`

pub mod arg;
pub mod error;
pub mod macros;
pub mod options;
pub mod render;
pub mod sink;
pub mod spec;
pub mod state;

pub use arg::{Arg, ArgList, Capture, CustomArg, CustomTag, MAX_ARGS};
pub use error::{Error, Result};
pub use options::{FormatOptions, MAX_WINDOW_SIZE};
pub use render::{CustomFormatter, CustomOutput, FormatOutput, NoCustomTypes, SCRATCH_CAPACITY};
pub use spec::{FormatSpec, PadMode, RenderMode};
pub use state::{Action, FormatState};

use std::io;

/// Formats into `buf` with `snprintf` semantics.
///
/// Writes at most `buf.len() - 1` bytes of output followed by a nul byte, and
/// returns the length the complete output has (excluding the terminator).
/// With an empty `buf` nothing is written and only the length is computed.
///
/// # Examples
///
/// ```rust
/// use tagfmt::{args, format_bounded};
///
/// let mut buf = [0u8; 5];
/// assert_eq!(format_bounded(&mut buf, "{}", args!["fghij"]), 5);
/// assert_eq!(&buf, b"fghi\0");
///
/// assert_eq!(format_bounded(&mut [], "{} {}", args![123, "hello"]), 9);
/// ```
pub fn format_bounded<F>(buf: &mut [u8], format: &F, args: ArgList<'_>) -> usize
where
    F: AsRef<[u8]> + ?Sized,
{
    format_bounded_with(buf, format, args, &NoCustomTypes)
}

/// Formats into `buf` with `snprintf` semantics, rendering custom arguments with `formatter`.
pub fn format_bounded_with<F>(
    buf: &mut [u8],
    format: &F,
    args: ArgList<'_>,
    formatter: &dyn CustomFormatter,
) -> usize
where
    F: AsRef<[u8]> + ?Sized,
{
    let mut state = FormatState::with_formatter(format, args, formatter);
    sink::fill_bounded(&mut state, buf)
}

/// Formats into a writer, returning the number of bytes written.
///
/// # Examples
///
/// ```rust
/// use tagfmt::{args, format_to_writer};
///
/// let mut out = Vec::new();
/// let n = format_to_writer(&mut out, "{:3}|{:-3}|", args![1, 2]).unwrap();
/// assert_eq!(n, 8);
/// assert_eq!(out, b"  1|2  |");
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if the writer rejects a chunk.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn format_to_writer<W, F>(writer: W, format: &F, args: ArgList<'_>) -> Result<usize>
where
    W: io::Write,
    F: AsRef<[u8]> + ?Sized,
{
    format_to_writer_with_options(writer, format, args, &FormatOptions::default(), &NoCustomTypes)
}

/// Formats into a writer with custom options and a custom formatter.
///
/// # Errors
///
/// Returns [`Error::Io`] if the writer rejects a chunk.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn format_to_writer_with_options<W, F>(
    mut writer: W,
    format: &F,
    args: ArgList<'_>,
    options: &FormatOptions,
    formatter: &dyn CustomFormatter,
) -> Result<usize>
where
    W: io::Write,
    F: AsRef<[u8]> + ?Sized,
{
    let mut state = FormatState::with_formatter(format, args, formatter);
    sink::drain_to_writer(&mut state, &mut writer, options.window_size)
}

/// Formats into a newly allocated, nul-terminated byte vector.
///
/// # Examples
///
/// ```rust
/// use tagfmt::{args, format_to_vec};
///
/// let bytes = format_to_vec("{}={}", args!["k", 1]).unwrap();
/// assert_eq!(bytes, b"k=1\0");
/// ```
///
/// # Errors
///
/// Returns [`Error::Alloc`] if the buffer cannot be allocated.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn format_to_vec<F>(format: &F, args: ArgList<'_>) -> Result<Vec<u8>>
where
    F: AsRef<[u8]> + ?Sized,
{
    format_to_vec_with_options(format, args, &FormatOptions::default(), &NoCustomTypes)
}

/// Formats into a newly allocated byte vector with custom options and a custom formatter.
///
/// # Errors
///
/// Returns [`Error::Alloc`] if the buffer cannot be allocated.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn format_to_vec_with_options<F>(
    format: &F,
    args: ArgList<'_>,
    options: &FormatOptions,
    formatter: &dyn CustomFormatter,
) -> Result<Vec<u8>>
where
    F: AsRef<[u8]> + ?Sized,
{
    let mut state = FormatState::with_formatter(format, args, formatter);
    sink::measure_then_allocate(&mut state, options)
}

/// Formats into a `String`.
///
/// # Examples
///
/// ```rust
/// use tagfmt::{args, format_to_string};
///
/// let text = format_to_string("{1} {0}", args!["world", "hello"]).unwrap();
/// assert_eq!(text, "hello world");
/// ```
///
/// # Errors
///
/// Returns [`Error::Alloc`] if the buffer cannot be allocated, or
/// [`Error::InvalidUtf8`] if the output is not UTF-8 (for example after
/// `{:c}` of a byte above 0x7f).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn format_to_string<F>(format: &F, args: ArgList<'_>) -> Result<String>
where
    F: AsRef<[u8]> + ?Sized,
{
    format_to_string_with(format, args, &NoCustomTypes)
}

/// Formats into a `String`, rendering custom arguments with `formatter`.
///
/// # Errors
///
/// Same as [`format_to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn format_to_string_with<F>(
    format: &F,
    args: ArgList<'_>,
    formatter: &dyn CustomFormatter,
) -> Result<String>
where
    F: AsRef<[u8]> + ?Sized,
{
    let options = FormatOptions::new().with_terminator(false);
    let bytes = format_to_vec_with_options(format, args, &options, formatter)?;
    String::from_utf8(bytes).map_err(|e| Error::invalid_utf8(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_showcase_lines() {
        let c = 'x';
        assert_eq!(
            format_to_string("hello {} {}", args![123, "hi"]).unwrap(),
            "hello 123 hi"
        );
        assert_eq!(
            format_to_string("hello {} {:c}", args![c, c]).unwrap(),
            "hello x x"
        );
        assert_eq!(
            format_to_string(
                "positional arguments: {1:c}{0:c}{2:c}{2:c}{3:c}",
                args![b'e', b'h', b'l', b'o']
            )
            .unwrap(),
            "positional arguments: hello"
        );
        assert_eq!(
            format_to_string("bools: {:5} {:5}", args![false, true]).unwrap(),
            "bools: false  true"
        );
        assert_eq!(
            format_to_string("INT64_MIN: {}", args![i64::MIN]).unwrap(),
            "INT64_MIN: -9223372036854775808"
        );
    }

    #[test]
    fn test_nine_arguments() {
        assert_eq!(
            format_to_string(
                "{8} {7} {6} {5} {4} {3} {2} {1} {0}",
                args![1, 2, 3, 4, 5, 6, 7, 8, 9]
            )
            .unwrap(),
            "9 8 7 6 5 4 3 2 1"
        );
        assert_eq!(
            format_to_string("{9}", args![1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap(),
            "{invalid fmt}"
        );
    }

    #[test]
    fn test_writer_and_vec_agree() {
        let label = "width";
        let mut written = Vec::new();
        let n = format_to_writer(&mut written, "{:-8}|{:8}|", args![label, -17]).unwrap();
        let allocated = format_to_vec_with_options(
            "{:-8}|{:8}|",
            args![label, -17],
            &FormatOptions::new().with_terminator(false),
            &NoCustomTypes,
        )
        .unwrap();
        assert_eq!(n, written.len());
        assert_eq!(written, allocated);
        assert_eq!(written, b"width   |     -17|");
    }

    #[test]
    fn test_small_window_stream() {
        let mut out = Vec::new();
        let options = FormatOptions::new().with_window_size(2);
        let n = format_to_writer_with_options(
            &mut out,
            "{:b}",
            args![u64::MAX],
            &options,
            &NoCustomTypes,
        )
        .unwrap();
        assert_eq!(n, 64);
        assert!(out.iter().all(|&b| b == b'1'));
    }

    #[test]
    fn test_non_utf8_output() {
        let err = format_to_string("{:c}", args![0xffu8]).unwrap_err();
        assert!(matches!(err, Error::InvalidUtf8(_)));
        assert_eq!(format_to_vec("{:c}", args![0xffu8]).unwrap(), [0xff, 0]);
    }
}
