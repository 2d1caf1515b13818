//! The resumable formatting state machine.
//!
//! A [`FormatState`] borrows a format string and an [`ArgList`] and produces
//! the formatted output in chunks, into whatever buffer the caller supplies.
//! The same state backs a bounded `snprintf`-style fill, a stream drain and a
//! measure-then-allocate pass (see [`crate::sink`]).
//!
//! ## Protocol
//!
//! ```rust
//! use tagfmt::{args, FormatState};
//!
//! let mut state = FormatState::new("{} is {:04x}", args!["x", 0xbeu32]);
//! let mut out = Vec::new();
//! let mut window = [0u8; 4];
//! while let Some(n) = state.produce_chunk(Some(&mut window[..])) {
//!     out.extend_from_slice(&window[..n]);
//! }
//! assert_eq!(out, b"x is 00be");
//! ```
//!
//! Passing `None` instead of a buffer runs a size-only pass:
//!
//! ```rust
//! use tagfmt::{args, FormatState};
//!
//! let mut state = FormatState::new("{:8}|", args![1]);
//! assert_eq!(state.produce_chunk(None), Some(9));
//! assert_eq!(state.produce_chunk(None), None);
//!
//! state.reset();
//! let mut buf = [0u8; 9];
//! assert_eq!(state.produce_chunk(Some(&mut buf[..])), Some(9));
//! assert_eq!(&buf, b"       1|");
//! ```

use crate::arg::ArgList;
use crate::render::{
    self, CustomFormatter, FormatOutput, NoCustomTypes, INVALID_ARG_INDEX, INVALID_FMT,
    SCRATCH_CAPACITY,
};
use crate::spec::{parse_placeholder, Parsed};
use std::fmt;

static NO_CUSTOM_TYPES: NoCustomTypes = NoCustomTypes;

/// What the state machine is doing between calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Scanning literal text; no rendered output is pending.
    Parsing,
    /// Emitting the current placeholder's output.
    Formatting,
    /// The format string is exhausted and all output has been emitted.
    Done,
}

/// Cursor over one format call.
///
/// Owns only the scan position and the scratch buffer; the format string,
/// the arguments and the custom formatter are borrowed for `'a`.
#[derive(Clone)]
pub struct FormatState<'a> {
    args: ArgList<'a>,
    format: &'a [u8],
    cursor: usize,
    next_arg: usize,
    action: Action,
    output: FormatOutput<'a>,
    scratch: [u8; SCRATCH_CAPACITY],
    formatter: &'a dyn CustomFormatter,
    size: usize,
}

impl<'a> FormatState<'a> {
    /// Binds a format string and its arguments, with no custom formatter.
    pub fn new<F>(format: &'a F, args: ArgList<'a>) -> Self
    where
        F: AsRef<[u8]> + ?Sized,
    {
        Self::with_formatter(format, args, &NO_CUSTOM_TYPES)
    }

    /// Binds a format string and its arguments, rendering custom arguments with `formatter`.
    pub fn with_formatter<F>(
        format: &'a F,
        args: ArgList<'a>,
        formatter: &'a dyn CustomFormatter,
    ) -> Self
    where
        F: AsRef<[u8]> + ?Sized,
    {
        FormatState {
            args,
            format: format.as_ref(),
            cursor: 0,
            next_arg: 0,
            action: Action::Parsing,
            output: FormatOutput::empty(),
            scratch: [0; SCRATCH_CAPACITY],
            formatter,
            size: 0,
        }
    }

    /// Rewinds to the start of the format string, keeping the captured arguments.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.next_arg = 0;
        self.action = Action::Parsing;
        self.output = FormatOutput::empty();
        self.size = 0;
    }

    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Bytes produced by the most recent [`produce_chunk`](Self::produce_chunk) call.
    #[must_use]
    pub fn last_size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn args(&self) -> &ArgList<'a> {
        &self.args
    }

    #[must_use]
    pub fn format(&self) -> &'a [u8] {
        self.format
    }

    /// The placeholder output currently being drained.
    #[must_use]
    pub fn pending(&self) -> &FormatOutput<'a> {
        &self.output
    }

    /// Produces the next chunk of output.
    ///
    /// With `Some(buf)`, writes up to `buf.len()` bytes into `buf`. With `None`,
    /// runs to the end of the format string without copying anything and
    /// reports the size the output would take.
    ///
    /// Returns `Some(n)` with the number of bytes produced by this call, or
    /// `None` once the output is finished and nothing was produced. No
    /// terminator is ever written.
    pub fn produce_chunk(&mut self, mut buf: Option<&mut [u8]>) -> Option<usize> {
        if self.action == Action::Done {
            self.size = 0;
            return None;
        }

        let mut written = 0;
        loop {
            match self.action {
                Action::Parsing => {
                    let room = buf.as_deref().map_or(usize::MAX, |b| b.len() - written);
                    if !self.scan(buf.as_deref_mut().map(|b| &mut b[written..]), room, &mut written) {
                        break;
                    }
                }
                Action::Formatting => {
                    let n = match buf.as_deref_mut() {
                        Some(b) => self.output.drain(&self.scratch, &mut b[written..]),
                        None => self.output.skip_all(),
                    };
                    written = written.saturating_add(n);
                    if !self.output.is_drained() {
                        break;
                    }
                    self.action = Action::Parsing;
                }
                Action::Done => break,
            }
        }

        self.size = written;
        if written == 0 && self.action == Action::Done {
            None
        } else {
            Some(written)
        }
    }

    /// Handles the literal text or placeholder at the cursor.
    ///
    /// Returns `false` when the buffer has no room for the next literal byte.
    fn scan(&mut self, out: Option<&mut [u8]>, room: usize, written: &mut usize) -> bool {
        let format = self.format;
        let rest = &format[self.cursor..];
        let (literal_len, advance) = match rest {
            [] => {
                self.action = Action::Done;
                return true;
            }
            [b'{', b'{', ..] | [b'}', b'}', ..] => (1, 2),
            [b'{', ..] => {
                self.begin_placeholder();
                return true;
            }
            [b'}', ..] => (1, 1),
            _ => {
                let len = rest
                    .iter()
                    .position(|&b| b == b'{' || b == b'}')
                    .unwrap_or(rest.len());
                (len, len)
            }
        };

        if room == 0 {
            return false;
        }
        // Plain runs may be split; an escape pair is emitted whole or not at all.
        let (n, advance) = if literal_len == advance {
            let n = literal_len.min(room);
            (n, n)
        } else {
            (literal_len, advance)
        };

        if let Some(out) = out {
            out[..n].copy_from_slice(&rest[..n]);
        }
        *written = written.saturating_add(n);
        self.cursor += advance;
        true
    }

    fn begin_placeholder(&mut self) {
        let format = self.format;
        let (parsed, consumed) = parse_placeholder(&format[self.cursor..]);
        let start = self.cursor;
        self.cursor += consumed;

        self.output = match parsed {
            Parsed::Valid(placeholder) => {
                let index = placeholder.index.unwrap_or_else(|| {
                    let next = self.next_arg;
                    self.next_arg += 1;
                    next
                });
                match self.args.get(index) {
                    Some(arg) => render::render(
                        arg,
                        &placeholder.spec,
                        &mut self.scratch,
                        self.formatter,
                    ),
                    None => {
                        tracing::debug!(
                            index,
                            available = self.args.len(),
                            "argument index out of range"
                        );
                        FormatOutput::literal(INVALID_ARG_INDEX)
                    }
                }
            }
            Parsed::Malformed => {
                tracing::debug!(
                    offset = start,
                    placeholder = %String::from_utf8_lossy(&format[start..self.cursor]),
                    "malformed placeholder"
                );
                FormatOutput::literal(INVALID_FMT)
            }
        };
        self.action = Action::Formatting;
    }
}

impl fmt::Debug for FormatState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatState")
            .field("format", &String::from_utf8_lossy(self.format))
            .field("cursor", &self.cursor)
            .field("next_arg", &self.next_arg)
            .field("action", &self.action)
            .field("args", &self.args.len())
            .field("last_size", &self.size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    fn collect(state: &mut FormatState<'_>, window: usize) -> Vec<u8> {
        let mut out = Vec::new();
        let mut buf = vec![0u8; window];
        while let Some(n) = state.produce_chunk(Some(&mut buf[..])) {
            out.extend_from_slice(&buf[..n]);
        }
        out
    }

    fn format_all(format: &str, args: ArgList<'_>) -> String {
        let mut state = FormatState::new(format, args);
        String::from_utf8(collect(&mut state, 256)).unwrap()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(format_all("hello world", args![]), "hello world");
        assert_eq!(format_all("", args![]), "");
    }

    #[test]
    fn test_auto_and_explicit_indices() {
        assert_eq!(format_all("{} {}", args![123, "hi"]), "123 hi");
        assert_eq!(format_all("{1}{0}{1}", args!["A", "B"]), "BAB");
        assert_eq!(format_all("{1} {}", args!["a", "b"]), "b a");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(format_all("a{{b", args![]), "a{b");
        assert_eq!(format_all("a}}b", args![]), "a}b");
        assert_eq!(format_all("{{ }}", args![]), "{ }");
        assert_eq!(format_all("{{{},{}}", args![1, 2]), "{1,2}");
        assert_eq!(format_all("lone } brace", args![]), "lone } brace");
    }

    #[test]
    fn test_diagnostics_do_not_abort() {
        assert_eq!(
            format_all("{5} then {}", args![1, 2]),
            "{invalid arg index} then 1"
        );
        assert_eq!(
            format_all("extraneous {} {1}", args![]),
            "extraneous {invalid arg index} {invalid arg index}"
        );
        assert_eq!(format_all("x{:q}y{}", args![7]), "x{invalid fmt}y7");
        assert_eq!(format_all("bad { blah", args![]), "bad {invalid fmt}");
    }

    #[test]
    fn test_diagnostics_are_not_padded() {
        assert_eq!(format_all("{3:30}", args![]), "{invalid arg index}");
    }

    #[test]
    fn test_size_only_pass() {
        let mut state = FormatState::new("{:05} and {}", args![42, "words"]);
        assert_eq!(state.produce_chunk(None), Some(15));
        assert_eq!(state.last_size(), 15);
        assert_eq!(state.action(), Action::Done);
        assert_eq!(state.produce_chunk(None), None);
        assert_eq!(state.last_size(), 0);
    }

    #[test]
    fn test_empty_format_finishes_immediately() {
        let mut state = FormatState::new("", args![]);
        assert_eq!(state.produce_chunk(None), None);
    }

    #[test]
    fn test_zero_capacity_buffer_makes_no_progress() {
        let mut state = FormatState::new("abc{}", args![1]);
        let mut empty: [u8; 0] = [];
        assert_eq!(state.produce_chunk(Some(&mut empty[..])), Some(0));
        assert_eq!(state.action(), Action::Parsing);
        assert_eq!(state.produce_chunk(None), Some(4));
    }

    #[test]
    fn test_chunk_boundaries_inside_padding() {
        let mut state = FormatState::new("[{:-10}]", args!["ab"]);
        let mut buf = [0u8; 4];

        assert_eq!(state.produce_chunk(Some(&mut buf[..])), Some(4));
        assert_eq!(&buf, b"[ab ");
        assert_eq!(state.action(), Action::Formatting);
        assert_eq!(state.pending().pad_size(), 7);

        assert_eq!(state.produce_chunk(Some(&mut buf[..])), Some(4));
        assert_eq!(&buf, b"    ");
        assert_eq!(state.produce_chunk(Some(&mut buf[..])), Some(4));
        assert_eq!(&buf, b"   ]");
        assert_eq!(state.produce_chunk(Some(&mut buf[..])), None);
    }

    #[test]
    fn test_escape_not_split_across_chunks() {
        let mut state = FormatState::new("a{{b", args![]);
        let mut buf = [0u8; 1];
        let mut out = Vec::new();
        while let Some(n) = state.produce_chunk(Some(&mut buf[..])) {
            out.extend_from_slice(&buf[..n]);
        }
        assert_eq!(out, b"a{b");
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut state = FormatState::new("{:x}-{}-{2}", args![255u8, true, 'c']);
        let first = collect(&mut state, 3);
        state.reset();
        let second = collect(&mut state, 7);
        assert_eq!(first, b"ff-true-c");
        assert_eq!(first, second);
    }

    #[test]
    fn test_window_sizes_agree() {
        let name = String::from("padded");
        let expected = format_all("<{:12}|{:-3}|{:08b}>", args![name, 7, 5u8]);
        for window in 1..20 {
            let mut state = FormatState::new("<{:12}|{:-3}|{:08b}>", args![name, 7, 5u8]);
            assert_eq!(String::from_utf8(collect(&mut state, window)).unwrap(), expected);
        }
        assert_eq!(expected, "<      padded|7  |00000101>");
    }

    #[test]
    fn test_byte_format_string() {
        let mut state = FormatState::new(b"n={}", args![3u16]);
        assert_eq!(collect(&mut state, 8), b"n=3");
    }

    struct Fence;

    impl CustomFormatter for Fence {
        fn format_custom<'a>(
            &self,
            _arg: crate::CustomArg<'a>,
            _spec: &crate::FormatSpec<'a>,
            out: &mut crate::CustomOutput<'_, 'a>,
        ) -> bool {
            out.write_bytes(b"||");
            out.set_manual_padding(1, usize::MAX);
            true
        }
    }

    #[test]
    fn test_size_only_pass_saturates() {
        let unit = ();
        let arg = crate::CustomArg::new(crate::CustomTag(1), &unit);
        let mut state = FormatState::with_formatter("x{}y", args![arg], &Fence);
        assert_eq!(state.produce_chunk(None), Some(usize::MAX));
        assert_eq!(state.action(), Action::Done);

        state.reset();
        let mut buf = [0u8; 4];
        assert_eq!(state.produce_chunk(Some(&mut buf[..])), Some(4));
        assert_eq!(&buf, b"x|  ");
    }

    #[test]
    fn test_debug_output() {
        let state = FormatState::new("{}", args![1]);
        let debug = format!("{:?}", state);
        assert!(debug.contains("FormatState"));
        assert!(debug.contains("Parsing"));
    }
}
