//! Per-argument rendering.
//!
//! Rendering turns one [`Arg`] plus its [`FormatSpec`] into a [`FormatOutput`]:
//! a view of the rendered text and the padding to insert into it. Text is
//! either written into the state's fixed scratch buffer
//! ([`SCRATCH_CAPACITY`] bytes) or, for strings and for custom formatters that
//! produce long output, borrowed directly from storage that outlives the format
//! call.
//!
//! ## Dispatch
//!
//! | Argument | Default | `x` | `b` | `c` | `p` |
//! |----------|---------|-----|-----|-----|-----|
//! | integers | decimal | lowercase hex | binary | low byte | address |
//! | `bool`   | `true`/`false` | same | same | same | address |
//! | `char`   | UTF-8 | code point hex | code point binary | UTF-8 | address |
//! | `str`    | the string, zero-copy | same | same | same | address |
//! | pointer  | `0x…` or `(nil)` | same | same | same | same |
//! | custom   | [`CustomFormatter`] | same | same | same | address |
//!
//! Negative integers under `x` and `b` render the 64-bit two's complement of
//! the sign-extended value.
//!
//! Zero-padded pointers insert the zeros after the `0x` prefix; `(nil)` is
//! never zero-padded.

use crate::arg::{Arg, CustomArg};
use crate::spec::{FormatSpec, PadMode, RenderMode};
use std::fmt;

/// Size of the per-state scratch buffer. Holds any builtin rendering,
/// including a 64-digit binary `u64`.
pub const SCRATCH_CAPACITY: usize = 64;

pub(crate) const INVALID_FMT: &[u8] = b"{invalid fmt}";
pub(crate) const INVALID_ARG_INDEX: &[u8] = b"{invalid arg index}";
pub(crate) const UNKNOWN_TYPE: &[u8] = b"{unknown type}";
const NIL: &[u8] = b"(nil)";

const DIGITS: &[u8; 16] = b"0123456789abcdef";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source<'a> {
    Scratch,
    External(&'a [u8]),
}

/// Rendered text of one placeholder plus its pending padding.
///
/// Draining emits three segments in order: the first `pad_pos` bytes of text,
/// `pad_size` copies of `pad_byte`, then the rest of the text. The counters
/// track what is still pending, so a drain interrupted by a full buffer resumes
/// exactly where it stopped.
#[derive(Clone, Copy, Debug)]
pub struct FormatOutput<'a> {
    source: Source<'a>,
    offset: usize,
    text_size: usize,
    pad_pos: usize,
    pad_size: usize,
    pad_byte: u8,
    pad_mode: PadMode,
}

impl<'a> FormatOutput<'a> {
    pub(crate) fn empty() -> Self {
        FormatOutput {
            source: Source::Scratch,
            offset: 0,
            text_size: 0,
            pad_pos: 0,
            pad_size: 0,
            pad_byte: b' ',
            pad_mode: PadMode::Left,
        }
    }

    fn for_spec(spec: &FormatSpec<'_>) -> Self {
        FormatOutput {
            pad_byte: spec.pad_byte,
            pad_mode: spec.pad_mode,
            ..Self::empty()
        }
    }

    /// Unpadded literal text, used for diagnostics.
    pub(crate) fn literal(text: &'a [u8]) -> Self {
        let mut output = Self::empty();
        output.set_external(text);
        output
    }

    fn set_scratch_len(&mut self, len: usize) {
        self.source = Source::Scratch;
        self.offset = 0;
        self.text_size = len.min(SCRATCH_CAPACITY);
    }

    fn set_external(&mut self, text: &'a [u8]) {
        self.source = Source::External(text);
        self.offset = 0;
        self.text_size = text.len();
    }

    /// Text bytes not yet emitted.
    #[must_use]
    pub fn text_size(&self) -> usize {
        self.text_size
    }

    /// Text bytes still to be emitted before the padding.
    #[must_use]
    pub fn pad_pos(&self) -> usize {
        self.pad_pos
    }

    /// Padding bytes not yet emitted.
    #[must_use]
    pub fn pad_size(&self) -> usize {
        self.pad_size
    }

    #[must_use]
    pub fn pad_byte(&self) -> u8 {
        self.pad_byte
    }

    #[must_use]
    pub fn pad_mode(&self) -> PadMode {
        self.pad_mode
    }

    /// Total bytes still pending.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.text_size.saturating_add(self.pad_size)
    }

    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.text_size == 0 && self.pad_size == 0
    }

    fn text<'s>(&self, scratch: &'s [u8]) -> &'s [u8]
    where
        'a: 's,
    {
        let range = self.offset..self.offset + self.text_size;
        match self.source {
            Source::Scratch => &scratch[range],
            Source::External(text) => &text[range],
        }
    }

    fn consume_text(&mut self, n: usize) {
        self.offset += n;
        self.text_size -= n;
    }

    fn apply_padding(&mut self, min_width: usize) {
        match self.pad_mode {
            PadMode::Left => self.pad_pos = 0,
            PadMode::Right => self.pad_pos = self.text_size,
            PadMode::CustomPos => self.pad_pos = self.pad_pos.min(self.text_size),
            PadMode::Manual => {
                self.pad_pos = self.pad_pos.min(self.text_size);
                return;
            }
        }
        self.pad_size = min_width.saturating_sub(self.text_size);
    }

    /// Copies as much pending output as fits into `out`, returning the number of bytes written.
    pub(crate) fn drain(&mut self, scratch: &[u8], out: &mut [u8]) -> usize {
        let mut written = 0;

        if self.pad_pos > 0 && written < out.len() {
            let n = self.pad_pos.min(out.len() - written);
            out[written..written + n].copy_from_slice(&self.text(scratch)[..n]);
            self.consume_text(n);
            self.pad_pos -= n;
            written += n;
        }

        if self.pad_pos == 0 && self.pad_size > 0 && written < out.len() {
            let n = self.pad_size.min(out.len() - written);
            out[written..written + n].fill(self.pad_byte);
            self.pad_size -= n;
            written += n;
        }

        if self.pad_pos == 0 && self.pad_size == 0 && self.text_size > 0 && written < out.len() {
            let n = self.text_size.min(out.len() - written);
            out[written..written + n].copy_from_slice(&self.text(scratch)[..n]);
            self.consume_text(n);
            written += n;
        }

        written
    }

    /// Marks everything as emitted without copying, returning the byte count.
    pub(crate) fn skip_all(&mut self) -> usize {
        let n = self.remaining();
        self.offset += self.text_size;
        self.text_size = 0;
        self.pad_pos = 0;
        self.pad_size = 0;
        n
    }
}

/// Output descriptor handed to a [`CustomFormatter`].
///
/// A formatter either writes into the scratch buffer (at most
/// [`SCRATCH_CAPACITY`] bytes) or points the output at external text that
/// stays valid for the whole format call. It may also take over padding with
/// [`set_pad_position`](Self::set_pad_position) or
/// [`set_manual_padding`](Self::set_manual_padding).
///
/// `CustomOutput` implements [`fmt::Write`]; writes past the scratch capacity
/// are truncated and reported as [`fmt::Error`].
pub struct CustomOutput<'s, 'a> {
    scratch: &'s mut [u8; SCRATCH_CAPACITY],
    output: &'s mut FormatOutput<'a>,
}

impl<'a> CustomOutput<'_, 'a> {
    /// The raw scratch buffer. Call [`set_len`](Self::set_len) after writing into it.
    pub fn scratch(&mut self) -> &mut [u8; SCRATCH_CAPACITY] {
        &mut *self.scratch
    }

    /// Uses the first `len` scratch bytes as the rendered text (clamped to the capacity).
    pub fn set_len(&mut self, len: usize) {
        self.output.set_scratch_len(len);
    }

    /// Appends to the scratch text, returning how many bytes fit.
    ///
    /// If the output currently points at external text, the scratch text starts over.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> usize {
        let start = match self.output.source {
            Source::Scratch => self.output.text_size,
            Source::External(_) => 0,
        };
        let n = copy_into(&mut self.scratch[start..], bytes);
        self.output.set_scratch_len(start + n);
        n
    }

    /// Uses `text` as the rendered output without copying it.
    pub fn set_external(&mut self, text: &'a [u8]) {
        self.output.set_external(text);
    }

    /// The text rendered so far.
    #[must_use]
    pub fn text(&self) -> &[u8] {
        self.output.text(&self.scratch[..])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.output.text_size
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.output.text_size == 0
    }

    #[must_use]
    pub fn pad_byte(&self) -> u8 {
        self.output.pad_byte
    }

    pub fn set_pad_byte(&mut self, pad_byte: u8) {
        self.output.pad_byte = pad_byte;
    }

    #[must_use]
    pub fn pad_mode(&self) -> PadMode {
        self.output.pad_mode
    }

    /// Inserts the width padding at byte `pos` of the text instead of at either end.
    pub fn set_pad_position(&mut self, pos: usize) {
        self.output.pad_mode = PadMode::CustomPos;
        self.output.pad_pos = pos;
    }

    /// Emits exactly `pad_size` padding bytes at `pad_pos`, ignoring the spec's width.
    pub fn set_manual_padding(&mut self, pad_pos: usize, pad_size: usize) {
        self.output.pad_mode = PadMode::Manual;
        self.output.pad_pos = pad_pos;
        self.output.pad_size = pad_size;
    }
}

impl fmt::Write for CustomOutput<'_, '_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.write_bytes(s.as_bytes()) == s.len() {
            Ok(())
        } else {
            Err(fmt::Error)
        }
    }
}

/// Rendering strategy for [`Arg::Custom`] arguments.
///
/// The strategy object carries whatever context it needs; each
/// [`FormatState`](crate::FormatState) is bound to one, so independent
/// configurations can coexist.
///
/// Return `true` after rendering the argument, or `false` to decline it, in
/// which case `{unknown type}` is emitted.
///
/// # Examples
///
/// ```rust
/// use tagfmt::{Arg, Capture, CustomArg, CustomFormatter, CustomOutput, CustomTag, FormatSpec};
/// use std::fmt::Write;
///
/// struct Celsius(f64);
///
/// impl Capture for Celsius {
///     fn capture(&self) -> Arg<'_> {
///         Arg::Custom(CustomArg::new(CustomTag(1), self))
///     }
/// }
///
/// struct Temperatures;
///
/// impl CustomFormatter for Temperatures {
///     fn format_custom<'a>(
///         &self,
///         arg: CustomArg<'a>,
///         _spec: &FormatSpec<'a>,
///         out: &mut CustomOutput<'_, 'a>,
///     ) -> bool {
///         match arg.downcast_ref::<Celsius>() {
///             Some(c) => write!(out, "{:.1}C", c.0).is_ok(),
///             None => false,
///         }
///     }
/// }
///
/// let reading = Celsius(21.5);
/// let text = tagfmt::format_to_string_with("now {}", tagfmt::args![reading], &Temperatures).unwrap();
/// assert_eq!(text, "now 21.5C");
/// ```
pub trait CustomFormatter {
    fn format_custom<'a>(
        &self,
        arg: CustomArg<'a>,
        spec: &FormatSpec<'a>,
        out: &mut CustomOutput<'_, 'a>,
    ) -> bool;
}

impl<F: CustomFormatter + ?Sized> CustomFormatter for &F {
    fn format_custom<'a>(
        &self,
        arg: CustomArg<'a>,
        spec: &FormatSpec<'a>,
        out: &mut CustomOutput<'_, 'a>,
    ) -> bool {
        (**self).format_custom(arg, spec, out)
    }
}

/// The default strategy: declines every custom argument.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCustomTypes;

impl CustomFormatter for NoCustomTypes {
    fn format_custom<'a>(
        &self,
        _arg: CustomArg<'a>,
        _spec: &FormatSpec<'a>,
        _out: &mut CustomOutput<'_, 'a>,
    ) -> bool {
        false
    }
}

/// Renders one argument and computes its padding.
pub(crate) fn render<'a>(
    arg: Arg<'a>,
    spec: &FormatSpec<'a>,
    scratch: &mut [u8; SCRATCH_CAPACITY],
    formatter: &dyn CustomFormatter,
) -> FormatOutput<'a> {
    let mut output = FormatOutput::for_spec(spec);

    if spec.mode == RenderMode::Pointer {
        render_pointer(arg.address(), scratch, &mut output);
    } else {
        match arg {
            Arg::I8(v) => output.set_scratch_len(render_signed(i64::from(*v), spec.mode, scratch)),
            Arg::I16(v) => output.set_scratch_len(render_signed(i64::from(*v), spec.mode, scratch)),
            Arg::I32(v) => output.set_scratch_len(render_signed(i64::from(*v), spec.mode, scratch)),
            Arg::I64(v) => output.set_scratch_len(render_signed(*v, spec.mode, scratch)),
            Arg::Isize(v) => output.set_scratch_len(render_signed(*v as i64, spec.mode, scratch)),
            Arg::U8(v) => output.set_scratch_len(render_unsigned(u64::from(*v), spec.mode, scratch)),
            Arg::U16(v) => output.set_scratch_len(render_unsigned(u64::from(*v), spec.mode, scratch)),
            Arg::U32(v) => output.set_scratch_len(render_unsigned(u64::from(*v), spec.mode, scratch)),
            Arg::U64(v) => output.set_scratch_len(render_unsigned(*v, spec.mode, scratch)),
            Arg::Usize(v) => output.set_scratch_len(render_unsigned(*v as u64, spec.mode, scratch)),
            Arg::Bool(v) => {
                let text: &[u8] = if *v { b"true" } else { b"false" };
                output.set_scratch_len(copy_into(&mut scratch[..], text));
            }
            Arg::Char(c) => {
                let len = match spec.mode {
                    RenderMode::Hex | RenderMode::Binary => {
                        render_unsigned(u64::from(u32::from(*c)), spec.mode, scratch)
                    }
                    _ => c.encode_utf8(&mut scratch[..]).len(),
                };
                output.set_scratch_len(len);
            }
            Arg::Str(s) => output.set_external(s.as_bytes()),
            Arg::Pointer(p) => render_pointer(p as usize as u64, scratch, &mut output),
            Arg::Custom(custom) => {
                let mut out = CustomOutput {
                    scratch: &mut *scratch,
                    output: &mut output,
                };
                if !formatter.format_custom(custom, spec, &mut out) {
                    tracing::debug!(tag = custom.tag().0, "custom argument declined");
                    output = FormatOutput::for_spec(spec);
                    output.set_external(UNKNOWN_TYPE);
                }
            }
        }
    }

    output.apply_padding(spec.min_width);
    output
}

fn render_pointer(address: u64, scratch: &mut [u8; SCRATCH_CAPACITY], output: &mut FormatOutput<'_>) {
    if address == 0 {
        output.set_external(NIL);
        if output.pad_byte == b'0' {
            output.pad_byte = b' ';
        }
    } else {
        scratch[..2].copy_from_slice(b"0x");
        let len = 2 + write_radix(&mut scratch[2..], address, 16);
        output.set_scratch_len(len);
        if output.pad_byte == b'0' {
            output.pad_pos = 2;
            output.pad_mode = PadMode::CustomPos;
        }
    }
}

fn render_signed(value: i64, mode: RenderMode, buf: &mut [u8]) -> usize {
    match mode {
        RenderMode::Hex => write_radix(buf, value as u64, 16),
        RenderMode::Binary => write_radix(buf, value as u64, 2),
        RenderMode::Char => {
            buf[0] = value as u8;
            1
        }
        RenderMode::Default | RenderMode::Pointer => {
            if value < 0 {
                buf[0] = b'-';
                1 + write_radix(&mut buf[1..], value.unsigned_abs(), 10)
            } else {
                write_radix(buf, value as u64, 10)
            }
        }
    }
}

fn render_unsigned(value: u64, mode: RenderMode, buf: &mut [u8]) -> usize {
    match mode {
        RenderMode::Hex => write_radix(buf, value, 16),
        RenderMode::Binary => write_radix(buf, value, 2),
        RenderMode::Char => {
            buf[0] = value as u8;
            1
        }
        RenderMode::Default | RenderMode::Pointer => write_radix(buf, value, 10),
    }
}

/// Writes `value` in `radix` (2..=16) with lowercase digits, returning the length.
#[inline]
fn write_radix(buf: &mut [u8], mut value: u64, radix: u64) -> usize {
    if value == 0 {
        buf[0] = b'0';
        return 1;
    }

    let mut len = 0;
    let mut m = value;
    while m != 0 {
        len += 1;
        m /= radix;
    }

    let mut index = len;
    while value != 0 {
        index -= 1;
        buf[index] = DIGITS[(value % radix) as usize];
        value /= radix;
    }
    len
}

fn copy_into(buf: &mut [u8], bytes: &[u8]) -> usize {
    let n = bytes.len().min(buf.len());
    buf[..n].copy_from_slice(&bytes[..n]);
    n
}
