//! Placeholder grammar and parsed format specs.
//!
//! # Overview
//!
//! A format string is literal text interleaved with placeholders. The engine is
//! byte-oriented: widths are counted in bytes, not code points.
//!
//! ```text
//! placeholder := '{' index? (':' '-'? '0'? width? mode?)? ('|' payload)? '}'
//! index       := digit                    // 0-8
//! width       := digit digit?             // 0-99
//! mode        := 'x' | 'b' | 'c' | 'p'
//! payload     := any bytes except '}'
//! ```
//!
//! ## Escapes
//!
//! | Input | Output |
//! |-------|--------|
//! | `{{`  | `{`    |
//! | `}}`  | `}`    |
//! | lone `}` | `}` |
//!
//! ## Fields
//!
//! - **index**: explicit argument position; when absent the next unconsumed argument is used
//! - **`-`**: pad after the text instead of before it
//! - **`0`**: pad with `'0'` instead of `' '`
//! - **width**: minimum rendered width in bytes
//! - **mode**: `x` hexadecimal, `b` binary, `c` character, `p` pointer
//! - **payload**: raw bytes handed verbatim to the custom formatter
//!
//! ## Examples
//!
//! ```text
//! {}          next argument, default rendering
//! {1:08}      second argument, width 8, zero padded
//! {:-5}       next argument, width 5, padded on the right
//! {4|%H:%M}   fifth argument, payload "%H:%M" for the custom formatter
//! {:p}        next argument as a pointer
//! ```
//!
//! # Malformed placeholders
//!
//! Any byte that does not fit the grammar makes the placeholder malformed. The
//! formatter then emits `{invalid fmt}` in its place and resumes scanning after
//! the next `}` (or at the end of the string if there is none).

/// Maximum number of width digits.
pub const MAX_WIDTH_DIGITS: usize = 2;

/// Where padding goes relative to the rendered text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PadMode {
    /// Pad before the text (right-aligned output).
    #[default]
    Left,
    /// Pad after the text (left-aligned output).
    Right,
    /// Pad at an offset chosen by the renderer.
    CustomPos,
    /// Padding position and length are supplied by the renderer verbatim.
    Manual,
}

/// Render mode selected by the trailing mode character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Default,
    Hex,
    Binary,
    Char,
    Pointer,
}

impl RenderMode {
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'x' => Some(RenderMode::Hex),
            b'b' => Some(RenderMode::Binary),
            b'c' => Some(RenderMode::Char),
            b'p' => Some(RenderMode::Pointer),
            _ => None,
        }
    }

    /// The mode character, or `None` for [`RenderMode::Default`].
    #[must_use]
    pub const fn as_char(&self) -> Option<char> {
        match self {
            RenderMode::Default => None,
            RenderMode::Hex => Some('x'),
            RenderMode::Binary => Some('b'),
            RenderMode::Char => Some('c'),
            RenderMode::Pointer => Some('p'),
        }
    }
}

/// Formatting instructions parsed from one placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatSpec<'a> {
    pub min_width: usize,
    pub pad_byte: u8,
    pub pad_mode: PadMode,
    pub mode: RenderMode,
    /// Raw bytes between `|` and `}`; empty when there is no payload.
    pub custom: &'a [u8],
}

impl Default for FormatSpec<'_> {
    fn default() -> Self {
        FormatSpec {
            min_width: 0,
            pad_byte: b' ',
            pad_mode: PadMode::Left,
            mode: RenderMode::Default,
            custom: &[],
        }
    }
}

impl<'a> FormatSpec<'a> {
    /// The custom payload as text.
    ///
    /// Returns `None` when the placeholder has no payload (or an empty one,
    /// as in `{|}`) and when the payload is not valid UTF-8, so formatters can
    /// fall back with `custom_str().unwrap_or(default)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagfmt::spec::{parse_placeholder, Parsed};
    ///
    /// let (parsed, _) = parse_placeholder(b"{|%Y-%m-%d}");
    /// match parsed {
    ///     Parsed::Valid(p) => assert_eq!(p.spec.custom_str(), Some("%Y-%m-%d")),
    ///     Parsed::Malformed => panic!("Expected a valid placeholder"),
    /// }
    ///
    /// let (parsed, _) = parse_placeholder(b"{}");
    /// match parsed {
    ///     Parsed::Valid(p) => assert_eq!(p.spec.custom_str(), None),
    ///     Parsed::Malformed => panic!("Expected a valid placeholder"),
    /// }
    /// ```
    #[must_use]
    pub fn custom_str(&self) -> Option<&'a str> {
        if self.custom.is_empty() {
            return None;
        }
        std::str::from_utf8(self.custom).ok()
    }

    #[must_use]
    pub fn has_custom(&self) -> bool {
        !self.custom.is_empty()
    }
}

/// A successfully parsed placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub index: Option<usize>,
    pub spec: FormatSpec<'a>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parsed<'a> {
    Valid(Placeholder<'a>),
    Malformed,
}

/// Parses the placeholder at the start of `input`, which must begin with `{`.
///
/// Returns the parse result and the number of bytes consumed. A malformed
/// placeholder consumes everything up to and including the next `}`.
///
/// # Examples
///
/// ```rust
/// use tagfmt::spec::{parse_placeholder, Parsed, PadMode, RenderMode};
///
/// let (parsed, consumed) = parse_placeholder(b"{1:-08x} tail");
/// assert_eq!(consumed, 8);
/// let Parsed::Valid(p) = parsed else { panic!("Expected a valid placeholder") };
/// assert_eq!(p.index, Some(1));
/// assert_eq!(p.spec.min_width, 8);
/// assert_eq!(p.spec.pad_byte, b'0');
/// assert_eq!(p.spec.pad_mode, PadMode::Right);
/// assert_eq!(p.spec.mode, RenderMode::Hex);
///
/// let (parsed, consumed) = parse_placeholder(b"{ oops } tail");
/// assert_eq!(parsed, Parsed::Malformed);
/// assert_eq!(consumed, 8);
/// ```
#[must_use]
pub fn parse_placeholder(input: &[u8]) -> (Parsed<'_>, usize) {
    debug_assert_eq!(input.first(), Some(&b'{'));
    let mut cursor = Cursor { input, pos: 1 };
    match cursor.placeholder() {
        Some(placeholder) => (Parsed::Valid(placeholder), cursor.pos),
        None => (Parsed::Malformed, cursor.skip_past_close()),
    }
}

struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn digit(&mut self) -> Option<usize> {
        match self.peek() {
            Some(d @ b'0'..=b'9') => {
                self.pos += 1;
                Some(usize::from(d - b'0'))
            }
            _ => None,
        }
    }

    fn placeholder(&mut self) -> Option<Placeholder<'a>> {
        let mut spec = FormatSpec::default();
        let index = match self.peek() {
            Some(b'9') => return None,
            _ => self.digit(),
        };

        if self.eat(b':') {
            if self.eat(b'-') {
                spec.pad_mode = PadMode::Right;
            }
            if self.eat(b'0') {
                spec.pad_byte = b'0';
            }
            for _ in 0..MAX_WIDTH_DIGITS {
                match self.digit() {
                    Some(d) => spec.min_width = spec.min_width * 10 + d,
                    None => break,
                }
            }
            if let Some(mode) = self.peek().and_then(RenderMode::from_byte) {
                spec.mode = mode;
                self.pos += 1;
            }
        }

        if self.eat(b'|') {
            let rest = &self.input[self.pos..];
            let len = rest.iter().position(|&b| b == b'}')?;
            spec.custom = &rest[..len];
            self.pos += len;
        }

        if self.eat(b'}') {
            Some(Placeholder { index, spec })
        } else {
            None
        }
    }

    fn skip_past_close(&self) -> usize {
        self.input[self.pos..]
            .iter()
            .position(|&b| b == b'}')
            .map_or(self.input.len(), |offset| self.pos + offset + 1)
    }
}
