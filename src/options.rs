//! Configuration options for the sink adapters.
//!
//! The formatting state machine itself has no knobs; these options only
//! shape how the adapters in [`crate::sink`] drive it:
//!
//! - [`FormatOptions::window_size`]: size of the stack window the stream adapter fills per chunk
//! - [`FormatOptions::terminator`]: whether the heap adapter appends a nul byte
//!
//! ## Examples
//!
//! ```rust
//! use tagfmt::{args, format_to_vec_with_options, FormatOptions, NoCustomTypes};
//!
//! let options = FormatOptions::new().with_terminator(false);
//! let bytes = format_to_vec_with_options("{} + {}", args![1, 2], &options, &NoCustomTypes).unwrap();
//! assert_eq!(bytes, b"1 + 2");
//! ```

/// Largest stream window, in bytes. The window lives on the stack.
pub const MAX_WINDOW_SIZE: usize = 4096;

/// Configuration options for the sink adapters.
///
/// # Examples
///
/// ```rust
/// use tagfmt::FormatOptions;
///
/// // Defaults: 4096-byte window, nul-terminated heap output
/// let options = FormatOptions::new();
/// assert_eq!(options.window_size, 4096);
/// assert!(options.terminator);
///
/// // Small windows exercise the chunked path
/// let options = FormatOptions::new().with_window_size(16);
/// assert_eq!(options.window_size, 16);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatOptions {
    pub window_size: usize,
    pub terminator: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            window_size: MAX_WINDOW_SIZE,
            terminator: true,
        }
    }
}

impl FormatOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stream window size, clamped to `1..=MAX_WINDOW_SIZE`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagfmt::{FormatOptions, MAX_WINDOW_SIZE};
    ///
    /// assert_eq!(FormatOptions::new().with_window_size(0).window_size, 1);
    /// assert_eq!(FormatOptions::new().with_window_size(1 << 20).window_size, MAX_WINDOW_SIZE);
    /// ```
    #[must_use]
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size.clamp(1, MAX_WINDOW_SIZE);
        self
    }

    /// Sets whether heap-allocated output ends with a nul byte.
    #[must_use]
    pub fn with_terminator(mut self, terminator: bool) -> Self {
        self.terminator = terminator;
        self
    }
}
