//! Error types for the sink adapters.
//!
//! Formatting itself never fails: malformed placeholders, out-of-range
//! argument indices and unknown argument types are rendered inline as
//! diagnostic text (see [`crate::render`]). The errors in this module only
//! come from the edges of the crate:
//!
//! - **I/O Errors**: a stream sink rejected a chunk
//! - **Allocation Errors**: the measure-then-allocate adapter could not reserve its buffer
//! - **Argument Errors**: more than [`MAX_ARGS`](crate::MAX_ARGS) arguments were captured at runtime
//! - **UTF-8 Errors**: the formatted bytes were requested as a `String` but are not valid UTF-8
//!
//! ## Examples
//!
//! ```rust
//! use tagfmt::{Arg, ArgList, Error};
//!
//! let values = [1u8; 10];
//! let args: Vec<Arg<'_>> = values.iter().map(Arg::U8).collect();
//! let result = ArgList::new(&args);
//! assert!(matches!(result, Err(Error::TooManyArguments { count: 10, .. })));
//! ```

use thiserror::Error;

/// Represents all errors the sink adapters can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The sink rejected a write
    #[error("IO error: {0}")]
    Io(String),

    /// The output buffer could not be allocated
    #[error("Allocation of {requested} bytes failed")]
    Alloc { requested: usize },

    /// More arguments were captured than a single call supports
    #[error("Too many arguments: got {count}, at most {max} are supported")]
    TooManyArguments { count: usize, max: usize },

    /// The formatted output is not valid UTF-8
    #[error("Formatted output is not valid UTF-8: {0}")]
    InvalidUtf8(String),
}

impl Error {
    /// Creates an I/O error for a sink that could not accept a chunk.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagfmt::Error;
    ///
    /// let err = Error::io("broken pipe");
    /// assert!(err.to_string().contains("broken pipe"));
    /// ```
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates an allocation error for a buffer of `requested` bytes.
    pub fn alloc(requested: usize) -> Self {
        Error::Alloc { requested }
    }

    /// Creates an error for an argument list longer than `max`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagfmt::Error;
    ///
    /// let err = Error::too_many_arguments(12, 9);
    /// assert!(err.to_string().contains("at most 9"));
    /// ```
    pub fn too_many_arguments(count: usize, max: usize) -> Self {
        Error::TooManyArguments { count, max }
    }

    /// Creates an error for output that cannot be viewed as a `String`.
    pub fn invalid_utf8(msg: &str) -> Self {
        Error::InvalidUtf8(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
