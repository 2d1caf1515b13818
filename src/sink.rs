//! Sink adapters over [`FormatState`].
//!
//! Each adapter drives [`FormatState::produce_chunk`] in a different pattern:
//!
//! - [`fill_bounded`]: one chunk into a caller buffer, `snprintf` style
//! - [`drain_to_writer`]: repeated chunks through a stack window into an [`io::Write`]
//! - [`measure_then_allocate`]: a size-only pass, a reset, then one exact-size fill
//!
//! The functions in the crate root wrap these for the common case of a
//! freshly built state.

use crate::error::{Error, Result};
use crate::options::{FormatOptions, MAX_WINDOW_SIZE};
use crate::state::FormatState;
use std::io;

/// Fills `buf` with as much output as fits, nul-terminates it, and returns
/// the length the complete output would have (excluding the terminator).
///
/// At most `buf.len() - 1` content bytes are written. An empty `buf` is left
/// untouched and only the total is computed.
///
/// # Examples
///
/// ```rust
/// use tagfmt::{args, sink, FormatState};
///
/// let mut state = FormatState::new("abcd", args![]);
/// let mut buf = [0xffu8; 3];
/// assert_eq!(sink::fill_bounded(&mut state, &mut buf), 4);
/// assert_eq!(&buf, b"ab\0");
/// ```
pub fn fill_bounded(state: &mut FormatState<'_>, buf: &mut [u8]) -> usize {
    let content = buf.len().saturating_sub(1);
    let mut total = state.produce_chunk(Some(&mut buf[..content])).unwrap_or(0);
    if let Some(terminator) = buf.get_mut(total) {
        *terminator = 0;
    }

    if let Some(rest) = state.produce_chunk(None) {
        tracing::trace!(written = total, truncated = rest, "bounded fill truncated");
        total += rest;
    }
    total
}

/// Streams the remaining output into `writer` through a window of
/// `window_size` bytes (clamped to `1..=MAX_WINDOW_SIZE`), returning the
/// number of bytes written.
///
/// # Errors
///
/// Returns [`Error::Io`] if the writer fails to accept a whole chunk. Bytes
/// of earlier chunks have already been written at that point.
pub fn drain_to_writer<W>(
    state: &mut FormatState<'_>,
    writer: &mut W,
    window_size: usize,
) -> Result<usize>
where
    W: io::Write + ?Sized,
{
    let mut window = [0u8; MAX_WINDOW_SIZE];
    let window = &mut window[..window_size.clamp(1, MAX_WINDOW_SIZE)];

    let mut total = 0;
    while let Some(n) = state.produce_chunk(Some(&mut window[..])) {
        writer.write_all(&window[..n]).map_err(|e| {
            tracing::debug!(error = %e, written = total, "sink rejected chunk");
            Error::io(&e.to_string())
        })?;
        total += n;
        tracing::trace!(chunk = n, total, "chunk written");
    }
    Ok(total)
}

/// Measures the output, rewinds, and renders it into an exactly sized `Vec`.
///
/// With [`FormatOptions::terminator`] set, a nul byte follows the content.
///
/// # Errors
///
/// Returns [`Error::Alloc`] if the buffer cannot be reserved; no partial
/// output is returned in that case.
///
/// # Examples
///
/// ```rust
/// use tagfmt::{args, sink, FormatOptions, FormatState};
///
/// let mut state = FormatState::new("{} {}", args!["some memory", 123]);
/// let bytes = sink::measure_then_allocate(&mut state, &FormatOptions::new()).unwrap();
/// assert_eq!(bytes, b"some memory 123\0");
/// ```
pub fn measure_then_allocate(
    state: &mut FormatState<'_>,
    options: &FormatOptions,
) -> Result<Vec<u8>> {
    state.reset();
    let size = state.produce_chunk(None).unwrap_or(0);
    state.reset();

    let capacity = size.saturating_add(usize::from(options.terminator));
    let mut out = Vec::new();
    out.try_reserve_exact(capacity).map_err(|e| {
        tracing::debug!(error = %e, capacity, "output allocation failed");
        Error::alloc(capacity)
    })?;
    out.resize(size, 0);

    let filled = state.produce_chunk(Some(&mut out[..])).unwrap_or(0);
    debug_assert_eq!(filled, size);
    out.truncate(filled);
    if options.terminator {
        out.push(0);
    }
    Ok(out)
}
