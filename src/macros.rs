/// Captures up to nine arguments into an [`ArgList`](crate::ArgList).
///
/// Each argument is borrowed, so temporaries must outlive the list; inside the
/// `fmt_*` macros the list never escapes the statement. More than nine
/// arguments fail to compile.
///
/// ```rust
/// use tagfmt::args;
///
/// let count = 3u8;
/// let list = args![count, "apples", true];
/// assert_eq!(list.len(), 3);
/// assert!(args![].is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::ArgList::empty()
    };

    ($($arg:expr),+ $(,)?) => {
        $crate::ArgList::from_array([$($crate::Capture::capture(&$arg)),+])
    };
}

/// Bounded formatting into a byte buffer, `snprintf` style.
///
/// Expands to [`format_bounded`](crate::format_bounded) and returns the
/// untruncated length of the output.
///
/// ```rust
/// use tagfmt::fmt_sn;
///
/// let mut buf = [0u8; 5];
/// assert_eq!(fmt_sn!(&mut buf, "{}", "fghij"), 5);
/// assert_eq!(&buf, b"fghi\0");
/// ```
#[macro_export]
macro_rules! fmt_sn {
    ($buf:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::format_bounded($buf, $fmt, $crate::args![$($arg),*])
    };
}

/// Formatting into any [`std::io::Write`].
///
/// ```rust
/// use tagfmt::fmt_fprint;
///
/// let mut out = Vec::new();
/// let written = fmt_fprint!(&mut out, "{:-4}|", 7).unwrap();
/// assert_eq!(written, 5);
/// assert_eq!(out, b"7   |");
/// ```
#[macro_export]
macro_rules! fmt_fprint {
    ($writer:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::format_to_writer($writer, $fmt, $crate::args![$($arg),*])
    };
}

/// Formatting to standard output.
#[macro_export]
macro_rules! fmt_print {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::fmt_fprint!(::std::io::stdout().lock(), $fmt $(, $arg)*)
    };
}

/// Prints an expression and its value to standard output.
#[macro_export]
macro_rules! fmt_show {
    ($value:expr) => {
        $crate::fmt_print!(concat!("fmt_show(", stringify!($value), "): {}\n"), $value)
    };
}

/// Formatting into a freshly allocated, nul-terminated `Vec<u8>`.
///
/// ```rust
/// use tagfmt::fmt_alloc;
///
/// let bytes = fmt_alloc!("{} {}", "some memory", 123).unwrap();
/// assert_eq!(bytes, b"some memory 123\0");
/// ```
#[macro_export]
macro_rules! fmt_alloc {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::format_to_vec($fmt, $crate::args![$($arg),*])
    };
}
