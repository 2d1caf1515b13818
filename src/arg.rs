//! Type-tagged argument capture.
//!
//! Every argument handed to the formatter is described by an [`Arg`]: a small
//! `Copy` value pairing a runtime type tag (the enum variant) with a borrow of
//! the caller's storage. Nothing is copied out of the caller's values; the
//! formatter reads them through the borrow while rendering.
//!
//! Builtin kinds cover the fixed-width integers, `bool`, `char`, strings and
//! opaque pointers. Anything else is an [`Arg::Custom`]: an open-ended
//! [`CustomTag`] plus a `&dyn Any` that a [`CustomFormatter`](crate::CustomFormatter)
//! can downcast.
//!
//! ## Capturing
//!
//! The [`Capture`] trait turns a value into its [`Arg`]. The [`args!`](crate::args)
//! macro captures a whole call site into an [`ArgList`] and rejects more than
//! [`MAX_ARGS`] arguments at compile time:
//!
//! ```rust
//! use tagfmt::{args, Arg};
//!
//! let name = String::from("Alice");
//! let list = args![42u8, "x", name];
//! assert_eq!(list.len(), 3);
//! assert!(matches!(list.get(0), Some(Arg::U8(&42))));
//! ```
//!
//! Caller-defined types implement [`Capture`] themselves:
//!
//! ```rust
//! use tagfmt::{Arg, Capture, CustomArg, CustomTag};
//!
//! struct Point { x: i32, y: i32 }
//!
//! impl Capture for Point {
//!     fn capture(&self) -> Arg<'_> {
//!         Arg::Custom(CustomArg::new(CustomTag(1), self))
//!     }
//! }
//! ```

use crate::{Error, Result};
use std::any::Any;
use std::fmt;

/// Maximum number of arguments a single format call accepts.
pub const MAX_ARGS: usize = 9;

/// Identifies a caller-registered argument type.
///
/// The formatter never interprets the number; it only forwards it to the
/// custom formatter so that one strategy can serve several types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomTag(pub u32);

/// A caller-defined argument: a tag plus a type-erased borrow of the value.
#[derive(Clone, Copy)]
pub struct CustomArg<'a> {
    tag: CustomTag,
    value: &'a dyn Any,
}

impl<'a> CustomArg<'a> {
    pub fn new<T: Any>(tag: CustomTag, value: &'a T) -> Self {
        CustomArg { tag, value }
    }

    #[must_use]
    pub fn tag(&self) -> CustomTag {
        self.tag
    }

    /// Returns the value if it is a `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagfmt::{CustomArg, CustomTag};
    ///
    /// let value = 2.5f64;
    /// let arg = CustomArg::new(CustomTag(7), &value);
    /// assert_eq!(arg.downcast_ref::<f64>(), Some(&2.5));
    /// assert_eq!(arg.downcast_ref::<f32>(), None);
    /// ```
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        self.value.downcast_ref::<T>()
    }

    /// Address of the borrowed value.
    #[must_use]
    pub fn address(&self) -> usize {
        (self.value as *const dyn Any).cast::<()>() as usize
    }
}

impl fmt::Debug for CustomArg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomArg")
            .field("tag", &self.tag)
            .field("address", &format_args!("{:#x}", self.address()))
            .finish()
    }
}

/// One captured argument: its runtime type and a view of its storage.
#[derive(Clone, Copy, Debug)]
pub enum Arg<'a> {
    I8(&'a i8),
    I16(&'a i16),
    I32(&'a i32),
    I64(&'a i64),
    Isize(&'a isize),
    U8(&'a u8),
    U16(&'a u16),
    U32(&'a u32),
    U64(&'a u64),
    Usize(&'a usize),
    Bool(&'a bool),
    Char(&'a char),
    Str(&'a str),
    Pointer(*const ()),
    Custom(CustomArg<'a>),
}

impl Arg<'_> {
    /// The argument viewed as an address, used by the `p` render mode.
    ///
    /// Pointers yield their address and strings the address of their bytes.
    /// Integers are reinterpreted as an unsigned 64-bit value (signed ones
    /// sign-extended first), booleans and characters yield their numeric value,
    /// and custom arguments the address of the referenced value.
    #[must_use]
    pub fn address(&self) -> u64 {
        match *self {
            Arg::I8(v) => *v as u64,
            Arg::I16(v) => *v as u64,
            Arg::I32(v) => *v as u64,
            Arg::I64(v) => *v as u64,
            Arg::Isize(v) => *v as u64,
            Arg::U8(v) => u64::from(*v),
            Arg::U16(v) => u64::from(*v),
            Arg::U32(v) => u64::from(*v),
            Arg::U64(v) => *v,
            Arg::Usize(v) => *v as u64,
            Arg::Bool(v) => u64::from(*v),
            Arg::Char(v) => u64::from(u32::from(*v)),
            Arg::Str(s) => s.as_ptr() as usize as u64,
            Arg::Pointer(p) => p as usize as u64,
            Arg::Custom(c) => c.address() as u64,
        }
    }

    /// Short name of the argument's type tag, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Arg::I8(_) => "i8",
            Arg::I16(_) => "i16",
            Arg::I32(_) => "i32",
            Arg::I64(_) => "i64",
            Arg::Isize(_) => "isize",
            Arg::U8(_) => "u8",
            Arg::U16(_) => "u16",
            Arg::U32(_) => "u32",
            Arg::U64(_) => "u64",
            Arg::Usize(_) => "usize",
            Arg::Bool(_) => "bool",
            Arg::Char(_) => "char",
            Arg::Str(_) => "str",
            Arg::Pointer(_) => "pointer",
            Arg::Custom(_) => "custom",
        }
    }
}

/// Conversion of a value into a type-tagged [`Arg`].
pub trait Capture {
    fn capture(&self) -> Arg<'_>;
}

macro_rules! impl_capture {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Capture for $ty {
                #[inline]
                fn capture(&self) -> Arg<'_> {
                    Arg::$variant(self)
                }
            }
        )*
    };
}

impl_capture! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    bool => Bool,
    char => Char,
    str => Str,
}

impl Capture for String {
    #[inline]
    fn capture(&self) -> Arg<'_> {
        Arg::Str(self.as_str())
    }
}

impl<T: ?Sized> Capture for *const T {
    #[inline]
    fn capture(&self) -> Arg<'_> {
        Arg::Pointer(self.cast::<()>())
    }
}

impl<T: ?Sized> Capture for *mut T {
    #[inline]
    fn capture(&self) -> Arg<'_> {
        Arg::Pointer(self.cast_const().cast::<()>())
    }
}

impl<T: Capture + ?Sized> Capture for &T {
    #[inline]
    fn capture(&self) -> Arg<'_> {
        (**self).capture()
    }
}

impl<T: Capture + ?Sized> Capture for &mut T {
    #[inline]
    fn capture(&self) -> Arg<'_> {
        (**self).capture()
    }
}

// Already-tagged values pass through, so foreign types can be captured as
// `CustomArg::new(tag, &value)` at the call site.
impl Capture for Arg<'_> {
    #[inline]
    fn capture(&self) -> Arg<'_> {
        *self
    }
}

impl Capture for CustomArg<'_> {
    #[inline]
    fn capture(&self) -> Arg<'_> {
        Arg::Custom(*self)
    }
}

/// The captured arguments of one format call, at most [`MAX_ARGS`] of them.
#[derive(Clone, Copy, Debug)]
pub struct ArgList<'a> {
    args: [Option<Arg<'a>>; MAX_ARGS],
    len: usize,
}

impl<'a> ArgList<'a> {
    /// An argument list with no arguments.
    #[must_use]
    pub const fn empty() -> Self {
        ArgList {
            args: [None; MAX_ARGS],
            len: 0,
        }
    }

    /// Captures a runtime-sized slice of arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyArguments`] if `args` holds more than [`MAX_ARGS`] entries.
    pub fn new(args: &[Arg<'a>]) -> Result<Self> {
        if args.len() > MAX_ARGS {
            return Err(Error::too_many_arguments(args.len(), MAX_ARGS));
        }
        let mut list = Self::empty();
        for (slot, arg) in list.args.iter_mut().zip(args) {
            *slot = Some(*arg);
        }
        list.len = args.len();
        Ok(list)
    }

    /// Captures a fixed-size array of arguments; more than [`MAX_ARGS`] fails to compile.
    #[must_use]
    pub fn from_array<const N: usize>(args: [Arg<'a>; N]) -> Self {
        const { assert!(N <= MAX_ARGS, "a format call accepts at most 9 arguments") };
        let mut list = Self::empty();
        for (slot, arg) in list.args.iter_mut().zip(args) {
            *slot = Some(arg);
        }
        list.len = N;
        list
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Arg<'a>> {
        self.args.get(index).copied().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Arg<'a>> + '_ {
        self.args[..self.len].iter().flatten().copied()
    }
}

impl Default for ArgList<'_> {
    fn default() -> Self {
        Self::empty()
    }
}
