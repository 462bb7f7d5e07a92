//! Stream insertion and the compile-time probe for it.
//!
//! A type supports stream insertion when it implements [`StreamInsert`]:
//! it knows how to append its text to any `std::io::Write` target.
//! [`can_insert!`](crate::can_insert) answers, per type and at compile time,
//! whether that capability exists. The answer is decided by method
//! resolution on a zero-sized [`Probe`], so no value of the type is ever
//! needed and every type gets an answer.

use std::io;
use std::marker::PhantomData;

/// Append a value's textual representation to a stream.
///
/// # Example
///
/// ```
/// use std::io;
/// use streamfmt::StreamInsert;
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl StreamInsert for Point {
///     fn insert(&self, stream: &mut dyn io::Write) -> io::Result<()> {
///         write!(stream, "({},{})", self.x, self.y)
///     }
/// }
///
/// assert!(streamfmt::can_insert!(Point));
/// ```
pub trait StreamInsert {
    /// Write the representation of `self` to `stream`.
    fn insert(&self, stream: &mut dyn io::Write) -> io::Result<()>;
}

impl<T: StreamInsert + ?Sized> StreamInsert for &T {
    fn insert(&self, stream: &mut dyn io::Write) -> io::Result<()> {
        (**self).insert(stream)
    }
}

impl<T: StreamInsert + ?Sized> StreamInsert for Box<T> {
    fn insert(&self, stream: &mut dyn io::Write) -> io::Result<()> {
        (**self).insert(stream)
    }
}

// ============================================================================
// Probe
// ============================================================================

/// Zero-sized stand-in naming a type for the capability probe.
///
/// Never holds or constructs a `T`.
pub struct Probe<T: ?Sized>(PhantomData<fn(&T)>);

impl<T: ?Sized> Probe<T> {
    /// Name `T` for probing.
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: ?Sized> Default for Probe<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Probe answer when `T` implements [`StreamInsert`].
///
/// Implemented on `Probe<T>` itself, so method resolution tries it first.
pub trait InsertsKind {
    fn can_insert(&self) -> bool {
        true
    }
}

impl<T: StreamInsert + ?Sized> InsertsKind for Probe<T> {}

/// Probe answer for every other type.
///
/// Implemented on `&Probe<T>`, which is only reached after autoref.
pub trait FallbackKind {
    fn can_insert(&self) -> bool {
        false
    }
}

impl<T: ?Sized> FallbackKind for &Probe<T> {}

/// Whether a type supports stream insertion.
///
/// Evaluates to `true` exactly when the named type implements
/// [`StreamInsert`]. Resolved at compile time for concrete types; never
/// constructs a value.
///
/// ```
/// use streamfmt::can_insert;
///
/// struct Opaque;
///
/// assert!(!can_insert!(Opaque));
/// assert!(!can_insert!(str));
/// assert!(can_insert!(streamfmt::Json<u8>));
/// ```
#[macro_export]
macro_rules! can_insert {
    ($t:ty) => {{
        #[allow(unused_imports)]
        use $crate::probe::{FallbackKind as _, InsertsKind as _};
        (&$crate::probe::Probe::<$t>::new()).can_insert()
    }};
}
