//! Loom shim so the ring can be model-checked with `--features loom`.
//!
//! Slot cells go through the same switch as the cursors, so loom tracks
//! every slot write and read and reports any access not ordered by a
//! cursor handoff.

#[cfg(feature = "loom")]
pub(crate) use loom::sync::atomic;

#[cfg(not(feature = "loom"))]
pub(crate) use std::sync::atomic;

#[cfg(feature = "loom")]
pub(crate) mod cell {
    pub(crate) use loom::cell::UnsafeCell;
}

#[cfg(not(feature = "loom"))]
pub(crate) mod cell {
    /// `std::cell::UnsafeCell` behind loom's closure-based access API.
    #[derive(Debug)]
    pub(crate) struct UnsafeCell<T>(std::cell::UnsafeCell<T>);

    impl<T> UnsafeCell<T> {
        #[inline]
        pub(crate) const fn new(data: T) -> Self {
            Self(std::cell::UnsafeCell::new(data))
        }

        #[inline]
        pub(crate) fn with<R>(&self, f: impl FnOnce(*const T) -> R) -> R {
            f(self.0.get())
        }

        #[inline]
        pub(crate) fn with_mut<R>(&self, f: impl FnOnce(*mut T) -> R) -> R {
            f(self.0.get())
        }
    }
}
