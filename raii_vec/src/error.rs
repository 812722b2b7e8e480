//! Error types reported by [`DynamicArray`](crate::DynamicArray).

use std::error::Error;
use std::fmt;

/// Allocation failed, or the requested capacity overflowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Allocation failed")
    }
}

impl Error for AllocError {}

/// A push that could not grow the array.
///
/// The rejected value is handed back so the caller decides what happens to it.
#[derive(Clone, PartialEq, Eq)]
pub struct PushError<T> {
    value: T,
    source: AllocError,
}

impl<T> PushError<T> {
    pub(crate) fn new(value: T, source: AllocError) -> Self {
        Self { value, source }
    }

    /// Recover the value that was not pushed.
    pub fn into_inner(self) -> T {
        self.value
    }
}

// Manual impl so `T` does not need to be `Debug`.
impl<T> fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushError")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "push failed: array is full and could not grow")
    }
}

impl<T> Error for PushError<T> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Element-wise addition on operands that are empty or differ in length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeError {
    /// Item count of the left operand.
    pub left: usize,
    /// Item count of the right operand.
    pub right: usize,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.left == 0 || self.right == 0 {
            write!(f, "cannot add empty arrays ({} and {} items)", self.left, self.right)
        } else {
            write!(
                f,
                "cannot add arrays of unequal length ({} and {} items)",
                self.left, self.right
            )
        }
    }
}

impl Error for ShapeError {}
