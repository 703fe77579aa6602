//! Trampolining for deeply recursive clause bodies
//!
//! A body that would recurse returns [`Bounce::Call`] with the next step
//! instead; [`trampoline`] runs the steps in a loop on a constant stack.

/// One step of a trampolined computation.
pub enum Bounce<T> {
    /// Finished with a value.
    Done(T),
    /// Run this thunk to get the next step.
    Call(Box<dyn FnOnce() -> Bounce<T>>),
}

impl<T> Bounce<T> {
    /// Defer `f` as the next step.
    pub fn call<F>(f: F) -> Self
    where
        F: FnOnce() -> Bounce<T> + 'static,
    {
        Self::Call(Box::new(f))
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Bounce<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Done(v) => f.debug_tuple("Done").field(v).finish(),
            Self::Call(_) => f.write_str("Call(..)"),
        }
    }
}

/// Run `bounce` until it is [`Bounce::Done`].
///
/// # Example
///
/// ```
/// use clausal::{trampoline, Bounce};
///
/// fn count_down(n: u64) -> Bounce<u64> {
///     if n == 0 {
///         Bounce::Done(0)
///     } else {
///         Bounce::call(move || count_down(n - 1))
///     }
/// }
///
/// assert_eq!(trampoline(count_down(1_000_000)), 0);
/// ```
pub fn trampoline<T>(mut bounce: Bounce<T>) -> T {
    loop {
        match bounce {
            Bounce::Done(value) => return value,
            Bounce::Call(next) => bounce = next(),
        }
    }
}
