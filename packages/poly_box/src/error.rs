use thiserror::Error;

/// Errors that can occur when operating on a [`PolyBox`][crate::PolyBox].
#[derive(Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The operation needed an owned object but the handle was empty.
    ///
    /// Copying from, or dereferencing, an empty handle through the checked API yields this
    /// error instead of panicking.
    #[error("{operation} requires an owned object but the handle is empty")]
    EmptySource {
        /// Name of the operation that was attempted on the empty handle.
        operation: &'static str,
    },
}

/// A specialized `Result` type for `poly_box` operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn empty_source_names_operation() {
        let error = Error::EmptySource {
            operation: "try_clone",
        };

        let message = error.to_string();
        assert!(message.contains("try_clone"));
        assert!(message.contains("empty"));
    }
}
