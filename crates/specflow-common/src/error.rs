//! Error conversion macros
//!
//! Saves writing `impl From<X> for Error` by hand for wrapping variants.

/// Implement `From<Source>` for a single-field enum variant.
///
/// # Example
///
/// ```
/// use specflow_common::impl_error_from;
///
/// #[derive(Debug)]
/// enum StoreError {
///     Io(std::io::Error),
///     Message(String),
/// }
///
/// impl_error_from!(std::io::Error => StoreError::Io);
/// impl_error_from!(std::fmt::Error => StoreError::Message, |e| e.to_string());
///
/// let err: StoreError = std::fmt::Error.into();
/// assert!(matches!(err, StoreError::Message(_)));
/// ```
#[macro_export]
macro_rules! impl_error_from {
    ($source:ty => $target:ident::$variant:ident) => {
        impl From<$source> for $target {
            fn from(err: $source) -> Self {
                $target::$variant(err)
            }
        }
    };

    ($source:ty => $target:ident::$variant:ident, |$e:ident| $transform:expr) => {
        impl From<$source> for $target {
            fn from($e: $source) -> Self {
                $target::$variant($transform)
            }
        }
    };
}
