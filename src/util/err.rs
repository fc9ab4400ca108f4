/// Converts errors from their error type (of the submodule) to that of
/// a `mapc::Error` variant, or to a variant of another error enum.
///
/// ```rust,ignore
/// use mapc::road::error::RoadError;
/// mapc::impl_err!(RoadError, Road);
/// mapc::impl_err!(FieldWidth, RoadError, Width);
/// ```
pub mod err_macro {
    #[macro_export]
    macro_rules! impl_err {
        ($from:ty, $variant:ident) => {
            impl From<$from> for $crate::Error {
                fn from(value: $from) -> Self {
                    $crate::Error::$variant(value)
                }
            }
        };
        ($from:ty, $to:ty, $variant:ident) => {
            impl From<$from> for $to {
                fn from(value: $from) -> Self {
                    <$to>::$variant(value)
                }
            }
        };
    }

    pub use impl_err;
}
