/// Generates a `From` implementation for an error type which boxes another error type.
///
/// # Examples
/// ```
/// # use std::io;
/// # use thiserror::Error;
/// # use datrip::from_error_boxed;
/// #[derive(Error, Debug)]
/// enum MyError {
///     #[error(transparent)]
///     Io(Box<io::Error>),
/// }
///
/// from_error_boxed!(MyError::Io, io::Error);
/// ```
#[macro_export]
macro_rules! from_error_boxed {
    ($enum:ident :: $name:ident, $err:ty) => {
        impl ::std::convert::From<$err> for $enum {
            fn from(err: $err) -> Self {
                Self::$name(::std::boxed::Box::new(err))
            }
        }
    };
}
