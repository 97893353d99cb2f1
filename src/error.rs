// MIT/Apache2 License

use std::{fmt, io};

/// Sum error type for easel operations.
#[derive(Debug)]
pub enum Error {
    /// A static string message.
    StaticMsg(&'static str),
    /// A string message.
    Msg(String),
    /// Attempted to run an operation the surface does not support.
    NotSupported(NSOpType),
    /// A layout constant failed validation.
    BadConstant {
        /// The name of the offending constant.
        name: &'static str,
        /// The value it was given.
        value: f32,
    },
    /// A surface restore was requested without a matching save.
    UnbalancedRestore,
}

/// An operation that a `Surface` might not support.
#[derive(Debug, Copy, Clone)]
pub enum NSOpType {
    Text,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaticMsg(s) => f.write_str(s),
            Self::Msg(s) => f.write_str(s),
            Self::NotSupported(nsop) => {
                write!(f, "Surface does not support feature \"{:?}\"", nsop)
            }
            Self::BadConstant { name, value } => {
                write!(f, "Layout constant \"{}\" has invalid value {}", name, value)
            }
            Self::UnbalancedRestore => {
                f.write_str("Surface state was restored more often than it was saved")
            }
        }
    }
}

impl From<io::Error> for Error {
    #[inline]
    fn from(ioe: io::Error) -> Self {
        Self::Msg(ioe.to_string())
    }
}

/// Convenience result type.
pub type Result<T = ()> = std::result::Result<T, Error>;
