//! Error type shared by every marshaling operation.
//!
//! Errors are ordinary Rust values inside the crate. At the native entry point
//! they are turned into a Java exception with [`crate::env::JniEnv::throw_error`]
//! or [`crate::env::JniEnv::or_throw`], so a failed call surfaces on the Java
//! side instead of aborting the process.

pub use crate::tensor::Axis;
use std::ffi::NulError;
use std::io;
use thiserror::Error;

/// Errors raised while marshaling values across the JNI boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// Requested dimensions disagree with a buffer, or a write's input shape
    /// disagrees with the region it targets.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("channel mismatch: expected {expected} channels, found {found}")]
    ChannelMismatch { expected: usize, found: usize },

    #[error("unsupported rank {0}: expected a 2-D or 3-D source")]
    UnsupportedRank(usize),

    #[error("{axis} index {index} out of range for extent {extent}")]
    IndexOutOfRange { axis: Axis, index: i64, extent: usize },

    #[error("array handle is not pinned")]
    NotPinned,

    #[error("class not found: {0}")]
    ClassNotFound(String),

    #[error("method not found: {name}{signature}")]
    MethodNotFound { name: String, signature: String },

    #[error("field not found: {name} {signature}")]
    FieldNotFound { name: String, signature: String },

    #[error("unexpected null reference: {0}")]
    NullReference(&'static str),

    #[error("the JVM could not allocate {0}")]
    AllocationFailed(&'static str),

    /// A Java exception is pending on the current thread.
    #[error("a Java exception is pending")]
    PendingException,

    #[error("invalid type signature: {0}")]
    InvalidSignature(String),

    #[error("string contains an interior NUL byte")]
    InvalidString(#[from] NulError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        Error::ShapeMismatch(msg.into())
    }

    pub(crate) fn out_of_range(axis: Axis, index: i64, extent: usize) -> Self {
        Error::IndexOutOfRange { axis, index, extent }
    }

    /// Java exception class this error is raised as, or `None` when an
    /// exception is already pending and must be left in place.
    pub fn java_exception_class(&self) -> Option<&'static str> {
        match self {
            Error::PendingException => None,
            Error::IndexOutOfRange { .. } => Some("java/lang/IndexOutOfBoundsException"),
            Error::NotPinned => Some("java/lang/IllegalStateException"),
            Error::AllocationFailed(_) => Some("java/lang/OutOfMemoryError"),
            Error::Io(_) => Some("java/io/IOException"),
            _ => Some("java/lang/IllegalArgumentException"),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
