//! Error types for blashal

use thiserror::Error;

/// Result type alias using blashal's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while dispatching a BLAS routine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The device backend refused to create a native context.
    ///
    /// Fatal for that device, not for the process. Never retried.
    #[error("{backend} backend unavailable for device {device}: {reason}")]
    BackendUnavailable {
        /// Backend name
        backend: &'static str,
        /// Device identifier
        device: usize,
        /// Reason reported by the backend
        reason: String,
    },

    /// A dimension, stride or product of both does not fit the native index type
    #[error("Overflow in argument '{arg}': {value} exceeds the native index range")]
    Overflow {
        /// The argument name
        arg: &'static str,
        /// The offending value (saturated when the product itself overflowed)
        value: i128,
    },

    /// Invalid argument provided to a routine
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// A buffer is shorter than the elements the routine would touch
    #[error("Buffer '{arg}' too small: routine touches {required} elements, buffer holds {len}")]
    BufferTooSmall {
        /// The argument name
        arg: &'static str,
        /// Elements required by the access pattern
        required: usize,
        /// Elements held by the buffer
        len: usize,
    },

    /// The native library returned a failure status during the interop call
    #[error("Native routine {routine} failed: {status}")]
    SynchronousNative {
        /// Native routine symbol
        routine: &'static str,
        /// Native status description
        status: String,
    },

    /// A native failure surfaced after control returned to the caller
    #[error("Asynchronous failure in {routine}: {status}")]
    AsynchronousNative {
        /// Routine whose task failed
        routine: &'static str,
        /// Native status description
        status: String,
    },

    /// Backend plumbing failure outside a native routine
    #[error("Backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Create an overflow error
    pub fn overflow(arg: &'static str, value: impl Into<i128>) -> Self {
        Self::Overflow {
            arg,
            value: value.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Create a native status error
    pub fn native(routine: &'static str, status: impl std::fmt::Debug) -> Self {
        Self::SynchronousNative {
            routine,
            status: format!("{:?}", status),
        }
    }

    /// Create a backend-unavailable error
    pub fn backend_unavailable(
        backend: &'static str,
        device: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::BackendUnavailable {
            backend,
            device,
            reason: reason.into(),
        }
    }

    /// Re-classify an error captured inside a deferred task.
    ///
    /// Native status failures become `AsynchronousNative`; every other kind
    /// keeps its identity and only changes delivery channel.
    pub fn into_asynchronous(self, routine: &'static str) -> Self {
        match self {
            Self::SynchronousNative { status, .. } => Self::AsynchronousNative { routine, status },
            other => other,
        }
    }

    /// Whether this error was delivered through the asynchronous channel
    pub fn is_asynchronous(&self) -> bool {
        matches!(self, Self::AsynchronousNative { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_error_becomes_asynchronous() {
        let err = Error::native("cpu_asum", "bad stride").into_asynchronous("asum");
        assert!(err.is_asynchronous());
        match err {
            Error::AsynchronousNative { routine, status } => {
                assert_eq!(routine, "asum");
                assert_eq!(status, "\"bad stride\"");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_validation_errors_keep_identity() {
        let err = Error::overflow("incx", i64::MAX).into_asynchronous("scal");
        assert_eq!(err, Error::overflow("incx", i64::MAX));
        assert!(!err.is_asynchronous());
    }

    #[test]
    fn test_display() {
        let err = Error::BufferTooSmall {
            arg: "x",
            required: 10,
            len: 4,
        };
        assert_eq!(
            err.to_string(),
            "Buffer 'x' too small: routine touches 10 elements, buffer holds 4"
        );
    }
}
