//! Core types, statistics and configuration for filmtrack

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod stats;
pub mod types;

/// Simple error context handling for binaries
pub mod context_error {
    use std::{error::Error as StdError, fmt};

    /// A simple error type that can wrap any error with context
    #[derive(Debug)]
    pub struct ContextError {
        source: Option<Box<dyn StdError + Send + Sync>>,
        message: String,
    }

    impl ContextError {
        /// Create a new context error from a message
        pub fn new<S: Into<String>>(message: S) -> Self {
            Self {
                source: None,
                message: message.into(),
            }
        }

        /// Create a new context error from an existing error with context
        pub fn with_context<E, S>(error: E, message: S) -> Self
        where
            E: StdError + Send + Sync + 'static,
            S: Into<String>,
        {
            Self {
                source: Some(Box::new(error)),
                message: message.into(),
            }
        }
    }

    impl fmt::Display for ContextError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.message)
        }
    }

    impl StdError for ContextError {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn StdError + 'static))
        }
    }

    /// Result type alias for context errors
    pub type Result<T> = std::result::Result<T, ContextError>;

    /// Create a context error from a message or format string
    #[macro_export]
    macro_rules! context_error {
        ($msg:literal) => {
            $crate::context_error::ContextError::new($msg)
        };
        ($fmt:expr, $($arg:tt)*) => {
            $crate::context_error::ContextError::new(format!($fmt, $($arg)*))
        };
    }

    /// Extension trait for adding context to results
    pub trait ResultExt<T> {
        /// Add context to an error
        fn with_context<F, S>(self, f: F) -> Result<T>
        where
            F: FnOnce() -> S,
            S: Into<String>;
    }

    impl<T, E> ResultExt<T> for std::result::Result<T, E>
    where
        E: StdError + Send + Sync + 'static,
    {
        fn with_context<F, S>(self, f: F) -> Result<T>
        where
            F: FnOnce() -> S,
            S: Into<String>,
        {
            self.map_err(|e| ContextError::with_context(e, f()))
        }
    }

    impl From<std::io::Error> for ContextError {
        fn from(err: std::io::Error) -> Self {
            Self::with_context(err, "I/O operation failed")
        }
    }

    impl From<crate::Error> for ContextError {
        fn from(err: crate::Error) -> Self {
            let message = err.to_string();
            Self::with_context(err, message)
        }
    }
}

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use stats::{FilmStats, GenreCount};
pub use types::{Film, FilmId, NewFilm};

/// Initialize the logging system
///
/// `RUST_LOG` wins over the configured level. The `format` field selects JSON
/// or plain text output.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(logging: &config::LoggingConfig) -> context_error::Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| crate::context_error!("Failed to initialize logging: {}", e))
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::context_error::{ContextError, ResultExt};
    use std::error::Error as _;

    #[test]
    fn test_context_error_wraps_source() {
        let failed: Result<(), std::io::Error> = Err(std::io::Error::other("disk gone"));

        let err = failed.with_context(|| "Failed to read seed file").unwrap_err();

        assert_eq!(err.to_string(), "Failed to read seed file");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_context_error_macro() {
        let err: ContextError = crate::context_error!("Invalid address: {}", "nowhere");
        assert_eq!(err.to_string(), "Invalid address: nowhere");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_from_core_error() {
        let err = ContextError::from(crate::Error::Other("boom".to_string()));
        assert_eq!(err.to_string(), "boom");
        assert!(err.source().is_some());
    }
}
