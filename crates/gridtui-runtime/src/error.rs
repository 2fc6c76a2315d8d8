#![forbid(unsafe_code)]

use std::fmt;
use std::io;

/// Errors from the terminal boundary and the event source.
///
/// Geometry and painting never fail; only the outside world does.
#[derive(Debug)]
pub enum Error {
    /// I/O failure while talking to the terminal.
    Io(io::Error),
    /// The terminal could not be initialized. Rendering cannot proceed.
    Init(Box<dyn std::error::Error + Send + Sync>),
    /// An event source is already live in this process.
    AlreadySubscribed,
    /// The event source has shut down.
    Disconnected,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Init(err) => write!(f, "terminal init failed: {err}"),
            Self::AlreadySubscribed => f.write_str("an event source is already subscribed"),
            Self::Disconnected => f.write_str("event source disconnected"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Init(err) => Some(err.as_ref()),
            Self::AlreadySubscribed | Self::Disconnected => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Standard result type for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_messages() {
        let err = Error::Init(Box::new(io::Error::other("no tty")));
        assert_eq!(err.to_string(), "terminal init failed: no tty");
        assert!(err.source().is_some());
        assert_eq!(
            Error::AlreadySubscribed.to_string(),
            "an event source is already subscribed"
        );
        assert!(Error::Disconnected.source().is_none());
    }

    #[test]
    fn io_converts() {
        let err: Error = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
    }
}
