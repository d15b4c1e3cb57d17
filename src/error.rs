use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Error {
    /// The random instruction is not usable on this processor.
    Unsupported,
    /// Every attempt allowed by the budget reported a hardware failure.
    Exhausted { retries: u32 },
    InvalidArgs(String),
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Unsupported => write!(f, "RDRAND is not supported on this CPU"),
            Error::Exhausted { retries } => {
                write!(f, "random value unavailable after {} retries", retries)
            }
            Error::InvalidArgs(msg) => write!(f, "invalid arguments: {}", msg),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}
