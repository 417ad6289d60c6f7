use core::fmt;
use core::num::ParseIntError;

/// Error type
///
/// Every variant is a validation failure detected before the search starts.
/// Running out of counters is not an error, see [`crate::Resync::search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The two passcodes have different lengths
    PasscodeLengthMismatch(usize, usize),
    /// Passcode length outside the 6-9 digit range
    PasscodeLength(usize),
    /// Key string longer than 64 hex characters (256 bits)
    KeyTooLong(usize),
    /// Key decoded to zero bytes
    KeyEmpty,
    /// Key contains a character outside `0-9A-Fa-f`
    DecodeError,
    /// Hash algorithm name not recognised
    UnknownAlgorithm(String),
    /// A counter value could not be parsed
    InvalidNumber(ParseIntError),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidNumber(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PasscodeLengthMismatch(..) => write!(f, "passcode lengths differ"),
            Self::PasscodeLength(_) => write!(f, "bad HOTP passcode length"),
            Self::KeyTooLong(_) | Self::KeyEmpty | Self::DecodeError => write!(f, "key is invalid"),
            Self::UnknownAlgorithm(name) => write!(f, "unknown algorithm: {name}"),
            Self::InvalidNumber(e) => write!(f, "invalid counter value: {e}"),
        }
    }
}

impl From<ParseIntError> for Error {
    fn from(e: ParseIntError) -> Self {
        Self::InvalidNumber(e)
    }
}
