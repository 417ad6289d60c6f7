use crate::{Error, hex};
use core::fmt;

/// Longest accepted key string, in hex characters (256-bit key)
pub const MAX_KEY_HEX_LEN: usize = 64;

/// Shared secret container
///
/// Holds 1 to 32 raw key bytes. Key material is zeroed on drop when the
/// `zeroize` feature is enabled.
#[cfg_attr(feature = "zeroize", derive(zeroize::Zeroize, zeroize::ZeroizeOnDrop))]
pub struct SecretKey(Box<[u8]>);

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

impl SecretKey {
    /// Decodes an ASCII hex shared secret
    ///
    /// The length rounded down to even must not exceed 64 characters; a
    /// trailing odd character (e.g. a stray line ending) is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The key string is longer than 64 hex characters
    /// - A consumed character is not a hex digit
    /// - The key decodes to zero bytes
    pub fn from_hex<S: AsRef<str>>(secret: S) -> Result<Self, Error> {
        let input = secret.as_ref();
        let even_len = input.len() & !1;

        if even_len > MAX_KEY_HEX_LEN {
            return Err(Error::KeyTooLong(even_len));
        }

        let decoded = hex::decode(input)?;
        if decoded.is_empty() {
            return Err(Error::KeyEmpty);
        }

        Ok(Self(decoded.into_boxed_slice()))
    }

    /// Byte array key
    ///
    /// No length validation is performed
    pub fn from_bytes<S: AsRef<[u8]>>(secret: S) -> Self {
        Self(secret.as_ref().to_vec().into_boxed_slice())
    }

    /// Reference to the shared secret byte array
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Key length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the key has no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
