//! Opaque cursor encoding.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Errors raised while encoding or decoding cursors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    /// The ordering key could not be serialised.
    #[error("failed to encode cursor: {message}")]
    Encode {
        /// Serializer failure description.
        message: String,
    },
    /// The token is not valid URL-safe base64.
    #[error("cursor is not valid base64: {message}")]
    InvalidBase64 {
        /// Decoder failure description.
        message: String,
    },
    /// The decoded bytes do not describe the expected key shape.
    #[error("cursor payload is malformed: {message}")]
    Malformed {
        /// Deserializer failure description.
        message: String,
    },
}

/// Opaque pagination cursor wrapping an ordering key.
///
/// # Examples
/// ```
/// use pagination::Cursor;
///
/// let token = Cursor::new((42_i64, "b".to_owned())).encode().unwrap();
/// let decoded: Cursor<(i64, String)> = Cursor::decode(&token).unwrap();
/// assert_eq!(decoded.key(), &(42, "b".to_owned()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor<K> {
    key: K,
}

impl<K> Cursor<K> {
    /// Wrap an ordering key.
    pub const fn new(key: K) -> Self {
        Self { key }
    }

    /// Borrow the ordering key.
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Consume the cursor and return the ordering key.
    pub fn into_key(self) -> K {
        self.key
    }
}

impl<K: Serialize> Cursor<K> {
    /// Encode the key as URL-safe base64 JSON without padding.
    ///
    /// # Errors
    /// Returns [`CursorError::Encode`] when the key cannot be serialised.
    pub fn encode(&self) -> Result<String, CursorError> {
        let json = serde_json::to_vec(&self.key).map_err(|err| CursorError::Encode {
            message: err.to_string(),
        })?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }
}

impl<K: DeserializeOwned> Cursor<K> {
    /// Decode a token produced by [`Cursor::encode`].
    ///
    /// # Errors
    /// Returns [`CursorError::InvalidBase64`] or [`CursorError::Malformed`]
    /// when the token was not produced by this crate for the same key type.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|err| CursorError::InvalidBase64 {
                message: err.to_string(),
            })?;
        let key = serde_json::from_slice(&bytes).map_err(|err| CursorError::Malformed {
            message: err.to_string(),
        })?;
        Ok(Self { key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn encoded_token_is_url_safe() {
        let token = Cursor::new(vec!["??>>".to_owned(); 8])
            .encode()
            .expect("encode cursor");
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[rstest]
    #[case("%%%")]
    #[case("not base64!")]
    fn rejects_invalid_base64(#[case] token: &str) {
        let err = Cursor::<i64>::decode(token).expect_err("invalid token");
        assert!(matches!(err, CursorError::InvalidBase64 { .. }));
    }

    #[rstest]
    fn rejects_wrong_key_shape() {
        let token = Cursor::new("text").encode().expect("encode cursor");
        let err = Cursor::<(i64, i64)>::decode(&token).expect_err("wrong shape");
        assert!(matches!(err, CursorError::Malformed { .. }));
    }
}
