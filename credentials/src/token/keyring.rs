use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use crate::token::claims::Claims;
use crate::token::errors::TokenError;

/// Signing algorithm used by a [`Keyring`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAlgorithm {
    HS256,
    HS512,
}

impl From<TokenAlgorithm> for Algorithm {
    fn from(algorithm: TokenAlgorithm) -> Self {
        match algorithm {
            TokenAlgorithm::HS256 => Algorithm::HS256,
            TokenAlgorithm::HS512 => Algorithm::HS512,
        }
    }
}

/// Signs and verifies access tokens with a shared secret.
///
/// Verification enforces the expiration and not-before claims; a token
/// outside its validity window never verifies successfully.
#[derive(Clone)]
pub struct Keyring {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: TokenAlgorithm,
}

impl Keyring {
    /// Creates a keyring signing with HMAC-SHA256.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_algorithm(secret, TokenAlgorithm::HS256)
    }

    /// Creates a keyring signing with the given algorithm.
    pub fn with_algorithm(secret: &[u8], algorithm: TokenAlgorithm) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
        }
    }

    pub fn algorithm(&self) -> TokenAlgorithm {
        self.algorithm
    }

    /// Signs the claims into a compact token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if serialization or signing fails.
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm.into());

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies a compact token and returns its claims.
    ///
    /// # Errors
    ///
    /// * [`TokenError::Expired`] - The expiration time lies in the past.
    /// * [`TokenError::NotYetValid`] - The not-before time lies in the future.
    /// * [`TokenError::InvalidSignature`] - The signature does not match.
    /// * [`TokenError::Malformed`] - The token could not be parsed, or was
    ///   signed with a different algorithm.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm.into());
        validation.validate_nbf = true;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::ImmatureSignature => TokenError::NotYetValid,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn test_sign_and_verify_round_trip() {
        let keyring = Keyring::new(SECRET);
        let claims = Claims::for_user("42", "alice", 24).with_role("admin");

        let token = keyring.sign(&claims).unwrap();
        let verified = keyring.verify(&token).unwrap();

        assert_eq!(verified, claims);
    }

    #[test]
    fn test_hs512_round_trip() {
        let keyring = Keyring::with_algorithm(SECRET, TokenAlgorithm::HS512);
        let claims = Claims::for_user("42", "alice", 24);

        let token = keyring.sign(&claims).unwrap();
        let verified = keyring.verify(&token).unwrap();

        assert_eq!(verified, claims);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let keyring = Keyring::new(SECRET);
        // Well past the default verification leeway.
        let claims =
            Claims::for_user("42", "alice", 1).with_expiration(Utc::now().timestamp() - 3600);

        let token = keyring.sign(&claims).unwrap();

        assert_eq!(keyring.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_not_yet_valid_token_is_rejected() {
        let keyring = Keyring::new(SECRET);
        let claims =
            Claims::for_user("42", "alice", 2).with_not_before(Utc::now().timestamp() + 3600);

        let token = keyring.sign(&claims).unwrap();

        assert_eq!(keyring.verify(&token), Err(TokenError::NotYetValid));
    }

    #[test]
    fn test_token_signed_with_other_key_is_rejected() {
        let keyring = Keyring::new(SECRET);
        let other = Keyring::new(b"another_secret_another_secret_ab");
        let claims = Claims::for_user("42", "alice", 24);

        let token = other.sign(&claims).unwrap();

        assert_eq!(keyring.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_spliced_signature_is_rejected() {
        let keyring = Keyring::new(SECRET);
        let other = Keyring::new(b"another_secret_another_secret_ab");
        let claims = Claims::for_user("42", "alice", 24);

        let token = keyring.sign(&claims).unwrap();
        let forged_signature = other.sign(&claims).unwrap();
        let tampered = format!(
            "{}.{}",
            token.rsplit_once('.').unwrap().0,
            forged_signature.rsplit_once('.').unwrap().1,
        );

        assert_eq!(
            keyring.verify(&tampered),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let keyring = Keyring::new(SECRET);

        assert!(matches!(
            keyring.verify("not-a-token"),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_algorithm_mismatch_is_rejected() {
        let hs256 = Keyring::new(SECRET);
        let hs512 = Keyring::with_algorithm(SECRET, TokenAlgorithm::HS512);
        let claims = Claims::for_user("42", "alice", 24);

        let token = hs512.sign(&claims).unwrap();

        assert!(hs256.verify(&token).is_err());
    }
}
