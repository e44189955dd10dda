use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey};

use crate::error::{AppError, AppResult};

/// Decrypts the opaque request bodies of the recommendation endpoints.
///
/// Kept behind a trait so deployments that terminate crypto at a gateway (and
/// the handler tests) can substitute the implementation.
pub trait BodyCipher: Send + Sync {
    /// Decrypts a base64 ciphertext into the plaintext request body
    fn decrypt(&self, ciphertext: &str) -> AppResult<String>;
}

/// RSA PKCS#1 v1.5 body decryption with the process private key
pub struct RsaBodyCipher {
    key: RsaPrivateKey,
}

impl RsaBodyCipher {
    /// Parses a PEM private key, accepting both PKCS#8 and PKCS#1 encodings
    pub fn from_pem(pem: &str) -> AppResult<Self> {
        let key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|e| AppError::Crypto(format!("Invalid RSA private key: {}", e)))?;
        Ok(Self { key })
    }
}

impl BodyCipher for RsaBodyCipher {
    fn decrypt(&self, ciphertext: &str) -> AppResult<String> {
        let raw = BASE64
            .decode(ciphertext.trim())
            .map_err(|e| AppError::Crypto(format!("Ciphertext is not valid base64: {}", e)))?;

        let plaintext = self
            .key
            .decrypt(Pkcs1v15Encrypt, &raw)
            .map_err(|e| AppError::Crypto(format!("RSA decryption failed: {}", e)))?;

        String::from_utf8(plaintext)
            .map_err(|e| AppError::Crypto(format!("Decrypted body is not UTF-8: {}", e)))
    }
}
