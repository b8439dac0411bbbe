use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Error type for blob unsealing
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("stored blob is not valid armor: {0}")]
    BadArmor(String),
}

/// At-rest encoding boundary for the store blob. The built-in armor is
/// base64 only; a deployment that wants real encryption plugs an AEAD
/// implementation in here without touching the gateway.
pub trait BlobCipher {
    fn seal(&self, plain: &[u8]) -> Vec<u8>;
    fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, VaultError>;
}

/// Base64 armoring: keeps the blob opaque to casual editing and gives the
/// sealed format a stable shape, with no confidentiality claim.
#[derive(Debug, Default)]
pub struct Base64Armor;

impl BlobCipher for Base64Armor {
    fn seal(&self, plain: &[u8]) -> Vec<u8> {
        STANDARD.encode(plain).into_bytes()
    }

    fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, VaultError> {
        let text = std::str::from_utf8(sealed).map_err(|e| VaultError::BadArmor(e.to_string()))?;
        STANDARD
            .decode(text.trim())
            .map_err(|e| VaultError::BadArmor(e.to_string()))
    }
}
