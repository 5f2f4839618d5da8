use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("crypto: invalid secret key")]
    InvalidSecretKey,
    #[error("crypto: invalid public key")]
    InvalidPublicKey,
    #[error("crypto: signature r is out of range [1, N)")]
    InvalidR,
    #[error("crypto: signature s is out of range [1, N/2]")]
    InvalidS,
    #[error("crypto: invalid recovery id {0}, expected 0 or 1")]
    InvalidRecoveryId(u8),
    #[error("crypto: recovered public key is not in uncompressed form")]
    NotUncompressed,
    #[error("crypto: secp256k1 operation failed: {0}")]
    Secp256k1(#[from] secp256k1::Error),
}
