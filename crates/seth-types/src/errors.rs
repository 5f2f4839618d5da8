use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("types: rlp codec error: {0}")]
    Codec(#[from] seth_rlp::RlpError),
    #[error("types: invalid chain id for this signer")]
    InvalidChainID,
    #[error("types: invalid transaction r, s or v values")]
    InvalidSignature,
    #[error("types: recovered public key is not in uncompressed form")]
    InvalidPublicKey,
    #[error("types: crypto error: {0}")]
    Crypto(#[from] seth_crypto::CryptoError),
}
