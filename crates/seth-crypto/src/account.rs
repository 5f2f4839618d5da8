//! Fresh keypair / address generation, the equivalent of the original
//! node's `accounts.NewAccount`.

use crate::ecdsa::{address_from_uncompressed_pubkey, generate_keypair};
use crate::errors::CryptoError;
use seth_common::Address;

/// A freshly generated account: its address and the raw key material
/// needed to sign on its behalf.
pub struct NewAccount {
    pub address: Address,
    pub public_key: [u8; 65],
    pub secret_key: [u8; 32],
}

/// Generates a new secp256k1 keypair and derives its address.
pub fn new_account() -> Result<NewAccount, CryptoError> {
    let (secret_key, public_key) = generate_keypair();
    let address = address_from_uncompressed_pubkey(&public_key)?;
    Ok(NewAccount {
        address,
        public_key,
        secret_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_produces_a_nonzero_address() {
        let acct = new_account().unwrap();
        assert!(!acct.address.is_zero());
    }

    #[test]
    fn two_new_accounts_are_distinct() {
        let a = new_account().unwrap();
        let b = new_account().unwrap();
        assert_ne!(a.address, b.address);
        assert_ne!(a.secret_key, b.secret_key);
    }
}
