use crate::errors::StateError;
use seth_common::BigInt;
use seth_rlp::{Decodable, Encodable};

/// An account record as stored in the state trie: `rlp([nonce, amount])`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub nonce: u64,
    pub amount: BigInt,
}

impl Account {
    pub fn zero() -> Self {
        Account {
            nonce: 0,
            amount: BigInt::from(0),
        }
    }

    pub fn rlp_encode(&self) -> Vec<u8> {
        let items = vec![
            self.nonce.rlp_encode(),
            seth_rlp::encode_bigint(&self.amount).expect("account amounts are never negative"),
        ];
        seth_rlp::encode_list_items(&items)
    }

    pub fn rlp_decode(data: &[u8]) -> Result<Self, StateError> {
        let items = seth_rlp::split_into_items(data)?;
        if items.len() != 2 {
            return Err(StateError::Codec(seth_rlp::RlpError::UnexpectedItemCount(
                items.len(),
            )));
        }
        let nonce = u64::rlp_decode(items[0])?;
        let amount = seth_rlp::decode_bigint(items[1])?;
        Ok(Account { nonce, amount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_account_round_trips() {
        let a = Account::zero();
        let encoded = a.rlp_encode();
        let decoded = Account::rlp_decode(&encoded).unwrap();
        assert_eq!(decoded, a);
    }

    #[test]
    fn populated_account_round_trips() {
        let a = Account {
            nonce: 7,
            amount: BigInt::from(123456789u64),
        };
        let encoded = a.rlp_encode();
        let decoded = Account::rlp_decode(&encoded).unwrap();
        assert_eq!(decoded, a);
    }
}
