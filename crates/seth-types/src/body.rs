use crate::errors::TypesError;
use crate::transaction::Transaction;

/// The ordered transaction list belonging to one block.
#[derive(Clone, Debug, Default)]
pub struct Body {
    pub transactions: Vec<Transaction>,
}

impl Body {
    pub fn rlp_encode(&self) -> Result<Vec<u8>, TypesError> {
        let mut items = Vec::with_capacity(self.transactions.len());
        for tx in &self.transactions {
            items.push(tx.rlp_encode()?);
        }
        Ok(seth_rlp::encode_list_items(&items))
    }

    pub fn rlp_decode(data: &[u8]) -> Result<Self, TypesError> {
        let items = seth_rlp::split_into_items(data)?;
        let transactions = items
            .into_iter()
            .map(Transaction::rlp_decode)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Body { transactions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seth_common::{Address, BigInt};

    #[test]
    fn empty_body_round_trips() {
        let body = Body::default();
        let encoded = body.rlp_encode().unwrap();
        let decoded = Body::rlp_decode(&encoded).unwrap();
        assert!(decoded.transactions.is_empty());
    }

    #[test]
    fn body_with_transactions_round_trips() {
        let body = Body {
            transactions: vec![
                Transaction::new(Address::from([1u8; 20]), BigInt::from(1u32), 0),
                Transaction::new(Address::from([2u8; 20]), BigInt::from(2u32), 1),
            ],
        };
        let encoded = body.rlp_encode().unwrap();
        let decoded = Body::rlp_decode(&encoded).unwrap();
        assert_eq!(decoded.transactions.len(), 2);
        assert_eq!(decoded.transactions[1].account_nonce, 1);
    }
}
