use crate::errors::TypesError;
use seth_common::{Address, BigInt, Hash};
use seth_crypto::keccak256;
use seth_rlp::{Decodable, Encodable};

/// A block header. `Hash()` is a pure function of every field below; two
/// headers with identical field values always hash identically regardless
/// of how they were constructed.
///
/// `#[derive(Clone)]` already deep-copies `difficulty`/`number`/`time` and
/// `extra`, since `BigInt` and `Vec<u8>` own their storage -- there is no
/// shared backing buffer to alias, unlike a `*big.Int` pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub parent_hash: Hash,
    pub coinbase: Address,
    pub root: Hash,
    pub tx_hash: Hash,
    pub difficulty: BigInt,
    pub number: BigInt,
    pub time: BigInt,
    pub extra: Vec<u8>,
    pub mix_digest: Hash,
    pub nonce: [u8; 8],
}

impl Header {
    pub fn rlp_encode(&self) -> Result<Vec<u8>, TypesError> {
        let items = vec![
            self.parent_hash.rlp_encode(),
            self.coinbase.rlp_encode(),
            self.root.rlp_encode(),
            self.tx_hash.rlp_encode(),
            seth_rlp::encode_bigint(&self.difficulty)?,
            seth_rlp::encode_bigint(&self.number)?,
            seth_rlp::encode_bigint(&self.time)?,
            seth_rlp::encode_bytes(&self.extra),
            self.mix_digest.rlp_encode(),
            seth_rlp::encode_bytes(&self.nonce),
        ];
        Ok(seth_rlp::encode_list_items(&items))
    }

    pub fn hash(&self) -> Result<Hash, TypesError> {
        Ok(keccak256(&self.rlp_encode()?))
    }

    pub fn rlp_decode(data: &[u8]) -> Result<Self, TypesError> {
        let items = seth_rlp::split_into_items(data)?;
        if items.len() != 10 {
            return Err(TypesError::Codec(seth_rlp::RlpError::UnexpectedItemCount(
                items.len(),
            )));
        }
        let parent_hash = Hash::rlp_decode(items[0])?;
        let coinbase = Address::rlp_decode(items[1])?;
        let root = Hash::rlp_decode(items[2])?;
        let tx_hash = Hash::rlp_decode(items[3])?;
        let difficulty = seth_rlp::decode_bigint(items[4])?;
        let number = seth_rlp::decode_bigint(items[5])?;
        let time = seth_rlp::decode_bigint(items[6])?;
        let extra = seth_rlp::as_string(items[7])?.to_vec();
        let mix_digest = Hash::rlp_decode(items[8])?;
        let nonce_bytes = seth_rlp::as_string(items[9])?;
        if nonce_bytes.len() != 8 {
            return Err(TypesError::Codec(seth_rlp::RlpError::UnexpectedItemCount(
                nonce_bytes.len(),
            )));
        }
        let mut nonce = [0u8; 8];
        nonce.copy_from_slice(nonce_bytes);
        Ok(Header {
            parent_hash,
            coinbase,
            root,
            tx_hash,
            difficulty,
            number,
            time,
            extra,
            mix_digest,
            nonce,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Header {
        Header {
            parent_hash: Hash::zero(),
            coinbase: Address::zero(),
            root: Hash::from_bytes(&[1u8; 32]),
            tx_hash: Hash::from_bytes(&[2u8; 32]),
            difficulty: BigInt::from(17179869184u64),
            number: BigInt::from(0u32),
            time: BigInt::from(1700000000u64),
            extra: vec![0xde, 0xad, 0xbe, 0xef],
            mix_digest: Hash::zero(),
            nonce: [0, 0, 0, 0, 0, 0, 0, 66],
        }
    }

    #[test]
    fn header_round_trips_through_rlp() {
        let h = sample();
        let encoded = h.rlp_encode().unwrap();
        let decoded = Header::rlp_decode(&encoded).unwrap();
        assert_eq!(decoded, h);
        assert_eq!(decoded.hash().unwrap(), h.hash().unwrap());
    }

    #[test]
    fn hash_is_a_pure_function_of_fields_and_stable_across_clones() {
        let h = sample();
        let cloned = h.clone();
        assert_eq!(h.hash().unwrap(), cloned.hash().unwrap());
    }

    #[test]
    fn differing_fields_produce_differing_hashes() {
        let a = sample();
        let mut b = sample();
        b.number = BigInt::from(1u32);
        assert_ne!(a.hash().unwrap(), b.hash().unwrap());
    }

    #[test]
    fn mutating_a_clone_does_not_affect_the_original() {
        let original = sample();
        let mut cloned = original.clone();
        cloned.extra.push(0xff);
        cloned.difficulty = BigInt::from(999u32);
        assert_eq!(original.extra, vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(original.difficulty, BigInt::from(17179869184u64));
    }
}
