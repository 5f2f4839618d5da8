//! A small, self-contained implementation of canonical Recursive Length
//! Prefix (RLP) encoding, the wire format used for trie nodes, headers,
//! bodies and transactions throughout this workspace.
//!
//! This mirrors the handful of primitives go-ethereum's `rlp` package
//! exposes (`EncodeToBytes`, `SplitList`, `SplitString`, `CountValues`)
//! rather than pulling in an external codec: trie nodes here are plain
//! enums encoded by hand, not derived from struct field layout, so a full
//! reflection-based encoder would buy us nothing.

mod error;

pub use error::RlpError;

use num_bigint::{BigInt, Sign};
use num_traits::Signed;
use seth_common::{Address, Hash, ADDRESS_LENGTH, HASH_LENGTH};

/// Anything that can serialize itself to a canonical RLP byte string.
pub trait Encodable {
    fn rlp_encode(&self) -> Vec<u8>;
}

/// Anything that can be parsed back out of a single RLP item.
///
/// `data` must be exactly one encoded item (header + payload); trailing
/// bytes are rejected rather than silently ignored.
pub trait Decodable: Sized {
    fn rlp_decode(data: &[u8]) -> Result<Self, RlpError>;
}

pub fn encode_to_bytes<E: Encodable>(value: &E) -> Vec<u8> {
    value.rlp_encode()
}

pub fn decode_from_bytes<D: Decodable>(data: &[u8]) -> Result<D, RlpError> {
    D::rlp_decode(data)
}

// ---------------------------------------------------------------------
// Low-level header / length encoding
// ---------------------------------------------------------------------

fn strip_leading_zeros(b: &[u8]) -> &[u8] {
    let first = b.iter().position(|&x| x != 0).unwrap_or(b.len());
    &b[first..]
}

/// Encodes a length prefix: `offset` is `0x80` for strings, `0xc0` for lists.
pub fn encode_length(len: usize, offset: u8) -> Vec<u8> {
    if len < 56 {
        vec![offset + len as u8]
    } else {
        let len_bytes = len.to_be_bytes();
        let len_bytes = strip_leading_zeros(&len_bytes);
        let mut out = Vec::with_capacity(1 + len_bytes.len());
        out.push(offset + 55 + len_bytes.len() as u8);
        out.extend_from_slice(len_bytes);
        out
    }
}

/// Encodes a single byte string as a standalone RLP item.
pub fn encode_bytes(data: &[u8]) -> Vec<u8> {
    if data.len() == 1 && data[0] < 0x80 {
        vec![data[0]]
    } else {
        let mut out = encode_length(data.len(), 0x80);
        out.extend_from_slice(data);
        out
    }
}

/// Wraps a sequence of already-encoded items into an RLP list.
pub fn encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let payload_len: usize = items.iter().map(|i| i.len()).sum();
    let mut out = encode_length(payload_len, 0xc0);
    out.reserve(payload_len);
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

enum Kind {
    String,
    List,
}

struct PayloadInfo {
    header_len: usize,
    value_len: usize,
    kind: Kind,
}

fn be_bytes_to_len(b: &[u8]) -> Result<usize, RlpError> {
    if b.first() == Some(&0) {
        return Err(RlpError::NonCanonicalSize);
    }
    if b.len() > std::mem::size_of::<usize>() {
        return Err(RlpError::LengthOverflow);
    }
    let mut buf = [0u8; std::mem::size_of::<usize>()];
    buf[std::mem::size_of::<usize>() - b.len()..].copy_from_slice(b);
    Ok(usize::from_be_bytes(buf))
}

fn decode_header(data: &[u8]) -> Result<PayloadInfo, RlpError> {
    let b0 = *data.first().ok_or(RlpError::InputTooShort)?;
    if b0 < 0x80 {
        Ok(PayloadInfo {
            header_len: 0,
            value_len: 1,
            kind: Kind::String,
        })
    } else if b0 < 0xb8 {
        let len = (b0 - 0x80) as usize;
        require_len(data, 1, len)?;
        Ok(PayloadInfo {
            header_len: 1,
            value_len: len,
            kind: Kind::String,
        })
    } else if b0 < 0xc0 {
        let len_of_len = (b0 - 0xb7) as usize;
        require_len(data, 1, len_of_len)?;
        let value_len = be_bytes_to_len(&data[1..1 + len_of_len])?;
        if value_len < 56 {
            return Err(RlpError::NonCanonicalSize);
        }
        require_len(data, 1 + len_of_len, value_len)?;
        Ok(PayloadInfo {
            header_len: 1 + len_of_len,
            value_len,
            kind: Kind::String,
        })
    } else if b0 < 0xf8 {
        let len = (b0 - 0xc0) as usize;
        require_len(data, 1, len)?;
        Ok(PayloadInfo {
            header_len: 1,
            value_len: len,
            kind: Kind::List,
        })
    } else {
        let len_of_len = (b0 - 0xf7) as usize;
        require_len(data, 1, len_of_len)?;
        let value_len = be_bytes_to_len(&data[1..1 + len_of_len])?;
        if value_len < 56 {
            return Err(RlpError::NonCanonicalSize);
        }
        require_len(data, 1 + len_of_len, value_len)?;
        Ok(PayloadInfo {
            header_len: 1 + len_of_len,
            value_len,
            kind: Kind::List,
        })
    }
}

fn require_len(data: &[u8], header: usize, payload: usize) -> Result<(), RlpError> {
    if data.len() < header + payload {
        Err(RlpError::InputTooShort)
    } else {
        Ok(())
    }
}

/// Splits a single RLP string item into its payload and the remaining bytes.
pub fn split_string(data: &[u8]) -> Result<(&[u8], &[u8]), RlpError> {
    let info = decode_header(data)?;
    match info.kind {
        Kind::String => {
            let start = info.header_len;
            let end = start + info.value_len;
            Ok((&data[start..end], &data[end..]))
        }
        Kind::List => Err(RlpError::ExpectedString),
    }
}

/// Splits a single RLP list item into its payload (the concatenated,
/// still-encoded member items) and the remaining bytes.
pub fn split_list(data: &[u8]) -> Result<(&[u8], &[u8]), RlpError> {
    let info = decode_header(data)?;
    match info.kind {
        Kind::List => {
            let start = info.header_len;
            let end = start + info.value_len;
            Ok((&data[start..end], &data[end..]))
        }
        Kind::String => Err(RlpError::ExpectedList),
    }
}

/// Counts the number of top-level items encoded back-to-back in `data`.
pub fn count_values(mut data: &[u8]) -> Result<usize, RlpError> {
    let mut n = 0usize;
    while !data.is_empty() {
        let info = decode_header(data)?;
        let total = info.header_len + info.value_len;
        data = &data[total..];
        n += 1;
    }
    Ok(n)
}

/// Splits the payload of an RLP list into the encoded byte ranges of each
/// of its member items, without recursively decoding them.
pub fn split_into_items(data: &[u8]) -> Result<Vec<&[u8]>, RlpError> {
    let (content, _) = split_list(data)?;
    let mut out = Vec::new();
    let mut rest = content;
    while !rest.is_empty() {
        let info = decode_header(rest)?;
        let total = info.header_len + info.value_len;
        out.push(&rest[..total]);
        rest = &rest[total..];
    }
    Ok(out)
}

/// Decodes a single RLP-encoded string item, rejecting trailing bytes.
pub fn as_string(data: &[u8]) -> Result<&[u8], RlpError> {
    let (s, rest) = split_string(data)?;
    if !rest.is_empty() {
        return Err(RlpError::TrailingBytes);
    }
    Ok(s)
}

// ---------------------------------------------------------------------
// Encodable / Decodable for the primitives we actually need
// ---------------------------------------------------------------------

impl Encodable for [u8] {
    fn rlp_encode(&self) -> Vec<u8> {
        encode_bytes(self)
    }
}

impl Encodable for Vec<u8> {
    fn rlp_encode(&self) -> Vec<u8> {
        encode_bytes(self)
    }
}

impl Encodable for u64 {
    fn rlp_encode(&self) -> Vec<u8> {
        if *self == 0 {
            encode_bytes(&[])
        } else {
            let bytes = self.to_be_bytes();
            encode_bytes(strip_leading_zeros(&bytes))
        }
    }
}

impl Decodable for u64 {
    fn rlp_decode(data: &[u8]) -> Result<Self, RlpError> {
        let b = as_string(data)?;
        if b.len() > 8 {
            return Err(RlpError::LengthOverflow);
        }
        if b.first() == Some(&0) {
            return Err(RlpError::NonCanonicalSize);
        }
        let mut buf = [0u8; 8];
        buf[8 - b.len()..].copy_from_slice(b);
        Ok(u64::from_be_bytes(buf))
    }
}

impl Encodable for Hash {
    fn rlp_encode(&self) -> Vec<u8> {
        encode_bytes(self.as_bytes())
    }
}

impl Decodable for Hash {
    fn rlp_decode(data: &[u8]) -> Result<Self, RlpError> {
        let b = as_string(data)?;
        if b.len() != HASH_LENGTH {
            return Err(RlpError::LengthOverflow);
        }
        Ok(Hash::from_bytes(b))
    }
}

impl Encodable for Address {
    fn rlp_encode(&self) -> Vec<u8> {
        encode_bytes(self.as_bytes())
    }
}

impl Decodable for Address {
    fn rlp_decode(data: &[u8]) -> Result<Self, RlpError> {
        let b = as_string(data)?;
        if b.len() != ADDRESS_LENGTH {
            return Err(RlpError::LengthOverflow);
        }
        Ok(Address::from_bytes(b))
    }
}

/// Encodes a non-negative [`BigInt`] as its minimal big-endian byte string,
/// matching go-ethereum's refusal to RLP-encode negative integers.
pub fn encode_bigint(n: &BigInt) -> Result<Vec<u8>, RlpError> {
    if n.is_negative() {
        return Err(RlpError::NegativeBigInt);
    }
    if n.is_zero_value() {
        return Ok(encode_bytes(&[]));
    }
    let (_, bytes) = n.to_bytes_be();
    Ok(encode_bytes(&bytes))
}

/// Decodes a single RLP string item as a non-negative [`BigInt`].
pub fn decode_bigint(data: &[u8]) -> Result<BigInt, RlpError> {
    let b = as_string(data)?;
    if b.first() == Some(&0) {
        return Err(RlpError::NonCanonicalSize);
    }
    Ok(BigInt::from_bytes_be(Sign::Plus, b))
}

trait IsZeroValue {
    fn is_zero_value(&self) -> bool;
}

impl IsZeroValue for BigInt {
    fn is_zero_value(&self) -> bool {
        use num_traits::Zero;
        self.is_zero()
    }
}

/// Wraps already-encoded item byte strings into an RLP list and re-encodes
/// the empty-string placeholder (`0x80`) for `None`.
pub fn encode_list_items(items: &[Vec<u8>]) -> Vec<u8> {
    encode_list(items)
}

pub const EMPTY_STRING_CODE: u8 = 0x80;
pub const EMPTY_LIST_CODE: u8 = 0xc0;

pub fn empty_string_item() -> Vec<u8> {
    vec![EMPTY_STRING_CODE]
}
