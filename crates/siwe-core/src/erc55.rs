//! ERC-55 mixed-case checksum addresses.
//!
//! The checksum hashes the ASCII text of the lowercased 40 hex digits and
//! upper-cases every alphabetic digit whose matching digest nibble is >= 8.

use crate::keccak::keccak256_bytes;

/// Length of `0x` followed by 40 hex digits.
const ADDRESS_LEN: usize = 42;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Erc55Error {
    #[error("toERC55: input must be hex string representing 20 bytes")]
    InvalidLength(usize),
    #[error("toERC55: address must begin with \"0x\"")]
    MissingPrefix,
    #[error("toERC55: invalid hex digit {found:?} at offset {offset}")]
    InvalidHexDigit { found: char, offset: usize },
}

/// Convert a `0x`-prefixed 20-byte hex address to its ERC-55 form.
pub fn to_erc55(address: &str) -> Result<String, Erc55Error> {
    let len = address.chars().count();
    if len != ADDRESS_LEN {
        return Err(Erc55Error::InvalidLength(len));
    }
    let Some(digits) = address.strip_prefix("0x") else {
        return Err(Erc55Error::MissingPrefix);
    };
    if let Some((i, found)) = digits.chars().enumerate().find(|(_, c)| !c.is_ascii_hexdigit()) {
        return Err(Erc55Error::InvalidHexDigit {
            found,
            offset: i + 2,
        });
    }

    let lower = digits.to_ascii_lowercase();
    let digest = keccak256_bytes(lower.as_bytes());

    let mut out = String::with_capacity(ADDRESS_LEN);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let byte = digest[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

/// True iff `address` is already in ERC-55 form. Never fails.
pub fn is_erc55(address: &str) -> bool {
    to_erc55(address).is_ok_and(|checksummed| checksummed == address)
}
