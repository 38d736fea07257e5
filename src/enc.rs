//! Base58Check and Bech32 address encoding for standard output templates.
//!
//! These encoders sit outside the core extraction/validation pipeline: they
//! turn a hash already extracted by [`crate::tx::txout::extract_hash`] into
//! the human-facing address string for mainnet.

use base58check::ToBase58Check;
use bech32::{ToBase32, Variant};

use crate::error::SPVError;
use crate::hashes::{Hash160Digest, Hash256Digest};

const MAINNET_P2PKH_VERSION: u8 = 0x00;
const MAINNET_P2SH_VERSION: u8 = 0x05;
const MAINNET_HRP: &str = "bc";

fn reject_all_zero(payload: &[u8]) -> Result<(), SPVError> {
    if payload.iter().all(|&b| b == 0) {
        Err(SPVError::ZeroBytesEncoded)
    } else {
        Ok(())
    }
}

/// Encodes a 20-byte hash as a mainnet P2PKH (`1...`) address.
pub fn encode_p2pkh(hash: &Hash160Digest) -> Result<String, SPVError> {
    reject_all_zero(hash.as_bytes())?;
    Ok(hash.as_bytes().to_base58check(MAINNET_P2PKH_VERSION))
}

/// Encodes a 20-byte hash as a mainnet P2SH (`3...`) address.
pub fn encode_p2sh(hash: &Hash160Digest) -> Result<String, SPVError> {
    reject_all_zero(hash.as_bytes())?;
    Ok(hash.as_bytes().to_base58check(MAINNET_P2SH_VERSION))
}

/// Encodes a 20-byte witness program as a mainnet P2WPKH (`bc1...`) address.
pub fn encode_p2wpkh(hash: &Hash160Digest) -> Result<String, SPVError> {
    encode_segwit_v0(hash.as_bytes())
}

/// Encodes a 32-byte witness program as a mainnet P2WSH (`bc1...`) address.
pub fn encode_p2wsh(hash: &Hash256Digest) -> Result<String, SPVError> {
    encode_segwit_v0(hash.as_bytes())
}

fn encode_segwit_v0(payload: &[u8]) -> Result<String, SPVError> {
    reject_all_zero(payload)?;
    let version = bech32::u5::try_from_u8(0).expect("0 always fits in a u5");
    let mut data = vec![version];
    data.extend(payload.to_base32());
    bech32::encode(MAINNET_HRP, data, Variant::Bech32)
        .map_err(|e| SPVError::EncodingError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_p2pkh_address() {
        // Genesis coinbase output's pubkey hash.
        let hash = Hash160Digest::from_hex("0x62e907b15cbf27d5425399ebf6f0fb50ebb88f18").unwrap();
        assert_eq!(encode_p2pkh(&hash).unwrap(), "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa");
    }

    #[test]
    fn rejects_all_zero_payload() {
        let hash = Hash160Digest::new([0u8; 20]);
        assert_eq!(encode_p2pkh(&hash), Err(SPVError::ZeroBytesEncoded));
        assert_eq!(encode_p2wpkh(&hash), Err(SPVError::ZeroBytesEncoded));
    }

    #[test]
    fn encodes_p2wpkh_address() {
        let mut bytes = [0u8; 20];
        bytes[19] = 1;
        let hash = Hash160Digest::new(bytes);
        let addr = encode_p2wpkh(&hash).unwrap();
        assert!(addr.starts_with("bc1"));
    }
}
