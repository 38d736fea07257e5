//! TxID calculation and end-to-end SPV proof validation.

use crate::error::SPVError;
use crate::hashes::{Hash256Digest, HexBytes};
use crate::header::BitcoinHeader;
use crate::merkle::verify_hash256_merkle;
use crate::primitives::hash256;
use crate::tx::txin::validate_vin;
use crate::tx::txout::validate_vout;

/// Computes a transaction's TxID: `hash256(version ++ vin ++ vout ++ locktime)`.
pub fn calculate_tx_id(version: &[u8], vin: &[u8], vout: &[u8], locktime: &[u8]) -> Hash256Digest {
    let mut buf = Vec::with_capacity(version.len() + vin.len() + vout.len() + locktime.len());
    buf.extend_from_slice(version);
    buf.extend_from_slice(vin);
    buf.extend_from_slice(vout);
    buf.extend_from_slice(locktime);
    hash256(&buf)
}

/// Checks that `tx_id` is included under `merkle_root` via `intermediate_nodes`
/// at `index`. Shortcuts to `true` for a single-transaction block, where
/// the TxID and merkle root coincide.
pub fn prove(
    tx_id: Hash256Digest,
    merkle_root: Hash256Digest,
    intermediate_nodes: &[u8],
    index: u64,
) -> bool {
    if tx_id == merkle_root && index == 0 && intermediate_nodes.is_empty() {
        return true;
    }
    let mut proof = Vec::with_capacity(32 + intermediate_nodes.len() + 32);
    proof.extend_from_slice(tx_id.as_bytes());
    proof.extend_from_slice(intermediate_nodes);
    proof.extend_from_slice(merkle_root.as_bytes());
    verify_hash256_merkle(&proof, index)
}

/// A full proof that a transaction is included in a confirmed block: the
/// transaction's serialized parts, its claimed TxID, the header it's
/// confirmed in, and the merkle path connecting the two.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SPVProof {
    /// The transaction's 4-byte version field.
    pub version: HexBytes,
    /// The transaction's full vin (VarInt count + inputs).
    pub vin: HexBytes,
    /// The transaction's full vout (VarInt count + outputs).
    pub vout: HexBytes,
    /// The transaction's 4-byte locktime field.
    pub locktime: HexBytes,
    /// The transaction's claimed TxID, little-endian.
    pub tx_id: Hash256Digest,
    /// The transaction's index within the confirming block.
    pub index: u32,
    /// The header the transaction is confirmed in.
    pub confirming_header: BitcoinHeader,
    /// The merkle siblings connecting `tx_id` to `confirming_header.merkle_root`.
    pub intermediate_nodes: HexBytes,
}

impl SPVProof {
    /// Validates every claim this proof makes: that its vin and vout are
    /// well-formed, that they (with version/locktime) hash to the claimed
    /// TxID, that the confirming header is internally consistent, and that
    /// the TxID is actually included under the header's merkle root.
    pub fn validate(&self) -> Result<(), SPVError> {
        if !validate_vin(self.vin.as_slice()) {
            return Err(SPVError::InvalidVin);
        }
        if !validate_vout(self.vout.as_slice()) {
            return Err(SPVError::InvalidVout);
        }

        let tx_id = calculate_tx_id(
            self.version.as_slice(),
            self.vin.as_slice(),
            self.vout.as_slice(),
            self.locktime.as_slice(),
        );
        if tx_id != self.tx_id {
            return Err(SPVError::WrongTxID);
        }

        self.confirming_header.validate()?;

        if !prove(
            self.tx_id,
            self.confirming_header.merkle_root,
            self.intermediate_nodes.as_slice(),
            self.index as u64,
        ) {
            return Err(SPVError::InvalidMerkleProof);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashes::RawHeader;

    fn minimal_tx() -> (Vec<u8>, Vec<u8>, Vec<u8>, Vec<u8>) {
        let version = vec![1, 0, 0, 0];
        let locktime = vec![0, 0, 0, 0];
        // One input: 36-byte outpoint + empty scriptSig + sequence.
        let mut vin = vec![0x01];
        vin.extend_from_slice(&[0xAB; 36]);
        vin.push(0x00);
        vin.extend_from_slice(&[0xff; 4]);
        // One P2PKH output.
        let mut vout = vec![0x01];
        vout.extend_from_slice(&[0u8; 8]);
        vout.push(0x19);
        vout.extend_from_slice(&[0x76, 0xa9, 0x14]);
        vout.extend_from_slice(&[0x11; 20]);
        vout.extend_from_slice(&[0x88, 0xac]);
        (version, vin, vout, locktime)
    }

    #[test]
    fn prove_accepts_single_transaction_block() {
        let tx_id = Hash256Digest::new([9u8; 32]);
        assert!(prove(tx_id, tx_id, &[], 0));
    }

    #[test]
    fn prove_rejects_mismatched_single_transaction_block() {
        let tx_id = Hash256Digest::new([9u8; 32]);
        let root = Hash256Digest::new([8u8; 32]);
        assert!(!prove(tx_id, root, &[], 0));
    }

    #[test]
    fn validates_full_single_transaction_proof() {
        let (version, vin, vout, locktime) = minimal_tx();
        let tx_id = calculate_tx_id(&version, &vin, &vout, &locktime);

        let mut raw = [0u8; 80];
        raw[36..68].copy_from_slice(tx_id.as_bytes());
        let header = BitcoinHeader::new(RawHeader::new(raw), 100).unwrap();

        let proof = SPVProof {
            version: HexBytes::new(version),
            vin: HexBytes::new(vin),
            vout: HexBytes::new(vout),
            locktime: HexBytes::new(locktime),
            tx_id,
            index: 0,
            confirming_header: header,
            intermediate_nodes: HexBytes::new(vec![]),
        };

        assert!(proof.validate().is_ok());
    }

    #[test]
    fn rejects_proof_with_wrong_tx_id() {
        let (version, vin, vout, locktime) = minimal_tx();
        let tx_id = calculate_tx_id(&version, &vin, &vout, &locktime);

        let mut raw = [0u8; 80];
        raw[36..68].copy_from_slice(tx_id.as_bytes());
        let header = BitcoinHeader::new(RawHeader::new(raw), 100).unwrap();

        let proof = SPVProof {
            version: HexBytes::new(version),
            vin: HexBytes::new(vin),
            vout: HexBytes::new(vout),
            locktime: HexBytes::new(locktime),
            tx_id: Hash256Digest::new([0xAA; 32]),
            index: 0,
            confirming_header: header,
            intermediate_nodes: HexBytes::new(vec![]),
        };

        assert_eq!(proof.validate(), Err(SPVError::WrongTxID));
    }
}
