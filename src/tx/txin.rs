//! Transaction input (vin) extractors and validators.

use crate::error::SPVError;
use crate::hashes::{Hash256Digest, MarkedDigest};
use crate::primitives::{bytes_to_u64, parse_var_int, reverse_endianness, safe_slice};
use crate::types::InputKind;

/// The 36-byte outpoint (prev txid + prev index) at the start of an input.
pub fn extract_outpoint(input: &[u8]) -> Result<&[u8], SPVError> {
    safe_slice(input, 0, 36)
}

/// The previous transaction's TxID, little-endian.
pub fn extract_input_tx_id_le(input: &[u8]) -> Result<Hash256Digest, SPVError> {
    Hash256Digest::from_slice(safe_slice(input, 0, 32)?)
}

/// The previous transaction's TxID, big-endian (RPC/explorer convention).
pub fn extract_input_tx_id_be(input: &[u8]) -> Result<Hash256Digest, SPVError> {
    Ok(extract_input_tx_id_le(input)?.reversed())
}

/// The 4-byte output index being spent, little-endian.
pub fn extract_tx_index_le(input: &[u8]) -> Result<&[u8], SPVError> {
    safe_slice(input, 32, 36)
}

/// The output index being spent, as a host integer.
pub fn extract_tx_index(input: &[u8]) -> Result<u32, SPVError> {
    let le = extract_tx_index_le(input)?;
    Ok(bytes_to_u64(&reverse_endianness(le)) as u32)
}

/// True when the input's scriptSig length flag at byte 36 is nonzero,
/// indicating a legacy (non-witness) scriptSig follows.
pub fn is_legacy_input(input: &[u8]) -> Result<bool, SPVError> {
    Ok(safe_slice(input, 36, 37)?[0] != 0)
}

/// The scriptSig's VarInt length: `(extra_payload_length, scriptSig_length)`.
pub fn extract_script_sig_len(input: &[u8]) -> Result<(u8, u64), SPVError> {
    if input.len() < 37 {
        return Err(SPVError::ReadOverrun);
    }
    parse_var_int(&input[36..])
}

/// The scriptSig, including its length prefix.
pub fn extract_script_sig(input: &[u8]) -> Result<&[u8], SPVError> {
    let (extra_len, script_len) = extract_script_sig_len(input)?;
    let total = 1 + extra_len as usize + script_len as usize;
    safe_slice(input, 36, 36 + total)
}

/// The total byte length of this input: outpoint + scriptSig + sequence.
pub fn determine_input_length(input: &[u8]) -> Result<u64, SPVError> {
    let (extra_len, script_len) = extract_script_sig_len(input)?;
    Ok(41 + extra_len as u64 + script_len)
}

/// The 4-byte sequence number of a legacy input, little-endian.
pub fn extract_sequence_le_legacy(input: &[u8]) -> Result<&[u8], SPVError> {
    let (extra_len, script_len) = extract_script_sig_len(input)?;
    let offset = 36 + 1 + extra_len as usize + script_len as usize;
    safe_slice(input, offset, offset + 4)
}

/// The sequence number of a legacy input, as a host integer.
pub fn extract_sequence_legacy(input: &[u8]) -> Result<u32, SPVError> {
    let le = extract_sequence_le_legacy(input)?;
    Ok(bytes_to_u64(&reverse_endianness(le)) as u32)
}

/// The 4-byte sequence number of a witness input (empty scriptSig),
/// little-endian.
pub fn extract_sequence_le_witness(input: &[u8]) -> Result<&[u8], SPVError> {
    safe_slice(input, 37, 41)
}

/// The sequence number of a witness input, as a host integer.
pub fn extract_sequence_witness(input: &[u8]) -> Result<u32, SPVError> {
    let le = extract_sequence_le_witness(input)?;
    Ok(bytes_to_u64(&reverse_endianness(le)) as u32)
}

/// Extracts the `index`-th input from a full vin buffer (VarInt count
/// followed by concatenated inputs).
pub fn extract_input_at_index(vin: &[u8], index: u64) -> Result<&[u8], SPVError> {
    let (varint_len, n) = parse_var_int(vin)?;
    if index >= n {
        return Err(SPVError::VinIndexOverrun);
    }
    let mut offset = 1usize + varint_len as usize;
    let mut length = 0usize;
    for i in 0..=index {
        if offset > vin.len() {
            return Err(SPVError::VinReadOverrun);
        }
        length = determine_input_length(&vin[offset..])
            .map_err(|_| SPVError::BadVarIntInScriptSig)? as usize;
        if i != index {
            offset += length;
        }
    }
    if offset + length > vin.len() {
        return Err(SPVError::VinReadOverrun);
    }
    Ok(&vin[offset..offset + length])
}

/// Structurally validates a vin buffer: the declared input count must be
/// nonzero, and walking that many [`determine_input_length`]-sized inputs
/// must land exactly on the end of the buffer.
pub fn validate_vin(vin: &[u8]) -> bool {
    let (varint_len, n) = match parse_var_int(vin) {
        Ok(v) => v,
        Err(_) => return false,
    };
    if n == 0 {
        return false;
    }
    let mut offset = 1usize + varint_len as usize;
    for _ in 0..n {
        if offset >= vin.len() {
            return false;
        }
        let len = match determine_input_length(&vin[offset..]) {
            Ok(l) => l as usize,
            Err(_) => return false,
        };
        offset += len;
    }
    offset == vin.len()
}

/// Classifies an input's spending style by sniffing the scriptSig length
/// flag and, for non-witness inputs, the leading bytes of the scriptSig
/// itself (a compatibility/P2SH-wrapped witness input still carries an
/// empty-looking legacy scriptSig framing but pushes a witness program).
pub fn classify_input(input: &[u8]) -> Result<InputKind, SPVError> {
    let mut kind = InputKind::default();
    let tag = safe_slice(input, 36, 39)?;
    if tag[0] == 0 {
        kind = InputKind::Witness;
    } else if tag == [0x22, 0x00, 0x20] || tag == [0x16, 0x00, 0x14] {
        kind = InputKind::Compatibility;
    } else {
        kind = InputKind::Legacy;
    }
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_with_script_sig(sig: &[u8]) -> Vec<u8> {
        let mut v = vec![0xAB; 36];
        v.push(sig.len() as u8);
        v.extend_from_slice(sig);
        v.extend_from_slice(&[0xff, 0xff, 0xff, 0xff]);
        v
    }

    #[test]
    fn single_byte_script_sig_len() {
        let input = input_with_script_sig(&[0xee]);
        assert_eq!(extract_script_sig_len(&input).unwrap(), (0, 1));
        assert_eq!(extract_script_sig(&input).unwrap(), &[0x01, 0xee]);
    }

    #[test]
    fn eight_byte_varint_zero_script_sig_len() {
        let mut input = vec![0xAB; 36];
        input.push(0xff);
        input.extend_from_slice(&[0u8; 8]);
        input.extend_from_slice(&[0xff, 0xff, 0xff, 0xff]);
        assert_eq!(extract_script_sig_len(&input).unwrap(), (8, 0));
    }

    #[test]
    fn legacy_sequence_is_extracted() {
        let input = input_with_script_sig(&[]);
        assert_eq!(extract_sequence_legacy(&input).unwrap(), 0xffff_ffff);
    }

    #[test]
    fn witness_input_is_classified() {
        let mut input = vec![0xAB; 36];
        input.push(0x00);
        input.extend_from_slice(&[0u8; 4]);
        assert_eq!(classify_input(&input).unwrap(), InputKind::Witness);
    }

    #[test]
    fn legacy_input_is_classified() {
        let input = input_with_script_sig(&[0x47, 0x30]);
        assert_eq!(classify_input(&input).unwrap(), InputKind::Legacy);
    }

    #[test]
    fn validates_single_input_vin() {
        let input = input_with_script_sig(&[]);
        let mut vin = vec![0x01];
        vin.extend_from_slice(&input);
        assert!(validate_vin(&vin));
    }

    #[test]
    fn rejects_vin_with_trailing_garbage() {
        let input = input_with_script_sig(&[]);
        let mut vin = vec![0x01];
        vin.extend_from_slice(&input);
        vin.push(0xff);
        assert!(!validate_vin(&vin));
    }

    #[test]
    fn rejects_zero_count_vin() {
        assert!(!validate_vin(&[0x00]));
    }

    #[test]
    fn extracts_input_at_index() {
        let a = input_with_script_sig(&[0x01]);
        let b = input_with_script_sig(&[0x02, 0x02]);
        let mut vin = vec![0x02];
        vin.extend_from_slice(&a);
        vin.extend_from_slice(&b);
        assert_eq!(extract_input_at_index(&vin, 0).unwrap(), a.as_slice());
        assert_eq!(extract_input_at_index(&vin, 1).unwrap(), b.as_slice());
        assert_eq!(
            extract_input_at_index(&vin, 2),
            Err(SPVError::VinIndexOverrun)
        );
    }
}
