//! Transaction output (vout) extractors and validators.

use crate::error::SPVError;
use crate::primitives::{bytes_to_u64, parse_var_int, reverse_endianness, safe_slice};
use crate::types::OutputKind;

/// The 8-byte value field, little-endian.
pub fn extract_value_le(output: &[u8]) -> Result<&[u8], SPVError> {
    safe_slice(output, 0, 8)
}

/// The output's value, in satoshis.
pub fn extract_value(output: &[u8]) -> Result<u64, SPVError> {
    let le = extract_value_le(output)?;
    Ok(bytes_to_u64(&reverse_endianness(le)))
}

/// The scriptPubkey's length, read as a single VarInt byte at offset 8.
/// Only meaningful when that length fits in one byte (`< 0xfd`); a longer
/// script reports its true multi-byte VarInt length through
/// [`determine_output_length`] instead.
pub fn extract_output_script_len(output: &[u8]) -> Result<u8, SPVError> {
    Ok(safe_slice(output, 8, 9)?[0])
}

/// The total byte length of this output: value + scriptPubkey length
/// prefix + scriptPubkey.
pub fn determine_output_length(output: &[u8]) -> Result<u64, SPVError> {
    if output.len() < 9 {
        return Err(SPVError::ReadOverrun);
    }
    let (varint_len, script_len) = parse_var_int(&output[8..])?;
    Ok(8 + 1 + varint_len as u64 + script_len)
}

/// Extracts the `index`-th output from a full vout buffer (VarInt count
/// followed by concatenated outputs).
pub fn extract_output_at_index(vout: &[u8], index: u64) -> Result<&[u8], SPVError> {
    let (varint_len, n) = parse_var_int(vout)?;
    if index >= n {
        return Err(SPVError::VoutIndexOverrun);
    }
    let mut offset = 1usize + varint_len as usize;
    let mut length = 0usize;
    for i in 0..=index {
        if offset > vout.len() {
            return Err(SPVError::VoutReadOverrun);
        }
        length = determine_output_length(&vout[offset..])
            .map_err(|_| SPVError::BadVarIntInScriptPubkey)? as usize;
        if i != index {
            offset += length;
        }
    }
    if offset + length > vout.len() {
        return Err(SPVError::VoutReadOverrun);
    }
    Ok(&vout[offset..offset + length])
}

/// Structurally validates a vout buffer. The declared output count must fit
/// in a single VarInt byte (`<= 0xfc`) and be nonzero, and walking that many
/// [`determine_output_length`]-sized outputs must land exactly on the end
/// of the buffer.
pub fn validate_vout(vout: &[u8]) -> bool {
    let (varint_len, n) = match parse_var_int(vout) {
        Ok(v) => v,
        Err(_) => return false,
    };
    if n > 0xfc {
        return false;
    }
    if n == 0 {
        return false;
    }
    let mut offset = 1usize + varint_len as usize;
    for _ in 0..n {
        if offset >= vout.len() {
            return false;
        }
        let len = match determine_output_length(&vout[offset..]) {
            Ok(l) => l as usize,
            Err(_) => return false,
        };
        offset += len;
    }
    offset == vout.len()
}

/// Extracts an OP_RETURN output's pushed data. Fails if the scriptPubkey
/// is not an OP_RETURN (tag byte `0x6a` at offset 9).
pub fn extract_op_return_data(output: &[u8]) -> Result<&[u8], SPVError> {
    let tag = safe_slice(output, 9, 10).map_err(|_| SPVError::NotOpReturn)?;
    if tag[0] != 0x6a {
        return Err(SPVError::NotOpReturn);
    }
    let data_len = safe_slice(output, 10, 11).map_err(|_| SPVError::OpReturnReadOverrun)?[0] as usize;
    safe_slice(output, 11, 11 + data_len).map_err(|_| SPVError::OpReturnReadOverrun)
}

/// Extracts the payload hash from a standard P2WPKH, P2WSH, P2PKH, or P2SH
/// output, validating that the scriptPubkey matches the expected template
/// exactly.
pub fn extract_hash(output: &[u8]) -> Result<&[u8], SPVError> {
    let len_byte = safe_slice(output, 8, 9).map_err(|_| SPVError::ReportedLengthMismatch)?[0];
    if len_byte as usize + 9 != output.len() {
        return Err(SPVError::ReportedLengthMismatch);
    }

    let tag = safe_slice(output, 9, 10).map_err(|_| SPVError::MalformattedOutput)?[0];
    if tag == 0 {
        let expected_len = len_byte
            .checked_sub(2)
            .ok_or(SPVError::MalformattedWitnessOutput)?;
        let declared_len = safe_slice(output, 10, 11)
            .map_err(|_| SPVError::MalformattedWitnessOutput)?[0];
        if declared_len != expected_len || (expected_len != 0x14 && expected_len != 0x20) {
            return Err(SPVError::MalformattedWitnessOutput);
        }
        return safe_slice(output, 11, 11 + expected_len as usize)
            .map_err(|_| SPVError::MalformattedWitnessOutput);
    }

    let template = safe_slice(output, 8, 11).map_err(|_| SPVError::MalformattedOutput)?;
    if template == [0x19, 0x76, 0xa9] {
        let push_len = safe_slice(output, 11, 12).map_err(|_| SPVError::MalformattedP2PKHOutput)?[0];
        let tail_start = output.len().saturating_sub(2);
        let tail = safe_slice(output, tail_start, output.len())
            .map_err(|_| SPVError::MalformattedP2PKHOutput)?;
        if push_len != 0x14 || tail != [0x88, 0xac] {
            return Err(SPVError::MalformattedP2PKHOutput);
        }
        return safe_slice(output, 12, 32).map_err(|_| SPVError::MalformattedP2PKHOutput);
    }

    if template == [0x17, 0xa9, 0x14] {
        let tail_start = output.len().saturating_sub(1);
        let tail = safe_slice(output, tail_start, output.len())
            .map_err(|_| SPVError::MalformattedP2SHOutput)?;
        if tail != [0x87] {
            return Err(SPVError::MalformattedP2SHOutput);
        }
        return safe_slice(output, 11, 31).map_err(|_| SPVError::MalformattedP2SHOutput);
    }

    Err(SPVError::MalformattedOutput)
}

/// Classifies an output's scriptPubkey shape, leniently: unlike
/// [`extract_hash`] this never fails, falling back to
/// [`OutputKind::Nonstandard`] for anything it doesn't recognize.
pub fn classify_output(output: &[u8]) -> OutputKind {
    let mut kind = OutputKind::default();

    if extract_op_return_data(output).is_ok() {
        kind = OutputKind::OpReturn;
    } else if let (Some(&len_byte), Ok(tag)) = (output.get(8), safe_slice(output, 9, 10)) {
        if len_byte as usize + 9 == output.len() && tag[0] == 0 {
            kind = match len_byte.checked_sub(2) {
                Some(0x14) => OutputKind::WPKH,
                Some(0x20) => OutputKind::WSH,
                _ => OutputKind::Nonstandard,
            };
        }
    }

    if kind == OutputKind::None {
        kind = match safe_slice(output, 8, 11) {
            Ok(t) if t == [0x19, 0x76, 0xa9] => OutputKind::PKH,
            Ok(t) if t == [0x17, 0xa9, 0x14] => OutputKind::SH,
            _ => OutputKind::Nonstandard,
        };
    }

    kind
}
