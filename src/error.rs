//! The single error type returned by every fallible operation in this crate.

use thiserror::Error;

/// Errors produced while parsing or validating Bitcoin wire data.
///
/// Every variant corresponds to a deterministic rejection of malformed or
/// inconsistent input; none of them indicate a bug in the caller's use of
/// the library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SPVError {
    /// A requested byte range exceeded the bounds of the input.
    #[error("Read overrun")]
    ReadOverrun,

    /// The VarInt prefix claimed more payload bytes than the input has.
    #[error("Read overrun during VarInt parsing")]
    VarIntReadOverrun,

    /// `ExtractInputAtIndex` was called with an index beyond the declared vin count.
    #[error("Vin read overrun")]
    VinIndexOverrun,

    /// `ExtractOutputAtIndex` was called with an index beyond the declared vout count.
    #[error("Vout read overrun")]
    VoutIndexOverrun,

    /// A scriptSig length VarInt inside a vin could not be parsed.
    #[error("Bad VarInt in scriptSig")]
    BadVarIntInScriptSig,

    /// A scriptPubkey length VarInt inside a vout could not be parsed.
    #[error("Bad VarInt in scriptPubkey")]
    BadVarIntInScriptPubkey,

    /// Walking the vin to a requested index ran past the end of the buffer.
    #[error("Read overrun when parsing vin")]
    VinReadOverrun,

    /// Walking the vout to a requested index ran past the end of the buffer.
    #[error("Read overrun when parsing vout")]
    VoutReadOverrun,

    /// The declared length of a fixed-size digest did not match its input.
    #[error("Expected {expected} bytes, got {got}")]
    WrongDigestLength {
        /// The required length.
        expected: usize,
        /// The length actually supplied.
        got: usize,
    },

    /// Hex decoding failed. The message mirrors Go's `encoding/hex` error text,
    /// since fixtures in this ecosystem are shared across implementations.
    #[error("{0}")]
    BadHex(String),

    /// An output's scriptPubkey is not an OP_RETURN output.
    #[error("Not an op return")]
    NotOpReturn,

    /// An OP_RETURN output claimed more data than the buffer contains.
    #[error("Malformatted data. Read overrun")]
    OpReturnReadOverrun,

    /// byte[8] (the scriptPubkey length) did not match the output's actual length.
    #[error("Reported length mismatch")]
    ReportedLengthMismatch,

    /// A witness (P2WPKH/P2WSH) output's shape did not match its declared length.
    #[error("Maliciously formatted witness output")]
    MalformattedWitnessOutput,

    /// A P2PKH output's shape did not match the standard template.
    #[error("Maliciously formatted p2pkh output")]
    MalformattedP2PKHOutput,

    /// A P2SH output's shape did not match the standard template.
    #[error("Maliciously formatted p2sh output")]
    MalformattedP2SHOutput,

    /// An output's scriptPubkey did not match any known template.
    #[error("Nonstandard, OP_RETURN, or malformatted output")]
    MalformattedOutput,

    /// The raw header buffer is not a multiple of 80 bytes.
    #[error("Header bytes not multiple of 80")]
    HeaderChainBadLength,

    /// A header's prevhash did not match the previous header's hash.
    #[error("Header bytes not a valid chain")]
    HeaderChainDiscontiguous,

    /// A header's hash did not satisfy the difficulty target it declares.
    #[error("Header does not meet its own difficulty target")]
    HeaderInsufficientWork,

    /// A `BitcoinHeader`'s cached hash did not match the hash of its raw bytes.
    #[error("Hash is not the correct hash of the header")]
    WrongHeaderHash,

    /// A `BitcoinHeader`'s cached merkle root did not match its raw bytes.
    #[error("MerkleRoot is not the correct merkle root of the header")]
    WrongMerkleRoot,

    /// A `BitcoinHeader`'s cached prevhash did not match its raw bytes.
    #[error("Prevhash is not the correct parent hash of the header")]
    WrongPrevHash,

    /// An `SPVProof`'s vin failed structural validation.
    #[error("Vin is not valid")]
    InvalidVin,

    /// An `SPVProof`'s vout failed structural validation.
    #[error("Vout is not valid")]
    InvalidVout,

    /// An `SPVProof`'s version/vin/vout/locktime did not hash to its declared TxID.
    #[error("Version, Vin, Vout and Locktime did not yield correct TxID")]
    WrongTxID,

    /// An `SPVProof`'s intermediate nodes did not connect its TxID to the header's merkle root.
    #[error("Merkle Proof is not valid")]
    InvalidMerkleProof,

    /// An address encoder was given an all-zero payload, almost always a sign
    /// that the caller forgot to initialize it.
    #[error("Attempting to encode empty bytestring. Hint: your payload may not be properly initialized")]
    ZeroBytesEncoded,

    /// A `bech32` or `base58check` library error, passed through unchanged.
    #[error("{0}")]
    EncodingError(String),
}

/// A `Result` defaulting to [`SPVError`].
pub type SPVResult<T> = Result<T, SPVError>;
