//! Parsing and validation for Bitcoin SPV proofs.
//!
//! This crate pulls apart raw Bitcoin transactions and block headers,
//! verifies merkle inclusion proofs, and validates header chains by
//! proof-of-work, without depending on a full node or a UTXO set. It is a
//! parsing and validation library, not a wallet: callers are responsible
//! for sourcing the bytes it consumes (e.g. from an Electrum server or a
//! block explorer) and for deciding how much cumulative difficulty
//! constitutes "confirmed" for their use case.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod enc;
pub mod error;
pub mod hashes;
pub mod header;
pub mod merkle;
pub mod primitives;
pub mod proof;
pub mod target;
pub mod tx;
pub mod types;

pub use error::{SPVError, SPVResult};
pub use hashes::{Hash160Digest, Hash256Digest, HexBytes, MarkedDigest, RawHeader};
pub use header::{validate_header_chain, BitcoinHeader};
pub use proof::SPVProof;
pub use target::U256;
pub use types::{InputKind, OutputKind};
