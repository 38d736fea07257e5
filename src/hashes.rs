//! Length-checked digest and header newtypes, plus the `MarkedDigest` trait
//! that ties a digest type to the byte width it is built from.

use crate::error::SPVError;
use crate::primitives::decode_hex;

/// A digest type produced by hashing over a specific byte width, and
/// constructible only through a length-checked factory.
pub trait MarkedDigest: Sized {
    /// The underlying fixed-size array this digest wraps.
    type Digest;

    /// Wraps a raw digest value.
    fn new(digest: Self::Digest) -> Self;

    /// Returns the wrapped raw digest value.
    fn internal(&self) -> Self::Digest;

    /// Returns the digest's bytes as an owned vector.
    fn bytes(&self) -> Vec<u8>;

    /// Returns a copy of this digest with its bytes reversed. Used to
    /// convert between the wire's little-endian convention and the
    /// big-endian convention used by block explorers and RPC interfaces.
    fn reversed(&self) -> Self;
}

macro_rules! fixed_bytes {
    ($(#[$outer:meta])* $name:ident, $len:expr) => {
        $(#[$outer])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
        pub struct $name([u8; $len]);

        impl $name {
            /// The exact length, in bytes, this type requires.
            pub const LEN: usize = $len;

            /// Wraps an already-sized byte array. Infallible: the type
            /// system guarantees the length.
            pub fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Builds an instance from a byte slice, failing if its length
            /// does not match exactly.
            pub fn from_slice(b: &[u8]) -> Result<Self, SPVError> {
                if b.len() != $len {
                    return Err(SPVError::WrongDigestLength {
                        expected: $len,
                        got: b.len(),
                    });
                }
                let mut buf = [0u8; $len];
                buf.copy_from_slice(b);
                Ok(Self(buf))
            }

            /// Builds an instance from a hex string, stripping an optional
            /// `0x`/`0X` prefix.
            pub fn from_hex(s: &str) -> Result<Self, SPVError> {
                Self::from_slice(&decode_hex(s)?)
            }

            /// Returns this value's bytes as a slice.
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            /// Renders as a `0x`-prefixed hex string.
            pub fn to_hex(&self) -> String {
                format!("0x{}", hex::encode(self.0))
            }
        }

        impl MarkedDigest for $name {
            type Digest = [u8; $len];

            fn new(digest: [u8; $len]) -> Self {
                Self(digest)
            }

            fn internal(&self) -> [u8; $len] {
                self.0
            }

            fn bytes(&self) -> Vec<u8> {
                self.0.to_vec()
            }

            fn reversed(&self) -> Self {
                let mut buf = self.0;
                buf.reverse();
                Self(buf)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s: String = serde::Deserialize::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

fixed_bytes!(
    /// A 32-byte double-SHA256 digest.
    Hash256Digest,
    32
);

fixed_bytes!(
    /// A 20-byte SHA256-then-RIPEMD160 digest.
    Hash160Digest,
    20
);

fixed_bytes!(
    /// An 80-byte serialized Bitcoin block header.
    RawHeader,
    80
);

/// A variable-length byte string, serialized as `0x`-prefixed hex.
///
/// Used for the loosely-bounded fields of an [`crate::proof::SPVProof`]
/// (`version`, `vin`, `vout`, `locktime`, `intermediate_nodes`) where a
/// fixed-width newtype doesn't apply.
#[derive(Clone, Eq, PartialEq, Hash, Default)]
pub struct HexBytes(Vec<u8>);

impl HexBytes {
    /// Wraps a byte vector.
    pub fn new(v: Vec<u8>) -> Self {
        Self(v)
    }

    /// Returns the wrapped bytes as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Parses a `0x`-prefixed (or bare) hex string.
    pub fn from_hex(s: &str) -> Result<Self, SPVError> {
        Ok(Self(decode_hex(s)?))
    }

    /// Renders as a `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }
}

impl AsRef<[u8]> for HexBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for HexBytes {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl std::fmt::Debug for HexBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HexBytes({})", self.to_hex())
    }
}

impl serde::Serialize for HexBytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for HexBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s: String = serde::Deserialize::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            Hash256Digest::from_slice(&[0u8; 31]),
            Err(SPVError::WrongDigestLength {
                expected: 32,
                got: 31
            })
        );
    }

    #[test]
    fn round_trips_hex() {
        let d = Hash256Digest::new([7u8; 32]);
        let hex = d.to_hex();
        assert_eq!(Hash256Digest::from_hex(&hex).unwrap(), d);
    }

    #[test]
    fn reversed_flips_bytes() {
        let d = Hash256Digest::new(std::array::from_fn(|i| i as u8));
        let r = d.reversed();
        assert_eq!(r.as_bytes()[0], 31);
        assert_eq!(r.as_bytes()[31], 0);
    }

    #[test]
    fn hex_bytes_round_trip() {
        let h = HexBytes::new(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(h.to_hex(), "0xdeadbeef");
        assert_eq!(HexBytes::from_hex("0xdeadbeef").unwrap(), h);
    }
}
