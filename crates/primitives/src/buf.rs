use std::{fmt, str};

use alloy_primitives::FixedBytes;
use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ParseError;

macro_rules! impl_buf {
    ($name:ident, $len:expr) => {
        impl $name {
            pub const LEN: usize = $len;

            pub const fn new(data: [u8; $len]) -> Self {
                Self(FixedBytes(data))
            }

            pub const fn zero() -> Self {
                Self::new([0; $len])
            }

            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }

            pub fn as_slice(&self) -> &[u8] {
                self.0.as_slice()
            }

            pub fn to_bytes(&self) -> [u8; $len] {
                self.0 .0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                self.0.as_slice()
            }
        }

        impl AsRef<[u8; $len]> for $name {
            fn as_ref(&self) -> &[u8; $len] {
                &self.0 .0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(value: [u8; $len]) -> Self {
                Self(FixedBytes::from(value))
            }
        }

        impl From<FixedBytes<$len>> for $name {
            fn from(value: FixedBytes<$len>) -> Self {
                Self(value)
            }
        }

        impl From<$name> for [u8; $len] {
            fn from(value: $name) -> Self {
                value.0 .0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::zero()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut buf = [0; $len * 2];
                hex::encode_to_slice(self.0, &mut buf).expect("buf: enc hex");
                f.write_str(unsafe { str::from_utf8_unchecked(&buf) })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("0x")?;
                fmt::Debug::fmt(self, f)
            }
        }

        impl str::FromStr for $name {
            type Err = ParseError;

            /// Parses a hex string, with or without a `0x` prefix.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let digits = s
                    .strip_prefix("0x")
                    .or_else(|| s.strip_prefix("0X"))
                    .unwrap_or(s);
                let mut array = [0u8; $len];
                hex::decode_to_slice(digits, &mut array)
                    .map_err(|_| ParseError::InvalidHex(stringify!($name), s.to_owned()))?;
                Ok(Self::from(array))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }

        impl BorshSerialize for $name {
            fn serialize<W: std::io::prelude::Write>(&self, writer: &mut W) -> std::io::Result<()> {
                writer.write_all(self.0.as_slice())
            }
        }

        impl BorshDeserialize for $name {
            fn deserialize_reader<R: std::io::prelude::Read>(
                reader: &mut R,
            ) -> std::io::Result<Self> {
                let mut array = [0u8; $len];
                reader.read_exact(&mut array)?;
                Ok(Self(array.into()))
            }
        }

        impl<'a> Arbitrary<'a> for $name {
            fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
                let mut array = [0u8; $len];
                u.fill_buffer(&mut array)?;
                Ok(Self(array.into()))
            }
        }
    };
}

/// 20-byte buf, used for ledger account and contract addresses.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Buf20(pub FixedBytes<20>);
impl_buf!(Buf20, 20);

/// 32-byte buf, used for leaf hashes, tree nodes and roots.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Buf32(pub FixedBytes<32>);
impl_buf!(Buf32, 32);
