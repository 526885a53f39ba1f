//! Earned badge records and their canonical leaf encoding.

use std::fmt;

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{
    buf::{Buf20, Buf32},
    constants::BADGE_ENCODED_LEN,
    errors::EncodingError,
    hash,
};

/// One earned badge as reported by the indexer.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub struct BadgeRecord {
    winner: Buf20,
    badge_definition_number: i8,
}

impl BadgeRecord {
    pub fn new(winner: Buf20, badge_definition_number: i8) -> Self {
        Self {
            winner,
            badge_definition_number,
        }
    }

    /// Builds a record from the loosely typed values the indexer hands back.
    pub fn try_from_raw(winner: &str, badge_definition_number: i64) -> Result<Self, EncodingError> {
        let winner = winner.parse::<Buf20>()?;
        let badge_definition_number = i8::try_from(badge_definition_number)
            .map_err(|_| EncodingError::DefinitionOutOfRange(badge_definition_number))?;
        Ok(Self::new(winner, badge_definition_number))
    }

    pub fn winner(&self) -> &Buf20 {
        &self.winner
    }

    pub fn badge_definition_number(&self) -> i8 {
        self.badge_definition_number
    }

    /// Packed encoding: the 20 address bytes followed by the definition number
    /// as a single two's complement byte.
    pub fn encode(&self) -> [u8; BADGE_ENCODED_LEN] {
        let mut buf = [0u8; BADGE_ENCODED_LEN];
        buf[..Buf20::LEN].copy_from_slice(self.winner.as_slice());
        buf[Buf20::LEN] = self.badge_definition_number.to_be_bytes()[0];
        buf
    }

    /// Computes the leaf committed to for this record.
    pub fn leaf_hash(&self) -> Buf32 {
        hash::raw(&self.encode())
    }
}

impl fmt::Display for BadgeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.winner, self.badge_definition_number)
    }
}

/// Parses a definition number that may arrive as a decimal string.
pub fn parse_definition_number(s: &str) -> Result<i64, EncodingError> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| EncodingError::DefinitionNotInteger(s.to_owned()))
}
