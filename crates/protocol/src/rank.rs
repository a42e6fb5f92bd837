//! Difficulty ranks and their reward table.
//!
//! A [`Rank`] is the ordered difficulty tier of a dungeon, from `E` (lowest)
//! to `S` (highest). The same ladder doubles as the hunter's title, derived
//! from the player's level.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Ordered difficulty tier of a task.
///
/// The derived ordering follows the declaration order, so `Rank::E < Rank::S`.
///
/// # Examples
///
/// ```
/// use hunter_protocol::Rank;
///
/// assert!(Rank::E < Rank::D);
/// assert_eq!(Rank::B.reward_xp(), 100);
/// assert_eq!("s".parse::<Rank>().unwrap(), Rank::S);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    /// Rookie difficulty.
    E,
    D,
    /// Default difficulty for new dungeons.
    #[default]
    C,
    B,
    A,
    /// Legendary difficulty.
    S,
}

impl Rank {
    /// All ranks, lowest first.
    pub const ALL: [Rank; 6] = [Rank::E, Rank::D, Rank::C, Rank::B, Rank::A, Rank::S];

    /// Returns the experience awarded for clearing a dungeon of this rank.
    ///
    /// Tasks copy this value once at creation; later changes to the table do
    /// not affect existing tasks.
    #[must_use]
    pub const fn reward_xp(self) -> u32 {
        match self {
            Self::E => 10,
            Self::D => 25,
            Self::C => 50,
            Self::B => 100,
            Self::A => 200,
            Self::S => 500,
        }
    }

    /// Returns the hunter rank a player of the given level holds.
    ///
    /// # Examples
    ///
    /// ```
    /// use hunter_protocol::Rank;
    ///
    /// assert_eq!(Rank::for_level(1), Rank::E);
    /// assert_eq!(Rank::for_level(10), Rank::D);
    /// assert_eq!(Rank::for_level(49), Rank::A);
    /// assert_eq!(Rank::for_level(50), Rank::S);
    /// ```
    #[must_use]
    pub const fn for_level(level: u32) -> Self {
        if level >= 50 {
            Self::S
        } else if level >= 40 {
            Self::A
        } else if level >= 30 {
            Self::B
        } else if level >= 20 {
            Self::C
        } else if level >= 10 {
            Self::D
        } else {
            Self::E
        }
    }

    /// Returns the single-letter code of this rank.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::E => 'E',
            Self::D => 'D',
            Self::C => 'C',
            Self::B => 'B',
            Self::A => 'A',
            Self::S => 'S',
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-Rank", self.letter())
    }
}

impl FromStr for Rank {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let code = trimmed
            .strip_suffix("-Rank")
            .or_else(|| trimmed.strip_suffix("-rank"))
            .unwrap_or(trimmed);

        match code.to_ascii_uppercase().as_str() {
            "E" => Ok(Self::E),
            "D" => Ok(Self::D),
            "C" => Ok(Self::C),
            "B" => Ok(Self::B),
            "A" => Ok(Self::A),
            "S" => Ok(Self::S),
            _ => Err(ProtocolError::InvalidRank(s.to_string())),
        }
    }
}
