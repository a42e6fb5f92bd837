//! Player progression counters.
//!
//! The level is a pure function of experience, `floor(xp / XP_PER_LEVEL) + 1`.
//! It is stored alongside the experience so it can be persisted and displayed,
//! but every change of `xp` recomputes it.

use serde::{Deserialize, Serialize};

/// Experience needed to advance one level.
pub const XP_PER_LEVEL: u32 = 200;

/// Returns the level implied by an experience total.
///
/// # Examples
///
/// ```
/// use hunter_protocol::level_for_xp;
///
/// assert_eq!(level_for_xp(0), 1);
/// assert_eq!(level_for_xp(199), 1);
/// assert_eq!(level_for_xp(200), 2);
/// assert_eq!(level_for_xp(250), 2);
/// ```
#[must_use]
pub const fn level_for_xp(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

/// The player's level, experience and activity streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerProgression {
    /// Current level, always `level_for_xp(xp)`.
    pub level: u32,
    /// Accumulated experience.
    pub xp: u32,
    /// Consecutive active days, maintained outside the engine.
    pub streak: u32,
}

impl Default for PlayerProgression {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            streak: 0,
        }
    }
}

impl PlayerProgression {
    /// Creates a progression record from experience and streak.
    ///
    /// The level is derived from `xp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hunter_protocol::PlayerProgression;
    ///
    /// let player = PlayerProgression::new(450, 3);
    /// assert_eq!(player.level, 3);
    /// assert_eq!(player.streak, 3);
    /// ```
    #[must_use]
    pub const fn new(xp: u32, streak: u32) -> Self {
        Self {
            level: level_for_xp(xp),
            xp,
            streak,
        }
    }

    /// Experience earned inside the current level.
    #[must_use]
    pub const fn xp_into_level(&self) -> u32 {
        self.xp % XP_PER_LEVEL
    }

    /// Experience still missing to reach the next level.
    #[must_use]
    pub const fn xp_to_next_level(&self) -> u32 {
        XP_PER_LEVEL - self.xp_into_level()
    }

    /// Adds experience and returns the new level if it went up.
    pub(crate) fn gain(&mut self, amount: u32) -> Option<u32> {
        let previous = self.level;
        self.xp = self.xp.saturating_add(amount);
        self.level = level_for_xp(self.xp);
        (self.level > previous).then_some(self.level)
    }

    /// Removes experience, flooring at zero, and returns the amount removed.
    pub(crate) fn lose(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.xp);
        self.xp -= removed;
        self.level = level_for_xp(self.xp);
        removed
    }

    /// Re-derives the level from experience.
    ///
    /// Returns `true` if the stored level disagreed.
    pub(crate) fn normalize(&mut self) -> bool {
        let expected = level_for_xp(self.xp);
        let changed = self.level != expected;
        self.level = expected;
        changed
    }
}
