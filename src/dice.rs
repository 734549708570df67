//! Dice roller with per-die multipliers and a roll history.

#[cfg(test)]
#[path = "dice_test.rs"]
mod dice_test;

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::error::AppError;

/// Dice the toolbar offers, in display order.
pub const STANDARD: [u32; 8] = [2, 4, 6, 8, 10, 12, 20, 100];

/// Most dice a single roll may throw.
pub const MAX_DICE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roll {
    pub sides: u32,
    pub count: u32,
    pub results: Vec<u32>,
    pub total: u32,
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.results.iter().map(ToString::to_string).collect();
        write!(f, "Rolled {}d{}: [{}] = {}", self.count, self.sides, faces.join(" + "), self.total)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiceRoller {
    multipliers: BTreeMap<u32, u32>,
    history: Vec<Roll>,
}

impl DiceRoller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many of this die a roll throws. Never below 1.
    #[must_use]
    pub fn multiplier(&self, sides: u32) -> u32 {
        self.multipliers.get(&sides).copied().unwrap_or(1)
    }

    /// Nudge a die's multiplier, kept within `1..=MAX_DICE`. Returns the new value.
    pub fn adjust_multiplier(&mut self, sides: u32, delta: i32) -> u32 {
        let next = i64::from(self.multiplier(sides)) + i64::from(delta);
        let next = u32::try_from(next.clamp(1, i64::from(MAX_DICE))).unwrap_or(MAX_DICE);
        self.multipliers.insert(sides, next);
        next
    }

    /// Throw `multiplier(sides)` dice and append the result to the history.
    pub fn roll<R: Rng + ?Sized>(&mut self, sides: u32, rng: &mut R) -> Result<&Roll, AppError> {
        self.roll_n(self.multiplier(sides), sides, rng)
    }

    /// Throw an explicit number of dice.
    pub fn roll_n<R: Rng + ?Sized>(&mut self, count: u32, sides: u32, rng: &mut R) -> Result<&Roll, AppError> {
        if sides == 0 || count == 0 {
            return Err(AppError::Dice(format!("{count}d{sides}")));
        }
        if count > MAX_DICE {
            return Err(AppError::Dice(format!("{count}d{sides}: at most {MAX_DICE} dice per roll")));
        }
        let results: Vec<u32> = (0..count).map(|_| rng.random_range(1..=sides)).collect();
        let total = results.iter().fold(0_u32, |acc, r| acc.saturating_add(*r));
        let roll = Roll { sides, count, results, total };
        tracing::info!(%roll, "dice rolled");
        self.history.push(roll);
        Ok(&self.history[self.history.len() - 1])
    }

    /// Oldest first.
    #[must_use]
    pub fn history(&self) -> &[Roll] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

/// Parse `NdM` (or `dM`, meaning one die), with `N` at most [`MAX_DICE`].
pub fn parse_notation(raw: &str) -> Result<(u32, u32), AppError> {
    let bad = || AppError::Dice(raw.to_string());
    let lower = raw.trim().to_ascii_lowercase();
    let (count, sides) = lower.split_once('d').ok_or_else(bad)?;
    let count = if count.is_empty() { 1 } else { count.parse::<u32>().map_err(|_| bad())? };
    let sides = sides.parse::<u32>().map_err(|_| bad())?;
    if count == 0 || sides == 0 {
        return Err(bad());
    }
    if count > MAX_DICE {
        return Err(AppError::Dice(format!("{raw}: at most {MAX_DICE} dice per roll")));
    }
    Ok((count, sides))
}
