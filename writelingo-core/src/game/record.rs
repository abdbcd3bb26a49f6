//! Per-user progress and the gamification arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub const MAX_HEARTS: u32 = 5;
pub const XP_PER_LEVEL: i64 = 500;
pub const STARTING_PROFICIENCY: u32 = 10;
pub const MAX_PROFICIENCY: u32 = 100;

/// Accuracy at or above this counts as a win.
pub const WIN_THRESHOLD: f64 = 0.8;

const FALLBACK_XP: i64 = 30;
const SKILL_GAIN: u32 = 5;
const SKILL_LOSS: u32 = 2;
const MAX_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error("Insufficient XP balance.")]
    InsufficientXp { balance: i64, requested: u32 },
}

// ============================================================================
// Skills and games
// ============================================================================

/// Proficiency axes shown on the profile chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Skill {
    Grammar,
    Vocabulary,
    #[serde(rename = "Tone & Style")]
    ToneAndStyle,
    Concision,
    Comprehension,
}

impl Skill {
    pub const ALL: [Skill; 5] = [
        Skill::Grammar,
        Skill::Vocabulary,
        Skill::ToneAndStyle,
        Skill::Concision,
        Skill::Comprehension,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Skill::Grammar => "Grammar",
            Skill::Vocabulary => "Vocabulary",
            Skill::ToneAndStyle => "Tone & Style",
            Skill::Concision => "Concision",
            Skill::Comprehension => "Comprehension",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mini-game's reward and the skill it trains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameInfo {
    pub name: &'static str,
    pub base_xp: i64,
    pub skill: Skill,
}

pub const GAMES: &[GameInfo] = &[
    GameInfo { name: "Tone Switcher", base_xp: 60, skill: Skill::ToneAndStyle },
    GameInfo { name: "Word Choice Duel", base_xp: 40, skill: Skill::Vocabulary },
    GameInfo { name: "Redundancy Eraser", base_xp: 30, skill: Skill::Concision },
    GameInfo { name: "Sentence Builder", base_xp: 50, skill: Skill::Grammar },
    GameInfo { name: "Sentence Reconstructor", base_xp: 100, skill: Skill::ToneAndStyle },
    GameInfo { name: "Plot Hole Hunter", base_xp: 80, skill: Skill::Comprehension },
    GameInfo { name: "Dialogue Detective", base_xp: 70, skill: Skill::Comprehension },
    GameInfo { name: "Context Climber", base_xp: 90, skill: Skill::ToneAndStyle },
    GameInfo { name: "Word Master", base_xp: 50, skill: Skill::Grammar },
    GameInfo { name: "Story Spinner", base_xp: 120, skill: Skill::ToneAndStyle },
    GameInfo { name: "Logic MCQ", base_xp: 40, skill: Skill::Grammar },
    GameInfo { name: "Visual Vocab", base_xp: 40, skill: Skill::Vocabulary },
];

/// Look up a game by exact name. Unknown games are worth 30 XP of Grammar.
pub fn game_info(game_type: &str) -> GameInfo {
    GAMES
        .iter()
        .find(|g| g.name == game_type)
        .copied()
        .unwrap_or(GameInfo {
            name: "",
            base_xp: FALLBACK_XP,
            skill: Skill::Grammar,
        })
}

pub fn level_for(xp: i64) -> u32 {
    u32::try_from(xp.max(0) / XP_PER_LEVEL + 1).unwrap_or(u32::MAX)
}

// ============================================================================
// User record
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub xp: i64,
    pub level: u32,
    /// Consecutive active days.
    pub streak: u32,
    /// Consecutive correct answers.
    pub win_streak: u32,
    pub hearts: u32,
    pub games_played: u32,
    pub games_won: u32,
    pub last_active: DateTime<Utc>,
    pub skills: BTreeMap<Skill, u32>,
}

impl UserRecord {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            xp: 0,
            level: 1,
            streak: 1,
            win_streak: 0,
            hearts: MAX_HEARTS,
            games_played: 0,
            games_won: 0,
            last_active: now,
            skills: Skill::ALL.iter().map(|s| (*s, STARTING_PROFICIENCY)).collect(),
        }
    }

    /// The demo account the store starts with. Its level is not derived
    /// from its XP until the first XP change.
    pub fn demo(now: DateTime<Utc>) -> Self {
        Self {
            xp: 2000,
            ..Self::new(now)
        }
    }

    pub fn proficiency(&self, skill: Skill) -> u32 {
        self.skills.get(&skill).copied().unwrap_or(STARTING_PROFICIENCY)
    }

    /// Record a played game and return the XP it is worth (negative on a loss).
    ///
    /// Does not apply the XP; callers follow up with [`UserRecord::add_xp`].
    pub fn calculate_xp(&mut self, game_type: &str, accuracy: f64, hint_used: bool) -> i64 {
        let game = game_info(game_type);
        self.games_played += 1;

        let proficiency = self.proficiency(game.skill);
        if accuracy >= WIN_THRESHOLD {
            self.games_won += 1;
            let multiplier = (1.0 + 0.1 * f64::from(self.win_streak)).min(MAX_MULTIPLIER);
            let mut xp = (game.base_xp as f64 * accuracy * multiplier).floor() as i64;
            if hint_used {
                xp /= 2;
            }
            self.skills
                .insert(game.skill, (proficiency + SKILL_GAIN).min(MAX_PROFICIENCY));
            xp
        } else {
            self.skills
                .insert(game.skill, proficiency.saturating_sub(SKILL_LOSS));
            -(game.base_xp / 2)
        }
    }

    /// Apply an XP delta, never dropping below zero, and return the new total.
    pub fn add_xp(&mut self, delta: i64) -> i64 {
        self.xp = self.xp.saturating_add(delta).max(0);
        self.level = level_for(self.xp);
        self.xp
    }

    pub fn deduct_heart(&mut self) -> u32 {
        self.hearts = self.hearts.saturating_sub(1);
        self.hearts
    }

    pub fn refill_hearts(&mut self) -> u32 {
        self.hearts = MAX_HEARTS;
        self.hearts
    }

    /// Advance the daily streak by calendar day (UTC) and mark `now` as active.
    pub fn update_streak(&mut self, now: DateTime<Utc>) -> u32 {
        let days = (now.date_naive() - self.last_active.date_naive()).num_days();
        if days == 1 {
            self.streak += 1;
        } else if days > 1 {
            self.streak = 1;
        }
        self.last_active = now;
        self.streak
    }

    pub fn update_win_streak(&mut self, won: bool) -> u32 {
        self.win_streak = if won { self.win_streak + 1 } else { 0 };
        self.win_streak
    }

    /// Spend XP. Returns the remaining balance.
    pub fn redeem_xp(&mut self, amount: u32) -> Result<i64, GameError> {
        let amount_xp = i64::from(amount);
        if self.xp < amount_xp {
            return Err(GameError::InsufficientXp {
                balance: self.xp,
                requested: amount,
            });
        }
        self.xp -= amount_xp;
        self.level = level_for(self.xp);
        Ok(self.xp)
    }
}
