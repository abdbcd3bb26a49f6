//! Game operations exposed by the game server.

use super::judge::{GameJudge, JsonObject};
use super::record::{GameError, Skill};
use super::store::{MemoryUserStore, UserStore};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

pub const DEFAULT_REASON: &str = "AI could not determine correctness.";
pub const DEFAULT_REDEEM_AMOUNT: u32 = 1000;
pub const LEADERBOARD_SIZE: usize = 15;

/// Fixed rival entries mixed into the leaderboard: (user id, level, xp).
const RIVALS: &[(&str, u32, i64)] = &[
    ("Arjun_Pro", 12, 6200),
    ("Neha_Writer", 10, 5100),
    ("Rahul_Grammar", 9, 4800),
    ("Priya_Lit", 8, 4200),
    ("Vikram_Bot", 7, 3600),
    ("Sarthak_AI", 15, 7500),
    ("Aisha_Pen", 6, 3100),
    ("Kabir_Lyrics", 5, 2600),
    ("Rohan_Scribe", 4, 2100),
    ("Zoya_Auth", 3, 1600),
];

// ============================================================================
// Requests and responses
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct PromptRequest {
    pub game_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptResponse {
    pub prompt_data: JsonObject,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyRequest {
    pub game_type: String,
    pub user_input: String,
    #[serde(default)]
    pub context: Option<Value>,
    #[serde(default)]
    pub hint_used: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub reason: String,
    pub xp_reward: i64,
    pub new_streak: u32,
    pub win_streak: u32,
    pub mastery_level: f64,
    pub current_hearts: u32,
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeartsResponse {
    pub hearts: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedeemRequest {
    #[serde(default = "default_redeem_amount")]
    pub amount: u32,
}

fn default_redeem_amount() -> u32 {
    DEFAULT_REDEEM_AMOUNT
}

impl Default for RedeemRequest {
    fn default() -> Self {
        Self {
            amount: DEFAULT_REDEEM_AMOUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedeemResponse {
    pub success: bool,
    pub message: String,
    pub new_xp: Option<i64>,
    pub new_level: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsResponse {
    pub user_id: String,
    pub xp: i64,
    pub level: u32,
    pub streak: u32,
    pub win_streak: u32,
    pub hearts: u32,
    pub games_played: u32,
    pub games_won: u32,
    pub spider_chart_data: BTreeMap<Skill, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub level: u32,
    pub xp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardResponse {
    pub top_users: Vec<LeaderboardEntry>,
}

/// Fields read from the judge's verdict, with defaults for anything missing.
#[derive(Debug, Clone, PartialEq)]
struct Verdict {
    success: bool,
    reason: String,
    mastery_level: f64,
    correct_answer: Option<String>,
}

impl Verdict {
    fn from_object(object: &JsonObject) -> Self {
        Self {
            success: object.get("success").and_then(Value::as_bool).unwrap_or(false),
            reason: object
                .get("reason")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_REASON)
                .to_string(),
            mastery_level: object
                .get("mastery_level")
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
            correct_answer: object.get("correct_answer").and_then(text_value),
        }
    }
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ============================================================================
// Service
// ============================================================================

pub struct GameService<S = MemoryUserStore> {
    store: Arc<S>,
    judge: Arc<dyn GameJudge>,
}

impl<S: UserStore> GameService<S> {
    pub fn new(store: Arc<S>, judge: Arc<dyn GameJudge>) -> Self {
        Self { store, judge }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Ask the judge for a fresh exercise.
    pub async fn prompt(&self, game_type: &str) -> PromptResponse {
        let prompt_data = self.judge.generate_exercise(game_type).await;
        let hint = prompt_data.get("hint").and_then(text_value);
        PromptResponse { prompt_data, hint }
    }

    /// Grade an answer and apply rewards or penalties in one store update.
    pub async fn verify(&self, user_id: &str, request: &VerifyRequest) -> VerifyResponse {
        let context = request
            .context
            .clone()
            .unwrap_or_else(|| Value::Object(JsonObject::new()));
        let verdict = Verdict::from_object(
            &self
                .judge
                .verify_answer(&request.game_type, &request.user_input, &context)
                .await,
        );

        let now = Utc::now();
        let (xp_reward, new_streak, win_streak, current_hearts) =
            self.store.update(user_id, |user| {
                let hearts_after_loss = (!verdict.success).then(|| user.deduct_heart());
                let xp = user.calculate_xp(
                    &request.game_type,
                    verdict.mastery_level,
                    request.hint_used,
                );
                user.add_xp(xp);
                let streak = user.update_streak(now);
                let hearts = hearts_after_loss.unwrap_or(user.hearts);
                let win_streak = user.update_win_streak(verdict.success);
                (xp, streak, win_streak, hearts)
            });

        tracing::info!(
            user_id,
            game_type = %request.game_type,
            success = verdict.success,
            xp_reward,
            "Answer graded"
        );

        VerifyResponse {
            success: verdict.success,
            reason: verdict.reason,
            xp_reward,
            new_streak,
            win_streak,
            mastery_level: verdict.mastery_level,
            current_hearts,
            correct_answer: verdict.correct_answer,
        }
    }

    pub fn refill_hearts(&self, user_id: &str) -> HeartsResponse {
        HeartsResponse {
            hearts: self.store.update(user_id, |user| user.refill_hearts()),
        }
    }

    pub fn redeem_xp(&self, user_id: &str, amount: u32) -> RedeemResponse {
        let outcome = self
            .store
            .update(user_id, |user| user.redeem_xp(amount).map(|xp| (xp, user.level)));

        match outcome {
            Ok((new_xp, new_level)) => RedeemResponse {
                success: true,
                message: format!("Successfully redeemed {amount} XP."),
                new_xp: Some(new_xp),
                new_level: Some(new_level),
            },
            Err(e @ GameError::InsufficientXp { .. }) => RedeemResponse {
                success: false,
                message: e.to_string(),
                new_xp: None,
                new_level: None,
            },
        }
    }

    /// Current stats; viewing them counts as activity for the daily streak.
    pub fn stats(&self, user_id: &str) -> StatsResponse {
        let now = Utc::now();
        let user = self.store.update(user_id, |user| {
            user.update_streak(now);
            user.clone()
        });

        StatsResponse {
            user_id: user_id.to_string(),
            xp: user.xp,
            level: user.level,
            streak: user.streak,
            win_streak: user.win_streak,
            hearts: user.hearts,
            games_played: user.games_played,
            games_won: user.games_won,
            spider_chart_data: user.skills,
        }
    }

    /// Real users plus rivals whose ids are free, by XP descending.
    pub fn leaderboard(&self) -> LeaderboardResponse {
        let users = self.store.snapshot();
        let taken: HashSet<&str> = users.keys().map(String::as_str).collect();

        let mut board: Vec<LeaderboardEntry> = users
            .iter()
            .map(|(id, user)| LeaderboardEntry {
                user_id: id.clone(),
                level: user.level,
                xp: user.xp,
            })
            .collect();
        board.extend(
            RIVALS
                .iter()
                .filter(|(id, _, _)| !taken.contains(id))
                .map(|(id, level, xp)| LeaderboardEntry {
                    user_id: id.to_string(),
                    level: *level,
                    xp: *xp,
                }),
        );

        board.sort_by(|a, b| b.xp.cmp(&a.xp).then_with(|| a.user_id.cmp(&b.user_id)));
        board.truncate(LEADERBOARD_SIZE);
        LeaderboardResponse { top_users: board }
    }
}
