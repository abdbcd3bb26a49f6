//! Gamified writing trainer: user progress, storage, the LLM judge, and
//! the operations behind the game server.

pub mod judge;
pub mod record;
pub mod service;
pub mod store;

pub use judge::{GameJudge, GroqJudge, JsonObject};
pub use record::{game_info, GameError, GameInfo, Skill, UserRecord, GAMES};
pub use service::{
    GameService, HeartsResponse, LeaderboardEntry, LeaderboardResponse, PromptRequest,
    PromptResponse, RedeemRequest, RedeemResponse, StatsResponse, VerifyRequest, VerifyResponse,
};
pub use store::{MemoryUserStore, PersistError, UserStore, DEMO_USER};
