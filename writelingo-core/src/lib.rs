//! Writing analysis engines and gamified trainer state for WriteLingo.
//!
//! This crate provides:
//! - Rule-based grammar correction with a spelling pass
//! - Rolling-window narrative consistency scoring and a live topic check
//! - Readability, tone detection, tone rewriting, and word diffs
//! - Model capabilities behind traits, with HTTP inference backends
//! - XP, hearts, streaks, and skills for the writing games
//!
//! # Quick Start
//!
//! ```ignore
//! use writelingo_core::{AnalysisConfig, AnalyzeRequest, Analyzer, Tone};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let analyzer = Analyzer::from_config(&AnalysisConfig::from_env()?);
//!
//!     let request = AnalyzeRequest::new("I didn't completed the task.")
//!         .with_target_tone(Tone::Formal);
//!     let response = analyzer.analyze(&request).await?;
//!     println!("{}", response.modified_text);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod change;
pub mod config;
pub mod engines;
pub mod game;
pub mod lexicon;
pub mod models;
pub mod spelling;
pub mod testing;
pub mod text;

// Primary public API
pub use analysis::{AnalysisError, AnalyzeRequest, AnalyzeResponse, Analyzer, LiveCheckRequest};
pub use change::{ChangeRecord, ChangeType};
pub use config::{AnalysisConfig, ConfigError, GameConfig};
pub use engines::{DedupMode, RelevanceResult, Tone};
pub use game::{GameService, GroqJudge, MemoryUserStore, UserStore};
pub use lexicon::{Lexicon, LexiconError};
pub use spelling::SpellChecker;
