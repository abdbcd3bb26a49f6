//! Text analysis engines.

pub mod correction;
pub mod diff;
pub mod explanation;
pub mod narrative;
pub mod structure;
pub mod tone;

pub use correction::{CorrectionEngine, CorrectionResult, DedupMode};
pub use diff::{diff_words, DiffResult};
pub use explanation::{explain, ExplanationResult};
pub use narrative::{NarrativeEngine, NarrativeResult, RelevanceResult};
pub use structure::{StructureEngine, StructureResult};
pub use tone::{detect_tone, Tone, ToneEngine, ToneResult};
