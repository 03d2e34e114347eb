//! Domain layer: pure match logic with no I/O.

pub mod lifecycle;
pub mod rules;
pub mod skins;
pub mod validation;

pub use lifecycle::{transition, MatchAction};
pub use rules::{GameRules, MatchRules};
pub use skins::{HoleOutcome, HoleState, ResolutionPolicy, ScoreEntry};
