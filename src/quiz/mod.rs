pub mod generator;
pub mod identities;
pub mod report;
pub mod session;

use identities::{AngleOffset, RangeTier, TrigFunction};

/// A quiz run is always this many questions long.
pub const MAX_ROUNDS: usize = 10;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// The reduction table has no entry for this pair. A data-definition bug,
    /// not a user condition; callers surface it as a notice, never a crash.
    #[error("no reduction is defined for {function}({offset})")]
    UnknownCombination {
        function: TrigFunction,
        offset: AngleOffset,
    },
    /// A state-machine operation was called outside its valid phase.
    #[error("{operation} is not valid while the session is {phase:?}")]
    InvalidTransition {
        operation: &'static str,
        phase: session::Phase,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum OrderMode {
    /// Choices in canonical declaration order.
    Fixed,
    /// Choices freshly shuffled for every question.
    #[default]
    Shuffled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum DistractorStrategy {
    /// Distractors always share the drawn function's answer family.
    #[default]
    FamilyMatched,
    /// Distractors sampled from all 8 results regardless of family.
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum RestartBehavior {
    /// Wipe everything, including the selected range tier.
    #[default]
    Reconfigure,
    /// Jump straight into a new run with the previous configuration.
    KeepConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct QuizConfig {
    pub range_tier: RangeTier,
    pub order_mode: OrderMode,
    pub distractor_strategy: DistractorStrategy,
    pub restart_behavior: RestartBehavior,
}
