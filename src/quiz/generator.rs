use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use super::identities::{lookup, AngleOffset, TrigExpr, TrigFunction};
use super::{DistractorStrategy, OrderMode, QuizConfig, QuizError};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub function: TrigFunction,
    pub offset: AngleOffset,
    pub correct: TrigExpr,
    pub choices: Vec<TrigExpr>,
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.function, self.offset)
    }
}

/// Draw a fresh question. Function and offset are sampled uniformly and
/// independently of previous draws, so repeats across rounds are possible.
pub fn next_question<R: Rng + ?Sized>(
    rng: &mut R,
    config: &QuizConfig,
) -> Result<Question, QuizError> {
    let function = TrigFunction::ALL[rng.gen_range(0..TrigFunction::ALL.len())];
    let offsets = config.range_tier.offsets();
    let offset = offsets[rng.gen_range(0..offsets.len())];
    let correct = lookup(function, offset)?;

    let mut choices = match config.distractor_strategy {
        DistractorStrategy::FamilyMatched => function.answer_family().to_vec(),
        DistractorStrategy::Global => {
            let pool: Vec<TrigExpr> = TrigExpr::ALL
                .iter()
                .copied()
                .filter(|expr| *expr != correct)
                .collect();
            let mut picked: Vec<TrigExpr> = pool.choose_multiple(rng, 3).copied().collect();
            picked.push(correct);
            picked
        }
    };

    match config.order_mode {
        OrderMode::Fixed => choices.sort_by_key(|expr| *expr as usize),
        OrderMode::Shuffled => choices.shuffle(rng),
    }

    Ok(Question {
        function,
        offset,
        correct,
        choices,
    })
}
