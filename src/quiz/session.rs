use chrono::{DateTime, Utc};
use rand::Rng;

use super::generator::{next_question, Question};
use super::identities::{AngleOffset, TrigExpr, TrigFunction};
use super::{QuizConfig, QuizError, RestartBehavior, MAX_ROUNDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    #[default]
    Configuring,
    InProgress,
    Summarizing,
}

/// One answered round. Immutable once appended to the history.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnsweredRecord {
    pub function: TrigFunction,
    pub offset: AngleOffset,
    pub chosen: TrigExpr,
    pub correct: TrigExpr,
    pub is_correct: bool,
}

/// One player's quiz run. Owns its history and current question exclusively;
/// every mutation goes through the transition methods below.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Session {
    config: QuizConfig,
    phase: Phase,
    round_index: usize,
    score: usize,
    history: Vec<AnsweredRecord>,
    current_question: Option<Question>,
    started_at: DateTime<Utc>,
    elapsed_seconds: Option<f64>,
}

impl Session {
    pub fn new(config: QuizConfig) -> Self {
        Self {
            config,
            phase: Phase::Configuring,
            round_index: 0,
            score: 0,
            history: Vec::new(),
            current_question: None,
            started_at: Utc::now(),
            elapsed_seconds: None,
        }
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round_index(&self) -> usize {
        self.round_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn history(&self) -> &[AnsweredRecord] {
        &self.history
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    /// Fixed once on entering `Summarizing`; `None` before that.
    pub fn elapsed_seconds(&self) -> Option<f64> {
        self.elapsed_seconds
    }

    /// Begin the run: zero the counters, stamp the clock, draw the first
    /// question. Valid only while configuring.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Question, QuizError> {
        if self.phase != Phase::Configuring {
            return Err(QuizError::InvalidTransition {
                operation: "start",
                phase: self.phase,
            });
        }
        self.score = 0;
        self.round_index = 0;
        self.history.clear();
        self.elapsed_seconds = None;
        self.started_at = Utc::now();

        let question = next_question(rng, &self.config)?;
        self.current_question = Some(question.clone());
        self.phase = Phase::InProgress;
        Ok(question)
    }

    /// Record an answer and advance. On the final round the session moves to
    /// `Summarizing` and the elapsed time is fixed; otherwise the next
    /// question is drawn.
    pub fn submit_answer<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        chosen: TrigExpr,
    ) -> Result<AnsweredRecord, QuizError> {
        if self.phase != Phase::InProgress {
            return Err(QuizError::InvalidTransition {
                operation: "submit_answer",
                phase: self.phase,
            });
        }
        let question = self
            .current_question
            .take()
            .ok_or(QuizError::InvalidTransition {
                operation: "submit_answer",
                phase: self.phase,
            })?;

        let record = AnsweredRecord {
            function: question.function,
            offset: question.offset,
            chosen,
            correct: question.correct,
            is_correct: chosen == question.correct,
        };
        if record.is_correct {
            self.score += 1;
        }
        self.history.push(record.clone());
        self.round_index += 1;

        if self.round_index == MAX_ROUNDS {
            let millis = (Utc::now() - self.started_at).num_milliseconds().max(0);
            self.elapsed_seconds = Some(round_half_up_to_hundredths(millis));
            self.phase = Phase::Summarizing;
        } else {
            self.current_question = Some(next_question(rng, &self.config)?);
        }
        Ok(record)
    }

    /// Leave the summary screen. Depending on the configured behavior this
    /// either returns to `Configuring` with a blank configuration or jumps
    /// straight into a fresh run with the previous one.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Phase, QuizError> {
        if self.phase != Phase::Summarizing {
            return Err(QuizError::InvalidTransition {
                operation: "restart",
                phase: self.phase,
            });
        }
        let config = self.config;
        match config.restart_behavior {
            RestartBehavior::KeepConfig => {
                *self = Session::new(config);
                self.start(rng)?;
            }
            RestartBehavior::Reconfigure => {
                // The restart flag itself is deployment-level, not per-run.
                *self = Session::new(QuizConfig {
                    restart_behavior: config.restart_behavior,
                    ..QuizConfig::default()
                });
            }
        }
        Ok(self.phase)
    }
}

/// Round-half-up to 2 decimal places, done on whole milliseconds so values
/// like 1.005 s round to 1.01 s regardless of binary float representation.
fn round_half_up_to_hundredths(millis: i64) -> f64 {
    ((millis + 5) / 10) as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::identities::{lookup, RangeTier};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> QuizConfig {
        QuizConfig {
            range_tier: RangeTier::All,
            restart_behavior: RestartBehavior::KeepConfig,
            ..QuizConfig::default()
        }
    }

    fn wrong_choice(question: &Question) -> TrigExpr {
        *question
            .choices
            .iter()
            .find(|choice| **choice != question.correct)
            .unwrap()
    }

    #[test]
    fn full_run_reaches_summarizing_on_the_tenth_answer() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut session = Session::new(config());
        session.start(&mut rng).unwrap();

        for round in 1..=MAX_ROUNDS {
            let question = session.current_question().unwrap().clone();
            session.submit_answer(&mut rng, question.correct).unwrap();
            if round < MAX_ROUNDS {
                assert_eq!(session.phase(), Phase::InProgress);
                assert!(session.current_question().is_some());
            }
        }

        assert_eq!(session.phase(), Phase::Summarizing);
        assert_eq!(session.history().len(), MAX_ROUNDS);
        assert_eq!(session.score(), MAX_ROUNDS);
        assert!(session.elapsed_seconds().unwrap() >= 0.0);
        assert!(session.current_question().is_none());
    }

    #[test]
    fn score_counts_only_correct_answers() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = Session::new(config());
        session.start(&mut rng).unwrap();

        // Alternate right and wrong answers.
        for round in 0..MAX_ROUNDS {
            let question = session.current_question().unwrap().clone();
            let answer = if round % 2 == 0 {
                question.correct
            } else {
                wrong_choice(&question)
            };
            session.submit_answer(&mut rng, answer).unwrap();
        }

        assert_eq!(session.score(), MAX_ROUNDS / 2);
        let correct_in_history = session
            .history()
            .iter()
            .filter(|record| record.is_correct)
            .count();
        assert_eq!(session.score(), correct_in_history);
    }

    #[test]
    fn correct_sine_cofunction_answer_scores() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = Session::new(config());
        session.start(&mut rng).unwrap();

        let correct = lookup(TrigFunction::Sin, AngleOffset::Deg90Plus).unwrap();
        assert_eq!(correct, TrigExpr::Cos);
        session.current_question = Some(Question {
            function: TrigFunction::Sin,
            offset: AngleOffset::Deg90Plus,
            correct,
            choices: TrigExpr::SIN_COS_FAMILY.to_vec(),
        });

        let score_before = session.score();
        let record = session.submit_answer(&mut rng, TrigExpr::Cos).unwrap();
        assert!(record.is_correct);
        assert_eq!(session.score(), score_before + 1);
    }

    #[test]
    fn cotangent_answer_to_a_tangent_period_question_does_not_score() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = Session::new(config());
        session.start(&mut rng).unwrap();

        let correct = lookup(TrigFunction::Tan, AngleOffset::Deg180Plus).unwrap();
        assert_eq!(correct, TrigExpr::Tan);
        session.current_question = Some(Question {
            function: TrigFunction::Tan,
            offset: AngleOffset::Deg180Plus,
            correct,
            choices: TrigExpr::TAN_FAMILY.to_vec(),
        });

        let score_before = session.score();
        let record = session.submit_answer(&mut rng, TrigExpr::Cot).unwrap();
        assert!(!record.is_correct);
        assert_eq!(session.score(), score_before);
    }

    #[test]
    fn operations_outside_their_phase_are_rejected() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut session = Session::new(config());

        let err = session.submit_answer(&mut rng, TrigExpr::Sin).unwrap_err();
        assert!(matches!(err, QuizError::InvalidTransition { .. }));

        let err = session.restart(&mut rng).unwrap_err();
        assert!(matches!(err, QuizError::InvalidTransition { .. }));

        session.start(&mut rng).unwrap();
        let err = session.start(&mut rng).unwrap_err();
        assert!(matches!(err, QuizError::InvalidTransition { .. }));
    }

    fn complete_run(session: &mut Session, rng: &mut StdRng) {
        for _ in 0..MAX_ROUNDS {
            let question = session.current_question().unwrap().clone();
            session.submit_answer(rng, question.correct).unwrap();
        }
    }

    #[test]
    fn restart_with_kept_config_jumps_into_a_fresh_run() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut session = Session::new(QuizConfig {
            range_tier: RangeTier::ZeroTo180,
            restart_behavior: RestartBehavior::KeepConfig,
            ..QuizConfig::default()
        });
        session.start(&mut rng).unwrap();
        complete_run(&mut session, &mut rng);

        let phase = session.restart(&mut rng).unwrap();
        assert_eq!(phase, Phase::InProgress);
        assert_eq!(session.score(), 0);
        assert!(session.history().is_empty());
        assert!(session.current_question().is_some());
        assert_eq!(session.config().range_tier, RangeTier::ZeroTo180);
    }

    #[test]
    fn restart_with_reconfigure_clears_the_selected_tier() {
        let mut rng = StdRng::seed_from_u64(22);
        let mut session = Session::new(QuizConfig {
            range_tier: RangeTier::ZeroTo180,
            restart_behavior: RestartBehavior::Reconfigure,
            ..QuizConfig::default()
        });
        session.start(&mut rng).unwrap();
        complete_run(&mut session, &mut rng);

        let phase = session.restart(&mut rng).unwrap();
        assert_eq!(phase, Phase::Configuring);
        assert_eq!(session.config().range_tier, RangeTier::All);
        assert_eq!(
            session.config().restart_behavior,
            RestartBehavior::Reconfigure
        );
        assert!(session.history().is_empty());
        assert!(session.current_question().is_none());
    }

    #[test]
    fn half_up_rounding_on_whole_milliseconds() {
        assert_eq!(round_half_up_to_hundredths(1004), 1.0);
        assert_eq!(round_half_up_to_hundredths(1005), 1.01);
        assert_eq!(round_half_up_to_hundredths(12344), 12.34);
        assert_eq!(round_half_up_to_hundredths(12345), 12.35);
        assert_eq!(round_half_up_to_hundredths(0), 0.0);
    }
}
