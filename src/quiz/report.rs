use super::session::{Phase, Session};
use super::{QuizError, MAX_ROUNDS};

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub score: usize,
    pub max_score: usize,
    pub elapsed_seconds: f64,
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub index: usize,
    pub question: String,
    pub chosen: String,
    pub correct: String,
    pub mark: &'static str,
}

/// Format a completed session. Pure: the same session always yields the
/// same report.
pub fn summarize(session: &Session) -> Result<Report, QuizError> {
    if session.phase() != Phase::Summarizing {
        return Err(QuizError::InvalidTransition {
            operation: "summarize",
            phase: session.phase(),
        });
    }

    let rows = session
        .history()
        .iter()
        .enumerate()
        .map(|(i, record)| ReportRow {
            index: i + 1,
            question: format!("{}({})", record.function, record.offset),
            chosen: record.chosen.to_string(),
            correct: record.correct.to_string(),
            mark: if record.is_correct { "○" } else { "×" },
        })
        .collect();

    Ok(Report {
        score: session.score(),
        max_score: MAX_ROUNDS,
        elapsed_seconds: session.elapsed_seconds().unwrap_or(0.0),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::identities::RangeTier;
    use crate::quiz::{QuizConfig, RestartBehavior};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn completed_session(seed: u64) -> Session {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut session = Session::new(QuizConfig {
            range_tier: RangeTier::All,
            restart_behavior: RestartBehavior::KeepConfig,
            ..QuizConfig::default()
        });
        session.start(&mut rng).unwrap();
        for round in 0..MAX_ROUNDS {
            let question = session.current_question().unwrap().clone();
            let answer = if round % 3 == 0 {
                question.correct
            } else {
                *question
                    .choices
                    .iter()
                    .find(|choice| **choice != question.correct)
                    .unwrap()
            };
            session.submit_answer(&mut rng, answer).unwrap();
        }
        session
    }

    #[test]
    fn report_mirrors_the_history() {
        let session = completed_session(31);
        let report = summarize(&session).unwrap();

        assert_eq!(report.max_score, MAX_ROUNDS);
        assert_eq!(report.rows.len(), MAX_ROUNDS);
        assert_eq!(report.score, session.score());
        assert!(report.elapsed_seconds >= 0.0);

        for (i, (row, record)) in report.rows.iter().zip(session.history()).enumerate() {
            assert_eq!(row.index, i + 1);
            assert_eq!(row.question, format!("{}({})", record.function, record.offset));
            assert_eq!(row.chosen, record.chosen.to_string());
            assert_eq!(row.correct, record.correct.to_string());
            assert_eq!(row.mark, if record.is_correct { "○" } else { "×" });
        }
    }

    #[test]
    fn summarize_is_idempotent() {
        let session = completed_session(32);
        let first = summarize(&session).unwrap();
        let second = summarize(&session).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn summarize_requires_a_completed_session() {
        let mut rng = StdRng::seed_from_u64(33);
        let mut session = Session::new(QuizConfig::default());
        assert!(matches!(
            summarize(&session).unwrap_err(),
            QuizError::InvalidTransition { .. }
        ));

        session.start(&mut rng).unwrap();
        assert!(matches!(
            summarize(&session).unwrap_err(),
            QuizError::InvalidTransition { .. }
        ));
    }
}
