mod quiz;

use std::sync::Arc;

use dotenv::dotenv;
use log::warn;
use quiz::generator::Question;
use quiz::identities::RangeTier;
use quiz::report::{summarize, Report};
use quiz::session::{Phase, Session};
use quiz::{DistractorStrategy, OrderMode, QuizConfig, QuizError, RestartBehavior, MAX_ROUNDS};
use teloxide::{
    dispatching::dialogue::InMemStorage,
    prelude::*,
    types::{ChatId, KeyboardButton, KeyboardMarkup, ParseMode},
};

type QuizDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    ReceiveRangeChoice,
    Playing {
        session: Session,
    },
    Finished {
        session: Session,
    },
}

/// Deployment-level quiz options; the range tier is chosen per run instead.
struct BotSettings {
    order_mode: OrderMode,
    distractor_strategy: DistractorStrategy,
    restart_behavior: RestartBehavior,
}

impl BotSettings {
    fn from_env() -> Self {
        let order_mode = match std::env::var("QUIZ_CHOICE_ORDER").as_deref() {
            Ok("fixed") => OrderMode::Fixed,
            Ok("shuffled") | Err(_) => OrderMode::Shuffled,
            Ok(other) => {
                warn!("unrecognized QUIZ_CHOICE_ORDER {other:?}, using shuffled");
                OrderMode::Shuffled
            }
        };
        let distractor_strategy = match std::env::var("QUIZ_DISTRACTORS").as_deref() {
            Ok("global") => DistractorStrategy::Global,
            Ok("family") | Err(_) => DistractorStrategy::FamilyMatched,
            Ok(other) => {
                warn!("unrecognized QUIZ_DISTRACTORS {other:?}, using family");
                DistractorStrategy::FamilyMatched
            }
        };
        let restart_behavior = match std::env::var("QUIZ_RESTART").as_deref() {
            Ok("keep") => RestartBehavior::KeepConfig,
            Ok("reconfigure") | Err(_) => RestartBehavior::Reconfigure,
            Ok(other) => {
                warn!("unrecognized QUIZ_RESTART {other:?}, using reconfigure");
                RestartBehavior::Reconfigure
            }
        };
        Self {
            order_mode,
            distractor_strategy,
            restart_behavior,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().expect("Failed to load .env file");

    pretty_env_logger::init();
    log::info!("Starting trig quiz bot...");

    let bot = Bot::from_env();
    let settings = Arc::new(BotSettings::from_env());

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::ReceiveRangeChoice].endpoint(
                move |bot: Bot, dialogue: QuizDialogue, msg: Message| {
                    receive_range_choice(settings.clone(), bot, dialogue, msg)
                },
            ))
            .branch(dptree::case![State::Playing { session }].endpoint(playing))
            .branch(dptree::case![State::Finished { session }].endpoint(finished)),
    )
    .dependencies(dptree::deps![InMemStorage::<State>::new()])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

const GREETING_TEXT: &str = "Hi! I drill the trig reduction identities: I show you something like \
sin(180° − θ) and you pick the simplified form. Each run is 10 questions. \
First, choose which angle offsets to practice.";

const PLAY_AGAIN: &str = "Play again";

async fn start(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT)
        .reply_markup(range_keyboard())
        .await?;

    dialogue.update(State::ReceiveRangeChoice).await?;
    Ok(())
}

fn range_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(RangeTier::ALL.map(|tier| vec![KeyboardButton::new(tier.to_string())]))
}

async fn receive_range_choice(
    settings: Arc<BotSettings>,
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
) -> HandlerResult {
    let tier = msg.text().and_then(|text| {
        RangeTier::ALL
            .iter()
            .find(|tier| tier.to_string() == text)
            .copied()
    });
    if tier.is_none() {
        bot.send_message(msg.chat.id, "Please pick one of the offered ranges")
            .reply_markup(range_keyboard())
            .await?;
        return Ok(());
    }
    // It is safe to unwrap here because we've just checked for None
    let tier = tier.unwrap();

    let config = QuizConfig {
        range_tier: tier,
        order_mode: settings.order_mode,
        distractor_strategy: settings.distractor_strategy,
        restart_behavior: settings.restart_behavior,
    };
    let mut session = Session::new(config);
    let started = session.start(&mut rand::thread_rng());
    let question = match started {
        Ok(question) => question,
        Err(err) => {
            warn!("failed to start a session: {}", err);
            bot.send_message(msg.chat.id, data_error_notice(&err))
                .await?;
            dialogue.update(State::Start).await?;
            return Ok(());
        }
    };

    send_question(&bot, msg.chat.id, &session, &question).await?;
    dialogue.update(State::Playing { session }).await?;
    Ok(())
}

async fn send_question(
    bot: &Bot,
    chat_id: ChatId,
    session: &Session,
    question: &Question,
) -> HandlerResult {
    let keyboard = KeyboardMarkup::new(question.choices.chunks(2).map(|pair| {
        pair.iter()
            .map(|choice| KeyboardButton::new(choice.to_string()))
            .collect::<Vec<_>>()
    }));
    let text = format!(
        "Question {} / {}\n\n<b>{}</b> = ?",
        session.round_index() + 1,
        MAX_ROUNDS,
        question
    );
    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

async fn playing(
    bot: Bot,
    dialogue: QuizDialogue,
    mut session: Session,
    msg: Message,
) -> HandlerResult {
    let chosen = msg.text().and_then(|text| {
        session.current_question().and_then(|question| {
            question
                .choices
                .iter()
                .find(|choice| choice.to_string() == text)
                .copied()
        })
    });
    if chosen.is_none() {
        bot.send_message(msg.chat.id, "Please answer with one of the four buttons")
            .await?;
        return Ok(());
    }
    // It is safe to unwrap here because we've just checked for None
    let chosen = chosen.unwrap();

    let submitted = session.submit_answer(&mut rand::thread_rng(), chosen);
    let record = match submitted {
        Ok(record) => record,
        Err(err) => {
            warn!("answer rejected: {}", err);
            bot.send_message(msg.chat.id, data_error_notice(&err))
                .await?;
            dialogue.update(State::Start).await?;
            return Ok(());
        }
    };

    if record.is_correct {
        bot.send_message(msg.chat.id, "Correct!").await?;
    } else {
        bot.send_message(
            msg.chat.id,
            format!(
                "Wrong! {}({}) = {}",
                record.function, record.offset, record.correct
            ),
        )
        .await?;
    }

    if session.phase() == Phase::Summarizing {
        let report = summarize(&session)?;
        bot.send_message(msg.chat.id, render_report(&report))
            .parse_mode(ParseMode::Html)
            .reply_markup(KeyboardMarkup::new(vec![vec![KeyboardButton::new(
                PLAY_AGAIN,
            )]]))
            .await?;
        dialogue.update(State::Finished { session }).await?;
        return Ok(());
    }

    // submit_answer has already drawn the next question
    let question = session.current_question().cloned();
    match question {
        Some(question) => {
            send_question(&bot, msg.chat.id, &session, &question).await?;
            dialogue.update(State::Playing { session }).await?;
        }
        None => {
            warn!("no question pending after an answer mid-run");
            bot.send_message(msg.chat.id, "Something went wrong, send /start to begin anew")
                .await?;
            dialogue.update(State::Start).await?;
        }
    }
    Ok(())
}

fn render_report(report: &Report) -> String {
    let mut lines = vec![
        "✨ Quiz finished! ✨".to_string(),
        format!("<b>Score: {} / {}</b>", report.score, report.max_score),
        format!("Elapsed: {:.2} s", report.elapsed_seconds),
        String::new(),
    ];
    for row in &report.rows {
        lines.push(format!(
            "{:>2}. {} {} — yours: {}, correct: {}",
            row.index, row.mark, row.question, row.chosen, row.correct
        ));
    }
    lines.join("\n")
}

async fn finished(
    bot: Bot,
    dialogue: QuizDialogue,
    mut session: Session,
    msg: Message,
) -> HandlerResult {
    if msg.text() != Some(PLAY_AGAIN) {
        bot.send_message(msg.chat.id, "Press the button to play again")
            .reply_markup(KeyboardMarkup::new(vec![vec![KeyboardButton::new(
                PLAY_AGAIN,
            )]]))
            .await?;
        return Ok(());
    }

    let restarted = session.restart(&mut rand::thread_rng());
    let phase = match restarted {
        Ok(phase) => phase,
        Err(err) => {
            warn!("restart rejected: {}", err);
            bot.send_message(msg.chat.id, data_error_notice(&err))
                .await?;
            dialogue.update(State::Start).await?;
            return Ok(());
        }
    };

    match phase {
        Phase::InProgress => {
            let question = session.current_question().cloned();
            match question {
                Some(question) => {
                    send_question(&bot, msg.chat.id, &session, &question).await?;
                    dialogue.update(State::Playing { session }).await?;
                }
                None => {
                    warn!("restart left no question pending");
                    dialogue.update(State::Start).await?;
                }
            }
        }
        Phase::Configuring => {
            bot.send_message(msg.chat.id, "Choose which angle offsets to practice")
                .reply_markup(range_keyboard())
                .await?;
            dialogue.update(State::ReceiveRangeChoice).await?;
        }
        Phase::Summarizing => {
            warn!("restart did not leave the summary screen");
        }
    }
    Ok(())
}

fn data_error_notice(err: &QuizError) -> &'static str {
    match err {
        QuizError::UnknownCombination { .. } => {
            "This round's data is invalid, so the quiz was stopped. Send /start to try again"
        }
        QuizError::InvalidTransition { .. } => {
            "I wasn't expecting that right now. Send /start to begin a quiz"
        }
    }
}
