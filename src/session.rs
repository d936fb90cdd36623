// src/session.rs
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use uuid::Uuid;

use crate::case::{self, Case, Suspect};
use crate::error::{InputError, SessionError};
use crate::gateway::{self, Gateway};
use crate::message::{Message, Role};

pub const QUESTION_BUDGET: u32 = 10;
pub const REPLY_MAX_TOKENS: u32 = 250;

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Difficulty {
    #[default]
    Easy,
    Hard,
}

impl Difficulty {
    /// Lower temperature gives more literal answers, higher more evasive ones.
    pub fn temperature(self) -> f32 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Hard => 0.8,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    fn instruction(self) -> &'static str {
        match self {
            Difficulty::Easy => {
                "Give subtle but readable clues: the guilty suspect slips on small details \
                 that an attentive detective can catch."
            }
            Difficulty::Hard => {
                "Be evasive. Mislead the detective, deflect blame onto others, and let the \
                 guilty suspect leak only the faintest contradictions."
            }
        }
    }
}

/// What happens to the question budget when the gateway fails.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum TurnPolicy {
    /// The question is spent before the request is sent, failed or not.
    #[default]
    ConsumeOnFailure,
    /// The question is only spent once the suspect actually answers.
    RefundOnFailure,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub solved: u32,
    pub wrong: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SessionState {
    Active,
    Exhausted,
    Solved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Answered(String),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    Wrong,
}

#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    case: Case,
    culprit: Suspect,
    addressed: String,
    questions_remaining: u32,
    transcript: Vec<Message>,
    solved: bool,
    difficulty: Difficulty,
    turn_policy: TurnPolicy,
    score: Score,
}

impl Session {
    pub fn new(difficulty: Difficulty, turn_policy: TurnPolicy) -> Self {
        Self::new_with(difficulty, turn_policy, &mut rand::rng())
    }

    pub fn new_with(difficulty: Difficulty, turn_policy: TurnPolicy, rng: &mut impl Rng) -> Self {
        let case = case::pick_random_case_with(rng);
        let culprit = case::pick_culprit_with(&case, rng);
        Self::with_case(case, culprit, difficulty, turn_policy)
    }

    /// Starts a session on a known case. A culprit outside the roster falls back to the first suspect.
    pub fn with_case(
        case: Case,
        culprit: Suspect,
        difficulty: Difficulty,
        turn_policy: TurnPolicy,
    ) -> Self {
        let mut session = Session {
            id: Uuid::new_v4(),
            case: case.clone(),
            culprit: culprit.clone(),
            addressed: String::new(),
            questions_remaining: QUESTION_BUDGET,
            transcript: Vec::new(),
            solved: false,
            difficulty,
            turn_policy,
            score: Score::default(),
        };
        session.reset(case, culprit);
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn case(&self) -> &Case {
        &self.case
    }

    pub fn questions_remaining(&self) -> u32 {
        self.questions_remaining
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Everything the player may see: the priming system entry stays hidden.
    pub fn visible_transcript(&self) -> impl Iterator<Item = &Message> {
        self.transcript.iter().filter(|m| m.role != Role::System)
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn turn_policy(&self) -> TurnPolicy {
        self.turn_policy
    }

    pub fn set_turn_policy(&mut self, turn_policy: TurnPolicy) {
        self.turn_policy = turn_policy;
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn addressed_suspect(&self) -> &str {
        &self.addressed
    }

    pub fn state(&self) -> SessionState {
        if self.solved {
            SessionState::Solved
        } else if self.questions_remaining == 0 {
            SessionState::Exhausted
        } else {
            SessionState::Active
        }
    }

    /// The culprit, once the case is solved. An exhausted session keeps it hidden
    /// because guessing is still open.
    pub fn reveal_culprit(&self) -> Option<&Suspect> {
        match self.state() {
            SessionState::Solved => Some(&self.culprit),
            SessionState::Active | SessionState::Exhausted => None,
        }
    }

    // Test helpers and the UI's debug overlay need the culprit without a reveal.
    #[doc(hidden)]
    pub fn culprit(&self) -> &Suspect {
        &self.culprit
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if self.difficulty == difficulty {
            return;
        }
        self.difficulty = difficulty;
        let priming = self.priming_message();
        match self.transcript.first_mut() {
            Some(first) if first.role == Role::System => *first = priming,
            _ => self.transcript.insert(0, priming),
        }
        log::info!("Session {}: difficulty set to {}", self.id, difficulty);
    }

    /// Chooses who the next questions are put to. The culprit never changes.
    pub fn select_suspect(&mut self, name: &str) -> Result<(), InputError> {
        let suspect = self
            .case
            .suspect(name)
            .ok_or_else(|| InputError::UnknownSuspect(name.trim().to_string()))?;
        self.addressed = suspect.name.clone();
        Ok(())
    }

    pub fn cycle_suspect(&mut self) {
        let names = self.case.suspect_names();
        if names.is_empty() {
            return;
        }
        let current = names
            .iter()
            .position(|name| *name == self.addressed)
            .unwrap_or(0);
        self.addressed = names[(current + 1) % names.len()].to_string();
    }

    pub async fn ask<G: Gateway>(
        &mut self,
        gateway: &G,
        question: &str,
    ) -> Result<TurnOutcome, SessionError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(InputError::EmptyQuestion.into());
        }
        match self.state() {
            SessionState::Solved => return Err(SessionError::AlreadySolved),
            SessionState::Exhausted => return Err(SessionError::OutOfQuestions),
            SessionState::Active => {}
        }

        let user_message = Message::user(question).with_suspect(self.addressed.clone());
        let mut outgoing = self.transcript.clone();
        outgoing.push(user_message.clone());

        if self.turn_policy == TurnPolicy::ConsumeOnFailure {
            self.spend_question();
        }

        let result = gateway
            .complete(&outgoing, self.difficulty.temperature(), REPLY_MAX_TOKENS)
            .await;

        let outcome = match result {
            Ok(reply) => {
                if self.turn_policy == TurnPolicy::RefundOnFailure {
                    self.spend_question();
                }
                TurnOutcome::Answered(reply)
            }
            Err(e) => {
                log::warn!("Session {}: turn failed: {e}", self.id);
                TurnOutcome::Failed(gateway::error_reply(&e))
            }
        };

        let reply = match &outcome {
            TurnOutcome::Answered(text) | TurnOutcome::Failed(text) => text.clone(),
        };
        self.transcript.push(user_message);
        self.transcript
            .push(Message::assistant(reply).with_suspect(self.addressed.clone()));

        log::debug!(
            "Session {}: {} questions remaining",
            self.id,
            self.questions_remaining
        );
        Ok(outcome)
    }

    /// Accuses whoever is named in `accusation`. Allowed in every state, with no limit.
    pub fn guess(&mut self, accusation: &str) -> Result<GuessOutcome, InputError> {
        if accusation.trim().is_empty() {
            return Err(InputError::EmptyGuess);
        }
        let accusation = accusation.to_lowercase();
        let culprit = self.culprit.name.to_lowercase();
        if accusation.contains(&culprit) {
            self.solved = true;
            self.score.solved += 1;
            log::info!("Session {}: case solved", self.id);
            Ok(GuessOutcome::Correct)
        } else {
            self.score.wrong += 1;
            log::info!("Session {}: wrong accusation", self.id);
            Ok(GuessOutcome::Wrong)
        }
    }

    pub fn new_case(&mut self) {
        self.new_case_with(&mut rand::rng());
    }

    pub fn new_case_with(&mut self, rng: &mut impl Rng) {
        let case = case::pick_random_case_with(rng);
        let culprit = case::pick_culprit_with(&case, rng);
        self.reset(case, culprit);
    }

    fn reset(&mut self, case: Case, culprit: Suspect) {
        let culprit = case
            .suspect(&culprit.name)
            .cloned()
            .or_else(|| case.suspects.first().cloned())
            .unwrap_or(culprit);
        self.addressed = case
            .suspects
            .first()
            .map(|s| s.name.clone())
            .unwrap_or_default();
        self.case = case;
        self.culprit = culprit;
        self.questions_remaining = QUESTION_BUDGET;
        self.solved = false;
        self.transcript = vec![self.priming_message(), self.greeting()];
        log::info!(
            "Session {}: new case, {} at {}",
            self.id,
            self.case.crime,
            self.case.location
        );
    }

    fn spend_question(&mut self) {
        self.questions_remaining = self.questions_remaining.saturating_sub(1);
    }

    fn priming_message(&self) -> Message {
        let roster = self
            .case
            .suspects
            .iter()
            .map(|s| {
                let role = if s.name == self.culprit.name {
                    "GUILTY"
                } else {
                    "innocent"
                };
                format!("- {} ({}): {}", s.name, role, s.secret)
            })
            .collect::<Vec<_>>()
            .join("\n");
        Message::system(format!(
            "You play the suspects in a detective mystery game. \
             The crime is: {crime} at {location} {time}. The victim is {victim}. \
             The guilty suspect is '{culprit}'.\n\
             Suspects and their secrets:\n{roster}\n\
             Each detective question is prefixed with the suspect it is addressed to; \
             answer only as that suspect, in character, in a few sentences.\n\
             Difficulty: {difficulty}. {instruction}\n\
             Do NOT reveal the truth directly. Give subtle clues or mislead depending on difficulty. \
             If the player guesses correctly, confirm they solved the case.",
            crime = self.case.crime,
            location = self.case.location,
            time = self.case.time,
            victim = self.case.victim,
            culprit = self.culprit.name,
            difficulty = self.difficulty,
            instruction = self.difficulty.instruction(),
        ))
    }

    fn greeting(&self) -> Message {
        Message::assistant(format!(
            "The suspects are waiting: {}. Ask carefully…",
            self.case.suspect_names().join(", ")
        ))
    }
}
