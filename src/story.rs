use crate::error::InputError;
use crate::gateway::{self, Gateway};
use crate::message::Message;

pub const ENGINE_PREAMBLE: &str = "You are a creative mystery game engine. Never reveal the culprit unless explicitly asked in the solution phase.";
pub const STORY_TEMPERATURE: f32 = 0.9;
// Generous enough that a story or verdict is never cut short.
pub const STORY_MAX_TOKENS: u32 = 4096;

const STORY_PROMPT: &str = "Create a short detective mystery with:
- A crime
- 3 suspects with names and short backgrounds
- Clues and red herrings
- A hidden culprit (do not reveal the culprit)
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mystery {
    pub story: String,
    pub suspects: Vec<String>,
    solution: String,
}

impl Mystery {
    pub fn new(story: String, suspects: Vec<String>, solution: String) -> Self {
        Self {
            story,
            suspects,
            solution,
        }
    }

    pub fn has_suspect(&self, name: &str) -> bool {
        self.suspects.iter().any(|s| s == name)
    }
}

/// Generated-mystery game: one story, free interrogations, one verdict at a time.
#[derive(Debug, Default, Clone)]
pub struct MysteryBoard {
    mystery: Option<Mystery>,
    interrogations: Vec<Message>,
    verdict: Option<String>,
}

impl MysteryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mystery(&self) -> Option<&Mystery> {
        self.mystery.as_ref()
    }

    pub fn interrogations(&self) -> &[Message] {
        &self.interrogations
    }

    pub fn verdict(&self) -> Option<&str> {
        self.verdict.as_deref()
    }

    /// Replaces the board wholesale with a fresh mystery.
    pub fn install(&mut self, mystery: Mystery) {
        *self = MysteryBoard {
            mystery: Some(mystery),
            ..MysteryBoard::default()
        };
    }

    pub fn record_interrogation(&mut self, suspect: &str, question: &str, reply: String) {
        self.interrogations
            .push(Message::user(question).with_suspect(suspect));
        self.interrogations
            .push(Message::assistant(reply).with_suspect(suspect));
    }

    pub fn record_verdict(&mut self, verdict: String) {
        self.verdict = Some(verdict);
    }

    pub async fn generate<G: Gateway>(&mut self, gateway: &G) -> &Mystery {
        let mystery = generate_mystery(gateway).await;
        *self = MysteryBoard::default();
        self.mystery.insert(mystery)
    }

    pub async fn interrogate<G: Gateway>(
        &mut self,
        gateway: &G,
        suspect: &str,
        question: &str,
    ) -> Result<String, InputError> {
        let mystery = self.mystery.as_ref().ok_or(InputError::NoMystery)?;
        let reply = interrogate(gateway, mystery, suspect, question).await?;
        self.record_interrogation(suspect, question.trim(), reply.clone());
        Ok(reply)
    }

    pub async fn judge<G: Gateway>(&mut self, gateway: &G, guess: &str) -> Result<String, InputError> {
        let mystery = self.mystery.as_ref().ok_or(InputError::NoMystery)?;
        let verdict = verdict(gateway, mystery, guess).await?;
        self.record_verdict(verdict.clone());
        Ok(verdict)
    }
}

// Gateway failures become visible text, never a hard error.
async fn ask_engine<G: Gateway>(gateway: &G, prompt: &str) -> String {
    match gateway
        .prompt(ENGINE_PREAMBLE, prompt, STORY_TEMPERATURE, STORY_MAX_TOKENS)
        .await
    {
        Ok(text) => text,
        Err(e) => gateway::error_reply(&e),
    }
}

pub async fn generate_mystery<G: Gateway>(gateway: &G) -> Mystery {
    let story = ask_engine(gateway, STORY_PROMPT).await;
    let suspects_text = ask_engine(
        gateway,
        &format!("Extract and list suspects from this mystery in bullet points:\n{story}"),
    )
    .await;
    let solution = ask_engine(
        gateway,
        &format!("Who is the real culprit in this mystery and why? Explain logically:\n{story}"),
    )
    .await;
    Mystery::new(story, parse_suspects(&suspects_text), solution)
}

pub async fn interrogate<G: Gateway>(
    gateway: &G,
    mystery: &Mystery,
    suspect: &str,
    question: &str,
) -> Result<String, InputError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(InputError::EmptyQuestion);
    }
    if !mystery.has_suspect(suspect) {
        return Err(InputError::UnknownSuspect(suspect.to_string()));
    }
    let prompt = format!(
        "You are suspect {suspect} in this mystery:\n{story}\n\n\
         Answer the detective's question in character.\n\
         Do not reveal the real culprit.\n\
         Question: {question}\n",
        story = mystery.story,
    );
    Ok(ask_engine(gateway, &prompt).await)
}

pub async fn verdict<G: Gateway>(
    gateway: &G,
    mystery: &Mystery,
    guess: &str,
) -> Result<String, InputError> {
    let guess = guess.trim();
    if guess.is_empty() {
        return Err(InputError::EmptyGuess);
    }
    if !mystery.has_suspect(guess) {
        return Err(InputError::UnknownSuspect(guess.to_string()));
    }
    let prompt = format!(
        "Mystery:\n{story}\n\nPlayer guessed: {guess}\n\nActual solution:\n{solution}\n\n\
         Tell the player if their guess is correct.\n\
         If wrong, reveal the real culprit with explanation.\n",
        story = mystery.story,
        solution = mystery.solution,
    );
    Ok(ask_engine(gateway, &prompt).await)
}

/// One suspect per non-empty line, bullets stripped.
pub fn parse_suspects(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim())
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
