// /app.rs
use crate::{
    error::{InputError, SessionError},
    gateway::OpenAiGateway,
    session::{GuessOutcome, Session, SessionState, TurnOutcome, TurnPolicy},
    settings::Settings,
    story::MysteryBoard,
    transcribe::{AudioClip, OpenAiTranscriber, Transcriber},
    tui::{Tui, TuiEvent},
    ui::{self, spinner::Spinner, textarea::new_textarea},
};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tui_textarea::TextArea;

pub enum Action {
    Quit,
    SwitchScreen(Screen),
    TurnFinished(Box<Result<TurnOutcome, SessionError>>),
    TranscriptionResult(String),
    TranscriptionError(String),
    MysteryGenerated,
    InterrogationReply(Result<String, InputError>),
    Verdict(Result<String, InputError>),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    #[default]
    MainMenu,
    Interrogation,
    Mystery,
}

pub const MENU_ITEMS: [&str; 3] = ["Interrogation room", "Mystery generator", "Quit"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    #[default]
    Question,
    Guess,
    AudioPath,
}

impl InputTarget {
    pub fn next(self) -> Self {
        match self {
            InputTarget::Question => InputTarget::Guess,
            InputTarget::Guess => InputTarget::AudioPath,
            InputTarget::AudioPath => InputTarget::Question,
        }
    }

    // The mystery screen has no voice input.
    pub fn next_in_mystery(self) -> Self {
        match self {
            InputTarget::Question => InputTarget::Guess,
            InputTarget::Guess | InputTarget::AudioPath => InputTarget::Question,
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            InputTarget::Question => "Type your question for the suspect...",
            InputTarget::Guess => "Who is the culprit? What happened?",
            InputTarget::AudioPath => "Path to your recorded question (wav/mp3)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

pub struct App {
    // Application state and control flow
    running: bool,
    pub screen: Screen,
    pub menu_state: ListState,
    pub settings: Settings,

    // --- Remote services
    gateway: Arc<OpenAiGateway>,
    story_gateway: Arc<OpenAiGateway>,
    transcriber: Arc<OpenAiTranscriber>,

    // --- Interrogation room
    session: Arc<Mutex<Session>>,
    pub snapshot: Session, // Rendered while a turn holds the session lock.
    pub pending_question: Option<String>,

    // --- Mystery generator
    board: Arc<Mutex<MysteryBoard>>,
    pub board_view: MysteryBoard, // Same role as `snapshot`, for the mystery game.
    pub story_suspect: usize,

    // --- UI elements
    pub input: TextArea<'static>,
    pub input_target: InputTarget,
    pub notice: Option<Notice>,
    pub spinner: Spinner,
    pub pending: bool,
    pub transcript_scroll: u16,

    action_sender: mpsc::UnboundedSender<Action>,
    action_receiver: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(settings: Settings, api_key: &str) -> Self {
        let (action_sender, action_receiver) = mpsc::unbounded_channel();
        let session = Session::new(settings.difficulty, settings.turn_policy);
        log::info!("Session {} created", session.id());

        let mut menu_state = ListState::default();
        menu_state.select(Some(0));

        Self {
            running: true,
            screen: Screen::MainMenu,
            menu_state,

            gateway: Arc::new(OpenAiGateway::for_interrogation(&settings, api_key)),
            story_gateway: Arc::new(OpenAiGateway::for_story(&settings, api_key)),
            transcriber: Arc::new(OpenAiTranscriber::new(&settings, api_key)),
            settings,

            snapshot: session.clone(),
            session: Arc::new(Mutex::new(session)),
            pending_question: None,

            board: Arc::new(Mutex::new(MysteryBoard::new())),
            board_view: MysteryBoard::new(),
            story_suspect: 0,

            input: new_textarea(InputTarget::Question.placeholder()),
            input_target: InputTarget::Question,
            notice: None,
            spinner: Spinner::new(),
            pending: false,
            transcript_scroll: 0,

            action_sender,
            action_receiver,
        }
    }

    // Asynchronous function to continuously run and update the application.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?.tick_rate(10.0).frame_rate(30.0);
        tui.enter()?;

        while self.running {
            tui.draw(|frame| ui::draw(frame, self))?;

            tokio::select! {
                Some(event) = tui.next() => self.handle_tui_event(event),
                Some(action) = self.action_receiver.recv() => self.handle_action(action),
            }
        }

        tui.exit()?;
        Ok(())
    }

    fn handle_tui_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Key(key_event) => self.on_key(key_event),
            TuiEvent::Paste(text) => {
                self.input.insert_str(text);
            }
            TuiEvent::Tick => {
                if self.pending {
                    self.spinner.advance();
                }
            }
            TuiEvent::Error => log::warn!("Terminal event error"),
            TuiEvent::Init | TuiEvent::Render | TuiEvent::Resize(_, _) => {}
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::SwitchScreen(screen) => self.switch_screen(screen),
            Action::TurnFinished(result) => {
                self.pending = false;
                self.pending_question = None;
                match *result {
                    Ok(TurnOutcome::Answered(_)) => self.notice = None,
                    Ok(TurnOutcome::Failed(_)) => {
                        self.notice = Some(Notice::error(failure_notice(
                            self.snapshot.turn_policy(),
                        )))
                    }
                    Err(e) => self.notice = Some(Notice::error(e.to_string())),
                }
                self.refresh_snapshot();
                self.transcript_scroll = 0;
            }
            Action::TranscriptionResult(text) => {
                self.pending = false;
                self.notice = Some(Notice::info(format!("🎙️ You asked: {text}")));
                self.submit_question(text);
            }
            Action::TranscriptionError(error) => {
                self.pending = false;
                log::warn!("Transcription error: {error}");
                self.notice = Some(Notice::error(format!(
                    "Could not understand audio. ({error})"
                )));
            }
            Action::MysteryGenerated => {
                self.pending = false;
                self.story_suspect = 0;
                self.notice = None;
                self.refresh_board_view();
            }
            Action::InterrogationReply(reply) | Action::Verdict(reply) => {
                self.pending = false;
                if let Err(e) = reply {
                    self.notice = Some(Notice::error(e.to_string()));
                }
                self.refresh_board_view();
            }
        }
    }

    fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.notice = None;
        self.set_input_target(InputTarget::Question);
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.handle_action(Action::Quit);
            return;
        }
        match self.screen {
            Screen::MainMenu => self.on_menu_key(key),
            Screen::Interrogation => self.on_interrogation_key(key),
            Screen::Mystery => self.on_mystery_key(key),
        }
    }

    fn on_menu_key(&mut self, key: KeyEvent) {
        let selected = self.menu_state.selected().unwrap_or(0);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                let previous = (selected + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
                self.menu_state.select(Some(previous));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.menu_state.select(Some((selected + 1) % MENU_ITEMS.len()));
            }
            KeyCode::Enter => self.select_menu_item(selected),
            KeyCode::Char(c @ '1'..='3') => {
                let index = c as usize - '1' as usize;
                self.menu_state.select(Some(index));
                self.select_menu_item(index);
            }
            KeyCode::Char('q') | KeyCode::Esc => self.handle_action(Action::Quit),
            _ => {}
        }
    }

    fn select_menu_item(&mut self, index: usize) {
        let action = match index {
            0 => Action::SwitchScreen(Screen::Interrogation),
            1 => Action::SwitchScreen(Screen::Mystery),
            _ => Action::Quit,
        };
        self.handle_action(action);
    }

    fn on_interrogation_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.handle_action(Action::SwitchScreen(Screen::MainMenu)),
            KeyCode::Char('n') if ctrl => self.with_session(|session| {
                session.new_case();
                Some(Notice::info("A new case lands on your desk."))
            }),
            KeyCode::Char('d') if ctrl => self.with_session(|session| {
                let difficulty = session.difficulty().toggled();
                session.set_difficulty(difficulty);
                Some(Notice::info(format!("Difficulty set to {difficulty}")))
            }),
            KeyCode::Char('s') if ctrl => self.with_session(|session| {
                session.cycle_suspect();
                None
            }),
            KeyCode::Tab => self.set_input_target(self.input_target.next()),
            KeyCode::PageUp => self.transcript_scroll = self.transcript_scroll.saturating_add(5),
            KeyCode::PageDown => self.transcript_scroll = self.transcript_scroll.saturating_sub(5),
            KeyCode::Enter => {
                let text = self.take_input();
                match self.input_target {
                    InputTarget::Question => self.submit_question(text),
                    InputTarget::Guess => self.submit_guess(&text),
                    InputTarget::AudioPath => self.submit_audio(text),
                }
            }
            _ => {
                self.input.input(key);
            }
        }
    }

    fn on_mystery_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.handle_action(Action::SwitchScreen(Screen::MainMenu)),
            KeyCode::Char('g') if ctrl => self.generate_mystery(),
            KeyCode::Char('s') if ctrl => {
                let count = self.board_view.mystery().map_or(0, |m| m.suspects.len());
                if count > 0 {
                    self.story_suspect = (self.story_suspect + 1) % count;
                }
            }
            KeyCode::Tab => self.set_input_target(self.input_target.next_in_mystery()),
            KeyCode::Enter => {
                let text = self.take_input();
                match self.input_target {
                    InputTarget::Guess => self.submit_verdict(text),
                    _ => self.submit_interrogation(text),
                }
            }
            _ => {
                self.input.input(key);
            }
        }
    }

    fn set_input_target(&mut self, target: InputTarget) {
        self.input_target = target;
        self.input.set_placeholder_text(target.placeholder());
    }

    fn take_input(&mut self) -> String {
        let text = self.input.lines().join(" ");
        self.input = new_textarea(self.input_target.placeholder());
        text
    }

    /// Runs a synchronous session mutation, refusing while a turn is in flight.
    fn with_session(&mut self, mutate: impl FnOnce(&mut Session) -> Option<Notice>) {
        let notice = match self.session.try_lock() {
            Ok(mut session) => {
                let notice = mutate(&mut session);
                self.snapshot = session.clone();
                notice
            }
            Err(_) => Some(Notice::error("Wait for the suspect to finish answering.")),
        };
        self.notice = notice;
        self.transcript_scroll = 0;
    }

    fn refresh_board_view(&mut self) {
        if let Ok(board) = self.board.try_lock() {
            self.board_view = board.clone();
        }
    }

    fn refresh_snapshot(&mut self) {
        if let Ok(session) = self.session.try_lock() {
            self.snapshot = session.clone();
        }
    }

    fn submit_question(&mut self, question: String) {
        if self.pending {
            self.notice = Some(Notice::error("Wait for the suspect to finish answering."));
            return;
        }
        if question.trim().is_empty() {
            self.notice = Some(Notice::error(InputError::EmptyQuestion.to_string()));
            return;
        }
        match self.snapshot.state() {
            SessionState::Solved => {
                self.notice = Some(Notice::error(SessionError::AlreadySolved.to_string()));
                return;
            }
            SessionState::Exhausted => {
                self.notice = Some(Notice::error(SessionError::OutOfQuestions.to_string()));
                return;
            }
            SessionState::Active => {}
        }

        self.pending = true;
        self.pending_question = Some(question.clone());
        let session = Arc::clone(&self.session);
        let gateway = Arc::clone(&self.gateway);
        let sender = self.action_sender.clone();
        tokio::spawn(async move {
            let result = {
                let mut session = session.lock().await;
                session.ask(gateway.as_ref(), &question).await
            };
            let _ = sender.send(Action::TurnFinished(Box::new(result)));
        });
    }

    fn submit_guess(&mut self, accusation: &str) {
        self.with_session(|session| match session.guess(accusation) {
            Ok(GuessOutcome::Correct) => Some(Notice::success("🎉 Case Solved! You caught the culprit.")),
            Ok(GuessOutcome::Wrong) => Some(Notice::error("❌ Wrong accusation!")),
            Err(e) => Some(Notice::error(e.to_string())),
        });
    }

    fn submit_audio(&mut self, path: String) {
        let path = path.trim().to_string();
        if path.is_empty() {
            self.notice = Some(Notice::error("Enter the path of a wav or mp3 file."));
            return;
        }
        if self.pending {
            self.notice = Some(Notice::error("Wait for the suspect to finish answering."));
            return;
        }
        self.pending = true;
        self.set_input_target(InputTarget::Question);
        let transcriber = Arc::clone(&self.transcriber);
        let sender = self.action_sender.clone();
        tokio::spawn(async move {
            let result = match AudioClip::from_path(&path).await {
                Ok(clip) => transcriber.transcribe(clip).await,
                Err(e) => Err(e),
            };
            let action = match result {
                Ok(text) => Action::TranscriptionResult(text),
                Err(e) => Action::TranscriptionError(e.to_string()),
            };
            let _ = sender.send(action);
        });
    }

    fn generate_mystery(&mut self) {
        if self.pending {
            return;
        }
        self.pending = true;
        self.notice = Some(Notice::info("Creating mystery..."));
        let board = Arc::clone(&self.board);
        let gateway = Arc::clone(&self.story_gateway);
        let sender = self.action_sender.clone();
        tokio::spawn(async move {
            board.lock().await.generate(gateway.as_ref()).await;
            let _ = sender.send(Action::MysteryGenerated);
        });
    }

    pub fn selected_story_suspect(&self) -> Option<&str> {
        self.board_view
            .mystery()
            .and_then(|m| m.suspects.get(self.story_suspect))
            .map(String::as_str)
    }

    fn submit_interrogation(&mut self, question: String) {
        if self.pending {
            return;
        }
        let Some(suspect) = self.selected_story_suspect().map(String::from) else {
            self.notice = Some(Notice::error(InputError::NoMystery.to_string()));
            return;
        };
        if question.trim().is_empty() {
            self.notice = Some(Notice::error("Select a suspect and write your question."));
            return;
        }
        self.pending = true;
        self.notice = None;
        let board = Arc::clone(&self.board);
        let gateway = Arc::clone(&self.story_gateway);
        let sender = self.action_sender.clone();
        tokio::spawn(async move {
            let reply = board
                .lock()
                .await
                .interrogate(gateway.as_ref(), &suspect, &question)
                .await;
            let _ = sender.send(Action::InterrogationReply(reply));
        });
    }

    // An empty accusation falls back to the highlighted suspect.
    fn submit_verdict(&mut self, accusation: String) {
        if self.pending {
            return;
        }
        let accusation = match accusation.trim() {
            "" => self.selected_story_suspect().map(String::from),
            typed => Some(typed.to_string()),
        };
        let Some(guess) = accusation else {
            self.notice = Some(Notice::error(InputError::NoMystery.to_string()));
            return;
        };
        self.pending = true;
        self.notice = Some(Notice::info("Evaluating..."));
        self.set_input_target(InputTarget::Question);
        let board = Arc::clone(&self.board);
        let gateway = Arc::clone(&self.story_gateway);
        let sender = self.action_sender.clone();
        tokio::spawn(async move {
            let verdict = board.lock().await.judge(gateway.as_ref(), &guess).await;
            let _ = sender.send(Action::Verdict(verdict));
        });
    }
}

fn failure_notice(policy: TurnPolicy) -> &'static str {
    match policy {
        TurnPolicy::ConsumeOnFailure => "The suspect could not answer. The question still counts.",
        TurnPolicy::RefundOnFailure => "The suspect could not answer. The question was not counted.",
    }
}
