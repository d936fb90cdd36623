// ../tests/tests.rs
use detective_ratatui::story::{self, parse_suspects};
use detective_ratatui::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::VecDeque;
use std::sync::Mutex;

// Replays canned replies in order and records every request it receives.
#[derive(Default)]
struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    requests: Mutex<Vec<(Vec<Message>, f32, u32)>>,
}

impl ScriptedGateway {
    fn new(replies: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn answering(reply: &str, times: usize) -> Self {
        Self::new((0..times).map(|_| Ok(reply.to_string())).collect())
    }

    fn requests(&self) -> Vec<(Vec<Message>, f32, u32)> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl Gateway for ScriptedGateway {
    async fn complete(
        &self,
        messages: &[Message],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, GatewayError> {
        gateway::validate_messages(messages)?;
        self.requests
            .lock()
            .expect("requests lock")
            .push((messages.to_vec(), temperature, max_tokens));
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Remote("script exhausted".to_string())))
    }
}

fn museum_session(policy: TurnPolicy) -> Session {
    let case = case::catalog().remove(0);
    let culprit = case.suspect("Night Guard").cloned().expect("Night Guard in catalog");
    Session::with_case(case, culprit, Difficulty::Easy, policy)
}

#[tokio::test]
async fn ask_appends_question_and_reply() {
    let gateway = ScriptedGateway::answering("I was doing my rounds.", 1);
    let mut session = museum_session(TurnPolicy::ConsumeOnFailure);

    let outcome = session
        .ask(&gateway, "Where were you at midnight?")
        .await
        .expect("active session accepts questions");

    assert_eq!(
        outcome,
        TurnOutcome::Answered("I was doing my rounds.".to_string())
    );
    assert_eq!(session.questions_remaining(), QUESTION_BUDGET - 1);

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 4);
    assert_eq!(transcript[2].role, Role::User);
    assert_eq!(transcript[2].content, "Where were you at midnight?");
    assert_eq!(transcript[2].suspect.as_deref(), Some("Night Guard"));
    assert_eq!(transcript[3].role, Role::Assistant);
    assert_eq!(transcript[3].content, "I was doing my rounds.");

    let requests = gateway.requests();
    assert_eq!(requests.len(), 1);
    let (messages, temperature, max_tokens) = &requests[0];
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(*temperature, 0.5);
    assert_eq!(*max_tokens, 250);
}

#[tokio::test]
async fn hard_difficulty_raises_the_temperature() {
    let gateway = ScriptedGateway::answering("No comment.", 1);
    let mut session = museum_session(TurnPolicy::ConsumeOnFailure);
    session.set_difficulty(Difficulty::Hard);

    session.ask(&gateway, "Did you steal it?").await.unwrap();

    let requests = gateway.requests();
    assert_eq!(requests[0].1, 0.8);
    assert!(requests[0].0[0].content.contains("Difficulty: Hard"));
}

#[tokio::test]
async fn questions_remaining_never_increases_and_stops_at_zero() {
    let gateway = ScriptedGateway::answering("Hmm.", QUESTION_BUDGET as usize);
    let mut session = museum_session(TurnPolicy::ConsumeOnFailure);

    let mut previous = session.questions_remaining();
    for i in 0..QUESTION_BUDGET {
        session.ask(&gateway, &format!("Question {i}")).await.unwrap();
        assert!(session.questions_remaining() < previous);
        previous = session.questions_remaining();
    }

    assert_eq!(session.questions_remaining(), 0);
    assert_eq!(session.state(), SessionState::Exhausted);

    let len = session.transcript().len();
    assert_eq!(
        session.ask(&gateway, "One more?").await,
        Err(SessionError::OutOfQuestions)
    );
    assert_eq!(session.questions_remaining(), 0);
    assert_eq!(session.transcript().len(), len);
}

#[tokio::test]
async fn solved_session_rejects_questions() {
    let gateway = ScriptedGateway::answering("unused", 1);
    let mut session = museum_session(TurnPolicy::ConsumeOnFailure);

    assert_eq!(
        session.guess("I think it was the night guard"),
        Ok(GuessOutcome::Correct)
    );
    assert_eq!(session.state(), SessionState::Solved);

    let len = session.transcript().len();
    let remaining = session.questions_remaining();
    assert_eq!(
        session.ask(&gateway, "Why did you do it?").await,
        Err(SessionError::AlreadySolved)
    );
    assert_eq!(session.transcript().len(), len);
    assert_eq!(session.questions_remaining(), remaining);
    assert!(gateway.requests().is_empty());
}

#[tokio::test]
async fn exhausted_session_keeps_the_culprit_hidden() {
    let failures = (0..QUESTION_BUDGET)
        .map(|_| Err(GatewayError::Remote("timeout".to_string())))
        .collect();
    let gateway = ScriptedGateway::new(failures);
    let mut session = museum_session(TurnPolicy::ConsumeOnFailure);

    for _ in 0..QUESTION_BUDGET {
        session.ask(&gateway, "Anything?").await.unwrap();
    }
    assert_eq!(session.state(), SessionState::Exhausted);
    assert!(session.reveal_culprit().is_none());

    session.guess("the curator").unwrap();
    assert!(session.reveal_culprit().is_none());
    session.guess("the night guard").unwrap();
    assert_eq!(
        session.reveal_culprit().map(|s| s.name.as_str()),
        Some("Night Guard")
    );
}

#[tokio::test]
async fn empty_question_is_rejected_without_mutation() {
    let gateway = ScriptedGateway::answering("unused", 1);
    let mut session = museum_session(TurnPolicy::ConsumeOnFailure);

    assert_eq!(
        session.ask(&gateway, "   ").await,
        Err(SessionError::Input(InputError::EmptyQuestion))
    );
    assert_eq!(session.questions_remaining(), QUESTION_BUDGET);
    assert_eq!(session.transcript().len(), 2);
    assert!(gateway.requests().is_empty());
}

#[tokio::test]
async fn gateway_failure_still_consumes_the_turn() {
    let gateway = ScriptedGateway::new(vec![Err(GatewayError::Remote(
        "503 Service Unavailable".to_string(),
    ))]);
    let mut session = museum_session(TurnPolicy::ConsumeOnFailure);

    let outcome = session.ask(&gateway, "Where is the diamond?").await.unwrap();

    assert!(matches!(outcome, TurnOutcome::Failed(_)));
    assert_eq!(session.questions_remaining(), QUESTION_BUDGET - 1);

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 4);
    let assistant_after_question: Vec<&Message> = transcript[2..]
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .collect();
    assert_eq!(assistant_after_question.len(), 1);
    assert!(
        assistant_after_question[0]
            .content
            .contains("503 Service Unavailable")
    );
}

#[tokio::test]
async fn refund_policy_keeps_the_question_on_failure() {
    let gateway = ScriptedGateway::new(vec![
        Err(GatewayError::Remote("timeout".to_string())),
        Ok("Fine, I was there.".to_string()),
    ]);
    let mut session = museum_session(TurnPolicy::RefundOnFailure);

    session.ask(&gateway, "Were you there?").await.unwrap();
    assert_eq!(session.questions_remaining(), QUESTION_BUDGET);
    assert_eq!(session.transcript().len(), 4);

    session.ask(&gateway, "Were you there?").await.unwrap();
    assert_eq!(session.questions_remaining(), QUESTION_BUDGET - 1);
}

#[tokio::test]
async fn empty_model_reply_is_kept_as_empty_text() {
    let gateway = ScriptedGateway::answering("", 1);
    let mut session = museum_session(TurnPolicy::ConsumeOnFailure);

    let outcome = session.ask(&gateway, "Anything to add?").await.unwrap();
    assert_eq!(outcome, TurnOutcome::Answered(String::new()));
    assert_eq!(session.transcript()[3].content, "");
}

#[tokio::test]
async fn questions_go_to_the_selected_suspect() {
    let gateway = ScriptedGateway::answering("I mop floors.", 1);
    let mut session = museum_session(TurnPolicy::ConsumeOnFailure);
    session.select_suspect("Janitor").unwrap();

    session.ask(&gateway, "What do you do here?").await.unwrap();

    let requests = gateway.requests();
    let question = requests[0].0.last().unwrap();
    assert_eq!(
        question.prompt_content(),
        "[Detective to Janitor] What do you do here?"
    );
    assert_eq!(session.transcript()[3].suspect.as_deref(), Some("Janitor"));
    assert_eq!(session.culprit().name, "Night Guard");
}

#[test]
fn guess_is_a_case_insensitive_substring_match() {
    let mut session = museum_session(TurnPolicy::ConsumeOnFailure);

    assert_eq!(session.guess("the curator did it"), Ok(GuessOutcome::Wrong));
    assert!(!session.is_solved());
    assert_eq!(
        session.guess("I think it was the NIGHT GUARD"),
        Ok(GuessOutcome::Correct)
    );
    assert!(session.is_solved());
}

#[test]
fn guesses_are_unlimited_even_without_questions() {
    let mut session = museum_session(TurnPolicy::ConsumeOnFailure);
    for _ in 0..25 {
        assert_eq!(session.guess("the janitor"), Ok(GuessOutcome::Wrong));
    }
    assert_eq!(session.score().wrong, 25);
    assert_eq!(session.guess("night guard"), Ok(GuessOutcome::Correct));
}

#[tokio::test]
async fn new_case_resets_the_round_but_keeps_difficulty() {
    let gateway = ScriptedGateway::answering("...", 3);
    let mut session = museum_session(TurnPolicy::ConsumeOnFailure);
    session.set_difficulty(Difficulty::Hard);
    for _ in 0..3 {
        session.ask(&gateway, "Talk.").await.unwrap();
    }
    session.guess("night guard").unwrap();

    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        session.new_case_with(&mut rng);
        assert!(session.case().suspects.contains(session.culprit()));
        assert_eq!(session.questions_remaining(), QUESTION_BUDGET);
        assert!(!session.is_solved());
        assert_eq!(session.difficulty(), Difficulty::Hard);

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role, Role::System);
        assert_eq!(transcript[1].role, Role::Assistant);
    }
}

#[test]
fn score_is_cumulative_across_cases() {
    let mut session = museum_session(TurnPolicy::ConsumeOnFailure);
    let mut rng = StdRng::seed_from_u64(11);

    session.guess("the curator").unwrap();
    session.guess("night guard").unwrap();
    session.guess("still the night guard").unwrap();

    session.new_case_with(&mut rng);
    let culprit = session.culprit().name.clone();
    let innocent = session
        .case()
        .suspects
        .iter()
        .find(|s| s.name != culprit)
        .map(|s| s.name.clone())
        .unwrap();
    session.guess(&innocent).unwrap();
    session.guess(&culprit).unwrap();

    assert_eq!(session.score(), Score { solved: 3, wrong: 2 });
}

#[test]
fn transcript_always_opens_with_one_hidden_system_entry() {
    let mut session = Session::new_with(
        Difficulty::Easy,
        TurnPolicy::ConsumeOnFailure,
        &mut StdRng::seed_from_u64(5),
    );
    session.set_difficulty(Difficulty::Hard);
    session.set_difficulty(Difficulty::Easy);

    let systems = session
        .transcript()
        .iter()
        .filter(|m| m.role == Role::System)
        .count();
    assert_eq!(systems, 1);
    assert_eq!(session.transcript()[0].role, Role::System);
    assert!(session.visible_transcript().all(|m| m.role != Role::System));
}

#[tokio::test]
async fn mystery_generation_uses_three_prompts() {
    let gateway = ScriptedGateway::new(vec![
        Ok("A storm, a manor, a body in the library.".to_string()),
        Ok("- Lady Ashford\n- Dr. Finch\n- Tom the gardener".to_string()),
        Ok("Dr. Finch, because of the muddy boots.".to_string()),
    ]);
    let mut board = MysteryBoard::new();

    let mystery = board.generate(&gateway).await.clone();
    assert_eq!(mystery.story, "A storm, a manor, a body in the library.");
    assert_eq!(
        mystery.suspects,
        vec!["Lady Ashford", "Dr. Finch", "Tom the gardener"]
    );

    let requests = gateway.requests();
    assert_eq!(requests.len(), 3);
    for (messages, temperature, max_tokens) in &requests {
        assert_eq!(messages[0].content, story::ENGINE_PREAMBLE);
        assert_eq!(*temperature, story::STORY_TEMPERATURE);
        assert_eq!(*max_tokens, 4096);
    }
    assert!(requests[1].0[1].content.contains("A storm, a manor"));
}

#[tokio::test]
async fn mystery_failures_become_inline_text() {
    let gateway = ScriptedGateway::new(vec![Err(GatewayError::Remote("rate limited".into()))]);
    let mystery = story::generate_mystery(&gateway).await;
    assert!(mystery.story.starts_with("⚠️ LLM Error:"));
    assert!(mystery.story.contains("rate limited"));
}

#[tokio::test]
async fn interrogation_and_verdict_need_a_mystery() {
    let gateway = ScriptedGateway::answering("unused", 2);
    let mut board = MysteryBoard::new();

    assert_eq!(
        board.interrogate(&gateway, "Dr. Finch", "Where were you?").await,
        Err(InputError::NoMystery)
    );
    assert_eq!(
        board.judge(&gateway, "Dr. Finch").await,
        Err(InputError::NoMystery)
    );
    assert!(gateway.requests().is_empty());
}

#[tokio::test]
async fn verdict_is_recorded_on_the_board() {
    let gateway = ScriptedGateway::new(vec![
        Ok("story".to_string()),
        Ok("- Dr. Finch\n- Tom".to_string()),
        Ok("Dr. Finch did it.".to_string()),
        Ok("I was pruning roses.".to_string()),
        Ok("Correct! Dr. Finch did it.".to_string()),
    ]);
    let mut board = MysteryBoard::new();
    board.generate(&gateway).await;

    assert_eq!(
        board.interrogate(&gateway, "Butler", "Hello?").await,
        Err(InputError::UnknownSuspect("Butler".to_string()))
    );
    let reply = board
        .interrogate(&gateway, "Tom", "What were you doing?")
        .await
        .unwrap();
    assert_eq!(reply, "I was pruning roses.");
    assert_eq!(board.interrogations().len(), 2);

    let verdict = board.judge(&gateway, "Dr. Finch").await.unwrap();
    assert_eq!(verdict, "Correct! Dr. Finch did it.");
    assert_eq!(board.verdict(), Some("Correct! Dr. Finch did it."));

    let prompt = &gateway.requests()[4].0[1].content;
    assert!(prompt.contains("Player guessed: Dr. Finch"));
    assert!(prompt.contains("Actual solution:\nDr. Finch did it."));
}

#[test]
fn suspect_extraction_handles_mixed_bullets() {
    assert_eq!(parse_suspects("* A\n\n-   B \n"), vec!["A", "B"]);
}
