//! End-to-end tests for the session controller.
//!
//! Sessions are driven with a [`ScriptedOracle`] and a [`MemorySaveSlot`],
//! so the full turn loop runs without a model or a filesystem.

#![allow(clippy::unwrap_used)]

use prosperity_core::oracle::ScriptedOracle;
use prosperity_core::persistence::{MemorySaveSlot, SaveSlot};
use prosperity_core::session::{AppPhase, Notice, SessionController, SubmitError};
use prosperity_core::testing::sample_response;
use prosperity_types::{
    ClauseSelection, InputError, SceneType, TurnInput, initial_game_state,
};

type Session = SessionController<ScriptedOracle, MemorySaveSlot>;

fn playing_session(oracle: ScriptedOracle) -> Session {
    let mut session = SessionController::new(oracle, MemorySaveSlot::new());
    session.start_new_game().unwrap();
    session.finish_intro().unwrap();
    session
}

#[tokio::test]
async fn observe_from_opening_state() {
    let mut session = playing_session(ScriptedOracle::with_script([Ok(sample_response(-5, 3))]));
    let opening_image = session.state().street_view_image().map(str::to_owned);

    let next = session.submit_action(TurnInput::observe()).await.unwrap();

    assert_eq!(next.turn, 2);
    assert_eq!(next.social_fog, 15);
    assert_eq!(next.social_clarity, 83);
    assert_eq!(next.current_scene, SceneType::CabinetStandup);
    assert_eq!(next.history.len(), 2);
    assert_eq!(next.history.first().map(String::as_str), Some("[静默观察]: 静默观察..."));
    assert_eq!(
        next.history.get(1).map(String::as_str),
        Some(">> 结果: 联邦度过了平静的一天。")
    );
    assert_eq!(next.street_view_image().map(str::to_owned), opening_image);
}

#[tokio::test]
async fn oracle_failure_leaves_state_unchanged() {
    let oracle = ScriptedOracle::new();
    oracle.push_failure("connection reset");
    let mut session = playing_session(oracle);
    let before = (*session.state()).clone();

    let result = session.submit_action(TurnInput::free_text("全面封锁港口")).await;

    assert!(matches!(result, Err(SubmitError::Oracle(_))));
    assert_eq!(*session.state(), before);
    assert_eq!(session.notice(), Some(Notice::OracleFailure));
    assert!(!session.is_busy());
    assert_eq!(session.phase(), AppPhase::Playing);
}

#[tokio::test]
async fn session_recovers_after_oracle_failure() {
    let oracle = ScriptedOracle::new();
    oracle.push_failure("timeout");
    oracle.push_response(sample_response(1, -1));
    let mut session = playing_session(oracle);

    assert!(session.submit_action(TurnInput::observe()).await.is_err());
    session.dismiss_notice();
    let next = session.submit_action(TurnInput::observe()).await.unwrap();

    assert_eq!(next.turn, 2);
    assert_eq!(session.oracle().call_count(), 2);
    assert_eq!(session.notice(), None);
}

#[tokio::test]
async fn empty_clause_assembly_is_rejected_without_oracle_call() {
    let mut session = playing_session(ScriptedOracle::with_script([Ok(sample_response(0, 0))]));
    let empty = TurnInput {
        action_type: prosperity_types::ActionType::ClauseAssembly,
        content: String::new(),
    };

    let result = session.submit_action(empty).await;

    assert!(matches!(
        result,
        Err(SubmitError::InvalidInput(InputError::NoClauses))
    ));
    assert_eq!(session.oracle().call_count(), 0);
    assert_eq!(session.state().turn, 1);
}

#[tokio::test]
async fn clause_selection_becomes_a_decree() {
    let mut session = playing_session(ScriptedOracle::with_script([Ok(sample_response(0, 0))]));
    let offered = session.state().available_clauses.clone();
    let mut selection = ClauseSelection::new();
    for (position, clause) in offered.iter().enumerate().take(2) {
        assert!(selection.toggle(position, clause));
    }

    let input = selection.to_input().unwrap();
    session.submit_action(input).await.unwrap();

    let calls = session.oracle().calls();
    let sent = calls.first().map(|c| c.input.content.clone()).unwrap();
    assert_eq!(sent, "签署《边境自动化防卫法案》 + 启动战略粮食储备投放");
    let state = session.state();
    assert!(state.history.first().unwrap().starts_with("[2084] CLAUSE_ASSEMBLY: "));
}

#[tokio::test]
async fn decree_with_separator_inside_a_clause_is_accepted() {
    let mut session = playing_session(ScriptedOracle::with_script([Ok(sample_response(0, 0))]));

    // The oracle is free to offer a clause that already reads like a decree.
    let offered = ["加税 + 减支", "b", "c"];
    let mut selection = ClauseSelection::new();
    for (position, clause) in offered.iter().enumerate() {
        assert!(selection.toggle(position, clause));
    }
    assert_eq!(selection.len(), 3);

    let input = selection.to_input().unwrap();
    assert_eq!(input.content, "加税 + 减支 + b + c");
    let next = session.submit_action(input).await.unwrap();

    assert_eq!(next.turn, 2);
    assert_eq!(session.oracle().call_count(), 1);
}

#[tokio::test]
async fn four_turns_return_to_the_morning_brief() {
    let script = (0..4).map(|_| Ok(sample_response(0, 0)));
    let mut session = playing_session(ScriptedOracle::with_script(script));
    for _ in 0..4 {
        session.submit_action(TurnInput::observe()).await.unwrap();
    }
    let state = session.state();
    assert_eq!(state.turn, 5);
    assert_eq!(state.current_scene, SceneType::MorningBrief);
    assert_eq!(state.history.len(), 8);
}

#[tokio::test]
async fn save_then_load_restores_the_same_state() {
    let mut session = playing_session(ScriptedOracle::with_script([Ok(sample_response(2, -4))]));
    session.submit_action(TurnInput::quick_reply("无视噪音，维持现状。")).await.unwrap();
    session.save_game().unwrap();
    assert!(session.has_save());
    assert_eq!(session.notice(), Some(Notice::Saved));
    let saved = (*session.state()).clone();
    let payload = session.slot().payload().unwrap();

    let mut resumed = SessionController::new(
        ScriptedOracle::new(),
        MemorySaveSlot::with_payload(payload),
    );
    assert!(resumed.has_save());
    resumed.load_game().unwrap();

    assert_eq!(resumed.phase(), AppPhase::Playing);
    assert_eq!(*resumed.state(), saved);
}

#[test]
fn corrupted_save_fails_to_load_and_stays_on_start() {
    let mut session = SessionController::new(
        ScriptedOracle::new(),
        MemorySaveSlot::with_payload("{\"turn\": \"soon\"}"),
    );
    assert!(session.slot().exists());

    assert!(session.load_game().is_err());

    assert_eq!(session.phase(), AppPhase::Start);
    assert_eq!(*session.state(), initial_game_state());
    assert_eq!(session.notice(), Some(Notice::LoadFailed));
}

#[test]
fn new_game_after_nothing_resets_to_opening_state() {
    let mut session = SessionController::new(ScriptedOracle::new(), MemorySaveSlot::new());
    let rx = session.subscribe();
    session.start_new_game().unwrap();
    assert_eq!(rx.borrow().phase, AppPhase::Intro);
    session.finish_intro().unwrap();
    assert_eq!(rx.borrow().phase, AppPhase::Playing);
    assert_eq!(*rx.borrow().state, initial_game_state());
}
