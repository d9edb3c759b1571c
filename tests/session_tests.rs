//! Session integration tests: delayed un-flips and score submission.
//!
//! Timer tests run on a paused tokio clock, so delays elapse instantly and
//! deterministically.

use std::time::Duration;

use card_match::core::{Address, CardId, GameId, MatchConfig};
use card_match::error::MatchError;
use card_match::ledger::{GameParams, InMemoryLedger, LedgerRejection, ScoreLedger};
use card_match::round::{FlipOutcome, RoundPhase};
use card_match::session::{Session, SubmissionStatus, SubmitRequest};

const ALICE: &str = "0xA11CE";
const BOB: &str = "0xB0B";

fn session(config: MatchConfig) -> Session {
    Session::new(config.with_seed(42)).unwrap()
}

fn is_up(session: &Session, id: u32) -> bool {
    session.round().card(CardId::new(id)).unwrap().is_flipped
}

fn clear_board(session: &mut Session) {
    let pairs = session.round().pairs() as u32;
    for i in 0..pairs {
        session.flip(CardId::new(i)).unwrap();
        session.flip(CardId::new(i + pairs)).unwrap();
    }
    assert!(session.round().is_complete());
}

/// Ledger with one game open at t=1500 and two joined players.
fn ledger() -> (InMemoryLedger, GameId) {
    let ledger = InMemoryLedger::new();
    ledger.set_now(1_500);
    let game = ledger.create_game(GameParams {
        title: "Memory".to_string(),
        description: String::new(),
        owner: Address::new(ALICE),
        participants: 2,
        number_of_winners: 1,
        start_date: 1_000,
        end_date: 2_000,
    });
    ledger.join(game, Address::new(ALICE)).unwrap();
    ledger.join(game, Address::new(BOB)).unwrap();
    (ledger, game)
}

// =============================================================================
// Delayed Un-flip
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_mismatch_hidden_after_delay() {
    let mut session = session(MatchConfig::default());

    session.flip(CardId::new(0)).unwrap();
    let outcome = session.flip(CardId::new(1)).unwrap();
    assert!(matches!(outcome, FlipOutcome::Mismatch(_)));

    tokio::time::sleep(Duration::from_millis(999)).await;
    assert!(is_up(&session, 0));
    assert!(is_up(&session, 1));

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(!is_up(&session, 0));
    assert!(!is_up(&session, 1));
    assert_eq!(session.round().move_count(), 2);
    assert_eq!(session.pending_unflips(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_custom_delay() {
    let mut session = session(MatchConfig::default().with_unflip_delay_ms(50));

    session.flip(CardId::new(2)).unwrap();
    session.flip(CardId::new(3)).unwrap();

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(!is_up(&session, 2));
    assert!(!is_up(&session, 3));
}

#[tokio::test(start_paused = true)]
async fn test_subscriber_sees_unflip() {
    let mut session = session(MatchConfig::default());
    let mut rx = session.subscribe();

    session.flip(CardId::new(0)).unwrap();
    session.flip(CardId::new(1)).unwrap();
    rx.borrow_and_update();

    // Next change is the timer hiding both cards
    rx.changed().await.unwrap();
    let round = rx.borrow_and_update().clone();
    assert_eq!(round.flipped_count(), 0);
    assert_eq!(round.move_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_play_continues_during_delay() {
    let mut session = session(MatchConfig::default());

    session.flip(CardId::new(0)).unwrap();
    session.flip(CardId::new(1)).unwrap();
    // Next turn starts before the mismatch is hidden
    session.flip(CardId::new(2)).unwrap();
    session.flip(CardId::new(8)).unwrap();

    tokio::time::sleep(Duration::from_millis(1_100)).await;
    assert!(!is_up(&session, 0));
    assert!(!is_up(&session, 1));
    assert!(is_up(&session, 2));
    assert!(is_up(&session, 8));
    assert_eq!(session.round().move_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_reset_discards_pending_unflip() {
    let mut session = session(MatchConfig::default());

    session.flip(CardId::new(0)).unwrap();
    session.flip(CardId::new(1)).unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;

    let fresh = session.reset();
    assert_eq!(fresh.move_count(), 0);
    assert_eq!(fresh.open_cards().len(), 0);
    assert!(!fresh.is_complete());

    session.flip(CardId::new(0)).unwrap();
    session.flip(CardId::new(1)).unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;

    // Only the new round's own timer may hide its cards
    assert!(is_up(&session, 0));
    assert!(is_up(&session, 1));

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(!is_up(&session, 0));
    assert!(!is_up(&session, 1));
}

#[tokio::test(start_paused = true)]
async fn test_clearing_board_during_delay_stays_complete() {
    let mut session = session(MatchConfig::default());

    // 0/1 mismatch, four pairs, then 6/7 mismatches onto a full board
    for id in [0, 1, 2, 8, 3, 9, 4, 10, 5, 11, 6, 7] {
        session.flip(CardId::new(id)).unwrap();
    }
    assert!(session.round().is_complete());
    assert_eq!(session.pending_unflips(), 0);

    tokio::time::sleep(Duration::from_millis(1_100)).await;
    let round = session.round();
    assert_eq!(round.phase(), RoundPhase::Complete);
    assert_eq!(round.flipped_count(), 12);
    assert_eq!(round.move_count(), 12);
}

#[tokio::test(start_paused = true)]
async fn test_pair_found_during_delay_stays_revealed() {
    let mut session = session(MatchConfig::default());

    session.flip(CardId::new(0)).unwrap();
    session.flip(CardId::new(1)).unwrap();
    session.flip(CardId::new(6)).unwrap();
    let outcome = session.flip(CardId::new(0)).unwrap();
    assert_eq!(outcome, FlipOutcome::Matched(CardId::new(6), CardId::new(0)));

    tokio::time::sleep(Duration::from_millis(1_100)).await;
    assert!(is_up(&session, 0));
    assert!(is_up(&session, 6));
    assert!(!is_up(&session, 1));
}

// =============================================================================
// Submission
// =============================================================================

#[tokio::test]
async fn test_submit_records_moves_and_resets() {
    let (ledger, game) = ledger();
    let mut session = session(MatchConfig::default());
    clear_board(&mut session);

    let alice = Address::new(ALICE);
    let receipt = session.submit_to(&ledger, game, Some(&alice), 1_500).await.unwrap();

    assert_eq!(receipt.submission.participant_index, 0);
    assert_eq!(receipt.submission.move_count, 12);
    assert_eq!(session.round().move_count(), 0);
    assert_eq!(session.round().generation(), 1);
    assert_eq!(session.status(), &SubmissionStatus::NotSubmitted);

    let scores = ledger.scores(game).await.unwrap();
    assert!(scores[0].played);
    assert_eq!(scores[0].score, 12);
}

#[tokio::test]
async fn test_submit_twice_rejected_locally() {
    let (ledger, game) = ledger();
    let mut session = session(MatchConfig::default().keep_after_submit());
    clear_board(&mut session);
    let alice = Address::new(ALICE);

    session.submit_to(&ledger, game, Some(&alice), 1_500).await.unwrap();
    assert!(matches!(session.status(), SubmissionStatus::Submitted(_)));

    assert_eq!(
        session.submit_to(&ledger, game, Some(&alice), 1_500).await,
        Err(MatchError::AlreadySubmitted)
    );
}

#[tokio::test]
async fn test_already_played_is_terminal() {
    let (ledger, game) = ledger();
    let alice = Address::new(ALICE);

    let mut first = session(MatchConfig::default());
    clear_board(&mut first);
    first.submit_to(&ledger, game, Some(&alice), 1_500).await.unwrap();

    let mut second = session(MatchConfig::default());
    clear_board(&mut second);
    assert_eq!(
        second.submit_to(&ledger, game, Some(&alice), 1_500).await,
        Err(MatchError::SubmissionRejected(LedgerRejection::AlreadyPlayed))
    );
    assert_eq!(
        second.status(),
        &SubmissionStatus::Rejected(LedgerRejection::AlreadyPlayed)
    );

    // Locked until reset, even without asking the ledger
    assert_eq!(
        second.submit_to(&ledger, game, Some(&alice), 1_500).await,
        Err(MatchError::SubmissionRejected(LedgerRejection::AlreadyPlayed))
    );
    second.reset();
    assert_eq!(second.status(), &SubmissionStatus::NotSubmitted);
}

#[tokio::test]
async fn test_cancellation_allows_retry() {
    let (ledger, game) = ledger();
    let mut session = session(MatchConfig::default());
    clear_board(&mut session);
    let bob = Address::new(BOB);

    ledger.fail_next(LedgerRejection::UserCancelled);
    assert_eq!(
        session.submit_to(&ledger, game, Some(&bob), 1_500).await,
        Err(MatchError::SubmissionRejected(LedgerRejection::UserCancelled))
    );
    assert_eq!(session.status(), &SubmissionStatus::NotSubmitted);
    assert!(session.round().is_complete());

    let receipt = session.submit_to(&ledger, game, Some(&bob), 1_500).await.unwrap();
    assert_eq!(receipt.submission.participant_index, 1);
}

#[tokio::test]
async fn test_prechecks() {
    let (ledger, game) = ledger();
    let info = ledger.game(game).await.unwrap().unwrap();
    let scores = ledger.scores(game).await.unwrap();
    let alice = Address::new(ALICE);
    let stranger = Address::new("0x5757");

    let mut session = session(MatchConfig::default());
    let request = |account, now| SubmitRequest {
        game: &info,
        scores: &scores,
        account,
        now,
    };

    assert_eq!(
        session.submit(&ledger, request(None, 1_500)).await,
        Err(MatchError::WalletNotConnected)
    );
    assert_eq!(
        session.submit(&ledger, request(Some(&stranger), 1_500)).await,
        Err(MatchError::ParticipantNotFound)
    );
    assert_eq!(
        session.submit(&ledger, request(Some(&alice), 1_500)).await,
        Err(MatchError::RoundIncomplete)
    );

    clear_board(&mut session);
    assert_eq!(
        session.submit(&ledger, request(Some(&alice), 900)).await,
        Err(MatchError::SubmissionRejected(LedgerRejection::GameNotStarted))
    );
    assert_eq!(session.status(), &SubmissionStatus::NotSubmitted);

    assert_eq!(
        session.submit(&ledger, request(Some(&alice), 2_500)).await,
        Err(MatchError::SubmissionRejected(LedgerRejection::GameEnded))
    );
    assert_eq!(
        session.status(),
        &SubmissionStatus::Rejected(LedgerRejection::GameEnded)
    );
}

#[tokio::test]
async fn test_deleted_game_rejected_before_ledger() {
    let (ledger, game) = ledger();
    ledger.delete_game(game).unwrap();
    let mut session = session(MatchConfig::default());
    clear_board(&mut session);

    assert_eq!(
        session.submit_to(&ledger, game, Some(&Address::new(ALICE)), 1_500).await,
        Err(MatchError::SubmissionRejected(LedgerRejection::GameNotFound))
    );
    assert_eq!(
        session.status(),
        &SubmissionStatus::Rejected(LedgerRejection::GameNotFound)
    );
    assert!(ledger.scores(game).await.unwrap().iter().all(|record| !record.played));
}

#[tokio::test]
async fn test_unknown_game() {
    let (ledger, _) = ledger();
    let mut session = session(MatchConfig::default());
    clear_board(&mut session);

    assert_eq!(
        session
            .submit_to(&ledger, GameId::new(77), Some(&Address::new(ALICE)), 1_500)
            .await,
        Err(MatchError::SubmissionRejected(LedgerRejection::GameNotFound))
    );
}
