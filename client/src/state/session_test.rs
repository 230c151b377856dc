use super::*;

fn snapshot(game_started: Option<bool>, card: Option<&str>) -> StateSnapshot {
    StateSnapshot {
        game_started,
        card: card.map(str::to_owned),
        players: None,
    }
}

fn joined(name: &str) -> SessionState {
    SessionState {
        name: Some(name.to_owned()),
        joined: true,
        ..SessionState::default()
    }
}

// =============================================================
// Phases
// =============================================================

#[test]
fn default_session_shows_forms() {
    let state = SessionState::default();
    assert_eq!(state.player_phase(), PlayerPhase::FormVisible);
    assert_eq!(state.admin_phase(), AdminPhase::LoginVisible);
}

#[test]
fn player_phase_follows_join_ack_and_card() {
    let mut state = joined("Alice");
    state.awaiting_ack = true;
    assert_eq!(state.player_phase(), PlayerPhase::Joining);

    state.awaiting_ack = false;
    assert_eq!(state.player_phase(), PlayerPhase::Queued);

    state.assign_card("joker");
    assert_eq!(state.player_phase(), PlayerPhase::CardShown);
}

#[test]
fn rejected_player_sees_form_even_when_joined() {
    let mut state = joined("Alice");
    state.rejected = true;
    assert_eq!(state.player_phase(), PlayerPhase::FormVisible);
}

#[test]
fn admin_phase_prefers_authenticated() {
    let mut state = SessionState {
        awaiting_ack: true,
        ..SessionState::default()
    };
    assert_eq!(state.admin_phase(), AdminPhase::Authenticating);
    state.authenticated = true;
    assert_eq!(state.admin_phase(), AdminPhase::Dashboard);
}

// =============================================================
// Snapshot reconciliation
// =============================================================

#[test]
fn snapshot_not_started_discards_cached_card() {
    let mut state = joined("Alice");
    state.assign_card("card4");

    assert!(state.apply_snapshot(&snapshot(Some(false), None)));
    assert!(!state.game_started);
    assert_eq!(state.assigned_card, None);
    assert_eq!(state.player_phase(), PlayerPhase::Queued);
}

#[test]
fn snapshot_not_started_wins_over_card_in_same_snapshot() {
    let mut state = joined("Alice");
    state.apply_snapshot(&snapshot(Some(false), Some("card9")));
    assert_eq!(state.assigned_card, None);
    assert!(!state.game_started);
}

#[test]
fn snapshot_card_marks_game_started() {
    let mut state = joined("Alice");
    assert!(state.apply_snapshot(&snapshot(None, Some("joker"))));
    assert!(state.game_started);
    assert_eq!(state.assigned_card.as_deref(), Some("joker"));
}

#[test]
fn snapshot_started_without_card_keeps_cached_card() {
    let mut state = joined("Alice");
    state.assign_card("card2");
    assert!(!state.apply_snapshot(&snapshot(Some(true), None)));
    assert_eq!(state.assigned_card.as_deref(), Some("card2"));
}

#[test]
fn repeated_snapshot_reports_no_change() {
    let mut state = joined("Alice");
    let snap = snapshot(Some(true), Some("card1"));
    assert!(state.apply_snapshot(&snap));
    let after_first = state.clone();
    assert!(!state.apply_snapshot(&snap));
    assert_eq!(state, after_first);
}

#[test]
fn empty_snapshot_changes_nothing() {
    let mut state = joined("Alice");
    state.assign_card("card5");
    assert!(!state.apply_snapshot(&StateSnapshot::default()));
    assert_eq!(state.assigned_card.as_deref(), Some("card5"));
}

// =============================================================
// requestState naming
// =============================================================

#[test]
fn request_name_only_for_joined_player() {
    let mut state = SessionState {
        name: Some("Alice".to_owned()),
        ..SessionState::default()
    };
    assert_eq!(state.request_name(Role::Player), None);
    state.joined = true;
    assert_eq!(state.request_name(Role::Player).as_deref(), Some("Alice"));
}

#[test]
fn request_name_only_for_participating_admin() {
    let mut state = SessionState {
        name: Some("Host".to_owned()),
        ..SessionState::default()
    };
    assert_eq!(state.request_name(Role::Admin), None);
    state.will_play = true;
    assert_eq!(state.request_name(Role::Admin).as_deref(), Some("Host"));
}
