use std::time::Duration;

use super::*;
use crate::net::channel::ChannelEvent;
use crate::persist::MemoryStore;
use crate::persist::mirror::keys;
use crate::render::{QUEUE_HEADING, Screen};
use frames::StateSnapshot;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_owned()).collect()
}

fn fresh() -> PlayerClient<MemoryStore> {
    PlayerClient::new(MemoryStore::new(), ClientOptions::default())
}

fn offline_boot() -> Input<PlayerAction> {
    Input::Boot {
        channel_open: false,
    }
}

fn restored_alice() -> PlayerClient<MemoryStore> {
    let store = MemoryStore::new()
        .with(keys::PLAYER_NAME, "Alice")
        .with(keys::HAS_JOINED, "true");
    PlayerClient::new(store, ClientOptions::default())
}

fn join(name: &str) -> Effect {
    Effect::Emit(ClientEvent::Join {
        name: name.to_owned(),
    })
}

fn request(name: Option<&str>) -> Effect {
    Effect::Emit(ClientEvent::RequestState {
        name: name.map(str::to_owned),
    })
}

fn submit(client: &mut PlayerClient<MemoryStore>, raw: &str) -> Vec<Effect> {
    client.handle(Input::Action(PlayerAction::SubmitName(raw.to_owned())))
}

fn server(client: &mut PlayerClient<MemoryStore>, event: ServerEvent) -> Vec<Effect> {
    client.handle(Input::Server(event))
}

fn roster(players: &[&str]) -> ServerEvent {
    ServerEvent::UpdatePlayers {
        players: names(players),
    }
}

fn refusal(message: &str) -> ServerEvent {
    ServerEvent::Error {
        message: message.to_owned(),
    }
}

fn assign(card: &str) -> ServerEvent {
    ServerEvent::AssignCard {
        card: card.to_owned(),
    }
}

fn queue(players: &[&str]) -> Screen {
    Screen::Queue {
        heading: QUEUE_HEADING.to_owned(),
        players: names(players),
    }
}

fn snapshot(
    game_started: Option<bool>,
    card: Option<&str>,
    players: Option<&[&str]>,
) -> ServerEvent {
    ServerEvent::StateRestored(StateSnapshot {
        game_started,
        card: card.map(str::to_owned),
        players: players.map(names),
    })
}

fn connected_alice() -> PlayerClient<MemoryStore> {
    let mut client = fresh();
    client.handle(Input::Channel(ChannelEvent::Connect));
    submit(&mut client, "Alice");
    server(&mut client, roster(&["Alice"]));
    client
}

// =============================================================
// Submission
// =============================================================

#[test]
fn empty_name_is_rejected_locally() {
    let mut client = fresh();
    let effects = submit(&mut client, "   ");
    assert!(effects.is_empty());
    assert_eq!(client.phase(), PlayerPhase::FormVisible);
    assert!(!client.store().contains(keys::PLAYER_NAME));
}

#[test]
fn submit_persists_before_emitting_join() {
    let mut client = fresh();
    let effects = submit(&mut client, "  Alice ");

    assert_eq!(effects, vec![join("Alice")]);
    assert_eq!(client.store().get(keys::PLAYER_NAME).as_deref(), Some("Alice"));
    assert_eq!(client.store().get(keys::HAS_JOINED).as_deref(), Some("true"));
    assert_eq!(client.phase(), PlayerPhase::Joining);
}

#[test]
fn roster_with_own_name_acknowledges_join() {
    let client = connected_alice();
    assert_eq!(client.phase(), PlayerPhase::Queued);
    assert_eq!(client.view().screen, queue(&["Alice"]));
}

#[test]
fn submit_outside_form_is_ignored() {
    let mut client = connected_alice();
    let effects = submit(&mut client, "Bob");
    assert!(effects.is_empty());
    assert_eq!(client.state().name.as_deref(), Some("Alice"));
}

// =============================================================
// Bootstrap and reconnect
// =============================================================

#[test]
fn restored_join_renders_queue_before_channel_opens() {
    let mut client = restored_alice();
    let effects = client.handle(offline_boot());
    assert!(effects.is_empty());
    assert_eq!(client.phase(), PlayerPhase::Queued);
    assert_eq!(client.view().status.text, "Disconnected");
}

#[test]
fn restored_join_announces_once_channel_opens() {
    let mut client = restored_alice();
    client.handle(offline_boot());

    let effects = client.handle(Input::Channel(ChannelEvent::Connect));
    assert_eq!(effects, vec![join("Alice"), request(Some("Alice"))]);
}

#[test]
fn boot_with_open_channel_announces_immediately() {
    let mut client = restored_alice();
    let effects = client.handle(Input::Boot { channel_open: true });
    assert_eq!(effects, vec![join("Alice"), request(Some("Alice"))]);
    assert_eq!(client.status(), ConnectionStatus::Connected);

    // The open callback arriving afterwards is not a second entry.
    assert!(client.handle(Input::Channel(ChannelEvent::Connect)).is_empty());
}

#[test]
fn unjoined_client_only_requests_state_on_connect() {
    let mut client = fresh();
    let effects = client.handle(Input::Channel(ChannelEvent::Connect));
    assert_eq!(effects, vec![request(None)]);
}

#[test]
fn reconnect_reannounces_and_resyncs() {
    let mut client = connected_alice();
    assert!(client.handle(Input::Channel(ChannelEvent::Disconnect)).is_empty());
    let attempt = client.handle(Input::Channel(ChannelEvent::ReconnectAttempt(1)));
    assert!(attempt.is_empty());
    assert_eq!(client.view().status.text, "Reconnecting... (1)");

    let effects = client.handle(Input::Channel(ChannelEvent::Reconnect(1)));
    assert_eq!(effects, vec![join("Alice"), request(Some("Alice"))]);
}

#[test]
fn reconnect_failed_shows_terminal_status() {
    let mut client = connected_alice();
    client.handle(Input::Channel(ChannelEvent::Disconnect));
    client.handle(Input::Channel(ChannelEvent::ReconnectFailed));
    assert_eq!(client.view().status.text, "Connection Failed");
}

#[test]
fn self_check_recovers_missed_open_and_announces() {
    let mut client = restored_alice();
    client.handle(offline_boot());

    let effects = client.handle(Input::SelfCheck { connected: true });
    assert_eq!(client.view().status.text, "Connected");
    assert_eq!(effects, vec![join("Alice"), request(Some("Alice"))]);

    assert!(client.handle(Input::SelfCheck { connected: true }).is_empty());
    assert!(client.handle(Input::Channel(ChannelEvent::Connect)).is_empty());
}

// =============================================================
// Server errors
// =============================================================

#[test]
fn name_collision_purges_join_and_blocks_auto_rejoin() {
    let mut client = restored_alice();
    client.handle(offline_boot());
    client.handle(Input::Channel(ChannelEvent::Connect));
    server(&mut client, refusal("Name already taken"));

    assert_eq!(client.phase(), PlayerPhase::FormVisible);
    assert_eq!(client.view().notice.as_deref(), Some("Error: Name already taken"));
    assert!(!client.store().contains(keys::HAS_JOINED));

    // Restart: no automatic rejoin, name stays prefilled.
    let mut reloaded = PlayerClient::new(client.into_store(), ClientOptions::default());
    reloaded.handle(offline_boot());
    let effects = reloaded.handle(Input::Channel(ChannelEvent::Connect));
    assert_eq!(effects, vec![request(None)]);
    assert_eq!(
        reloaded.view().screen,
        Screen::JoinForm {
            name: "Alice".to_owned()
        }
    );
}

#[test]
fn other_errors_show_form_but_keep_mirrored_join() {
    let mut client = connected_alice();
    server(&mut client, refusal("Server busy"));

    assert_eq!(client.phase(), PlayerPhase::FormVisible);
    assert_eq!(client.store().get(keys::HAS_JOINED).as_deref(), Some("true"));

    // While rejected, a reconnect does not resend the name.
    client.handle(Input::Channel(ChannelEvent::Disconnect));
    let effects = client.handle(Input::Channel(ChannelEvent::Reconnect(1)));
    assert_eq!(effects, vec![request(None)]);
}

#[test]
fn resubmitting_after_collision_clears_notice() {
    let mut client = connected_alice();
    server(&mut client, refusal("Name already taken"));
    let effects = submit(&mut client, "Alice2");
    assert_eq!(effects, vec![join("Alice2")]);
    assert_eq!(client.view().notice, None);
}

// =============================================================
// Roster and cards
// =============================================================

#[test]
fn second_roster_replaces_first_entirely() {
    let mut client = connected_alice();
    server(&mut client, roster(&["Alice", "Bob", "Carol"]));
    server(&mut client, roster(&["Dave", "Alice"]));

    let Screen::Queue { players, .. } = client.view().screen else {
        panic!("expected queue");
    };
    assert_eq!(players, names(&["Dave", "Alice"]));
}

#[test]
fn assign_card_shows_card_and_banner() {
    let mut client = connected_alice();
    let effects = server(&mut client, assign("card4"));

    let [Effect::DismissBanner { seq, after }] = effects.as_slice() else {
        panic!("expected one banner timer, got {effects:?}");
    };
    assert_eq!(*after, Duration::from_secs(1));

    let view = client.view();
    assert_eq!(view.banner.as_deref(), Some("New Cards Received"));
    let Screen::Card(card) = &view.screen else {
        panic!("expected card screen");
    };
    assert_eq!(card.image, "/static/images/card4.svg");
    assert_eq!(view.status.text, "Connected");
    assert_eq!(client.store().get(keys::ASSIGNED_CARD).as_deref(), Some("card4"));
    assert_eq!(client.store().get(keys::GAME_STARTED).as_deref(), Some("true"));

    client.handle(Input::BannerExpired(*seq));
    assert_eq!(client.view().banner, None);
    assert!(matches!(client.view().screen, Screen::Card(_)));
}

#[test]
fn game_started_persists_flag() {
    let mut client = connected_alice();
    server(&mut client, ServerEvent::GameStarted);
    assert!(client.state().game_started);
    assert_eq!(client.store().get(keys::GAME_STARTED).as_deref(), Some("true"));
    assert_eq!(client.phase(), PlayerPhase::Queued);
}

// =============================================================
// Reconciliation
// =============================================================

#[test]
fn repeated_snapshot_matches_single_delivery() {
    let event = snapshot(Some(true), Some("joker"), Some(&["Alice", "Bob"][..]));

    let mut once = connected_alice();
    server(&mut once, event.clone());

    let mut twice = connected_alice();
    server(&mut twice, event.clone());
    let view_after_first = twice.view();
    let effects = server(&mut twice, event);

    assert!(effects.is_empty());
    assert_eq!(twice.view(), view_after_first);
    assert_eq!(twice.view(), once.view());
}

#[test]
fn snapshot_not_started_reverts_card_to_queue() {
    let mut client = connected_alice();
    server(&mut client, assign("card9"));
    assert_eq!(client.phase(), PlayerPhase::CardShown);

    server(&mut client, snapshot(Some(false), None, Some(&["Alice", "Bob"][..])));

    assert_eq!(client.phase(), PlayerPhase::Queued);
    assert!(!client.store().contains(keys::ASSIGNED_CARD));
    assert_eq!(client.store().get(keys::GAME_STARTED).as_deref(), Some("false"));
    assert_eq!(client.view().screen, queue(&["Alice", "Bob"]));
}

#[test]
fn snapshot_card_restores_card_without_banner() {
    let mut client = restored_alice();
    client.handle(Input::Channel(ChannelEvent::Connect));
    let effects = server(&mut client, snapshot(Some(true), Some("card2"), None));

    assert!(effects.is_empty());
    assert_eq!(client.view().banner, None);
    assert!(matches!(client.view().screen, Screen::Card(_)));
}

#[test]
fn cached_card_is_only_optimistic_until_snapshot() {
    let store = MemoryStore::new()
        .with(keys::PLAYER_NAME, "Alice")
        .with(keys::HAS_JOINED, "true")
        .with(keys::GAME_STARTED, "true")
        .with(keys::ASSIGNED_CARD, "card7");
    let mut client = PlayerClient::new(store, ClientOptions::default());
    client.handle(offline_boot());
    assert_eq!(client.phase(), PlayerPhase::CardShown);

    client.handle(Input::Channel(ChannelEvent::Connect));
    server(&mut client, snapshot(Some(false), None, None));
    assert_eq!(client.phase(), PlayerPhase::Queued);
}
