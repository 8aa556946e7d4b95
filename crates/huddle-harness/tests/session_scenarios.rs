//! End-to-end session scenarios through the production runtime.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - Emitted socket events match the user's intent
//! - The message list reflects authoritative history plus local notices
//! - The standard invariants held after every transition

use huddle_app::{AppEvent, Driver, KeyInput, Overlay, Runtime};
use huddle_core::{ConnectionStatus, SocketEvent};
use huddle_harness::{
    InvariantRegistry, Scenario, SimDriver, SimEnv,
    fixtures::{message, room, user},
};
use huddle_proto::{ClientEvent, CreateRoom, JoinRoom, LoginRequest, RoomId, SendMessage, ServerEvent};

#[test]
fn startup_fetches_directory_once() {
    let scenario = Scenario::start(1).unwrap();

    assert_eq!(scenario.driver().fetches(), 1);
    assert!(scenario.app().debug_log().contains("Fetching rooms..."));
}

#[test]
fn admin_creates_room_without_prompt() {
    let mut scenario = Scenario::start(1).unwrap();
    scenario.rooms_fetched(vec![]).unwrap();
    scenario.login(user("admin-1", "root", true), "hunter2").unwrap();

    let logins = scenario.driver_mut().take_logins();
    assert_eq!(logins, vec![LoginRequest {
        name: "root".into(),
        is_admin: true,
        admin_password: Some("hunter2".into()),
    }]);

    scenario.key(KeyInput::Ctrl('n')).unwrap();
    scenario.type_text("general").unwrap();
    scenario.key(KeyInput::Enter).unwrap();

    let emits = scenario.take_emits();
    assert_eq!(emits, vec![ClientEvent::CreateRoom(CreateRoom {
        name: "general".into(),
        admin_id: Some("admin-1".into()),
    })]);

    scenario.server(ServerEvent::RoomCreationSuccess(room("r1", "general", Some("admin-1")))).unwrap();

    let app = scenario.app();
    assert_eq!(app.rooms()[0].name, "general");
    assert!(app.is_joined(&RoomId::from("r1")));
    assert!(app.overlay().is_none());
    assert!(app.debug_log().contains("You created room: general"));

    // Selecting it joins straight away.
    scenario.pick_room(&RoomId::from("r1")).unwrap();
    assert!(scenario.app().overlay().is_none());
    assert!(matches!(scenario.take_emits().as_slice(), [ClientEvent::JoinRoom(_)]));
}

#[test]
fn first_join_prompts_then_announces() {
    let mut scenario = Scenario::start(2).unwrap();
    let general = room("r1", "general", Some("owner"));
    scenario.rooms_fetched(vec![general.clone()]).unwrap();
    let alice = user("u-alice", "alice", false);
    scenario.login(alice.clone(), "").unwrap();

    scenario.pick_room(&general.id).unwrap();
    let prompt_room = match scenario.app().overlay() {
        Some(Overlay::JoinPrompt { room_id }) => room_id.clone(),
        other => panic!("expected join prompt, got {other:?}"),
    };
    let prompt_name = scenario.app().rooms().iter().find(|r| r.id == prompt_room).map(|r| r.name.clone());
    assert_eq!(prompt_name.as_deref(), Some("general"));
    assert!(scenario.take_emits().is_empty());

    scenario.key(KeyInput::Char('y')).unwrap();
    assert_eq!(scenario.take_emits(), vec![ClientEvent::JoinRoom(JoinRoom {
        room_id: general.id.clone(),
        user_id: alice.id.clone(),
        username: "alice".into(),
    })]);

    let bob = user("u-bob", "bob", false);
    let history = vec![message("m1", &bob, "hello", Some("r1"), scenario.now())];
    scenario.acknowledge_join(general.clone(), history).unwrap();

    let messages = scenario.app().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "hello");
    let notice = &messages[1];
    assert!(notice.is_system);
    assert_eq!(notice.text, "alice has joined the room");
    assert_eq!(notice.id.as_str(), format!("system-join-{}", scenario.now().timestamp_millis()));
}

#[test]
fn rejoin_in_same_session_skips_prompt_and_notice() {
    let mut scenario = Scenario::start(3).unwrap();
    let general = room("r1", "general", None);
    let random = room("r2", "random", None);
    scenario.rooms_fetched(vec![general.clone(), random.clone()]).unwrap();
    scenario.login(user("u1", "alice", false), "").unwrap();

    scenario.pick_room(&general.id).unwrap();
    scenario.key(KeyInput::Enter).unwrap();
    scenario.acknowledge_join(general.clone(), vec![]).unwrap();

    scenario.pick_room(&random.id).unwrap();
    scenario.key(KeyInput::Enter).unwrap();
    scenario.acknowledge_join(random, vec![]).unwrap();
    scenario.take_emits();

    scenario.pick_room(&general.id).unwrap();
    assert!(scenario.app().overlay().is_none());
    assert_eq!(scenario.take_emits().len(), 1);

    scenario.acknowledge_join(general, vec![]).unwrap();
    assert!(scenario.app().messages().is_empty());
}

#[test]
fn server_error_raises_alert() {
    let mut scenario = Scenario::start(4).unwrap();
    scenario.server(ServerEvent::Error("room full".into())).unwrap();

    let app = scenario.app();
    assert!(app.alert().is_some_and(|alert| alert.contains("room full")));
    assert!(app.debug_log().contains("Socket error: room full"));
}

#[test]
fn owner_sends_as_admin_once() {
    let mut scenario = Scenario::start(5).unwrap();
    let den = room("r7", "den", Some("u1"));
    scenario.rooms_fetched(vec![den.clone()]).unwrap();
    scenario.login(user("u1", "carol", false), "").unwrap();

    scenario.pick_room(&den.id).unwrap();
    scenario.key(KeyInput::Enter).unwrap();
    scenario.acknowledge_join(den.clone(), vec![]).unwrap();
    scenario.take_emits();

    scenario.key(KeyInput::Tab).unwrap();
    scenario.key(KeyInput::Ctrl('a')).unwrap();
    scenario.type_text("first").unwrap();
    scenario.key(KeyInput::Enter).unwrap();
    scenario.type_text("second").unwrap();
    scenario.key(KeyInput::Enter).unwrap();

    let flags: Vec<_> = scenario
        .take_emits()
        .into_iter()
        .map(|event| match event {
            ClientEvent::SendMessage(SendMessage { text, is_admin, .. }) => (text, is_admin),
            other => panic!("unexpected emit {other:?}"),
        })
        .collect();
    assert_eq!(flags, vec![("first".to_owned(), true), ("second".to_owned(), false)]);
    assert!(scenario.app().draft().text().is_empty());
}

#[test]
fn failed_login_keeps_form() {
    let mut scenario = Scenario::start(6).unwrap();
    scenario.type_text("dave").unwrap();
    scenario.key(KeyInput::Enter).unwrap();
    scenario.apply(AppEvent::LoginFailed { reason: "Failed to login: 500".into() }).unwrap();

    let app = scenario.app();
    assert!(app.login_form().is_some());
    assert_eq!(app.alert(), Some("Failed to login. Please try again."));

    scenario.key(KeyInput::Esc).unwrap();
    assert!(scenario.app().alert().is_none());
    assert!(!scenario.quit_requested());
}

#[test]
fn trace_timestamps_follow_virtual_clock() {
    let mut scenario = Scenario::start(7).unwrap();
    let start = scenario.now();
    scenario.env().advance(std::time::Duration::from_secs(90));
    scenario.apply(AppEvent::Socket(SocketEvent::Status(ConnectionStatus::connected("s1")))).unwrap();

    let entry = scenario.app().debug_log().last().unwrap();
    assert_eq!(entry.message, "Socket connected: true");
    assert_eq!(entry.at - start, chrono::TimeDelta::seconds(90));
}

#[tokio::test]
async fn runtime_runs_scripted_session_until_quit() {
    let mut driver = SimDriver::new().with_invariants(InvariantRegistry::standard());
    driver.inject_event(AppEvent::RoomsFetched(vec![room("r1", "general", None)]));
    driver.inject_text("erin");
    driver.inject_key(KeyInput::Enter);
    driver.inject_event(AppEvent::LoginSucceeded(user("u5", "erin", false)));
    driver.inject_status(ConnectionStatus::connected("sid"));
    driver.inject_key(KeyInput::Enter);
    driver.inject_key(KeyInput::Char('y'));
    driver.inject_key(KeyInput::Esc);
    driver.inject_event(AppEvent::Tick);

    let mut runtime = Runtime::new(driver, SimEnv::with_seed(9));
    assert_eq!(runtime.start(), Ok(false));
    while runtime.step().await.unwrap() {}

    let driver = runtime.driver_mut();
    assert!(driver.has_pending(), "events after quit stay queued");
    assert_eq!(driver.take_logins().len(), 1);
    assert!(matches!(driver.take_emits().as_slice(), [ClientEvent::JoinRoom(_)]));
    assert!(runtime.app().connection().connected);
}

#[tokio::test]
async fn exhausted_inbox_ends_run() {
    let mut driver = SimDriver::new();
    assert_eq!(driver.next_event().await, Ok(None));
    driver.inject_event(AppEvent::Tick);

    let driver = Runtime::new(driver, SimEnv::default()).run().await.unwrap();
    assert!(driver.stopped());
    assert_eq!(driver.fetches(), 1);
}
