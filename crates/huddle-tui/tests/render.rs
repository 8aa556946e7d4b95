//! Screen rendering tests.
//!
//! Sessions are driven through the simulation harness, then drawn into a
//! ratatui [`TestBackend`] and checked for the text a user would see.

use huddle_app::{App, AppEvent, KeyInput};
use huddle_core::{ConnectionStatus, Environment, SocketEvent};
use huddle_harness::{
    Scenario,
    fixtures::{message, room, user},
};
use huddle_proto::{Room, ServerEvent};
use huddle_tui::ui;
use ratatui::{Terminal, backend::TestBackend};

const WIDTH: u16 = 120;
const HEIGHT: u16 = 30;

fn screen<E: Environment>(app: &App<E>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
    terminal.draw(|frame| ui::render(frame, app)).unwrap();

    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

fn logged_in(name: &str, id: &str, is_admin: bool, rooms: Vec<Room>) -> Scenario {
    let mut scenario = Scenario::start(11).unwrap();
    scenario.rooms_fetched(rooms).unwrap();
    scenario.login(user(id, name, is_admin), "secret").unwrap();
    scenario
}

#[test]
fn login_screen_offers_admin_fields() {
    let mut scenario = Scenario::start(1).unwrap();
    let text = screen(scenario.app());
    assert!(text.contains("Chat Login"));
    assert!(text.contains("Enter Chat"));
    assert!(!text.contains("Admin Password"));

    scenario.key(KeyInput::Ctrl('a')).unwrap();
    scenario.key(KeyInput::Tab).unwrap();
    scenario.type_text("hunter2").unwrap();

    let text = screen(scenario.app());
    assert!(text.contains("Enter as Admin"));
    assert!(text.contains("Admin Password"));
    assert!(text.contains("*******"));
    assert!(!text.contains("hunter2"));
}

#[test]
fn header_tracks_connection_and_user() {
    let mut scenario = logged_in("root", "a1", true, vec![]);
    let text = screen(scenario.app());
    assert!(text.contains("Disconnected"));
    assert!(text.contains("Logged in as: root (Admin)"));
    assert!(text.contains("No rooms available"));
    assert!(text.contains("Select a room to start chatting"));

    scenario.apply(AppEvent::Socket(SocketEvent::Status(ConnectionStatus::connected("s1")))).unwrap();
    let text = screen(scenario.app());
    assert!(text.contains("● Connected"));
    assert!(text.contains("Socket connected: true"));
}

#[test]
fn room_list_marks_owned_and_joined_rooms() {
    let mine = room("r1", "mine", Some("u1"));
    let general = room("r2", "general", Some("u9"));
    let random = room("r3", "random", None);
    let mut scenario = logged_in("alice", "u1", false, vec![mine, general.clone(), random]);

    scenario.pick_room(&general.id).unwrap();
    scenario.key(KeyInput::Enter).unwrap();
    scenario.acknowledge_join(general, vec![]).unwrap();

    let text = screen(scenario.app());
    assert!(text.contains("# mine (Owner)"));
    assert!(text.contains("# general (Joined)"));
    assert!(text.contains("# random"));
    assert!(!text.contains("random (Joined)"));
    assert!(text.contains("alice has joined the room"));
}

#[test]
fn join_prompt_names_the_room() {
    let general = room("r1", "general", None);
    let mut scenario = logged_in("alice", "u1", false, vec![general.clone()]);

    scenario.pick_room(&general.id).unwrap();
    let text = screen(scenario.app());
    assert!(text.contains("Join Room"));
    assert!(text.contains("Do you want to join \"general\"?"));
}

#[test]
fn chat_shows_history_admin_tags_and_notice() {
    let general = room("r1", "general", None);
    let mut scenario = logged_in("alice", "u1", false, vec![general.clone()]);
    scenario.pick_room(&general.id).unwrap();
    scenario.key(KeyInput::Char('y')).unwrap();

    let bob = user("u2", "bob", false);
    let root = user("a1", "root", true);
    let history = vec![
        message("m1", &bob, "hello there", Some("r1"), scenario.now()),
        message("m2", &root, "be nice", Some("r1"), scenario.now()),
    ];
    scenario.acknowledge_join(general, history).unwrap();

    let text = screen(scenario.app());
    assert!(text.contains("# general"));
    assert!(text.contains("bob: hello there"));
    assert!(text.contains("[ADMIN] root: be nice"));
    assert!(text.contains("alice has joined the room"));
}

#[test]
fn owner_sees_admin_send_checkbox() {
    let den = room("r7", "den", Some("u1"));
    let mut scenario = logged_in("carol", "u1", false, vec![den.clone()]);
    scenario.pick_room(&den.id).unwrap();
    scenario.key(KeyInput::Enter).unwrap();
    scenario.acknowledge_join(den, vec![]).unwrap();

    let text = screen(scenario.app());
    assert!(text.contains("[ ] Send as Admin"));

    scenario.key(KeyInput::Tab).unwrap();
    scenario.key(KeyInput::Ctrl('a')).unwrap();
    let text = screen(scenario.app());
    assert!(text.contains("[x] Send as Admin"));
}

#[test]
fn non_owner_has_no_checkbox() {
    let general = room("r1", "general", Some("u9"));
    let mut scenario = logged_in("alice", "u1", false, vec![general.clone()]);
    scenario.pick_room(&general.id).unwrap();
    scenario.key(KeyInput::Enter).unwrap();
    scenario.acknowledge_join(general, vec![]).unwrap();

    assert!(!screen(scenario.app()).contains("Send as Admin"));
}

#[test]
fn alert_covers_the_screen() {
    let mut scenario = logged_in("alice", "u1", false, vec![]);
    scenario.server(ServerEvent::Error("room full".into())).unwrap();

    let text = screen(scenario.app());
    assert!(text.contains("Alert"));
    assert!(text.contains("Error: room full"));
}

#[test]
fn create_room_dialog_shows_typed_name() {
    let mut scenario = logged_in("root", "a1", true, vec![]);
    scenario.key(KeyInput::Ctrl('n')).unwrap();
    scenario.type_text("lobby").unwrap();

    let text = screen(scenario.app());
    assert!(text.contains("Create New Room"));
    assert!(text.contains("lobby"));
    assert!(scenario.take_emits().is_empty());
}
