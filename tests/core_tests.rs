//! Integration tests for coachboard core infrastructure
//!
//! Settings persistence against a scratch directory, and the console
//! command parser feeding a real session.

use std::fs;
use std::path::PathBuf;

use coachboard::core::settings_persistence::{load_settings_from, save_settings_to};
use coachboard::core::CoachSettings;
use coachboard::game::{
    CoachingIntensity, GameSession, InputEvent, Outcome, PlayerColor, SessionMode, Step,
};
use coachboard::input::{parse_command, ConsoleCommand};

/// Fresh scratch directory unique to one test
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("coachboard-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_settings_round_trip() {
    //! Saved settings load back unchanged, creating the directory on the way
    let dir = scratch_dir("round-trip");
    let path = dir.join("nested").join("settings.json");

    let settings = CoachSettings {
        gateway_url: "http://coach.local:8080/api/game".to_string(),
        request_timeout_secs: 12,
        player_rating: 1650,
        coaching_intensity: CoachingIntensity::High,
        player_color: PlayerColor::Black,
        start_batched: true,
    };

    save_settings_to(&path, &settings).expect("Settings should save");
    assert!(path.exists());
    assert_eq!(load_settings_from(&path), settings);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_missing_settings_file_uses_defaults() {
    let dir = scratch_dir("missing");
    let loaded = load_settings_from(&dir.join("settings.json"));

    assert_eq!(loaded, CoachSettings::default());
}

#[test]
fn test_corrupt_settings_file_uses_defaults() {
    //! A half-written file must not stop the client from starting
    let dir = scratch_dir("corrupt");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("settings.json");
    fs::write(&path, "{\"player_rating\": ").unwrap();

    assert_eq!(load_settings_from(&path), CoachSettings::default());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_settings_seed_the_session() {
    let settings = CoachSettings {
        player_rating: 1100,
        start_batched: true,
        ..CoachSettings::default()
    };

    let session = GameSession::new(settings.coaching_params(), settings.initial_mode());
    let snapshot = session.snapshot();

    assert_eq!(snapshot.mode, SessionMode::Batched);
    assert_eq!(snapshot.params.player_rating, 1100);
}

#[test]
fn test_console_lines_drive_a_session() {
    //! Typed commands go through the parser into the session unchanged
    let mut session = GameSession::default();
    let script = ["mode", "e4", "click e7", "click e5", "undo"];

    let mut outcomes = Vec::new();
    for line in script {
        let command = parse_command(line).expect("Line should parse");
        let ConsoleCommand::Event(event) = command else {
            panic!("Expected a session event for {line:?}");
        };
        match session.handle(event).expect("Event should be accepted") {
            Step::Done(outcome) => outcomes.push(outcome),
            Step::Send(call) => panic!("Batched play should stay local: {call:?}"),
        }
    }

    assert_eq!(outcomes[0], Outcome::ModeChanged(SessionMode::Batched));
    assert_eq!(session.buffer().notations(), vec!["e4"]);
    assert_eq!(session.snapshot().buffered, 1);
}

#[test]
fn test_console_settings_commands() {
    let mut session = GameSession::default();

    for line in ["rating 1900", "intensity low"] {
        let Ok(ConsoleCommand::Event(event)) = parse_command(line) else {
            panic!("Expected a session event for {line:?}");
        };
        session.handle(event).unwrap();
    }

    let params = session.params();
    assert_eq!(params.player_rating, 1900);
    assert_eq!(params.intensity, CoachingIntensity::Low);
    assert_eq!(
        parse_command("new"),
        Ok(ConsoleCommand::Event(InputEvent::NewGameRequested))
    );
}
