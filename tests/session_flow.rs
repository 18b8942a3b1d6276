use rand::SeedableRng;
use rand::rngs::StdRng;

use vault_door::dispatch::{DOOR_FADE_SECS, Dispatcher, OPEN_FADE_SECS, PUNISH_SPIN_SECS};
use vault_door::engine::{PUNISH_RADIANS, Session};
use vault_door::renderer::{DEFAULT_CANVAS, Renderer};
use vault_door::scene::{Renderable, Stage};
use vault_door::types::{Direction, Layer, OutcomeEvent, Property};

fn play(session: &mut Session, stage: &mut Stage, direction: Direction) -> OutcomeEvent {
    let event = session.click(direction);
    let effects = Dispatcher::dispatch(&event, session.state());
    stage.apply(&effects);
    event
}

fn handle_rotation(stage: &Stage) -> f64 {
    stage
        .scene()
        .sprite(Layer::Handle)
        .unwrap()
        .property(Property::Rotation)
}

#[test]
fn solving_opens_the_door_on_screen() {
    let mut session = Session::new(3, StdRng::seed_from_u64(2024)).unwrap();
    let mut stage = Stage::new();

    let clicks: Vec<_> = session.state().combination().solution().collect();
    let total = clicks.len();
    let mut solved = 0;
    for direction in clicks {
        if play(&mut session, &mut stage, direction) == OutcomeEvent::Solved {
            solved += 1;
        }
        stage.tick(0.1);
    }
    assert_eq!(solved, 1);
    assert_eq!(total, session.state().combination().total_clicks());

    stage.tick(DOOR_FADE_SECS + OPEN_FADE_SECS + 0.1);
    let grid = Renderer::rasterize(stage.scene(), DEFAULT_CANVAS);
    let has = |ch: char| grid.iter().flatten().any(|cell| cell.ch == ch);
    assert!(has('▓'), "open door should be drawn");
    assert!(!has('◉'), "handle hub should be gone");

    assert_eq!(
        play(&mut session, &mut stage, Direction::Clockwise),
        OutcomeEvent::AlreadySolved
    );
}

#[test]
fn wrong_turn_spins_the_handle_to_the_punished_angle() {
    let mut session = Session::new(3, StdRng::seed_from_u64(31)).unwrap();
    let mut stage = Stage::new();
    let wrong = session.state().combination().steps()[0].direction().opposite();

    let event = play(&mut session, &mut stage, wrong);
    assert!(matches!(event, OutcomeEvent::Mismatch { .. }));
    assert_eq!(session.state().step_index(), 0);
    assert_eq!(session.state().progress(), 0);

    stage.tick(PUNISH_SPIN_SECS / 2.0);
    assert!(stage.is_animating());
    stage.tick(PUNISH_SPIN_SECS);
    assert!(!stage.is_animating());
    assert!((handle_rotation(&stage).abs() - PUNISH_RADIANS).abs() < 1e-9);
    assert_eq!(handle_rotation(&stage), session.state().total_rotation());
}

#[test]
fn rapid_clicks_land_on_the_accumulated_rotation() {
    let mut session = Session::new(3, StdRng::seed_from_u64(8)).unwrap();
    let mut stage = Stage::new();

    let clicks: Vec<_> = session.state().combination().solution().take(2).collect();
    for direction in clicks {
        play(&mut session, &mut stage, direction);
        stage.tick(0.05);
    }
    stage.tick(1.0);
    assert!((handle_rotation(&stage) - session.state().total_rotation()).abs() < 1e-9);
}
