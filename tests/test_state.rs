use std::cell::RefCell;
use std::rc::Rc;

use lizard_chase::entities::*;
use lizard_chase::error::GameError;
use lizard_chase::events::GameEvent;
use lizard_chase::lizard::LizardState;
use lizard_chase::settings::GameSettings;
use lizard_chase::state::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn state_with(player: Position, enemy: Position, lizard: Position) -> GameState {
    let settings = GameSettings::builder()
        .board_size(20, 20)
        .player_position(player)
        .enemy_position(enemy)
        .lizard_position(lizard)
        .build()
        .unwrap();
    GameState::new(settings).unwrap()
}

fn record(state: &mut GameState) -> Rc<RefCell<Vec<GameEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    state.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    log
}

// ── start ─────────────────────────────────────────────────────────────────────

#[test]
fn new_state_is_not_started() {
    let state = state_with(Position::new(1, 1), Position::new(5, 5), Position::new(9, 9));
    assert_eq!(state.phase(), GamePhase::NotStarted);
    assert!(!state.is_active());
    assert_eq!(state.score(), 0);
    assert!(state.outcome().is_none());
}

#[test]
fn start_runs_and_emits_initialized() {
    let mut state = state_with(Position::new(1, 1), Position::new(5, 5), Position::new(9, 9));
    let events = record(&mut state);

    state.start().unwrap();

    assert_eq!(state.phase(), GamePhase::Running);
    assert!(state.is_player_alive());
    assert!(state.is_lizard_alive());
    assert_eq!(events.borrow().as_slice(), &[GameEvent::Initialized]);
}

#[test]
fn starting_twice_is_an_error() {
    let mut state = state_with(Position::new(1, 1), Position::new(5, 5), Position::new(9, 9));
    state.start().unwrap();
    let err = state.start().unwrap_err();
    assert!(matches!(err, GameError::AlreadyStarted { phase: GamePhase::Running }));

    state.quit_by_player();
    assert!(matches!(
        state.start(),
        Err(GameError::AlreadyStarted { phase: GamePhase::Ended })
    ));
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn five_ticks_score_five() {
    let mut state = state_with(Position::new(1, 1), Position::new(5, 5), Position::new(9, 9));
    state.start().unwrap();
    for _ in 0..5 {
        state.tick();
    }
    assert_eq!(state.score(), 5);
    assert_eq!(state.tick_count(), 5);
    assert_eq!(state.phase(), GamePhase::Running);
}

#[test]
fn tick_before_start_does_nothing() {
    let mut state = state_with(Position::new(1, 1), Position::new(5, 5), Position::new(9, 9));
    let events = record(&mut state);
    state.tick();
    assert_eq!(state.tick_count(), 0);
    assert!(events.borrow().is_empty());
}

#[test]
fn tick_emits_score_changed() {
    let mut state = state_with(Position::new(1, 1), Position::new(5, 5), Position::new(9, 9));
    state.start().unwrap();
    let events = record(&mut state);
    state.tick();
    state.tick();
    assert_eq!(
        events.borrow().as_slice(),
        &[
            GameEvent::ScoreChanged { score: 1 },
            GameEvent::ScoreChanged { score: 2 }
        ]
    );
}

#[test]
fn time_limit_ends_game() {
    let settings = GameSettings::builder().time_limit(3).build().unwrap();
    let mut state = GameState::new(settings).unwrap();
    state.start().unwrap();
    for _ in 0..10 {
        state.tick();
    }
    assert_eq!(state.tick_count(), 3);
    assert_eq!(
        state.outcome(),
        Some(GameOverSummary {
            final_score: 3,
            survival_ticks: 3,
            reason: GameOverReason::TimeUp,
            player_survived: true,
            lizard_survived: true,
        })
    );
}

// ── pause / resume / quit ─────────────────────────────────────────────────────

#[test]
fn pause_and_resume_only_from_matching_phase() {
    let mut state = state_with(Position::new(1, 1), Position::new(5, 5), Position::new(9, 9));
    let events = record(&mut state);

    state.pause();
    state.resume();
    assert_eq!(state.phase(), GamePhase::NotStarted);

    state.start().unwrap();
    state.resume();
    assert_eq!(state.phase(), GamePhase::Running);

    state.pause();
    assert_eq!(state.phase(), GamePhase::Paused);
    state.pause();
    state.tick();
    assert_eq!(state.tick_count(), 0);

    state.resume();
    assert_eq!(state.phase(), GamePhase::Running);

    assert_eq!(
        events.borrow().as_slice(),
        &[GameEvent::Initialized, GameEvent::Paused, GameEvent::Resumed]
    );
}

#[test]
fn quit_is_idempotent() {
    let mut state = state_with(Position::new(1, 1), Position::new(5, 5), Position::new(9, 9));
    state.start().unwrap();
    state.tick();
    let events = record(&mut state);

    state.quit_by_player();
    state.quit_by_player();

    assert_eq!(state.phase(), GamePhase::Ended);
    let summary = GameOverSummary {
        final_score: 1,
        survival_ticks: 1,
        reason: GameOverReason::PlayerQuit,
        player_survived: true,
        lizard_survived: true,
    };
    assert_eq!(state.outcome(), Some(summary));
    assert_eq!(events.borrow().as_slice(), &[GameEvent::GameOver(summary)]);
}

#[test]
fn ended_state_ignores_everything() {
    let mut state = state_with(Position::new(1, 1), Position::new(5, 5), Position::new(9, 9));
    let mut rng = seeded_rng();
    state.start().unwrap();
    state.quit_by_player();
    let before = state.snapshot();

    state.tick();
    state.pause();
    state.resume();
    assert!(!state.move_player(Direction::Right));
    state.player_default_move(&mut rng);
    state.lizard_act(&mut rng);
    assert!(!state.move_enemy_towards(Position::new(0, 0), &mut rng));
    assert!(!state.check_collisions());

    assert_eq!(state.snapshot(), before);
}

// ── collisions ────────────────────────────────────────────────────────────────

#[test]
fn catching_the_turtle_does_not_end_the_game() {
    let spot = Position::new(5, 5);
    let mut state = state_with(spot, spot, Position::new(15, 15));
    state.start().unwrap();
    let events = record(&mut state);

    assert!(state.check_collisions());

    assert!(!state.is_player_alive());
    assert!(state.is_lizard_alive());
    assert_eq!(state.phase(), GamePhase::Running);
    assert_eq!(
        events.borrow().as_slice(),
        &[
            GameEvent::Collision {
                prey: EntityKind::Player,
                position: spot,
                is_game_over: false,
            },
            GameEvent::PlayerCaught { position: spot },
        ]
    );

    // Not caught twice.
    assert!(!state.check_collisions());
}

#[test]
fn catching_both_ends_with_all_caught() {
    let spot = Position::new(5, 5);
    let mut state = state_with(spot, spot, spot);
    state.start().unwrap();
    state.tick();
    let events = record(&mut state);

    assert!(state.check_collisions());

    assert_eq!(state.phase(), GamePhase::Ended);
    let summary = GameOverSummary {
        final_score: 1,
        survival_ticks: 1,
        reason: GameOverReason::AllCaught,
        player_survived: false,
        lizard_survived: false,
    };
    assert_eq!(state.outcome(), Some(summary));
    assert_eq!(
        events.borrow().as_slice(),
        &[
            GameEvent::Collision {
                prey: EntityKind::Player,
                position: spot,
                is_game_over: false,
            },
            GameEvent::PlayerCaught { position: spot },
            GameEvent::Collision {
                prey: EntityKind::Lizard,
                position: spot,
                is_game_over: true,
            },
            GameEvent::LizardCaught { position: spot },
            GameEvent::GameOver(summary),
        ]
    );
}

#[test]
fn check_collisions_after_all_caught_changes_nothing() {
    let spot = Position::new(5, 5);
    let mut state = state_with(spot, spot, spot);
    state.start().unwrap();
    state.check_collisions();
    let before = state.snapshot();
    let events = record(&mut state);

    assert!(!state.check_collisions());
    assert!(!state.check_collisions());

    assert_eq!(state.snapshot(), before);
    assert!(events.borrow().is_empty());
}

#[test]
fn turtle_then_lizard_caught_across_ticks() {
    let mut rng = seeded_rng();
    let spot = Position::new(10, 10);
    // Lizard in the far corner so it cannot bump into the crocodile by chance.
    let mut state = state_with(spot, spot, Position::new(19, 19));
    state.start().unwrap();
    state.check_collisions();
    assert!(!state.is_player_alive());

    // The crocodile now hunts the lizard alone.
    assert_eq!(
        state.pursuit_target(),
        PursuitTarget::Lizard(state.lizard().position())
    );

    for _ in 0..1000 {
        if !state.is_active() {
            break;
        }
        state.lizard_act(&mut rng);
        let target = state.pursuit_target().position();
        state.move_enemy_towards(target, &mut rng);
        state.tick();
        state.check_collisions();
    }

    assert_eq!(state.phase(), GamePhase::Ended);
    assert_eq!(state.outcome().map(|o| o.reason), Some(GameOverReason::AllCaught));
    assert!(!state.is_lizard_alive());
}

// ── pursuit target ────────────────────────────────────────────────────────────

#[test]
fn enemy_targets_the_closer_prey() {
    let enemy = Position::new(10, 10);
    let player = Position::new(13, 10); // distance 3
    let lizard = Position::new(10, 17); // distance 7
    let state = state_with(player, enemy, lizard);
    assert_eq!(state.pursuit_target(), PursuitTarget::Player(player));

    let state = state_with(Position::new(0, 0), enemy, lizard);
    assert_eq!(state.pursuit_target(), PursuitTarget::Lizard(lizard));
}

#[test]
fn pursuit_tie_favours_turtle() {
    let enemy = Position::new(10, 10);
    let player = Position::new(13, 10);
    let lizard = Position::new(10, 13);
    let state = state_with(player, enemy, lizard);
    assert_eq!(state.pursuit_target(), PursuitTarget::Player(player));
}

#[test]
fn active_tail_overrides_distance() {
    let mut rng = seeded_rng();
    let enemy = Position::new(10, 10);
    let player = Position::new(11, 11); // distance 2, much closer than the tail
    let mut state = state_with(player, enemy, Position::new(10, 12));
    state.start().unwrap();

    state.lizard_act(&mut rng);
    assert_eq!(state.lizard().state(), LizardState::TailDropped);

    let tail = state.lizard().active_tail().unwrap().position();
    assert_eq!(state.pursuit_target(), PursuitTarget::Tail(tail));
    assert_eq!(state.snapshot().tail, Some(tail));
}

#[test]
fn hold_position_when_nobody_is_left() {
    let spot = Position::new(5, 5);
    let mut state = state_with(spot, spot, spot);
    state.start().unwrap();
    state.check_collisions();
    assert_eq!(state.pursuit_target(), PursuitTarget::Hold(spot));
}

// ── movement & snapshot ───────────────────────────────────────────────────────

#[test]
fn player_moves_only_while_running() {
    let mut state = state_with(Position::new(0, 0), Position::new(10, 10), Position::new(19, 19));
    assert!(!state.move_player(Direction::Right));

    state.start().unwrap();
    assert!(state.move_player(Direction::Right));
    assert_eq!(state.player().position(), Position::new(1, 0));
    assert!(!state.move_player(Direction::Up));
    assert_eq!(state.player().position(), Position::new(1, 0));
}

#[test]
fn enemy_step_follows_chase() {
    let mut rng = seeded_rng();
    let mut state = state_with(Position::new(15, 11), Position::new(10, 10), Position::new(0, 19));
    state.start().unwrap();

    assert!(state.move_enemy_towards(Position::new(15, 11), &mut rng));
    assert_eq!(state.enemy().position(), Position::new(11, 10));
}

#[test]
fn snapshot_reflects_state() {
    let mut state = state_with(Position::new(1, 2), Position::new(3, 4), Position::new(5, 6));
    state.start().unwrap();
    state.tick();

    let ctx = state.snapshot();
    assert_eq!(ctx.player, Position::new(1, 2));
    assert_eq!(ctx.enemy, Position::new(3, 4));
    assert_eq!(ctx.lizard, Position::new(5, 6));
    assert_eq!(ctx.lizard_state, LizardState::Wandering);
    assert!(!ctx.lizard_speed_boosted);
    assert_eq!(ctx.tail, None);
    assert!(ctx.player_alive && ctx.lizard_alive);
    assert_eq!((ctx.score, ctx.tick_count), (1, 1));
    assert_eq!((ctx.board_width, ctx.board_height), (20, 20));
    assert_eq!(ctx.tails_eaten, 0);
    assert_eq!(ctx.phase, GamePhase::Running);
}

#[test]
fn unsubscribed_listener_hears_nothing() {
    let mut state = state_with(Position::new(1, 1), Position::new(5, 5), Position::new(9, 9));
    let heard = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&heard);
    let id = state.subscribe(move |_| *counter.borrow_mut() += 1);

    state.start().unwrap();
    assert!(state.unsubscribe(id));
    assert!(!state.unsubscribe(id));
    state.tick();

    assert_eq!(*heard.borrow(), 1);
}

// ── time limit & tail notifications ───────────────────────────────────────────

#[test]
fn catch_on_the_final_tick_still_counts() {
    let spot = Position::new(5, 5);
    let settings = GameSettings::builder()
        .board_size(20, 20)
        .player_position(spot)
        .enemy_position(spot)
        .lizard_position(Position::new(15, 15))
        .time_limit(1)
        .build()
        .unwrap();
    let mut state = GameState::new(settings).unwrap();
    state.start().unwrap();
    let events = record(&mut state);

    state.tick();

    assert_eq!(
        state.outcome(),
        Some(GameOverSummary {
            final_score: 1,
            survival_ticks: 1,
            reason: GameOverReason::TimeUp,
            player_survived: false,
            lizard_survived: true,
        })
    );
    assert!(events
        .borrow()
        .contains(&GameEvent::PlayerCaught { position: spot }));
}

#[test]
fn everyone_caught_on_the_final_tick_is_all_caught() {
    let spot = Position::new(5, 5);
    let settings = GameSettings::builder()
        .board_size(20, 20)
        .player_position(spot)
        .enemy_position(spot)
        .lizard_position(spot)
        .time_limit(1)
        .build()
        .unwrap();
    let mut state = GameState::new(settings).unwrap();
    state.start().unwrap();

    state.tick();

    assert_eq!(state.outcome().map(|o| o.reason), Some(GameOverReason::AllCaught));
}

#[test]
fn tail_drop_is_only_announced_while_running() {
    let mut rng = seeded_rng();
    let mut state = state_with(Position::new(0, 0), Position::new(10, 10), Position::new(11, 10));
    state.start().unwrap();
    state.lizard_act(&mut rng);
    assert_eq!(state.lizard().state(), LizardState::TailDropped);

    state.pause();
    let events = record(&mut state);
    state.notify_tail_dropped();
    assert!(events.borrow().is_empty());

    state.resume();
    state.notify_tail_dropped();
    assert!(matches!(
        events.borrow().as_slice(),
        [GameEvent::Resumed, GameEvent::TailDropped { .. }]
    ));
}
