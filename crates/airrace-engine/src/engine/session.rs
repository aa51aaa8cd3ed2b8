use crate::{
    core::{
        Arena,
        constants::{
            DT_CAP, MIN_SPEED, MISSILE_LOCK_RANGE, PLAYER_DEATH_RESET_DELAY, ROUND_RESET_DELAY,
        },
    },
    engine::{
        collision::{self, Scoreboard},
        controls::Controls,
        highscore::{HighscoreStore, Highscores},
        missile::{Missile, Side},
        plane::Plane,
    },
};

use std::f64::consts::PI;

/// Stick inputs produced by a [`Pilot`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Steering {
    /// Turn command in `[-1, 1]`.
    pub turn: f64,
    /// Throttle command in `[-1, 1]`.
    pub throttle: f64,
}

/// Decision maker flying the AI plane of a [`DogfightSession`].
pub trait Pilot {
    /// Returns the stick inputs for `own`, fighting `foe`.
    ///
    /// `threat` is an incoming missile within lock range of `own`, if any.
    /// `clock` is the session time in seconds, used for periodic maneuvers.
    fn steer(&mut self, own: &Plane, foe: &Plane, threat: Option<&Missile>, clock: f64)
    -> Steering;

    /// Returns whether `own` should launch a missile at `foe` now.
    fn should_fire(&self, own: &Plane, foe: &Plane) -> bool;
}

/// Round lifecycle.
///
/// ```text
/// Running ──(a plane dies)──▶ RoundOver ──(delay elapsed)──▶ Running (fresh round)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum RoundState {
    Running,
    RoundOver {
        /// Seconds until the next round starts.
        remaining: f64,
        player_died: bool,
    },
}

/// Starting position of the human player.
#[must_use]
pub fn player_start(arena: &Arena) -> Plane {
    Plane::new(arena.at(0.3, 0.5), 0.0, MIN_SPEED + 10.0)
}

/// Starting position of the AI.
#[must_use]
pub fn ai_start(arena: &Arena) -> Plane {
    Plane::new(arena.at(0.7, 0.5), PI, MIN_SPEED + 10.0)
}

/// A live player-vs-AI session.
///
/// The session owns every piece of mutable game state. It is advanced by
/// [`tick`](Self::tick) once per rendered frame and exposes its state
/// read-only for drawing.
///
/// While paused nothing moves and no timer runs. While a round is over the
/// world is frozen until the reset delay has elapsed.
#[derive(Debug)]
pub struct DogfightSession {
    arena: Arena,
    player: Plane,
    ai: Plane,
    missiles: Vec<Missile>,
    scoreboard: Scoreboard,
    round_state: RoundState,
    round: u64,
    paused: bool,
    clock: f64,
    highscores: Highscores,
    show_highscores: bool,
    store: Box<dyn HighscoreStore>,
}

impl DogfightSession {
    /// Starts a session, loading the highscores from `store`.
    #[must_use]
    pub fn new(store: Box<dyn HighscoreStore>) -> Self {
        let arena = Arena::STANDARD;
        Self {
            arena,
            player: player_start(&arena),
            ai: ai_start(&arena),
            missiles: vec![],
            scoreboard: Scoreboard::new(),
            round_state: RoundState::Running,
            round: 1,
            paused: false,
            clock: 0.0,
            highscores: Highscores::load(store.as_ref()),
            show_highscores: false,
            store,
        }
    }

    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    #[must_use]
    pub fn player(&self) -> &Plane {
        &self.player
    }

    #[must_use]
    pub fn ai(&self) -> &Plane {
        &self.ai
    }

    #[must_use]
    pub fn missiles(&self) -> &[Missile] {
        &self.missiles
    }

    #[must_use]
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    #[must_use]
    pub fn round_state(&self) -> RoundState {
        self.round_state
    }

    /// Number of the current round, starting at 1.
    #[must_use]
    pub fn round(&self) -> u64 {
        self.round
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Session time in seconds. Frozen while paused.
    #[must_use]
    pub fn clock(&self) -> f64 {
        self.clock
    }

    #[must_use]
    pub fn highscores(&self) -> &Highscores {
        &self.highscores
    }

    /// Whether the highscore list should be displayed (the player just died).
    #[must_use]
    pub fn show_highscores(&self) -> bool {
        self.show_highscores
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Zeroes both scores and starts a fresh round. Highscores are untouched.
    pub fn reset(&mut self) {
        self.scoreboard.clear_scores();
        self.start_round();
    }

    /// Advances the session by one frame of `dt` seconds (capped at [`DT_CAP`]).
    pub fn tick(&mut self, dt: f64, controls: &Controls, pilot: &mut dyn Pilot) {
        if self.paused {
            return;
        }
        let dt = dt.clamp(0.0, DT_CAP);
        self.clock += dt;

        if let RoundState::RoundOver {
            remaining,
            player_died,
        } = self.round_state
        {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.start_round();
            } else {
                self.round_state = RoundState::RoundOver {
                    remaining,
                    player_died,
                };
            }
            return;
        }

        self.step_world(dt, controls, pilot);
        self.detect_round_end();
    }

    fn step_world(&mut self, dt: f64, controls: &Controls, pilot: &mut dyn Pilot) {
        if self.player.is_alive() {
            self.player
                .step(&self.arena, controls.turn(), controls.throttle(), dt);
        }
        if controls.fire
            && self.player.can_fire()
            && self.player.distance_to(self.ai.pos()) <= MISSILE_LOCK_RANGE
        {
            self.missiles
                .push(Missile::launch(Side::Player, &mut self.player));
        }

        if self.ai.is_alive() {
            let threat = self.missiles.iter().find(|m| {
                m.owner().is_player()
                    && m.is_active()
                    && m.pos().distance(self.ai.pos()) < MISSILE_LOCK_RANGE
            });
            let steering = pilot.steer(&self.ai, &self.player, threat, self.clock);
            self.ai
                .step(&self.arena, steering.turn, steering.throttle, dt);
            if self.ai.is_alive() && pilot.should_fire(&self.ai, &self.player) {
                self.missiles.push(Missile::launch(Side::Ai, &mut self.ai));
            }
        }

        for missile in &mut self.missiles {
            missile.step(&self.arena, dt);
        }
        let hits = collision::resolve_missile_hits(
            &mut self.player,
            &mut self.ai,
            &mut self.missiles,
            &mut self.scoreboard,
        );
        for hit in &hits {
            tracing::debug!(round = self.round, shooter = %hit.shooter, scored = hit.scored, "missile hit");
        }
        self.missiles.retain(Missile::is_active);

        if collision::resolve_mid_air(&mut self.player, &mut self.ai, &mut self.scoreboard) {
            tracing::debug!(round = self.round, "mid-air collision");
        }
    }

    fn detect_round_end(&mut self) {
        let player_died = !self.player.is_alive();
        if !player_died && self.ai.is_alive() {
            return;
        }

        if player_died {
            let score = self.scoreboard.player();
            self.highscores.insert(score);
            self.highscores.save(self.store.as_ref());
            self.show_highscores = true;
            self.scoreboard.clear_scores();
            tracing::debug!(round = self.round, score, "player died");
        }

        let remaining = if player_died {
            PLAYER_DEATH_RESET_DELAY
        } else {
            ROUND_RESET_DELAY
        };
        self.round_state = RoundState::RoundOver {
            remaining,
            player_died,
        };
    }

    fn start_round(&mut self) {
        self.player = player_start(&self.arena);
        self.ai = ai_start(&self.arena);
        self.missiles.clear();
        self.scoreboard.start_round();
        self.show_highscores = false;
        self.round_state = RoundState::Running;
        self.round += 1;
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use crate::{
        core::constants::{ARENA_HEIGHT, MISSILE_COOLDOWN},
        engine::highscore::MemoryStore,
    };

    use super::*;

    /// Flies straight and never shoots.
    struct Glider;

    impl Pilot for Glider {
        fn steer(&mut self, _: &Plane, _: &Plane, _: Option<&Missile>, _: f64) -> Steering {
            Steering::default()
        }

        fn should_fire(&self, _: &Plane, _: &Plane) -> bool {
            false
        }
    }

    /// Records whether a threat was reported.
    #[derive(Default)]
    struct Watcher {
        saw_threat: bool,
    }

    impl Pilot for Watcher {
        fn steer(&mut self, _: &Plane, _: &Plane, threat: Option<&Missile>, _: f64) -> Steering {
            self.saw_threat |= threat.is_some();
            Steering::default()
        }

        fn should_fire(&self, own: &Plane, _: &Plane) -> bool {
            own.can_fire()
        }
    }

    const FRAME: f64 = 1.0 / 30.0;

    fn session() -> (DogfightSession, MemoryStore) {
        let store = MemoryStore::new();
        (DogfightSession::new(Box::new(store.clone())), store)
    }

    fn run_until_running(session: &mut DogfightSession) -> usize {
        let mut frames = 0;
        while session.round_state().is_round_over() {
            session.tick(FRAME, &Controls::default(), &mut Glider);
            frames += 1;
            assert!(frames < 1000, "round never restarted");
        }
        frames
    }

    #[test]
    fn test_player_leaving_arena_records_highscore() {
        let (mut session, store) = session();
        session.highscores.insert(5);
        session.highscores.insert(1);
        for _ in 0..2 {
            session.scoreboard.award(Side::Player);
            session.scoreboard.start_round();
        }
        session.player = Plane::new(DVec2::new(0.4, ARENA_HEIGHT / 2.0), PI, MIN_SPEED);

        session.tick(FRAME, &Controls::default(), &mut Glider);

        assert!(session.player().pos().x < 0.0);
        assert!(!session.player().is_alive());
        assert_eq!(
            session.round_state(),
            RoundState::RoundOver {
                remaining: PLAYER_DEATH_RESET_DELAY,
                player_died: true
            }
        );
        assert!(session.show_highscores());
        assert_eq!(session.highscores().as_slice(), &[5, 2, 1]);
        assert_eq!(store.stored(), vec![5, 2, 1]);

        let frames = run_until_running(&mut session);
        let expected = (PLAYER_DEATH_RESET_DELAY / FRAME).round() as usize;
        assert!(
            (expected..=expected + 1).contains(&frames),
            "reset after {frames} frames"
        );
        assert_eq!(session.scoreboard().player(), 0);
        assert_eq!(session.scoreboard().ai(), 0);
        assert_eq!(session.highscores().as_slice(), &[5, 2, 1]);
        assert!(!session.show_highscores());
        assert!(session.player().is_alive());
        assert_eq!(session.round(), 2);
    }

    #[test]
    fn test_player_missile_scores_exactly_once() {
        let (mut session, _store) = session();
        session.ai = Plane::new(DVec2::new(500.0, 280.0), 0.0, MIN_SPEED);
        session
            .missiles
            .push(Missile::new(Side::Player, DVec2::new(470.0, 280.0), 0.0, 320.0, 7.0));

        session.tick(FRAME, &Controls::default(), &mut Glider);

        assert!(!session.ai().is_alive());
        assert!(session.missiles().is_empty(), "detonated missile is purged");
        assert_eq!(session.scoreboard().player(), 1);
        assert_eq!(
            session.round_state(),
            RoundState::RoundOver {
                remaining: ROUND_RESET_DELAY,
                player_died: false
            }
        );

        for _ in 0..5 {
            session.tick(FRAME, &Controls::default(), &mut Glider);
        }
        assert_eq!(session.scoreboard().player(), 1);

        run_until_running(&mut session);
        assert_eq!(session.scoreboard().player(), 1, "score survives the round");
        assert!(session.highscores().is_empty());
    }

    #[test]
    fn test_mid_air_collision_scores_nobody() {
        let (mut session, _store) = session();
        session.player = Plane::new(DVec2::new(400.0, 280.0), 0.0, MIN_SPEED);
        session.ai = Plane::new(DVec2::new(430.0, 280.0), PI, MIN_SPEED);

        session.tick(FRAME, &Controls::default(), &mut Glider);

        assert!(!session.player().is_alive());
        assert!(!session.ai().is_alive());
        assert_eq!(session.scoreboard().player(), 0);
        assert_eq!(session.scoreboard().ai(), 0);
        assert_eq!(session.highscores().as_slice(), &[0]);
    }

    #[test]
    fn test_player_fire_needs_lock() {
        let (mut session, _store) = session();
        let fire = Controls {
            fire: true,
            ..Controls::default()
        };
        session.tick(FRAME, &fire, &mut Glider);
        assert!(session.missiles().is_empty(), "AI starts out of lock range");

        session.ai = Plane::new(session.player().pos() + DVec2::new(200.0, 0.0), 0.0, MIN_SPEED);
        session.tick(FRAME, &fire, &mut Glider);
        assert_eq!(session.missiles().len(), 1);
        assert_eq!(session.missiles()[0].owner(), Side::Player);
        assert!((session.player().cooldown() - MISSILE_COOLDOWN).abs() < f64::EPSILON);

        session.tick(FRAME, &fire, &mut Glider);
        assert_eq!(session.missiles().len(), 1, "cooldown blocks a second shot");
    }

    #[test]
    fn test_pilot_sees_threat_and_fires() {
        let (mut session, _store) = session();
        let mut pilot = Watcher::default();
        session.ai = Plane::new(DVec2::new(600.0, 280.0), PI, MIN_SPEED);
        session.missiles.push(Missile::new(
            Side::Player,
            DVec2::new(450.0, 150.0),
            -PI / 2.0,
            320.0,
            7.0,
        ));
        session.tick(FRAME, &Controls::default(), &mut pilot);
        assert!(pilot.saw_threat);
        assert!(session.missiles().iter().any(|m| m.owner().is_ai()));
        assert!(!session.ai().can_fire());
    }

    #[test]
    fn test_pause_freezes_everything() {
        let (mut session, _store) = session();
        session.toggle_pause();
        let before = session.player().pos();
        session.tick(FRAME, &Controls::default(), &mut Glider);
        assert_eq!(session.player().pos(), before);
        assert!(session.clock().abs() < f64::EPSILON);

        session.toggle_pause();
        session.tick(FRAME, &Controls::default(), &mut Glider);
        assert_ne!(session.player().pos(), before);
        assert!((session.clock() - FRAME).abs() < 1e-12);
    }

    #[test]
    fn test_frame_time_is_capped() {
        let (mut session, _store) = session();
        session.tick(1.0, &Controls::default(), &mut Glider);
        assert!((session.clock() - DT_CAP).abs() < 1e-12);
    }

    #[test]
    fn test_reset_keeps_highscores() {
        let (mut session, _store) = session();
        session.highscores.insert(3);
        session.scoreboard.award(Side::Ai);
        session.player.destroy();
        session.reset();
        assert_eq!(session.scoreboard().ai(), 0);
        assert!(session.player().is_alive());
        assert!(session.round_state().is_running());
        assert_eq!(session.highscores().as_slice(), &[3]);
    }
}
