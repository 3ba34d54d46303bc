//! Variable timestep simulation tick
//!
//! Core game loop step: player physics, scrolling, collisions, cleanup,
//! spawning and speed ramp, in that order.

use super::catalog::{Catalog, EntityKind};
use super::spawner::{Spawner, next_interval};
use super::state::{GameEvent, GameState};
use crate::tuning::Tuning;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (space/click); ignored while airborne
    pub jump: bool,
}

/// Advance the game state by `dt` seconds
///
/// Does nothing unless the state is Running. Returns the events of this tick in
/// the order they happened.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    dt: f32,
    spawner: &mut Spawner,
    catalog: &Catalog,
    tuning: &Tuning,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !state.is_running() {
        return events;
    }
    debug_assert!(dt >= 0.0, "negative dt {dt}");

    state.tick_count += 1;

    // Player physics
    if input.jump && state.player.jump(tuning) {
        events.push(GameEvent::Jumped);
    }
    state.player.update(dt, tuning);

    // Scroll everything toward the player
    let dx = state.speed * dt;
    for entity in &mut state.entities {
        entity.pos.x -= dx;
    }

    // Collisions: an obstacle hit wins over any collectible touched this tick
    let player_box = state.player.bounds();
    let hit = state
        .entities
        .iter()
        .find(|e| e.kind == EntityKind::Obstacle && e.bounds().overlaps(&player_box))
        .map(|e| e.name.clone());
    if let Some(obstacle) = hit {
        if state.end_run() {
            log::info!("Hit '{}' - game over with score {}", obstacle, state.score);
            events.push(GameEvent::GameOver {
                obstacle,
                score: state.score,
            });
        }
        return events;
    }

    let mut collected = Vec::new();
    for entity in &state.entities {
        if entity.kind == EntityKind::Collectible && entity.bounds().overlaps(&player_box) {
            collected.push(entity.id);
        }
    }
    for &id in &collected {
        state.score += 1;
        if let Some(entity) = state.entities.iter().find(|e| e.id == id) {
            events.push(GameEvent::Collected {
                id,
                name: entity.name.clone(),
                score: state.score,
            });
        }
    }

    // Cleanup: consumed and off-screen entities
    state.entities.retain(|e| {
        if collected.contains(&e.id) {
            return false;
        }
        if e.is_offscreen() {
            events.push(GameEvent::Despawned { id: e.id });
            return false;
        }
        true
    });

    // Spawning
    state.spawn_timer_ms += dt * 1000.0;
    if let Some(spawn) =
        spawner.maybe_spawn(state.spawn_timer_ms, state.spawn_interval_ms, catalog, tuning)
    {
        let id = state.push_entity(spawn.kind, spawn.entry, spawn.pos, spawn.size);
        log::debug!(
            "Spawned {:?} '{}' (id {}), next interval {:.0}ms",
            spawn.kind,
            spawn.entry.name,
            id,
            next_interval(state.spawn_interval_ms, tuning)
        );
        events.push(GameEvent::Spawned {
            id,
            kind: spawn.kind,
        });
        state.spawn_timer_ms = 0.0;
        state.spawn_interval_ms = next_interval(state.spawn_interval_ms, tuning);
    }

    // Speed ramp
    state.speed += tuning.speed_ramp.increment(dt);

    state.debug_check(tuning);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::GamePhase;
    use crate::tuning::SpeedRamp;
    use glam::Vec2;
    use proptest::prelude::*;

    struct World {
        state: GameState,
        spawner: Spawner,
        catalog: Catalog,
        tuning: Tuning,
    }

    impl World {
        fn running(tuning: Tuning) -> Self {
            let mut state = GameState::new(&tuning);
            state.begin_run(&tuning);
            Self {
                state,
                spawner: Spawner::new(12345),
                catalog: Catalog::default(),
                tuning,
            }
        }

        fn step(&mut self, input: &TickInput, dt: f32) -> Vec<GameEvent> {
            tick(
                &mut self.state,
                input,
                dt,
                &mut self.spawner,
                &self.catalog,
                &self.tuning,
            )
        }

        fn place(&mut self, kind: EntityKind, x: f32, y: f32) -> u32 {
            let entry = self.catalog.entries(kind)[0].clone();
            self.state
                .push_entity(kind, &entry, Vec2::new(x, y), Vec2::new(30.0, 30.0))
        }
    }

    /// Spawning disabled: interval far beyond any test's duration
    fn quiet_tuning() -> Tuning {
        Tuning {
            initial_spawn_interval_ms: 1.0e9,
            min_spawn_interval_ms: 1.0e9,
            ..Tuning::default()
        }
    }

    #[test]
    fn test_idle_state_does_not_tick() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning);
        let mut spawner = Spawner::new(1);
        let before = state.clone();
        let events = tick(
            &mut state,
            &TickInput { jump: true },
            SIM_DT,
            &mut spawner,
            &Catalog::default(),
            &tuning,
        );
        assert!(events.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn test_collectible_at_player_scores_and_is_removed() {
        let mut world = World::running(Tuning {
            player_x: 0.0,
            ..quiet_tuning()
        });
        // Overlaps the grounded player box (0..40, 350..390)
        let id = world.place(EntityKind::Collectible, 0.0, 355.0);

        let events = world.step(&TickInput::default(), 0.0);
        assert_eq!(world.state.score, 1);
        assert!(world.state.entities.is_empty());
        assert!(events.iter().any(|e| matches!(e, GameEvent::Collected { id: got, .. } if *got == id)));
        assert_eq!(world.state.phase, GamePhase::Running);
    }

    #[test]
    fn test_collectible_scrolled_into_player() {
        let mut world = World::running(quiet_tuning());
        // Starts just right of the player, within one 1/60s scroll (~4.2px)
        world.place(EntityKind::Collectible, 92.0, 360.0);

        world.step(&TickInput::default(), SIM_DT);
        assert_eq!(world.state.score, 1);
        assert!(world.state.entities.is_empty());
    }

    #[test]
    fn test_obstacle_ends_run_and_freezes() {
        let mut world = World::running(quiet_tuning());
        world.place(EntityKind::Obstacle, 60.0, 360.0);

        let events = world.step(&TickInput::default(), SIM_DT);
        assert_eq!(world.state.phase, GamePhase::Over);
        assert!(matches!(
            events.last(),
            Some(GameEvent::GameOver { score: 0, .. })
        ));

        let frozen = world.state.clone();
        for _ in 0..10 {
            let events = world.step(&TickInput { jump: true }, SIM_DT);
            assert!(events.is_empty());
        }
        assert_eq!(world.state, frozen);
    }

    #[test]
    fn test_obstacle_takes_precedence_over_collectible() {
        let mut world = World::running(quiet_tuning());
        world.place(EntityKind::Collectible, 55.0, 355.0);
        world.place(EntityKind::Obstacle, 60.0, 360.0);

        let events = world.step(&TickInput::default(), 0.0);
        assert_eq!(world.state.phase, GamePhase::Over);
        assert_eq!(world.state.score, 0);
        // Nothing removed on the fatal tick
        assert_eq!(world.state.entities.len(), 2);
        let over_count = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(over_count, 1);
    }

    #[test]
    fn test_two_obstacles_end_run_once() {
        let mut world = World::running(quiet_tuning());
        world.place(EntityKind::Obstacle, 55.0, 360.0);
        world.place(EntityKind::Obstacle, 70.0, 360.0);

        let events = world.step(&TickInput::default(), SIM_DT);
        assert_eq!(events.len(), 1);
        assert_eq!(world.state.phase, GamePhase::Over);
    }

    #[test]
    fn test_jump_clears_obstacle() {
        let mut world = World::running(quiet_tuning());
        // Obstacle reaches the player in ~0.3s; the jump keeps the player above it
        world.place(EntityKind::Obstacle, 165.0, 360.0);

        let events = world.step(&TickInput { jump: true }, SIM_DT);
        assert_eq!(events.first(), Some(&GameEvent::Jumped));

        for _ in 0..120 {
            world.step(&TickInput::default(), SIM_DT);
        }
        assert_eq!(world.state.phase, GamePhase::Running);
        assert!(world.state.player.on_ground);
    }

    #[test]
    fn test_offscreen_entity_despawns_without_scoring() {
        let mut world = World::running(quiet_tuning());
        // Elevated lane never touches a grounded player
        let id = world.place(EntityKind::Collectible, 800.0, 280.0);

        let mut despawned = false;
        // 830px at >= 250px/s takes at most 3.32s
        for _ in 0..(4 * 60) {
            let events = world.step(&TickInput::default(), SIM_DT);
            despawned |= events.contains(&GameEvent::Despawned { id });
        }
        assert!(despawned);
        assert!(world.state.entities.is_empty());
        assert_eq!(world.state.score, 0);
    }

    #[test]
    fn test_entities_move_left_at_speed() {
        let mut world = World::running(quiet_tuning());
        world.place(EntityKind::Obstacle, 700.0, 360.0);

        world.step(&TickInput::default(), 0.1);
        assert!((world.state.entities[0].pos.x - 675.0).abs() < 1e-3);
    }

    #[test]
    fn test_spawn_cadence_and_decay() {
        let mut world = World::running(Tuning::default());

        // 1.5s exactly does not exceed the interval
        for _ in 0..15 {
            world.step(&TickInput::default(), 0.1);
        }
        assert!(world.state.entities.is_empty());
        assert_eq!(world.state.spawn_interval_ms, 1500.0);

        let events = world.step(&TickInput::default(), 0.1);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Spawned { .. })));
        assert_eq!(world.state.entities.len(), 1);
        assert_eq!(world.state.spawn_timer_ms, 0.0);
        assert!((world.state.spawn_interval_ms - 1485.0).abs() < 1e-3);

        let spawned = &world.state.entities[0];
        assert_eq!(spawned.pos.x, 800.0);
    }

    #[test]
    fn test_per_tick_speed_ramp() {
        let mut world = World::running(quiet_tuning());
        world.step(&TickInput::default(), 0.0);
        assert!((world.state.speed - 250.2).abs() < 1e-4);
        world.step(&TickInput::default(), 0.1);
        assert!((world.state.speed - 250.4).abs() < 1e-4);
    }

    #[test]
    fn test_per_second_speed_ramp() {
        let mut world = World::running(Tuning {
            speed_ramp: SpeedRamp::PerSecond(12.0),
            ..quiet_tuning()
        });
        world.step(&TickInput::default(), 0.0);
        assert_eq!(world.state.speed, 250.0);
        world.step(&TickInput::default(), 0.5);
        assert!((world.state.speed - 256.0).abs() < 1e-4);
    }

    #[test]
    fn test_deterministic_with_same_seed() {
        let mut a = World::running(Tuning::default());
        let mut b = World::running(Tuning::default());
        for i in 0..600 {
            let input = TickInput { jump: i % 45 == 0 };
            a.step(&input, SIM_DT);
            b.step(&input, SIM_DT);
        }
        assert_eq!(a.state, b.state);
    }

    proptest! {
        #[test]
        fn prop_run_invariants(
            seed in any::<u64>(),
            frames in prop::collection::vec((0.0f32..0.1, any::<bool>()), 1..400),
        ) {
            let mut world = World::running(Tuning::default());
            world.spawner.reseed(seed);

            let mut score = world.state.score;
            let mut speed = world.state.speed;
            let mut interval = world.state.spawn_interval_ms;
            for (dt, jump) in frames {
                let was_running = world.state.is_running();
                let xs: Vec<(u32, f32)> =
                    world.state.entities.iter().map(|e| (e.id, e.pos.x)).collect();

                world.step(&TickInput { jump }, dt);

                prop_assert!(world.state.score >= score);
                if !was_running {
                    prop_assert_eq!(world.state.score, score);
                }
                prop_assert!(world.state.speed >= speed);
                prop_assert!(world.state.spawn_interval_ms <= interval);
                prop_assert!(world.state.spawn_interval_ms >= 700.0);
                prop_assert!(
                    world.state.player.pos.y + world.state.player.size.y
                        <= world.tuning.ground_y()
                );
                if was_running && dt > 0.001 {
                    for e in &world.state.entities {
                        if let Some((_, x)) = xs.iter().find(|(id, _)| *id == e.id) {
                            prop_assert!(e.pos.x < *x);
                        }
                    }
                }

                score = world.state.score;
                speed = world.state.speed;
                interval = world.state.spawn_interval_ms;
            }
        }
    }
}
