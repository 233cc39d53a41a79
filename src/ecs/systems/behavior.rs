use glam::Vec2;

use crate::ecs::components::{
    Appearance, BehaviorState, ButterflyState, Hover, Phase, Position, Target, TargetClaim,
    Velocity, Waypoint,
};
use crate::ecs::systems::motion::{self, SeekParams};
use crate::ecs::systems::{TickBuffers, TickContext};
use crate::schedule::{Scheduler, TimerEvent};
use crate::targets::{TargetId, TargetProvider};

/// Pale washed-out tint shown while a butterfly is scared (RGBA).
const SCARED_TINT: u32 = 0xE8E8F0FF;

/// Update butterfly state machines: fear first, then per-state behavior.
pub fn update(
    world: &mut hecs::World,
    targets: &mut dyn TargetProvider,
    ctx: &TickContext,
    scheduler: &mut Scheduler,
    rng: &mut fastrand::Rng,
    bufs: &mut TickBuffers,
) {
    let config = ctx.config;
    let now = ctx.now;

    for (entity, (pos, vel, state, target, phase, appearance, waypoint)) in world.query_mut::<(
        &Position,
        &mut Velocity,
        &mut ButterflyState,
        &mut Target,
        &Phase,
        &mut Appearance,
        &mut Waypoint,
    )>() {
        let cursor_dist = ctx.cursor.distance_to(pos.0);

        // Cursor proximity overrides whatever the state logic would do.
        // Spawning may only become Flying and Leaving is terminal.
        let frightened = cursor_dist.is_some_and(|d| d < config.fear_radius);
        if frightened && matches!(state.state, BehaviorState::Flying | BehaviorState::Hovering) {
            release_claim(targets, target);
            enter(state, BehaviorState::Scared, now);
            appearance.tint = Some(SCARED_TINT);
            scheduler.schedule(
                now + config.scared_tint_duration as f64,
                TimerEvent::RevertTint(entity),
            );
            log::debug!("butterfly {entity:?} scared at {:?}", pos.0);
        }

        let time = now as f32;
        match state.state {
            BehaviorState::Spawning => {
                let Some(ease) = waypoint.0 else {
                    enter(state, BehaviorState::Flying, now);
                    continue;
                };
                if pos.0.distance(ease) < config.spawn_arrive {
                    waypoint.0 = None;
                    enter(state, BehaviorState::Flying, now);
                    continue;
                }
                // Simple lerp, expressed as the velocity that lands on it
                let next = pos.0.lerp(ease, config.spawn_ease);
                vel.0 = (next - pos.0) / ctx.dt;
            }

            BehaviorState::Flying => {
                if target.0.is_none() {
                    target.0 = acquire(targets, ctx, &mut bufs.candidates, rng)
                        .map(|id| TargetClaim { id, hover: None });
                }

                let claimed = target.0.map(|claim| claim.id);
                let word_pos = claimed.and_then(|id| targets.page_position(id));
                if claimed.is_some() && word_pos.is_none() {
                    // Detached from the document
                    release_claim(targets, target);
                }

                match (word_pos, target.0.as_mut()) {
                    (Some(word_pos), Some(claim)) => {
                        if pos.0.distance(word_pos) < config.hover_threshold {
                            claim.hover = Some(Hover {
                                anchor: word_pos + random_offset(config.hover_wander_radius, rng),
                                started: now,
                                duration: lerp(
                                    config.hover_duration_min,
                                    config.hover_duration_max,
                                    rng.f32(),
                                ) as f64,
                                last_recenter: now,
                            });
                            targets.set_highlight(claim.id, Some(appearance.color));
                            enter(state, BehaviorState::Hovering, now);
                            log::debug!("butterfly {entity:?} hovering over {:?}", claim.id);
                        } else {
                            let params = SeekParams::from_config(config, config.flying_speed);
                            vel.0 = motion::steer(pos.0, vel.0, Some(word_pos), time, phase.0, &params);
                        }
                    }
                    _ => {
                        // Nothing to visit: wander, drifting home if off-screen
                        let home = (!ctx.viewport.contains(pos.0)).then(|| ctx.viewport.center());
                        let params = SeekParams::from_config(config, config.flying_speed * 0.5);
                        vel.0 = motion::steer(pos.0, vel.0, home, time, phase.0, &params);
                    }
                }
            }

            BehaviorState::Hovering => {
                let Some(claim) = target.0.as_mut() else {
                    enter(state, BehaviorState::Flying, now);
                    continue;
                };
                let Some(hover) = claim.hover.as_mut() else {
                    enter(state, BehaviorState::Flying, now);
                    continue;
                };
                let Some(word_pos) = targets.page_position(claim.id) else {
                    // Word removed mid-hover: not a completed visit
                    release_claim(targets, target);
                    enter(state, BehaviorState::Flying, now);
                    continue;
                };

                if now - hover.started >= hover.duration {
                    release_claim(targets, target);
                    state.words_visited += 1;
                    if state.words_visited >= config.words_before_leaving {
                        begin_leaving(state, waypoint, pos.0, ctx);
                        log::debug!(
                            "butterfly {entity:?} leaving after {} words",
                            state.words_visited
                        );
                    } else {
                        enter(state, BehaviorState::Flying, now);
                    }
                    continue;
                }

                // Follow scroll/reflow by re-centering on the live position.
                // An anchor outside the wander radius means the word moved.
                let word_moved = hover.anchor.distance(word_pos) > config.hover_wander_radius + 1.0;
                if word_moved || now - hover.last_recenter >= config.hover_recenter_interval as f64 {
                    hover.anchor = word_pos + random_offset(config.hover_wander_radius, rng);
                    hover.last_recenter = now;
                }

                let params = if pos.0.distance(word_pos) > config.hover_threshold {
                    // Catch up with a word that moved away
                    SeekParams::from_config(config, config.flying_speed)
                } else {
                    SeekParams {
                        speed: config.hover_speed,
                        smoothing: config.smoothing,
                        wander_amplitude: config.wander_amplitude * 0.5,
                        arrive_radius: config.hover_wander_radius.max(1.0),
                    }
                };
                vel.0 = motion::steer(pos.0, vel.0, Some(hover.anchor), time, phase.0, &params);
            }

            BehaviorState::Scared => {
                let calm_radius = config.fear_radius * config.scared_hysteresis;
                let elapsed = now - state.entered_at;
                let calm = cursor_dist.map_or(true, |d| d > calm_radius);

                if elapsed >= config.scared_min_duration as f64 && calm {
                    enter(state, BehaviorState::Flying, now);
                    continue;
                }
                if let Some(cursor) = ctx.cursor.pos {
                    vel.0 = motion::escape_velocity(
                        pos.0,
                        cursor,
                        calm_radius,
                        config.escape_speed,
                        config.panic_jitter,
                        rng,
                    );
                }
            }

            BehaviorState::Leaving => {
                let exit = match waypoint.0 {
                    Some(exit) => exit,
                    None => {
                        let edge = ctx.viewport.nearest_edge(pos.0);
                        let exit = ctx.viewport.exit_point(pos.0, edge, config.exit_margin);
                        waypoint.0 = Some(exit);
                        exit
                    }
                };

                if pos.0.distance(exit) < config.edge_buffer
                    || !ctx
                        .viewport
                        .contains_with_margin(pos.0, config.offscreen_margin)
                {
                    bufs.despawn.push(entity);
                    continue;
                }

                let params = SeekParams::from_config(config, config.leaving_speed);
                vel.0 = motion::steer(pos.0, vel.0, Some(exit), time, phase.0, &params);

                // Still shies away from the cursor on its way out
                if let Some(cursor) = ctx.cursor.pos.filter(|_| frightened) {
                    let push = motion::escape_velocity(
                        pos.0,
                        cursor,
                        config.fear_radius,
                        config.escape_speed,
                        0.0,
                        rng,
                    );
                    vel.0 += push * config.smoothing;
                }
            }
        }
    }
}

/// Pick and claim a word or bloom. Targets inside the viewport are preferred;
/// any unclaimed one is the fallback. `None` is normal (nothing to visit).
fn acquire(
    targets: &mut dyn TargetProvider,
    ctx: &TickContext,
    candidates: &mut Vec<TargetId>,
    rng: &mut fastrand::Rng,
) -> Option<TargetId> {
    candidates.clear();
    targets.unclaimed(candidates);
    if candidates.is_empty() {
        return None;
    }

    let visible = candidates
        .iter()
        .filter(|&&id| {
            targets
                .page_position(id)
                .is_some_and(|p| ctx.viewport.contains(p))
        })
        .count();

    let id = if visible > 0 {
        let pick = rng.usize(0..visible);
        candidates
            .iter()
            .copied()
            .filter(|&id| {
                targets
                    .page_position(id)
                    .is_some_and(|p| ctx.viewport.contains(p))
            })
            .nth(pick)?
    } else {
        candidates[rng.usize(0..candidates.len())]
    };

    targets.claim(id).then_some(id)
}

/// Give a claimed word back: clear its highlight and its claim flag.
pub(crate) fn release_claim(targets: &mut dyn TargetProvider, target: &mut Target) {
    if let Some(claim) = target.0.take() {
        targets.set_highlight(claim.id, None);
        targets.release(claim.id);
    }
}

fn begin_leaving(state: &mut ButterflyState, waypoint: &mut Waypoint, pos: Vec2, ctx: &TickContext) {
    let edge = ctx.viewport.nearest_edge(pos);
    waypoint.0 = Some(ctx.viewport.exit_point(pos, edge, ctx.config.exit_margin));
    enter(state, BehaviorState::Leaving, ctx.now);
}

fn enter(state: &mut ButterflyState, next: BehaviorState, now: f64) {
    state.state = next;
    state.entered_at = now;
}

fn random_offset(radius: f32, rng: &mut fastrand::Rng) -> Vec2 {
    let angle = rng.f32() * std::f32::consts::TAU;
    Vec2::new(angle.cos(), angle.sin()) * radius * rng.f32().sqrt()
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use crate::butterfly::SpawnSpec;
    use crate::config::GardenConfig;
    use crate::ecs::components::*;
    use crate::garden::GardenSimulation;
    use crate::targets::{flower_target, WordTargets};
    use crate::viewport::{Edge, Viewport};

    fn garden(config: GardenConfig) -> GardenSimulation {
        let viewport = Viewport::new(Vec2::ZERO, Vec2::new(1280.0, 800.0));
        let mut garden = GardenSimulation::new(config, viewport, Some(42));
        garden.init();
        garden
    }

    /// Config with no timed spawns getting in the way.
    fn quiet() -> GardenConfig {
        GardenConfig {
            max_butterflies: 0,
            wander_amplitude: 0.0,
            ..GardenConfig::default()
        }
    }

    fn state(garden: &GardenSimulation, e: hecs::Entity) -> BehaviorState {
        garden.world().get::<&ButterflyState>(e).unwrap().state
    }

    fn pos(garden: &GardenSimulation, e: hecs::Entity) -> Vec2 {
        garden.world().get::<&Position>(e).unwrap().0
    }

    /// Put a butterfly straight into a given state at a given place.
    fn place(garden: &mut GardenSimulation, at: Vec2, s: BehaviorState) -> hecs::Entity {
        let e = garden.spawn_at(SpawnSpec {
            pos: at,
            edge: Edge::Left,
        });
        let now = garden.now();
        let world = garden.world_mut();
        world.get::<&mut Position>(e).unwrap().0 = at;
        world.get::<&mut PrevPosition>(e).unwrap().0 = at;
        world.get::<&mut Velocity>(e).unwrap().0 = Vec2::ZERO;
        world.get::<&mut Waypoint>(e).unwrap().0 = None;
        let mut st = world.get::<&mut ButterflyState>(e).unwrap();
        st.state = s;
        st.entered_at = now;
        e
    }

    #[test]
    fn spawning_eases_in_then_flies() {
        let mut g = garden(quiet());
        let mut words = WordTargets::new();
        let e = g.spawn_at(SpawnSpec {
            pos: Vec2::new(-20.0, 300.0),
            edge: Edge::Left,
        });
        let ease = g.world().get::<&Waypoint>(e).unwrap().0.unwrap();

        let mut seen = Vec::new();
        for _ in 0..300 {
            let before = pos(&g, e);
            g.tick(&mut words);
            let now_state = state(&g, e);
            if now_state != BehaviorState::Spawning {
                assert!(before.distance(ease) < 5.0);
                seen.push(now_state);
                break;
            }
        }
        assert_eq!(seen, vec![BehaviorState::Flying]);
    }

    #[test]
    fn cursor_inside_fear_radius_scares() {
        let mut g = garden(GardenConfig {
            fear_radius: 100.0,
            ..quiet()
        });
        let mut words = WordTargets::new();
        let e = place(&mut g, Vec2::new(500.0, 500.0), BehaviorState::Flying);

        // Moving cursor settles next to the butterfly
        for x in [560.0, 545.0, 530.0, 520.0] {
            g.set_cursor(Some(Vec2::new(x, 500.0)));
            g.tick(&mut words);
        }

        assert_eq!(state(&g, e), BehaviorState::Scared);
        let vel = g.world().get::<&Velocity>(e).unwrap().0;
        let away = pos(&g, e) - Vec2::new(520.0, 500.0);
        assert!(vel.dot(away) > 0.0, "velocity {vel:?} not away from cursor");
        assert!(g.world().get::<&Appearance>(e).unwrap().tint.is_some());
    }

    #[test]
    fn scared_holds_for_minimum_duration() {
        let mut g = garden(GardenConfig {
            scared_min_duration: 1.0,
            ..quiet()
        });
        let mut words = WordTargets::new();
        let e = place(&mut g, Vec2::new(500.0, 500.0), BehaviorState::Flying);

        g.set_cursor(Some(Vec2::new(510.0, 500.0)));
        g.tick(&mut words);
        assert_eq!(state(&g, e), BehaviorState::Scared);
        let scared_at = g.world().get::<&ButterflyState>(e).unwrap().entered_at;

        // Cursor gone, but the minimum duration still holds
        g.set_cursor(None);
        for _ in 0..30 {
            g.tick(&mut words);
            assert_eq!(state(&g, e), BehaviorState::Scared);
        }
        // Not re-triggered: entry time unchanged
        assert_eq!(g.world().get::<&ButterflyState>(e).unwrap().entered_at, scared_at);

        for _ in 0..60 {
            g.tick(&mut words);
        }
        assert_eq!(state(&g, e), BehaviorState::Flying);
    }

    #[test]
    fn scared_tint_reverts_on_timer() {
        let mut g = garden(GardenConfig {
            scared_tint_duration: 0.25,
            ..quiet()
        });
        let mut words = WordTargets::new();
        let e = place(&mut g, Vec2::new(500.0, 500.0), BehaviorState::Flying);
        g.set_cursor(Some(Vec2::new(505.0, 500.0)));
        g.tick(&mut words);
        assert!(g.world().get::<&Appearance>(e).unwrap().tint.is_some());

        for _ in 0..20 {
            g.tick(&mut words);
        }
        assert!(g.world().get::<&Appearance>(e).unwrap().tint.is_none());
    }

    #[test]
    fn flying_claims_and_hovers() {
        let mut g = garden(quiet());
        let mut words = WordTargets::new();
        let word = words.add("Rust", Vec2::new(600.0, 400.0));
        let e = place(&mut g, Vec2::new(300.0, 400.0), BehaviorState::Flying);

        for _ in 0..1200 {
            g.tick(&mut words);
            if state(&g, e) == BehaviorState::Hovering {
                break;
            }
        }

        assert_eq!(state(&g, e), BehaviorState::Hovering);
        let claim = g.world().get::<&Target>(e).unwrap().0.unwrap();
        assert_eq!(claim.id, word);
        assert!(claim.hover.is_some());
        assert!(words.get(word).unwrap().claimed);
        assert!(words.get(word).unwrap().highlight.is_some());
    }

    #[test]
    fn hover_expiry_releases_and_counts() {
        let mut g = garden(GardenConfig {
            hover_duration_min: 1.0,
            hover_duration_max: 1.0,
            words_before_leaving: 5,
            ..quiet()
        });
        let mut words = WordTargets::new();
        let word = words.add("Rust", Vec2::new(600.0, 400.0));
        let e = place(&mut g, Vec2::new(595.0, 400.0), BehaviorState::Flying);

        g.tick(&mut words);
        assert_eq!(state(&g, e), BehaviorState::Hovering);
        let hover = g.world().get::<&Target>(e).unwrap().0.unwrap().hover.unwrap();

        for _ in 0..200 {
            g.tick(&mut words);
            if state(&g, e) != BehaviorState::Hovering {
                break;
            }
        }

        let st = *g.world().get::<&ButterflyState>(e).unwrap();
        assert_eq!(st.state, BehaviorState::Flying);
        assert_eq!(st.words_visited, 1);
        assert!(g.now() >= hover.started + hover.duration);
        assert!(g.now() < hover.started + hover.duration + 2.0 / 60.0);
        assert!(!words.get(word).unwrap().claimed);
        assert!(words.get(word).unwrap().highlight.is_none());
    }

    #[test]
    fn last_visit_turns_to_leaving() {
        let mut g = garden(GardenConfig {
            hover_duration_min: 0.5,
            hover_duration_max: 0.5,
            words_before_leaving: 1,
            ..quiet()
        });
        let mut words = WordTargets::new();
        let word = words.add("only", Vec2::new(600.0, 400.0));
        let e = place(&mut g, Vec2::new(600.0, 400.0), BehaviorState::Flying);

        g.tick(&mut words);
        assert_eq!(state(&g, e), BehaviorState::Hovering);

        for _ in 0..40 {
            g.tick(&mut words);
        }

        assert_eq!(state(&g, e), BehaviorState::Leaving);
        assert!(!words.get(word).unwrap().claimed);
        assert!(g.world().get::<&Target>(e).unwrap().0.is_none());

        // Terminal: a scare never pulls it out of Leaving
        let p = pos(&g, e);
        g.set_cursor(Some(p + Vec2::new(5.0, 0.0)));
        g.tick(&mut words);
        if g.world().contains(e) {
            assert_eq!(state(&g, e), BehaviorState::Leaving);
        }
    }

    #[test]
    fn detached_word_mid_hover_falls_back_to_flying() {
        let mut g = garden(quiet());
        let mut words = WordTargets::new();
        let word = words.add("fleeting", Vec2::new(600.0, 400.0));
        let e = place(&mut g, Vec2::new(600.0, 400.0), BehaviorState::Flying);

        g.tick(&mut words);
        assert_eq!(state(&g, e), BehaviorState::Hovering);

        words.detach(word);
        g.tick(&mut words);

        assert_eq!(state(&g, e), BehaviorState::Flying);
        assert!(g.world().get::<&Target>(e).unwrap().0.is_none());
        assert!(!words.get(word).unwrap().claimed);
        assert_eq!(g.world().get::<&ButterflyState>(e).unwrap().words_visited, 0);
    }

    #[test]
    fn leaving_reaches_edge_and_is_removed() {
        let mut g = garden(quiet());
        let mut words = WordTargets::new();
        let e = place(&mut g, Vec2::new(100.0, 300.0), BehaviorState::Leaving);
        g.world_mut().get::<&mut Waypoint>(e).unwrap().0 = Some(Vec2::new(-50.0, 300.0));

        for _ in 0..2000 {
            if !g.world().contains(e) {
                break;
            }
            g.tick(&mut words);
        }

        assert!(!g.world().contains(e));
        assert_eq!(g.population(), 0);
    }

    #[test]
    fn no_words_means_untargeted_wandering() {
        let mut g = garden(GardenConfig {
            wander_amplitude: 40.0,
            ..quiet()
        });
        let mut words = WordTargets::new();
        let e = place(&mut g, Vec2::new(640.0, 400.0), BehaviorState::Flying);

        for _ in 0..120 {
            g.tick(&mut words);
        }

        assert_eq!(state(&g, e), BehaviorState::Flying);
        assert!(g.world().get::<&Target>(e).unwrap().0.is_none());
        assert!(pos(&g, e).distance(Vec2::new(640.0, 400.0)) > 1.0);
    }

    #[test]
    fn claims_stay_exclusive_under_crowding() {
        let mut g = garden(GardenConfig {
            max_butterflies: 12,
            spawn_delay_min: 0.05,
            spawn_delay_max: 0.1,
            initial_spawn_delay: 0.05,
            hover_duration_min: 0.3,
            hover_duration_max: 0.8,
            words_before_leaving: 100,
            ..GardenConfig::default()
        });
        let mut words = WordTargets::new();
        for i in 0..4 {
            words.add(format!("w{i}"), Vec2::new(200.0 + i as f32 * 250.0, 400.0));
        }

        for tick in 0..3000 {
            // Sweep the cursor across to mix in scares
            let x = (tick % 600) as f32 * 2.0;
            g.set_cursor(Some(Vec2::new(x, 420.0)));
            g.tick(&mut words);

            let mut held: Vec<_> = g
                .world()
                .query::<&Target>()
                .iter()
                .filter_map(|(_, t)| t.0.map(|c| c.id))
                .collect();
            let total = held.len();
            held.sort();
            held.dedup();
            assert_eq!(held.len(), total, "duplicate claim at tick {tick}");
            assert_eq!(words.claimed_count(), total);
            assert!(g.population() <= 12);
        }
    }

    #[test]
    fn hovering_always_has_anchor() {
        let mut g = garden(GardenConfig {
            max_butterflies: 6,
            initial_spawn_delay: 0.05,
            spawn_delay_min: 0.1,
            spawn_delay_max: 0.2,
            ..GardenConfig::default()
        });
        let mut words = WordTargets::new();
        for i in 0..6 {
            words.add(format!("w{i}"), Vec2::new(150.0 + i as f32 * 180.0, 300.0));
        }
        for _ in 0..2000 {
            g.tick(&mut words);
            for (_, (st, target)) in g.world().query::<(&ButterflyState, &Target)>().iter() {
                if st.state == BehaviorState::Hovering {
                    assert!(target.0.and_then(|c| c.hover).is_some());
                }
            }
        }
    }

    #[test]
    fn hover_follows_reflowed_word() {
        let mut g = garden(GardenConfig {
            hover_duration_min: 10.0,
            hover_duration_max: 10.0,
            ..quiet()
        });
        let mut words = WordTargets::new();
        let word = words.add("reflow", Vec2::new(600.0, 400.0));
        let e = place(&mut g, Vec2::new(595.0, 400.0), BehaviorState::Flying);
        g.tick(&mut words);
        assert_eq!(state(&g, e), BehaviorState::Hovering);

        // The word wraps onto a later line
        let moved = Vec2::new(600.0, 600.0);
        words.set_position(word, moved);
        for _ in 0..300 {
            g.tick(&mut words);
        }

        assert_eq!(state(&g, e), BehaviorState::Hovering);
        assert_eq!(g.world().get::<&Target>(e).unwrap().0.unwrap().id, word);
        assert!(words.get(word).unwrap().claimed);
        let d = pos(&g, e).distance(moved);
        assert!(d < 50.0, "still {d:.0}px from the word");
    }

    #[test]
    fn hovering_butterfly_scares_and_lets_go() {
        let mut g = garden(quiet());
        let mut words = WordTargets::new();
        let word = words.add("Rust", Vec2::new(600.0, 400.0));
        let e = place(&mut g, Vec2::new(595.0, 400.0), BehaviorState::Flying);
        g.tick(&mut words);
        assert_eq!(state(&g, e), BehaviorState::Hovering);
        assert!(words.get(word).unwrap().highlight.is_some());

        g.set_cursor(Some(Vec2::new(650.0, 400.0)));
        g.tick(&mut words);

        assert_eq!(state(&g, e), BehaviorState::Scared);
        assert!(g.world().get::<&Target>(e).unwrap().0.is_none());
        assert!(!words.get(word).unwrap().claimed);
        assert!(words.get(word).unwrap().highlight.is_none());
    }

    #[test]
    fn resting_cursor_still_scares() {
        let mut g = garden(GardenConfig {
            fear_radius: 100.0,
            ..quiet()
        });
        let mut words = WordTargets::new();
        g.set_cursor(Some(Vec2::new(560.0, 500.0)));
        for _ in 0..30 {
            g.tick(&mut words);
        }

        // Pointer has not moved for half a second; proximity alone counts
        let e = place(&mut g, Vec2::new(500.0, 500.0), BehaviorState::Flying);
        g.tick(&mut words);
        assert_eq!(state(&g, e), BehaviorState::Scared);
    }

    #[test]
    fn butterfly_lands_on_bloom_until_it_wilts() {
        let mut g = garden(GardenConfig {
            hover_duration_min: 20.0,
            hover_duration_max: 20.0,
            ..quiet()
        });
        let mut words = WordTargets::new();
        let spot = Vec2::new(600.0, 400.0);
        assert!(g.plant_seed(spot));
        let flower = g.flowers().flowers()[0].id;
        for _ in 0..100 {
            g.tick(&mut words);
        }

        let e = place(&mut g, spot, BehaviorState::Flying);
        g.tick(&mut words);
        assert_eq!(state(&g, e), BehaviorState::Hovering);
        let claim = g.world().get::<&Target>(e).unwrap().0.unwrap();
        assert_eq!(claim.id, flower_target(flower));
        assert!(g.flowers().get(flower).unwrap().claimed);

        // Blooms for 400 ticks in total, then starts to rot
        for _ in 0..401 {
            g.tick(&mut words);
        }

        assert_eq!(state(&g, e), BehaviorState::Flying);
        assert!(g.world().get::<&Target>(e).unwrap().0.is_none());
        assert!(!g.flowers().get(flower).unwrap().claimed);
        assert_eq!(g.world().get::<&ButterflyState>(e).unwrap().words_visited, 0);
    }
}
