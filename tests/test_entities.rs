use space_shooter::config::*;
use space_shooter::entities::*;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_player() -> Player {
    Player::new(&GameConfig::default())
}

fn make_marcher() -> Enemy {
    let colors = ColorPair { body: 0, eye: 0 };
    Enemy::marcher(100.0, 100.0, colors, 1.0, 37.0, &GameConfig::default(), &mut seeded_rng())
}

// ── Rect ──────────────────────────────────────────────────────────────────────

#[test]
fn rect_point_on_edge_is_outside() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(r.contains_point(5.0, 5.0));
    assert!(!r.contains_point(0.0, 5.0));
    assert!(!r.contains_point(10.0, 5.0));
    assert!(!r.contains_point(5.0, 0.0));
    assert!(!r.contains_point(5.0, 10.0));
}

#[test]
fn rect_touching_boxes_do_not_overlap() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(10.0, 0.0, 10.0, 10.0);
    let c = Rect::new(9.0, 9.0, 10.0, 10.0);
    assert!(!a.overlaps(&b));
    assert!(a.overlaps(&c));
    assert!(c.overlaps(&a));
}

// ── TimedEffect ───────────────────────────────────────────────────────────────

#[test]
fn timed_effect_refreshes_instead_of_stacking() {
    let mut e = TimedEffect::default();
    e.activate(100);
    for _ in 0..10 {
        e.advance();
    }
    assert_eq!(e.remaining, 90);
    e.activate(100);
    assert_eq!(e.remaining, 100);
    assert!(e.active);
}

#[test]
fn timed_effect_clears_flag_at_zero() {
    let mut e = TimedEffect::default();
    e.activate(2);
    e.advance();
    assert!(e.active);
    e.advance();
    assert!(!e.active);
    assert_eq!(e.remaining, 0);
    e.advance();
    assert_eq!(e.remaining, 0);
}

#[test]
fn infinite_effect_never_runs_out() {
    let mut e = TimedEffect::default();
    e.activate(INFINITE);
    for _ in 0..1000 {
        e.advance();
    }
    assert!(e.is_infinite());
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn player_starts_full() {
    let p = make_player();
    assert_eq!(p.lives, 3);
    assert_eq!(p.health, 100.0);
    assert_eq!(p.power, 100.0);
    assert_eq!(p.shoot_cooldown, 0);
    assert!(p.is_vulnerable());
    assert_eq!(p.rect().bottom(), PLAYER_GROUND);
}

#[test]
fn health_is_clamped_both_ways() {
    let mut p = make_player();
    assert!(p.take_damage(250.0));
    assert_eq!(p.health, 0.0);
    assert!(!p.take_damage(-500.0));
    assert_eq!(p.health, p.max_health);
}

#[test]
fn power_regen_stops_at_max() {
    let mut p = make_player();
    p.power = 99.9;
    p.advance();
    assert_eq!(p.power, 100.0);
    p.advance();
    assert_eq!(p.power, 100.0);
}

#[test]
fn firing_at_full_power_uses_short_delay() {
    let mut p = make_player();
    assert!(p.try_fire());
    assert_eq!(p.power, 80.0);
    assert_eq!(p.shoot_cooldown, p.shoot_delay_full);
}

#[test]
fn firing_below_half_power_uses_long_delay() {
    let mut p = make_player();
    p.power = 40.0;
    assert!(p.try_fire());
    assert_eq!(p.power, 20.0);
    assert_eq!(p.shoot_cooldown, p.shoot_delay_low);
}

#[test]
fn fire_gate_needs_power_and_cooldown() {
    let mut p = make_player();
    p.power = 19.0;
    assert!(!p.can_fire());
    assert!(!p.try_fire());
    assert_eq!(p.power, 19.0);

    p.power = 100.0;
    p.shoot_cooldown = 1;
    assert!(!p.can_fire());
}

#[test]
fn cooldown_runs_out_after_full_delay() {
    let mut p = make_player();
    assert!(p.try_fire());
    for _ in 0..p.shoot_delay_full {
        assert!(!p.can_fire());
        p.advance();
    }
    assert!(p.can_fire());
}

#[test]
fn move_is_clamped_to_screen() {
    let mut p = make_player();
    p.x = 2.0;
    p.move_by(-5.0);
    assert_eq!(p.x, 0.0);
    p.x = WIDTH - p.width - 1.0;
    p.move_by(5.0);
    assert_eq!(p.x, WIDTH - p.width);
}

#[test]
fn respawn_restores_and_grants_grace() {
    let mut p = make_player();
    p.x = 10.0;
    p.health = 5.0;
    p.power = 3.0;
    p.respawn();
    assert_eq!((p.x, p.y), Player::spawn_position());
    assert_eq!(p.health, 100.0);
    assert_eq!(p.power, 100.0);
    assert_eq!(p.respawn_grace, GameConfig::default().respawn_grace);
    assert!(!p.is_vulnerable());
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[test]
fn player_bullet_moves_up_and_expires_above_top() {
    let mut b = Bullet::new(100.0, 3.0, false);
    b.advance();
    assert_eq!(b.y, -2.0);
    assert!(b.is_expired());
}

#[test]
fn aimed_bullet_heads_for_target() {
    let b = EnemyBullet::aimed(0.0, 0.0, (3.0, 4.0), 5.0);
    assert_relative_eq!(b.vx, 3.0, epsilon = 1e-5);
    assert_relative_eq!(b.vy, 4.0, epsilon = 1e-5);
}

#[test]
fn straight_bullet_expires_below_bottom() {
    let mut b = EnemyBullet::straight(100.0, HEIGHT - 1.0);
    b.advance();
    assert!(b.is_expired());
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[test]
fn marcher_steps_after_move_delay() {
    let mut e = make_marcher();
    for _ in 0..39 {
        e.advance();
    }
    assert_eq!(e.x, 100.0);
    e.advance();
    assert_eq!(e.x, 137.0);
    assert_eq!(e.march.counter, 0.0);
}

#[test]
fn speed_multiplier_shortens_period_and_scales_step() {
    let mut e = make_marcher();
    e.march.speed_multiplier = 2.0;
    for _ in 0..19 {
        e.advance();
    }
    assert_eq!(e.x, 100.0);
    e.advance();
    assert_eq!(e.x, 174.0);
}

#[test]
fn drop_row_reverses_and_descends() {
    let mut e = make_marcher();
    e.drop_row();
    assert_eq!(e.march.direction, -1.0);
    assert_eq!(e.y, 100.0 + ENEMY_SIZE);
}

#[test]
fn cooldown_query_has_no_side_effects() {
    let mut e = make_marcher();
    e.shoot_cooldown = 0;
    assert!(e.is_ready());
    assert!(e.is_ready());
    e.reset_cooldown((120, 240), &mut seeded_rng());
    assert!((120..=240).contains(&e.shoot_cooldown));
}

#[test]
fn marcher_dies_in_one_hit() {
    let mut e = make_marcher();
    assert!(e.take_hit(1));
    assert!(e.is_expired());
}

#[test]
fn flock_member_detaches_dives_and_rejoins() {
    let config = GameConfig::default();
    let colors = ColorPair { body: 1, eye: 0 };
    let mut rng = seeded_rng();
    let mut e = Enemy::flock_member(0, (40.0, 35.0), (200.0, 60.0), colors, 1.0, &config, &mut rng);
    assert_eq!((e.x, e.y), (240.0, 95.0));
    assert_eq!(e.health, 2);
    assert!(!e.take_hit(1));

    e.detach();
    assert!(e.is_detached());
    e.advance();
    assert_eq!(e.y, 95.0 + FLOCK_DIVE_SPEED);

    e.rejoin((300.0, 60.0));
    assert!(!e.is_detached());
    assert_eq!((e.x, e.y), (340.0, 95.0));
}

// ── SpecialEnemy ──────────────────────────────────────────────────────────────

#[test]
fn pattern_ascends_and_ends_off_screen() {
    let mut rng = seeded_rng();
    for _ in 0..20 {
        let pattern = SpecialEnemy::generate_pattern(&mut rng);
        let last = pattern.last().copied();
        assert_eq!(last, Some(Waypoint { target_percent: 110, pause: 0 }));
        let stops = &pattern[..pattern.len() - 1];
        assert!(!stops.is_empty());
        for pair in stops.windows(2) {
            assert!(pair[0].target_percent < pair[1].target_percent);
        }
        for stop in stops {
            assert!((20..=80).contains(&stop.target_percent));
            assert!((30..=90).contains(&stop.pause));
        }
    }
}

#[test]
fn special_enemy_eventually_leaves() {
    let mut s = SpecialEnemy::new(&GameConfig::default(), &mut seeded_rng());
    let mut ticks = 0;
    while !s.is_expired() {
        s.advance();
        ticks += 1;
        assert!(ticks < 10_000);
    }
    assert!(s.x > WIDTH / 2.0);
}

#[test]
fn special_enemy_takes_whole_pool() {
    let mut s = SpecialEnemy::new(&GameConfig::default(), &mut seeded_rng());
    let pool = s.health;
    assert!(s.take_damage(pool));
    assert!(s.is_expired());
}

// ── Boss ──────────────────────────────────────────────────────────────────────

#[test]
fn boss_core_exposed_after_all_parts() {
    let mut boss = Boss::new(&GameConfig::default());
    for index in 0..3 {
        let (px, py) = boss.part_rect(index).center();
        assert_eq!(boss.hit(px, py), BossHit::Part { index, destroyed: false });
        assert_eq!(boss.hit(px, py), BossHit::Part { index, destroyed: false });
        assert!(!boss.core_exposed());
        assert_eq!(boss.hit(px, py), BossHit::Part { index, destroyed: true });
    }
    assert!(boss.core_exposed());

    let (cx, cy) = boss.core_rect().center();
    for _ in 0..9 {
        assert_eq!(boss.hit(cx, cy), BossHit::Core { destroyed: false });
    }
    assert!(!boss.is_expired());
    assert_eq!(boss.hit(cx, cy), BossHit::Core { destroyed: true });
    assert!(boss.is_expired());
}

#[test]
fn boss_core_is_armoured_while_parts_remain() {
    let mut boss = Boss::new(&GameConfig::default());
    let (cx, cy) = boss.core_rect().center();
    assert_eq!(boss.hit(cx, cy), BossHit::Absorbed);
    assert_eq!(boss.core_health, 10);
    assert_eq!(boss.hit(0.0, 0.0), BossHit::Miss);
}

#[test]
fn exposed_core_takes_hits_anywhere_on_the_hull() {
    let mut boss = Boss::new(&GameConfig::default());
    for part in &mut boss.parts {
        part.health = 0;
    }
    // Bottom edge, below the core box and inside a dead part's slot.
    let py = boss.y + boss.height - 2.0;
    assert!(!boss.core_rect().contains_point(boss.x + 10.0, py));
    assert_eq!(boss.hit(boss.x + 10.0, py), BossHit::Core { destroyed: false });
    assert_eq!(boss.core_health, 9);
}

#[test]
fn boss_bounces_between_edges() {
    let mut boss = Boss::new(&GameConfig::default());
    for _ in 0..1000 {
        boss.advance();
        assert!(boss.x >= 0.0);
        assert!(boss.x + boss.width <= WIDTH);
    }
}

#[test]
fn boss_attack_is_chance_based() {
    let boss = Boss::new(&GameConfig::default());
    let mut rng = seeded_rng();
    assert!(boss.attack(0.0, &mut rng).is_none());
    assert!(boss.attack(1.0, &mut rng).is_some());
}

// ── Pickups ───────────────────────────────────────────────────────────────────

#[test]
fn power_up_falls_off_screen() {
    let mut p = PowerUp::centered(100.0, HEIGHT - 5.0, PowerUpKind::Shield);
    assert!(!p.is_expired());
    for _ in 0..20 {
        p.advance();
    }
    assert!(p.is_expired());
}

#[test]
fn extra_life_settles_then_times_out() {
    let config = GameConfig::default();
    let mut life = ExtraLifePowerUp::new(100.0, 500.0, &config);
    for _ in 0..30 {
        life.advance();
    }
    assert_eq!(life.y, EXTRA_LIFE_GROUND);
    assert_eq!(life.lifetime, config.extra_life_lifetime);

    for _ in 0..config.extra_life_lifetime - 1 {
        life.advance();
    }
    assert!(!life.is_expired());
    life.advance();
    assert!(life.is_expired());
    assert!(!life.can_collect());
}

#[test]
fn collected_extra_life_rises_then_disappears() {
    let config = GameConfig::default();
    let mut life = ExtraLifePowerUp::new(100.0, EXTRA_LIFE_GROUND, &config);
    life.collect();
    assert!(!life.can_collect());
    for _ in 0..config.extra_life_display {
        life.advance();
    }
    assert!(!life.is_expired());
    assert_eq!(life.display_y(), EXTRA_LIFE_GROUND - config.extra_life_display as f32);
    life.advance();
    assert!(life.is_expired());
}

// ── Explosion ─────────────────────────────────────────────────────────────────

#[test]
fn explosion_grows_until_cap() {
    let mut e = Explosion::new(10.0, 10.0);
    for _ in 0..38 {
        e.advance();
    }
    assert_eq!(e.radius, EXPLOSION_MAX_RADIUS);
    assert!(!e.is_expired());
    e.advance();
    assert!(e.is_expired());
}
