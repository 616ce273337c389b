use space_shooter::compute::{jump_to_wave, new_game, toggle_god_mode};
use space_shooter::config::*;
use space_shooter::entities::*;
use space_shooter::snapshot::*;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_state() -> GameState {
    let mut s = new_game(GameConfig::default(), &mut seeded_rng());
    s.status = GameStatus::Playing;
    s.banner = None;
    s
}

fn count(snap: &RenderSnapshot, tag: SpriteTag) -> usize {
    snap.sprites.iter().filter(|s| s.tag == tag).count()
}

fn player_sprite(snap: &RenderSnapshot) -> &Sprite {
    snap.sprites
        .iter()
        .find(|s| s.tag == SpriteTag::Player)
        .expect("player sprite")
}

// ── format_remaining ──────────────────────────────────────────────────────────

#[test]
fn remaining_is_whole_seconds() {
    assert_eq!(format_remaining(1200), "20s");
    assert_eq!(format_remaining(600), "10s");
    assert_eq!(format_remaining(59), "00s");
    assert_eq!(format_remaining(0), "00s");
}

#[test]
fn infinite_remaining_is_not_a_number() {
    assert_eq!(format_remaining(INFINITE), "∞");
}

// ── snapshot ──────────────────────────────────────────────────────────────────

#[test]
fn fresh_game_snapshot() {
    let s = new_game(GameConfig::default(), &mut seeded_rng());
    let snap = snapshot(&s);
    assert_eq!(snap.status, GameStatus::Menu);
    assert_eq!(snap.banner.as_deref(), Some("WAVE 1"));
    assert_eq!(count(&snap, SpriteTag::Enemy), 27);
    assert_eq!(count(&snap, SpriteTag::Player), 1);
    assert_eq!(snap.sprites.last().map(|s| s.tag), Some(SpriteTag::Player));

    let hud = &snap.hud;
    assert_eq!(hud.score, 0);
    assert_eq!(hud.wave, 1);
    assert_eq!(hud.wave_kind, WaveKind::Regular);
    assert_eq!(hud.lives, 3);
    assert_relative_eq!(hud.health_pct, 100.0);
    assert_relative_eq!(hud.power_pct, 100.0);
    assert_eq!(hud.double_shoot, 0);
    assert_eq!(hud.shield, 0);
}

#[test]
fn enemy_sprites_carry_wave_colours() {
    let snap = snapshot(&make_state());
    let colors: Vec<ColorPair> = snap
        .sprites
        .iter()
        .filter(|s| s.tag == SpriteTag::Enemy)
        .filter_map(|s| s.colors)
        .collect();
    assert_eq!(colors.len(), 27);
    assert!(colors.iter().all(|c| *c == ColorPair { body: 0, eye: 0 }));
}

#[test]
fn player_flags_follow_effects() {
    let mut s = make_state();
    s.player.shield.activate(600);
    s.player.penetrating.activate(300);
    s.player.respawn_grace = 5;
    let snap = snapshot(&s);
    let flags = player_sprite(&snap).flags;
    assert!(flags.contains(SpriteFlags::SHIELD | SpriteFlags::PENETRATING));
    assert!(flags.contains(SpriteFlags::RESPAWN_GRACE));
    assert!(!flags.contains(SpriteFlags::DOUBLE_SHOOT));
    assert_eq!(snap.hud.shield, 600);
    assert_eq!(snap.hud.penetrating, 300);
}

#[test]
fn god_mode_shows_infinite_shield() {
    let mut s = make_state();
    toggle_god_mode(&mut s);
    let snap = snapshot(&s);
    assert!(snap.hud.god_mode);
    assert_eq!(format_remaining(snap.hud.shield), "∞");
}

#[test]
fn hud_percentages_track_player() {
    let mut s = make_state();
    s.player.health = 65.0;
    s.player.power = 40.0;
    let snap = snapshot(&s);
    assert_relative_eq!(snap.hud.health_pct, 65.0);
    assert_relative_eq!(snap.hud.power_pct, 40.0);
}

#[test]
fn boss_sprites_show_core_state() {
    let mut s = make_state();
    s.enemies.clear();
    let mut boss = Boss::new(&s.config);
    boss.parts[0].health = 0;
    s.bosses.push(boss);

    let snap = snapshot(&s);
    assert_eq!(count(&snap, SpriteTag::Boss), 1);
    assert_eq!(count(&snap, SpriteTag::BossPart), 3);
    let destroyed = snap
        .sprites
        .iter()
        .filter(|sp| sp.tag == SpriteTag::BossPart && sp.flags.contains(SpriteFlags::DESTROYED))
        .count();
    assert_eq!(destroyed, 1);
    let core = snap.sprites.iter().find(|sp| sp.tag == SpriteTag::BossCore).unwrap();
    assert!(!core.flags.contains(SpriteFlags::CORE_EXPOSED));

    for part in &mut s.bosses[0].parts {
        part.health = 0;
    }
    let snap = snapshot(&s);
    let core = snap.sprites.iter().find(|sp| sp.tag == SpriteTag::BossCore).unwrap();
    assert!(core.flags.contains(SpriteFlags::CORE_EXPOSED));
}

#[test]
fn collected_extra_life_is_drawn_rising() {
    let mut s = make_state();
    let mut life = ExtraLifePowerUp::new(100.0, EXTRA_LIFE_GROUND, &s.config);
    life.collect();
    for _ in 0..10 {
        life.advance();
    }
    s.pickups.push(Pickup::ExtraLife(life));
    let snap = snapshot(&s);
    let sprite = snap.sprites.iter().find(|sp| sp.tag == SpriteTag::ExtraLife).unwrap();
    assert!(sprite.flags.contains(SpriteFlags::COLLECTED));
    assert_eq!(sprite.y, EXTRA_LIFE_GROUND - 10.0);
}

#[test]
fn bullets_and_pickups_are_tagged() {
    let mut s = make_state();
    s.bullets.push(Bullet::new(100.0, 300.0, true));
    s.enemy_bullets.push(EnemyBullet::aimed(100.0, 100.0, (400.0, 500.0), AIMED_BULLET_SPEED));
    s.pickups.push(Pickup::PowerUp(PowerUp::centered(50.0, 50.0, PowerUpKind::Shield)));
    let snap = snapshot(&s);

    let bullet = snap.sprites.iter().find(|sp| sp.tag == SpriteTag::Bullet).unwrap();
    assert!(bullet.flags.contains(SpriteFlags::PENETRATING));
    let shot = snap.sprites.iter().find(|sp| sp.tag == SpriteTag::EnemyBullet).unwrap();
    assert!(shot.flags.contains(SpriteFlags::AIMED));
    assert_eq!(count(&snap, SpriteTag::PowerUp(PowerUpKind::Shield)), 1);
}

#[test]
fn bonus_wave_divers_are_flagged() {
    let mut s = make_state();
    jump_to_wave(&mut s, 5, &mut seeded_rng());
    let bonus = s.bonus.as_mut().unwrap();
    let mut diver = bonus.flocks[0].members.pop().unwrap();
    diver.detach();
    bonus.detached.push(diver);

    let snap = snapshot(&s);
    assert_eq!(count(&snap, SpriteTag::FlockEnemy), 14);
    let detached = snap
        .sprites
        .iter()
        .filter(|sp| sp.flags.contains(SpriteFlags::DETACHED))
        .count();
    assert_eq!(detached, 1);
    assert_eq!(snap.hud.wave_kind, WaveKind::Bonus);
}
