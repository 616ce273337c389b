/// Collision detection and consequences.
///
/// `resolve_collisions` runs once per tick after every entity has advanced.
/// The step order is fixed: later steps see the results of earlier ones
/// (a life lost in step 1 grants respawn grace that protects the player for
/// the rest of the tick).

use log::{debug, info};
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{
    Banner, BonusWave, BossHit, EnemyBullet, Explosion, ExtraLifePowerUp, GameState, GameStatus,
    Pickup, Player, PowerUp, PowerUpKind, Rect,
};
use crate::waves;

/// What an enemy hit on the player amounted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// Shield, respawn grace or an already finished game.
    Blocked,
    Damaged,
    LifeLost,
    GameOver,
}

pub fn resolve_collisions(state: &mut GameState, rng: &mut impl Rng) {
    enemy_bullets_vs_player(state);
    player_bullets_vs_enemies(state, rng);
    pickups_vs_player(state);
    formation_reaches_player(state, rng);
    special_enemy_vs_bullets(state);
    bosses_vs_bullets(state);
    bonus_wave_collisions(state);
}

// ── Shared consequences ───────────────────────────────────────────────────────

/// One standard enemy hit.  Shield and respawn grace each nullify it.
pub fn apply_enemy_hit(state: &mut GameState) -> HitOutcome {
    if state.status == GameStatus::GameOver || !state.player.is_vulnerable() {
        return HitOutcome::Blocked;
    }
    let damage = state.config.enemy_bullet_damage;
    if state.player.take_damage(damage) {
        lose_life(state)
    } else {
        HitOutcome::Damaged
    }
}

/// Spend a life.  With lives left the player respawns under grace;
/// otherwise the game is over.
pub fn lose_life(state: &mut GameState) -> HitOutcome {
    let player = &mut state.player;
    player.lives = player.lives.saturating_sub(1);
    player.health = player.max_health;
    if player.lives == 0 {
        state.status = GameStatus::GameOver;
        info!("game over at wave {} with score {}", state.wave, state.score);
        return HitOutcome::GameOver;
    }
    let (cx, cy) = player.rect().center();
    state.explosions.push(Explosion::new(cx, cy));
    state.player.respawn();
    state.banner = Some(Banner {
        text: "SHIP DESTROYED".to_string(),
        remaining: state.config.life_lost_banner,
    });
    info!("life lost, {} remaining", state.player.lives);
    HitOutcome::LifeLost
}

/// Refresh (never stack) the timer for `kind`.
pub fn apply_power_up(player: &mut Player, kind: PowerUpKind, config: &GameConfig) {
    match kind {
        PowerUpKind::DoubleShoot => player.double_shoot.activate(config.double_shoot_duration),
        PowerUpKind::Penetrating => player.penetrating.activate(config.penetrating_duration),
        PowerUpKind::Shield => {
            if !player.shield.is_infinite() {
                player.shield.activate(config.shield_duration);
            }
        }
    }
}

/// Count and remove every bullet whose hit point is inside `target`.
fn take_bullets_inside(bullets: &mut Vec<EnemyBullet>, target: Rect) -> usize {
    let before = bullets.len();
    bullets.retain(|b| !target.contains_point(b.x, b.y));
    before - bullets.len()
}

// ── 1. Enemy bullets ↔ player ─────────────────────────────────────────────────

fn enemy_bullets_vs_player(state: &mut GameState) {
    let hits = take_bullets_inside(&mut state.enemy_bullets, state.player.rect());
    for _ in 0..hits {
        apply_enemy_hit(state);
    }
}

// ── 2. Player bullets ↔ regular enemies ───────────────────────────────────────

fn player_bullets_vs_enemies(state: &mut GameState, rng: &mut impl Rng) {
    let mut spent = vec![false; state.bullets.len()];

    for (bi, bullet) in state.bullets.iter().enumerate() {
        // At most one enemy per bullet per tick.
        let Some(ei) = state
            .enemies
            .iter()
            .position(|e| e.rect().contains_point(bullet.x, bullet.y))
        else {
            continue;
        };
        if !bullet.penetrating {
            spent[bi] = true;
        }
        if !state.enemies[ei].take_hit(1) {
            continue;
        }
        let enemy = state.enemies.remove(ei);
        let (cx, cy) = enemy.rect().center();
        state.score += state.config.score_enemy;
        state.explosions.push(Explosion::new(cx, cy));
        if rng.gen_bool(state.config.powerup_drop_chance) {
            let kind = PowerUpKind::random(rng);
            debug!("power-up {:?} dropped at ({}, {})", kind, cx, cy);
            state.pickups.push(Pickup::PowerUp(PowerUp::centered(cx, cy, kind)));
        }
    }

    let mut flags = spent.into_iter();
    state.bullets.retain(|_| !flags.next().unwrap_or(false));
}

// ── 3. Pickups ↔ player ───────────────────────────────────────────────────────

fn pickups_vs_player(state: &mut GameState) {
    let player_box = state.player.rect();
    let mut effects = Vec::new();
    let mut lives_gained = 0;

    state.pickups.retain_mut(|pickup| match pickup {
        Pickup::PowerUp(power_up) => {
            if power_up.rect().overlaps(&player_box) {
                effects.push(power_up.kind);
                false
            } else {
                true
            }
        }
        // Kept after collection so it can float up; pruned once expired.
        Pickup::ExtraLife(life) => {
            if life.can_collect() && life.rect().overlaps(&player_box) {
                life.collect();
                lives_gained += 1;
            }
            true
        }
    });

    for kind in effects {
        debug!("collected {:?}", kind);
        apply_power_up(&mut state.player, kind, &state.config);
    }
    if lives_gained > 0 {
        state.player.lives += lives_gained;
        debug!("extra life collected, lives now {}", state.player.lives);
    }
}

// ── 4. Formation reaches the player ───────────────────────────────────────────

/// The lowest row reaching the player's row costs a life and restarts the
/// current wave from scratch.
fn formation_reaches_player(state: &mut GameState, rng: &mut impl Rng) {
    let player_top = state.player.y;
    if !state.enemies.iter().any(|e| e.rect().bottom() >= player_top) {
        return;
    }
    info!("formation reached the player on wave {}", state.wave);
    if lose_life(state) == HitOutcome::GameOver {
        return;
    }
    state.bullets.clear();
    state.enemy_bullets.clear();
    state.pickups.clear();
    state.special_enemy = None;
    state.special_timer = 0;
    waves::start_wave(state, rng);
    // The loss is what gets announced, not the restarted wave.
    state.banner = Some(Banner {
        text: "SHIP DESTROYED".to_string(),
        remaining: state.config.life_lost_banner,
    });
}

// ── 5. Special enemy ↔ player bullets ─────────────────────────────────────────

fn special_enemy_vs_bullets(state: &mut GameState) {
    let Some(special) = state.special_enemy.as_mut() else {
        return;
    };
    let target = special.rect();
    let Some(bi) = state
        .bullets
        .iter()
        .position(|b| target.contains_point(b.x, b.y))
    else {
        return;
    };
    state.bullets.remove(bi);

    // A single player bullet takes the whole pool.
    let pool = special.health;
    if !special.take_damage(pool) {
        return;
    }
    let (cx, cy) = target.center();
    state.score += state.config.score_special;
    state.explosions.push(Explosion::new(cx, cy));
    state.pickups.push(Pickup::ExtraLife(ExtraLifePowerUp::new(
        cx,
        target.bottom(),
        &state.config,
    )));
    state.special_enemy = None;
    debug!("special enemy destroyed");
}

// ── Boss ↔ player bullets ─────────────────────────────────────────────────────

/// Boss armour always stops the bullet, penetrating or not.
fn bosses_vs_bullets(state: &mut GameState) {
    if state.bosses.is_empty() {
        return;
    }
    let mut spent = vec![false; state.bullets.len()];

    for (bi, bullet) in state.bullets.iter().enumerate() {
        for boss in &mut state.bosses {
            if boss.is_expired() {
                continue;
            }
            match boss.hit(bullet.x, bullet.y) {
                BossHit::Miss => continue,
                BossHit::Absorbed => {}
                BossHit::Part { index, destroyed } => {
                    if destroyed {
                        let (cx, cy) = boss.part_rect(index).center();
                        state.score += state.config.score_boss_part;
                        state.explosions.push(Explosion::new(cx, cy));
                        if boss.core_exposed() {
                            debug!("boss core exposed");
                        }
                    }
                }
                BossHit::Core { destroyed } => {
                    if destroyed {
                        let (cx, cy) = boss.rect().center();
                        state.score += state.config.score_boss;
                        state.explosions.push(Explosion::new(cx, cy));
                        info!("boss defeated on wave {}", state.wave);
                    }
                }
            }
            spent[bi] = true;
            break;
        }
    }

    let mut flags = spent.into_iter();
    state.bullets.retain(|_| !flags.next().unwrap_or(false));
    state.bosses.retain(|b| !b.is_expired());
}

// ── 6. Bonus wave ─────────────────────────────────────────────────────────────

enum FlockHit {
    Miss,
    Wounded,
    Killed((f32, f32)),
}

fn hit_flock_enemy(bonus: &mut BonusWave, px: f32, py: f32) -> FlockHit {
    let groups = bonus
        .flocks
        .iter_mut()
        .map(|f| &mut f.members)
        .chain(std::iter::once(&mut bonus.detached));
    for group in groups {
        if let Some(i) = group.iter().position(|e| e.rect().contains_point(px, py)) {
            if group[i].take_hit(1) {
                let enemy = group.remove(i);
                return FlockHit::Killed(enemy.rect().center());
            }
            return FlockHit::Wounded;
        }
    }
    FlockHit::Miss
}

fn bonus_wave_collisions(state: &mut GameState) {
    let Some(bonus) = state.bonus.as_mut() else {
        return;
    };

    // Player bullets ↔ flock enemies, same rules as the regular formation.
    let mut spent = vec![false; state.bullets.len()];
    for (bi, bullet) in state.bullets.iter().enumerate() {
        match hit_flock_enemy(bonus, bullet.x, bullet.y) {
            FlockHit::Miss => continue,
            FlockHit::Wounded => {}
            FlockHit::Killed((cx, cy)) => {
                state.score += state.config.score_flock;
                state.explosions.push(Explosion::new(cx, cy));
            }
        }
        if !bullet.penetrating {
            spent[bi] = true;
        }
    }
    let mut flags = spent.into_iter();
    state.bullets.retain(|_| !flags.next().unwrap_or(false));

    // Flock bullets ↔ player.
    let player_box = state.player.rect();
    let bullet_hits = take_bullets_inside(&mut bonus.bullets, player_box);

    // Diving enemies ↔ player body: the diver is destroyed on contact.
    let mut rammed = Vec::new();
    bonus.detached.retain(|diver| {
        if diver.rect().overlaps(&player_box) {
            rammed.push(diver.rect().center());
            false
        } else {
            true
        }
    });

    for _ in 0..bullet_hits {
        apply_enemy_hit(state);
    }
    for (cx, cy) in rammed {
        state.explosions.push(Explosion::new(cx, cy));
        apply_enemy_hit(state);
    }
}
