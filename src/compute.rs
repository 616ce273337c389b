/// Game loop and top-level state machine.
///
/// `tick` takes an immutable reference to the current `GameState` plus this
/// tick's input intents and returns a brand-new `GameState`.  Side effects are
/// limited to the injected RNG, so a seeded RNG replays a session exactly.

use log::{debug, info};
use rand::Rng;

use crate::collision;
use crate::config::{GameConfig, AIMED_BULLET_SPEED, HEIGHT};
use crate::entities::{
    Bullet, EnemyBullet, GameState, GameStatus, MovementPolicy, Player, SpecialEnemy, INFINITE,
};
use crate::waves;

/// Discrete per-tick input, already decoded from whatever device produced it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputIntents {
    pub move_left: bool,
    pub move_right: bool,
    pub fire: bool,
    pub pause_toggle: bool,
    pub start: bool,
    pub restart: bool,
    pub menu: bool,
    pub god_mode_toggle: bool,
    pub jump_to_wave: Option<u32>,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// A fresh session sitting in the menu with wave 1 already built.
pub fn new_game(config: GameConfig, rng: &mut impl Rng) -> GameState {
    let mut state = GameState {
        player: Player::new(&config),
        status: GameStatus::Menu,
        paused: false,
        banner: None,
        god_mode: false,
        wave: 1,
        wave_kind: waves::select_wave_kind(1, &config),
        difficulty: waves::initial_difficulty(&config),
        formation_size: 0,
        bullets: Vec::new(),
        enemies: Vec::new(),
        enemy_bullets: Vec::new(),
        special_enemy: None,
        special_timer: 0,
        bosses: Vec::new(),
        bonus: None,
        pickups: Vec::new(),
        explosions: Vec::new(),
        score: 0,
        frame: 0,
        config,
    };
    waves::start_wave(&mut state, rng);
    state
}

// ── Per-tick step ────────────────────────────────────────────────────────────

/// Advance the session by one tick.
pub fn tick(state: &GameState, input: &InputIntents, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    step(&mut next, input, rng);
    next
}

/// In-place version of `tick`.
pub fn step(state: &mut GameState, input: &InputIntents, rng: &mut impl Rng) {
    state.frame += 1;
    handle_control_input(state, input, rng);

    if state.status != GameStatus::Playing || state.paused {
        return;
    }

    // A banner holds the simulation still until it runs out.
    if let Some(banner) = &mut state.banner {
        banner.remaining = banner.remaining.saturating_sub(1);
        if banner.remaining == 0 {
            state.banner = None;
        }
        return;
    }

    if input.move_left {
        state.player.move_by(-state.player.speed);
    }
    if input.move_right {
        state.player.move_by(state.player.speed);
    }
    if input.fire {
        try_shoot(state);
    }
    state.player.advance();

    advance_entities(state, rng);

    if waves::is_wave_clear(state) {
        waves::next_wave(state, rng);
    }

    collision::resolve_collisions(state, rng);
}

fn handle_control_input(state: &mut GameState, input: &InputIntents, rng: &mut impl Rng) {
    match state.status {
        GameStatus::Menu => {
            if input.start {
                state.status = GameStatus::Playing;
                info!("playing wave {}", state.wave);
            }
        }
        GameStatus::Playing => {
            if input.menu {
                state.status = GameStatus::Menu;
                state.paused = false;
                info!("returned to menu");
                return;
            }
            if input.pause_toggle {
                state.paused = !state.paused;
                info!("paused: {}", state.paused);
            }
            if input.god_mode_toggle {
                toggle_god_mode(state);
            }
            if let Some(wave) = input.jump_to_wave {
                jump_to_wave(state, wave, rng);
            }
        }
        GameStatus::GameOver => {
            if input.restart || input.menu {
                let config = state.config.clone();
                *state = new_game(config, rng);
                if input.restart {
                    state.status = GameStatus::Playing;
                    info!("restarted");
                }
            }
        }
    }
}

// ── Player actions ───────────────────────────────────────────────────────────

/// Fire if power and cooldown allow: two bullets with double shoot active,
/// otherwise one from the nose.
pub fn try_shoot(state: &mut GameState) -> bool {
    let player = &mut state.player;
    if !player.try_fire() {
        return false;
    }
    let penetrating = player.penetrating.active;
    if player.double_shoot.active {
        state.bullets.push(Bullet::new(player.x + 10.0, player.y, penetrating));
        state
            .bullets
            .push(Bullet::new(player.x + player.width - 10.0, player.y, penetrating));
    } else {
        state
            .bullets
            .push(Bullet::new(player.x + player.width / 2.0, player.y, penetrating));
    }
    true
}

/// God mode is a shield that never runs out.
pub fn toggle_god_mode(state: &mut GameState) {
    state.god_mode = !state.god_mode;
    if state.god_mode {
        state.player.shield.activate(INFINITE);
    } else {
        state.player.shield.clear();
    }
    info!("god mode: {}", state.god_mode);
}

/// Skip straight to `wave`: everything transient is cleared, the player is
/// reset and difficulty is set to what natural progression would give.
pub fn jump_to_wave(state: &mut GameState, wave: u32, rng: &mut impl Rng) {
    let wave = wave.max(1);
    state.wave = wave;
    state.difficulty = waves::difficulty_for_wave(wave, &state.config);

    state.bullets.clear();
    state.enemy_bullets.clear();
    state.pickups.clear();
    state.explosions.clear();
    state.special_enemy = None;
    state.special_timer = 0;

    let (x, y) = Player::spawn_position();
    let player = &mut state.player;
    player.x = x;
    player.y = y;
    player.health = player.max_health;
    player.shoot_cooldown = 0;
    player.respawn_grace = 0;
    if state.god_mode {
        player.shield.activate(INFINITE);
    } else {
        player.shield.clear();
    }

    info!("jumping to wave {}", wave);
    waves::start_wave(state, rng);
}

// ── Entity advancement ───────────────────────────────────────────────────────

/// Move everything one tick and let hostiles fire.  Expired entities are
/// pruned here; destroyed ones are removed by the collision engine.
pub fn advance_entities(state: &mut GameState, rng: &mut impl Rng) {
    for bullet in &mut state.bullets {
        bullet.advance();
    }
    state.bullets.retain(|b| !b.is_expired());

    advance_formation(state, rng);
    advance_special_enemy(state, rng);

    for boss in &mut state.bosses {
        boss.advance();
        if let Some(shot) = boss.attack(state.config.boss_attack_chance, rng) {
            state.enemy_bullets.push(shot);
        }
    }

    advance_bonus_wave(state, rng);

    for bullet in &mut state.enemy_bullets {
        bullet.advance();
    }
    state.enemy_bullets.retain(|b| !b.is_expired());

    for pickup in &mut state.pickups {
        pickup.advance();
    }
    state.pickups.retain(|p| !p.is_expired());

    for explosion in &mut state.explosions {
        explosion.advance();
    }
    state.explosions.retain(|e| !e.is_expired());
}

fn advance_formation(state: &mut GameState, rng: &mut impl Rng) {
    if state.enemies.is_empty() {
        return;
    }
    let multiplier =
        waves::formation_speed_multiplier(&state.enemies, state.formation_size, state.player.y);
    for enemy in &mut state.enemies {
        enemy.march.speed_multiplier = multiplier;
    }
    waves::march_formation(&mut state.enemies);

    let config = &state.config;
    for enemy in &mut state.enemies {
        if !enemy.is_ready() {
            continue;
        }
        // The cooldown restarts even when the cap swallows the shot.
        enemy.reset_cooldown(config.enemy_cooldown, rng);
        if state.enemy_bullets.len() < config.enemy_bullet_cap {
            state.enemy_bullets.push(EnemyBullet::straight(
                enemy.x + enemy.width / 2.0,
                enemy.y + enemy.height,
            ));
        }
    }
}

fn advance_special_enemy(state: &mut GameState, rng: &mut impl Rng) {
    let target = state.player.rect().center();
    match state.special_enemy.as_mut() {
        Some(special) => {
            special.advance();
            if special.is_expired() {
                state.special_enemy = None;
                debug!("special enemy left the screen");
            } else if special.is_ready() {
                special.reset_cooldown(state.config.special_cooldown, rng);
                state.enemy_bullets.push(special.aimed_shot(target));
            }
        }
        None => {
            state.special_timer += 1;
            if state.special_timer >= state.config.special_spawn_interval {
                state.special_timer = 0;
                state.special_enemy = Some(SpecialEnemy::new(&state.config, rng));
                debug!("special enemy spawned");
            }
        }
    }
}

fn advance_bonus_wave(state: &mut GameState, rng: &mut impl Rng) {
    let target = state.player.rect().center();
    let config = &state.config;
    let Some(bonus) = state.bonus.as_mut() else {
        return;
    };

    for flock in &mut bonus.flocks {
        flock.advance();
    }

    bonus.detach_timer = bonus.detach_timer.saturating_sub(1);
    if bonus.detach_timer == 0 {
        bonus.detach_timer = config.flock_detach_interval;
        let candidates: Vec<usize> = (0..bonus.flocks.len())
            .filter(|&i| !bonus.flocks[i].members.is_empty())
            .collect();
        if !candidates.is_empty() {
            let flock = &mut bonus.flocks[candidates[rng.gen_range(0..candidates.len())]];
            let mut diver = flock.members.remove(rng.gen_range(0..flock.members.len()));
            diver.detach();
            diver.reset_cooldown(config.flock_cooldown, rng);
            bonus.bullets.push(EnemyBullet::aimed(
                diver.x + diver.width / 2.0,
                diver.y + diver.height,
                target,
                AIMED_BULLET_SPEED,
            ));
            debug!("flock enemy diving from ({}, {})", diver.x, diver.y);
            bonus.detached.push(diver);
        }
    }

    for diver in &mut bonus.detached {
        diver.advance();
        if diver.is_ready() {
            diver.reset_cooldown(config.flock_cooldown, rng);
            bonus.bullets.push(EnemyBullet::aimed(
                diver.x + diver.width / 2.0,
                diver.y + diver.height,
                target,
                AIMED_BULLET_SPEED,
            ));
        }
    }

    // Divers that left the bottom edge go back to their slot.
    let mut i = 0;
    while i < bonus.detached.len() {
        if bonus.detached[i].y <= HEIGHT {
            i += 1;
            continue;
        }
        let mut diver = bonus.detached.remove(i);
        if let MovementPolicy::FlockDetached { flock, .. } = diver.policy {
            if let Some(home) = bonus.flocks.get_mut(flock) {
                diver.rejoin(home.anchor());
                home.members.push(diver);
            }
        }
    }

    for bullet in &mut bonus.bullets {
        bullet.advance();
    }
    bonus.bullets.retain(|b| !b.is_expired());
}
