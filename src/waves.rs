/// Wave director: decides what each wave looks like, builds its formation,
/// marches regular formations and compounds difficulty between waves.

use log::info;
use rand::Rng;

use crate::config::*;
use crate::entities::{
    Banner, BonusWave, Boss, ColorPair, Difficulty, Enemy, Flock, GameState, WaveKind,
};

// ── Wave categories ───────────────────────────────────────────────────────────

/// Boss every `boss_every`-th wave, bonus every `bonus_every`-th wave that is
/// not a boss wave, regular otherwise.
pub fn select_wave_kind(wave: u32, config: &GameConfig) -> WaveKind {
    if wave % config.boss_every == 0 {
        WaveKind::Boss
    } else if wave % config.bonus_every == 0 {
        WaveKind::Bonus
    } else {
        WaveKind::Regular
    }
}

/// Body colour cycles every wave, eye colour every `PALETTE_SIZE` waves.
pub fn palette_for_wave(wave: u32) -> ColorPair {
    let n = wave.saturating_sub(1);
    ColorPair {
        body: (n % PALETTE_SIZE) as u8,
        eye: ((n / PALETTE_SIZE) % PALETTE_SIZE) as u8,
    }
}

// ── Difficulty ────────────────────────────────────────────────────────────────

pub fn initial_difficulty(config: &GameConfig) -> Difficulty {
    Difficulty {
        base_speed: config.initial_base_speed,
        step_size: config.initial_step_size,
    }
}

/// What `wave` inherits after `wave - 1` natural transitions.
pub fn difficulty_for_wave(wave: u32, config: &GameConfig) -> Difficulty {
    let k = i32::try_from(wave.saturating_sub(1)).unwrap_or(i32::MAX);
    let factor = config.escalation.powi(k);
    Difficulty {
        base_speed: config.initial_base_speed * factor,
        step_size: config.initial_step_size * factor,
    }
}

/// Compound the global march tuning and every live enemy's base speed.
/// Deliberately uncapped: long sessions keep getting faster.
pub fn escalate(state: &mut GameState) {
    let factor = state.config.escalation;
    state.difficulty.base_speed *= factor;
    state.difficulty.step_size *= factor;
    let step = state.difficulty.step_size;
    for enemy in &mut state.enemies {
        enemy.march.base_speed *= factor;
        enemy.march.step_size = step;
    }
    if let Some(bonus) = &mut state.bonus {
        for flock in &mut bonus.flocks {
            for member in &mut flock.members {
                member.march.base_speed *= factor;
            }
        }
        for diver in &mut bonus.detached {
            diver.march.base_speed *= factor;
        }
    }
}

// ── Builders ──────────────────────────────────────────────────────────────────

/// Three 3×3 groups side by side, horizontally centred.
pub fn build_regular(
    wave: u32,
    difficulty: &Difficulty,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Vec<Enemy> {
    let colors = palette_for_wave(wave);
    let group_width = 3.0 * ENEMY_SIZE + 2.0 * FORMATION_GAP;
    let group_spacing = 2.0 * ENEMY_SIZE;
    let start_x = ((WIDTH - (3.0 * group_width + 2.0 * group_spacing)) / 2.0).floor();

    let mut enemies = Vec::with_capacity(27);
    for group in 0..3 {
        for row in 0..3 {
            for col in 0..3 {
                let x = start_x
                    + group as f32 * (group_width + group_spacing)
                    + col as f32 * (ENEMY_SIZE + FORMATION_GAP);
                let y = FORMATION_TOP + row as f32 * (ENEMY_SIZE + FORMATION_GAP);
                enemies.push(Enemy::marcher(
                    x,
                    y,
                    colors,
                    difficulty.base_speed,
                    difficulty.step_size,
                    config,
                    rng,
                ));
            }
        }
    }
    enemies
}

/// Two flocks of `FLOCK_SIZE`, each confined to one half of the screen and
/// starting out moving away from each other.
pub fn build_bonus(
    wave: u32,
    difficulty: &Difficulty,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> BonusWave {
    let colors = palette_for_wave(wave);
    let lane = WIDTH / 2.0;
    let flocks = (0..2)
        .map(|index| {
            let lane_min = index as f32 * lane;
            let anchor = (lane_min + lane / 2.0 - ENEMY_SIZE / 2.0, FORMATION_TOP + 10.0);
            let members = FLOCK_OFFSETS
                .iter()
                .map(|&offset| {
                    Enemy::flock_member(
                        index,
                        offset,
                        anchor,
                        colors,
                        difficulty.base_speed,
                        config,
                        rng,
                    )
                })
                .collect();
            Flock {
                anchor_x: anchor.0,
                anchor_y: anchor.1,
                direction: if index == 0 { -1.0 } else { 1.0 },
                lane_min,
                lane_max: lane_min + lane,
                members,
            }
        })
        .collect();

    BonusWave {
        flocks,
        detached: Vec::new(),
        bullets: Vec::new(),
        detach_timer: config.flock_detach_interval,
    }
}

pub fn build_boss(config: &GameConfig) -> Boss {
    Boss::new(config)
}

/// Replace the hostile collections with a fresh formation for `state.wave`.
pub fn start_wave(state: &mut GameState, rng: &mut impl Rng) {
    let kind = select_wave_kind(state.wave, &state.config);
    state.wave_kind = kind;
    state.enemies.clear();
    state.bosses.clear();
    state.bonus = None;

    match kind {
        WaveKind::Regular => {
            state.enemies = build_regular(state.wave, &state.difficulty, &state.config, rng);
        }
        WaveKind::Bonus => {
            state.bonus = Some(build_bonus(state.wave, &state.difficulty, &state.config, rng));
        }
        WaveKind::Boss => {
            state.bosses.push(build_boss(&state.config));
        }
    }
    state.formation_size = state.enemies.len();
    state.banner = Some(Banner {
        text: format!("WAVE {}", state.wave),
        remaining: state.config.wave_banner,
    });
    info!("wave {} started ({:?})", state.wave, kind);
}

/// Regular formation and bosses gone, and any bonus wave fully cleared.
pub fn is_wave_clear(state: &GameState) -> bool {
    state.enemies.is_empty()
        && state.bosses.is_empty()
        && state.bonus.as_ref().map_or(true, |b| b.is_complete())
}

/// Move on to the next wave: count up, compound difficulty, rebuild.
pub fn next_wave(state: &mut GameState, rng: &mut impl Rng) {
    state.wave += 1;
    escalate(state);
    start_wave(state, rng);
}

// ── Formation march ───────────────────────────────────────────────────────────

/// Speeds up as the formation thins out (up to +2.0) and as its lowest row
/// closes in on the player (up to +1.0).
pub fn formation_speed_multiplier(enemies: &[Enemy], formation_size: usize, player_y: f32) -> f32 {
    if enemies.is_empty() || formation_size == 0 {
        return 1.0;
    }
    let thinned = 1.0 - enemies.len() as f32 / formation_size as f32;
    let lowest = enemies
        .iter()
        .map(|e| e.rect().bottom())
        .fold(f32::MIN, f32::max);
    let start = FORMATION_TOP + 3.0 * ENEMY_SIZE + 2.0 * FORMATION_GAP;
    let span = (player_y - start).max(1.0);
    let closeness = ((lowest - start) / span).clamp(0.0, 1.0);
    1.0 + 2.0 * thinned.clamp(0.0, 1.0) + closeness
}

/// One tick of the step-and-pause march.  When the formation's extent touches
/// the edge it is heading for, every enemy turns around and drops a row
/// instead of stepping.
pub fn march_formation(enemies: &mut [Enemy]) {
    let Some(first) = enemies.first() else {
        return;
    };
    let direction = first.march.direction;
    let leftmost = enemies.iter().map(|e| e.x).fold(f32::MAX, f32::min);
    let rightmost = enemies
        .iter()
        .map(|e| e.x + e.width)
        .fold(f32::MIN, f32::max);

    let at_edge = (direction > 0.0 && rightmost >= WIDTH) || (direction < 0.0 && leftmost <= 0.0);
    for enemy in enemies.iter_mut() {
        if at_edge {
            enemy.drop_row();
            enemy.tick_cooldown();
        } else {
            enemy.advance();
        }
    }
}
