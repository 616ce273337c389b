/// Viewport geometry and gameplay tunables.
///
/// Geometry is fixed (the logical viewport never scales); everything that
/// shapes difficulty or feel lives in `GameConfig` so a session can be built
/// with non-default values in tests.

use thiserror::Error;

// ── Viewport ──────────────────────────────────────────────────────────────────

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 600.0;

/// Simulation ticks per second. Every duration below is expressed in ticks.
pub const TICK_RATE: u32 = 60;

// ── Entity boxes ──────────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: f32 = 40.0;
pub const PLAYER_HEIGHT: f32 = 45.0;
/// Bottom edge of the player's box (kept above the power bar).
pub const PLAYER_GROUND: f32 = HEIGHT - 35.0;
pub const PLAYER_SPEED: f32 = 5.0;

pub const BULLET_WIDTH: f32 = 3.0;
pub const BULLET_HEIGHT: f32 = 10.0;
pub const BULLET_SPEED: f32 = 5.0;

pub const ENEMY_BULLET_WIDTH: f32 = 6.0;
pub const ENEMY_BULLET_HEIGHT: f32 = 15.0;
pub const ENEMY_BULLET_SPEED: f32 = 2.0;
pub const AIMED_BULLET_SPEED: f32 = 3.0;

pub const ENEMY_SIZE: f32 = 30.0;
pub const ENEMY_MOVE_DELAY: f32 = 40.0;

pub const SPECIAL_WIDTH: f32 = 60.0;
pub const SPECIAL_HEIGHT: f32 = 40.0;
pub const SPECIAL_Y: f32 = 50.0;
pub const SPECIAL_SPEED: f32 = 2.0;

pub const BOSS_WIDTH: f32 = 200.0;
pub const BOSS_HEIGHT: f32 = 80.0;
pub const BOSS_Y: f32 = 60.0;
pub const BOSS_SPEED: f32 = 2.0;

pub const FLOCK_SPEED: f32 = 1.5;
/// Divers drop at twice the flock's sideways speed.
pub const FLOCK_DIVE_SPEED: f32 = 2.0 * FLOCK_SPEED;
pub const FLOCK_SIZE: usize = 7;
/// V pattern, relative to the flock anchor.
pub const FLOCK_OFFSETS: [(f32, f32); FLOCK_SIZE] = [
    (0.0, 0.0),
    (-40.0, 35.0),
    (40.0, 35.0),
    (-80.0, 70.0),
    (80.0, 70.0),
    (-120.0, 105.0),
    (120.0, 105.0),
];

pub const POWERUP_SIZE: f32 = 20.0;
pub const POWERUP_SPEED: f32 = 1.0;

pub const EXTRA_LIFE_SIZE: f32 = 20.0;
pub const EXTRA_LIFE_SPEED: f32 = 2.0;
pub const EXTRA_LIFE_GROUND: f32 = HEIGHT - 40.0;

pub const EXPLOSION_START_RADIUS: f32 = 1.0;
pub const EXPLOSION_GROWTH: f32 = 0.5;
pub const EXPLOSION_MAX_RADIUS: f32 = 20.0;

/// Number of body / eye colours enemies cycle through.
pub const PALETTE_SIZE: u32 = 6;

/// Enemy palette (RGB), indexed by `ColorPair`.
pub const ENEMY_PALETTE: [(u8, u8, u8); PALETTE_SIZE as usize] = [
    (255, 0, 0),
    (0, 255, 0),
    (0, 128, 255),
    (255, 255, 0),
    (255, 0, 255),
    (0, 255, 255),
];

/// Top row of a freshly built regular formation.
pub const FORMATION_TOP: f32 = 50.0;
pub const FORMATION_GAP: f32 = 10.0;

// ── Tunables ──────────────────────────────────────────────────────────────────

/// Everything a session can be tuned with. Stored inside `GameState` and
/// handed to entity constructors by reference.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub initial_lives: u32,
    pub max_health: f32,
    pub max_power: f32,
    pub power_regen_rate: f32,
    pub shoot_cost: f32,
    pub shoot_delay_full: u32,
    pub shoot_delay_low: u32,
    pub respawn_grace: u32,

    pub double_shoot_duration: u32,
    pub penetrating_duration: u32,
    pub shield_duration: u32,

    pub enemy_bullet_damage: f32,
    pub enemy_bullet_cap: usize,
    pub enemy_initial_cooldown: (u32, u32),
    pub enemy_cooldown: (u32, u32),

    pub score_enemy: u32,
    pub score_special: u32,
    pub score_flock: u32,
    pub score_boss_part: u32,
    pub score_boss: u32,
    pub powerup_drop_chance: f64,

    pub special_spawn_interval: u32,
    pub special_health: u32,
    pub special_cooldown: (u32, u32),

    pub boss_every: u32,
    pub bonus_every: u32,
    pub boss_parts: usize,
    pub boss_part_health: u32,
    pub boss_core_health: u32,
    pub boss_attack_chance: f64,

    pub flock_health: u32,
    pub flock_detach_interval: u32,
    pub flock_cooldown: (u32, u32),

    pub extra_life_lifetime: u32,
    pub extra_life_display: u32,

    pub wave_banner: u32,
    pub life_lost_banner: u32,

    pub initial_base_speed: f32,
    pub initial_step_size: f32,
    pub escalation: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            initial_lives: 3,
            max_health: 100.0,
            max_power: 100.0,
            power_regen_rate: 0.25,
            shoot_cost: 20.0,
            shoot_delay_full: 15,
            shoot_delay_low: 30,
            respawn_grace: 3 * TICK_RATE,

            double_shoot_duration: 20 * TICK_RATE,
            penetrating_duration: 10 * TICK_RATE,
            shield_duration: 30 * TICK_RATE,

            enemy_bullet_damage: 35.0,
            enemy_bullet_cap: 3,
            enemy_initial_cooldown: (60, 180),
            enemy_cooldown: (120, 240),

            score_enemy: 10,
            score_special: 100,
            score_flock: 20,
            score_boss_part: 50,
            score_boss: 500,
            powerup_drop_chance: 0.1,

            special_spawn_interval: 10 * TICK_RATE,
            special_health: 30,
            special_cooldown: (90, 150),

            boss_every: 10,
            bonus_every: 5,
            boss_parts: 3,
            boss_part_health: 3,
            boss_core_health: 10,
            boss_attack_chance: 0.02,

            flock_health: 2,
            flock_detach_interval: 90,
            flock_cooldown: (45, 90),

            extra_life_lifetime: 5 * TICK_RATE,
            extra_life_display: TICK_RATE,

            wave_banner: 2 * TICK_RATE,
            life_lost_banner: 3 * TICK_RATE / 2,

            initial_base_speed: 1.0,
            initial_step_size: ((WIDTH as u32 - 60) / 20) as f32,
            escalation: 1.1,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("{name} must be within [0, 1], got {value}")]
    BadProbability { name: &'static str, value: f64 },
    #[error("cooldown range {name} is inverted ({low} > {high})")]
    InvertedRange { name: &'static str, low: u32, high: u32 },
    #[error("shoot cost {cost} exceeds max power {max}")]
    ShootCostTooHigh { cost: f32, max: f32 },
    #[error("low-power delay {low} is shorter than full-power delay {full}")]
    DelayOrder { full: u32, low: u32 },
    #[error("bonus wave interval {bonus} must differ from boss interval {boss}")]
    WaveIntervalClash { bonus: u32, boss: u32 },
}

impl GameConfig {
    /// Reject contradictory thresholds. Called once at startup; a failure here
    /// is a programmer error, never a runtime condition.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts: [(&'static str, u32); 12] = [
            ("initial_lives", self.initial_lives),
            ("respawn_grace", self.respawn_grace),
            ("double_shoot_duration", self.double_shoot_duration),
            ("penetrating_duration", self.penetrating_duration),
            ("shield_duration", self.shield_duration),
            ("special_spawn_interval", self.special_spawn_interval),
            ("special_health", self.special_health),
            ("boss_every", self.boss_every),
            ("bonus_every", self.bonus_every),
            ("boss_part_health", self.boss_part_health),
            ("boss_core_health", self.boss_core_health),
            ("flock_health", self.flock_health),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(ConfigError::NotPositive(name));
            }
        }
        if self.boss_parts == 0 {
            return Err(ConfigError::NotPositive("boss_parts"));
        }
        let floats: [(&'static str, f32); 6] = [
            ("max_health", self.max_health),
            ("max_power", self.max_power),
            ("shoot_cost", self.shoot_cost),
            ("initial_base_speed", self.initial_base_speed),
            ("initial_step_size", self.initial_step_size),
            ("escalation", self.escalation),
        ];
        for (name, value) in floats {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive(name));
            }
        }
        for (name, value) in [
            ("powerup_drop_chance", self.powerup_drop_chance),
            ("boss_attack_chance", self.boss_attack_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::BadProbability { name, value });
            }
        }
        for (name, (low, high)) in [
            ("enemy_initial_cooldown", self.enemy_initial_cooldown),
            ("enemy_cooldown", self.enemy_cooldown),
            ("special_cooldown", self.special_cooldown),
            ("flock_cooldown", self.flock_cooldown),
        ] {
            if low > high {
                return Err(ConfigError::InvertedRange { name, low, high });
            }
        }
        if self.shoot_cost > self.max_power {
            return Err(ConfigError::ShootCostTooHigh {
                cost: self.shoot_cost,
                max: self.max_power,
            });
        }
        if self.shoot_delay_low < self.shoot_delay_full {
            return Err(ConfigError::DelayOrder {
                full: self.shoot_delay_full,
                low: self.shoot_delay_low,
            });
        }
        if self.bonus_every == self.boss_every {
            return Err(ConfigError::WaveIntervalClash {
                bonus: self.bonus_every,
                boss: self.boss_every,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_step_size_matches_play_area() {
        assert_eq!(GameConfig::default().initial_step_size, 37.0);
    }

    #[test]
    fn rejects_zero_lives() {
        let cfg = GameConfig { initial_lives: 0, ..GameConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::NotPositive("initial_lives")));
    }

    #[test]
    fn rejects_inverted_cooldown() {
        let cfg = GameConfig { enemy_cooldown: (240, 120), ..GameConfig::default() };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvertedRange { name: "enemy_cooldown", .. })
        ));
    }

    #[test]
    fn rejects_unaffordable_shot() {
        let cfg = GameConfig { shoot_cost: 150.0, ..GameConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::ShootCostTooHigh { .. })));
    }

    #[test]
    fn rejects_bad_probability() {
        let cfg = GameConfig { powerup_drop_chance: 1.5, ..GameConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::BadProbability { .. })));
    }

    #[test]
    fn rejects_delay_inversion() {
        let cfg = GameConfig { shoot_delay_low: 5, ..GameConfig::default() };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DelayOrder { full: 15, low: 5 })
        );
    }
}
