/// All game entity types and their per-tick update rules.
///
/// Entities only mutate themselves.  Anything that needs to look at more than
/// one entity (formation extents, aiming, collisions) lives in `waves`,
/// `collision` or `compute`.

use rand::Rng;

use crate::config::*;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned box, `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Strict interior test: a point exactly on an edge is outside.
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        self.x < px && px < self.x + self.w && self.y < py && py < self.y + self.h
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

// ── Timed power-up effects ────────────────────────────────────────────────────

/// Remaining-ticks value that never counts down (god mode).
pub const INFINITE: u32 = u32::MAX;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimedEffect {
    pub active: bool,
    pub remaining: u32,
}

impl TimedEffect {
    /// Refreshes rather than stacks: the timer restarts at `ticks`.
    pub fn activate(&mut self, ticks: u32) {
        self.active = ticks > 0;
        self.remaining = ticks;
    }

    pub fn clear(&mut self) {
        self.active = false;
        self.remaining = 0;
    }

    pub fn is_infinite(&self) -> bool {
        self.active && self.remaining == INFINITE
    }

    pub fn advance(&mut self) {
        if !self.active || self.remaining == INFINITE {
            return;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.active = false;
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub lives: u32,
    pub health: f32,
    pub power: f32,
    pub max_health: f32,
    pub max_power: f32,
    pub power_regen_rate: f32,
    pub shoot_cost: f32,
    /// Ticks until the next shot is allowed.
    pub shoot_cooldown: u32,
    pub shoot_delay_full: u32,
    pub shoot_delay_low: u32,
    pub double_shoot: TimedEffect,
    pub penetrating: TimedEffect,
    pub shield: TimedEffect,
    /// Post-death invulnerability, in ticks.
    pub respawn_grace: u32,
    pub respawn_grace_duration: u32,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        let (x, y) = Player::spawn_position();
        Player {
            x,
            y,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            speed: PLAYER_SPEED,
            lives: config.initial_lives,
            health: config.max_health,
            power: config.max_power,
            max_health: config.max_health,
            max_power: config.max_power,
            power_regen_rate: config.power_regen_rate,
            shoot_cost: config.shoot_cost,
            shoot_cooldown: 0,
            shoot_delay_full: config.shoot_delay_full,
            shoot_delay_low: config.shoot_delay_low,
            double_shoot: TimedEffect::default(),
            penetrating: TimedEffect::default(),
            shield: TimedEffect::default(),
            respawn_grace: 0,
            respawn_grace_duration: config.respawn_grace,
        }
    }

    /// Horizontally centred, standing on the ground line.
    pub fn spawn_position() -> (f32, f32) {
        (WIDTH / 2.0 - PLAYER_WIDTH / 2.0, PLAYER_GROUND - PLAYER_HEIGHT)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn move_by(&mut self, dx: f32) {
        self.x = (self.x + dx).clamp(0.0, WIDTH - self.width);
    }

    pub fn can_fire(&self) -> bool {
        self.power >= self.shoot_cost && self.shoot_cooldown == 0
    }

    /// Spend power for one shot.  The cooldown depends on what is left:
    /// at or above half of max power the short delay applies.
    pub fn try_fire(&mut self) -> bool {
        if !self.can_fire() {
            return false;
        }
        self.power = (self.power - self.shoot_cost).clamp(0.0, self.max_power);
        self.shoot_cooldown = if self.power >= self.max_power / 2.0 {
            self.shoot_delay_full
        } else {
            self.shoot_delay_low
        };
        true
    }

    /// Either nullifier blocks damage on its own.
    pub fn is_vulnerable(&self) -> bool {
        !self.shield.active && self.respawn_grace == 0
    }

    /// Returns `true` when the hit drained all health.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        self.health <= 0.0
    }

    pub fn respawn(&mut self) {
        let (x, y) = Player::spawn_position();
        self.x = x;
        self.y = y;
        self.health = self.max_health;
        self.power = self.max_power;
        self.shoot_cooldown = 0;
        self.respawn_grace = self.respawn_grace_duration;
    }

    pub fn advance(&mut self) {
        self.double_shoot.advance();
        self.penetrating.advance();
        self.shield.advance();
        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
        self.respawn_grace = self.respawn_grace.saturating_sub(1);
        self.power = (self.power + self.power_regen_rate).min(self.max_power);
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Player bullet.  `x`/`y` is its hit point: horizontal centre, leading edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub penetrating: bool,
}

impl Bullet {
    pub fn new(x: f32, y: f32, penetrating: bool) -> Self {
        Bullet { x, y, penetrating }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x - BULLET_WIDTH / 2.0, self.y, BULLET_WIDTH, BULLET_HEIGHT)
    }

    pub fn advance(&mut self) {
        self.y -= BULLET_SPEED;
    }

    pub fn is_expired(&self) -> bool {
        self.y < 0.0
    }
}

/// Bullet fired by any hostile entity.  Straight-down or aimed.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyBullet {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

impl EnemyBullet {
    pub fn straight(x: f32, y: f32) -> Self {
        EnemyBullet { x, y, vx: 0.0, vy: ENEMY_BULLET_SPEED }
    }

    /// Fired from `(x, y)` toward `target` at `speed` units per tick.
    pub fn aimed(x: f32, y: f32, target: (f32, f32), speed: f32) -> Self {
        let angle = (target.1 - y).atan2(target.0 - x);
        EnemyBullet {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x - ENEMY_BULLET_WIDTH / 2.0,
            self.y,
            ENEMY_BULLET_WIDTH,
            ENEMY_BULLET_HEIGHT,
        )
    }

    pub fn advance(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }

    pub fn is_expired(&self) -> bool {
        self.y > HEIGHT
            || self.y < -ENEMY_BULLET_HEIGHT
            || self.x < -ENEMY_BULLET_WIDTH
            || self.x > WIDTH + ENEMY_BULLET_WIDTH
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Indices into the fixed enemy palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorPair {
    pub body: u8,
    pub eye: u8,
}

/// Grid-march bookkeeping.  Flock enemies carry one too but never use it.
#[derive(Clone, Debug, PartialEq)]
pub struct MarchState {
    pub counter: f32,
    /// +1.0 right, -1.0 left.
    pub direction: f32,
    pub step_size: f32,
    pub base_speed: f32,
    pub speed_multiplier: f32,
}

/// How an enemy moves and fires.
#[derive(Clone, Debug, PartialEq)]
pub enum MovementPolicy {
    GridMarch,
    /// Positioned by its flock at `anchor + offset`.
    FlockMember { flock: usize, offset: (f32, f32) },
    /// Diving toward the bottom edge; rejoins `flock` at `offset` after exiting.
    FlockDetached { flock: usize, offset: (f32, f32) },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub health: u32,
    pub colors: ColorPair,
    pub shoot_cooldown: u32,
    pub march: MarchState,
    pub policy: MovementPolicy,
}

impl Enemy {
    /// A one-hit regular formation enemy.
    pub fn marcher(
        x: f32,
        y: f32,
        colors: ColorPair,
        base_speed: f32,
        step_size: f32,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let (low, high) = config.enemy_initial_cooldown;
        Enemy {
            x,
            y,
            width: ENEMY_SIZE,
            height: ENEMY_SIZE,
            health: 1,
            colors,
            shoot_cooldown: rng.gen_range(low..=high),
            march: MarchState {
                counter: 0.0,
                direction: 1.0,
                step_size,
                base_speed,
                speed_multiplier: 1.0,
            },
            policy: MovementPolicy::GridMarch,
        }
    }

    pub fn flock_member(
        flock: usize,
        offset: (f32, f32),
        anchor: (f32, f32),
        colors: ColorPair,
        base_speed: f32,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let (low, high) = config.flock_cooldown;
        Enemy {
            x: anchor.0 + offset.0,
            y: anchor.1 + offset.1,
            width: ENEMY_SIZE,
            height: ENEMY_SIZE,
            health: config.flock_health,
            colors,
            shoot_cooldown: rng.gen_range(low..=high),
            march: MarchState {
                counter: 0.0,
                direction: 1.0,
                step_size: 0.0,
                base_speed,
                speed_multiplier: 1.0,
            },
            policy: MovementPolicy::FlockMember { flock, offset },
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_detached(&self) -> bool {
        matches!(self.policy, MovementPolicy::FlockDetached { .. })
    }

    pub fn advance(&mut self) {
        match self.policy {
            MovementPolicy::GridMarch => {
                let m = &mut self.march;
                m.counter += m.base_speed * m.speed_multiplier;
                if m.counter >= ENEMY_MOVE_DELAY {
                    m.counter = 0.0;
                    self.x += m.step_size * m.direction * m.speed_multiplier;
                }
            }
            MovementPolicy::FlockMember { .. } => {}
            MovementPolicy::FlockDetached { .. } => {
                self.y += FLOCK_DIVE_SPEED * self.march.base_speed;
            }
        }
        self.tick_cooldown();
    }

    pub fn tick_cooldown(&mut self) {
        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
    }

    /// Formation hit an edge: turn around and come one row closer.
    pub fn drop_row(&mut self) {
        self.march.direction = -self.march.direction;
        self.y += self.height;
        self.march.counter = 0.0;
    }

    pub fn is_ready(&self) -> bool {
        self.shoot_cooldown == 0
    }

    pub fn reset_cooldown(&mut self, range: (u32, u32), rng: &mut impl Rng) {
        self.shoot_cooldown = rng.gen_range(range.0..=range.1);
    }

    /// Returns `true` when the enemy is destroyed.
    pub fn take_hit(&mut self, damage: u32) -> bool {
        self.health = self.health.saturating_sub(damage);
        self.health == 0
    }

    pub fn is_expired(&self) -> bool {
        self.health == 0
    }

    /// Leave the flock and start a dive.
    pub fn detach(&mut self) {
        if let MovementPolicy::FlockMember { flock, offset } = self.policy {
            self.policy = MovementPolicy::FlockDetached { flock, offset };
        }
    }

    /// Back at the formation slot after a completed dive.
    pub fn rejoin(&mut self, anchor: (f32, f32)) {
        if let MovementPolicy::FlockDetached { flock, offset } = self.policy {
            self.x = anchor.0 + offset.0;
            self.y = anchor.1 + offset.1;
            self.policy = MovementPolicy::FlockMember { flock, offset };
        }
    }
}

// ── Special enemy ─────────────────────────────────────────────────────────────

/// One leg of the fly-by: hold for `pause` ticks, then travel until centred
/// on `target_percent` of the screen width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    pub target_percent: u32,
    pub pause: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpecialEnemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub health: u32,
    pub shoot_cooldown: u32,
    pub pattern: Vec<Waypoint>,
    pub current: usize,
}

impl SpecialEnemy {
    pub fn new(config: &GameConfig, rng: &mut impl Rng) -> Self {
        SpecialEnemy {
            x: -SPECIAL_WIDTH,
            y: SPECIAL_Y,
            width: SPECIAL_WIDTH,
            height: SPECIAL_HEIGHT,
            speed: SPECIAL_SPEED,
            health: config.special_health,
            shoot_cooldown: 0,
            pattern: SpecialEnemy::generate_pattern(rng),
            current: 0,
        }
    }

    /// Left-to-right stops between 20% and 80% of the width, then an exit
    /// leg at 110% with no pause.
    pub fn generate_pattern(rng: &mut impl Rng) -> Vec<Waypoint> {
        let mut pattern = Vec::new();
        let mut current = 0;
        while current < 80 {
            let max_target = (current + 50).min(80);
            let min_target = (current + 10).max(20);
            if max_target <= min_target {
                break;
            }
            let target = rng.gen_range(min_target..=max_target);
            pattern.push(Waypoint {
                target_percent: target,
                pause: rng.gen_range(30..=90),
            });
            current = target;
        }
        pattern.push(Waypoint { target_percent: 110, pause: 0 });
        pattern
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn advance(&mut self) {
        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
        let Some(step) = self.pattern.get_mut(self.current) else {
            return;
        };
        let target_x = WIDTH * step.target_percent as f32 / 100.0 - self.width / 2.0;
        if step.pause > 0 {
            step.pause -= 1;
        } else if (self.x - target_x).abs() > self.speed {
            self.x += if target_x > self.x { self.speed } else { -self.speed };
        } else {
            self.current += 1;
        }
    }

    pub fn is_expired(&self) -> bool {
        self.health == 0 || self.current >= self.pattern.len() || self.x >= WIDTH + self.width
    }

    pub fn is_ready(&self) -> bool {
        self.shoot_cooldown == 0
    }

    pub fn reset_cooldown(&mut self, range: (u32, u32), rng: &mut impl Rng) {
        self.shoot_cooldown = rng.gen_range(range.0..=range.1);
    }

    /// Bullet from the underside, aimed at `target`.
    pub fn aimed_shot(&self, target: (f32, f32)) -> EnemyBullet {
        EnemyBullet::aimed(
            self.x + self.width / 2.0,
            self.y + self.height,
            target,
            AIMED_BULLET_SPEED,
        )
    }

    /// Returns `true` when the hit was fatal.
    pub fn take_damage(&mut self, damage: u32) -> bool {
        self.health = self.health.saturating_sub(damage);
        self.health == 0
    }
}

// ── Boss ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct BossPart {
    pub health: u32,
    pub max_health: u32,
}

/// What a bullet did to the boss.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BossHit {
    Miss,
    /// Armour or a not-yet-exposed core absorbed the bullet.
    Absorbed,
    Part { index: usize, destroyed: bool },
    Core { destroyed: bool },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub direction: f32,
    pub speed: f32,
    pub parts: Vec<BossPart>,
    pub core_health: u32,
    pub core_max_health: u32,
}

impl Boss {
    pub fn new(config: &GameConfig) -> Self {
        Boss {
            x: WIDTH / 2.0 - BOSS_WIDTH / 2.0,
            y: BOSS_Y,
            width: BOSS_WIDTH,
            height: BOSS_HEIGHT,
            direction: 1.0,
            speed: BOSS_SPEED,
            parts: (0..config.boss_parts)
                .map(|_| BossPart {
                    health: config.boss_part_health,
                    max_health: config.boss_part_health,
                })
                .collect(),
            core_health: config.boss_core_health,
            core_max_health: config.boss_core_health,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Parts sit side by side along the bottom of the hull.
    pub fn part_rect(&self, index: usize) -> Rect {
        let slot = self.width / self.parts.len().max(1) as f32;
        Rect::new(
            self.x + index as f32 * slot + 5.0,
            self.y + self.height - 30.0,
            slot - 10.0,
            30.0,
        )
    }

    pub fn core_rect(&self) -> Rect {
        Rect::new(self.x + self.width / 2.0 - 25.0, self.y + 10.0, 50.0, 35.0)
    }

    pub fn core_exposed(&self) -> bool {
        self.parts.iter().all(|p| p.health == 0)
    }

    pub fn advance(&mut self) {
        self.x += self.speed * self.direction;
        if self.x <= 0.0 {
            self.x = 0.0;
            self.direction = 1.0;
        } else if self.x + self.width >= WIDTH {
            self.x = WIDTH - self.width;
            self.direction = -1.0;
        }
    }

    /// Chance-based, not cooldown-gated.
    pub fn attack(&self, chance: f64, rng: &mut impl Rng) -> Option<EnemyBullet> {
        if rng.gen_bool(chance) {
            let (cx, _) = self.core_rect().center();
            Some(EnemyBullet::straight(cx, self.y + self.height))
        } else {
            None
        }
    }

    pub fn hit(&mut self, px: f32, py: f32) -> BossHit {
        for index in 0..self.parts.len() {
            if self.parts[index].health > 0 && self.part_rect(index).contains_point(px, py) {
                let part = &mut self.parts[index];
                part.health -= 1;
                return BossHit::Part { index, destroyed: part.health == 0 };
            }
        }
        if !self.rect().contains_point(px, py) {
            return BossHit::Miss;
        }
        // With the parts gone the whole hull is open to the core.
        if self.core_exposed() {
            self.core_health = self.core_health.saturating_sub(1);
            return BossHit::Core { destroyed: self.core_health == 0 };
        }
        BossHit::Absorbed
    }

    pub fn is_expired(&self) -> bool {
        self.core_health == 0
    }
}

// ── Bonus wave: flocks ────────────────────────────────────────────────────────

/// A group of flock enemies that moves as one unit inside its lane.
#[derive(Clone, Debug, PartialEq)]
pub struct Flock {
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub direction: f32,
    pub lane_min: f32,
    pub lane_max: f32,
    pub members: Vec<Enemy>,
}

impl Flock {
    pub fn anchor(&self) -> (f32, f32) {
        (self.anchor_x, self.anchor_y)
    }

    pub fn advance(&mut self) {
        let left = FLOCK_OFFSETS.iter().map(|o| o.0).fold(f32::MAX, f32::min);
        let right = FLOCK_OFFSETS.iter().map(|o| o.0).fold(f32::MIN, f32::max) + ENEMY_SIZE;

        self.anchor_x += FLOCK_SPEED * self.direction;
        if self.anchor_x + left <= self.lane_min {
            self.anchor_x = self.lane_min - left;
            self.direction = 1.0;
        } else if self.anchor_x + right >= self.lane_max {
            self.anchor_x = self.lane_max - right;
            self.direction = -1.0;
        }

        let anchor = self.anchor();
        for member in &mut self.members {
            if let MovementPolicy::FlockMember { offset, .. } = member.policy {
                member.x = anchor.0 + offset.0;
                member.y = anchor.1 + offset.1;
            }
            member.advance();
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BonusWave {
    pub flocks: Vec<Flock>,
    pub detached: Vec<Enemy>,
    pub bullets: Vec<EnemyBullet>,
    /// Ticks until the next member detaches.
    pub detach_timer: u32,
}

impl BonusWave {
    pub fn formation_len(&self) -> usize {
        self.flocks.iter().map(|f| f.members.len()).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.formation_len() == 0 && self.detached.is_empty()
    }
}

// ── Pickups ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    DoubleShoot,
    Penetrating,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::DoubleShoot,
        PowerUpKind::Penetrating,
        PowerUpKind::Shield,
    ];

    pub fn random(rng: &mut impl Rng) -> Self {
        PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub x: f32,
    pub y: f32,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn centered(cx: f32, cy: f32, kind: PowerUpKind) -> Self {
        PowerUp {
            x: cx - POWERUP_SIZE / 2.0,
            y: cy - POWERUP_SIZE / 2.0,
            kind,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, POWERUP_SIZE, POWERUP_SIZE)
    }

    pub fn advance(&mut self) {
        self.y += POWERUP_SPEED;
    }

    pub fn is_expired(&self) -> bool {
        self.y > HEIGHT
    }
}

/// Falls to the ground line and waits there for a limited time.  Once
/// collected it floats upward for a short display window.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtraLifePowerUp {
    pub x: f32,
    pub y: f32,
    pub lifetime: u32,
    pub collected: bool,
    pub collection_time: u32,
    pub display_ticks: u32,
}

impl ExtraLifePowerUp {
    pub fn new(cx: f32, top: f32, config: &GameConfig) -> Self {
        ExtraLifePowerUp {
            x: cx - EXTRA_LIFE_SIZE / 2.0,
            y: top,
            lifetime: config.extra_life_lifetime,
            collected: false,
            collection_time: 0,
            display_ticks: config.extra_life_display,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, EXTRA_LIFE_SIZE, EXTRA_LIFE_SIZE)
    }

    /// Where the pickup is drawn (rises after collection).
    pub fn display_y(&self) -> f32 {
        self.y - self.collection_time as f32
    }

    pub fn can_collect(&self) -> bool {
        !self.collected && self.lifetime > 0
    }

    pub fn collect(&mut self) {
        self.collected = true;
        self.collection_time = 0;
    }

    pub fn advance(&mut self) {
        if self.collected {
            self.collection_time += 1;
        } else if self.y < EXTRA_LIFE_GROUND {
            self.y = (self.y + EXTRA_LIFE_SPEED).min(EXTRA_LIFE_GROUND);
        } else {
            self.lifetime = self.lifetime.saturating_sub(1);
        }
    }

    pub fn is_expired(&self) -> bool {
        if self.collected {
            self.collection_time > self.display_ticks
        } else {
            self.lifetime == 0
        }
    }
}

/// Every falling collectible, switched on by kind during resolution.
#[derive(Clone, Debug, PartialEq)]
pub enum Pickup {
    PowerUp(PowerUp),
    ExtraLife(ExtraLifePowerUp),
}

impl Pickup {
    pub fn rect(&self) -> Rect {
        match self {
            Pickup::PowerUp(p) => p.rect(),
            Pickup::ExtraLife(p) => p.rect(),
        }
    }

    pub fn advance(&mut self) {
        match self {
            Pickup::PowerUp(p) => p.advance(),
            Pickup::ExtraLife(p) => p.advance(),
        }
    }

    pub fn is_expired(&self) -> bool {
        match self {
            Pickup::PowerUp(p) => p.is_expired(),
            Pickup::ExtraLife(p) => p.is_expired(),
        }
    }
}

// ── Explosions ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl Explosion {
    pub fn new(x: f32, y: f32) -> Self {
        Explosion { x, y, radius: EXPLOSION_START_RADIUS }
    }

    pub fn advance(&mut self) {
        self.radius += EXPLOSION_GROWTH;
    }

    pub fn is_expired(&self) -> bool {
        self.radius > EXPLOSION_MAX_RADIUS
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Menu,
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveKind {
    Regular,
    Bonus,
    Boss,
}

/// Global march tuning, compounded on every wave transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Difficulty {
    pub base_speed: f32,
    pub step_size: f32,
}

/// Timed overlay message.  While one is showing the simulation holds still.
#[derive(Clone, Debug, PartialEq)]
pub struct Banner {
    pub text: String,
    pub remaining: u32,
}

/// The entire session.  Cloneable so `compute` can hand back a new copy.
#[derive(Clone, Debug)]
pub struct GameState {
    pub config: GameConfig,
    pub status: GameStatus,
    pub paused: bool,
    pub banner: Option<Banner>,
    pub god_mode: bool,
    pub wave: u32,
    pub wave_kind: WaveKind,
    pub difficulty: Difficulty,
    /// Enemy count when the current formation was built.
    pub formation_size: usize,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub special_enemy: Option<SpecialEnemy>,
    pub special_timer: u32,
    pub bosses: Vec<Boss>,
    pub bonus: Option<BonusWave>,
    pub pickups: Vec<Pickup>,
    pub explosions: Vec<Explosion>,
    pub score: u32,
    pub frame: u64,
}
