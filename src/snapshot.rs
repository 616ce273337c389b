/// Render snapshot: a flat, renderer-agnostic description of one frame.
///
/// The simulation never draws anything itself.  After each tick the binary
/// asks for a `RenderSnapshot` and hands it to whatever adapter is in use.

use bitflags::bitflags;

use crate::config::TICK_RATE;
use crate::entities::{
    ColorPair, GameState, GameStatus, MovementPolicy, Pickup, PowerUpKind, Rect, TimedEffect,
    WaveKind, INFINITE,
};

bitflags! {
    /// Type-specific visual state.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SpriteFlags: u16 {
        const SHIELD         = 1 << 0;
        const PENETRATING    = 1 << 1;
        const DOUBLE_SHOOT   = 1 << 2;
        const RESPAWN_GRACE  = 1 << 3;
        const CORE_EXPOSED   = 1 << 4;
        const COLLECTED      = 1 << 5;
        const DETACHED       = 1 << 6;
        const AIMED          = 1 << 7;
        const DESTROYED      = 1 << 8;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteTag {
    Player,
    Bullet,
    EnemyBullet,
    Enemy,
    FlockEnemy,
    SpecialEnemy,
    Boss,
    BossPart,
    BossCore,
    PowerUp(PowerUpKind),
    ExtraLife,
    Explosion,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub tag: SpriteTag,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub flags: SpriteFlags,
    pub colors: Option<ColorPair>,
}

impl Sprite {
    fn from_rect(tag: SpriteTag, rect: Rect) -> Self {
        Sprite {
            tag,
            x: rect.x,
            y: rect.y,
            width: rect.w,
            height: rect.h,
            flags: SpriteFlags::empty(),
            colors: None,
        }
    }

    fn with_flags(mut self, flags: SpriteFlags) -> Self {
        self.flags |= flags;
        self
    }

    fn with_colors(mut self, colors: ColorPair) -> Self {
        self.colors = Some(colors);
        self
    }
}

/// HUD scalars.  Power-up counters are remaining ticks, 0 when inactive.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub wave: u32,
    pub wave_kind: WaveKind,
    pub lives: u32,
    pub health_pct: f32,
    pub power_pct: f32,
    pub double_shoot: u32,
    pub penetrating: u32,
    pub shield: u32,
    pub god_mode: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderSnapshot {
    pub status: GameStatus,
    pub paused: bool,
    pub banner: Option<String>,
    /// Back to front: explosions and pickups first, player last.
    pub sprites: Vec<Sprite>,
    pub hud: Hud,
}

fn remaining(effect: &TimedEffect) -> u32 {
    if effect.active {
        effect.remaining
    } else {
        0
    }
}

/// `NNs` countdown for a power-up timer, `∞` for one that never runs out.
pub fn format_remaining(ticks: u32) -> String {
    if ticks == INFINITE {
        "∞".to_string()
    } else {
        format!("{:02}s", ticks / TICK_RATE)
    }
}

pub fn snapshot(state: &GameState) -> RenderSnapshot {
    let mut sprites = Vec::new();

    for explosion in &state.explosions {
        let r = explosion.radius;
        sprites.push(Sprite::from_rect(
            SpriteTag::Explosion,
            Rect::new(explosion.x - r, explosion.y - r, 2.0 * r, 2.0 * r),
        ));
    }

    for pickup in &state.pickups {
        match pickup {
            Pickup::PowerUp(p) => {
                sprites.push(Sprite::from_rect(SpriteTag::PowerUp(p.kind), p.rect()));
            }
            Pickup::ExtraLife(life) => {
                let mut rect = life.rect();
                rect.y = life.display_y();
                let mut sprite = Sprite::from_rect(SpriteTag::ExtraLife, rect);
                if life.collected {
                    sprite = sprite.with_flags(SpriteFlags::COLLECTED);
                }
                sprites.push(sprite);
            }
        }
    }

    for enemy in &state.enemies {
        sprites.push(Sprite::from_rect(SpriteTag::Enemy, enemy.rect()).with_colors(enemy.colors));
    }

    if let Some(bonus) = &state.bonus {
        let members = bonus.flocks.iter().flat_map(|f| f.members.iter());
        for enemy in members.chain(bonus.detached.iter()) {
            let mut sprite =
                Sprite::from_rect(SpriteTag::FlockEnemy, enemy.rect()).with_colors(enemy.colors);
            if let MovementPolicy::FlockDetached { .. } = enemy.policy {
                sprite = sprite.with_flags(SpriteFlags::DETACHED);
            }
            sprites.push(sprite);
        }
        for bullet in &bonus.bullets {
            sprites.push(
                Sprite::from_rect(SpriteTag::EnemyBullet, bullet.rect())
                    .with_flags(SpriteFlags::AIMED),
            );
        }
    }

    if let Some(special) = &state.special_enemy {
        sprites.push(Sprite::from_rect(SpriteTag::SpecialEnemy, special.rect()));
    }

    for boss in &state.bosses {
        let exposed = if boss.core_exposed() {
            SpriteFlags::CORE_EXPOSED
        } else {
            SpriteFlags::empty()
        };
        sprites.push(Sprite::from_rect(SpriteTag::Boss, boss.rect()).with_flags(exposed));
        for (index, part) in boss.parts.iter().enumerate() {
            let mut sprite = Sprite::from_rect(SpriteTag::BossPart, boss.part_rect(index));
            if part.health == 0 {
                sprite = sprite.with_flags(SpriteFlags::DESTROYED);
            }
            sprites.push(sprite);
        }
        sprites.push(Sprite::from_rect(SpriteTag::BossCore, boss.core_rect()).with_flags(exposed));
    }

    for bullet in &state.enemy_bullets {
        let mut sprite = Sprite::from_rect(SpriteTag::EnemyBullet, bullet.rect());
        if bullet.vx != 0.0 {
            sprite = sprite.with_flags(SpriteFlags::AIMED);
        }
        sprites.push(sprite);
    }

    for bullet in &state.bullets {
        let mut sprite = Sprite::from_rect(SpriteTag::Bullet, bullet.rect());
        if bullet.penetrating {
            sprite = sprite.with_flags(SpriteFlags::PENETRATING);
        }
        sprites.push(sprite);
    }

    let player = &state.player;
    let mut flags = SpriteFlags::empty();
    flags.set(SpriteFlags::SHIELD, player.shield.active);
    flags.set(SpriteFlags::PENETRATING, player.penetrating.active);
    flags.set(SpriteFlags::DOUBLE_SHOOT, player.double_shoot.active);
    flags.set(SpriteFlags::RESPAWN_GRACE, player.respawn_grace > 0);
    sprites.push(Sprite::from_rect(SpriteTag::Player, player.rect()).with_flags(flags));

    RenderSnapshot {
        status: state.status,
        paused: state.paused,
        banner: state.banner.as_ref().map(|b| b.text.clone()),
        sprites,
        hud: Hud {
            score: state.score,
            wave: state.wave,
            wave_kind: state.wave_kind,
            lives: player.lives,
            health_pct: 100.0 * player.health / player.max_health,
            power_pct: 100.0 * player.power / player.max_power,
            double_shoot: remaining(&player.double_shoot),
            penetrating: remaining(&player.penetrating),
            shield: remaining(&player.shield),
            god_mode: state.god_mode,
        },
    }
}
