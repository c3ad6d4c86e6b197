//! ECS components and the entity model.
//!
//! `Combatant` is the stat/state container shared by the player, enemies and
//! the boss; controller components (`PlayerControlled`, `EnemyAi`,
//! `BossState`) decide how an entity acts on top of it. Ability effects are
//! never applied at invocation time: `use_*` validates state and cooldown,
//! stamps the cooldown, and parks a single `PendingCast` that the tick loop
//! fires exactly once when the cast window elapses.

use glam::Vec2;
use hecs::Entity;

use crate::config::CastDeathPolicy;
use crate::constants::*;
use crate::geometry::Rect;

/// Closed set of allegiances. Target filtering never compares strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Team {
    Player,
    Enemy,
    Neutral,
}

/// Which targets an attack may damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFilter {
    /// Hits anything not on the given team (player-cast attacks).
    EnemiesOf(Team),
    /// Hits only the player team (enemy- and boss-cast attacks).
    PlayersOnly,
}

impl TargetFilter {
    /// The filter an attack cast by `caster_team` should carry.
    pub fn hostile_to(caster_team: Team) -> Self {
        match caster_team {
            Team::Player => TargetFilter::EnemiesOf(Team::Player),
            _ => TargetFilter::PlayersOnly,
        }
    }

    pub fn matches(&self, target_team: Team) -> bool {
        match self {
            TargetFilter::EnemiesOf(team) => target_team != *team,
            TargetFilter::PlayersOnly => target_team == Team::Player,
        }
    }
}

/// Mutually exclusive lifecycle states. `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum LifecycleState {
    Idle,
    Moving,
    Casting,
    Dead,
}

/// The three ability slots every combatant carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbilityKind {
    Area,
    Projectile,
    Buff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuffKind {
    Speed,
    Damage,
}

/// A timed stat bonus. Expires when `now - applied_at >= duration`.
#[derive(Debug, Clone, Copy)]
pub struct ActiveBuff {
    pub kind: BuffKind,
    pub magnitude: f32,
    pub applied_at: f32,
    pub duration: f32,
}

/// Additive ability bonuses accumulated from collected items. The economy
/// producing them is external; the core only applies them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Amplifiers {
    pub area: i32,
    pub projectile: i32,
}

/// World-space footprint: top-left position and square edge length.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub pos: Vec2,
    pub size: f32,
}

impl Body {
    pub fn new(pos: Vec2, size: f32) -> Self {
        Self { pos, size }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.pos = center - Vec2::splat(self.size / 2.0);
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }
}

/// An ephemeral area attack. Damage is applied once, when the cast that
/// produced it completes; the visual lifetime runs from that moment, so the
/// ring outlives the hit. Before `active_from` the object renders as a
/// telegraph of the incoming cast.
#[derive(Debug, Clone, Copy)]
pub struct AreaAttack {
    pub caster: Entity,
    pub center: Vec2,
    /// Base radius plus the caster's area amplifier.
    pub radius: f32,
    /// Raw damage, sampled at cast start so the attack survives its caster.
    pub damage: f32,
    pub attacker: AttackerInfo,
    pub filter: TargetFilter,
    /// Cast resolution time; damage lands and the lifetime starts here.
    pub active_from: f32,
    pub lifetime: f32,
}

impl AreaAttack {
    pub fn is_expired(&self, now: f32) -> bool {
        now - self.active_from > self.lifetime
    }

    /// Cosmetic inner radius growing toward the outer radius over the visual
    /// lifetime. Zero until the cast resolves. No gameplay effect.
    pub fn inner_radius(&self, now: f32) -> f32 {
        let t = ((now - self.active_from) / self.lifetime).clamp(0.0, 1.0);
        self.radius * t
    }
}

/// An ephemeral moving attack. Advances by `dir * speed` per tick and
/// deactivates on its first wall or valid-target collision.
#[derive(Debug, Clone, Copy)]
pub struct Projectile {
    pub caster: Entity,
    pub caster_team: Team,
    pub pos: Vec2,
    pub dir: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub damage: f32,
    pub attacker: AttackerInfo,
    pub active: bool,
}

/// The effect half of a pending cast, executed by the tick loop.
#[derive(Debug, Clone)]
pub enum CastEffect {
    Area(AreaAttack),
    /// The projectile itself is already staged in the caster's
    /// `pending_projectile` slot; firing this arms it for launch.
    Projectile,
    Buff {
        speed: f32,
        damage: f32,
        duration: f32,
    },
}

/// A combatant's single outstanding deferred action. This is a slot, not a
/// queue: the state check in `start_cast` guarantees at most one exists.
#[derive(Debug, Clone)]
pub struct PendingCast {
    pub trigger_time: f32,
    pub effect: CastEffect,
}

/// Snapshot of the attacker-side damage inputs, taken before mutating the
/// target so the borrow of the attacker can end first.
#[derive(Debug, Clone, Copy)]
pub struct AttackerInfo {
    pub flat_damage: f32,
    pub damage_buff: f32,
}

/// Stat/state container for any combatant (player, enemy, boss).
#[derive(Debug, Clone)]
pub struct Combatant {
    pub team: Team,
    pub state: LifecycleState,

    pub health: f32,
    pub max_health: f32,
    pub attack: f32,
    pub defense: f32,
    pub speed: f32,
    /// Flat bonus this entity adds to damage it deals.
    pub flat_damage: f32,

    pub amplifiers: Amplifiers,
    pub buff_max_duration: f32,
    pub active_buffs: Vec<ActiveBuff>,

    pending_cast: Option<PendingCast>,
    pending_projectile: Option<Projectile>,
    /// Set when a projectile cast completes; cleared by `take_projectile`.
    projectile_armed: bool,

    pub area_last_used: f32,
    pub projectile_last_used: f32,
    pub buff_last_used: f32,

    // Per-ability tunables; phase escalation mutates these on the boss.
    pub area_radius: f32,
    pub area_multiplier: f32,
    pub area_cast_time: f32,
    pub area_cooldown: f32,
    pub projectile_radius: f32,
    pub projectile_speed: f32,
    pub projectile_multiplier: f32,
    pub projectile_cast_time: f32,
    pub projectile_cooldown: f32,
    pub buff_cast_time: f32,
    pub buff_cooldown: f32,

    pub invincible: bool,
    pub invincible_start: f32,
}

impl Combatant {
    /// Build a combatant with full health and default ability tunables.
    pub fn new(team: Team, health: f32, attack: f32, defense: f32, speed: f32) -> Self {
        Self {
            team,
            state: LifecycleState::Idle,
            health,
            max_health: health,
            attack,
            defense,
            speed,
            flat_damage: 1.0,
            amplifiers: Amplifiers::default(),
            buff_max_duration: BUFF_BASE_DURATION,
            active_buffs: Vec::new(),
            pending_cast: None,
            pending_projectile: None,
            projectile_armed: false,
            area_last_used: f32::NEG_INFINITY,
            projectile_last_used: f32::NEG_INFINITY,
            buff_last_used: f32::NEG_INFINITY,
            area_radius: AOE_BASE_RADIUS,
            area_multiplier: AOE_MULTIPLIER,
            area_cast_time: AOE_CAST_TIME,
            area_cooldown: AOE_COOLDOWN,
            projectile_radius: PROJECTILE_RADIUS,
            projectile_speed: PROJECTILE_SPEED,
            projectile_multiplier: PROJECTILE_MULTIPLIER,
            projectile_cast_time: PROJECTILE_CAST_TIME,
            projectile_cooldown: PROJECTILE_COOLDOWN,
            buff_cast_time: BUFF_CAST_TIME,
            buff_cooldown: BUFF_COOLDOWN,
            invincible: false,
            invincible_start: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state != LifecycleState::Dead
    }

    /// Current speed-buff magnitude (0.0 when none is active).
    pub fn speed_bonus(&self) -> f32 {
        self.buff_magnitude(BuffKind::Speed)
    }

    /// Current damage-buff magnitude (0.0 when none is active).
    pub fn damage_bonus(&self) -> f32 {
        self.buff_magnitude(BuffKind::Damage)
    }

    fn buff_magnitude(&self, kind: BuffKind) -> f32 {
        self.active_buffs
            .iter()
            .find(|b| b.kind == kind)
            .map_or(0.0, |b| b.magnitude)
    }

    /// Snapshot of this entity's attacker-side damage inputs.
    pub fn attacker_info(&self) -> AttackerInfo {
        AttackerInfo {
            flat_damage: self.flat_damage,
            damage_buff: self.damage_bonus(),
        }
    }

    /// Move in `direction` (components in {-1, 0, 1} or a pre-normalized
    /// vector). No-op while casting or dead. Diagonal input is normalized to
    /// unit length before scaling by speed, so diagonals are not faster.
    pub fn move_dir(&mut self, body: &mut Body, direction: Vec2) {
        if matches!(self.state, LifecycleState::Casting | LifecycleState::Dead) {
            return;
        }

        let mut dir = direction;
        if dir.x != 0.0 && dir.y != 0.0 {
            dir = dir.normalize();
        }

        let total_speed = self.speed + self.speed_bonus();
        body.pos += dir * total_speed;

        if dir != Vec2::ZERO {
            self.state = LifecycleState::Moving;
        }
    }

    /// Apply incoming damage. No-op while invincible or dead.
    ///
    /// The raw amount is attenuated by `amount / (defense + amount)`, a
    /// diminishing-returns curve approaching the full amount as attack
    /// dwarfs defense. Flat bonuses are then added unconditionally. Lethal
    /// damage transitions to `Dead` immediately and permanently; otherwise a
    /// short invincibility window opens.
    pub fn take_damage(&mut self, amount: f32, attacker: &AttackerInfo, now: f32) {
        if self.invincible || self.state == LifecycleState::Dead {
            return;
        }

        let total_flat = attacker.flat_damage + attacker.damage_buff + GLOBAL_FLAT_DAMAGE;
        let damage_taken = amount * (amount / (self.defense + amount)) + total_flat;
        self.health -= damage_taken;

        if self.health <= 0.0 {
            self.die();
            return;
        }

        self.invincible = true;
        self.invincible_start = now;
    }

    /// Terminal transition to `Dead`. Never reversed.
    pub fn die(&mut self) {
        self.state = LifecycleState::Dead;
        self.health = 0.0;
    }

    /// Hit-feedback signal: blinks while invincible, solid otherwise.
    pub fn is_visible(&self, now: f32) -> bool {
        if !self.invincible {
            return true;
        }
        ((now - self.invincible_start) / INVINCIBILITY_BLINK_INTERVAL) as i32 % 2 == 0
    }

    pub fn can_use_area(&self, now: f32) -> bool {
        now - self.area_last_used >= self.area_cooldown
    }

    pub fn can_use_projectile(&self, now: f32) -> bool {
        now - self.projectile_last_used >= self.projectile_cooldown
    }

    pub fn can_use_buff(&self, now: f32) -> bool {
        now - self.buff_last_used >= self.buff_cooldown
    }

    /// Seconds until the ability is usable again (0.0 when ready). For HUD
    /// cooldown rings.
    pub fn cooldown_remaining(&self, kind: AbilityKind, now: f32) -> f32 {
        let (last, cooldown) = match kind {
            AbilityKind::Area => (self.area_last_used, self.area_cooldown),
            AbilityKind::Projectile => (self.projectile_last_used, self.projectile_cooldown),
            AbilityKind::Buff => (self.buff_last_used, self.buff_cooldown),
        };
        (cooldown - (now - last)).max(0.0)
    }

    fn can_start_cast(&self) -> bool {
        matches!(self.state, LifecycleState::Idle | LifecycleState::Moving)
            && self.pending_cast.is_none()
    }

    /// Record a single pending cast and enter `Casting`. Callers must gate
    /// with `can_use_*`; a second cast while one is pending is a
    /// precondition violation, not a queue.
    pub fn start_cast(&mut self, duration: f32, effect: CastEffect, now: f32) {
        debug_assert!(self.can_start_cast(), "cast started while ineligible");
        self.state = LifecycleState::Casting;
        self.pending_cast = Some(PendingCast {
            trigger_time: now + duration,
            effect,
        });
    }

    /// Begin an area cast centered on `origin`. Returns the attack object
    /// immediately so it can be rendered during the cast window; its damage
    /// applies when the cast completes.
    pub fn use_area(&mut self, caster: Entity, origin: Vec2, now: f32) -> Option<AreaAttack> {
        if !self.can_start_cast() || !self.can_use_area(now) {
            return None;
        }

        let damage =
            self.attack * self.area_multiplier * (1.0 + self.amplifiers.area as f32 / 100.0);
        let area = AreaAttack {
            caster,
            center: origin,
            radius: self.area_radius + self.amplifiers.area as f32,
            damage,
            attacker: self.attacker_info(),
            filter: TargetFilter::hostile_to(self.team),
            active_from: now + self.area_cast_time,
            lifetime: AOE_LIFETIME,
        };
        self.area_last_used = now;
        self.start_cast(self.area_cast_time, CastEffect::Area(area), now);
        Some(area)
    }

    /// Begin a projectile cast aimed along `direction`. The projectile is
    /// staged in the single pending-projectile slot; it only goes live when
    /// the cast completes, after which `take_projectile` drains it.
    pub fn use_projectile(&mut self, caster: Entity, origin: Vec2, direction: Vec2, now: f32) -> bool {
        if !self.can_start_cast() || !self.can_use_projectile(now) {
            return false;
        }

        let damage = self.attack
            * self.projectile_multiplier
            * (1.0 + self.amplifiers.projectile as f32 / 100.0);
        self.pending_projectile = Some(Projectile {
            caster,
            caster_team: self.team,
            pos: origin,
            dir: direction.normalize_or_zero(),
            radius: self.projectile_radius,
            speed: self.projectile_speed,
            damage,
            attacker: self.attacker_info(),
            active: true,
        });
        self.projectile_armed = false;
        self.projectile_last_used = now;
        self.start_cast(self.projectile_cast_time, CastEffect::Projectile, now);
        true
    }

    /// Begin a self-buff cast. Speed and damage bonuses apply when the cast
    /// completes and last `buff_max_duration` seconds.
    pub fn use_buff(&mut self, now: f32) -> bool {
        if !self.can_start_cast() || !self.can_use_buff(now) {
            return false;
        }

        self.buff_last_used = now;
        self.start_cast(
            self.buff_cast_time,
            CastEffect::Buff {
                speed: BUFF_SPEED_BONUS,
                damage: BUFF_DAMAGE_BONUS,
                duration: self.buff_max_duration,
            },
            now,
        );
        true
    }

    /// Add or refresh a timed buff.
    pub fn apply_buff(&mut self, kind: BuffKind, magnitude: f32, duration: f32, now: f32) {
        if let Some(existing) = self.active_buffs.iter_mut().find(|b| b.kind == kind) {
            existing.magnitude = magnitude;
            existing.applied_at = now;
            existing.duration = duration;
        } else {
            self.active_buffs.push(ActiveBuff {
                kind,
                magnitude,
                applied_at: now,
                duration,
            });
        }
    }

    /// Apply a collected-item bonus to an ability.
    pub fn apply_amplifier(&mut self, kind: AbilityKind, value: i32) {
        match kind {
            AbilityKind::Area => self.amplifiers.area += value,
            AbilityKind::Projectile => self.amplifiers.projectile += value,
            AbilityKind::Buff => self.buff_max_duration += value as f32,
        }
    }

    /// True while a started cast has not yet fired or been cancelled.
    pub fn has_pending_cast(&self) -> bool {
        self.pending_cast.is_some()
    }

    /// Drain the launched projectile, if the cast producing it completed.
    pub fn take_projectile(&mut self) -> Option<Projectile> {
        if self.projectile_armed {
            self.projectile_armed = false;
            self.pending_projectile.take()
        } else {
            None
        }
    }

    /// Per-tick bookkeeping: expire buffs, fire a due cast (exactly once),
    /// clamp state, clear an elapsed invincibility window.
    ///
    /// Returns the fired effect for the caller to resolve against the world.
    pub fn tick(&mut self, now: f32, policy: CastDeathPolicy) -> Option<CastEffect> {
        self.active_buffs
            .retain(|b| now - b.applied_at < b.duration);

        if self.state == LifecycleState::Dead && policy == CastDeathPolicy::CancelOnDeath {
            self.pending_cast = None;
            self.pending_projectile = None;
            self.projectile_armed = false;
        }

        let mut fired = None;
        let due = self
            .pending_cast
            .as_ref()
            .is_some_and(|pc| now >= pc.trigger_time);
        let may_fire = self.state == LifecycleState::Casting
            || (self.state == LifecycleState::Dead && policy == CastDeathPolicy::FireAfterDeath);
        if due && may_fire {
            let pending = self.pending_cast.take();
            if let Some(pc) = pending {
                if matches!(pc.effect, CastEffect::Projectile) {
                    self.projectile_armed = true;
                }
                fired = Some(pc.effect);
            }
            if self.state == LifecycleState::Casting {
                self.state = LifecycleState::Idle;
            }
        }

        if !matches!(
            self.state,
            LifecycleState::Casting | LifecycleState::Moving | LifecycleState::Dead
        ) {
            self.state = LifecycleState::Idle;
        }

        if self.invincible && now - self.invincible_start >= INVINCIBILITY_DURATION {
            self.invincible = false;
        }

        fired
    }
}

/// Marker for the externally-driven player entity; intents arrive each tick
/// through the simulation API.
#[derive(Debug, Clone, Copy)]
pub struct PlayerControlled;

/// Melee enemies close to the 3x3 zone around the target; ranged enemies
/// hold a Chebyshev ring and need line of sight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Melee,
    Ranged,
}

/// Per-enemy AI decision state. Decisions and repathing run on independent
/// throttled cadences.
#[derive(Debug, Clone)]
pub struct EnemyAi {
    pub behavior: Behavior,
    pub last_decision_time: f32,
    pub decision_delay: f32,
    pub path: Vec<(i32, i32)>,
    pub path_index: usize,
    pub last_tile: Option<(i32, i32)>,
    pub current_tile: Option<(i32, i32)>,
    pub last_goal_tile: Option<(i32, i32)>,
    pub path_update_timer: f32,
    pub path_update_interval: f32,
}

impl EnemyAi {
    pub fn new(behavior: Behavior, decision_delay: f32) -> Self {
        Self {
            behavior,
            last_decision_time: 0.0,
            decision_delay,
            path: Vec::new(),
            path_index: 0,
            last_tile: None,
            current_tile: None,
            last_goal_tile: None,
            path_update_timer: 0.0,
            path_update_interval: PATH_UPDATE_INTERVAL,
        }
    }
}

/// Boss phase tracking. Both flags are one-way: once entered, a phase's
/// stat escalation is never undone, even if health were restored.
#[derive(Debug, Clone, Copy)]
pub struct BossState {
    pub phase: u8,
    pub phase2_entered: bool,
    pub phase3_entered: bool,
}

impl BossState {
    pub fn new() -> Self {
        Self {
            phase: 1,
            phase2_entered: false,
            phase3_entered: false,
        }
    }
}

impl Default for BossState {
    fn default() -> Self {
        Self::new()
    }
}
