//! Experience, leveling and upgrade offers

use rand::Rng;

use super::state::{Color, EnemyKind, ExpOrb, GameEvent, Player, World};
use super::weapon::{Weapon, WeaponKind};
use crate::consts::*;
use crate::direction_to;

/// Number of offers shown per level-up
pub const UPGRADE_CHOICES: usize = 3;
/// Size of orbs dropped by enemies
pub const DROP_ORB_SIZE: f32 = 5.0;
/// Passive boost amounts
pub const MOVE_SPEED_STEP: f32 = 0.1;
pub const EXP_RANGE_STEP: f32 = 20.0;

/// A permanent buff offered on level-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeOption {
    /// Level up an owned weapon
    UpgradeWeapon(WeaponKind),
    /// Acquire a weapon not yet owned
    NewWeapon(WeaponKind),
    MoveSpeed,
    ExpRange,
}

impl UpgradeOption {
    pub fn apply(&self, player: &mut Player) {
        match *self {
            UpgradeOption::UpgradeWeapon(kind) => {
                if let Some(weapon) = player.weapon_mut(kind) {
                    weapon.upgrade();
                }
            }
            UpgradeOption::NewWeapon(kind) => {
                if !player.has_weapon(kind) {
                    player.weapons.push(Weapon::new(kind));
                }
            }
            UpgradeOption::MoveSpeed => player.move_speed_bonus += MOVE_SPEED_STEP,
            UpgradeOption::ExpRange => player.exp_range_bonus += EXP_RANGE_STEP,
        }
    }

    pub fn name(&self) -> String {
        match self {
            UpgradeOption::UpgradeWeapon(kind) => format!("{} Level Up", kind.name()),
            UpgradeOption::NewWeapon(kind) => format!("New Weapon: {}", kind.name()),
            UpgradeOption::MoveSpeed => "Move Speed Up".to_string(),
            UpgradeOption::ExpRange => "Pickup Range Up".to_string(),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UpgradeOption::UpgradeWeapon(_) => "Shorter fire interval and more damage",
            UpgradeOption::NewWeapon(WeaponKind::FrontalShot) => {
                "Fires 3 strong shots in the direction you face"
            }
            UpgradeOption::NewWeapon(WeaponKind::PiercingShot) => {
                "Fires a heavy shot that passes through enemies"
            }
            UpgradeOption::NewWeapon(WeaponKind::AreaBlast) => {
                "Blasts every enemy around you"
            }
            UpgradeOption::NewWeapon(WeaponKind::EightWayShot) => "Fires in all 8 directions",
            UpgradeOption::MoveSpeed => "Move 10% faster",
            UpgradeOption::ExpRange => "Experience orbs are pulled in from further away",
        }
    }
}

/// Every upgrade the player is currently eligible for
pub fn candidate_upgrades(player: &Player) -> Vec<UpgradeOption> {
    let mut pool: Vec<UpgradeOption> = player
        .weapons
        .iter()
        .map(|w| UpgradeOption::UpgradeWeapon(w.kind))
        .collect();

    for kind in [
        WeaponKind::FrontalShot,
        WeaponKind::PiercingShot,
        WeaponKind::AreaBlast,
    ] {
        if !player.has_weapon(kind) && player.level >= kind.unlock_level() {
            pool.push(UpgradeOption::NewWeapon(kind));
        }
    }

    pool.push(UpgradeOption::MoveSpeed);
    pool.push(UpgradeOption::ExpRange);
    pool
}

/// Draw up to `UPGRADE_CHOICES` offers uniformly without replacement
pub fn roll_upgrade_choices<R: Rng>(player: &Player, rng: &mut R) -> Vec<UpgradeOption> {
    draw_without_replacement(candidate_upgrades(player), UPGRADE_CHOICES, rng)
}

fn draw_without_replacement<T, R: Rng>(mut pool: Vec<T>, count: usize, rng: &mut R) -> Vec<T> {
    let mut chosen = Vec::with_capacity(count.min(pool.len()));
    while chosen.len() < count && !pool.is_empty() {
        let index = rng.random_range(0..pool.len());
        chosen.push(pool.remove(index));
    }
    chosen
}

/// Remove dead enemies, dropping orbs and death sparks
pub fn remove_defeated_enemies(world: &mut World) {
    let (dead, alive): (Vec<_>, Vec<_>) = world.enemies.drain(..).partition(|e| e.hp <= 0);
    world.enemies = alive;

    for enemy in dead {
        for _ in 0..5 {
            world.spawn_particle(enemy.pos, enemy.color, 5.0);
        }
        world
            .exp_orbs
            .push(ExpOrb::new(enemy.pos, DROP_ORB_SIZE, enemy.exp));
        world.events.push(GameEvent::EnemyKilled { kind: enemy.kind });
        if enemy.kind == EnemyKind::Tank {
            world.events.push(GameEvent::ScreenShake);
        }
    }
}

/// Pull nearby orbs toward the player and collect the ones in reach
///
/// Pickup distance is measured before this tick's pull.
pub fn update_orbs(world: &mut World) {
    let player_pos = world.player.pos;
    let range = world.player.attraction_range();
    let mut pickups = Vec::new();

    for orb in &mut world.exp_orbs {
        let dist = orb.pos.distance(player_pos);
        if dist < range {
            if let Some(dir) = direction_to(orb.pos, player_pos) {
                orb.pos += dir * ORB_ATTRACTION_SPEED;
            }
        }
        if dist < ORB_PICKUP_RADIUS {
            orb.collected = true;
            pickups.push((orb.pos, orb.value));
        }
    }

    for (pos, value) in pickups {
        world.player.exp += value;
        world.spawn_particle(pos, Color::Cyan, 3.0);
        world.events.push(GameEvent::OrbCollected { value });
    }
    world.exp_orbs.retain(|o| !o.collected);
}

/// Level up once if the threshold is reached and halt for an upgrade choice
///
/// Excess experience is discarded, so one crossing yields one level.
pub fn check_level_up(world: &mut World) -> bool {
    let player = &mut world.player;
    if player.exp < player.exp_to_level_up {
        return false;
    }
    player.level += 1;
    player.exp = 0;
    player.exp_to_level_up += EXP_THRESHOLD_STEP;
    let level = player.level;

    world.upgrade_choices = roll_upgrade_choices(&world.player, &mut world.rng);
    world.paused = true;
    world.events.push(GameEvent::LevelUp { level });
    log::info!(
        "Level {} reached, offering {:?}",
        level,
        world.upgrade_choices
    );
    true
}

/// Apply the offer at `index` and resume; false if there is no such offer
pub fn apply_upgrade_choice(world: &mut World, index: usize) -> bool {
    if !world.paused {
        return false;
    }
    let Some(option) = world.upgrade_choices.get(index).copied() else {
        return false;
    };
    option.apply(&mut world.player);
    log::debug!("Applied upgrade {:?}", option);
    world.upgrade_choices.clear();
    world.paused = false;
    true
}
