//! Damage application, health clamping, and death checks.

use scavenger_core::{FOOD_HEAL, PLAYER_MAX_HEALTH};

use crate::actors::{Enemy, Player};

/// Applies damage to the player and clamps health into `[0, PLAYER_MAX_HEALTH]`.
/// Returns the clamped health.
pub(crate) fn damage_player(player: &mut Player, amount: i32) -> i32 {
    player.health = (player.health - amount).clamp(0, PLAYER_MAX_HEALTH);
    player.health
}

/// Restores the food heal amount, clamped to the health cap. Returns the
/// clamped health.
pub(crate) fn heal_player(player: &mut Player) -> i32 {
    player.health = (player.health + FOOD_HEAL).clamp(0, PLAYER_MAX_HEALTH);
    player.health
}

/// Applies damage to an enemy. Enemy health is deliberately unclamped and may
/// dip negative; death is the `< 1` check. Returns `true` when the enemy died.
pub(crate) fn damage_enemy(enemy: &mut Enemy, amount: i32) -> bool {
    enemy.health -= amount;
    enemy.health < 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use scavenger_core::{EnemyId, GridPos};

    #[test]
    fn player_damage_clamps_at_zero() {
        let mut player = Player::fresh();
        player.health = 10;
        assert_eq!(damage_player(&mut player, 15), 0);
        assert_eq!(player.health, 0);
    }

    #[test]
    fn player_heal_clamps_at_the_cap() {
        let mut player = Player::fresh();
        player.health = 95;
        assert_eq!(heal_player(&mut player), PLAYER_MAX_HEALTH);

        player.health = 40;
        assert_eq!(heal_player(&mut player), 40 + FOOD_HEAL);
    }

    #[test]
    fn enemy_health_goes_negative_before_death_check() {
        let mut enemy = Enemy::spawned(EnemyId::new(0), GridPos::new(3, 3), 1, 10);
        assert!(damage_enemy(&mut enemy, 5));
        assert_eq!(enemy.health, -4);
    }

    #[test]
    fn enemy_survives_at_one_health() {
        let mut enemy = Enemy::spawned(EnemyId::new(0), GridPos::new(3, 3), 3, 10);
        assert!(!damage_enemy(&mut enemy, 2));
        assert_eq!(enemy.health, 1);
    }
}
