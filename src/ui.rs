//! Text shown around the play field
//!
//! Pure projections of game state; the host decides where they go.

use crate::game::GameOverSummary;
use crate::sim::progression::UpgradeOption;
use crate::sim::state::World;

/// Running status: time, wave, level and experience
pub fn status_line(world: &World) -> String {
    format!(
        "Time: {}s | Wave: {} | Level: {} | EXP: {}/{}",
        world.survived_seconds(),
        world.current_wave,
        world.player.level,
        world.player.exp,
        world.player.exp_to_level_up
    )
}

pub fn high_score_line(best_seconds: u64) -> String {
    format!("High Score: {}s", best_seconds)
}

/// Lines of the game-over panel
pub fn game_over_lines(summary: &GameOverSummary) -> Vec<String> {
    let mut lines = vec![
        format!("Survived: {}s", summary.seconds),
        format!("Wave reached: {}", summary.wave),
        format!("Final level: {}", summary.level),
    ];
    if summary.new_high_score {
        lines.push("New high score!".to_string());
    }
    lines
}

/// Element the upgrade buttons are rendered into
pub const UPGRADE_OPTIONS_ID: &str = "upgradeOptions";
/// Attribute carrying an upgrade button's slot
pub const SLOT_ATTR: &str = "data-slot";

/// Value of `SLOT_ATTR` for the button in `slot`
pub fn slot_attr_value(slot: usize) -> String {
    slot.to_string()
}

/// Slot of a clicked upgrade button, from its `SLOT_ATTR` value
pub fn slot_from_attr(value: &str) -> Option<usize> {
    value.trim().parse().ok()
}

/// Button label for the upgrade in `slot` (numbered from 1)
pub fn upgrade_label(slot: usize, option: &UpgradeOption) -> String {
    format!("{}. {} ({})", slot + 1, option.name(), option.description())
}
