mod hosts;
pub mod systems;

#[cfg(test)]
mod tests;

pub use hosts::*;

use {
    ability_components::{AbilitySystem, AbilitySystemLink, AttributeSet},
    ability_events::AbilityEventsPlugin,
    bevy::prelude::*,
    effects_assets::EffectsAssetsPlugin,
    system_schedule::GameSchedule,
};

pub struct AbilitySystemPlugin;

impl Plugin for AbilitySystemPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((EffectsAssetsPlugin, AbilityEventsPlugin))
            .register_type::<AbilitySystem>()
            .register_type::<AbilitySystemLink>()
            .register_type::<AttributeSet>()
            .add_systems(
                Update,
                (
                    systems::tick_active_effects.in_set(GameSchedule::Effect),
                    systems::broadcast_attribute_changes.in_set(GameSchedule::Broadcast),
                ),
            )
            .add_observer(systems::on_ability_system_added)
            .add_observer(systems::on_ability_system_link_added)
            .add_observer(systems::on_ability_actor_info_set);
    }
}
