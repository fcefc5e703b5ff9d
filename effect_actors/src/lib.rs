mod applicator;
pub mod overlap;
pub mod policy;


pub use applicator::{AppliedEffectResult, ApplyEffectError, apply_effect_to_target};

use {
    bevy::prelude::*,
    effect_actor_components::{EffectActor, OverlapBody, OverlapVolume, Overlapping},
    effect_actor_events::EffectActorEventsPlugin,
    system_schedule::GameSchedule,
};

pub struct EffectActorsPlugin;

impl Plugin for EffectActorsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EffectActorEventsPlugin)
            .register_type::<EffectActor>()
            .register_type::<OverlapVolume>()
            .register_type::<OverlapBody>()
            .register_type::<Overlapping>()
            .add_systems(
                Update,
                overlap::detect_overlaps.in_set(GameSchedule::Overlap),
            )
            .add_observer(policy::on_overlap_began)
            .add_observer(policy::on_overlap_ended)
            .add_observer(policy::on_apply_effect_request);
    }
}
