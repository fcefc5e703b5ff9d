use {bevy::prelude::*, effect_actor_components::EffectDescriptor};

pub struct EffectActorEventsPlugin;

impl Plugin for EffectActorEventsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<OverlapBegan>()
            .register_type::<OverlapEnded>()
            .register_type::<ApplyEffectToTarget>();
    }
}

/// `other` started overlapping the effect actor.
#[derive(EntityEvent, Debug, Clone, Copy, Reflect)]
pub struct OverlapBegan {
    /// The effect actor.
    pub entity: Entity,
    pub other: Entity,
}

/// `other` stopped overlapping the effect actor (moved away or was despawned).
#[derive(EntityEvent, Debug, Clone, Copy, Reflect)]
pub struct OverlapEnded {
    /// The effect actor.
    pub entity: Entity,
    pub other: Entity,
}

/// Asks an effect actor to apply a single descriptor to `target`,
/// outside of the overlap policies.
#[derive(EntityEvent, Debug, Clone, Reflect)]
pub struct ApplyEffectToTarget {
    /// The effect actor.
    pub entity: Entity,
    pub target: Entity,
    pub descriptor: EffectDescriptor,
}
