use {
    ability_components::{ActiveEffectHandle, Attribute, GameplayTagContainer},
    bevy::prelude::*,
};

pub struct AbilityEventsPlugin;

impl Plugin for AbilityEventsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<AbilityActorInfoSet>()
            .register_type::<EffectAppliedToSelf>()
            .register_type::<EffectAssetTags>()
            .register_type::<AttributeChanged>();
    }
}

/// Lifecycle hook fired on an ability system entity once its owner and
/// avatar are known. Safe to fire more than once.
#[derive(EntityEvent, Debug, Reflect)]
pub struct AbilityActorInfoSet {
    /// The ability system entity.
    pub entity: Entity,
    pub owner_actor: Entity,
    pub avatar_actor: Entity,
}

/// Fired on an ability system entity after a spec was applied to it.
#[derive(EntityEvent, Debug, Clone, Reflect)]
pub struct EffectAppliedToSelf {
    /// The ability system entity.
    pub entity: Entity,
    /// Invalid for instant effects.
    pub handle: ActiveEffectHandle,
    pub effect_id: String,
    pub source_object: Option<Entity>,
    pub asset_tags: GameplayTagContainer,
}

/// Asset tags of an applied effect, delivered to one listener.
#[derive(EntityEvent, Debug, Clone, Reflect)]
pub struct EffectAssetTags {
    /// The listener entity.
    pub entity: Entity,
    pub ability_system: Entity,
    pub tags: GameplayTagContainer,
}

/// New current value of an attribute, delivered to one listener.
#[derive(EntityEvent, Debug, Clone, Reflect)]
pub struct AttributeChanged {
    /// The listener entity.
    pub entity: Entity,
    pub ability_system: Entity,
    pub attribute: Attribute,
    pub value: f32,
}
