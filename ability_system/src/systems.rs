use {
    ability_components::{
        AbilitySystem, AbilitySystemLink, Attribute, AttributeSet, ListenerChannel, Listeners,
        ReportedAttributes,
    },
    ability_events::{AbilityActorInfoSet, AttributeChanged, EffectAppliedToSelf, EffectAssetTags},
    bevy::prelude::*,
};

/// A freshly added ability system owns and drives itself until told otherwise.
pub fn on_ability_system_added(trigger: On<Add, AbilitySystem>, mut commands: Commands) {
    let entity = trigger.event().entity;
    commands.trigger(AbilityActorInfoSet {
        entity,
        owner_actor: entity,
        avatar_actor: entity,
    });
}

/// An actor linking to another entity's ability system becomes its avatar.
pub fn on_ability_system_link_added(
    trigger: On<Add, AbilitySystemLink>,
    links: Query<&AbilitySystemLink>,
    mut commands: Commands,
) {
    let avatar_actor = trigger.event().entity;
    let Ok(link) = links.get(avatar_actor) else {
        return;
    };

    commands.trigger(AbilityActorInfoSet {
        entity: link.0,
        owner_actor: link.0,
        avatar_actor,
    });
}

/// Records owner and avatar, and binds the "effect applied" listener once.
pub fn on_ability_actor_info_set(
    trigger: On<AbilityActorInfoSet>,
    mut systems: Query<&mut AbilitySystem>,
    mut commands: Commands,
) {
    let event = trigger.event();
    let Ok(mut asc) = systems.get_mut(event.entity) else {
        debug!(target = ?event.entity, "actor info set on entity without ability system");
        return;
    };

    asc.owner_actor = Some(event.owner_actor);
    asc.avatar_actor = Some(event.avatar_actor);

    if !asc.effect_applied_bound {
        commands
            .entity(event.entity)
            .observe(broadcast_effect_asset_tags);
        asc.effect_applied_bound = true;
        debug!(ability_system = ?event.entity, "bound effect applied listener");
    }
}

/// Bound to a single ability system: hands the asset tags of every effect
/// applied to it to the `EffectAssetTags` listeners.
pub fn broadcast_effect_asset_tags(
    trigger: On<EffectAppliedToSelf>,
    listeners: Query<&Listeners>,
    mut commands: Commands,
) {
    let event = trigger.event();
    let Ok(listeners) = listeners.get(event.entity) else {
        return;
    };

    for listener in listeners.subscribers(ListenerChannel::EffectAssetTags) {
        commands.trigger(EffectAssetTags {
            entity: *listener,
            ability_system: event.entity,
            tags: event.asset_tags.clone(),
        });
    }
}

/// Ticks duration and period timers of active effects.
pub fn tick_active_effects(
    time: Res<Time>,
    mut systems: Query<(&mut AbilitySystem, &mut AttributeSet)>,
) {
    let delta = time.delta();
    for (mut asc, mut attributes) in &mut systems {
        if asc.active_effects().is_empty() {
            continue;
        }

        if asc.tick(attributes.bypass_change_detection(), delta) {
            attributes.set_changed();
        }
    }
}

/// Sends every attribute whose current value moved since the last report
/// to the `AttributeChanged` listeners.
pub fn broadcast_attribute_changes(
    mut commands: Commands,
    mut hosts: Query<
        (Entity, &AttributeSet, &Listeners, &mut ReportedAttributes),
        Changed<AttributeSet>,
    >,
) {
    for (entity, attributes, listeners, mut reported) in &mut hosts {
        for attribute in Attribute::ALL {
            let value = attributes.current(attribute);
            if reported.0.get(&attribute) == Some(&value) {
                continue;
            }
            reported.0.insert(attribute, value);

            for listener in listeners.subscribers(ListenerChannel::AttributeChanged) {
                commands.trigger(AttributeChanged {
                    entity: *listener,
                    ability_system: entity,
                    attribute,
                    value,
                });
            }
        }
    }
}
