use {
    crate::applicator::try_apply,
    ability_system::AbilityHosts,
    bevy::prelude::*,
    effect_actor_components::{
        ActiveEffectRegistry, EffectActor, EffectApplicationPolicy, EffectCategory,
        EffectRemovalPolicy,
    },
    effect_actor_events::{ApplyEffectToTarget, OverlapBegan, OverlapEnded},
};

/// Applies every descriptor of `category` whose application policy is `policy`.
fn apply_with_policy(
    hosts: &mut AbilityHosts,
    registry: &mut ActiveEffectRegistry,
    source: Entity,
    actor: &EffectActor,
    target: Entity,
    category: EffectCategory,
    policy: EffectApplicationPolicy,
) {
    for descriptor in actor
        .effects(category)
        .iter()
        .filter(|descriptor| descriptor.application_policy == policy)
    {
        try_apply(hosts, registry, source, target, descriptor, actor.actor_level);
    }
}

pub fn on_overlap_began(
    trigger: On<OverlapBegan>,
    mut actors: Query<(&EffectActor, &mut ActiveEffectRegistry)>,
    mut hosts: AbilityHosts,
) {
    let event = trigger.event();
    let Ok((actor, mut registry)) = actors.get_mut(event.entity) else {
        return;
    };
    trace!(effect_actor = ?event.entity, target = ?event.other, "overlap began");

    for category in EffectCategory::ALL {
        apply_with_policy(
            &mut hosts,
            &mut registry,
            event.entity,
            actor,
            event.other,
            category,
            EffectApplicationPolicy::ApplyOnOverlapBegin,
        );
    }
}

/// Applies end-of-overlap effects, then removes every tracked effect held by
/// the target's ability system if any infinite descriptor asks for removal.
/// Removal covers all tracked handles of that ability system, not only the
/// ones the removing descriptor applied.
pub fn on_overlap_ended(
    trigger: On<OverlapEnded>,
    mut actors: Query<(&EffectActor, &mut ActiveEffectRegistry)>,
    mut hosts: AbilityHosts,
) {
    let event = trigger.event();
    let (source, target) = (event.entity, event.other);
    let Ok((actor, mut registry)) = actors.get_mut(source) else {
        return;
    };
    trace!(effect_actor = ?source, ?target, "overlap ended");

    for category in [EffectCategory::Instant, EffectCategory::Duration] {
        apply_with_policy(
            &mut hosts,
            &mut registry,
            source,
            actor,
            target,
            category,
            EffectApplicationPolicy::ApplyOnOverlapEnd,
        );
    }

    let Some(ability_system) = hosts.resolve(target) else {
        return;
    };

    let mut handles_to_remove = Vec::new();
    for descriptor in actor.effects(EffectCategory::Infinite) {
        if descriptor.application_policy == EffectApplicationPolicy::ApplyOnOverlapEnd {
            try_apply(
                &mut hosts,
                &mut registry,
                source,
                target,
                descriptor,
                actor.actor_level,
            );
        }

        if descriptor.removal_policy == EffectRemovalPolicy::RemoveOnOverlapEnd {
            for handle in registry.handles_for(ability_system) {
                // Each tracked effect gets a single removal request
                if handles_to_remove.contains(&handle) {
                    continue;
                }
                hosts.remove_active_effect(ability_system, handle, 1);
                handles_to_remove.push(handle);
            }
        }
    }

    if handles_to_remove.is_empty() {
        return;
    }

    for handle in &handles_to_remove {
        registry.untrack(*handle);
    }
    debug!(
        effect_actor = ?source,
        ?ability_system,
        removed = handles_to_remove.len(),
        "removed infinite effects"
    );

    if actor.destroy_on_effect_removal {
        debug!(effect_actor = ?source, "destroying effect actor after removal");
        hosts.commands().entity(source).despawn();
    }
}

pub fn on_apply_effect_request(
    trigger: On<ApplyEffectToTarget>,
    mut actors: Query<(&EffectActor, &mut ActiveEffectRegistry)>,
    mut hosts: AbilityHosts,
) {
    let event = trigger.event();
    let Ok((actor, mut registry)) = actors.get_mut(event.entity) else {
        return;
    };

    try_apply(
        &mut hosts,
        &mut registry,
        event.entity,
        event.target,
        &event.descriptor,
        actor.actor_level,
    );
}
