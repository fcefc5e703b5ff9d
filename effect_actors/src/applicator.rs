use {
    ability_components::{ActiveEffectHandle, EffectContext},
    ability_system::AbilityHosts,
    bevy::prelude::*,
    effect_actor_components::{ActiveEffectRegistry, EffectDescriptor, EffectRemovalPolicy},
    thiserror::Error,
};

/// Why an effect was not applied. Both cases are valid configurations
/// (an actor without abilities walking through, an empty slot) and never
/// leave the effect actor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyEffectError {
    #[error("target {0} has no ability system")]
    MissingHost(Entity),
    #[error("no effect definition loaded for {0:?}")]
    MissingDefinition(Option<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedEffectResult {
    /// Invalid when the effect was not stored (instant effects).
    pub handle: ActiveEffectHandle,
    pub ability_system: Entity,
    pub infinite: bool,
}

/// Applies `descriptor` to `target` on behalf of the effect actor `source`.
/// Infinite effects marked for removal on overlap end are recorded in `registry`.
pub fn apply_effect_to_target(
    hosts: &mut AbilityHosts,
    registry: &mut ActiveEffectRegistry,
    source: Entity,
    target: Entity,
    descriptor: &EffectDescriptor,
    level: f32,
) -> Result<AppliedEffectResult, ApplyEffectError> {
    let ability_system = hosts
        .resolve(target)
        .ok_or(ApplyEffectError::MissingHost(target))?;

    let spec = descriptor
        .effect_id
        .as_deref()
        .and_then(|effect_id| {
            hosts.make_outgoing_spec(
                effect_id,
                level,
                EffectContext::with_source_object(source),
            )
        })
        .ok_or_else(|| ApplyEffectError::MissingDefinition(descriptor.effect_id.clone()))?;

    let infinite = spec.duration.is_infinite();
    let handle = hosts
        .apply_spec_to_self(ability_system, spec)
        .ok_or(ApplyEffectError::MissingHost(target))?;

    if infinite
        && handle.is_valid()
        && descriptor.removal_policy == EffectRemovalPolicy::RemoveOnOverlapEnd
    {
        registry.track(handle, ability_system);
        trace!(effect_actor = ?source, ?ability_system, ?handle, "tracking infinite effect");
    }

    Ok(AppliedEffectResult {
        handle,
        ability_system,
        infinite,
    })
}

/// [`apply_effect_to_target`] for callers that only care that it was attempted.
pub(crate) fn try_apply(
    hosts: &mut AbilityHosts,
    registry: &mut ActiveEffectRegistry,
    source: Entity,
    target: Entity,
    descriptor: &EffectDescriptor,
    level: f32,
) {
    if let Err(error) = apply_effect_to_target(hosts, registry, source, target, descriptor, level)
    {
        debug!(effect_actor = ?source, ?target, %error, "effect not applied");
    }
}
