use {
    ability_components::{
        AbilitySystem, AbilitySystemLink, ActiveEffectHandle, AttributeSet, EffectContext,
        EffectSpec,
    },
    ability_events::EffectAppliedToSelf,
    bevy::{ecs::system::SystemParam, prelude::*},
    effects_assets::{EffectMap, GameplayEffectDefinition},
};

/// Evaluates `definition` at `level` into a spec that can be applied.
pub fn make_outgoing_spec(
    definition: &GameplayEffectDefinition,
    level: f32,
    context: EffectContext,
) -> EffectSpec {
    EffectSpec {
        effect_id: definition.id.clone(),
        level,
        duration: definition.duration,
        period: definition.period,
        modifiers: definition.evaluate_modifiers(level),
        asset_tags: definition.asset_tags.clone(),
        context,
    }
}

/// Access to every ability system in the world, plus the effect definitions
/// they build specs from.
#[derive(SystemParam)]
pub struct AbilityHosts<'w, 's> {
    commands: Commands<'w, 's>,
    systems: Query<'w, 's, (&'static mut AbilitySystem, &'static mut AttributeSet)>,
    links: Query<'w, 's, &'static AbilitySystemLink>,
    definitions: Res<'w, Assets<GameplayEffectDefinition>>,
    effect_map: Res<'w, EffectMap>,
}

impl<'w, 's> AbilityHosts<'w, 's> {
    /// The entity holding the ability system `actor` uses: the actor itself,
    /// or the entity its [`AbilitySystemLink`] points to.
    pub fn resolve(&self, actor: Entity) -> Option<Entity> {
        if self.systems.contains(actor) {
            return Some(actor);
        }

        self.links
            .get(actor)
            .ok()
            .map(|link| link.0)
            .filter(|linked| self.systems.contains(*linked))
    }

    pub fn definition(&self, effect_id: &str) -> Option<&GameplayEffectDefinition> {
        self.effect_map
            .handles
            .get(effect_id)
            .and_then(|handle| self.definitions.get(handle))
    }

    pub fn make_outgoing_spec(
        &self,
        effect_id: &str,
        level: f32,
        context: EffectContext,
    ) -> Option<EffectSpec> {
        self.definition(effect_id)
            .map(|definition| make_outgoing_spec(definition, level, context))
    }

    /// Applies `spec` to `ability_system` and notifies its "effect applied"
    /// listeners. `None` when the entity has no ability system.
    pub fn apply_spec_to_self(
        &mut self,
        ability_system: Entity,
        spec: EffectSpec,
    ) -> Option<ActiveEffectHandle> {
        let Ok((mut asc, mut attributes)) = self.systems.get_mut(ability_system) else {
            return None;
        };

        let applied = EffectAppliedToSelf {
            entity: ability_system,
            handle: ActiveEffectHandle::INVALID,
            effect_id: spec.effect_id.clone(),
            source_object: spec.context.source_object,
            asset_tags: spec.asset_tags.clone(),
        };

        let handle = asc.apply_spec_to_self(&mut attributes, spec);
        trace!(
            ?ability_system,
            effect_id = %applied.effect_id,
            ?handle,
            "applied gameplay effect spec"
        );

        self.commands
            .trigger(EffectAppliedToSelf { handle, ..applied });
        Some(handle)
    }

    /// False when the ability system or the handle is unknown.
    pub fn remove_active_effect(
        &mut self,
        ability_system: Entity,
        handle: ActiveEffectHandle,
        stacks_to_remove: i32,
    ) -> bool {
        let Ok((mut asc, mut attributes)) = self.systems.get_mut(ability_system) else {
            return false;
        };

        let removed = asc.remove_active_effect(&mut attributes, handle, stacks_to_remove);
        trace!(?ability_system, ?handle, removed, "remove active gameplay effect");
        removed
    }

    pub fn commands(&mut self) -> &mut Commands<'w, 's> {
        &mut self.commands
    }
}
