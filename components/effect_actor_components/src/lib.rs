use {
    ability_components::ActiveEffectHandle,
    bevy::prelude::*,
    serde::{Deserialize, Serialize},
    std::collections::HashMap,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub enum EffectApplicationPolicy {
    ApplyOnOverlapBegin,
    ApplyOnOverlapEnd,
    #[default]
    DoNotApply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub enum EffectRemovalPolicy {
    RemoveOnOverlapEnd,
    #[default]
    DoNotRemove,
}

/// One configured effect slot on an effect actor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Reflect)]
pub struct EffectDescriptor {
    /// Id of a `GameplayEffectDefinition`. An unset slot applies nothing.
    #[serde(default)]
    pub effect_id: Option<String>,
    #[serde(default)]
    pub application_policy: EffectApplicationPolicy,
    #[serde(default)]
    pub removal_policy: EffectRemovalPolicy,
}

impl EffectDescriptor {
    pub fn new(
        effect_id: impl Into<String>,
        application_policy: EffectApplicationPolicy,
        removal_policy: EffectRemovalPolicy,
    ) -> Self {
        Self {
            effect_id: Some(effect_id.into()),
            application_policy,
            removal_policy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum EffectCategory {
    Instant,
    Duration,
    Infinite,
}

impl EffectCategory {
    /// Order in which the collections are scanned.
    pub const ALL: [EffectCategory; 3] = [
        EffectCategory::Instant,
        EffectCategory::Duration,
        EffectCategory::Infinite,
    ];
}

/// Applies configured gameplay effects to actors overlapping it.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component, Default)]
#[require(ActiveEffectRegistry)]
pub struct EffectActor {
    pub instant_effects: Vec<EffectDescriptor>,
    pub duration_effects: Vec<EffectDescriptor>,
    pub infinite_effects: Vec<EffectDescriptor>,
    /// Level every outgoing spec is built at.
    pub actor_level: f32,
    /// Despawn after an overlap end removed at least one tracked effect.
    pub destroy_on_effect_removal: bool,
}

impl Default for EffectActor {
    fn default() -> Self {
        Self {
            instant_effects: Vec::new(),
            duration_effects: Vec::new(),
            infinite_effects: Vec::new(),
            actor_level: 1.0,
            destroy_on_effect_removal: false,
        }
    }
}

impl EffectActor {
    pub fn effects(&self, category: EffectCategory) -> &[EffectDescriptor] {
        match category {
            EffectCategory::Instant => &self.instant_effects,
            EffectCategory::Duration => &self.duration_effects,
            EffectCategory::Infinite => &self.infinite_effects,
        }
    }
}

/// Infinite effects applied by this actor that must be removed on overlap end,
/// keyed by handle, valued by the ability system entity holding them.
#[derive(Component, Default, Debug)]
pub struct ActiveEffectRegistry {
    handles: HashMap<ActiveEffectHandle, Entity>,
}

impl ActiveEffectRegistry {
    pub fn track(&mut self, handle: ActiveEffectHandle, ability_system: Entity) {
        self.handles.insert(handle, ability_system);
    }

    pub fn untrack(&mut self, handle: ActiveEffectHandle) -> Option<Entity> {
        self.handles.remove(&handle)
    }

    pub fn contains(&self, handle: ActiveEffectHandle) -> bool {
        self.handles.contains_key(&handle)
    }

    /// Every tracked handle held by `ability_system`.
    pub fn handles_for(&self, ability_system: Entity) -> impl Iterator<Item = ActiveEffectHandle> {
        self.handles
            .iter()
            .filter(move |(_, holder)| **holder == ability_system)
            .map(|(handle, _)| *handle)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Circle that reports overlaps with [`OverlapBody`] entities.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component, Default)]
#[require(Overlapping, Transform)]
pub struct OverlapVolume {
    pub radius: f32,
}

impl Default for OverlapVolume {
    fn default() -> Self {
        Self { radius: 32.0 }
    }
}

/// An actor that can enter overlap volumes.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component, Default)]
#[require(Transform)]
pub struct OverlapBody {
    pub radius: f32,
}

impl Default for OverlapBody {
    fn default() -> Self {
        Self { radius: 16.0 }
    }
}

/// Bodies currently inside an overlap volume, in the order they entered.
#[derive(Component, Reflect, Default, Debug)]
#[reflect(Component)]
pub struct Overlapping(pub Vec<Entity>);
