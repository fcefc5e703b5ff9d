mod attributes;
mod tags;

pub use attributes::*;
pub use tags::*;

use {
    bevy::prelude::*,
    serde::{Deserialize, Serialize},
    std::{
        collections::HashMap,
        sync::atomic::{AtomicU64, Ordering},
        time::Duration,
    },
};

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Opaque id of an effect stored on an ability system. Unique for the whole process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub struct ActiveEffectHandle(u64);

impl ActiveEffectHandle {
    /// Returned for applications that do not leave an active effect behind (instant effects).
    pub const INVALID: Self = Self(0);

    pub fn generate() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub enum DurationPolicy {
    /// Executes once on base values, never stored.
    Instant,
    /// Stored until the duration runs out or it is removed.
    HasDuration { seconds: f32 },
    /// Stored until explicitly removed.
    Infinite,
}

impl DurationPolicy {
    pub fn is_instant(&self) -> bool {
        matches!(self, DurationPolicy::Instant)
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, DurationPolicy::Infinite)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct EffectContext {
    /// Entity that caused the effect, e.g. the effect actor the target walked into.
    pub source_object: Option<Entity>,
}

impl EffectContext {
    pub fn with_source_object(source_object: Entity) -> Self {
        Self {
            source_object: Some(source_object),
        }
    }
}

/// An effect definition evaluated at a level, ready to be applied.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct EffectSpec {
    pub effect_id: String,
    pub level: f32,
    pub duration: DurationPolicy,
    /// Seconds between executions for periodic effects.
    pub period: Option<f32>,
    pub modifiers: Vec<EvaluatedModifier>,
    pub asset_tags: GameplayTagContainer,
    pub context: EffectContext,
}

#[derive(Debug, Clone, Reflect)]
pub struct ActiveEffect {
    pub handle: ActiveEffectHandle,
    pub spec: EffectSpec,
    /// `None` for infinite effects.
    pub duration: Option<Timer>,
    pub period: Option<Timer>,
}

impl ActiveEffect {
    pub fn is_periodic(&self) -> bool {
        self.period.is_some()
    }
}

/// Receives, stores and revokes gameplay effects for the actor it belongs to.
#[derive(Component, Reflect, Debug, Default)]
#[reflect(Component, Default)]
#[require(AttributeSet, Listeners, ReportedAttributes)]
pub struct AbilitySystem {
    pub owner_actor: Option<Entity>,
    pub avatar_actor: Option<Entity>,
    /// Set once the host-scoped "effect applied" listener is attached.
    pub effect_applied_bound: bool,
    active: Vec<ActiveEffect>,
}

impl AbilitySystem {
    pub fn active_effects(&self) -> &[ActiveEffect] {
        &self.active
    }

    pub fn active_effect(&self, handle: ActiveEffectHandle) -> Option<&ActiveEffect> {
        self.active.iter().find(|effect| effect.handle == handle)
    }

    pub fn active_effect_mut(&mut self, handle: ActiveEffectHandle) -> Option<&mut ActiveEffect> {
        self.active.iter_mut().find(|effect| effect.handle == handle)
    }

    /// Applies `spec` to this ability system. Instant effects execute on base
    /// values and return [`ActiveEffectHandle::INVALID`], everything else is
    /// stored under a fresh handle.
    pub fn apply_spec_to_self(
        &mut self,
        attributes: &mut AttributeSet,
        spec: EffectSpec,
    ) -> ActiveEffectHandle {
        let duration = match spec.duration {
            DurationPolicy::Instant => {
                for modifier in &spec.modifiers {
                    attributes.execute(modifier);
                }
                self.refresh(attributes);
                return ActiveEffectHandle::INVALID;
            }
            DurationPolicy::HasDuration { seconds } => {
                Some(Timer::from_seconds(seconds.max(0.0), TimerMode::Once))
            }
            DurationPolicy::Infinite => None,
        };

        let handle = ActiveEffectHandle::generate();
        let period = spec
            .period
            .filter(|seconds| *seconds > 0.0)
            .map(|seconds| Timer::from_seconds(seconds, TimerMode::Repeating));

        self.active.push(ActiveEffect {
            handle,
            spec,
            duration,
            period,
        });
        self.refresh(attributes);
        handle
    }

    /// Every application is a single stack, so any request other than zero
    /// stacks removes the effect; negative means "all stacks".
    /// Returns false when the handle is unknown.
    pub fn remove_active_effect(
        &mut self,
        attributes: &mut AttributeSet,
        handle: ActiveEffectHandle,
        stacks_to_remove: i32,
    ) -> bool {
        let Some(index) = self.active.iter().position(|effect| effect.handle == handle) else {
            return false;
        };

        if stacks_to_remove != 0 {
            self.active.remove(index);
            self.refresh(attributes);
        }
        true
    }

    /// Advances effect timers by `delta`: periodic effects execute on base
    /// values, finished timed effects are dropped.
    /// Returns true when attribute values may have changed.
    pub fn tick(&mut self, attributes: &mut AttributeSet, delta: Duration) -> bool {
        let mut changed = false;

        for effect in &mut self.active {
            if let Some(period) = effect.period.as_mut() {
                period.tick(delta);
                for _ in 0..period.times_finished_this_tick() {
                    for modifier in &effect.spec.modifiers {
                        attributes.execute(modifier);
                    }
                    changed = true;
                }
            }
            if let Some(duration) = effect.duration.as_mut() {
                duration.tick(delta);
            }
        }

        let before = self.active.len();
        self.active.retain(|effect| {
            !effect
                .duration
                .as_ref()
                .is_some_and(|duration| duration.is_finished())
        });
        changed |= self.active.len() != before;

        if changed {
            self.refresh(attributes);
        }
        changed
    }

    // Periodic effects only act through their executions.
    fn refresh(&self, attributes: &mut AttributeSet) {
        attributes.recompute(
            self.active
                .iter()
                .filter(|effect| !effect.is_periodic())
                .flat_map(|effect| effect.spec.modifiers.iter()),
        );
    }
}

/// Actor whose ability system lives on another entity, e.g. a character
/// backed by its player state.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component, Default)]
pub struct AbilitySystemLink(pub Entity);

impl Default for AbilitySystemLink {
    fn default() -> Self {
        Self(Entity::PLACEHOLDER)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ListenerChannel {
    EffectAssetTags,
    AttributeChanged,
}

/// Listener entities per broadcast channel, notified in registration order.
#[derive(Component, Default, Debug)]
pub struct Listeners {
    channels: HashMap<ListenerChannel, Vec<Entity>>,
}

impl Listeners {
    /// Returns false if `listener` was already subscribed.
    pub fn subscribe(&mut self, channel: ListenerChannel, listener: Entity) -> bool {
        let listeners = self.channels.entry(channel).or_default();
        if listeners.contains(&listener) {
            return false;
        }
        listeners.push(listener);
        true
    }

    pub fn unsubscribe(&mut self, channel: ListenerChannel, listener: Entity) -> bool {
        let Some(listeners) = self.channels.get_mut(&channel) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|entity| *entity != listener);
        listeners.len() != before
    }

    pub fn subscribers(&self, channel: ListenerChannel) -> &[Entity] {
        self.channels
            .get(&channel)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Last attribute values sent to `AttributeChanged` listeners.
#[derive(Component, Default, Debug)]
pub struct ReportedAttributes(pub HashMap<Attribute, f32>);
