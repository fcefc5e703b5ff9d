use {
    ability_components::{
        Attribute, DurationPolicy, EvaluatedModifier, GameplayTagContainer, ModifierOp,
    },
    bevy::{platform::collections::HashMap, prelude::*},
    bevy_common_assets::ron::RonAssetPlugin,
    serde::{Deserialize, Serialize},
};

pub struct EffectsAssetsPlugin;

impl Plugin for EffectsAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<GameplayEffectDefinition>::new(&[
            "effect.ron",
        ]))
        .init_resource::<EffectMap>()
        .register_type::<ScalableFloat>()
        .register_type::<ModifierDefinition>()
        .add_systems(PreUpdate, sync_effect_map);
    }
}

/// Gameplay effect template loaded from `.effect.ron`.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct GameplayEffectDefinition {
    /// Unique identifier referenced by effect descriptors (e.g., "health_potion")
    pub id: String,
    pub duration: DurationPolicy,
    /// Seconds between executions. Makes a duration/infinite effect periodic;
    /// ignored for instant effects.
    #[serde(default)]
    pub period: Option<f32>,
    #[serde(default)]
    pub modifiers: Vec<ModifierDefinition>,
    /// Tags describing the effect itself, rebroadcast to UI when applied
    /// (e.g., ["Message.HealthPotion"])
    #[serde(default)]
    pub asset_tags: GameplayTagContainer,
}

impl GameplayEffectDefinition {
    pub fn evaluate_modifiers(&self, level: f32) -> Vec<EvaluatedModifier> {
        self.modifiers
            .iter()
            .map(|modifier| modifier.evaluate(level))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Reflect)]
#[reflect(Serialize, Deserialize)]
pub struct ModifierDefinition {
    pub attribute: Attribute,
    #[serde(default)]
    pub op: ModifierOp,
    pub magnitude: ScalableFloat,
}

impl ModifierDefinition {
    pub fn evaluate(&self, level: f32) -> EvaluatedModifier {
        EvaluatedModifier {
            attribute: self.attribute,
            op: self.op,
            magnitude: self.magnitude.at(level),
        }
    }
}

/// Magnitude that grows linearly with the level. Level 1 yields `value`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Serialize, Deserialize)]
pub struct ScalableFloat {
    pub value: f32,
    #[serde(default)]
    pub per_level: f32,
}

impl ScalableFloat {
    pub fn at(&self, level: f32) -> f32 {
        self.value + self.per_level * (level - 1.0)
    }
}

/// Resource mapping effect IDs to asset handles.
#[derive(Resource, Default)]
pub struct EffectMap {
    pub handles: HashMap<String, Handle<GameplayEffectDefinition>>,
}

/// Keeps [`EffectMap`] in sync with loaded, reloaded and dropped definitions.
pub fn sync_effect_map(
    mut effect_map: ResMut<EffectMap>,
    mut assets: ResMut<Assets<GameplayEffectDefinition>>,
    mut events: MessageReader<AssetEvent<GameplayEffectDefinition>>,
) {
    for event in events.read() {
        match event {
            AssetEvent::Added { id } | AssetEvent::Modified { id } => {
                let Some(effect_id) = assets.get(*id).map(|def| def.id.clone()) else {
                    continue;
                };
                let Some(handle) = assets.get_strong_handle(*id) else {
                    continue;
                };
                // A reloaded definition may have changed its id
                effect_map.handles.retain(|_, known| known.id() != *id);
                debug!(%effect_id, "registered gameplay effect definition");
                effect_map.handles.insert(effect_id, handle);
            }
            AssetEvent::Removed { id } | AssetEvent::Unused { id } => {
                effect_map.handles.retain(|_, handle| handle.id() != *id);
            }
            AssetEvent::LoadedWithDependencies { .. } => {}
        }
    }
}
