mod resources;

use {
    crate::resources::EffectsFolderHandle,
    bevy::{asset::LoadedFolder, prelude::*},
    effects_assets::{EffectMap, GameplayEffectDefinition},
    states::GameState,
};

pub struct LoadingManagerPlugin;

impl Plugin for LoadingManagerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LoadingStatus>()
            .add_systems(Startup, load_effect_definitions)
            .add_systems(
                Update,
                check_assets_loaded.run_if(in_state(GameState::Loading)),
            )
            // Loading UI
            .add_systems(OnEnter(GameState::Loading), setup_loading_ui)
            .add_systems(
                Update,
                update_loading_ui.run_if(in_state(GameState::Loading)),
            )
            .add_systems(OnExit(GameState::Loading), cleanup_loading_ui);
    }
}

// --- Resources ---

#[derive(Resource, Default)]
pub struct LoadingStatus {
    pub current_phase: String,
    pub detail: String,
}

// --- Assets ---

fn load_effect_definitions(mut cmd: Commands, asset_server: Res<AssetServer>) {
    info!("started loading effect definitions");
    let handle = asset_server.load_folder("effects");
    cmd.insert_resource(EffectsFolderHandle(handle));
}

/// Waits for the effects folder, registers every definition under its id
/// and starts the game.
fn check_assets_loaded(
    mut next_state: ResMut<NextState<GameState>>,
    mut effect_map: ResMut<EffectMap>,
    mut status: ResMut<LoadingStatus>,
    asset_server: Res<AssetServer>,
    effects: Res<EffectsFolderHandle>,
    folders: Res<Assets<LoadedFolder>>,
    definitions: Res<Assets<GameplayEffectDefinition>>,
) {
    status.current_phase = "Loading Assets".into();
    status.detail = "Loading effect definitions...".into();

    if !asset_server.is_loaded_with_dependencies(effects.0.id()) {
        return;
    }

    let Some(folder) = folders.get(effects.0.id()) else {
        error!("effects folder reported loaded but is missing");
        return;
    };

    for untyped_handle in &folder.handles {
        let Ok(handle) = untyped_handle.clone().try_typed::<GameplayEffectDefinition>() else {
            warn!(path = ?asset_server.get_path(untyped_handle.id()), "skipping non effect asset");
            continue;
        };
        let Some(definition) = definitions.get(&handle) else {
            continue;
        };

        debug!(effect_id = %definition.id, "registered effect definition");
        effect_map.handles.insert(definition.id.clone(), handle);
    }

    info!(count = effect_map.handles.len(), "effect definitions loaded");
    next_state.set(GameState::Running);
}

// --- Loading UI ---

#[derive(Component)]
struct LoadingUi;

fn setup_loading_ui(mut commands: Commands) {
    info!("spawning loading ui");
    commands.spawn((
        Text::new("Loading..."),
        TextFont {
            font_size: 40.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(20.0),
            right: Val::Px(20.0),
            flex_direction: FlexDirection::Column,
            ..default()
        },
        LoadingUi,
    ));
}

fn update_loading_ui(status: Res<LoadingStatus>, mut query: Query<&mut Text, With<LoadingUi>>) {
    if let Ok(mut text) = query.single_mut() {
        *text = Text::new(format!(
            "Loading...\n{}\n{}",
            status.current_phase, status.detail
        ));
    }
}

fn cleanup_loading_ui(mut commands: Commands, query: Query<Entity, With<LoadingUi>>) {
    info!("cleaning up loading ui");
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}
