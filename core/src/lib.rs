use {
    ability_system::AbilitySystemPlugin,
    bevy::prelude::*,
    effect_actors::EffectActorsPlugin,
    loading::LoadingManagerPlugin,
    states::GameState,
    system_schedule::{GameSchedule, SystemSchedulePlugin},
    widget_controller::WidgetControllerPlugin,
};

mod systems;


pub use systems::{Player, PlayerState};

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_plugins((
                SystemSchedulePlugin,
                AbilitySystemPlugin,
                EffectActorsPlugin,
                WidgetControllerPlugin,
                LoadingManagerPlugin,
            ))
            .add_systems(Startup, setup_camera)
            .add_systems(OnEnter(GameState::Running), systems::spawn_starting_scene)
            .add_systems(
                Update,
                systems::move_player
                    .in_set(GameSchedule::Movement)
                    .run_if(in_state(GameState::Running)),
            );
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
