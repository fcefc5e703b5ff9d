use {
    bevy::{log::LogPlugin, prelude::*},
    core::CorePlugin,
};

fn main() {
    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins.set(LogPlugin {
            filter: "error,loading=trace,\
                ability_system=debug,\
                effect_actors=debug,\
                effects_assets=debug,\
                widget_controller=info,\
                core=info"
                .into(),
            level: bevy::log::Level::TRACE,
            ..Default::default()
        }),
    )
    .add_plugins(CorePlugin);

    #[cfg(debug_assertions)]
    app.add_plugins((
        bevy_inspector_egui::bevy_egui::EguiPlugin::default(),
        bevy_inspector_egui::quick::WorldInspectorPlugin::new(),
    ));

    app.run();
}
