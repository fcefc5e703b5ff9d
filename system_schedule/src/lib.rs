use bevy::prelude::*;

pub struct SystemSchedulePlugin;

impl Plugin for SystemSchedulePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                GameSchedule::Movement,
                GameSchedule::Overlap,
                GameSchedule::Effect,
                GameSchedule::Broadcast,
            )
                .chain(),
        );
    }
}

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum GameSchedule {
    Movement,
    /// Overlap detection, effect application and removal
    Overlap,
    /// Active effect timers
    Effect,
    /// Attribute fan-out to listeners
    Broadcast,
}
