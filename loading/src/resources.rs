//! Folder handles kept alive while assets load

use bevy::{asset::LoadedFolder, prelude::*};

#[derive(Debug, Resource)]
pub(super) struct EffectsFolderHandle(pub Handle<LoadedFolder>);
