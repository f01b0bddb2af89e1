use bevy::prelude::*;

/// Root node of the full-screen loading overlay.
#[derive(Component)]
pub struct LoadingScreen;

/// The filled portion of the loading bar.
#[derive(Component)]
pub struct LoadingBar;
