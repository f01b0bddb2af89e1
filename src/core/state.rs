use bevy::prelude::States;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub(crate) enum AppState {
    /// Waiting on the declared assets (shader sources, skybox).
    #[default]
    Loading,
    /// Assets are in; building the scene and running the one-shot
    /// height-field solve.
    Preparing,
    /// Steady-state frame loop.
    Running,
    /// A required asset failed to load; report and shut down.
    LoadFailed,
}
