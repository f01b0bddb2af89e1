use crate::core::state::AppState;
use bevy::prelude::*;
use bevy::shader::Shader;
use bevy_asset_loader::prelude::*;
use std::collections::BTreeSet;

/// Tokens the scene must check off before the frame loop starts.
pub const TOKEN_TERRAIN: &str = "terrain";
pub const TOKEN_WATER: &str = "water";
pub const TOKEN_HEIGHT_FIELD: &str = "height-field";
pub const TOKEN_SKYBOX: &str = "skybox";

pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.add_loading_state(
            LoadingState::new(AppState::Loading)
                .continue_to_state(AppState::Preparing)
                .on_failure_continue_to_state(AppState::LoadFailed)
                .load_collection::<SceneAssets>(),
        )
        .insert_resource(ReadyLatch::new([
            TOKEN_TERRAIN,
            TOKEN_WATER,
            TOKEN_HEIGHT_FIELD,
            TOKEN_SKYBOX,
        ]))
        .add_systems(
            Update,
            enter_running_when_ready.run_if(in_state(AppState::Preparing)),
        )
        .add_systems(OnEnter(AppState::LoadFailed), report_load_failure);
    }
}

#[derive(AssetCollection, Resource)]
pub struct SceneAssets {
    #[asset(path = "shaders/water.wgsl")]
    pub water_shader: Handle<Shader>,
    #[asset(path = "shaders/height_field_solve.wgsl")]
    pub solve_shader: Handle<Shader>,
    #[asset(path = "shaders/minimap.wgsl")]
    pub minimap_shader: Handle<Shader>,
    #[asset(path = "textures/skybox.png")]
    pub skybox: Handle<Image>,
}

/// Count-down latch over named setup obligations. Completion order is
/// unconstrained; [`ReadyLatch::try_fire`] returns true exactly once, and
/// only after every token has completed.
#[derive(Resource, Debug)]
pub struct ReadyLatch {
    pending: BTreeSet<&'static str>,
    total: usize,
    fired: bool,
}

impl ReadyLatch {
    pub fn new<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        let pending: BTreeSet<_> = tokens.into_iter().collect();
        let total = pending.len();
        Self {
            pending,
            total,
            fired: false,
        }
    }

    /// Mark one obligation as done. Completing an unknown or
    /// already-completed token is logged and otherwise ignored.
    pub fn complete(&mut self, token: &str) {
        if !self.pending.remove(token) {
            warn!("ready latch: unexpected completion of '{token}'");
        }
    }

    /// Fraction of tokens completed, in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        (self.total - self.pending.len()) as f32 / self.total as f32
    }

    pub fn is_ready(&self) -> bool {
        self.pending.is_empty()
    }

    /// True exactly once: the first call after all tokens completed.
    pub fn try_fire(&mut self) -> bool {
        if self.fired || !self.pending.is_empty() {
            return false;
        }
        self.fired = true;
        true
    }
}

fn enter_running_when_ready(
    mut latch: ResMut<ReadyLatch>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if latch.try_fire() {
        info!("scene ready, entering the frame loop");
        next_state.set(AppState::Running);
    }
}

fn report_load_failure(mut exit: MessageWriter<AppExit>) {
    error!("required assets failed to load; shutting down");
    exit.write(AppExit::error());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn three_token_latch() -> ReadyLatch {
        ReadyLatch::new(["a", "b", "c"])
    }

    /// Completion order must not matter, and the latch must fire only
    /// after the last token - exactly once.
    #[rstest]
    #[case(["a", "b", "c"])]
    #[case(["c", "a", "b"])]
    #[case(["b", "c", "a"])]
    fn fires_once_after_last_token(#[case] order: [&'static str; 3]) {
        let mut latch = three_token_latch();

        for (i, token) in order.iter().enumerate() {
            assert!(!latch.try_fire(), "fired before token {i} completed");
            latch.complete(token);
        }

        assert!(latch.is_ready());
        assert!(latch.try_fire());
        assert!(!latch.try_fire(), "latch fired twice");
    }

    #[test]
    fn progress_counts_up_monotonically() {
        let mut latch = three_token_latch();
        assert_eq!(latch.progress(), 0.0);
        latch.complete("b");
        assert!((latch.progress() - 1.0 / 3.0).abs() < 1e-6);
        latch.complete("a");
        assert!((latch.progress() - 2.0 / 3.0).abs() < 1e-6);
        latch.complete("c");
        assert_eq!(latch.progress(), 1.0);
    }

    #[test]
    fn duplicate_completion_changes_nothing() {
        let mut latch = three_token_latch();
        latch.complete("a");
        latch.complete("a");
        assert!((latch.progress() - 1.0 / 3.0).abs() < 1e-6);
        assert!(!latch.try_fire());
    }

    #[test]
    fn unknown_token_changes_nothing() {
        let mut latch = three_token_latch();
        latch.complete("nope");
        assert_eq!(latch.progress(), 0.0);
        assert!(!latch.is_ready());
    }

    #[test]
    fn empty_latch_is_immediately_ready() {
        let mut latch = ReadyLatch::new([]);
        assert_eq!(latch.progress(), 1.0);
        assert!(latch.try_fire());
        assert!(!latch.try_fire());
    }
}
