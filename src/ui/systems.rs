use crate::core::state::AppState;
use crate::loading::ReadyLatch;
use crate::ui::components::*;
use bevy::prelude::*;

pub fn spawn_loading_screen(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.08, 0.1, 0.14)),
            GlobalZIndex(10),
            LoadingScreen,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Loading"),
                TextFont {
                    font_size: 32.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.93, 0.97)),
            ));

            // Bar track
            parent
                .spawn((
                    Node {
                        width: Val::Px(320.0),
                        height: Val::Px(8.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.2, 0.23, 0.3)),
                ))
                .with_children(|track| {
                    track.spawn((
                        Node {
                            width: Val::Percent(0.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(Color::srgb(0.35, 0.65, 0.9)),
                        LoadingBar,
                    ));
                });
        });
}

/// While assets stream in there is no meaningful fraction to show, so the
/// bar pulses; once the scene is preparing it tracks the ready latch.
pub fn update_loading_bar(
    time: Res<Time>,
    state: Res<State<AppState>>,
    latch: Res<ReadyLatch>,
    mut bar: Query<&mut Node, With<LoadingBar>>,
) -> Result {
    let mut node = bar.single_mut()?;
    let fraction = match state.get() {
        AppState::Loading => 0.15 + 0.1 * (time.elapsed_secs() * 4.0).sin(),
        _ => 0.25 + 0.75 * latch.progress(),
    };
    node.width = Val::Percent(fraction * 100.0);
    Ok(())
}

pub fn despawn_loading_screen(
    mut commands: Commands,
    screens: Query<Entity, With<LoadingScreen>>,
) {
    for entity in screens.iter() {
        commands.entity(entity).despawn();
    }
}
