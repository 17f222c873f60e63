mod config;
mod input;
mod intro;
mod scene;
mod sequencer;
mod shell;
mod tween;
mod typing;
mod ui;

use bevy::core_pipeline::bloom::BloomSettings;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::diagnostic::{EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use config::IntroSettings;
use input::InputPlugin;
use intro::IntroPlugin;
use scene::ScenePlugin;
use shell::{AppState, ShellPlugin};
use tween::TweenPlugin;
use ui::UiPlugin;

fn main() {
    App::new()
        .insert_resource(ClearColor(Color::srgb_u8(17, 24, 39)))
        .insert_resource(Msaa::Sample4)
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(EntityCountDiagnosticsPlugin)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Let's play a game".into(),
                resolution: (1280., 860.).into(),
                ..default()
            }),
            ..default()
        }))
        .init_state::<AppState>()
        .init_resource::<IntroSettings>()
        .add_plugins((
            TweenPlugin,
            ShellPlugin,
            IntroPlugin,
            ScenePlugin,
            InputPlugin,
            UiPlugin,
        ))
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2dBundle {
            camera: Camera {
                hdr: true, // bloom needs HDR
                ..default()
            },
            tonemapping: Tonemapping::TonyMcMapface,
            transform: Transform::from_xyz(0.0, 0.0, 999.0),
            ..default()
        },
        BloomSettings::default(), // makes the screen text glow
        MainCamera,
    ));
}

#[derive(Component)]
pub struct MainCamera;
