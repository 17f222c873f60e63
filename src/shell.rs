use bevy::prelude::*;
use bevy::window::CursorIcon;

use crate::intro::{IntroComplete, IntroSet};

/// `Intro` until the intro reports completion, then `Site` for good.
#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    Intro,
    Site,
}

pub struct ShellPlugin;
impl Plugin for ShellPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<IntroComplete>()
            .add_systems(
                Update,
                finish_intro
                    .after(IntroSet)
                    .run_if(in_state(AppState::Intro)),
            )
            .add_systems(OnEnter(AppState::Site), |mut windows: Query<&mut Window>| {
                info!("intro finished, showing site");
                for mut window in &mut windows {
                    window.cursor.icon = CursorIcon::Default;
                }
            });
    }
}

fn finish_intro(mut ev_done: EventReader<IntroComplete>, mut next_state: ResMut<NextState<AppState>>) {
    if ev_done.read().count() > 0 {
        next_state.set(AppState::Site);
    }
}
