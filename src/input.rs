use crate::intro::{HotspotActivated, IntroSet};
use crate::scene::Hotspot;
use crate::sequencer::IntroSequencer;
use crate::shell::AppState;
use crate::MainCamera;
use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow};

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (hotspot_click, hotspot_keys, hotspot_hover)
                .before(IntroSet)
                .run_if(in_state(AppState::Intro)),
        );
    }
}

fn cursor_world(cursor_pos: Vec2, cam: (&Camera, &GlobalTransform)) -> Option<Vec2> {
    cam.0.viewport_to_world_2d(cam.1, cursor_pos)
}

fn over_hotspot(point: Vec2, hotspots: &Query<(&Hotspot, &GlobalTransform)>) -> bool {
    hotspots.iter().any(|(hotspot, at)| hotspot.contains(at, point))
}

// Every click is forwarded; the sequencer decides whether it counts.
fn hotspot_click(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    q_cam: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    hotspots: Query<(&Hotspot, &GlobalTransform)>,
    mut ev_activated: EventWriter<HotspotActivated>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(win) = windows.get_single() else {
        return;
    };
    let Some(cursor) = win.cursor_position() else {
        return;
    };
    let Ok(cam) = q_cam.get_single() else {
        return;
    };
    let Some(world) = cursor_world(cursor, cam) else {
        return;
    };

    if over_hotspot(world, &hotspots) {
        ev_activated.send(HotspotActivated);
    }
}

fn hotspot_keys(keys: Res<ButtonInput<KeyCode>>, mut ev_activated: EventWriter<HotspotActivated>) {
    if keys.just_pressed(KeyCode::Enter) || keys.just_pressed(KeyCode::Space) {
        ev_activated.send(HotspotActivated);
    }
}

fn hotspot_hover(
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    q_cam: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    hotspots: Query<(&Hotspot, &GlobalTransform)>,
    sequencer: Option<Res<IntroSequencer>>,
) {
    let Ok(mut win) = windows.get_single_mut() else {
        return;
    };
    let idle = sequencer.is_some_and(|s| !s.phase().is_clicked());
    let hovering = idle
        && win
            .cursor_position()
            .zip(q_cam.get_single().ok())
            .and_then(|(cursor, cam)| cursor_world(cursor, cam))
            .is_some_and(|world| over_hotspot(world, &hotspots));

    let icon = if hovering {
        CursorIcon::Pointer
    } else {
        CursorIcon::Default
    };
    if win.cursor.icon != icon {
        win.cursor.icon = icon;
    }
}
