use bevy::diagnostic::{DiagnosticsStore, EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{
    egui::{self, Color32, RichText},
    EguiContexts, EguiPlugin,
};

use crate::sequencer::IntroSequencer;
use crate::shell::AppState;

// bg-gray-900
pub const SITE_BACKGROUND: Color32 = Color32::from_rgb(17, 24, 39);

#[derive(Resource, Default)]
pub struct UiSettings {
    pub show_diagnostics: bool,
}

pub struct UiPlugin;
impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .init_resource::<UiSettings>()
            .add_systems(
                Update,
                (
                    diagnostics_toggle,
                    site_ui.run_if(in_state(AppState::Site)),
                    diagnostics_ui,
                )
                    .chain(),
            );
    }
}

/// Stand-in for the real site content.
fn site_ui(mut contexts: EguiContexts) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(SITE_BACKGROUND))
        .show(contexts.ctx_mut(), |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("Welcome to the Website!")
                        .size(48.0)
                        .strong()
                        .color(Color32::WHITE),
                );
            });
        });
}

fn diagnostics_toggle(mut settings: ResMut<UiSettings>, keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::F3) {
        settings.show_diagnostics = !settings.show_diagnostics;
    }
}

fn diagnostics_ui(
    mut contexts: EguiContexts,
    settings: Res<UiSettings>,
    diagnostics: Res<DiagnosticsStore>,
    state: Res<State<AppState>>,
    sequencer: Option<Res<IntroSequencer>>,
) {
    if !settings.show_diagnostics {
        return;
    }
    egui::Window::new("Diagnostics").show(contexts.ctx_mut(), |ui| {
        ui.label(format!("State: {:?}", state.get()));
        if let Some(sequencer) = sequencer.as_deref() {
            let phase = sequencer.phase();
            ui.label(format!(
                "Intro: {:?}  clicked: {}  zooming: {}  delay armed: {}",
                phase,
                phase.is_clicked(),
                phase.is_zooming(),
                sequencer.is_pending()
            ));
        }
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                ui.label(format!("FPS: {:.1}", value));
            }
        }
        if let Some(entity_count) = diagnostics.get(&EntityCountDiagnosticsPlugin::ENTITY_COUNT) {
            if let Some(value) = entity_count.value() {
                ui.label(format!("Entities: {}", value));
            }
        }
    });
}
