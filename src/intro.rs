use bevy::prelude::*;

use crate::config::IntroSettings;
use crate::sequencer::{IntroSequencer, PhaseChanged};
use crate::shell::AppState;
use crate::tween::{TweenCompleted, TweenSet};

/// The player pressed the joystick (click or key).
#[derive(Event, Default, Debug, Clone, Copy)]
pub struct HotspotActivated;

/// Sent once per mount when the zoom has played out.
#[derive(Event, Default, Debug, Clone, Copy)]
pub struct IntroComplete;

/// The part of the scene that zooms; its tween completion ends the intro.
#[derive(Component)]
pub struct ZoomContainer;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntroSet;

pub struct IntroPlugin;
impl Plugin for IntroPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HotspotActivated>()
            .add_event::<PhaseChanged>()
            .add_event::<IntroComplete>()
            .add_systems(OnEnter(AppState::Intro), mount_sequencer)
            .add_systems(OnExit(AppState::Intro), unmount_sequencer)
            .add_systems(
                Update,
                (tick_press_delay, apply_activations, watch_zoom, log_phases)
                    .chain()
                    .in_set(IntroSet)
                    .after(TweenSet)
                    .run_if(in_state(AppState::Intro))
                    .run_if(resource_exists::<IntroSequencer>),
            );
    }
}

fn mount_sequencer(mut commands: Commands, settings: Res<IntroSettings>) {
    commands.insert_resource(IntroSequencer::new(settings.press_delay_duration()));
}

fn unmount_sequencer(mut commands: Commands, sequencer: Option<ResMut<IntroSequencer>>) {
    if let Some(mut sequencer) = sequencer {
        sequencer.cancel();
    }
    commands.remove_resource::<IntroSequencer>();
}

// Runs before activations so the press delay never counts the frame it was
// armed in.
fn tick_press_delay(
    time: Res<Time>,
    mut sequencer: ResMut<IntroSequencer>,
    mut ev_phase: EventWriter<PhaseChanged>,
) {
    if let Some(change) = sequencer.tick(time.delta()) {
        ev_phase.send(change);
    }
}

fn apply_activations(
    mut ev_activated: EventReader<HotspotActivated>,
    mut sequencer: ResMut<IntroSequencer>,
    mut ev_phase: EventWriter<PhaseChanged>,
) {
    for _ in ev_activated.read() {
        match sequencer.activate_hotspot() {
            Some(change) => {
                ev_phase.send(change);
            }
            None => debug!("hotspot ignored in {:?}", sequencer.phase()),
        }
    }
}

fn watch_zoom(
    mut ev_tween: EventReader<TweenCompleted>,
    zoom_q: Query<(), With<ZoomContainer>>,
    mut sequencer: ResMut<IntroSequencer>,
    mut ev_phase: EventWriter<PhaseChanged>,
    mut ev_done: EventWriter<IntroComplete>,
) {
    for ev in ev_tween.read() {
        if !zoom_q.contains(ev.entity) {
            continue;
        }
        match sequencer.finish_zoom(|| {
            ev_done.send(IntroComplete);
        }) {
            Some(change) => {
                ev_phase.send(change);
            }
            None => debug!("zoom finished in {:?}, ignoring", sequencer.phase()),
        }
    }
}

fn log_phases(mut ev_phase: EventReader<PhaseChanged>) {
    for change in ev_phase.read() {
        info!("intro: {:?} -> {:?}", change.from, change.to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::IntroPhase;
    use crate::shell::ShellPlugin;
    use crate::tween::{Opacity, Tween, TweenPlugin};
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    #[derive(Resource, Default)]
    struct Completions(usize);

    fn count_completions(mut ev: EventReader<IntroComplete>, mut count: ResMut<Completions>) {
        count.0 += ev.read().count();
    }

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .init_state::<AppState>()
            .init_resource::<IntroSettings>()
            .init_resource::<Completions>()
            .init_resource::<Assets<ColorMaterial>>()
            .add_plugins((TweenPlugin, ShellPlugin, IntroPlugin))
            .add_systems(Update, count_completions.after(IntroSet));
        app.update();
        app
    }

    fn phase(app: &App) -> Option<IntroPhase> {
        app.world()
            .get_resource::<IntroSequencer>()
            .map(IntroSequencer::phase)
    }

    fn click(app: &mut App) {
        app.world_mut().send_event(HotspotActivated);
        app.update();
    }

    fn state(app: &App) -> AppState {
        app.world().resource::<State<AppState>>().get().clone()
    }

    #[test]
    fn mounts_idle() {
        let app = app();
        assert_eq!(state(&app), AppState::Intro);
        assert_eq!(phase(&app), Some(IntroPhase::Idle));
    }

    #[test]
    fn repeated_clicks_press_once() {
        let mut app = app();
        app.world_mut().send_event(HotspotActivated);
        app.world_mut().send_event(HotspotActivated);
        app.update();
        assert_eq!(phase(&app), Some(IntroPhase::Pressed));
        click(&mut app);
        assert_eq!(phase(&app), Some(IntroPhase::Pressed));
    }

    #[test]
    fn zoom_starts_after_press_delay() {
        let mut app = app();
        click(&mut app);
        app.update(); // 100 ms
        app.update(); // 200 ms
        assert_eq!(phase(&app), Some(IntroPhase::Pressed));
        app.update(); // 300 ms
        assert_eq!(phase(&app), Some(IntroPhase::ZoomingOut));
    }

    #[test]
    fn zoom_completion_hands_over_to_site() {
        let mut app = app();
        let zoom = app.world_mut().spawn(ZoomContainer).id();
        click(&mut app);
        for _ in 0..3 {
            app.update();
        }
        assert_eq!(phase(&app), Some(IntroPhase::ZoomingOut));

        app.world_mut().send_event(TweenCompleted { entity: zoom });
        app.world_mut().send_event(TweenCompleted { entity: zoom });
        app.update();
        assert_eq!(phase(&app), Some(IntroPhase::Completed));
        assert_eq!(app.world().resource::<Completions>().0, 1);

        app.update();
        assert_eq!(state(&app), AppState::Site);
        assert!(phase(&app).is_none());
        assert_eq!(app.world().resource::<Completions>().0, 1);
    }

    #[test]
    fn zoom_tween_finishing_while_idle_is_ignored() {
        let mut app = app();
        app.world_mut().spawn((
            ZoomContainer,
            Transform::default(),
            Opacity::default(),
            Tween::fade(1.0, 1.0, 0.2),
        ));
        for _ in 0..5 {
            app.update();
        }
        assert_eq!(phase(&app), Some(IntroPhase::Idle));
        assert_eq!(app.world().resource::<Completions>().0, 0);
        assert_eq!(state(&app), AppState::Intro);
    }

    #[test]
    fn other_tweens_do_not_finish_the_intro() {
        let mut app = app();
        click(&mut app);
        for _ in 0..3 {
            app.update();
        }
        let art = app.world_mut().spawn(Opacity::default()).id();
        app.world_mut().send_event(TweenCompleted { entity: art });
        app.update();
        assert_eq!(phase(&app), Some(IntroPhase::ZoomingOut));
        assert_eq!(app.world().resource::<Completions>().0, 0);
    }

    #[test]
    fn leaving_early_drops_pending_timer() {
        let mut app = app();
        click(&mut app);
        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Site);
        for _ in 0..5 {
            app.update();
        }
        assert_eq!(state(&app), AppState::Site);
        assert!(phase(&app).is_none());
        assert_eq!(app.world().resource::<Completions>().0, 0);
    }
}
