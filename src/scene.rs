//! The arcade scene: backdrop, machine artwork, screen text, bobbing arrow
//! and the invisible joystick hotspot, plus the tweens each phase plays.
//!
//! Hierarchy (z grows toward the viewer):
//!
//! ```text
//! IntroRoot (fade in on mount, fade out while zooming)
//! ├── Backdrop (covers the window)
//! └── Stage (shrinks the machine to fit small windows)
//!     └── ZoomContainer (scales about the screen on ZoomingOut)
//!         ├── ArcadeArt
//!         ├── TextBlock ── one Text2d per line
//!         ├── BobbingArrow ── shaft + two heads
//!         └── Hotspot
//! ```

use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;
use bevy::sprite::{Anchor, MaterialMesh2dBundle, Mesh2dHandle};
use bevy::window::PrimaryWindow;

use crate::config::IntroSettings;
use crate::intro::{IntroSet, ZoomContainer};
use crate::sequencer::{IntroPhase, PhaseChanged};
use crate::shell::AppState;
use crate::tween::{zoom_about, Ease, Opacity, Tween, TweenSet};
use crate::typing::{letter_sections, reveal_schedule, typewriter, TypingReveal};

#[derive(Component)]
pub struct IntroRoot;

#[derive(Component)]
struct Backdrop;

#[derive(Component)]
struct Stage;

#[derive(Component)]
struct ArcadeArt;

#[derive(Component)]
struct TextBlock;

#[derive(Component)]
struct BobbingArrow;

/// Mesh piece of the arrow icon. Fades on its own so the bob keeps running.
#[derive(Component)]
struct ArrowPart;

/// Clickable region over the joystick, `size` in local units.
#[derive(Component, Clone, Copy, Debug)]
pub struct Hotspot {
    pub size: Vec2,
}

impl Hotspot {
    pub fn contains(&self, transform: &GlobalTransform, point: Vec2) -> bool {
        let local = transform
            .affine()
            .inverse()
            .transform_point3(point.extend(transform.translation().z));
        local.x.abs() <= self.size.x / 2.0 && local.y.abs() <= self.size.y / 2.0
    }
}

pub struct ScenePlugin;
impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Intro), spawn_scene)
            .add_systems(OnExit(AppState::Intro), despawn_scene)
            .add_systems(
                Update,
                (
                    react_to_phase.after(IntroSet),
                    typewriter.after(TweenSet),
                    fit_to_window,
                )
                    .run_if(in_state(AppState::Intro)),
            );
    }
}

/// Size that covers `window` while keeping the image's aspect ratio.
pub fn cover_size(image: Vec2, window: Vec2) -> Vec2 {
    if image.x <= 0.0 || image.y <= 0.0 {
        return window;
    }
    image * (window.x / image.x).max(window.y / image.y)
}

/// Uniform scale that fits `frame` inside `window`; never enlarges.
pub fn fit_scale(frame: Vec2, window: Vec2) -> f32 {
    if frame.x <= 0.0 || frame.y <= 0.0 {
        return 1.0;
    }
    (window.x / frame.x)
        .min(window.y / frame.y)
        .clamp(0.05, 1.0)
}

/// Double-headed arrow in a `size`-wide box: shaft plus up and down heads.
pub fn arrow_icon_parts(size: f32) -> (Rectangle, [Triangle2d; 2]) {
    let k = size / 20.0;
    let tip = 5.5 * k;
    let head = 3.0 * k;
    let shaft = Rectangle::new(1.5 * k, 2.0 * (tip - head * 0.5));
    let up = Triangle2d::new(
        Vec2::new(0.0, tip),
        Vec2::new(-head, tip - head),
        Vec2::new(head, tip - head),
    );
    let down = Triangle2d::new(
        Vec2::new(0.0, -tip),
        Vec2::new(head, head - tip),
        Vec2::new(-head, head - tip),
    );
    (shaft, [up, down])
}

fn spawn_arrow_icon(
    arrow: &mut ChildBuilder,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
    size: f32,
    color: Color,
) {
    let (shaft, heads) = arrow_icon_parts(size);
    let material = materials.add(ColorMaterial::from(color));
    arrow.spawn((
        ArrowPart,
        Opacity::default(),
        MaterialMesh2dBundle {
            mesh: Mesh2dHandle(meshes.add(shaft)),
            material: material.clone(),
            ..default()
        },
    ));
    for head in heads {
        arrow.spawn((
            ArrowPart,
            Opacity::default(),
            MaterialMesh2dBundle {
                mesh: Mesh2dHandle(meshes.add(head)),
                material: material.clone(),
                ..default()
            },
        ));
    }
}

fn spawn_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<IntroSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let frame = settings.frame_size;
    let window = windows
        .get_single()
        .map(|w| Vec2::new(w.width(), w.height()))
        .unwrap_or(frame);

    let background: Handle<Image> = asset_server.load(settings.background_path.clone());
    let arcade: Handle<Image> = asset_server.load(settings.arcade_path.clone());

    let schedule = reveal_schedule(&settings.lines, settings.reveal_delay, settings.letter_stagger);
    let glow = settings.glow_color();
    let style = TextStyle {
        font_size: settings.font_size,
        color: glow,
        ..default()
    };

    let arrow_rest = Transform::from_translation(settings.arrow_center().extend(2.0));
    let arrow_top = arrow_rest.with_translation(arrow_rest.translation + Vec3::Y * settings.arrow_bob);

    commands
        .spawn((
            IntroRoot,
            SpatialBundle::default(),
            Opacity(0.0),
            Tween::fade(0.0, 1.0, settings.mount_fade),
        ))
        .with_children(|root| {
            root.spawn((
                Backdrop,
                Opacity::default(),
                SpriteBundle {
                    texture: background,
                    sprite: Sprite {
                        custom_size: Some(window),
                        ..default()
                    },
                    ..default()
                },
            ));

            root.spawn((
                Stage,
                SpatialBundle::from_transform(
                    Transform::from_xyz(0.0, 0.0, 1.0)
                        .with_scale(Vec3::splat(fit_scale(frame, window))),
                ),
            ))
            .with_children(|stage| {
                stage
                    .spawn((ZoomContainer, SpatialBundle::default()))
                    .with_children(|machine| {
                        machine.spawn((
                            ArcadeArt,
                            Opacity::default(),
                            SpriteBundle {
                                texture: arcade,
                                sprite: Sprite {
                                    custom_size: Some(frame),
                                    ..default()
                                },
                                ..default()
                            },
                        ));

                        machine
                            .spawn((
                                TextBlock,
                                Opacity::default(),
                                SpatialBundle::from_transform(Transform::from_translation(
                                    settings.text_origin().extend(1.0),
                                )),
                            ))
                            .with_children(|block| {
                                for (i, (line, starts)) in
                                    settings.lines.iter().zip(schedule).enumerate()
                                {
                                    block.spawn((
                                        Text2dBundle {
                                            text: Text::from_sections(letter_sections(line, &style))
                                                .with_justify(JustifyText::Left),
                                            text_anchor: Anchor::TopLeft,
                                            transform: Transform::from_xyz(
                                                0.0,
                                                -(i as f32) * settings.line_height(),
                                                0.0,
                                            ),
                                            ..default()
                                        },
                                        TypingReveal::new(starts, settings.letter_fade, glow),
                                    ));
                                }
                            });

                        machine
                            .spawn((
                                BobbingArrow,
                                SpatialBundle::from_transform(arrow_rest),
                                Tween::move_to(arrow_rest, arrow_top, settings.arrow_period / 2.0)
                                    .with_ease(Ease::SineInOut)
                                    .ping_pong(),
                            ))
                            .with_children(|arrow| {
                                spawn_arrow_icon(
                                    arrow,
                                    &mut meshes,
                                    &mut materials,
                                    settings.arrow_size,
                                    settings.arrow_color,
                                );
                            });

                        machine.spawn((
                            Hotspot {
                                size: settings.hotspot_size,
                            },
                            SpriteBundle {
                                sprite: Sprite {
                                    color: Color::NONE,
                                    custom_size: Some(settings.hotspot_size),
                                    ..default()
                                },
                                transform: Transform::from_translation(
                                    settings.hotspot_center().extend(3.0),
                                ),
                                ..default()
                            },
                        ));
                    });
            });
        });

    info!("intro scene mounted ({} lines)", settings.lines.len());
}

// Recursive despawn also drops the arrow's endless tween.
fn despawn_scene(mut commands: Commands, roots: Query<Entity, With<IntroRoot>>) {
    for entity in &roots {
        commands.entity(entity).despawn_recursive();
    }
}

fn fade_out<F: QueryFilter>(
    commands: &mut Commands,
    targets: &Query<(Entity, &Opacity), F>,
    duration: f32,
) {
    for (entity, opacity) in targets.iter() {
        commands
            .entity(entity)
            .insert(Tween::fade(opacity.0, 0.0, duration));
    }
}

fn react_to_phase(
    mut commands: Commands,
    mut ev_phase: EventReader<PhaseChanged>,
    settings: Res<IntroSettings>,
    hotspots: Query<(Entity, &Transform), With<Hotspot>>,
    zooms: Query<(Entity, &Transform), With<ZoomContainer>>,
    decorations: Query<(Entity, &Opacity), Or<(With<TextBlock>, With<ArrowPart>)>>,
    arts: Query<(Entity, &Opacity), With<ArcadeArt>>,
    roots: Query<(Entity, &Opacity), With<IntroRoot>>,
) {
    for change in ev_phase.read() {
        match change.to {
            IntroPhase::Pressed => {
                for (entity, rest) in &hotspots {
                    let mut pressed = *rest;
                    pressed.translation.y -= settings.press_depth;
                    pressed.scale.y *= settings.press_squash;
                    commands.entity(entity).insert(
                        Tween::move_to(*rest, pressed, settings.press_duration)
                            .with_ease(Ease::CubicOut),
                    );
                }
                fade_out(&mut commands, &decorations, settings.text_fade_out);
            }
            IntroPhase::ZoomingOut => {
                let origin = settings.zoom_origin_local();
                for (entity, rest) in &zooms {
                    let zoomed = zoom_about(*rest, origin, settings.zoom_scale);
                    commands.entity(entity).insert(
                        Tween::move_to(*rest, zoomed, settings.zoom_duration)
                            .with_ease(Ease::QuadIn),
                    );
                }
                fade_out(&mut commands, &arts, settings.art_fade_out);
                fade_out(&mut commands, &roots, settings.scene_fade_out);
            }
            IntroPhase::Idle | IntroPhase::Completed => {}
        }
    }
}

fn fit_to_window(
    windows: Query<&Window, With<PrimaryWindow>>,
    images: Res<Assets<Image>>,
    settings: Res<IntroSettings>,
    mut backdrops: Query<(&mut Sprite, &Handle<Image>), With<Backdrop>>,
    mut stages: Query<&mut Transform, With<Stage>>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());

    for (mut sprite, handle) in &mut backdrops {
        let image = images.get(handle).map_or(size, Image::size_f32);
        let cover = cover_size(image, size);
        if sprite.custom_size != Some(cover) {
            sprite.custom_size = Some(cover);
        }
    }

    let scale = fit_scale(settings.frame_size, size);
    for mut transform in &mut stages {
        if (transform.scale.x - scale).abs() > f32::EPSILON {
            transform.scale = Vec3::splat(scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intro::{HotspotActivated, IntroComplete, IntroPlugin};
    use crate::sequencer::IntroSequencer;
    use crate::shell::ShellPlugin;
    use crate::tween::TweenPlugin;
    use bevy::color::Alpha;
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    const FRAME_MS: u64 = 50;

    #[derive(Resource, Default)]
    struct Completions(usize);

    fn count_completions(mut ev: EventReader<IntroComplete>, mut count: ResMut<Completions>) {
        count.0 += ev.read().count();
    }

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, AssetPlugin::default()))
            .init_asset::<Image>()
            .init_asset::<Mesh>()
            .init_asset::<ColorMaterial>()
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
                FRAME_MS,
            )))
            .init_state::<AppState>()
            .init_resource::<IntroSettings>()
            .init_resource::<Completions>()
            .add_plugins((TweenPlugin, ShellPlugin, IntroPlugin, ScenePlugin))
            .add_systems(Update, count_completions.after(IntroSet));
        app.update();
        app
    }

    fn click(app: &mut App) {
        app.world_mut().send_event(HotspotActivated);
        app.update();
    }

    fn phase(app: &App) -> Option<IntroPhase> {
        app.world()
            .get_resource::<IntroSequencer>()
            .map(IntroSequencer::phase)
    }

    fn single<C: Component + Copy, M: Component>(app: &mut App) -> C {
        *app.world_mut()
            .query_filtered::<&C, With<M>>()
            .single(app.world())
    }

    fn text_alphas(app: &mut App) -> Vec<f32> {
        app.world_mut()
            .query::<&Text>()
            .iter(app.world())
            .flat_map(|text| text.sections.iter().map(|s| s.style.color.alpha()))
            .collect()
    }

    #[test]
    fn text_stays_dark_before_reveal_delay() {
        let mut app = app();
        let alphas = text_alphas(&mut app);
        assert_eq!(alphas.len(), "LET'SPLAY AGAME".len());
        // 0.4 s after mount
        for _ in 0..8 {
            app.update();
            assert!(text_alphas(&mut app).iter().all(|a| *a == 0.0));
        }
    }

    #[test]
    fn press_fades_text_and_arrow_before_zoom() {
        let mut app = app();
        // let the mount fade finish
        for _ in 0..8 {
            app.update();
        }
        let rest = single::<Transform, Hotspot>(&mut app);
        click(&mut app);
        app.update();
        assert_eq!(phase(&app), Some(IntroPhase::Pressed));

        assert!(single::<Opacity, TextBlock>(&mut app).0 < 1.0);
        assert!(single::<Transform, Hotspot>(&mut app).translation.y < rest.translation.y);

        let arrow = app
            .world_mut()
            .query_filtered::<Entity, With<BobbingArrow>>()
            .single(app.world());
        let world = app.world();
        let materials = world.resource::<Assets<ColorMaterial>>();
        let parts = world.get::<Children>(arrow).unwrap();
        assert_eq!(parts.len(), 3);
        for &part in parts.iter() {
            assert!(world.get::<Opacity>(part).unwrap().0 < 1.0);
            let handle = world.get::<Handle<ColorMaterial>>(part).unwrap();
            assert!(materials.get(handle).unwrap().color.alpha() < 1.0);
        }
        // still bobbing
        assert!(world.get::<Tween>(arrow).is_some());
        assert_eq!(single::<Opacity, ArcadeArt>(&mut app).0, 1.0);
    }

    #[test]
    fn click_to_site_runs_the_whole_sequence() {
        let mut app = app();
        let settings = IntroSettings::default();
        let zoomed = zoom_about(Transform::IDENTITY, settings.zoom_origin_local(), 10.0);

        click(&mut app);
        let mut frames = 0u64;
        let mut completed_at = None;
        while frames < 40 {
            app.update();
            frames += 1;
            if completed_at.is_none() && app.world().resource::<Completions>().0 == 1 {
                completed_at = Some(frames * FRAME_MS);
                let zoom = single::<Transform, ZoomContainer>(&mut app);
                assert!(zoom.translation.distance(zoomed.translation) < 1e-3);
                assert!((zoom.scale.x - 10.0).abs() < 1e-4);
                assert_eq!(phase(&app), Some(IntroPhase::Completed));
            }
        }

        let completed_at = completed_at.unwrap();
        assert!(completed_at >= 1100, "completed after {completed_at} ms");
        assert_eq!(app.world().resource::<Completions>().0, 1);
        assert_eq!(
            app.world().resource::<State<AppState>>().get(),
            &AppState::Site
        );
        let roots = app
            .world_mut()
            .query_filtered::<Entity, With<IntroRoot>>()
            .iter(app.world())
            .count();
        assert_eq!(roots, 0);
        assert!(phase(&app).is_none());
    }

    #[test]
    fn cover_fills_both_axes() {
        let cover = cover_size(Vec2::new(1920.0, 1080.0), Vec2::new(800.0, 800.0));
        assert!(cover.x >= 800.0 && cover.y >= 800.0);
        assert!((cover.y - 800.0).abs() < 1e-3);
        assert!((cover.x / cover.y - 1920.0 / 1080.0).abs() < 1e-4);
    }

    #[test]
    fn cover_without_image_size_uses_window() {
        let window = Vec2::new(640.0, 480.0);
        assert_eq!(cover_size(Vec2::ZERO, window), window);
    }

    #[test]
    fn fit_shrinks_but_never_grows() {
        let frame = Vec2::new(512.0, 768.0);
        assert_eq!(fit_scale(frame, Vec2::new(1920.0, 1080.0)), 1.0);
        assert!((fit_scale(frame, Vec2::new(1024.0, 384.0)) - 0.5).abs() < 1e-6);
        assert!(fit_scale(frame, Vec2::ZERO) > 0.0);
    }

    #[test]
    fn arrow_is_symmetric_and_fits_its_box() {
        let size = 48.0;
        let (shaft, [up, down]) = arrow_icon_parts(size);
        assert!(shaft.half_size.y * 2.0 <= size);
        assert!(up.vertices[0].y > 0.0);
        assert_eq!(up.vertices[0].y, -down.vertices[0].y);
        for v in up.vertices.iter().chain(down.vertices.iter()) {
            assert!(v.x.abs() <= size / 2.0 && v.y.abs() <= size / 2.0);
        }
    }

    #[test]
    fn hotspot_hit_test_follows_scale() {
        let hotspot = Hotspot {
            size: Vec2::new(64.0, 80.0),
        };
        let at = GlobalTransform::from(
            Transform::from_xyz(100.0, -50.0, 3.0).with_scale(Vec3::splat(0.5)),
        );
        assert!(hotspot.contains(&at, Vec2::new(100.0, -50.0)));
        assert!(hotspot.contains(&at, Vec2::new(115.0, -30.0)));
        assert!(!hotspot.contains(&at, Vec2::new(117.0, -50.0)));
        assert!(!hotspot.contains(&at, Vec2::new(100.0, -71.0)));
    }
}
