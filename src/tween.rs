//! Small tweening layer: animate a property from A to B over a duration and
//! report completion, or ping-pong forever until the entity is despawned.

use bevy::color::Alpha;
use bevy::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    #[default]
    Linear,
    QuadIn,
    CubicOut,
    SineInOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadIn => t * t,
            // 1 - (1-t)^3
            Ease::CubicOut => 1.0 - (1.0 - t).powi(3),
            Ease::SineInOut => 0.5 - 0.5 * (std::f32::consts::PI * t).cos(),
        }
    }
}

/// Local opacity; the effective value multiplies every ancestor's opacity.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Opacity(pub f32);

impl Default for Opacity {
    fn default() -> Self {
        Self(1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Lens {
    Opacity { from: f32, to: f32 },
    /// Lerps translation and scale; rotation is kept from `from`.
    Transform { from: Transform, to: Transform },
}

impl Lens {
    fn apply(&self, t: f32, transform: Option<Mut<Transform>>, opacity: Option<Mut<Opacity>>) {
        match *self {
            Lens::Opacity { from, to } => {
                if let Some(mut opacity) = opacity {
                    opacity.0 = from + (to - from) * t;
                }
            }
            Lens::Transform { from, to } => {
                if let Some(mut transform) = transform {
                    transform.translation = from.translation.lerp(to.translation, t);
                    transform.scale = from.scale.lerp(to.scale, t);
                    transform.rotation = from.rotation;
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TweenMode {
    #[default]
    Once,
    /// from -> to -> from, forever. `duration` is one leg.
    PingPong,
}

#[derive(Component, Clone, Debug)]
pub struct Tween {
    pub lens: Lens,
    pub duration: f32,
    pub ease: Ease,
    pub mode: TweenMode,
    elapsed: f32,
}

impl Tween {
    pub fn new(lens: Lens, duration: f32) -> Self {
        Self {
            lens,
            duration,
            ease: Ease::Linear,
            mode: TweenMode::Once,
            elapsed: 0.0,
        }
    }

    pub fn fade(from: f32, to: f32, duration: f32) -> Self {
        Self::new(Lens::Opacity { from, to }, duration)
    }

    pub fn move_to(from: Transform, to: Transform, duration: f32) -> Self {
        Self::new(Lens::Transform { from, to }, duration)
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn ping_pong(mut self) -> Self {
        self.mode = TweenMode::PingPong;
        self
    }

    /// Returns true on the step where a one-shot tween reaches its end.
    pub fn advance(&mut self, dt: f32) -> bool {
        let was_finished = self.is_finished();
        self.elapsed += dt;
        if self.mode == TweenMode::PingPong && self.duration > 0.0 {
            self.elapsed %= 2.0 * self.duration;
        }
        !was_finished && self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.mode == TweenMode::Once && self.elapsed >= self.duration
    }

    /// Eased position between `from` (0) and `to` (1).
    pub fn progress(&self) -> f32 {
        let raw = if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        };
        let t = match self.mode {
            TweenMode::Once => raw.min(1.0),
            TweenMode::PingPong => {
                if self.duration <= 0.0 {
                    0.0
                } else {
                    let cycle = raw % 2.0;
                    if cycle <= 1.0 {
                        cycle
                    } else {
                        2.0 - cycle
                    }
                }
            }
        };
        self.ease.apply(t)
    }
}

/// Transform that scales `rest` by `scale` while keeping the local point
/// `origin` fixed, like a CSS transform-origin.
pub fn zoom_about(rest: Transform, origin: Vec2, scale: f32) -> Transform {
    let mut zoomed = rest;
    zoomed.scale = rest.scale * scale;
    zoomed.translation = rest.translation + (origin * (1.0 - scale)).extend(0.0);
    zoomed
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TweenCompleted {
    pub entity: Entity,
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TweenSet;

pub type OpacityChain<'w, 's> = Query<'w, 's, (Option<&'static Opacity>, Option<&'static Parent>)>;

pub fn inherited_opacity(entity: Entity, chain: &OpacityChain) -> f32 {
    let mut value = 1.0;
    let mut current = Some(entity);
    while let Some(e) = current {
        let Ok((opacity, parent)) = chain.get(e) else {
            break;
        };
        if let Some(opacity) = opacity {
            value *= opacity.0;
        }
        current = parent.map(Parent::get);
    }
    value.clamp(0.0, 1.0)
}

pub struct TweenPlugin;
impl Plugin for TweenPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TweenCompleted>().add_systems(
            Update,
            (
                advance_tweens,
                (apply_sprite_opacity, apply_material_opacity),
            )
                .chain()
                .in_set(TweenSet),
        );
    }
}

fn advance_tweens(
    mut commands: Commands,
    time: Res<Time>,
    mut tweens: Query<(
        Entity,
        &mut Tween,
        Option<&mut Transform>,
        Option<&mut Opacity>,
    )>,
    mut ev_done: EventWriter<TweenCompleted>,
) {
    let dt = time.delta_seconds();
    for (entity, mut tween, transform, opacity) in &mut tweens {
        let finished = tween.advance(dt);
        tween.lens.apply(tween.progress(), transform, opacity);
        if finished {
            commands.entity(entity).remove::<Tween>();
            ev_done.send(TweenCompleted { entity });
        }
    }
}

fn apply_sprite_opacity(mut sprites: Query<(Entity, &mut Sprite), With<Opacity>>, chain: OpacityChain) {
    for (entity, mut sprite) in &mut sprites {
        let alpha = inherited_opacity(entity, &chain);
        if (sprite.color.alpha() - alpha).abs() > f32::EPSILON {
            sprite.color.set_alpha(alpha);
        }
    }
}

fn apply_material_opacity(
    meshes: Query<(Entity, &Handle<ColorMaterial>), With<Opacity>>,
    chain: OpacityChain,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, handle) in &meshes {
        let alpha = inherited_opacity(entity, &chain);
        let Some(current) = materials.get(handle).map(|m| m.color.alpha()) else {
            continue;
        };
        if (current - alpha).abs() > f32::EPSILON {
            if let Some(material) = materials.get_mut(handle) {
                material.color.set_alpha(alpha);
            }
        }
    }
}
