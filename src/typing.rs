//! Per-character "typing glow" reveal for the machine's screen text.

use bevy::color::Alpha;
use bevy::prelude::*;

use crate::tween::{inherited_opacity, Ease, OpacityChain};

/// Seconds after mount at which each character of each line starts fading in.
/// Lines run side by side; characters within a line are `stagger` apart.
pub fn reveal_schedule(lines: &[String], delay: f32, stagger: f32) -> Vec<Vec<f32>> {
    lines
        .iter()
        .map(|line| {
            (0..line.chars().count())
                .map(|i| delay + i as f32 * stagger)
                .collect()
        })
        .collect()
}

#[derive(Component, Clone, Debug)]
pub struct TypingReveal {
    starts: Vec<f32>,
    fade: f32,
    color: Color,
    elapsed: f32,
}

impl TypingReveal {
    pub fn new(starts: Vec<f32>, fade: f32, color: Color) -> Self {
        Self {
            starts,
            fade,
            color,
            elapsed: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn alpha(&self, index: usize) -> f32 {
        let Some(start) = self.starts.get(index) else {
            return 0.0;
        };
        if self.fade <= 0.0 {
            return if self.elapsed >= *start { 1.0 } else { 0.0 };
        }
        Ease::CubicOut.apply((self.elapsed - start) / self.fade)
    }
}

/// One text section per character so each can fade on its own.
pub fn letter_sections(line: &str, style: &TextStyle) -> Vec<TextSection> {
    line.chars()
        .map(|c| {
            TextSection::new(
                c.to_string(),
                TextStyle {
                    color: style.color.with_alpha(0.0),
                    ..style.clone()
                },
            )
        })
        .collect()
}

pub fn typewriter(
    time: Res<Time>,
    mut lines: Query<(Entity, &mut TypingReveal, &mut Text)>,
    chain: OpacityChain,
) {
    let dt = time.delta_seconds();
    for (entity, mut reveal, mut text) in &mut lines {
        reveal.advance(dt);
        let fade = inherited_opacity(entity, &chain);
        for (i, section) in text.sections.iter_mut().enumerate() {
            let alpha = reveal.alpha(i) * fade;
            if (section.style.color.alpha() - alpha).abs() > f32::EPSILON {
                section.style.color = reveal.color.with_alpha(alpha);
            }
        }
    }
}
