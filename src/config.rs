use std::time::Duration;

use bevy::prelude::*;

pub const BACKGROUND_PATH: &str = "background.jpg";
pub const ARCADE_PATH: &str = "arcade.png";

/// A point on the machine frame in percent, measured from the top-left
/// corner the way the artwork is laid out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameAnchor {
    pub left: f32,
    pub top: f32,
}

impl FrameAnchor {
    pub const fn new(left: f32, top: f32) -> Self {
        Self { left, top }
    }

    /// Position relative to the frame center, y up.
    pub fn to_local(self, frame: Vec2) -> Vec2 {
        Vec2::new(
            (self.left / 100.0 - 0.5) * frame.x,
            (0.5 - self.top / 100.0) * frame.y,
        )
    }
}

#[derive(Resource, Clone, Debug)]
pub struct IntroSettings {
    pub lines: Vec<String>,
    pub background_path: String,
    pub arcade_path: String,
    /// Logical size of the arcade artwork.
    pub frame_size: Vec2,

    pub text_anchor: FrameAnchor,
    pub text_width: f32, // percent of frame width
    pub font_size: f32,
    pub line_gap: f32,
    pub text_color: Color,
    /// HDR multiplier on the text color; the camera's bloom turns it into a glow.
    pub text_glow: f32,

    pub arrow_anchor: FrameAnchor,
    pub arrow_size: f32,
    pub arrow_color: Color,

    pub hotspot_anchor: FrameAnchor,
    pub hotspot_size: Vec2,

    // Typing reveal
    pub reveal_delay: f32,
    pub letter_stagger: f32,
    pub letter_fade: f32,

    // Arrow bob
    pub arrow_bob: f32,
    pub arrow_period: f32,

    pub mount_fade: f32,

    // Press
    pub press_delay: f32,
    pub press_depth: f32,
    pub press_squash: f32,
    pub press_duration: f32,
    pub text_fade_out: f32,

    // Zoom
    pub art_fade_out: f32,
    pub scene_fade_out: f32,
    pub zoom_scale: f32,
    pub zoom_duration: f32,
    pub zoom_origin: FrameAnchor,
}

impl Default for IntroSettings {
    fn default() -> Self {
        let yellow = Color::srgb_u8(0xfd, 0xe0, 0x47);
        Self {
            lines: vec!["LET'S".into(), "PLAY A".into(), "GAME".into()],
            background_path: BACKGROUND_PATH.into(),
            arcade_path: ARCADE_PATH.into(),
            frame_size: Vec2::new(512.0, 768.0),
            text_anchor: FrameAnchor::new(50.0, 27.0),
            text_width: 45.0,
            font_size: 30.0,
            line_gap: 4.0,
            text_color: yellow,
            text_glow: 2.5,
            arrow_anchor: FrameAnchor::new(50.0, 48.0),
            arrow_size: 48.0,
            arrow_color: yellow,
            hotspot_anchor: FrameAnchor::new(50.0, 53.0),
            hotspot_size: Vec2::new(64.0, 80.0),
            reveal_delay: 0.5,
            letter_stagger: 0.15,
            letter_fade: 3.0,
            arrow_bob: 10.0,
            arrow_period: 1.2,
            mount_fade: 0.3,
            press_delay: 0.3,
            press_depth: 8.0,
            press_squash: 0.9,
            press_duration: 0.2,
            text_fade_out: 0.1,
            art_fade_out: 0.3,
            scene_fade_out: 0.5,
            zoom_scale: 10.0,
            zoom_duration: 0.8,
            zoom_origin: FrameAnchor::new(50.0, 38.0),
        }
    }
}

impl IntroSettings {
    /// Left edge of the text block, top of the first line.
    pub fn text_origin(&self) -> Vec2 {
        let half_width = self.frame_size.x * self.text_width / 100.0 / 2.0;
        self.text_anchor.to_local(self.frame_size) - Vec2::X * half_width
    }

    pub fn glow_color(&self) -> Color {
        let base = self.text_color.to_linear();
        Color::LinearRgba(LinearRgba::new(
            base.red * self.text_glow,
            base.green * self.text_glow,
            base.blue * self.text_glow,
            base.alpha,
        ))
    }

    /// Whole milliseconds, so frame-stepped timers land exactly on the delay.
    pub fn press_delay_duration(&self) -> Duration {
        Duration::from_millis((self.press_delay.max(0.0) * 1000.0).round() as u64)
    }

    pub fn line_height(&self) -> f32 {
        self.font_size * 1.25 + self.line_gap
    }

    /// Anchors pin the top edge of the arrow and hotspot; these return centers.
    pub fn arrow_center(&self) -> Vec2 {
        self.arrow_anchor.to_local(self.frame_size) - Vec2::Y * self.arrow_size / 2.0
    }

    pub fn hotspot_center(&self) -> Vec2 {
        self.hotspot_anchor.to_local(self.frame_size) - Vec2::Y * self.hotspot_size.y / 2.0
    }

    pub fn zoom_origin_local(&self) -> Vec2 {
        self.zoom_origin.to_local(self.frame_size)
    }
}
