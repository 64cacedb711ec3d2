// SPDX-License-Identifier: MPL-2.0
//! Rotating arc drawn on a canvas.
//!
//! The angle is owned by the app and advanced on every tick, so the spinner
//! only moves while something is pending.

use crate::ui::design_tokens::sizing;
use iced::widget::canvas::{self, Canvas, Frame, Geometry, Path, Stroke};
use iced::{mouse, Color, Length, Point, Rectangle, Renderer, Theme};
use std::f32::consts::{PI, TAU};

/// Radians added per tick.
pub const ROTATION_STEP: f32 = 0.12;

/// Segments used to approximate the arc.
const ARC_SEGMENTS: u16 = 30;

/// Advances `angle` by one step, wrapping at a full turn.
#[must_use]
pub fn advance(angle: f32) -> f32 {
    (angle + ROTATION_STEP) % TAU
}

pub struct AnimatedSpinner {
    rotation: f32,
    color: Color,
    size: f32,
}

impl AnimatedSpinner {
    #[must_use]
    pub fn new(color: Color, rotation: f32) -> Self {
        Self {
            rotation,
            color,
            size: sizing::ICON_XL,
        }
    }

    /// Diameter in logical pixels.
    #[must_use]
    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn into_element<'a, Message: 'a>(self) -> iced::Element<'a, Message> {
        let size = self.size;
        Canvas::new(self)
            .width(Length::Fixed(size))
            .height(Length::Fixed(size))
            .into()
    }
}

impl<Message> canvas::Program<Message> for AnimatedSpinner {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let center = frame.center();
        let radius = (frame.width().min(frame.height()) / 2.0 - 3.0).max(1.0);
        let stroke_width = (self.size / 16.0).max(2.0);

        frame.stroke(
            &Path::circle(center, radius),
            Stroke::default().with_width(stroke_width).with_color(Color {
                a: 0.25,
                ..self.color
            }),
        );

        // Quarter-turn offset so a zero angle starts at twelve o'clock.
        let start = self.rotation - PI / 2.0;
        let mut arc = canvas::path::Builder::new();
        arc.move_to(point_on_circle(center, radius, start));
        for i in 1..=ARC_SEGMENTS {
            let t = f32::from(i) / f32::from(ARC_SEGMENTS);
            arc.line_to(point_on_circle(center, radius, start + PI * t));
        }

        frame.stroke(
            &arc.build(),
            Stroke::default()
                .with_width(stroke_width)
                .with_color(self.color)
                .with_line_cap(canvas::LineCap::Round),
        );

        vec![frame.into_geometry()]
    }
}

fn point_on_circle(center: Point, radius: f32, angle: f32) -> Point {
    Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}
