use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Path, Program, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use crate::state::data::{BoxColor, DisplayRect};
use crate::Message;

/// Transparent layer on top of a pane
///
/// Draws the selection box and turns pointer input into messages. Every
/// cursor message carries the layer's bounds, which is the pane viewport.
pub struct SelectionOverlay {
    /// Pane this overlay belongs to
    pub pane: usize,
    /// Box to draw, `None` while the pane is empty
    pub rect: Option<DisplayRect>,
    pub color: BoxColor,
}

impl Program<Message> for SelectionOverlay {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        if let Some(rect) = self.rect {
            let [r, g, b] = self.color.rgb();
            let path = Path::rectangle(
                Point::new(rect.x as f32, rect.y as f32),
                Size::new(rect.width as f32, rect.height as f32),
            );
            frame.stroke(
                &path,
                Stroke::default()
                    .with_color(Color::from_rgb8(r, g, b))
                    .with_width(3.0),
            );
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        _state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let Some(position) = cursor.position_in(bounds) else {
            return (canvas::event::Status::Ignored, None);
        };

        match event {
            // Live cursor: position relative to the pane, plus the pane size
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => (
                canvas::event::Status::Captured,
                Some(Message::CursorMoved {
                    pane: self.pane,
                    position,
                    viewport: bounds.size(),
                }),
            ),

            // Left click freezes / unfreezes every pane
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => (
                canvas::event::Status::Captured,
                Some(Message::ToggleTracking(self.pane)),
            ),

            _ => (canvas::event::Status::Ignored, None),
        }
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}
