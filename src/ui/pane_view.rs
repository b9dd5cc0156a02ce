/// Pane grid rendering
///
/// Each pane is a stack of three layers: the display bitmap centered in the
/// cell, the magnified preview in the corner away from the selection, and
/// the selection overlay canvas on top where mouse input lands.
use iced::widget::image::{FilterMethod, Handle, Image};
use iced::widget::{container, text, Canvas, Column, Row, Space, Stack};
use iced::{Alignment, ContentFit, Element, Length, Padding};
use image::RgbaImage;

use super::canvas::SelectionOverlay;
use crate::config::UiMetrics;
use crate::state::data::grid_shape;
use crate::state::pane::Pane;
use crate::state::session::Session;
use crate::Message;

/// GPU handles for one pane
///
/// Handles are rebuilt only when the underlying bitmaps change, so plain
/// cursor motion does not re-upload the display image.
#[derive(Debug, Clone, Default)]
pub struct PaneHandles {
    pub display: Option<Handle>,
    pub magnified: Option<Handle>,
}

fn to_handle(image: &RgbaImage) -> Handle {
    Handle::from_rgba(image.width(), image.height(), image.as_raw().clone())
}

impl PaneHandles {
    pub fn from_pane(pane: &Pane) -> Self {
        Self {
            display: pane.display().map(to_handle),
            magnified: pane.magnified().map(to_handle),
        }
    }

    pub fn refresh_magnified(&mut self, pane: &Pane) {
        self.magnified = pane.magnified().map(to_handle);
    }
}

fn pane_cell<'a>(pane: &'a Pane, handles: &'a PaneHandles, metrics: &UiMetrics) -> Element<'a, Message> {
    let base: Element<'a, Message> = match &handles.display {
        Some(handle) => Image::new(handle.clone())
            .content_fit(ContentFit::None)
            .into(),
        None => text(pane.label()).size(metrics.font_size).into(),
    };

    let mut layers: Vec<Element<'a, Message>> = vec![container(base)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()];

    if let Some(handle) = &handles.magnified {
        let (x, y) = pane.magnifier_origin();
        let preview = Image::new(handle.clone())
            .content_fit(ContentFit::None)
            .filter_method(FilterMethod::Nearest);

        layers.push(
            container(preview)
                .padding(Padding {
                    top: y.max(0) as f32,
                    right: 0.0,
                    bottom: 0.0,
                    left: x.max(0) as f32,
                })
                .width(Length::Fill)
                .height(Length::Fill)
                .align_x(Alignment::Start)
                .align_y(Alignment::Start)
                .clip(true)
                .into(),
        );
    }

    let overlay = SelectionOverlay {
        pane: pane.index(),
        rect: pane.has_image().then(|| pane.selection_rect()),
        color: pane.box_color(),
    };
    layers.push(
        Canvas::new(overlay)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
    );

    Stack::with_children(layers)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Lay the panes out row-major; unused cells stay empty so every pane
/// gets the same viewport
pub fn pane_grid<'a>(
    session: &'a Session,
    handles: &'a [PaneHandles],
    metrics: &UiMetrics,
) -> Element<'a, Message> {
    let (rows, cols) = grid_shape(session.pane_count());
    let mut grid = Column::new().spacing(4);

    for r in 0..rows {
        let mut line = Row::new().spacing(4).height(Length::FillPortion(1));
        for c in 0..cols {
            let index = r * cols + c;
            let cell: Element<'a, Message> = match (session.pane(index), handles.get(index)) {
                (Some(pane), Some(pane_handles)) => pane_cell(pane, pane_handles, metrics),
                _ => Space::new(Length::Fill, Length::Fill).into(),
            };
            line = line.push(
                container(cell)
                    .width(Length::FillPortion(1))
                    .height(Length::Fill)
                    .style(container::bordered_box),
            );
        }
        grid = grid.push(line);
    }

    grid.width(Length::Fill).height(Length::Fill).into()
}
