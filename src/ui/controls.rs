/// Side panel: folder pickers, the shared file list and the zoom controls
use iced::widget::{button, checkbox, row, scrollable, slider, text, text_input, Column};
use iced::{Alignment, Element, Length};

use crate::config::UiMetrics;
use crate::state::data::{ENLARGE_SLIDER_MAX, ENLARGE_SLIDER_MIN};
use crate::state::session::Session;
use crate::Message;

/// Text currently typed into the box size fields
#[derive(Debug, Clone, Default)]
pub struct BoxInputs {
    pub width: String,
    pub height: String,
}

pub fn side_panel<'a>(
    session: &'a Session,
    inputs: &'a BoxInputs,
    status: &'a str,
    metrics: &UiMetrics,
) -> Element<'a, Message> {
    let size = metrics.font_size;
    let settings = session.settings();

    let folders = session.panes().fold(Column::new().spacing(4), |col, pane| {
        col.push(
            button(text(pane.label()).size(size))
                .width(Length::Fill)
                .style(button::secondary)
                .on_press(Message::PickFolder(pane.index())),
        )
    });

    let files = session
        .filenames()
        .iter()
        .fold(Column::new().spacing(2), |col, name| {
            let style = if session.selected() == Some(name.as_str()) {
                button::primary
            } else {
                button::text
            };
            col.push(
                button(text(name.as_str()).size(size))
                    .width(Length::Fill)
                    .style(style)
                    .on_press(Message::FileSelected(name.clone())),
            )
        });

    let box_size = row![
        text_input("Width", &inputs.width)
            .size(size)
            .on_input(Message::BoxWidthChanged)
            .on_submit(Message::ApplyBox),
        text_input("Height", &inputs.height)
            .size(size)
            .on_input(Message::BoxHeightChanged)
            .on_submit(Message::ApplyBox),
        button(text("Set").size(size)).on_press(Message::ApplyBox),
    ]
    .spacing(4)
    .align_y(Alignment::Center);

    let tracking = if session.is_tracking() {
        "Tracking (click a pane to freeze)"
    } else {
        "Frozen (click a pane to resume)"
    };

    Column::new()
        .push(text("Folders").size(metrics.heading()))
        .push(folders)
        .push(text(format!("Images ({})", session.filenames().len())).size(size))
        .push(scrollable(files).height(Length::Fill))
        .push(text(format!("Enlarge ratio: {:.1}x", settings.enlarge_ratio)).size(size))
        .push(slider(
            ENLARGE_SLIDER_MIN..=ENLARGE_SLIDER_MAX,
            settings.slider_value(),
            Message::EnlargeChanged,
        ))
        .push(text("Selection box").size(size))
        .push(box_size)
        .push(
            checkbox("Smooth magnifier", settings.interpolation.is_smooth())
                .text_size(size)
                .on_toggle(Message::InterpolationToggled),
        )
        .push(
            checkbox("Difference vs. first folder", session.diff_enabled())
                .text_size(size)
                .on_toggle(Message::DiffToggled),
        )
        .push(text(tracking).size(size))
        .push(
            button(text("Save comparison").size(size))
                .width(Length::Fill)
                .on_press_maybe(session.comparison_ready().then_some(Message::SaveComparison)),
        )
        .push(
            row![
                button(text("Reset").size(size))
                    .style(button::secondary)
                    .on_press(Message::Reset),
                button(text("Quit").size(size))
                    .style(button::danger)
                    .on_press(Message::Quit),
            ]
            .spacing(8),
        )
        .push(text(status).size(size))
        .spacing(10)
        .padding(10)
        .width(Length::Fixed(280.0))
        .into()
}
