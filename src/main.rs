use chrono::Local;
use iced::widget::{button, column, container, row, text, text_input, Column};
use iced::{Alignment, Element, Length, Point, Size, Task, Theme};
use rfd::FileDialog;

mod config;
mod diff;
mod error;
mod io;
mod state;
mod ui;
mod zoom;

use config::{UiMetrics, ViewerConfig};
use error::ViewerError;
use io::export::default_file_name;
use state::data::{
    grid_shape, parse_pane_count, Interpolation, SelectionBox, ZoomSettings, MAX_PANES, MIN_PANES,
};
use state::session::Session;
use ui::{BoxInputs, PaneHandles};

/// Main application state
struct MultiViewer {
    config: ViewerConfig,
    metrics: UiMetrics,
    screen: Screen,
    /// Status message to display to the user
    status: String,
}

enum Screen {
    /// Asking how many folders to compare
    Setup(SetupForm),
    /// Pane grid plus side panel
    Compare(Comparison),
}

#[derive(Debug, Default)]
struct SetupForm {
    input: String,
    error: Option<String>,
}

impl SetupForm {
    fn from_config(config: &ViewerConfig) -> Self {
        Self {
            input: config.pane_count.map(|n| n.to_string()).unwrap_or_default(),
            error: None,
        }
    }
}

struct Comparison {
    session: Session,
    handles: Vec<PaneHandles>,
    box_inputs: BoxInputs,
}

impl Comparison {
    fn new(pane_count: usize, config: &ViewerConfig) -> Self {
        let settings = config.zoom_settings();
        let session = Session::new(
            pane_count,
            settings,
            config.listing_mode,
            config.fallback_viewport,
        )
        .with_diff_policy(config.diff_policy);
        let handles = session.panes().map(PaneHandles::from_pane).collect();

        Self {
            session,
            handles,
            box_inputs: BoxInputs {
                width: settings.select_box.width.to_string(),
                height: settings.select_box.height.to_string(),
            },
        }
    }

    /// Rebuild every image handle (new files, new viewport, diff toggled)
    fn refresh_handles(&mut self) {
        self.handles = self.session.panes().map(PaneHandles::from_pane).collect();
    }

    /// Rebuild only the magnified previews
    fn refresh_magnifiers(&mut self) {
        for (handles, pane) in self.handles.iter_mut().zip(self.session.panes()) {
            handles.refresh_magnified(pane);
        }
    }
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    PaneCountChanged(String),
    StartComparison,
    /// Choose the directory for a pane
    PickFolder(usize),
    FileSelected(String),
    /// Cursor position inside a pane, with that pane's size
    CursorMoved {
        pane: usize,
        position: Point,
        viewport: Size,
    },
    /// Click inside a pane: freeze or resume all panes
    ToggleTracking(usize),
    EnlargeChanged(u8),
    BoxWidthChanged(String),
    BoxHeightChanged(String),
    ApplyBox,
    InterpolationToggled(bool),
    DiffToggled(bool),
    SaveComparison,
    /// Back to the folder count prompt
    Reset,
    Quit,
}

/// One-line summary of per-pane problems
fn with_warnings(message: String, warnings: &[ViewerError]) -> String {
    match warnings {
        [] => message,
        [only] => format!("{} (⚠️ {})", message, only),
        [first, rest @ ..] => format!("{} (⚠️ {} and {} more)", message, first, rest.len()),
    }
}

impl MultiViewer {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = ViewerConfig::load();
        let metrics = UiMetrics::from_config(&config);

        log::info!("🎨 Multi-Viewer initialized");

        (
            MultiViewer {
                screen: Screen::Setup(SetupForm::from_config(&config)),
                config,
                metrics,
                status: String::from("Ready."),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PaneCountChanged(input) => {
                if let Screen::Setup(form) = &mut self.screen {
                    form.input = input;
                }
                return Task::none();
            }
            Message::StartComparison => {
                let parsed = match &self.screen {
                    Screen::Setup(form) => parse_pane_count(&form.input),
                    Screen::Compare(_) => return Task::none(),
                };
                match parsed {
                    Ok(count) => {
                        self.screen = Screen::Compare(Comparison::new(count, &self.config));
                        self.status = format!("Pick a folder for each of the {} panes.", count);
                    }
                    Err(e) => {
                        log::warn!("⚠️  Rejected pane count: {}", e);
                        if let Screen::Setup(form) = &mut self.screen {
                            form.error = Some(e.to_string());
                        }
                    }
                }
                return Task::none();
            }
            Message::Reset => {
                log::info!("🔄 Session reset");
                self.screen = Screen::Setup(SetupForm::from_config(&self.config));
                self.status = String::from("Ready.");
                return Task::none();
            }
            Message::Quit => return iced::exit(),
            _ => {}
        }

        let Screen::Compare(cmp) = &mut self.screen else {
            return Task::none();
        };

        match message {
            Message::PickFolder(index) => {
                let folder = FileDialog::new()
                    .set_title(format!("Select folder for pane {}", index + 1))
                    .pick_folder();

                if let Some(folder) = folder {
                    match cmp.session.set_directory(index, folder) {
                        Ok(()) => {
                            self.status =
                                format!("{} shared images.", cmp.session.filenames().len());
                        }
                        Err(e) => {
                            log::error!("❌ Listing failed: {}", e);
                            self.status = format!("❌ {}", e);
                        }
                    }
                    cmp.refresh_handles();
                }
            }
            Message::FileSelected(name) => {
                let warnings = cmp.session.select_file(&name);
                cmp.refresh_handles();
                self.status = with_warnings(format!("Showing {}", name), &warnings);
            }
            Message::CursorMoved {
                pane,
                position,
                viewport,
            } => {
                let viewport = (viewport.width as u32, viewport.height as u32);
                let resized = cmp.session.pane(pane).map(|p| p.viewport()) != Some(viewport);
                if resized {
                    cmp.session.resize(viewport);
                }

                let moved = cmp
                    .session
                    .cursor_moved(pane, position.x as i32, position.y as i32);

                if resized {
                    cmp.refresh_handles();
                } else if moved {
                    cmp.refresh_magnifiers();
                }
            }
            Message::ToggleTracking(pane) => {
                if let Some(ready) = cmp.session.toggle_tracking(pane) {
                    self.status = if ready.0 {
                        String::from("🔒 Frozen. Comparison ready to save.")
                    } else {
                        String::from("Tracking.")
                    };
                    cmp.refresh_magnifiers();
                }
            }
            Message::EnlargeChanged(value) => {
                cmp.session
                    .set_enlarge_ratio(ZoomSettings::ratio_from_slider(value));
                cmp.refresh_magnifiers();
            }
            Message::BoxWidthChanged(width) => cmp.box_inputs.width = width,
            Message::BoxHeightChanged(height) => cmp.box_inputs.height = height,
            Message::ApplyBox => {
                match SelectionBox::parse(&cmp.box_inputs.width, &cmp.box_inputs.height) {
                    Ok(select_box) => {
                        cmp.session.set_select_box(select_box);
                        cmp.refresh_magnifiers();
                        self.status =
                            format!("Selection box {}x{}", select_box.width, select_box.height);
                    }
                    Err(e) => self.status = format!("❌ {}", e),
                }
            }
            Message::InterpolationToggled(smooth) => {
                cmp.session.set_interpolation(Interpolation::from_flag(smooth));
                cmp.refresh_magnifiers();
            }
            Message::DiffToggled(enabled) => {
                let warnings = cmp.session.set_diff_enabled(enabled);
                cmp.refresh_handles();
                let message = if enabled {
                    match cmp.session.diff_range() {
                        Some((min, max)) => format!("Showing differences (raw range {}..={})", min, max),
                        None => String::from("Showing differences"),
                    }
                } else {
                    String::from("Showing originals")
                };
                self.status = with_warnings(message, &warnings);
            }
            Message::SaveComparison => {
                let batch = match cmp.session.comparison_batch() {
                    Ok(batch) => batch,
                    Err(e) => {
                        self.status = format!("❌ {}", e);
                        return Task::none();
                    }
                };

                let path = FileDialog::new()
                    .set_title("Save comparison")
                    .set_file_name(default_file_name(Local::now().naive_local()))
                    .add_filter("PNG", &["png"])
                    .add_filter("JPEG", &["jpg", "jpeg"])
                    .add_filter("BMP", &["bmp"])
                    .save_file();

                if let Some(path) = path {
                    let (_, columns) = grid_shape(cmp.session.pane_count());
                    self.status = match batch.save(&path, columns) {
                        Ok(()) => format!("✅ Saved {} to {}", batch.kind.describe(), path.display()),
                        Err(e) => {
                            log::error!("❌ Save failed: {}", e);
                            format!("❌ {}", e)
                        }
                    };
                }
            }
            Message::PaneCountChanged(_)
            | Message::StartComparison
            | Message::Reset
            | Message::Quit => {}
        }

        Task::none()
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        match &self.screen {
            Screen::Setup(form) => self.setup_view(form),
            Screen::Compare(cmp) => row![
                ui::controls::side_panel(&cmp.session, &cmp.box_inputs, &self.status, &self.metrics),
                ui::pane_view::pane_grid(&cmp.session, &cmp.handles, &self.metrics),
            ]
            .spacing(8)
            .padding(8)
            .into(),
        }
    }

    fn setup_view<'a>(&'a self, form: &'a SetupForm) -> Element<'a, Message> {
        let mut content: Column<Message> = column![
            text("Multi-Viewer").size(self.metrics.heading() * 2.0),
            text(format!(
                "How many folders do you want to compare ({}-{})?",
                MIN_PANES, MAX_PANES
            ))
            .size(self.metrics.font_size),
            text_input("Number of folders", &form.input)
                .size(self.metrics.font_size)
                .on_input(Message::PaneCountChanged)
                .on_submit(Message::StartComparison)
                .width(Length::Fixed(240.0)),
            button("Start")
                .on_press(Message::StartComparison)
                .padding(10),
        ]
        .spacing(20)
        .padding(40)
        .align_x(Alignment::Center);

        if let Some(error) = &form.error {
            content = content.push(text(format!("❌ {}", error)).size(self.metrics.font_size));
        }

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    env_logger::init();

    iced::application("Multi-Viewer", MultiViewer::update, MultiViewer::view)
        .theme(MultiViewer::theme)
        .centered()
        .run_with(MultiViewer::new)
}
