// src/main.rs
use std::path::PathBuf;

use chrono::Local;
use iced::alignment::Horizontal;
use iced::widget::{button, column, container, row, scrollable, text, Column, Row, Space};
use iced::{
    executor, theme, window, Application, Background, Color, Command, Element, Length, Settings,
    Theme,
};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use sample_viewer::config::{
    APP_TITLE, DEFAULT_LOG_FILTER, SUPPORTED_EXTENSIONS, VERSION, WINDOW_SIZE,
};
use sample_viewer::{
    export_sample, load_sample, ExportError, ExportFormat, FileFormat, Sample, Session,
    UploadOutcome, UploadTicket,
};

mod ui;

use ui::{palette, Styles};

pub fn main() -> iced::Result {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!(version = VERSION, "startup");

    SampleViewer::run(Settings {
        window: window::Settings {
            size: WINDOW_SIZE,
            resizable: true,
            ..Default::default()
        },
        ..Settings::default()
    })
}

struct SampleViewer {
    is_dark_mode: bool,
    /// Owns the sample on screen. Replaced on every upload, read by every export.
    session: Session,
}

#[derive(Debug, Clone)]
enum Message {
    ToggleTheme,
    OpenFile,
    SampleLoaded(UploadTicket, Sample),
    Export(ExportFormat),
}

impl Application for SampleViewer {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ();

    fn new(_flags: ()) -> (Self, Command<Message>) {
        (
            SampleViewer {
                is_dark_mode: true,
                session: Session::new(),
            },
            Command::none(),
        )
    }

    fn title(&self) -> String {
        format!("{} v{}", APP_TITLE, VERSION)
    }

    fn theme(&self) -> Theme {
        if self.is_dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::ToggleTheme => {
                self.is_dark_mode = !self.is_dark_mode;
                Command::none()
            }

            Message::OpenFile => {
                let Some(ticket) = self.session.begin_upload() else {
                    return Command::none();
                };

                let mut dialog = FileDialog::new()
                    .set_title("Select a file")
                    .add_filter("All Supported Files", SUPPORTED_EXTENSIONS);
                for format in FileFormat::ALL {
                    let (name, extensions) = format.filter();
                    dialog = dialog.add_filter(name, extensions);
                }

                match dialog.pick_file() {
                    Some(path) => Command::perform(read_sample(path), move |sample| {
                        Message::SampleLoaded(ticket, sample)
                    }),
                    None => {
                        self.session.cancel_upload(ticket);
                        Command::none()
                    }
                }
            }

            Message::SampleLoaded(ticket, sample) => {
                match self.session.finish_upload(ticket, sample) {
                    UploadOutcome::Shown => {}
                    UploadOutcome::Empty => notify(
                        MessageLevel::Warning,
                        "Warning",
                        "No data to display or unsupported format.",
                    ),
                    UploadOutcome::Stale => warn!("discarding result of a superseded upload"),
                }
                Command::none()
            }

            Message::Export(format) => {
                self.export(format);
                Command::none()
            }
        }
    }

    fn view(&self) -> Element<Message> {
        let styles = palette(self.is_dark_mode);

        let toolbar = row![
            text("Upload a file (CSV, Excel, TXT, XML, DOCX):")
                .size(16)
                .style(styles.fg),
            Space::with_width(Length::Fill),
            toolbar_button(
                "Upload File",
                (!self.session.is_loading()).then_some(Message::OpenFile),
                styles,
            ),
            toolbar_button(
                if self.is_dark_mode {
                    "Switch to Light Mode"
                } else {
                    "Switch to Dark Mode"
                },
                Some(Message::ToggleTheme),
                styles,
            ),
        ]
        .spacing(10)
        .padding(10)
        .align_items(iced::Alignment::Center);

        let downloads = row![
            Space::with_width(Length::Fill),
            toolbar_button("Download as CSV", Some(Message::Export(ExportFormat::Csv)), styles),
            toolbar_button("Download as TXT", Some(Message::Export(ExportFormat::Text)), styles),
            toolbar_button("Download as PDF", Some(Message::Export(ExportFormat::Pdf)), styles),
        ]
        .spacing(10)
        .padding(10);

        let content = column![
            container(toolbar).style(fill(styles.toolbar_bg, styles.toolbar_bg)),
            text(self.status_line()).size(14).style(styles.fg),
            self.render_table(styles),
            container(downloads).style(fill(styles.toolbar_bg, styles.toolbar_bg)),
        ]
        .spacing(5);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(fill(styles.bg, styles.bg))
            .into()
    }
}

impl SampleViewer {
    fn export(&self, format: ExportFormat) {
        let Some(sample) = self.session.sample().filter(|s| !s.is_empty()) else {
            notify(MessageLevel::Warning, "Warning", "No data to save.");
            return;
        };

        let default_name = format!(
            "sample-{}.{}",
            Local::now().format("%Y%m%d-%H%M%S"),
            format.extension()
        );
        let Some(path) = FileDialog::new()
            .set_title(format!("Save {}", format))
            .add_filter(format.filter_name(), &[format.extension()])
            .set_file_name(default_name)
            .save_file()
        else {
            return;
        };

        match export_sample(sample, format, &path) {
            Ok(written) => notify(
                MessageLevel::Info,
                "Success",
                &format!("File saved as {}", written.display()),
            ),
            Err(ExportError::NoData) => notify(MessageLevel::Warning, "Warning", "No data to save."),
            Err(err) => {
                error!(path = %path.display(), error = %err, "export failed");
                notify(
                    MessageLevel::Error,
                    "Error",
                    &format!("Error saving {}: {}", format, err),
                );
            }
        }
    }

    fn status_line(&self) -> String {
        if self.session.is_loading() {
            return "Parsing…".to_string();
        }
        match self.session.sample() {
            Some(sample) if sample.population_size > 0 => {
                let name = sample
                    .source
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                format!(
                    "Showing {} of {} records from {}",
                    sample.len(),
                    sample.population_size,
                    name
                )
            }
            Some(_) => String::new(),
            None => "No file loaded.".to_string(),
        }
    }

    fn render_table(&self, styles: &Styles) -> Element<Message> {
        let Some(table) = self.session.table() else {
            return Space::with_height(Length::Fill).into();
        };

        let headers = Row::with_children(
            table
                .headers
                .iter()
                .map(|header| {
                    container(text(header).size(14).style(styles.header_fg))
                        .width(Length::FillPortion(1))
                        .padding(6)
                        .style(fill(styles.header_bg, styles.grid))
                        .into()
                })
                .collect(),
        );

        let rows = table.rows.iter().map(|cells| {
            Row::with_children(
                cells
                    .iter()
                    .map(|cell| {
                        container(text(cell).size(13).style(styles.fg))
                            .width(Length::FillPortion(1))
                            .padding(5)
                            .style(fill(styles.bg, styles.grid))
                            .into()
                    })
                    .collect(),
            )
            .into()
        });

        let body = Column::with_children(rows.collect());

        column![headers, scrollable(body).height(Length::Fill)]
            .height(Length::Fill)
            .padding([0, 10])
            .into()
    }
}

async fn read_sample(path: PathBuf) -> Sample {
    let shown = path.clone();
    tokio::task::spawn_blocking(move || load_sample(&path))
        .await
        .unwrap_or_else(|err| {
            error!(path = %shown.display(), error = %err, "parser task failed");
            Sample::message(format!("Error parsing file: {}", err)).with_source(shown)
        })
}

fn notify(level: MessageLevel, title: &str, description: &str) {
    if matches!(level, MessageLevel::Warning) {
        warn!("{}", description);
    }
    let _ = MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

/// A button with no message is drawn disabled.
fn toolbar_button<'a>(
    label: &'a str,
    message: Option<Message>,
    styles: &Styles,
) -> Element<'a, Message> {
    let mut widget = button(
        text(label)
            .size(15)
            .horizontal_alignment(Horizontal::Center),
    );
    if let Some(message) = message {
        widget = widget.on_press(message);
    }

    widget
        .padding([8, 16])
        .style(theme::Button::Custom(Box::new(ButtonStyle {
            bg: styles.button_bg,
            fg: styles.button_fg,
            hover_bg: styles.button_hover,
        })))
        .into()
}

fn fill(bg: Color, border: Color) -> theme::Container {
    theme::Container::Custom(Box::new(ContainerStyle { bg, border }))
}

struct ContainerStyle {
    bg: Color,
    border: Color,
}

impl container::StyleSheet for ContainerStyle {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            background: Some(Background::Color(self.bg)),
            border_width: 0.5,
            border_color: self.border,
            ..Default::default()
        }
    }
}

struct ButtonStyle {
    bg: Color,
    fg: Color,
    hover_bg: Color,
}

impl button::StyleSheet for ButtonStyle {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(self.bg)),
            border_radius: 6.0.into(),
            text_color: self.fg,
            ..Default::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(self.hover_bg)),
            ..self.active(style)
        }
    }
}
