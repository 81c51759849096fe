use iced::widget::{
    button, column, container, image as image_widget, pick_list, row, slider, text, toggler, Column, Row,
};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use four_split::capture::{self, ImageSource, LibraryPicker, TetherCamera};
use four_split::compose::export_png;
use four_split::state::controller::RecomputeReport;
use four_split::state::records::RecordStore;
use four_split::state::slots::StoreEvent;
use four_split::{AppConfig, CaptureError, FilterKind, ImageHandle, Mode, Session, SourceKind, SLOT_COUNT};

/// Edge of one preview cell in the quad grid
const CELL: f32 = 200.0;

/// Main application state
struct FourSplit {
    /// Slots, filter settings and recompute logic
    session: Session,
    camera: Box<dyn ImageSource>,
    library: Box<dyn ImageSource>,
    /// Bit i is set when slot i changed since its preview was built
    dirty: Arc<AtomicU8>,
    /// GPU-ready copies of the slot images
    previews: [Option<image_widget::Handle>; SLOT_COUNT],
    /// Status message to display to the user
    status: String,
    /// Kept open for the lifetime of the app
    _records: Option<RecordStore>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked "Camera" / "Take Photo"
    OpenCamera,
    /// User clicked "Photo Library"
    OpenLibrary,
    /// User clicked "Image N" in Quad mode
    PickForSlot(usize),
    /// Background decode finished for a capture/pick
    Delivered {
        target: usize,
        source: SourceKind,
        result: Result<ImageHandle, CaptureError>,
    },
    FilterSelected(FilterKind),
    IntensityChanged(f32),
    QuadToggled(bool),
    /// User clicked "Export Grid"
    ExportGrid,
}

impl FourSplit {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = AppConfig::load_or_default(&AppConfig::default_path());

        // The record log is not needed to edit photos, so a broken database
        // only costs a warning
        let records = match RecordStore::open(&config.record_db_path()) {
            Ok(store) => {
                if let Err(err) = store.append_now() {
                    log::warn!("⚠️  Could not append startup record: {err}");
                }
                match store.count() {
                    Ok(count) => log::info!("🎨 FourSplit started ({count} sessions recorded)"),
                    Err(err) => log::warn!("⚠️  Could not count startup records: {err}"),
                }
                Some(store)
            }
            Err(err) => {
                log::warn!("⚠️  Record database unavailable: {err}");
                None
            }
        };

        let mut session = Session::from_config(&config);
        let dirty = Arc::new(AtomicU8::new(0));
        let sink = Arc::clone(&dirty);
        session.store_mut().subscribe(move |event| {
            if let StoreEvent::SlotChanged(index) = *event {
                sink.fetch_or(1 << index, Ordering::Relaxed);
            }
        });

        let camera = TetherCamera::new(config.tether_dir());
        let status = format!("Ready. Camera shots are read from {}", camera.dir().display());

        (
            FourSplit {
                session,
                camera: Box::new(camera),
                library: Box::new(LibraryPicker),
                dirty,
                previews: Default::default(),
                status,
                _records: records,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::OpenCamera => self.present(SourceKind::Camera),
            Message::OpenLibrary => self.present(SourceKind::Library),
            Message::PickForSlot(index) => match self.session.select_slot(index) {
                Ok(()) => self.present(SourceKind::Library),
                Err(err) => {
                    log::error!("{err}");
                    self.status = err.to_string();
                    Task::none()
                }
            },
            Message::Delivered { target, source, result } => {
                match result {
                    Ok(image) => match self.session.deliver(target, source, image) {
                        Ok(report) => {
                            self.status = format!("{source} image placed in slot {}", target + 1);
                            if let Some(report) = report.filter(|r| !r.is_clean()) {
                                self.status = format!("Filter failed on {} slot(s)", report.failed.len());
                            }
                        }
                        Err(err) => {
                            log::error!("{err}");
                            self.status = err.to_string();
                        }
                    },
                    Err(err) => {
                        log::error!("❌ {err}");
                        self.status = err.to_string();
                    }
                }
                Task::none()
            }
            Message::FilterSelected(kind) => {
                let report = self.session.set_filter_kind(kind);
                self.report_recompute(report);
                Task::none()
            }
            Message::IntensityChanged(intensity) => {
                let report = self.session.set_intensity(intensity);
                self.report_recompute(report);
                Task::none()
            }
            Message::QuadToggled(on) => {
                self.session.set_mode(if on { Mode::Quad } else { Mode::Single });
                Task::none()
            }
            Message::ExportGrid => {
                self.export_grid();
                Task::none()
            }
        };

        self.refresh_previews();
        task
    }

    /// Show a capture/pick UI and decode the result in the background
    fn present(&mut self, which: SourceKind) -> Task<Message> {
        let capability = match which {
            SourceKind::Camera => &self.camera,
            SourceKind::Library => &self.library,
        };
        let source = capability.kind();

        // Dismissed: nothing changes
        let Some(path) = capability.present() else {
            return Task::none();
        };

        let target = self.session.target_slot();
        self.status = format!("Loading {}...", path.display());

        Task::perform(capture::load_image(path), move |result| Message::Delivered {
            target,
            source,
            result,
        })
    }

    fn report_recompute(&mut self, report: Option<RecomputeReport>) {
        if let Some(report) = report {
            self.status = if report.is_clean() {
                format!(
                    "{} @ {:.2} applied to {} image(s)",
                    self.session.settings().kind(),
                    self.session.settings().intensity(),
                    report.updated.len()
                )
            } else {
                format!("Filter failed on {} slot(s)", report.failed.len())
            };
        }
    }

    fn export_grid(&mut self) {
        let Some(path) = FileDialog::new()
            .set_title("Export Grid")
            .set_file_name("four-split.png")
            .add_filter("PNG", &["png"])
            .save_file()
        else {
            return;
        };

        self.status = match export_png(&path, &self.session.composite()) {
            Ok(()) => format!("✅ Grid saved to {}", path.display()),
            Err(err) => {
                log::error!("❌ Export failed: {err}");
                format!("Export failed: {err}")
            }
        };
    }

    /// Rebuild previews for slots flagged by the store subscription
    fn refresh_previews(&mut self) {
        let dirty = self.dirty.swap(0, Ordering::Relaxed);
        for index in (0..SLOT_COUNT).filter(|i| dirty & (1 << i) != 0) {
            self.previews[index] = self.session.store().slot_image(index).map(|image| {
                image_widget::Handle::from_rgba(image.width(), image.height(), image.as_bytes().to_vec())
            });
        }
    }

    fn preview_cell(&self, index: usize) -> Element<Message> {
        let content: Element<Message> = match &self.previews[index] {
            Some(handle) => image_widget(handle.clone()).into(),
            None => text(format!("Image {}", index + 1)).size(14).into(),
        };

        container(content)
            .style(container::bordered_box)
            .center_x(Length::Fixed(CELL))
            .center_y(Length::Fixed(CELL))
            .into()
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let quad = self.session.mode().is_quad();
        let settings = self.session.settings();

        let display: Element<Message> = if quad {
            column![
                row![self.preview_cell(0), self.preview_cell(1)].spacing(4),
                row![self.preview_cell(2), self.preview_cell(3)].spacing(4),
            ]
            .spacing(4)
            .into()
        } else if let Some(handle) = &self.previews[0] {
            image_widget(handle.clone()).height(Length::Fill).into()
        } else {
            text("No Image Selected").size(20).into()
        };

        let sources = row![
            button("Camera").on_press(Message::OpenCamera).padding(10),
            button("Photo Library").on_press(Message::OpenLibrary).padding(10),
        ]
        .spacing(10);

        let filters = row![
            pick_list(FilterKind::ALL, Some(settings.kind()), Message::FilterSelected),
            slider(0.0..=1.0, settings.intensity(), Message::IntensityChanged)
                .step(0.01_f32)
                .width(Length::Fixed(240.0)),
            text(if settings.kind().uses_intensity() {
                format!("{:.2}", settings.intensity())
            } else {
                "n/a".to_string()
            })
            .size(14),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let mode_controls: Element<Message> = if quad {
            let slot_buttons: Row<Message> = (0..SLOT_COUNT).fold(Row::new().spacing(8), |r, index| {
                r.push(button(text(format!("Image {}", index + 1))).on_press(Message::PickForSlot(index)))
            });
            column![
                slot_buttons,
                button("Export Grid").on_press(Message::ExportGrid).padding(10),
            ]
            .spacing(10)
            .align_x(Alignment::Center)
            .into()
        } else {
            button("Take Photo").on_press(Message::OpenCamera).padding(10).into()
        };

        let content: Column<Message> = column![
            display,
            sources,
            filters,
            toggler(quad).label("Quad Mode").on_toggle(Message::QuadToggled),
            mode_controls,
            text(&self.status).size(14),
        ]
        .spacing(16)
        .padding(24)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    env_logger::init();

    iced::application("FourSplit", FourSplit::update, FourSplit::view)
        .theme(FourSplit::theme)
        .centered()
        .run_with(FourSplit::new)
}
