use crate::capture::CaptureHandle;
use crate::connection::{BackendUpdate, ConnectionHandle, ConnectionStatus};
use crate::dashboard::{Dashboard, MessageOutcome};
use crate::frame;
use crate::ui::{footer, header, live_video, stats_panel, styles, tables};
use iced::widget::{column, container, image, row, scrollable};
use iced::{window, Element, Length, Subscription, Task};
use std::sync::mpsc::Receiver;
use std::time::Duration;

// Iced Application State
pub struct GreenGuardian {
    dashboard: Dashboard,
    /// Decoded form of the dashboard's current image
    frame: Option<image::Handle>,
    receiver: Receiver<BackendUpdate>,
    capture: CaptureHandle,
    connection: ConnectionHandle,
}

#[derive(Debug, Clone)]
pub enum Message {
    Tick,
    Refresh,
    TogglePause,
    CloseRequested(window::Id),
}

impl GreenGuardian {
    pub fn new(
        dashboard: Dashboard,
        receiver: Receiver<BackendUpdate>,
        capture: CaptureHandle,
        connection: ConnectionHandle,
    ) -> (Self, Task<Message>) {
        capture.set_paused(dashboard.is_paused());
        (
            GreenGuardian {
                dashboard,
                frame: None,
                receiver,
                capture,
                connection,
            },
            Task::none(),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                // Process all pending updates without blocking
                while let Ok(update) = self.receiver.try_recv() {
                    match update {
                        BackendUpdate::Payload(raw) => self.apply_payload(&raw),
                        BackendUpdate::ConnectionStatus(status) => match status {
                            ConnectionStatus::Connecting => log::debug!("UI: Connecting to backend"),
                            ConnectionStatus::Connected => log::info!("UI: Backend connected"),
                            ConnectionStatus::Closed => log::info!("UI: Backend connection closed"),
                            ConnectionStatus::Error(e) => log::warn!("UI: Connection error: {}", e),
                        },
                    }
                }
                Task::none()
            }
            Message::Refresh => {
                self.dashboard.reset();
                self.frame = None;
                Task::none()
            }
            Message::TogglePause => {
                let paused = self.dashboard.toggle_pause();
                self.capture.set_paused(paused);
                Task::none()
            }
            Message::CloseRequested(id) => {
                self.capture.stop();
                self.connection.close();
                window::close(id)
            }
        }
    }

    fn apply_payload(&mut self, raw: &str) {
        let now_ms = chrono::Utc::now().timestamp_millis();
        if self.dashboard.handle_message(raw, now_ms) != MessageOutcome::Applied {
            return;
        }

        self.frame = match self.dashboard.current_image().map(frame::decode_data_uri) {
            Some(Ok(bytes)) => Some(image::Handle::from_bytes(bytes)),
            Some(Err(e)) => {
                log::warn!("{}", e);
                None
            }
            None => None,
        };
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            iced::time::every(Duration::from_millis(16)).map(|_| Message::Tick),
            window::close_requests().map(Message::CloseRequested),
        ])
    }

    pub fn view(&'_ self) -> Element<'_, Message> {
        let snapshot = self.dashboard.view();

        let video = live_video::view(self.frame.as_ref(), snapshot.paused);
        let detections = tables::detections(snapshot.detections);
        let item_types = tables::item_types(snapshot.item_type_times, snapshot.item_type_percentages);
        let stats = stats_panel::view(snapshot);

        let content = column![
            header::view(),
            header::subtitle(),
            row![video, stats].spacing(16),
            row![detections, item_types].spacing(16),
            footer::view(),
        ]
        .spacing(12)
        .padding(20)
        .max_width(1280.0);

        container(scrollable(container(content).center_x(Length::Fill)))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(styles::page)
            .into()
    }
}
