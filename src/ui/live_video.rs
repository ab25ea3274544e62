use crate::app::Message;
use crate::ui::styles;
use iced::widget::{button, column, container, horizontal_space, image, row, text};
use iced::{Alignment, Element, Length};

/// Annotated backend frame, or a placeholder until the first one arrives
pub fn view<'a>(frame: Option<&image::Handle>, is_paused: bool) -> Element<'a, Message> {
    let toggle = button(text(if is_paused { "Resume" } else { "Pause" }).size(14))
        .on_press(Message::TogglePause)
        .padding([4, 12])
        .style(styles::pause_button_style(is_paused));

    let title_bar = row![
        text("Live Video Feed").size(18).color(styles::HEADING_TEXT),
        horizontal_space(),
        toggle
    ]
    .align_y(Alignment::Center);

    let body: Element<'a, Message> = match frame {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .content_fit(iced::ContentFit::Contain)
            .into(),
        None => container(text("Waiting for live video feed...").color(styles::MUTED_TEXT))
            .center_x(Length::Fill)
            .padding([48, 0])
            .into(),
    };

    container(column![title_bar, body].spacing(8))
        .padding(12)
        .width(Length::Fill)
        .style(styles::card)
        .into()
}
