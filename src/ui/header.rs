use crate::app::Message;
use crate::ui::styles;
use iced::widget::{button, horizontal_space, row, text};
use iced::{alignment, Alignment, Element, Length};

const TITLE: &str = "Team 8-490 Trash Inference Dashboard";
const SUBTITLE: &str = "Real-time YOLOv8-powered Detection and Classification";

pub fn view<'a>() -> Element<'a, Message> {
    let refresh = button(text("Refresh").size(14))
        .on_press(Message::Refresh)
        .padding([6, 12])
        .style(styles::refresh_button_style());

    row![
        text(TITLE).size(30).color(styles::TITLE_TEXT),
        horizontal_space(),
        refresh
    ]
    .align_y(Alignment::Center)
    .width(Length::Fill)
    .into()
}

pub fn subtitle<'a>() -> Element<'a, Message> {
    text(SUBTITLE)
        .size(15)
        .color(styles::HEADING_TEXT)
        .width(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .into()
}
