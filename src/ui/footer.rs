use crate::app::Message;
use crate::ui::styles;
use chrono::{Datelike, Local};
use iced::widget::text;
use iced::{alignment, Element, Length};

pub fn view<'a>() -> Element<'a, Message> {
    text(footer_text(Local::now().year()))
        .size(13)
        .color(styles::FOOTER_TEXT)
        .width(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .into()
}

fn footer_text(year: i32) -> String {
    format!("\u{a9} {} Green Guardian.", year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer_text() {
        assert_eq!(footer_text(2025), "© 2025 Green Guardian.");
    }
}
