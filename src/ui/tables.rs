//! Detail tables under the video feed.

use crate::app::Message;
use crate::detection::Detection;
use crate::stats::{format_time, ItemTypePercentages, ItemTypeTimes};
use crate::ui::styles;
use iced::widget::{column, container, row, text, Column};
use iced::{Element, Length};

pub fn detections<'a>(detections: &'a [Detection]) -> Element<'a, Message> {
    let body = if detections.is_empty() {
        placeholder("No detections available.")
    } else {
        let rows = detections.iter().map(|detection| {
            table_row([
                detection.class_label.clone(),
                detection.confidence_label(),
                detection.coordinates_label(),
            ])
        });
        table(["Class", "Confidence", "Coordinates"], rows)
    };

    panel("Detections Details", body)
}

pub fn item_types<'a>(
    times: &'a ItemTypeTimes,
    percentages: &'a ItemTypePercentages,
) -> Element<'a, Message> {
    let body = if times.is_empty() {
        placeholder("No item type data available.")
    } else {
        let rows = times.iter().map(|(item_type, seconds)| {
            let share = percentages.get(item_type).map(String::as_str).unwrap_or("0.00");
            table_row([item_type.clone(), format_time(*seconds), format!("{}%", share)])
        });
        table(["Item Type", "Time on Screen (s)", "Percentage"], rows)
    };

    panel("Item Type Details", body)
}

fn panel<'a>(title: &'a str, body: Element<'a, Message>) -> Element<'a, Message> {
    container(column![text(title).size(16).color(styles::HEADING_TEXT), body].spacing(6))
        .padding(10)
        .width(Length::Fill)
        .style(styles::card)
        .into()
}

fn table<'a>(
    headings: [&'a str; 3],
    rows: impl Iterator<Item = Element<'a, Message>>,
) -> Element<'a, Message> {
    let header: Element<'a, Message> = container(row(headings.map(|heading| cell(heading.to_string()))))
        .width(Length::Fill)
        .style(styles::table_header)
        .into();

    Column::with_children(std::iter::once(header).chain(rows))
        .width(Length::Fill)
        .into()
}

fn table_row<'a>(cells: [String; 3]) -> Element<'a, Message> {
    container(row(cells.map(cell)))
        .width(Length::Fill)
        .style(styles::table_row)
        .into()
}

fn cell<'a>(value: String) -> Element<'a, Message> {
    container(text(value).size(13).color(styles::BODY_TEXT))
        .padding([4, 8])
        .width(Length::FillPortion(1))
        .into()
}

fn placeholder<'a>(message: &'a str) -> Element<'a, Message> {
    container(text(message).color(styles::MUTED_TEXT))
        .center_x(Length::Fill)
        .padding([32, 0])
        .into()
}
