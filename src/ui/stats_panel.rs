//! Stat cards and charts beside the video feed.

use crate::app::Message;
use crate::charts::{ItemTypeChart, RollingAverageChart};
use crate::dashboard::DashboardView;
use crate::detection::Detection;
use crate::ui::styles;
use iced::widget::{column, container, row, text};
use iced::{alignment, Element, Length};
use plotters_iced::ChartWidget;

const CHART_HEIGHT: f32 = 170.0;

pub fn view<'a>(dashboard: DashboardView<'a>) -> Element<'a, Message> {
    let total = card(
        "Total Detections",
        text(dashboard.detections.len().to_string())
            .size(30)
            .color(styles::BODY_TEXT)
            .into(),
    );

    let target = card("Current Target", current_target(dashboard.current_target));

    let line_chart = ChartWidget::new(RollingAverageChart {
        history: dashboard.history,
        averages: dashboard.rolling_average,
    })
    .width(Length::Fill)
    .height(Length::Fixed(CHART_HEIGHT));

    let doughnut = ChartWidget::new(ItemTypeChart {
        times: dashboard.item_type_times,
        percentages: dashboard.item_type_percentages,
    })
    .width(Length::Fill)
    .height(Length::Fixed(CHART_HEIGHT));

    column![
        row![total, target].spacing(12),
        row![
            card("Avg Detections Over Time", line_chart.into()),
            card("Detected Item Types", doughnut.into())
        ]
        .spacing(12)
    ]
    .spacing(12)
    .width(Length::Fill)
    .into()
}

fn current_target<'a>(target: Option<&'a Detection>) -> Element<'a, Message> {
    match target {
        Some(detection) => column![
            text(detection.class_label.as_str()).size(20).color(styles::BODY_TEXT),
            text(format!("Confidence: {}", detection.confidence_label()))
                .size(13)
                .color(styles::HEADING_TEXT),
            text(format!("Coordinates: {}", detection.coordinates_label()))
                .size(13)
                .color(styles::HEADING_TEXT),
        ]
        .spacing(2)
        .align_x(alignment::Horizontal::Center)
        .into(),
        None => text("No current target available.")
            .size(13)
            .color(styles::MUTED_TEXT)
            .into(),
    }
}

fn card<'a>(title: &'a str, body: Element<'a, Message>) -> Element<'a, Message> {
    container(
        column![text(title).size(15).color(styles::HEADING_TEXT), body]
            .spacing(6)
            .align_x(alignment::Horizontal::Center),
    )
    .padding(10)
    .width(Length::FillPortion(1))
    .style(styles::card)
    .into()
}
