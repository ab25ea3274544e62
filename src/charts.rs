use crate::app::Message;
use crate::stats::{format_time, ItemTypePercentages, ItemTypeTimes};
use crate::timeseries::{DetectionHistory, HistoryPoint, PointSliceExt};
use chrono::{DateTime, Local};
use plotters::chart::ChartBuilder;
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::element::Pie;
use plotters::series::LineSeries;
use plotters::style::{Color, IntoFont, RGBColor, WHITE};
use plotters_iced::{Chart, DrawingBackend};

const AQUA: RGBColor = RGBColor(75, 192, 192);
const AXIS_TEXT: RGBColor = RGBColor(74, 222, 128);
const LEGEND_TEXT: RGBColor = RGBColor(52, 211, 153);
const GRID: RGBColor = RGBColor(34, 197, 94);

/// Slice colours, cycled when there are more item types than entries
const PALETTE: [RGBColor; 7] = [
    RGBColor(255, 99, 132),
    RGBColor(54, 162, 235),
    RGBColor(255, 206, 86),
    RGBColor(75, 192, 192),
    RGBColor(153, 102, 255),
    RGBColor(255, 159, 64),
    RGBColor(201, 203, 207),
];

// Average detections line chart
pub struct RollingAverageChart<'a> {
    pub history: &'a DetectionHistory,
    pub averages: Vec<f64>,
}

impl<'a> Chart<Message> for RollingAverageChart<'a> {
    type State = ();

    fn build_chart<DB: DrawingBackend>(&self, _state: &Self::State, mut builder: ChartBuilder<DB>) {
        let points = self.history.points();
        let last_index = points.len().saturating_sub(1).max(1);
        // an average never exceeds the largest count it covers
        let y_max = points.max_count().unwrap_or(0).max(1) as f64;

        let Ok(mut chart) = builder
            .margin(8)
            .x_label_area_size(18)
            .y_label_area_size(28)
            .build_cartesian_2d(0usize..last_index, 0.0..y_max * 1.1)
        else {
            return;
        };

        if chart.plotting_area().fill(&WHITE).is_err() {
            return;
        }

        let time_label = |index: &usize| time_of_day(points, *index);
        let mesh = chart
            .configure_mesh()
            .x_labels(5)
            .y_labels(5)
            .x_label_formatter(&time_label)
            .label_style(("sans-serif", 10).into_font().color(&AXIS_TEXT))
            .bold_line_style(GRID.mix(0.1))
            .light_line_style(WHITE)
            .draw();
        if let Err(e) = mesh {
            log::debug!("Failed to draw mesh: {:?}", e);
            return;
        }

        let series = chart.draw_series(LineSeries::new(
            self.averages.iter().enumerate().map(|(i, avg)| (i, *avg)),
            AQUA.stroke_width(2),
        ));
        if let Err(e) = series {
            log::debug!("Failed to draw series: {:?}", e);
        }
    }
}

/// Wall-clock time of the history point at `index`, like `14:03:27`
fn time_of_day(points: &[HistoryPoint], index: usize) -> String {
    points
        .get(index)
        .and_then(|point| DateTime::from_timestamp_millis(point.timestamp))
        .map(|utc| utc.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

// Time on screen per item type, as a doughnut
pub struct ItemTypeChart<'a> {
    pub times: &'a ItemTypeTimes,
    pub percentages: &'a ItemTypePercentages,
}

impl<'a> ItemTypeChart<'a> {
    /// `bottle: 0m 4.20s (35.00%)`
    fn slice_labels(&self) -> Vec<String> {
        self.times
            .iter()
            .map(|(item_type, seconds)| match self.percentages.get(item_type) {
                Some(pct) => format!("{}: {} ({}%)", item_type, format_time(*seconds), pct),
                None => format!("{}: {}", item_type, format_time(*seconds)),
            })
            .collect()
    }
}

impl<'a> Chart<Message> for ItemTypeChart<'a> {
    type State = ();

    fn draw_chart<DB: DrawingBackend>(&self, _state: &Self::State, root: DrawingArea<DB, Shift>) {
        let sizes: Vec<f64> = self.times.values().copied().collect();
        if sizes.iter().sum::<f64>() <= 0.0 {
            return;
        }

        let (width, height) = root.dim_in_pixel();
        let center = (width as i32 / 2, height as i32 / 2);
        let radius = (width.min(height) as f64 / 2.0 - 20.0).max(10.0);
        let colors: Vec<RGBColor> = (0..sizes.len()).map(|i| PALETTE[i % PALETTE.len()]).collect();
        let labels = self.slice_labels();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.donut_hole(radius * 0.55);
        pie.label_style(("sans-serif", 10).into_font().color(&LEGEND_TEXT));

        if let Err(e) = root.draw(&pie) {
            log::debug!("Failed to draw doughnut: {:?}", e);
        }
    }

    fn build_chart<DB: DrawingBackend>(&self, _state: &Self::State, _builder: ChartBuilder<DB>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_labels_carry_percentages() {
        let times: ItemTypeTimes = [("bottle".to_string(), 1.0), ("can".to_string(), 3.0)].into();
        let percentages = crate::stats::percentages(&times);
        let chart = ItemTypeChart {
            times: &times,
            percentages: &percentages,
        };
        assert_eq!(
            chart.slice_labels(),
            vec!["bottle: 0m 1.00s (25.00%)", "can: 0m 3.00s (75.00%)"]
        );
    }

    #[test]
    fn test_time_of_day_out_of_range() {
        let mut history = DetectionHistory::default();
        history.add_point(0, 1);
        assert_eq!(time_of_day(history.points(), 5), "");
        assert_eq!(time_of_day(history.points(), 0).len(), 8);
    }
}
