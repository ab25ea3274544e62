use serde::{Deserialize, Serialize};

/// Points averaged by the "Avg Detections Over Time" series, including the current one
pub const ROLLING_WINDOW: usize = 5;

/// Number of detections in one inbound message, stamped with arrival time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(rename = "detections")]
    pub count: usize,
}

/// Append-only detection history. Never trimmed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectionHistory {
    data: Vec<HistoryPoint>,
}

pub trait PointSliceExt {
    fn max_count(&self) -> Option<usize>;
}

impl PointSliceExt for &[HistoryPoint] {
    fn max_count(&self) -> Option<usize> {
        self.iter().map(|point| point.count).max()
    }
}

impl DetectionHistory {
    pub fn add_point(&mut self, timestamp: i64, count: usize) {
        self.data.push(HistoryPoint { timestamp, count });
    }

    pub fn points(&self) -> &[HistoryPoint] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Simple moving average of `count` over a left-clamped window.
    ///
    /// Entry `i` averages indices `[i - (window - 1), i]`, clamped at zero, so the
    /// first few entries average over 1, 2, 3, ... points.
    pub fn rolling_average(&self, window: usize) -> Vec<f64> {
        let window = window.max(1);
        let mut averages = Vec::with_capacity(self.data.len());
        let mut sum = 0usize;

        for (i, point) in self.data.iter().enumerate() {
            sum += point.count;
            if i >= window {
                sum -= self.data[i - window].count;
            }
            let len = (i + 1).min(window);
            averages.push(sum as f64 / len as f64);
        }

        averages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(counts: &[usize]) -> DetectionHistory {
        let mut history = DetectionHistory::default();
        for (i, count) in counts.iter().enumerate() {
            history.add_point(1_000 + i as i64 * 100, *count);
        }
        history
    }

    #[test]
    fn test_rolling_average_warmup() {
        let averages = history(&[2, 4, 6, 8, 10]).rolling_average(ROLLING_WINDOW);
        assert_eq!(averages, vec![2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_rolling_average_drops_old_points() {
        let averages = history(&[10, 0, 0, 0, 0, 0, 5]).rolling_average(ROLLING_WINDOW);
        assert_eq!(averages.len(), 7);
        // index 5 no longer sees the leading 10
        assert_eq!(averages[4], 2.0);
        assert_eq!(averages[5], 0.0);
        assert_eq!(averages[6], 1.0);
    }

    #[test]
    fn test_rolling_average_empty() {
        assert!(DetectionHistory::default().rolling_average(ROLLING_WINDOW).is_empty());
    }

    #[test]
    fn test_max_count() {
        let history = history(&[3, 9, 1]);
        assert_eq!(history.points().max_count(), Some(9));
        assert_eq!(DetectionHistory::default().points().max_count(), None);
    }

    #[test]
    fn test_persisted_shape() {
        let history = history(&[4]);
        let json = serde_json::to_string(&history).expect("Failed to serialize");
        assert_eq!(json, r#"[{"timestamp":1000,"detections":4}]"#);

        let restored: DetectionHistory = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(restored, history);
    }
}
