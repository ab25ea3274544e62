//! Detections and the inbound message the inference backend sends per frame.
//!
//! Field names follow the backend's JSON: `class`, `confidence`,
//! `coordinates`, `time_on_screen`.

use crate::error::PayloadError;
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;

/// One recognized object instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "class")]
    pub class_label: String,
    /// In [0, 1]
    pub confidence: f64,
    /// x1, y1, x2, y2 in frame pixels
    #[serde(rename = "coordinates")]
    pub bounding_box: [f64; 4],
}

impl Detection {
    /// Confidence as a percentage with two decimals, e.g. `87.65%`
    pub fn confidence_label(&self) -> String {
        format!("{:.2}%", self.confidence * 100.0)
    }

    /// Corners rounded to whole pixels, e.g. `[12, 40] - [200, 310]`
    pub fn coordinates_label(&self) -> String {
        let [x1, y1, x2, y2] = self.bounding_box.map(|c| c.round() as i64);
        format!("[{}, {}] - [{}, {}]", x1, y1, x2, y2)
    }
}

/// Payload of one backend message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InboundMessage {
    /// Annotated frame as a data URI
    pub image: String,
    pub detections: Vec<Detection>,
    /// Seconds each item type was on screen since the previous message
    pub time_on_screen: IndexMap<String, f64>,
}

impl InboundMessage {
    pub fn parse(raw: &str) -> Result<Self, PayloadError> {
        serde_json::from_str(raw).map_err(PayloadError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "image": "data:image/jpeg;base64,/9j/4AAQ",
        "detections": [
            {"class": "bottle", "confidence": 0.87654, "coordinates": [12.4, 40.6, 199.5, 310.2]},
            {"class": "can", "confidence": 0.5, "coordinates": [0, 0, 0, 0]}
        ],
        "time_on_screen": {"bottle": 0.0333, "can": 0.0333}
    }"#;

    #[test]
    fn test_parse_backend_message() {
        let message = InboundMessage::parse(SAMPLE).expect("Failed to parse");
        assert_eq!(message.detections.len(), 2);
        assert_eq!(message.detections[0].class_label, "bottle");
        assert_eq!(message.detections[1].bounding_box, [0.0; 4]);
        assert_eq!(message.time_on_screen.len(), 2);
        assert!(message.image.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        assert!(InboundMessage::parse(r#"{"image": "x", "detections": []}"#).is_err());
        assert!(InboundMessage::parse("not json").is_err());
    }

    #[test]
    fn test_parse_rejects_short_bounding_box() {
        let raw = r#"{"image": "x", "time_on_screen": {},
            "detections": [{"class": "can", "confidence": 0.5, "coordinates": [1, 2, 3]}]}"#;
        assert!(InboundMessage::parse(raw).is_err());
    }

    #[test]
    fn test_detection_labels() {
        let message = InboundMessage::parse(SAMPLE).expect("Failed to parse");
        let bottle = &message.detections[0];
        assert_eq!(bottle.confidence_label(), "87.65%");
        assert_eq!(bottle.coordinates_label(), "[12, 41] - [200, 310]");
    }
}
