//! Wire types for the analysis service.

use serde::{Deserialize, Serialize};

use boardlens_detection_model::Detection;

/// Body of `POST /process_image`.
#[derive(Debug, Serialize)]
pub struct ProcessImageRequest<'a> {
    /// Bare base64 JPEG payload, no data-URL header.
    pub image: &'a str,
}

/// Response body of `POST /process_image`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessImageResponse {
    /// "success" on a completed analysis; anything else is a failure.
    pub status: String,

    /// Server-side processing time in seconds.
    #[serde(rename = "processingTime", default)]
    pub processing_time: Option<f64>,

    /// Detections for the analyzed frame; replaces the prior set.
    #[serde(default)]
    pub detections: Vec<Detection>,

    /// Human-readable failure detail, when the service sends one.
    #[serde(default)]
    pub message: Option<String>,
}

/// Response body of `GET /api/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Validated result of one analysis call.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    /// Detections with bounding boxes clamped into the unit square.
    pub detections: Vec<Detection>,
    /// Server-reported processing time in seconds, when present.
    pub processing_time_secs: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parses_full_wire_shape() {
        let json = r#"{
            "status": "success",
            "processingTime": 2.41,
            "detections": [{
                "id": 1,
                "title": "Whiteboard Analysis",
                "fact": "Newton's second law",
                "full_text": "F = ma relates force, mass, and acceleration.",
                "boundingBox": {"x": 0.1, "y": 0.1, "width": 0.8, "height": 0.8},
                "confidence": 1.0
            }]
        }"#;
        let parsed: ProcessImageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, "success");
        assert_eq!(parsed.detections.len(), 1);
        assert!((parsed.processing_time.unwrap() - 2.41).abs() < 1e-9);
    }

    #[test]
    fn missing_optional_fields_default() {
        let parsed: ProcessImageResponse =
            serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert!(parsed.detections.is_empty());
        assert!(parsed.processing_time.is_none());
        assert!(parsed.message.is_none());
    }

    #[test]
    fn request_serializes_image_field() {
        let req = ProcessImageRequest { image: "aGVsbG8=" };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"image":"aGVsbG8="}"#);
    }
}
