//! Submission and result payloads.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Decode a field the service may send as `null`, falling back to the
/// type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response to `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SubmitResponse {
    /// Session handle; `None` when the service omitted it or sent `null`.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Human-readable acknowledgement from the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Preview entry in the result bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSummary {
    /// Slide title.
    #[serde(default)]
    pub title: Option<String>,
    /// Server-relative path of the rendered preview image.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Final output metadata returned by `GET /api/result/{session_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResultBundle {
    /// Slide previews in presentation order.
    #[serde(default)]
    pub slides: Vec<SlideSummary>,
    /// Server-relative link to the rendered slide deck.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ppt_url: Option<String>,
    /// Server-relative link to the rendered poster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResultBundle {
    /// Link to the rendered document, whichever output type was produced.
    pub fn document_url(&self) -> Option<&str> {
        self.ppt_url.as_deref().or(self.poster_url.as_deref())
    }
}

/// A table or figure attached to a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub caption: Option<String>,
}

/// One slide of the structured content bundle.
///
/// Fields the service adds beyond the documented schema are kept in
/// `extra` so that a persisted bundle reloads unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideRecord {
    /// 1-based position in the deck.
    pub slide_number: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Section the slide belongs to (e.g. `introduction`, `method`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub section_type: String,
    /// Body text of the slide.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tables: Vec<Attachment>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub figures: Vec<Attachment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Structured output returned by `GET /api/slides/{session_id}/content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SlideContentBundle {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_slides: usize,
    /// `slides` or `poster`, as reported by the service.
    #[serde(default, deserialize_with = "null_as_default")]
    pub output_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slides: Vec<SlideRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submit_response_with_null_session() {
        let response: SubmitResponse = serde_json::from_str(r#"{"session_id": null}"#).unwrap();
        assert!(response.session_id.is_none());
        assert!(response.message.is_none());
    }

    #[test]
    fn test_result_bundle_document_url() {
        let bundle: ResultBundle = serde_json::from_value(json!({
            "slides": [{"title": "Intro", "image_url": "/outputs/abc/slide_1.png"}],
            "poster_url": "/outputs/abc/poster.pdf"
        }))
        .unwrap();

        assert_eq!(bundle.slides.len(), 1);
        assert_eq!(bundle.slides[0].title.as_deref(), Some("Intro"));
        assert_eq!(bundle.document_url(), Some("/outputs/abc/poster.pdf"));
    }

    #[test]
    fn test_slide_record_keeps_unknown_fields() {
        let raw = json!({
            "slide_number": 3,
            "title": "Results",
            "section_type": "experiments",
            "content": "Accuracy improves by 4 points.",
            "image_url": "/outputs/abc/slide_3.png",
            "tables": [{"id": "Table 1", "caption": "Main results"}],
            "figures": [],
            "speaker_notes": "Pause here."
        });

        let record: SlideRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.slide_number, 3);
        assert_eq!(record.tables[0].caption.as_deref(), Some("Main results"));
        assert_eq!(record.extra["speaker_notes"], "Pause here.");
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn test_content_bundle_tolerates_null_fields() {
        let bundle: SlideContentBundle = serde_json::from_value(json!({
            "total_slides": 1,
            "output_type": null,
            "slides": [{
                "slide_number": 1,
                "title": null,
                "section_type": null,
                "content": null,
                "image_url": null,
                "tables": [{"id": null, "caption": null}],
                "figures": null
            }]
        }))
        .unwrap();

        assert_eq!(bundle.output_type, "");
        let slide = &bundle.slides[0];
        assert_eq!(slide.title, "");
        assert_eq!(slide.section_type, "");
        assert_eq!(slide.content, "");
        assert_eq!(slide.tables[0].id, "");
        assert!(slide.figures.is_empty());
    }

    #[test]
    fn test_content_bundle_defaults() {
        let bundle: SlideContentBundle = serde_json::from_str("{}").unwrap();
        assert_eq!(bundle.total_slides, 0);
        assert!(bundle.slides.is_empty());
    }
}
