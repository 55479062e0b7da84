use crate::records::{Prediction, SaveRequest, HEATMAP_DATA_PREFIX};

/// State of the scan workflow: the in-flight upload and the prediction it
/// produced.
///
/// Uploads are sequenced by a monotonically increasing token. Starting a new
/// upload supersedes the previous one without cancelling its request; the
/// superseded settlement presents a stale token and is discarded, so it can
/// neither overwrite a newer prediction nor raise a late failure banner.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    label: String,
    confidence: Option<f32>,
    heatmap: Option<String>,
    uploading: bool,
    seq: u64,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new upload: clears the previous prediction triple as a whole
    /// and returns the token the eventual settlement must present.
    pub fn begin_upload(&mut self) -> u64 {
        self.label.clear();
        self.confidence = None;
        self.heatmap = None;
        self.uploading = true;
        self.seq += 1;
        self.seq
    }

    /// Applies a settled prediction response.
    ///
    /// `prediction` is `Some` on success, `None` on failure. Returns whether
    /// the settlement was current; a stale one leaves the session untouched
    /// and the caller must not surface its outcome.
    pub fn finish_upload(&mut self, token: u64, prediction: Option<Prediction>) -> bool {
        if token != self.seq {
            log::debug!("discarding stale prediction settlement (token {token})");
            return false;
        }
        self.uploading = false;
        if let Some(prediction) = prediction {
            self.label = prediction.label;
            self.confidence = Some(prediction.confidence);
            self.heatmap = Some(format!("{HEATMAP_DATA_PREFIX}{}", prediction.heatmap));
        }
        true
    }

    pub fn uploading(&self) -> bool {
        self.uploading
    }

    pub fn label(&self) -> Option<&str> {
        if self.label.is_empty() {
            None
        } else {
            Some(&self.label)
        }
    }

    /// Confidence as a percent string with two decimals, e.g. "87.40%".
    pub fn confidence_text(&self) -> Option<String> {
        self.confidence
            .map(|confidence| format!("{:.2}%", confidence * 100.0))
    }

    /// Heatmap in data-URI form, ready for an image-rendering surface.
    pub fn heatmap(&self) -> Option<&str> {
        self.heatmap.as_deref()
    }

    /// Body for a save call, or `None` when there is no completed prediction
    /// to save. The `None` case never reaches the network.
    pub fn save_request(&self) -> Option<SaveRequest> {
        match (self.label(), self.confidence, self.heatmap.as_ref()) {
            (Some(label), Some(confidence), Some(heatmap)) => Some(SaveRequest {
                heatmap: heatmap.clone(),
                prediction: label.to_string(),
                confidence,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glioma() -> Prediction {
        Prediction {
            label: "Glioma".into(),
            confidence: 0.874,
            heatmap: "AAAA".into(),
        }
    }

    #[test]
    fn successful_upload_populates_the_triple() {
        let mut session = AnalysisSession::new();
        let token = session.begin_upload();
        assert!(session.uploading());

        assert!(session.finish_upload(token, Some(glioma())));
        assert!(!session.uploading());
        assert_eq!(session.label(), Some("Glioma"));
        assert_eq!(session.confidence_text().as_deref(), Some("87.40%"));
        assert_eq!(session.heatmap(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn new_upload_clears_previous_prediction() {
        let mut session = AnalysisSession::new();
        let token = session.begin_upload();
        session.finish_upload(token, Some(glioma()));

        session.begin_upload();
        assert!(session.label().is_none());
        assert!(session.confidence_text().is_none());
        assert!(session.heatmap().is_none());
        assert!(session.uploading());
    }

    #[test]
    fn stale_success_does_not_overwrite_newer_upload() {
        let mut session = AnalysisSession::new();
        let first = session.begin_upload();
        let second = session.begin_upload();

        let mut newer = glioma();
        newer.label = "No Tumor".into();
        assert!(session.finish_upload(second, Some(newer)));

        assert!(!session.finish_upload(first, Some(glioma())));
        assert_eq!(session.label(), Some("No Tumor"));
    }

    #[test]
    fn stale_failure_is_discarded_while_newer_upload_runs() {
        let mut session = AnalysisSession::new();
        let first = session.begin_upload();
        let _second = session.begin_upload();

        assert!(!session.finish_upload(first, None));
        assert!(session.uploading());
    }

    #[test]
    fn save_request_requires_a_completed_prediction() {
        let mut session = AnalysisSession::new();
        assert!(session.save_request().is_none());

        let token = session.begin_upload();
        assert!(session.save_request().is_none());

        session.finish_upload(token, Some(glioma()));
        let request = session.save_request().unwrap();
        assert_eq!(request.prediction, "Glioma");
        assert_eq!(request.heatmap, "data:image/png;base64,AAAA");
        assert!((request.confidence - 0.874).abs() < 1e-6);
    }

    #[test]
    fn failed_upload_leaves_session_re_attemptable() {
        let mut session = AnalysisSession::new();
        let token = session.begin_upload();
        assert!(session.finish_upload(token, None));
        assert!(!session.uploading());
        assert!(session.save_request().is_none());

        let retry = session.begin_upload();
        assert!(session.finish_upload(retry, Some(glioma())));
        assert_eq!(session.label(), Some("Glioma"));
    }
}
