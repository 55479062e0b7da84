use reqwest::multipart;
use scanomalycore::records::{DeleteRequest, PersistedResult, Prediction, SaveRequest};
use scanomalycore::ApiError;

/// Typed client for the prediction and persistence endpoints.
///
/// Each operation is a single request/response exchange with no retry. A
/// transport failure, a non-success status or an undecodable body all map to
/// that operation's [`ApiError`] variant; nothing here mutates client-held
/// state.
#[derive(Debug, Clone)]
pub struct Gateway {
    client: reqwest::Client,
    base_url: String,
}

impl Gateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Uploads a scan image and returns its classification.
    pub async fn predict(&self, file_name: String, bytes: Vec<u8>) -> Result<Prediction, ApiError> {
        let form = multipart::Form::new().part(
            "image",
            multipart::Part::bytes(bytes).file_name(file_name),
        );
        let response = self
            .client
            .post(self.endpoint("predict"))
            .multipart(form)
            .send()
            .await
            .map_err(|err| ApiError::Prediction(err.to_string()))?;
        if !response.status().is_success() {
            return Err(ApiError::Prediction(response.status().to_string()));
        }
        response
            .json::<Prediction>()
            .await
            .map_err(|err| ApiError::Prediction(err.to_string()))
    }

    /// Persists the current prediction. The heatmap travels in data-URI form;
    /// the service strips the prefix before storing the binary body.
    pub async fn save(&self, request: SaveRequest) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint("save"))
            .json(&request)
            .send()
            .await
            .map_err(|err| ApiError::Save(err.to_string()))?;
        if !response.status().is_success() {
            return Err(ApiError::Save(response.status().to_string()));
        }
        response
            .json::<serde_json::Value>()
            .await
            .map(|_| ())
            .map_err(|err| ApiError::Save(err.to_string()))
    }

    /// Fetches every saved result, in the order the service returns them.
    pub async fn list_all(&self) -> Result<Vec<PersistedResult>, ApiError> {
        let response = self
            .client
            .get(self.endpoint("getall"))
            .send()
            .await
            .map_err(|err| ApiError::Fetch(err.to_string()))?;
        if !response.status().is_success() {
            return Err(ApiError::Fetch(response.status().to_string()));
        }
        response
            .json::<Vec<PersistedResult>>()
            .await
            .map_err(|err| ApiError::Fetch(err.to_string()))
    }

    /// Deletes a batch of saved results. All-or-nothing: on failure the
    /// caller must treat the entire batch as still present.
    pub async fn delete_many(&self, ids: Vec<i64>) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint("delete"))
            .json(&DeleteRequest { ids })
            .send()
            .await
            .map_err(|err| ApiError::Delete(err.to_string()))?;
        if !response.status().is_success() {
            return Err(ApiError::Delete(response.status().to_string()));
        }
        response
            .json::<serde_json::Value>()
            .await
            .map(|_| ())
            .map_err(|err| ApiError::Delete(err.to_string()))
    }
}
