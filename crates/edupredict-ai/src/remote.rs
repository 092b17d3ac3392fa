//! HTTP binding for a pipeline served behind a model-serving endpoint.
//!
//! Speaks the `dataframe_split` invocation format: the request row goes out
//! as `{"dataframe_split": {"columns": [...], "data": [[...]]}}` and the
//! server answers `{"predictions": [...]}`.

use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use edupredict_core::schema::{CellValue, row_values};
use edupredict_core::{PipelineError, PredictionPipeline};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Pipeline reached over HTTP.
pub struct RemotePipeline {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct InvocationRequest {
    dataframe_split: DataFrameSplit,
}

#[derive(Debug, Serialize)]
struct DataFrameSplit {
    columns: Vec<String>,
    data: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct InvocationResponse {
    predictions: Vec<PredictionValue>,
}

/// Regressors answer either `[y]` or `[[y]]` depending on the server.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PredictionValue {
    Scalar(f64),
    Row(Vec<f64>),
}

impl RemotePipeline {
    /// Create a pipeline client for the given serving base URL.
    ///
    /// `base_url` should be like `http://localhost:8081` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl PredictionPipeline for RemotePipeline {
    fn name(&self) -> &str {
        "remote"
    }

    async fn predict(&self, request: &RecordBatch) -> Result<Vec<f64>, PipelineError> {
        let url = format!("{}/invocations", self.base_url);
        let body = encode_request(request)?;

        info!(url = %url, rows = request.num_rows(), "invoking remote pipeline");
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::Other(format!("HTTP request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| PipelineError::Other(format!("reading response body: {e}")))?;
        if !status.is_success() {
            return Err(PipelineError::from_message(format!(
                "server returned {}: {text}",
                status.as_u16()
            )));
        }

        decode_response(&text)
    }
}

fn encode_request(request: &RecordBatch) -> Result<InvocationRequest, PipelineError> {
    let columns = request
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();

    let mut data = Vec::with_capacity(request.num_rows());
    for row in 0..request.num_rows() {
        let values = row_values(request, row).map_err(|e| PipelineError::Other(e.to_string()))?;
        data.push(
            values
                .into_iter()
                .map(|(_, value)| match value {
                    CellValue::Text(s) => serde_json::Value::String(s),
                    CellValue::Number(n) => serde_json::json!(n),
                })
                .collect(),
        );
    }

    Ok(InvocationRequest {
        dataframe_split: DataFrameSplit { columns, data },
    })
}

fn decode_response(text: &str) -> Result<Vec<f64>, PipelineError> {
    let parsed: InvocationResponse = serde_json::from_str(text)
        .map_err(|e| PipelineError::Other(format!("JSON parse error: {e}")))?;

    parsed
        .predictions
        .into_iter()
        .map(|p| match p {
            PredictionValue::Scalar(v) => Ok(v),
            PredictionValue::Row(row) => row
                .first()
                .copied()
                .ok_or_else(|| PipelineError::Other("empty prediction row".into())),
        })
        .collect()
}
