//! ONNX Runtime binding for an exported preprocessing + regression pipeline.
//!
//! The model must take one `[1, 1]` input per request column, named after the
//! column: string tensors for the categorical columns and `f32` tensors for
//! the scores. This is the layout `skl2onnx` produces for a column
//! transformer fed a DataFrame. Output 0 holds the predictions.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use edupredict_core::schema::{COLUMNS, CellValue, row_values};
use edupredict_core::{PipelineError, PredictionPipeline};
use ort::session::Session;
use ort::value::{DynValue, Tensor};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model.onnx not found at {0}")]
    NotFound(PathBuf),

    #[error("model has no input named {0:?}")]
    MissingInput(String),

    #[error("model declares no outputs")]
    NoOutputs,

    #[error("onnx runtime error: {0}")]
    Ort(#[from] ort::Error),
}

/// Pipeline backed by a local ONNX model.
///
/// Inference runs on the blocking pool. If the caller stops waiting (for
/// example on a timeout) the run is abandoned, not cancelled: it finishes in
/// the background and keeps the session locked until then, so later calls
/// queue behind it.
pub struct OnnxPipeline {
    // `Session::run` needs exclusive access.
    session: Arc<Mutex<Session>>,
}

impl OnnxPipeline {
    /// Load a model from a directory containing `model.onnx`, or from the file itself.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let model_path = if path.is_dir() {
            path.join("model.onnx")
        } else {
            path.to_path_buf()
        };
        if !model_path.exists() {
            return Err(ModelLoadError::NotFound(model_path));
        }

        let session = Session::builder()?.commit_from_file(&model_path)?;

        let input_names: Vec<String> = session
            .inputs()
            .iter()
            .map(|input| input.name().to_string())
            .collect();
        check_signature(&input_names, session.outputs().len())?;

        info!(model = %model_path.display(), inputs = input_names.len(), "loaded onnx pipeline");
        Ok(Self {
            session: Arc::new(Mutex::new(session)),
        })
    }
}

/// Every request column needs a same-named input, and output 0 must exist.
fn check_signature(input_names: &[String], output_count: usize) -> Result<(), ModelLoadError> {
    if let Some(missing) = COLUMNS
        .iter()
        .find(|column| !input_names.iter().any(|name| name == *column))
    {
        return Err(ModelLoadError::MissingInput(missing.to_string()));
    }
    if output_count == 0 {
        return Err(ModelLoadError::NoOutputs);
    }
    Ok(())
}

#[async_trait]
impl PredictionPipeline for OnnxPipeline {
    fn name(&self) -> &str {
        "onnx"
    }

    async fn predict(&self, request: &RecordBatch) -> Result<Vec<f64>, PipelineError> {
        let inputs = tensor_inputs(request)?;
        let session = Arc::clone(&self.session);

        tokio::task::spawn_blocking(move || run(&session, inputs))
            .await
            .map_err(|e| PipelineError::Other(format!("inference task failed: {e}")))?
    }
}

/// Convert the single request row into named `[1, 1]` tensors.
fn tensor_inputs(request: &RecordBatch) -> Result<Vec<(String, DynValue)>, PipelineError> {
    if request.num_rows() != 1 {
        return Err(PipelineError::Other(format!(
            "expected a single-row request, got {} rows",
            request.num_rows()
        )));
    }

    let shape = [1i64, 1];
    let values = row_values(request, 0).map_err(|e| PipelineError::Other(e.to_string()))?;

    let mut inputs = Vec::with_capacity(values.len());
    for (column, value) in values {
        let tensor = match value {
            CellValue::Text(token) => {
                Tensor::from_string_array((shape, std::slice::from_ref(&token)))
                    .map_err(classify)?
                    .into_dyn()
            }
            CellValue::Number(n) => Tensor::from_array((shape, vec![n as f32].into_boxed_slice()))
                .map_err(classify)?
                .into_dyn(),
        };
        inputs.push((column, tensor));
    }
    Ok(inputs)
}

fn run(session: &Mutex<Session>, inputs: Vec<(String, DynValue)>) -> Result<Vec<f64>, PipelineError> {
    let mut session = session
        .lock()
        .map_err(|_| PipelineError::Other("onnx session poisoned by an earlier panic".into()))?;

    let outputs = session.run(inputs).map_err(classify)?;
    let (shape, data) = outputs[0].try_extract_tensor::<f32>().map_err(classify)?;
    debug!(?shape, "onnx inference complete");

    Ok(data.iter().map(|&v| f64::from(v)).collect())
}

fn classify(err: ort::Error) -> PipelineError {
    PipelineError::from_message(err.to_string())
}
