//! Pipeline selection from CLI flags and environment.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use edupredict_ai::{OnnxPipeline, RemotePipeline};
use edupredict_core::{PredictionPipeline, Predictor};
use tracing::info;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineConfig {
    Onnx(PathBuf),
    Remote(Url),
}

impl PipelineConfig {
    /// Exactly one of `model` and `pipeline_url` must be set.
    pub fn from_args(model: Option<PathBuf>, pipeline_url: Option<&str>) -> anyhow::Result<Self> {
        match (model, pipeline_url) {
            (Some(path), None) => Ok(Self::Onnx(path)),
            (None, Some(raw)) => {
                let url = Url::parse(raw).with_context(|| format!("invalid pipeline URL {raw:?}"))?;
                if !matches!(url.scheme(), "http" | "https") {
                    bail!("pipeline URL must use http or https, got {:?}", url.scheme());
                }
                Ok(Self::Remote(url))
            }
            (Some(_), Some(_)) => bail!("--model and --pipeline-url are mutually exclusive"),
            (None, None) => bail!(
                "no prediction pipeline configured: pass --model <PATH> or --pipeline-url <URL>"
            ),
        }
    }

    pub fn connect(&self) -> anyhow::Result<Arc<dyn PredictionPipeline>> {
        let pipeline: Arc<dyn PredictionPipeline> = match self {
            Self::Onnx(path) => Arc::new(
                OnnxPipeline::load(path)
                    .with_context(|| format!("loading model from {}", path.display()))?,
            ),
            Self::Remote(url) => Arc::new(RemotePipeline::new(url.to_string())),
        };
        info!(pipeline = pipeline.name(), "pipeline loaded");
        Ok(pipeline)
    }
}

pub fn build_predictor(config: &PipelineConfig, timeout_secs: u64) -> anyhow::Result<Predictor> {
    if timeout_secs == 0 {
        bail!("--timeout-secs must be at least 1");
    }
    let predictor =
        Predictor::new(config.connect()?).with_timeout(Duration::from_secs(timeout_secs));
    info!(
        pipeline = predictor.pipeline_name(),
        timeout_secs = predictor.timeout().as_secs(),
        "predictor ready"
    );
    Ok(predictor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_path_selects_onnx() {
        let cfg = PipelineConfig::from_args(Some("models/math".into()), None).unwrap();
        assert_eq!(cfg, PipelineConfig::Onnx(PathBuf::from("models/math")));
    }

    #[test]
    fn url_selects_remote() {
        let cfg = PipelineConfig::from_args(None, Some("http://localhost:8080/")).unwrap();
        let PipelineConfig::Remote(url) = cfg else {
            panic!("expected remote");
        };
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn requires_exactly_one_source() {
        let none = PipelineConfig::from_args(None, None).unwrap_err();
        assert!(none.to_string().contains("no prediction pipeline configured"));

        let both = PipelineConfig::from_args(Some("m".into()), Some("http://x")).unwrap_err();
        assert!(both.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(PipelineConfig::from_args(None, Some("not a url")).is_err());
        let err = PipelineConfig::from_args(None, Some("ftp://host/model")).unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn missing_model_fails_to_connect() {
        let dir = std::env::temp_dir().join("edupredict-cli-no-such-model");
        let err = PipelineConfig::Onnx(dir).connect().err().unwrap();
        assert!(format!("{err:#}").contains("loading model from"));
    }

    #[test]
    fn predictor_uses_configured_timeout() {
        let cfg = PipelineConfig::Remote(Url::parse("http://localhost:5001/").unwrap());
        let predictor = build_predictor(&cfg, 5).unwrap();
        assert_eq!(predictor.pipeline_name(), "remote");
        assert_eq!(predictor.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cfg = PipelineConfig::Remote(Url::parse("http://localhost:1").unwrap());
        let err = build_predictor(&cfg, 0).err().unwrap();
        assert!(err.to_string().contains("--timeout-secs"));
    }
}
