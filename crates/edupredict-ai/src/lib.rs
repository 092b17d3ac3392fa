//! Pipeline bindings: ONNX Runtime for local models, HTTP for served ones.

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::{ModelLoadError, OnnxPipeline};

#[cfg(feature = "http")]
mod remote;
#[cfg(feature = "http")]
pub use remote::RemotePipeline;
