//! RackForge generation backends.
//!
//! Generation turns a validated [`GenerationRequest`] into a 3D model. The
//! core never depends on a concrete backend: callers hold an
//! `Arc<dyn Generator>` and the only shipped implementation is
//! [`MockGenerator`], a timer-driven placeholder.
//!
//! ```
//! use rackforge_generate::{Generator, MockGenerator};
//! use rackforge_spec::{GenerationRequest, ImageRef, InputType, QualityPreset};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let generator = MockGenerator::instant().unwrap();
//! let request = GenerationRequest {
//!     input_type: InputType::Image,
//!     dimensions: None,
//!     images: vec![ImageRef::new("sketch.png", "image/png", 1024)],
//!     quality_preset: QualityPreset::Draft,
//! };
//! let output = generator.generate(&request).await.unwrap();
//! assert_eq!(output.backend, "mock");
//! # });
//! ```

pub mod error;
pub mod mock;
pub mod output;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rackforge_spec::GenerationRequest;

pub use error::GenerateError;
pub use mock::{MockGenerator, MockTimings};
pub use output::{GenerationOutput, StageTiming};

/// A generation backend.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Backend identifier used in outputs and logs.
    fn name(&self) -> &str;

    /// Produces a model for `request`.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutput, GenerateError>;
}

/// A backend shared between callers.
pub type SharedGenerator = Arc<dyn Generator>;

/// Runs `generator`, giving up after `limit`.
pub async fn generate_with_timeout(
    generator: &dyn Generator,
    request: &GenerationRequest,
    limit: Duration,
) -> Result<GenerationOutput, GenerateError> {
    match tokio::time::timeout(limit, generator.generate(request)).await {
        Ok(result) => result,
        Err(_) => {
            let after_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
            tracing::warn!(backend = generator.name(), after_ms, "generation timed out");
            Err(GenerateError::TimedOut { after_ms })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rackforge_spec::{ImageRef, InputType, QualityPreset};

    fn request() -> GenerationRequest {
        GenerationRequest {
            input_type: InputType::Sketch3d,
            dimensions: None,
            images: vec![ImageRef::new("sketch.webp", "image/webp", 2048)],
            quality_preset: QualityPreset::High,
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl Generator for FailingBackend {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(&self, _request: &GenerationRequest) -> Result<GenerationOutput, GenerateError> {
            Err(GenerateError::Backend {
                backend: "failing".to_string(),
                message: "model unavailable".to_string(),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_expires() {
        let validator = rackforge_spec::SpecValidator::new(Default::default()).unwrap();
        let generator: SharedGenerator = Arc::new(MockGenerator::new(validator));
        let err = generate_with_timeout(generator.as_ref(), &request(), Duration::from_millis(1000))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::TimedOut { after_ms: 1000 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_not_reached() {
        let validator = rackforge_spec::SpecValidator::new(Default::default()).unwrap();
        let generator = MockGenerator::new(validator);
        let output = generate_with_timeout(&generator, &request(), Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(output.total_ms(), 3250);
    }

    #[tokio::test]
    async fn test_backend_errors_pass_through() {
        let err = generate_with_timeout(&FailingBackend, &request(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "GEN_003");
    }
}
