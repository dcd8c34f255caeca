//! Configuration for a batch screening run.
//!
//! All batch behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share configs across tasks and to diff two runs when their outputs
//! differ.
//!
//! Collaborators — the text extractor and the model invoker — are injection
//! points: leave them unset and the pipeline uses the built-in PDF extractor
//! and `ollama` subprocess invoker; set them to substitute a different
//! backend, add middleware, or drive the batch from tests without any
//! external process.

use crate::error::PipelineError;
use crate::pipeline::extract::DocumentExtractor;
use crate::pipeline::invoke::ModelInvoker;
use crate::progress::ProgressCallback;
use crate::schema::FieldSchema;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for one batch run.
///
/// Built via [`BatchConfig::builder()`] or [`BatchConfig::default()`].
///
/// # Example
/// ```rust
/// use cvsift::BatchConfig;
///
/// let config = BatchConfig::builder()
///     .model("mistral")
///     .concurrency(1)
///     .invoke_timeout_secs(300)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Model identifier passed to `ollama run`. Default: "mistral".
    pub model: String,

    /// Path or name of the `ollama` binary. Default: "ollama" (from `PATH`).
    pub ollama_binary: PathBuf,

    /// Per-invocation deadline in seconds; `None` waits indefinitely.
    /// Default: `None` — the default invoker is a local process whose own
    /// startup (first-run model load) can legitimately take minutes.
    pub invoke_timeout_secs: Option<u64>,

    /// Documents processed at once. Default: 1.
    ///
    /// The default invoker funnels everything through one local model
    /// process, so values above 1 only help when the invoker can actually
    /// serve calls concurrently (a remote endpoint, a pooled backend).
    /// Results are re-sorted into input order either way.
    pub concurrency: usize,

    /// Output schema. Default: [`FieldSchema::standard()`].
    pub schema: FieldSchema,

    /// Instruction preamble override. `None` uses the built-in default.
    pub preamble: Option<String>,

    /// Append a `Source File` column to CSV output. Default: true.
    pub include_source_column: bool,

    /// Pre-constructed extractor. `None` uses the built-in PDF extractor.
    pub extractor: Option<Arc<dyn DocumentExtractor>>,

    /// Pre-constructed invoker. Takes precedence over `model` /
    /// `ollama_binary` / `invoke_timeout_secs`, which only parameterise the
    /// built-in `ollama` invoker.
    pub invoker: Option<Arc<dyn ModelInvoker>>,

    /// Per-document progress events. `None` means no events.
    pub progress: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            model: "mistral".to_string(),
            ollama_binary: PathBuf::from("ollama"),
            invoke_timeout_secs: None,
            concurrency: 1,
            schema: FieldSchema::standard(),
            preamble: None,
            include_source_column: true,
            extractor: None,
            invoker: None,
            progress: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("model", &self.model)
            .field("ollama_binary", &self.ollama_binary)
            .field("invoke_timeout_secs", &self.invoke_timeout_secs)
            .field("concurrency", &self.concurrency)
            .field("preamble", &self.preamble.as_ref().map(|_| "<custom>"))
            .field("include_source_column", &self.include_source_column)
            .field("extractor", &self.extractor.as_ref().map(|_| "<dyn DocumentExtractor>"))
            .field("invoker", &self.invoker.as_ref().map(|_| "<dyn ModelInvoker>"))
            .field("progress", &self.progress.as_ref().map(|_| "<dyn BatchProgressCallback>"))
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn ollama_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.config.ollama_binary = binary.into();
        self
    }

    pub fn invoke_timeout_secs(mut self, secs: u64) -> Self {
        self.config.invoke_timeout_secs = Some(secs);
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn schema(mut self, schema: FieldSchema) -> Self {
        self.config.schema = schema;
        self
    }

    pub fn preamble(mut self, preamble: impl Into<String>) -> Self {
        self.config.preamble = Some(preamble.into());
        self
    }

    pub fn include_source_column(mut self, v: bool) -> Self {
        self.config.include_source_column = v;
        self
    }

    pub fn extractor(mut self, extractor: Arc<dyn DocumentExtractor>) -> Self {
        self.config.extractor = Some(extractor);
        self
    }

    pub fn invoker(mut self, invoker: Arc<dyn ModelInvoker>) -> Self {
        self.config.invoker = Some(invoker);
        self
    }

    pub fn progress(mut self, progress: ProgressCallback) -> Self {
        self.config.progress = Some(progress);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, PipelineError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(PipelineError::InvalidConfig("concurrency must be ≥ 1".into()));
        }
        if c.model.trim().is_empty() && c.invoker.is_none() {
            return Err(PipelineError::InvalidConfig(
                "model name must not be empty when using the built-in invoker".into(),
            ));
        }
        if c.schema.is_empty() {
            return Err(PipelineError::InvalidConfig("schema has no fields".into()));
        }
        Ok(self.config)
    }
}
