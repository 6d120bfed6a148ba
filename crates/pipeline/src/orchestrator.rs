//! Pipeline Orchestrator
//!
//! Runs the stages of one request strictly in sequence. Independent requests
//! share the adapters (and, through them, the inference rate limiter) but
//! nothing else.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use sahayak_core::{
    AudioTurn, GenerationError, InboundRequest, PipelineTurn, ResponseGenerator,
    SpeechSynthesizer, TextTurn, Transcriber, TranscriptionError,
};

use crate::storage::AudioStorage;
use crate::validation::UploadPolicy;
use crate::PipelineError;

/// Histogram of per-stage latency in milliseconds, labelled by `stage`
pub const STAGE_LATENCY_METRIC: &str = "sahayak_stage_latency_ms";

/// Audio/text → reply orchestrator
///
/// Adapters are injected so tests can substitute stubs.
#[derive(Clone)]
pub struct Pipeline {
    transcriber: Arc<dyn Transcriber>,
    responder: Arc<dyn ResponseGenerator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    storage: AudioStorage,
    policy: UploadPolicy,
}

impl Pipeline {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        responder: Arc<dyn ResponseGenerator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        storage: AudioStorage,
        policy: UploadPolicy,
    ) -> Self {
        tracing::info!(
            transcriber = transcriber.model_name(),
            responder = responder.model_name(),
            synthesizer = synthesizer.engine_name(),
            "Pipeline ready"
        );

        Self {
            transcriber,
            responder,
            synthesizer,
            storage,
            policy,
        }
    }

    pub fn storage(&self) -> &AudioStorage {
        &self.storage
    }

    /// Dispatch on the request kind
    pub async fn process(&self, request: InboundRequest) -> Result<PipelineTurn, PipelineError> {
        match request {
            InboundRequest::Audio { bytes, filename } => self
                .from_audio(&bytes, &filename)
                .await
                .map(PipelineTurn::Audio),
            InboundRequest::Text { text } => self.from_text(&text).await.map(PipelineTurn::Text),
        }
    }

    /// Uploaded recording → transcript → reply → reply audio
    pub async fn from_audio(&self, bytes: &[u8], filename: &str) -> Result<AudioTurn, PipelineError> {
        let upload = self.policy.validate(filename, bytes.len())?;
        tracing::info!(filename = %upload.file_name, bytes = bytes.len(), "Received audio file");

        let saved = self.storage.save_upload(&upload.file_name, bytes).await?;
        tracing::debug!(path = %saved.display(), "Saved upload");

        let transcript = timed("transcription", self.transcriber.transcribe(bytes, upload.format))
            .await
            .and_then(|t| non_empty(t, TranscriptionError::Empty))
            .map_err(PipelineError::TranscriptionFailed)?;
        tracing::info!(transcript = %transcript, "Transcription");

        let reply_text = self.reply_to(&transcript).await?;

        let output = self.storage.response_path_for_upload(&upload.stem);
        let audio = timed("synthesis", self.synthesizer.synthesize(&reply_text, &output))
            .await
            .map_err(PipelineError::SynthesisFailed)?;

        Ok(AudioTurn {
            transcript,
            reply_text,
            audio,
        })
    }

    /// Client-side transcript → reply → reply audio
    ///
    /// The text is passed through as given; blank input is left for the
    /// inference service to answer.
    pub async fn from_text(&self, text: &str) -> Result<TextTurn, PipelineError> {
        tracing::info!(text = %text, "Processing text");

        let reply_text = self.reply_to(text).await?;

        let output = self.storage.response_path_for_text();
        let audio = timed("synthesis", self.synthesizer.synthesize(&reply_text, &output))
            .await
            .map_err(PipelineError::SynthesisFailed)?;

        Ok(TextTurn {
            original_text: text.to_string(),
            reply_text,
            audio,
        })
    }

    async fn reply_to(&self, input: &str) -> Result<String, PipelineError> {
        let reply = timed("generation", self.responder.respond(input))
            .await
            .and_then(|r| non_empty(r, GenerationError::Empty))
            .map_err(PipelineError::GenerationFailed)?;
        tracing::info!(response = %reply, "Response");
        Ok(reply)
    }
}

/// Adapters promise non-empty text on `Ok`; hold them to it
fn non_empty<E>(text: String, empty: E) -> Result<String, E> {
    if text.trim().is_empty() {
        Err(empty)
    } else {
        Ok(text)
    }
}

/// Await a stage and record its latency
async fn timed<T, E, F>(stage: &'static str, fut: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    let result = fut.await;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    metrics::histogram!(STAGE_LATENCY_METRIC, "stage" => stage).record(elapsed_ms);
    tracing::debug!(stage, elapsed_ms, ok = result.is_ok(), "Stage finished");
    result
}
