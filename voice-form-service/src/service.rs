use serde::Serialize;
use tracing::info;
use crate::capture::TranscriptSource;
use crate::config::FormConfig;
use crate::engine::{Resolution, ResolutionEngine};
use crate::error::FormResult;

/// Counts for one listening session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DictationSummary {
    pub filled: usize,
    pub unresolved: usize,
    /// A stop directive ended the session, rather than the source
    pub stopped_by_directive: bool,
}

/// Dictation driver: pulls transcripts from a source into one engine
pub struct DictationService<S: TranscriptSource> {
    engine: ResolutionEngine,
    source: S,
}

impl<S: TranscriptSource> DictationService<S> {
    pub fn new(engine: ResolutionEngine, source: S) -> Self {
        Self { engine, source }
    }

    /// Service on the configured default schema
    pub fn from_config(config: FormConfig, source: S) -> FormResult<Self> {
        let engine = ResolutionEngine::from_config(config)?;
        Ok(Self::new(engine, source))
    }

    pub fn engine(&self) -> &ResolutionEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ResolutionEngine {
        &mut self.engine
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Switch the active schema; assignments are discarded
    pub fn select_schema(&mut self, name: &str) -> FormResult<()> {
        self.engine.switch_schema(name)
    }

    /// Run one listening session until a stop directive or the end of capture
    pub async fn listen(&mut self) -> FormResult<DictationSummary> {
        self.listen_with(|_| {}).await
    }

    /// Like `listen`, reporting every resolution to `observer` as it happens
    pub async fn listen_with<F>(&mut self, mut observer: F) -> FormResult<DictationSummary>
    where
        F: FnMut(&Resolution) + Send,
    {
        self.source.start().await?;
        self.engine.start_listening();

        info!(
            schema = self.engine.schema().name,
            session_id = %self.engine.state().session_id(),
            "Dictation started"
        );

        let mut summary = DictationSummary::default();

        while let Some(transcript) = self.source.next_transcript().await {
            let resolution = self.engine.handle_transcript(&transcript);
            observer(&resolution);

            match resolution {
                Resolution::Filled(_) => summary.filled += 1,
                Resolution::Unresolved => summary.unresolved += 1,
                Resolution::Ignored => {}
                Resolution::StopRequested => {
                    summary.stopped_by_directive = true;
                    self.source.stop().await?;
                    break;
                }
            }
        }

        self.engine.end_listening();

        info!(
            session_id = %self.engine.state().session_id(),
            filled = summary.filled,
            unresolved = summary.unresolved,
            stopped_by_directive = summary.stopped_by_directive,
            "Dictation ended"
        );

        Ok(summary)
    }

    pub fn into_parts(self) -> (ResolutionEngine, S) {
        (self.engine, self.source)
    }
}
