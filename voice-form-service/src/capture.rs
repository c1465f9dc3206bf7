use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;
use crate::error::FormResult;

/// External speech capture that yields finalized transcripts
#[async_trait]
pub trait TranscriptSource: Send {
    /// Begin or restart capture
    async fn start(&mut self) -> FormResult<()>;

    /// Next finalized transcript. `None` means capture ended on its own.
    async fn next_transcript(&mut self) -> Option<String>;

    /// Halt capture
    async fn stop(&mut self) -> FormResult<()>;
}

/// Transcript source fed through a tokio channel.
///
/// While stopped, `next_transcript` yields `None` and anything sent is
/// held in the channel until the next `start`.
pub struct ChannelTranscriptSource {
    receiver: mpsc::Receiver<String>,
    active: bool,
}

impl ChannelTranscriptSource {
    pub fn new(receiver: mpsc::Receiver<String>) -> Self {
        Self {
            receiver,
            active: false,
        }
    }

    /// Sender and source pair with the given buffer size
    pub fn channel(buffer: usize) -> (mpsc::Sender<String>, Self) {
        let (sender, receiver) = mpsc::channel(buffer);
        (sender, Self::new(receiver))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[async_trait]
impl TranscriptSource for ChannelTranscriptSource {
    async fn start(&mut self) -> FormResult<()> {
        debug!("Channel capture started");
        self.active = true;
        Ok(())
    }

    async fn next_transcript(&mut self) -> Option<String> {
        if !self.active {
            return None;
        }
        let transcript = self.receiver.recv().await;
        if transcript.is_none() {
            self.active = false;
        }
        transcript
    }

    async fn stop(&mut self) -> FormResult<()> {
        debug!("Channel capture stopped");
        self.active = false;
        Ok(())
    }
}
