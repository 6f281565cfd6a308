// Announcer: a worker task that owns the single in-flight utterance.
//
// Requests arrive over an mpsc channel. A new request drops (and thereby
// stops) the current utterance before the next one starts, so at most one
// utterance is ever audible. Backend failures are logged and swallowed.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{SpeechBackend, VoiceSettings};
use crate::error::SpeechError;

type Utterance = Pin<Box<dyn Future<Output = Result<(), SpeechError>> + Send>>;

#[derive(Debug)]
enum SpeechRequest {
    Speak { text: String, voice: VoiceSettings },
    Cancel,
}

/// Handle to the speech worker. Dropping it stops the worker and any
/// utterance in progress.
pub struct Announcer {
    tx: mpsc::Sender<SpeechRequest>,
    backend_name: String,
    worker: JoinHandle<()>,
}

impl Announcer {
    /// Spawn the worker on the current tokio runtime.
    pub fn spawn(backend: Arc<dyn SpeechBackend>) -> Self {
        let (tx, rx) = mpsc::channel(16);
        let backend_name = backend.name().to_string();
        info!("Speech backend: {}", backend_name);
        let worker = tokio::spawn(run_worker(backend, rx));
        Announcer {
            tx,
            backend_name,
            worker,
        }
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// Cancel whatever is being spoken and speak `text` instead.
    pub async fn announce(&self, text: impl Into<String>, voice: &VoiceSettings) {
        let request = SpeechRequest::Speak {
            text: text.into(),
            voice: voice.clone(),
        };
        if self.tx.send(request).await.is_err() {
            warn!("Speech worker has stopped; dropping announcement");
        }
    }

    /// Stop the current utterance, if any.
    pub async fn cancel(&self) {
        let _ = self.tx.send(SpeechRequest::Cancel).await;
    }
}

impl Drop for Announcer {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn run_worker(backend: Arc<dyn SpeechBackend>, mut rx: mpsc::Receiver<SpeechRequest>) {
    let mut current: Option<Utterance> = None;

    loop {
        tokio::select! {
            request = rx.recv() => {
                match request {
                    Some(SpeechRequest::Speak { text, voice }) => {
                        // Dropping the old future stops it before the new one is polled.
                        if current.take().is_some() {
                            debug!("Cancelled in-flight utterance");
                        }
                        let backend = Arc::clone(&backend);
                        current = Some(Box::pin(async move { backend.speak(&text, &voice).await }));
                    }
                    Some(SpeechRequest::Cancel) => {
                        if current.take().is_some() {
                            debug!("Cancelled in-flight utterance");
                        }
                    }
                    None => break,
                }
            }

            result = async {
                match current.as_mut() {
                    Some(utterance) => utterance.as_mut().await,
                    None => std::future::pending().await,
                }
            }, if current.is_some() => {
                current = None;
                if let Err(e) = result {
                    warn!("Speech failed: {}", e);
                }
            }
        }
    }

    debug!("Speech worker exiting");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
