//! Request lifecycle: one `generate` call maps to one backend call, and only
//! the most recently issued call may change what the user sees.

use std::{sync::Arc, time::Duration};

use shared::{
    domain::RequestSeq,
    error::FailureReason,
    protocol::{GenerationRequest, GenerationResult},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{backend::GenerationBackend, error::GenerationError, store::ResultStore};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LifecycleState {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed(FailureReason),
}

impl LifecycleState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Message sent from a finished backend task back to the controller.
#[derive(Debug)]
pub struct Completion {
    pub seq: RequestSeq,
    pub outcome: Result<GenerationResult, GenerationError>,
}

pub struct RequestController {
    backend: Arc<dyn GenerationBackend>,
    request_timeout: Duration,
    state: LifecycleState,
    store: ResultStore,
    latest_seq: RequestSeq,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl RequestController {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            state: LifecycleState::Idle,
            store: ResultStore::new(),
            latest_seq: RequestSeq::default(),
            completions_tx,
            completions_rx,
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn latest_seq(&self) -> RequestSeq {
        self.latest_seq
    }

    /// Starts a generation request for `prompt`.
    ///
    /// The state is `Loading` when this returns; the outcome arrives later as a
    /// [`Completion`] that must be fed to [`apply`](Self::apply), usually via
    /// [`recv_completion`](Self::recv_completion) or [`settle`](Self::settle).
    /// Must be called from within a tokio runtime.
    pub fn generate(&mut self, prompt: impl Into<String>) -> RequestSeq {
        let seq = self.latest_seq.next();
        self.latest_seq = seq;
        self.state = LifecycleState::Loading;
        self.store.clear_error();

        let request = GenerationRequest::new(prompt);
        info!(seq = seq.0, prompt_len = request.prompt.len(), "starting hyper-generate request");

        let backend = Arc::clone(&self.backend);
        let timeout = self.request_timeout;
        let completions_tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let call = backend.hyper_generate(&request);
            let outcome = match tokio::time::timeout(timeout, call).await {
                Ok(outcome) => outcome,
                Err(_) => Err(GenerationError::Timeout { after: timeout }),
            };
            // The receiver lives as long as the controller; a send error only
            // means the controller was dropped mid-flight.
            let _ = completions_tx.send(Completion { seq, outcome });
        });

        seq
    }

    /// Applies a completion if it belongs to the latest issued request.
    ///
    /// Returns `false` when the completion was stale and discarded.
    pub fn apply(&mut self, completion: Completion) -> bool {
        let Completion { seq, outcome } = completion;
        if seq != self.latest_seq {
            debug!(
                seq = seq.0,
                latest = self.latest_seq.0,
                "discarding stale hyper-generate completion"
            );
            return false;
        }

        match outcome {
            Ok(result) => {
                info!(seq = seq.0, empty = result.is_empty(), "hyper-generate succeeded");
                self.store.set_result(result);
                self.state = LifecycleState::Succeeded;
            }
            Err(err) => {
                let reason = err.reason();
                warn!(seq = seq.0, error = %err, reason = %reason, "hyper-generate failed");
                self.store.set_error(reason.clone());
                self.state = LifecycleState::Failed(reason);
            }
        }
        true
    }

    /// Waits for the next completion from any in-flight request.
    ///
    /// Pending forever when nothing is in flight; intended for `select!` loops.
    pub async fn recv_completion(&mut self) -> Option<Completion> {
        self.completions_rx.recv().await
    }

    /// Applies every completion that has already arrived, without waiting.
    pub fn poll_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            if self.apply(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits until the latest request has completed.
    pub async fn settle(&mut self) -> &LifecycleState {
        while self.state.is_loading() {
            match self.completions_rx.recv().await {
                Some(completion) => {
                    self.apply(completion);
                }
                None => break,
            }
        }
        &self.state
    }
}
