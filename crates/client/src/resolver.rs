//! Verdict Resolver
//!
//! Drives a [`StageDemuxer`] against a live byte stream and stops at the
//! first `"final"` stage. Returning early drops the stream, which aborts the
//! underlying HTTP transfer so no further bytes are read.

use futures_util::{Stream, StreamExt};
use ittia_check_core::{ExtractError, StageDemuxer, StageEvent};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::types::{CheckError, CheckResult};

/// One resolution run over one stream. Consumed by [`resolve`](Self::resolve).
#[derive(Debug, Default)]
pub struct VerdictResolver {
    demuxer: StageDemuxer,
    progress: Option<mpsc::Sender<StageEvent>>,
    cancellation_token: Option<CancellationToken>,
    stages_seen: usize,
}

impl VerdictResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward every extracted stage, including the final one, to `tx`.
    ///
    /// Delivery never waits on the receiver: a stage that finds the channel
    /// full is dropped so a slow consumer cannot stall the body read.
    pub fn with_progress(mut self, tx: mpsc::Sender<StageEvent>) -> Self {
        self.progress = Some(tx);
        self
    }

    /// Abort the run with [`CheckError::Cancelled`] when `token` fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Consume `stream` until a final stage is found or the stream ends.
    ///
    /// Returns the final stage's content, `None` if the stream ended without
    /// one, or the stream's transport error.
    pub async fn resolve<S, B, E>(mut self, stream: S) -> CheckResult<Option<Value>>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: Into<CheckError>,
    {
        futures_util::pin_mut!(stream);
        let token = self.cancellation_token.clone().unwrap_or_default();

        loop {
            let next = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(stages = self.stages_seen, "check cancelled");
                    return Err(CheckError::Cancelled);
                }
                next = stream.next() => next,
            };

            let chunk = match next {
                Some(Ok(chunk)) => chunk,
                Some(Err(e)) => return Err(e.into()),
                None => break,
            };

            self.demuxer.push_bytes(chunk.as_ref());
            if let Some(content) = self.drain_buffer() {
                return Ok(Some(content));
            }
        }

        if !self.demuxer.is_empty() {
            debug!(
                leftover = self.demuxer.buffered().len(),
                "stream ended with unconsumed data"
            );
        }
        warn!(stages = self.stages_seen, "No result found");
        Ok(None)
    }

    /// Extract every complete stage currently buffered.
    ///
    /// Returns the final content as soon as it is seen; anything after it in
    /// the buffer is ignored.
    fn drain_buffer(&mut self) -> Option<Value> {
        loop {
            match self.demuxer.next_event() {
                Ok(Some(event)) => {
                    self.stages_seen += 1;
                    debug!(stage = event.stage_name(), "stage received");

                    if event.is_final() {
                        let content = event.content.clone();
                        self.emit(event);
                        return Some(content);
                    }
                    self.emit(event);
                }
                Ok(None) => return None,
                Err(ExtractError::Stray { consumed }) => {
                    debug!(consumed, "skipped non-object text");
                }
                Err(e) => {
                    warn!(error = %e, "skipping malformed stage object");
                }
            }
        }
    }

    fn emit(&self, event: StageEvent) {
        let Some(tx) = &self.progress else {
            return;
        };
        match tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                debug!(stage = event.stage_name(), "progress channel full, dropping stage");
            }
            // A dropped receiver only means nobody is watching progress.
            Err(TrySendError::Closed(_)) => {}
        }
    }
}
