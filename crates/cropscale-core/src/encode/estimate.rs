//! Asynchronous size estimation with stale-result discarding.
//!
//! Each render issues a new [`Generation`] from the [`PayloadSlot`] and hands
//! the host an [`EstimateJob`]. Jobs may complete in any order; only the
//! result for the most recently issued generation is stored; older ones are
//! dropped. A job that is already superseded when it gets to run skips the
//! encode entirely.

use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use super::{encode_bitmap, EncodeError, EncodedPayload, OutputFormat};
use crate::decode::Bitmap;

/// Monotonic tag of a render round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Pending encode of one rendered bitmap.
#[derive(Debug, Clone)]
pub struct EstimateJob {
    generation: Generation,
    issued: Rc<Cell<u64>>,
    bitmap: Rc<Bitmap>,
    format: OutputFormat,
    quality: u8,
}

impl EstimateJob {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// True once the slot has issued a newer generation.
    pub fn is_superseded(&self) -> bool {
        self.issued.get() != self.generation.0
    }

    /// Encode the bitmap, yielding to the executor once first so newer
    /// renders can be issued while this one is queued.
    pub async fn run(self) -> EstimateResult {
        YieldNow::default().await;
        self.run_now()
    }

    /// Encode synchronously, unless already superseded.
    pub fn run_now(self) -> EstimateResult {
        let result = if self.is_superseded() {
            log::debug!("skipping superseded estimate {}", self.generation.0);
            None
        } else {
            Some(encode_bitmap(&self.bitmap, self.format, self.quality))
        };
        EstimateResult {
            generation: self.generation,
            result,
        }
    }
}

/// Completed estimate, tagged with the generation it was issued for.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateResult {
    pub generation: Generation,
    /// `None` when the encode was skipped because the job was superseded.
    pub result: Option<Result<EncodedPayload, EncodeError>>,
}

/// What happened to a completed estimate.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimateOutcome {
    /// Stored as the current payload.
    Applied,
    /// A newer generation was issued; result discarded.
    Stale,
    /// Encoding failed; the previous payload (if any) is kept.
    Failed(EncodeError),
}

/// Single current-payload slot guarded by a generation counter.
///
/// The counter is shared with every issued job so a job can tell it is
/// stale before doing any work.
#[derive(Debug, Default)]
pub struct PayloadSlot {
    issued: Rc<Cell<u64>>,
    payload: Option<EncodedPayload>,
}

impl PayloadSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a job for the next generation. Every earlier job becomes stale.
    pub fn issue(&mut self, bitmap: Rc<Bitmap>, format: OutputFormat, quality: u8) -> EstimateJob {
        let generation = self.advance();
        EstimateJob {
            generation,
            issued: Rc::clone(&self.issued),
            bitmap,
            format,
            quality,
        }
    }

    fn advance(&mut self) -> Generation {
        let next = self.issued.get() + 1;
        self.issued.set(next);
        Generation(next)
    }

    /// Store a completed estimate unless it is stale.
    pub fn complete(&mut self, result: EstimateResult) -> EstimateOutcome {
        let latest = self.issued.get();
        let outcome = match result.result {
            Some(outcome) if result.generation.0 == latest => outcome,
            _ => {
                log::debug!(
                    "dropping stale estimate {} (latest {})",
                    result.generation.value(),
                    latest
                );
                return EstimateOutcome::Stale;
            }
        };

        match outcome {
            Ok(payload) => {
                log::debug!(
                    "estimate {} applied: {} bytes {}",
                    result.generation.value(),
                    payload.len(),
                    payload.mime_type()
                );
                self.payload = Some(payload);
                EstimateOutcome::Applied
            }
            Err(e) => {
                log::warn!("estimate {} failed: {}", result.generation.value(), e);
                EstimateOutcome::Failed(e)
            }
        }
    }

    /// The last successfully applied payload.
    pub fn payload(&self) -> Option<&EncodedPayload> {
        self.payload.as_ref()
    }

    /// Forget the stored payload and invalidate every outstanding job.
    pub fn clear(&mut self) {
        self.advance();
        self.payload = None;
    }
}

/// Human-readable size estimate, e.g. `"Estimated size: 12.3 KB"`.
pub fn format_size_label(bytes: usize) -> String {
    format!("Estimated size: {:.1} KB", bytes as f64 / 1024.0)
}

/// Resolves on the second poll, giving the executor a chance to run others.
#[derive(Debug, Default)]
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}
