//! Bounded intake queue and the single consumer that serializes submissions.

// std
use std::time::Duration as StdDuration;
// crates.io
use tokio::{sync::mpsc, task::JoinHandle};
// self
use crate::{
	_prelude::*,
	auth::{AssertionSigner, TokenCache},
	exchange::TokenExchanger,
	obs::{self, StageOutcome, SubmissionStage},
	reading::Reading,
	submit::DocumentSubmitter,
};

/// Default queue capacity. The deliberately tiny bound pushes backpressure to the HTTP
/// intake instead of buffering unbounded pending work in memory.
pub const QUEUE_CAPACITY: usize = 1;
/// Fixed wait after a failed token refresh before the consumer pulls the next item.
pub const REFRESH_BACKOFF: StdDuration = StdDuration::from_secs(5);

/// Rejection returned by [`IntakeHandle::enqueue`] once the consumer has terminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
#[error("Submission pipeline has shut down.")]
pub struct PipelineClosed;

/// Clonable producer side of the pipeline queue.
///
/// Any number of intake callers may enqueue concurrently; a caller awaiting on a full
/// queue is the system's sole backpressure mechanism, and no reading is ever dropped at
/// the enqueue stage.
#[derive(Clone, Debug)]
pub struct IntakeHandle {
	queue: mpsc::Sender<Reading>,
}
impl IntakeHandle {
	/// Enqueues a reading, suspending the caller while the queue is full.
	pub async fn enqueue(&self, reading: Reading) -> Result<(), PipelineClosed> {
		self.queue.send(reading).await.map_err(|_| PipelineClosed)
	}
}

/// Single-consumer pipeline that drains queued readings in strict FIFO order.
///
/// For every dequeued reading the consumer ensures a valid token first (refreshing via the
/// signer and exchanger when the cache is near expiry) and then hands the reading to the
/// submit collaborator with the bearer attached.
///
/// Failure policy: a failed refresh discards the current reading and backs off before the
/// next dequeue; requeueing the item in front of a capacity-one queue would stall intake
/// for as long as credentials stay broken, so the relay trades that reading for liveness.
/// A failed submission is logged and terminal for that single reading. No failure stops
/// the consumer.
pub struct SubmissionPipeline {
	signer: AssertionSigner,
	exchanger: TokenExchanger,
	submitter: Arc<dyn DocumentSubmitter>,
	cache: TokenCache,
	queue_capacity: usize,
	refresh_backoff: StdDuration,
}
impl SubmissionPipeline {
	/// Creates a pipeline with the default queue capacity and refresh backoff.
	pub fn new(
		signer: AssertionSigner,
		exchanger: TokenExchanger,
		submitter: Arc<dyn DocumentSubmitter>,
	) -> Self {
		Self {
			signer,
			exchanger,
			submitter,
			cache: TokenCache::new(),
			queue_capacity: QUEUE_CAPACITY,
			refresh_backoff: REFRESH_BACKOFF,
		}
	}

	/// Overrides the queue capacity (clamped to at least one slot).
	pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
		self.queue_capacity = capacity.max(1);

		self
	}

	/// Overrides the refresh-failure backoff.
	pub fn with_refresh_backoff(mut self, backoff: StdDuration) -> Self {
		self.refresh_backoff = backoff;

		self
	}

	/// Starts the consumer task and returns the producer handle.
	///
	/// Exactly one consumer runs for the pipeline's lifetime. Once every [`IntakeHandle`]
	/// clone has been dropped the consumer drains the readings already queued and then
	/// exits; the returned [`JoinHandle`] resolves at that point.
	pub fn spawn(self) -> (IntakeHandle, JoinHandle<()>) {
		let (sender, receiver) = mpsc::channel(self.queue_capacity);
		let consumer = tokio::spawn(self.run(receiver));

		(IntakeHandle { queue: sender }, consumer)
	}

	async fn run(mut self, mut queue: mpsc::Receiver<Reading>) {
		while let Some(reading) = queue.recv().await {
			self.process(reading).await;
		}

		tracing::debug!("All intake handles dropped; consumer drained the queue and is exiting.");
	}

	async fn process(&mut self, reading: Reading) {
		let now = OffsetDateTime::now_utc();

		if !self.cache.is_valid(now) {
			obs::record_stage_outcome(SubmissionStage::Exchange, StageOutcome::Attempt);

			if let Err(error) = self.cache.refresh(&self.signer, &self.exchanger, now).await {
				obs::record_stage_outcome(SubmissionStage::Exchange, StageOutcome::Failure);
				tracing::warn!(
					error = %error,
					backoff_secs = self.refresh_backoff.as_secs(),
					"Token refresh failed; dropping the current reading and backing off.",
				);
				tokio::time::sleep(self.refresh_backoff).await;

				return;
			}

			obs::record_stage_outcome(SubmissionStage::Exchange, StageOutcome::Success);
		}

		// A token is always held here after a valid check or successful refresh.
		let Some(bearer) = self.cache.bearer() else {
			return;
		};

		obs::record_stage_outcome(SubmissionStage::Submit, StageOutcome::Attempt);

		match self.submitter.submit(&reading, bearer).await {
			Ok(()) => {
				obs::record_stage_outcome(SubmissionStage::Submit, StageOutcome::Success);
				tracing::info!("Reading submitted.");
			},
			Err(error) => {
				obs::record_stage_outcome(SubmissionStage::Submit, StageOutcome::Failure);
				tracing::warn!(error = %error, "Submission failed; reading dropped.");
			},
		}
	}
}
impl Debug for SubmissionPipeline {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SubmissionPipeline")
			.field("token_endpoint", self.exchanger.token_endpoint())
			.field("queue_capacity", &self.queue_capacity)
			.field("refresh_backoff", &self.refresh_backoff)
			.finish()
	}
}
