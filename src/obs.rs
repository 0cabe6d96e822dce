//! Observability helpers for the submission pipeline.
//!
//! # Feature Flags
//!
//! - Structured `tracing` events are always emitted at the pipeline's decision points;
//!   [`init`] installs an env-filtered subscriber for the binary.
//! - Enable `metrics` to additionally increment the `telemetry_relay_stage_total` counter
//!   for every attempt/success/failure, labeled by `stage` + `outcome`.

mod metrics;

pub use metrics::*;

// crates.io
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
// self
use crate::_prelude::*;

/// Pipeline stages observed per reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubmissionStage {
	/// Assertion signing plus token exchange (one refresh cycle).
	Exchange,
	/// Handoff to the submit collaborator.
	Submit,
}
impl SubmissionStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SubmissionStage::Exchange => "exchange",
			SubmissionStage::Submit => "submit",
		}
	}
}
impl Display for SubmissionStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Entry to the stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure handled by the pipeline's drop-and-continue policy.
	Failure,
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure => "failure",
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Installs the relay's global tracing subscriber (env-filtered, stderr formatting).
///
/// Intended for the binary; tests and embedders install their own subscribers.
pub fn init() {
	tracing_subscriber::registry()
		.with(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| "telemetry_relay=info".into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();
}
