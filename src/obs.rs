//! Optional observability helpers for exchange flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `cluster_token_exchange.flow` with the `flow`
//!   (operation) and `stage` (call site) fields, plus one event per outcome.
//! - Enable `metrics` to increment the `cluster_token_exchange_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`. Failures also increment
//!   `cluster_token_exchange_flow_errors_total`, labeled by `flow` + `class`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, error::ResponseError};

/// Exchange operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Service-account client-credentials login.
	ServiceAccount,
	/// Cluster-scoped token exchange for a user.
	ClusterToken,
	/// User-to-cluster lookup.
	UserCluster,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::ServiceAccount => "service_account",
			FlowKind::ClusterToken => "cluster_token",
			FlowKind::UserCluster => "user_cluster",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Returns the stable label of the error family `err` belongs to.
pub fn failure_class(err: &Error) -> &'static str {
	match err {
		Error::Config(_) => "config",
		Error::Precondition(_) => "precondition",
		Error::Transport(_) => "transport",
		Error::Upstream { source: ResponseError::Rejected { .. }, .. } => "rejected",
		Error::Upstream { source: ResponseError::MalformedBody { .. }, .. } => "malformed",
		Error::Parse(_) => "parse",
		Error::EmptyToken { .. } => "empty_token",
	}
}

/// Records the outcome of a finished operation via metrics and, when enabled, a log event.
pub fn record_result<T>(kind: FlowKind, result: &Result<T>) {
	match result {
		Ok(_) => {
			record_flow_outcome(kind, FlowOutcome::Success);
			trace_success(kind);
		},
		Err(err) => {
			let class = failure_class(err);

			record_flow_outcome(kind, FlowOutcome::Failure);
			record_flow_failure(kind, class);
			trace_failure(kind, class, err);
		},
	}
}
