// self
use crate::obs::{FlowKind, FlowOutcome};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"cluster_token_exchange_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Counts a failed flow under its error family label (when enabled).
pub fn record_flow_failure(kind: FlowKind, class: &'static str) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"cluster_token_exchange_flow_errors_total",
			"flow" => kind.as_str(),
			"class" => class
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, class);
	}
}
