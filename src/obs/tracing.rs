// self
use crate::{_prelude::*, obs::FlowKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by exchange flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("cluster_token_exchange.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event for a completed operation.
pub fn trace_success(kind: FlowKind) {
	#[cfg(feature = "tracing")]
	tracing::debug!(flow = kind.as_str(), "Auth server exchange succeeded.");
	#[cfg(not(feature = "tracing"))]
	let _ = kind;
}

/// Emits a warning event for a failed operation.
///
/// The event carries the error family, the upstream HTTP status when the server answered, and
/// the rendered error.
pub fn trace_failure(kind: FlowKind, class: &'static str, err: &Error) {
	#[cfg(feature = "tracing")]
	tracing::warn!(
		flow = kind.as_str(),
		class,
		status = err.response_error().map(|source| source.status()),
		error = %err,
		"Auth server exchange failed."
	);
	#[cfg(not(feature = "tracing"))]
	let _ = (kind, class, err);
}
