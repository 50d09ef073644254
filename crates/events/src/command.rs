use matchday_core::AggregateId;

/// A command targets a specific aggregate.
///
/// Commands represent **intent** ("record a goal for the home side"); the
/// aggregate either rejects them or turns them into events (facts). They are
/// transient and never stored.
///
/// Commands own all their data so they can be queued, logged and replayed
/// from a script.
pub trait Command: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn target_aggregate_id(&self) -> AggregateId;
}
