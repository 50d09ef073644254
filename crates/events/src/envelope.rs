use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chrono::{DateTime, Utc};
use matchday_core::{AggregateId, DomainError, DomainResult};

use crate::event::Event;

/// A match event plus its position in the match history.
///
/// `sequence_number` starts at 1 and grows by one per event of the stream;
/// [`verify_stream`] checks that before a history is replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,

    aggregate_id: AggregateId,
    aggregate_type: String,

    sequence_number: u64,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        aggregate_id: AggregateId,
        aggregate_type: impl Into<String>,
        sequence_number: u64,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            aggregate_id,
            aggregate_type: aggregate_type.into(),
            sequence_number,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn aggregate_id(&self) -> AggregateId {
        self.aggregate_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl<E: Event> EventEnvelope<E> {
    pub fn event_type(&self) -> &'static str {
        self.payload.event_type()
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.payload.occurred_at()
    }
}

/// Check that every envelope belongs to `aggregate_id` and that the stream is
/// numbered 1, 2, 3, ... without gaps.
pub fn verify_stream<E>(aggregate_id: AggregateId, stream: &[EventEnvelope<E>]) -> DomainResult<()> {
    for (expected, envelope) in (1u64..).zip(stream) {
        if envelope.aggregate_id != aggregate_id {
            return Err(DomainError::invariant(format!(
                "event {} belongs to another stream",
                envelope.event_id
            )));
        }
        if envelope.sequence_number != expected {
            return Err(DomainError::invariant(format!(
                "history out of order: expected sequence {expected}, found {}",
                envelope.sequence_number
            )));
        }
    }
    Ok(())
}
