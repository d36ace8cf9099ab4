use anyhow::Context;
use time::{OffsetDateTime, PrimitiveDateTime};
use crate::visitor::error::VisitorLogError;
use crate::visitor::record::truncate_to_second;

/// Source of the submission timestamp.
pub trait Clock {
    fn now(&self) -> Result<PrimitiveDateTime, VisitorLogError>;
}

/// Local wall-clock time with the offset dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<PrimitiveDateTime, VisitorLogError> {
        let local_clock = OffsetDateTime::now_local()
            .context("getting current time in local timezone")
            .map_err(|e| VisitorLogError::Clock { source: e })?;

        Ok(truncate_to_second(PrimitiveDateTime::new(local_clock.date(), local_clock.time())))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub PrimitiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> Result<PrimitiveDateTime, VisitorLogError> {
        Ok(truncate_to_second(self.0))
    }
}
