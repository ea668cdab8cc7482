#[cfg(test)]
use std::collections::BTreeMap;

#[cfg(test)]
use tokio::sync::Mutex;

use crate::error::RateError;
use crate::rate_record::{NewRate, RateRecord};

/// Durable collection of rates keyed by a store-assigned id.
///
/// Implementations do not validate; callers run
/// [`validate`](crate::validator::validate) against [`RateStore::list`]
/// before mutating.
#[allow(async_fn_in_trait)]
pub trait RateStore {
    async fn list(&self) -> Result<Vec<RateRecord>, RateError>;

    async fn get(&self, id: i64) -> Result<RateRecord, RateError>;

    /// Persist a new rate under a fresh id. Ids are never reused.
    async fn create(&self, new_rate: NewRate) -> Result<RateRecord, RateError>;

    async fn update(&self, id: i64, new_rate: NewRate) -> Result<RateRecord, RateError>;

    async fn delete(&self, id: i64) -> Result<(), RateError>;
}

#[cfg(test)]
#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    records: BTreeMap<i64, RateRecord>,
}

/// Process-local store, nothing survives a restart.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryRateStore {
    state: Mutex<MemoryState>,
}

#[cfg(test)]
impl MemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl RateStore for MemoryRateStore {
    async fn list(&self) -> Result<Vec<RateRecord>, RateError> {
        let state = self.state.lock().await;
        Ok(state.records.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<RateRecord, RateError> {
        let state = self.state.lock().await;
        state.records.get(&id).cloned().ok_or(RateError::NotFound(id))
    }

    async fn create(&self, new_rate: NewRate) -> Result<RateRecord, RateError> {
        let mut state = self.state.lock().await;
        state.last_id += 1;
        let record = new_rate.into_record(state.last_id);
        state.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: i64, new_rate: NewRate) -> Result<RateRecord, RateError> {
        let mut state = self.state.lock().await;
        let record = state.records.get_mut(&id).ok_or(RateError::NotFound(id))?;
        record.date = new_rate.date;
        record.rate = new_rate.rate;
        Ok(record.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), RateError> {
        let mut state = self.state.lock().await;
        state
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or(RateError::NotFound(id))
    }
}
