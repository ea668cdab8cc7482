//! Read-validate-write sequencing around a [`RateStore`].
//!
//! Validation reads a full snapshot and the write follows without a lock, so
//! two concurrent creates for the same date can both pass.

use crate::error::RateError;
use crate::rate_record::{RateCandidate, RateRecord};
use crate::store::RateStore;
use crate::validator::validate;

pub async fn list_rates<S: RateStore>(store: &S) -> Result<Vec<RateRecord>, RateError> {
    store.list().await
}

pub async fn get_rate<S: RateStore>(store: &S, id: i64) -> Result<RateRecord, RateError> {
    store.get(id).await
}

pub async fn create_rate<S: RateStore>(
    store: &S,
    candidate: &RateCandidate,
) -> Result<RateRecord, RateError> {
    let snapshot = store.list().await?;
    let new_rate = validate(candidate, &snapshot).map_err(|errors| {
        log::debug!("rejected new rate {candidate:?}: {errors:?}");
        RateError::Validation(errors)
    })?;

    store.create(new_rate).await
}

pub async fn update_rate<S: RateStore>(
    store: &S,
    id: i64,
    candidate: &RateCandidate,
) -> Result<RateRecord, RateError> {
    store.get(id).await?;

    let others: Vec<RateRecord> = store
        .list()
        .await?
        .into_iter()
        .filter(|r| r.id != id)
        .collect();
    let new_rate = validate(candidate, &others).map_err(|errors| {
        log::debug!("rejected update of rate {id} to {candidate:?}: {errors:?}");
        RateError::Validation(errors)
    })?;

    store.update(id, new_rate).await
}

pub async fn delete_rate<S: RateStore>(store: &S, id: i64) -> Result<(), RateError> {
    store.delete(id).await
}
