//! Record storage
//!
//! Services depend on the [`Repository`] trait only. The in-memory
//! implementation keeps insertion order and stamps `created_at` /
//! `updated_at` the way a database would.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use shared::{Harvest, Planting};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A storable record with an id and persistence timestamps
pub trait Record: Clone + Send + Sync + 'static {
    /// Resource name used in error messages
    const KIND: &'static str;

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn set_timestamps(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>);
}

impl Record for Planting {
    const KIND: &'static str = "Planting";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn set_timestamps(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
        self.created_at = created_at;
        self.updated_at = updated_at;
    }
}

impl Record for Harvest {
    const KIND: &'static str = "Harvest";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn set_timestamps(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
        self.created_at = created_at;
        self.updated_at = updated_at;
    }
}

/// CRUD access to one record type
pub trait Repository<T: Record>: Send + Sync {
    fn list(&self) -> AppResult<Vec<T>>;
    fn get(&self, id: Uuid) -> AppResult<Option<T>>;
    fn create(&self, record: T) -> AppResult<T>;
    /// Create unless a stored record matches `conflicts`
    ///
    /// The check and the insert are one atomic step. Returns `None` on a
    /// conflict.
    fn create_unless(
        &self,
        record: T,
        conflicts: &(dyn Fn(&T) -> bool + Sync),
    ) -> AppResult<Option<T>>;
    fn update(&self, record: T) -> AppResult<T>;
    /// Returns whether a record was removed
    fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Vector-backed repository
pub struct InMemoryRepository<T> {
    records: RwLock<Vec<T>>,
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    fn poisoned() -> AppError {
        AppError::Internal(format!("{} store lock poisoned", T::KIND))
    }

    fn insert(records: &mut Vec<T>, mut record: T) -> AppResult<T> {
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(AppError::DuplicateEntry("id".to_string()));
        }

        let now = Utc::now();
        record.set_timestamps(now, now);
        records.push(record.clone());
        Ok(record)
    }
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Repository<T> for InMemoryRepository<T> {
    fn list(&self) -> AppResult<Vec<T>> {
        let records = self.records.read().map_err(|_| Self::poisoned())?;
        Ok(records.clone())
    }

    fn get(&self, id: Uuid) -> AppResult<Option<T>> {
        let records = self.records.read().map_err(|_| Self::poisoned())?;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    fn create(&self, record: T) -> AppResult<T> {
        let mut records = self.records.write().map_err(|_| Self::poisoned())?;
        Self::insert(&mut records, record)
    }

    fn create_unless(
        &self,
        record: T,
        conflicts: &(dyn Fn(&T) -> bool + Sync),
    ) -> AppResult<Option<T>> {
        let mut records = self.records.write().map_err(|_| Self::poisoned())?;
        if records.iter().any(conflicts) {
            return Ok(None);
        }
        Self::insert(&mut records, record).map(Some)
    }

    fn update(&self, mut record: T) -> AppResult<T> {
        let mut records = self.records.write().map_err(|_| Self::poisoned())?;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| AppError::NotFound(T::KIND.to_string()))?;

        record.set_timestamps(slot.created_at(), Utc::now());
        *slot = record.clone();
        Ok(record)
    }

    fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut records = self.records.write().map_err(|_| Self::poisoned())?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        Ok(records.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal::Decimal;

    fn harvest(n: u128) -> Harvest {
        let epoch = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        Harvest {
            id: Uuid::from_u128(n),
            planting_id: Uuid::from_u128(100 + n),
            harvest_date: NaiveDate::from_ymd_opt(2025, 1, 12).unwrap(),
            weight_grams: Decimal::from(120),
            quality: 4,
            notes: None,
            created_at: epoch,
            updated_at: epoch,
        }
    }

    #[test]
    fn test_create_stamps_timestamps_and_keeps_order() {
        let repo = InMemoryRepository::<Harvest>::new();
        let first = repo.create(harvest(1)).unwrap();
        repo.create(harvest(2)).unwrap();

        assert!(first.created_at.timestamp() > 946_684_800);
        assert_eq!(first.created_at, first.updated_at);
        let ids: Vec<u128> = repo.list().unwrap().iter().map(|h| h.id.as_u128()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_create_rejects_duplicate_id() {
        let repo = InMemoryRepository::<Harvest>::new();
        repo.create(harvest(1)).unwrap();
        assert!(matches!(repo.create(harvest(1)), Err(AppError::DuplicateEntry(_))));
    }

    #[test]
    fn test_create_unless_skips_on_conflict() {
        let repo = InMemoryRepository::<Harvest>::new();
        let same_planting = |h: &Harvest| h.planting_id == Uuid::from_u128(101);

        assert!(repo.create_unless(harvest(1), &same_planting).unwrap().is_some());
        let mut again = harvest(2);
        again.planting_id = Uuid::from_u128(101);
        assert!(repo.create_unless(again, &same_planting).unwrap().is_none());
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn test_update_preserves_created_at() {
        let repo = InMemoryRepository::<Harvest>::new();
        let created = repo.create(harvest(1)).unwrap();

        let mut changed = harvest(1);
        changed.quality = 5;
        let updated = repo.update(changed).unwrap();

        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(repo.get(Uuid::from_u128(1)).unwrap().unwrap().quality, 5);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let repo: InMemoryRepository<Harvest> = InMemoryRepository::new();
        assert!(matches!(repo.update(harvest(9)), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_delete() {
        let repo = InMemoryRepository::<Harvest>::new();
        repo.create(harvest(1)).unwrap();
        assert!(repo.delete(Uuid::from_u128(1)).unwrap());
        assert!(!repo.delete(Uuid::from_u128(1)).unwrap());
        assert!(repo.get(Uuid::from_u128(1)).unwrap().is_none());
    }
}
