//! In-process fake of the variety API with failure injection

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{NewVariety, Variety, VarietyPatch};

use crate::api::{ApiError, ApiResult, VarietyApi};

#[derive(Default)]
pub struct FakeApi {
    pub records: Mutex<Vec<Variety>>,
    pub fail_list: AtomicBool,
    pub fail_get: AtomicBool,
    pub fail_create: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_delete: AtomicBool,
    pub list_calls: AtomicUsize,
    next_id: AtomicUsize,
}

fn unavailable() -> ApiError {
    ApiError::Transport("connection refused".to_string())
}

pub fn variety(id: &str, crop: &str, yield_kg: i64, sowing: (i32, u32, u32), days: u32, health: u8) -> Variety {
    Variety::from_new(
        id,
        NewVariety {
            crop_name: crop.to_string(),
            variety_name: format!("{} variety", crop),
            expected_yield: Decimal::from(yield_kg),
            sowing_date: NaiveDate::from_ymd_opt(sowing.0, sowing.1, sowing.2).unwrap(),
            expected_harvest_days: days,
            health_rating: health,
            estimated_harvest_date: None,
        },
    )
    .unwrap()
}

impl FakeApi {
    pub fn with_records(records: Vec<Variety>) -> Self {
        Self {
            next_id: AtomicUsize::new(records.len() + 100),
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// `count` records with ids "1".."count"
    pub fn numbered(count: usize) -> Self {
        Self::with_records(
            (1..=count)
                .map(|i| variety(&i.to_string(), "Kale", i as i64, (2025, 3, 30), 50, 4))
                .collect(),
        )
    }

    pub fn snapshot(&self) -> Vec<Variety> {
        self.records.lock().unwrap().clone()
    }

    pub fn set(flag: &AtomicBool, value: bool) {
        flag.store(value, Ordering::SeqCst);
    }

    fn failing(flag: &AtomicBool) -> bool {
        flag.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VarietyApi for FakeApi {
    async fn list_varieties(&self) -> ApiResult<Vec<Variety>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if Self::failing(&self.fail_list) {
            return Err(unavailable());
        }
        Ok(self.snapshot())
    }

    async fn get_variety(&self, id: &str) -> ApiResult<Variety> {
        if Self::failing(&self.fail_get) {
            return Err(unavailable());
        }
        self.snapshot()
            .into_iter()
            .find(|v| v.id == id)
            .ok_or(ApiError::NotFound)
    }

    async fn create_variety(&self, input: &NewVariety) -> ApiResult<Variety> {
        if Self::failing(&self.fail_create) {
            return Err(unavailable());
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let created = Variety::from_new(id, input.clone()).map_err(|e| ApiError::Status {
            status: 400,
            message: e.to_string(),
        })?;
        self.records.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_variety(&self, id: &str, patch: &VarietyPatch) -> ApiResult<Variety> {
        if Self::failing(&self.fail_update) {
            return Err(unavailable());
        }
        let mut records = self.records.lock().unwrap();
        let existing = records
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(ApiError::NotFound)?;
        *existing = existing.merged(patch).unwrap();
        Ok(existing.clone())
    }

    async fn delete_variety(&self, id: &str) -> ApiResult<()> {
        if Self::failing(&self.fail_delete) {
            return Err(unavailable());
        }
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|v| v.id != id);
        if records.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }
}
