//! Variety catalog lookups

use std::sync::Arc;

use chrono::NaiveDate;
use shared::{PlantVariety, StagePlan, VarietyCatalog, VarietyCategory};

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct VarietyService {
    catalog: Arc<VarietyCatalog>,
}

impl VarietyService {
    pub fn new(catalog: Arc<VarietyCatalog>) -> Self {
        Self { catalog }
    }

    /// Catalog entries, optionally restricted to one category
    pub fn list(&self, category: Option<VarietyCategory>) -> Vec<PlantVariety> {
        match category {
            Some(category) => self.catalog.by_category(category).into_iter().cloned().collect(),
            None => self.catalog.all().to_vec(),
        }
    }

    pub fn get(&self, name: &str) -> AppResult<PlantVariety> {
        self.catalog
            .find(name)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Variety '{}'", name)))
    }

    /// Default stage dates for a sowing of `name` on `planted`
    pub fn schedule(&self, name: &str, planted: NaiveDate) -> AppResult<StagePlan> {
        Ok(self.get(name)?.stage_plan(planted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> VarietyService {
        VarietyService::new(Arc::new(VarietyCatalog::default()))
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(service().get("girasol").unwrap().name, "Girasol");
        assert!(matches!(service().get("Cactus"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_schedule() {
        let planted = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let plan = service().schedule("Rábano", planted).unwrap();
        assert_eq!(plan.expected_harvest, NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
    }

    #[test]
    fn test_category_filter() {
        let brassicas = service().list(Some(VarietyCategory::Brassica));
        assert!(!brassicas.is_empty());
        assert!(brassicas.iter().all(|v| v.category == VarietyCategory::Brassica));
        assert!(service().list(None).len() > brassicas.len());
    }
}
