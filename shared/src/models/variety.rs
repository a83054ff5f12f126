//! Plant variety catalog
//!
//! Read-mostly reference data. A variety only pre-fills the expected
//! harvest and stage dates of a new planting.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A catalog entry describing a microgreen's growth parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantVariety {
    pub name: String,
    pub scientific_name: Option<String>,
    pub category: VarietyCategory,
    /// Days from sowing to harvest
    pub growth_days: u32,
    /// Days under the humidity dome
    pub dome_days: Option<u32>,
    /// Days under light before harvest
    pub light_days: Option<u32>,
    pub difficulty: Difficulty,
    /// Hours of seed soaking before sowing, if any
    pub soak_hours: Option<u32>,
    pub description: String,
    pub flavor_profile: String,
}

/// Botanical grouping of microgreen varieties
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VarietyCategory {
    Brassica,
    Legume,
    Herb,
    Grain,
    Amaranth,
    Aster,
}

impl std::fmt::Display for VarietyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarietyCategory::Brassica => write!(f, "Brassica"),
            VarietyCategory::Legume => write!(f, "Legume"),
            VarietyCategory::Herb => write!(f, "Herb"),
            VarietyCategory::Grain => write!(f, "Grain"),
            VarietyCategory::Amaranth => write!(f, "Amaranth"),
            VarietyCategory::Aster => write!(f, "Aster"),
        }
    }
}

/// How forgiving a variety is to grow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Default dates for a planting sown on a given day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StagePlan {
    pub date_planted: NaiveDate,
    pub dome_date: Option<NaiveDate>,
    pub light_date: Option<NaiveDate>,
    pub expected_harvest: NaiveDate,
}

impl PlantVariety {
    /// Stage dates for a planting sown on `date_planted`
    ///
    /// The light stage is the last `light_days` before harvest and the dome
    /// stage immediately precedes it. Day counts that overshoot the growth
    /// cycle are clamped to the sowing date.
    pub fn stage_plan(&self, date_planted: NaiveDate) -> StagePlan {
        let expected_harvest = add_days(date_planted, self.growth_days);
        let light_date = self
            .light_days
            .map(|days| sub_days(expected_harvest, days).max(date_planted));
        let dome_date = self.dome_days.map(|days| {
            sub_days(light_date.unwrap_or(expected_harvest), days).max(date_planted)
        });

        StagePlan {
            date_planted,
            dome_date,
            light_date,
            expected_harvest,
        }
    }

    /// Expected harvest date for a planting sown on `date_planted`
    pub fn expected_harvest(&self, date_planted: NaiveDate) -> NaiveDate {
        add_days(date_planted, self.growth_days)
    }
}

fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days))).unwrap_or(NaiveDate::MAX)
}

fn sub_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(days))).unwrap_or(NaiveDate::MIN)
}

/// The variety catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarietyCatalog {
    varieties: Vec<PlantVariety>,
}

impl VarietyCatalog {
    pub fn new(varieties: Vec<PlantVariety>) -> Self {
        Self { varieties }
    }

    pub fn all(&self) -> &[PlantVariety] {
        &self.varieties
    }

    /// Case-insensitive lookup by name
    pub fn find(&self, name: &str) -> Option<&PlantVariety> {
        let wanted = name.trim().to_lowercase();
        self.varieties
            .iter()
            .find(|v| v.name.to_lowercase() == wanted)
    }

    pub fn by_category(&self, category: VarietyCategory) -> Vec<&PlantVariety> {
        self.varieties
            .iter()
            .filter(|v| v.category == category)
            .collect()
    }
}

impl Default for VarietyCatalog {
    fn default() -> Self {
        Self::new(default_catalog())
    }
}

#[allow(clippy::too_many_arguments)]
fn variety(
    name: &str,
    scientific_name: &str,
    category: VarietyCategory,
    growth_days: u32,
    dome_days: Option<u32>,
    light_days: Option<u32>,
    difficulty: Difficulty,
    soak_hours: Option<u32>,
    description: &str,
    flavor_profile: &str,
) -> PlantVariety {
    PlantVariety {
        name: name.to_string(),
        scientific_name: Some(scientific_name.to_string()),
        category,
        growth_days,
        dome_days,
        light_days,
        difficulty,
        soak_hours,
        description: description.to_string(),
        flavor_profile: flavor_profile.to_string(),
    }
}

/// Varieties grown by a typical small microgreens operation
pub fn default_catalog() -> Vec<PlantVariety> {
    use Difficulty::*;
    use VarietyCategory::*;

    vec![
        variety(
            "Rábano", "Raphanus sativus", Brassica, 8, Some(3), Some(4), Easy, None,
            "Fast grower with pink stems", "Spicy, peppery",
        ),
        variety(
            "Girasol", "Helianthus annuus", Aster, 10, Some(3), Some(6), Medium, Some(8),
            "Thick crunchy shoots; hulls need removing", "Nutty, fresh",
        ),
        variety(
            "Guisante", "Pisum sativum", Legume, 12, Some(3), Some(8), Easy, Some(10),
            "Tall tendrils, cut above the seed", "Sweet, like fresh peas",
        ),
        variety(
            "Brócoli", "Brassica oleracea var. italica", Brassica, 10, Some(3), Some(6), Easy, None,
            "High sulforaphane content", "Mild, slightly bitter",
        ),
        variety(
            "Mostaza", "Brassica juncea", Brassica, 9, Some(3), Some(5), Easy, None,
            "Purple and green leaved strains", "Hot, horseradish-like",
        ),
        variety(
            "Amaranto rojo", "Amaranthus tricolor", Amaranth, 14, Some(4), Some(9), Hard, None,
            "Vivid magenta, slow and delicate", "Earthy, mild",
        ),
        variety(
            "Albahaca", "Ocimum basilicum", Herb, 18, Some(5), Some(12), Hard, None,
            "Mucilaginous seed, sow sparsely", "Aromatic, sweet basil",
        ),
        variety(
            "Pasto de trigo", "Triticum aestivum", Grain, 9, Some(2), None, Easy, Some(12),
            "Grown mainly for juicing", "Grassy, sweet",
        ),
        variety(
            "Rúcula", "Eruca vesicaria", Brassica, 9, Some(3), Some(5), Medium, None,
            "Delicate leaves, avoid overwatering", "Peppery, nutty",
        ),
        variety(
            "Col lombarda", "Brassica oleracea var. capitata f. rubra", Brassica, 11, Some(3), Some(7), Easy, None,
            "Purple stems and blue-green leaves", "Mild cabbage",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let catalog = VarietyCatalog::default();
        assert_eq!(catalog.find("rábano").unwrap().growth_days, 8);
        assert_eq!(catalog.find("  GIRASOL ").unwrap().category, VarietyCategory::Aster);
        assert!(catalog.find("Tomate").is_none());
    }

    #[test]
    fn test_stage_plan_dome_then_light() {
        let catalog = VarietyCatalog::default();
        let radish = catalog.find("Rábano").unwrap();
        let plan = radish.stage_plan(date(2025, 1, 5));

        assert_eq!(plan.expected_harvest, date(2025, 1, 13));
        assert_eq!(plan.light_date, Some(date(2025, 1, 9)));
        assert_eq!(plan.dome_date, Some(date(2025, 1, 6)));
    }

    #[test]
    fn test_stage_plan_without_light_stage() {
        let catalog = VarietyCatalog::default();
        let wheatgrass = catalog.find("Pasto de trigo").unwrap();
        let plan = wheatgrass.stage_plan(date(2025, 3, 1));

        assert_eq!(plan.expected_harvest, date(2025, 3, 10));
        assert_eq!(plan.light_date, None);
        assert_eq!(plan.dome_date, Some(date(2025, 3, 8)));
    }

    #[test]
    fn test_stage_plan_clamps_to_sowing_date() {
        let quick = PlantVariety {
            name: "Prueba".to_string(),
            scientific_name: None,
            category: VarietyCategory::Herb,
            growth_days: 4,
            dome_days: Some(3),
            light_days: Some(3),
            difficulty: Difficulty::Easy,
            soak_hours: None,
            description: String::new(),
            flavor_profile: String::new(),
        };
        let plan = quick.stage_plan(date(2025, 1, 1));
        assert_eq!(plan.light_date, Some(date(2025, 1, 2)));
        assert_eq!(plan.dome_date, Some(date(2025, 1, 1)));
    }

    #[test]
    fn test_catalog_stages_fit_growth_cycle() {
        for variety in default_catalog() {
            let stages = variety.dome_days.unwrap_or(0) + variety.light_days.unwrap_or(0);
            assert!(
                stages <= variety.growth_days,
                "{} stages exceed growth cycle",
                variety.name
            );
        }
    }

    #[test]
    fn test_by_category() {
        let catalog = VarietyCatalog::default();
        assert_eq!(catalog.by_category(VarietyCategory::Brassica).len(), 5);
        assert_eq!(catalog.by_category(VarietyCategory::Legume).len(), 1);
    }
}
