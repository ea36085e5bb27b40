//! The immutable data both charts and filters read from.

use hashbrown::HashMap;
use serde_json::Value;
use tracing::{info, warn};

use crate::model::{FeatureImportance, InstitutionRecord, ModelName, RecordKey};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {detail}")]
    Fetch { url: String, detail: String },
    #[error("failed to parse {resource}: {source}")]
    Parse {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{resource} is not shaped as expected: {detail}")]
    Shape {
        resource: &'static str,
        detail: String,
    },
    #[error("institutions.json contains no records")]
    NoRecords,
}

pub const INSTITUTIONS_RESOURCE: &str = "institutions.json";
pub const IMPORTANCE_RESOURCE: &str = "feature_importance.json";

/// Loaded institution records plus the lookups derived from them.
#[derive(Debug, Clone)]
pub struct Dataset {
    institutions: Vec<InstitutionRecord>,
    importance: HashMap<(i32, ModelName), Vec<FeatureImportance>>,
    years: Vec<i32>,
    states: Vec<String>,
    by_key: HashMap<RecordKey, usize>,
    history: HashMap<u32, Vec<usize>>,
}

impl Dataset {
    pub fn new(
        institutions: Vec<InstitutionRecord>,
        importance: HashMap<(i32, ModelName), Vec<FeatureImportance>>,
    ) -> Result<Self, LoadError> {
        if institutions.is_empty() {
            return Err(LoadError::NoRecords);
        }

        let mut years: Vec<i32> = institutions.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();

        let mut states: Vec<String> = institutions.iter().map(|r| r.state.clone()).collect();
        states.sort();
        states.dedup();

        let mut by_key = HashMap::with_capacity(institutions.len());
        let mut history: HashMap<u32, Vec<usize>> = HashMap::new();
        for (i, r) in institutions.iter().enumerate() {
            if by_key.insert(r.key(), i).is_some() {
                warn!(key = %r.key(), "duplicate institution record; keeping the later row");
            }
            history.entry(r.unitid).or_default().push(i);
        }
        for rows in history.values_mut() {
            rows.sort_by_key(|&i| institutions[i].year);
        }

        Ok(Self {
            institutions,
            importance,
            years,
            states,
            by_key,
            history,
        })
    }

    /// Parses both JSON documents. Institutions are parsed first, matching the
    /// order the resources are fetched in.
    pub fn from_json_strs(institutions: &str, importance: &str) -> Result<Self, LoadError> {
        let records: Vec<InstitutionRecord> =
            serde_json::from_str(institutions).map_err(|source| LoadError::Parse {
                resource: INSTITUTIONS_RESOURCE,
                source,
            })?;
        let importance = parse_importance(importance)?;
        let ds = Self::new(records, importance)?;
        info!(
            records = ds.institutions.len(),
            years = ds.years.len(),
            states = ds.states.len(),
            importance_sets = ds.importance.len(),
            "dataset loaded"
        );
        Ok(ds)
    }

    /// Reads `institutions_file` and `importance_file` from `dir`.
    #[cfg(feature = "std")]
    pub fn load_dir(
        dir: &std::path::Path,
        institutions_file: &str,
        importance_file: &str,
    ) -> Result<Self, LoadError> {
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
                path: path.display().to_string(),
                source,
            })
        };
        let institutions = read(institutions_file)?;
        let importance = read(importance_file)?;
        Self::from_json_strs(&institutions, &importance)
    }

    pub fn institutions(&self) -> &[InstitutionRecord] {
        &self.institutions
    }

    pub fn record(&self, index: usize) -> Option<&InstitutionRecord> {
        self.institutions.get(index)
    }

    pub fn index_of(&self, key: RecordKey) -> Option<usize> {
        self.by_key.get(&key).copied()
    }

    /// Sorted distinct years.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn latest_year(&self) -> i32 {
        // `new` rejects empty datasets.
        self.years.last().copied().unwrap_or_default()
    }

    /// Sorted distinct state codes.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Ordered importance list for a year/model, empty when absent.
    pub fn importance(&self, year: i32, model: ModelName) -> &[FeatureImportance] {
        self.importance
            .get(&(year, model))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every record of one institution, oldest year first.
    pub fn history(&self, unitid: u32) -> impl Iterator<Item = &InstitutionRecord> + '_ {
        self.history
            .get(&unitid)
            .into_iter()
            .flatten()
            .map(move |&i| &self.institutions[i])
    }

    /// Models that at least one record carries a prediction for.
    pub fn available_models(&self) -> Vec<ModelName> {
        ModelName::all()
            .iter()
            .copied()
            .filter(|&m| self.institutions.iter().any(|r| r.prediction(m).is_some()))
            .collect()
    }
}

fn parse_importance(
    text: &str,
) -> Result<HashMap<(i32, ModelName), Vec<FeatureImportance>>, LoadError> {
    let root: Value = serde_json::from_str(text).map_err(|source| LoadError::Parse {
        resource: IMPORTANCE_RESOURCE,
        source,
    })?;
    let Value::Object(years) = root else {
        return Err(LoadError::Shape {
            resource: IMPORTANCE_RESOURCE,
            detail: "top level must be an object keyed by year".to_string(),
        });
    };

    let mut out = HashMap::new();
    for (year_key, models) in years {
        let Ok(year) = year_key.trim().parse::<i32>() else {
            warn!(key = %year_key, "skipping non-numeric year in feature importance");
            continue;
        };
        let Value::Object(models) = models else {
            return Err(LoadError::Shape {
                resource: IMPORTANCE_RESOURCE,
                detail: format!("year {year} must map to an object keyed by model"),
            });
        };
        for (model_key, entries) in models {
            let Some(model) = ModelName::from_suffix(&model_key) else {
                warn!(year, model = %model_key, "skipping unknown model in feature importance");
                continue;
            };
            let entries: Vec<FeatureImportance> =
                serde_json::from_value(entries).map_err(|source| LoadError::Parse {
                    resource: IMPORTANCE_RESOURCE,
                    source,
                })?;
            out.insert((year, model), entries);
        }
    }
    Ok(out)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{Sector, SizeCategory};

    pub(crate) fn row(unitid: u32, year: i32, state: &str, sector: &str, size: &str) -> String {
        format!(
            r#"{{"unitid": {unitid}, "year": {year}, "institution_name": "School {unitid}",
                "state": "{state}", "sector": "{sector}", "school_size_category": "{size}",
                "longitude": -100.0, "latitude": 40.0, "actual_grad_rate": {grad},
                "admission_rate": 0.5, "retention_rate": 0.8, "pell_percentage": 30.0,
                "student_faculty_ratio": 15.0, "spending_per_student": 15000,
                "predicted_grad_rate_RandomForest": {pred}, "risk_category_RandomForest": "Medium",
                "predicted_grad_rate_linear": {pred_lin}, "risk_category_linear": "High"}}"#,
            grad = 50 + (unitid % 40) as i32 + (year - 2015),
            pred = 45 + (unitid % 50) as i32,
            pred_lin = 40 + (unitid % 30) as i32,
        )
    }

    pub(crate) const IMPORTANCE: &str = r#"{
        "2020": {
            "RandomForest": [
                {"feature_name": "retention_rate", "importance_value": 0.42},
                {"feature_name": "pell_percentage", "importance_value": 0.21},
                {"feature_name": "admission_rate", "importance_value": 0.09}
            ],
            "linear": [
                {"feature_name": "retention_rate", "importance_value": 0.5}
            ],
            "SomeFutureModel": []
        },
        "not-a-year": {}
    }"#;

    #[test]
    fn derives_years_states_and_history() {
        let rows = [
            row(1, 2021, "NY", "Public", "Small"),
            row(1, 2018, "NY", "Public", "Small"),
            row(2, 2020, "CA", "For-profit", "Large"),
            row(1, 2019, "NY", "Public", "Small"),
        ];
        let ds = Dataset::from_json_strs(&format!("[{}]", rows.join(",")), IMPORTANCE).unwrap();

        assert_eq!(ds.years(), &[2018, 2019, 2020, 2021]);
        assert_eq!(ds.latest_year(), 2021);
        assert_eq!(ds.states(), &["CA".to_string(), "NY".to_string()]);

        let years: Vec<i32> = ds.history(1).map(|r| r.year).collect();
        assert_eq!(years, vec![2018, 2019, 2021]);
        assert_eq!(ds.history(99).count(), 0);

        let idx = ds.index_of(RecordKey { unitid: 2, year: 2020 }).unwrap();
        let r = ds.record(idx).unwrap();
        assert_eq!(r.sector, Sector::ForProfit);
        assert_eq!(r.school_size_category, SizeCategory::Large);
        assert_eq!(
            ds.available_models(),
            vec![ModelName::Linear, ModelName::RandomForest]
        );
    }

    #[test]
    fn importance_lookup_is_empty_when_absent() {
        let ds = Dataset::from_json_strs(
            &format!("[{}]", row(1, 2020, "CA", "Public", "Medium")),
            IMPORTANCE,
        )
        .unwrap();
        let rf = ds.importance(2020, ModelName::RandomForest);
        assert_eq!(rf.len(), 3);
        assert_eq!(rf[0].feature_name, "retention_rate");
        assert!(ds.importance(2019, ModelName::RandomForest).is_empty());
        assert!(ds.importance(2020, ModelName::GradientBoosting).is_empty());
    }

    #[test]
    fn load_failures_name_the_resource() {
        let err = Dataset::from_json_strs("[{", IMPORTANCE).unwrap_err();
        assert!(matches!(err, LoadError::Parse { resource: INSTITUTIONS_RESOURCE, .. }));

        let one = format!("[{}]", row(1, 2020, "CA", "Public", "Medium"));
        let err = Dataset::from_json_strs(&one, "[1, 2]").unwrap_err();
        assert!(matches!(err, LoadError::Shape { resource: IMPORTANCE_RESOURCE, .. }));

        let err = Dataset::from_json_strs(&one, r#"{"2020": {"linear": [{"feature_name": 3}]}}"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::Parse { resource: IMPORTANCE_RESOURCE, .. }));

        assert!(matches!(
            Dataset::from_json_strs("[]", "{}").unwrap_err(),
            LoadError::NoRecords
        ));
    }

    #[cfg(feature = "std")]
    #[test]
    fn bundled_sample_data_loads() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let ds = Dataset::load_dir(&dir, INSTITUTIONS_RESOURCE, IMPORTANCE_RESOURCE).unwrap();
        assert_eq!(ds.years(), &[2018, 2019, 2020, 2021]);
        assert_eq!(ds.available_models().len(), 3);
        for &model in ModelName::all() {
            assert_eq!(ds.importance(2021, model).len(), 5);
        }
    }
}
