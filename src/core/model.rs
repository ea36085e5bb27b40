//! Record types for the two input datasets.
//!
//! Per-model prediction columns (`predicted_grad_rate_<model>`,
//! `risk_category_<model>`) are folded into a fixed table indexed by
//! [`ModelName`] at deserialization time, so renderers never build field names.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Institution control category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sector {
    #[serde(rename = "Public")]
    Public,
    #[serde(rename = "Private nonprofit")]
    PrivateNonprofit,
    #[serde(rename = "For-profit")]
    ForProfit,
}

impl Sector {
    pub fn label(self) -> &'static str {
        match self {
            Sector::Public => "Public",
            Sector::PrivateNonprofit => "Private nonprofit",
            Sector::ForProfit => "For-profit",
        }
    }

    pub fn all() -> &'static [Sector] {
        &[Sector::Public, Sector::PrivateNonprofit, Sector::ForProfit]
    }

    pub fn parse(v: &str) -> Option<Sector> {
        Sector::all()
            .iter()
            .copied()
            .find(|s| s.label().eq_ignore_ascii_case(v.trim()))
    }
}

/// Enrollment size bucket (`school_size_category`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
}

impl SizeCategory {
    pub fn label(self) -> &'static str {
        match self {
            SizeCategory::Small => "Small",
            SizeCategory::Medium => "Medium",
            SizeCategory::Large => "Large",
        }
    }

    pub fn all() -> &'static [SizeCategory] {
        &[SizeCategory::Small, SizeCategory::Medium, SizeCategory::Large]
    }

    pub fn parse(v: &str) -> Option<SizeCategory> {
        SizeCategory::all()
            .iter()
            .copied()
            .find(|s| s.label().eq_ignore_ascii_case(v.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    pub fn label(self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
        }
    }

    pub fn all() -> &'static [RiskCategory] {
        &[RiskCategory::Low, RiskCategory::Medium, RiskCategory::High]
    }

    /// Numeric stand-in used by the comparison bar chart.
    pub fn placeholder_value(self) -> f64 {
        match self {
            RiskCategory::Low => 75.0,
            RiskCategory::Medium => 50.0,
            RiskCategory::High => 25.0,
        }
    }
}

/// Named predictive source. Each variant owns the column suffix it is stored
/// under in `institutions.json`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum ModelName {
    #[serde(rename = "linear")]
    Linear,
    #[default]
    RandomForest,
    GradientBoosting,
}

impl ModelName {
    pub const COUNT: usize = 3;

    pub fn suffix(self) -> &'static str {
        match self {
            ModelName::Linear => "linear",
            ModelName::RandomForest => "RandomForest",
            ModelName::GradientBoosting => "GradientBoosting",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ModelName::Linear => "Linear",
            ModelName::RandomForest => "Random Forest",
            ModelName::GradientBoosting => "Gradient Boosting",
        }
    }

    pub fn all() -> &'static [ModelName] {
        &[
            ModelName::Linear,
            ModelName::RandomForest,
            ModelName::GradientBoosting,
        ]
    }

    fn index(self) -> usize {
        match self {
            ModelName::Linear => 0,
            ModelName::RandomForest => 1,
            ModelName::GradientBoosting => 2,
        }
    }

    /// Exact column suffix match, as used for JSON keys.
    pub fn from_suffix(v: &str) -> Option<ModelName> {
        ModelName::all().iter().copied().find(|m| m.suffix() == v)
    }

    /// Lenient match for user input.
    pub fn parse(v: &str) -> Option<ModelName> {
        let v = v.trim();
        ModelName::all().iter().copied().find(|m| {
            m.suffix().eq_ignore_ascii_case(v) || m.display_name().eq_ignore_ascii_case(v)
        })
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Metric family shown on the map and comparison chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutcomeKind {
    #[default]
    #[serde(rename = "grad_rate")]
    GradRate,
    #[serde(rename = "risk")]
    Risk,
}

impl OutcomeKind {
    pub fn value(self) -> &'static str {
        match self {
            OutcomeKind::GradRate => "grad_rate",
            OutcomeKind::Risk => "risk",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OutcomeKind::GradRate => "Graduation Rate",
            OutcomeKind::Risk => "Risk Category",
        }
    }

    pub fn all() -> &'static [OutcomeKind] {
        &[OutcomeKind::GradRate, OutcomeKind::Risk]
    }

    pub fn parse(v: &str) -> Option<OutcomeKind> {
        match v.trim() {
            "grad_rate" => Some(OutcomeKind::GradRate),
            "risk" => Some(OutcomeKind::Risk),
            _ => None,
        }
    }
}

/// One model's outputs for one institution-year.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModelPrediction {
    pub grad_rate: Option<f64>,
    pub risk: Option<RiskCategory>,
}

impl ModelPrediction {
    fn is_empty(&self) -> bool {
        self.grad_rate.is_none() && self.risk.is_none()
    }
}

/// Identity of an institution record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey {
    pub unitid: u32,
    pub year: i32,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.unitid, self.year)
    }
}

/// One year's snapshot of one institution.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawInstitutionRecord")]
pub struct InstitutionRecord {
    pub unitid: u32,
    pub year: i32,
    pub institution_name: String,
    pub state: String,
    pub sector: Sector,
    pub school_size_category: SizeCategory,
    pub longitude: f64,
    pub latitude: f64,
    pub actual_grad_rate: f64,
    pub admission_rate: f64,
    pub retention_rate: f64,
    pub pell_percentage: f64,
    pub student_faculty_ratio: f64,
    pub spending_per_student: f64,
    predictions: [ModelPrediction; ModelName::COUNT],
}

impl InstitutionRecord {
    pub fn key(&self) -> RecordKey {
        RecordKey {
            unitid: self.unitid,
            year: self.year,
        }
    }

    /// `None` when the record carries neither column for `model`.
    pub fn prediction(&self, model: ModelName) -> Option<&ModelPrediction> {
        let p = &self.predictions[model.index()];
        if p.is_empty() {
            None
        } else {
            Some(p)
        }
    }

    pub fn predicted_grad_rate(&self, model: ModelName) -> Option<f64> {
        self.predictions[model.index()].grad_rate
    }

    pub fn risk_category(&self, model: ModelName) -> Option<RiskCategory> {
        self.predictions[model.index()].risk
    }

    #[cfg(test)]
    pub(crate) fn with_prediction(mut self, model: ModelName, prediction: ModelPrediction) -> Self {
        self.predictions[model.index()] = prediction;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecordShapeError {
    #[error("record {unitid}_{year}: column `{column}` is not a number")]
    BadGradRate {
        unitid: u32,
        year: i32,
        column: String,
    },
    #[error("record {unitid}_{year}: column `{column}` is not Low/Medium/High")]
    BadRisk {
        unitid: u32,
        year: i32,
        column: String,
    },
}

#[derive(Deserialize)]
struct RawInstitutionRecord {
    unitid: u32,
    year: i32,
    institution_name: String,
    state: String,
    sector: Sector,
    school_size_category: SizeCategory,
    longitude: f64,
    latitude: f64,
    actual_grad_rate: f64,
    admission_rate: f64,
    retention_rate: f64,
    pell_percentage: f64,
    student_faculty_ratio: f64,
    spending_per_student: f64,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl TryFrom<RawInstitutionRecord> for InstitutionRecord {
    type Error = RecordShapeError;

    fn try_from(raw: RawInstitutionRecord) -> Result<Self, Self::Error> {
        let mut predictions = [ModelPrediction::default(); ModelName::COUNT];
        for &model in ModelName::all() {
            let slot = &mut predictions[model.index()];

            let column = format!("predicted_grad_rate_{}", model.suffix());
            match raw.rest.get(&column) {
                None | Some(Value::Null) => {}
                Some(v) => {
                    slot.grad_rate = Some(v.as_f64().ok_or(RecordShapeError::BadGradRate {
                        unitid: raw.unitid,
                        year: raw.year,
                        column,
                    })?);
                }
            }

            let column = format!("risk_category_{}", model.suffix());
            match raw.rest.get(&column) {
                None | Some(Value::Null) => {}
                Some(v) => {
                    let risk = RiskCategory::deserialize(v).map_err(|_| {
                        RecordShapeError::BadRisk {
                            unitid: raw.unitid,
                            year: raw.year,
                            column,
                        }
                    })?;
                    slot.risk = Some(risk);
                }
            }
        }

        Ok(InstitutionRecord {
            unitid: raw.unitid,
            year: raw.year,
            institution_name: raw.institution_name,
            state: raw.state,
            sector: raw.sector,
            school_size_category: raw.school_size_category,
            longitude: raw.longitude,
            latitude: raw.latitude,
            actual_grad_rate: raw.actual_grad_rate,
            admission_rate: raw.admission_rate,
            retention_rate: raw.retention_rate,
            pell_percentage: raw.pell_percentage,
            student_faculty_ratio: raw.student_faculty_ratio,
            spending_per_student: raw.spending_per_student,
            predictions,
        })
    }
}

/// One bar of the feature-importance chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature_name: String,
    pub importance_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: &str = r#"{
        "unitid": 110635, "year": 2020, "institution_name": "Berkeley",
        "state": "CA", "sector": "Public", "school_size_category": "Large",
        "longitude": -122.26, "latitude": 37.87, "actual_grad_rate": 92.1,
        "admission_rate": 0.17, "retention_rate": 0.97, "pell_percentage": 27.5,
        "student_faculty_ratio": 19.0, "spending_per_student": 28000,
        "predicted_grad_rate_RandomForest": 90.4, "risk_category_RandomForest": "Low",
        "risk_category_linear": "Medium", "predicted_grad_rate_linear": null,
        "unused_column": [1, 2, 3]
    }"#;

    #[test]
    fn per_model_columns_fold_into_typed_table() {
        let r: InstitutionRecord = serde_json::from_str(ROW).unwrap();
        assert_eq!(r.key(), RecordKey { unitid: 110635, year: 2020 });
        assert_eq!(r.sector, Sector::Public);
        assert_eq!(r.school_size_category, SizeCategory::Large);
        assert_eq!(r.predicted_grad_rate(ModelName::RandomForest), Some(90.4));
        assert_eq!(r.risk_category(ModelName::RandomForest), Some(RiskCategory::Low));
        assert_eq!(r.predicted_grad_rate(ModelName::Linear), None);
        assert_eq!(r.risk_category(ModelName::Linear), Some(RiskCategory::Medium));
        assert!(r.prediction(ModelName::GradientBoosting).is_none());
        assert!(r.prediction(ModelName::Linear).is_some());
    }

    #[test]
    fn malformed_prediction_column_is_rejected() {
        let bad = ROW.replace(r#""risk_category_RandomForest": "Low""#, r#""risk_category_RandomForest": "Severe""#);
        let err = serde_json::from_str::<InstitutionRecord>(&bad).unwrap_err();
        assert!(err.to_string().contains("risk_category_RandomForest"));

        let bad = ROW.replace("90.4", r#""ninety""#);
        assert!(serde_json::from_str::<InstitutionRecord>(&bad).is_err());
    }

    #[test]
    fn enum_labels_match_json_spelling() {
        for s in Sector::all() {
            let json = serde_json::to_string(s).unwrap();
            assert_eq!(json, format!("\"{}\"", s.label()));
        }
        for m in ModelName::all() {
            assert_eq!(ModelName::from_suffix(m.suffix()), Some(*m));
            assert_eq!(ModelName::parse(&m.suffix().to_ascii_lowercase()), Some(*m));
        }
        assert_eq!(OutcomeKind::parse("risk"), Some(OutcomeKind::Risk));
        assert_eq!(SizeCategory::parse("medium"), Some(SizeCategory::Medium));
        assert_eq!(Sector::parse("for-profit"), Some(Sector::ForProfit));
    }

    #[test]
    fn risk_placeholders_are_ordered() {
        assert_eq!(RiskCategory::Low.placeholder_value(), 75.0);
        assert_eq!(RiskCategory::Medium.placeholder_value(), 50.0);
        assert_eq!(RiskCategory::High.placeholder_value(), 25.0);
    }
}
