use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

/// One survey submission. Every answer is kept as raw text: the upstream
/// form transmits values stringly-typed and performs no validation, so
/// numeric meaning is recovered at the aggregation boundary instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyRecord {
    #[serde(default, deserialize_with = "loose_string")]
    pub name: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub age: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub gender: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub course: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub fruits_vegetables: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub fast_food: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub diet: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub health_rating: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub gpa: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub study_hours: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub extracurricular: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub sleep_hours: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub stress_level: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub class_attendance: String,
}

/// Accepts strings, numbers, booleans, or null for an answer field and
/// folds them all into text. Null and absent both become the empty string,
/// which the aggregation operations treat as a missing answer.
fn loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Selects one answer field of a record, both from the CLI and inside the
/// aggregation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Field {
    Name,
    Age,
    Gender,
    Course,
    FruitsVegetables,
    FastFood,
    Diet,
    HealthRating,
    Gpa,
    StudyHours,
    Extracurricular,
    SleepHours,
    StressLevel,
    ClassAttendance,
}

impl SurveyRecord {
    pub fn answer(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Age => &self.age,
            Field::Gender => &self.gender,
            Field::Course => &self.course,
            Field::FruitsVegetables => &self.fruits_vegetables,
            Field::FastFood => &self.fast_food,
            Field::Diet => &self.diet,
            Field::HealthRating => &self.health_rating,
            Field::Gpa => &self.gpa,
            Field::StudyHours => &self.study_hours,
            Field::Extracurricular => &self.extracurricular,
            Field::SleepHours => &self.sleep_hours,
            Field::StressLevel => &self.stress_level,
            Field::ClassAttendance => &self.class_attendance,
        }
    }
}

/// One chart-ready series: parallel labels and values, plus optional
/// per-bucket valid-sample counts for average-style aggregations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Vec<usize>>,
}

/// Parallel raw-value arrays for correlation-style rendering. Values pass
/// through untouched; coercion belongs to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairedSeries {
    pub x: Vec<String>,
    pub y: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
}

/// The `{labels, datasets}` shape the chart renderer consumes. Style
/// metadata (colors, borders) is the renderer's concern, not ours.
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

impl AggregatedSeries {
    pub fn into_chart(self, label: &str) -> ChartData {
        ChartData {
            labels: self.labels,
            datasets: vec![ChartDataset {
                label: label.to_string(),
                data: self.values,
            }],
        }
    }
}
