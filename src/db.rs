use chrono::{Duration, NaiveDate, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::SurveyRecord;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query("CREATE SCHEMA IF NOT EXISTS survey_insights")
        .execute(pool)
        .await?;

    // Answers are stored as raw text on purpose: the form layer performs no
    // validation and numeric fields arrive stringly-typed. Parsing happens
    // at the aggregation boundary, not here.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS survey_insights.responses (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL DEFAULT '',
            age TEXT NOT NULL DEFAULT '',
            gender TEXT NOT NULL DEFAULT '',
            course TEXT NOT NULL DEFAULT '',
            fruits_vegetables TEXT NOT NULL DEFAULT '',
            fast_food TEXT NOT NULL DEFAULT '',
            diet TEXT NOT NULL DEFAULT '',
            health_rating TEXT NOT NULL DEFAULT '',
            gpa TEXT NOT NULL DEFAULT '',
            study_hours TEXT NOT NULL DEFAULT '',
            extracurricular TEXT NOT NULL DEFAULT '',
            sleep_hours TEXT NOT NULL DEFAULT '',
            stress_level TEXT NOT NULL DEFAULT '',
            class_attendance TEXT NOT NULL DEFAULT '',
            submitted_at DATE NOT NULL,
            source_key TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn insert_response(
    pool: &PgPool,
    record: &SurveyRecord,
    submitted_at: NaiveDate,
    source_key: &str,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO survey_insights.responses
        (id, name, age, gender, course, fruits_vegetables, fast_food, diet,
         health_rating, gpa, study_hours, extracurricular, sleep_hours,
         stress_level, class_attendance, submitted_at, source_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        ON CONFLICT (source_key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&record.name)
    .bind(&record.age)
    .bind(&record.gender)
    .bind(&record.course)
    .bind(&record.fruits_vegetables)
    .bind(&record.fast_food)
    .bind(&record.diet)
    .bind(&record.health_rating)
    .bind(&record.gpa)
    .bind(&record.study_hours)
    .bind(&record.extracurricular)
    .bind(&record.sleep_hours)
    .bind(&record.stress_level)
    .bind(&record.class_attendance)
    .bind(submitted_at)
    .bind(source_key)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    // Includes deliberately messy rows (unparseable GPA, off-list gender)
    // so the unknown-bucket and parse-exclusion paths show up in reports.
    let responses = vec![
        (
            "seed-001",
            sample(
                "Avery Lee", "21", "Female", "Nutrition Science", "4", "2", "Vegetarian",
                "4", "3.60", "5", "Running club", "7", "2", "92",
            ),
        ),
        (
            "seed-002",
            sample(
                "Jules Moreno", "23", "Male", "Computer Science", "2", "5", "None",
                "2", "2.90", "3", "Esports", "6", "4", "78",
            ),
        ),
        (
            "seed-003",
            sample(
                "Kiara Patel", "20", "Female", "Biology", "5", "1", "Vegan",
                "5", "3.85", "6", "Debate team", "8", "2", "95",
            ),
        ),
        (
            "seed-004",
            sample(
                "Sam Okafor", "22", "Male", "Computer Science", "3", "3", "Keto",
                "3", "3,40", "4", "", "7", "3", "85",
            ),
        ),
        (
            "seed-005",
            sample(
                "Noa Fischer", "24", "Prefer not to say", "Economics", "1", "4", "Other",
                "2", "N/A", "2", "Student radio", "5", "5", "60",
            ),
        ),
        (
            "seed-006",
            sample(
                "Ren Tanaka", "19", "Nonbinary", "Biology", "4", "2", "Vegetarian",
                "4", "3.20", "5", "Photography", "8", "1", "90",
            ),
        ),
    ];

    let mut day = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap_or_else(|| Utc::now().date_naive());
    for (source_key, record) in responses {
        insert_response(pool, &record, day, source_key).await?;
        day = day + Duration::days(1);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn sample(
    name: &str,
    age: &str,
    gender: &str,
    course: &str,
    fruits_vegetables: &str,
    fast_food: &str,
    diet: &str,
    health_rating: &str,
    gpa: &str,
    study_hours: &str,
    extracurricular: &str,
    sleep_hours: &str,
    stress_level: &str,
    class_attendance: &str,
) -> SurveyRecord {
    SurveyRecord {
        name: name.to_string(),
        age: age.to_string(),
        gender: gender.to_string(),
        course: course.to_string(),
        fruits_vegetables: fruits_vegetables.to_string(),
        fast_food: fast_food.to_string(),
        diet: diet.to_string(),
        health_rating: health_rating.to_string(),
        gpa: gpa.to_string(),
        study_hours: study_hours.to_string(),
        extracurricular: extracurricular.to_string(),
        sleep_hours: sleep_hours.to_string(),
        stress_level: stress_level.to_string(),
        class_attendance: class_attendance.to_string(),
    }
}

pub async fn fetch_responses(
    pool: &PgPool,
    since: Option<NaiveDate>,
    course: Option<&str>,
) -> anyhow::Result<Vec<SurveyRecord>> {
    let mut query = String::from(
        "SELECT name, age, gender, course, fruits_vegetables, fast_food, diet, \
         health_rating, gpa, study_hours, extracurricular, sleep_hours, \
         stress_level, class_attendance \
         FROM survey_insights.responses WHERE TRUE",
    );

    let mut bind_index = 0;
    if since.is_some() {
        bind_index += 1;
        query.push_str(&format!(" AND submitted_at >= ${bind_index}"));
    }
    if course.is_some() {
        bind_index += 1;
        query.push_str(&format!(" AND course = ${bind_index}"));
    }
    query.push_str(" ORDER BY submitted_at, id");

    let mut rows = sqlx::query(&query);
    if let Some(value) = since {
        rows = rows.bind(value);
    }
    if let Some(value) = course {
        rows = rows.bind(value);
    }

    let fetched = rows.fetch_all(pool).await?;
    let mut records = Vec::with_capacity(fetched.len());

    for row in fetched {
        records.push(SurveyRecord {
            name: row.get("name"),
            age: row.get("age"),
            gender: row.get("gender"),
            course: row.get("course"),
            fruits_vegetables: row.get("fruits_vegetables"),
            fast_food: row.get("fast_food"),
            diet: row.get("diet"),
            health_rating: row.get("health_rating"),
            gpa: row.get("gpa"),
            study_hours: row.get("study_hours"),
            extracurricular: row.get("extracurricular"),
            sleep_hours: row.get("sleep_hours"),
            stress_level: row.get("stress_level"),
            class_attendance: row.get("class_attendance"),
        });
    }

    Ok(records)
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(Default, serde::Deserialize)]
    #[serde(default)]
    struct CsvRow {
        name: String,
        age: String,
        gender: String,
        course: String,
        fruits_vegetables: String,
        fast_food: String,
        diet: String,
        health_rating: String,
        gpa: String,
        study_hours: String,
        extracurricular: String,
        sleep_hours: String,
        stress_level: String,
        class_attendance: String,
        submitted_at: Option<NaiveDate>,
        source_key: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let record = SurveyRecord {
            name: row.name,
            age: row.age,
            gender: row.gender,
            course: row.course,
            fruits_vegetables: row.fruits_vegetables,
            fast_food: row.fast_food,
            diet: row.diet,
            health_rating: row.health_rating,
            gpa: row.gpa,
            study_hours: row.study_hours,
            extracurricular: row.extracurricular,
            sleep_hours: row.sleep_hours,
            stress_level: row.stress_level,
            class_attendance: row.class_attendance,
        };

        let submitted_at = row.submitted_at.unwrap_or_else(|| Utc::now().date_naive());
        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        if insert_response(pool, &record, submitted_at, &source_key).await? {
            inserted += 1;
        }
    }

    Ok(inserted)
}

pub fn cutoff_date(since_days: i64) -> NaiveDate {
    Utc::now().date_naive() - Duration::days(since_days.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_date_respects_since_days() {
        let cutoff = cutoff_date(14);
        let expected = Utc::now().date_naive() - Duration::days(14);
        assert_eq!(cutoff, expected);
    }

    #[test]
    fn cutoff_date_clamps_non_positive_windows() {
        let cutoff = cutoff_date(0);
        let expected = Utc::now().date_naive() - Duration::days(1);
        assert_eq!(cutoff, expected);
    }
}
