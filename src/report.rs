use std::fmt::Write;

use crate::aggregate::{
    self, categorical_distribution, grouped_average, numeric_histogram, paired_series,
    scalar_mean,
};
use crate::models::{Field, SurveyRecord};

// Canonical category and bucket sets live with the report, not inside the
// aggregation module. Other callers supply their own.
pub const GENDERS: [&str; 4] = ["Male", "Female", "Other", "Prefer not to say"];
pub const DIETS: [&str; 5] = ["None", "Vegetarian", "Vegan", "Keto", "Other"];
pub const HEALTH_RATINGS: [i64; 5] = [1, 2, 3, 4, 5];
pub const FAST_FOOD_LEVELS: [i64; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

pub fn build_report(course: Option<&str>, records: &[SurveyRecord]) -> String {
    let mut output = String::new();
    let scope = course.unwrap_or("all courses");

    let _ = writeln!(output, "# Survey Insights Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} responses)",
        scope,
        records.len()
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Gender Breakdown");
    write_distribution(
        &mut output,
        &categorical_distribution(records, Field::Gender, &GENDERS),
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Diet Preferences");
    write_distribution(
        &mut output,
        &categorical_distribution(records, Field::Diet, &DIETS),
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Health Ratings (1-5)");
    write_distribution(
        &mut output,
        &numeric_histogram(records, Field::HealthRating, &HEALTH_RATINGS),
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Fast Food Meals per Week");
    write_distribution(
        &mut output,
        &numeric_histogram(records, Field::FastFood, &FAST_FOOD_LEVELS),
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Average GPA by Diet");
    let gpa_by_diet = grouped_average(
        records,
        Field::Diet,
        &DIETS,
        Field::Gpa,
        aggregate::parse_number,
    );
    let counts = gpa_by_diet.meta.clone().unwrap_or_default();
    if records.is_empty() {
        let _ = writeln!(output, "No responses recorded.");
    } else {
        for (index, label) in gpa_by_diet.labels.iter().enumerate() {
            let _ = writeln!(
                output,
                "- {}: {:.2} (from {} graded responses)",
                label,
                gpa_by_diet.values[index],
                counts.get(index).copied().unwrap_or(0)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Headline Averages");
    if records.is_empty() {
        let _ = writeln!(output, "No responses recorded.");
    } else {
        let headline = [
            ("Daily fruit & vegetable servings", Field::FruitsVegetables),
            ("Study hours per day", Field::StudyHours),
            ("Sleep hours per night", Field::SleepHours),
            ("Stress level (1-5)", Field::StressLevel),
            ("Class attendance (%)", Field::ClassAttendance),
        ];
        for (label, field) in headline {
            let mean = scalar_mean(records, field, aggregate::parse_number);
            let _ = writeln!(output, "- {label}: {mean:.2}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Study vs. Sleep (sample)");
    let pairs = paired_series(records, Field::StudyHours, Field::SleepHours);
    if pairs.x.is_empty() {
        let _ = writeln!(output, "No responses recorded.");
    } else {
        for (x, y) in pairs.x.iter().zip(pairs.y.iter()).take(5) {
            let _ = writeln!(output, "- study {x} h / sleep {y} h");
        }
    }

    output
}

fn write_distribution(output: &mut String, series: &crate::models::AggregatedSeries) {
    let total: f64 = series.values.iter().sum();
    if total == 0.0 {
        let _ = writeln!(output, "No responses recorded.");
        return;
    }
    for (label, value) in series.labels.iter().zip(series.values.iter()) {
        let _ = writeln!(output, "- {}: {}", label, *value as usize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn respondent(gender: &str, diet: &str, gpa: &str, fast_food: &str) -> SurveyRecord {
        SurveyRecord {
            gender: gender.to_string(),
            diet: diet.to_string(),
            gpa: gpa.to_string(),
            fast_food: fast_food.to_string(),
            study_hours: "4".to_string(),
            sleep_hours: "7".to_string(),
            ..SurveyRecord::default()
        }
    }

    #[test]
    fn report_includes_every_section() {
        let records = vec![
            respondent("Female", "Vegan", "3.80", "1"),
            respondent("Male", "Keto", "3.10", "4"),
            respondent("Cyborg", "Martian", "N/A", "12"),
        ];

        let report = build_report(Some("Biology"), &records);
        assert!(report.contains("# Survey Insights Report"));
        assert!(report.contains("Generated for Biology (3 responses)"));
        assert!(report.contains("## Gender Breakdown"));
        assert!(report.contains("## Diet Preferences"));
        assert!(report.contains("## Health Ratings (1-5)"));
        assert!(report.contains("## Fast Food Meals per Week"));
        assert!(report.contains("## Average GPA by Diet"));
        assert!(report.contains("## Headline Averages"));
        assert!(report.contains("## Study vs. Sleep (sample)"));
    }

    #[test]
    fn report_shows_unknown_bucket_counts() {
        let records = vec![respondent("Cyborg", "Martian", "2.0", "1")];
        let report = build_report(None, &records);
        assert!(report.contains("- Unknown: 1"));
    }

    #[test]
    fn report_on_empty_input_degrades_gracefully() {
        let report = build_report(None, &[]);
        assert!(report.contains("Generated for all courses (0 responses)"));
        assert!(report.contains("No responses recorded."));
        assert!(!report.contains("NaN"));
    }

    #[test]
    fn grouped_gpa_line_excludes_unparseable_grades() {
        let records = vec![
            respondent("Female", "Vegan", "3.00", "1"),
            respondent("Female", "Vegan", "bad", "1"),
        ];
        let report = build_report(None, &records);
        assert!(report.contains("- Vegan: 3.00 (from 1 graded responses)"));
    }
}
