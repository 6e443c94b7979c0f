use crate::models::{AggregatedSeries, Field, PairedSeries, SurveyRecord};

/// Trailing bucket for category values outside the caller-supplied set.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Default numeric parser for stringly-typed answers. Tolerates surrounding
/// whitespace and comma decimal separators (GPA text arrives in whatever
/// locale the respondent typed); rejects NaN and infinities.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', ".");
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

fn parse_exact_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    match parse_number(trimmed) {
        Some(value) if value.fract() == 0.0 => Some(value as i64),
        _ => None,
    }
}

/// Counts records per known category (case-sensitive exact match). Values
/// outside the known set land in a trailing `Unknown` bucket; records with
/// a missing (empty) answer are skipped entirely, so the bucket counts sum
/// to the number of records that answered the question.
pub fn categorical_distribution<S: AsRef<str>>(
    records: &[SurveyRecord],
    field: Field,
    known: &[S],
) -> AggregatedSeries {
    let mut counts = vec![0usize; known.len() + 1];

    for record in records {
        let value = record.answer(field).trim();
        if value.is_empty() {
            continue;
        }
        let index = known
            .iter()
            .position(|category| category.as_ref() == value)
            .unwrap_or(known.len());
        counts[index] += 1;
    }

    let mut labels: Vec<String> = known.iter().map(|c| c.as_ref().to_string()).collect();
    labels.push(UNKNOWN_LABEL.to_string());

    AggregatedSeries {
        labels,
        values: counts.into_iter().map(|c| c as f64).collect(),
        meta: None,
    }
}

/// Frequency counts over an explicit set of exact integer values, one
/// bucket per edge. Unparseable answers and values outside the edge set are
/// dropped silently, matching the fixed-label frequency charts this feeds.
pub fn numeric_histogram(
    records: &[SurveyRecord],
    field: Field,
    edges: &[i64],
) -> AggregatedSeries {
    let mut counts = vec![0usize; edges.len()];

    for record in records {
        let Some(value) = parse_exact_integer(record.answer(field)) else {
            continue;
        };
        if let Some(index) = edges.iter().position(|edge| *edge == value) {
            counts[index] += 1;
        }
    }

    AggregatedSeries {
        labels: edges.iter().map(|edge| edge.to_string()).collect(),
        values: counts.into_iter().map(|c| c as f64).collect(),
        meta: None,
    }
}

/// Arithmetic mean of a parsed value per group category. Records whose
/// value fails to parse are excluded from their group's mean; a group with
/// no valid samples reports `0.0` rather than NaN, which downstream charts
/// rely on. `meta` carries the valid-sample count per group.
pub fn grouped_average<S: AsRef<str>>(
    records: &[SurveyRecord],
    group_field: Field,
    groups: &[S],
    value_field: Field,
    parser: impl Fn(&str) -> Option<f64>,
) -> AggregatedSeries {
    let mut sums = vec![0.0f64; groups.len()];
    let mut counts = vec![0usize; groups.len()];

    for record in records {
        let group_value = record.answer(group_field).trim();
        let Some(index) = groups.iter().position(|g| g.as_ref() == group_value) else {
            continue;
        };
        if let Some(value) = parser(record.answer(value_field)) {
            sums[index] += value;
            counts[index] += 1;
        }
    }

    let values = sums
        .iter()
        .zip(counts.iter())
        .map(|(sum, count)| if *count == 0 { 0.0 } else { sum / *count as f64 })
        .collect();

    AggregatedSeries {
        labels: groups.iter().map(|g| g.as_ref().to_string()).collect(),
        values,
        meta: Some(counts),
    }
}

/// Parallel raw x/y arrays, one entry per record in input order, with no
/// filtering. Non-numeric answers pass through untouched.
pub fn paired_series(records: &[SurveyRecord], x_field: Field, y_field: Field) -> PairedSeries {
    PairedSeries {
        x: records.iter().map(|r| r.answer(x_field).to_string()).collect(),
        y: records.iter().map(|r| r.answer(y_field).to_string()).collect(),
    }
}

/// Mean of a parsed value across all records, excluding parse failures.
/// Returns `0.0` when nothing parses, the same zero-for-empty convention as
/// [`grouped_average`].
pub fn scalar_mean(
    records: &[SurveyRecord],
    field: Field,
    parser: impl Fn(&str) -> Option<f64>,
) -> f64 {
    let mut sum = 0.0f64;
    let mut count = 0usize;

    for record in records {
        if let Some(value) = parser(record.answer(field)) {
            sum += value;
            count += 1;
        }
    }

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diet_record(diet: &str) -> SurveyRecord {
        SurveyRecord {
            diet: diet.to_string(),
            ..SurveyRecord::default()
        }
    }

    fn diet_gpa_record(diet: &str, gpa: &str) -> SurveyRecord {
        SurveyRecord {
            diet: diet.to_string(),
            gpa: gpa.to_string(),
            ..SurveyRecord::default()
        }
    }

    const DIETS: [&str; 5] = ["None", "Vegetarian", "Vegan", "Keto", "Other"];

    #[test]
    fn distribution_buckets_known_and_unknown_categories() {
        let records = vec![
            diet_record("Vegan"),
            diet_record("Vegan"),
            diet_record("Keto"),
            diet_record("Martian"),
        ];

        let series = categorical_distribution(&records, Field::Diet, &DIETS);
        assert_eq!(series.labels.last().map(String::as_str), Some("Unknown"));
        assert_eq!(series.values, vec![0.0, 0.0, 2.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn distribution_counts_sum_to_answered_records() {
        let records = vec![
            diet_record("Vegan"),
            diet_record(""),
            diet_record("  "),
            diet_record("Fruitarian"),
        ];

        let series = categorical_distribution(&records, Field::Diet, &DIETS);
        let total: f64 = series.values.iter().sum();
        assert_eq!(total, 2.0);
    }

    #[test]
    fn distribution_of_empty_input_is_all_zero() {
        let series = categorical_distribution(&[], Field::Diet, &DIETS);
        assert_eq!(series.labels.len(), DIETS.len() + 1);
        assert!(series.values.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn histogram_counts_exact_values_and_drops_the_rest() {
        let ratings = ["1", "3", "3", "5", "9", "bad", " 4 ", "3.0"];
        let records: Vec<SurveyRecord> = ratings
            .iter()
            .map(|r| SurveyRecord {
                health_rating: r.to_string(),
                ..SurveyRecord::default()
            })
            .collect();

        let series = numeric_histogram(&records, Field::HealthRating, &[1, 2, 3, 4, 5]);
        assert_eq!(series.labels, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(series.values, vec![1.0, 0.0, 3.0, 1.0, 1.0]);
    }

    #[test]
    fn grouped_average_excludes_unparseable_values() {
        let records = vec![
            diet_gpa_record("Vegan", "3.00"),
            diet_gpa_record("Vegan", "bad"),
        ];

        let series =
            grouped_average(&records, Field::Diet, &["Vegan"], Field::Gpa, parse_number);
        assert_eq!(series.values, vec![3.0]);
        assert_eq!(series.meta, Some(vec![1]));
    }

    #[test]
    fn grouped_average_reports_zero_for_empty_group() {
        let records = vec![diet_gpa_record("Vegan", "3.50")];

        let series = grouped_average(
            &records,
            Field::Diet,
            &["Vegan", "Keto"],
            Field::Gpa,
            parse_number,
        );
        assert_eq!(series.values[1], 0.0);
        assert!(!series.values[1].is_nan());
        assert_eq!(series.meta, Some(vec![1, 0]));
    }

    #[test]
    fn scalar_mean_is_order_invariant() {
        let hours = ["6", "7.5", "oops", "8"];
        let mut records: Vec<SurveyRecord> = hours
            .iter()
            .map(|h| SurveyRecord {
                sleep_hours: h.to_string(),
                ..SurveyRecord::default()
            })
            .collect();

        let forward = scalar_mean(&records, Field::SleepHours, parse_number);
        records.reverse();
        let backward = scalar_mean(&records, Field::SleepHours, parse_number);

        assert!((forward - backward).abs() < 1e-9);
        assert!((forward - (6.0 + 7.5 + 8.0) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn scalar_mean_of_nothing_is_zero() {
        assert_eq!(scalar_mean(&[], Field::Gpa, parse_number), 0.0);

        let records = vec![diet_gpa_record("Vegan", "not a number")];
        assert_eq!(scalar_mean(&records, Field::Gpa, parse_number), 0.0);
    }

    #[test]
    fn paired_series_preserves_length_and_raw_values() {
        let records = vec![
            SurveyRecord {
                study_hours: "4".to_string(),
                sleep_hours: "seven".to_string(),
                ..SurveyRecord::default()
            },
            SurveyRecord::default(),
        ];

        let pairs = paired_series(&records, Field::StudyHours, Field::SleepHours);
        assert_eq!(pairs.x.len(), records.len());
        assert_eq!(pairs.y.len(), records.len());
        assert_eq!(pairs.x[0], "4");
        assert_eq!(pairs.y[0], "seven");
        assert_eq!(pairs.x[1], "");
    }

    #[test]
    fn aggregations_are_idempotent() {
        let records = vec![
            diet_gpa_record("Vegan", "3.2"),
            diet_gpa_record("Keto", "2.8"),
            diet_gpa_record("Martian", "4,0"),
        ];

        assert_eq!(
            categorical_distribution(&records, Field::Diet, &DIETS),
            categorical_distribution(&records, Field::Diet, &DIETS)
        );
        assert_eq!(
            grouped_average(&records, Field::Diet, &DIETS, Field::Gpa, parse_number),
            grouped_average(&records, Field::Diet, &DIETS, Field::Gpa, parse_number)
        );
        assert_eq!(
            paired_series(&records, Field::Diet, Field::Gpa),
            paired_series(&records, Field::Diet, Field::Gpa)
        );
    }

    #[test]
    fn parse_number_accepts_comma_decimals() {
        assert_eq!(parse_number(" 3,25 "), Some(3.25));
        assert_eq!(parse_number("3.25"), Some(3.25));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("B+"), None);
    }
}
