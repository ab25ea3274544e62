//! # Item Type Statistics
//!
//! Cumulative time-on-screen per item type and the derived share of total
//! time each type accounts for. Labels keep the order they first appeared in,
//! so chart slices and table rows do not reshuffle as new types show up.

use indexmap::IndexMap;

/// Item-type label to cumulative seconds on screen
pub type ItemTypeTimes = IndexMap<String, f64>;

/// Item-type label to percentage of total time, two decimals (`"42.50"`)
pub type ItemTypePercentages = IndexMap<String, String>;

/// Add per-message increments into the running totals, appending new labels.
pub fn accumulate(times: &mut ItemTypeTimes, increments: &IndexMap<String, f64>) {
    for (item_type, duration) in increments {
        *times.entry(item_type.clone()).or_insert(0.0) += duration;
    }
}

/// Share of total time per item type. Empty when the total is zero.
pub fn percentages(times: &ItemTypeTimes) -> ItemTypePercentages {
    let total: f64 = times.values().sum();
    if total == 0.0 {
        return ItemTypePercentages::new();
    }

    times
        .iter()
        .map(|(item_type, seconds)| (item_type.clone(), to_fixed_2(seconds / total * 100.0)))
        .collect()
}

/// `125.4` -> `"2m 5.40s"`
pub fn format_time(seconds: f64) -> String {
    let mins = (seconds / 60.0).floor();
    let secs = seconds % 60.0;
    format!("{}m {}s", mins, to_fixed_2(secs))
}

/// Two decimals, with exact ties rounded away from zero (`2.125` -> `"2.13"`).
/// `{:.2}` would round ties to even.
pub fn to_fixed_2(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    // 40 digits is the exact binary value for any magnitude shown here
    let exact = format!("{:.40}", value.abs());
    let Some((whole, fraction)) = exact.split_once('.') else {
        return format!("{:.2}", value);
    };
    let (kept, rest) = fraction.split_at(2);
    let Ok(mut hundredths) = format!("{}{}", whole, kept).parse::<u128>() else {
        return format!("{:.2}", value);
    };
    if rest.bytes().next().is_some_and(|digit| digit >= b'5') {
        hundredths += 1;
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, hundredths / 100, hundredths % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(entries: &[(&str, f64)]) -> ItemTypeTimes {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let cases = [
            times(&[("bottle", 1.0), ("can", 1.0), ("paper", 1.0)]),
            times(&[("bottle", 0.0333), ("can", 12.5), ("paper", 7.25), ("bag", 99.9)]),
            times(&[("bottle", 3.0)]),
        ];

        for case in &cases {
            let result = percentages(case);
            assert_eq!(result.len(), case.len());
            let sum: f64 = result.values().map(|p| p.parse::<f64>().unwrap()).sum();
            assert!((sum - 100.0).abs() <= 0.01 * case.len() as f64, "sum was {}", sum);
        }
    }

    #[test]
    fn test_percentages_format() {
        let result = percentages(&times(&[("bottle", 1.0), ("can", 3.0)]));
        assert_eq!(result["bottle"], "25.00");
        assert_eq!(result["can"], "75.00");
    }

    #[test]
    fn test_percentages_empty_and_zero_total() {
        assert!(percentages(&ItemTypeTimes::new()).is_empty());
        assert!(percentages(&times(&[("bottle", 0.0)])).is_empty());
    }

    #[test]
    fn test_accumulate_increments_and_inserts() {
        let mut totals = times(&[("bottle", 2.0)]);
        accumulate(&mut totals, &times(&[("bottle", 0.5), ("can", 5.0)]));
        assert_eq!(totals["bottle"], 2.5);
        assert_eq!(totals["can"], 5.0);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(125.4), "2m 5.40s");
        assert_eq!(format_time(0.0), "0m 0.00s");
        assert_eq!(format_time(59.999), "0m 60.00s");
        assert_eq!(format_time(3600.0), "60m 0.00s");
    }

    #[test]
    fn test_exact_ties_round_up() {
        assert_eq!(format_time(2.125), "0m 2.13s");
        assert_eq!(format_time(60.125), "1m 0.13s");

        let result = percentages(&times(&[("a", 1.0), ("b", 159.0)]));
        assert_eq!(result["a"], "0.63");
        assert_eq!(result["b"], "99.38");
    }

    #[test]
    fn test_to_fixed_2() {
        assert_eq!(to_fixed_2(0.0), "0.00");
        assert_eq!(to_fixed_2(99.999), "100.00");
        assert_eq!(to_fixed_2(-2.125), "-2.13");
        // 1.005 is stored just below the tie
        assert_eq!(to_fixed_2(1.005), "1.00");
        assert_eq!(to_fixed_2(12.3449), "12.34");
    }

    #[test]
    fn test_labels_keep_first_seen_order() {
        let mut totals = times(&[("paper", 1.0)]);
        accumulate(&mut totals, &times(&[("can", 1.0), ("bottle", 1.0), ("paper", 1.0)]));

        let labels: Vec<&str> = totals.keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["paper", "can", "bottle"]);
        let pcts = percentages(&totals);
        let shares: Vec<&str> = pcts.keys().map(String::as_str).collect();
        assert_eq!(shares, labels);
    }
}
