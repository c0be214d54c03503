//! Statistics over a loaded sequence of [`WeatherEntry`].
//!
//! Every function here only borrows the entries and has no hidden state, so
//! they can be called in any order, any number of times, or from several
//! threads at once.

use std::fmt;

use log::trace;
use time::Month;

use crate::WeatherEntry;

/// Zero padded month number, as it appears in a `YYYY-MM-DD` date.
pub fn month_key(month: Month) -> String {
    format!("{:02}", u8::from(month))
}

/// Mean temperature of the entries dated in `month`, or `0.0` when there are none.
pub fn average_temperature(entries: &[WeatherEntry], month: Month) -> f64 {
    let key = month_key(month);
    let (sum, count) = entries
        .iter()
        .filter(|entry| entry.month_key() == Some(key.as_str()))
        .fold((0.0, 0usize), |(sum, count), entry| {
            (sum + entry.temperature, count + 1)
        });
    trace!("{count} entries in {month}");

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Dates with a temperature strictly above `threshold`, in entry order.
pub fn hot_days(entries: &[WeatherEntry], threshold: f64) -> Vec<&str> {
    entries
        .iter()
        .filter(|entry| entry.temperature > threshold)
        .map(|entry| entry.date.as_str())
        .collect()
}

pub fn count_rainy_days(entries: &[WeatherEntry]) -> usize {
    entries.iter().filter(|entry| entry.is_rainy()).count()
}

/// The three statistics printed by the binary.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary<'a> {
    pub month: Month,
    pub average_temperature: f64,
    pub threshold: f64,
    pub hot_days: Vec<&'a str>,
    pub rainy_days: usize,
}

impl<'a> Summary<'a> {
    pub fn compute(entries: &'a [WeatherEntry], month: Month, threshold: f64) -> Self {
        Self {
            month,
            average_temperature: average_temperature(entries, month),
            threshold,
            hot_days: hot_days(entries, threshold),
            rainy_days: count_rainy_days(entries),
        }
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Average Temperature in {}: {:.2}°C",
            self.month, self.average_temperature
        )?;
        writeln!(
            f,
            "Days above {}°C: [{}]",
            self.threshold,
            self.hot_days.join(", ")
        )?;
        write!(f, "Number of rainy days: {}", self.rainy_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_from_str;

    fn scenario_a() -> Vec<WeatherEntry> {
        load_from_str(
            "scenario",
            "date,temperature,humidity,precipitation
2024-08-01,29.5,60,0.0
2024-08-02,31.0,55,2.5
2024-07-15,25.0,70,0.0",
        )
        .unwrap()
    }

    fn entry(date: &str, temperature: f64, precipitation: f64) -> WeatherEntry {
        WeatherEntry {
            date: date.to_string(),
            temperature,
            humidity: 50.0,
            precipitation,
        }
    }

    #[test]
    fn month_keys_are_zero_padded() {
        assert_eq!(month_key(Month::January), "01");
        assert_eq!(month_key(Month::August), "08");
        assert_eq!(month_key(Month::December), "12");
    }

    #[test]
    fn scenario_a_statistics() {
        let entries = scenario_a();
        assert_eq!(average_temperature(&entries, Month::August), 30.25);
        assert_eq!(average_temperature(&entries, Month::July), 25.0);
        assert_eq!(hot_days(&entries, 30.0), ["2024-08-02"]);
        assert_eq!(count_rainy_days(&entries), 1);
    }

    #[test]
    fn empty_sequence() {
        assert_eq!(average_temperature(&[], Month::August), 0.0);
        assert!(hot_days(&[], 30.0).is_empty());
        assert_eq!(count_rainy_days(&[]), 0);
    }

    #[test]
    fn average_of_missing_month_is_zero() {
        let entries = scenario_a();
        let average = average_temperature(&entries, Month::March);
        assert_eq!(average, 0.0);
        assert!(!average.is_nan());
    }

    #[test]
    fn average_only_looks_at_the_month_substring() {
        let entries = vec![
            entry("2023-08-31", 10.0, 0.0),
            entry("1999-08-01", 20.0, 0.0),
            // too short to carry a month
            entry("2024", 1000.0, 0.0),
            // not ISO, the substring is `8-`
            entry("2024-8-01", 1000.0, 0.0),
        ];
        assert_eq!(average_temperature(&entries, Month::August), 15.0);
    }

    #[test]
    fn hot_days_threshold_is_strict() {
        let entries = vec![
            entry("2024-08-01", 30.0, 0.0),
            entry("2024-08-02", 30.000001, 0.0),
            entry("2024-08-02", 35.0, 0.0),
            entry("2024-08-03", -2.0, 0.0),
        ];
        assert_eq!(hot_days(&entries, 30.0), ["2024-08-02", "2024-08-02"]);
        assert_eq!(hot_days(&entries, -5.0).len(), 4);

        for threshold in [-10.0, 0.0, 29.9, 30.0, 34.0, 40.0] {
            let dates = hot_days(&entries, threshold);
            let expected = entries.iter().filter(|e| e.temperature > threshold).count();
            assert_eq!(dates.len(), expected);
        }
    }

    #[test]
    fn zero_precipitation_is_not_rain() {
        let entries = vec![
            entry("2024-08-01", 20.0, 0.0),
            entry("2024-08-02", 20.0, 0.1),
            entry("2024-08-03", 20.0, -0.0),
            entry("2024-08-04", 20.0, 12.0),
        ];
        assert_eq!(count_rainy_days(&entries), 2);
    }

    #[test]
    fn aggregations_are_idempotent() {
        let entries = scenario_a();
        assert_eq!(
            average_temperature(&entries, Month::August).to_bits(),
            average_temperature(&entries, Month::August).to_bits()
        );
        assert_eq!(hot_days(&entries, 29.0), hot_days(&entries, 29.0));
        assert_eq!(count_rainy_days(&entries), count_rainy_days(&entries));
    }

    #[test]
    fn aggregations_run_in_parallel() {
        let entries = scenario_a();
        let sequential = Summary::compute(&entries, Month::August, 30.0);

        let (average, hot, rainy) = std::thread::scope(|s| {
            let average = s.spawn(|| average_temperature(&entries, Month::August));
            let hot = s.spawn(|| hot_days(&entries, 30.0));
            let rainy = s.spawn(|| count_rainy_days(&entries));
            (
                average.join().unwrap(),
                hot.join().unwrap(),
                rainy.join().unwrap(),
            )
        });

        assert_eq!(average, sequential.average_temperature);
        assert_eq!(hot, sequential.hot_days);
        assert_eq!(rainy, sequential.rainy_days);
    }

    #[test]
    fn summary_display() {
        let entries = scenario_a();
        let summary = Summary::compute(&entries, Month::August, 30.0);
        assert_eq!(
            summary.to_string(),
            "Average Temperature in August: 30.25°C
Days above 30°C: [2024-08-02]
Number of rainy days: 1"
        );
    }

    #[test]
    fn summary_display_without_data() {
        let entries: Vec<WeatherEntry> = Vec::new();
        let summary = Summary::compute(&entries, Month::January, 12.5);
        assert_eq!(
            summary.to_string(),
            "Average Temperature in January: 0.00°C
Days above 12.5°C: []
Number of rainy days: 0"
        );
    }
}
