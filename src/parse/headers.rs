//! Resolves which table columns carry the timestamp and the air temperature.
//!
//! AEMET rewords its headers from time to time ("Fecha y hora oficial",
//! "Fecha/Hora", "Temperatura (ºC)", "Temp. (°C)"), so columns are matched
//! by normalised substring rather than exact label.

use super::Error;

/// Label fragments that mark a column as something other than the air
/// temperature: daily extremes and ground-level sensors.
const EXCLUDED_FRAGMENTS: [&str; 5] = ["max", "máx", "min", "mín", "suelo"];

/// Column indices resolved from a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRoles {
    pub datetime: Option<usize>,
    pub date: Option<usize>,
    pub time: Option<usize>,
    pub temperature: usize,
}

impl ColumnRoles {
    /// Resolves the roles for one header row.
    ///
    /// A combined date-and-time column wins over separate date and time
    /// columns. Without any recognisable date or time header the row set is
    /// rejected, unless `lenient` is set, in which case rows are expected to
    /// carry the timestamp in their first two fields.
    pub fn resolve(headers: &[String], lenient: bool) -> Result<Self, Error> {
        let normalized: Vec<String> = headers.iter().map(|label| normalize_label(label)).collect();

        let temperature = normalized
            .iter()
            .position(|label| is_temperature(label))
            .ok_or_else(|| Error::NoTemperatureColumn {
                headers: headers.to_vec(),
            })?;

        let datetime = normalized
            .iter()
            .position(|label| label.contains("fecha") && label.contains("hora"));

        let (date, time) = match datetime {
            Some(_) => (None, None),
            None => (
                normalized.iter().position(|label| label.contains("fecha")),
                normalized.iter().position(|label| label.contains("hora")),
            ),
        };

        let has_timestamp = datetime.is_some() || (date.is_some() && time.is_some());
        if !has_timestamp && !lenient {
            return Err(Error::NoDateTimeColumn {
                headers: headers.to_vec(),
            });
        }

        Ok(ColumnRoles {
            datetime,
            date,
            time,
            temperature,
        })
    }

    /// Highest column index extraction reads; shorter rows are skipped.
    pub fn max_index(&self) -> usize {
        let timestamp_max = match (self.datetime, self.date, self.time) {
            (Some(combined), _, _) => combined,
            (None, Some(date), Some(time)) => date.max(time),
            // positional fallback reads the first two fields
            _ => 1,
        };
        self.temperature.max(timestamp_max)
    }

    /// Builds the raw local-time string for one row.
    pub fn raw_datetime(&self, row: &[String]) -> Option<String> {
        if let Some(combined) = self.datetime {
            return row.get(combined).map(|cell| cell.trim().to_string());
        }
        if let (Some(date), Some(time)) = (self.date, self.time) {
            let date = row.get(date)?.trim();
            let time = row.get(time)?.trim();
            return Some(format!("{date} {time}"));
        }
        match row {
            [date, time, ..] => Some(format!("{} {}", date.trim(), time.trim())),
            _ => None,
        }
    }
}

/// Lowercases a label, folds the masculine ordinal (º) into the degree sign
/// (°) and replaces every other non-alphanumeric run with a single space.
pub(crate) fn normalize_label(label: &str) -> String {
    let mut folded = String::with_capacity(label.len());
    for c in label.to_lowercase().chars() {
        let c = if c == 'º' { '°' } else { c };
        if c.is_alphanumeric() || c == '°' {
            folded.push(c);
        } else {
            folded.push(' ');
        }
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_temperature(label: &str) -> bool {
    if EXCLUDED_FRAGMENTS
        .iter()
        .any(|fragment| label.contains(fragment))
    {
        return false;
    }
    // "ts" marks the soil sensor, but only as a word of its own
    if label.split_whitespace().any(|token| token == "ts") {
        return false;
    }
    label.contains("temp")
        && (label.contains("°c") || label.split_whitespace().any(|token| token == "c"))
}

// -- Tests -------------------------------------------------------------------
