use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

use crate::model::{LogStream, QueryResult};

pub const NO_LOGS_MESSAGE: &str = "No logs found matching the query";

/// Render a query result as a plain-text report grouped by stream.
pub fn format(result: &QueryResult) -> String {
    let streams = result.streams();
    if streams.is_empty() {
        return NO_LOGS_MESSAGE.to_string();
    }

    let mut output = format!("Found {} streams:\n\n", streams.len());
    for (index, stream) in streams.iter().enumerate() {
        write_stream(&mut output, stream, index + 1);
    }
    output
}

fn write_stream(output: &mut String, stream: &LogStream, index: usize) {
    if stream.labels.is_empty() {
        let _ = writeln!(output, "Stream {}:", index);
    } else {
        let labels = stream
            .labels
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(output, "Stream ({}) {}:", labels, index);
    }

    for value in &stream.values {
        if let [timestamp, line, ..] = value.as_slice() {
            let rendered = parse_nanos(timestamp)
                .map(|instant| instant.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_else(|| timestamp.clone());
            let _ = writeln!(output, "[{}] {}", rendered, line);
        }
    }
    output.push('\n');
}

/// Interpret a Loki timestamp, which is already nanoseconds since the epoch.
///
/// The value must not be rescaled: multiplying by 1e9 again lands in 2262.
fn parse_nanos(raw: &str) -> Option<DateTime<Utc>> {
    let nanos = match raw.parse::<i64>() {
        Ok(nanos) => nanos,
        Err(_) => {
            let value = raw.parse::<f64>().ok()?;
            if !value.is_finite() || value < i64::MIN as f64 || value >= i64::MAX as f64 {
                return None;
            }
            value as i64
        }
    };
    Some(DateTime::from_timestamp_nanos(nanos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QueryData;
    use std::collections::BTreeMap;

    fn result_with(streams: Vec<LogStream>) -> QueryResult {
        QueryResult {
            status: "success".to_string(),
            data: QueryData {
                result_type: "streams".to_string(),
                result: streams,
            },
            error: None,
        }
    }

    fn stream(labels: &[(&str, &str)], values: &[&[&str]]) -> LogStream {
        LogStream {
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
            values: values
                .iter()
                .map(|row| row.iter().map(|f| f.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_empty_result() {
        assert_eq!(format(&result_with(vec![])), "No logs found matching the query");
    }

    #[test]
    fn test_nanosecond_timestamp_not_rescaled() {
        let output = format(&result_with(vec![stream(
            &[("job", "test-job"), ("level", "info")],
            &[&["1705312245000000000", "Test log message"]],
        )]));

        assert!(output.contains("[2024-01-15T09:50:45Z] Test log message"), "{output}");
        assert!(!output.contains("2262"), "{output}");
        assert!(output.contains("job=test-job"));
    }

    #[test]
    fn test_no_year_2262_across_timestamps() {
        for (nanos, year) in [
            ("1705312245000000000", "2024"),
            ("1700000000000000000", "2023"),
            ("1800000000000000000", "2027"),
        ] {
            let output = format(&result_with(vec![stream(&[("job", "regression")], &[&[nanos, "msg"]])]));
            assert!(output.contains(&format!("[{}-", year)), "{nanos}: {output}");
            assert!(!output.contains("2262"), "{nanos}: {output}");
        }
    }

    #[test]
    fn test_current_timestamp_keeps_current_year() {
        let now = Utc::now();
        let nanos = now.timestamp_nanos_opt().unwrap().to_string();
        let output = format(&result_with(vec![stream(&[("job", "recent")], &[&[nanos.as_str(), "recent"]])]));
        assert!(output.contains(&now.format("[%Y-").to_string()), "{output}");
    }

    #[test]
    fn test_decimal_timestamp() {
        let output = format(&result_with(vec![stream(&[], &[&["1705312245000000000.0", "decimal"]])]));
        assert!(output.contains("[2024-01-15T09:50:45Z] decimal"), "{output}");
    }

    #[test]
    fn test_invalid_timestamp_falls_back_to_raw() {
        let output = format(&result_with(vec![stream(
            &[("job", "test-job")],
            &[&["invalid-timestamp", "Log with invalid timestamp"]],
        )]));
        assert!(output.contains("[invalid-timestamp] Log with invalid timestamp"), "{output}");
    }

    #[test]
    fn test_short_rows_skipped() {
        let output = format(&result_with(vec![stream(
            &[("job", "a")],
            &[&["1705312245000000000"], &[], &["1705312260000000000", "kept"]],
        )]));
        assert_eq!(
            output,
            "Found 1 streams:\n\nStream (job=a) 1:\n[2024-01-15T09:51:00Z] kept\n\n"
        );
    }

    #[test]
    fn test_full_layout() {
        let output = format(&result_with(vec![
            stream(
                &[("job", "varlogs"), ("filename", "/var/log/syslog")],
                &[
                    &["1705312245000000000", "first"],
                    &["1705312275000000000", "second"],
                ],
            ),
            stream(&[], &[&["1705312260000000000", "unlabelled"]]),
        ]));

        let expected = "Found 2 streams:\n\n\
            Stream (filename=/var/log/syslog, job=varlogs) 1:\n\
            [2024-01-15T09:50:45Z] first\n\
            [2024-01-15T09:51:15Z] second\n\
            \n\
            Stream 2:\n\
            [2024-01-15T09:51:00Z] unlabelled\n\
            \n";
        assert_eq!(output, expected);
    }
}
