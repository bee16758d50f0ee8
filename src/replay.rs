//! JSON-lines report ingestion.
//!
//! Each non-blank line is one serialized [`Report`]. Reports are submitted in
//! file order, so each observer's history reflects the order of its lines.

use serde::Serialize;
use std::io::BufRead;
use thiserror::Error;

use crate::store::{HealthStorage, Report, ReportOutcome};

/// Errors that abort a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error reading line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed report on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome counts for one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub accepted: usize,
    pub ignored: usize,
    pub failed: usize,
}

impl ReplaySummary {
    fn record(&mut self, outcome: ReportOutcome) {
        match outcome {
            ReportOutcome::Accepted => self.accepted += 1,
            ReportOutcome::Ignored => self.ignored += 1,
            ReportOutcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.accepted + self.ignored + self.failed
    }
}

/// Submit every report in `reader` to `store`.
///
/// A store error counts the report as failed and replay continues; a read or
/// parse error stops the replay.
pub fn replay_reports<R: BufRead>(
    store: &dyn HealthStorage,
    reader: R,
    filter: bool,
) -> Result<ReplaySummary, ReplayError> {
    let mut summary = ReplaySummary::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| ReplayError::Io { line: line_no, source })?;
        if line.trim().is_empty() {
            continue;
        }

        let report: Report = serde_json::from_str(&line)
            .map_err(|source| ReplayError::Parse { line: line_no, source })?;

        match store.add_report(report, filter) {
            Ok(outcome) => summary.record(outcome),
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "Report failed");
                summary.record(ReportOutcome::Failed);
            }
        }
    }

    tracing::info!(
        accepted = summary.accepted,
        ignored = summary.ignored,
        failed = summary.failed,
        "Replay finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EntityId, ObservationStore};
    use std::io::Cursor;

    const INPUT: &str = r#"
{"observer":"o1","subject":"s1","observation":{"timestamp_ms":1}}
{"observer":"o2","subject":"s1","observation":{"timestamp_ms":2,"metrics":{"cpu":{"status":"normal","score":1.0}}}}

{"observer":"o1","subject":"s2","observation":{"timestamp_ms":3}}
"#;

    #[test]
    fn test_replay_filtered() {
        let store = ObservationStore::with_subjects(5, ["s1"]);
        let summary = replay_reports(&store, Cursor::new(INPUT), true).unwrap();

        assert_eq!(summary, ReplaySummary { accepted: 2, ignored: 1, failed: 0 });
        assert_eq!(summary.total(), 3);
        let latest = store.get_latest_report(&"s1".into()).unwrap();
        assert_eq!(latest.observer, EntityId::from("o2"));
    }

    #[test]
    fn test_replay_unfiltered_admits() {
        let store = ObservationStore::default();
        let summary = replay_reports(&store, Cursor::new(INPUT), false).unwrap();

        assert_eq!(summary.accepted, 3);
        assert_eq!(store.watchlist(), vec![EntityId::from("s1"), EntityId::from("s2")]);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let store = ObservationStore::default();
        let input = "{\"observer\":\"o\",\"subject\":\"s\",\"observation\":{\"timestamp_ms\":1}}\nnot json\n";
        let err = replay_reports(&store, Cursor::new(input), false).unwrap_err();

        assert!(matches!(err, ReplayError::Parse { line: 2, .. }));
        // the line before the bad one was still stored
        assert!(store.get_latest_report(&"s".into()).is_some());
    }
}
