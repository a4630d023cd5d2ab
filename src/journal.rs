//! Durable journal of manual repair selections.
//!
//! Append-only JSON-lines file, one record per line, keyed by playlist
//! entry identity. Replaying the journal at session start is what lets
//! manual work survive restarts and re-runs without re-prompting; crash
//! recovery is a pure replay, never a reconstruction of volatile state.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// One recorded user choice. Later records supersede earlier ones for the
/// same identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRecord {
    pub identity: String,
    pub chosen_path: PathBuf,
    pub timestamp: DateTime<Utc>,
}

impl SelectionRecord {
    /// A record stamped with the current time.
    pub fn now(identity: String, chosen_path: PathBuf) -> Self {
        Self {
            identity,
            chosen_path,
            timestamp: Utc::now(),
        }
    }
}

/// The journal file plus its loaded records, in append order.
#[derive(Debug)]
pub struct SelectionJournal {
    path: PathBuf,
    records: Vec<SelectionRecord>,
}

impl SelectionJournal {
    /// Open a journal, loading existing records in append order. A missing
    /// file is an empty journal, not an error. Unparsable lines are skipped
    /// and returned as warnings.
    pub fn open(path: PathBuf) -> Result<(Self, Vec<String>)> {
        let mut records = Vec::new();
        let mut warnings = Vec::new();

        if path.exists() {
            let text = fs::read_to_string(&path).map_err(|source| Error::Journal {
                path: path.clone(),
                source,
            })?;
            for (lineno, line) in text.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<SelectionRecord>(line) {
                    Ok(record) => records.push(record),
                    Err(err) => warnings.push(format!(
                        "{}:{}: skipped unreadable selection: {err}",
                        path.display(),
                        lineno + 1
                    )),
                }
            }
        }

        debug!(
            journal = %path.display(),
            records = records.len(),
            "opened selection journal"
        );
        Ok((Self { path, records }, warnings))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record durably, then to the in-memory view. The write is
    /// a single line, so concurrent appends for disjoint identities never
    /// conflict and same-identity races fall to the superseding rule.
    pub fn append(&mut self, record: SelectionRecord) -> Result<()> {
        let line = serde_json::to_string(&record).map_err(|err| Error::Journal {
            path: self.path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, err),
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| Error::Journal {
                path: self.path.clone(),
                source,
            })?;
        writeln!(file, "{line}").and_then(|_| file.flush()).map_err(
            |source| Error::Journal {
                path: self.path.clone(),
                source,
            },
        )?;

        self.records.push(record);
        Ok(())
    }

    /// The authoritative record for one identity: greatest timestamp wins,
    /// ties broken by append order.
    pub fn latest_for(&self, identity: &str) -> Option<&SelectionRecord> {
        let mut best: Option<&SelectionRecord> = None;
        for record in &self.records {
            if record.identity != identity {
                continue;
            }
            if best.is_none_or(|b| record.timestamp >= b.timestamp) {
                best = Some(record);
            }
        }
        best
    }

    /// The authoritative record per identity.
    pub fn all_latest(&self) -> HashMap<&str, &SelectionRecord> {
        let mut latest: HashMap<&str, &SelectionRecord> = HashMap::new();
        for record in &self.records {
            match latest.get(record.identity.as_str()) {
                Some(current) if record.timestamp < current.timestamp => {}
                _ => {
                    latest.insert(&record.identity, record);
                }
            }
        }
        latest
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
