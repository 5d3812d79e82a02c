//! LMDB database integrity checks.
//!
//! Run when a data directory is opened, to detect corruption before any
//! operation is replayed against it.

use std::path::Path;

use auditor_store::{AuditorStore, CandidateStore, StateStore, VoteStore};

use crate::environment::{LmdbEnvironment, ALL_DATABASES};
use crate::LmdbError;

/// Summary of an integrity check run.
pub struct IntegrityReport {
    pub databases_checked: u32,
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check that every database opens and every record decodes, and that the
/// cross-collection bookkeeping agrees.
///
/// Findings are recorded in the report rather than returned as errors.
pub fn check_integrity(store: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport {
        databases_checked: 0,
        total_entries: 0,
        errors: Vec::new(),
    };

    let env = store.env();
    let rtxn = env.read_txn()?;
    for &db_name in ALL_DATABASES {
        match env.open_database::<heed::types::Bytes, heed::types::Bytes>(&rtxn, Some(db_name)) {
            Ok(Some(db)) => {
                report.databases_checked += 1;
                match db.len(&rtxn) {
                    Ok(count) => report.total_entries += count,
                    Err(e) => report
                        .errors
                        .push(format!("failed to read database '{db_name}': {e}")),
                }
            }
            Ok(None) => report.errors.push(format!("database '{db_name}' is missing")),
            Err(e) => report
                .errors
                .push(format!("failed to open database '{db_name}': {e}")),
        }
    }
    drop(rtxn);

    let candidates = match store.iter_candidates() {
        Ok(c) => c,
        Err(e) => {
            report.errors.push(format!("candidate records: {e}"));
            return Ok(report);
        }
    };
    if let Err(e) = store.iter_votes() {
        report.errors.push(format!("vote records: {e}"));
    }
    match store.auditors() {
        Ok(roster) => {
            for auditor in roster {
                if !candidates.iter().any(|c| c.candidate_name == auditor) {
                    report
                        .errors
                        .push(format!("auditor {auditor} has no candidate record"));
                }
            }
        }
        Err(e) => report.errors.push(format!("auditor roster: {e}")),
    }
    match store.election_state() {
        Ok(state) => {
            let active = candidates.iter().filter(|c| c.is_active).count();
            if state.number_active_candidates as usize != active {
                report.errors.push(format!(
                    "active candidate counter is {} but {} records are active",
                    state.number_active_candidates, active
                ));
            }
        }
        Err(e) => report.errors.push(format!("election state: {e}")),
    }

    Ok(report)
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent) directory. Returns an error
/// if the directory exists but `data.mdb` is missing.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    let data_file = path.join("data.mdb");
    if !data_file.exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}
