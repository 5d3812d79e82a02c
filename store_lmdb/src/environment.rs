//! LMDB environment setup.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::LmdbError;

/// Named databases inside one environment.
pub(crate) const CANDIDATES_DB: &str = "candidates";
pub(crate) const VOTES_DB: &str = "votes";
pub(crate) const AUDITORS_DB: &str = "auditors";
pub(crate) const BIOS_DB: &str = "bios";
pub(crate) const META_DB: &str = "meta";

pub(crate) const ALL_DATABASES: &[&str] = &[CANDIDATES_DB, VOTES_DB, AUDITORS_DB, BIOS_DB, META_DB];

/// Default map size: 1 GiB is far beyond what the collections need.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

/// Wraps the LMDB environment and all database handles.
///
/// Keys are the raw bytes of account names, so LMDB's byte order is the
/// name order the store traits promise.
pub struct LmdbEnvironment {
    env: Env,
    pub(crate) candidates_db: Database<Bytes, Bytes>,
    pub(crate) votes_db: Database<Bytes, Bytes>,
    /// Roster membership: name -> empty value.
    pub(crate) auditors_db: Database<Bytes, Bytes>,
    pub(crate) bios_db: Database<Bytes, Bytes>,
    /// Election state and schema version.
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the environment is opened once per process per directory;
        // the daemon never maps the same files twice.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(ALL_DATABASES.len() as u32)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let candidates_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some(CANDIDATES_DB))?;
        let votes_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some(VOTES_DB))?;
        let auditors_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some(AUDITORS_DB))?;
        let bios_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some(BIOS_DB))?;
        let meta_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some(META_DB))?;
        wtxn.commit()?;

        let this = Self {
            env,
            candidates_db,
            votes_db,
            auditors_db,
            bios_db,
            meta_db,
        };
        this.ensure_schema()?;
        tracing::debug!(path = %path.display(), "opened auditor LMDB environment");
        Ok(this)
    }

    pub fn env(&self) -> &Env {
        &self.env
    }
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, LmdbError> {
    Ok(bincode::serialize(value)?)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, LmdbError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Decode every value of `db`, in key order.
pub(crate) fn read_all<T: DeserializeOwned>(
    env: &Env,
    db: &Database<Bytes, Bytes>,
) -> Result<Vec<T>, LmdbError> {
    let rtxn = env.read_txn()?;
    let mut out = Vec::new();
    for entry in db.iter(&rtxn)? {
        let (_key, val) = entry?;
        out.push(decode(val)?);
    }
    Ok(out)
}

/// Decode the value stored under `key`, if any.
pub(crate) fn read_one<T: DeserializeOwned>(
    env: &Env,
    db: &Database<Bytes, Bytes>,
    key: &[u8],
) -> Result<Option<T>, LmdbError> {
    let rtxn = env.read_txn()?;
    db.get(&rtxn, key)?.map(decode).transpose()
}
