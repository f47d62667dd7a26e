//! LMDB environment setup.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::migration::Migrator;
use crate::LmdbError;

/// Default map size: 1 GiB.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

/// Names of every database in the environment.
pub(crate) const DATABASE_NAMES: &[&str] = &[
    "votings",
    "voters",
    "credits",
    "allocations",
    "public_keys",
    "decryption_requests",
    "meta",
];

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Env,
    pub(crate) votings_db: Database<Bytes, Bytes>,
    pub(crate) voters_db: Database<Bytes, Bytes>,
    pub(crate) credits_db: Database<Bytes, Bytes>,
    pub(crate) allocations_db: Database<Bytes, Bytes>,
    pub(crate) public_keys_db: Database<Bytes, Bytes>,
    pub(crate) decryption_requests_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path and bring its
    /// schema up to date.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per directory by this process
        // and never memory-mapped elsewhere.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(DATABASE_NAMES.len() as u32)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let votings_db = env.create_database(&mut wtxn, Some("votings"))?;
        let voters_db = env.create_database(&mut wtxn, Some("voters"))?;
        let credits_db = env.create_database(&mut wtxn, Some("credits"))?;
        let allocations_db = env.create_database(&mut wtxn, Some("allocations"))?;
        let public_keys_db = env.create_database(&mut wtxn, Some("public_keys"))?;
        let decryption_requests_db =
            env.create_database(&mut wtxn, Some("decryption_requests"))?;
        let meta_db = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        let environment = Self {
            env,
            votings_db,
            voters_db,
            credits_db,
            allocations_db,
            public_keys_db,
            decryption_requests_db,
            meta_db,
        };

        Migrator::run(&environment)?;
        tracing::info!(path = %path.display(), map_size, "opened LMDB environment");
        Ok(environment)
    }

    pub fn env(&self) -> &Env {
        &self.env
    }
}
