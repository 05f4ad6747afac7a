//! Composition root: one configured backend per process.
//!
//! # Responsibility
//! - Own the storage medium selected by `StoreConfig`.
//! - Hand out the repository and service for the active backend.
//! - Optionally store the startup sample items.
//!
//! # Invariants
//! - A SQLite connection exists only for SQLite-backed backends.
//! - Repositories and services borrow the store; they never outlive it.

use crate::config::{Backend, ConfigError, StoreConfig};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::item::{Item, NewItem};
use crate::repo::builder_repo::BuilderItemRepository;
use crate::repo::derived_repo::DerivedItemRepository;
use crate::repo::memory_repo::MemoryItemRepository;
use crate::repo::named_repo::NamedSqlItemRepository;
use crate::repo::sql_repo::SqlItemRepository;
use crate::repo::{ItemRepository, RepoError, RepoResult};
use crate::service::item_service::ItemService;
use crate::service::split_service::SplitItemService;
use crate::service::ItemUseCase;
use log::info;
use rusqlite::Connection;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

enum Storage {
    Memory(MemoryItemRepository),
    Sqlite(Connection),
}

/// Storage medium plus the backend that reads and writes it.
pub struct ItemStore {
    backend: Backend,
    storage: Storage,
}

impl ItemStore {
    /// Opens storage for `config.backend` and seeds it when requested.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        let storage = if config.backend.uses_sqlite() {
            let conn = match config.db_path.as_deref() {
                Some(path) => open_db(path)?,
                None => open_db_in_memory()?,
            };
            Storage::Sqlite(conn)
        } else {
            Storage::Memory(MemoryItemRepository::new())
        };

        let store = Self {
            backend: config.backend,
            storage,
        };
        info!(
            "event=store_open module=store status=ok backend={} persistent={}",
            store.backend,
            config.db_path.is_some()
        );

        if config.seed_data {
            seed_test_data(&*store.service()?)?;
        }

        Ok(store)
    }

    /// Opens `backend` over non-persistent storage without seeding.
    pub fn in_memory(backend: Backend) -> StoreResult<Self> {
        Self::open(&StoreConfig::with_backend(backend))
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// The SQLite connection, if the backend uses one.
    pub fn connection(&self) -> Option<&Connection> {
        match &self.storage {
            Storage::Sqlite(conn) => Some(conn),
            Storage::Memory(_) => None,
        }
    }

    /// Repository for the active backend.
    ///
    /// `split` has no single repository; its command side (`derived`) is
    /// returned.
    pub fn repository(&self) -> RepoResult<Box<dyn ItemRepository + '_>> {
        let repo: Box<dyn ItemRepository + '_> = match self.backend {
            Backend::Memory => Box::new(self.memory()?),
            Backend::Sql => Box::new(SqlItemRepository::try_new(self.sqlite()?)?),
            Backend::NamedSql => Box::new(NamedSqlItemRepository::try_new(self.sqlite()?)?),
            Backend::Derived | Backend::Split => {
                Box::new(DerivedItemRepository::try_new(self.sqlite()?)?)
            }
            Backend::Builder => Box::new(BuilderItemRepository::try_new(self.sqlite()?)?),
        };
        Ok(repo)
    }

    /// Service for the active backend.
    pub fn service(&self) -> RepoResult<Box<dyn ItemUseCase + '_>> {
        if self.backend == Backend::Split {
            let conn = self.sqlite()?;
            return Ok(Box::new(SplitItemService::new(
                DerivedItemRepository::try_new(conn)?,
                BuilderItemRepository::try_new(conn)?,
            )));
        }

        Ok(Box::new(ItemService::new(self.repository()?)))
    }

    fn memory(&self) -> RepoResult<&MemoryItemRepository> {
        match &self.storage {
            Storage::Memory(repo) => Ok(repo),
            Storage::Sqlite(_) => Err(RepoError::StoreUnavailable),
        }
    }

    fn sqlite(&self) -> RepoResult<&Connection> {
        self.connection().ok_or(RepoError::StoreUnavailable)
    }
}

/// Stores the two sample items used for local runs.
pub fn seed_test_data(service: &dyn ItemUseCase) -> RepoResult<Vec<Item>> {
    info!("event=seed_data module=store status=start");
    let items = [
        NewItem::new("itemA", 10_000, 10),
        NewItem::new("itemB", 20_000, 20),
    ]
    .iter()
    .map(|item| service.save(item))
    .collect::<RepoResult<Vec<_>>>()?;
    info!(
        "event=seed_data module=store status=ok count={}",
        items.len()
    );
    Ok(items)
}
