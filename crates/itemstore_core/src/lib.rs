//! Core item store: domain model, repository backends and services.
//! Entry points should go through `ItemStore` or `ItemService`.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{Backend, ConfigError, StoreConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::item::{Item, ItemId, ItemSearchCond, ItemUpdateParams, NewItem};
pub use repo::builder_repo::BuilderItemRepository;
pub use repo::derived_repo::DerivedItemRepository;
pub use repo::memory_repo::MemoryItemRepository;
pub use repo::named_repo::NamedSqlItemRepository;
pub use repo::sql_repo::SqlItemRepository;
pub use repo::{ItemQueryRepository, ItemRepository, RepoError, RepoResult};
pub use service::item_service::ItemService;
pub use service::split_service::SplitItemService;
pub use service::ItemUseCase;
pub use store::{seed_test_data, ItemStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
