//! Infrastructure Storage Layer
//!
//! Persistence for claims and validation results, split in two:
//!
//! - a **document store** holding the full JSON of every record
//!   ([`FsDocumentStore`] on local disk, [`InMemoryDocumentStore`] for demos)
//! - a **metadata store** holding queryable columns, the document path and
//!   a retention expiry ([`PgMetadataStore`] on PostgreSQL via SQLx,
//!   [`InMemoryMetadataStore`] otherwise)
//!
//! [`HybridClaimsStore`] combines the two behind the `ClaimsPort` trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_storage::{create_pool, run_migrations, DatabaseConfig, FsDocumentStore, HybridClaimsStore, PgMetadataStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/claims")).await?;
//! run_migrations(&pool).await?;
//! let store = HybridClaimsStore::new(
//!     Arc::new(FsDocumentStore::new("./data").await?),
//!     Arc::new(PgMetadataStore::new(pool)),
//! );
//! ```

pub mod document;
pub mod metadata;
pub mod hybrid;
pub mod pool;
pub mod error;

pub use document::{DocumentStore, FsDocumentStore, InMemoryDocumentStore};
pub use metadata::{
    ClaimMetadata, InMemoryMetadataStore, MetadataStore, PgMetadataStore, ResultMetadata,
};
pub use hybrid::{claim_document_key, result_document_key, HybridClaimsStore, DEFAULT_RETENTION_DAYS};
pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool};
pub use error::StorageError;
