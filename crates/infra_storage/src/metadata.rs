//! Metadata store for claims and validation results
//!
//! Holds the queryable columns of each record plus the document path and a
//! retention expiry (`ttl`, epoch seconds). Expired rows are treated as
//! absent by the hybrid store; nothing here deletes them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;

use core_kernel::{ClaimId, HealthCheckResult, HealthCheckable, Money, ResultId};
use domain_claims::{ClaimPriority, ClaimStatus, HealthcareClaim, ValidationResult, ValidationStatus};

use crate::error::StorageError;

/// Queryable view of a stored claim
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimMetadata {
    pub claim_id: ClaimId,
    pub patient_id: String,
    pub provider_id: String,
    pub procedure_code: String,
    pub diagnosis_code: String,
    pub claim_amount: Money,
    pub status: ClaimStatus,
    pub priority: ClaimPriority,
    pub service_date: DateTime<Utc>,
    pub submitted_at: DateTime<Utc>,
    pub document_path: String,
    pub ttl: i64,
    pub updated_at: DateTime<Utc>,
}

impl ClaimMetadata {
    pub fn from_claim(claim: &HealthcareClaim, document_path: String, ttl: i64) -> Self {
        Self {
            claim_id: claim.claim_id.clone(),
            patient_id: claim.patient_id.clone(),
            provider_id: claim.provider_id.clone(),
            procedure_code: claim.procedure_code.clone(),
            diagnosis_code: claim.diagnosis_code.clone(),
            claim_amount: claim.claim_amount,
            status: claim.status,
            priority: claim.priority,
            service_date: claim.service_date,
            submitted_at: claim.submitted_at,
            document_path,
            ttl,
            updated_at: Utc::now(),
        }
    }

    /// Rebuilds a claim when its document is gone
    ///
    /// Free-text context and supporting documents only live in the document
    /// and are lost.
    pub fn to_claim(&self) -> HealthcareClaim {
        HealthcareClaim {
            claim_id: self.claim_id.clone(),
            patient_id: self.patient_id.clone(),
            provider_id: self.provider_id.clone(),
            service_date: self.service_date,
            procedure_code: self.procedure_code.clone(),
            diagnosis_code: self.diagnosis_code.clone(),
            claim_amount: self.claim_amount,
            status: self.status,
            submitted_at: self.submitted_at,
            priority: self.priority,
            medical_necessity_context: None,
            supporting_documents: None,
        }
    }
}

/// Queryable view of a stored validation result
#[derive(Debug, Clone, PartialEq)]
pub struct ResultMetadata {
    pub result_id: ResultId,
    pub claim_id: ClaimId,
    pub validation_status: ValidationStatus,
    pub confidence_score: f64,
    pub requires_human_review: bool,
    pub created_at: DateTime<Utc>,
    pub document_path: String,
    pub ttl: i64,
}

impl ResultMetadata {
    pub fn from_result(result: &ValidationResult, document_path: String, ttl: i64) -> Self {
        Self {
            result_id: result.result_id.clone(),
            claim_id: result.claim_id.clone(),
            validation_status: result.validation_status,
            confidence_score: result.confidence_score,
            requires_human_review: result.requires_human_review,
            created_at: result.created_at,
            document_path,
            ttl,
        }
    }
}

/// Metadata persistence
#[async_trait]
pub trait MetadataStore: HealthCheckable + Send + Sync {
    /// Inserts or replaces claim metadata
    async fn put_claim(&self, record: &ClaimMetadata) -> Result<(), StorageError>;

    async fn get_claim(&self, claim_id: &ClaimId) -> Result<Option<ClaimMetadata>, StorageError>;

    /// Sets the status; returns false when the claim is unknown
    async fn update_claim_status(
        &self,
        claim_id: &ClaimId,
        status: ClaimStatus,
    ) -> Result<bool, StorageError>;

    async fn put_result(&self, record: &ResultMetadata) -> Result<(), StorageError>;

    /// Most recent result for a claim by `created_at`
    async fn latest_result(&self, claim_id: &ClaimId) -> Result<Option<ResultMetadata>, StorageError>;
}

// ============================================================================
// In-memory adapter
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct InMemoryMetadataStore {
    claims: Arc<RwLock<HashMap<ClaimId, ClaimMetadata>>>,
    results: Arc<RwLock<HashMap<ClaimId, Vec<ResultMetadata>>>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HealthCheckable for InMemoryMetadataStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("memory-metadata-store", 0)
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn put_claim(&self, record: &ClaimMetadata) -> Result<(), StorageError> {
        self.claims
            .write()
            .await
            .insert(record.claim_id.clone(), record.clone());
        Ok(())
    }

    async fn get_claim(&self, claim_id: &ClaimId) -> Result<Option<ClaimMetadata>, StorageError> {
        Ok(self.claims.read().await.get(claim_id).cloned())
    }

    async fn update_claim_status(
        &self,
        claim_id: &ClaimId,
        status: ClaimStatus,
    ) -> Result<bool, StorageError> {
        let mut claims = self.claims.write().await;
        match claims.get_mut(claim_id) {
            Some(record) => {
                record.status = status;
                record.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn put_result(&self, record: &ResultMetadata) -> Result<(), StorageError> {
        let mut results = self.results.write().await;
        let entries = results.entry(record.claim_id.clone()).or_default();
        entries.retain(|r| r.result_id != record.result_id);
        entries.push(record.clone());
        Ok(())
    }

    async fn latest_result(&self, claim_id: &ClaimId) -> Result<Option<ResultMetadata>, StorageError> {
        Ok(self
            .results
            .read()
            .await
            .get(claim_id)
            .and_then(|entries| entries.iter().max_by_key(|r| r.created_at))
            .cloned())
    }
}

// ============================================================================
// PostgreSQL adapter
// ============================================================================

#[derive(Debug, FromRow)]
struct ClaimMetadataRow {
    claim_id: String,
    patient_id: String,
    provider_id: String,
    procedure_code: String,
    diagnosis_code: String,
    claim_amount: Decimal,
    status: String,
    priority: String,
    service_date: DateTime<Utc>,
    submitted_at: DateTime<Utc>,
    document_path: String,
    ttl: i64,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ClaimMetadataRow> for ClaimMetadata {
    type Error = StorageError;

    fn try_from(row: ClaimMetadataRow) -> Result<Self, Self::Error> {
        Ok(Self {
            claim_id: row
                .claim_id
                .parse()
                .map_err(|e| StorageError::CorruptRecord(format!("claim_id: {e}")))?,
            patient_id: row.patient_id,
            provider_id: row.provider_id,
            procedure_code: row.procedure_code,
            diagnosis_code: row.diagnosis_code,
            claim_amount: Money::new(row.claim_amount),
            status: ClaimStatus::parse(&row.status)
                .ok_or_else(|| StorageError::CorruptRecord(format!("status: {}", row.status)))?,
            priority: ClaimPriority::parse(&row.priority)
                .ok_or_else(|| StorageError::CorruptRecord(format!("priority: {}", row.priority)))?,
            service_date: row.service_date,
            submitted_at: row.submitted_at,
            document_path: row.document_path,
            ttl: row.ttl,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ResultMetadataRow {
    result_id: String,
    claim_id: String,
    validation_status: String,
    confidence_score: f64,
    requires_human_review: bool,
    created_at: DateTime<Utc>,
    document_path: String,
    ttl: i64,
}

impl TryFrom<ResultMetadataRow> for ResultMetadata {
    type Error = StorageError;

    fn try_from(row: ResultMetadataRow) -> Result<Self, Self::Error> {
        Ok(Self {
            result_id: row
                .result_id
                .parse()
                .map_err(|e| StorageError::CorruptRecord(format!("result_id: {e}")))?,
            claim_id: row
                .claim_id
                .parse()
                .map_err(|e| StorageError::CorruptRecord(format!("claim_id: {e}")))?,
            validation_status: ValidationStatus::parse(&row.validation_status).ok_or_else(|| {
                StorageError::CorruptRecord(format!("validation_status: {}", row.validation_status))
            })?,
            confidence_score: row.confidence_score,
            requires_human_review: row.requires_human_review,
            created_at: row.created_at,
            document_path: row.document_path,
            ttl: row.ttl,
        })
    }
}

/// PostgreSQL-backed metadata store
#[derive(Debug, Clone)]
pub struct PgMetadataStore {
    pool: PgPool,
}

impl PgMetadataStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl HealthCheckable for PgMetadataStore {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::healthy("postgres-metadata-store", latency_ms),
            Err(e) => HealthCheckResult::unhealthy(
                "postgres-metadata-store",
                latency_ms,
                format!("Database error: {e}"),
            ),
        }
    }
}

#[async_trait]
impl MetadataStore for PgMetadataStore {
    async fn put_claim(&self, record: &ClaimMetadata) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO claim_metadata (
                claim_id, patient_id, provider_id, procedure_code, diagnosis_code,
                claim_amount, status, priority, service_date, submitted_at,
                document_path, ttl, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (claim_id) DO UPDATE SET
                patient_id = EXCLUDED.patient_id,
                provider_id = EXCLUDED.provider_id,
                procedure_code = EXCLUDED.procedure_code,
                diagnosis_code = EXCLUDED.diagnosis_code,
                claim_amount = EXCLUDED.claim_amount,
                status = EXCLUDED.status,
                priority = EXCLUDED.priority,
                service_date = EXCLUDED.service_date,
                submitted_at = EXCLUDED.submitted_at,
                document_path = EXCLUDED.document_path,
                ttl = EXCLUDED.ttl,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(record.claim_id.as_str())
        .bind(&record.patient_id)
        .bind(&record.provider_id)
        .bind(&record.procedure_code)
        .bind(&record.diagnosis_code)
        .bind(record.claim_amount.amount())
        .bind(record.status.as_str())
        .bind(record.priority.as_str())
        .bind(record.service_date)
        .bind(record.submitted_at)
        .bind(&record.document_path)
        .bind(record.ttl)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_claim(&self, claim_id: &ClaimId) -> Result<Option<ClaimMetadata>, StorageError> {
        let row = sqlx::query_as::<_, ClaimMetadataRow>(
            r#"
            SELECT claim_id, patient_id, provider_id, procedure_code, diagnosis_code,
                   claim_amount, status, priority, service_date, submitted_at,
                   document_path, ttl, updated_at
            FROM claim_metadata
            WHERE claim_id = $1
            "#,
        )
        .bind(claim_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ClaimMetadata::try_from).transpose()
    }

    async fn update_claim_status(
        &self,
        claim_id: &ClaimId,
        status: ClaimStatus,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "UPDATE claim_metadata SET status = $2, updated_at = now() WHERE claim_id = $1",
        )
        .bind(claim_id.as_str())
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn put_result(&self, record: &ResultMetadata) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO validation_result_metadata (
                result_id, claim_id, validation_status, confidence_score,
                requires_human_review, created_at, document_path, ttl
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (claim_id, result_id) DO UPDATE SET
                validation_status = EXCLUDED.validation_status,
                confidence_score = EXCLUDED.confidence_score,
                requires_human_review = EXCLUDED.requires_human_review,
                document_path = EXCLUDED.document_path,
                ttl = EXCLUDED.ttl
            "#,
        )
        .bind(record.result_id.as_str())
        .bind(record.claim_id.as_str())
        .bind(record.validation_status.as_str())
        .bind(record.confidence_score)
        .bind(record.requires_human_review)
        .bind(record.created_at)
        .bind(&record.document_path)
        .bind(record.ttl)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn latest_result(&self, claim_id: &ClaimId) -> Result<Option<ResultMetadata>, StorageError> {
        let row = sqlx::query_as::<_, ResultMetadataRow>(
            r#"
            SELECT result_id, claim_id, validation_status, confidence_score,
                   requires_human_review, created_at, document_path, ttl
            FROM validation_result_metadata
            WHERE claim_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(claim_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ResultMetadata::try_from).transpose()
    }
}
