//! Application state and adapter wiring

use std::sync::Arc;

use tracing::info;

use core_kernel::Money;
use domain_claims::ClaimsPort;
use domain_cost::CostTracker;
use domain_validation::{
    ClaimValidationOrchestrator, ComplianceProvider, MockComplianceProvider, MockReasoningProvider,
    OpenAiReasoningProvider, ReasoningProvider, RuleBasedComplianceChecker,
};
use infra_storage::{
    create_pool, run_migrations, DatabaseConfig, DocumentStore, FsDocumentStore, HybridClaimsStore,
    InMemoryDocumentStore, InMemoryMetadataStore, MetadataStore, PgMetadataStore,
};

use crate::config::ApiConfig;
use crate::error::StartupError;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub claims: Arc<dyn ClaimsPort>,
    pub orchestrator: Arc<ClaimValidationOrchestrator>,
    pub cost_tracker: Arc<CostTracker>,
    pub max_claim_amount: Money,
}

impl AppState {
    /// Assembles state from already-built adapters
    pub fn new(
        config: ApiConfig,
        claims: Arc<dyn ClaimsPort>,
        orchestrator: Arc<ClaimValidationOrchestrator>,
    ) -> Self {
        Self {
            cost_tracker: Arc::clone(orchestrator.cost_tracker()),
            max_claim_amount: config.max_claim_amount(),
            config: Arc::new(config),
            claims,
            orchestrator,
        }
    }

    /// Builds every adapter the configuration asks for
    ///
    /// | setting | set | unset |
    /// |---------|-----|-------|
    /// | `use_mock_ai` | mock providers | OpenAI + rule-based compliance |
    /// | `document_root` | filesystem documents | in-memory documents |
    /// | `database_url` | PostgreSQL metadata (migrated) | in-memory metadata |
    pub async fn from_config(config: ApiConfig) -> Result<Self, StartupError> {
        config.ensure_valid()?;

        let budget = config.budget_config();
        budget.validate()?;
        let cost_tracker = Arc::new(CostTracker::new(budget));

        let orchestrator = Arc::new(ClaimValidationOrchestrator::new(
            reasoning_provider(&config)?,
            compliance_provider(&config),
            cost_tracker,
        ));

        let claims = HybridClaimsStore::new(document_store(&config).await?, metadata_store(&config).await?)
            .with_retention_days(config.retention_days);

        Ok(Self::new(config, Arc::new(claims), orchestrator))
    }
}

fn reasoning_provider(config: &ApiConfig) -> Result<Arc<dyn ReasoningProvider>, StartupError> {
    if config.use_mock_ai {
        info!(
            realistic_delays = config.mock_ai_realistic_delays,
            pinned_scenario = ?config.mock_scenario,
            "Using mock medical reasoning"
        );
        Ok(Arc::new(MockReasoningProvider::new(config.mock_ai_config())))
    } else {
        info!(model = %config.openai_model, "Using OpenAI medical reasoning");
        Ok(Arc::new(OpenAiReasoningProvider::new(config.openai_config())?))
    }
}

fn compliance_provider(config: &ApiConfig) -> Arc<dyn ComplianceProvider> {
    if config.use_mock_ai {
        Arc::new(MockComplianceProvider::new(config.mock_ai_config()))
    } else {
        Arc::new(RuleBasedComplianceChecker::new(config.compliance_latencies()))
    }
}

async fn document_store(config: &ApiConfig) -> Result<Arc<dyn DocumentStore>, StartupError> {
    match config.document_root.as_deref() {
        Some(root) => {
            info!(root, "Using filesystem document store");
            Ok(Arc::new(FsDocumentStore::new(root).await?))
        }
        None => {
            info!("Using in-memory document store");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
    }
}

async fn metadata_store(config: &ApiConfig) -> Result<Arc<dyn MetadataStore>, StartupError> {
    match config.database_url.as_deref() {
        Some(url) => {
            let pool = create_pool(DatabaseConfig::new(url)).await?;
            run_migrations(&pool).await?;
            Ok(Arc::new(PgMetadataStore::new(pool)))
        }
        None => {
            info!("Using in-memory metadata store");
            Ok(Arc::new(InMemoryMetadataStore::new()))
        }
    }
}
