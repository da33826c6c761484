//! API configuration
//!
//! Loaded once at startup from `CLAIMS_`-prefixed environment variables and
//! passed explicitly to everything that needs it. Every field has a default,
//! so an empty environment yields a working demo server with mock AI.

use std::time::Duration;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationError};

use core_kernel::Money;
use domain_cost::BudgetConfig;
use domain_validation::{ComplianceLatencies, MockAiConfig, OpenAiConfig, ScenarioKind};

/// Key used for the OpenAI provider when running against mocks
pub const MOCK_OPENAI_API_KEY: &str = "sk-mock-key-for-development";

const ENV_PREFIX: &str = "CLAIMS";
const MIN_API_KEY_LEN: usize = 20;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// API configuration
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level: trace, debug, info, warn (or warning), error
    #[validate(custom(function = "validate_log_level"))]
    pub log_level: String,
    pub log_format: LogFormat,
    /// Include error details in responses
    pub debug: bool,

    /// Use the scenario-driven mock providers instead of OpenAI
    pub use_mock_ai: bool,
    pub mock_ai_realistic_delays: bool,
    /// Pin every mock validation to one scenario
    pub mock_scenario: Option<ScenarioKind>,

    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    #[validate(range(min = 1, max = 8000))]
    pub openai_max_tokens: u32,
    #[validate(range(min = 0.0, max = 2.0))]
    pub openai_temperature: f32,
    #[validate(range(min = 1, max = 300))]
    pub ai_timeout_secs: u64,
    /// Simulated latency in the rule-based compliance checker
    pub simulate_compliance_latency: bool,

    #[validate(range(exclusive_min = 0.0, max = 100.0))]
    pub max_demo_budget_usd: f64,
    #[validate(range(min = 0.0))]
    pub budget_warning_threshold_usd: f64,
    pub cost_tracking_enabled: bool,
    /// Hours a cost session may sit idle before it is dropped
    #[validate(range(min = 1, max = 168))]
    pub cost_session_idle_hours: u32,
    #[validate(range(min = 1, max = 100_000))]
    pub max_cost_sessions: usize,
    #[validate(range(exclusive_min = 0.0))]
    pub max_claim_amount_usd: f64,

    /// Days before stored claims and results expire
    #[validate(range(min = 1, max = 365))]
    pub retention_days: u32,
    /// Filesystem document root; in-memory documents when unset
    pub document_root: Option<String>,
    /// PostgreSQL metadata store; in-memory metadata when unset
    pub database_url: Option<String>,
    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            debug: false,
            use_mock_ai: true,
            mock_ai_realistic_delays: true,
            mock_scenario: None,
            openai_api_key: None,
            openai_model: "gpt-4".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openai_max_tokens: 1000,
            openai_temperature: 0.1,
            ai_timeout_secs: 120,
            simulate_compliance_latency: true,
            max_demo_budget_usd: 50.0,
            budget_warning_threshold_usd: 45.0,
            cost_tracking_enabled: true,
            cost_session_idle_hours: 24,
            max_cost_sessions: 1000,
            max_claim_amount_usd: 50_000.0,
            retention_days: 7,
            document_root: None,
            database_url: None,
            cors_origins: vec!["*".to_string()],
        }
    }
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    match level.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "warning" | "error" => Ok(()),
        _ => Err(ValidationError::new("log_level")
            .with_message("must be one of trace, debug, info, warn, error".into())),
    }
}

impl ApiConfig {
    /// Loads configuration from `CLAIMS_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(environment())
    }

    /// Loads configuration from an explicit variable map, as if it were the environment
    pub fn from_vars(vars: config::Map<String, String>) -> Result<Self, ConfigError> {
        Self::load(environment().source(Some(vars)))
    }

    fn load(source: config::Environment) -> Result<Self, ConfigError> {
        let config: ApiConfig = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        config.ensure_valid()?;
        Ok(config)
    }

    /// Checks field ranges and cross-field rules, reporting every problem found
    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if let Err(errors) = self.validate() {
            for (field, field_errors) in errors.field_errors() {
                for error in field_errors {
                    let detail = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    problems.push(format!("{field}: {detail}"));
                }
            }
        }

        if self.budget_warning_threshold_usd >= self.max_demo_budget_usd {
            problems.push(format!(
                "budget_warning_threshold_usd: {} must be below max_demo_budget_usd {}",
                self.budget_warning_threshold_usd, self.max_demo_budget_usd
            ));
        }

        if !self.use_mock_ai {
            match self.openai_api_key.as_deref() {
                None | Some("") => {
                    problems.push("openai_api_key: required unless use_mock_ai is set".to_string())
                }
                Some(key) if !key.starts_with("sk-") => {
                    problems.push("openai_api_key: must start with 'sk-'".to_string())
                }
                Some(key) if key.len() < MIN_API_KEY_LEN => problems.push(format!(
                    "openai_api_key: must be at least {MIN_API_KEY_LEN} characters"
                )),
                Some(_) => {}
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            problems.sort();
            Err(ConfigError::Invalid(problems))
        }
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Tracing filter directive for the configured level
    pub fn tracing_level(&self) -> String {
        match self.log_level.to_ascii_lowercase().as_str() {
            "warning" => "warn".to_string(),
            other => other.to_string(),
        }
    }

    pub fn budget_config(&self) -> BudgetConfig {
        BudgetConfig {
            max_budget: usd(self.max_demo_budget_usd),
            warning_threshold: usd(self.budget_warning_threshold_usd),
            enabled: self.cost_tracking_enabled,
            session_idle_ttl: chrono::Duration::hours(i64::from(self.cost_session_idle_hours)),
            max_sessions: self.max_cost_sessions,
            ..BudgetConfig::default()
        }
    }

    pub fn max_claim_amount(&self) -> Money {
        usd(self.max_claim_amount_usd)
    }

    pub fn mock_ai_config(&self) -> MockAiConfig {
        MockAiConfig {
            realistic_delays: self.mock_ai_realistic_delays,
            pinned_scenario: self.mock_scenario,
        }
    }

    pub fn openai_config(&self) -> OpenAiConfig {
        let api_key = match self.openai_api_key.as_deref() {
            Some(key) if !key.is_empty() => key.to_string(),
            _ if self.use_mock_ai => MOCK_OPENAI_API_KEY.to_string(),
            _ => String::new(),
        };
        OpenAiConfig {
            api_key,
            model: self.openai_model.clone(),
            base_url: self.openai_base_url.clone(),
            max_tokens: self.openai_max_tokens,
            temperature: self.openai_temperature,
            timeout: Duration::from_secs(self.ai_timeout_secs),
        }
    }

    pub fn compliance_latencies(&self) -> ComplianceLatencies {
        if self.simulate_compliance_latency {
            ComplianceLatencies::default()
        } else {
            ComplianceLatencies::none()
        }
    }

    /// True when every origin is allowed
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors_origins")
}

fn usd(value: f64) -> Money {
    Money::new(Decimal::from_f64(value).unwrap_or_default().round_dp(2))
}
