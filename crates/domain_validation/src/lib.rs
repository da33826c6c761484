//! AI Claim Validation
//!
//! Provider ports for medical reasoning and compliance checking, their
//! adapters, and the orchestrator that turns a claim into a
//! [`domain_claims::ValidationResult`].
//!
//! # Adapters
//!
//! | port | production | demo |
//! |------|------------|------|
//! | [`ReasoningProvider`] | [`OpenAiReasoningProvider`] | [`MockReasoningProvider`] |
//! | [`ComplianceProvider`] | [`RuleBasedComplianceChecker`] | [`MockComplianceProvider`] |

pub mod confidence;
pub mod compliance;
pub mod fallback;
pub mod mock_ai;
pub mod openai;
pub mod orchestrator;
pub mod ports;
pub mod scenarios;
pub mod error;

pub use confidence::{determine_status, extract_confidence};
pub use compliance::{ComplianceLatencies, RuleBasedComplianceChecker};
pub use fallback::{fallback_compliance_checks, fallback_reasoning, FALLBACK_CONFIDENCE};
pub use mock_ai::{MockAiConfig, MockComplianceProvider, MockReasoningProvider};
pub use openai::{build_medical_prompt, OpenAiConfig, OpenAiReasoningProvider};
pub use orchestrator::ClaimValidationOrchestrator;
pub use ports::{ComplianceProvider, MedicalReasoning, ReasoningProvider};
pub use scenarios::{medical_context, select_scenario, ScenarioKind, ScenarioTemplate};
pub use error::AiError;
