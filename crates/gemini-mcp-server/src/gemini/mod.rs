// crates/gemini-mcp-server/src/gemini/mod.rs
// Consultation orchestrator: pacing, prompt shaping, CLI invocation, history

pub mod history;
pub mod patterns;
pub mod prompt;
pub mod rate_limit;
pub mod runner;

pub use history::{ConsultationLog, ConsultationRecord};
pub use patterns::{PatternFamily, detect_uncertainty};
pub use runner::{CliInvocation, CliOutput, CliRunner, ProcessRunner};

use crate::config::GeminiConfig;
use crate::error::{GeminiError, Result};
use rate_limit::RateLimiter;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Outcome of one `consult` call. Never an `Err`: failures are values here.
///
/// Serializes with a `status` tag of `success`, `error` or `disabled`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConsultationResult {
    Success {
        response: String,
        /// Seconds spent in the CLI
        execution_time: f64,
        consultation_id: String,
        timestamp: String,
    },
    Error {
        error: String,
        consultation_id: Option<String>,
    },
    Disabled {
        message: String,
    },
}

impl ConsultationResult {
    pub fn status(&self) -> &'static str {
        match self {
            ConsultationResult::Success { .. } => "success",
            ConsultationResult::Error { .. } => "error",
            ConsultationResult::Disabled { .. } => "disabled",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConsultationResult::Success { .. })
    }
}

/// Point-in-time view of configuration and statistics
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationStatus {
    pub enabled: bool,
    pub auto_consult: bool,
    pub cli_command: String,
    pub model: String,
    pub rate_limit_delay: f64,
    pub timeout: u64,
    pub total_consultations: usize,
    pub last_consultation: Option<String>,
}

/// Successful CLI run, before it is turned into a result
struct CliResponse {
    output: String,
    execution_time: f64,
}

/// Mediates every consultation with the external AI CLI.
///
/// Built once by the hosting process and shared behind an `Arc`. Only
/// `auto_consult` changes after construction.
pub struct GeminiIntegration {
    config: GeminiConfig,
    auto_consult: AtomicBool,
    rate_limiter: RateLimiter,
    log: ConsultationLog,
    runner: Arc<dyn CliRunner>,
    /// Millisecond stamp of the last issued consultation id
    last_id_millis: AtomicI64,
}

impl GeminiIntegration {
    /// Integration backed by a real child process
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_runner(config, Arc::new(ProcessRunner))
    }

    /// Integration with a custom CLI runner
    pub fn with_runner(config: GeminiConfig, runner: Arc<dyn CliRunner>) -> Self {
        Self {
            auto_consult: AtomicBool::new(config.auto_consult),
            rate_limiter: RateLimiter::new(config.rate_limit_delay),
            log: ConsultationLog::new(),
            runner,
            config,
            last_id_millis: AtomicI64::new(0),
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn auto_consult(&self) -> bool {
        self.auto_consult.load(Ordering::SeqCst)
    }

    pub fn set_auto_consult(&self, enable: bool) {
        self.auto_consult.store(enable, Ordering::SeqCst);
        info!(auto_consult = enable, "Auto-consultation updated");
    }

    /// Flip auto-consultation and return the new state
    pub fn toggle_auto_consult(&self) -> bool {
        let new_state = !self.auto_consult.fetch_xor(true, Ordering::SeqCst);
        info!(auto_consult = new_state, "Auto-consultation toggled");
        new_state
    }

    /// Ask the CLI for a second opinion.
    ///
    /// Unless `force_consult` is set, waits until `rate_limit_delay` has
    /// passed since the previous non-forced consultation. A disabled
    /// integration returns immediately without touching any state.
    pub async fn consult(
        &self,
        query: &str,
        context: &str,
        comparison_mode: bool,
        force_consult: bool,
    ) -> ConsultationResult {
        if !self.config.enabled {
            return ConsultationResult::Disabled {
                message: "Gemini integration is disabled".to_string(),
            };
        }

        if !force_consult {
            self.rate_limiter.acquire().await;
        }

        let consultation_id = self.next_consultation_id();
        let full_query = prompt::prepare_query(
            query,
            context,
            comparison_mode,
            self.config.max_context_length,
        );

        match self.execute(&full_query).await {
            Ok(response) => {
                let timestamp = now_timestamp();

                if self.config.log_consultations {
                    self.log.push(ConsultationRecord {
                        id: consultation_id.clone(),
                        timestamp: timestamp.clone(),
                        query: prompt::truncate_for_record(query),
                        status: "success".to_string(),
                        execution_time: response.execution_time,
                    });
                }

                info!(
                    consultation_id = %consultation_id,
                    elapsed = response.execution_time,
                    "Consultation completed"
                );

                ConsultationResult::Success {
                    response: response.output,
                    execution_time: response.execution_time,
                    consultation_id,
                    timestamp,
                }
            }
            Err(e) => {
                error!(consultation_id = %consultation_id, error = %e, "Error consulting Gemini");
                ConsultationResult::Error {
                    error: e.to_user_string(),
                    consultation_id: Some(consultation_id),
                }
            }
        }
    }

    /// Run the CLI once and interpret its exit status
    async fn execute(&self, full_query: &str) -> Result<CliResponse> {
        let invocation =
            CliInvocation::new(&self.config.cli_command, &self.config.model, full_query);
        let timeout = Duration::from_secs(self.config.timeout);

        let start = Instant::now();
        let output = self.runner.run(&invocation, timeout).await?;
        let execution_time = start.elapsed().as_secs_f64();

        if !output.success {
            warn!(
                exit_code = ?output.exit_code,
                elapsed = execution_time,
                "Gemini CLI exited with failure"
            );
            return Err(GeminiError::Execution(self.describe_failure(&output)));
        }

        Ok(CliResponse {
            output: output.stdout.trim().to_string(),
            execution_time,
        })
    }

    fn describe_failure(&self, output: &CliOutput) -> String {
        let mut message = if output.stderr.is_empty() {
            "Unknown error".to_string()
        } else {
            output.stderr.clone()
        };

        if message.to_lowercase().contains("authentication") {
            message.push_str(&format!(
                "\nTip: Run '{}' interactively to authenticate",
                self.config.cli_command
            ));
        }

        message
    }

    /// `consult_<unix millis>`, bumped past the previous id when two
    /// consultations start within the same millisecond
    fn next_consultation_id(&self) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        let prev = self
            .last_id_millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
            .unwrap_or_else(|last| last);
        format!("consult_{}", now.max(prev + 1))
    }

    /// Pattern scan of `text`; see [`patterns::detect_uncertainty`]
    pub fn detect_uncertainty(&self, text: &str) -> (bool, Vec<String>) {
        detect_uncertainty(text)
    }

    /// Labels that would trigger an automatic consultation for `text`.
    ///
    /// Empty unless the integration is enabled, auto-consult is on, and the
    /// text matched at least one pattern.
    pub fn auto_consult_triggers(&self, text: &str) -> Vec<String> {
        if !self.config.enabled || !self.auto_consult() {
            return Vec::new();
        }
        detect_uncertainty(text).1
    }

    /// Number of recorded consultations
    pub fn consultation_count(&self) -> usize {
        self.log.len()
    }

    /// Recorded consultations, oldest first
    pub fn history(&self) -> Vec<ConsultationRecord> {
        self.log.snapshot()
    }

    /// When the rate-limit window was last stamped
    pub async fn last_consultation(&self) -> Option<tokio::time::Instant> {
        self.rate_limiter.last_acquired().await
    }

    pub fn status(&self) -> IntegrationStatus {
        IntegrationStatus {
            enabled: self.config.enabled,
            auto_consult: self.auto_consult(),
            cli_command: self.config.cli_command.clone(),
            model: self.config.model.clone(),
            rate_limit_delay: self.config.rate_limit_delay,
            timeout: self.config.timeout,
            total_consultations: self.log.len(),
            last_consultation: self.log.last().map(|r| r.timestamp),
        }
    }
}

fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns canned outputs and remembers what it was asked to run
    struct ScriptedRunner {
        outcome: Mutex<Box<dyn FnMut() -> Result<CliOutput> + Send>>,
        calls: Mutex<Vec<CliInvocation>>,
    }

    impl ScriptedRunner {
        fn new(f: impl FnMut() -> Result<CliOutput> + Send + 'static) -> Arc<Self> {
            Arc::new(Self {
                outcome: Mutex::new(Box::new(f)),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn ok(stdout: &str) -> Arc<Self> {
            let stdout = stdout.to_string();
            Self::new(move || {
                Ok(CliOutput {
                    success: true,
                    exit_code: Some(0),
                    stdout: stdout.clone(),
                    stderr: String::new(),
                })
            })
        }

        fn calls(&self) -> Vec<CliInvocation> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CliRunner for ScriptedRunner {
        async fn run(&self, invocation: &CliInvocation, _timeout: Duration) -> Result<CliOutput> {
            self.calls.lock().unwrap().push(invocation.clone());
            let mut outcome = self.outcome.lock().unwrap();
            (*outcome)()
        }
    }

    fn fast_config() -> GeminiConfig {
        GeminiConfig {
            rate_limit_delay: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_initialization_with_config() {
        let config = GeminiConfig {
            enabled: false,
            auto_consult: false,
            timeout: 30,
            model: "gemini-2.5-pro".to_string(),
            ..Default::default()
        };
        let integration = GeminiIntegration::new(config);

        assert!(!integration.enabled());
        assert!(!integration.auto_consult());
        assert_eq!(integration.config().timeout, 30);
        assert_eq!(integration.config().model, "gemini-2.5-pro");
    }

    #[test]
    fn test_initialization_with_defaults() {
        let integration = GeminiIntegration::new(GeminiConfig::default());
        assert!(integration.enabled());
        assert!(integration.auto_consult());
        assert_eq!(integration.config().timeout, 60);
        assert_eq!(integration.config().rate_limit_delay, 2.0);
        assert_eq!(integration.config().model, "gemini-2.5-flash");
        assert_eq!(integration.consultation_count(), 0);
    }

    #[tokio::test]
    async fn test_consult_disabled() {
        let runner = ScriptedRunner::ok("unused");
        let config = GeminiConfig {
            enabled: false,
            ..Default::default()
        };
        let integration = GeminiIntegration::with_runner(config, runner.clone());

        let result = integration.consult("test query", "", true, false).await;

        assert_eq!(result.status(), "disabled");
        match &result {
            ConsultationResult::Disabled { message } => assert!(message.contains("disabled")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(integration.consultation_count(), 0);
        assert!(integration.last_consultation().await.is_none());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_consult_success_records_history() {
        let runner = ScriptedRunner::ok("  Looks fine to me.\n");
        let integration = GeminiIntegration::with_runner(fast_config(), runner.clone());

        let result = integration.consult("Is this OK?", "ctx", true, false).await;

        match &result {
            ConsultationResult::Success {
                response,
                consultation_id,
                execution_time,
                ..
            } => {
                assert_eq!(response, "Looks fine to me.");
                assert!(consultation_id.starts_with("consult_"));
                assert!(*execution_time >= 0.0);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let history = integration.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].query, "Is this OK?");
        assert_eq!(history[0].status, "success");
        match &result {
            ConsultationResult::Success { consultation_id, .. } => {
                assert_eq!(&history[0].id, consultation_id);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "gemini");
        assert_eq!(&calls[0].args[..3], &["-m", "gemini-2.5-flash", "-p"]);
        assert!(calls[0].args[3].contains("Question/Topic:\nIs this OK?"));
        assert!(calls[0].args[3].contains("Context:\nctx"));
    }

    #[tokio::test]
    async fn test_consult_plain_mode_sends_query() {
        let runner = ScriptedRunner::ok("4");
        let integration = GeminiIntegration::with_runner(fast_config(), runner.clone());

        integration.consult("What is 2+2?", "", false, false).await;

        assert_eq!(runner.calls()[0].args[3], "Question/Topic:\nWhat is 2+2?");
    }

    #[tokio::test]
    async fn test_long_query_truncated_in_history() {
        let runner = ScriptedRunner::ok("ok");
        let integration = GeminiIntegration::with_runner(fast_config(), runner);

        let query = "q".repeat(250);
        integration.consult(&query, "", false, true).await;

        let record = &integration.history()[0];
        assert_eq!(record.query, format!("{}...", "q".repeat(200)));
    }

    #[tokio::test]
    async fn test_logging_disabled_skips_history() {
        let runner = ScriptedRunner::ok("ok");
        let config = GeminiConfig {
            log_consultations: false,
            ..fast_config()
        };
        let integration = GeminiIntegration::with_runner(config, runner);

        let result = integration.consult("q", "", true, false).await;
        assert!(result.is_success());
        assert_eq!(integration.consultation_count(), 0);
    }

    #[tokio::test]
    async fn test_authentication_failure_adds_hint() {
        let runner = ScriptedRunner::new(|| {
            Ok(CliOutput {
                success: false,
                exit_code: Some(1),
                stdout: String::new(),
                stderr: "Error: authentication required".to_string(),
            })
        });
        let integration = GeminiIntegration::with_runner(fast_config(), runner);

        let result = integration.consult("q", "", true, false).await;

        match result {
            ConsultationResult::Error {
                error,
                consultation_id,
            } => {
                assert!(error.contains("Gemini CLI failed"));
                assert!(error.contains("authentication required"));
                assert!(error.contains("Tip: Run 'gemini' interactively to authenticate"));
                assert!(consultation_id.is_some());
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(integration.consultation_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_without_stderr() {
        let runner = ScriptedRunner::new(|| {
            Ok(CliOutput {
                success: false,
                exit_code: Some(2),
                ..Default::default()
            })
        });
        let integration = GeminiIntegration::with_runner(fast_config(), runner);

        let result = integration.consult("q", "", true, false).await;
        match result {
            ConsultationResult::Error { error, .. } => {
                assert_eq!(error, "Gemini CLI failed: Unknown error");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_becomes_error_result() {
        let runner = ScriptedRunner::new(|| Err(GeminiError::Timeout(60)));
        let integration = GeminiIntegration::with_runner(fast_config(), runner);

        let result = integration.consult("q", "", true, false).await;

        assert_eq!(result.status(), "error");
        match result {
            ConsultationResult::Error { error, .. } => assert!(error.contains("60 seconds")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_still_usable_after_failure() {
        let mut calls = 0;
        let runner = ScriptedRunner::new(move || {
            calls += 1;
            if calls == 1 {
                Err(GeminiError::Timeout(1))
            } else {
                Ok(CliOutput {
                    success: true,
                    exit_code: Some(0),
                    stdout: "second".to_string(),
                    stderr: String::new(),
                })
            }
        });
        let integration = GeminiIntegration::with_runner(fast_config(), runner);

        assert_eq!(integration.consult("a", "", true, false).await.status(), "error");
        assert!(integration.consult("b", "", true, false).await.is_success());
        assert_eq!(integration.consultation_count(), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_delays_second_call() {
        let runner = ScriptedRunner::ok("ok");
        let config = GeminiConfig {
            rate_limit_delay: 0.3,
            ..Default::default()
        };
        let integration = GeminiIntegration::with_runner(config, runner);

        assert!(integration.consult("first", "", true, false).await.is_success());
        let first_stamp = integration.last_consultation().await.unwrap();

        let start = std::time::Instant::now();
        assert!(integration.consult("second", "", true, false).await.is_success());
        assert!(start.elapsed() >= Duration::from_millis(250));

        let second_stamp = integration.last_consultation().await.unwrap();
        assert!(second_stamp.duration_since(first_stamp) >= Duration::from_millis(290));
    }

    #[tokio::test]
    async fn test_forced_consult_skips_rate_limit() {
        let runner = ScriptedRunner::ok("ok");
        let config = GeminiConfig {
            rate_limit_delay: 30.0,
            ..Default::default()
        };
        let integration = GeminiIntegration::with_runner(config, runner);

        assert!(integration.consult("first", "", true, false).await.is_success());
        let stamp = integration.last_consultation().await;

        let start = std::time::Instant::now();
        assert!(integration.consult("second", "", true, true).await.is_success());
        assert!(start.elapsed() < Duration::from_secs(5));
        // Forced calls leave the rate-limit timestamp alone
        assert_eq!(integration.last_consultation().await, stamp);
        assert_eq!(integration.consultation_count(), 2);
    }

    #[tokio::test]
    async fn test_back_to_back_consultation_ids_are_distinct() {
        let runner = ScriptedRunner::ok("ok");
        let integration = GeminiIntegration::with_runner(fast_config(), runner);

        for i in 0..50 {
            integration.consult(&format!("q{}", i), "", false, true).await;
        }

        let ids: std::collections::HashSet<String> =
            integration.history().into_iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 50);
        assert!(ids.iter().all(|id| id.starts_with("consult_")));
    }

    #[test]
    fn test_consultation_ids_increase() {
        let integration = GeminiIntegration::new(GeminiConfig::default());
        let millis = |id: String| -> i64 { id["consult_".len()..].parse().unwrap() };
        let first = millis(integration.next_consultation_id());
        let second = millis(integration.next_consultation_id());
        assert!(second > first);
    }

    #[test]
    fn test_detect_uncertainty_ignores_flags() {
        let config = GeminiConfig {
            enabled: false,
            auto_consult: false,
            ..Default::default()
        };
        let integration = GeminiIntegration::new(config);
        assert!(integration.detect_uncertainty("I'm not sure").0);
        assert!(!integration.detect_uncertainty("This is correct").0);
    }

    #[test]
    fn test_auto_consult_triggers() {
        let integration = GeminiIntegration::new(GeminiConfig::default());
        assert!(!integration.auto_consult_triggers("maybe").is_empty());
        assert!(integration.auto_consult_triggers("This is correct").is_empty());

        integration.set_auto_consult(false);
        assert!(integration.auto_consult_triggers("maybe").is_empty());
    }

    #[test]
    fn test_toggle_auto_consult() {
        let integration = GeminiIntegration::new(GeminiConfig::default());
        assert!(!integration.toggle_auto_consult());
        assert!(!integration.auto_consult());
        assert!(integration.toggle_auto_consult());
        assert!(integration.auto_consult());
        integration.set_auto_consult(false);
        assert!(!integration.auto_consult());
    }

    #[tokio::test]
    async fn test_status_snapshot() {
        let runner = ScriptedRunner::ok("ok");
        let integration = GeminiIntegration::with_runner(fast_config(), runner);

        let status = integration.status();
        assert_eq!(status.total_consultations, 0);
        assert!(status.last_consultation.is_none());
        assert_eq!(status.cli_command, "gemini");

        integration.consult("q", "", true, false).await;
        let status = integration.status();
        assert_eq!(status.total_consultations, 1);
        assert_eq!(
            status.last_consultation,
            integration.history().last().map(|r| r.timestamp.clone())
        );
    }

    #[test]
    fn test_result_serialization() {
        let result = ConsultationResult::Error {
            error: "boom".to_string(),
            consultation_id: Some("consult_1".to_string()),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "boom");
        assert_eq!(json["consultation_id"], "consult_1");
    }
}
