//! Process model response use case
//!
//! Calls the provider selected by a request, retries transient failures
//! with exponential backoff, and writes one audit entry per attempt.

use crate::ports::clock::Clock;
use crate::ports::model_log::ModelLogSink;
use crate::ports::provider_adapter::ProviderAdapter;
use crate::use_cases::shared::generate_document_id;
use delib_domain::{
    ApiType, ModelCallContext, ModelCallRequest, ModelLogEntry, ModelResponse, RetryPolicy,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Input for the ProcessModelResponse use case
#[derive(Debug, Clone)]
pub struct ProcessModelResponseInput {
    pub context: ModelCallContext,
    pub request: ModelCallRequest,
    /// Retries after the first attempt
    pub max_retries: u32,
}

impl ProcessModelResponseInput {
    pub fn new(context: ModelCallContext, request: ModelCallRequest) -> Self {
        Self {
            context,
            request,
            max_retries: 0,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Use case for getting a model response on behalf of an agent
///
/// Holds no per-call state: one instance serves any number of concurrent
/// calls, and a retry sleep only suspends the call that is waiting.
pub struct AgentResponseOrchestrator {
    providers: Vec<Arc<dyn ProviderAdapter>>,
    audit_log: Arc<dyn ModelLogSink>,
    clock: Arc<dyn Clock>,
    retry_policy: RetryPolicy,
}

impl AgentResponseOrchestrator {
    pub fn new(
        providers: Vec<Arc<dyn ProviderAdapter>>,
        audit_log: Arc<dyn ModelLogSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            providers,
            audit_log,
            clock,
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Find the adapter registered for `api_type`.
    fn resolve_provider(&self, api_type: &ApiType) -> Option<&Arc<dyn ProviderAdapter>> {
        if !api_type.is_supported() {
            return None;
        }
        self.providers.iter().find(|p| &p.api_type() == api_type)
    }

    /// Run the attempt loop.
    ///
    /// The last attempt's response is returned as-is, including non-OK
    /// statuses; callers branch on `status`.
    pub async fn execute(&self, input: ProcessModelResponseInput) -> ModelResponse {
        let api_type = input.request.api_type();
        let Some(provider) = self.resolve_provider(api_type) else {
            warn!(
                api_type = %api_type,
                experiment_id = %input.context.experiment_id,
                "No provider adapter for api type"
            );
            return ModelResponse::config_error(format!("Error: invalid apiKey type {api_type}"));
        };

        let prompt_text = input.request.prompt.render();
        let started = Instant::now();
        info!(
            model = %input.request.model_name(),
            api_type = %api_type,
            max_retries = input.max_retries,
            "Requesting model response"
        );

        let mut attempt = 0;
        loop {
            let response = self
                .run_attempt(provider.as_ref(), &input, &prompt_text, attempt)
                .await;

            if !self
                .retry_policy
                .should_retry(response.status, attempt, input.max_retries)
            {
                info!(
                    status = %response.status,
                    attempts = attempt + 1,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Model response finished"
                );
                return response;
            }

            let delay = self.retry_policy.delay(attempt);
            warn!(
                status = %response.status,
                attempt = attempt + 1,
                max_retries = input.max_retries,
                delay_ms = delay.as_millis() as u64,
                "Provider error, retrying"
            );
            self.clock.sleep(delay).await;
            attempt += 1;
        }
    }

    /// One provider call plus its audit entry.
    async fn run_attempt(
        &self,
        provider: &dyn ProviderAdapter,
        input: &ProcessModelResponseInput,
        prompt_text: &str,
        attempt: u32,
    ) -> ModelResponse {
        let mut entry = ModelLogEntry::for_attempt(
            generate_document_id(),
            &input.context,
            attempt,
            prompt_text,
            self.clock.now(),
        );

        let query_timestamp = self.clock.now();
        let call_started = Instant::now();
        let response = match provider.send(&input.request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(attempt, error = %e, "Provider adapter failed");
                ModelResponse::unknown_error(e.to_string())
            }
        };
        let response_timestamp = self.clock.now();

        debug!(
            attempt,
            status = %response.status,
            elapsed_ms = call_started.elapsed().as_millis() as u64,
            "Provider call completed"
        );
        if let Some(message) = &response.error_message {
            debug!(attempt, error = %message, "Provider returned error");
        }

        entry.record_response(response.clone(), query_timestamp, response_timestamp);
        if let Err(e) = self
            .audit_log
            .append(&input.context.experiment_id, &entry)
            .await
        {
            warn!(log_id = %entry.id, error = %e, "Failed to write model log entry");
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::model_log::ModelLogError;
    use crate::ports::provider_adapter::AdapterError;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
    use delib_domain::{AgentModelSettings, ModelResponseStatus, PromptMessage};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    // ==================== Test Mocks ====================

    struct ScriptedAdapter {
        api_type: ApiType,
        script: Mutex<VecDeque<Result<ModelResponse, AdapterError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedAdapter {
        fn new(api_type: ApiType, script: Vec<Result<ModelResponse, AdapterError>>) -> Self {
            Self {
                api_type,
                script: Mutex::new(VecDeque::from(script)),
                calls: AtomicUsize::new(0),
            }
        }

        fn always(api_type: ApiType, response: ModelResponse, times: usize) -> Self {
            Self::new(api_type, (0..times).map(|_| Ok(response.clone())).collect())
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProviderAdapter for ScriptedAdapter {
        fn api_type(&self) -> ApiType {
            self.api_type.clone()
        }

        async fn send(&self, _request: &ModelCallRequest) -> Result<ModelResponse, AdapterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AdapterError::Other("script exhausted".to_string())))
        }
    }

    #[derive(Default)]
    struct RecordingLog {
        entries: Mutex<Vec<(String, ModelLogEntry)>>,
    }

    impl RecordingLog {
        fn entries(&self) -> Vec<ModelLogEntry> {
            self.entries.lock().unwrap().iter().map(|(_, e)| e.clone()).collect()
        }
    }

    #[async_trait]
    impl ModelLogSink for RecordingLog {
        async fn append(&self, experiment_id: &str, entry: &ModelLogEntry) -> Result<(), ModelLogError> {
            self.entries
                .lock()
                .unwrap()
                .push((experiment_id.to_string(), entry.clone()));
            Ok(())
        }
    }

    struct FailingLog;

    #[async_trait]
    impl ModelLogSink for FailingLog {
        async fn append(&self, _experiment_id: &str, _entry: &ModelLogEntry) -> Result<(), ModelLogError> {
            Err(ModelLogError::Store("disk full".to_string()))
        }
    }

    /// Advances one second per `now()` call and records sleeps instead of waiting.
    struct FakeClock {
        start: DateTime<Utc>,
        ticks: AtomicUsize,
        sleeps: Mutex<Vec<Duration>>,
    }

    impl FakeClock {
        fn new() -> Self {
            Self {
                start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                ticks: AtomicUsize::new(0),
                sleeps: Mutex::new(Vec::new()),
            }
        }

        fn sleeps(&self) -> Vec<Duration> {
            self.sleeps.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Clock for FakeClock {
        fn now(&self) -> DateTime<Utc> {
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst) as i64;
            self.start + ChronoDuration::seconds(tick)
        }

        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }

    // ==================== Helpers ====================

    fn context() -> ModelCallContext {
        ModelCallContext::new("exp-1", "mediator reply")
            .with_cohort("cohort-1")
            .with_participant("private-1", "public-1")
            .with_stage("stage-1")
    }

    fn request(api_type: ApiType) -> ModelCallRequest {
        ModelCallRequest::new(
            AgentModelSettings::new(api_type, "test-model"),
            vec![
                PromptMessage::system("Be brief."),
                PromptMessage::user("Hello").with_name("Ann"),
            ],
        )
    }

    fn orchestrator(
        adapter: Arc<ScriptedAdapter>,
        log: Arc<dyn ModelLogSink>,
        clock: Arc<FakeClock>,
    ) -> AgentResponseOrchestrator {
        AgentResponseOrchestrator::new(vec![adapter as Arc<dyn ProviderAdapter>], log, clock)
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_always_unavailable_writes_one_entry_per_attempt() {
        let adapter = Arc::new(ScriptedAdapter::always(
            ApiType::Gemini,
            ModelResponse::provider_unavailable("503"),
            10,
        ));
        let log = Arc::new(RecordingLog::default());
        let clock = Arc::new(FakeClock::new());
        let uc = orchestrator(adapter.clone(), log.clone(), clock.clone());

        let input = ProcessModelResponseInput::new(context(), request(ApiType::Gemini))
            .with_max_retries(3);
        let response = uc.execute(input).await;

        assert_eq!(response.status, ModelResponseStatus::ProviderUnavailableError);
        assert_eq!(adapter.calls(), 4);
        assert_eq!(log.entries().len(), 4);
        assert_eq!(
            clock.sleeps(),
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(4000),
            ]
        );
    }

    #[tokio::test]
    async fn test_stops_after_first_ok() {
        let adapter = Arc::new(ScriptedAdapter::new(
            ApiType::OpenAi,
            vec![
                Ok(ModelResponse::internal_error("bad json")),
                Ok(ModelResponse::ok("hi there")),
                Ok(ModelResponse::ok("never used")),
            ],
        ));
        let log = Arc::new(RecordingLog::default());
        let clock = Arc::new(FakeClock::new());
        let uc = orchestrator(adapter.clone(), log.clone(), clock.clone());

        let input = ProcessModelResponseInput::new(context(), request(ApiType::OpenAi))
            .with_max_retries(2);
        let response = uc.execute(input).await;

        assert!(response.is_ok());
        assert_eq!(response.text.as_deref(), Some("hi there"));
        assert_eq!(adapter.calls(), 2);

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "mediator reply");
        assert_eq!(entries[1].description, "mediator reply (retry 1)");
        assert_eq!(entries[0].response.status, ModelResponseStatus::InternalError);
        assert_eq!(clock.sleeps(), vec![Duration::from_millis(1000)]);
    }

    #[tokio::test]
    async fn test_config_error_never_retried() {
        let adapter = Arc::new(ScriptedAdapter::always(
            ApiType::Ollama,
            ModelResponse::config_error("missing url"),
            10,
        ));
        let log = Arc::new(RecordingLog::default());
        let clock = Arc::new(FakeClock::new());
        let uc = orchestrator(adapter.clone(), log.clone(), clock.clone());

        let input = ProcessModelResponseInput::new(context(), request(ApiType::Ollama))
            .with_max_retries(5);
        let response = uc.execute(input).await;

        assert_eq!(response.status, ModelResponseStatus::ConfigError);
        assert_eq!(adapter.calls(), 1);
        assert_eq!(log.entries().len(), 1);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_adapter_error_becomes_unknown_error_and_is_retried() {
        let adapter = Arc::new(ScriptedAdapter::new(
            ApiType::Gemini,
            vec![
                Err(AdapterError::RequestFailed("socket closed".to_string())),
                Ok(ModelResponse::ok("recovered")),
            ],
        ));
        let log = Arc::new(RecordingLog::default());
        let clock = Arc::new(FakeClock::new());
        let uc = orchestrator(adapter.clone(), log.clone(), clock.clone());

        let input = ProcessModelResponseInput::new(context(), request(ApiType::Gemini))
            .with_max_retries(1);
        let response = uc.execute(input).await;

        assert!(response.is_ok());
        let entries = log.entries();
        assert_eq!(entries[0].response.status, ModelResponseStatus::UnknownError);
        assert!(
            entries[0]
                .response
                .error_message
                .as_deref()
                .unwrap()
                .contains("socket closed")
        );
    }

    #[tokio::test]
    async fn test_no_retries_by_default() {
        let adapter = Arc::new(ScriptedAdapter::always(
            ApiType::Gemini,
            ModelResponse::unknown_error("boom"),
            3,
        ));
        let log = Arc::new(RecordingLog::default());
        let clock = Arc::new(FakeClock::new());
        let uc = orchestrator(adapter.clone(), log.clone(), clock.clone());

        let response = uc
            .execute(ProcessModelResponseInput::new(context(), request(ApiType::Gemini)))
            .await;

        assert_eq!(response.status, ModelResponseStatus::UnknownError);
        assert_eq!(adapter.calls(), 1);
        assert_eq!(log.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_provider_short_circuits() {
        let adapter = Arc::new(ScriptedAdapter::always(
            ApiType::Gemini,
            ModelResponse::ok("unused"),
            1,
        ));
        let log = Arc::new(RecordingLog::default());
        let clock = Arc::new(FakeClock::new());
        let uc = orchestrator(adapter.clone(), log.clone(), clock.clone());

        let input = ProcessModelResponseInput::new(
            context(),
            request(ApiType::Other("CLAUDE".to_string())),
        )
        .with_max_retries(3);
        let response = uc.execute(input).await;

        assert_eq!(response.status, ModelResponseStatus::ConfigError);
        assert_eq!(adapter.calls(), 0);
        assert!(log.entries().is_empty());
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_unregistered_provider_short_circuits() {
        let adapter = Arc::new(ScriptedAdapter::always(
            ApiType::Gemini,
            ModelResponse::ok("unused"),
            1,
        ));
        let log = Arc::new(RecordingLog::default());
        let uc = orchestrator(adapter.clone(), log.clone(), Arc::new(FakeClock::new()));

        let response = uc
            .execute(ProcessModelResponseInput::new(context(), request(ApiType::Ollama)))
            .await;

        assert_eq!(response.status, ModelResponseStatus::ConfigError);
        assert_eq!(adapter.calls(), 0);
    }

    #[tokio::test]
    async fn test_audit_failure_does_not_abort() {
        let adapter = Arc::new(ScriptedAdapter::always(
            ApiType::Gemini,
            ModelResponse::ok("fine"),
            1,
        ));
        let uc = orchestrator(adapter, Arc::new(FailingLog), Arc::new(FakeClock::new()));

        let response = uc
            .execute(ProcessModelResponseInput::new(context(), request(ApiType::Gemini)))
            .await;

        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn test_entry_carries_context_prompt_and_timestamps() {
        let adapter = Arc::new(ScriptedAdapter::always(
            ApiType::Gemini,
            ModelResponse::ok("fine"),
            1,
        ));
        let log = Arc::new(RecordingLog::default());
        let uc = orchestrator(adapter, log.clone(), Arc::new(FakeClock::new()));

        uc.execute(ProcessModelResponseInput::new(context(), request(ApiType::Gemini)))
            .await;

        let recorded = log.entries.lock().unwrap().clone();
        let (experiment_id, entry) = &recorded[0];
        assert_eq!(experiment_id, "exp-1");
        assert_eq!(entry.cohort_id, "cohort-1");
        assert_eq!(entry.private_id, "private-1");
        assert_eq!(entry.public_id, "public-1");
        assert_eq!(entry.stage_id, "stage-1");
        assert_eq!(entry.prompt, "SYSTEM: Be brief.\nUSER(Ann): Hello");
        assert_eq!(entry.id.len(), 20);

        let query = entry.query_timestamp.unwrap();
        let response = entry.response_timestamp.unwrap();
        assert!(entry.created_timestamp < query);
        assert!(query < response);
    }
}
