// Shared stubs and helpers for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;

use scholar::agent::QueryAgent;
use scholar::config::AgentConfig;
use scholar::llm::{CompletionRequest, CompletionResult, CompletionService};

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub const TEST_API_KEY: &str = "sk-test-key";
pub const TEST_MODEL: &str = "openai/gpt-3.5-turbo";

/// Replies with the user prompt it received and records every request.
#[derive(Default)]
pub struct EchoService {
    requests: Mutex<Vec<CompletionRequest>>,
}

impl EchoService {
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> CompletionRequest {
        self.requests()
            .pop()
            .expect("service should have received a request")
    }
}

#[async_trait]
impl CompletionService for EchoService {
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult {
        self.requests.lock().unwrap().push(request.clone());
        CompletionResult::success(request.user_prompt.clone())
    }
}

/// Always returns the same result.
pub struct FixedService(pub CompletionResult);

#[async_trait]
impl CompletionService for FixedService {
    async fn complete(&self, _request: &CompletionRequest) -> CompletionResult {
        self.0.clone()
    }
}

pub fn agent_with(service: Arc<dyn CompletionService>) -> QueryAgent {
    init_test_logger();
    QueryAgent::new(AgentConfig::new(TEST_MODEL), TEST_API_KEY, service)
        .expect("agent should be created")
}

pub fn echo_agent() -> (QueryAgent, Arc<EchoService>) {
    let service = Arc::new(EchoService::default());
    (agent_with(service.clone()), service)
}
