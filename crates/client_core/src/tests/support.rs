use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex as StdMutex},
    time::Duration,
};

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use shared::protocol::{GenerationRequest, GenerationResult, HYPER_GENERATE_PATH};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{backend::GenerationBackend, error::GenerationError};

#[derive(Debug, Clone)]
pub enum Reply {
    Ok(GenerationResult),
    Status(u16),
    Malformed,
}

/// In-memory backend answering per prompt after a per-prompt delay.
pub struct ScriptedBackend {
    replies: HashMap<String, (Duration, Reply)>,
    fallback: Reply,
    calls: StdMutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(fallback: Reply) -> Self {
        Self {
            replies: HashMap::new(),
            fallback,
            calls: StdMutex::new(Vec::new()),
        }
    }

    pub fn reply(mut self, prompt: &str, delay: Duration, reply: Reply) -> Self {
        self.replies.insert(prompt.to_string(), (delay, reply));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn hyper_generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(request.prompt.clone());

        let (delay, reply) = self
            .replies
            .get(&request.prompt)
            .cloned()
            .unwrap_or((Duration::ZERO, self.fallback.clone()));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Reply::Ok(result) => Ok(result),
            Reply::Status(status) => Err(GenerationError::Status { status }),
            Reply::Malformed => Err(GenerationError::Decode(
                serde_json::from_str::<serde_json::Value>("not json").expect_err("malformed"),
            )),
        }
    }
}

pub fn chat(text: &str) -> GenerationResult {
    GenerationResult {
        chat_response: Some(text.to_string()),
        ..Default::default()
    }
}

#[derive(Clone)]
struct CollaboratorState {
    replies: Arc<Mutex<VecDeque<(StatusCode, String)>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

async fn handle_hyper_generate(
    State(state): State<CollaboratorState>,
    Json(payload): Json<GenerationRequest>,
) -> (StatusCode, String) {
    state.prompts.lock().await.push(payload.prompt);
    state
        .replies
        .lock()
        .await
        .pop_front()
        .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, "no scripted reply".into()))
}

/// Serves scripted `(status, body)` replies in order on a loopback port.
pub async fn spawn_collaborator(
    replies: Vec<(StatusCode, &str)>,
) -> anyhow::Result<(String, Arc<Mutex<Vec<String>>>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let state = CollaboratorState {
        replies: Arc::new(Mutex::new(
            replies
                .into_iter()
                .map(|(status, body)| (status, body.to_string()))
                .collect(),
        )),
        prompts: Arc::clone(&prompts),
    };
    let app = Router::new()
        .route(HYPER_GENERATE_PATH, post(handle_hyper_generate))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), prompts))
}
