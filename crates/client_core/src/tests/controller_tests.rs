use std::{sync::Arc, time::Duration};

use axum::http::StatusCode;
use shared::{domain::RequestSeq, error::ErrorCode, protocol::GenerationResult};

use crate::{
    backend::{GenerationBackend, HttpGenerationBackend},
    controller::{LifecycleState, RequestController},
    test_support::{chat, spawn_collaborator, Reply, ScriptedBackend},
    trigger::{LifecycleTrigger, DEFAULT_PROMPT},
};

fn controller_with(backend: &Arc<ScriptedBackend>) -> RequestController {
    let backend: Arc<dyn GenerationBackend> = backend.clone();
    RequestController::new(backend)
}

#[tokio::test]
async fn generate_enters_loading_synchronously_and_keeps_last_result() {
    let backend = Arc::new(
        ScriptedBackend::new(Reply::Ok(chat("first"))).reply(
            "broken",
            Duration::ZERO,
            Reply::Status(503),
        ),
    );
    let mut controller = controller_with(&backend);
    assert_eq!(controller.state(), &LifecycleState::Idle);

    controller.generate("first");
    assert!(controller.state().is_loading());
    controller.settle().await;

    controller.generate("broken");
    controller.settle().await;
    assert!(controller.store().last_error().is_some());

    controller.generate("again");
    assert!(controller.state().is_loading());
    assert!(controller.store().last_error().is_none());
    assert_eq!(controller.store().last_result(), Some(&chat("first")));

    assert_eq!(controller.settle().await, &LifecycleState::Succeeded);
}

#[tokio::test]
async fn every_start_state_leaves_loading_exactly_once() {
    let backend = Arc::new(
        ScriptedBackend::new(Reply::Ok(chat("ok"))).reply(
            "fail",
            Duration::ZERO,
            Reply::Malformed,
        ),
    );
    let mut controller = controller_with(&backend);

    let script = [
        ("", true),
        ("fail", false),
        ("x", true),
        ("", true),
        ("fail", false),
    ];
    for (prompt, succeeds) in script {
        controller.generate(prompt);
        assert!(controller.state().is_loading());

        let state = controller.settle().await.clone();
        match state {
            LifecycleState::Succeeded => assert!(succeeds, "prompt {prompt:?} should fail"),
            LifecycleState::Failed(reason) => {
                assert!(!succeeds, "prompt {prompt:?} should succeed");
                assert_eq!(reason.code, ErrorCode::Decode);
            }
            other => panic!("unexpected state after settle: {other:?}"),
        }
        assert_eq!(controller.poll_completions(), 0);
    }
    assert_eq!(backend.calls().len(), 5);
}

#[tokio::test]
async fn missing_fields_still_succeed() {
    let partial = GenerationResult {
        chat_response: Some("text only".into()),
        ..Default::default()
    };
    let backend = Arc::new(ScriptedBackend::new(Reply::Ok(partial.clone())));
    let mut controller = controller_with(&backend);

    controller.generate("p");
    assert_eq!(controller.settle().await, &LifecycleState::Succeeded);

    let stored = controller.store().last_result().expect("result");
    assert_eq!(stored, &partial);
    assert_eq!(stored.audio_url, None);
    assert!(controller.store().last_error().is_none());
}

#[tokio::test]
async fn failure_keeps_previous_result_and_reports_status() {
    let backend = Arc::new(
        ScriptedBackend::new(Reply::Ok(chat("good"))).reply(
            "bad",
            Duration::ZERO,
            Reply::Status(500),
        ),
    );
    let mut controller = controller_with(&backend);

    controller.generate("good");
    controller.settle().await;
    let before = controller.store().last_result().cloned();

    controller.generate("bad");
    let state = controller.settle().await.clone();

    let reason = state.failure().expect("failed state");
    assert_eq!(reason.message(), "Request failed: 500");
    assert_eq!(controller.store().last_result().cloned(), before);
    assert_eq!(controller.store().last_error(), Some(reason));
}

#[tokio::test]
async fn repeated_identical_success_is_idempotent() {
    let backend = Arc::new(ScriptedBackend::new(Reply::Ok(chat("same"))));
    let mut controller = controller_with(&backend);

    controller.generate("p");
    controller.settle().await;
    let after_one = controller.store().clone();

    controller.generate("p");
    controller.settle().await;

    assert_eq!(controller.store(), &after_one);
    assert_eq!(controller.state(), &LifecycleState::Succeeded);
}

#[tokio::test(start_paused = true)]
async fn stale_completion_is_discarded_after_newer_request_finishes() {
    let backend = Arc::new(
        ScriptedBackend::new(Reply::Status(500))
            .reply("slow", Duration::from_millis(50), Reply::Ok(chat("slow")))
            .reply("fast", Duration::from_millis(10), Reply::Ok(chat("fast"))),
    );
    let mut controller = controller_with(&backend);

    let first = controller.generate("slow");
    let second = controller.generate("fast");
    assert_eq!(first, RequestSeq(1));
    assert_eq!(second, RequestSeq(2));
    assert_eq!(controller.latest_seq(), second);

    assert_eq!(controller.settle().await, &LifecycleState::Succeeded);
    assert_eq!(controller.store().last_result(), Some(&chat("fast")));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(controller.poll_completions(), 0);
    assert_eq!(controller.store().last_result(), Some(&chat("fast")));
    assert_eq!(controller.state(), &LifecycleState::Succeeded);
}

#[tokio::test(start_paused = true)]
async fn early_completion_of_superseded_request_does_not_end_loading() {
    let backend = Arc::new(
        ScriptedBackend::new(Reply::Status(500))
            .reply("fast", Duration::from_millis(10), Reply::Ok(chat("fast")))
            .reply("slow", Duration::from_millis(50), Reply::Ok(chat("slow"))),
    );
    let mut controller = controller_with(&backend);

    controller.generate("fast");
    controller.generate("slow");

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(controller.poll_completions(), 0);
    assert!(controller.state().is_loading());
    assert!(controller.store().last_result().is_none());

    assert_eq!(controller.settle().await, &LifecycleState::Succeeded);
    assert_eq!(controller.store().last_result(), Some(&chat("slow")));
    assert_eq!(backend.calls(), vec!["fast".to_string(), "slow".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn slow_backend_times_out_with_distinct_reason() {
    let backend = Arc::new(ScriptedBackend::new(Reply::Ok(chat("late"))).reply(
        "hang",
        Duration::from_secs(600),
        Reply::Ok(chat("late")),
    ));
    let mut controller = controller_with(&backend).with_request_timeout(Duration::from_secs(5));

    controller.generate("hang");
    let state = controller.settle().await.clone();

    let reason = state.failure().expect("failed");
    assert_eq!(reason.code, ErrorCode::Timeout);
    assert_eq!(reason.message(), "Request timed out after 5s");
    assert!(controller.store().last_result().is_none());
}

#[tokio::test]
async fn startup_trigger_fires_once_with_default_prompt() {
    let backend = Arc::new(ScriptedBackend::new(Reply::Ok(chat("startup"))));
    let mut controller = controller_with(&backend);
    let mut trigger = LifecycleTrigger::new();

    assert_eq!(trigger.on_start(&mut controller), Some(RequestSeq(1)));
    controller.settle().await;
    assert_eq!(backend.calls(), vec![DEFAULT_PROMPT.to_string()]);
    assert!(trigger.has_fired());

    controller.generate("user prompt");
    controller.settle().await;
    assert_eq!(trigger.on_start(&mut controller), None);
    assert!(!controller.state().is_loading());
    assert_eq!(backend.calls().len(), 2);
}

#[tokio::test]
async fn default_prompt_success_then_empty_prompt_failure_over_http() {
    let (base_url, prompts) = spawn_collaborator(vec![
        (
            StatusCode::OK,
            r#"{ "chat_response": "A neon skyline glows...", "image_url": "https://x/img.png" }"#,
        ),
        (StatusCode::INTERNAL_SERVER_ERROR, "{}"),
    ])
    .await
    .expect("spawn collaborator");
    let backend = HttpGenerationBackend::new(&base_url).expect("backend");
    let mut controller = RequestController::new(Arc::new(backend));
    let mut trigger = LifecycleTrigger::new();

    trigger.on_start(&mut controller);
    assert_eq!(controller.settle().await, &LifecycleState::Succeeded);
    let first = controller.store().last_result().cloned().expect("result");
    assert_eq!(
        first.chat_response.as_deref(),
        Some("A neon skyline glows...")
    );
    assert_eq!(first.image_url.as_deref(), Some("https://x/img.png"));
    assert_eq!(first.video_url, None);

    controller.generate("");
    let state = controller.settle().await.clone();
    assert_eq!(
        state.failure().map(|reason| reason.message()),
        Some("Request failed: 500")
    );
    assert_eq!(controller.store().last_result(), Some(&first));
    assert_eq!(
        *prompts.lock().await,
        vec![DEFAULT_PROMPT.to_string(), String::new()]
    );
}
