//! Text rendering of the result slots. Pure: same state in, same screen out.

use std::fmt::Write as _;

use client_core::{LifecycleState, ResultStore};

const EMPTY: &str = "—";
const WAITING: &str = "Waiting…";

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

pub fn status_line(state: &LifecycleState) -> &'static str {
    match state {
        LifecycleState::Idle => "Ready",
        LifecycleState::Loading => "Hyper‑Generating…",
        LifecycleState::Succeeded => "Done",
        LifecycleState::Failed(_) => "Failed",
    }
}

pub fn render(prompt: &str, state: &LifecycleState, store: &ResultStore) -> String {
    let loading = state.is_loading();
    let result = store.last_result();

    let chat = if loading && result.is_none() {
        "Generating description…"
    } else {
        present(result.and_then(|r| r.chat_response.as_ref())).unwrap_or(EMPTY)
    };
    let image = present(result.and_then(|r| r.image_url.as_ref())).unwrap_or(WAITING);
    let video = present(result.and_then(|r| r.video_url.as_ref())).unwrap_or(WAITING);
    let audio = present(result.and_then(|r| r.audio_url.as_ref())).unwrap_or(WAITING);
    let concept = present(result.and_then(|r| r.image_to_video_concept.as_ref())).unwrap_or(
        if loading {
            "Composing motion blueprint…"
        } else {
            EMPTY
        },
    );

    let mut out = String::new();
    let _ = writeln!(out, "Prompt: {prompt}");
    let _ = writeln!(out, "Status: {}", status_line(state));
    if let Some(error) = store.last_error() {
        let _ = writeln!(out, "! {error}");
    }
    let _ = writeln!(out, "[Chat Response]\n{chat}");
    let _ = writeln!(out, "[High‑Res Image] {image}");
    let _ = writeln!(out, "[1‑Minute Video] {video}");
    let _ = writeln!(out, "[5‑Minute Ambient Audio] {audio}");
    let _ = write!(out, "[Image‑to‑Video Concept]\n{concept}");
    out
}
