//! User commands typed at the prompt, and their dispatch onto the controller.

use client_core::{RequestController, ShareAction, DEFAULT_PROMPT};
use tracing::debug;

pub const HELP_TEXT: &str = "\
Type a prompt and press Enter to hyper-generate.
  <Enter>   regenerate with the current prompt (also :retry)
  :share    share the current prompt
  :show     redraw the results
  :help     show this help
  :quit     exit";

pub const BUSY_NOTICE: &str = "Hyper-generating… wait for the current request to finish.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// `None` reuses the current prompt.
    Generate { prompt: Option<String> },
    Share,
    Show,
    Help,
    Quit,
    Unknown(String),
}

impl UserCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line {
            "" | ":retry" | ":r" => Self::Generate { prompt: None },
            ":share" | ":s" => Self::Share,
            ":show" => Self::Show,
            ":help" | ":h" | "?" => Self::Help,
            ":quit" | ":q" | ":exit" => Self::Quit,
            other if other.starts_with(':') => Self::Unknown(other.to_string()),
            other => Self::Generate {
                prompt: Some(other.to_string()),
            },
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Generate { .. } => "generate",
            Self::Share => "share",
            Self::Show => "show",
            Self::Help => "help",
            Self::Quit => "quit",
            Self::Unknown(_) => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Redraw,
    Notice(String),
    Quit,
}

/// Editable prompt plus the actions that act on it.
pub struct AppSession {
    prompt: String,
    controller: RequestController,
    share: Box<dyn ShareAction>,
    page_url: String,
}

impl AppSession {
    pub fn new(
        controller: RequestController,
        share: Box<dyn ShareAction>,
        page_url: impl Into<String>,
    ) -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            controller,
            share,
            page_url: page_url.into(),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn controller(&self) -> &RequestController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut RequestController {
        &mut self.controller
    }

    pub async fn dispatch(&mut self, cmd: UserCommand) -> Step {
        debug!(command = cmd.name(), "dispatching user command");
        match cmd {
            UserCommand::Generate { prompt } => {
                if let Some(prompt) = prompt {
                    self.prompt = prompt;
                }
                // Mirrors the disabled generate button; the controller itself
                // would accept the call.
                if self.controller.state().is_loading() {
                    return Step::Notice(BUSY_NOTICE.to_string());
                }
                self.controller.generate(self.prompt.clone());
                Step::Redraw
            }
            UserCommand::Share => {
                let outcome = self.share.share(&self.prompt, &self.page_url).await;
                match outcome.notice() {
                    Some(notice) => Step::Notice(notice.to_string()),
                    None => Step::Redraw,
                }
            }
            UserCommand::Show => Step::Redraw,
            UserCommand::Help => Step::Notice(HELP_TEXT.to_string()),
            UserCommand::Quit => Step::Quit,
            UserCommand::Unknown(raw) => {
                Step::Notice(format!("Unknown command '{raw}'. Type :help for commands."))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
