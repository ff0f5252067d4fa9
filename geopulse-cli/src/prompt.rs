//! Terminal location permission prompt.
//!
//! Uses dialoguer prompts for a friendly terminal experience. The terminal
//! screen takes over the terminal, so `geopulse run` asks once up front and
//! replays the answer; one-shot commands ask when the acquisition gets there.

use console::style;
use dialoguer::{theme::ColorfulTheme, Select};

use geopulse::config::PermissionMode;
use geopulse::location::{
    PermissionPrompt, PermissionRequest, PermissionResponse, StoredDecision,
};

/// Asks on the terminal with a three-way selection.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialoguerPrompt;

impl DialoguerPrompt {
    /// Ask right now, blocking the calling thread.
    ///
    /// Without an interactive terminal the answer is "Ask Me Later".
    pub fn ask_blocking(request: &PermissionRequest) -> PermissionResponse {
        if !atty::is(atty::Stream::Stdin) {
            tracing::warn!("No terminal to ask for location permission");
            eprintln!(
                "{} No terminal to ask for location permission. Set it with: geopulse config set location.permission granted",
                style("!").yellow()
            );
            return PermissionResponse::AskLater;
        }

        println!();
        println!("{}", style(&request.title).bold().underlined());
        println!("{}", request.message);
        println!();

        let labels: Vec<&str> = request.options.iter().map(|o| o.label()).collect();
        let default = labels.len().saturating_sub(1);

        match Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Allow location access?")
            .items(&labels)
            .default(default)
            .interact()
        {
            Ok(index) => request
                .options
                .get(index)
                .copied()
                .unwrap_or(PermissionResponse::AskLater),
            Err(e) => {
                tracing::warn!(error = %e, "Permission prompt failed");
                PermissionResponse::AskLater
            }
        }
    }
}

impl PermissionPrompt for DialoguerPrompt {
    async fn request(&self, request: &PermissionRequest) -> PermissionResponse {
        let request = request.clone();
        match tokio::task::spawn_blocking(move || Self::ask_blocking(&request)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Permission prompt task failed");
                PermissionResponse::AskLater
            }
        }
    }
}

/// Permission source chosen from `location.permission`.
#[derive(Debug, Clone, Copy)]
pub enum CliPermission {
    /// Configured as granted; never asks.
    Granted,
    /// Ask on the terminal at request time.
    Interactive(DialoguerPrompt),
    /// Replay an answer collected earlier.
    Stored(StoredDecision),
}

impl CliPermission {
    /// Prompt at request time unless permission is configured as granted.
    pub fn interactive(mode: PermissionMode) -> Self {
        match mode {
            PermissionMode::Granted => Self::Granted,
            PermissionMode::Prompt => Self::Interactive(DialoguerPrompt),
        }
    }

    /// Ask now (if needed) and replay the answer on every later request.
    pub fn ask_upfront(mode: PermissionMode) -> Self {
        match mode {
            PermissionMode::Granted => Self::Granted,
            PermissionMode::Prompt => {
                let answer = DialoguerPrompt::ask_blocking(&PermissionRequest::location());
                tracing::info!(answer = answer.label(), "Location permission answered");
                Self::Stored(StoredDecision(answer))
            }
        }
    }
}

impl PermissionPrompt for CliPermission {
    async fn request(&self, request: &PermissionRequest) -> PermissionResponse {
        match self {
            Self::Granted => PermissionResponse::Allow,
            Self::Interactive(prompt) => prompt.request(request).await,
            Self::Stored(decision) => decision.request(request).await,
        }
    }
}
