// SPDX-License-Identifier: GPL-3.0-only

//! Chat bot notification for submitted date plans

use super::DateOrder;
use crate::config::NotifySettings;
use crate::constants::notify::REQUEST_TIMEOUT;
use crate::errors::NotifyError;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: String,
    parse_mode: &'static str,
}

/// Posts date plans to the bot API
#[derive(Debug, Clone)]
pub struct Notifier {
    client: reqwest::Client,
    settings: NotifySettings,
}

impl Notifier {
    pub fn new(settings: NotifySettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });
        Self { client, settings }
    }

    /// Whether a token and chat id are configured
    pub fn is_enabled(&self) -> bool {
        self.credentials().is_some()
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        let token = self.settings.bot_token.as_deref().filter(|t| !t.is_empty())?;
        let chat = self.settings.chat_id.as_deref().filter(|c| !c.is_empty())?;
        Some((token, chat))
    }

    fn endpoint(&self, token: &str) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.settings.api_base.trim_end_matches('/'),
            token
        )
    }

    /// Fire and forget: send in a detached task, logging the outcome
    pub fn notify(&self, order: DateOrder) -> JoinHandle<()> {
        let notifier = self.clone();
        tokio::spawn(async move {
            match notifier.send(&order).await {
                Ok(()) => info!("Date plan delivered"),
                Err(NotifyError::Disabled) => {
                    info!("Notifications not configured; date plan not sent")
                }
                Err(e) => warn!(error = %e, "Failed to deliver date plan"),
            }
        })
    }

    /// Send and wait for the endpoint's answer
    pub async fn send(&self, order: &DateOrder) -> Result<(), NotifyError> {
        let (token, chat_id) = self.credentials().ok_or(NotifyError::Disabled)?;

        let body = SendMessage {
            chat_id,
            text: order.message(),
            parse_mode: "Markdown",
        };

        debug!(food = %order.food, activity = %order.activity, "Posting date plan");

        let response = self
            .client
            .post(self.endpoint(token))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }
        Ok(())
    }
}
