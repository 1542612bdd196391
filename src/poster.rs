/// Posting module
///
/// Posts a finished draft to X (Twitter) via the v2 create-tweet endpoint.
/// Success/failure from the API is passed through; there is no retry here
/// because the next scheduled run is the retry.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::generate::{PollDraft, TweetDraft};

const CREATE_TWEET_URL: &str = "https://api.twitter.com/2/tweets";

/// Polls run for 24 hours.
const POLL_DURATION_MINUTES: u32 = 1440;

#[derive(Debug, Serialize)]
struct CreateTweetRequest {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    poll: Option<PollPayload>,
}

#[derive(Debug, Serialize)]
struct PollPayload {
    options: Vec<String>,
    duration_minutes: u32,
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: Option<CreatedTweet>,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

pub struct TwitterClient {
    http_client: reqwest::Client,
    bearer_token: String,
}

impl TwitterClient {
    pub fn new(bearer_token: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            bearer_token,
        }
    }

    /// Post a draft. Returns the created tweet id.
    pub async fn post(&self, draft: &TweetDraft) -> Result<String> {
        let request = match draft {
            TweetDraft::Text(text) => CreateTweetRequest {
                text: text.clone(),
                poll: None,
            },
            TweetDraft::Poll(PollDraft { question, options }) => CreateTweetRequest {
                text: question.clone(),
                poll: Some(PollPayload {
                    options: options.clone(),
                    duration_minutes: POLL_DURATION_MINUTES,
                }),
            },
        };

        let response = self
            .http_client
            .post(CREATE_TWEET_URL)
            .header(
                "Authorization",
                format!("Bearer {}", self.bearer_token.trim()),
            )
            .json(&request)
            .send()
            .await
            .context("Failed to send create-tweet request to X API")?;

        let rate_limit_remaining = response
            .headers()
            .get("x-rate-limit-remaining")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<u32>().ok());

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let error_msg = match status.as_u16() {
                401 => format!(
                    "Unauthorized (401): Invalid or expired token. Check your credentials in \
                     the X Developer Portal (https://developer.x.com).\nAPI Response: {}",
                    text
                ),
                402 => format!(
                    "Payment Required (402): Your X account has no API credits. Add credits at \
                     https://developer.x.com (Billing / Products).\nAPI Response: {}",
                    text
                ),
                403 => format!(
                    "Forbidden (403): Your app doesn't have write permission for the v2 \
                     create-tweet endpoint.\nAPI Response: {}",
                    text
                ),
                429 => format!(
                    "Rate Limited (429): Too many requests for your API tier. The next \
                     scheduled run will try again.\nAPI Response: {}",
                    text
                ),
                _ => format!("X API error: {} - {}", status, text),
            };
            anyhow::bail!("{}", error_msg);
        }

        if let Some(remaining) = rate_limit_remaining {
            log::debug!("X API rate limit: {} requests remaining", remaining);
        }

        let response: CreateTweetResponse = response
            .json()
            .await
            .context("Failed to parse X API response")?;

        let tweet_id = response
            .data
            .map(|d| d.id)
            .context("X API reported success but returned no tweet id")?;

        match draft {
            TweetDraft::Poll(_) => log::info!("Tweet posted (poll), id {}", tweet_id),
            TweetDraft::Text(_) => log::info!("Tweet posted, id {}", tweet_id),
        }

        Ok(tweet_id)
    }
}
