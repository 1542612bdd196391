/// Gemini client module
///
/// Sends the fully-built prompt to the Google Gemini generateContent
/// endpoint and turns the raw model output into a post-ready draft:
/// plain text (truncated to the 280-char tweet limit) or a poll parsed
/// from the strict line format the poll prompt asks for.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::rotation::ContentType;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const TWEET_MAX_CHARS: usize = 280;
const POLL_OPTION_MAX_CHARS: usize = 25;
const MAX_ATTEMPTS: u32 = 3;
const RATE_LIMIT_WAIT: Duration = Duration::from_secs(20);

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<Part>>,
}

/// A poll ready to hand to the posting client: question plus 2-4 options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollDraft {
    pub question: String,
    pub options: Vec<String>,
}

/// What one generation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TweetDraft {
    Text(String),
    Poll(PollDraft),
}

pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    /// Generate a tweet draft for this prompt.
    ///
    /// Retries up to 3 times on 429 with a flat 20s wait; anything else
    /// surfaces immediately. The next scheduled run is the real retry.
    pub async fn generate(&self, content_type: ContentType, prompt: &str) -> Result<TweetDraft> {
        let raw = self.generate_text(prompt).await?;
        let raw = strip_wrapping_quotes(raw.trim()).to_string();

        match content_type {
            ContentType::Poll => Ok(TweetDraft::Poll(parse_poll(&raw)?)),
            _ => Ok(TweetDraft::Text(truncate_tweet(&raw))),
        }
    }

    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/{}:generateContent", GEMINI_API_BASE, self.model);
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let mut attempt = 0;
        let response = loop {
            attempt += 1;
            let response = self
                .http_client
                .post(&url)
                .header("x-goog-api-key", self.api_key.trim())
                .json(&request)
                .send()
                .await
                .context("Failed to send request to Gemini API")?;

            let status = response.status();
            if status.as_u16() == 429 && attempt < MAX_ATTEMPTS {
                log::warn!(
                    "Gemini rate limited (429). Waiting {}s before retry {}/{}",
                    RATE_LIMIT_WAIT.as_secs(),
                    attempt + 1,
                    MAX_ATTEMPTS
                );
                tokio::time::sleep(RATE_LIMIT_WAIT).await;
                continue;
            }
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                anyhow::bail!("Gemini API error (status {}): {}", status, text);
            }
            break response;
        };

        let response_text = response
            .text()
            .await
            .context("Failed to read Gemini response body")?;

        let response: GenerateContentResponse = serde_json::from_str(&response_text)
            .with_context(|| {
                format!(
                    "Failed to parse Gemini response. Response was: {}",
                    response_text
                )
            })?;

        response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|parts| parts.into_iter().next())
            .map(|p| p.text)
            .context("Gemini returned no text")
    }
}

/// Remove one pair of quotes the model sometimes wraps its output in.
fn strip_wrapping_quotes(s: &str) -> &str {
    let s = s
        .strip_prefix('"')
        .or_else(|| s.strip_prefix('\''))
        .unwrap_or(s);
    s.strip_suffix('"')
        .or_else(|| s.strip_suffix('\''))
        .unwrap_or(s)
}

/// Truncate plain tweet text to the 280-char limit, ellipsis at 277.
fn truncate_tweet(text: &str) -> String {
    if text.chars().count() <= TWEET_MAX_CHARS {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(TWEET_MAX_CHARS - 3).collect();
    truncated.push_str("...");
    truncated
}

/// Parse the strict poll format: line 1 = question, lines 2-5 = options.
///
/// Blank lines are dropped, the question is capped at 280 chars, each
/// option at 25, and at most 4 options are kept. Fewer than 2 options is
/// a failed generation.
pub fn parse_poll(raw: &str) -> Result<PollDraft> {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.len() < 3 {
        anyhow::bail!("Poll needs question + at least 2 options (one per line)");
    }

    let question: String = lines[0].chars().take(TWEET_MAX_CHARS).collect();
    let options: Vec<String> = lines[1..]
        .iter()
        .take(4)
        .map(|l| l.chars().take(POLL_OPTION_MAX_CHARS).collect())
        .collect();

    if options.len() < 2 {
        anyhow::bail!("Poll needs at least 2 options");
    }

    Ok(PollDraft { question, options })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_question_and_options() {
        let poll =
            parse_poll("Best on-call tool?\nPagerDuty\nOpsgenie\nSlack").unwrap();
        assert_eq!(poll.question, "Best on-call tool?");
        assert_eq!(poll.options, vec!["PagerDuty", "Opsgenie", "Slack"]);
    }

    #[test]
    fn drops_blank_lines_and_caps_at_four_options() {
        let poll = parse_poll("Question?\n\nA\nB\n\nC\nD\nE").unwrap();
        assert_eq!(poll.question, "Question?");
        assert_eq!(poll.options, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn rejects_too_few_options() {
        assert!(parse_poll("Question?\nOnly one").is_err());
        assert!(parse_poll("Question only").is_err());
        assert!(parse_poll("").is_err());
    }

    #[test]
    fn caps_question_length() {
        let long_question = "q".repeat(320);
        let poll = parse_poll(&format!("{}\nYes\nNo", long_question)).unwrap();
        assert_eq!(poll.question.chars().count(), 280);
        assert_eq!(poll.options, vec!["Yes", "No"]);
    }

    #[test]
    fn caps_option_length() {
        let long = "a".repeat(40);
        let poll = parse_poll(&format!("Q?\n{}\nshort", long)).unwrap();
        assert_eq!(poll.options[0].chars().count(), 25);
        assert_eq!(poll.options[1], "short");
    }

    #[test]
    fn truncates_long_tweets_with_ellipsis() {
        let long = "x".repeat(300);
        let out = truncate_tweet(&long);
        assert_eq!(out.chars().count(), 280);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn short_tweets_pass_through() {
        assert_eq!(truncate_tweet("hello"), "hello");
    }

    #[test]
    fn strips_one_pair_of_wrapping_quotes() {
        assert_eq!(strip_wrapping_quotes("\"quoted\""), "quoted");
        assert_eq!(strip_wrapping_quotes("'quoted'"), "quoted");
        assert_eq!(strip_wrapping_quotes("plain"), "plain");
        assert_eq!(strip_wrapping_quotes("\"mixed'"), "mixed");
        assert_eq!(strip_wrapping_quotes("has \"inner\" quotes"), "has \"inner\" quotes");
    }
}
