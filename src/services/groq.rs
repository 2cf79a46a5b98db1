// src/services/groq.rs
use std::fmt;
use std::time::Duration;

use log::{info, warn};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::time::sleep;

use crate::models::{GoalInput, MarketAnalysis};

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const EXPECTED_MARKETS: usize = 5;
const RETRY_BACKOFF_MS: u64 = 250;

/// Upstream failures split along the retry boundary: `Unavailable` is a
/// transport/service problem and safe to retry, `Format` means the service
/// answered with something we cannot decode and retrying the same request
/// will not help.
#[derive(Debug)]
pub enum GroqError {
    Unavailable(String),
    Format(String),
}

impl fmt::Display for GroqError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GroqError::Unavailable(msg) => write!(f, "text generation upstream unavailable: {}", msg),
            GroqError::Format(msg) => write!(f, "text generation upstream returned unparseable content: {}", msg),
        }
    }
}

impl std::error::Error for GroqError {}

pub struct GroqClient {
    client: Client,
    api_key: String,
    model: String,
    max_retries: u32,
}

impl GroqClient {
    pub fn new(api_key: String, model: String, timeout: Duration, max_retries: u32) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            model,
            max_retries,
        }
    }

    /// Ask the model for 5 ranked African markets matching the investor's
    /// goal. All-or-nothing: either the full list decodes or the call fails.
    pub async fn market_analysis(
        &self,
        goal: &GoalInput,
        required_return: f64,
    ) -> Result<Vec<MarketAnalysis>, GroqError> {
        let payload = json!({
            "model": self.model,
            "temperature": 0.7,
            "max_tokens": 4000,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(goal, required_return) },
            ],
        });

        let mut attempt = 0u32;
        let content = loop {
            let send_result = self
                .client
                .post(GROQ_API_URL)
                .bearer_auth(&self.api_key)
                .json(&payload)
                .send()
                .await;

            match send_result {
                Ok(response) => {
                    let status = response.status();
                    if status.as_u16() == 429 || status.is_server_error() {
                        if attempt < self.max_retries {
                            attempt += 1;
                            warn!("Groq returned status {}, retrying (attempt {})", status, attempt);
                            sleep(Duration::from_millis(RETRY_BACKOFF_MS * u64::from(attempt))).await;
                            continue;
                        }
                        return Err(GroqError::Unavailable(format!("status {}", status)));
                    }
                    if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(GroqError::Unavailable(format!("status {}: {}", status, body)));
                    }

                    let body: ChatCompletionResponse = response
                        .json()
                        .await
                        .map_err(|e| GroqError::Format(format!("invalid completion body: {}", e)))?;

                    break body
                        .choices
                        .into_iter()
                        .next()
                        .and_then(|c| c.message.content)
                        .ok_or_else(|| GroqError::Format("empty completion".to_string()))?;
                }
                Err(e) if (e.is_timeout() || e.is_connect()) && attempt < self.max_retries => {
                    attempt += 1;
                    warn!("Groq request failed ({}), retrying (attempt {})", e, attempt);
                    sleep(Duration::from_millis(RETRY_BACKOFF_MS * u64::from(attempt))).await;
                }
                Err(e) => return Err(GroqError::Unavailable(e.to_string())),
            }
        };

        let markets = parse_market_analysis(&content)?;
        info!("Groq returned {} market entries", markets.len());
        Ok(markets)
    }
}

const SYSTEM_PROMPT: &str = "You are a financial advisor expert in African markets. \
Always respond with valid JSON only, no additional text.";

fn build_prompt(goal: &GoalInput, required_return: f64) -> String {
    format!(
        r#"You are an expert financial advisor specializing in African markets. An investor wants to grow ${current} into ${target} within {years} years, which requires a {required}% annual return.

Identify the 5 best African markets (countries) for reaching this goal, ranked from most to least suitable. For each market provide:
1. Country name
2. The required annual return as a display string (e.g. "{required}%")
3. Feasibility of achieving that return there (High, Medium, or Low)
4. Top 3-4 investment sectors
5. Advantages (3-4 short points)
6. Disadvantages (2-3 short points)
7. Economic resource links (2-3 reputable sites, each with name and url)
8. A concrete investment strategy (2-3 sentences)

Return ONLY a valid JSON object with this exact structure:
{{
  "markets": [
    {{
      "country": "string",
      "requiredAnnualReturn": "string",
      "feasibility": "High" | "Medium" | "Low",
      "topSectors": ["string"],
      "advantages": ["string"],
      "disadvantages": ["string"],
      "economicLinks": [{{ "name": "string", "url": "string" }}],
      "investmentStrategy": "string"
    }}
  ]
}}"#,
        current = goal.current_amount,
        target = goal.target_amount,
        years = goal.time_horizon_years,
        required = required_return,
    )
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct MarketsWrapper {
    markets: Vec<MarketAnalysis>,
}

/// JSON mode should hand back the `{"markets": [...]}` wrapper, but models
/// also answer with a bare array, sometimes buried in prose or code fences.
/// Try strict decodes first, then fall back to the substring heuristic.
fn parse_market_analysis(content: &str) -> Result<Vec<MarketAnalysis>, GroqError> {
    if let Ok(wrapper) = serde_json::from_str::<MarketsWrapper>(content) {
        return Ok(checked(wrapper.markets));
    }
    if let Ok(markets) = serde_json::from_str::<Vec<MarketAnalysis>>(content) {
        return Ok(checked(markets));
    }

    let raw = extract_array(content)
        .ok_or_else(|| GroqError::Format("no JSON array in completion".to_string()))?;
    let markets = serde_json::from_str(&raw)
        .map_err(|e| GroqError::Format(format!("failed to decode market array: {}", e)))?;
    Ok(checked(markets))
}

fn checked(markets: Vec<MarketAnalysis>) -> Vec<MarketAnalysis> {
    if markets.len() != EXPECTED_MARKETS {
        warn!("expected {} market entries, got {}", EXPECTED_MARKETS, markets.len());
    }
    markets
}

/// First array-shaped substring of the content: a fenced ```json block when
/// present, else the greedy first-`[`-to-last-`]` span.
fn extract_array(content: &str) -> Option<String> {
    if let Some(start) = content.find("```json") {
        let body = &content[start + 7..];
        if let Some(end) = body.find("```") {
            let fenced = body[..end].trim();
            if fenced.starts_with('[') {
                return Some(fenced.to_string());
            }
        }
    }

    let re = Regex::new(r"(?s)\[.*\]").ok()?;
    re.find(content).map(|m| m.as_str().to_string())
}
