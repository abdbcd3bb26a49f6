//! HTTP inference backends.
//!
//! Both backends speak the Hugging Face inference JSON format, so they work
//! against the hosted inference API, a text-generation-inference server, or
//! any local server exposing the same shapes.

use super::{EntailmentModel, GenerationParams, Generator, ModelError, NliLogits};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Build the HTTP client shared by all inference backends.
pub fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[derive(Debug, Clone)]
struct Endpoint {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl Endpoint {
    async fn post<T: Serialize + ?Sized>(&self, body: &T) -> Result<Value, ModelError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ModelError::NotLoaded(format!("Invalid API token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let response = self
            .client
            .post(&self.url)
            .headers(headers)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ModelError::Endpoint { status, message });
        }

        Ok(response.json().await?)
    }
}

// ============================================================================
// Entailment
// ============================================================================

/// NLI classifier served over HTTP.
#[derive(Debug, Clone)]
pub struct HttpEntailment {
    endpoint: Endpoint,
}

impl HttpEntailment {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            endpoint: Endpoint {
                client,
                url: url.into(),
                token: None,
            },
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.endpoint.token = token;
        self
    }
}

#[async_trait]
impl EntailmentModel for HttpEntailment {
    async fn predict(&self, pairs: &[(String, String)]) -> Result<Vec<NliLogits>, ModelError> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let inputs: Vec<Value> = pairs
            .iter()
            .map(|(premise, hypothesis)| json!({"text": premise, "text_pair": hypothesis}))
            .collect();
        let body = json!({
            "inputs": inputs,
            "parameters": {"function_to_apply": "none", "top_k": 3},
        });

        tracing::debug!(pairs = pairs.len(), "entailment request");
        let output = self.endpoint.post(&body).await?;
        let logits = parse_classification(&output)?;

        if logits.len() != pairs.len() {
            return Err(ModelError::Output(format!(
                "expected {} results, got {}",
                pairs.len(),
                logits.len()
            )));
        }
        Ok(logits)
    }
}

/// Parse `[[{label, score}, ...], ...]` (or a single unnested list) into logits.
fn parse_classification(output: &Value) -> Result<Vec<NliLogits>, ModelError> {
    let rows = output
        .as_array()
        .ok_or_else(|| ModelError::Output(format!("expected a list, got {output}")))?;

    if rows.first().is_some_and(Value::is_object) {
        return Ok(vec![parse_label_scores(rows)?]);
    }

    rows.iter()
        .map(|row| {
            row.as_array()
                .ok_or_else(|| ModelError::Output(format!("expected a list of labels, got {row}")))
                .and_then(|labels| parse_label_scores(labels))
        })
        .collect()
}

fn parse_label_scores(labels: &[Value]) -> Result<NliLogits, ModelError> {
    let mut scores: [Option<f32>; 3] = [None; 3];

    for entry in labels {
        let label = entry["label"].as_str().unwrap_or_default().to_lowercase();
        let score = entry["score"]
            .as_f64()
            .ok_or_else(|| ModelError::Output(format!("missing score in {entry}")))?;

        let index = match label.as_str() {
            l if l.starts_with("contradiction") => 0,
            l if l.starts_with("entailment") => 1,
            l if l.starts_with("neutral") => 2,
            "label_0" => 0,
            "label_1" => 1,
            "label_2" => 2,
            other => return Err(ModelError::Output(format!("unknown NLI label '{other}'"))),
        };
        scores[index] = Some(score as f32);
    }

    match scores {
        [Some(c), Some(e), Some(n)] => Ok(NliLogits::new(c, e, n)),
        _ => Err(ModelError::Output(
            "NLI output is missing one of contradiction, entailment, neutral".to_string(),
        )),
    }
}

// ============================================================================
// Generation
// ============================================================================

/// Seq2seq generator served over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    endpoint: Endpoint,
}

impl HttpGenerator {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            endpoint: Endpoint {
                client,
                url: url.into(),
                token: None,
            },
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.endpoint.token = token;
        self
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, ModelError> {
        let body = json!({"inputs": prompt, "parameters": params});
        let output = self.endpoint.post(&body).await?;
        parse_generation(&output)
    }
}

fn parse_generation(output: &Value) -> Result<String, ModelError> {
    let first = match output {
        Value::Array(items) => items.first(),
        other => Some(other),
    };
    first
        .and_then(|item| item["generated_text"].as_str())
        .map(str::to_string)
        .ok_or_else(|| ModelError::Output(format!("missing generated_text in {output}")))
}
