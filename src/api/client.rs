//! HTTP client for the ThoughtFlow backend.

use crate::analysis::types::AnalysisData;
use crate::chat::types::ProcessReply;
use crate::graph::types::GraphData;
use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ProcessRequest<'a> {
    message: &'a str,
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Send one chat message through the backend and get the paired
    /// reply and thinking trace.
    pub fn process_message(&self, message: &str) -> Result<ProcessReply, String> {
        let url = format!("{}/process_message", self.base_url);

        let resp = self
            .client
            .post(&url)
            .json(&ProcessRequest { message })
            .timeout(Duration::from_secs(120)) // Longer timeout for LLM generation
            .send()
            .map_err(|e| format!("Request failed: {}", e))?;

        if !resp.status().is_success() {
            return Err(format!("API error: {}", resp.status()));
        }

        resp.json()
            .map_err(|e| format!("Failed to parse response: {}", e))
    }

    /// Fetch the pattern analysis payload
    pub fn fetch_analysis(&self) -> Result<AnalysisData, String> {
        let url = format!("{}/get_analysis", self.base_url);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| format!("Request failed: {}", e))?;

        if !resp.status().is_success() {
            return Err(format!("API error: {}", resp.status()));
        }

        resp.json()
            .map_err(|e| format!("Failed to parse response: {}", e))
    }

    /// Fetch the full knowledge graph
    pub fn fetch_graph(&self) -> Result<GraphData, String> {
        let url = format!("{}/get_graph_data", self.base_url);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| format!("Request failed: {}", e))?;

        if !resp.status().is_success() {
            return Err(format!("API error: {}", resp.status()));
        }

        resp.json()
            .map_err(|e| format!("Failed to parse response: {}", e))
    }
}
