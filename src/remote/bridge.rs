use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Result, StudioError};
use crate::remote::http_client;
use crate::util::endpoint_url;

pub const TUNNEL_AUTH_MESSAGE: &str =
    "Ngrok tunnel may need manual re-authentication. Please open the bridge URL in a new tab.";

/// An n8n workflow as the studio sees it. `nodes` and `schema` are only
/// filled in by [`BridgeClient::workflow_details`] and are passed through to
/// the generation service untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Normalizes a `search_workflows` answer. The list sits under
/// `result.structuredContent.data`, `result.output.data`, or is the body.
pub fn parse_workflow_list(data: &Value) -> Vec<Workflow> {
    let items = data
        .pointer("/result/structuredContent/data")
        .or_else(|| data.pointer("/result/output/data"))
        .or(Some(data))
        .and_then(Value::as_array);
    items
        .map(|items| {
            items
                .iter()
                .map(|item| Workflow {
                    id: non_empty_str(item, "id").unwrap_or("N/A").to_string(),
                    name: non_empty_str(item, "name")
                        .unwrap_or("Untitled Workflow")
                        .to_string(),
                    nodes: None,
                    schema: None,
                    active: Some(item.get("active").and_then(Value::as_bool).unwrap_or(false)),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Normalizes a `get_workflow_details` answer into a profile for the
/// generation prompt. The structured run/pin data becomes `schema`.
pub fn parse_workflow_details(workflow_id: &str, data: &Value) -> Workflow {
    let raw = data
        .get("result")
        .or_else(|| data.get("output"))
        .unwrap_or(data);
    let structured = raw.get("structuredContent").unwrap_or(raw);
    Workflow {
        id: workflow_id.to_string(),
        name: non_empty_str(raw, "name")
            .unwrap_or("Workflow Technical Profile")
            .to_string(),
        nodes: Some(
            raw.get("nodes")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        ),
        schema: Some(structured.clone()),
        active: None,
    }
}

/// Client of the n8n MCP bridge. Only the calls the generation flow needs.
#[derive(Clone, Debug)]
pub struct BridgeClient {
    http: reqwest::Client,
    bridge_url: String,
}

impl BridgeClient {
    pub fn new(bridge_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            bridge_url: bridge_url.into(),
        })
    }

    async fn post(&self, route: &str, body: Value) -> Result<Value> {
        let url = endpoint_url(&self.bridge_url, &[route])?;
        let response = self.http.post(url).json(&body).send().await?;
        let status = response.status();
        if status.as_u16() == 404 || status.as_u16() == 406 {
            return Err(StudioError::Custom(TUNNEL_AUTH_MESSAGE.to_string()));
        }
        if !status.is_success() {
            let data: Value = response.json().await.unwrap_or(Value::Null);
            let message = non_empty_str(&data, "message")
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            return Err(StudioError::Custom(message));
        }
        Ok(response.json().await?)
    }

    async fn execute(&self, tool_name: &str, args: Value) -> Result<Value> {
        self.post("execute", json!({ "toolName": tool_name, "args": args }))
            .await
    }

    /// Points the bridge at an n8n instance.
    pub async fn setup(&self, n8n_url: &str, token: &str) -> Result<Value> {
        self.post("setup", json!({ "url": n8n_url, "token": token }))
            .await
    }

    pub async fn search_workflows(&self, limit: u32) -> Result<Vec<Workflow>> {
        let data = self
            .execute("search_workflows", json!({ "limit": limit }))
            .await?;
        Ok(parse_workflow_list(&data))
    }

    pub async fn workflow_details(&self, workflow_id: &str) -> Result<Workflow> {
        let data = self
            .execute("get_workflow_details", json!({ "workflowId": workflow_id }))
            .await?;
        Ok(parse_workflow_details(workflow_id, &data))
    }
}
