use buildersolve_chat::{ChatError, ChatReply, ChatRequest, ClientConfig, JobSnapshot};
use gloo_net::http::{Request, Response};

/// Sends one chat turn through `POST /api/chat` (REST fallback).
pub async fn post_chat(config: &ClientConfig, request: &ChatRequest) -> Result<ChatReply, ChatError> {
    let url = config.chat_url()?;
    let resp = Request::post(url.as_str())
        .json(request)
        .map_err(|e| ChatError::network(format!("could not encode request: {e}")))?
        .send()
        .await
        .map_err(|e| ChatError::network(e.to_string()))?;

    read_json(resp).await
}

/// Fetches the snapshot for `job_id` through `GET /api/job/{id}`.
pub async fn fetch_job(config: &ClientConfig, job_id: &str) -> Result<JobSnapshot, ChatError> {
    let url = config.job_url(job_id)?;
    let resp = Request::get(url.as_str())
        .send()
        .await
        .map_err(|e| ChatError::network(e.to_string()))?;

    read_json(resp).await
}

async fn read_json<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, ChatError> {
    if !resp.ok() {
        return Err(ChatError::HttpStatus { status: resp.status() });
    }

    let body = resp
        .text()
        .await
        .map_err(|e| ChatError::network(format!("could not read body: {e}")))?;
    Ok(serde_json::from_str(&body)?)
}
