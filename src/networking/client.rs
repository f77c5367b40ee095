//! JSON-over-HTTP coaching gateway
//!
//! Every endpoint is a `POST` under the base URL. The backend reports
//! rejections as `{"success": false, "error": ...}`, sometimes with a 4xx
//! status and sometimes with 200, so the body is decoded as a
//! [`Reply`] regardless of status and only an undecodable body counts as a
//! transport failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use shared::protocol::{
    BatchMovesReply, BatchMovesRequest, ChatReply, ChatRequest, MoveReply, MoveRequest,
    NewGameReply, NewGameRequest, Reply, UndoReply,
};

use super::{CoachingGateway, GatewayError, GatewayResult};

/// Base URL used when nothing else is configured
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:5001/api/game";

/// Coaching backend reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Gateway rooted at `base_url`; `connect_timeout` bounds the TCP connect only
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration) -> GatewayResult<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("[GATEWAY] Using coaching backend at {}", base_url);
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post<B, T>(&self, path: &str, body: Option<&B>) -> GatewayResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!("[GATEWAY] POST {}", url);

        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!("[GATEWAY] POST {} failed: {}", url, e);
            GatewayError::Transport(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        decode_reply(&text).map_err(|err| {
            warn!("[GATEWAY] {} answered {}: {}", url, status, err);
            err
        })
    }
}

/// Decode a reply body into its accepted payload
///
/// Rejections map to [`GatewayError::Rejected`] carrying the server's text.
pub fn decode_reply<T: DeserializeOwned>(body: &str) -> GatewayResult<T> {
    let reply: Reply<T> = serde_json::from_str(body)
        .map_err(|e| GatewayError::Transport(format!("malformed reply: {e}")))?;
    reply.into_result().map_err(GatewayError::Rejected)
}

#[async_trait]
impl CoachingGateway for HttpGateway {
    async fn new_game(&self, request: NewGameRequest) -> GatewayResult<NewGameReply> {
        self.post("new", Some(&request)).await
    }

    async fn submit_move(&self, request: MoveRequest) -> GatewayResult<MoveReply> {
        self.post("move", Some(&request)).await
    }

    async fn batch_moves(&self, request: BatchMovesRequest) -> GatewayResult<BatchMovesReply> {
        self.post("batch-moves", Some(&request)).await
    }

    async fn undo(&self) -> GatewayResult<UndoReply> {
        self.post::<(), _>("undo", None).await
    }

    async fn chat(&self, request: ChatRequest) -> GatewayResult<ChatReply> {
        self.post("chat", Some(&request)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let gateway = HttpGateway::new("http://localhost:5001/api/game/", Duration::from_secs(1))
            .expect("Client should build");

        assert_eq!(gateway.base_url(), "http://localhost:5001/api/game");
        assert_eq!(
            gateway.endpoint("batch-moves"),
            "http://localhost:5001/api/game/batch-moves"
        );
    }

    #[test]
    fn test_decode_rejection() {
        let err = decode_reply::<ChatReply>(r#"{"success": false, "error": "No moves to undo"}"#)
            .unwrap_err();
        assert_eq!(err, GatewayError::Rejected("No moves to undo".to_string()));
    }

    #[test]
    fn test_decode_accepted() {
        let reply: ChatReply =
            decode_reply(r#"{"success": true, "answer": "Develop your knights."}"#).unwrap();
        assert_eq!(reply.answer, "Develop your knights.");
    }

    #[test]
    fn test_decode_garbage_is_transport_failure() {
        let err = decode_reply::<ChatReply>("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}
