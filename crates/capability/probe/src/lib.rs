//! 远端状态探测。
//!
//! 状态服务约定：`GET {base_url}/objects/{id}`，200 时返回
//! `{"id": <i64>, "online": <bool>}`，其它任何情况都视为探测失败。

use async_trait::async_trait;
use domain::{ObjectId, ProbeStatus};
use std::time::Duration;

/// 探测错误。
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status: {0}")]
    Status(u16),
    #[error("decode error: {0}")]
    Decode(String),
}

/// 状态探测抽象。
#[async_trait]
pub trait StatusProbe: Send + Sync {
    async fn probe(&self, id: ObjectId) -> Result<ProbeStatus, ProbeError>;
}

/// HTTP 探测配置。
#[derive(Debug, Clone)]
pub struct HttpProbeConfig {
    pub base_url: String,
    /// 单次请求超时，`None` 表示不限制。
    pub timeout: Option<Duration>,
}

#[derive(Debug, serde::Deserialize)]
struct StatusPayload {
    id: ObjectId,
    online: bool,
}

/// 基于 reqwest 的 HTTP 探测实现。
#[derive(Debug, Clone)]
pub struct HttpStatusProbe {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStatusProbe {
    pub fn new(config: HttpProbeConfig) -> Result<Self, ProbeError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ProbeError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, id: ObjectId) -> String {
        format!("{}/objects/{}", self.base_url, id)
    }
}

#[async_trait]
impl StatusProbe for HttpStatusProbe {
    async fn probe(&self, id: ObjectId) -> Result<ProbeStatus, ProbeError> {
        let response = self
            .client
            .get(self.url_for(id))
            .send()
            .await
            .map_err(|err| ProbeError::Transport(err.to_string()))?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ProbeError::Status(status.as_u16()));
        }
        let payload: StatusPayload = response
            .json()
            .await
            .map_err(|err| ProbeError::Decode(err.to_string()))?;
        Ok(ProbeStatus {
            id: payload.id,
            online: payload.online,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpProbeConfig, HttpStatusProbe};

    #[test]
    fn url_strips_trailing_slash() {
        let probe = HttpStatusProbe::new(HttpProbeConfig {
            base_url: "http://localhost:9010/".to_string(),
            timeout: None,
        })
        .expect("probe");
        assert_eq!(probe.url_for(42), "http://localhost:9010/objects/42");
    }
}
