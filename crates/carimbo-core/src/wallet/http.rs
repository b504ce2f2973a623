use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, instrument};

use carimbo_shared::config::WalletConfig;

use super::{PassHandle, PassPayload, WalletError, WalletPassProvider};

/// PassKit 风格 REST 接口
///
/// - `POST   {base_url}/passes`
/// - `PUT    {base_url}/passes/{serial}`
/// - `DELETE {base_url}/passes/{serial}`
pub struct HttpWalletPassProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpWalletPassProvider {
    pub fn new(config: &WalletConfig) -> Result<Self, WalletError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| WalletError::Transport(format!("创建 HTTP 客户端失败: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn pass_url(&self, serial: &str) -> String {
        format!("{}/passes/{}", self.base_url, serial)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, serial: &str) -> Result<Response, WalletError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| WalletError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, serial, body))
    }
}

/// HTTP 状态码映射为卡券错误
fn classify_status(status: StatusCode, serial: &str, body: String) -> WalletError {
    let detail = if body.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, body)
    };

    if status == StatusCode::NOT_FOUND {
        WalletError::NotFound(serial.to_string())
    } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        WalletError::Unavailable(detail)
    } else {
        WalletError::Rejected(detail)
    }
}

#[async_trait]
impl WalletPassProvider for HttpWalletPassProvider {
    #[instrument(skip(self, payload), fields(serial = %payload.serial))]
    async fn create_pass(&self, payload: &PassPayload) -> Result<PassHandle, WalletError> {
        let url = format!("{}/passes", self.base_url);
        let response = self
            .send(self.client.post(&url).json(payload), &payload.serial)
            .await?;

        // 部分服务创建成功时不返回 body，沿用请求中的序列号
        let handle = response
            .json::<PassHandle>()
            .await
            .unwrap_or_else(|_| PassHandle {
                serial: payload.serial.clone(),
                url: None,
            });
        debug!(serial = %handle.serial, "卡券已创建");
        Ok(handle)
    }

    #[instrument(skip(self, payload))]
    async fn update_pass(&self, serial: &str, payload: &PassPayload) -> Result<(), WalletError> {
        self.send(self.client.put(self.pass_url(serial)).json(payload), serial)
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_pass(&self, serial: &str) -> Result<(), WalletError> {
        self.send(self.client.delete(self.pass_url(serial)), serial)
            .await?;
        Ok(())
    }
}
