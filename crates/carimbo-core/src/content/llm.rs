//! OpenAI 兼容 chat-completions 文案生成器

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use carimbo_shared::config::AiConfig;
use carimbo_shared::observability::metrics;

use super::fallback::fallback_campaign_copy;
use super::prompt::PromptTemplate;
use super::{CampaignBrief, CampaignCopy, ContentGenerator, GeneratedContent};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// 基于大模型的文案生成器
///
/// 未配置 api_key 时不发起请求，直接返回兜底文案
pub struct LlmContentGenerator {
    client: Client,
    config: AiConfig,
    template: PromptTemplate,
}

impl LlmContentGenerator {
    pub fn new(config: AiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            config,
            template: PromptTemplate::campaign(),
        })
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    async fn request_copy(&self, api_key: &str, brief: &CampaignBrief) -> Result<CampaignCopy, String> {
        let (system, user) = self.template.render_campaign(brief);
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("请求模型服务失败: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("模型服务返回 HTTP {}", response.status()));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| format!("解析模型响应失败: {e}"))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| "模型响应没有 choices".to_string())?;

        parse_copy(&content)
    }
}

/// 解析模型输出的 JSON 文案，容忍 ``` 代码块包裹和前后多余文本
pub(crate) fn parse_copy(raw: &str) -> Result<CampaignCopy, String> {
    let start = raw.find('{').ok_or_else(|| "模型输出中没有 JSON 对象".to_string())?;
    let end = raw.rfind('}').ok_or_else(|| "模型输出中没有 JSON 对象".to_string())?;
    if end < start {
        return Err("模型输出中没有 JSON 对象".to_string());
    }

    let copy: CampaignCopy =
        serde_json::from_str(&raw[start..=end]).map_err(|e| format!("文案 JSON 不合法: {e}"))?;

    if copy.title.trim().is_empty() || copy.message.trim().is_empty() {
        return Err("文案标题或正文为空".to_string());
    }
    Ok(copy)
}

#[async_trait]
impl ContentGenerator for LlmContentGenerator {
    #[instrument(skip(self, brief), fields(channel = brief.channel.label()))]
    async fn generate_campaign(&self, brief: &CampaignBrief) -> GeneratedContent<CampaignCopy> {
        let Some(api_key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) else {
            debug!("未配置模型 api_key，使用兜底文案");
            metrics::record_campaign_generation("fallback");
            return GeneratedContent::Fallback {
                content: fallback_campaign_copy(brief),
                reason: "未配置模型服务".to_string(),
            };
        };

        match self.request_copy(api_key, brief).await {
            Ok(copy) => {
                metrics::record_campaign_generation("generated");
                GeneratedContent::Generated(copy.fit_channel(brief.channel))
            }
            Err(reason) => {
                warn!(reason = %reason, "文案生成失败，使用兜底文案");
                metrics::record_campaign_generation("fallback");
                GeneratedContent::Fallback {
                    content: fallback_campaign_copy(brief),
                    reason,
                }
            }
        }
    }
}
