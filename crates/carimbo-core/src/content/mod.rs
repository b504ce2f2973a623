//! 营销文案生成
//!
//! 生成结果显式区分两种来源：模型生成（`Generated`）与兜底模板（`Fallback`），
//! 调用方据此标记活动的 content_source，不会把降级文案当作真实生成结果。

mod fallback;
mod llm;
mod prompt;

pub use fallback::{fallback_campaign_copy, truncate_chars};
pub use llm::LlmContentGenerator;
pub use prompt::PromptTemplate;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{CampaignChannel, CampaignTone, ContentSource};

/// 文案生成需求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignBrief {
    pub business_name: String,
    pub objective: String,
    pub channel: CampaignChannel,
    #[serde(default)]
    pub audience: Option<String>,
    pub tone: CampaignTone,
}

/// 活动文案
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignCopy {
    pub title: String,
    pub message: String,
    #[serde(alias = "call_to_action", alias = "cta")]
    pub call_to_action: String,
}

impl CampaignCopy {
    /// 按渠道长度上限截断正文
    pub fn fit_channel(mut self, channel: CampaignChannel) -> Self {
        if let Some(limit) = channel.message_limit() {
            self.message = truncate_chars(&self.message, limit);
        }
        self
    }
}

/// 生成结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedContent<T> {
    /// 模型生成
    Generated(T),
    /// 兜底文案，附降级原因
    Fallback { content: T, reason: String },
}

impl<T> GeneratedContent<T> {
    pub fn content(&self) -> &T {
        match self {
            Self::Generated(content) | Self::Fallback { content, .. } => content,
        }
    }

    pub fn into_content(self) -> T {
        match self {
            Self::Generated(content) | Self::Fallback { content, .. } => content,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn source(&self) -> ContentSource {
        match self {
            Self::Generated(_) => ContentSource::Generated,
            Self::Fallback { .. } => ContentSource::Fallback,
        }
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Self::Generated(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> GeneratedContent<U> {
        match self {
            Self::Generated(content) => GeneratedContent::Generated(f(content)),
            Self::Fallback { content, reason } => GeneratedContent::Fallback {
                content: f(content),
                reason,
            },
        }
    }
}

/// 文案生成器
///
/// 实现不返回错误：任何失败都降级为 `GeneratedContent::Fallback`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate_campaign(&self, brief: &CampaignBrief) -> GeneratedContent<CampaignCopy>;
}
