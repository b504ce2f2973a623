//! 提示词模板
//!
//! 支持 `{{variable}}` 语法，未提供的变量保留原样并记录警告。

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::CampaignBrief;

static VARIABLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    // 变量名支持字母、数字、下划线
    Regex::new(r"\{\{(\w+)\}\}").expect("模板变量正则合法")
});

const CAMPAIGN_SYSTEM_PROMPT: &str = "Você é um redator de marketing especializado em \
restaurantes brasileiros. Escreva em português do Brasil, com frases curtas e naturais. \
Responda somente com um objeto JSON com as chaves \"title\", \"message\" e \"call_to_action\".";

const CAMPAIGN_USER_PROMPT: &str = "Crie uma campanha para o restaurante \"{{business_name}}\".\n\
Objetivo: {{objective}}\n\
Canal: {{channel}}\n\
Público: {{audience}}\n\
Tom: {{tone}}\n\
{{length_hint}}\
Mencione o cartão fidelidade de carimbos quando fizer sentido.";

/// 提示词模板
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    system: String,
    user: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::campaign()
    }
}

impl PromptTemplate {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// 营销活动文案模板
    pub fn campaign() -> Self {
        Self::new(CAMPAIGN_SYSTEM_PROMPT, CAMPAIGN_USER_PROMPT)
    }

    /// 渲染 (system, user) 两段提示词
    pub fn render_campaign(&self, brief: &CampaignBrief) -> (String, String) {
        let vars = campaign_variables(brief);
        (render(&self.system, &vars), render(&self.user, &vars))
    }
}

fn campaign_variables(brief: &CampaignBrief) -> HashMap<&'static str, String> {
    let length_hint = match brief.channel.message_limit() {
        Some(limit) => format!("A mensagem deve ter no máximo {} caracteres.\n", limit),
        None => String::new(),
    };

    HashMap::from([
        ("business_name", brief.business_name.clone()),
        ("objective", brief.objective.clone()),
        ("channel", brief.channel.label().to_string()),
        (
            "audience",
            brief
                .audience
                .clone()
                .unwrap_or_else(|| "todos os clientes".to_string()),
        ),
        ("tone", brief.tone.label().to_string()),
        ("length_hint", length_hint),
    ])
}

/// 替换模板中的 `{{variable}}`
pub(crate) fn render(template: &str, vars: &HashMap<&'static str, String>) -> String {
    VARIABLE_REGEX
        .replace_all(template, |caps: &regex::Captures| {
            let name = &caps[1];
            match vars.get(name) {
                Some(value) => value.clone(),
                None => {
                    warn!(variable = name, "模板变量未找到，保留原样");
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}
