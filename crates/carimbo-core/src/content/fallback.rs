//! 兜底文案

use super::{CampaignBrief, CampaignCopy};
use crate::models::CampaignTone;

/// 按字符截断，超长时以省略号结尾，结果不超过 limit 个字符
pub fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    if limit == 0 {
        return String::new();
    }
    let mut truncated: String = text.chars().take(limit - 1).collect();
    truncated = truncated.trim_end().to_string();
    truncated.push('…');
    truncated
}

/// 根据需求拼装固定模板文案
pub fn fallback_campaign_copy(brief: &CampaignBrief) -> CampaignCopy {
    let title = match brief.tone {
        CampaignTone::Festive => format!("É festa no {}!", brief.business_name),
        CampaignTone::Urgent => format!("Só hoje no {}!", brief.business_name),
        CampaignTone::Sophisticated => format!("Um convite especial do {}", brief.business_name),
        CampaignTone::Friendly => format!("Saudades de você no {}!", brief.business_name),
    };

    let audience = brief
        .audience
        .as_deref()
        .map(|a| format!(" Pensamos em você, {}.", a))
        .unwrap_or_default();

    let message = format!(
        "Olá!{} {} Venha nos visitar e continue juntando carimbos no seu cartão fidelidade.",
        audience,
        capitalize(brief.objective.trim())
    );

    CampaignCopy {
        title,
        message,
        call_to_action: "Passe aqui e ganhe seu carimbo!".to_string(),
    }
    .fit_channel(brief.channel)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    let mut out = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => return String::new(),
    };
    if !out.ends_with(['.', '!', '?']) {
        out.push('.');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CampaignChannel;

    fn brief(channel: CampaignChannel) -> CampaignBrief {
        CampaignBrief {
            business_name: "Cantina da Nona".to_string(),
            objective: "trazer clientes de volta nas terças".to_string(),
            channel,
            audience: Some("clientes antigos".to_string()),
            tone: CampaignTone::Friendly,
        }
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abc", 5), "abc");
        assert_eq!(truncate_chars("abcdef", 4), "abc…");
        assert_eq!(truncate_chars("ação é boa", 5), "ação…");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_fallback_mentions_business_and_objective() {
        let copy = fallback_campaign_copy(&brief(CampaignChannel::Whatsapp));
        assert!(copy.title.contains("Cantina da Nona"));
        assert!(copy.message.contains("Trazer clientes de volta nas terças."));
        assert!(copy.message.contains("clientes antigos"));
        assert!(!copy.call_to_action.is_empty());
    }

    #[test]
    fn test_fallback_respects_sms_limit() {
        let mut b = brief(CampaignChannel::Sms);
        b.objective = "promoção ".repeat(40);
        let copy = fallback_campaign_copy(&b);
        assert!(copy.message.chars().count() <= 160);
    }
}
