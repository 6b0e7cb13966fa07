//! Natural-language match rationales.
//!
//! A short explanation is requested from the text-generation collaborator
//! using a fixed prompt template. Degradation order: no usable credential →
//! static notice; empty response → static notice; provider failure → a
//! templated string embedding the four sub-scores, so the UI always has
//! something to show.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::warn;

use crate::model::{Person, ScoreBreakdown};
use crate::provider::{ChatMessage, TextGenerationProvider};

/// Shown when no usable text-generation credential exists.
pub const RATIONALE_UNAVAILABLE: &str = "AI匹配理由暂不可用。";
/// Shown when the provider answered with empty content.
pub const RATIONALE_EMPTY: &str = "AI匹配理由生成失败或内容为空。";

const SYSTEM_PROMPT: &str = "你是一个智能匹配推荐系统的AI助手，需要为用户提供简洁、有说服力的匹配理由。\
请根据提供的学生和目标信息，以及各项匹配得分，总结为什么他们是匹配的。\
回复应简洁精炼，重点突出，不超过250字。";

/// Renders the person block of the rationale prompt.
pub fn person_profile(person: &Person) -> String {
    format!(
        "学生信息:\n姓名: {}, 专业: {}\n技能: {}\n兴趣: {}\n可用时间: {}\n地理位置: {}",
        person.name,
        person.major.as_deref().unwrap_or("未指定"),
        serde_json::to_string(&person.skills).unwrap_or_else(|_| "[]".to_string()),
        person.interests.as_deref().unwrap_or("无"),
        person.availability.as_deref().unwrap_or("未指定"),
        person.location.as_deref().unwrap_or("未指定"),
    )
}

/// Renders the target block of the rationale prompt.
pub fn target_profile(title: &str, description: Option<&str>) -> String {
    format!(
        "目标信息:\n标题: {}\n描述: {}",
        title,
        description.unwrap_or("无"),
    )
}

/// Templated fallback embedding the four sub-scores.
pub fn fallback_rationale(breakdown: &ScoreBreakdown) -> String {
    format!(
        "基于AI分析，匹配得分 - 相关性：{:.2}，技能：{:.2}，时间：{:.2}，位置：{:.2}",
        breakdown.similarity, breakdown.proficiency, breakdown.time, breakdown.location,
    )
}

pub struct RationaleGenerator {
    provider: Arc<dyn TextGenerationProvider>,
}

impl RationaleGenerator {
    pub fn new(provider: Arc<dyn TextGenerationProvider>) -> Self {
        Self { provider }
    }

    /// Generates a rationale for one match. Never errors.
    pub async fn generate(
        &self,
        person_block: &str,
        target_block: &str,
        breakdown: &ScoreBreakdown,
    ) -> String {
        if !self.provider.is_configured() {
            warn!("No usable text-generation credential, rationale unavailable");
            return RATIONALE_UNAVAILABLE.to_string();
        }

        let user_prompt = format!(
            "{person_block}\n\n{target_block}\n\n匹配得分:\n内容相关性: {:.2}\n技能匹配: {:.2}\n时间匹配: {:.2}\n地理位置匹配: {:.2}\n\n请为此匹配提供简洁的理由。",
            breakdown.similarity, breakdown.proficiency, breakdown.time, breakdown.location,
        );

        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_prompt),
        ];

        match self.provider.complete(&messages).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => RATIONALE_EMPTY.to_string(),
            Err(e) => {
                warn!(error = %e, "Rationale generation failed, using templated fallback");
                fallback_rationale(breakdown)
            }
        }
    }
}
