use std::sync::Arc;

use serde_json::json;

use super::*;
use crate::model::{Person, ScoreBreakdown};
use crate::provider::mock::MockTextGenerationProvider;

fn breakdown() -> ScoreBreakdown {
    ScoreBreakdown {
        similarity: 0.82,
        proficiency: 4.5,
        time: 2.7,
        location: 0.8,
        combined: 2.31,
    }
}

#[tokio::test]
async fn test_generate_returns_provider_text() {
    let provider = MockTextGenerationProvider::new("技能高度吻合，时间安排合适。");
    let generator = RationaleGenerator::new(Arc::new(provider));

    let text = generator.generate("学生信息", "目标信息", &breakdown()).await;
    assert_eq!(text, "技能高度吻合，时间安排合适。");
}

#[tokio::test]
async fn test_generate_without_credential() {
    let provider = Arc::new(MockTextGenerationProvider::unconfigured());
    let generator = RationaleGenerator::new(provider.clone());

    let text = generator.generate("学生信息", "目标信息", &breakdown()).await;
    assert_eq!(text, RATIONALE_UNAVAILABLE);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_generate_empty_reply() {
    let provider = MockTextGenerationProvider::new("   ");
    let generator = RationaleGenerator::new(Arc::new(provider));

    let text = generator.generate("学生信息", "目标信息", &breakdown()).await;
    assert_eq!(text, RATIONALE_EMPTY);
}

#[tokio::test]
async fn test_generate_failure_embeds_scores() {
    let generator = RationaleGenerator::new(Arc::new(MockTextGenerationProvider::failing()));

    let text = generator.generate("学生信息", "目标信息", &breakdown()).await;
    assert!(text.contains("0.82"));
    assert!(text.contains("4.50"));
    assert!(text.contains("2.70"));
    assert!(text.contains("0.80"));
}

#[test]
fn test_fallback_rationale_format() {
    let text = fallback_rationale(&breakdown());
    assert!(text.starts_with("基于AI分析"));
    assert!(text.contains("相关性：0.82"));
    assert!(text.contains("技能：4.50"));
}

#[test]
fn test_person_profile_renders_optionals() {
    let person = Person {
        id: 1,
        name: "小红".to_string(),
        major: Some("软件工程".to_string()),
        skills: json!([{"name": "Python", "level": "登堂入室"}]),
        ..Default::default()
    };

    let block = person_profile(&person);
    assert!(block.contains("姓名: 小红"));
    assert!(block.contains("专业: 软件工程"));
    assert!(block.contains("Python"));
    assert!(block.contains("兴趣: 无"));
    assert!(block.contains("可用时间: 未指定"));
}

#[test]
fn test_target_profile() {
    let block = target_profile("分布式爬虫", Some("抓取与清洗"));
    assert!(block.contains("标题: 分布式爬虫"));
    assert!(block.contains("描述: 抓取与清洗"));

    let block = target_profile("课程", None);
    assert!(block.contains("描述: 无"));
}
