//! End-to-end pipeline tests over the in-memory store and mock providers.

mod common;

use std::sync::Arc;

use serde_json::{Value, json};

use campus_match::{
    EntityKind, InMemoryDataAccess, MatchError, MockEmbeddingProvider, MockRerankProvider,
    MockTextGenerationProvider, RankedDocument,
};

use common::fixtures::*;

fn quiet_providers() -> (
    Arc<MockEmbeddingProvider>,
    Arc<MockRerankProvider>,
    Arc<MockTextGenerationProvider>,
) {
    (
        Arc::new(MockEmbeddingProvider::unconfigured(DIM)),
        Arc::new(MockRerankProvider::unconfigured()),
        Arc::new(MockTextGenerationProvider::unconfigured()),
    )
}

#[tokio::test]
async fn finds_projects_ordered_by_combined_score() {
    let data = Arc::new(
        InMemoryDataAccess::new()
            .with_person(person(1, "小明", &basis(0)))
            .with_project(project(10, "近邻项目", &leaning(0, 0.2)))
            .with_project(project(11, "远端项目", &basis(3)))
            .with_project(project(12, "次近项目", &leaning(0, 0.8))),
    );
    let (embedding, rerank, textgen) = quiet_providers();
    let orchestrator = orchestrator(data, embedding, rerank, textgen);

    let results = orchestrator.find_matching_projects(1).await.unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].id, 10);
    assert_eq!(results[1].id, 12);
    assert_eq!(results[2].id, 11);

    for result in &results {
        assert!(result.breakdown.combined > 0.0);
        assert!((result.relevance - result.breakdown.combined).abs() < 1e-6);
        assert!(result.rationale.is_some());
    }
}

#[tokio::test]
async fn returns_at_most_final_k_results() {
    let mut store = InMemoryDataAccess::new().with_person(person(1, "小明", &basis(0)));
    for i in 0..10 {
        store = store.with_project(project(100 + i, "项目", &leaning(0, i as f32 * 0.1)));
    }
    let data = Arc::new(store);
    let (embedding, rerank, textgen) = quiet_providers();
    let orchestrator = orchestrator(data, embedding, rerank, textgen);

    let results = orchestrator.find_matching_projects(1).await.unwrap();
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn proficiency_full_credit_scenario() {
    let mut matched_person = person(1, "小红", &basis(0));
    matched_person.skills = json!([{"name": "Python", "level": "登堂入室"}]);

    let mut target = project(10, "数据项目", &leaning(0, 0.1));
    target.required_skills = json!([{"name": "Python", "level": "登堂入室"}]);

    let data = Arc::new(
        InMemoryDataAccess::new()
            .with_person(matched_person)
            .with_project(target),
    );
    let (embedding, rerank, textgen) = quiet_providers();
    let orchestrator = orchestrator(data, embedding, rerank, textgen);

    let results = orchestrator.find_matching_projects(1).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].breakdown.proficiency, 5.0);
}

#[tokio::test]
async fn proficiency_missing_skill_scenario() {
    // Requirement at the third tier, person has nothing: raw -2.25 over 3,
    // clamped to zero.
    let mut target = project(10, "编译器项目", &leaning(0, 0.1));
    target.required_skills = json!([{"name": "Rust", "level": "融会贯通"}]);

    let data = Arc::new(
        InMemoryDataAccess::new()
            .with_person(person(1, "小明", &basis(0)))
            .with_project(target),
    );
    let (embedding, rerank, textgen) = quiet_providers();
    let orchestrator = orchestrator(data, embedding, rerank, textgen);

    let results = orchestrator.find_matching_projects(1).await.unwrap();
    assert_eq!(results[0].breakdown.proficiency, 0.0);
}

#[tokio::test]
async fn unknown_person_is_an_error() {
    let data = Arc::new(InMemoryDataAccess::new());
    let (embedding, rerank, textgen) = quiet_providers();
    let orchestrator = orchestrator(data, embedding, rerank, textgen);

    let error = orchestrator.find_matching_projects(999).await.unwrap_err();
    assert!(matches!(error, MatchError::PersonNotFound { id: 999 }));

    let error = orchestrator.find_matching_people(999).await.unwrap_err();
    assert!(matches!(error, MatchError::ProjectNotFound { id: 999 }));
}

#[tokio::test]
async fn unresolvable_query_embedding_yields_empty_list() {
    let mut broken = person(1, "小明", &basis(0));
    broken.embedding = Value::Null;

    let data = Arc::new(
        InMemoryDataAccess::new()
            .with_person(broken)
            .with_project(project(10, "项目", &basis(0))),
    );
    // No embedding credential: regeneration cannot happen.
    let (embedding, rerank, textgen) = quiet_providers();
    let orchestrator = orchestrator(data, embedding, rerank, textgen);

    let results = orchestrator.find_matching_projects(1).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn query_embedding_is_regenerated_and_persisted() {
    let mut stale = person(1, "小明", &basis(0));
    stale.embedding = stored(&vec![0.0; DIM]);
    let combined_text = stale.combined_text.clone().unwrap();

    let data = Arc::new(
        InMemoryDataAccess::new()
            .with_person(stale)
            .with_project(project(10, "项目", &leaning(0, 0.3))),
    );
    let embedding =
        Arc::new(MockEmbeddingProvider::new(DIM).with_vector(combined_text, basis(0)));
    let orchestrator = orchestrator(
        data.clone(),
        embedding,
        Arc::new(MockRerankProvider::unconfigured()),
        Arc::new(MockTextGenerationProvider::unconfigured()),
    );

    let results = orchestrator.find_matching_projects(1).await.unwrap();
    assert_eq!(results.len(), 1);

    // The regenerated vector was handed back to the data layer.
    let persisted = data.stored_embedding(EntityKind::Person, 1).unwrap();
    let persisted: Vec<f32> = serde_json::from_value(persisted).unwrap();
    assert_eq!(persisted, basis(0));
}

#[tokio::test]
async fn invalid_candidates_are_dropped_not_fatal() {
    let mut broken = project(11, "坏项目", &basis(0));
    broken.embedding = json!("not a vector");
    let mut placeholder_project = project(12, "零项目", &basis(0));
    placeholder_project.embedding = stored(&vec![0.0; DIM]);

    let data = Arc::new(
        InMemoryDataAccess::new()
            .with_person(person(1, "小明", &basis(0)))
            .with_project(project(10, "好项目", &leaning(0, 0.2)))
            .with_project(broken)
            .with_project(placeholder_project),
    );
    let (embedding, rerank, textgen) = quiet_providers();
    let orchestrator = orchestrator(data, embedding, rerank, textgen);

    let results = orchestrator.find_matching_projects(1).await.unwrap();
    let ids: Vec<i64> = results.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![10]);
}

#[tokio::test]
async fn rerank_failure_keeps_weighted_order() {
    let data = Arc::new(
        InMemoryDataAccess::new()
            .with_person(person(1, "小明", &basis(0)))
            .with_project(project(10, "甲", &leaning(0, 0.1)))
            .with_project(project(11, "乙", &leaning(0, 0.5)))
            .with_project(project(12, "丙", &leaning(0, 0.9))),
    );
    let rerank = Arc::new(MockRerankProvider::failing());
    let orchestrator = orchestrator(
        data,
        Arc::new(MockEmbeddingProvider::unconfigured(DIM)),
        rerank.clone(),
        Arc::new(MockTextGenerationProvider::unconfigured()),
    );

    let results = orchestrator.find_matching_projects(1).await.unwrap();

    assert_eq!(rerank.call_count(), 1);
    assert_eq!(results[0].id, 10);
    assert_eq!(results[1].id, 11);
    assert_eq!(results[2].id, 12);
    for result in &results {
        assert!((result.relevance - result.breakdown.combined).abs() < 1e-6);
    }
}

#[tokio::test]
async fn rerank_success_overrides_order_and_relevance() {
    let data = Arc::new(
        InMemoryDataAccess::new()
            .with_person(person(1, "小明", &basis(0)))
            .with_project(project(10, "甲", &leaning(0, 0.1)))
            .with_project(project(11, "乙", &leaning(0, 0.5)))
            .with_project(project(12, "丙", &leaning(0, 0.9))),
    );
    // The cross-encoder disagrees with the weighted order.
    let rerank = Arc::new(MockRerankProvider::scripted(vec![
        RankedDocument {
            index: 2,
            relevance_score: 0.97,
        },
        RankedDocument {
            index: 0,
            relevance_score: 0.55,
        },
    ]));
    let orchestrator = orchestrator(
        data,
        Arc::new(MockEmbeddingProvider::unconfigured(DIM)),
        rerank,
        Arc::new(MockTextGenerationProvider::unconfigured()),
    );

    let results = orchestrator.find_matching_projects(1).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, 12);
    assert!((results[0].relevance - 0.97).abs() < 1e-6);
    assert_eq!(results[1].id, 10);
    // Stage-1 scores survive for display either way.
    assert!(results[0].breakdown.combined > 0.0);
}

#[tokio::test]
async fn rationale_provider_text_lands_in_results() {
    let data = Arc::new(
        InMemoryDataAccess::new()
            .with_person(person(1, "小明", &basis(0)))
            .with_project(project(10, "项目", &leaning(0, 0.2))),
    );
    let textgen = Arc::new(MockTextGenerationProvider::new("技能契合，时间充足。"));
    let orchestrator = orchestrator(
        data,
        Arc::new(MockEmbeddingProvider::unconfigured(DIM)),
        Arc::new(MockRerankProvider::unconfigured()),
        textgen,
    );

    let results = orchestrator.find_matching_projects(1).await.unwrap();
    assert_eq!(
        results[0].rationale.as_deref(),
        Some("技能契合，时间充足。")
    );
}

#[tokio::test]
async fn rationale_failure_degrades_to_template() {
    let data = Arc::new(
        InMemoryDataAccess::new()
            .with_person(person(1, "小明", &basis(0)))
            .with_project(project(10, "项目", &leaning(0, 0.2))),
    );
    let orchestrator = orchestrator(
        data,
        Arc::new(MockEmbeddingProvider::unconfigured(DIM)),
        Arc::new(MockRerankProvider::unconfigured()),
        Arc::new(MockTextGenerationProvider::failing()),
    );

    let results = orchestrator.find_matching_projects(1).await.unwrap();
    let rationale = results[0].rationale.as_deref().unwrap();
    assert!(rationale.starts_with("基于AI分析"));
}

#[tokio::test]
async fn finds_courses_with_flat_time_score() {
    let mut learner = person(1, "小红", &basis(0));
    learner.location = Some("深圳南山".to_string());

    let mut near = course(20, "机器学习入门", &leaning(0, 0.2));
    near.category = Some("深圳线下".to_string());

    let data = Arc::new(
        InMemoryDataAccess::new()
            .with_person(learner)
            .with_course(near)
            .with_course(course(21, "前端速成", &basis(5))),
    );
    let (embedding, rerank, textgen) = quiet_providers();
    let orchestrator = orchestrator(data, embedding, rerank, textgen);

    let results = orchestrator.find_matching_courses(1).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, 20);
    // Courses score a flat 0.9 * 3.0 on the time criterion.
    assert!((results[0].breakdown.time - 2.7).abs() < 1e-6);
    // "深圳" appears in the course category: same-city tier.
    assert!((results[0].breakdown.location - 0.6).abs() < 1e-6);
}

#[tokio::test]
async fn finds_people_for_project() {
    let mut qualified = person(2, "小强", &leaning(1, 0.1));
    qualified.skills = json!([{"name": "Rust", "level": "炉火纯青"}]);
    qualified.major = Some("计算机科学".to_string());

    let mut novice = person(3, "小弱", &leaning(1, 0.6));
    novice.skills = json!([]);

    let mut target = project(10, "系统项目", &basis(1));
    target.required_skills = json!([{"name": "Rust", "level": "融会贯通"}]);

    let data = Arc::new(
        InMemoryDataAccess::new()
            .with_person(qualified)
            .with_person(novice)
            .with_project(target),
    );
    let (embedding, rerank, textgen) = quiet_providers();
    let orchestrator = orchestrator(data, embedding, rerank, textgen);

    let results = orchestrator.find_matching_people(10).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, 2);
    assert_eq!(results[0].title, "小强");
    assert_eq!(results[0].description.as_deref(), Some("计算机科学"));
    assert_eq!(results[0].breakdown.proficiency, 5.0);
    assert_eq!(results[1].breakdown.proficiency, 0.0);
}

#[tokio::test]
async fn empty_pool_yields_empty_list() {
    let data = Arc::new(InMemoryDataAccess::new().with_person(person(1, "小明", &basis(0))));
    let (embedding, rerank, textgen) = quiet_providers();
    let orchestrator = orchestrator(data, embedding, rerank, textgen);

    let results = orchestrator.find_matching_projects(1).await.unwrap();
    assert!(results.is_empty());

    let results = orchestrator.find_matching_courses(1).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn messy_candidate_skills_are_normalized_in_flight() {
    let mut stringly = person(1, "小明", &basis(0));
    // Skills serialized twice by an old client build.
    stringly.skills = json!("\"[{'name': 'Python', 'level': '登堂入室'}]\"");

    let mut target = project(10, "数据项目", &leaning(0, 0.1));
    target.required_skills = json!([{"name": "Python", "level": "登堂入室"}]);

    let data = Arc::new(
        InMemoryDataAccess::new()
            .with_person(stringly)
            .with_project(target),
    );
    let (embedding, rerank, textgen) = quiet_providers();
    let orchestrator = orchestrator(data, embedding, rerank, textgen);

    let results = orchestrator.find_matching_projects(1).await.unwrap();
    assert_eq!(results[0].breakdown.proficiency, 5.0);
}
