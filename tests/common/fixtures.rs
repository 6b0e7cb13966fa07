//! Shared builders for the pipeline integration tests.

use std::sync::Arc;

use serde_json::{Value, json};

use campus_match::{
    Course, EmbeddingProvider, InMemoryDataAccess, MatchOrchestrator, MatchingConfig, Person,
    Project, RerankProvider, TextGenerationProvider,
};

/// Test embedding dimension; small enough to write vectors by hand.
pub const DIM: usize = 8;

/// Unit basis vector with a 1.0 at `axis`.
pub fn basis(axis: usize) -> Vec<f32> {
    let mut v = vec![0.0; DIM];
    v[axis] = 1.0;
    v
}

/// A vector leaning toward `axis` with a small component on the next axis;
/// cosine against `basis(axis)` shrinks as `spread` grows.
pub fn leaning(axis: usize, spread: f32) -> Vec<f32> {
    let mut v = basis(axis);
    v[(axis + 1) % DIM] = spread;
    v
}

pub fn stored(vector: &[f32]) -> Value {
    serde_json::to_value(vector).expect("vector serializes")
}

pub fn person(id: i64, name: &str, embedding: &[f32]) -> Person {
    Person {
        id,
        name: name.to_string(),
        combined_text: Some(format!("学生{name}的综合简介")),
        embedding: stored(embedding),
        skills: json!([]),
        ..Default::default()
    }
}

pub fn project(id: i64, title: &str, embedding: &[f32]) -> Project {
    Project {
        id,
        title: title.to_string(),
        description: Some(format!("{title}的项目描述")),
        combined_text: Some(format!("项目{title}的综合文本")),
        embedding: stored(embedding),
        required_skills: json!([]),
        ..Default::default()
    }
}

pub fn course(id: i64, title: &str, embedding: &[f32]) -> Course {
    Course {
        id,
        title: title.to_string(),
        description: Some(format!("{title}的课程描述")),
        combined_text: Some(format!("课程{title}的综合文本")),
        embedding: stored(embedding),
        required_skills: json!([]),
        ..Default::default()
    }
}

pub fn test_config() -> MatchingConfig {
    MatchingConfig {
        embedding_dim: DIM,
        ..Default::default()
    }
}

pub fn orchestrator(
    data: Arc<InMemoryDataAccess>,
    embedding: Arc<dyn EmbeddingProvider>,
    rerank: Arc<dyn RerankProvider>,
    textgen: Arc<dyn TextGenerationProvider>,
) -> MatchOrchestrator {
    MatchOrchestrator::new(data, embedding, rerank, textgen, test_config())
        .expect("test config is valid")
}
