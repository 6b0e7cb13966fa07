//! In-memory entity store for tests and offline development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{DataAccess, DataAccessError};
use crate::model::{Course, EntityId, EntityKind, Person, Project};

#[derive(Default)]
pub struct InMemoryDataAccess {
    people: RwLock<HashMap<EntityId, Person>>,
    projects: RwLock<HashMap<EntityId, Project>>,
    courses: RwLock<HashMap<EntityId, Course>>,
}

impl InMemoryDataAccess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_person(self, person: Person) -> Self {
        self.people
            .write()
            .expect("people lock")
            .insert(person.id, person);
        self
    }

    pub fn with_project(self, project: Project) -> Self {
        self.projects
            .write()
            .expect("projects lock")
            .insert(project.id, project);
        self
    }

    pub fn with_course(self, course: Course) -> Self {
        self.courses
            .write()
            .expect("courses lock")
            .insert(course.id, course);
        self
    }

    /// The embedding currently stored for an entity, if any.
    pub fn stored_embedding(&self, kind: EntityKind, id: EntityId) -> Option<serde_json::Value> {
        match kind {
            EntityKind::Person => self
                .people
                .read()
                .expect("people lock")
                .get(&id)
                .map(|p| p.embedding.clone()),
            EntityKind::Project => self
                .projects
                .read()
                .expect("projects lock")
                .get(&id)
                .map(|p| p.embedding.clone()),
            EntityKind::Course => self
                .courses
                .read()
                .expect("courses lock")
                .get(&id)
                .map(|c| c.embedding.clone()),
        }
    }
}

#[async_trait]
impl DataAccess for InMemoryDataAccess {
    async fn person(&self, id: EntityId) -> Result<Option<Person>, DataAccessError> {
        Ok(self.people.read().expect("people lock").get(&id).cloned())
    }

    async fn project(&self, id: EntityId) -> Result<Option<Project>, DataAccessError> {
        Ok(self
            .projects
            .read()
            .expect("projects lock")
            .get(&id)
            .cloned())
    }

    async fn people(&self) -> Result<Vec<Person>, DataAccessError> {
        let mut people: Vec<Person> = self
            .people
            .read()
            .expect("people lock")
            .values()
            .cloned()
            .collect();
        people.sort_by_key(|p| p.id);
        Ok(people)
    }

    async fn projects(&self) -> Result<Vec<Project>, DataAccessError> {
        let mut projects: Vec<Project> = self
            .projects
            .read()
            .expect("projects lock")
            .values()
            .cloned()
            .collect();
        projects.sort_by_key(|p| p.id);
        Ok(projects)
    }

    async fn courses(&self) -> Result<Vec<Course>, DataAccessError> {
        let mut courses: Vec<Course> = self
            .courses
            .read()
            .expect("courses lock")
            .values()
            .cloned()
            .collect();
        courses.sort_by_key(|c| c.id);
        Ok(courses)
    }

    async fn persist_embedding(
        &self,
        kind: EntityKind,
        id: EntityId,
        vector: &[f32],
    ) -> Result<(), DataAccessError> {
        let value = serde_json::to_value(vector)
            .map_err(|e| DataAccessError::Backend(e.to_string()))?;

        match kind {
            EntityKind::Person => {
                if let Some(person) = self.people.write().expect("people lock").get_mut(&id) {
                    person.embedding = value;
                }
            }
            EntityKind::Project => {
                if let Some(project) = self.projects.write().expect("projects lock").get_mut(&id) {
                    project.embedding = value;
                }
            }
            EntityKind::Course => {
                if let Some(course) = self.courses.write().expect("courses lock").get_mut(&id) {
                    course.embedding = value;
                }
            }
        }

        Ok(())
    }
}
