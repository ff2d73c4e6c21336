use std::collections::BTreeMap;
use std::env;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, COOKIE};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use course_core::model::{
    Course, CourseId, CourseModule, Lesson, LessonId, LessonKind, ModuleId, QuizContent,
};

use crate::error::CourseSourceError;

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseApiConfig {
    pub base_url: String,
    /// Raw `Cookie` header value issued by the backend's login flow.
    pub session_cookie: Option<String>,
}

impl CourseApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            session_cookie: None,
        }
    }

    #[must_use]
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Read `COURSE_API_BASE_URL` and `COURSE_SESSION_COOKIE`.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("COURSE_API_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        let session_cookie = env::var("COURSE_SESSION_COOKIE")
            .ok()
            .filter(|value| !value.trim().is_empty());
        Self {
            base_url,
            session_cookie,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

//
// ─── SOURCE CONTRACT ───────────────────────────────────────────────────────────
//

/// Course as listed in the catalogue, without its outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseListing {
    pub id: CourseId,
    pub title: String,
    pub description: Option<String>,
}

/// Where course outlines come from.
#[async_trait]
pub trait CourseSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `CourseSourceError` on transport or decoding failures.
    async fn list_courses(&self) -> Result<Vec<CourseListing>, CourseSourceError>;

    /// # Errors
    ///
    /// Returns `CourseSourceError::NotFound` for unknown courses.
    async fn fetch_course(&self, id: CourseId) -> Result<Course, CourseSourceError>;
}

//
// ─── HTTP ──────────────────────────────────────────────────────────────────────
//

/// Reads courses from the REST backend.
#[derive(Clone)]
pub struct HttpCourseSource {
    client: Client,
    config: CourseApiConfig,
}

impl HttpCourseSource {
    #[must_use]
    pub fn new(config: CourseApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CourseSourceError> {
        let url = self.config.url(path);
        let mut request = self.client.get(&url).header(ACCEPT, "application/json");
        if let Some(cookie) = &self.config.session_cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(%url, %status, "course api response");
        match status {
            StatusCode::NOT_FOUND => return Err(CourseSourceError::NotFound),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(CourseSourceError::Unauthorized);
            }
            _ if !status.is_success() => return Err(CourseSourceError::HttpStatus(status)),
            _ => {}
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CourseSource for HttpCourseSource {
    async fn list_courses(&self) -> Result<Vec<CourseListing>, CourseSourceError> {
        let items: Vec<CourseListingDto> = self.get_json("courses").await?;
        Ok(items.into_iter().map(CourseListingDto::into_listing).collect())
    }

    async fn fetch_course(&self, id: CourseId) -> Result<Course, CourseSourceError> {
        let value: Value = self.get_json(&format!("courses/{id}")).await?;
        course_from_json(value)
    }
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// Fixed set of courses, for tests and offline demo runs.
#[derive(Clone, Default)]
pub struct InMemoryCourseSource {
    courses: BTreeMap<CourseId, Course>,
}

impl InMemoryCourseSource {
    #[must_use]
    pub fn new(courses: impl IntoIterator<Item = Course>) -> Self {
        Self {
            courses: courses.into_iter().map(|course| (course.id(), course)).collect(),
        }
    }

    /// A single bundled course with every lesson kind and quiz payload shape.
    #[must_use]
    pub fn demo() -> Self {
        Self::new([demo_course()])
    }
}

#[async_trait]
impl CourseSource for InMemoryCourseSource {
    async fn list_courses(&self) -> Result<Vec<CourseListing>, CourseSourceError> {
        Ok(self
            .courses
            .values()
            .map(|course| CourseListing {
                id: course.id(),
                title: course.title().to_owned(),
                description: course.description().map(str::to_owned),
            })
            .collect())
    }

    async fn fetch_course(&self, id: CourseId) -> Result<Course, CourseSourceError> {
        self.courses
            .get(&id)
            .cloned()
            .ok_or(CourseSourceError::NotFound)
    }
}

//
// ─── WIRE FORMAT ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseListingDto {
    id: u64,
    title: String,
    #[serde(default)]
    description: Option<String>,
}

impl CourseListingDto {
    fn into_listing(self) -> CourseListing {
        CourseListing {
            id: CourseId::new(self.id),
            title: self.title,
            description: self.description,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseDto {
    id: u64,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    modules: Vec<ModuleDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModuleDto {
    id: u64,
    title: String,
    #[serde(default, alias = "order", alias = "moduleOrder")]
    position: Option<u32>,
    #[serde(default)]
    lessons: Vec<LessonDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LessonDto {
    id: u64,
    title: String,
    #[serde(default, alias = "order", alias = "lessonOrder")]
    position: Option<u32>,
    #[serde(rename = "type", alias = "lessonType", alias = "kind")]
    kind: String,
    #[serde(default)]
    content: Option<Value>,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default, alias = "questions")]
    quiz: Option<QuizContent>,
}

fn position_or(position: Option<u32>, index: usize) -> u32 {
    position.unwrap_or_else(|| u32::try_from(index).unwrap_or(u32::MAX))
}

impl LessonDto {
    fn into_lesson(self, index: usize) -> Lesson {
        let kind = LessonKind::from_tag(&self.kind).unwrap_or_else(|| {
            tracing::warn!(lesson = self.id, tag = %self.kind, "unknown lesson type, showing as text");
            LessonKind::Text
        });

        let (body, quiz) = match (kind, self.content) {
            (LessonKind::Quiz, content) => {
                let from_content = content.map(|value| match value {
                    Value::String(raw) => QuizContent::Raw(raw),
                    other => QuizContent::Structured(other),
                });
                (None, self.quiz.or(from_content))
            }
            (_, Some(Value::String(text))) => (Some(text), self.quiz),
            (_, Some(Value::Null) | None) => (None, self.quiz),
            (_, Some(other)) => (Some(other.to_string()), self.quiz),
        };

        Lesson {
            id: LessonId::new(self.id),
            title: self.title,
            position: position_or(self.position, index),
            kind,
            body,
            video_url: self.video_url,
            quiz,
        }
    }
}

impl ModuleDto {
    fn into_module(self, index: usize) -> CourseModule {
        CourseModule {
            id: ModuleId::new(self.id),
            title: self.title,
            position: position_or(self.position, index),
            lessons: self
                .lessons
                .into_iter()
                .enumerate()
                .map(|(i, lesson)| lesson.into_lesson(i))
                .collect(),
        }
    }
}

/// Decode a course outline as served by `GET /courses/{id}`.
///
/// # Errors
///
/// Returns `CourseSourceError::Decode` when the payload is not a course.
pub fn course_from_json(value: Value) -> Result<Course, CourseSourceError> {
    let dto: CourseDto =
        serde_json::from_value(value).map_err(|e| CourseSourceError::Decode(e.to_string()))?;
    let modules = dto
        .modules
        .into_iter()
        .enumerate()
        .map(|(i, module)| module.into_module(i))
        .collect();
    Ok(Course::new(
        CourseId::new(dto.id),
        dto.title,
        dto.description,
        modules,
    ))
}

//
// ─── DEMO CONTENT ──────────────────────────────────────────────────────────────
//

/// # Panics
///
/// Panics if the bundled demo JSON is malformed.
#[must_use]
pub fn demo_course() -> Course {
    let value = serde_json::json!({
        "id": 1,
        "title": "Rust Foundations",
        "description": "Ownership, borrowing and the type system in small steps.",
        "modules": [
            {
                "id": 10,
                "title": "Getting started",
                "order": 0,
                "lessons": [
                    {
                        "id": 100,
                        "title": "Why Rust?",
                        "type": "VIDEO",
                        "videoUrl": "https://example.com/videos/why-rust.mp4",
                        "content": "A short tour of **memory safety** without a garbage collector."
                    },
                    {
                        "id": 101,
                        "title": "Bindings and mutability",
                        "type": "TEXT",
                        "content": "Bindings are immutable by default. Use `let mut` to opt in to mutation."
                    },
                    {
                        "id": 102,
                        "title": "Check your understanding",
                        "type": "QUIZ",
                        "content": [
                            {
                                "questionNumber": 1,
                                "questionText": "Which keyword makes a binding mutable?",
                                "options": ["var", "mut", "let", "static"],
                                "correctOptionIndex": 1,
                                "explanation": "`let mut x = 1;` declares a mutable binding."
                            },
                            {
                                "questionNumber": 2,
                                "questionText": "Bindings are mutable by default.",
                                "options": ["True", "False"],
                                "correctOptionIndex": 1
                            }
                        ]
                    }
                ]
            },
            {
                "id": 20,
                "title": "Ownership",
                "order": 1,
                "lessons": [
                    {
                        "id": 200,
                        "title": "Moves and borrows",
                        "type": "TEXT",
                        "content": "Every value has a single owner. Borrowing lends access without moving."
                    },
                    {
                        "id": 201,
                        "title": "Ownership quiz",
                        "type": "QUIZ",
                        "content": "1. What happens to a `String` after it is moved?\nA) It is copied\nB) The old binding can no longer be used\nAnswer: B\nExplanation: Moves transfer ownership.\n2. How many mutable borrows may exist at once?\nA) One\nB) Unlimited\nAnswer: A"
                    },
                    {
                        "id": 202,
                        "title": "Lifetimes quiz",
                        "type": "QUIZ",
                        "content": "Quiz will be published after the lifetimes module."
                    }
                ]
            }
        ]
    });
    course_from_json(value).expect("demo course should decode")
}
