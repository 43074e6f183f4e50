//! Draft state for the "write post" form and its submission state machine.
//!
//! # Design
//! `Draft` is a plain value. Each field has a pure update function that
//! consumes the draft and returns the updated one, so a view never aliases
//! or partially mutates it. `CreateForm` pairs the draft with a
//! `SubmitStatus` and walks `Idle -> Submitting -> Idle`; the network call
//! itself happens between `begin_submit` and `finish`, owned by the caller.

use std::str::FromStr;

use thiserror::Error;

use crate::error::TransportError;
use crate::types::{NewPost, Post};

/// Cover image every fresh draft starts with.
pub const DEFAULT_COVER_IMAGE: &str =
    "https://images.pexels.com/photos/262508/pexels-photo-262508.jpeg";

/// Form fields, named as they appear in the HTML form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Description,
    Category,
    Content,
    CoverImage,
}

impl DraftField {
    pub const REQUIRED: [DraftField; 4] = [
        DraftField::Title,
        DraftField::Category,
        DraftField::Description,
        DraftField::Content,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DraftField::Title => "title",
            DraftField::Description => "description",
            DraftField::Category => "category",
            DraftField::Content => "content",
            DraftField::CoverImage => "coverImage",
        }
    }
}

impl FromStr for DraftField {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(DraftField::Title),
            "description" => Ok(DraftField::Description),
            "category" => Ok(DraftField::Category),
            "content" => Ok(DraftField::Content),
            "coverImage" => Ok(DraftField::CoverImage),
            other => Err(DraftError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("{} is required", .0.name())]
    Missing(DraftField),

    #[error("category must contain at least one label")]
    NoCategories,

    #[error("unknown form field: {0}")]
    UnknownField(String),
}

/// Client-held values for a post that has not been submitted yet.
/// `category` is the raw comma-separated input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub content: String,
    pub cover_image: String,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: String::new(),
            content: String::new(),
            cover_image: DEFAULT_COVER_IMAGE.to_string(),
        }
    }
}

impl Draft {
    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self
        }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self
        }
    }

    pub fn with_category(self, category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..self
        }
    }

    pub fn with_content(self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..self
        }
    }

    pub fn with_cover_image(self, cover_image: impl Into<String>) -> Self {
        Self {
            cover_image: cover_image.into(),
            ..self
        }
    }

    pub fn apply(self, field: DraftField, value: impl Into<String>) -> Self {
        match field {
            DraftField::Title => self.with_title(value),
            DraftField::Description => self.with_description(value),
            DraftField::Category => self.with_category(value),
            DraftField::Content => self.with_content(value),
            DraftField::CoverImage => self.with_cover_image(value),
        }
    }

    pub fn value(&self, field: DraftField) -> &str {
        match field {
            DraftField::Title => &self.title,
            DraftField::Description => &self.description,
            DraftField::Category => &self.category,
            DraftField::Content => &self.content,
            DraftField::CoverImage => &self.cover_image,
        }
    }

    /// Validate the draft and turn it into a creation payload.
    pub fn to_new_post(&self) -> Result<NewPost, DraftError> {
        if let Some(field) = DraftField::REQUIRED
            .into_iter()
            .find(|field| self.value(*field).trim().is_empty())
        {
            return Err(DraftError::Missing(field));
        }
        let category = split_categories(&self.category);
        if category.is_empty() {
            return Err(DraftError::NoCategories);
        }
        Ok(NewPost {
            title: self.title.clone(),
            description: self.description.clone(),
            category,
            content: self.content.clone(),
            cover_image: self.cover_image.clone(),
        })
    }
}

/// Split comma-separated labels, trimming each and dropping empty segments.
pub fn split_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a submission is already in progress")]
    InFlight,

    #[error(transparent)]
    Invalid(#[from] DraftError),
}

/// User-facing result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Created(Post),
    Failed(String),
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::Created(_) => "Post created successfully!".to_string(),
            Notice::Failed(reason) => format!("Error creating post: {reason}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub draft: Draft,
    pub status: SubmitStatus,
}

impl CreateForm {
    pub fn is_submitting(&self) -> bool {
        self.status == SubmitStatus::Submitting
    }

    /// Replace the draft through one of its update functions.
    pub fn update(&mut self, f: impl FnOnce(Draft) -> Draft) {
        self.draft = f(std::mem::take(&mut self.draft));
    }

    /// `Idle -> Submitting`. Fails without changing state when a submission
    /// is already running or the draft does not validate.
    pub fn begin_submit(&mut self) -> Result<NewPost, SubmitError> {
        if self.is_submitting() {
            return Err(SubmitError::InFlight);
        }
        let post = self.draft.to_new_post()?;
        self.status = SubmitStatus::Submitting;
        Ok(post)
    }

    /// `Submitting -> Idle`. Success resets the draft; failure keeps it so the
    /// user can resubmit.
    pub fn finish(&mut self, result: Result<Post, TransportError>) -> Notice {
        self.status = SubmitStatus::Idle;
        match result {
            Ok(post) => {
                self.draft = Draft::default();
                Notice::Created(post)
            }
            Err(err) => Notice::Failed(err.to_string()),
        }
    }
}
