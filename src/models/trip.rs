use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single travel destination with ratings, comments, and
/// descriptive metadata. Persisted as one document keyed by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub attraction: String,
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub travel_days: Vec<String>,
    #[serde(default)]
    pub best_season: Vec<String>,
    #[serde(default)]
    pub rating: i32,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video_link: Option<String>,
}

impl Trip {
    pub fn new(
        attraction: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            attraction: attraction.into(),
            city: city.into(),
            country: country.into(),
            travel_days: Vec::new(),
            best_season: Vec::new(),
            rating: 0,
            comments: Vec::new(),
            tags: Vec::new(),
            description: None,
            video_link: None,
        }
    }

    pub fn add_comment(&mut self, content: impl Into<String>) {
        self.comments.push(Comment::new(content));
    }

    /// Remove the comment at a zero-based index. Returns false when the
    /// index is out of bounds, leaving the sequence untouched.
    pub fn remove_comment(&mut self, index: usize) -> bool {
        if index < self.comments.len() {
            self.comments.remove(index);
            true
        } else {
            false
        }
    }

    /// Ratings are clamped into the documented 0..=5 range.
    pub fn set_rating(&mut self, value: i32) {
        self.rating = value.clamp(0, 5);
    }

    pub fn has_description(&self) -> bool {
        self.description.is_some()
    }

    pub fn description_display(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn has_video_link(&self) -> bool {
        self.video_link.is_some()
    }

    pub fn video_link_display(&self) -> &str {
        self.video_link.as_deref().unwrap_or("")
    }
}

/// A free-text note with a server-assigned UTC timestamp,
/// formatted `YYYY-MM-DD HH:MM:SS`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub content: String,
    pub timestamp: String,
}

impl Comment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            timestamp: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
