//! The fixed catalog of prompt categories.

use serde::{Deserialize, Serialize};

/// Placeholder shown in the keyword input when no category is selected
pub const DEFAULT_PLACEHOLDER: &str =
    "Enter keywords for any task, or select a category for inspiration...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryId {
    VibeCoding,
    ProjectCreation,
    ContentWriting,
    ImageGen,
    ScriptWriting,
}

impl CategoryId {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryId::VibeCoding => "vibe-coding",
            CategoryId::ProjectCreation => "project-creation",
            CategoryId::ContentWriting => "content-writing",
            CategoryId::ImageGen => "image-gen",
            CategoryId::ScriptWriting => "script-writing",
        }
    }

    /// Accepts the kebab-case id, the snake/screaming case id, or the display name
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == '_' || c == ' ' { '-' } else { c.to_ascii_lowercase() })
            .collect();
        CATEGORIES
            .iter()
            .map(|c| c.id)
            .find(|id| id.as_str() == normalized)
    }

    pub fn all() -> Vec<CategoryId> {
        CATEGORIES.iter().map(|c| c.id).collect()
    }

    pub fn category(&self) -> &'static Category {
        // The catalog holds exactly one entry per variant
        match self {
            CategoryId::VibeCoding => &CATEGORIES[0],
            CategoryId::ProjectCreation => &CATEGORIES[1],
            CategoryId::ContentWriting => &CATEGORIES[2],
            CategoryId::ImageGen => &CATEGORIES[3],
            CategoryId::ScriptWriting => &CATEGORIES[4],
        }
    }
}

/// A task domain used to bias the system instruction and the input placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: &'static str,
    /// Shown in listings only; never sent to the provider
    pub description: &'static str,
    pub placeholder: &'static str,
}

pub static CATEGORIES: [Category; 5] = [
    Category {
        id: CategoryId::VibeCoding,
        name: "Vibe Coding",
        description: "Generate code snippets with a specific style or purpose.",
        placeholder: "e.g., a retro-style login form component using React and Tailwind CSS, functional component with hooks...",
    },
    Category {
        id: CategoryId::ProjectCreation,
        name: "Project Creation",
        description: "Brainstorm and structure new project ideas.",
        placeholder: "e.g., a task management app for freelance designers, main features, tech stack ideas...",
    },
    Category {
        id: CategoryId::ContentWriting,
        name: "Content Writing",
        description: "Craft articles, blog posts, or social media content.",
        placeholder: "e.g., a blog post about the benefits of remote work, target audience: tech startups, tone: informative but witty...",
    },
    Category {
        id: CategoryId::ImageGen,
        name: "Image Gen",
        description: "Create detailed prompts for image generation models.",
        placeholder: "e.g., a cyberpunk city at night, raining, neon signs, high detail, photorealistic, 8k...",
    },
    Category {
        id: CategoryId::ScriptWriting,
        name: "Script Writing",
        description: "Develop scripts for videos, podcasts, or plays.",
        placeholder: "e.g., a 5-minute YouTube video script explaining quantum computing to beginners, simple analogies, engaging visuals...",
    },
];
