use crate::models::{Story, StoryBatch};

const PRESETS: &[(&str, &[&str])] = &[
    (
        "ADAS / Autonomous Driving",
        &["ADAS", "autonomous", "self-driving", "autopilot", "FSD", "lidar", "radar", "vehicle"],
    ),
    (
        "AI / Machine Learning",
        &[
            "AI", "ML", "machine learning", "GPT", "LLM", "neural", "model", "training", "Claude", "OpenAI",
        ],
    ),
    (
        "Startups / Funding",
        &["startup", "YC", "funding", "Series A", "raised", "venture", "VC", "investment"],
    ),
    (
        "Programming Languages",
        &["Python", "Rust", "Go", "JavaScript", "TypeScript", "C++", "Java"],
    ),
    (
        "Security / Privacy",
        &["security", "privacy", "breach", "hack", "vulnerability", "encryption", "exploit"],
    ),
    (
        "Hardware / Chips",
        &["chip", "processor", "GPU", "CPU", "semiconductor", "hardware", "NVIDIA", "AMD", "Intel"],
    ),
    (
        "Web Development",
        &["web", "frontend", "backend", "React", "Vue", "Next.js", "framework", "API"],
    ),
];

/// A named keyword set used to narrow a batch down to one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub name: String,
    pub keywords: Vec<String>,
}

impl Topic {
    pub fn custom(name: impl Into<String>, keywords: impl IntoIterator<Item = String>) -> Self {
        Self {
            name: name.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn presets() -> Vec<Topic> {
        PRESETS
            .iter()
            .map(|(name, keywords)| Topic {
                name: name.to_string(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            })
            .collect()
    }

    /// Resolves a preset by its 1-based number or by a case-insensitive
    /// prefix of its name ("ai", "security").
    pub fn preset(selector: &str) -> Option<Topic> {
        let selector = selector.trim();
        if selector.is_empty() {
            return None;
        }
        let presets = Self::presets();
        if let Ok(number) = selector.parse::<usize>() {
            return number.checked_sub(1).and_then(|i| presets.get(i).cloned());
        }
        let wanted = selector.to_lowercase();
        presets
            .into_iter()
            .find(|topic| topic.name.to_lowercase().starts_with(&wanted))
    }

    /// True when any keyword occurs anywhere in the title, ignoring case.
    pub fn matches(&self, story: &Story) -> bool {
        let title = story.title.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| title.contains(&keyword.to_lowercase()))
    }

    pub fn filter(&self, batch: StoryBatch) -> StoryBatch {
        batch.retain(|story| self.matches(story))
    }
}
