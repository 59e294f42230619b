//! Settings shared by acquisition, rendering and the visibility trigger.

use std::time::Duration;

use crate::stats::{StatKey, StatsRecord};

/// Numbers shown when the live GitHub lookup is disabled or fails.
pub const DEMO_RECORD: StatsRecord = StatsRecord {
    repos: 25,
    commits: 450,
    stars: 89,
    followers: 32,
};

pub const GITHUB_API: &str = "https://api.github.com";

/// Element ids the renderer writes to, one per stat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementKeys {
    pub repos: String,
    pub commits: String,
    pub stars: String,
    pub followers: String,
}

impl Default for ElementKeys {
    fn default() -> Self {
        Self {
            repos: StatKey::Repos.as_str().to_string(),
            commits: StatKey::Commits.as_str().to_string(),
            stars: StatKey::Stars.as_str().to_string(),
            followers: StatKey::Followers.as_str().to_string(),
        }
    }
}

impl ElementKeys {
    pub fn id(&self, key: StatKey) -> &str {
        match key {
            StatKey::Repos => &self.repos,
            StatKey::Commits => &self.commits,
            StatKey::Stars => &self.stars,
            StatKey::Followers => &self.followers,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatsConfig {
    pub element_keys: ElementKeys,
    /// Class of the region whose visibility starts the counter animation.
    pub region_class: String,
    pub fallback_record: StatsRecord,
    pub fallback_delay: Duration,
    pub animation_duration: Duration,
    pub frame_interval: Duration,
    /// How many repositories are sampled when estimating commit totals.
    pub commit_sample_limit: usize,
    pub api_base: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            element_keys: ElementKeys::default(),
            region_class: "github-stats".to_string(),
            fallback_record: DEMO_RECORD,
            fallback_delay: Duration::from_millis(1000),
            animation_duration: Duration::from_millis(1500),
            frame_interval: Duration::from_millis(16),
            commit_sample_limit: 10,
            api_base: GITHUB_API.to_string(),
        }
    }
}

impl StatsConfig {
    /// Number of animation frames a counter takes to reach its target.
    pub fn frames_per_animation(&self) -> f64 {
        let frame = self.frame_interval.as_secs_f64();
        if frame <= 0.0 {
            return 1.0;
        }
        (self.animation_duration.as_secs_f64() / frame).max(1.0)
    }
}
