//! Resolves the stats record for a GitHub login.
//!
//! Acquisition never fails from the caller's point of view: whatever happens
//! on the live path, the result is a record that can be displayed.

use std::sync::Arc;

use tokio::time::sleep;

use crate::config::StatsConfig;
use crate::error::FetchError;
use crate::github::{GithubApi, GithubRepo};
use crate::stats::StatsRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquisitionMode {
    /// Live lookup disabled; the fallback record is served after a short delay.
    #[default]
    Demo,
    Live,
}

#[derive(Clone)]
pub struct StatsAcquisition {
    api: Arc<dyn GithubApi>,
    config: Arc<StatsConfig>,
    mode: AcquisitionMode,
}

impl StatsAcquisition {
    pub fn new(api: Arc<dyn GithubApi>, config: Arc<StatsConfig>, mode: AcquisitionMode) -> Self {
        Self { api, config, mode }
    }

    pub fn mode(&self) -> AcquisitionMode {
        self.mode
    }

    pub async fn acquire(&self, identity: &str) -> StatsRecord {
        match self.mode {
            AcquisitionMode::Demo => {
                log::info!("GitHub lookup for '{identity}' disabled, serving demo stats");
                sleep(self.config.fallback_delay).await;
                self.config.fallback_record
            }
            AcquisitionMode::Live => match self.fetch(identity).await {
                Ok(record) => record,
                Err(e) => {
                    log::error!("GitHub lookup for '{identity}' failed: {e}");
                    self.config.fallback_record
                }
            },
        }
    }

    /// Live lookup: profile and repository list concurrently, then commit totals.
    pub async fn fetch(&self, identity: &str) -> Result<StatsRecord, FetchError> {
        let (user, repos) = tokio::try_join!(self.api.user(identity), self.api.repos(identity))?;

        let stars = repos
            .iter()
            .fold(0u32, |acc, r| acc.saturating_add(r.stargazers_count));
        let commits = self.total_commits(identity, &repos).await;

        Ok(StatsRecord {
            repos: user.public_repos,
            commits,
            stars,
            followers: user.followers,
        })
    }

    /// Approximate commit total from the first few repositories.
    ///
    /// A repository whose request fails adds nothing; the rest are still counted.
    pub async fn total_commits(&self, identity: &str, repos: &[GithubRepo]) -> u32 {
        let mut total = 0u32;

        for repo in repos.iter().take(self.config.commit_sample_limit) {
            match self.api.commit_pages(identity, &repo.name).await {
                Ok(Some(pages)) => {
                    let pages = u32::try_from(pages).unwrap_or(u32::MAX);
                    total = total.saturating_add(pages);
                }
                Ok(None) => {
                    log::debug!("no commit pagination for {identity}/{}", repo.name);
                }
                Err(e) => {
                    log::warn!("failed to count commits for {identity}/{}: {e}", repo.name);
                }
            }
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEMO_RECORD;
    use crate::github::GithubUser;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    #[derive(Default)]
    struct FakeApi {
        user: Option<GithubUser>,
        repos: Vec<GithubRepo>,
        pages: HashMap<String, u64>,
        failing: Vec<String>,
        commit_calls: Mutex<Vec<String>>,
    }

    fn fail(url: &str) -> FetchError {
        FetchError::Status {
            url: url.to_string(),
            status: 500,
        }
    }

    #[async_trait]
    impl GithubApi for FakeApi {
        async fn user(&self, _login: &str) -> Result<GithubUser, FetchError> {
            self.user.clone().ok_or_else(|| fail("/users"))
        }

        async fn repos(&self, _login: &str) -> Result<Vec<GithubRepo>, FetchError> {
            Ok(self.repos.clone())
        }

        async fn commit_pages(&self, _owner: &str, repo: &str) -> Result<Option<u64>, FetchError> {
            self.commit_calls.lock().unwrap().push(repo.to_string());
            if self.failing.iter().any(|r| r == repo) {
                return Err(fail(repo));
            }
            Ok(self.pages.get(repo).copied())
        }
    }

    fn repo(name: &str, stars: u32) -> GithubRepo {
        GithubRepo {
            name: name.to_string(),
            stargazers_count: stars,
        }
    }

    fn acquisition(api: FakeApi, mode: AcquisitionMode) -> StatsAcquisition {
        StatsAcquisition::new(Arc::new(api), Arc::new(StatsConfig::default()), mode)
    }

    #[tokio::test(start_paused = true)]
    async fn demo_mode_waits_then_returns_fallback() {
        let acq = acquisition(FakeApi::default(), AcquisitionMode::Demo);

        let started = Instant::now();
        let record = acq.acquire("someone").await;

        assert_eq!(record, DEMO_RECORD);
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn live_mode_derives_record_from_profile_and_repos() {
        let api = FakeApi {
            user: Some(GithubUser {
                login: "octo".to_string(),
                public_repos: 3,
                followers: 11,
            }),
            repos: vec![repo("a", 5), repo("b", 0), repo("c", 7)],
            pages: HashMap::from([("a".to_string(), 40), ("c".to_string(), 2)]),
            ..FakeApi::default()
        };

        let record = acquisition(api, AcquisitionMode::Live).acquire("octo").await;
        assert_eq!(
            record,
            StatsRecord {
                repos: 3,
                commits: 42,
                stars: 12,
                followers: 11,
            }
        );
    }

    #[tokio::test]
    async fn live_failure_falls_back_without_delay() {
        let acq = acquisition(FakeApi::default(), AcquisitionMode::Live);
        assert!(acq.fetch("ghost").await.is_err());
        assert_eq!(acq.acquire("ghost").await, DEMO_RECORD);
    }

    #[tokio::test]
    async fn failing_repository_is_excluded_from_commit_total() {
        let repos: Vec<GithubRepo> = (1..=10).map(|i| repo(&format!("r{i}"), 0)).collect();
        let api = FakeApi {
            pages: (1..=10).map(|i| (format!("r{i}"), i as u64 * 10)).collect(),
            failing: vec!["r7".to_string()],
            ..FakeApi::default()
        };
        let acq = acquisition(api, AcquisitionMode::Live);

        let total = acq.total_commits("octo", &repos).await;

        // 10 + 20 + ... + 100 = 550, minus r7's 70.
        assert_eq!(total, 480);
    }

    #[tokio::test]
    async fn only_the_first_ten_repositories_are_sampled() {
        let repos: Vec<GithubRepo> = (1..=15).map(|i| repo(&format!("r{i}"), 0)).collect();
        let api = Arc::new(FakeApi {
            pages: (1..=15).map(|i| (format!("r{i}"), 1)).collect(),
            ..FakeApi::default()
        });
        let acq = StatsAcquisition::new(
            api.clone(),
            Arc::new(StatsConfig::default()),
            AcquisitionMode::Live,
        );

        assert_eq!(acq.total_commits("octo", &repos).await, 10);
        let calls = api.commit_calls.lock().unwrap().clone();
        assert_eq!(calls.first().map(String::as_str), Some("r1"));
        assert_eq!(calls.last().map(String::as_str), Some("r10"));
    }

    #[tokio::test]
    async fn star_sum_saturates_instead_of_overflowing() {
        let api = FakeApi {
            user: Some(GithubUser {
                login: "big".to_string(),
                public_repos: 2,
                followers: 0,
            }),
            repos: vec![repo("x", u32::MAX), repo("y", 10)],
            ..FakeApi::default()
        };
        let record = acquisition(api, AcquisitionMode::Live)
            .fetch("big")
            .await
            .unwrap();
        assert_eq!(record.stars, u32::MAX);
        assert_eq!(record.commits, 0);
    }
}
