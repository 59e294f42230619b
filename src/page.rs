use std::sync::{Arc, Mutex, PoisonError};

use crate::acquire::{AcquisitionMode, StatsAcquisition};
use crate::config::StatsConfig;
use crate::display::DisplaySurface;
use crate::github::GithubApi;
use crate::render::{Animation, SharedRecord, StatsRenderer};
use crate::stats::StatsRecord;
use crate::trigger::VisibilityTrigger;

/// Stats section of the portfolio page.
///
/// `load` is the page-ready path and `on_intersection` the scroll-into-view
/// path. Both show the same record: whatever `load` acquired, or the
/// configured fallback while acquisition is still pending. Counters already
/// running when `load` finishes climb on to the acquired values.
pub struct StatsPage {
    acquisition: StatsAcquisition,
    renderer: StatsRenderer,
    /// `None` when the surface has no stats region to observe.
    trigger: Mutex<Option<VisibilityTrigger>>,
    record: Arc<SharedRecord>,
}

impl StatsPage {
    pub fn new(
        api: Arc<dyn GithubApi>,
        surface: Arc<dyn DisplaySurface>,
        config: Arc<StatsConfig>,
        mode: AcquisitionMode,
    ) -> Self {
        let trigger = if surface.contains_region(&config.region_class) {
            Some(VisibilityTrigger::new())
        } else {
            log::debug!(
                "no '{}' region, counter animation will not run",
                config.region_class
            );
            None
        };

        Self {
            acquisition: StatsAcquisition::new(api, Arc::clone(&config), mode),
            renderer: StatsRenderer::new(surface, Arc::clone(&config)),
            trigger: Mutex::new(trigger),
            record: Arc::new(SharedRecord::new(config.fallback_record)),
        }
    }

    /// Acquire the record and make it the shared one. Elements without a
    /// running counter get the value written directly.
    pub async fn load(&self, identity: &str) -> StatsRecord {
        let record = self.acquisition.acquire(identity).await;
        self.renderer.publish(&self.record, &record);
        log::info!(
            "stats for '{identity}': {} repos, {} commits, {} stars, {} followers",
            record.repos,
            record.commits,
            record.stars,
            record.followers
        );
        record
    }

    pub fn current_record(&self) -> StatsRecord {
        self.record.get()
    }

    /// Feed a visibility change of the stats region. Starts the counter
    /// animation the first time the region becomes visible.
    pub fn on_intersection(&self, intersecting: bool) -> Option<Animation> {
        let fired = self
            .trigger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
            .is_some_and(|t| t.observe(intersecting));
        if !fired {
            return None;
        }

        log::debug!("stats region visible, animating counters");
        Some(self.renderer.animate(Arc::clone(&self.record)))
    }
}
