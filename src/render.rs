use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::config::StatsConfig;
use crate::display::DisplaySurface;
use crate::stats::{StatKey, StatsRecord};

/// Counter that climbs from 0 to `target` in equal increments.
///
/// Each [`tick`](CountUp::tick) yields the value to display, floored. The last
/// tick is clamped to exactly `target`; after that the counter is done.
#[derive(Debug, Clone)]
pub struct CountUp {
    target: u32,
    frames: f64,
    ticks: u32,
    increment: f64,
    current: f64,
    done: bool,
}

impl CountUp {
    pub fn new(target: u32, frames: f64) -> Self {
        let frames = frames.max(1.0);
        Self {
            target,
            frames,
            ticks: 0,
            increment: f64::from(target) / frames,
            current: 0.0,
            done: false,
        }
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Aim at a new target from the current position, finishing on the
    /// original schedule. A target at or below the current value is shown on
    /// the next tick.
    pub fn retarget(&mut self, target: u32) {
        if target == self.target {
            return;
        }

        self.target = target;
        self.done = false;
        let goal = f64::from(target);
        if goal <= self.current {
            self.current = goal;
            self.increment = 0.0;
        } else {
            let remaining = (self.frames - f64::from(self.ticks)).max(1.0);
            self.increment = (goal - self.current) / remaining;
        }
    }

    pub fn tick(&mut self) -> Option<u32> {
        if self.done {
            return None;
        }

        self.ticks = self.ticks.saturating_add(1);
        self.current += self.increment;
        if self.current >= f64::from(self.target) {
            self.current = f64::from(self.target);
            self.done = true;
        }

        Some(self.current.floor() as u32)
    }
}

#[derive(Debug)]
struct SharedState {
    record: StatsRecord,
    version: u64,
    animating: HashSet<StatKey>,
}

/// The record both render paths show.
///
/// Running counters follow updates to it, so a record published mid-animation
/// becomes the counters' new target instead of being overwritten by them.
#[derive(Debug)]
pub struct SharedRecord {
    state: Mutex<SharedState>,
}

impl SharedRecord {
    pub fn new(record: StatsRecord) -> Self {
        Self {
            state: Mutex::new(SharedState {
                record,
                version: 0,
                animating: HashSet::new(),
            }),
        }
    }

    pub fn get(&self) -> StatsRecord {
        self.lock().record
    }

    /// Whether a counter for `key` is still running.
    pub fn is_animating(&self, key: StatKey) -> bool {
        self.lock().animating.contains(&key)
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to the counter tasks started by [`StatsRenderer::animate`].
///
/// Dropping it leaves the tasks running.
pub struct Animation {
    tasks: JoinSet<()>,
}

impl Animation {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every counter to reach its target.
    pub async fn finished(mut self) {
        while let Some(res) = self.tasks.join_next().await {
            if let Err(e) = res {
                log::warn!("counter task ended abnormally: {e}");
            }
        }
    }
}

impl Drop for Animation {
    fn drop(&mut self) {
        self.tasks.detach_all();
    }
}

#[derive(Clone)]
pub struct StatsRenderer {
    surface: Arc<dyn DisplaySurface>,
    config: Arc<StatsConfig>,
}

impl StatsRenderer {
    pub fn new(surface: Arc<dyn DisplaySurface>, config: Arc<StatsConfig>) -> Self {
        Self { surface, config }
    }

    /// Write each value into its element as-is. Missing elements are skipped.
    pub fn render(&self, record: &StatsRecord) {
        for key in StatKey::ALL {
            self.write_value(key, record);
        }
    }

    /// Replace the shared record. Elements with a running counter are left to
    /// the counter, which now climbs to the new value; the rest are written
    /// directly.
    pub fn publish(&self, shared: &SharedRecord, record: &StatsRecord) {
        let mut state = shared.lock();
        state.record = *record;
        state.version += 1;

        for key in StatKey::ALL {
            if state.animating.contains(&key) {
                log::debug!("{} counter running, retargeting it", key.as_str());
                continue;
            }
            self.write_value(key, record);
        }
    }

    /// Animate a fixed record. Must be called inside a Tokio runtime.
    pub fn render_animated(&self, record: &StatsRecord) -> Animation {
        self.animate(Arc::new(SharedRecord::new(*record)))
    }

    /// Start one counter per present element, each following `shared`.
    /// Must be called inside a Tokio runtime.
    pub fn animate(&self, shared: Arc<SharedRecord>) -> Animation {
        let frames = self.config.frames_per_animation();
        let frame = self.config.frame_interval.max(Duration::from_millis(1));
        let mut tasks = JoinSet::new();

        let mut state = shared.lock();
        for key in StatKey::ALL {
            let id = self.config.element_keys.id(key).to_string();
            if self.surface.get_by_id(&id).is_none() {
                log::debug!("no element '{id}', not animating {}", key.as_str());
                continue;
            }

            state.animating.insert(key);
            let counter = Counter {
                key,
                id,
                count: CountUp::new(state.record.get(key), frames),
                seen: state.version,
            };
            tasks.spawn(run_counter(
                counter,
                Arc::clone(&shared),
                Arc::clone(&self.surface),
                frame,
            ));
        }
        drop(state);

        log::debug!("started {} counter animation(s)", tasks.len());
        Animation { tasks }
    }

    fn write_value(&self, key: StatKey, record: &StatsRecord) {
        let id = self.config.element_keys.id(key);
        if self.surface.get_by_id(id).is_none() {
            log::debug!("no element '{id}', skipping {}", key.as_str());
            return;
        }
        self.surface.set_text(id, &record.get(key).to_string());
    }
}

struct Counter {
    key: StatKey,
    id: String,
    count: CountUp,
    /// Version of the shared record the target was taken from.
    seen: u64,
}

async fn run_counter(
    mut counter: Counter,
    shared: Arc<SharedRecord>,
    surface: Arc<dyn DisplaySurface>,
    frame: Duration,
) {
    let mut ticker = interval_at(Instant::now() + frame, frame);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        // Held while writing so `publish` never interleaves with a frame.
        let mut state = shared.lock();
        if state.version != counter.seen {
            counter.seen = state.version;
            counter.count.retarget(state.record.get(counter.key));
        }
        if let Some(value) = counter.count.tick() {
            surface.set_text(&counter.id, &value.to_string());
        }
        if counter.count.is_done() {
            state.animating.remove(&counter.key);
            break;
        }
    }
}
