//! GitHub stats widget for a portfolio page.
//!
//! A [`StatsPage`] acquires a [`StatsRecord`] for a GitHub login, either live
//! through [`GithubClient`] or from the configured demo record, and renders it
//! into any [`DisplaySurface`]. The CLI uses an [`SvgCard`] surface and writes
//! the card to disk in both themes.

pub mod acquire;
pub mod config;
pub mod display;
pub mod error;
pub mod github;
pub mod page;
pub mod render;
pub mod stats;
pub mod svg;
pub mod theme;
pub mod trigger;

pub use acquire::{AcquisitionMode, StatsAcquisition};
pub use config::{DEMO_RECORD, ElementKeys, StatsConfig};
pub use display::{DisplaySurface, MemoryDom};
pub use error::FetchError;
pub use github::{GithubApi, GithubClient};
pub use page::StatsPage;
pub use render::{Animation, CountUp, StatsRenderer};
pub use stats::{StatKey, StatsRecord};
pub use svg::SvgCard;
pub use theme::{Theme, ThemeStore};
pub use trigger::{TriggerState, VisibilityTrigger};
