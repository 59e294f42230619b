use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use folio_stats::{
    AcquisitionMode, GithubClient, StatsConfig, StatsPage, SvgCard, Theme, ThemeStore,
};
use log::info;

/// Render a GitHub stats card for a portfolio page
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GitHub login whose stats are shown
    #[arg(short, long, default_value = "yourusername")]
    user: String,

    /// Query the GitHub API instead of serving demo numbers
    #[arg(long)]
    live: bool,

    /// GitHub REST API base URL
    #[arg(long, default_value = folio_stats::config::GITHUB_API)]
    api_base: String,

    /// Optional API token
    #[arg(long, env = "ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Play the counter animation as if the stats section scrolled into view
    #[arg(long)]
    animate: bool,

    /// Directory the SVG files are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Where the theme preference is stored
    #[arg(long, default_value = "theme.json")]
    theme_file: PathBuf,

    /// Switch between dark and light before rendering
    #[arg(long)]
    toggle_theme: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level);

    let store = ThemeStore::new(&args.theme_file);
    let theme = if args.toggle_theme {
        store.toggle()?
    } else {
        store.load()?
    };

    let config = Arc::new(StatsConfig {
        api_base: args.api_base.clone(),
        ..StatsConfig::default()
    });
    let mode = if args.live {
        AcquisitionMode::Live
    } else {
        AcquisitionMode::Demo
    };
    info!("rendering stats for '{}' ({mode:?} mode)", args.user);

    let client = GithubClient::new(&config.api_base, args.token.clone())?;
    let card = Arc::new(SvgCard::new(&args.user, &config));
    let page = StatsPage::new(Arc::new(client), card.clone(), Arc::clone(&config), mode);

    page.load(&args.user).await;
    if args.animate
        && let Some(animation) = page.on_intersection(true)
    {
        animation.finished().await;
    }

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    let now = Utc::now();
    for (name, variant) in [
        ("dark_mode.svg", Theme::Dark),
        ("light_mode.svg", Theme::Light),
        ("stats.svg", theme),
    ] {
        let path = args.out_dir.join(name);
        fs::write(&path, card.to_svg(variant, now))
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    println!(
        "Generated dark_mode.svg, light_mode.svg and stats.svg ({theme}) in {}",
        args.out_dir.display()
    );

    Ok(())
}

fn init_logger(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    if let Err(e) = env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .try_init()
    {
        eprintln!("logger already initialised: {e}");
    }
}
