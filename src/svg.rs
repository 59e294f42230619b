use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

use crate::config::StatsConfig;
use crate::display::DisplaySurface;
use crate::stats::StatKey;
use crate::theme::Theme;

const START_Y: i32 = 30;
const LINE_HEIGHT: i32 = 20;
const LEFT_PADDING: f32 = 15.0;
const RIGHT_PADDING: f32 = 30.0;
const CHAR_WIDTH: f32 = 9.6;
const MIN_ROW_CHARS: usize = 36;

// Utilities for building SVG content

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Leader dots between a `Label: ` and its value so the row spans `width` chars.
fn dot_fill(label: &str, value: &str, width: usize) -> String {
    match width.saturating_sub(label.len() + 2 + value.len()) {
        0 => String::new(),
        1 => " ".to_string(),
        2 => ". ".to_string(),
        n => ".".repeat(n),
    }
}

fn build_header_line(label: &str, align_width: usize) -> String {
    let base = format!("{label} ");
    let dash_count = align_width.saturating_sub(base.len()) + 2;
    format!("{base}{}", "-".repeat(dash_count))
}

/// Stats card that doubles as a display surface.
///
/// Elements are the configured stat ids; the card itself is the stats region.
pub struct SvgCard {
    identity: String,
    region_class: String,
    rows: Vec<(StatKey, String)>,
    texts: Mutex<BTreeMap<String, String>>,
}

impl SvgCard {
    pub fn new(identity: &str, config: &StatsConfig) -> Self {
        let rows: Vec<(StatKey, String)> = StatKey::ALL
            .iter()
            .map(|k| (*k, config.element_keys.id(*k).to_string()))
            .collect();
        let texts = rows
            .iter()
            .map(|(_, id)| (id.clone(), "0".to_string()))
            .collect();

        Self {
            identity: identity.to_string(),
            region_class: config.region_class.clone(),
            rows,
            texts: Mutex::new(texts),
        }
    }

    pub fn to_svg(&self, theme: Theme, generated_at: DateTime<Utc>) -> String {
        let colors = theme.colors();
        let texts = self
            .texts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let header = format!("{}@github", self.identity);
        let footer = format!("updated {}", generated_at.format("%Y-%m-%d %H:%M UTC"));

        let align_width = self
            .rows
            .iter()
            .map(|(key, id)| key.label().len() + 2 + texts.get(id).map_or(0, String::len))
            .chain([header.len() + 1, footer.len()])
            .max()
            .unwrap_or(0)
            .max(MIN_ROW_CHARS);

        let mut tspans = String::new();
        let mut y = START_Y;

        tspans.push_str(&format!(
            "<tspan x=\"{LEFT_PADDING}\" y=\"{y}\">{}</tspan>\n",
            escape_xml(&build_header_line(&header, align_width))
        ));

        for (key, id) in &self.rows {
            y += LINE_HEIGHT;
            let label = key.label();
            let value = texts.get(id).map(String::as_str).unwrap_or_default();
            let dots = dot_fill(label, value, align_width);
            tspans.push_str(&format!(
                concat!(
                    r#"<tspan x="{x}" y="{y}" class="cc">. </tspan>"#,
                    r#"<tspan class="key">{label}: </tspan>"#,
                    r#"<tspan class="cc">{dots}</tspan>"#,
                    r#"<tspan class="value" id="{id}">{value}</tspan>"#,
                    "\n"
                ),
                x = LEFT_PADDING,
                y = y,
                label = escape_xml(label),
                dots = dots,
                id = escape_xml(id),
                value = escape_xml(value),
            ));
        }

        y += LINE_HEIGHT * 2;
        tspans.push_str(&format!(
            "<tspan x=\"{LEFT_PADDING}\" y=\"{y}\" class=\"cc\">{}</tspan>\n",
            escape_xml(&footer)
        ));

        let w = LEFT_PADDING + (align_width as f32 + 2.0) * CHAR_WIDTH + RIGHT_PADDING;
        let h = y as f32 + START_Y as f32;

        format!(
            r#"<?xml version='1.0' encoding='UTF-8'?>
<svg xmlns="http://www.w3.org/2000/svg"
     width="{w}px" height="{h}px"
     font-family="ConsolasFallback,Consolas,monospace"
     font-size="16px">

<style>
.key      {{ fill: {key}; }}
.value    {{ fill: {value}; }}
.cc       {{ fill: {cc}; }}
</style>

<rect width="{w}px" height="{h}px" fill="{bg}" rx="15"/>

<text class="{region}" fill="{text}">
{tspans}</text>

</svg>
"#,
            bg = colors.bg,
            text = colors.text,
            key = colors.key,
            value = colors.value,
            cc = colors.cc,
            region = escape_xml(&self.region_class),
        )
    }
}

impl DisplaySurface for SvgCard {
    fn get_by_id(&self, id: &str) -> Option<String> {
        self.texts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn set_text(&self, id: &str, text: &str) {
        let mut texts = self.texts.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = texts.get_mut(id) {
            *slot = text.to_string();
        }
    }

    fn contains_region(&self, class: &str) -> bool {
        self.region_class == class
    }
}
