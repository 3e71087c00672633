use eframe::egui::{self, Color32, Context, FontId, Id, Rounding, TextStyle, Visuals};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::stats::Accent;
use crate::table::BadgeTone;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_THEME: &str = "midnight";

/// Category colours shared by badges, stat cards and the activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub green: String,
    pub blue: String,
    pub amber: String,
    pub rose: String,
    pub purple: String,
    pub cyan: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            green: "#10b981".into(),
            blue: "#3b82f6".into(),
            amber: "#f59e0b".into(),
            rose: "#f43f5e".into(),
            purple: "#8b5cf6".into(),
            cyan: "#06b6d4".into(),
        }
    }
}

impl Palette {
    pub fn accent(&self, accent: Accent) -> Color32 {
        let hex = match accent {
            Accent::Blue => &self.blue,
            Accent::Purple => &self.purple,
            Accent::Emerald => &self.green,
            Accent::Amber => &self.amber,
            Accent::Rose => &self.rose,
            Accent::Cyan => &self.cyan,
        };
        parse_color(hex)
    }

    /// Translucent fill plus a text colour readable on the current panel.
    pub fn badge(&self, tone: BadgeTone, dark: bool) -> (Color32, Color32) {
        let hex = match tone {
            BadgeTone::Green => &self.green,
            BadgeTone::Blue => &self.blue,
            BadgeTone::Amber => &self.amber,
            BadgeTone::Rose => &self.rose,
            BadgeTone::Purple => &self.purple,
        };
        let [r, g, b, _] = parse_color(hex).to_array();
        let fill = Color32::from_rgba_unmultiplied(r, g, b, if dark { 40 } else { 32 });
        let text = if dark {
            Color32::from_rgb(r.saturating_add(40), g.saturating_add(40), b.saturating_add(40))
        } else {
            Color32::from_rgb(r / 2, g / 2, b / 2)
        };
        (fill, text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    pub surface: String,
    pub panel: String,
    pub text: String,
    pub muted_text: String,
    pub accent: String,
    pub accent_soft: String,
    pub border: String,
    pub radius: f32,
    pub shadow: f32,
    pub font_size_base: f32,
    #[serde(default)]
    pub palette: Palette,
}

pub fn themes_dir(base: &Path) -> PathBuf {
    base.join("themes")
}

pub fn theme_file(base: &Path) -> PathBuf {
    themes_dir(base).join("theme.json")
}

pub fn presets_file(base: &Path) -> PathBuf {
    themes_dir(base).join("presets.json")
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let contents = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!(target: "theme", "ignoring {}: {e}", path.display());
            None
        }
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> io::Result<()> {
    fs::write(path, serde_json::to_string_pretty(value)?)
}

/// Seeds `themes/` with the built-in presets and an active theme.
pub fn ensure_theme_files(base: &Path) -> io::Result<()> {
    fs::create_dir_all(themes_dir(base))?;
    let presets = presets_file(base);
    if !presets.exists() {
        write_json(&presets, &default_presets())?;
    }
    let active = theme_file(base);
    if !active.exists() {
        write_json(&active, &midnight())?;
    }
    Ok(())
}

pub fn load_presets(base: &Path) -> Vec<ThemeConfig> {
    read_json::<Vec<ThemeConfig>>(&presets_file(base))
        .filter(|list| !list.is_empty())
        .unwrap_or_else(default_presets)
}

/// A named preset wins, then the saved active theme, then the default preset.
pub fn load_theme(base: &Path, preferred: Option<&str>) -> ThemeConfig {
    let presets = load_presets(base);
    let named = |name: &str| presets.iter().find(|p| p.name == name).cloned();
    preferred
        .and_then(named)
        .or_else(|| read_json(&theme_file(base)))
        .or_else(|| named(DEFAULT_THEME))
        .unwrap_or_else(midnight)
}

pub fn save_theme(base: &Path, theme: &ThemeConfig) -> io::Result<()> {
    write_json(&theme_file(base), theme)
}

fn palette_id() -> Id {
    Id::new("mentorai_palette")
}

/// Palette of the theme last passed to `apply_theme`.
pub fn active_palette(ctx: &Context) -> Palette {
    ctx.data_mut(|d| d.get_temp::<Palette>(palette_id()))
        .unwrap_or_default()
}

pub fn apply_theme(theme: &ThemeConfig, ctx: &Context) {
    let text = parse_color(&theme.text);
    let surface = parse_color(&theme.surface);
    let accent = parse_color(&theme.accent);
    let soft = parse_color(&theme.accent_soft);
    let border = parse_color(&theme.border);
    let rounding = Rounding::same(theme.radius);

    let mut visuals = if is_dark(theme) {
        Visuals::dark()
    } else {
        Visuals::light()
    };
    visuals.panel_fill = parse_color(&theme.panel);
    visuals.faint_bg_color = surface;
    visuals.selection.bg_fill = soft;
    visuals.selection.stroke.color = accent;
    visuals.window_rounding = rounding;

    let w = &mut visuals.widgets;
    for (state, fill, stroke) in [
        (&mut w.noninteractive, surface, None),
        (&mut w.inactive, surface, Some(border)),
        (&mut w.hovered, soft, Some(accent)),
        (&mut w.active, soft, Some(accent)),
    ] {
        state.bg_fill = fill;
        state.fg_stroke.color = text;
        state.rounding = rounding;
        if let Some(color) = stroke {
            state.bg_stroke.color = color;
        }
    }

    visuals.window_shadow = egui::epaint::Shadow {
        offset: egui::vec2(0.0, 6.0),
        blur: theme.shadow,
        spread: 0.0,
        color: Color32::from_black_alpha(40),
    };
    visuals.popup_shadow = visuals.window_shadow;

    let base = theme.font_size_base;
    let mut style = (*ctx.style()).clone();
    style.text_styles = [
        (TextStyle::Small, -2.0),
        (TextStyle::Body, 0.0),
        (TextStyle::Button, 0.0),
        (TextStyle::Heading, 6.0),
    ]
    .into_iter()
    .map(|(text_style, delta)| (text_style, FontId::proportional(base + delta)))
    .chain([(TextStyle::Monospace, FontId::monospace(base - 1.0))])
    .collect();
    style.visuals = visuals;
    ctx.set_style(style);
    ctx.data_mut(|d| d.insert_temp(palette_id(), theme.palette.clone()));
}

/// Judged by the panel colour's relative luminance.
pub fn is_dark(theme: &ThemeConfig) -> bool {
    let [r, g, b, _] = parse_color(&theme.panel).to_array();
    let luminance = 0.2126 * f32::from(r) + 0.7152 * f32::from(g) + 0.0722 * f32::from(b);
    luminance < 128.0
}

/// `#rrggbb` or `#rrggbbaa`. Anything else is light grey.
pub fn parse_color(hex: &str) -> Color32 {
    let h = hex.trim().trim_start_matches('#');
    let byte = |at: usize| {
        h.get(at..at + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    };
    match (h.len(), byte(0), byte(2), byte(4)) {
        (6, Some(r), Some(g), Some(b)) => Color32::from_rgb(r, g, b),
        (8, Some(r), Some(g), Some(b)) => byte(6)
            .map(|a| Color32::from_rgba_unmultiplied(r, g, b, a))
            .unwrap_or(Color32::LIGHT_GRAY),
        _ => Color32::LIGHT_GRAY,
    }
}

/// Dark/light switch. Anything that is not dark goes to "midnight".
pub fn toggled_preset(current: &ThemeConfig) -> &'static str {
    if is_dark(current) {
        "daylight"
    } else {
        DEFAULT_THEME
    }
}

fn midnight() -> ThemeConfig {
    ThemeConfig {
        name: DEFAULT_THEME.to_string(),
        surface: "#1e293b".to_string(),
        panel: "#0f172a".to_string(),
        text: "#e2e8f0".to_string(),
        muted_text: "#64748b".to_string(),
        accent: "#3b82f6".to_string(),
        accent_soft: "#1e3a5f".to_string(),
        border: "#334155".to_string(),
        radius: 10.0,
        shadow: 12.0,
        font_size_base: 15.0,
        palette: Palette::default(),
    }
}

fn daylight() -> ThemeConfig {
    ThemeConfig {
        name: "daylight".to_string(),
        surface: "#f1f5f9".to_string(),
        panel: "#ffffff".to_string(),
        text: "#0f172a".to_string(),
        muted_text: "#64748b".to_string(),
        accent: "#2563eb".to_string(),
        accent_soft: "#dbeafe".to_string(),
        border: "#cbd5e1".to_string(),
        radius: 10.0,
        shadow: 8.0,
        font_size_base: 15.0,
        palette: Palette {
            green: "#059669".into(),
            blue: "#2563eb".into(),
            amber: "#d97706".into(),
            rose: "#e11d48".into(),
            purple: "#7c3aed".into(),
            cyan: "#0891b2".into(),
        },
    }
}

pub fn default_presets() -> Vec<ThemeConfig> {
    vec![midnight(), daylight()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_color("#3b82f6"), Color32::from_rgb(0x3b, 0x82, 0xf6));
        assert_eq!(
            parse_color("3b82f680"),
            Color32::from_rgba_unmultiplied(0x3b, 0x82, 0xf6, 0x80)
        );
        assert_eq!(parse_color("zzz"), Color32::LIGHT_GRAY);
        assert_eq!(parse_color("#3b82fg"), Color32::LIGHT_GRAY);
    }

    #[test]
    fn badge_text_is_lighter_on_dark_panels() {
        let palette = Palette::default();
        let (_, on_dark) = palette.badge(BadgeTone::Rose, true);
        let (_, on_light) = palette.badge(BadgeTone::Rose, false);
        assert!(on_dark.r() > on_light.r());
    }

    #[test]
    fn accents_follow_the_theme_palette() {
        let palette = Palette {
            cyan: "#000001".into(),
            ..Palette::default()
        };
        assert_eq!(palette.accent(Accent::Cyan), Color32::from_rgb(0, 0, 1));
        assert_eq!(palette.accent(Accent::Emerald), parse_color("#10b981"));
    }

    #[test]
    fn midnight_is_dark_and_toggles_to_daylight() {
        let presets = default_presets();
        let midnight = &presets[0];
        assert!(is_dark(midnight));
        assert_eq!(toggled_preset(midnight), "daylight");
        assert_eq!(toggled_preset(&presets[1]), "midnight");
    }

    #[test]
    fn theme_files_are_created_once_and_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        ensure_theme_files(dir.path()).unwrap();
        assert!(presets_file(dir.path()).exists());
        assert_eq!(load_theme(dir.path(), None).name, DEFAULT_THEME);

        let daylight = load_theme(dir.path(), Some("daylight"));
        save_theme(dir.path(), &daylight).unwrap();
        assert_eq!(load_theme(dir.path(), None).name, "daylight");
        assert_eq!(load_theme(dir.path(), Some("nope")).name, "daylight");
    }

    #[test]
    fn saved_theme_without_palette_gets_the_default_one() {
        let dir = tempfile::tempdir().unwrap();
        ensure_theme_files(dir.path()).unwrap();
        let mut json = serde_json::to_value(daylight()).unwrap();
        json.as_object_mut().unwrap().remove("palette");
        fs::write(theme_file(dir.path()), json.to_string()).unwrap();

        let theme = load_theme(dir.path(), None);
        assert_eq!(theme.name, "daylight");
        assert_eq!(theme.palette, Palette::default());
    }
}
