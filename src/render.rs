//! Terminal presentation of a run
//!
//! Rendering is a pure function of engine state: every function here returns
//! a `String` and writes nothing. The event loop owns the terminal. Styling
//! lives in a [`Theme`] passed in at construction so tests (and dumb
//! terminals) can render unstyled text.

use console::{measure_text_width, Style};

use crate::engine::Engine;
use crate::manifest::{Manifest, ManifestEntry};
use crate::types::Outcome;

/// Glyphs, colors, and animation frames used by the renderer
#[derive(Clone, Debug)]
pub struct Theme {
    /// Style for the success glyph
    pub check: Style,
    /// Style for the failure glyph
    pub cross: Style,
    /// Style for the spinner glyph
    pub spinner: Style,
    /// Accent style for pack metadata and the current item name
    pub accent: Style,
    /// Style for successfully downloaded names
    pub success: Style,
    /// Style for failed names
    pub error: Style,
    /// Success glyph
    pub check_glyph: &'static str,
    /// Failure glyph
    pub cross_glyph: &'static str,
    /// Spinner animation frames, cycled one per tick
    pub spinner_frames: &'static [&'static str],
    /// Filled progress-bar cell
    pub bar_filled: char,
    /// Empty progress-bar cell
    pub bar_empty: char,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            check: Style::new().color256(10),
            cross: Style::new().color256(1),
            spinner: Style::new().color256(63),
            accent: Style::new().color256(211),
            success: Style::new().color256(157),
            error: Style::new().color256(9),
            check_glyph: "🗸",
            cross_glyph: "✘",
            spinner_frames: &["|", "/", "-", "\\"],
            bar_filled: '█',
            bar_empty: '░',
        }
    }
}

impl Theme {
    /// Theme with no colors, for tests and non-ANSI terminals
    pub fn plain() -> Self {
        Self {
            check: Style::new(),
            cross: Style::new(),
            spinner: Style::new(),
            accent: Style::new(),
            success: Style::new(),
            error: Style::new(),
            ..Self::default()
        }
    }
}

/// Renders engine state into terminal lines
pub struct Renderer {
    theme: Theme,
}

impl Renderer {
    /// Create a renderer with the given theme
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// One-time banner describing the pack being downloaded
    pub fn banner(&self, manifest: &Manifest) -> String {
        format!(
            "Minecraft version: {}\nLoader: {}\nModpack: {} Version: {}\nAuthor: {}\n",
            self.theme.accent.apply_to(&manifest.minecraft.version),
            self.theme.accent.apply_to(manifest.loader()),
            self.theme.accent.apply_to(&manifest.name),
            self.theme.accent.apply_to(&manifest.version),
            self.theme.accent.apply_to(&manifest.author),
        )
    }

    /// Live status line: spinner, current item, proportional bar, counter
    ///
    /// The bar absorbs whatever width the other pieces leave free; on a
    /// narrow terminal it shrinks to nothing before anything else gives way.
    pub fn status_line(&self, engine: &Engine, entries: &[ManifestEntry]) -> String {
        let index = engine.current_index();
        let total = engine.total();
        if index >= total {
            return String::new();
        }

        let frames = self.theme.spinner_frames;
        let spin = format!(
            "{}  ",
            self.theme
                .spinner
                .apply_to(frames[engine.spinner_frame() % frames.len()])
        );
        let info = format!(
            "Downloading {}",
            self.theme.accent.apply_to(&entries[index].display_name)
        );

        let digits = total.to_string().len();
        let count = format!(" {:>digits$}/{:>digits$}", index, total);

        let width = engine.width() as usize;
        let used =
            measure_text_width(&spin) + measure_text_width(&info) + measure_text_width(&count);
        let bar_room = width.saturating_sub(used + 2);
        let bar = self.bar(engine.progress(), bar_room);

        if bar.is_empty() {
            format!("{spin}{info}{count}")
        } else {
            format!("{spin}{info} {bar} {count}")
        }
    }

    /// Inline line printed as one entry completes
    pub fn completion_line(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::Success { resolved_name } => format!(
                "{}{}",
                self.theme.check.apply_to(self.theme.check_glyph),
                self.theme.success.apply_to(resolved_name),
            ),
            Outcome::Failure { display_name, .. } => format!(
                "{}{}",
                self.theme.cross.apply_to(self.theme.cross_glyph),
                self.theme.error.apply_to(display_name),
            ),
        }
    }

    /// Final summary: success count, then the attempted names of any failures
    pub fn summary(&self, engine: &Engine) -> String {
        let mut text = format!("Done! Downloaded {} mods.\n", engine.successes());

        let mut failed = engine.failures().peekable();
        if failed.peek().is_some() {
            text.push_str("Errors: ");
            for name in failed {
                text.push_str(name);
                text.push_str(", ");
            }
        }

        text
    }

    fn bar(&self, progress: f64, width: usize) -> String {
        if width == 0 {
            return String::new();
        }
        let filled = (progress.clamp(0.0, 1.0) * width as f64).round() as usize;
        let mut bar = String::with_capacity(width * 3);
        for _ in 0..filled {
            bar.push(self.theme.bar_filled);
        }
        for _ in filled..width {
            bar.push(self.theme.bar_empty);
        }
        bar
    }
}
