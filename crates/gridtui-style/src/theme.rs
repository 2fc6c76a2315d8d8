#![forbid(unsafe_code)]

//! Themes as explicit configuration values.
//!
//! There is no process-wide current theme. Construct a [`Theme`], usually
//! from [`Theme::DEFAULT`] or a [`ThemeBuilder`], and pass it to widget
//! constructors.
//!
//! # Example
//! ```
//! use gridtui_render::cell::Color;
//! use gridtui_style::{Style, Theme};
//!
//! let theme = Theme::builder()
//!     .border(Style::new(Color::CYAN))
//!     .title(Style::new(Color::YELLOW))
//!     .build();
//! assert_eq!(theme.block.border.fg, Color::CYAN);
//! assert_eq!(Theme::default(), Theme::DEFAULT);
//! ```

use std::collections::HashMap;

use crate::Style;
use gridtui_render::cell::{Color, Modifiers};

/// Colors handed out to series (chart lines, slices) in order.
pub const STANDARD_COLORS: [Color; 7] = [
    Color::RED,
    Color::GREEN,
    Color::YELLOW,
    Color::BLUE,
    Color::MAGENTA,
    Color::CYAN,
    Color::WHITE,
];

/// Styles used by bordered blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockTheme {
    /// Title text on the top border.
    pub title: Style,
    /// Border glyphs.
    pub border: Style,
    /// Interior fill color.
    pub background: Color,
}

/// Default styles and colors for every widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Fallback text style.
    pub default: Style,
    /// Screen background painted before widgets.
    pub background: Color,
    pub block: BlockTheme,
    /// Series colors, cycled by index.
    pub series: [Color; 7],
}

impl Theme {
    /// White on the terminal default background.
    pub const DEFAULT: Theme = Theme {
        default: Style::new(Color::WHITE),
        background: Color::Reset,
        block: BlockTheme {
            title: Style::new(Color::WHITE),
            border: Style::new(Color::WHITE),
            background: Color::Reset,
        },
        series: STANDARD_COLORS,
    };

    /// Start building a theme from [`Theme::DEFAULT`].
    pub fn builder() -> ThemeBuilder {
        ThemeBuilder::new()
    }

    /// Series color for index `i`, wrapping around.
    pub fn series_color(&self, i: usize) -> Color {
        self.series[i % self.series.len()]
    }

    /// Build a theme from named attributes.
    ///
    /// Recognized names: `fg`, `bg`, `block.title.fg`, `block.title.bg`,
    /// `block.border.fg`, `block.border.bg`, `block.bg`. Missing names fall
    /// back through [`AttrTable::lookup`]; a name that resolves to nothing
    /// keeps the [`Theme::DEFAULT`] value.
    pub fn from_attrs(attrs: &AttrTable) -> Theme {
        let base = Theme::DEFAULT;
        let pick = |name: &str, fallback: Color| attrs.get_resolved(name).unwrap_or(fallback);

        let fg = pick("fg", base.default.fg);
        let bg = pick("bg", base.background);
        Theme {
            default: Style::new(fg).bg(bg),
            background: bg,
            block: BlockTheme {
                title: Style::new(pick("block.title.fg", base.block.title.fg))
                    .bg(pick("block.title.bg", base.block.title.bg)),
                border: Style::new(pick("block.border.fg", base.block.border.fg))
                    .bg(pick("block.border.bg", base.block.border.bg)),
                background: pick("block.bg", base.block.background),
            },
            series: base.series,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Builder for [`Theme`].
#[derive(Debug, Clone)]
pub struct ThemeBuilder {
    theme: Theme,
}

impl ThemeBuilder {
    /// Builder seeded with [`Theme::DEFAULT`].
    pub fn new() -> Self {
        Self {
            theme: Theme::DEFAULT,
        }
    }

    /// Fallback text style.
    pub fn default_style(mut self, style: Style) -> Self {
        self.theme.default = style;
        self
    }

    /// Screen background.
    pub fn background(mut self, color: Color) -> Self {
        self.theme.background = color;
        self
    }

    /// Block title style.
    pub fn title(mut self, style: Style) -> Self {
        self.theme.block.title = style;
        self
    }

    /// Block border style.
    pub fn border(mut self, style: Style) -> Self {
        self.theme.block.border = style;
        self
    }

    /// Block interior fill.
    pub fn block_background(mut self, color: Color) -> Self {
        self.theme.block.background = color;
        self
    }

    /// Make block titles bold.
    pub fn bold_titles(mut self) -> Self {
        self.theme.block.title = self.theme.block.title.add_modifiers(Modifiers::BOLD);
        self
    }

    /// Series palette.
    pub fn series(mut self, colors: [Color; 7]) -> Self {
        self.theme.series = colors;
        self
    }

    /// Finish building.
    pub fn build(self) -> Theme {
        self.theme
    }
}

impl Default for ThemeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Named color attributes keyed by dotted paths such as `"par.label.fg"`.
///
/// Lookups fall back from the most specific name to the least: `par.label.fg`,
/// then `label.fg`, then `fg`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrTable {
    entries: HashMap<String, Color>,
}

impl AttrTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, name: impl Into<String>, color: Color) -> &mut Self {
        self.entries.insert(name.into(), color);
        self
    }

    /// Exact lookup without fallback.
    pub fn get(&self, name: &str) -> Option<Color> {
        self.entries.get(name).copied()
    }

    /// Lookup with suffix fallback, `None` when no suffix matches.
    pub fn get_resolved(&self, name: &str) -> Option<Color> {
        let mut rest = name;
        loop {
            if let Some(color) = self.get(rest) {
                return Some(color);
            }
            match rest.split_once('.') {
                Some((_, tail)) => rest = tail,
                None => return None,
            }
        }
    }

    /// Lookup with suffix fallback, [`Color::Reset`] when nothing matches.
    pub fn lookup(&self, name: &str) -> Color {
        self.get_resolved(name).unwrap_or(Color::Reset)
    }
}

impl<S: Into<String>> FromIterator<(S, Color)> for AttrTable {
    fn from_iter<I: IntoIterator<Item = (S, Color)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
