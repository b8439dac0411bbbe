use std::ops::Range;

/// The three decoration layers. Each is cleared and reapplied as a unit;
/// clearing one never touches the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Highlight,
    Phrase,
    Search,
}

/// How a decorated range is styled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorationStyle {
    /// Render as zero-width: hides `==` markers while they stay in the text
    HideMarker,
    /// Background tint with the given color
    Tint(String),
    /// Wavy underline for detected phrases
    WavyUnderline,
    /// Distinct style for search hits
    SearchMatch,
}

/// One non-destructive visual annotation over a byte range of the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub range: Range<usize>,
    pub style: DecorationStyle,
    /// Hover text (e.g. which phrase matched)
    pub tooltip: Option<String>,
}

impl Decoration {
    pub fn new(range: Range<usize>, style: DecorationStyle) -> Self {
        Decoration {
            range,
            style,
            tooltip: None,
        }
    }

    pub fn with_tooltip(range: Range<usize>, style: DecorationStyle, tooltip: String) -> Self {
        Decoration {
            range,
            style,
            tooltip: Some(tooltip),
        }
    }
}

/// Boundary to the external text-editing widget: byte-offset addressed
/// text, range replacement, per-layer decoration application, and a scroll
/// position the engine preserves across programmatic rewrites.
pub trait TextSurface {
    fn text(&self) -> &str;
    fn set_text(&mut self, text: &str);
    fn replace_range(&mut self, range: Range<usize>, replacement: &str);
    fn apply_layer(&mut self, layer: Layer, decorations: Vec<Decoration>);
    fn clear_layer(&mut self, layer: Layer);
    fn layer(&self, layer: Layer) -> &[Decoration];
    fn scroll(&self) -> f64;
    fn set_scroll(&mut self, offset: f64);
}

/// In-memory surface used by tests and headless operation. Keeps the three
/// decoration collections separate, like the real widget's marker sets.
#[derive(Debug, Default)]
pub struct Buffer {
    text: String,
    scroll: f64,
    highlight: Vec<Decoration>,
    phrase: Vec<Decoration>,
    search: Vec<Decoration>,
}

impl Buffer {
    pub fn new() -> Self {
        Buffer::default()
    }

    pub fn with_text(text: &str) -> Self {
        Buffer {
            text: text.to_string(),
            ..Buffer::default()
        }
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut Vec<Decoration> {
        match layer {
            Layer::Highlight => &mut self.highlight,
            Layer::Phrase => &mut self.phrase,
            Layer::Search => &mut self.search,
        }
    }
}

impl TextSurface for Buffer {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        // Scroll position survives programmatic rewrites
    }

    fn replace_range(&mut self, range: Range<usize>, replacement: &str) {
        self.text.replace_range(range, replacement);
    }

    fn apply_layer(&mut self, layer: Layer, decorations: Vec<Decoration>) {
        *self.layer_mut(layer) = decorations;
    }

    fn clear_layer(&mut self, layer: Layer) {
        self.layer_mut(layer).clear();
    }

    fn layer(&self, layer: Layer) -> &[Decoration] {
        match layer {
            Layer::Highlight => &self.highlight,
            Layer::Phrase => &self.phrase,
            Layer::Search => &self.search,
        }
    }

    fn scroll(&self) -> f64 {
        self.scroll
    }

    fn set_scroll(&mut self, offset: f64) {
        self.scroll = offset;
    }
}
