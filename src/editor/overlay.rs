use std::sync::LazyLock;
use std::time::Instant;

use regex::Regex;

use crate::editor::phrases::PhraseSet;
use crate::editor::surface::{Decoration, DecorationStyle, Layer, TextSurface};
use crate::model::document::DocKind;
use crate::ops::search::SearchState;
use crate::util::debounce::Debouncer;

/// Quiet interval before decoration layers recompute after a keystroke
pub const OVERLAY_DEBOUNCE_MS: u64 = 150;

static RE_HIGHLIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"==([^=]+)==").expect("valid pattern"));

/// Decorations for `==text==` spans: hide the opening marker, tint the
/// enclosed text with the active color, hide the closing marker. The
/// markers stay in the stored text; only their rendering is suppressed.
pub fn highlight_decorations(text: &str, color: &str) -> Vec<Decoration> {
    let mut decorations = Vec::new();
    for caps in RE_HIGHLIGHT.captures_iter(text) {
        let full = caps.get(0).expect("full match");
        let inner = caps.get(1).expect("inner group");
        decorations.push(Decoration::new(
            full.start()..inner.start(),
            DecorationStyle::HideMarker,
        ));
        decorations.push(Decoration::new(
            inner.start()..inner.end(),
            DecorationStyle::Tint(color.to_string()),
        ));
        decorations.push(Decoration::new(
            inner.end()..full.end(),
            DecorationStyle::HideMarker,
        ));
    }
    decorations
}

/// Wavy-underline decorations for every lexicon match. Only Chapter
/// documents are scanned; every other kind gets an empty layer.
pub fn phrase_decorations(text: &str, set: &PhraseSet, kind: DocKind) -> Vec<Decoration> {
    if !kind.is_manuscript() {
        return Vec::new();
    }
    let Some(re) = set.regex() else {
        return Vec::new();
    };
    re.find_iter(text)
        .map(|m| {
            Decoration::with_tooltip(
                m.start()..m.end(),
                DecorationStyle::WavyUnderline,
                format!("Detected phrase: \"{}\"", m.as_str()),
            )
        })
        .collect()
}

/// Wrap a selection in highlight markers. Returns the edited text.
pub fn add_highlight(text: &str, selection: std::ops::Range<usize>) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    out.push_str(&text[..selection.start]);
    out.push_str("==");
    out.push_str(&text[selection.clone()]);
    out.push_str("==");
    out.push_str(&text[selection.end..]);
    out
}

/// Strip the marker pair around a selected span. Returns the edited text,
/// or None when the selection is not wrapped in `==` markers (nothing to
/// remove, state unchanged).
pub fn remove_highlight(text: &str, selection: std::ops::Range<usize>) -> Option<String> {
    let open = selection.start.checked_sub(2)?;
    if &text[open..selection.start] != "==" {
        return None;
    }
    if text.len() < selection.end + 2 || &text[selection.end..selection.end + 2] != "==" {
        return None;
    }
    let mut out = String::with_capacity(text.len() - 4);
    out.push_str(&text[..open]);
    out.push_str(&text[selection.clone()]);
    out.push_str(&text[selection.end + 2..]);
    Some(out)
}

/// Decorations for the current search hits
pub fn search_decorations(search: &SearchState) -> Vec<Decoration> {
    search
        .matches()
        .iter()
        .map(|range| Decoration::new(range.clone(), DecorationStyle::SearchMatch))
        .collect()
}

/// Keeps the highlight and phrase layers refreshed off the canonical text.
/// Each refresh is a full clear-and-rescan; running it twice in a row
/// produces identical layers, so a stray tick mid-gesture is harmless.
#[derive(Debug)]
pub struct OverlayEngine {
    pub highlight_color: String,
    phrases: PhraseSet,
    highlight_debounce: Debouncer,
    phrase_debounce: Debouncer,
}

impl OverlayEngine {
    pub fn new(highlight_color: &str, phrases: PhraseSet) -> Self {
        OverlayEngine {
            highlight_color: highlight_color.to_string(),
            phrases,
            highlight_debounce: Debouncer::from_millis(OVERLAY_DEBOUNCE_MS),
            phrase_debounce: Debouncer::from_millis(OVERLAY_DEBOUNCE_MS),
        }
    }

    pub fn phrases(&self) -> &PhraseSet {
        &self.phrases
    }

    pub fn set_phrases(&mut self, phrases: PhraseSet) {
        self.phrases = phrases;
    }

    /// Content changed: schedule both layers
    pub fn note_change(&mut self, now: Instant) {
        self.highlight_debounce.poke(now);
        self.phrase_debounce.poke(now);
    }

    /// Color changed: recompute the highlight layer immediately
    pub fn set_highlight_color(&mut self, surface: &mut dyn TextSurface, color: &str) {
        self.highlight_color = color.to_string();
        self.refresh_highlights(surface);
    }

    /// Run any layer whose quiet interval elapsed
    pub fn tick(&mut self, surface: &mut dyn TextSurface, kind: DocKind, now: Instant) {
        if self.highlight_debounce.fire(now) {
            self.refresh_highlights(surface);
        }
        if self.phrase_debounce.fire(now) {
            self.refresh_phrases(surface, kind);
        }
    }

    /// Full recompute of the highlight layer: clear, rescan, reapply
    pub fn refresh_highlights(&self, surface: &mut dyn TextSurface) {
        surface.clear_layer(Layer::Highlight);
        let decorations = highlight_decorations(surface.text(), &self.highlight_color);
        surface.apply_layer(Layer::Highlight, decorations);
    }

    /// Full recompute of the phrase layer
    pub fn refresh_phrases(&self, surface: &mut dyn TextSurface, kind: DocKind) {
        surface.clear_layer(Layer::Phrase);
        let decorations = phrase_decorations(surface.text(), &self.phrases, kind);
        surface.apply_layer(Layer::Phrase, decorations);
    }

    /// Full recompute of the search layer from the current scan state
    pub fn refresh_search(&self, surface: &mut dyn TextSurface, search: &SearchState) {
        surface.clear_layer(Layer::Search);
        surface.apply_layer(Layer::Search, search_decorations(search));
    }
}
