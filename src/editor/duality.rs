use std::time::Instant;

use crate::editor::surface::TextSurface;
use crate::markup::convert::{migrate_legacy_content, to_markdown_lossy};
use crate::markup::render::{Renderer, render_preview};
use crate::markup::words::count_words;
use crate::util::debounce::Debouncer;

/// Quiet interval before preview edits sync back to the canonical string
pub const PREVIEW_SYNC_DEBOUNCE_MS: u64 = 400;

/// Which representation the user is editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Markdown,
    Preview,
}

/// Re-entrancy guard around programmatic surface writes. Input handlers
/// check `is_active` at the top and bail, so the engine's own writes are
/// never mistaken for user edits and can never re-trigger the sync in a
/// loop.
#[derive(Debug, Default)]
pub struct WriteGuard {
    depth: usize,
}

impl WriteGuard {
    pub fn is_active(&self) -> bool {
        self.depth > 0
    }

    /// Run a programmatic write with the guard held
    pub fn write<T>(&mut self, f: impl FnOnce() -> T) -> T {
        self.depth += 1;
        let result = f();
        self.depth -= 1;
        result
    }
}

/// Keeps one canonical markdown string consistent with whichever surface is
/// showing it. Markdown mode edits the canonical text directly; preview
/// mode renders it to HTML and syncs rendered edits back through the
/// HTML→markdown converter on a debounce.
pub struct DualityEngine<R: Renderer> {
    mode: EditorMode,
    canonical: String,
    renderer: R,
    guard: WriteGuard,
    sync_debounce: Debouncer,
    autosave: Debouncer,
    pending_preview_html: Option<String>,
    /// Set on every canonical change; cleared by the caller after persisting
    pub dirty: bool,
}

impl<R: Renderer> DualityEngine<R> {
    pub fn new(renderer: R, autosave_interval_ms: u64) -> Self {
        DualityEngine {
            mode: EditorMode::Markdown,
            canonical: String::new(),
            renderer,
            guard: WriteGuard::default(),
            sync_debounce: Debouncer::from_millis(PREVIEW_SYNC_DEBOUNCE_MS),
            autosave: Debouncer::from_millis(autosave_interval_ms),
            pending_preview_html: None,
            dirty: false,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn word_count(&self) -> u32 {
        count_words(&self.canonical)
    }

    pub fn guard(&self) -> &WriteGuard {
        &self.guard
    }

    /// Load a document's content. Always lands in Markdown mode. Legacy
    /// HTML content is migrated through the converter once; the return
    /// value tells the caller to persist the upgraded text immediately.
    pub fn load(&mut self, content: &str, surface: &mut dyn TextSurface) -> bool {
        let (text, migrated) = match migrate_legacy_content(content) {
            Some(markdown) => (markdown, true),
            None => (content.to_string(), false),
        };
        self.canonical = text;
        self.mode = EditorMode::Markdown;
        self.pending_preview_html = None;
        self.sync_debounce.cancel();
        self.dirty = migrated;
        let canonical = self.canonical.clone();
        self.guard.write(|| surface.set_text(&canonical));
        migrated
    }

    /// Enter preview mode: render the canonical markdown (highlight syntax
    /// pre-converted to mark elements) for the rendered surface to show.
    pub fn enter_preview(&mut self, highlight_color: &str) -> String {
        self.mode = EditorMode::Preview;
        render_preview(&self.renderer, &self.canonical, highlight_color)
    }

    /// Back to markdown mode. The canonical string was the source of truth
    /// all along, so this is just a guarded write of it to the surface.
    pub fn enter_markdown(&mut self, surface: &mut dyn TextSurface) {
        // Unsynced preview edits flush first so nothing is lost
        if let Some(html) = self.pending_preview_html.take() {
            self.apply_preview_html(&html, surface);
        }
        self.mode = EditorMode::Markdown;
        let canonical = self.canonical.clone();
        self.guard.write(|| surface.set_text(&canonical));
    }

    /// User edit on the markdown surface: adopt the surface text as
    /// canonical. Ignored while a guarded write is in flight.
    pub fn on_markdown_input(&mut self, surface: &dyn TextSurface, now: Instant) {
        if self.guard.is_active() {
            return;
        }
        self.canonical = surface.text().to_string();
        self.dirty = true;
        self.autosave.poke(now);
    }

    /// User edit on the rendered surface: stash the HTML and (re)start the
    /// sync debounce. Ignored while a guarded write is in flight.
    pub fn on_preview_input(&mut self, html: &str, now: Instant) {
        if self.guard.is_active() {
            return;
        }
        self.pending_preview_html = Some(html.to_string());
        self.sync_debounce.poke(now);
        self.autosave.poke(now);
    }

    /// Run the debounced preview→canonical sync when due. Returns true
    /// when the canonical string changed.
    pub fn tick(&mut self, surface: &mut dyn TextSurface, now: Instant) -> bool {
        if !self.sync_debounce.fire(now) {
            return false;
        }
        match self.pending_preview_html.take() {
            Some(html) => self.apply_preview_html(&html, surface),
            None => false,
        }
    }

    /// True once the idle auto-save interval has elapsed with unsaved
    /// changes; the caller persists and clears `dirty`.
    pub fn autosave_due(&mut self, now: Instant) -> bool {
        self.autosave.fire(now) && self.dirty
    }

    fn apply_preview_html(&mut self, html: &str, surface: &mut dyn TextSurface) -> bool {
        let markdown = to_markdown_lossy(html);
        if markdown == self.canonical {
            return false;
        }
        self.canonical = markdown;
        self.dirty = true;
        // Keep the markdown surface in step; the scroll position survives
        // because surface writes preserve it.
        let scroll = surface.scroll();
        let canonical = self.canonical.clone();
        self.guard.write(|| {
            surface.set_text(&canonical);
            surface.set_scroll(scroll);
        });
        true
    }
}
