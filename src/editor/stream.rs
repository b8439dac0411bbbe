use std::ops::Range;

use crate::editor::surface::TextSurface;
use crate::model::session::Session;

/// Characters inserted per tick: fast, but visibly progressive
pub const STREAM_CHUNK_CHARS: usize = 20;

/// Error type for streaming inserts
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("a generation is already streaming")]
    AlreadyStreaming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
    /// Chunks still going in on each tick
    Streaming,
    /// All text in (or cancelled mid-way); accept/reject pending
    AwaitingDecision,
    /// Accepted, rejected, or cancelled with nothing inserted
    Done,
}

/// Inserts completion text into the surface in fixed-size chunks, one per
/// tick, to read like live generation. Only one stream may run at a time;
/// `begin` refuses while the session's streaming flag is up. Cancelling
/// mid-stream stops the ticks and leaves the accept/reject decision
/// pending over whatever was already inserted.
#[derive(Debug)]
pub struct StreamInsert {
    text: String,
    start: usize,
    inserted: usize,
    phase: StreamPhase,
}

impl StreamInsert {
    /// Start a stream at byte offset `start`. Flips the session flag; the
    /// flag comes down when the decision resolves.
    pub fn begin(session: &mut Session, text: String, start: usize) -> Result<Self, StreamError> {
        if session.streaming {
            return Err(StreamError::AlreadyStreaming);
        }
        session.streaming = true;
        Ok(StreamInsert {
            text,
            start,
            inserted: 0,
            phase: StreamPhase::Streaming,
        })
    }

    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    /// The byte range inserted so far
    pub fn inserted_range(&self) -> Range<usize> {
        self.start..self.start + self.inserted
    }

    /// Insert the next chunk. Returns true while more ticks are needed.
    pub fn tick(&mut self, surface: &mut dyn TextSurface) -> bool {
        if self.phase != StreamPhase::Streaming {
            return false;
        }
        let rest = &self.text[self.inserted..];
        if rest.is_empty() {
            self.phase = StreamPhase::AwaitingDecision;
            return false;
        }
        // Chunk on character boundaries, never mid code point
        let chunk_len = rest
            .char_indices()
            .nth(STREAM_CHUNK_CHARS)
            .map_or(rest.len(), |(i, _)| i);
        let chunk = &rest[..chunk_len];
        let at = self.start + self.inserted;
        surface.replace_range(at..at, chunk);
        self.inserted += chunk_len;

        if self.inserted == self.text.len() {
            self.phase = StreamPhase::AwaitingDecision;
            false
        } else {
            true
        }
    }

    /// Stop mid-stream. Anything already inserted awaits accept/reject;
    /// a cancel before the first chunk resolves immediately.
    pub fn cancel(&mut self, session: &mut Session) {
        if self.phase != StreamPhase::Streaming {
            return;
        }
        if self.inserted > 0 {
            self.phase = StreamPhase::AwaitingDecision;
        } else {
            self.phase = StreamPhase::Done;
            session.streaming = false;
        }
    }

    /// Keep the inserted text
    pub fn accept(&mut self, session: &mut Session) {
        if self.phase == StreamPhase::AwaitingDecision {
            self.phase = StreamPhase::Done;
            session.streaming = false;
        }
    }

    /// Remove exactly the inserted range from the surface
    pub fn reject(&mut self, surface: &mut dyn TextSurface, session: &mut Session) {
        if self.phase == StreamPhase::AwaitingDecision {
            surface.replace_range(self.inserted_range(), "");
            self.inserted = 0;
            self.phase = StreamPhase::Done;
            session.streaming = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::surface::Buffer;

    #[test]
    fn begin_refuses_second_stream() {
        let mut session = Session::default();
        let _first = StreamInsert::begin(&mut session, "text".into(), 0).unwrap();
        let second = StreamInsert::begin(&mut session, "more".into(), 0);
        assert!(matches!(second, Err(StreamError::AlreadyStreaming)));
    }

    #[test]
    fn ticks_insert_fixed_chunks_in_order() {
        let mut session = Session::default();
        let mut buf = Buffer::with_text("start|end");
        let text = "abcdefghijklmnopqrstuvwxyz".to_string(); // 26 chars
        let mut stream = StreamInsert::begin(&mut session, text, 6).unwrap();

        assert!(stream.tick(&mut buf)); // first 20 chars
        assert_eq!(buf.text(), "start|abcdefghijklmnopqrstend");
        assert!(!stream.tick(&mut buf)); // remaining 6
        assert_eq!(buf.text(), "start|abcdefghijklmnopqrstuvwxyzend");
        assert_eq!(stream.phase(), StreamPhase::AwaitingDecision);
    }

    #[test]
    fn chunking_respects_utf8_boundaries() {
        let mut session = Session::default();
        let mut buf = Buffer::new();
        let text = "é".repeat(30); // 30 chars, 60 bytes
        let mut stream = StreamInsert::begin(&mut session, text.clone(), 0).unwrap();
        assert!(stream.tick(&mut buf));
        assert_eq!(buf.text().chars().count(), 20);
        stream.tick(&mut buf);
        assert_eq!(buf.text(), text);
    }

    #[test]
    fn accept_keeps_text_and_releases_flag() {
        let mut session = Session::default();
        let mut buf = Buffer::new();
        let mut stream = StreamInsert::begin(&mut session, "hello".into(), 0).unwrap();
        stream.tick(&mut buf);
        assert!(session.streaming);

        stream.accept(&mut session);
        assert_eq!(buf.text(), "hello");
        assert!(!session.streaming);
        assert_eq!(stream.phase(), StreamPhase::Done);
    }

    #[test]
    fn reject_removes_exactly_the_inserted_range() {
        let mut session = Session::default();
        let mut buf = Buffer::with_text("before after");
        let mut stream = StreamInsert::begin(&mut session, "INSERTED ".into(), 7).unwrap();
        stream.tick(&mut buf);
        assert_eq!(buf.text(), "before INSERTED after");

        stream.reject(&mut buf, &mut session);
        assert_eq!(buf.text(), "before after");
        assert!(!session.streaming);
    }

    #[test]
    fn cancel_midway_leaves_decision_pending() {
        let mut session = Session::default();
        let mut buf = Buffer::new();
        let text = "a".repeat(50);
        let mut stream = StreamInsert::begin(&mut session, text, 0).unwrap();
        stream.tick(&mut buf); // 20 of 50 in

        stream.cancel(&mut session);
        assert_eq!(stream.phase(), StreamPhase::AwaitingDecision);
        assert!(session.streaming); // still held until the decision

        stream.reject(&mut buf, &mut session);
        assert_eq!(buf.text(), "");
        assert!(!session.streaming);
    }

    #[test]
    fn cancel_before_first_chunk_resolves_immediately() {
        let mut session = Session::default();
        let mut stream = StreamInsert::begin(&mut session, "text".into(), 0).unwrap();
        stream.cancel(&mut session);
        assert_eq!(stream.phase(), StreamPhase::Done);
        assert!(!session.streaming);
    }

    #[test]
    fn empty_text_finishes_on_first_tick() {
        let mut session = Session::default();
        let mut buf = Buffer::new();
        let mut stream = StreamInsert::begin(&mut session, String::new(), 0).unwrap();
        assert!(!stream.tick(&mut buf));
        assert_eq!(stream.phase(), StreamPhase::AwaitingDecision);
    }
}
