use std::sync::LazyLock;

use regex::Regex;

/// Built-in detected-phrase lexicon: words and constructions that read as
/// machine-generated filler. Users can replace it wholesale in settings;
/// the format survives comments, section headers, synonym groups, and
/// trailing annotations.
pub const DEFAULT_PHRASES: &str = "\
## Commonly overused words:

absolutely
cacophony
delve, delving (any form)
a testament to
tapestry
palpable
unwavering
meticulous, meticulously

## Stock constructions:

can't help but feel
a mix of
barely above a whisper
the weight of
eyes widened
let out a breath
\"newfound\"
- sent shivers down

**Section headers like this line are skipped**
";

static RE_BOLD_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*[^*]+\*\*$").expect("valid pattern"));
static RE_UNDERSCORE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^__[^_]+__$").expect("valid pattern"));
static RE_TRAILING_PAREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]+\)\s*$").expect("valid pattern"));
static RE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^["“”](.+)["“”]$"#).expect("valid pattern"));

/// Parse the newline-delimited lexicon into a flat list of literal phrases.
///
/// Line handling: blanks and `#` comments are dropped, bold-only section
/// headers are skipped, a leading list dash is stripped, comma-separated
/// lines split into synonym groups, surrounding quotes are stripped, and a
/// trailing parenthetical annotation is cut off.
pub fn parse_phrase_list(text: &str) -> Vec<String> {
    let mut phrases = Vec::new();

    for raw in text.lines() {
        let mut line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if RE_BOLD_HEADER.is_match(line) || RE_UNDERSCORE_HEADER.is_match(line) {
            continue;
        }
        line = line
            .trim_start_matches(['-', '–', '—'])
            .trim_start();

        if line.contains(',') {
            for item in line.split(',') {
                let item = item.trim();
                if item.is_empty() {
                    continue;
                }
                let item = RE_QUOTED.replace(item, "$1").into_owned();
                phrases.push(item);
            }
        } else {
            let line = RE_QUOTED.replace(line, "$1").into_owned();
            let line = RE_TRAILING_PAREN.replace(&line, "").into_owned();
            if !line.is_empty() {
                phrases.push(line);
            }
        }
    }

    phrases
}

/// A compiled phrase lexicon: one alternation regex, longest phrases first
/// so short phrases never shadow longer overlapping ones, word-boundary
/// delimited, case-insensitive.
#[derive(Debug)]
pub struct PhraseSet {
    phrases: Vec<String>,
    regex: Option<Regex>,
}

impl PhraseSet {
    pub fn parse(lexicon: &str) -> Self {
        let phrases = parse_phrase_list(lexicon);
        let regex = build_alternation(&phrases);
        PhraseSet { phrases, regex }
    }

    pub fn default_set() -> Self {
        PhraseSet::parse(DEFAULT_PHRASES)
    }

    /// The user's lexicon override when set, the built-in list otherwise
    pub fn from_settings(settings: &crate::model::settings::Settings) -> Self {
        match settings.phrase_list.as_deref() {
            Some(text) => PhraseSet::parse(text),
            None => PhraseSet::default_set(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }
}

fn build_alternation(phrases: &[String]) -> Option<Regex> {
    if phrases.is_empty() {
        return None;
    }
    let mut sorted: Vec<&String> = phrases.iter().collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));
    let alternation: Vec<String> = sorted.iter().map(|p| regex::escape(p)).collect();
    let pattern = format!(r"(?i)\b(?:{})\b", alternation.join("|"));
    Regex::new(&pattern).ok()
}

/// Splice detected-phrase marker spans into rendered preview HTML.
///
/// Walks the text between tags (the serialized equivalent of walking DOM
/// text nodes), skipping the contents of script/style elements and of
/// marker spans injected by an earlier pass, so reprocessing is idempotent.
pub fn annotate_preview_html(html: &str, set: &PhraseSet) -> String {
    let Some(re) = set.regex() else {
        return html.to_string();
    };

    let mut out = String::with_capacity(html.len());
    let mut marker_depth = 0usize;
    let mut raw_depth = 0usize;
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        let (text, tail) = rest.split_at(open);
        push_text(&mut out, text, re, marker_depth + raw_depth);

        let Some(close) = tail.find('>') else {
            // Unterminated tag: emit verbatim and stop
            out.push_str(tail);
            return out;
        };
        let (tag, remainder) = tail.split_at(close + 1);
        let lower = tag.to_ascii_lowercase();

        if lower.starts_with("<span") && lower.contains("class=\"detected-phrase\"") {
            marker_depth += 1;
        } else if lower.starts_with("</span") && marker_depth > 0 {
            marker_depth -= 1;
        } else if lower.starts_with("<script") || lower.starts_with("<style") {
            raw_depth += 1;
        } else if (lower.starts_with("</script") || lower.starts_with("</style")) && raw_depth > 0 {
            raw_depth -= 1;
        }

        out.push_str(tag);
        rest = remainder;
    }
    push_text(&mut out, rest, re, marker_depth + raw_depth);
    out
}

fn push_text(out: &mut String, text: &str, re: &Regex, skip_depth: usize) {
    if skip_depth > 0 || text.is_empty() {
        out.push_str(text);
        return;
    }
    let mut last = 0;
    for m in re.find_iter(text) {
        out.push_str(&text[last..m.start()]);
        out.push_str(&format!(
            "<span class=\"detected-phrase\" title=\"Detected phrase: &quot;{}&quot;\">{}</span>",
            m.as_str(),
            m.as_str()
        ));
        last = m.end();
    }
    out.push_str(&text[last..]);
}
