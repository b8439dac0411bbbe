use std::sync::LazyLock;

use regex::Regex;

/// Error type for HTML→markdown conversion. Callers never surface this:
/// the lossy wrapper falls back to plain-text extraction instead.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("markup too malformed to convert: {0} unresolved tags remain")]
    Unresolved(usize),
}

macro_rules! re {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect("valid pattern"));
    };
}

re!(RE_EMPTY_PARA, r"(?i)<p><br></p>");
re!(RE_H1, r"(?is)<h1[^>]*>(.*?)</h1>");
re!(RE_H2, r"(?is)<h2[^>]*>(.*?)</h2>");
re!(RE_H3, r"(?is)<h3[^>]*>(.*?)</h3>");
re!(RE_H4, r"(?is)<h4[^>]*>(.*?)</h4>");
re!(RE_H5, r"(?is)<h5[^>]*>(.*?)</h5>");
re!(RE_H6, r"(?is)<h6[^>]*>(.*?)</h6>");
re!(RE_STRONG, r"(?is)<strong[^>]*>(.*?)</strong>");
re!(RE_B, r"(?is)<b[^>]*>(.*?)</b>");
re!(RE_EM, r"(?is)<em[^>]*>(.*?)</em>");
re!(RE_I, r"(?is)<i[^>]*>(.*?)</i>");
re!(RE_U, r"(?is)<u[^>]*>(.*?)</u>");
re!(RE_S, r"(?is)<s[^>]*>(.*?)</s>");
re!(RE_STRIKE, r"(?is)<strike[^>]*>(.*?)</strike>");
re!(RE_DEL, r"(?is)<del[^>]*>(.*?)</del>");
re!(RE_CODE, r"(?is)<code[^>]*>(.*?)</code>");
re!(RE_BLOCKQUOTE, r"(?is)<blockquote[^>]*>(.*?)</blockquote>");
re!(RE_UL, r"(?is)<ul[^>]*>(.*?)</ul>");
re!(RE_OL, r"(?is)<ol[^>]*>(.*?)</ol>");
re!(RE_LI, r"(?is)<li[^>]*>(.*?)</li>");
re!(RE_BR, r"(?i)<br\s*/?>");
re!(RE_HR, r"(?i)<hr\s*/?>");
re!(RE_PARA_GAP, r"(?i)</p>\s*<p[^>]*>");
re!(RE_PARA_OPEN, r"(?i)<p[^>]*>");
re!(RE_PARA_CLOSE, r"(?i)</p>");
re!(RE_LINK, r#"(?is)<a[^>]*href=["']([^"']*)["'][^>]*>(.*?)</a>"#);
re!(RE_IMG_ALT, r#"(?i)<img[^>]*src=["']([^"']*)["'][^>]*alt=["']([^"']*)["'][^>]*>"#);
re!(RE_IMG, r#"(?i)<img[^>]*src=["']([^"']*)["'][^>]*>"#);
re!(RE_MARK, r"(?is)<mark[^>]*>(.*?)</mark>");
re!(RE_ANY_TAG, r"<[^>]+>");
re!(RE_REAL_TAG, r"(?i)</?[a-z][^>]*>");
re!(RE_EXCESS_NEWLINES, r"\n{3,}");

/// Does the content still carry HTML tags? Used to detect legacy-format
/// documents on load. Converted markdown carries none, so the upgrade is
/// idempotent. Bare `<` and `>` in prose do not trigger it.
pub fn looks_like_html(content: &str) -> bool {
    RE_REAL_TAG.is_match(content)
}

/// Convert rendered HTML back to canonical markdown.
///
/// The rule set mirrors the forward renderer closely enough for round
/// trips: atx headings with a trailing blank line, `**`/`*`/`~~`/backtick
/// inline marks (underline folds into bold; markdown has no underline),
/// `> ` blockquote prefixes, `-` and `1.` list items, `[text](href)` links,
/// `![alt](src)` images, `==x==` for mark elements, remaining tags
/// stripped, entities decoded, and 3+ newlines collapsed to a blank line.
pub fn html_to_markdown(html: &str) -> Result<String, ConversionError> {
    let mut md = html.to_string();

    // Empty paragraphs first so they don't become double blanks
    md = RE_EMPTY_PARA.replace_all(&md, "\n").into_owned();

    md = RE_H1.replace_all(&md, "# $1\n\n").into_owned();
    md = RE_H2.replace_all(&md, "## $1\n\n").into_owned();
    md = RE_H3.replace_all(&md, "### $1\n\n").into_owned();
    md = RE_H4.replace_all(&md, "#### $1\n\n").into_owned();
    md = RE_H5.replace_all(&md, "##### $1\n\n").into_owned();
    md = RE_H6.replace_all(&md, "###### $1\n\n").into_owned();

    md = RE_STRONG.replace_all(&md, "**$1**").into_owned();
    md = RE_B.replace_all(&md, "**$1**").into_owned();
    md = RE_EM.replace_all(&md, "*$1*").into_owned();
    md = RE_I.replace_all(&md, "*$1*").into_owned();
    // No underline in markdown; fold into bold (documented lossy mapping)
    md = RE_U.replace_all(&md, "**$1**").into_owned();
    md = RE_S.replace_all(&md, "~~$1~~").into_owned();
    md = RE_STRIKE.replace_all(&md, "~~$1~~").into_owned();
    md = RE_DEL.replace_all(&md, "~~$1~~").into_owned();
    md = RE_CODE.replace_all(&md, "`$1`").into_owned();

    md = RE_BLOCKQUOTE
        .replace_all(&md, |caps: &regex::Captures| {
            let content = &caps[1];
            let quoted: Vec<String> = content.split('\n').map(|line| format!("> {line}")).collect();
            format!("{}\n\n", quoted.join("\n"))
        })
        .into_owned();

    md = RE_UL
        .replace_all(&md, |caps: &regex::Captures| {
            let items = RE_LI.replace_all(&caps[1], "- $1\n");
            format!("{items}\n")
        })
        .into_owned();

    md = RE_OL
        .replace_all(&md, |caps: &regex::Captures| {
            let mut counter = 0usize;
            let items = RE_LI.replace_all(&caps[1], |item: &regex::Captures| {
                counter += 1;
                format!("{}. {}\n", counter, &item[1])
            });
            format!("{items}\n")
        })
        .into_owned();

    md = RE_BR.replace_all(&md, "\n").into_owned();
    md = RE_HR.replace_all(&md, "\n---\n").into_owned();

    // Paragraphs collapse to blank-line-separated blocks
    md = RE_PARA_GAP.replace_all(&md, "\n\n").into_owned();
    md = RE_PARA_OPEN.replace_all(&md, "").into_owned();
    md = RE_PARA_CLOSE.replace_all(&md, "\n\n").into_owned();

    md = RE_LINK.replace_all(&md, "[$2]($1)").into_owned();
    md = RE_IMG_ALT.replace_all(&md, "![$2]($1)").into_owned();
    md = RE_IMG.replace_all(&md, "![]($1)").into_owned();

    // Highlight marks before the generic tag strip
    md = RE_MARK.replace_all(&md, "==$1==").into_owned();

    let residual = RE_REAL_TAG.find_iter(&md).count();
    md = RE_ANY_TAG.replace_all(&md, "").into_owned();

    md = decode_entities(&md);
    md = RE_EXCESS_NEWLINES.replace_all(&md, "\n\n").into_owned();
    let md = md.trim().to_string();

    // A wall of unmatched tags means the structure regexes never engaged;
    // report it so the caller can take the plain-text path instead.
    if residual > 0 && md.is_empty() {
        return Err(ConversionError::Unresolved(residual));
    }
    Ok(md)
}

/// Conversion that never fails: malformed fragments fall back to naive
/// plain-text extraction rather than failing the whole operation.
pub fn to_markdown_lossy(html: &str) -> String {
    html_to_markdown(html).unwrap_or_else(|_| extract_plain_text(html))
}

/// Naive fallback: keep paragraph/line structure, strip every tag, decode
/// entities.
pub fn extract_plain_text(html: &str) -> String {
    let mut text = html.to_string();
    text = RE_EMPTY_PARA.replace_all(&text, "\n").into_owned();
    text = RE_PARA_GAP.replace_all(&text, "\n\n").into_owned();
    text = RE_PARA_OPEN.replace_all(&text, "").into_owned();
    text = RE_PARA_CLOSE.replace_all(&text, "\n").into_owned();
    text = RE_BR.replace_all(&text, "\n").into_owned();
    text = RE_ANY_TAG.replace_all(&text, "").into_owned();
    decode_entities(&text).trim().to_string()
}

/// Decode the standard entities the rendered surface produces
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

/// One-time upgrade for documents saved before markdown became the
/// canonical format. Returns None when the content is already markdown.
pub fn migrate_legacy_content(content: &str) -> Option<String> {
    if looks_like_html(content) {
        Some(to_markdown_lossy(content))
    } else {
        None
    }
}
