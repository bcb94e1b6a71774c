//! Text clean-up helpers for license texts pulled out of files and READMEs.

use once_cell::sync::Lazy;
use regex::Regex;

/// A `License`/`Licence` heading of level 1 to 6 on its own line.
const LICENSE_HEADING: &str = r"(?mRi)^[ \t]{0,3}#{1,6}[ \t]+licen[cs]e:?[ \t]*#*[ \t]*$";

const ANY_HEADING: &str = r"(?mR)^[ \t]{0,3}#{1,6}([ \t]|$)";

/// Markdown rewrite rules, applied in order.
const MARKDOWN_RULES: &[(&str, &str)] = &[
    // fenced code block delimiters
    (r"(?m)^[ \t]*(```|~~~).*\n?", ""),
    // horizontal rules
    (r"(?m)^ {0,3}([-*_])([ \t]*[-*_]){2,}[ \t]*$", ""),
    // setext underlines
    (r"(?m)^[ \t]*=+[ \t]*$", ""),
    // bullet list leaders
    (r"(?m)^([ \t]*)[*+-][ \t]+", "$1"),
    // html tags, leaving <email> and <url> autolinks alone
    (r"</?[A-Za-z][A-Za-z0-9-]*(\s[^<>]*)?/?>", ""),
    // footnotes and reference definitions
    (r"\[\^[^\]]+\](:[^\n]*)?", ""),
    (r"(?m)^ {0,3}\[[^\]]+\]:[ \t]+\S+.*$", ""),
    // images and links keep their text
    (r"!\[([^\]]*)\][\[(][^\])]*[\])]", "$1"),
    (r"\[([^\]]*)\][\[(][^\])]*[\])]", "$1"),
    // blockquotes
    (r"(?m)^ {0,3}>[ \t]?", ""),
    // atx headings
    (r"(?m)^ {0,3}#{1,6}[ \t]+", ""),
    (r"(?m)[ \t]+#+[ \t]*$", ""),
    // emphasis
    (r"\*\*\*([^*\n]+)\*\*\*", "$1"),
    (r"\*\*([^*\n]+)\*\*", "$1"),
    (r"\*([^*\s][^*\n]*?)\*", "$1"),
    (r"(^|\W)___([^_\n]+)___(\W|$)", "$1$2$3"),
    (r"(^|\W)__([^_\n]+)__(\W|$)", "$1$2$3"),
    (r"(^|\W)_([^_\s][^_\n]*?)_(\W|$)", "$1$2$3"),
    // strikethrough and inline code
    (r"~~([^~\n]+)~~", "$1"),
    (r"`([^`\n]+)`", "$1"),
    (r"\n{3,}", "\n\n"),
];

static COMPILED: Lazy<Result<MarkdownPatterns, regex::Error>> = Lazy::new(MarkdownPatterns::compile);

struct MarkdownPatterns {
    license_heading: Regex,
    any_heading: Regex,
    rules: Vec<(Regex, &'static str)>,
}

impl MarkdownPatterns {
    fn compile() -> Result<Self, regex::Error> {
        let mut rules = Vec::with_capacity(MARKDOWN_RULES.len());
        for (pattern, replacement) in MARKDOWN_RULES {
            rules.push((Regex::new(pattern)?, *replacement));
        }

        Ok(Self {
            license_heading: Regex::new(LICENSE_HEADING)?,
            any_heading: Regex::new(ANY_HEADING)?,
            rules,
        })
    }

    fn shared() -> Result<&'static Self, regex::Error> {
        COMPILED.as_ref().map_err(Clone::clone)
    }
}

/// Remove the indentation shared by every non-blank line.
pub fn strip_indent(text: &str) -> String {
    textwrap::dedent(text)
}

/// Strip enough Markdown syntax to leave readable plain text.
pub fn strip_markdown(text: &str) -> Result<String, regex::Error> {
    let patterns = MarkdownPatterns::shared()?;
    Ok(patterns
        .rules
        .iter()
        .fold(text.replace("\r\n", "\n"), |acc, (re, replacement)| {
            re.replace_all(&acc, *replacement).into_owned()
        }))
}

/// Strip markdown, then indentation, then surrounding whitespace.
pub fn prettify(text: &str) -> Result<String, regex::Error> {
    Ok(strip_indent(&strip_markdown(text)?).trim().to_string())
}

/// Body of the first `License`/`Licence` section in a Markdown document,
/// running up to the next heading of any level or the end of the document.
pub fn license_section(markdown: &str) -> Result<Option<&str>, regex::Error> {
    let patterns = MarkdownPatterns::shared()?;
    let Some(heading) = patterns.license_heading.find(markdown) else {
        return Ok(None);
    };
    let rest = &markdown[heading.end()..];
    let end = patterns
        .any_heading
        .find(rest)
        .map_or(rest.len(), |m| m.start());
    Ok(Some(rest[..end].trim()))
}
