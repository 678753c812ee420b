//! Link resolver: wiki references and bracket links.
//!
//! Produces the substitution list later applied by the rewrite stage. Pure
//! function of the input text; nothing here touches the tree.

use notepress_core::ResolvedLink;
use percent_encoding::percent_decode_str;
use regex::Regex;
use std::sync::LazyLock;

/// Wiki-style reference: `[[Target]]`. The inner capture excludes `]` so two
/// references on one line never merge into one match.
pub static WIKI_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").unwrap());

/// Bracket link: `[display](url)`. Both captures exclude their own
/// delimiters, so a match is bounded to one link and never spans across
/// unrelated bracketed text earlier on the line.
pub static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]*?)\]\(([^()]*?)\)").unwrap());

/// Names with this suffix point at drawing sources; their rendered export
/// gains an image extension.
const DRAWING_SUFFIX: &str = ".excalidraw";
const DRAWING_EXPORT_EXTENSION: &str = ".png";

/// Scan text for both link syntaxes and resolve each to a substitution.
///
/// Wiki matches come first, then bracket matches, each family in document
/// order. Bracket links that already point at an absolute http(s) URL are
/// skipped; relative ones are percent-decoded. Wiki names resolve against the
/// configured attachment location.
pub fn resolve_links(text: &str, attachment_location: &str) -> Vec<ResolvedLink> {
    let mut links = Vec::new();

    // Fast pre-filter: most documents have no links at all.
    if text.contains("[[") {
        for caps in WIKI_LINK.captures_iter(text) {
            let name = &caps[1];
            let mut path_name = name.to_string();
            if name.ends_with(DRAWING_SUFFIX) {
                path_name.push_str(DRAWING_EXPORT_EXTENSION);
            }
            links.push(ResolvedLink::new(
                name,
                format!("{}/{}", attachment_location, path_name),
                &caps[0],
            ));
        }
    }

    if text.contains("](") {
        for caps in MARKDOWN_LINK.captures_iter(text) {
            let url = &caps[2];
            if url.starts_with("http://") || url.starts_with("https://") {
                continue;
            }
            let decoded = percent_decode_str(url).decode_utf8_lossy().into_owned();
            links.push(ResolvedLink::new(decoded.clone(), decoded, &caps[0]));
        }
    }

    links
}
