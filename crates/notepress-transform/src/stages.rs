//! The seven stage functions and their named literals.
//!
//! Tree-shaped edits (truncation, injection, front-matter surgery) work on
//! node indices through the pure `Tree` edit methods. Text-shaped edits
//! (callout stripping, link rewriting) serialize, rewrite, and re-parse, so
//! the tree invariants are re-established by the parser rather than patched
//! by hand.

use notepress_core::{Document, Node, Result};
use notepress_parser::{frontmatter, links, tree};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use std::sync::LazyLock;

/// Heading text marking the start of the further-reading section.
pub const FURTHER_READING_MARKER: &str = "扩展阅读";

/// Title of the injected table-of-contents heading.
pub const TOC_TITLE: &str = "目录";

/// Front-matter keys owned by the append-platform-metadata stage. Re-running
/// the stage replaces these lines instead of appending duplicates.
pub const PLATFORM_METADATA_KEYS: [&str; 2] = ["title", "obsidian_url"];

/// Callout marker line inside a blockquote: `> [!type] optional title`.
static CALLOUT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)>\s*\[!\w+\]\s*(.*)").unwrap());

/// Characters kept verbatim when building the host-open URL, matching the
/// encoding browsers apply to URI components.
const HOST_URL_KEEP: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Drop the further-reading heading and every node after it.
///
/// No-op when the marker heading is absent.
pub fn truncate_further_reading(doc: Document) -> Document {
    match doc.tree.heading_index(FURTHER_READING_MARKER) {
        Some(index) => {
            let tree = doc.tree.truncated(index);
            doc.with_tree(tree)
        }
        None => doc,
    }
}

/// Remove callout marker lines, leaving ordinary blockquotes untouched.
///
/// Idempotent: a stripped document has no remaining markers to match.
pub fn strip_callouts(doc: Document) -> Result<Document> {
    let text = doc.text();
    let stripped = CALLOUT_MARKER.replace_all(&text, "");
    let tree = tree::parse(&stripped)?;
    Ok(doc.with_tree(tree))
}

/// Replace every literal occurrence of each resolved link's source text with
/// its display name, in resolver order.
///
/// Later replacements operate on already-rewritten text; when two links share
/// a literal substring, the first-applied one wins.
pub fn rewrite_links(doc: Document, attachment_location: &str) -> Result<Document> {
    let mut text = doc.text();
    for link in links::resolve_links(&text, attachment_location) {
        text = text.replace(&link.source, &link.name);
    }
    let tree = tree::parse(&text)?;
    Ok(doc.with_tree(tree))
}

/// Insert the origin-notice blockquote immediately before the first heading.
///
/// The notice links to the published post (site base URL + `/posts/` + the
/// `path` metadata value) and to the feed. Documents without a heading are
/// left unchanged.
pub fn inject_origin_notice(doc: Document, base_url: &str, feed_url: &str) -> Document {
    let Some(index) = doc.tree.first_heading_index() else {
        return doc;
    };

    let path = doc
        .tree
        .front_matter()
        .map(|value| frontmatter::get_value(&format!("---\n{}\n---\n", value), "path"))
        .unwrap_or_default();
    let url = if path.is_empty() {
        base_url.to_string()
    } else {
        format!("{}/posts/{}", base_url, path)
    };

    let notice = Node::Blockquote {
        source: format!("> 点击链接查看[原文]({})，订阅[SSR]({})。", url, feed_url),
    };
    let tree = doc.tree.with_inserted(index, notice);
    doc.with_tree(tree)
}

/// Insert the table-of-contents heading as the second top-level node.
///
/// With front-matter leading the tree the heading lands right after it;
/// without front-matter it becomes the first node.
pub fn insert_toc(doc: Document) -> Document {
    let index = match doc.tree.front_matter_index() {
        Some(0) => 1,
        _ => 0,
    };
    let toc = Node::Heading {
        depth: 2,
        text: TOC_TITLE.to_string(),
    };
    let tree = doc.tree.with_inserted(index, toc);
    doc.with_tree(tree)
}

/// Append the published title and the host-open URL to the front-matter.
///
/// Existing lines are preserved in order; lines for the keys this stage owns
/// are replaced, so re-running a publish never duplicates them. Documents
/// without front-matter are left unchanged.
pub fn append_platform_metadata(doc: Document, vault: &str) -> Document {
    let Some(index) = doc.tree.front_matter_index() else {
        return doc;
    };
    let Node::FrontMatter { value } = &doc.tree.nodes()[index] else {
        return doc;
    };

    let mut lines: Vec<String> = value
        .lines()
        .filter(|line| {
            // Indented lines are nested under another mapping key; only
            // top-level lines can shadow the appended keys.
            if line.starts_with([' ', '\t']) {
                return true;
            }
            let key = line.split(':').next().unwrap_or("").trim_end();
            !PLATFORM_METADATA_KEYS.contains(&key)
        })
        .map(str::to_string)
        .collect();

    let encoded_path = utf8_percent_encode(&doc.path, HOST_URL_KEEP);
    lines.push(format!("title: {}", doc.name));
    lines.push(format!(
        "obsidian_url: obsidian://open?vault={}&file={}",
        vault, encoded_path
    ));

    let node = Node::FrontMatter {
        value: lines.join("\n"),
    };
    let tree = doc.tree.with_replaced(index, node);
    doc.with_tree(tree)
}

/// Remove the front-matter node entirely, located by node kind.
pub fn strip_front_matter(doc: Document) -> Document {
    match doc.tree.front_matter_index() {
        Some(index) => {
            let tree = doc.tree.without(index);
            doc.with_tree(tree)
        }
        None => doc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notepress_core::NodeKind;

    fn doc(text: &str) -> Document {
        Document::new("My Post", "posts/My Post.md", tree::parse(text).unwrap())
    }

    #[test]
    fn test_truncate_drops_marker_and_tail() {
        let out = truncate_further_reading(doc(
            "# Title\n\nbody\n\n## 扩展阅读\n\n- [a](https://a.com)\n\nmore\n",
        ));
        assert_eq!(out.text(), "# Title\n\nbody\n");
    }

    #[test]
    fn test_truncate_without_marker_is_noop() {
        let text = "# Title\n\nbody\n";
        assert_eq!(truncate_further_reading(doc(text)).text(), text);
    }

    #[test]
    fn test_truncate_matches_exact_heading_text_only() {
        let text = "# Title\n\n## 扩展阅读列表\n\nkept\n";
        assert_eq!(truncate_further_reading(doc(text)).text(), text);
    }

    #[test]
    fn test_strip_callouts_removes_marker_lines() {
        let out = strip_callouts(doc("> [!warning] careful\n> body line\n")).unwrap();
        let text = out.text();
        assert!(!text.contains("[!warning]"));
        assert!(text.contains("body line"));
    }

    #[test]
    fn test_strip_callouts_is_idempotent() {
        let once = strip_callouts(doc("> [!note] n\n> kept\n\nplain\n")).unwrap();
        let twice = strip_callouts(once.clone()).unwrap();
        assert_eq!(once.text(), twice.text());
    }

    #[test]
    fn test_strip_callouts_leaves_plain_blockquotes() {
        let text = "> an ordinary quote\n";
        assert_eq!(strip_callouts(doc(text)).unwrap().text(), text);
    }

    #[test]
    fn test_rewrite_links_replaces_all_occurrences() {
        let out = rewrite_links(doc("[[Note]] and again [[Note]]\n"), ".").unwrap();
        assert_eq!(out.text(), "Note and again Note\n");
    }

    #[test]
    fn test_rewrite_links_leaves_surrounding_bracketed_text() {
        let out = rewrite_links(doc("Read [the notes] first, then [ref](./other.md).\n"), ".")
            .unwrap();
        assert_eq!(out.text(), "Read [the notes] first, then ./other.md.\n");
    }

    #[test]
    fn test_rewrite_links_keeps_absolute_urls() {
        let text = "[site](https://example.com)\n";
        assert_eq!(rewrite_links(doc(text), ".").unwrap().text(), text);
    }

    #[test]
    fn test_origin_notice_lands_before_first_heading() {
        let out = inject_origin_notice(
            doc("---\npath: tech/my-post\n---\n\n# Title\n\nbody\n"),
            "https://blog.example.com",
            "https://blog.example.com/atom.xml",
        );
        let kinds: Vec<NodeKind> = out.tree.nodes().iter().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::FrontMatter,
                NodeKind::Blockquote,
                NodeKind::Heading,
                NodeKind::Paragraph,
            ]
        );
        assert!(
            out.text()
                .contains("[原文](https://blog.example.com/posts/tech/my-post)")
        );
        assert!(out.text().contains("[SSR](https://blog.example.com/atom.xml)"));
    }

    #[test]
    fn test_origin_notice_without_heading_is_noop() {
        let text = "just a paragraph\n";
        let out = inject_origin_notice(doc(text), "https://b.example.com", "https://b.example.com/atom.xml");
        assert_eq!(out.text(), text);
    }

    #[test]
    fn test_origin_notice_without_path_links_site_root() {
        let out = inject_origin_notice(
            doc("# Title\n"),
            "https://b.example.com",
            "https://b.example.com/atom.xml",
        );
        assert!(out.text().contains("[原文](https://b.example.com)"));
    }

    #[test]
    fn test_toc_inserted_after_front_matter() {
        let out = insert_toc(doc("---\npath: tech/a\n---\n\n# Title\n\npara\n"));
        let kinds: Vec<NodeKind> = out.tree.nodes().iter().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::FrontMatter,
                NodeKind::Heading,
                NodeKind::Heading,
                NodeKind::Paragraph,
            ]
        );
        assert_eq!(out.tree.nodes()[1].heading_text(), Some(TOC_TITLE));
    }

    #[test]
    fn test_toc_leads_when_front_matter_absent() {
        let out = insert_toc(doc("# Title\n"));
        assert_eq!(out.tree.nodes()[0].heading_text(), Some(TOC_TITLE));
    }

    #[test]
    fn test_platform_metadata_appends_title_and_host_url() {
        let out = append_platform_metadata(doc("---\npath: tech/a\n---\n\n# T\n"), "content");
        let fm = out.tree.front_matter().unwrap();
        assert!(fm.starts_with("path: tech/a\n"));
        assert!(fm.contains("title: My Post"));
        assert!(
            fm.contains("obsidian_url: obsidian://open?vault=content&file=posts%2FMy%20Post.md")
        );
    }

    #[test]
    fn test_platform_metadata_is_idempotent() {
        let once = append_platform_metadata(doc("---\npath: tech/a\n---\n\n# T\n"), "content");
        let twice = append_platform_metadata(once.clone(), "content");
        assert_eq!(once.text(), twice.text());
        assert_eq!(twice.text().matches("title:").count(), 1);
    }

    #[test]
    fn test_platform_metadata_keeps_nested_title_key() {
        let out = append_platform_metadata(
            doc("---\npath: tech/a\nseo:\n  title: custom\n---\n\n# T\n"),
            "content",
        );
        let fm = out.tree.front_matter().unwrap();
        assert!(fm.contains("seo:\n  title: custom"));
        assert!(fm.contains("title: My Post"));

        let again = append_platform_metadata(out, "content");
        assert!(again.tree.front_matter().unwrap().contains("  title: custom"));
        assert_eq!(again.text().matches("title: My Post").count(), 1);
    }

    #[test]
    fn test_platform_metadata_without_front_matter_is_noop() {
        let text = "# T\n";
        assert_eq!(append_platform_metadata(doc(text), "content").text(), text);
    }

    #[test]
    fn test_strip_front_matter_by_node_kind() {
        let out = strip_front_matter(doc("---\npath: tech/a\n---\n\n# T\n\nbody\n"));
        assert_eq!(out.tree.front_matter_index(), None);
        assert_eq!(out.text(), "# T\n\nbody\n");
    }

    #[test]
    fn test_strip_front_matter_without_block_is_noop() {
        let text = "# T\n";
        assert_eq!(strip_front_matter(doc(text)).text(), text);
    }
}
