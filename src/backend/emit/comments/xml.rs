//! XML documentation comments → [`DocComment`].
//!
//! Understands the usual tags: `summary`, `remarks`, `param`, `returns`, `value`, `exception` at the top level, and
//! `see`, `seealso`, `paramref`, `typeparamref`, `c`, `code`, `para`, `br`, `list`/`item` inline. Unknown tags keep
//! their text. Anything that is not well-formed XML fails with a [`DocError`].

use thiserror::Error;

use super::{DocComment, DocParam, DocThrows, DocTranslator};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocError {
    #[error("unterminated tag starting at byte {0}")]
    UnterminatedTag(usize),
    #[error("closing tag </{found}> does not match <{expected}>")]
    Mismatched { expected: String, found: String },
    #[error("closing tag </{0}> has no opening tag")]
    UnexpectedClose(String),
    #[error("tag <{0}> is never closed")]
    Unclosed(String),
    #[error("malformed attribute in <{0}>")]
    MalformedAttribute(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Element {
        name: String,
        attrs: Vec<(String, String)>,
        children: Vec<Node>,
    },
}

impl Node {
    fn attr(&self, key: &str) -> Option<&str> {
        match self {
            Node::Element { attrs, .. } => attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str()),
            Node::Text(_) => None,
        }
    }
}

/// Translator for the XML documentation dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlDocTranslator;

impl DocTranslator for XmlDocTranslator {
    fn translate(&self, raw: &str) -> Result<DocComment, DocError> {
        let nodes = parse(raw)?;
        let mut doc = DocComment::default();
        let mut loose = String::new();
        for node in &nodes {
            match node {
                Node::Text(text) => loose.push_str(text),
                Node::Element { name, children, .. } => match name.as_str() {
                    "summary" => doc.summary.extend(paragraph(&inline(children))),
                    "remarks" => doc.remarks.extend(paragraph(&inline(children))),
                    "value" => doc.summary.extend(paragraph(&inline(children))),
                    "param" => doc.params.push(DocParam {
                        name: node.attr("name").unwrap_or_default().to_string(),
                        text: single_line(&inline(children)),
                    }),
                    "returns" => doc.returns = Some(single_line(&inline(children))),
                    "exception" => doc.throws.push(DocThrows {
                        ty: node.attr("cref").map(cref_target).unwrap_or_default(),
                        text: single_line(&inline(children)),
                    }),
                    _ => {}
                },
            }
        }
        let loose = paragraph(&loose);
        if !loose.is_empty() {
            doc.summary.splice(0..0, loose);
        }
        Ok(doc)
    }
}

fn parse(raw: &str) -> Result<Vec<Node>, DocError> {
    // Each frame holds an open element's name, attributes and children; the bottom frame is the document.
    let mut stack: Vec<(String, Vec<(String, String)>, Vec<Node>)> = vec![(String::new(), Vec::new(), Vec::new())];
    let mut rest = raw;
    let mut offset = 0usize;

    while !rest.is_empty() {
        let Some(lt) = rest.find('<') else {
            push_text(&mut stack, rest);
            break;
        };
        push_text(&mut stack, &rest[..lt]);
        let tag_start = offset + lt;
        let after = &rest[lt + 1..];

        if let Some(comment) = after.strip_prefix("!--") {
            let end = comment.find("-->").ok_or(DocError::UnterminatedTag(tag_start))?;
            let consumed = lt + 1 + 3 + end + 3;
            offset += consumed;
            rest = &rest[consumed..];
            continue;
        }

        let gt = after.find('>').ok_or(DocError::UnterminatedTag(tag_start))?;
        let body = after[..gt].trim();
        let consumed = lt + 1 + gt + 1;
        offset += consumed;
        rest = &rest[consumed..];

        if let Some(closing) = body.strip_prefix('/') {
            let found = closing.trim().to_string();
            if stack.len() == 1 {
                return Err(DocError::UnexpectedClose(found));
            }
            let (name, attrs, children) = stack.pop().unwrap_or_default();
            if name != found {
                return Err(DocError::Mismatched { expected: name, found });
            }
            push_node(&mut stack, Node::Element { name, attrs, children });
            continue;
        }

        let (body, self_closing) = match body.strip_suffix('/') {
            Some(inner) => (inner.trim_end(), true),
            None => (body, false),
        };
        let (name, attrs) = parse_tag(body)?;
        if self_closing {
            push_node(
                &mut stack,
                Node::Element {
                    name,
                    attrs,
                    children: Vec::new(),
                },
            );
        } else {
            stack.push((name, attrs, Vec::new()));
        }
    }

    if stack.len() > 1 {
        let (name, _, _) = stack.pop().unwrap_or_default();
        return Err(DocError::Unclosed(name));
    }
    Ok(stack.pop().map(|(_, _, children)| children).unwrap_or_default())
}

fn push_text(stack: &mut [(String, Vec<(String, String)>, Vec<Node>)], text: &str) {
    if !text.is_empty() {
        push_node(stack, Node::Text(decode_entities(text)));
    }
}

fn push_node(stack: &mut [(String, Vec<(String, String)>, Vec<Node>)], node: Node) {
    if let Some((_, _, children)) = stack.last_mut() {
        children.push(node);
    }
}

fn parse_tag(body: &str) -> Result<(String, Vec<(String, String)>), DocError> {
    let name_end = body.find(char::is_whitespace).unwrap_or(body.len());
    let name = body[..name_end].to_string();
    if name.is_empty() {
        return Err(DocError::MalformedAttribute(body.to_string()));
    }
    let mut attrs = Vec::new();
    let mut rest = body[name_end..].trim_start();
    while !rest.is_empty() {
        let eq = rest.find('=').ok_or_else(|| DocError::MalformedAttribute(name.clone()))?;
        let key = rest[..eq].trim().to_string();
        let value_part = rest[eq + 1..].trim_start();
        let quote = value_part
            .chars()
            .next()
            .filter(|c| *c == '"' || *c == '\'')
            .ok_or_else(|| DocError::MalformedAttribute(name.clone()))?;
        let close = value_part[1..]
            .find(quote)
            .ok_or_else(|| DocError::MalformedAttribute(name.clone()))?;
        attrs.push((key, decode_entities(&value_part[1..1 + close])));
        rest = value_part[close + 2..].trim_start();
    }
    Ok((name, attrs))
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// `T:N1.A` → `N1.A`, `M:N1.A.Run(System.Int32)` → `N1.A.Run`.
fn cref_target(cref: &str) -> String {
    let without_prefix = match cref.split_once(':') {
        Some((prefix, rest)) if prefix.len() == 1 => rest,
        _ => cref,
    };
    without_prefix.split('(').next().unwrap_or_default().to_string()
}

fn inline(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element { name, children, .. } => match name.as_str() {
                "see" | "seealso" => {
                    if let Some(cref) = node.attr("cref") {
                        out.push_str(&format!("{{@link {}}}", cref_target(cref)));
                    } else if let Some(word) = node.attr("langword") {
                        out.push_str(word);
                    } else if let Some(href) = node.attr("href") {
                        let label = inline(children);
                        if label.trim().is_empty() {
                            out.push_str(&format!("{{@link {}}}", href));
                        } else {
                            out.push_str(&format!("{{@link {} {}}}", href, label.trim()));
                        }
                    } else {
                        out.push_str(&inline(children));
                    }
                }
                "paramref" | "typeparamref" => out.push_str(node.attr("name").unwrap_or_default()),
                "para" => {
                    out.push_str("\n\n");
                    out.push_str(&inline(children));
                    out.push_str("\n\n");
                }
                "br" => out.push('\n'),
                "item" => {
                    out.push_str("\n- ");
                    out.push_str(&single_line(&inline(children)));
                    out.push('\n');
                }
                _ => out.push_str(&inline(children)),
            },
        }
    }
    out
}

/// Trimmed lines with runs of blank lines collapsed and leading/trailing blanks removed.
fn paragraph(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() && lines.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        lines.push(line.to_string());
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn translate(raw: &str) -> Result<DocComment, DocError> {
        XmlDocTranslator.translate(raw)
    }

    #[test]
    fn summary_params_and_returns() {
        let doc = translate(
            "<summary>\n Adds two numbers.\n</summary>\n<param name=\"a\">The first.</param>\n<param name=\"b\">The\n second.</param>\n<returns>The sum.</returns>",
        )
        .unwrap();
        assert_eq!(doc.summary, vec!["Adds two numbers."]);
        assert_eq!(doc.params.len(), 2);
        assert_eq!(doc.params[1].name, "b");
        assert_eq!(doc.params[1].text, "The second.");
        assert_eq!(doc.returns.as_deref(), Some("The sum."));
    }

    #[test]
    fn inline_references() {
        let doc = translate(
            "<summary>Uses <see cref=\"T:N1.B\"/> and <paramref name=\"x\"/>, never <see langword=\"null\"/> &amp; <c>0</c>.</summary>",
        )
        .unwrap();
        assert_eq!(doc.summary, vec!["Uses {@link N1.B} and x, never null & 0."]);
    }

    #[test]
    fn paragraphs_become_separate_lines() {
        let doc = translate("<summary>First.<para>Second.</para></summary>").unwrap();
        assert_eq!(doc.summary, vec!["First.", "", "Second."]);
    }

    #[test]
    fn text_outside_tags_is_summary() {
        let doc = translate("Just text.").unwrap();
        assert_eq!(doc.summary, vec!["Just text."]);
    }

    #[test]
    fn exceptions_strip_cref_prefix() {
        let doc = translate("<exception cref=\"T:System.ArgumentException\">Bad input.</exception>").unwrap();
        assert_eq!(doc.throws[0].ty, "System.ArgumentException");
        assert_eq!(doc.throws[0].text, "Bad input.");
    }

    #[test]
    fn malformed_comments_are_rejected() {
        assert!(matches!(translate("<summary>oops"), Err(DocError::Unclosed(name)) if name == "summary"));
        assert!(matches!(translate("<summary>a</remarks>"), Err(DocError::Mismatched { .. })));
        assert!(matches!(translate("a</summary>"), Err(DocError::UnexpectedClose(_))));
        assert!(matches!(translate("<summary"), Err(DocError::UnterminatedTag(0))));
        assert!(matches!(translate("<param name=a>x</param>"), Err(DocError::MalformedAttribute(_))));
    }

    #[test]
    fn xml_comments_are_skipped() {
        let doc = translate("<!-- internal --><summary>Kept.</summary>").unwrap();
        assert_eq!(doc.summary, vec!["Kept."]);
    }
}
