//! Allow-list markup sanitizer.
//!
//! Output is built only from text with `<` and `>` escaped and from tags
//! re-emitted in a normalized form, so sanitizing twice gives the same string
//! as sanitizing once.

use super::renderer::HIGHLIGHT_ATTRIBUTE;

/// Elements kept in sanitized output.
pub const ALLOWED_TAGS: &[&str] = &[
    "b", "strong", "i", "em", "u", "s", "strike", "sub", "sup", "mark", "small", "code", "br",
    "p", "div", "span", "ul", "ol", "li", "blockquote",
];

/// Elements without a closing tag.
const VOID_TAGS: &[&str] = &["br"];

/// Elements removed together with everything up to their closing tag.
const DROP_WITH_CONTENT: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "template", "noscript", "textarea", "title",
    "xmp", "noembed", "noframes",
];

/// Attributes kept on an allowed element.
fn allowed_attributes(tag: &str) -> &'static [&'static str] {
    match tag {
        "span" => &["class", HIGHLIGHT_ATTRIBUTE],
        _ => &[],
    }
}

/// Restrict markup to the allow-list.
///
/// Disallowed elements are unwrapped (their text is kept) except for
/// script-like elements, which are removed with their content. Comments,
/// doctypes and processing instructions are dropped. Attributes other than
/// the highlight wrapper's `class` and `data-y-content` are dropped.
pub fn sanitize(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(pos) = rest.find(|c: char| c == '<' || c == '>') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with('>') {
            out.push_str("&gt;");
            rest = &tail[1..];
            continue;
        }

        match scan(tail) {
            Markup::Tag(tag) => {
                rest = &tail[tag.len..];
                if tag.closing {
                    if is_allowed(&tag.name) && !VOID_TAGS.contains(&tag.name.as_str()) {
                        out.push_str("</");
                        out.push_str(&tag.name);
                        out.push('>');
                    }
                } else if is_allowed(&tag.name) {
                    write_start_tag(&mut out, &tag);
                } else if DROP_WITH_CONTENT.contains(&tag.name.as_str()) {
                    rest = skip_raw_text(rest, &tag.name);
                }
            }
            Markup::Skip(len) => rest = &tail[len..],
            Markup::Text => {
                out.push_str("&lt;");
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn is_allowed(name: &str) -> bool {
    ALLOWED_TAGS.contains(&name)
}

fn write_start_tag(out: &mut String, tag: &Tag<'_>) {
    let allowed = allowed_attributes(&tag.name);
    let mut seen: Vec<&str> = Vec::new();

    out.push('<');
    out.push_str(&tag.name);
    for (name, value) in &tag.attributes {
        let name = name.as_str();
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);
        if let Some(&kept) = allowed.iter().find(|&&a| a == name) {
            out.push(' ');
            out.push_str(kept);
            out.push_str("=\"");
            out.push_str(&escape_value(value.unwrap_or("")));
            out.push('"');
        }
    }
    out.push('>');
}

/// Escape an attribute value for double quotes. Entities are left as they are.
fn escape_value(value: &str) -> String {
    value
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Skip past the closing tag of a raw-text element, or to the end.
fn skip_raw_text<'a>(rest: &'a str, name: &str) -> &'a str {
    let closing = rest.match_indices("</").find(|&(start, _)| {
        rest.as_bytes()
            .get(start + 2..start + 2 + name.len())
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name.as_bytes()))
    });

    match closing {
        Some((start, _)) => match rest[start..].find('>') {
            Some(end) => &rest[start + end + 1..],
            None => "",
        },
        None => "",
    }
}

/// A parsed start or end tag.
struct Tag<'a> {
    name: String,
    closing: bool,
    attributes: Vec<(String, Option<&'a str>)>,
    /// Bytes consumed, including `<` and `>`.
    len: usize,
}

enum Markup<'a> {
    Tag(Tag<'a>),
    /// Comment, doctype or processing instruction of the given length.
    Skip(usize),
    /// The `<` does not start markup.
    Text,
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

/// Classify the markup starting at `tail`, which begins with `<`.
fn scan(tail: &str) -> Markup<'_> {
    let bytes = tail.as_bytes();

    if tail.starts_with("<!--") {
        return match tail[4..].find("-->") {
            Some(end) => Markup::Skip(4 + end + 3),
            None => Markup::Skip(tail.len()),
        };
    }

    if tail.starts_with("<!") || tail.starts_with("<?") {
        return match tail.find('>') {
            Some(end) => Markup::Skip(end + 1),
            None => Markup::Text,
        };
    }

    let closing = bytes.get(1) == Some(&b'/');
    let name_start = if closing { 2 } else { 1 };
    match bytes.get(name_start) {
        Some(b) if b.is_ascii_alphabetic() => {}
        _ => return Markup::Text,
    }

    let mut i = name_start;
    while i < bytes.len() && !is_space(bytes[i]) && bytes[i] != b'/' && bytes[i] != b'>' {
        i += 1;
    }
    let name = tail[name_start..i].to_ascii_lowercase();

    if closing {
        return match tail[i..].find('>') {
            Some(end) => Markup::Tag(Tag {
                name,
                closing,
                attributes: Vec::new(),
                len: i + end + 1,
            }),
            None => Markup::Text,
        };
    }

    let mut attributes = Vec::new();
    loop {
        while i < bytes.len() && (is_space(bytes[i]) || bytes[i] == b'/') {
            i += 1;
        }
        if i >= bytes.len() {
            return Markup::Text;
        }
        if bytes[i] == b'>' {
            return Markup::Tag(Tag {
                name,
                closing,
                attributes,
                len: i + 1,
            });
        }

        // An attribute name is at least one byte, so a stray `=` is consumed.
        let attr_start = i;
        i += 1;
        while i < bytes.len()
            && !is_space(bytes[i])
            && bytes[i] != b'/'
            && bytes[i] != b'>'
            && bytes[i] != b'='
        {
            i += 1;
        }
        let attr_name = tail[attr_start..i].to_ascii_lowercase();

        while i < bytes.len() && is_space(bytes[i]) {
            i += 1;
        }

        let mut value = None;
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && is_space(bytes[i]) {
                i += 1;
            }
            match bytes.get(i) {
                Some(&quote) if quote == b'"' || quote == b'\'' => {
                    let value_start = i + 1;
                    match bytes[value_start..].iter().position(|&b| b == quote) {
                        Some(end) => {
                            value = Some(&tail[value_start..value_start + end]);
                            i = value_start + end + 1;
                        }
                        None => return Markup::Text,
                    }
                }
                Some(_) => {
                    let value_start = i;
                    while i < bytes.len() && !is_space(bytes[i]) && bytes[i] != b'>' {
                        i += 1;
                    }
                    value = Some(&tail[value_start..i]);
                }
                None => return Markup::Text,
            }
        }

        attributes.push((attr_name, value));
    }
}
