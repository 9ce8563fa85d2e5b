//! Markup tokenizer built on logos
//!
//! Two lexers share one source: `ContentToken` runs between tags and
//! `TagToken` runs inside a start tag. The tokenizer morphs between them at
//! `<name` and `>`. Raw-text elements are cut out of the source by hand.

use crate::node::Attribute;
use logos::{Lexer, Logos};

/// Elements whose contents are never parsed as markup
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements whose contents are text with character references
pub const ESCAPABLE_RAW_TEXT_ELEMENTS: &[&str] = &["textarea", "title"];

#[derive(Logos, Debug, Clone, PartialEq)]
enum ContentToken<'src> {
    #[regex(r"<![dD][oO][cC][tT][yY][pP][eE][^>]*>", |lex| lex.slice())]
    Doctype(&'src str),

    #[token("<!--", lex_comment)]
    Comment(&'src str),

    #[regex(r"</[a-zA-Z][a-zA-Z0-9:_-]*[^>]*>", |lex| lex.slice())]
    EndTag(&'src str),

    #[regex(r"<[a-zA-Z][a-zA-Z0-9:_-]*", |lex| &lex.slice()[1..])]
    StartTagOpen(&'src str),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),

    #[token("<")]
    LessThan,
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum TagToken<'src> {
    #[regex(r#"[^ \t\r\n\f"'<>/=]+"#, |lex| lex.slice())]
    Name(&'src str),

    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#, |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    DoubleQuoted(&'src str),

    #[regex(r"'[^']*'", |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    SingleQuoted(&'src str),

    #[token("/>")]
    SelfClose,

    #[token("/")]
    Slash,

    #[token(">")]
    End,
}

fn lex_comment<'src>(lex: &mut Lexer<'src, ContentToken<'src>>) -> &'src str {
    let rest = lex.remainder();
    match rest.find("-->") {
        Some(end) => {
            lex.bump(end + 3);
            &rest[..end]
        }
        None => {
            lex.bump(rest.len());
            rest
        }
    }
}

/// Markup token with decoded text
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Doctype(String),
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag(String),
    Text(String),
    /// Contents of a raw-text element, never decoded
    RawText(String),
    Comment(String),
}

/// Tokenize markup. Never fails: anything unrecognised becomes text.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lex = ContentToken::lexer(source);

    while let Some(result) = lex.next() {
        let Ok(token) = result else {
            tokens.push(Token::Text(lex.slice().to_string()));
            continue;
        };

        match token {
            ContentToken::Doctype(raw) => tokens.push(Token::Doctype(doctype_name(raw))),
            ContentToken::Comment(body) => tokens.push(Token::Comment(body.to_string())),
            ContentToken::EndTag(raw) => tokens.push(Token::EndTag(end_tag_name(raw))),
            ContentToken::Text(text) => tokens.push(Token::Text(decode_entities(text))),
            ContentToken::LessThan => tokens.push(Token::Text("<".to_string())),
            ContentToken::StartTagOpen(name) => {
                let name = name.to_ascii_lowercase();
                let mut tag_lex = lex.morph::<TagToken>();
                let (attributes, self_closing) = lex_attributes(&mut tag_lex);
                lex = tag_lex.morph();

                let raw = RAW_TEXT_ELEMENTS.contains(&name.as_str());
                let escapable = ESCAPABLE_RAW_TEXT_ELEMENTS.contains(&name.as_str());
                tokens.push(Token::StartTag {
                    name: name.clone(),
                    attributes,
                    self_closing,
                });

                if !self_closing && (raw || escapable) {
                    let body = take_raw_text(&mut lex, &name);
                    if !body.is_empty() {
                        tokens.push(if raw {
                            Token::RawText(body.to_string())
                        } else {
                            Token::Text(decode_entities(body))
                        });
                    }
                }
            }
        }
    }

    tokens
}

fn lex_attributes<'src>(lex: &mut Lexer<'src, TagToken<'src>>) -> (Vec<Attribute>, bool) {
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut pending: Option<String> = None;
    let mut awaiting_value = false;

    let push = |attributes: &mut Vec<Attribute>, name: String, value: String| {
        // first occurrence wins
        if !attributes.iter().any(|a| a.name == name) {
            attributes.push(Attribute { name, value });
        }
    };

    while let Some(result) = lex.next() {
        let Ok(token) = result else {
            continue;
        };
        match token {
            TagToken::Name(text) => {
                if awaiting_value {
                    if let Some(name) = pending.take() {
                        push(&mut attributes, name, decode_entities(text));
                    }
                    awaiting_value = false;
                } else {
                    if let Some(name) = pending.take() {
                        push(&mut attributes, name, String::new());
                    }
                    pending = Some(text.to_ascii_lowercase());
                }
            }
            TagToken::Equals => {
                if pending.is_some() {
                    awaiting_value = true;
                }
            }
            TagToken::DoubleQuoted(value) | TagToken::SingleQuoted(value) => {
                if awaiting_value {
                    if let Some(name) = pending.take() {
                        push(&mut attributes, name, decode_entities(value));
                    }
                    awaiting_value = false;
                }
            }
            TagToken::Slash => {}
            TagToken::SelfClose | TagToken::End => {
                if let Some(name) = pending.take() {
                    push(&mut attributes, name, String::new());
                }
                return (attributes, matches!(token, TagToken::SelfClose));
            }
        }
    }

    // unterminated tag at end of input
    if let Some(name) = pending.take() {
        push(&mut attributes, name, String::new());
    }
    (attributes, false)
}

fn take_raw_text<'src>(lex: &mut Lexer<'src, ContentToken<'src>>, name: &str) -> &'src str {
    let rest = lex.remainder();
    let closing = format!("</{}", name);
    let end = rest
        .to_ascii_lowercase()
        .find(&closing)
        .unwrap_or(rest.len());
    lex.bump(end);
    &rest[..end]
}

fn doctype_name(raw: &str) -> String {
    // "<!DOCTYPE html>" -> "html"
    raw[9..raw.len() - 1].trim().to_string()
}

fn end_tag_name(raw: &str) -> String {
    raw[2..]
        .split(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Decode the character references browsers most commonly emit.
/// Unknown references are left untouched.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest.find(';').filter(|&semi| semi <= 10).and_then(|semi| {
            let entity = &rest[1..semi];
            decode_reference(entity).map(|ch| (ch, semi + 1))
        });

        match decoded {
            Some((ch, len)) => {
                out.push(ch);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(entity: &str) -> Option<char> {
    if let Some(num) = entity.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "copy" => Some('\u{a9}'),
        "reg" => Some('\u{ae}'),
        "hellip" => Some('\u{2026}'),
        "mdash" => Some('\u{2014}'),
        "ndash" => Some('\u{2013}'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_element() {
        let tokens = tokenize("<p class=\"a\">Hi</p>");
        assert_eq!(
            tokens,
            vec![
                Token::StartTag {
                    name: "p".to_string(),
                    attributes: vec![Attribute::new("class", "a")],
                    self_closing: false,
                },
                Token::Text("Hi".to_string()),
                Token::EndTag("p".to_string()),
            ]
        );
    }

    #[test]
    fn test_attribute_forms() {
        let tokens = tokenize("<input type=text disabled value='x y' data-k=\"1\">");
        match &tokens[0] {
            Token::StartTag { name, attributes, .. } => {
                assert_eq!(name, "input");
                assert_eq!(
                    attributes,
                    &vec![
                        Attribute::new("type", "text"),
                        Attribute::new("disabled", ""),
                        Attribute::new("value", "x y"),
                        Attribute::new("data-k", "1"),
                    ]
                );
            }
            other => panic!("Expected start tag, got {:?}", other),
        }
    }

    #[test]
    fn test_self_closing() {
        let tokens = tokenize("<br/><img src=\"a.png\" />");
        assert!(matches!(&tokens[0], Token::StartTag { self_closing: true, .. }));
        assert!(matches!(&tokens[1], Token::StartTag { self_closing: true, .. }));
    }

    #[test]
    fn test_script_is_raw() {
        let tokens = tokenize("<script>if (a < b && c) { x = '</p>'; }</script>");
        assert_eq!(tokens[1], Token::RawText("if (a < b && c) { x = '</p>'; }".to_string()));
        assert_eq!(tokens[2], Token::EndTag("script".to_string()));
    }

    #[test]
    fn test_doctype_and_comment() {
        let tokens = tokenize("<!DOCTYPE html><!-- note -- here -->");
        assert_eq!(tokens[0], Token::Doctype("html".to_string()));
        assert_eq!(tokens[1], Token::Comment(" note -- here ".to_string()));
    }

    #[test]
    fn test_stray_less_than_is_text() {
        let tokens = tokenize("a < b");
        let text: String = tokens
            .iter()
            .map(|t| match t {
                Token::Text(s) => s.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(text, "a < b");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(decode_entities("&#65;&#x42;&nbsp;"), "AB\u{a0}");
        assert_eq!(decode_entities("&unknown; & done"), "&unknown; & done");
    }
}
