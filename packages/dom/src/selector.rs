//! Minimal element selectors: `tag`, `#id`, `.class`, each with an optional
//! `[n]` suffix selecting the n-th match (zero based).

use crate::error::{DomError, DomResult};
use crate::node::NodeRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Tag(String),
    Id(String),
    Class(String),
}

impl Selector {
    pub fn matches(&self, node: &NodeRef) -> bool {
        match self {
            Selector::Tag(tag) => node.is_tag(tag),
            Selector::Id(id) => node.get_attribute("id").as_deref() == Some(id.as_str()),
            Selector::Class(class) => node.has_class(class),
        }
    }
}

/// Parse a selector into its matcher and optional index
pub fn parse_selector(source: &str) -> DomResult<(Selector, Option<usize>)> {
    let source = source.trim();
    let (body, index) = match source.strip_suffix(']').and_then(|s| s.rsplit_once('[')) {
        Some((body, index)) => {
            let index = index
                .trim()
                .parse::<usize>()
                .map_err(|_| DomError::InvalidSelector(source.to_string()))?;
            (body, Some(index))
        }
        None => (source, None),
    };

    let valid = |name: &str| {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    };

    let selector = if let Some(id) = body.strip_prefix('#') {
        valid(id).then(|| Selector::Id(id.to_string()))
    } else if let Some(class) = body.strip_prefix('.') {
        valid(class).then(|| Selector::Class(class.to_string()))
    } else {
        valid(body).then(|| Selector::Tag(body.to_ascii_lowercase()))
    };

    selector
        .map(|s| (s, index))
        .ok_or_else(|| DomError::InvalidSelector(source.to_string()))
}

/// All matching descendants of `scope`, in document order
pub fn select_all(scope: &NodeRef, selector: &str) -> DomResult<Vec<NodeRef>> {
    let (matcher, index) = parse_selector(selector)?;
    let matches: Vec<NodeRef> = scope
        .descendants()
        .into_iter()
        .filter(|n| n.is_element() && matcher.matches(n))
        .collect();

    Ok(match index {
        Some(i) => matches.into_iter().nth(i).into_iter().collect(),
        None => matches,
    })
}

pub fn select_first(scope: &NodeRef, selector: &str) -> DomResult<Option<NodeRef>> {
    Ok(select_all(scope, selector)?.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_select_by_kind() {
        let doc = parse("<body><p id=\"a\">1</p><p class=\"x y\">2</p><div class=\"y\">3</div></body>");
        let root = doc.root();
        assert_eq!(select_all(root, "p").unwrap().len(), 2);
        assert_eq!(select_first(root, "#a").unwrap().unwrap().text_content(), "1");
        assert_eq!(select_all(root, ".y").unwrap().len(), 2);
        assert_eq!(select_first(root, ".y[1]").unwrap().unwrap().text_content(), "3");
        assert!(select_first(root, "p[5]").unwrap().is_none());
    }

    #[test]
    fn test_invalid_selector() {
        assert!(parse_selector("").is_err());
        assert!(parse_selector("div > p").is_err());
        assert!(parse_selector("p[x]").is_err());
    }
}
