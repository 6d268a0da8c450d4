use std::fmt;

use crate::{
    foundation::{
        core::NodeId,
        error::{StageError, StageResult},
    },
    scene::tree::Scene,
};

/// A class/tag selector with descendant combinators, e.g. `.hero-headline span`.
///
/// Each whitespace-separated compound is `tag`, `.class`, `tag.class` or `.a.b`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Selector {
    source: String,
    parts: Vec<Compound>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    /// Parse a selector. Malformed input is a programmer error and is rejected.
    pub fn parse(s: &str) -> StageResult<Self> {
        let parts = s
            .split_whitespace()
            .map(parse_compound)
            .collect::<StageResult<Vec<_>>>()?;
        if parts.is_empty() {
            return Err(StageError::validation("selector must be non-empty"));
        }
        Ok(Self {
            source: s.split_whitespace().collect::<Vec<_>>().join(" "),
            parts,
        })
    }

    /// Single-class selector (`.name`). The name is taken as-is.
    pub fn class(name: &str) -> Self {
        Self {
            source: format!(".{name}"),
            parts: vec![Compound {
                tag: None,
                classes: vec![name.to_string()],
            }],
        }
    }

    /// Normalized source text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `node` matches, considering its ancestors for descendant parts.
    pub fn matches(&self, scene: &Scene, node: NodeId) -> bool {
        let Some((last, rest)) = self.parts.split_last() else {
            return false;
        };
        if !compound_matches(scene, node, last) {
            return false;
        }

        // Greedy ancestor walk is exact for descendant-only chains.
        let mut pending = rest.iter().rev().peekable();
        let mut cursor = scene.node(node).and_then(|n| n.parent);
        while let (Some(want), Some(anc)) = (pending.peek(), cursor) {
            if compound_matches(scene, anc, want) {
                pending.next();
            }
            cursor = scene.node(anc).and_then(|n| n.parent);
        }
        pending.peek().is_none()
    }
}

fn parse_compound(tok: &str) -> StageResult<Compound> {
    let mut pieces = tok.split('.');
    let head = pieces.next().unwrap_or_default();
    let tag = if head.is_empty() {
        None
    } else {
        if !is_ident(head) {
            return Err(StageError::validation(format!(
                "invalid tag '{head}' in selector"
            )));
        }
        Some(head.to_ascii_lowercase())
    };

    let mut classes = Vec::new();
    for class in pieces {
        if !is_ident(class) {
            return Err(StageError::validation(format!(
                "invalid class '.{class}' in selector"
            )));
        }
        classes.push(class.to_string());
    }

    if tag.is_none() && classes.is_empty() {
        return Err(StageError::validation(format!(
            "selector compound '{tok}' is empty"
        )));
    }
    Ok(Compound { tag, classes })
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '-')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn compound_matches(scene: &Scene, id: NodeId, c: &Compound) -> bool {
    let Some(node) = scene.node(id) else {
        return false;
    };
    if let Some(tag) = &c.tag
        && !node.tag.eq_ignore_ascii_case(tag)
    {
        return false;
    }
    c.classes.iter().all(|want| node.has_class(want))
}

impl TryFrom<String> for Selector {
    type Error = StageError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Selector> for String {
    fn from(s: Selector) -> Self {
        s.source
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/selector.rs"]
mod tests;
