use crate::{
    foundation::{
        core::NodeId,
        error::{StageError, StageResult},
    },
    page::model::{NodeDef, PageDef},
    scroll::boundary::{Boundary, EndBoundary},
    stage::core::Stage,
};

/// One registered section.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SectionEntry {
    /// Stable id.
    pub id: String,
    /// Section root node.
    pub root: NodeId,
    /// Start of the section's primary reveal range.
    pub start: Boundary,
    /// End of the section's primary reveal range.
    pub end: EndBoundary,
}

/// Section roots of a mounted page, in document order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct SectionRegistry {
    sections: Vec<SectionEntry>,
    overlay: Option<NodeId>,
}

impl SectionRegistry {
    /// Insert every section (and the overlay) of `page` into the stage's document.
    #[tracing::instrument(level = "debug", skip_all, fields(sections = page.sections.len()))]
    pub fn build(stage: &mut Stage, page: &PageDef) -> StageResult<Self> {
        let mut reg = Self::default();
        let doc = stage.scene().root();
        for s in &page.sections {
            let root = append_tree(stage, doc, &s.node)?;
            reg.register(&s.id, root, s.start, s.end)?;
        }
        if let Some(overlay) = &page.overlay {
            let root = stage.append(doc, overlay.spec().fixed())?;
            for child in &overlay.children {
                for _ in 0..child.repeat {
                    append_tree(stage, root, child)?;
                }
            }
            reg.overlay = Some(root);
        }
        Ok(reg)
    }

    /// Register a section root. Ids must be unique.
    pub fn register(
        &mut self,
        id: &str,
        root: NodeId,
        start: Boundary,
        end: EndBoundary,
    ) -> StageResult<()> {
        if self.get(id).is_some() {
            return Err(StageError::validation(format!(
                "section '{id}' is already registered"
            )));
        }
        self.sections.push(SectionEntry {
            id: id.to_string(),
            root,
            start,
            end,
        });
        Ok(())
    }

    /// Look up a section by id.
    pub fn get(&self, id: &str) -> Option<&SectionEntry> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Root node of a section, or a validation error naming the id.
    pub fn root(&self, id: &str) -> StageResult<NodeId> {
        self.get(id)
            .map(|s| s.root)
            .ok_or_else(|| StageError::validation(format!("unknown section '{id}'")))
    }

    /// Sections in document order.
    pub fn iter(&self) -> impl Iterator<Item = &SectionEntry> + '_ {
        self.sections.iter()
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Fixed overlay container, if the page has one.
    pub fn overlay(&self) -> Option<NodeId> {
        self.overlay
    }
}

fn append_tree(stage: &mut Stage, parent: NodeId, def: &NodeDef) -> StageResult<NodeId> {
    let id = stage.append(parent, def.spec())?;
    for child in &def.children {
        for _ in 0..child.repeat {
            append_tree(stage, id, child)?;
        }
    }
    Ok(id)
}

#[cfg(test)]
#[path = "../../tests/unit/page/registry.rs"]
mod tests;
