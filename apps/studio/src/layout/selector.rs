//! Template selection: a total mapping from template identifiers to the three
//! layout renderers.

use crate::layout::classic::ClassicRenderer;
use crate::layout::corporate::CorporateRenderer;
use crate::layout::modern::ModernRenderer;
use crate::layout::tree::LayoutTree;
use crate::models::{ResumeContent, TemplateId};

/// A layout policy turning a content snapshot into a layout tree.
///
/// Implementations are pure: the same content always yields an equal tree,
/// and nothing derived while rendering is written back into the content.
pub trait LayoutRenderer {
    fn template(&self) -> TemplateId;
    fn render(&self, content: &ResumeContent) -> LayoutTree;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    Classic(ClassicRenderer),
    Corporate(CorporateRenderer),
    Modern(ModernRenderer),
}

impl LayoutRenderer for Renderer {
    fn template(&self) -> TemplateId {
        match self {
            Renderer::Classic(r) => r.template(),
            Renderer::Corporate(r) => r.template(),
            Renderer::Modern(r) => r.template(),
        }
    }

    fn render(&self, content: &ResumeContent) -> LayoutTree {
        match self {
            Renderer::Classic(r) => r.render(content),
            Renderer::Corporate(r) => r.render(content),
            Renderer::Modern(r) => r.render(content),
        }
    }
}

pub fn select_renderer(template: TemplateId) -> Renderer {
    match template {
        TemplateId::MinimalClassic => Renderer::Classic(ClassicRenderer),
        TemplateId::CorporateBlue => Renderer::Corporate(CorporateRenderer),
        TemplateId::ModernProfessional => Renderer::Modern(ModernRenderer),
    }
}

/// Same as `select_renderer` for a raw identifier; unknown names get Classic.
pub fn select_renderer_by_name(name: &str) -> Renderer {
    select_renderer(TemplateId::from_name(name))
}

/// Renders `content` with the layout named in its metadata.
pub fn render_current(content: &ResumeContent) -> LayoutTree {
    select_renderer(content.metadata.template).render(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fixtures::make_content;

    #[test]
    fn test_each_template_selects_its_renderer() {
        for template in TemplateId::ALL {
            assert_eq!(select_renderer(template).template(), template);
        }
        assert!(matches!(
            select_renderer_by_name("corporate-blue"),
            Renderer::Corporate(_)
        ));
        assert!(matches!(
            select_renderer_by_name("modern-professional"),
            Renderer::Modern(_)
        ));
    }

    #[test]
    fn test_unknown_name_selects_classic() {
        for name in ["unknown-id", "", "Minimal-Classic", "corporate_blue"] {
            assert_eq!(
                select_renderer_by_name(name),
                Renderer::Classic(ClassicRenderer),
                "name {name:?}"
            );
        }
    }

    #[test]
    fn test_render_current_follows_metadata() {
        let mut content = make_content();
        content.metadata.template = TemplateId::ModernProfessional;
        let tree = render_current(&content);
        assert_eq!(tree.template, TemplateId::ModernProfessional);
        assert_eq!(tree, ModernRenderer.render(&content));
    }
}
