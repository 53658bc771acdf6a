//! Markup rendering shared by the resource selector and the template aggregator.
//!
//! Values are interpolated as given; paths and template bodies are trusted
//! configuration, not user input.

use crate::resources::ResourceReference;

/// Script type used when a reference does not set one.
pub const SCRIPT_DEFAULT: &str = "text/javascript";

/// Script type for ES modules.
pub const SCRIPT_MODULE: &str = "module";

/// Tag shape chosen from a reference's effective extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    Script,
    Stylesheet,
    LessStylesheet,
}

impl RenderKind {
    /// `None` means the extension is not renderable.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "js" => Some(RenderKind::Script),
            "css" => Some(RenderKind::Stylesheet),
            "less" => Some(RenderKind::LessStylesheet),
            _ => None,
        }
    }
}

/// Render one reference as a `<script>` or `<link>` tag.
pub fn render_reference(reference: &ResourceReference) -> Option<String> {
    let kind = RenderKind::from_extension(reference.effective_extension())?;
    let src = reference.src();

    Some(match kind {
        RenderKind::Script => format!(
            r#"<script type="{}" src="{}"></script>"#,
            reference.script_type().unwrap_or(SCRIPT_DEFAULT),
            src
        ),
        RenderKind::Stylesheet => {
            format!(r#"<link rel="stylesheet" type="text/css" href="{src}" />"#)
        }
        RenderKind::LessStylesheet => {
            format!(r#"<link rel="stylesheet/less" type="text/css" href="{src}" />"#)
        }
    })
}

/// Wrap a template body in an inline `text/template` block.
pub fn render_template_block(identifier: &str, contents: &str) -> String {
    format!(r#"<script id="tpl{identifier}" type="text/template">{contents}</script>"#)
}

/// Join rendered lines with newlines; nothing rendered yields `None`.
pub fn join_lines<I>(lines: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    let lines: Vec<String> = lines.into_iter().collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_script_with_version() {
        let reference = ResourceReference::new("app.js").with_version("3");
        let tag = render_reference(&reference).unwrap();
        assert_eq!(tag, r#"<script type="text/javascript" src="app.js?ver=3"></script>"#);
    }

    #[test]
    fn test_render_module_script() {
        let reference = ResourceReference::new("/js/main.mjs")
            .with_extension("js")
            .with_script_type(SCRIPT_MODULE);
        assert_eq!(
            render_reference(&reference).unwrap(),
            r#"<script type="module" src="/js/main.mjs"></script>"#
        );
    }

    #[test]
    fn test_render_stylesheets() {
        assert_eq!(
            render_reference(&ResourceReference::new("site.css")).unwrap(),
            r#"<link rel="stylesheet" type="text/css" href="site.css" />"#
        );
        assert_eq!(
            render_reference(&ResourceReference::new("theme.less").with_version("2")).unwrap(),
            r#"<link rel="stylesheet/less" type="text/css" href="theme.less?ver=2" />"#
        );
    }

    #[test]
    fn test_unsupported_extension_is_dropped() {
        assert!(render_reference(&ResourceReference::new("blob.bin")).is_none());
        assert!(render_reference(&ResourceReference::new("app.js").with_extension("bin")).is_none());
        assert!(render_reference(&ResourceReference::new("/no/extension")).is_none());
    }

    #[test]
    fn test_template_block() {
        assert_eq!(
            render_template_block("-user-card", "<b>{{name}}</b>"),
            r#"<script id="tpl-user-card" type="text/template"><b>{{name}}</b></script>"#
        );
    }

    #[test]
    fn test_join_lines() {
        assert_eq!(join_lines(Vec::new()), None);
        assert_eq!(
            join_lines(vec!["a".to_string(), "b".to_string()]),
            Some("a\nb".to_string())
        );
    }
}
