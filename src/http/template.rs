//! Menu template rendering.
//!
//! Templates live under the static root and use Jinja syntax, e.g.
//! `{% for item in version_items %}{{ item.version }}{% endfor %}`.
//! Output is HTML-escaped.

use minijinja::{AutoEscape, Environment};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

use crate::menu::TemplateData;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template path {0} escapes the static root")]
    Path(String),

    #[error("can't read template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template error: {0}")]
    Render(#[from] minijinja::Error),
}

/// Renders template files with `TemplateData`.
#[derive(Debug)]
pub struct TemplateRenderer {
    root: PathBuf,
    env: Environment<'static>,
}

impl TemplateRenderer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        Self {
            root: root.into(),
            env,
        }
    }

    /// File backing a request path; `..` segments are rejected.
    pub fn resolve(&self, request_path: &str) -> Result<PathBuf, TemplateError> {
        let relative = Path::new(request_path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(TemplateError::Path(request_path.to_string()));
        }
        Ok(self.root.join(relative))
    }

    pub async fn render(&self, request_path: &str, data: &TemplateData) -> Result<String, TemplateError> {
        let path = self.resolve(request_path)?;
        let source = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| TemplateError::Io { path, source })?;
        Ok(self.env.render_str(&source, data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuItem;

    #[test]
    fn test_resolve_rejects_traversal() {
        let renderer = TemplateRenderer::new("root");
        assert_eq!(
            renderer.resolve("/en/includes/menu.html").unwrap(),
            PathBuf::from("root/en/includes/menu.html")
        );
        assert!(matches!(
            renderer.resolve("/en/includes/../../secret"),
            Err(TemplateError::Path(_))
        ));
    }

    #[tokio::test]
    async fn test_render_menu() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("includes")).unwrap();
        std::fs::write(
            dir.path().join("includes/menu.html"),
            "{{ current_lang }}:{% for item in version_items %}[{{ item.channel }}={{ item.version }}]{% endfor %}",
        )
        .unwrap();

        let data = TemplateData {
            version_items: vec![MenuItem {
                group: "1.2".into(),
                channel: "stable".into(),
                version: "<v1.2>".into(),
                version_url: "v1.2".into(),
                is_current: true,
            }],
            ..TemplateData::default()
        };

        let renderer = TemplateRenderer::new(dir.path());
        let html = renderer.render("/includes/menu.html", &data).await.unwrap();
        assert_eq!(html, "en:[stable=&lt;v1.2&gt;]");

        assert!(matches!(
            renderer.render("/includes/missing.html", &data).await,
            Err(TemplateError::Io { .. })
        ));
    }
}
