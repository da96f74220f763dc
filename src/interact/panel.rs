use crate::graph::Node;
use crate::meta;
use crate::render::escape_html;

use std::fmt;

/// Metadata listing shown for a clicked node. Each click replaces the last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPanel {
    pub node_id: String,
    pub title: String,
    /// (display key, display value); falsy values already dropped.
    pub rows: Vec<(String, String)>,
}

impl DetailPanel {
    pub fn for_node(node: &Node) -> Self {
        let rows = meta::visible_entries(&node.metadata)
            .map(|(k, v)| (meta::display_key(k), v.to_string()))
            .collect();
        Self {
            node_id: node.id.clone(),
            title: node.label.clone(),
            rows,
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = format!("<h3>{}</h3>\n<table class=\"meta\">\n", escape_html(&self.title));
        for (k, v) in &self.rows {
            out.push_str(&format!(
                "  <tr><th>{}</th><td>{}</td></tr>\n",
                escape_html(k),
                escape_html(v)
            ));
        }
        out.push_str("</table>\n");
        if self.rows.is_empty() {
            out.push_str("<p class=\"muted\">No metadata</p>\n");
        }
        out
    }
}

impl fmt::Display for DetailPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.title, self.node_id)?;
        if self.rows.is_empty() {
            return writeln!(f, "  (no metadata)");
        }
        let width = self.rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (k, v) in &self.rows {
            writeln!(f, "  {:<width$}  {}", k, v, width = width)?;
        }
        Ok(())
    }
}
