//! Rendering: style sheet declared as data, self-contained HTML output.
//!
//! Layout and drawing happen in the browser (Cytoscape.js); this module only
//! produces what the library consumes.

pub mod html;
pub mod style;

pub use html::{render_error_page, render_viewer};
pub use style::{StyleRule, default_style_sheet};

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
