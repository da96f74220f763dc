use serde::Serialize;
use serde_json::{Value, json};

/// One selector block of the graph style sheet.
#[derive(Debug, Clone, Serialize)]
pub struct StyleRule {
    pub selector: String,
    pub style: Value,
}

fn rule(selector: &str, style: Value) -> StyleRule {
    StyleRule {
        selector: selector.to_string(),
        style,
    }
}

/// Datasets: blue rounded boxes. Jobs: orange ellipses. Dimmed elements fade.
pub fn default_style_sheet() -> Vec<StyleRule> {
    vec![
        rule(
            "node",
            json!({
                "label": "data(label)",
                "color": "#000000",
                "text-valign": "center",
                "text-halign": "center",
                "font-size": 12,
                "text-wrap": "wrap",
                "text-max-width": 140,
                "padding": "10px",
                "width": "label",
                "height": "label"
            }),
        ),
        rule(
            "node[type = 'dataset']",
            json!({
                "shape": "round-rectangle",
                "background-color": "#e3f2fd",
                "border-width": 1,
                "border-color": "#1565c0"
            }),
        ),
        rule(
            "node[type = 'job']",
            json!({
                "shape": "ellipse",
                "background-color": "#fff3e0",
                "border-width": 1,
                "border-color": "#ef6c00"
            }),
        ),
        rule(
            "edge",
            json!({
                "curve-style": "bezier",
                "target-arrow-shape": "triangle",
                "target-arrow-color": "#555",
                "line-color": "#999",
                "label": "data(label)",
                "font-size": 9,
                "color": "#555"
            }),
        ),
        rule("node.hit", json!({ "border-width": 3 })),
        rule(".faded", json!({ "opacity": 0.15, "text-opacity": 0.15 })),
    ]
}
