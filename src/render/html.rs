use crate::model::ViewerData;
use crate::render::escape_html;

/// Render the self-contained viewer page (data embedded as JSON).
///
/// Important: we avoid `format!()` because the page contains many `{}` from JS
/// template literals (e.g., `${x}`), which would conflict with Rust formatting.
pub fn render_viewer(data: &ViewerData) -> anyhow::Result<String> {
    let json = script_safe_json(&serde_json::to_string(data)?);
    let title = escape_html(&data.title);

    Ok(fill(VIEWER_TEMPLATE, &[("__TITLE__", title.as_str()), ("__DATA__", json.as_str())]))
}

/// Page shown instead of the viewer when the events cannot be loaded or built.
pub fn render_error_page(title: &str, message: &str) -> String {
    let title = escape_html(title);
    let message = escape_html(message);
    fill(ERROR_TEMPLATE, &[("__TITLE__", title.as_str()), ("__MESSAGE__", message.as_str())])
}

/// `<`, `>` and `&` only occur inside JSON strings, so their `\uXXXX` forms
/// decode to the same values while no markup (`</script>`, `<!--`) survives.
fn script_safe_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(c),
        }
    }
    out
}

/// Single pass over the template: substituted values are never rescanned,
/// so a value containing a placeholder token stays literal.
fn fill(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let next = slots
            .iter()
            .filter_map(|(token, value)| rest.find(token).map(|at| (at, *token, *value)))
            .min_by_key(|(at, _, _)| *at);
        let Some((at, token, value)) = next else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + token.len()..];
    }
}

const ERROR_TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>__TITLE__ (failed)</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  .error { margin: 32px; padding: 16px 20px; border: 1px solid #e57373; border-radius: 8px; background: #ffebee; color: #b71c1c; }
  pre { white-space: pre-wrap; font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace; }
</style>
</head>
<body>
<div class="error" id="error">
  <h2>Could not load lineage</h2>
  <pre>__MESSAGE__</pre>
</div>
</body>
</html>
"#;

const VIEWER_TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>__TITLE__</title>
<script src="https://unpkg.com/cytoscape@3.28.1/dist/cytoscape.min.js"></script>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; display: flex; gap: 16px; align-items: center; flex-wrap: wrap; }
  .container { display: flex; height: calc(100vh - 58px); }
  #lineage { flex: 1; }
  .sidebar { width: 340px; border-left: 1px solid #ddd; padding: 12px; overflow: auto; }

  .summary { display: flex; gap: 12px; flex-wrap: wrap; font-size: 14px; color: #333; }
  .pill { padding: 4px 8px; border: 1px solid #ddd; border-radius: 999px; background: #fafafa; }
  .muted { color: #777; font-size: 12px; }

  table.meta { border-collapse: collapse; width: 100%; margin-top: 8px; }
  table.meta th, table.meta td { border-bottom: 1px solid #eee; padding: 6px 8px; text-align: left; font-size: 14px; vertical-align: top; }
  table.meta th { white-space: nowrap; color: #555; font-weight: 600; }
</style>
</head>
<body>
<header>
  <b>__TITLE__</b>
  <div class="summary" id="summary"></div>
  <input id="search" placeholder="Search datasets and jobs..." style="flex:1; min-width: 200px; padding: 6px 8px; border: 1px solid #ddd; border-radius: 6px;">
  <span id="hits" class="muted"></span>
</header>

<div class="container">
  <div id="lineage"></div>
  <div class="sidebar">
    <div id="details"><p class="muted">Click a dataset to see its metadata.</p></div>
  </div>
</div>

<script>
// Embedded viewer data (JSON object literal)
const DATA = __DATA__;

function renderSummary() {
  const t = DATA.totals;
  document.getElementById("summary").innerHTML = `
    <span class="pill">events: <b>${t.events}</b></span>
    <span class="pill">jobs: <b>${t.jobs}</b></span>
    <span class="pill">datasets: <b>${t.datasets}</b></span>
    <span class="pill">inputs: <b>${t.input_edges}</b></span>
    <span class="pill">outputs: <b>${t.output_edges}</b></span>
  `;
}

const cy = cytoscape({
  container: document.getElementById("lineage"),
  elements: [...DATA.elements.nodes, ...DATA.elements.edges],
  layout: DATA.layout,
  style: DATA.style
});

function emphasizeOnly(keepNodes, keepEdges) {
  cy.batch(() => {
    cy.elements().addClass("faded");
    cy.nodes().filter(n => keepNodes.has(n.id())).removeClass("faded");
    cy.edges().filter(e => keepEdges.has(e.id())).removeClass("faded");
  });
}

function clearAll() {
  cy.batch(() => {
    cy.elements().removeClass("faded");
    cy.nodes().removeClass("hit");
  });
}

cy.on("mouseover", "node", (evt) => {
  const l = DATA.lineage[evt.target.id()];
  if (!l) return;
  emphasizeOnly(new Set(l.nodes), new Set(l.edges));
});

cy.on("mouseout", "node", () => clearAll());

cy.on("tap", "node", (evt) => {
  const html = DATA.panels[evt.target.id()];
  if (html === undefined) return;
  document.getElementById("details").innerHTML = html;
});

const searchEl = document.getElementById("search");
const hitsEl = document.getElementById("hits");

function runSearch(raw) {
  const q = (raw || "").trim().toLowerCase();
  if (!q) {
    clearAll();
    if (hitsEl) hitsEl.textContent = "";
    return;
  }
  const keepNodes = new Set();
  const keepEdges = new Set();
  const hits = [];
  for (const [id, blob] of Object.entries(DATA.search)) {
    if (!blob.includes(q)) continue;
    hits.push(id);
    const l = DATA.lineage[id];
    l.nodes.forEach(n => keepNodes.add(n));
    l.edges.forEach(e => keepEdges.add(e));
  }
  emphasizeOnly(keepNodes, keepEdges);
  cy.nodes().removeClass("hit");
  hits.forEach(id => cy.getElementById(id).addClass("hit"));
  if (hitsEl) hitsEl.textContent = hits.length === 1 ? "1 result" : `${hits.length} results`;
}

if (searchEl) {
  searchEl.addEventListener("input", (e) => runSearch(e.target.value));
}

renderSummary();
</script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_page_escapes_message() {
        let page = render_error_page("Lineage", "event 0: <job> missing");
        assert!(page.contains("event 0: &lt;job&gt; missing"));
        assert!(page.contains("Could not load lineage"));
        assert!(!page.contains("cytoscape"));
    }

    #[test]
    fn json_markup_characters_become_unicode_escapes() {
        assert_eq!(
            script_safe_json(r#"{"note":"<!--<script>&"}"#),
            r#"{"note":"\u003c!--\u003cscript\u003e\u0026"}"#
        );
        let decoded: serde_json::Value =
            serde_json::from_str(&script_safe_json(r#"{"note":"a<b>&c"}"#)).unwrap();
        assert_eq!(decoded["note"], "a<b>&c");
    }

    #[test]
    fn filled_values_are_not_rescanned() {
        let out = fill("<t>__A__</t>__B__", &[("__A__", "__B__"), ("__B__", "x")]);
        assert_eq!(out, "<t>__B__</t>x");
    }

    #[test]
    fn error_page_keeps_placeholder_like_title_literal() {
        let page = render_error_page("__MESSAGE__", "boom");
        assert!(page.contains("<title>__MESSAGE__ (failed)</title>"));
        assert_eq!(page.matches("boom").count(), 1);
    }
}
