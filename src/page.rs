use std::fmt::Write as _;

use anyhow::Result;

use crate::callbacks::Dependency;
use crate::layout::{Component, Dropdown, Heading, Layout, RangeSlider};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Client side of the callback protocol: read control values, post them for
/// every output that depends on the changed control, re-render the figure.
const CLIENT_SCRIPT: &str = r#"
(function () {
  const deps = JSON.parse(document.getElementById('dash-dependencies').textContent);
  const values = {};

  function collect(inputs) {
    const out = {};
    for (const id of inputs) out[id] = values[id];
    return out;
  }

  async function refresh(output, inputs) {
    const resp = await fetch('/_dash-update-component', {
      method: 'POST',
      headers: {'Content-Type': 'application/json'},
      body: JSON.stringify({output: output, inputs: collect(inputs)}),
    });
    if (!resp.ok) {
      console.error(output, resp.status, await resp.text());
      return;
    }
    const body = await resp.json();
    Plotly.react(output, body.figure.data, body.figure.layout);
  }

  function changed(id, value) {
    values[id] = value;
    for (const dep of deps) {
      if (dep.inputs.includes(id)) refresh(dep.output, dep.inputs);
    }
  }

  document.querySelectorAll('.dash-dropdown').forEach(function (root) {
    const id = root.dataset.id;
    const select = root.querySelector('select');
    const search = root.querySelector('input[type=search]');
    values[id] = select.value;
    select.addEventListener('change', function () { changed(id, select.value); });
    if (search) {
      search.addEventListener('input', function () {
        const needle = search.value.toLowerCase();
        for (const opt of select.options) {
          opt.hidden = !opt.text.toLowerCase().includes(needle);
        }
      });
      search.addEventListener('keydown', function (event) {
        if (event.key !== 'Enter') return;
        event.preventDefault();
        const first = Array.from(select.options).find(function (opt) { return !opt.hidden; });
        if (first && first.value !== select.value) {
          select.value = first.value;
          changed(id, select.value);
        }
      });
    }
  });

  document.querySelectorAll('.dash-range-slider').forEach(function (root) {
    const id = root.dataset.id;
    const [lo, hi] = root.querySelectorAll('input[type=range]');
    const label = root.querySelector('.dash-range-value');
    function current() { return [Number(lo.value), Number(hi.value)]; }
    function show(range) { label.textContent = range[0] + ' - ' + range[1] + ' Kg'; }
    // Range inputs snap to the step; the exact default lives on the root.
    values[id] = JSON.parse(root.dataset.value);
    show(values[id]);
    for (const handle of [lo, hi]) {
      handle.addEventListener('input', function () { show(current()); });
      handle.addEventListener('change', function () { changed(id, current()); });
    }
  });

  for (const dep of deps) refresh(dep.output, dep.inputs);
})();
"#;

/// Render the full dashboard page.
pub fn render(layout: &Layout, dependencies: &[Dependency]) -> Result<String> {
    let deps_json = script_safe(&serde_json::to_string(dependencies)?);

    let mut body = String::new();
    for component in &layout.components {
        render_component(&mut body, component)?;
    }

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_CDN}"></script>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
.dash-dropdown input[type=search] {{ width: 100%; box-sizing: border-box; margin-bottom: 4px; }}
.dash-dropdown select {{ width: 100%; }}
.dash-range-slider input[type=range] {{ width: 100%; }}
.dash-marks {{ display: flex; justify-content: space-between; font-size: 12px; color: #666; }}
</style>
</head>
<body>
{body}<script id="dash-dependencies" type="application/json">{deps_json}</script>
<script>{CLIENT_SCRIPT}</script>
</body>
</html>
"#,
        title = escape(&layout.title),
    ))
}

fn render_component(out: &mut String, component: &Component) -> std::fmt::Result {
    match component {
        Component::Heading(h) => render_heading(out, h),
        Component::Dropdown(d) => render_dropdown(out, d),
        Component::Paragraph { text } => writeln!(out, "<p>{}</p>", escape(text)),
        Component::RangeSlider(s) => render_slider(out, s),
        Component::Graph { id } => writeln!(out, r#"<div><div id="{}"></div></div>"#, escape(id)),
        Component::Break => writeln!(out, "<br>"),
    }
}

fn render_heading(out: &mut String, h: &Heading) -> std::fmt::Result {
    writeln!(
        out,
        r#"<h1 style="text-align: {}; color: {}; font-size: {}px">{}</h1>"#,
        escape(&h.text_align),
        escape(&h.color),
        h.font_size,
        escape(&h.text)
    )
}

fn render_dropdown(out: &mut String, d: &Dropdown) -> std::fmt::Result {
    writeln!(out, r#"<div class="dash-dropdown" data-id="{}">"#, escape(&d.id))?;
    if d.searchable {
        writeln!(
            out,
            r#"<input type="search" placeholder="{}">"#,
            escape(&d.placeholder)
        )?;
    }
    writeln!(out, r#"<select id="{}">"#, escape(&d.id))?;
    for opt in &d.options {
        let selected = if opt.value == d.value { " selected" } else { "" };
        writeln!(
            out,
            r#"<option value="{}"{selected}>{}</option>"#,
            escape(&opt.value),
            escape(&opt.label)
        )?;
    }
    writeln!(out, "</select>\n</div>")
}

fn render_slider(out: &mut String, s: &RangeSlider) -> std::fmt::Result {
    let [low, high] = s.value;
    writeln!(
        out,
        r#"<div class="dash-range-slider" data-id="{}" data-value="[{low},{high}]">"#,
        escape(&s.id)
    )?;
    for value in s.value {
        writeln!(
            out,
            r#"<input type="range" min="{}" max="{}" step="{}" value="{}">"#,
            s.min, s.max, s.step, value
        )?;
    }
    writeln!(out, r#"<div class="dash-marks">"#)?;
    for label in s.marks.values() {
        writeln!(out, "<span>{}</span>", escape(label))?;
    }
    writeln!(out, "</div>\n<div class=\"dash-range-value\"></div>\n</div>")
}

/// Minimal HTML escaping for text and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// JSON embedded in a `<script>` block must not close the tag early.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::dashboard_callbacks;
    use crate::data::model::{LaunchRecord, LaunchTable, Outcome};
    use crate::layout::default_payload_range;

    fn page() -> String {
        let table = LaunchTable::from_records(vec![
            LaunchRecord::new("KSC LC-39A", 2490.0, Outcome::Success, "FT"),
            LaunchRecord::new("<b>Pad</b>", 5600.0, Outcome::Failure, "FT"),
        ]);
        render(&Layout::build(&table), &dashboard_callbacks().dependencies()).unwrap()
    }

    #[test]
    fn page_declares_controls_and_graphs() {
        let html = page();
        assert!(html.contains("SpaceX Launch Records Dashboard"));
        assert!(html.contains(r#"<select id="site-dropdown">"#));
        assert!(html.contains(r#"<option value="All Sites" selected>All Sites</option>"#));
        assert!(html.contains(r#"placeholder="Select a Launch Site""#));
        assert!(html.contains(r#"<div id="success-pie-chart">"#));
        assert!(html.contains(r#"<div id="success-payload-scatter-chart">"#));
        assert!(html.contains(r#"value="2490""#));
        assert!(html.contains(r#"value="5600""#));
        assert!(html.contains("<span>10000 Kg</span>"));
    }

    #[test]
    fn site_names_are_escaped() {
        let html = page();
        assert!(html.contains("&lt;b&gt;Pad&lt;/b&gt;"));
        assert!(!html.contains("<b>Pad</b>"));
    }

    #[test]
    fn slider_carries_exact_default_range() {
        let table = LaunchTable::from_records(vec![
            LaunchRecord::new("CCAFS LC-40", 525.0, Outcome::Success, "v1.0"),
            LaunchRecord::new("KSC LC-39A", 9600.0, Outcome::Failure, "FT"),
        ]);
        let html = render(&Layout::build(&table), &dashboard_callbacks().dependencies()).unwrap();

        let range = default_payload_range(&table);
        assert_eq!((range.low, range.high), (525.0, 9600.0));
        let expected = format!(r#"data-value="[{},{}]""#, range.low, range.high);
        assert!(html.contains(&expected), "missing {expected}");

        let attr = html.split(r#"data-value=""#).nth(1).unwrap();
        let embedded: [f64; 2] = serde_json::from_str(&attr[..attr.find('"').unwrap()]).unwrap();
        assert_eq!(embedded, [range.low, range.high]);
        assert!(CLIENT_SCRIPT.contains("values[id] = JSON.parse(root.dataset.value);"));
    }

    #[test]
    fn dropdown_search_only_filters_options() {
        let start = CLIENT_SCRIPT.find("search.addEventListener('input'").unwrap();
        let end = start + CLIENT_SCRIPT[start..].find("});").unwrap();
        let on_input = &CLIENT_SCRIPT[start..end];
        assert!(on_input.contains("opt.hidden"));
        assert!(!on_input.contains("changed("));
        assert!(!on_input.contains("select.value ="));
        assert!(CLIENT_SCRIPT.contains("event.key !== 'Enter'"));
    }

    #[test]
    fn dependencies_are_embedded() {
        let html = page();
        assert!(html.contains(r#""output":"success-pie-chart","inputs":["site-dropdown"]"#));
        assert_eq!(script_safe("</script>"), "<\\/script>");
    }
}
