//! SVG rendering of a datapath [`Scene`].
//!
//! The output mirrors the element structure a web page would use: each box
//! is a `<g class="box">` with the component label as its id, each arrow a
//! `<path class="arrow" id="arrow-N">`, and `active` is added as a class on
//! whatever is highlighted.

use std::fmt::{self, Write};
use thiserror::Error;
use crate::cpu::Scene;
use crate::diagram::{Layout, LayoutError};

const STYLE: &str = "\
.box rect{fill:#1e1e2e;stroke:#6c7086;stroke-width:2;rx:8}\
.box.active rect{stroke:#f9e2af;stroke-width:3}\
.box text{fill:#cdd6f4;font:600 16px monospace;text-anchor:middle}\
.box text.value{font-weight:400;font-size:13px;fill:#fab387}\
.arrow{fill:none;stroke:#6c7086;stroke-width:2;marker-end:url(#arrowhead)}\
.arrow.active{stroke:#ff006e;stroke-width:3}\
.status{fill:#cdd6f4;font:14px sans-serif}";

/// Render a full SVG document.
///
/// `progress` is the drawn fraction of the active arrow; pass `1.0` to draw
/// it completely.
pub fn render_svg(scene: &Scene, layout: &Layout, progress: f64) -> Result<String, SvgError> {
    let mut out = String::with_capacity(4096);
    write_document(&mut out, scene, layout, progress)?;
    Ok(out)
}

fn write_document(out: &mut String, scene: &Scene, layout: &Layout, progress: f64) -> Result<(), SvgError> {
    let (width, height) = layout.size();
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height,
    )?;
    writeln!(out, "<style>{}</style>", STYLE)?;
    writeln!(
        out,
        r#"<defs><marker id="arrowhead" viewBox="0 0 10 10" refX="9" refY="5" markerWidth="8" markerHeight="8" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="context-stroke"/></marker></defs>"#
    )?;

    for view in &scene.boxes {
        let p = layout.placement(view.component)?;
        let class = if view.active { "box active" } else { "box" };
        writeln!(out, r#"<g class="{}" id="{}">"#, class, view.component.label())?;
        writeln!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}"/>"#,
            p.x, p.y, p.width, p.height
        )?;
        let label_y = if view.value.is_some() { p.y + p.height * 0.42 } else { p.y + p.height * 0.6 };
        writeln!(out, r#"<text x="{}" y="{}">{}</text>"#, p.x + p.width / 2.0, label_y, view.component.label())?;
        if let Some(value) = &view.value {
            writeln!(
                out,
                r#"<text class="value" x="{}" y="{}">{}</text>"#,
                p.x + p.width / 2.0,
                p.y + p.height * 0.82,
                Escaped(value)
            )?;
        }
        writeln!(out, "</g>")?;
    }

    let progress = progress.clamp(0.0, 1.0);
    for arrow in &scene.arrows {
        let class = if arrow.active { "arrow active" } else { "arrow" };
        write!(out, r#"<path id="{}" class="{}" d="{}""#, arrow.id, class, arrow.curve.path_data())?;
        if arrow.active && progress < 1.0 {
            write!(
                out,
                r#" pathLength="1" stroke-dasharray="1" stroke-dashoffset="{:.3}""#,
                1.0 - progress
            )?;
        }
        writeln!(out, "/>")?;
    }

    writeln!(
        out,
        r#"<text id="status" class="status" x="16" y="{}">{}</text>"#,
        height - 12.0,
        Escaped(&scene.status)
    )?;
    writeln!(out, "</svg>")?;
    Ok(())
}

/// XML text escaping.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '&' => f.write_str("&amp;")?,
                '"' => f.write_str("&quot;")?,
                _ => f.write_char(c)?,
            }
        }
        Ok(())
    }
}

/// Errors from rendering.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("formatting failed")]
    Fmt(#[from] fmt::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::Datapath;

    fn scene_at(step: usize) -> (Scene, Layout) {
        let layout = Layout::default();
        let mut dp = Datapath::new("A", "5", "ADD R1,R2");
        dp.start().unwrap();
        for i in 0..=step {
            dp.highlight_step(i, &layout).unwrap();
        }
        (dp.scene(), layout)
    }

    #[test]
    fn test_document_structure() {
        let (scene, layout) = scene_at(1);
        let svg = render_svg(&scene, &layout, 1.0).unwrap();
        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<g class=\"box").count(), 9);
        assert!(svg.contains(r#"<g class="box active" id="MAR">"#));
        assert!(svg.contains(r#"<path id="arrow-0" class="arrow" d="M "#));
        assert!(svg.contains(r#"<path id="arrow-1" class="arrow active" d="M "#));
        assert!(svg.contains("MAR → MDR (read instruction)"));
        assert!(!svg.contains("stroke-dashoffset"));
    }

    #[test]
    fn test_partial_arrow() {
        let (scene, layout) = scene_at(0);
        let svg = render_svg(&scene, &layout, 0.25).unwrap();
        assert!(svg.contains(r#"stroke-dashoffset="0.750""#));
    }

    #[test]
    fn test_register_values_are_escaped() {
        let (mut scene, layout) = scene_at(0);
        scene.status = "a<b & \"c\"".into();
        let svg = render_svg(&scene, &layout, 1.0).unwrap();
        assert!(svg.contains("a&lt;b &amp; &quot;c&quot;"));
        assert!(svg.contains(r#"<text class="value" "#));
    }

    #[test]
    fn test_missing_box_is_an_error() {
        let (scene, mut layout) = scene_at(0);
        layout.boxes.pop();
        assert!(matches!(render_svg(&scene, &layout, 1.0), Err(SvgError::Layout(_))));
    }
}
