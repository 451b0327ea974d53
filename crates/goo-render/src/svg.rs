//! SVG serialization of a [`Scene`].

use std::fmt;

use goo_core::Rgba;

use crate::scene::{Circle, Filter, FilterPrimitive, Scene};

/// A standalone SVG document for a scene, written through [`fmt::Display`].
#[derive(Debug, Clone, Copy)]
pub struct Svg<'a> {
    pub scene: &'a Scene,
    pub width: u32,
    pub height: u32,
    /// Page background, painted outside the filtered content.
    pub background: Option<Rgba>,
}

impl<'a> Svg<'a> {
    pub fn new(scene: &'a Scene, width: u32, height: u32) -> Self {
        Self {
            scene,
            width,
            height,
            background: None,
        }
    }

    pub fn with_background(mut self, background: Rgba) -> Self {
        self.background = Some(background);
        self
    }
}

/// Render a scene to an SVG string.
pub fn to_svg(scene: &Scene, width: u32, height: u32) -> String {
    Svg::new(scene, width, height).to_string()
}

fn write_circle(f: &mut fmt::Formatter<'_>, circle: &Circle, indent: &str) -> fmt::Result {
    writeln!(
        f,
        r#"{indent}<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
        circle.cx, circle.cy, circle.r, circle.fill
    )
}

fn write_result(f: &mut fmt::Formatter<'_>, result: Option<&str>) -> fmt::Result {
    match result {
        Some(name) => write!(f, r#" result="{name}""#),
        None => Ok(()),
    }
}

fn write_filter(f: &mut fmt::Formatter<'_>, filter: &Filter) -> fmt::Result {
    writeln!(f, r#"    <filter id="{}">"#, filter.id)?;
    for primitive in &filter.primitives {
        match primitive {
            FilterPrimitive::GaussianBlur { input, std_dev, .. } => {
                write!(
                    f,
                    r#"      <feGaussianBlur in="{input}" stdDeviation="{std_dev}""#
                )?;
            }
            FilterPrimitive::ColorMatrix { input, values, .. } => {
                let values: Vec<String> = values.iter().map(f32::to_string).collect();
                write!(
                    f,
                    r#"      <feColorMatrix in="{input}" mode="matrix" values="{}""#,
                    values.join(" ")
                )?;
            }
            FilterPrimitive::Composite {
                input,
                input2,
                operator,
                ..
            } => {
                write!(
                    f,
                    r#"      <feComposite in="{input}" in2="{input2}" operator="{}""#,
                    operator.as_str()
                )?;
            }
        }
        write_result(f, primitive.result())?;
        writeln!(f, "/>")?;
    }
    writeln!(f, "    </filter>")
}

impl fmt::Display for Svg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scene = self.scene;
        write!(f, r#"<svg xmlns="http://www.w3.org/2000/svg""#)?;
        write!(
            f,
            r#" width="{w}" height="{h}" viewBox="0 0 {w} {h}""#,
            w = self.width,
            h = self.height
        )?;
        if let Some(background) = self.background {
            write!(f, r#" style="background: {background}""#)?;
        }
        writeln!(f, ">")?;

        writeln!(f, "  <defs>")?;
        for filter in &scene.filters {
            write_filter(f, filter)?;
        }
        writeln!(f, "  </defs>")?;

        if let Some(mask) = &scene.mask {
            writeln!(f, r#"  <mask id="{}">"#, mask.id)?;
            match mask.filter {
                Some(id) => writeln!(f, r#"    <g filter="url(#{id})">"#)?,
                None => writeln!(f, "    <g>")?,
            }
            for circle in &mask.circles {
                write_circle(f, circle, "      ")?;
            }
            writeln!(f, "    </g>")?;
            writeln!(f, "  </mask>")?;
        }

        // Frame filter on the outer group, mask on the inner one.
        match scene.filter {
            Some(id) => writeln!(f, r#"  <g filter="url(#{id})">"#)?,
            None => writeln!(f, "  <g>")?,
        }
        match &scene.mask {
            Some(mask) => writeln!(f, r#"    <g mask="url(#{})">"#, mask.id)?,
            None => writeln!(f, "    <g>")?,
        }
        for circle in &scene.circles {
            write_circle(f, circle, "      ")?;
        }
        writeln!(f, "    </g>")?;
        writeln!(f, "  </g>")?;
        writeln!(f, "</svg>")
    }
}
