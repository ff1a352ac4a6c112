//! The drawing surface: a dot snapshot rendered as SVG markup.
//!
//! A [`Surface`] is what a preview displays and what the vector and raster
//! exporters serialize. It is framed by the config's [`Viewport`] and draws
//! circles in dot order.

use crate::dot::{Dot, Viewport};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Rendered SVG markup for one dot snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    viewport: Viewport,
    markup: String,
    dot_count: usize,
}

impl Surface {
    /// Renders `dots` inside `viewport`.
    pub fn render(dots: &[Dot], viewport: Viewport) -> Self {
        let mut markup = String::with_capacity(128 + dots.len() * 64);
        markup.push_str(&format!(
            r#"<svg xmlns="{SVG_NAMESPACE}" viewBox="{}"><g>"#,
            viewport.view_box()
        ));

        for dot in dots {
            markup.push_str(&format!(
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                dot.x, dot.y, dot.r, dot.color
            ));
        }

        markup.push_str("</g></svg>");

        Self {
            viewport,
            markup,
            dot_count: dots.len(),
        }
    }

    /// The serialized SVG document.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of circles drawn.
    pub fn dot_count(&self) -> usize {
        self.dot_count
    }
}
