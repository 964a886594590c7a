use crate::render::Scene;
use anyhow::{anyhow, Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Font size of category labels, in pixels.
const LABEL_FONT_SIZE: f64 = 16.0;

/// Draw `scene` onto `root`: white background, circles back to front, then
/// category labels.
fn draw_scene<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, scene: &Scene) -> Result<()> {
    root.fill(&WHITE)
        .map_err(|e| anyhow!("Failed to fill background: {}", e))?;

    for circle in &scene.circles {
        if circle.r <= 0.0 {
            continue;
        }
        let center = (circle.cx.round() as i32, circle.cy.round() as i32);
        root.draw(&Circle::new(center, circle.r, circle.fill.filled()))
            .map_err(|e| anyhow!("Failed to draw bubble {}: {}", circle.id, e))?;
        root.draw(&Circle::new(
            center,
            circle.r,
            circle.stroke.stroke_width(scene.stroke_width),
        ))
        .map_err(|e| anyhow!("Failed to draw outline of bubble {}: {}", circle.id, e))?;
    }

    let label_style = ("sans-serif", LABEL_FONT_SIZE)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    for label in &scene.labels {
        let pos = (label.x.round() as i32, label.y.round() as i32);
        root.draw(&Text::new(label.text.as_str(), pos, label_style.clone()))
            .map_err(|e| anyhow!("Failed to draw label '{}': {}", label.text, e))?;
    }

    root.present()
        .map_err(|e| anyhow!("Failed to present drawing: {}", e))?;
    Ok(())
}

/// Render `scene` and encode it as PNG.
pub fn render_png(scene: &Scene) -> Result<Vec<u8>> {
    let (width, height) = (scene.width, scene.height);
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_scene(&root, scene)?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

/// Render `scene` as an SVG document.
pub fn render_svg(scene: &Scene) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (scene.width, scene.height)).into_drawing_area();
        draw_scene(&root, scene)?;
    }
    Ok(svg)
}
