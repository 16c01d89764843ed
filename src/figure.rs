// 3D polar-bar figure rendering to PNG bytes

use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::colormap::{ColorMap, EnergyScale};
use crate::mesh::BarFace;

const COLORBAR_WIDTH: i32 = 130;

pub struct FigureConfig {
    pub title: Option<String>,
    pub energy_label: String,
    pub width: u32,
    pub height: u32,
    pub pitch: f64,
    pub yaw: f64,
    pub zoom: f64,
}

/// Render the bar mesh into a PNG image. Faces are painted back to front
/// through the configured projection so nearer bars occlude farther ones.
pub fn render_figure(faces: Vec<BarFace>, config: FigureConfig) -> Result<Vec<u8>> {
    if faces.is_empty() {
        anyhow::bail!("Cannot render a figure with no bars");
    }
    if config.width < 320 || config.height < 240 {
        anyhow::bail!(
            "Figure size {}x{} is too small (minimum 320x240)",
            config.width,
            config.height
        );
    }

    let mut radius: f64 = 0.0;
    let mut top: f64 = 0.0;
    for face in &faces {
        for &(x, y, z) in &face.corners {
            radius = radius.max(x.abs()).max(y.abs());
            top = top.max(z);
        }
    }
    let radius = if radius == 0.0 { 1.0 } else { radius * 1.05 };
    let top = if top == 0.0 { 1.0 } else { top * 1.05 };

    let map = ColorMap::energy_spectrum();
    let scale = EnergyScale::from_values(faces.iter().filter_map(|f| f.energy));

    let mut ordered: Vec<(f64, BarFace)> = faces
        .into_iter()
        .map(|f| {
            let d = view_depth(&f, radius, top, config.pitch, config.yaw);
            (d, f)
        })
        .collect();
    ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut buffer = vec![0u8; (config.width * config.height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (config.width, config.height))
            .into_drawing_area();

        root.fill(&WHITE).context("Failed to fill background")?;

        let (chart_area, bar_area) =
            root.split_horizontally(config.width as i32 - COLORBAR_WIDTH);

        let mut chart = ChartBuilder::on(&chart_area)
            .margin(10)
            .caption(
                config.title.as_deref().unwrap_or(""),
                ("sans-serif", 20),
            )
            .build_cartesian_3d(-radius..radius, 0.0..top, -radius..radius)
            .context("Failed to build chart")?;

        chart.with_projection(|mut pb| {
            pb.pitch = config.pitch;
            pb.yaw = config.yaw;
            pb.scale = config.zoom;
            pb.into_matrix()
        });

        chart
            .configure_axes()
            .light_grid_style(BLACK.mix(0.15))
            .max_light_lines(3)
            .draw()
            .context("Failed to draw axes")?;

        chart
            .draw_series(ordered.iter().map(|(_, face)| {
                let color = match face.energy {
                    Some(e) => map.sample(scale.normalize(e)),
                    None => map.sample(0.0),
                };
                // Probability is the vertical chart axis
                let corners: Vec<(f64, f64, f64)> =
                    face.corners.iter().map(|&(x, y, z)| (x, z, y)).collect();
                Polygon::new(corners, color.filled())
            }))
            .context("Failed to draw bar faces")?;

        chart
            .draw_series([
                Text::new(
                    "θ (rad)",
                    (radius * 0.55, 0.0, -radius * 1.3),
                    ("sans-serif", 14).into_font(),
                ),
                Text::new(
                    "φ (rad)",
                    (-radius * 1.3, 0.0, radius * 0.55),
                    ("sans-serif", 14).into_font(),
                ),
                Text::new(
                    "Probability",
                    (-radius * 1.15, top * 0.95, -radius * 1.15),
                    ("sans-serif", 14).into_font(),
                ),
            ])
            .context("Failed to draw axis labels")?;

        draw_colorbar(&bar_area, &map, &scale, &config.energy_label)
            .context("Failed to draw colorbar")?;

        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(
                &buffer,
                config.width,
                config.height,
                image::ColorType::Rgb8,
            )
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

/// Position of a face along the camera axis after the yaw and pitch
/// rotations the projection applies, on cube-normalized chart coordinates
/// (`x` and `y` span the angular plane, `z` the probability height).
/// Smaller is farther from the camera, so ascending order paints back to
/// front.
fn view_depth(face: &BarFace, radius: f64, top: f64, pitch: f64, yaw: f64) -> f64 {
    let (x, y, z) = face.centroid();
    let xn = x / radius;
    let zn = y / radius;
    let yn = 2.0 * z / top - 1.0;
    yn * pitch.sin() + (zn * yaw.cos() + xn * yaw.sin()) * pitch.cos()
}

/// Vertical gradient strip with tick values, drawn in pixel coordinates.
fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    map: &ColorMap,
    scale: &EnergyScale,
    label: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let (_, height) = area.dim_in_pixel();
    let top = 46i32;
    let bottom = height as i32 - 28;
    let x0 = 16i32;
    let x1 = x0 + 22;

    area.draw(&Text::new(
        label.to_string(),
        (8, 18),
        ("sans-serif", 14).into_font(),
    ))
    .context("Failed to draw colorbar label")?;

    for y in top..bottom {
        let t = 1.0 - (y - top) as f64 / (bottom - top - 1).max(1) as f64;
        area.draw(&Rectangle::new(
            [(x0, y), (x1, y + 1)],
            map.sample(t).filled(),
        ))
        .context("Failed to draw colorbar gradient")?;
    }

    area.draw(&Rectangle::new([(x0, top), (x1, bottom)], &BLACK))
        .context("Failed to draw colorbar frame")?;

    for i in 0..=4 {
        let t = i as f64 / 4.0;
        let value = scale.min() + (scale.max() - scale.min()) * t;
        let y = bottom - ((bottom - top) as f64 * t).round() as i32;
        area.draw(&Text::new(
            format!("{:.2}", value),
            (x1 + 6, y - 6),
            ("sans-serif", 12).into_font(),
        ))
        .context("Failed to draw colorbar tick")?;
    }

    Ok(())
}
