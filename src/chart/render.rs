use std::io::{Cursor, Write};
use std::path::Path;

use image::{ImageFormat, RgbImage};
use log::{debug, info};
use plotters::coord::Shift;
use plotters::prelude::*;

use super::FigureSpec;
use crate::color::generate_palette;
use crate::error::PlotError;

const LINE_WIDTH: u32 = 2;

// ---------------------------------------------------------------------------
// Output format
// ---------------------------------------------------------------------------

/// How the figure is encoded on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Raster(ImageFormat),
    Svg,
}

/// Infer the output format from the file extension. No extension means PNG.
pub fn output_format(path: &Path) -> Result<OutputFormat, PlotError> {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return Ok(OutputFormat::Raster(ImageFormat::Png));
    };
    match ext.to_ascii_lowercase().as_str() {
        "png" => Ok(OutputFormat::Raster(ImageFormat::Png)),
        "jpg" | "jpeg" => Ok(OutputFormat::Raster(ImageFormat::Jpeg)),
        "bmp" => Ok(OutputFormat::Raster(ImageFormat::Bmp)),
        "tif" | "tiff" => Ok(OutputFormat::Raster(ImageFormat::Tiff)),
        "svg" => Ok(OutputFormat::Svg),
        _ => Err(PlotError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: ext.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Render `spec` and write it to `path`.
///
/// The image is encoded in memory first and then moved into place, so a
/// failure never leaves a partial file behind.
pub fn save(spec: &FigureSpec, path: &Path) -> Result<(), PlotError> {
    let format = output_format(path)?;
    let bytes = render(spec, format)?;
    write_atomic(path, &bytes)?;
    info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Encode the figure in the given format.
pub fn render(spec: &FigureSpec, format: OutputFormat) -> Result<Vec<u8>, PlotError> {
    let (width, height) = spec.size;
    match format {
        OutputFormat::Svg => {
            let mut svg = String::new();
            {
                let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
                draw(root, spec).map_err(render_error)?;
            }
            Ok(svg.into_bytes())
        }
        OutputFormat::Raster(image_format) => {
            let mut buf = vec![0u8; width as usize * height as usize * 3];
            {
                let root =
                    BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
                draw(root, spec).map_err(render_error)?;
            }
            let img = RgbImage::from_raw(width, height, buf).ok_or_else(|| {
                PlotError::Render("pixel buffer does not match figure size".into())
            })?;
            let mut out = Cursor::new(Vec::new());
            img.write_to(&mut out, image_format)
                .map_err(|e| PlotError::Render(format!("encoding {image_format:?}: {e}")))?;
            Ok(out.into_inner())
        }
    }
}

fn render_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> PlotError {
    PlotError::Render(err.to_string())
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

fn draw<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    spec: &FigureSpec,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let (x_range, y_range) = spec.data_ranges();
    debug!("axis ranges x={x_range:?} y={y_range:?}");

    let mut chart = ChartBuilder::on(&root)
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .draw()?;

    let colors = generate_palette(spec.curves.len());
    for (curve, color) in spec.curves.iter().zip(colors) {
        let style = color.stroke_width(LINE_WIDTH);
        // Empty curves still get a legend entry.
        chart
            .draw_series(LineSeries::new(curve.points.iter().copied(), style))?
            .label(curve.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    let corner = spec.legend_corner();
    debug!("legend corner {corner:?}");
    chart
        .configure_series_labels()
        .position(corner.into())
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Atomic write
// ---------------------------------------------------------------------------

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PlotError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".loss-plot-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }

    let mut tmp = builder
        .tempfile_in(dir)
        .map_err(|e| PlotError::io(path, e))?;
    tmp.write_all(bytes).map_err(|e| PlotError::io(path, e))?;
    tmp.as_file().sync_all().map_err(|e| PlotError::io(path, e))?;
    tmp.persist(path).map_err(|e| PlotError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Curve, LegendPosition};
    use crate::error::ErrorKind;

    fn loss_spec() -> FigureSpec {
        FigureSpec {
            curves: vec![
                Curve {
                    label: "fitting loss".into(),
                    points: vec![(0.0, 1.0), (1.0, 0.5), (2.0, 0.3)],
                },
                Curve {
                    label: "validation loss".into(),
                    points: vec![(2.0, 0.6)],
                },
            ],
            x_label: "epoch".into(),
            y_label: "loss".into(),
            legend: LegendPosition::Best,
            ..FigureSpec::default()
        }
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            output_format(Path::new("out/loss.PNG")).unwrap(),
            OutputFormat::Raster(ImageFormat::Png)
        );
        assert_eq!(
            output_format(Path::new("loss.jpeg")).unwrap(),
            OutputFormat::Raster(ImageFormat::Jpeg)
        );
        assert_eq!(output_format(Path::new("loss.svg")).unwrap(), OutputFormat::Svg);
        assert_eq!(
            output_format(Path::new("loss")).unwrap(),
            OutputFormat::Raster(ImageFormat::Png)
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = output_format(Path::new("loss.xyz")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn png_has_figure_dimensions() {
        let bytes = render(&loss_spec(), OutputFormat::Raster(ImageFormat::Png)).unwrap();
        let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!((img.width(), img.height()), (700, 500));
    }

    #[test]
    fn svg_carries_labels() {
        let bytes = render(&loss_spec(), OutputFormat::Svg).unwrap();
        let svg = String::from_utf8(bytes).unwrap();
        for text in ["fitting loss", "validation loss", "epoch", "loss"] {
            assert!(svg.contains(text), "missing '{text}' in svg output");
        }
    }

    #[test]
    fn empty_figure_still_renders() {
        let spec = FigureSpec {
            curves: vec![
                Curve {
                    label: "fitting loss".into(),
                    points: vec![],
                },
                Curve {
                    label: "validation loss".into(),
                    points: vec![],
                },
            ],
            ..loss_spec()
        };
        let bytes = render(&spec, OutputFormat::Svg).unwrap();
        assert!(String::from_utf8(bytes).unwrap().contains("validation loss"));
    }

    #[test]
    fn losses_near_float_limits_render() {
        let spec = FigureSpec {
            curves: vec![Curve {
                label: "fitting loss".into(),
                points: vec![(0.0, 1e308), (1.0, -1e308), (2.0, 0.3)],
            }],
            ..loss_spec()
        };
        let bytes = render(&spec, OutputFormat::Raster(ImageFormat::Png)).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn save_into_missing_directory_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("loss.png");
        let err = save(&loss_spec(), &path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!path.exists());
    }

    #[test]
    fn save_writes_only_the_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loss.png");
        save(&loss_spec(), &path).unwrap();
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(path.metadata().unwrap().len() > 0);
    }
}
