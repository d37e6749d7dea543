//! Offline accumulation example.
//!
//! Renders the demo scene for a number of frames with a fixed camera, so the
//! soft shadows and bounce light converge, and saves the result as PPM.
//!
//! Usage: cargo run -p duet_tracer --example accumulate --release [FRAMES]

use duet_core::Scene;
use duet_tracer::{FrameRenderer, ImageBuffer, RenderConfig, Threading};
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() -> std::io::Result<()> {
    println!("Duet Tracer - Accumulation Example");
    println!("==================================");

    let frames: u32 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(64);

    let scene = Scene::demo();
    let config = RenderConfig::default().with_threading(Threading::Rows);
    let mut renderer = FrameRenderer::with_seed(config, 42).expect("Invalid render config");

    println!(
        "Rendering {}x{} for {} frames...",
        renderer.config().width,
        renderer.config().height,
        frames
    );

    let start = std::time::Instant::now();
    for _ in 0..frames {
        renderer.render(&scene);
    }
    println!("Rendered in {:?}", start.elapsed());

    let filename = "accumulate.ppm";
    save_ppm(renderer.image(), filename)?;
    println!("Saved to {}", filename);

    Ok(())
}

/// PPM stores the top row first; the tracer's row 0 is the bottom.
fn save_ppm(image: &ImageBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P6")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for row in image.data.chunks_exact(image.row_len()).rev() {
        writer.write_all(row)?;
    }

    Ok(())
}
