//! Example: Load and inspect a JSON scene file.
//!
//! Run with: cargo run -p duet_core --example load_scene -- assets/room.json

use std::env;

use duet_core::{load_scene, LightKind, Shape};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: load_scene <path-to-json-file>");
        println!("\nExample:");
        println!("  cargo run -p duet_core --example load_scene -- assets/room.json");
        return;
    }

    let path = &args[1];
    println!("Loading scene file: {}", path);

    match load_scene(path) {
        Ok(scene) => {
            let camera = scene.camera();
            println!("\n=== Scene (id {}) ===", scene.id());
            println!(
                "Camera: ({:.2}, {:.2}, {:.2}) looking at ({:.2}, {:.2}, {:.2})",
                camera.position.x,
                camera.position.y,
                camera.position.z,
                camera.target.x,
                camera.target.y,
                camera.target.z
            );

            println!("\n--- Objects ({}) ---", scene.objects().len());
            for (i, object) in scene.objects().iter().enumerate() {
                let shape = match object.shape {
                    Shape::Sphere { radius } => format!("sphere r={:.2}", radius),
                    Shape::Cube { size } => {
                        format!("cube {:.2}x{:.2}x{:.2}", size.x, size.y, size.z)
                    }
                    Shape::Plane { normal } => {
                        format!("plane n=({:.2}, {:.2}, {:.2})", normal.x, normal.y, normal.z)
                    }
                };
                println!(
                    "  [{}] {} at ({:.2}, {:.2}, {:.2})",
                    i, shape, object.position.x, object.position.y, object.position.z
                );
            }

            println!("\n--- Lights ({}) ---", scene.lights().len());
            for (i, light) in scene.lights().iter().enumerate() {
                let kind = match light.kind() {
                    LightKind::Point => "point",
                    LightKind::Directional => "directional",
                };
                let p = light.xyz();
                println!("  [{}] {} ({:.2}, {:.2}, {:.2})", i, kind, p.x, p.y, p.z);
            }
        }
        Err(e) => {
            eprintln!("Error loading scene: {}", e);
            std::process::exit(1);
        }
    }
}
