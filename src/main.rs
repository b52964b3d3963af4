//! Command-line driver: load or generate a scene, render it in parallel, save a PNG
use std::{fs, path::PathBuf, time::Instant};

use anyhow::Context;
use clap::Parser;
use image::RgbImage;
use indicatif::ProgressBar;
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;

use raytracer::{
    bvh::BvhNode,
    scenes::{self, SceneConfig},
    utils, Color,
};

#[derive(Debug, Parser)]
#[command(about = "Monte-Carlo path tracer")]
struct Args {
    /// Scene description file (yaml); renders the builtin random scene when omitted
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Output image path
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Image width in pixels
    #[arg(long, default_value_t = 400)]
    width: u32,

    /// Image aspect ratio, used when no scene file supplies a camera
    #[arg(long, default_value_t = 16.0 / 9.0)]
    aspect_ratio: f64,

    /// Rays cast per pixel
    #[arg(long, default_value_t = 100)]
    samples_per_pixel: u32,

    /// Maximum scatter depth per ray
    #[arg(long, default_value_t = 50)]
    max_depth: u32,

    /// Seed for the tree build and the per-scanline sample streams
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let (camera, world, aspect_ratio) = match &args.scene {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read scene file {}", path.display()))?;
            let config: SceneConfig = serde_yaml::from_str(&raw)
                .with_context(|| format!("failed to parse scene file {}", path.display()))?;
            let aspect_ratio = config.camera.aspect_ratio;
            let (camera, world) = config.build();
            (camera, world, aspect_ratio)
        }
        None => {
            let mut rng = StdRng::seed_from_u64(args.seed);
            (
                scenes::default_camera(args.aspect_ratio),
                scenes::random_scene(&mut rng),
                args.aspect_ratio,
            )
        }
    };
    info!("scene holds {} objects", world.len());

    let start = Instant::now();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let world = BvhNode::new(world, 0.0, 1.0, &mut rng).context("building the bvh failed")?;
    info!("bvh built in {:.2?}", start.elapsed());

    let width = args.width;
    let height = (width as f64 / aspect_ratio).round() as u32;

    let start = Instant::now();
    let bar = ProgressBar::new(height as u64);
    let rows: Vec<Vec<image::Rgb<u8>>> = (0..height)
        .into_par_iter()
        .map(|j| {
            // One deterministic sample stream per scanline
            let mut rng = StdRng::seed_from_u64(args.seed.wrapping_add(1 + j as u64));
            let row = (0..width)
                .map(|i| {
                    let mut color = Color::zeros();
                    for _ in 0..args.samples_per_pixel {
                        let s = (i as f64 + rng.gen::<f64>()) / (width - 1) as f64;
                        let t = ((height - 1 - j) as f64 + rng.gen::<f64>()) / (height - 1) as f64;
                        let ray = camera.get_ray(s, t, &mut rng);
                        color += ray.get_color(&world, args.max_depth, &mut rng);
                    }
                    utils::get_pixel(&color, args.samples_per_pixel as usize)
                })
                .collect();
            bar.inc(1);
            row
        })
        .collect();
    bar.finish();
    info!(
        "rendered {}x{} at {} samples per pixel in {:.2?}",
        width,
        height,
        args.samples_per_pixel,
        start.elapsed()
    );

    let mut image = RgbImage::new(width, height);
    for (j, row) in rows.iter().enumerate() {
        for (i, pixel) in row.iter().enumerate() {
            image.put_pixel(i as u32, j as u32, *pixel);
        }
    }
    image
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!("wrote {}", args.output.display());
    Ok(())
}
