mod scenes;

use anyhow::{Context, Result};
use clap::Parser;
use ivar_renderer::{
    render, render_parallel, save_image, BvhNode, Camera, CameraConfig, Hittable, DEFAULT_BUCKET_SIZE,
};
use scenes::SceneKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Render one of the demo scenes to an image file.
#[derive(Parser, Debug)]
#[command(name = "ivar", version)]
struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value_t = SceneKind::Emissive)]
    scene: SceneKind,

    /// JSON camera configuration replacing the scene's own camera
    #[arg(long)]
    camera: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Samples per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum ray bounce depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Seed for pixel sampling and random scene layout
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Edge length of a render bucket in pixels
    #[arg(long, default_value_t = DEFAULT_BUCKET_SIZE)]
    bucket_size: u32,

    /// Number of render threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Wrap the scene in a bounding volume hierarchy
    #[arg(long)]
    bvh: bool,

    /// Render pixels one at a time on the main thread
    #[arg(long)]
    single_threaded: bool,

    /// Output path; `.ppm` writes plain PPM, other extensions go through `image`
    #[arg(short, long, default_value = "image.ppm")]
    output: PathBuf,
}

/// Command-line values take precedence over the scene or JSON camera.
fn apply_overrides(config: &mut CameraConfig, args: &Args) {
    if let Some(width) = args.width {
        config.image_width = width;
    }
    if let Some(samples) = args.samples {
        config.samples_per_pixel = samples;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
}

fn load_camera(path: &Path) -> Result<CameraConfig> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading camera file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing camera file {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configuring render thread pool")?;
    }

    let (list, scene_camera) = scenes::build(args.scene, args.seed);
    log::info!("Built {:?} scene with {} objects", args.scene, list.len());

    let mut config = match &args.camera {
        Some(path) => load_camera(path)?,
        None => scene_camera,
    };
    apply_overrides(&mut config, &args);

    let world: Box<dyn Hittable> = if args.bvh {
        let bvh = BvhNode::from_list(&list);
        log::info!("BVH depth {}", bvh.depth());
        Box::new(bvh)
    } else {
        Box::new(list)
    };

    let mut camera = Camera::new(config);
    let viewport = camera.initialize().context("invalid camera configuration")?;

    let start = Instant::now();
    let image = if args.single_threaded {
        render(viewport, world.as_ref(), args.seed)
    } else {
        render_parallel(viewport, world.as_ref(), args.seed, args.bucket_size)
    };
    log::info!("Rendered {}x{} in {:.2?}", image.width, image.height, start.elapsed());

    save_image(&image, &args.output).with_context(|| format!("writing {}", args.output.display()))?;
    log::info!("Wrote {}", args.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["ivar"]).unwrap();
        assert_eq!(args.scene, SceneKind::Emissive);
        assert_eq!(args.bucket_size, DEFAULT_BUCKET_SIZE);
        assert_eq!(args.output, PathBuf::from("image.ppm"));
        assert!(!args.bvh);
        assert!(!args.single_threaded);
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let args = Args::try_parse_from([
            "ivar", "--scene", "shapes", "--width", "64", "--samples", "4", "--max-depth", "3",
        ])
        .unwrap();
        assert_eq!(args.scene, SceneKind::Shapes);

        let mut config = CameraConfig::default();
        apply_overrides(&mut config, &args);
        assert_eq!(config.image_width, 64);
        assert_eq!(config.samples_per_pixel, 4);
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.vfov, CameraConfig::default().vfov);
    }

    #[test]
    fn test_unknown_scene_rejected() {
        assert!(Args::try_parse_from(["ivar", "--scene", "cornell"]).is_err());
    }
}
