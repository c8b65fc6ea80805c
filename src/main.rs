use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use log::{debug, info};

use softpipe::prelude::*;

/// Which demo to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scene {
    /// A textured mesh spinning about its vertical axis.
    Mesh,
    /// A star field flying toward the camera.
    Stars,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CullArg {
    None,
    Clockwise,
    CounterClockwise,
}

impl From<CullArg> for CullMode {
    fn from(arg: CullArg) -> Self {
        match arg {
            CullArg::None => CullMode::None,
            CullArg::Clockwise => CullMode::Clockwise,
            CullArg::CounterClockwise => CullMode::CounterClockwise,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RasterizerArg {
    Scanline,
    EdgeFunction,
}

impl From<RasterizerArg> for RasterizerType {
    fn from(arg: RasterizerArg) -> Self {
        match arg {
            RasterizerArg::Scanline => RasterizerType::Scanline,
            RasterizerArg::EdgeFunction => RasterizerType::EdgeFunction,
        }
    }
}

/// Renders frames headlessly and writes them as numbered PNG files.
#[derive(Parser, Debug)]
#[command(name = "softpipe")]
#[command(about = "CPU software rasterizer writing PNG frames")]
struct Args {
    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Number of frames to render.
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Simulated frame rate; each frame advances by 1/fps seconds.
    #[arg(long, default_value_t = 30.0)]
    fps: f32,

    #[arg(long, value_enum, default_value_t = Scene::Mesh)]
    scene: Scene,

    /// OBJ file to draw instead of the built-in cube.
    #[arg(long, value_name = "FILE")]
    mesh: Option<PathBuf>,

    /// Image to texture the mesh with instead of a checkerboard.
    #[arg(long, value_name = "FILE")]
    texture: Option<PathBuf>,

    /// Screen winding to discard.
    #[arg(long, value_enum, default_value_t = CullArg::None)]
    cull: CullArg,

    #[arg(long, value_enum, default_value_t = RasterizerArg::Scanline)]
    rasterizer: RasterizerArg,

    /// Bilinear texture filtering instead of nearest.
    #[arg(long)]
    bilinear: bool,

    /// Number of stars in the star scene.
    #[arg(long, default_value_t = 4096)]
    stars: usize,

    /// Seed for the star field.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Directory the frames are written to.
    #[arg(short, long, value_name = "DIR", default_value = "frames")]
    output: PathBuf,
}

const STAR_SPREAD: f32 = 64.0;
const STAR_SPEED: f32 = 20.0;

fn frame_path(dir: &Path, frame: u32) -> PathBuf {
    dir.join(format!("frame_{:04}.png", frame))
}

fn run_mesh(args: &Args, ctx: &mut RenderContext, delta: f32) -> Result<(), Box<dyn Error>> {
    let mesh = match &args.mesh {
        Some(path) => Mesh::from_obj(path)?,
        None => Mesh::cube(),
    };

    let filter = if args.bilinear {
        Filter::Bilinear
    } else {
        Filter::Nearest
    };
    let texture = match &args.texture {
        Some(path) => Texture::from_file(path)?,
        None => Texture::checkerboard(256, 8, colors::CHECKER_LIGHT, colors::CHECKER_DARK),
    }
    .with_filter(filter);

    let projection = Projection::for_viewport(70.0, args.width, args.height, 0.1, 100.0);
    let camera = Camera::looking_at(Vec3::new(0.0, 1.5, -4.0), Vec3::ZERO, projection);
    let view_projection = camera.view_projection();

    let pipeline = Pipeline::new(
        Clipper::new(),
        RasterizerDispatcher::new(args.rasterizer.into(), args.cull.into()),
    );
    info!(
        "Drawing '{}' ({} triangles) with the {} rasterizer, cull {:?}",
        mesh.name(),
        mesh.triangle_count(),
        pipeline.rasterizer().active_type(),
        pipeline.rasterizer().cull_mode()
    );

    let mut model = Transform::new();
    let mut totals = DrawStats::default();
    for frame in 0..args.frames {
        model.rotate_y(delta);

        ctx.clear(colors::BACKGROUND);
        ctx.clear_depth();
        totals += pipeline.draw_mesh(
            &mut ctx.as_framebuffer(),
            &mesh,
            &view_projection,
            &model,
            &texture,
        );
        ctx.save(frame_path(&args.output, frame))?;
    }

    info!("Rendered {} frames: {:?}", args.frames, totals);
    Ok(())
}

fn run_stars(args: &Args, ctx: &mut RenderContext, delta: f32) -> Result<(), Box<dyn Error>> {
    let mut field = StarField::new(args.stars, STAR_SPREAD, STAR_SPEED, args.seed);
    info!("Simulating {} stars (seed {})", field.len(), args.seed);

    for frame in 0..args.frames {
        ctx.clear(colors::BACKGROUND);
        let visible = field.render(&mut ctx.as_framebuffer(), delta);
        debug!("Frame {}: {} stars visible", frame, visible);
        ctx.save(frame_path(&args.output, frame))?;
    }

    info!("Rendered {} frames", args.frames);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    fs::create_dir_all(&args.output)?;
    let mut ctx = RenderContext::new(args.width, args.height);
    let delta = 1.0 / args.fps;

    match args.scene {
        Scene::Mesh => run_mesh(&args, &mut ctx, delta)?,
        Scene::Stars => run_stars(&args, &mut ctx, delta)?,
    }

    info!("Frames written to {:?}", args.output);
    Ok(())
}
