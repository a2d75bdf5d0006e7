//! Simulator driver: project a mesh, stream it through the front end,
//! then rasterize the emitted triangles through the software kernels
//!
//! Usage: `rastersim [model.bin] [--out image.ppm]`. Without a model
//! argument a single demo triangle is simulated.

use std::path::PathBuf;
use std::process::ExitCode;

use indicatif::{ProgressBar, ProgressStyle};

use rastersim::config::{load_config, SimConfig};
use rastersim::kernels::{rasterize_triangle, shade_pixels, RenderTarget};
use rastersim::math::Vec3;
use rastersim::model::Model;
use rastersim::ppm::save_ppm;
use rastersim::table::{Triangle, Vertex};
use rastersim::texture::Texture;
use rastersim::{FrontEnd, Projector, SimError, VERSION};

const CONFIG_PATH: &str = "sim.ron";

/// Half-tick budget per chunk; generous for a five-deep pipeline
const DRAIN_BUDGET: u64 = 10_000;

struct Args {
    model: Option<PathBuf>,
    out: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut args = Args { model: None, out: None };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        if arg == "--out" {
            args.out = it.next().map(PathBuf::from);
        } else {
            args.model = Some(PathBuf::from(arg));
        }
    }
    args
}

/// Two demo triangles: stages move batches of two references, so the
/// smallest run that drains end to end needs a pair
fn demo_triangles() -> Vec<Triangle> {
    vec![
        Triangle::new(
            Vertex::new(Vec3::new(-0.8, 0.6, -2.0)).with_uv(0.0, 0.0),
            Vertex::new(Vec3::new(0.8, 0.6, -2.0)).with_uv(1.0, 0.0),
            Vertex::new(Vec3::new(0.0, -0.6, -5.0)).with_uv(0.5, 1.0),
        ),
        Triangle::new(
            Vertex::new(Vec3::new(-0.4, -0.2, -3.0)).with_uv(0.0, 1.0),
            Vertex::new(Vec3::new(0.4, -0.2, -3.0)).with_uv(1.0, 1.0),
            Vertex::new(Vec3::new(0.0, 0.4, -3.0)).with_uv(0.5, 0.0),
        ),
    ]
}

fn load_triangles(args: &Args) -> Result<Vec<Triangle>, SimError> {
    let Some(path) = &args.model else {
        return Ok(demo_triangles());
    };
    let model = Model::load(path)?;
    let center = model.center();
    println!(
        "Loaded {}: {} vertices, {} triangles (center {:.2} {:.2} {:.2})",
        path.display(),
        model.vertices.len(),
        model.tris.len(),
        center.x,
        center.y,
        center.z
    );

    let mut tris = Vec::with_capacity(model.tris.len());
    for [a, b, c] in &model.tris {
        let verts = [*a as usize, *b as usize, *c as usize];
        if verts.iter().any(|&i| i >= model.vertices.len()) {
            log::warn!("skipping triangle with out-of-range index {:?}", verts);
            continue;
        }
        let [va, vb, vc] = verts.map(|i| model.vertices[i]);
        tris.push(Triangle::new(
            Vertex::new(va.point).with_uv(va.u, va.v),
            Vertex::new(vb.point).with_uv(vb.u, vb.v),
            Vertex::new(vc.point).with_uv(vc.u, vc.v),
        ));
    }
    Ok(tris)
}

fn run() -> Result<(), SimError> {
    let args = parse_args();

    let config = if std::path::Path::new(CONFIG_PATH).exists() {
        load_config(CONFIG_PATH)?
    } else {
        SimConfig::default()
    };

    println!("=== rastersim v{} ===", VERSION);
    println!(
        "viewport {}x{}, near {}, far {}, table capacity {}",
        config.width, config.height, config.near, config.far, config.table_capacity
    );

    let projector = Projector::from_config(&config);
    let mut projected = Vec::new();
    let mut rejected = 0usize;
    for mut tri in load_triangles(&args)? {
        match projector.project(&mut tri) {
            Ok(()) => projected.push(tri),
            Err(SimError::BehindCamera(_)) => rejected += 1,
            Err(e) => return Err(e),
        }
    }
    if rejected > 0 {
        println!("rejected {} triangles at or behind the camera", rejected);
    }
    // stages transfer batches of two; a trailing lone triangle would sit
    // in Fetch forever
    if projected.len() % 2 == 1 {
        log::warn!("odd triangle count, dropping the last one");
        projected.pop();
    }

    let mut front_end = FrontEnd::new(&config);
    let mut target = RenderTarget::new(config.width as usize, config.height as usize);
    let texture = Texture::checkerboard(64, 64, [0.9, 0.9, 0.9], [0.2, 0.2, 0.6]);

    let bar = ProgressBar::new(projected.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} triangles ({msg} half-ticks)")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    // the table holds capacity/3 triangles at once; feed in even-sized
    // chunks and drain between them
    let chunk = ((config.table_capacity / 3).max(2) / 2) * 2;
    let mut total_half_ticks = 0u64;
    let mut bb_count = 0usize;

    for group in projected.chunks(chunk) {
        for tri in group {
            front_end.feed(tri)?;
        }
        total_half_ticks += front_end.run_until_drained(DRAIN_BUDGET);

        while let Some(bb) = front_end.get_bb() {
            log::trace!("bb {:?}", bb);
            bb_count += 1;
        }

        for (i, tri_ref) in front_end.take_output().into_iter().enumerate() {
            let tri = front_end.table().reconstruct(tri_ref);
            let verts = tri.vertices().map(|v| {
                [v.screen.x.to_f32(), v.screen.y.to_f32(), v.point.z]
            });
            let uvs = tri.vertices().map(|v| [v.u, v.v]);
            rasterize_triangle(&mut target, verts, uvs, i as i32);
            for handle in tri_ref.0 {
                front_end.table_mut().invalidate(handle);
            }
            bar.inc(1);
        }
        bar.set_message(total_half_ticks.to_string());
    }
    bar.finish();

    println!(
        "simulated {} cycles ({} half-ticks), {} bounding boxes",
        front_end.clock().cycle(),
        total_half_ticks,
        bb_count
    );

    if let Some(out) = &args.out {
        shade_pixels(&mut target, &texture);
        save_ppm(out, &target)?;
        println!("wrote {}", out.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
