//! Headless runner: builds the contraption and steps it, logging progress.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cgmath::{Matrix4, Point3, Vector3};
use clap::Parser;

use contraption::gfx::scene::NodeId;
use contraption::{FrameDriver, SceneConfig};

#[derive(Parser)]
#[command(
    name = "contraption",
    about = "Step the Rube-Goldberg scene without a renderer"
)]
struct Cli {
    /// YAML scene configuration; the built-in scene when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of fixed simulation steps to run.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Log a status line every N steps (0 disables).
    #[arg(long, default_value_t = 60)]
    report_every: u64,

    /// Feed this much wall-clock time per frame instead of stepping directly.
    #[arg(long)]
    frame_time: Option<f32>,

    /// Turn the given light off before running (repeatable).
    #[arg(long = "light-off")]
    lights_off: Vec<usize>,

    /// Print the effective configuration as YAML and exit.
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SceneConfig::from_file(path)
            .with_context(|| format!("loading scene config {}", path.display()))?,
        None => SceneConfig::default(),
    };

    if cli.dump_config {
        print!("{}", config.to_yaml_string()?);
        return Ok(());
    }

    let mut driver = contraption::launch(config).context("assembling scene")?;
    for index in &cli.lights_off {
        driver
            .toggle_light(*index)
            .with_context(|| format!("toggling light {}", index))?;
    }

    run(&mut driver, &cli);

    let view = Matrix4::look_at_rh(
        Point3::new(0.0, 20.0, 120.0),
        Point3::new(-20.0, -40.0, 0.0),
        Vector3::unit_y(),
    );
    let frame = driver.shading_frame(&view);
    log::info!(
        "Finished after {} steps ({:.2}s simulated): {} shaded objects, {} bytes of light data",
        driver.ticks(),
        driver.simulated_time(),
        frame.objects.len(),
        frame.light_bytes().len()
    );
    Ok(())
}

fn run(driver: &mut FrameDriver, cli: &Cli) {
    let mut last_report = 0;
    while driver.ticks() < cli.ticks {
        let progressed = match cli.frame_time {
            Some(frame_time) => u64::from(driver.advance(frame_time)),
            None => u64::from(driver.tick()),
        };
        if progressed == 0 && cli.frame_time.map_or(true, |t| t <= 0.0) {
            log::warn!("Simulation is not advancing; stopping");
            break;
        }

        if cli.report_every > 0 && driver.ticks() >= last_report + cli.report_every {
            last_report = driver.ticks();
            report(driver);
        }
    }
}

fn report(driver: &FrameDriver) {
    let scene = driver.scene();
    let describe = |name: &str| -> String {
        let Some(id) = scene.find_by_name(name) else {
            return format!("{}: missing", name);
        };
        describe_node(driver, id)
    };

    log::info!(
        "t={:.2}s | {} | {} | {}",
        driver.simulated_time(),
        describe("ball_1"),
        describe("ball_2"),
        describe("domino")
    );
}

fn describe_node(driver: &FrameDriver, id: NodeId) -> String {
    let scene = driver.scene();
    let Some(node) = scene.node(id) else {
        return format!("{:?}: missing", id);
    };
    let p = node.transform.position;
    format!(
        "{} {:?} at ({:.2}, {:.2}, {:.2})",
        node.name,
        node.state(),
        p.x,
        p.y,
        p.z
    )
}
