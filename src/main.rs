use std::path::PathBuf;

use arm_kinematics::{
    JointAngles, KinematicSolver, ManipulatorConfig, Resolution, ViewProjection, project_all,
};
use clap::Parser;
use glam::DVec3;

#[derive(Parser)]
#[command(version, propagate_version = true)]
#[command(about = "Resolve a target point into arm joint angles", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Args {
    /// Arm configuration file (TOML). Uses the built-in arm if omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Reject solutions outside the levers' rotation boundaries.
    #[arg(long)]
    enforce_limits: bool,
    /// Also print both elbow configurations.
    #[arg(long)]
    branches: bool,
    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Target X coordinate.
    x: f64,
    /// Target Y coordinate.
    y: f64,
    /// Target Z coordinate.
    z: f64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut log_config = simplelog::ConfigBuilder::new();
    log_config.set_time_level(log::LevelFilter::Off);
    log_config.set_thread_level(log::LevelFilter::Off);
    log_config.set_target_level(log::LevelFilter::Off);
    log_config.set_location_level(log::LevelFilter::Off);

    let log_level = match args.verbose {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    simplelog::TermLogger::init(
        log_level,
        log_config.build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let config = match &args.config {
        Some(path) => ManipulatorConfig::load(path)?,
        None => ManipulatorConfig::default(),
    };
    log::trace!("{:#?}", config);

    let (link1, link2) = config.link_specs()?;
    let mut solver =
        KinematicSolver::from_links(link1, link2)?.with_joint_limits(args.enforce_limits);
    log::info!(
        "Arm with levers {:.2} and {:.2} (reach {:.2})",
        link1.length,
        link2.length,
        solver.max_reach()
    );

    let target = DVec3::new(args.x, args.y, args.z);
    let resolution = solver.resolve_target(target)?;

    print!("{}", format_report(&resolution));
    print!("{}", format_views(&project_all(&resolution, solver.lengths())));

    if args.branches {
        let horizontal = target.truncate().length();
        let branches = solver.solve_branches(horizontal, target.z)?;
        print!("{}", format_branches(&solver, branches));
    }

    Ok(())
}

fn format_report(resolution: &Resolution) -> String {
    let (a1, a2) = resolution.angles.to_degrees();
    let Resolution {
        target,
        base_angle,
        angles,
        joint1,
        joint2,
    } = resolution;

    let mut out = String::new();
    out += &format!(
        "Target:       ({:.2}, {:.2}, {:.2})\n",
        target.x, target.y, target.z
    );
    out += &format!(
        "Base angle:   {:7.2}° ({:.4} rad)\n",
        base_angle.to_degrees(),
        base_angle
    );
    out += &format!(
        "Joint angles: {:7.2}° {:7.2}° ({:.4}, {:.4} rad)\n",
        a1, a2, angles.angle1, angles.angle2
    );
    out += &format!("Joint 1:      ({:.2}, {:.2})\n", joint1.x, joint1.y);
    out += &format!("Joint 2:      ({:.2}, {:.2})\n", joint2.x, joint2.y);
    out
}

fn format_views(views: &[ViewProjection]) -> String {
    let mut out = String::new();
    for view in views {
        let [base, j1, j2] = view.points;
        out += &format!(
            "{:<6} view: ({:.2}, {:.2}) -> ({:.2}, {:.2}) -> ({:.2}, {:.2})  reach {:.2}\n",
            format!("{:?}", view.kind),
            base.x,
            base.y,
            j1.x,
            j1.y,
            j2.x,
            j2.y,
            view.reach_radius
        );
    }
    out
}

fn format_branches(solver: &KinematicSolver, [up, down]: [JointAngles; 2]) -> String {
    let mut out = String::new();
    for (name, angles) in [("up", up), ("down", down)] {
        let (a1, a2) = angles.to_degrees();
        let note = if solver.within_limits(angles) {
            ""
        } else {
            "  (out of range)"
        };
        out += &format!("Elbow {:<4}: {:7.2}° {:7.2}°{}\n", name, a1, a2, note);
    }
    out
}
