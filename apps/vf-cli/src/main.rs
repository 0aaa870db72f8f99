use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use vf_app::{
    AppError, AppResult, CircuitController, DisplaySnapshot, FlowRegime, LawKind,
    PlaybackOptions, project_service, run_playback,
};
use vf_project::schema::TopologyDef;

#[derive(Parser)]
#[command(name = "vf-cli")]
#[command(about = "VoltFlow CLI - Ohm's law and Kirchhoff circuit explorer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
    },
    /// List scenes in a project
    Scenes {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
    },
    /// Solve a scene and print its readouts
    Solve {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
        /// Scene ID to solve
        scene_id: String,
        /// Override a resistor, e.g. --set r1=25
        #[arg(long = "set", value_parser = parse_setting)]
        settings: Vec<(String, f64)>,
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rewrite a project as YAML or JSON, chosen by the output extension
    Convert {
        /// Path to the source project file
        project_path: PathBuf,
        /// Path to write (`.json` for JSON, anything else for YAML)
        output_path: PathBuf,
    },
    /// Run headless flow playback for a scene
    Run {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
        /// Scene ID to animate
        scene_id: String,
        /// Time step in seconds
        #[arg(long)]
        dt: f64,
        /// End time in seconds
        #[arg(long)]
        t_end: f64,
        /// Router seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
        /// Override a resistor, e.g. --set r1=25
        #[arg(long = "set", value_parser = parse_setting)]
        settings: Vec<(String, f64)>,
    },
}

fn parse_setting(s: &str) -> Result<(String, f64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <resistor>=<ohms>, got '{s}'"))?;
    let ohms = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid resistance '{value}': {e}"))?;
    Ok((key.trim().to_string(), ohms))
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Scenes { project_path } => cmd_scenes(&project_path),
        Commands::Solve {
            project_path,
            scene_id,
            settings,
            json,
        } => cmd_solve(&project_path, &scene_id, &settings, json),
        Commands::Convert {
            project_path,
            output_path,
        } => cmd_convert(&project_path, &output_path),
        Commands::Run {
            project_path,
            scene_id,
            dt,
            t_end,
            seed,
            settings,
        } => cmd_run(&project_path, &scene_id, dt, t_end, seed, &settings),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    project_service::validate_project(&project)?;
    println!("✓ Project is valid");
    Ok(())
}

fn cmd_scenes(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let scenes = project_service::list_scenes(&project);

    if scenes.is_empty() {
        println!("No scenes found in project");
    } else {
        println!("Scenes in project:");
        for scene in scenes {
            println!(
                "  {} - {} ({}, {} resistors, {:.2} V)",
                scene.id,
                scene.name,
                topology_label(scene.topology),
                scene.resistor_count,
                scene.source_voltage_v
            );
        }
    }
    Ok(())
}

fn cmd_convert(project_path: &Path, output_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    project_service::save_project(output_path, &project)?;
    println!(
        "✓ Wrote {} ({} scenes)",
        output_path.display(),
        project.scenes.len()
    );
    Ok(())
}

fn open_with_settings(
    project_path: &Path,
    scene_id: &str,
    settings: &[(String, f64)],
) -> AppResult<CircuitController> {
    let project = project_service::load_project(project_path)?;
    let mut controller = project_service::open_scene(&project, scene_id)?;
    for (key, ohms) in settings {
        let applied = controller.set_resistance_by_key(key, *ohms)?;
        if applied != *ohms {
            println!("  note: {key} clamped to {applied:.2} Ω");
        }
    }
    Ok(controller)
}

fn cmd_solve(
    project_path: &Path,
    scene_id: &str,
    settings: &[(String, f64)],
    json: bool,
) -> AppResult<()> {
    let controller = open_with_settings(project_path, scene_id, settings)?;
    let snapshot = controller.snapshot();

    if json {
        let text = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| AppError::InvalidInput(format!("failed to encode snapshot: {e}")))?;
        println!("{text}");
    } else {
        print_snapshot(&snapshot);
    }
    Ok(())
}

fn cmd_run(
    project_path: &Path,
    scene_id: &str,
    dt: f64,
    t_end: f64,
    seed: Option<u64>,
    settings: &[(String, f64)],
) -> AppResult<()> {
    println!("Running flow playback for scene: {}", scene_id);
    println!("  dt = {:.3} s, t_end = {:.3} s", dt, t_end);

    let mut controller = open_with_settings(project_path, scene_id, settings)?;
    let opts = PlaybackOptions {
        dt,
        t_end,
        seed,
        ..Default::default()
    };
    let record = run_playback(&mut controller, &opts)?;

    println!("✓ Playback completed: {} steps", record.steps);
    println!("  Frames recorded: {}", record.frames.len());
    if let Some(last) = record.frames.last() {
        println!("  Trunk laps: {}", last.trunk_laps);
        println!("  Live markers at end: {}", last.live_markers);
    }

    let total = record.total_spawns();
    if total > 0 {
        let snapshot = controller.snapshot();
        println!("  Routed markers: {}", total);
        for (key, count) in &record.spawn_counts {
            let share = record.spawn_share(key).unwrap_or(0.0);
            let expected = snapshot
                .branch(key)
                .map(|b| b.current_a.abs() / snapshot.total_current_a.abs().max(f64::MIN_POSITIVE))
                .unwrap_or(0.0);
            println!(
                "    {}: {} ({:.1}%, current share {:.1}%)",
                key,
                count,
                share * 100.0,
                expected * 100.0
            );
        }
    }
    Ok(())
}

fn topology_label(topology: TopologyDef) -> &'static str {
    match topology {
        TopologyDef::Single => "single",
        TopologyDef::Series => "series",
        TopologyDef::Parallel => "parallel",
    }
}

fn print_snapshot(snapshot: &DisplaySnapshot) {
    println!("{} ({})", snapshot.scene_name, topology_label(snapshot.topology));
    println!("  V_Source: {:.2} V", snapshot.source_voltage_v);

    for branch in &snapshot.branches {
        println!(
            "  {}: R = {:.2} Ω, V = {:.2} V, I = {:.2} A",
            branch.name, branch.resistance_ohm, branch.voltage_v, branch.current_a
        );
    }

    println!("  R_Total: {:.2} Ω", snapshot.total_resistance_ohm);
    println!("  I_Total: {:.2} A", snapshot.total_current_a);

    let check = &snapshot.conservation;
    let mark = if check.satisfied { "✓" } else { "✗" };
    match check.law {
        LawKind::Kvl => println!(
            "  {} KVL Check: V_Source ({:.2} V) = V_Drops ({:.2} V)",
            mark, check.expected, check.measured
        ),
        LawKind::Kcl => println!(
            "  {} KCL Check: I_Total ({:.2} A) = Sum of I_Branches ({:.2} A)",
            mark, check.expected, check.measured
        ),
    }

    match snapshot.regime {
        Some(FlowRegime::Restricted) => {
            println!("  High Resistance: Like a thin pipe, current flow is slow.")
        }
        Some(FlowRegime::Open) => {
            println!("  Low Resistance: Like a wide pipe, current flow is fast.")
        }
        None => {}
    }
}
