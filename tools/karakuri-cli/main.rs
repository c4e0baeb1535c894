use clap::Parser;
use karakuri::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

/// Headless runner: load a saved graph, build it, run it for a fixed
/// number of frames and print the log stream.
#[derive(Parser, Debug)]
#[command(name = "karakuri-cli", version, about)]
struct Args {
    /// Path to a saved graph file.
    graph: PathBuf,

    /// Project root used to resolve texture files.
    #[arg(short, long, default_value = ".")]
    project: PathBuf,

    /// Number of frames to simulate.
    #[arg(short, long, default_value_t = 60)]
    frames: u32,

    /// Disable infinite-loop protection (not recommended).
    #[arg(long)]
    no_loop_protection: bool,

    /// Print the variable table after the run.
    #[arg(long)]
    variables: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let graph = GraphFile::from_file(&args.graph)
        .map_err(|e| e.to_string())?
        .restore();
    println!(
        "Loaded '{}': {} nodes, {} pins, {} links",
        args.graph.display(),
        graph.nodes().len(),
        graph.pins().len(),
        graph.links().len()
    );

    let project = Project::new(&args.project);
    let build_start = Instant::now();
    let compiled = compile(&graph, &project).map_err(|e| e.to_string())?;
    println!(
        "Built in {:.2?}: {} slots, {} components",
        build_start.elapsed(),
        compiled.values().len(),
        compiled.scene().len()
    );

    let settings = Settings {
        infinite_loop_protection: !args.no_loop_protection,
        ..Settings::default()
    };
    let mut runtime = Runtime::new(compiled, project, settings).map_err(|e| e.to_string())?;

    let input = FrameInput::default();
    for _ in 0..args.frames {
        if !runtime.run_frame(&input) {
            break;
        }
    }
    println!("Ran {} frames", runtime.frame());

    for entry in runtime.drain_log() {
        println!("{entry}");
    }

    if args.variables {
        let values = runtime.values();
        for index in values.variable_slots() {
            if let Some(slot) = values.slot(index) {
                println!("{} = {}", slot.name, values.stringify(index, runtime.scene()));
            }
        }
    }
    Ok(())
}
