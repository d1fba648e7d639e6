//! Lattice Viz CLI - Run one operation on a lattice from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use lattice_viz::{
    compute::{Outcome, Visualizer},
    schema::{Algorithm, CellState, LatticeConfig, Layout},
};

/// Operation selected on the command line.
enum Command {
    Search(Algorithm),
    Maze,
    Life,
}

impl Command {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "maze" => Some(Command::Maze),
            "life" => Some(Command::Life),
            other => other.parse().ok().map(Command::Search),
        }
    }
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 3 {
        eprintln!(
            "Usage: {} <config.json> <dfs|bfs|dijkstra|astar|maze|life> [steps]",
            args[0]
        );
        eprintln!();
        eprintln!("Run one lattice operation from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to lattice configuration file");
        eprintln!("  operation    Search algorithm, maze generation or Game of Life");
        eprintln!("  steps        Step budget (default: unlimited; 100 generations for life)");
        eprintln!();
        eprintln!("A layout is read from <config>.layout.json when present.");
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    let config_path = PathBuf::from(&args[1]);
    let command = Command::parse(&args[2]).unwrap_or_else(|| {
        eprintln!("Unknown operation: {}", args[2]);
        std::process::exit(1);
    });
    let steps: Option<u64> = args.get(3).and_then(|s| s.parse().ok());

    // Load configuration
    let config = LatticeConfig::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    // Load or create layout
    let layout_path = config_path.with_extension("layout.json");
    let layout: Layout = if layout_path.exists() {
        let layout_str = fs::read_to_string(&layout_path).unwrap_or_else(|e| {
            eprintln!("Error reading layout file: {}", e);
            std::process::exit(1);
        });
        serde_json::from_str(&layout_str).unwrap_or_else(|e| {
            eprintln!("Error parsing layout: {}", e);
            std::process::exit(1);
        })
    } else {
        let (rows, cols) = config.grid_dim();
        Layout::sized(rows, cols)
    };

    let mut vis = Visualizer::new(config).unwrap_or_else(|e| {
        eprintln!("Error creating lattice: {}", e);
        std::process::exit(1);
    });

    println!("Lattice Viz");
    println!("===========");
    println!("Grid: {}x{}", vis.lattice().rows(), vis.lattice().cols());
    println!("Layout: {:?}", layout.pattern);
    println!("Operation: {}", args[2]);
    println!();

    if let Err(e) = vis.apply_layout(&layout) {
        eprintln!("Error applying layout: {}", e);
        std::process::exit(1);
    }

    // Start the operation
    let start_result = match command {
        Command::Search(algorithm) => vis.start_search(algorithm).map(|_| ()),
        Command::Maze => {
            vis.start_maze();
            Ok(())
        }
        Command::Life => {
            vis.start_life();
            Ok(())
        }
    };
    if let Err(e) = start_result {
        eprintln!("Error starting operation: {}", e);
        std::process::exit(1);
    }

    let budget = match command {
        Command::Life => Some(steps.unwrap_or(100)),
        _ => steps,
    };

    // Run
    println!("Running...");
    let start = Instant::now();
    let progress_every = budget.map_or(1000, |b| (b / 10).max(1));
    let mut step = 0u64;
    let mut changed = 0usize;
    let mut outcome = None;

    while budget.is_none_or(|b| step < b) {
        let Some(tick) = vis.step() else {
            break;
        };
        step += 1;
        changed += tick.delta.len();

        if step % progress_every == 0 {
            let elapsed = start.elapsed().as_secs_f32();
            log::info!(
                "Step {}: {} cells changed, {:.1} steps/s",
                step,
                changed,
                step as f32 / elapsed.max(f32::EPSILON)
            );
        }

        if let Some(finished) = tick.into_outcome() {
            outcome = Some(finished);
            break;
        }
    }

    let elapsed = start.elapsed();

    println!();
    println!("{}", vis.lattice());
    match &outcome {
        Some(Outcome::PathFound { path }) => println!("Path found: {} cells", path.len()),
        Some(Outcome::NoPath) => println!("No path"),
        Some(Outcome::MazeCarved { passages }) => println!("Maze carved: {} passages", passages),
        Some(Outcome::Settled { generation }) => println!("Settled at generation {}", generation),
        Some(Outcome::Halted { generation }) => println!("Halted at generation {}", generation),
        None => println!("Stopped after {} steps", step),
    }
    println!(
        "Visited: {}, walls: {}",
        vis.lattice().count(CellState::Visited),
        vis.lattice().count(CellState::Wall)
    );
    println!(
        "Time: {:.2}s ({} steps, {} cells changed)",
        elapsed.as_secs_f32(),
        step,
        changed
    );
}

fn print_example_config() {
    let config = LatticeConfig::with_cells(20, 20);
    let layout = Layout::sized(20, 20);

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing config: {e}"),
    }
    println!();
    println!("Example layout (config.layout.json):");
    match serde_json::to_string_pretty(&layout) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing layout: {e}"),
    }
}
