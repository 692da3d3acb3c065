//! CLI entry point for the puzzle solvers.
//!
//! Usage:
//!   puzzle-solvers beams <manifold.txt> [--side-exit drop|complete]
//!   puzzle-solvers rolls <floor.txt>
//!   puzzle-solvers pack <presents.txt> [--timeout <seconds>] [--no-memo]
//!   puzzle-solvers machines <factory.txt>
//!   puzzle-solvers paths <devices.txt> [--from you] [--to out] [--require <node>]...
//!   puzzle-solvers circuits <junctions.txt> [--connections 1000]
//!   puzzle-solvers tiles <red-tiles.txt>
//!   puzzle-solvers ranges <database.txt>
//!
//! Every subcommand also accepts `--stdin` in place of a file path and
//! prints a JSON report on stdout.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

use puzzle_solvers::{
    accessible_rolls, circuits, count_paths, count_paths_through, count_splits, min_counter_presses, min_presses,
    pack_region_with, parse_points, parse_tiles, ranges, simulate_removal, simulate_timelines, tiles, BeamConfig,
    CircuitsReport, Graph, Grid, Inventory, LightSolution, Machine, PackConfig, PackResult, PackingPuzzle, ParseError,
    RemovalReport, SideExit, TimelineReport,
};

#[derive(Parser)]
#[command(name = "puzzle-solvers")]
#[command(about = "Exact solvers for grid, packing, button and graph puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the puzzle text comes from
#[derive(Args)]
struct InputArgs {
    /// Path to the puzzle file (use --stdin to read from stdin)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Read the puzzle from stdin instead of a file
    #[arg(long)]
    stdin: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Count splitters hit and timelines produced by a beam manifold
    Beams {
        #[command(flatten)]
        input: InputArgs,

        /// Fate of a split branch pushed off the left or right edge
        #[arg(long, value_enum, default_value = "drop")]
        side_exit: SideExit,
    },

    /// Count rolls reachable now and removable in total
    Rolls {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Decide which regions can hold their demanded presents
    Pack {
        #[command(flatten)]
        input: InputArgs,

        /// Maximum search time per region in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Disable the failed-state memo
        #[arg(long)]
        no_memo: bool,
    },

    /// Minimum presses for each machine's lights and joltage counters
    Machines {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Count paths between two devices
    Paths {
        #[command(flatten)]
        input: InputArgs,

        /// Start node
        #[arg(long, default_value = "you")]
        from: String,

        /// End node
        #[arg(long, default_value = "out")]
        to: String,

        /// Node every counted path must visit (repeatable)
        #[arg(long = "require", value_name = "NODE")]
        required: Vec<String>,
    },

    /// Wire junction boxes into circuits by closest pairs
    Circuits {
        #[command(flatten)]
        input: InputArgs,

        /// Number of closest pairs to wire before measuring circuits
        #[arg(long, default_value = "1000")]
        connections: usize,
    },

    /// Largest rectangles between red tiles, anywhere and inside their loop
    Tiles {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Count fresh ingredient IDs from a range database
    Ranges {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BeamsOutput {
    splits: usize,
    side_exit: SideExit,
    timelines: TimelineReport,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RollsOutput {
    accessible: usize,
    removal: RemovalReport,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegionOutput {
    width: usize,
    height: usize,
    demands: Vec<usize>,
    #[serde(flatten)]
    result: PackResult,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackOutput {
    packable: usize,
    regions: Vec<RegionOutput>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
enum JoltageOutput {
    Solved { presses: u64 },
    Infeasible,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MachineOutput {
    lights: LightSolution,
    #[serde(skip_serializing_if = "Option::is_none")]
    joltage: Option<JoltageOutput>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MachinesOutput {
    total_light_presses: usize,
    total_joltage_presses: u64,
    infeasible: usize,
    machines: Vec<MachineOutput>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PathsOutput {
    from: String,
    to: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    required: Vec<String>,
    paths: u64,
    acyclic: bool,
}

fn main() {
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(command: Commands) -> Result<String> {
    let json = match command {
        Commands::Beams { input, side_exit } => {
            let grid = Grid::parse(&read_input(&input)?)?;
            let start = grid.find_start().ok_or(ParseError::MissingStart)?;
            let config = BeamConfig { side_exit };
            serde_json::to_string_pretty(&BeamsOutput {
                splits: count_splits(&grid, start),
                side_exit,
                timelines: simulate_timelines(&grid, start, &config),
            })?
        }
        Commands::Rolls { input } => {
            let grid = Grid::parse(&read_input(&input)?)?;
            serde_json::to_string_pretty(&RollsOutput {
                accessible: accessible_rolls(&grid),
                removal: simulate_removal(&grid),
            })?
        }
        Commands::Pack {
            input,
            timeout,
            no_memo,
        } => {
            let puzzle = PackingPuzzle::parse(&read_input(&input)?)?;
            let config = PackConfig {
                timeout: timeout.map(Duration::from_secs),
                memoize: !no_memo,
            };
            let regions: Vec<RegionOutput> = puzzle
                .regions
                .iter()
                .map(|region| RegionOutput {
                    width: region.width,
                    height: region.height,
                    demands: region.demands.clone(),
                    result: pack_region_with(&puzzle.catalog, region, &config),
                })
                .collect();
            serde_json::to_string_pretty(&PackOutput {
                packable: regions.iter().filter(|r| r.result.fits).count(),
                regions,
            })?
        }
        Commands::Machines { input } => {
            let machines = Machine::parse_all(&read_input(&input)?)?;
            serde_json::to_string_pretty(&solve_machines(&machines)?)?
        }
        Commands::Paths {
            input,
            from,
            to,
            required,
        } => {
            let graph = Graph::parse(&read_input(&input)?)?;
            let paths = if required.is_empty() {
                count_paths(&graph, &from, &to)?
            } else {
                let names: Vec<&str> = required.iter().map(String::as_str).collect();
                count_paths_through(&graph, &from, &to, &names)?
            };
            serde_json::to_string_pretty(&PathsOutput {
                acyclic: graph.is_acyclic_from(&from),
                from,
                to,
                required,
                paths,
            })?
        }
        Commands::Circuits { input, connections } => {
            let points = parse_points(&read_input(&input)?)?;
            let report: CircuitsReport = circuits::analyze(&points, connections);
            serde_json::to_string_pretty(&report)?
        }
        Commands::Tiles { input } => {
            let red = parse_tiles(&read_input(&input)?)?;
            serde_json::to_string_pretty(&tiles::analyze(&red)?)?
        }
        Commands::Ranges { input } => {
            let inventory = Inventory::parse(&read_input(&input)?)?;
            serde_json::to_string_pretty(&ranges::analyze(&inventory))?
        }
    };
    Ok(json)
}

fn read_input(input: &InputArgs) -> Result<String> {
    if input.stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read from stdin")?;
        Ok(buffer)
    } else if let Some(path) = &input.file {
        fs::read_to_string(path).with_context(|| format!("failed to read file {:?}", path))
    } else {
        bail!("must provide either a file path or --stdin");
    }
}

fn solve_machines(machines: &[Machine]) -> Result<MachinesOutput> {
    let mut output = MachinesOutput {
        total_light_presses: 0,
        total_joltage_presses: 0,
        infeasible: 0,
        machines: Vec::with_capacity(machines.len()),
    };

    for (idx, machine) in machines.iter().enumerate() {
        let lights = min_presses(&machine.lights, &machine.buttons)
            .with_context(|| format!("machine {}", idx + 1))?;
        match lights.presses() {
            Some(presses) => output.total_light_presses += presses,
            None => output.infeasible += 1,
        }

        let joltage = if machine.joltage.is_empty() {
            None
        } else {
            let presses = min_counter_presses(&machine.joltage, &machine.buttons)
                .with_context(|| format!("machine {}", idx + 1))?;
            Some(match presses {
                Some(presses) => {
                    output.total_joltage_presses += presses;
                    JoltageOutput::Solved { presses }
                }
                None => {
                    output.infeasible += 1;
                    JoltageOutput::Infeasible
                }
            })
        };

        output.machines.push(MachineOutput { lights, joltage });
    }

    Ok(output)
}
