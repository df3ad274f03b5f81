use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anstream::println;
use clap::Parser;
use owo_colors::OwoColorize;

use maze_search::algorithms::Solver;
use maze_search::bench::measure_all;
use maze_search::problems::grid_maze::GridMaze;
use maze_search::report::ReportFormat;
use maze_search::report::write_preamble;
use maze_search::report::write_report;

#[cfg(feature = "mem_profile")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;
#[cfg(all(not(feature = "mem_profile"), not(target_env = "msvc")))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Solves grid mazes with BFS, DFS and A*, and reports how each one did.
#[derive(Parser, Debug)]
#[clap(long_version = maze_search::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(short, long, env = "MAZE_REPORT", default_value = "output.txt")]
    pub output: PathBuf,

    #[arg(
        short,
        long,
        env = "MAZE_REPORT_FORMAT",
        value_enum,
        default_value_t = ReportFormat::Text
    )]
    pub format: ReportFormat,

    /// Solvers to run, in order.
    #[arg(
        short,
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = Solver::ALL.to_vec()
    )]
    pub solvers: Vec<Solver>,

    /// Maze files, `start(r,c)` and `end(r,c)` lines followed by the grid.
    #[arg(required = true)]
    pub mazes: Vec<PathBuf>,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

fn main() -> std::io::Result<()> {
    #[cfg(feature = "mem_profile")]
    let _profiler = dhat::Profiler::new_heap();
    #[cfg(feature = "coz_profile")]
    coz::thread_init();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    args.color.write_global();

    // Nothing is written until every maze is known to be valid.
    let mazes = GridMaze::load_all(&args.mazes).map_err(std::io::Error::other)?;

    println!("Writing report to {:?}", args.output.yellow());
    let file = File::create(&args.output)?;
    let mut out = BufWriter::new(file);
    write_preamble(&mut out, args.format)?;

    for (p, maze) in args.mazes.iter().zip(&mazes) {
        let (rows, cols) = maze.dimensions();
        log::info!("Loaded {p:?} ({rows}x{cols})");

        let benchmarks = measure_all(&args.solvers, maze);
        for b in &benchmarks {
            let found = if b.result.found() {
                format!("{} moves", b.result.moves().len()).green().to_string()
            } else {
                "no path".red().to_string()
            };
            println!(
                "  {}: {found}, {} nodes explored",
                b.solver.bold(),
                b.result.nodes_explored()
            );
        }

        write_report(
            &mut out,
            &p.display().to_string(),
            maze,
            &benchmarks,
            args.format,
        )?;
    }
    out.flush()?;

    Ok(())
}
