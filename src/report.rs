//! Benchmark reports.

use std::io::Write;

use derive_more::Display;

use crate::bench::Benchmark;
use crate::problems::grid_maze::GridMaze;

#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// One plain block per solver.
    #[default]
    #[display("text")]
    Text,
    /// Org-mode document with build metadata and rendered paths.
    #[display("org")]
    Org,
}

/// Writes what goes once at the top of a report, before any maze.
pub fn write_preamble<W: Write>(out: &mut W, format: ReportFormat) -> std::io::Result<()> {
    match format {
        ReportFormat::Text => Ok(()),
        ReportFormat::Org => write_org_preamble(out),
    }
}

/// Writes the benchmarks of all solvers run on `maze`.
pub fn write_report<W: Write>(
    out: &mut W,
    source: &str,
    maze: &GridMaze,
    benchmarks: &[Benchmark],
    format: ReportFormat,
) -> std::io::Result<()> {
    match format {
        ReportFormat::Text => {
            for b in benchmarks {
                write_text_block(out, b)?;
            }
            Ok(())
        }
        ReportFormat::Org => write_org_section(out, source, maze, benchmarks),
    }
}

fn moves_taken(b: &Benchmark) -> String {
    if !b.result.found() {
        return "No path found.".to_string();
    }
    b.result
        .moves()
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_text_block<W: Write>(out: &mut W, b: &Benchmark) -> std::io::Result<()> {
    writeln!(out, "Solver: {}", b.solver)?;
    writeln!(out, "  Found path: {}", b.result.found())?;
    writeln!(out, "  Path length: {}", b.result.moves().len())?;
    writeln!(out, "  Nodes explored: {}", b.result.nodes_explored())?;
    writeln!(out, "  Time taken: {:.6} seconds", b.seconds())?;
    writeln!(out, "  Peak memory usage: {:.2} KB", b.peak_memory_kb())?;
    writeln!(out, "  Path taken: {}", moves_taken(b))?;
    writeln!(out)
}

fn write_org_preamble<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, ":PROPERTIES:")?;
    writeln!(out, ":VERSION: {:?}", crate::build::PKG_VERSION)?;
    writeln!(out, ":GIT_BRANCH: {:?}", shadow_rs::branch())?;
    writeln!(out, ":BUILD_IS_DEBUG: {}", shadow_rs::is_debug())?;
    if crate::build::GIT_CLEAN {
        writeln!(out, ":GIT_STATUS: CLEAN")?;
    } else {
        writeln!(out, ":GIT_STATUS: DIRTY")?;
    }
    writeln!(out, ":END:")?;
    writeln!(out, "#+title: Maze search report")?;
    writeln!(
        out,
        "#+date: {}",
        chrono::Local::now().format("<%Y-%m-%d %a %H:%M>")
    )?;
    writeln!(out)
}

fn write_org_section<W: Write>(
    out: &mut W,
    source: &str,
    maze: &GridMaze,
    benchmarks: &[Benchmark],
) -> std::io::Result<()> {
    use human_duration::human_duration;
    use size::Size;
    use thousands::Separable;

    let (rows, cols) = maze.dimensions();
    writeln!(out, "* Maze ~{source}~")?;
    writeln!(out, ":PROPERTIES:")?;
    writeln!(out, ":DIMENSIONS: {rows}x{cols}")?;
    writeln!(out, ":START: {}", maze.start())?;
    writeln!(out, ":GOAL: {}", maze.goal())?;
    writeln!(out, ":EXITS: {}", maze.exits())?;
    writeln!(out, ":END:")?;
    writeln!(out, "#+begin_example\n{maze}#+end_example")?;

    for b in benchmarks {
        let r = &b.result;
        writeln!(out, "** {}", b.solver)?;
        writeln!(out, ":PROPERTIES:")?;
        writeln!(out, ":FOUND: {}", r.found())?;
        writeln!(out, ":PATH_LENGTH: {}", r.moves().len())?;
        writeln!(
            out,
            ":NODES_EXPLORED: {}",
            r.nodes_explored().separate_with_commas()
        )?;
        writeln!(
            out,
            ":TREE_NODES: {}",
            r.stats.tree_nodes.separate_with_commas()
        )?;
        writeln!(
            out,
            ":PEAK_FRONTIER: {}",
            r.stats.peak_frontier.separate_with_commas()
        )?;
        writeln!(out, ":TIME: {}", human_duration(&b.elapsed))?;
        writeln!(
            out,
            ":PEAK_MEMORY: {}",
            Size::from_bytes(b.peak_memory_bytes)
        )?;
        writeln!(out, ":END:")?;

        match &r.path {
            Some(path) => {
                writeln!(out, "#+begin_example\n{}#+end_example", maze.overlay(path))?;
                writeln!(out, "- Path taken: {}", moves_taken(b))?;
            }
            None => writeln!(out, "- No path found.")?,
        }
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use indoc::indoc;

    use crate::algorithms::Solver;

    fn corridor() -> GridMaze {
        GridMaze::try_from("start(0,0)\nend(0,1)\n0 0\n").unwrap()
    }

    fn benchmark(solver: Solver, maze: &GridMaze) -> Benchmark {
        Benchmark {
            solver,
            elapsed: Duration::from_micros(1500),
            peak_memory_bytes: 2048,
            result: solver.solve(maze),
        }
    }

    fn render(maze: &GridMaze, benchmarks: &[Benchmark], format: ReportFormat) -> String {
        let mut out = vec![];
        write_report(&mut out, "corridor.txt", maze, benchmarks, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_report() {
        let maze = corridor();
        let benchmarks = [benchmark(Solver::Bfs, &maze), benchmark(Solver::AStar, &maze)];

        assert_eq!(
            render(&maze, &benchmarks, ReportFormat::Text),
            indoc! {"
                Solver: BFS
                  Found path: true
                  Path length: 1
                  Nodes explored: 2
                  Time taken: 0.001500 seconds
                  Peak memory usage: 2.00 KB
                  Path taken: RIGHT

                Solver: A*
                  Found path: true
                  Path length: 1
                  Nodes explored: 2
                  Time taken: 0.001500 seconds
                  Peak memory usage: 2.00 KB
                  Path taken: RIGHT

            "}
        );
    }

    #[test]
    fn text_report_without_path() {
        let maze =
            GridMaze::try_from(std::path::Path::new("data/problems/maze/walled_off.txt")).unwrap();
        let report = render(&maze, &[benchmark(Solver::Dfs, &maze)], ReportFormat::Text);

        assert!(report.starts_with("Solver: DFS\n  Found path: false\n  Path length: 0\n"));
        assert!(report.ends_with("  Path taken: No path found.\n\n"));
    }

    #[test]
    fn org_report() {
        let maze = corridor();
        let benchmarks = [benchmark(Solver::Dfs, &maze)];
        let report = render(&maze, &benchmarks, ReportFormat::Org);

        assert!(report.starts_with("* Maze ~corridor.txt~\n:PROPERTIES:\n:DIMENSIONS: 1x2\n"));
        assert!(report.contains("** DFS\n:PROPERTIES:\n:FOUND: true\n:PATH_LENGTH: 1\n"));
        assert!(report.contains("#+begin_example\nS E\n#+end_example\n"));
        assert!(report.contains("- Path taken: RIGHT\n"));
    }

    #[test]
    fn preambles() {
        let mut out = vec![];
        write_preamble(&mut out, ReportFormat::Text).unwrap();
        assert!(out.is_empty());

        write_preamble(&mut out, ReportFormat::Org).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with(":PROPERTIES:\n:VERSION: "));
        assert!(out.contains("#+title: Maze search report\n"));
    }
}
