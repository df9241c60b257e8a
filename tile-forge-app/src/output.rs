use crate::config::OutputFormat;
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use wfc_core::{GridSize, Solver, TilePlacement};

/// JSON document written for [`OutputFormat::Json`].
#[derive(Serialize)]
struct GridExport<'a> {
    size: GridSize,
    cell_size: f32,
    seed: u64,
    placements: &'a [TilePlacement],
}

/// Saves the solved grid to a file in the requested format.
///
/// Fails if any cell is not collapsed.
pub fn save_grid_to_file(solver: &Solver, output_path: &Path, format: OutputFormat) -> Result<()> {
    log::info!("Attempting to save grid to {:?} as {:?}...", output_path, format);
    if !solver.is_solved() {
        bail!(
            "Grid is not fully collapsed ({} of {} cells), not writing {:?}",
            solver.collapsed_count(),
            solver.size().cell_count(),
            output_path
        );
    }

    let file = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {:?}", output_path))?;
    let mut writer = io::BufWriter::new(file);

    match format {
        OutputFormat::Text => write_text(solver, &mut writer)?,
        OutputFormat::Json => write_json(solver, &mut writer)?,
    }

    writer
        .flush()
        .context("Failed to flush writer for output file")?;
    log::info!("Successfully saved grid to {:?}", output_path);
    Ok(())
}

/// Writes tile names separated by spaces along X, one line per row (Y) and a
/// blank line between layers (Z).
pub fn write_text<W: Write>(solver: &Solver, writer: &mut W) -> Result<()> {
    let size = solver.size();
    let catalog = solver.catalog();

    for z in 0..size.z {
        if z > 0 {
            writeln!(writer)?;
        }
        for y in 0..size.y {
            let mut names = Vec::with_capacity(size.x);
            for x in 0..size.x {
                let Some(cell) = size.index(x, y, z).and_then(|index| solver.cell(index)) else {
                    bail!("Internal error: Failed to access grid cell ({},{},{})", x, y, z);
                };
                let Some(tile) = cell.collapsed_tile() else {
                    if cell.is_contradicted() {
                        bail!("Grid cell ({},{},{}) has a contradiction (0 possibilities), cannot save.", x, y, z);
                    }
                    bail!(
                        "Grid cell ({},{},{}) is not fully collapsed ({} possibilities), cannot save.",
                        x,
                        y,
                        z,
                        cell.entropy()
                    );
                };
                names.push(catalog.name_of(tile));
            }
            writeln!(writer, "{}", names.join(" "))
                .with_context(|| format!("Failed to write line for coords (:, {}, {})", y, z))?;
        }
    }
    Ok(())
}

/// Writes the grid size, cell size, seed and one placement per collapsed,
/// non-empty cell as pretty-printed JSON.
pub fn write_json<W: Write>(solver: &Solver, writer: &mut W) -> Result<()> {
    if !solver.is_solved() {
        bail!("Grid is not fully collapsed, cannot save.");
    }
    let placements = solver.placements();
    let export = GridExport {
        size: solver.size(),
        cell_size: solver.catalog().cell_size(),
        seed: solver.seed(),
        placements: &placements,
    };
    serde_json::to_writer_pretty(&mut *writer, &export).context("Failed to serialize grid")?;
    writeln!(writer)?;
    Ok(())
}
