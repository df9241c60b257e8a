//! # Tile Forge (Binary)
//!
//! Main executable entry point.

fn main() {
    std::process::exit(match tile_forge_app::main() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    });
}
