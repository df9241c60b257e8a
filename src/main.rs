//! Tile Forge entry point. Forwards to the `tile-forge-app` library.
fn main() {
    std::process::exit(match tile_forge_app::main() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    });
}
