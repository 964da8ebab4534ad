use std::process;

fn main() {
    // Logs go to stderr, which shares the screen with the maze. Redirect it
    // when setting `RUST_LOG`, e.g. `RUST_LOG=debug maze 2> maze.log`.
    env_logger::init();

    if let Err(e) = client::run_client() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
