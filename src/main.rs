//! # Minecum Entry Point
//!
//! Runs the headless streaming demo. The configuration file is taken from `MINECUM_CONFIG`.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release
//! ```

fn main() {
    if minecum::run().is_err() {
        std::process::exit(1);
    }
}
