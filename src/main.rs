//! # media-dedup CLI
//!
//! Command-line interface for the media duplicate finder.
//!
//! ## Usage
//! ```bash
//! media-dedup --config ./config.json
//! RUST_LOG=media_dedup=debug media-dedup --config ./config.json --quiet
//! ```

mod cli;

use media_dedup::Result;

fn main() -> Result<()> {
    media_dedup::init_tracing();
    cli::run()
}
