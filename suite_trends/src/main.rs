use anyhow::Result;
use suite_trends::cli;

// Main entry point
fn main() -> Result<()> {
    cli::handle_calls()
}
