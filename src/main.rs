use anyhow::Result;

use backup_preflight::{app, cli};

fn main() -> Result<()> {
    let args = cli::parse();
    app::run(args)
}
