use clap::Parser;
use luci_cli::Cli;

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  cli.run()
}
