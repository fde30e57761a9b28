use clap::Parser;

use datpg::cmd::Cli;

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };
    simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .unwrap();

    if let Err(err) = cli.run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
