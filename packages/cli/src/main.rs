use clap::Parser;

/// zktool - move ZooKeeper configuration between ensembles
#[derive(Parser, Debug)]
#[command(name = "zktool")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: zktool_cli::Command,
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = zktool_cli::run(args.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
