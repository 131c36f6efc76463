use anyhow::Result;
use clap::{crate_version, App as Cli, Arg};
use outliner::app::App;
use outliner::config::Config;
use std::path::PathBuf;

fn main() -> Result<()> {
    let matches = Cli::new("outliner")
        .version(crate_version!())
        .about("A keyboard-driven hierarchical outline editor for the terminal")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Directory holding config.yml")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("store")
                .short("s")
                .long("store")
                .value_name("FILE")
                .help("File the outline is saved to")
                .takes_value(true),
        )
        .get_matches();

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;
    if let Some(store) = matches.value_of("store") {
        config.store_file = PathBuf::from(store);
    }

    App::start(config)
}
