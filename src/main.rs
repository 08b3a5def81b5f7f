use anyhow::{Context, Error};
use clap::{App, Arg};
use config::Config;
use engine::{ItemSimilarity, RecommenderAlgorithm};
use log::info;
use prettytable::{cell, format::consts::FORMAT_NO_LINESEP, row, table};
use simplelog::{Config as LogConfig, LevelFilter, TermLogger, TerminalMode};
use std::fs::File;

fn main() -> Result<(), Error> {
    let matches = App::new("recommender")
        .version("0.1.0")
        .about("Item-based collaborative filtering over a ratings file")
        .arg(
            Arg::with_name("ratings")
                .required(true)
                .help("CSV file with user,item,score rows (no header)"),
        )
        .arg(
            Arg::with_name("user")
                .short("u")
                .long("user")
                .takes_value(true)
                .required(true)
                .help("User id to compute recommendations for"),
        )
        .arg(
            Arg::with_name("pool-size")
                .short("p")
                .long("pool-size")
                .takes_value(true)
                .help("Worker pool size for the similarity build"),
        )
        .arg(
            Arg::with_name("top")
                .short("t")
                .long("top")
                .takes_value(true)
                .help("Keep only the best K recommendations"),
        )
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .help("Path to a TOML config file"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Increase log verbosity"),
        )
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(level, LogConfig::default(), TerminalMode::Mixed)?;

    let config = match matches.value_of("config") {
        Some(path) => Config::load(path).with_context(|| format!("couldn't load {}", path))?,
        None => Config::default(),
    };

    let pool_size: usize = matches
        .value_of("pool-size")
        .map(str::parse)
        .transpose()
        .context("invalid pool size")?
        .unwrap_or(config.engine.pool_size);

    let top_k: Option<usize> = matches
        .value_of("top")
        .map(str::parse)
        .transpose()
        .context("invalid top value")?
        .or(config.recommend.top_k);

    let path = matches.value_of("ratings").unwrap();
    let file = File::open(path).with_context(|| format!("couldn't open {}", path))?;
    let (items, users) = dataset::load_csv(file)?.into_parts();
    info!("loaded {} items and {} users from {}", items.len(), users.len(), path);

    let mut algorithm = ItemSimilarity::new(pool_size)?;
    algorithm.set_items(items);
    algorithm.set_users(users);
    algorithm.update();

    let user_id = matches.value_of("user").unwrap().to_owned();
    let mut recommendations = algorithm.compute_recommendations(&user_id);
    if let Some(top_k) = top_k {
        recommendations.truncate(top_k);
    }

    if recommendations.is_empty() {
        println!("No recommendations for {}", user_id);
        return Ok(());
    }

    let mut output = table![["item", "predicted score"]];
    for recommendation in &recommendations {
        output.add_row(row![
            recommendation.item(),
            format!("{:.4}", recommendation.score())
        ]);
    }

    output.set_format(*FORMAT_NO_LINESEP);
    output.printstd();

    Ok(())
}
