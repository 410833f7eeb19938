use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{command, CommandFactory, Parser};
use tokio::{
    fs::File,
    io::{AsyncReadExt, BufReader},
};
use tuning_core::{tuning_route, view::Presenter, Distribution, Snapshot, ThreadRequest};

use crate::{
    config::{Config, Format},
    input::Command,
    render::Output,
};

mod config;
mod input;
mod render;

pub async fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let file = File::open(path).await?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents).await?;
    Ok(toml::from_str(&contents)?)
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(long, short, value_name = "FILE")]
    config: Option<PathBuf>,
    #[arg(long, short, value_enum)]
    format: Option<Format>,
    /// Do not print the keyboard help banner.
    #[arg(long, short)]
    quiet: bool,
}

async fn run(args: Args) -> Result<()> {
    let mut config = {
        let path = args
            .config
            .clone()
            .unwrap_or("assets/configs/Demo.toml".into());
        log::info!("reading config {}...", path.to_string_lossy());
        match load_config(&path).await {
            Ok(config) => config,
            Err(err) => {
                log::warn!("using default config: {err}");
                Config::default()
            }
        }
    };
    match config.log.level.parse() {
        Ok(level) => log::set_max_level(level),
        Err(_) => log::warn!("unknown log level `{}`", config.log.level),
    }
    if let Some(format) = args.format {
        config.view.format = format;
    }
    if args.quiet || config.view.format == Format::Json {
        config.view.hints = false;
    }

    let (sender, receiver) = flume::unbounded::<ThreadRequest>();
    let core = tokio::spawn(tuning_route(receiver, Distribution::leaves()));

    let (snapshot_sender, snapshot_receiver) = flume::unbounded::<Snapshot>();
    let _ = sender.send(ThreadRequest::Subscribe(snapshot_sender.clone()));
    let presenter = {
        let mut output = Output {
            options: config.view.clone(),
            keys: config.keys.clone(),
        };
        tokio::spawn(async move {
            while let Ok(snapshot) = snapshot_receiver.recv_async().await {
                output.present(&snapshot);
            }
        })
    };

    let mut stdin = BufReader::new(tokio::io::stdin());
    while let Some(line) = input::read_line(&mut stdin).await? {
        let command = match input::parse(&line, &config.keys) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                log::warn!("{err}");
                continue;
            }
        };
        match command {
            Command::Event(event) => {
                let _ = sender.send(ThreadRequest::Event {
                    event,
                    sender: None,
                });
            }
            Command::Show => {
                let _ = sender.send(ThreadRequest::Snapshot(snapshot_sender.clone()));
            }
            Command::Help => eprintln!("{}", input::HELP),
            Command::Quit => break,
        }
    }

    drop(snapshot_sender);
    drop(sender);
    core.await??;
    presenter.await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .with_module_level("tuning_demo", log::LevelFilter::Trace)
        .with_module_level("tuning_core", log::LevelFilter::Trace)
        .init()
        .expect("start logger");
    log::set_max_level(log::LevelFilter::Info);

    let args = Args::parse();

    let cmd = Args::command();
    let version = cmd.get_version().unwrap_or("0.0.1");
    let bin_name = cmd.get_bin_name().unwrap_or("tuning_demo");

    log::info!("{}\tversion: {}", bin_name, version);

    if let Err(err) = run(args).await {
        log::error!("{err}");
        std::process::exit(1);
    }
}
