mod cli;
mod logging;

use action_annotator::{
    time_codec, AppConfig, DatasetLayout, DisplayRegion, SessionController,
    StaticPlayback, Status,
};
use anyhow::{anyhow, bail, Context, Result};
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use colored::*;
use dotenv::dotenv;
use std::path::PathBuf;
use std::process;
use tracing::error;

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let mut config = match action_annotator::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();
    apply_overrides(&mut config, &args);

    let command = match args.command {
        Some(command) => command,
        None => {
            let _ = Cli::command().print_long_help();
            return;
        }
    };

    if let Err(err) = run(&config, args.root, command) {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn apply_overrides(config: &mut AppConfig, args: &Cli) {
    if let Some(root) = &args.root {
        config.root_dir = Some(root.to_string_lossy().into_owned());
    }
    if let Some(fps) = args.video.fps {
        config.video.fps = fps;
    }
    if let Some(width) = args.video.width {
        config.video.width = width;
    }
    if let Some(height) = args.video.height {
        config.video.height = height;
    }
}

fn run(config: &AppConfig, root: Option<PathBuf>, command: Commands) -> Result<()> {
    let root = root
        .or_else(|| config.root_dir.as_ref().map(PathBuf::from))
        .ok_or_else(|| anyhow!("no dataset root: pass --root or set root_dir in Annotator.toml"));

    match command {
        Commands::PrintConfig => {
            println!("Configuration: {:?}", config);
        }
        Commands::Videos => {
            let layout = DatasetLayout::open(&root?)?;
            for (i, stem) in layout.videos()?.iter().enumerate() {
                println!("{:>3}  {}", i, stem);
            }
        }
        Commands::Annotations { video } => {
            let session = open_video(config, &root?, &video)?;
            print_annotations(&session);
        }
        Commands::Hit {
            video,
            at,
            point,
            region,
        } => {
            let mut session = open_video(config, &root?, &video)?;
            let playback = StaticPlayback::at(parse_position(&at)?, 0);
            let (x, y) = parse_point(&point)?;
            let region = parse_region(&region)?;

            match session.on_click(x, y, region, &playback) {
                Some(id) => println!("{} {}", "subject".green(), id),
                None => println!("{}", "no subject".yellow()),
            }
            println!("{}", session.elapsed_text(&playback));
        }
        Commands::Add {
            video,
            start,
            stop,
            click,
            region,
            at,
            label,
        } => {
            let mut session = open_video(config, &root?, &video)?;
            if let Some(label) = label {
                check(session.on_set_label(&label))?;
            }

            let start_ms = parse_position(&start)?;
            let stop_ms = parse_position(&stop)?;
            let click_ms = match at {
                Some(at) => parse_position(&at)?,
                None => start_ms,
            };

            check(session.on_set_start(&StaticPlayback::at(start_ms, 0)))?;
            check(session.on_set_stop(&StaticPlayback::at(stop_ms, 0)))?;

            let (x, y) = parse_point(&click)?;
            let region = parse_region(&region)?;
            if session
                .on_click(x, y, region, &StaticPlayback::at(click_ms, 0))
                .is_none()
            {
                bail!("no tracked subject at ({}, {}) in {}", x, y, region);
            }

            let view = session.draft().view();
            println!(
                "{} {} [{} - {}] subject {}",
                "draft".cyan(),
                view.label,
                view.start,
                view.stop,
                view.subject
            );
            check(session.on_add())?;
            print_annotations(&session);
        }
        Commands::Delete { video, index } => {
            let mut session = open_video(config, &root?, &video)?;
            check(session.on_delete(index))?;
            print_annotations(&session);
        }
    }

    Ok(())
}

fn open_video(config: &AppConfig, root: &std::path::Path, video: &str) -> Result<SessionController> {
    let probe = config.probe()?;
    let mut session = SessionController::new(config.classes.clone(), Box::new(probe))?;

    DatasetLayout::open(root)?;
    // Opening selects the first video; its status is superseded below.
    session.open_root(root);
    check(session.select_video(video)).with_context(|| format!("selecting video {}", video))?;
    Ok(session)
}

fn print_annotations(session: &SessionController) {
    println!("{}", "action, player_id, start_time, stop_time".italic());
    for (i, line) in session.annotation_strings().iter().enumerate() {
        println!("{:>3}  {}", i, line);
    }
}

/// Surface a session status, turning an error status into an error.
fn check(status: Status) -> Result<()> {
    match status {
        Status::Error(msg) => Err(anyhow!(msg)),
        Status::Ready => Ok(()),
        Status::Info(msg) => {
            println!("{}", msg.dimmed());
            Ok(())
        }
    }
}

fn parse_position(text: &str) -> Result<u64> {
    if text.contains(':') {
        Ok(time_codec::display_to_ms(text)?)
    } else {
        text.trim()
            .parse::<u64>()
            .with_context(|| format!("'{}' is neither MM:SS nor milliseconds", text))
    }
}

fn parse_ints(text: &str, count: usize) -> Result<Vec<i32>> {
    let values = text
        .split(',')
        .map(|v| v.trim().parse::<i32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("'{}' is not a list of integers", text))?;
    if values.len() != count {
        bail!("expected {} comma-separated values, got '{}'", count, text);
    }
    Ok(values)
}

fn parse_point(text: &str) -> Result<(i32, i32)> {
    let v = parse_ints(text, 2)?;
    Ok((v[0], v[1]))
}

fn parse_region(text: &str) -> Result<DisplayRegion> {
    let v = parse_ints(text, 4)?;
    Ok(DisplayRegion::new(v[0], v[1], v[2], v[3]))
}
