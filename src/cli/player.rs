use std::{
    io::{self, BufRead, Write},
    thread,
    time::Duration,
};

use tabled::Table;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::{
    MoodError, error, info,
    management::Session,
    player::{self, AudioOutput, PlayOutcome, PlaybackController},
    success,
    types::{PlaybackState, QueueTableRow, Track},
    utils, warning,
};

use super::spinner;

const POLL_INTERVAL: Duration = Duration::from_millis(500);
const PROGRESS_WIDTH: usize = 24;

enum PlayerCommand {
    Toggle,
    Next,
    Previous,
    Jump(usize),
    Seek(f64),
    Mute,
    List,
    Clear,
    Status,
    Help,
    Quit,
}

impl PlayerCommand {
    fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or("p");
        let arg = parts.next();

        match command {
            "p" | "play" | "pause" => Ok(PlayerCommand::Toggle),
            "n" | "next" => Ok(PlayerCommand::Next),
            "b" | "back" | "prev" => Ok(PlayerCommand::Previous),
            "j" | "jump" => {
                let number: usize = arg
                    .and_then(|a| a.parse().ok())
                    .ok_or("usage: j <track number>")?;
                if number == 0 {
                    return Err("track numbers start at 1".to_string());
                }
                Ok(PlayerCommand::Jump(number - 1))
            }
            "s" | "seek" => {
                let percent: f64 = arg
                    .and_then(|a| a.trim_end_matches('%').parse().ok())
                    .ok_or("usage: s <percent>")?;
                Ok(PlayerCommand::Seek(percent / 100.0))
            }
            "m" | "mute" => Ok(PlayerCommand::Mute),
            "l" | "list" => Ok(PlayerCommand::List),
            "c" | "clear" => Ok(PlayerCommand::Clear),
            "i" | "info" => Ok(PlayerCommand::Status),
            "h" | "help" | "?" => Ok(PlayerCommand::Help),
            "q" | "quit" | "exit" => Ok(PlayerCommand::Quit),
            other => Err(format!("unknown command '{}', type h for help", other)),
        }
    }
}

/// Loads a playlist and opens the interactive preview player on it.
pub async fn play(session: &Session, playlist_id: &str, autoplay: bool) {
    let pb = spinner("Loading playlist...");
    let result = session.load_playlist_tracks(playlist_id).await;
    pb.finish_and_clear();

    match result {
        Ok(loaded) => {
            info!("{} ({} tracks)", loaded.name, loaded.tracks.len());
            run_tracks(loaded.tracks, autoplay).await;
        }
        Err(e) => error!("Failed to load playlist {}: {}", playlist_id, e),
    }
}

/// Runs the interactive preview player over `tracks` until the user quits.
pub async fn run_tracks(tracks: Vec<Track>, autoplay: bool) {
    let output = match player::default_output() {
        Ok(output) => output,
        Err(e) => {
            error!("Cannot open audio output: {}", e);
            return;
        }
    };
    if player::output_is_silent() {
        warning!("Built without audio output: previews are timed but not audible");
    }
    let controller = PlaybackController::new(output);
    let mut input = spawn_stdin_reader();

    let enqueued = controller.enqueue(tracks, autoplay).await;
    if enqueued.added == 0 {
        warning!("None of these tracks can be previewed or opened");
        return;
    }
    success!("{} tracks added to the queue", enqueued.added);
    print_help();

    if let Some(result) = enqueued.autoplay {
        report(&controller, &mut input, result.map(Some)).await;
    }

    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    loop {
        tokio::select! {
            line = input.recv() => {
                let Some(line) = line else { break };
                let command = match PlayerCommand::parse(&line) {
                    Ok(command) => command,
                    Err(msg) => {
                        warning!("{}", msg);
                        continue;
                    }
                };

                match command {
                    PlayerCommand::Toggle => {
                        let result = controller.toggle().await;
                        report(&controller, &mut input, result).await;
                        if controller.current().is_none() {
                            info!("Nothing selected yet");
                        }
                    }
                    PlayerCommand::Next => {
                        let result = controller.next().await;
                        if matches!(result, Ok(None)) {
                            info!("End of the queue");
                        }
                        report(&controller, &mut input, result).await;
                    }
                    PlayerCommand::Previous => {
                        let result = controller.previous().await;
                        if matches!(result, Ok(None)) {
                            info!("Already at the first track");
                        }
                        report(&controller, &mut input, result).await;
                    }
                    PlayerCommand::Jump(index) => {
                        let result = controller.jump_to(index).await.map(Some);
                        report(&controller, &mut input, result).await;
                    }
                    PlayerCommand::Seek(fraction) => match controller.seek(fraction) {
                        Ok(position) => info!("Jumped to {}", utils::format_time(position)),
                        Err(e) => warning!("{}", e),
                    },
                    PlayerCommand::Mute => {
                        if controller.toggle_mute() {
                            info!("Muted");
                        } else {
                            info!("Unmuted");
                        }
                    }
                    PlayerCommand::List => print_queue(&controller),
                    PlayerCommand::Clear => {
                        controller.clear_queue();
                        info!("Queue cleared");
                    }
                    PlayerCommand::Status => print_status(&controller),
                    PlayerCommand::Help => print_help(),
                    PlayerCommand::Quit => break,
                }
            }
            _ = ticker.tick() => {
                let result = controller.poll().await;
                report(&controller, &mut input, result).await;
            }
        }
    }

    controller.stop();
}

/// Reads stdin on its own thread so a pending read never blocks shutdown.
fn spawn_stdin_reader() -> UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn report<O: AudioOutput>(
    controller: &PlaybackController<O>,
    input: &mut UnboundedReceiver<String>,
    result: Result<Option<PlayOutcome>, MoodError>,
) {
    match result {
        Ok(Some(PlayOutcome::Started)) => print_status(controller),
        Ok(Some(PlayOutcome::ExternalLinkRequested { url, title })) => {
            info!("\"{}\" has no preview", title);
            offer_link(input, &title, &url).await;
        }
        Ok(Some(PlayOutcome::Superseded)) | Ok(None) => {}
        Err(MoodError::Playback(msg)) => {
            error!("Preview could not be played: {}", msg);
            let fallback = controller
                .current()
                .and_then(|t| t.catalog_url().map(|url| (t.title().to_string(), url.to_string())));
            if let Some((title, url)) = fallback {
                offer_link(input, &title, &url).await;
            }
        }
        Err(e) => error!("{}", e),
    }
}

async fn offer_link(input: &mut UnboundedReceiver<String>, title: &str, url: &str) {
    print!("Open \"{}\" in the browser? [y/N] ", title);
    let _ = io::stdout().flush();

    let answer = input.recv().await.unwrap_or_default();
    if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
        return;
    }

    match webbrowser::open(url) {
        Ok(_) => success!("Opened {}", url),
        Err(e) => error!("Cannot open the browser: {}. Visit {}", e, url),
    }
}

fn print_status<O: AudioOutput>(controller: &PlaybackController<O>) {
    let state = controller.state();
    let Some(track) = controller.current() else {
        info!("{} Nothing selected", state.icon());
        return;
    };

    let line = match controller.progress() {
        Some(progress) if state != PlaybackState::Idle => format!(
            "{} {} - {} {} {} / {}",
            state.icon(),
            track.title(),
            track.artists(),
            utils::progress_bar(progress.fraction, PROGRESS_WIDTH),
            utils::format_time(progress.position),
            utils::format_time(progress.duration),
        ),
        _ => format!("{} {} - {}", state.icon(), track.title(), track.artists()),
    };
    info!("{}", line);
}

fn print_queue<O: AudioOutput>(controller: &PlaybackController<O>) {
    let queue = controller.queue();
    if queue.is_empty() {
        info!("The queue is empty");
        return;
    }

    let rows: Vec<QueueTableRow> = queue
        .tracks()
        .iter()
        .enumerate()
        .map(|(i, track)| QueueTableRow::from_track(i, track, queue.cursor() == Some(i)))
        .collect();
    println!("{}", Table::new(rows));
}

fn print_help() {
    println!("  p / enter  play or pause");
    println!("  n / b      next / previous track");
    println!("  j <n>      jump to track n");
    println!("  s <pct>    seek to a percentage of the preview");
    println!("  m          mute or unmute");
    println!("  l          list the queue");
    println!("  c          clear the queue");
    println!("  i          show what is playing");
    println!("  q          quit");
}
