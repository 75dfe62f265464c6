use std::io::{IsTerminal, Write};

use chrono::Utc;
use clap::Subcommand;
use hattika_core::document::ids;
use hattika_core::launch::to_iso_string;
use hattika_core::{Countdown, LaunchDate, PageContext};
use serde::Serialize;
use tokio::time::MissedTickBehavior;

use super::{open_page, Store};

#[derive(Subcommand)]
pub enum CountdownAction {
    /// Render the countdown once
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Keep the countdown live until interrupted
    Watch {
        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,
    },
}

#[derive(Serialize)]
struct CountdownView {
    launch_date: Option<LaunchDate>,
    countdown: Option<Countdown>,
    fields: [String; 4],
}

fn fields(page: &PageContext<Store>) -> [String; 4] {
    ids::COUNTDOWN_SLOTS.map(|id| page.document().text(id).unwrap_or_default().to_string())
}

fn line(page: &PageContext<Store>) -> String {
    let [days, hours, minutes, seconds] = fields(page);
    format!("{days} days {hours}:{minutes}:{seconds}")
}

pub fn run(action: CountdownAction, ephemeral: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = open_page(ephemeral)?;
    page.boot(Utc::now())?;

    match action {
        CountdownAction::Show { json } => {
            if json {
                let view = CountdownView {
                    launch_date: page.launch().peek()?,
                    countdown: page.countdown(),
                    fields: fields(&page),
                };
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                match page.launch().peek()? {
                    Some(LaunchDate::At { at }) => println!("Launch: {}", to_iso_string(at)),
                    Some(LaunchDate::Invalid { raw }) => println!("Launch: {raw} (unreadable)"),
                    None => {}
                }
                println!("{}", line(&page));
            }
            page.shutdown();
        }
        CountdownAction::Watch { ticks } => watch(page, ticks)?,
    }
    Ok(())
}

fn watch(mut page: PageContext<Store>, ticks: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let period = std::time::Duration::from_millis(page.config().countdown.tick_interval_ms);
    let live = std::io::stdout().is_terminal();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        emit(&page, live);
        let mut fired = 0u64;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    page.advance_to(Utc::now())?;
                    emit(&page, live);
                    fired += 1;
                    if ticks.is_some_and(|limit| fired >= limit) {
                        break;
                    }
                }
                _ = &mut ctrl_c => break,
            }
        }

        page.shutdown();
        if live {
            println!();
        }
        tracing::debug!(fired, "countdown watch stopped");
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}

fn emit(page: &PageContext<Store>, live: bool) {
    let mut stdout = std::io::stdout().lock();
    if live {
        let _ = write!(stdout, "\r{}", line(page));
        let _ = stdout.flush();
    } else {
        let _ = writeln!(stdout, "{}", line(page));
    }
}
