use chrono::Utc;
use clap::Subcommand;
use hattika_core::launch::{parse_user_launch_date, to_iso_string};
use hattika_core::{Config, LaunchDate, LaunchDateStore};

use super::Store;

#[derive(Subcommand)]
pub enum LaunchAction {
    /// Print the launch date, creating it if none is stored
    Get,
    /// Pin the launch date (RFC 3339, YYYY-MM-DD, or a local date-time)
    Set {
        date: String,
    },
    /// Forget the stored launch date
    Clear,
}

pub fn run(action: LaunchAction, ephemeral: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut launch = LaunchDateStore::new(Store::open(ephemeral)?, config.countdown.lead_days);

    match action {
        LaunchAction::Get => match launch.get_launch_date(Utc::now())? {
            LaunchDate::At { at } => println!("{}", to_iso_string(at)),
            LaunchDate::Invalid { raw } => println!("{raw} (unreadable)"),
        },
        LaunchAction::Set { date } => {
            let at = parse_user_launch_date(&date)?;
            launch.set_launch_date(at)?;
            println!("{}", to_iso_string(at));
        }
        LaunchAction::Clear => {
            launch.clear()?;
            println!("launch date cleared");
        }
    }
    Ok(())
}
