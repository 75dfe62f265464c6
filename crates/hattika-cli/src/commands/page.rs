use chrono::Utc;
use clap::Subcommand;
use hattika_core::IntersectionEntry;

use super::open_page;

#[derive(Subcommand)]
pub enum PageAction {
    /// Boot the page and print its state as JSON
    Snapshot {
        /// Report an element as visible, e.g. `features=0.4` (repeatable)
        #[arg(long = "visible", value_name = "ID=RATIO")]
        visible: Vec<IntersectionEntry>,
    },
}

pub fn run(action: PageAction, ephemeral: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = open_page(ephemeral)?;

    match action {
        PageAction::Snapshot { visible } => {
            page.boot(Utc::now())?;
            let revealed = page.intersect(&visible);
            tracing::debug!(?revealed, "intersections applied");
            page.shutdown();
            println!("{}", serde_json::to_string_pretty(&page.snapshot()?)?);
        }
    }
    Ok(())
}
