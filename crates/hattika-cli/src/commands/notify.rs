use chrono::Utc;
use clap::Args;
use hattika_core::document::ids;
use hattika_core::SubmitOutcome;

use super::open_page;

#[derive(Args)]
pub struct NotifyArgs {
    /// Address to sign up
    email: String,
    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: NotifyArgs, ephemeral: bool) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    let mut page = open_page(ephemeral)?;
    page.boot(now)?;
    page.type_email(&args.email);
    let outcome = page.submit_notify(now);
    page.shutdown();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        SubmitOutcome::NoForm => println!("no signup form on this page"),
        SubmitOutcome::Accepted { .. } | SubmitOutcome::Rejected { .. } => {
            let toast = page.document().text(ids::NOTIFY_TOAST).unwrap_or_default();
            println!("{toast}");
        }
    }
    Ok(())
}
