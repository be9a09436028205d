//! Status command - show the latest reading.

use anyhow::Result;
use chrono::Utc;
use syntrack_store::Settings;

use super::{NO_DATA_MESSAGE, Session};
use crate::{Cli, OutputFormat};

/// Runs the status command.
pub fn run(cli: &Cli, settings: &Settings) -> Result<()> {
    let session = Session::open(cli, settings)?;
    let status = session.analytics().current_status(Utc::now())?;

    match (cli.format, status) {
        (OutputFormat::Text, Some(status)) => println!("{}", session.text.format_status(&status)),
        (OutputFormat::Text, None) => println!("{NO_DATA_MESSAGE}"),
        (OutputFormat::Json, Some(status)) => println!("{}", session.json.format(&status)?),
        (OutputFormat::Json, None) => {
            println!("{}", session.json.format_notice(NO_DATA_MESSAGE, Some(0))?);
        }
    }

    Ok(())
}
