use anyhow::Result;

use crate::args::{Cli, Command};
use crate::io::config::Settings;

mod derive;
mod doctor;
mod fetch;
mod init;
mod sizes;
mod update;

pub async fn dispatch(cli: Cli) -> Result<()> {
    let settings = Settings::resolve(&cli.conn)?;
    match cli.command {
        Command::Derive { owner } => derive::run(&settings, owner.as_deref()).await,
        Command::Sizes => sizes::run().await,
        Command::Doctor => doctor::run(&settings).await,
        Command::Init => init::run(&settings).await,
        Command::SetAddress { address } => update::set_address(&settings, &address).await,
        Command::SetProfile { name, date, month, year } => {
            update::set_profile(&settings, &name, date, month, year).await
        }
        Command::WriteAddress { address } => update::write_address(&settings, &address).await,
        Command::GetAddress { raw } => fetch::address(&settings, raw).await,
        Command::GetProfile { raw } => fetch::profile(&settings, raw).await,
    }
}
