use anyhow::Context;
use folio_config::Config;
use folio_email_contracts::transport::TransportConfig;

use crate::environment::mail_settings;

/// Make sure the mail transport can be derived from the configuration.
pub fn check_config(config: &Config, verbose: bool) -> anyhow::Result<()> {
    if verbose {
        println!("{config:#?}");
    }

    let transport = TransportConfig::from_settings(&mail_settings(&config.smtp))
        .context("Invalid mail transport configuration")?;

    if verbose {
        println!("{transport:#?}");
    }

    Ok(())
}
