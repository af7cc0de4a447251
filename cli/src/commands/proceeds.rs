//! PROCEEDS command - Show the balance accrued to an account.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::{HumanReadable, make_request, output, short_account};

/// Arguments for the proceeds command.
#[derive(Args)]
pub struct ProceedsArgs {
    /// 64-char hex account id
    pub account: String,
}

/// Response from the proceeds endpoint.
#[derive(Debug, Deserialize, Serialize)]
pub struct ProceedsResponse {
    pub account: String,
    pub proceeds_wei: u128,
}

impl HumanReadable for ProceedsResponse {
    fn print_human(&self) {
        println!("  {} {}", "Account:".cyan(), short_account(&self.account));
        println!("  {} {} wei", "Proceeds:".cyan(), self.proceeds_wei);
    }
}

/// Execute the proceeds command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: ProceedsArgs,
) -> Result<()> {
    let url = format!("{}/accounts/{}/proceeds", base_url, args.account);

    let response: ProceedsResponse = make_request(client.get(&url)).await?;

    output(&response, human)
}
