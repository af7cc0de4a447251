//! FEES command - Show the listing fee schedule.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::{HumanReadable, make_request, output};

/// Arguments for the fees command.
#[derive(Args)]
pub struct FeesArgs {
    // No additional arguments needed
}

/// Response from the fee schedule endpoint.
#[derive(Debug, Deserialize, Serialize)]
pub struct FeeScheduleResponse {
    pub fees: Vec<FeeEntry>,
}

/// One entry in the fee schedule.
#[derive(Debug, Deserialize, Serialize)]
pub struct FeeEntry {
    pub kind: String,
    pub code: u8,
    pub fee_wei: u128,
}

impl HumanReadable for FeeScheduleResponse {
    fn print_human(&self) {
        println!("{}", "Listing Fees".green().bold());
        println!();
        for entry in &self.fees {
            println!(
                "  {} ({}) {} wei",
                entry.kind.bold(),
                entry.code,
                entry.fee_wei
            );
        }
    }
}

/// Execute the fees command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    _args: FeesArgs,
) -> Result<()> {
    let url = format!("{}/fees", base_url);

    let response: FeeScheduleResponse = make_request(client.get(&url)).await?;

    output(&response, human)
}
