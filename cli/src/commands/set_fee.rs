//! SET-FEE command - Owner sets the listing fee for one kind.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::{HumanReadable, make_request, output};

/// Arguments for the set-fee command.
#[derive(Args)]
pub struct SetFeeArgs {
    /// Prompt kind: text, image, audio, or video (or its code 1..=4)
    pub kind: String,

    /// New listing fee in wei
    pub fee: u128,
}

/// Request body for updating a fee.
#[derive(Serialize)]
struct UpdateFeeRequest {
    fee_wei: u128,
}

/// Response from the fee update endpoint.
#[derive(Debug, Deserialize, Serialize)]
pub struct FeeEntry {
    pub kind: String,
    pub code: u8,
    pub fee_wei: u128,
}

impl HumanReadable for FeeEntry {
    fn print_human(&self) {
        println!("{}", "Listing fee updated".green().bold());
        println!();
        println!("  {} {} ({})", "Kind:".cyan(), self.kind, self.code);
        println!("  {} {} wei", "Fee:".cyan(), self.fee_wei);
    }
}

/// Execute the set-fee command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: SetFeeArgs,
) -> Result<()> {
    let url = format!("{}/fees/{}", base_url, args.kind);

    let request_body = UpdateFeeRequest { fee_wei: args.fee };

    let response: FeeEntry = make_request(client.put(&url).json(&request_body)).await?;

    output(&response, human)
}
