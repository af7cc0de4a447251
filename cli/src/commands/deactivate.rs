//! DEACTIVATE command - Close a token for purchase.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::{HumanReadable, make_request, output};

/// Arguments for the deactivate command.
#[derive(Args)]
pub struct DeactivateArgs {
    /// Token id
    pub id: u64,
}

/// Response from the deactivate endpoint.
#[derive(Debug, Deserialize, Serialize)]
pub struct DeactivateResponse {
    pub token_id: u64,
    pub active: bool,
}

impl HumanReadable for DeactivateResponse {
    fn print_human(&self) {
        println!(
            "{}",
            format!("Prompt #{} deactivated", self.token_id).yellow().bold()
        );
        println!();
        println!("  The token record stays readable but can no longer be purchased or rated.");
    }
}

/// Execute the deactivate command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: DeactivateArgs,
) -> Result<()> {
    let url = format!("{}/prompts/{}/deactivate", base_url, args.id);

    let response: DeactivateResponse = make_request(client.post(&url)).await?;

    output(&response, human)
}
