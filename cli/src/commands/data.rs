//! DATA command - Retrieve a token's gated metadata pointer.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::{HumanReadable, make_request, output};

/// Arguments for the data command.
#[derive(Args)]
pub struct DataArgs {
    /// Token id
    pub id: u64,

    /// 64-char hex verification key
    #[arg(long, env = "PROMPTGRID_METADATA_KEY")]
    pub key: String,
}

/// Response from the data endpoint.
#[derive(Debug, Deserialize, Serialize)]
pub struct DataResponse {
    pub token_id: u64,
    pub data: String,
}

impl HumanReadable for DataResponse {
    fn print_human(&self) {
        println!("  {} {}", "Token ID:".cyan(), self.token_id);
        println!("  {} {}", "Data:".cyan(), self.data);
    }
}

/// Execute the data command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: DataArgs,
) -> Result<()> {
    let url = format!("{}/prompts/{}/data?key={}", base_url, args.id, args.key);

    let response: DataResponse = make_request(client.get(&url)).await?;

    output(&response, human)
}
