//! COUNTER command - The next token id to be minted.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::{HumanReadable, make_request, output};

/// Arguments for the counter command.
#[derive(Args)]
pub struct CounterArgs {
    // No additional arguments needed
}

/// Response from the counter endpoint.
#[derive(Debug, Deserialize, Serialize)]
pub struct CounterResponse {
    pub next_token_id: u64,
}

impl HumanReadable for CounterResponse {
    fn print_human(&self) {
        println!(
            "  {} {} tokens minted, next id {}",
            "Counter:".cyan(),
            self.next_token_id,
            self.next_token_id
        );
    }
}

/// Execute the counter command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    _args: CounterArgs,
) -> Result<()> {
    let url = format!("{}/counter", base_url);

    let response: CounterResponse = make_request(client.get(&url)).await?;

    output(&response, human)
}
