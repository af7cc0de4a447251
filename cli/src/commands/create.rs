//! CREATE command - Mint a new prompt token.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::{HumanReadable, format_timestamp, make_request, output};

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Prompt kind: text, image, audio, or video (or its code 1..=4)
    pub kind: String,

    /// The prompt content
    pub content: String,

    /// Display name for the prompt
    #[arg(long)]
    pub name: String,

    /// Purchase price in wei
    #[arg(long)]
    pub price: u128,

    /// Metadata pointer (e.g. an ipfs:// URL)
    #[arg(long, default_value = "")]
    pub metadata: String,

    /// Listing fee to attach in wei (must match the kind's fee)
    #[arg(long)]
    pub fee: u128,
}

/// Request body for minting a prompt.
#[derive(Serialize)]
struct CreatePromptRequest {
    kind: String,
    content: String,
    name: String,
    price_wei: u128,
    metadata: String,
    paid_wei: u128,
}

/// Response from minting a prompt.
#[derive(Debug, Deserialize, Serialize)]
pub struct CreatePromptResponse {
    pub token_id: u64,
    pub kind: String,
    pub price_wei: u128,
    pub fee_paid_wei: u128,
    pub created: DateTime<Utc>,
}

impl HumanReadable for CreatePromptResponse {
    fn print_human(&self) {
        println!("{}", "Prompt minted successfully!".green().bold());
        println!();
        println!("  {} {}", "Token ID:".cyan(), self.token_id);
        println!("  {} {}", "Kind:".cyan(), self.kind);
        println!("  {} {} wei", "Price:".cyan(), self.price_wei);
        println!("  {} {} wei", "Fee paid:".cyan(), self.fee_paid_wei);
        println!("  {} {}", "Created:".cyan(), format_timestamp(&self.created));
    }
}

/// Execute the create command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: CreateArgs,
) -> Result<()> {
    let url = format!("{}/prompts", base_url);

    let request_body = CreatePromptRequest {
        kind: args.kind,
        content: args.content,
        name: args.name,
        price_wei: args.price,
        metadata: args.metadata,
        paid_wei: args.fee,
    };

    let response: CreatePromptResponse =
        make_request(client.post(&url).json(&request_body)).await?;

    output(&response, human)
}
