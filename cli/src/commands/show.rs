//! SHOW command - Retrieve a token's stored fields.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::{HumanReadable, format_timestamp, make_request, output, short_account};

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Token id
    pub id: u64,
}

/// Response from the details endpoint.
#[derive(Debug, Deserialize, Serialize)]
pub struct PromptDetailsResponse {
    pub id: u64,
    pub kind: String,
    pub content: String,
    pub name: String,
    pub price_wei: u128,
    pub creator: String,
    pub metadata: String,
    pub active: bool,
    pub created: DateTime<Utc>,
    pub rating_count: u64,
    pub average_rating_x10: u64,
}

impl HumanReadable for PromptDetailsResponse {
    fn print_human(&self) {
        let status = if self.active {
            "active".green()
        } else {
            "deactivated".red()
        };
        println!("{} {}", format!("Prompt #{}", self.id).green().bold(), status);
        println!();
        println!("  {} {}", "Name:".cyan(), self.name);
        println!("  {} {}", "Kind:".cyan(), self.kind);
        println!("  {} {} wei", "Price:".cyan(), self.price_wei);
        println!("  {} {}", "Creator:".cyan(), short_account(&self.creator));
        println!("  {} {}", "Created:".cyan(), format_timestamp(&self.created));
        println!(
            "  {} {}.{} stars ({} ratings)",
            "Rating:".cyan(),
            self.average_rating_x10 / 10,
            self.average_rating_x10 % 10,
            self.rating_count
        );
        if !self.metadata.is_empty() {
            println!("  {} {}", "Metadata:".cyan(), self.metadata);
        }
        println!();
        println!("{}", self.content);
    }
}

/// Execute the show command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: ShowArgs,
) -> Result<()> {
    let url = format!("{}/prompts/{}", base_url, args.id);

    let response: PromptDetailsResponse = make_request(client.get(&url)).await?;

    output(&response, human)
}
