//! LIST command - Browse the token listing.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::{HumanReadable, make_request, output, short_account};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Number of tokens to skip
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Maximum tokens to return
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

/// Response from listing prompts.
#[derive(Debug, Deserialize, Serialize)]
pub struct ListPromptsResponse {
    pub prompts: Vec<PromptSummary>,
    pub next_token_id: u64,
}

/// One token in the listing.
#[derive(Debug, Deserialize, Serialize)]
pub struct PromptSummary {
    pub id: u64,
    pub kind: String,
    pub name: String,
    pub price_wei: u128,
    pub creator: String,
    pub active: bool,
    pub rating_count: u64,
    pub average_rating_x10: u64,
}

impl HumanReadable for ListPromptsResponse {
    fn print_human(&self) {
        println!("{}", "Prompt Tokens".green().bold());
        println!("{}", "=".repeat(80));
        println!();

        if self.prompts.is_empty() {
            println!("  {}", "(No tokens in this page)".dimmed());
            return;
        }

        for prompt in &self.prompts {
            let status = if prompt.active {
                "active".green()
            } else {
                "deactivated".red()
            };
            println!("  {} {} {}", format!("#{}", prompt.id).yellow(), prompt.name.bold(), status);
            println!("    {} {}", "Kind:".cyan(), prompt.kind);
            println!("    {} {} wei", "Price:".cyan(), prompt.price_wei);
            println!("    {} {}", "Creator:".cyan(), short_account(&prompt.creator));
            println!(
                "    {} {}.{} stars ({} ratings)",
                "Rating:".cyan(),
                prompt.average_rating_x10 / 10,
                prompt.average_rating_x10 % 10,
                prompt.rating_count
            );
            println!();
        }

        println!("  {} {} minted in total", "Counter:".cyan(), self.next_token_id);
    }
}

/// Execute the list command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: ListArgs,
) -> Result<()> {
    let url = format!(
        "{}/prompts?offset={}&limit={}",
        base_url, args.offset, args.limit
    );

    let response: ListPromptsResponse = make_request(client.get(&url)).await?;

    output(&response, human)
}
