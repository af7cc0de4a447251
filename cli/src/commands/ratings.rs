//! RATINGS command - Show a token's rating log and summary.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::{HumanReadable, format_timestamp, make_request, output, short_account};

/// Arguments for the ratings command.
#[derive(Args)]
pub struct RatingsArgs {
    /// Token id
    pub id: u64,

    /// Number of ratings to skip
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Maximum ratings to return
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

/// Response from the rating log endpoint. Four aligned sequences in
/// submission order.
#[derive(Debug, Deserialize, Serialize)]
pub struct RatingsResponse {
    pub stars: Vec<u8>,
    pub reviews: Vec<String>,
    pub raters: Vec<String>,
    pub timestamps: Vec<DateTime<Utc>>,
    pub total: u64,
}

impl HumanReadable for RatingsResponse {
    fn print_human(&self) {
        println!("{}", "Ratings".green().bold());
        println!("{}", "=".repeat(80));
        println!();

        if self.stars.is_empty() {
            println!("  {}", "(No ratings in this page)".dimmed());
            return;
        }

        for i in 0..self.stars.len() {
            let stars = "*".repeat(self.stars[i] as usize);
            println!(
                "  {} {} {}",
                stars.yellow().bold(),
                short_account(&self.raters[i]).cyan(),
                format_timestamp(&self.timestamps[i]).dimmed()
            );
            if !self.reviews[i].is_empty() {
                println!("    {}", self.reviews[i]);
            }
            println!();
        }

        println!("  {} {}", "Total:".cyan(), self.total);
    }
}

/// Execute the ratings command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: RatingsArgs,
) -> Result<()> {
    let url = format!(
        "{}/prompts/{}/ratings?offset={}&limit={}",
        base_url, args.id, args.offset, args.limit
    );

    let response: RatingsResponse = make_request(client.get(&url)).await?;

    output(&response, human)
}
