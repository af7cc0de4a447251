//! RATE command - Rate a purchased prompt.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::{HumanReadable, make_request, output};

/// Arguments for the rate command.
#[derive(Args)]
pub struct RateArgs {
    /// Token id
    pub id: u64,

    /// Star rating, 1..=5
    pub stars: u8,

    /// Free-form review text
    #[arg(long, default_value = "")]
    pub review: String,
}

/// Request body for a rating.
#[derive(Serialize)]
struct RateRequest {
    stars: u8,
    review: String,
}

/// Response from the rating endpoint.
#[derive(Debug, Deserialize, Serialize)]
pub struct RateResponse {
    pub token_id: u64,
    pub stars: u8,
    pub average_rating_x10: u64,
    pub rating_count: u64,
}

impl HumanReadable for RateResponse {
    fn print_human(&self) {
        println!("{}", "Rating recorded".green().bold());
        println!();
        println!("  {} {}", "Token ID:".cyan(), self.token_id);
        println!("  {} {} stars", "Yours:".cyan(), self.stars);
        println!(
            "  {} {}.{} stars across {} ratings",
            "Average:".cyan(),
            self.average_rating_x10 / 10,
            self.average_rating_x10 % 10,
            self.rating_count
        );
    }
}

/// Execute the rate command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: RateArgs,
) -> Result<()> {
    let url = format!("{}/prompts/{}/ratings", base_url, args.id);

    let request_body = RateRequest {
        stars: args.stars,
        review: args.review,
    };

    let response: RateResponse = make_request(client.post(&url).json(&request_body)).await?;

    output(&response, human)
}
