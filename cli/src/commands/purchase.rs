//! PURCHASE command - Buy access to a prompt.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::{HumanReadable, format_timestamp, make_request, output, short_account};

/// Arguments for the purchase command.
#[derive(Args)]
pub struct PurchaseArgs {
    /// Token id
    pub id: u64,

    /// Payment to attach in wei (must match the token price)
    #[arg(long)]
    pub pay: u128,
}

/// Request body for a purchase.
#[derive(Serialize)]
struct PurchaseRequest {
    paid_wei: u128,
}

/// Response from the purchase endpoint.
#[derive(Debug, Deserialize, Serialize)]
pub struct PurchaseResponse {
    pub token_id: u64,
    pub buyer: String,
    pub seller: String,
    pub price_wei: u128,
    pub purchased: DateTime<Utc>,
}

impl HumanReadable for PurchaseResponse {
    fn print_human(&self) {
        println!("{}", "Purchase complete!".green().bold());
        println!();
        println!("  {} {}", "Token ID:".cyan(), self.token_id);
        println!("  {} {}", "Seller:".cyan(), short_account(&self.seller));
        println!("  {} {} wei", "Price:".cyan(), self.price_wei);
        println!(
            "  {} {}",
            "Purchased:".cyan(),
            format_timestamp(&self.purchased)
        );
    }
}

/// Execute the purchase command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: PurchaseArgs,
) -> Result<()> {
    let url = format!("{}/prompts/{}/purchase", base_url, args.id);

    let request_body = PurchaseRequest { paid_wei: args.pay };

    let response: PurchaseResponse =
        make_request(client.post(&url).json(&request_body)).await?;

    output(&response, human)
}
