//! Command-line interface for the PromptGrid marketplace.
//!
//! This CLI tool provides commands for all marketplace operations:
//! - create: Mint a new prompt token
//! - list: Browse the token listing
//! - show: Retrieve a token's stored fields
//! - data: Retrieve the gated metadata pointer
//! - counter: Show how many tokens have been minted
//! - fees: Show the listing fee schedule
//! - set-fee: Owner sets the fee for one kind
//! - deactivate: Close a token for purchase
//! - purchase: Buy access to a prompt
//! - rate: Rate a purchased prompt
//! - ratings: Show a token's rating log
//! - proceeds: Show the balance accrued to an account
//!
//! Configuration via environment:
//! - PROMPTGRID_URL: Base URL of the server (default: http://localhost:3000)
//! - PROMPTGRID_TOKEN: JWT Bearer token for authentication
//! - PROMPTGRID_ACCOUNT: Hex account id for the X-Account-Id dev header

mod commands;

use clap::{Parser, Subcommand};

use commands::{
    counter::CounterArgs, create::CreateArgs, data::DataArgs, deactivate::DeactivateArgs,
    fees::FeesArgs, list::ListArgs, proceeds::ProceedsArgs, purchase::PurchaseArgs,
    rate::RateArgs, ratings::RatingsArgs, set_fee::SetFeeArgs, show::ShowArgs,
};

/// PromptGrid marketplace CLI
///
/// Interact with the prompt registry and marketplace from the command line.
/// Designed for both scripts (JSON output) and humans (--human flag for
/// formatted output).
#[derive(Parser)]
#[command(name = "promptgrid")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output human-readable formatted text instead of JSON
    #[arg(long, global = true)]
    human: bool,

    /// PromptGrid server URL
    #[arg(
        long,
        env = "PROMPTGRID_URL",
        default_value = "http://localhost:3000",
        global = true
    )]
    url: String,

    /// JWT Bearer token for authentication
    #[arg(long, env = "PROMPTGRID_TOKEN", global = true)]
    token: Option<String>,

    /// Hex account id sent as the X-Account-Id dev header
    #[arg(long, env = "PROMPTGRID_ACCOUNT", global = true)]
    account: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint a new prompt token
    Create(CreateArgs),

    /// Browse the token listing
    List(ListArgs),

    /// Retrieve a token's stored fields
    Show(ShowArgs),

    /// Retrieve the gated metadata pointer
    Data(DataArgs),

    /// Show how many tokens have been minted
    Counter(CounterArgs),

    /// Show the listing fee schedule
    Fees(FeesArgs),

    /// Set the listing fee for one kind (owner only)
    SetFee(SetFeeArgs),

    /// Close a token for purchase
    Deactivate(DeactivateArgs),

    /// Buy access to a prompt
    Purchase(PurchaseArgs),

    /// Rate a purchased prompt
    Rate(RateArgs),

    /// Show a token's rating log
    Ratings(RatingsArgs),

    /// Show the balance accrued to an account
    Proceeds(ProceedsArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let client = match commands::build_client(cli.token.as_deref(), cli.account.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Create(args) => {
            commands::create::execute(&client, &cli.url, cli.human, args).await
        }
        Commands::List(args) => commands::list::execute(&client, &cli.url, cli.human, args).await,
        Commands::Show(args) => commands::show::execute(&client, &cli.url, cli.human, args).await,
        Commands::Data(args) => commands::data::execute(&client, &cli.url, cli.human, args).await,
        Commands::Counter(args) => {
            commands::counter::execute(&client, &cli.url, cli.human, args).await
        }
        Commands::Fees(args) => commands::fees::execute(&client, &cli.url, cli.human, args).await,
        Commands::SetFee(args) => {
            commands::set_fee::execute(&client, &cli.url, cli.human, args).await
        }
        Commands::Deactivate(args) => {
            commands::deactivate::execute(&client, &cli.url, cli.human, args).await
        }
        Commands::Purchase(args) => {
            commands::purchase::execute(&client, &cli.url, cli.human, args).await
        }
        Commands::Rate(args) => commands::rate::execute(&client, &cli.url, cli.human, args).await,
        Commands::Ratings(args) => {
            commands::ratings::execute(&client, &cli.url, cli.human, args).await
        }
        Commands::Proceeds(args) => {
            commands::proceeds::execute(&client, &cli.url, cli.human, args).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
