use clap::{Args, Parser, Subcommand, ValueEnum};

use dealscout_core::{SearchParams, SortBy, SortOrder, DEFAULT_LIMIT};

#[derive(Debug, Parser)]
#[command(name = "dealscout-cli")]
#[command(about = "Search, rank, and compare deals across providers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search deals across all (or selected) providers.
    Search(SearchArgs),
    /// Show trending deals.
    Top(TopArgs),
    /// Look up one deal by its source-local id.
    Details(DetailsArgs),
    /// List registered providers.
    Sources,
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Free-text query, e.g. "gaming laptop".
    query: String,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    min_price: Option<f64>,
    #[arg(long)]
    max_price: Option<f64>,
    #[arg(long)]
    min_rating: Option<f64>,
    #[arg(long)]
    store: Option<String>,
    #[arg(long, value_enum)]
    sort_by: Option<SortByArg>,
    #[arg(long, value_enum)]
    sort_order: Option<SortOrderArg>,
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,
    /// Comma-separated provider names; all providers when omitted.
    #[arg(long, value_delimiter = ',')]
    sources: Vec<String>,
}

#[derive(Debug, Args)]
struct TopArgs {
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,
    #[arg(long, value_delimiter = ',')]
    sources: Vec<String>,
}

#[derive(Debug, Args)]
struct DetailsArgs {
    /// Source-local deal id.
    deal_id: String,
    /// Provider to ask directly; all providers are scanned when omitted.
    #[arg(long)]
    source: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortByArg {
    Price,
    Rating,
    Popularity,
    Date,
}

impl From<SortByArg> for SortBy {
    fn from(value: SortByArg) -> Self {
        match value {
            SortByArg::Price => SortBy::Price,
            SortByArg::Rating => SortBy::Rating,
            SortByArg::Popularity => SortBy::Popularity,
            SortByArg::Date => SortBy::Date,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortOrderArg {
    Asc,
    Desc,
}

impl From<SortOrderArg> for SortOrder {
    fn from(value: SortOrderArg) -> Self {
        match value {
            SortOrderArg::Asc => SortOrder::Asc,
            SortOrderArg::Desc => SortOrder::Desc,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = dealscout_core::load_app_config()?;
    let sources = dealscout_core::load_sources(&config.sources_path)?;
    let aggregator = dealscout_aggregator::build_aggregator(&config, &sources);

    match cli.command {
        Commands::Search(args) => {
            let params = search_params_from(args)?;
            let deals = aggregator.search_deals(&params).await;
            print_json(&serde_json::json!({
                "results": deals.len(),
                "deals": deals,
            }))?;
        }
        Commands::Top(args) => {
            dealscout_core::check_limit(args.limit)?;
            let sources = non_empty(args.sources);
            let deals = aggregator.get_top_deals(args.limit, sources.as_deref()).await;
            print_json(&serde_json::json!({
                "results": deals.len(),
                "deals": deals,
            }))?;
        }
        Commands::Details(args) => {
            let deal = aggregator
                .get_deal_details(&args.deal_id, args.source.as_deref())
                .await;
            match deal {
                Some(deal) => print_json(&serde_json::json!({ "deal": deal }))?,
                None => {
                    tracing::warn!(deal_id = %args.deal_id, "deal not found");
                    print_json(&serde_json::json!({ "deal": null }))?;
                }
            }
        }
        Commands::Sources => {
            print_json(&serde_json::json!({ "sources": aggregator.get_providers() }))?;
        }
    }

    Ok(())
}

fn search_params_from(args: SearchArgs) -> anyhow::Result<SearchParams> {
    let params = SearchParams {
        query: args.query,
        category: args.category,
        min_price: args.min_price,
        max_price: args.max_price,
        min_rating: args.min_rating,
        store: args.store,
        sort_by: args.sort_by.map(SortBy::from),
        sort_order: args.sort_order.map(SortOrder::from),
        limit: args.limit,
        sources: non_empty(args.sources),
    };
    params.validate()?;
    Ok(params)
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
