use std::sync::Arc;

use clap::Args;
use outreach_ai::config::AppConfig;
use outreach_ai::error::AppError;
use outreach_ai::workflows::outreach::domain::ClientId;
use outreach_ai::workflows::outreach::{CallPolicy, ClientOutreachService};

use crate::infra::{
    HeuristicProfileAnalyzer, InMemoryClientStore, ScoringInventoryMatcher,
    TemplateMessageComposer,
};

pub(crate) type SeededOutreachService = ClientOutreachService<
    InMemoryClientStore,
    HeuristicProfileAnalyzer,
    ScoringInventoryMatcher,
    TemplateMessageComposer,
>;

/// Builds the pipeline against the seeded reference capabilities.
pub(crate) fn seeded_service(policy: CallPolicy) -> SeededOutreachService {
    ClientOutreachService::with_policy(
        Arc::new(InMemoryClientStore::with_seed_data()),
        Arc::new(HeuristicProfileAnalyzer),
        Arc::new(ScoringInventoryMatcher::with_seed_data()),
        Arc::new(TemplateMessageComposer),
        policy,
    )
}

#[derive(Args, Debug)]
pub(crate) struct ProcessArgs {
    /// Client identifier understood by the data source
    #[arg(long)]
    pub(crate) client_id: String,
    /// Pretty-print the resulting JSON
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the no-match walkthrough and only process the matched client
    #[arg(long)]
    pub(crate) skip_no_match: bool,
}

pub(crate) async fn run_process(args: ProcessArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = seeded_service(config.outreach.call_policy());

    let result = service
        .process_client(&ClientId(args.client_id))
        .await
        .map_err(AppError::from)?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{rendered}");
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = seeded_service(config.outreach.call_policy());

    println!("Client outreach demo");
    walk_client(&service, "691481", "matched client").await?;
    if !args.skip_no_match {
        walk_client(&service, "714205", "no-match client").await?;
    }

    Ok(())
}

async fn walk_client(
    service: &SeededOutreachService,
    client_id: &str,
    heading: &str,
) -> Result<(), AppError> {
    println!("\nProcessing {heading} ({client_id})");
    let result = service
        .process_client(&ClientId(client_id.to_string()))
        .await
        .map_err(AppError::from)?;

    println!("- summary: {}", result.summary);
    println!(
        "- message ({} chars): {}",
        result.message.chars().count(),
        result.message
    );
    println!(
        "- inventory found: {}",
        if result.inventory_found { "yes" } else { "no" }
    );
    Ok(())
}
