use anyhow::{bail, Context};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use npi_registry::prelude::*;
use npi_registry::export::export_records;
use npi_registry::research::{default_categories, default_major_organizations, DEFAULT_PER_TERM_LIMIT};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "npireg")]
#[command(
    version,
    about = "NPI Registry CLI - Search, look up, and export providers from the CMS NPI Registry",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Path to a TOML config file (replaces the default location)
    #[arg(long, global = true, env = "NPI_REGISTRY_CONFIG")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demonstration sequence (default)
    Demo(DemoArgs),
    /// Search with any combination of registry filters
    Search(SearchArgs),
    /// Search healthcare organizations in New York
    Organizations(OrganizationsArgs),
    /// Search providers by specialty (taxonomy description)
    Specialty(SpecialtyArgs),
    /// Show details for one provider
    Provider(ProviderArgs),
    /// Sweep organization categories in a state and save the results
    Research(ResearchArgs),
    /// Inspect or create the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Default)]
struct DemoArgs {
    /// Also fetch this provider's details
    #[arg(long)]
    npi: Option<String>,
    /// Export the New York organizations to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct OutputArgs {
    /// Write results to this file instead of only printing them
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Output format (defaults to the file extension, else CSV)
    #[arg(long, value_enum)]
    format: Option<FormatOpt>,
}

#[derive(Args)]
struct SearchArgs {
    /// State code (e.g. NY, CA)
    #[arg(long)]
    state: Option<String>,
    /// Specialty (taxonomy description, e.g. Cardiology)
    #[arg(long)]
    specialty: Option<String>,
    /// Organization name
    #[arg(long)]
    organization: Option<String>,
    /// City
    #[arg(long)]
    city: Option<String>,
    /// ZIP code
    #[arg(long)]
    postal_code: Option<String>,
    /// Provider first name
    #[arg(long)]
    first_name: Option<String>,
    /// Provider last name
    #[arg(long)]
    last_name: Option<String>,
    /// NPI number
    #[arg(long)]
    npi: Option<String>,
    /// Restrict to individuals or organizations
    #[arg(long = "type", value_enum)]
    enumeration_type: Option<EnumerationTypeOpt>,
    /// Limit number of results (1-1200)
    #[arg(long)]
    limit: Option<u32>,
    /// Skip this many results (at most 1000)
    #[arg(long)]
    skip: Option<u32>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct OrganizationsArgs {
    /// Limit number of results (1-1200)
    #[arg(long)]
    limit: Option<u32>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct SpecialtyArgs {
    /// Taxonomy description, e.g. "Hospital" or "Cardiology"
    specialty: String,
    /// State code
    #[arg(long, default_value = "NY")]
    state: String,
    /// Limit number of results (1-1200)
    #[arg(long)]
    limit: Option<u32>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct ProviderArgs {
    /// 10-digit NPI number
    npi: String,
    /// Print the record as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ResearchArgs {
    /// State to keep results for
    #[arg(long, default_value = "NY")]
    state: String,
    /// Results requested per search term (1-1200)
    #[arg(long, default_value_t = DEFAULT_PER_TERM_LIMIT)]
    per_term_limit: u32,
    /// Directory for the JSON and CSV output
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// Skip the well-known organization search
    #[arg(long)]
    no_major: bool,
    /// Skip the PNG summary chart
    #[cfg(feature = "chart")]
    #[arg(long)]
    no_chart: bool,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Print the default config file path
    Path,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum FormatOpt {
    Csv,
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum EnumerationTypeOpt {
    Individual,
    Organization,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<NpiRegistryError>() {
            Some(err) => eprintln!("Error: {}", err.user_message()),
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command.unwrap_or(Commands::Demo(DemoArgs::default())) {
        Commands::Config(cmd) => cmd_config(cmd, config_path),
        Commands::Demo(args) => cmd_demo(&connect(config_path)?, args).await,
        Commands::Search(args) => cmd_search(&connect(config_path)?, args).await,
        Commands::Organizations(args) => cmd_organizations(&connect(config_path)?, args).await,
        Commands::Specialty(args) => cmd_specialty(&connect(config_path)?, args).await,
        Commands::Provider(args) => cmd_provider(&connect(config_path)?, args).await,
        Commands::Research(args) => cmd_research(&connect(config_path)?, args).await,
    }
}

/// Load layered configuration and build the client from it
fn connect(config_path: Option<&Path>) -> anyhow::Result<NpiRegistryClient> {
    let config = ClientConfig::load_from(config_path)?;
    Ok(NpiRegistryClient::with_config(config)?)
}

async fn cmd_demo(client: &NpiRegistryClient, args: DemoArgs) -> anyhow::Result<()> {
    println!("NPI Registry API Client");
    println!("{}", "=".repeat(50));

    println!("\n1. Testing API connectivity...");
    let total = client.check_connectivity().await
        .context("API connection failed")?;
    println!("API is working! Found {} total providers", total);

    println!("\n2. Searching for healthcare organizations in New York...");
    let ny_orgs = match client.search_ny_healthcare_organizations(10).await {
        Ok(orgs) => orgs,
        Err(e) => {
            report_step_failure(&e);
            Vec::new()
        }
    };
    if ny_orgs.is_empty() {
        println!("No organizations found");
    } else {
        println!("Found {} healthcare organizations in NY", ny_orgs.len());
        for (i, org) in ny_orgs.iter().take(3).enumerate() {
            println!("\nOrganization {}:", i + 1);
            println!("  Name: {}", or_na(&org.display_name()));
            println!("  NPI: {}", org.npi_str().unwrap_or("N/A"));
            println!(
                "  Address: {}",
                org.primary_address().and_then(|a| a.address_1.as_deref()).unwrap_or("N/A")
            );
        }
    }

    println!("\n3. Searching for hospitals in NY...");
    match client.search_by_specialty("Hospital", "NY", 5).await {
        Ok(hospitals) if hospitals.is_empty() => println!("No results found for specialty: Hospital"),
        Ok(hospitals) => {
            println!("Found {} hospitals in NY", hospitals.len());
            for (i, hospital) in hospitals.iter().take(2).enumerate() {
                println!("\nHospital {}:", i + 1);
                println!("  Name: {}", or_na(&hospital.display_name()));
                println!("  NPI: {}", hospital.npi_str().unwrap_or("N/A"));
            }
        }
        Err(e) => report_step_failure(&e),
    }

    if let Some(npi) = args.npi.as_deref() {
        println!("\n4. Fetching provider {}...", npi);
        match client.get_provider_details(npi).await {
            Ok(provider) => print_details(&provider),
            Err(e) if e.is_not_found() => println!("Provider not found"),
            Err(e) => report_step_failure(&e),
        }
    }

    if let Some(path) = args.output.as_deref() {
        write_output(&ny_orgs, path, None)?;
    }

    Ok(())
}

/// Demo steps after the connectivity check report failures and carry on
fn report_step_failure(err: &NpiRegistryError) {
    println!("No results found or error in search");
    eprintln!("  {}", err.user_message());
}

async fn cmd_search(client: &NpiRegistryClient, args: SearchArgs) -> anyhow::Result<()> {
    let default_limit = client.config().default_limit;
    let mut builder = SearchCriteria::builder().limit(args.limit.unwrap_or(default_limit));
    if let Some(state) = args.state {
        builder = builder.state(state);
    }
    if let Some(specialty) = args.specialty {
        builder = builder.taxonomy_description(specialty);
    }
    if let Some(organization) = args.organization {
        builder = builder.organization_name(organization);
    }
    if let Some(city) = args.city {
        builder = builder.city(city);
    }
    if let Some(postal_code) = args.postal_code {
        builder = builder.postal_code(postal_code);
    }
    if let Some(first_name) = args.first_name {
        builder = builder.first_name(first_name);
    }
    if let Some(last_name) = args.last_name {
        builder = builder.last_name(last_name);
    }
    if let Some(npi) = args.npi {
        builder = builder.number(npi);
    }
    if let Some(kind) = args.enumeration_type {
        builder = builder.enumeration_type(match kind {
            EnumerationTypeOpt::Individual => EnumerationType::Individual,
            EnumerationTypeOpt::Organization => EnumerationType::Organization,
        });
    }
    if let Some(skip) = args.skip {
        builder = builder.skip(skip);
    }

    let response = client.search_providers(&builder.build()).await?;
    print_records(&response.records);
    println!("Returned {} of {} matches", response.records.len(), response.result_count);
    finish_output(&response.records, &args.output)
}

async fn cmd_organizations(client: &NpiRegistryClient, args: OrganizationsArgs) -> anyhow::Result<()> {
    let default_limit = client.config().default_limit;
    let records = client
        .search_ny_healthcare_organizations(args.limit.unwrap_or(default_limit))
        .await?;
    print_records(&records);
    println!("Total organizations: {}", records.len());
    finish_output(&records, &args.output)
}

async fn cmd_specialty(client: &NpiRegistryClient, args: SpecialtyArgs) -> anyhow::Result<()> {
    let default_limit = client.config().default_limit;
    let records = client
        .search_by_specialty(&args.specialty, &args.state, args.limit.unwrap_or(default_limit))
        .await?;
    if records.is_empty() {
        println!("No results found for specialty: {}", args.specialty);
    }
    print_records(&records);
    println!("Total matches: {}", records.len());
    finish_output(&records, &args.output)
}

async fn cmd_provider(client: &NpiRegistryClient, args: ProviderArgs) -> anyhow::Result<()> {
    let provider = client.get_provider_details(&args.npi).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&provider)?);
    } else {
        print_details(&provider);
    }
    Ok(())
}

async fn cmd_research(client: &NpiRegistryClient, args: ResearchArgs) -> anyhow::Result<()> {
    let researcher = Researcher::new(client)
        .state(&args.state)?
        .per_term_limit(args.per_term_limit);

    println!("{} Healthcare Companies Research", args.state.to_uppercase());
    println!("{}", "=".repeat(60));

    let report = researcher.research_categories(&default_categories()).await?;
    let saved = report.save(&args.out_dir)?;
    println!("Results saved to {}", saved.json_path.display());
    if let Some(csv_path) = &saved.csv_path {
        println!("Results saved to {}", csv_path.display());
    }
    println!();
    report.print_summary(5);

    let mut major_found = 0;
    if !args.no_major {
        println!("\nSearching for major healthcare companies in {}...", report.state);
        let majors = researcher.search_major_organizations(&default_major_organizations()).await?;
        for company in &majors {
            println!("  Found: {}", company.company_name.as_deref().unwrap_or("N/A"));
        }
        major_found = majors.len();
        println!("Major companies found: {}", major_found);
    }

    #[cfg(feature = "chart")]
    {
        if !args.no_chart {
            match report.save_chart(&args.out_dir, major_found) {
                Ok(path) => println!("\nVisualization saved to {}", path.display()),
                Err(e) => eprintln!("Visualization failed: {}", e.user_message()),
            }
        }
    }
    #[cfg(not(feature = "chart"))]
    let _ = major_found;

    Ok(())
}

fn cmd_config(cmd: ConfigCommand, explicit: Option<&Path>) -> anyhow::Result<()> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => ClientConfig::default_config_path(),
    };

    match cmd {
        ConfigCommand::Show => {
            let config = ClientConfig::load_from(explicit)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigCommand::Path => match path {
            Some(path) => println!("{}", path.display()),
            None => bail!("no home directory found for the default config path"),
        },
        ConfigCommand::Init { force } => {
            let Some(path) = path else {
                bail!("no home directory found; pass --config <file>");
            };
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            ClientConfig::default().save(&path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn finish_output(records: &[ProviderRecord], output: &OutputArgs) -> anyhow::Result<()> {
    match output.output.as_deref() {
        Some(path) => write_output(records, path, output.format),
        None => Ok(()),
    }
}

fn write_output(records: &[ProviderRecord], path: &Path, format: Option<FormatOpt>) -> anyhow::Result<()> {
    let format = match format {
        Some(FormatOpt::Csv) => ExportFormat::Csv,
        Some(FormatOpt::Json) => ExportFormat::Json,
        None => ExportFormat::from_path(path),
    };
    export_records(records, path, format)
        .with_context(|| format!("failed to export to {}", path.display()))?;
    println!("Exported {} records as {} to {}", records.len(), format, path.display());
    Ok(())
}

fn print_records(records: &[ProviderRecord]) {
    for record in records {
        let location = record.primary_address()
            .map(|a| format!("{}, {}", a.city.as_deref().unwrap_or(""), a.state.as_deref().unwrap_or("")))
            .unwrap_or_default();
        println!(
            "{} | {} | {} | {}",
            record.npi_str().unwrap_or("N/A"),
            or_na(&record.display_name()),
            record.enumeration_type.map(|t| t.to_string()).unwrap_or_default(),
            location
        );
    }
}

fn print_details(provider: &ProviderRecord) {
    println!("NPI: {}", provider.npi_str().unwrap_or("N/A"));
    println!("Name: {}", or_na(&provider.display_name()));
    if let Some(kind) = provider.enumeration_type {
        println!("Type: {}", kind);
    }
    if let Some(credential) = &provider.credential {
        println!("Credential: {}", credential);
    }
    if let Some(status) = &provider.status {
        println!("Status: {}", status);
    }
    if let Some(date) = provider.enumeration_date {
        println!("Enumerated: {}", date);
    }
    for address in &provider.addresses {
        println!(
            "Address ({}): {}",
            address.purpose.as_deref().unwrap_or("UNKNOWN"),
            address.format_single_line()
        );
        if let Some(phone) = &address.telephone {
            println!("  Phone: {}", phone);
        }
    }
    for taxonomy in &provider.taxonomies {
        println!(
            "Taxonomy: {} {}{}",
            taxonomy.code.as_deref().unwrap_or(""),
            taxonomy.desc.as_deref().unwrap_or(""),
            if taxonomy.primary { " (primary)" } else { "" }
        );
    }
}

fn or_na(value: &str) -> &str {
    if value.is_empty() { "N/A" } else { value }
}
