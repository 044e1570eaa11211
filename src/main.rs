// badges-pdf: Generate printable conference badges from Tito tickets

use std::path::{Path, PathBuf};

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use badges_pdf::config::Settings;
use badges_pdf::filter::TicketFilter;
use badges_pdf::lanes::split_lanes;
use badges_pdf::layout::{Layout, PaperSize};
use badges_pdf::logging::init_cli_logger;
use badges_pdf::remap::{apply_mapping, load_mapping};
use badges_pdf::render::{create_badges, Assets, BadgeOptions, RenderSession};
use badges_pdf::report::{attendees_by_year, save_attendees};
use badges_pdf::sessionize::read_speakers;
use badges_pdf::source::{
    load_speaker_emails, load_tickets, save_speakers, save_tickets, JsonFileSource, TicketSource,
    TitoClient,
};
use badges_pdf::ticket::Classifier;
use badges_pdf::Result;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate printable conference badges from Tito tickets")]
struct Cli {
    /// Settings file (defaults to badges.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render badges into a PDF
    Build(BuildArgs),
    /// Download all tickets from the API into a JSON file
    Fetch {
        /// Output JSON file
        #[arg(short, long, default_value = "tickets.json")]
        output: PathBuf,
    },
    /// Rewrite ticket references from a JSON mapping
    Remap {
        /// Tickets JSON file
        input: PathBuf,
        /// JSON object of old reference to new reference
        mapping: PathBuf,
        /// Where to write the rewritten tickets
        output: PathBuf,
        /// Print the changes without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Split references into registration desk lanes
    Lanes {
        /// Tickets JSON file
        tickets: PathBuf,
        /// Number of lanes
        #[arg(short, long, default_value = "4")]
        lanes: usize,
    },
    /// Convert a Sessionize export workbook into a speakers JSON file
    Speakers {
        /// Sessionize .xlsx export
        workbook: PathBuf,
        /// Output JSON file
        #[arg(short, long, default_value = "speakers.json")]
        output: PathBuf,
    },
    /// Merge several years of tickets into one attendee list by email
    Attendees {
        /// Tickets files as YEAR=PATH, oldest first
        #[arg(required = true, value_parser = parse_edition)]
        editions: Vec<(i32, PathBuf)>,
        /// Output JSON file
        #[arg(short, long, default_value = "sorted_attendees.json")]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Read tickets from a JSON file instead of the API
    #[arg(short, long)]
    tickets: Option<PathBuf>,

    /// Output filename (defaults to badges-{timestamp}.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write to badges.pdf instead of a timestamped name
    #[arg(long)]
    debug: bool,

    /// Draw alignment guidelines
    #[arg(long)]
    guidelines: bool,

    /// Paper size: A4 (two folded badges per sheet) or A5 (one flat badge)
    #[arg(short, long)]
    paper_size: Option<String>,

    /// Conference title printed on the front
    #[arg(long)]
    title: Option<String>,

    /// Leave the conference title off
    #[arg(long, conflicts_with = "title")]
    no_title: bool,

    /// Speakers JSON file
    #[arg(long)]
    speakers: Option<PathBuf>,

    /// Only tickets updated at or after this time
    #[arg(long)]
    updated_since: Option<String>,

    /// Only tickets created at or after this time
    #[arg(long)]
    created_since: Option<String>,

    /// Only tickets created on this day (YYYY-MM-DD)
    #[arg(long)]
    created_on: Option<String>,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    let cli = Cli::parse();
    init_cli_logger(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build(args) => build(cli.config.as_deref(), args),
        Command::Fetch { output } => fetch(cli.config.as_deref(), &output),
        Command::Remap { input, mapping, output, dry_run } => {
            remap(&input, &mapping, &output, dry_run)
        }
        Command::Lanes { tickets, lanes } => print_lanes(&tickets, lanes),
        Command::Speakers { workbook, output } => convert_speakers(&workbook, &output),
        Command::Attendees { editions, output } => attendee_report(&editions, &output),
    }
}

// ============================================================================
// Commands
// ============================================================================

fn build(config: Option<&Path>, args: BuildArgs) -> Result<()> {
    let settings = Settings::load(config)?;

    // Reject bad options before touching the ticket source
    let paper: PaperSize = args
        .paper_size
        .as_deref()
        .unwrap_or(settings.badge.paper_size.as_str())
        .parse()?;
    let filter = TicketFilter::from_options(
        args.updated_since.as_deref(),
        args.created_since.as_deref(),
        args.created_on.as_deref(),
    )?;

    let mut tickets = match &args.tickets {
        Some(path) => JsonFileSource::new(path).tickets()?,
        None => {
            let creds = settings.credentials()?;
            TitoClient::new(&creds.base_url, &creds.account, &creds.event, &creds.token)
                .tickets()?
        }
    };

    let speakers = match args.speakers.as_ref().or(settings.badge.speakers.as_ref()) {
        Some(path) => load_speaker_emails(path)?,
        None => Vec::new(),
    };
    let classifier = Classifier::new(
        &speakers,
        &settings.badge.exhibitor_release,
        &settings.badge.level_question,
    );
    for ticket in &mut tickets {
        classifier.classify(ticket);
    }

    let mut tickets = filter.apply(tickets);
    if tickets.is_empty() {
        info!("No tickets left after filtering, nothing to do");
        println!("No tickets to print.");
        return Ok(());
    }
    tickets.sort_by(|a, b| a.reference.cmp(&b.reference));

    let title = settings.badge.resolve_title(args.title.as_deref(), args.no_title);
    let options = BadgeOptions {
        title: title.clone(),
        guidelines: args.guidelines,
        level_key: classifier.level_key().to_string(),
    };

    let output_file = output_path(args.output, args.debug);
    let assets = Assets::load(&settings.badge)?;
    let mut session = RenderSession::new(Layout::for_paper(paper), &settings.fonts, assets, options)?;
    create_badges(&mut session, &tickets)?;
    let summary = session.finish(&output_file)?;

    println!("✓ Generated: {}", output_file.display());
    println!("  Paper: {}", paper);
    if let Some(title) = &title {
        println!("  Title: {}", title);
    }
    println!("  Badges: {}", summary.badges);
    println!("  Sheets: {}", summary.sheets);
    if !summary.anomalies.is_empty() {
        println!("  Tickets without a usable name ({}):", summary.anomalies.len());
        for reference in &summary.anomalies {
            println!("    {}", reference);
        }
    }

    Ok(())
}

fn fetch(config: Option<&Path>, output: &Path) -> Result<()> {
    let creds = Settings::load(config)?.credentials()?;
    let client = TitoClient::new(&creds.base_url, &creds.account, &creds.event, &creds.token);
    let tickets = client.tickets()?;
    save_tickets(&tickets, output)?;

    println!("✓ Saved {} tickets to {}", tickets.len(), output.display());
    Ok(())
}

fn remap(input: &Path, mapping: &Path, output: &Path, dry_run: bool) -> Result<()> {
    let mapping = load_mapping(mapping)?;
    let mut tickets = load_tickets(input)?;
    let changes = apply_mapping(&mut tickets, &mapping);

    for change in &changes {
        println!("  {} -> {}", change.from, change.to);
    }
    if dry_run {
        println!("Dry run: {} of {} references would change", changes.len(), tickets.len());
        return Ok(());
    }

    save_tickets(&tickets, output)?;
    println!(
        "✓ Remapped {} of {} references into {}",
        changes.len(),
        tickets.len(),
        output.display()
    );
    Ok(())
}

fn print_lanes(path: &Path, lanes: usize) -> Result<()> {
    let tickets = load_tickets(path)?;
    let references: Vec<&str> = tickets.iter().map(|t| t.reference.as_str()).collect();
    for lane in split_lanes(&references, lanes) {
        println!("{}", lane);
    }
    Ok(())
}

fn convert_speakers(workbook: &Path, output: &Path) -> Result<()> {
    let speakers = read_speakers(workbook)?;
    save_speakers(&speakers, output)?;

    println!("✓ Saved {} speakers to {}", speakers.len(), output.display());
    Ok(())
}

fn attendee_report(editions: &[(i32, PathBuf)], output: &Path) -> Result<()> {
    let mut years = Vec::with_capacity(editions.len());
    for (year, path) in editions {
        let tickets = load_tickets(path)?;
        info!(year = *year, count = tickets.len(), "Loaded tickets");
        years.push((*year, tickets));
    }
    let attendees = attendees_by_year(&years);
    save_attendees(&attendees, output)?;

    println!("✓ Saved {} attendees to {}", attendees.len(), output.display());
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_edition(value: &str) -> std::result::Result<(i32, PathBuf), String> {
    let (year, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected YEAR=PATH, got '{}'", value))?;
    let year = year
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a year", year))?;
    Ok((year, PathBuf::from(path)))
}

fn output_path(output: Option<PathBuf>, debug: bool) -> PathBuf {
    output.unwrap_or_else(|| {
        if debug {
            PathBuf::from("badges.pdf")
        } else {
            PathBuf::from(format!("badges-{}.pdf", Local::now().format("%Y%m%d-%H%M%S")))
        }
    })
}
