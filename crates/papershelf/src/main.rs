//! Command-line front end for the paper shelf.

mod fetch;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use papers::{
    open_external, subject_name, FilterDimension, FilterEngine, FilterValue, PaperId, Series,
    Variant,
};

#[derive(Parser)]
#[command(name = "papershelf", about = "Organize and track exam paper files")]
struct Cli {
    /// Root directory holding the paper files.
    #[arg(long, default_value = "Papers", env = "PAPERSHELF_ROOT")]
    root: PathBuf,

    /// Completion status sidecar file.
    #[arg(long, default_value = "data.json", env = "PAPERSHELF_STATUS")]
    status: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List records matching the given filters, with the completion aggregate.
    List {
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        year: Option<String>,
        /// FebMar, OctNov or MayJun.
        #[arg(long)]
        series: Option<String>,
        /// Tens digit of the paper number; 2 matches papers 21 and 23.
        #[arg(long)]
        paper: Option<u32>,
    },
    /// Flip the completion flag of one record.
    Toggle {
        subject: String,
        year: String,
        series: String,
        paper_number: String,
    },
    /// Open one of a record's files with the default viewer.
    Open {
        subject: String,
        year: String,
        series: String,
        paper_number: String,
        /// qp, ms, sf or in.
        variant: String,
    },
    /// Download paper files from the remote archive into the shelf layout.
    Fetch {
        #[arg(long = "subject", required = true)]
        subjects: Vec<String>,
        #[arg(long = "year", required = true)]
        years: Vec<String>,
        /// Defaults to all three serieses when omitted.
        #[arg(long = "series")]
        serieses: Vec<String>,
        /// Defaults to papers 21, 22 and 23 when omitted.
        #[arg(long = "paper")]
        papers: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::List {
            subject,
            year,
            series,
            paper,
        } => {
            let mut engine = FilterEngine::load(cli.root, cli.status)?;
            engine.set_filter(
                FilterDimension::Subject,
                subject.map(FilterValue::Text),
            );
            engine.set_filter(FilterDimension::Year, year.map(FilterValue::Text));
            engine.set_filter(FilterDimension::Series, series.map(FilterValue::Text));
            engine.set_filter(FilterDimension::PaperTens, paper.map(FilterValue::Tens));

            let view = engine.compute_filtered();
            for record in &view.records {
                let slots = record.slots.as_strs();
                println!(
                    "{:<5} {:<24} {:<5} {:<7} {:<3} {:<3} {:<3} {:<3} {}",
                    record.id.subject,
                    subject_name(&record.id.subject).unwrap_or(""),
                    record.id.year,
                    record.id.series,
                    record.id.paper_number,
                    slots[0],
                    slots[1],
                    slots[2],
                    if record.completed { "done" } else { "" },
                );
            }
            println!("{} completed", view.aggregate);
        }
        Command::Toggle {
            subject,
            year,
            series,
            paper_number,
        } => {
            let mut engine = FilterEngine::load(cli.root, cli.status)?;
            let id = parse_id(subject, year, &series, paper_number)?;
            let completed = engine.toggle_completion(&id)?;
            println!(
                "{id}: {}",
                if completed { "completed" } else { "not completed" }
            );
        }
        Command::Open {
            subject,
            year,
            series,
            paper_number,
            variant,
        } => {
            let engine = FilterEngine::load(cli.root, cli.status)?;
            let id = parse_id(subject, year, &series, paper_number)?;
            let variant: Variant = variant.parse()?;
            let path = engine.resolve_open_path(&id, variant)?;
            open_external(&path)?;
        }
        Command::Fetch {
            subjects,
            years,
            serieses,
            papers,
        } => {
            let serieses = if serieses.is_empty() {
                vec![Series::FebMar, Series::MayJun, Series::OctNov]
            } else {
                serieses
                    .iter()
                    .map(|value| value.parse())
                    .collect::<papers::Result<Vec<Series>>>()?
            };
            let papers = if papers.is_empty() {
                vec!["21".to_string(), "22".to_string(), "23".to_string()]
            } else {
                papers
            };
            fetch::fetch_papers(&cli.root, &subjects, &years, &serieses, &papers)?;
        }
    }
    Ok(())
}

fn parse_id(
    subject: String,
    year: String,
    series: &str,
    paper_number: String,
) -> anyhow::Result<PaperId> {
    let series: Series = series.parse()?;
    Ok(PaperId::new(subject, year, series, paper_number))
}
