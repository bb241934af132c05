use std::path::PathBuf;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use kira_interactome::acquire::{InwebHttpClient, acquire_inweb, default_download_dir};
use kira_interactome::app::{Pipeline, load_source};
use kira_interactome::catalog::{CatalogSet, ReferenceCatalog};
use kira_interactome::complex::ComplexMembership;
use kira_interactome::config::{ConfigLoader, default_schema};
use kira_interactome::dedup::Deduplicator;
use kira_interactome::domain::{CatalogKind, SourceKind};
use kira_interactome::error::InteractomeError;
use kira_interactome::interaction::read_interactions;
use kira_interactome::merge::{combine, only_noncomplex, overlay_curated, remove_listed};
use kira_interactome::output::{JsonOutput, LogSink, OutputSchema, TableWriter};

#[derive(Parser)]
#[command(name = "kira-im")]
#[command(about = "Integrate IMEx, InnateDB and InWeb interaction dumps into one canonical table")]
#[command(version, author)]
struct Cli {
    /// Print a JSON report on stdout.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the whole pipeline from kira-im.json")]
    Run(RunArgs),
    #[command(about = "Parse an IMEx dump into canonical interactions")]
    Imex(SourceArgs),
    #[command(about = "Parse an InnateDB export into canonical interactions")]
    Innatedb(SourceArgs),
    #[command(about = "Parse an InWeb InBioMap core.psimitab into canonical interactions")]
    Inweb(SourceArgs),
    #[command(about = "Merge two interaction tables, keeping the first on overlap")]
    Merge(MergeArgs),
    #[command(about = "Remove listed pairs from an interaction table")]
    Remove(RemoveArgs),
    #[command(about = "Append a curated table onto a derived one")]
    Curate(CurateArgs),
    #[command(about = "Drop interactions involving complex members")]
    Noncomplex(NoncomplexArgs),
    #[command(about = "Download and unpack InWeb InBioMap")]
    FetchInweb(FetchArgs),
}

#[derive(Args)]
struct RunArgs {
    #[arg(long)]
    config: Option<String>,
}

#[derive(Args)]
struct SourceArgs {
    input: PathBuf,

    #[arg(long)]
    protein_catalog: Option<PathBuf>,

    #[arg(long)]
    gene_catalog: Option<PathBuf>,

    #[arg(long, short)]
    output: Utf8PathBuf,

    #[arg(long)]
    schema: Option<OutputSchema>,

    /// Source labels that win equal-score ties, highest first.
    #[arg(long, value_delimiter = ',')]
    precedence: Vec<String>,
}

#[derive(Args)]
struct MergeArgs {
    primary: PathBuf,
    secondary: PathBuf,

    #[arg(long, short)]
    output: Utf8PathBuf,
}

#[derive(Args)]
struct RemoveArgs {
    interactions: PathBuf,
    blacklist: PathBuf,

    #[arg(long, short)]
    output: Utf8PathBuf,
}

#[derive(Args)]
struct CurateArgs {
    derived: PathBuf,
    curated: PathBuf,

    #[arg(long, short)]
    output: Utf8PathBuf,

    #[arg(long, default_value_t = 4)]
    precision: usize,
}

#[derive(Args)]
struct NoncomplexArgs {
    interactions: PathBuf,
    complexes: PathBuf,

    #[arg(long, short)]
    output: Utf8PathBuf,
}

#[derive(Args)]
struct FetchArgs {
    #[arg(long)]
    dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<InteractomeError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &InteractomeError) -> u8 {
    match error {
        InteractomeError::MissingConfig
        | InteractomeError::ConfigRead(_)
        | InteractomeError::ConfigParse(_)
        | InteractomeError::MissingCatalog(_)
        | InteractomeError::TableRead { .. } => 2,
        InteractomeError::DownloadHttp(_) | InteractomeError::DownloadStatus { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => {
            let config = ConfigLoader::resolve(args.config.as_deref())?;
            let pipeline = Pipeline::new(config, InwebHttpClient::new()?);
            let report = pipeline.run(&LogSink)?;
            if cli.json {
                JsonOutput::print_run(&report).into_diagnostic()?;
            } else {
                for warning in &report.warnings {
                    eprintln!("warning: {warning}");
                }
                println!("{} interactions -> {}", report.interactions, report.output_path);
            }
            Ok(())
        }
        Commands::Imex(args) => run_source(SourceKind::Imex, args, cli.json),
        Commands::Innatedb(args) => run_source(SourceKind::Innatedb, args, cli.json),
        Commands::Inweb(args) => run_source(SourceKind::Inweb, args, cli.json),
        Commands::Merge(args) => {
            let primary = read_interactions(&args.primary)?;
            let secondary = read_interactions(&args.secondary)?;
            let merged = combine(primary, secondary);
            TableWriter::new(OutputSchema::Interactions).write(&merged, &args.output)?;
            Ok(())
        }
        Commands::Remove(args) => {
            let interactions = read_interactions(&args.interactions)?;
            let blacklist = read_interactions(&args.blacklist)?;
            let kept = remove_listed(interactions, &blacklist);
            TableWriter::new(OutputSchema::Interactions).write(&kept, &args.output)?;
            Ok(())
        }
        Commands::Curate(args) => {
            let derived = read_interactions(&args.derived)?;
            let curated = read_interactions(&args.curated)?;
            let merged = overlay_curated(derived, curated);
            TableWriter::new(OutputSchema::Multidata)
                .with_precision(args.precision)
                .write(&merged, &args.output)?;
            Ok(())
        }
        Commands::Noncomplex(args) => {
            let interactions = read_interactions(&args.interactions)?;
            let membership = ComplexMembership::read(&args.complexes)?;
            let kept = only_noncomplex(interactions, &membership);
            TableWriter::new(OutputSchema::Interactions)
                .with_precision(4)
                .write(&kept, &args.output)?;
            Ok(())
        }
        Commands::FetchInweb(args) => {
            let dir = match args.dir {
                Some(dir) => dir,
                None => default_download_dir()?,
            };
            let client = InwebHttpClient::new()?;
            let core = acquire_inweb(&client, &dir)?;
            println!("{}", core.display());
            Ok(())
        }
    }
}

fn run_source(kind: SourceKind, args: SourceArgs, json: bool) -> miette::Result<()> {
    let catalogs = CatalogSet {
        protein: args
            .protein_catalog
            .as_deref()
            .map(|path| ReferenceCatalog::read(path, CatalogKind::Protein))
            .transpose()?,
        gene: args
            .gene_catalog
            .as_deref()
            .map(|path| ReferenceCatalog::read(path, CatalogKind::Gene))
            .transpose()?,
    };
    let dedup = Deduplicator::with_precedence(args.precedence);
    let batch = load_source(kind, &args.input, &catalogs, &dedup)?;
    let schema = args.schema.unwrap_or_else(|| default_schema(kind));
    TableWriter::new(schema).write(&batch.interactions, &args.output)?;
    if json {
        JsonOutput::print_json(&batch.summary).into_diagnostic()?;
    }
    Ok(())
}
