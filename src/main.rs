use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use consensus_rank::config::{apply_settings, is_tuned};
use consensus_rank::dataset::CorpusConstants;
use consensus_rank::export::{self, PlaylistTarget};
use consensus_rank::filter::eligible_items;
use consensus_rank::{output, scoring};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 2;
const EXIT_CONFIG: i32 = 4;

const DEFAULT_DATASET: &str = "data.json";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportTarget {
    Csv,
    Youtube,
    YoutubeMusic,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List songs by consensus rank (default if no subcommand)
    List {
        /// Only show the top N songs
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Show the score breakdown for the song at a rank
    Show {
        /// Rank of the song (1-based, as shown in list)
        rank: usize,
    },
    /// Export the top N songs as CSV or a playlist URL
    Export {
        /// Number of songs to export
        #[arg(short = 'n', long, default_value_t = 100)]
        top: usize,

        #[arg(short, long, value_enum, default_value = "csv")]
        target: ExportTarget,

        /// Write CSV to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the effective scoring configuration as YAML
    Config,
}

#[derive(Parser, Debug)]
#[command(name = "consensus-rank")]
#[command(about = "Consensus ranking of songs from weighted critic lists", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to settings file (defaults to ~/.config/consensus-rank/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the dataset (defaults to the settings file's `dataset`, then ./data.json)
    #[arg(short, long, global = true)]
    dataset: Option<PathBuf>,

    /// Override a setting, e.g. `-s k_value=15` or `-s "weight.Pitchfork=1.2"`
    #[arg(short = 's', long = "set", global = true, value_name = "KEY=VALUE")]
    set: Vec<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "consensus_rank=debug"
    } else {
        "consensus_rank=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Commands::List {
        limit: None,
        format: OutputFormat::Table,
    });
    let start_time = Instant::now();

    // Settings file, then --set overrides on top
    let config_path = cli.config.map(PathBuf::from);
    let mut settings = match consensus_rank::config::load_config(config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    for assignment in &cli.set {
        if let Err(e) = settings.apply_assignment(assignment) {
            eprintln!("Invalid --set: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }

    let dataset_path = cli
        .dataset
        .or_else(|| settings.dataset.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET));
    let dataset = match consensus_rank::dataset::load_dataset(&dataset_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Dataset error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };
    if let Err(errors) = consensus_rank::dataset::validate_dataset(&dataset) {
        eprintln!("Dataset errors in {}:", dataset_path.display());
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_DATA);
    }

    let effective = match apply_settings(&dataset.config, &settings) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    if let Err(errors) = scoring::validate_scoring(&effective) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let filters = settings.filters.clamped();
    let tuned = is_tuned(&dataset.config, &effective, &filters);

    let corpus = CorpusConstants::from_items(&dataset.songs);
    let eligible = eligible_items(&dataset.songs, &effective.sources, &filters);
    let eligible_count = eligible.len();
    let ranked = scoring::compute_rankings(
        eligible,
        &effective,
        &corpus,
        filters.contribution_cutoff(),
    );

    tracing::debug!(
        ln_max_list_count = corpus.ln_max_list_count,
        tuned,
        "ranked {} songs in {:?}",
        ranked.len(),
        start_time.elapsed()
    );
    if eligible_count < dataset.songs.len() {
        eprintln!("Including {} of {} songs", eligible_count, dataset.songs.len());
    }
    if tuned {
        eprintln!("Tuned: settings differ from the dataset defaults");
    }

    match command {
        Commands::List { limit, format } => {
            let shown = &ranked[..limit.unwrap_or(ranked.len()).min(ranked.len())];
            match format {
                OutputFormat::Table => {
                    let use_colors = output::should_use_colors();
                    println!("{}", output::format_ranked_table(shown, use_colors));
                }
                OutputFormat::Tsv => {
                    if !shown.is_empty() {
                        println!("{}", output::format_tsv(shown));
                    }
                }
                OutputFormat::Json => match output::format_json(shown) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Output error: {:#}", e);
                        std::process::exit(EXIT_DATA);
                    }
                },
            }
        }
        Commands::Show { rank } => {
            // Validate rank bounds (1-based)
            if rank < 1 || rank > ranked.len() {
                eprintln!(
                    "Invalid rank {}. Must be between 1 and {}.",
                    rank,
                    ranked.len()
                );
                std::process::exit(EXIT_CONFIG);
            }
            let use_colors = output::should_use_colors();
            println!("{}", output::format_item_detail(&ranked[rank - 1], use_colors));
        }
        Commands::Export {
            top,
            target,
            output: output_path,
        } => {
            let prefix = &ranked[..top.min(ranked.len())];
            match target {
                ExportTarget::Csv => {
                    for song in export::missing_isrc(prefix) {
                        eprintln!("Missing ISRC: {}", song);
                    }
                    let written = match &output_path {
                        Some(path) => {
                            let mut buffer = Vec::new();
                            export::write_csv(prefix, &mut buffer)
                                .and_then(|_| export::write_file_atomic(path, &buffer))
                        }
                        None => export::write_csv(prefix, std::io::stdout().lock()),
                    };
                    if let Err(e) = written {
                        eprintln!("Export error: {:#}", e);
                        std::process::exit(EXIT_DATA);
                    }
                    if let Some(path) = &output_path {
                        eprintln!("Wrote {} songs to {}", prefix.len(), path.display());
                    } else if cli.verbose {
                        eprintln!(
                            "Suggested file name: {}",
                            export::default_csv_filename(prefix.len())
                        );
                    }
                }
                ExportTarget::Youtube | ExportTarget::YoutubeMusic => {
                    let playlist_target = match target {
                        ExportTarget::YoutubeMusic => PlaylistTarget::YoutubeMusic,
                        _ => PlaylistTarget::Youtube,
                    };
                    let playlist = export::build_playlist(prefix, playlist_target);
                    for song in &playlist.missing {
                        eprintln!("Skipped (no video id): {}", song);
                    }
                    eprintln!("Exporting {} songs", playlist.included);
                    println!("{}", playlist.url);
                }
            }
        }
        Commands::Config => match serde_saphyr::to_string(&effective) {
            Ok(yaml) => print!("{}", yaml),
            Err(e) => {
                eprintln!("Failed to render config: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
    }

    std::process::exit(EXIT_SUCCESS);
}
