// jobwallet CLI - occupation explorer and skill wallet
//
// Every command that needs occupation data loads a fresh bundle from the
// configured source. Human-readable output goes to stdout; with --json,
// stdout carries exactly one JSON value. Logs and errors go to stderr.

mod exit_codes;
mod http;
mod ids;
mod wallet;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use jobwallet_config::{CategorySort, Settings};
use jobwallet_recon::views::{
    category_summaries, dwa_summaries, occupations_in, profile, requirement_tree,
    CategorySummary, OccupationProfile, RequirementTree,
};
use jobwallet_recon::{
    load_from, load_ids, Bundle, DataConfig, DatasetSource, DirSource, IdCard, ReconError,
};

use exit_codes::{
    recon_exit_code, EXIT_CONFIG, EXIT_ERROR, EXIT_NOT_FOUND, EXIT_SUCCESS, EXIT_USAGE,
};
use http::HttpSource;

/// Data directory used when nothing else is configured.
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser)]
#[command(name = "jobwallet")]
#[command(about = "Explore occupation datasets and keep a wallet of work activities")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Args, Clone, Default)]
pub struct GlobalArgs {
    /// Directory holding the dataset JSON files
    #[arg(long, global = true, value_name = "DIR", conflicts_with = "url")]
    data: Option<PathBuf>,

    /// Base URL serving the dataset JSON files
    #[arg(long, global = true, value_name = "URL")]
    url: Option<String>,

    /// TOML data config ([source] dir/url, [files] overrides)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Wallet store file (default: platform data dir)
    #[arg(long, global = true, value_name = "FILE", env = "JOBWALLET_STORE")]
    store: Option<PathBuf>,

    /// Settings file (default: platform config dir)
    #[arg(long, global = true, value_name = "FILE", env = "JOBWALLET_SETTINGS")]
    settings: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List occupation categories with title and profile counts
    #[command(after_help = "\
Examples:
  jobwallet categories
  jobwallet categories --sort count
  jobwallet categories --data ./data --json")]
    Categories {
        /// Ordering (default from settings: name)
        #[arg(long)]
        sort: Option<SortBy>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the occupations in one category with mean wages
    #[command(after_help = "\
Examples:
  jobwallet occupations Healthcare
  jobwallet occupations 'Food Preparation & Serving' --filter cook
  jobwallet occupations Healthcare --csv > healthcare.csv")]
    Occupations {
        /// Category name (case-insensitive)
        category: String,

        /// Case-insensitive substring filter on the title
        #[arg(long, short = 'f')]
        filter: Option<String>,

        /// Output as CSV
        #[arg(long, conflicts_with = "json")]
        csv: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the full profile of one occupation
    #[command(after_help = "\
Any spelling of the title works:
  jobwallet show 'Cooks, Short Order'
  jobwallet show 'cooks short order' --json")]
    Show {
        /// Occupation title, any spelling
        title: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the requirement tree (DWAs, skills, tech skills) of one occupation
    Tree {
        /// Occupation title, any spelling
        title: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List detailed work activities with occupation counts
    Dwas {
        /// Case-insensitive substring filter
        #[arg(long, short = 'f')]
        filter: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every canonical occupation title
    Titles {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize the loaded snapshot
    Info {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse ID credential cards (ids.json next to the datasets)
    #[command(after_help = "\
Examples:
  jobwallet ids
  jobwallet ids show stu-001
  jobwallet ids list --json")]
    Ids {
        #[command(subcommand)]
        command: Option<ids::IdsCommands>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the wallet of imported work activities
    Wallet {
        #[command(subcommand)]
        command: wallet::WalletCommands,
    },

    /// Write the reconciled bundle as JSON
    #[command(after_help = "\
Examples:
  jobwallet export > bundle.json
  jobwallet export -o bundle.json --url https://data.example.org/onet")]
    Export {
        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortBy {
    Name,
    Count,
}

impl From<SortBy> for CategorySort {
    fn from(s: SortBy) -> Self {
        match s {
            SortBy::Name => CategorySort::Name,
            SortBy::Count => CategorySort::Count,
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("JOBWALLET_COMMIT"), ")",
        "\nengine:  jobwallet-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("JOBWALLET_TARGET"),
    )
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    // try_init also installs the log -> tracing bridge
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let ctx = Context::new(cli.global);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: jobwallet <command> [options]");
            eprintln!("       jobwallet --help for more information");
            Ok(())
        }
        Some(Commands::Categories { sort, json }) => cmd_categories(&ctx, sort, json),
        Some(Commands::Occupations { category, filter, csv, json }) => {
            cmd_occupations(&ctx, &category, filter.as_deref(), csv, json)
        }
        Some(Commands::Show { title, json }) => cmd_show(&ctx, &title, json),
        Some(Commands::Tree { title, json }) => cmd_tree(&ctx, &title, json),
        Some(Commands::Dwas { filter, json }) => cmd_dwas(&ctx, filter.as_deref(), json),
        Some(Commands::Titles { json }) => cmd_titles(&ctx, json),
        Some(Commands::Info { json }) => cmd_info(&ctx, json),
        Some(Commands::Ids { command, json }) => ids::cmd_ids(&ctx, command, json),
        Some(Commands::Wallet { command }) => wallet::cmd_wallet(&ctx, command),
        Some(Commands::Export { output }) => cmd_export(&ctx, output),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self { code: EXIT_NOT_FOUND, message: msg.into(), hint: None }
    }

    /// Create error from an engine error with the matching exit code.
    pub fn recon(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::DatasetFetch { .. } => {
                Some("point --data at the dataset directory or --url at the dataset host".to_string())
            }
            ReconError::DatasetParse { .. } => {
                Some("every dataset file must be a single JSON document".to_string())
            }
            ReconError::DocumentFetch { .. } => {
                Some("ID cards are read from ids.json next to the datasets ([files] ids renames it)".to_string())
            }
            ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => {
                Some("[source] needs exactly one of dir = \"...\" or url = \"https://...\"".to_string())
            }
            _ => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Context: settings + data source resolution
// ============================================================================

pub struct Context {
    args: GlobalArgs,
    settings: Settings,
}

impl Context {
    fn new(args: GlobalArgs) -> Self {
        let settings = match &args.settings {
            Some(path) => Settings::load_from(path),
            None => Settings::load(),
        };
        Self { args, settings }
    }

    /// Resolution order: --data / --url, then --config, then settings,
    /// then ./data.
    pub fn data_config(&self) -> Result<DataConfig, CliError> {
        let config = if let Some(dir) = &self.args.data {
            DataConfig::for_dir(dir)
        } else if let Some(url) = &self.args.url {
            DataConfig::for_url(url)
        } else if let Some(path) = &self.args.config {
            read_data_config(path)?
        } else if let Some(path) = &self.settings.data_config {
            read_data_config(path)?
        } else if let Some(dir) = &self.settings.data_dir {
            DataConfig::for_dir(dir)
        } else if let Some(url) = &self.settings.data_url {
            DataConfig::for_url(url)
        } else {
            DataConfig::for_dir(DEFAULT_DATA_DIR)
        };

        config.validate().map_err(CliError::recon)?;
        Ok(config)
    }

    /// Fetch every dataset and reconcile.
    pub fn load(&self) -> Result<Bundle, CliError> {
        let config = self.data_config()?;
        let source = open_source(&config)?;
        load_from(&*source).map_err(CliError::recon)
    }

    /// Fetch the ID card document from the same source as the datasets.
    pub fn load_ids(&self) -> Result<Vec<IdCard>, CliError> {
        let config = self.data_config()?;
        let source = open_source(&config)?;
        load_ids(&*source, config.files.ids_name()).map_err(CliError::recon)
    }

    pub fn store_path(&self) -> PathBuf {
        self.args
            .store
            .clone()
            .unwrap_or_else(|| self.settings.effective_store_path())
    }
}

fn open_source(config: &DataConfig) -> Result<Box<dyn DatasetSource>, CliError> {
    match (&config.source.dir, &config.source.url) {
        (Some(dir), _) => Ok(Box::new(DirSource::new(dir, config.files.clone()))),
        (None, Some(url)) => {
            let source = HttpSource::new(
                url,
                config.files.clone(),
                Duration::from_secs(config.timeout_secs),
            )
            .map_err(CliError::recon)?;
            Ok(Box::new(source))
        }
        (None, None) => Err(CliError::config("no data source configured")),
    }
}

/// Read a TOML data config. A relative `source.dir` is taken relative to
/// the config file.
fn read_data_config(path: &Path) -> Result<DataConfig, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::config(format!("{}: {e}", path.display())))?;
    let mut config = DataConfig::from_toml(&text).map_err(|e| {
        let mut err = CliError::recon(e);
        err.message = format!("{}: {}", path.display(), err.message);
        err
    })?;

    if let (Some(dir), Some(base)) = (&config.source.dir, path.parent()) {
        if dir.is_relative() {
            config.source.dir = Some(base.join(dir));
        }
    }
    Ok(config)
}

// ============================================================================
// Output helpers
// ============================================================================

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError::io(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

fn write_lines<I, S>(lines: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for line in lines {
        writeln!(handle, "{}", line.as_ref()).map_err(|e| CliError::io(e.to_string()))?;
    }
    Ok(())
}

fn section(out: &mut Vec<String>, heading: &str, items: &[String]) {
    out.push(String::new());
    out.push(format!("{} ({})", heading, items.len()));
    if items.is_empty() {
        out.push("  (none)".to_string());
    }
    out.extend(items.iter().map(|i| format!("  - {}", i)));
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

// ============================================================================
// categories
// ============================================================================

fn sort_categories(cats: &mut [CategorySummary], sort: CategorySort) {
    match sort {
        CategorySort::Name => cats.sort_by(|a, b| a.name.cmp(&b.name)),
        CategorySort::Count => {
            cats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)))
        }
    }
}

fn cmd_categories(ctx: &Context, sort: Option<SortBy>, json: bool) -> Result<(), CliError> {
    let bundle = ctx.load()?;
    let mut cats = category_summaries(&bundle);
    let sort = sort.map(CategorySort::from).unwrap_or(ctx.settings.category_sort);
    sort_categories(&mut cats, sort);

    if json {
        return print_json(&cats);
    }

    let width = cats.iter().map(|c| c.name.len()).max().unwrap_or(0);
    write_lines(cats.iter().map(|c| {
        format!("{:<width$}  {:>5} titles  {:>5} with profile", c.name, c.count, c.known)
    }))
}

// ============================================================================
// occupations
// ============================================================================

/// Exact category name first, then a case-insensitive match.
fn find_category<'a>(bundle: &'a Bundle, name: &str) -> Option<&'a str> {
    let names: Vec<&str> = bundle.category_index.names().collect();
    names
        .iter()
        .copied()
        .find(|n| *n == name)
        .or_else(|| names.iter().copied().find(|n| n.eq_ignore_ascii_case(name.trim())))
}

fn cmd_occupations(
    ctx: &Context,
    category: &str,
    filter: Option<&str>,
    csv: bool,
    json: bool,
) -> Result<(), CliError> {
    let bundle = ctx.load()?;
    let name = find_category(&bundle, category).ok_or_else(|| {
        CliError::not_found(format!("unknown category '{}'", category))
            .with_hint("jobwallet categories lists every category")
    })?;
    let listing = occupations_in(&bundle, name, filter);

    if json {
        return print_json(&listing);
    }

    if csv {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for row in &listing.rows {
            wtr.serialize(row).map_err(|e| CliError::io(e.to_string()))?;
        }
        return wtr.flush().map_err(|e| CliError::io(e.to_string()));
    }

    let width = listing.rows.iter().map(|r| r.title.len()).max().unwrap_or(0);
    let mut lines = vec![format!("{} ({} of {})", listing.category, listing.shown, listing.total)];
    lines.extend(listing.rows.iter().map(|r| {
        let marker = if r.has_profile { ' ' } else { '*' };
        format!(
            "{}{:<width$}  {:>14}  {:>9}",
            marker,
            r.title,
            or_dash(&r.annual_mean),
            or_dash(&r.hourly_mean),
        )
    }));
    if listing.rows.iter().any(|r| !r.has_profile) {
        lines.push("* no profile data".to_string());
    }
    write_lines(lines)
}

// ============================================================================
// show / tree
// ============================================================================

fn resolve_title<'a>(bundle: &'a Bundle, title: &str) -> Result<&'a jobwallet_recon::Occupation, CliError> {
    bundle.resolve(title).ok_or_else(|| {
        CliError::not_found(format!("no occupation matches '{}'", title))
            .with_hint("jobwallet titles lists every occupation")
    })
}

fn render_profile(p: &OccupationProfile) -> Vec<String> {
    let mut out = vec![p.title.clone()];
    if !p.categories.is_empty() {
        out.push(format!("  Categories:  {}", p.categories.join(", ")));
    }
    out.push(format!(
        "  Annual mean: {}   Hourly mean: {}   ({} wage records)",
        or_dash(&p.annual_mean),
        or_dash(&p.hourly_mean),
        p.wage_records,
    ));
    out.push(String::new());
    out.push(p.description.clone());
    section(&mut out, "Skills", &p.skills);
    section(&mut out, "Tasks", &p.tasks);
    section(&mut out, "Technology skills", &p.tech_skills);
    section(&mut out, "Detailed work activities", &p.dwas);
    out
}

fn cmd_show(ctx: &Context, title: &str, json: bool) -> Result<(), CliError> {
    let bundle = ctx.load()?;
    let p = profile(resolve_title(&bundle, title)?);
    if json {
        return print_json(&p);
    }
    write_lines(render_profile(&p))
}

fn render_tree(tree: &RequirementTree) -> Vec<String> {
    let branches = [
        ("Detailed work activities", &tree.dwas),
        ("Skills", &tree.skills),
        ("Technology skills", &tree.tech_skills),
    ];
    let mut out = vec![format!("{} ({} requirements)", tree.title, tree.len())];
    for (i, (label, items)) in branches.iter().enumerate() {
        let last = i + 1 == branches.len();
        let (branch, indent) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };
        out.push(format!("{}{} ({})", branch, label, items.len()));
        for (j, item) in items.iter().enumerate() {
            let leaf = if j + 1 == items.len() { "└── " } else { "├── " };
            out.push(format!("{}{}{}", indent, leaf, item));
        }
    }
    out
}

fn cmd_tree(ctx: &Context, title: &str, json: bool) -> Result<(), CliError> {
    let bundle = ctx.load()?;
    let tree = requirement_tree(resolve_title(&bundle, title)?);
    if json {
        return print_json(&tree);
    }
    write_lines(render_tree(&tree))
}

// ============================================================================
// dwas / titles / info
// ============================================================================

fn cmd_dwas(ctx: &Context, filter: Option<&str>, json: bool) -> Result<(), CliError> {
    let bundle = ctx.load()?;
    let dwas = dwa_summaries(&bundle, filter);
    if json {
        return print_json(&dwas);
    }
    write_lines(dwas.iter().map(|d| format!("{:>5}  {}", d.occupations, d.dwa)))
}

fn cmd_titles(ctx: &Context, json: bool) -> Result<(), CliError> {
    let bundle = ctx.load()?;
    if json {
        return print_json(&bundle.titles);
    }
    write_lines(&bundle.titles)
}

#[derive(Serialize)]
struct InfoOutput<'a> {
    #[serde(flatten)]
    meta: &'a jobwallet_recon::model::BundleMeta,
    occupations: usize,
    with_profile: usize,
    dwas: usize,
    categories: usize,
}

fn cmd_info(ctx: &Context, json: bool) -> Result<(), CliError> {
    let bundle = ctx.load()?;
    let info = InfoOutput {
        meta: &bundle.meta,
        occupations: bundle.len(),
        with_profile: bundle.occupations.values().filter(|o| o.has_profile).count(),
        dwas: bundle.dwas.len(),
        categories: bundle.category_index.len(),
    };
    if json {
        return print_json(&info);
    }

    let mut lines = vec![
        format!("engine:       jobwallet-recon {}", info.meta.engine_version),
        format!("loaded at:    {}", info.meta.loaded_at),
        format!("raw titles:   {}", info.meta.raw_titles),
        format!("occupations:  {} ({} with profile)", info.occupations, info.with_profile),
        format!("dwas:         {}", info.dwas),
        format!("categories:   {}", info.categories),
        "datasets:".to_string(),
    ];
    lines.extend(
        info.meta
            .dataset_entries
            .iter()
            .map(|(kind, n)| format!("  {:<14}{}", kind.as_str(), n)),
    );
    write_lines(lines)
}

// ============================================================================
// export
// ============================================================================

fn cmd_export(ctx: &Context, output: Option<PathBuf>) -> Result<(), CliError> {
    let bundle = ctx.load()?;
    let json = serde_json::to_string_pretty(&bundle).map_err(|e| CliError::io(e.to_string()))?;

    match output {
        Some(path) if path.as_os_str() != "-" => {
            std::fs::write(&path, json + "\n")
                .map_err(|e| CliError::io(format!("{}: {e}", path.display())))?;
            log::info!("wrote {} occupations to {}", bundle.len(), path.display());
            Ok(())
        }
        _ => {
            println!("{}", json);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, count: usize) -> CategorySummary {
        CategorySummary { name: name.into(), count, known: 0 }
    }

    #[test]
    fn count_sort_breaks_ties_by_name() {
        let mut cats = vec![summary("b", 1), summary("c", 3), summary("a", 1)];
        sort_categories(&mut cats, CategorySort::Count);
        let names: Vec<_> = cats.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn flags_win_over_settings() {
        let ctx = Context {
            args: GlobalArgs { url: Some("https://data.example.org".into()), ..Default::default() },
            settings: Settings { data_dir: Some("/srv/onet".into()), ..Settings::default() },
        };
        let config = ctx.data_config().unwrap();
        assert_eq!(config.source.url.as_deref(), Some("https://data.example.org"));
        assert!(config.source.dir.is_none());
    }

    #[test]
    fn falls_back_to_local_data_dir() {
        let ctx = Context { args: GlobalArgs::default(), settings: Settings::default() };
        let config = ctx.data_config().unwrap();
        assert_eq!(config.source.dir, Some(PathBuf::from(DEFAULT_DATA_DIR)));
    }

    #[test]
    fn config_dir_is_relative_to_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.toml");
        std::fs::write(&path, "[source]\ndir = \"snapshot\"\n").unwrap();
        let config = read_data_config(&path).unwrap();
        assert_eq!(config.source.dir, Some(dir.path().join("snapshot")));
    }

    #[test]
    fn invalid_config_maps_to_config_exit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.toml");
        std::fs::write(&path, "[source]\nurl = \"ftp://nope\"\n").unwrap();
        let err = read_data_config(&path).unwrap_err();
        assert_eq!(err.code, EXIT_CONFIG);
    }

    #[test]
    fn tree_draws_three_branches() {
        let tree = RequirementTree {
            title: "Nurse".into(),
            dwas: vec!["Assess patients".into()],
            skills: vec![],
            tech_skills: vec!["Epic".into(), "Excel".into()],
        };
        assert_eq!(
            render_tree(&tree),
            vec![
                "Nurse (3 requirements)",
                "├── Detailed work activities (1)",
                "│   └── Assess patients",
                "├── Skills (0)",
                "└── Technology skills (2)",
                "    ├── Epic",
                "    └── Excel",
            ]
        );
    }
}
