//! `jobwallet wallet`: the list of imported detailed work activities.
//!
//! The wallet lives in the key-value store file; each mutating command is
//! one read-modify-write. Only `list` loads datasets (for the counts).

use clap::Subcommand;

use jobwallet_config::FileStore;
use jobwallet_recon::wallet::{ImportOutcome, Wallet};

use crate::{print_json, write_lines, CliError, Context};

#[derive(Subcommand)]
pub enum WalletCommands {
    /// Show the wallet, most recent first, with occupation counts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a work activity to the front of the wallet
    #[command(after_help = "\
Examples:
  jobwallet wallet import 'Clean work areas'
  jobwallet dwas --filter clean   # find the exact text first")]
    Import {
        /// Work activity text, exactly as listed by `jobwallet dwas`
        dwa: String,
    },

    /// Remove a work activity from the wallet
    Remove {
        /// Work activity text
        dwa: String,
    },

    /// Empty the wallet
    Clear,
}

pub fn cmd_wallet(ctx: &Context, cmd: WalletCommands) -> Result<(), CliError> {
    let path = ctx.store_path();
    let mut store = FileStore::open(&path);
    let mut wallet = Wallet::load(&store);

    match cmd {
        WalletCommands::List { json } => {
            let bundle = ctx.load()?;
            let entries = wallet.entries(&bundle.dwa_index);
            if json {
                return print_json(&entries);
            }
            if entries.is_empty() {
                eprintln!("wallet is empty");
                return Ok(());
            }
            write_lines(entries.iter().map(|e| format!("{:>5}  {}", e.occupations, e.dwa)))
        }
        WalletCommands::Import { dwa } => {
            let dwa = dwa.trim();
            if dwa.is_empty() {
                return Err(CliError::args("work activity text is empty"));
            }
            match wallet.import(dwa) {
                ImportOutcome::Imported => {
                    wallet.save(&mut store).map_err(CliError::recon)?;
                    log::info!("wallet saved to {}", path.display());
                    println!("imported: {}", dwa);
                }
                ImportOutcome::AlreadyImported => println!("already in wallet: {}", dwa),
            }
            Ok(())
        }
        WalletCommands::Remove { dwa } => {
            if wallet.remove(dwa.trim()) == 0 {
                return Err(CliError::not_found(format!("'{}' is not in the wallet", dwa.trim()))
                    .with_hint("jobwallet wallet list shows the wallet"));
            }
            wallet.save(&mut store).map_err(CliError::recon)?;
            println!("removed: {}", dwa.trim());
            Ok(())
        }
        WalletCommands::Clear => {
            let n = wallet.len();
            wallet.clear();
            wallet.save(&mut store).map_err(CliError::recon)?;
            println!("cleared {} item(s)", n);
            Ok(())
        }
    }
}
