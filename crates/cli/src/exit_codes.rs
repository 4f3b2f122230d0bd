//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 1    | General error (unspecified)                      |
//! | 2    | Usage error (bad args, unknown subcommand)       |
//! | 3    | A dataset or the ID list could not be fetched    |
//! | 4    | A dataset or the ID list is not valid JSON       |
//! | 5    | Data config or settings invalid                  |
//! | 6    | Wallet store could not be written                |
//! | 7    | Requested occupation, category or ID not found   |

use jobwallet_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// A dataset fetch failed (missing file, network error, non-2xx status).
pub const EXIT_DATASET_FETCH: u8 = 3;

/// A dataset was fetched but is not valid JSON.
pub const EXIT_DATASET_PARSE: u8 = 4;

/// Data config TOML unreadable, unparseable, or invalid.
pub const EXIT_CONFIG: u8 = 5;

/// Wallet store write failed.
pub const EXIT_STORE: u8 = 6;

/// Lookup miss for a title, category or ID card the user named.
pub const EXIT_NOT_FOUND: u8 = 7;

/// Map a ReconError to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::DatasetFetch { .. } | ReconError::DocumentFetch { .. } => EXIT_DATASET_FETCH,
        ReconError::DatasetParse { .. } | ReconError::DocumentParse { .. } => EXIT_DATASET_PARSE,
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
        ReconError::Store(_) => EXIT_STORE,
        ReconError::Io(_) => EXIT_ERROR,
    }
}
