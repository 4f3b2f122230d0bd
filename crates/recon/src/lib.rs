//! `jobwallet-recon`: occupation dataset reconciliation and indexing.
//!
//! Pure engine crate: receives parsed datasets, returns an immutable bundle
//! of reconciled occupations and indices. The only IO is the local
//! directory [`source::DirSource`]; network sources live with the caller.

pub mod canonical;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod flex;
pub mod ids;
pub mod index;
pub mod model;
pub mod normalize;
pub mod source;
pub mod views;
pub mod wages;
pub mod wallet;

pub use config::DataConfig;
pub use dataset::{DatasetKind, Datasets};
pub use engine::load;
pub use error::ReconError;
pub use ids::{parse_ids, IdCard};
pub use model::{Bundle, Occupation};
pub use normalize::normalize_title;
pub use source::{fetch_all, load_from, load_ids, DatasetSource, DirSource};
pub use wages::pick_summary;
pub use wallet::{ImportOutcome, KeyValueStore, Wallet};
