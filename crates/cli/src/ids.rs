//! `jobwallet ids`: ID credential cards from the data source's `ids.json`.
//!
//! Read-only; the card list is fetched fresh on every invocation and never
//! touches the occupation datasets.

use clap::Subcommand;

use jobwallet_recon::ids::{find_card, IdDetail, IdSummary};

use crate::{or_dash, print_json, write_lines, CliError, Context};

#[derive(Subcommand)]
pub enum IdsCommands {
    /// List every card (the default)
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one card's details
    Show {
        /// Card id (`id_id` in ids.json)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn cmd_ids(ctx: &Context, cmd: Option<IdsCommands>, json: bool) -> Result<(), CliError> {
    let cards = ctx.load_ids()?;

    match cmd.unwrap_or(IdsCommands::List { json }) {
        IdsCommands::List { json: list_json } => {
            let summaries: Vec<IdSummary> = cards.iter().map(|c| c.summary()).collect();
            if json || list_json {
                return print_json(&summaries);
            }
            if summaries.is_empty() {
                eprintln!("no ID cards");
                return Ok(());
            }
            write_lines(render_list(&summaries))
        }
        IdsCommands::Show { id, json: show_json } => {
            let card = find_card(&cards, id.trim()).ok_or_else(|| {
                CliError::not_found(format!("no ID card '{}'", id.trim()))
                    .with_hint("jobwallet ids lists every card")
            })?;
            let detail = card.detail();
            if json || show_json {
                return print_json(&detail);
            }
            write_lines(render_detail(&detail))
        }
    }
}

fn render_list(cards: &[IdSummary]) -> Vec<String> {
    let id_width = cards.iter().map(|c| c.id.len()).max().unwrap_or(0);
    let status_width = cards.iter().map(|c| c.status.len()).max().unwrap_or(0);
    cards
        .iter()
        .map(|c| {
            let line = format!(
                "{:<id_width$}  {:<status_width$}  {:<8}  {}",
                or_dash(&c.id),
                c.status,
                c.kind.as_str(),
                c.name,
            );
            if c.subtitle.is_empty() {
                line
            } else {
                format!("{line} ({})", c.subtitle)
            }
        })
        .collect()
}

fn render_detail(d: &IdDetail) -> Vec<String> {
    let mut out = vec![d.title.to_uppercase()];
    if !d.subtitle.is_empty() {
        out.push(format!("  {}", d.subtitle));
    }
    out.push(format!("  {}", if d.active { "ACTIVE ID" } else { d.status.as_str() }));
    out.push(String::new());

    let mut rows: Vec<(String, &str)> = vec![
        ("Issued To".into(), d.holder.as_str()),
        ("Card Type".into(), d.card_type.as_str()),
        ("Campus".into(), d.campus.as_str()),
        ("Issued On".into(), d.issued_on.as_str()),
        ("Issued By".into(), d.issued_by.as_str()),
    ];
    rows.extend(d.details.iter().map(|r| (r.label.clone(), r.value.as_str())));

    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    out.extend(
        rows.iter()
            .map(|(label, value)| format!("  {:<width$}  {}", label, or_dash(value))),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobwallet_recon::parse_ids;
    use serde_json::json;

    #[test]
    fn detail_lists_fixed_rows_then_extras() {
        let cards = parse_ids(&json!({"ids": [{
            "id_id": "b-9",
            "id_name": "Badge",
            "status": "Suspended",
            "details": {"access_level": 3}
        }]}));
        let lines = render_detail(&cards[0].detail());
        assert_eq!(lines[0], "BADGE");
        assert_eq!(lines[1], "  Suspended");
        assert!(lines.iter().any(|l| l.trim_start().starts_with("Issued To") && l.ends_with("-")));
        assert_eq!(lines.last().unwrap().split_whitespace().collect::<Vec<_>>(), ["Access", "Level", "3"]);
    }

    #[test]
    fn list_line_shows_subtitle() {
        let cards = parse_ids(&json!({"ids": [
            {"id_id": "p1", "card_type": "Passport", "status": "active", "issuer": {"jurisdiction": "US"}}
        ]}));
        let summaries: Vec<_> = cards.iter().map(|c| c.summary()).collect();
        let lines = render_list(&summaries);
        assert_eq!(lines, vec!["p1  ACTIVE  passport  Passport (US)"]);
    }
}
