//! CLI implementation for `xuino list` command

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::cli::commands::load_session;
use crate::cli::output::OutputConfig;
use crate::core::board::Boards;

#[derive(Serialize)]
struct BoardEntry<'a> {
    id: &'a str,
    name: &'a str,
}

/// Execute the list command
pub async fn execute(current_dir: &Path, output: &OutputConfig) -> Result<()> {
    let session = load_session(current_dir)?;
    let boards = session.boards()?;

    if output.json {
        let entries: Vec<_> = boards
            .sorted()
            .into_iter()
            .map(|board| BoardEntry {
                id: &board.id,
                name: board.name(),
            })
            .collect();
        return output.print_json(&entries);
    }

    print!("{}", format_board_list(&boards));
    Ok(())
}

/// One board per line, `short name` then `'Display Name'`
pub fn format_board_list(boards: &Boards) -> String {
    boards
        .sorted()
        .into_iter()
        .map(|board| {
            let spacer = if board.id.len() < 8 { "\t\t" } else { "\t" };
            format!("{}{spacer}'{}'\n", board.id, board.name())
        })
        .collect()
}
