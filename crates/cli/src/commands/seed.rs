use vitrina_store::{SeedDataset, SeedResult};

use crate::commands::{with_catalog, CommandResult};

pub fn run() -> CommandResult {
    let result =
        with_catalog("seed", |catalog| async move { SeedDataset::load(&catalog).await });

    match result {
        Ok(outcome) => CommandResult::success("seed", render_summary(&outcome)),
        Err(failure) => failure,
    }
}

fn render_summary(outcome: &SeedResult) -> String {
    let mut lines = vec![format!(
        "demo catalog seeded: {} created, {} already present, {} products in catalog",
        outcome.created.len(),
        outcome.skipped.len(),
        outcome.catalog_size
    )];
    lines.extend(outcome.created.iter().map(|code| format!("  - created: {code}")));
    lines.extend(outcome.skipped.iter().map(|code| format!("  - skipped: {code}")));
    lines.join("\n")
}
