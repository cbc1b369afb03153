use lockbox_core::{VaultIndex, VaultRecord, VaultStore};

use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::errors::CliError;
use crate::ui::{header, hint, print, simple_table, Column};

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json);
    let store = ctx.open_store()?;

    let subscription = store.subscribe().map_err(CliError::from)?;
    let index = VaultIndex::from_snapshot(subscription.current().to_vec());
    subscription.unsubscribe();

    let records: Vec<&VaultRecord> = match args.tag.as_deref() {
        Some(term) => index.filter(term),
        None => index.records().iter().collect(),
    };

    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        if !ctx.quiet() {
            print(&ui_ctx, "No records found.");
            if args.tag.is_some() {
                let text = "Run `lockbox list` without --tag to see every record.";
                print(&ui_ctx, &hint(&ui_ctx, text));
            } else {
                print(&ui_ctx, &hint(&ui_ctx, "lockbox save --text \"...\" --tag <you>"));
            }
        }
        return Ok(());
    }

    if !ctx.quiet() && ui_ctx.mode.is_pretty() {
        let context = args.tag.as_deref().map(|term| format!("tag {}", term.trim()));
        print(&ui_ctx, &header(&ui_ctx, "list", context.as_deref()));
    }

    let columns = [
        Column::new("ID"),
        Column::new("TYPE"),
        Column::new("TAG"),
        Column::new("SAVED"),
    ];
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            let tag = if record.tag().is_empty() { "-" } else { record.tag() };
            vec![
                record.id.to_string(),
                record.kind.to_string(),
                tag.to_string(),
                record.timestamp_label(),
            ]
        })
        .collect();
    print(&ui_ctx, &simple_table(&ui_ctx, &columns, &rows));
    Ok(())
}
