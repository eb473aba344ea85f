use std::fs;

use anyhow::{Context, Result};
use form_engine::Navigator;
use form_tree::FormTree;
use tracing::info;

use form_cli::outline::outline_rows;
use form_cli::script::{AnswerScript, FillOptions, FillReport, fill};

use crate::cli::{FillArgs, OutlineArgs};
use crate::summary::{print_fill_report, print_outline};

pub fn run_outline(args: &OutlineArgs) -> Result<()> {
    let tree = FormTree::load(&args.form)
        .with_context(|| format!("load form {}", args.form.display()))?;
    let nav = Navigator::new(tree);
    let screens = nav.outline().context("walk form")?;
    let rows = outline_rows(nav.model(), &screens);
    print_outline(nav.model().title(), &rows);
    Ok(())
}

pub fn run_fill(args: &FillArgs) -> Result<FillReport> {
    let tree = FormTree::load(&args.form)
        .with_context(|| format!("load form {}", args.form.display()))?;
    let script_text = fs::read_to_string(&args.answers)
        .with_context(|| format!("read answers {}", args.answers.display()))?;
    let script = AnswerScript::from_json(&script_text)
        .with_context(|| format!("parse answers {}", args.answers.display()))?;
    let options = FillOptions {
        evaluate_constraints: !args.skip_constraints,
        mark_completed: args.mark_completed,
    };

    let mut nav = Navigator::new(tree);
    let report = fill(&mut nav, &script, options).context("fill form")?;
    print_fill_report(&report);

    let payload = serde_json::to_string_pretty(&nav.model().payload()).context("encode payload")?;
    match &args.output {
        Some(path) => {
            fs::write(path, payload).with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "payload written");
        }
        None => println!("{payload}"),
    }
    Ok(report)
}
