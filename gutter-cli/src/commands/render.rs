use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Args;
use serde::Serialize;

use gutter_core::format::Theme;
use gutter_core::host::{CollectingSink, MemorySource, RenderedIcon};
use gutter_core::merge::MergePolicy;
use gutter_core::pipeline::{GutterPipeline, PassResult};
use gutter_core::render::renderer_by_name;
use gutter_core::render::text::render_text;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Findings JSON: a list of findings, or {"passes": [[...], ...]}
    pub findings: PathBuf,

    /// Config file (default: ./gutter.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the configured merge policy
    #[arg(long)]
    pub policy: Option<MergePolicy>,

    /// Override the configured theme
    #[arg(long)]
    pub theme: Option<Theme>,

    /// Output format: text, svg, json
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Write one file per icon into this directory instead of stdout
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Exit non-zero when any finding or icon was dropped
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
struct RenderReport {
    generated_at: String,
    policy: MergePolicy,
    passes: Vec<PassReport>,
}

#[derive(Debug, Serialize)]
struct PassReport {
    pass: usize,
    findings: usize,
    suppressed: usize,
    rejected: usize,
    icons: Vec<RenderedIcon>,
    errors: Vec<String>,
}

pub fn run(args: &RenderArgs) -> anyhow::Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(policy) = args.policy {
        config.merge.policy = policy;
    }
    if let Some(theme) = args.theme {
        config.badge.theme = theme;
    }

    let renderer = renderer_by_name(&args.format).context("Cannot render icons")?;
    let mut source = MemorySource::from_json_file(&args.findings)
        .with_context(|| format!("Cannot read findings: {}", args.findings.display()))?;

    let pipeline = GutterPipeline::from_config(&config);
    let mut passes = Vec::new();
    let mut sink = CollectingSink::new();
    while let Some(result) = pipeline.run_pass(&mut source, &mut sink) {
        let icons = sink.icons().to_vec();
        passes.push((result, icons));
    }

    let error_count: usize = passes.iter().map(|(r, _)| r.errors.len()).sum();
    for (n, (result, _)) in passes.iter().enumerate() {
        report_errors(n + 1, result);
    }

    if let Some(ref dir) = args.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create output directory: {}", dir.display()))?;
        let mut written = 0usize;
        for (n, (_, icons)) in passes.iter().enumerate() {
            for rendered in icons {
                let content = renderer
                    .render(&rendered.icon)
                    .context("Cannot render icons")?;
                let file = dir.join(format!(
                    "pass{}-line{}-element{}.{}",
                    n + 1,
                    rendered.line,
                    rendered.anchor,
                    renderer.extension()
                ));
                std::fs::write(&file, content)
                    .with_context(|| format!("Cannot write rendered icon: {}", file.display()))?;
                written += 1;
            }
        }
        println!("Wrote {written} icons to {}", dir.display());
    } else if args.format == "json" {
        let report = RenderReport {
            generated_at: Utc::now().to_rfc3339(),
            policy: config.merge.policy,
            passes: passes
                .iter()
                .enumerate()
                .map(|(n, (result, icons))| PassReport {
                    pass: n + 1,
                    findings: result.findings,
                    suppressed: result.suppressed,
                    rejected: result.rejected,
                    icons: icons.clone(),
                    errors: result.errors.iter().map(|e| e.error.to_string()).collect(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (n, (result, icons)) in passes.iter().enumerate() {
            if passes.len() > 1 {
                println!("Pass {}", n + 1);
            }
            for rendered in icons {
                if args.format == "text" {
                    println!(
                        "  line {:>4}  element {:<6} {:<24} {}",
                        rendered.line,
                        rendered.anchor,
                        render_text(&rendered.icon),
                        rendered.annotations.tooltip.replace('\n', " | ")
                    );
                } else {
                    println!(
                        "<!-- line {}, element {} -->",
                        rendered.line, rendered.anchor
                    );
                    print!(
                        "{}",
                        renderer
                            .render(&rendered.icon)
                            .context("Cannot render icons")?
                    );
                }
            }
            if args.format == "text" {
                println!(
                    "  {} icons from {} findings in {:.2?}",
                    result.icons_emitted, result.findings, result.duration
                );
            }
        }
    }

    if args.strict && error_count > 0 {
        anyhow::bail!(
            "partial success: {error_count} errors across {} passes",
            passes.len()
        );
    }
    Ok(())
}

fn report_errors(pass: usize, result: &PassResult) {
    for err in &result.errors {
        match err.element {
            Some(element) => eprintln!(
                "warning: pass {pass} [{}] element {element}: {}",
                err.stage, err.error
            ),
            None => eprintln!("warning: pass {pass} [{}]: {}", err.stage, err.error),
        }
    }
}
