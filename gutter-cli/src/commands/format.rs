use clap::Args;
use serde_json::json;

use gutter_core::format::{ScoreFormatter, Theme};

#[derive(Args, Debug)]
pub struct FormatArgs {
    /// Complexity score to format
    #[arg(allow_hyphen_values = true)]
    pub score: i64,

    /// Complexity kind, e.g. Cyclomatic (prefixes the label)
    #[arg(long)]
    pub kind: Option<String>,

    /// Badge theme: light or dark
    #[arg(long, default_value = "light")]
    pub theme: Theme,

    /// Emit JSON instead of aligned text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &FormatArgs) -> anyhow::Result<()> {
    let formatted = ScoreFormatter::new(args.theme).format(args.score, args.kind.as_deref())?;

    if args.json {
        let value = json!({
            "score": args.score,
            "label": formatted.label,
            "severity": formatted.severity,
            "rank": formatted.severity.rank(),
            "foreground": formatted.foreground.hex(),
            "background": formatted.background.hex(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("label:      {}", formatted.label);
        println!("severity:   {}", formatted.severity);
        println!("foreground: {}", formatted.foreground);
        println!("background: {}", formatted.background);
    }
    Ok(())
}
