use clap::Args;

use gutter_core::format::{Severity, Theme};

#[derive(Args, Debug)]
pub struct BandsArgs {
    /// Badge theme: light or dark
    #[arg(long, default_value = "light")]
    pub theme: Theme,
}

#[allow(clippy::unnecessary_wraps)]
pub fn run(args: &BandsArgs) -> anyhow::Result<()> {
    println!("  {:<14} {:<14} background", "band", "scores");
    for severity in Severity::ALL {
        let range = match severity.upper_bound() {
            Some(upper) => format!("{}..{upper}", severity.lower_bound()),
            None => format!("{}..", severity.lower_bound()),
        };
        println!(
            "  {:<14} {range:<14} {}",
            severity.as_str(),
            severity.background().resolve(args.theme)
        );
    }
    Ok(())
}
