use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use converter_board_lib::commands;
use converter_board_lib::shared::settings::AppSettings;
use converter_board_lib::shared::types::{
    ConvertCurrencyRequest, ConvertTimeRequest, ConvertUnitsRequest, WidgetDisplay,
};
use converter_board_lib::AppState;

#[derive(Parser, Debug)]
#[command(name = "converter-board")]
#[command(about = "Time zone, currency and unit converters on a rearrangeable board")]
#[command(version)]
struct Cli {
    /// Print responses as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Settings file path (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List unit categories and their units
    Units { category: Option<String> },

    /// Convert an amount between two units of one category
    Unit {
        category: String,
        from: String,
        to: String,
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },

    /// List currency codes from the rate endpoint
    Currencies,

    /// Convert an amount between two currencies at the live rate
    Currency { from: String, to: String, amount: String },

    /// List supported time zones
    Zones { filter: Option<String> },

    /// Show the time in two zones
    Time {
        #[arg(long)]
        left: Option<String>,
        #[arg(long)]
        right: Option<String>,
        /// YYYY-MM-DDTHH:MM, RFC 3339 or natural language, read in the host zone
        #[arg(long)]
        at: Option<String>,
        #[arg(long)]
        swap: bool,
    },

    /// Show or toggle the theme
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },

    /// Show the widget order, optionally after drag-and-drop swaps
    Board {
        #[arg(long = "swap", num_args = 2, value_names = ["ACTIVE", "OVER"])]
        swaps: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeAction {
    Show,
    Toggle,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "converter_board=info,converter_board_lib=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = AppSettings::load(cli.config.as_deref()).await;
    let mut state = AppState::init(settings).await?;

    match cli.command {
        Command::Units { category } => {
            let response = commands::get_units(category.as_deref())?;
            emit(cli.json, &response, || {
                response
                    .units
                    .iter()
                    .map(|u| format!("{:<12} {:<12} {}", u.category, u.id, u.label))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        Command::Unit { category, from, to, amount } => {
            if cli.json {
                let response = commands::convert_units(ConvertUnitsRequest {
                    category,
                    amount,
                    from_unit: from,
                    to_unit: to,
                })?;
                emit(true, &response, String::new)?;
            } else {
                let display = commands::unit_display(&state, &category, &from, &to, amount)?;
                show(&display, |value| format!("{} {}", value, to));
            }
        }
        Command::Currencies => {
            if cli.json {
                let response = commands::list_currencies(&state).await?;
                emit(true, &response, String::new)?;
            } else {
                let widget = commands::currency_options(&state).await;
                if widget.display().is_error() {
                    show(widget.display(), str::to_string);
                } else {
                    println!("{}", widget.codes().join(" "));
                }
            }
        }
        Command::Currency { from, to, amount } => {
            if cli.json {
                let response = commands::convert_currency(&state, ConvertCurrencyRequest { amount, from, to }).await?;
                emit(true, &response, String::new)?;
            } else {
                let display = commands::currency_display(&state, &from, &to, &amount).await?;
                show(&display, |value| format!("{} {}", value, to.to_ascii_uppercase()));
            }
        }
        Command::Zones { filter } => {
            let zones = commands::get_timezones(&state, filter.as_deref())?;
            emit(cli.json, &zones, || {
                zones
                    .iter()
                    .map(|z| format!("{:<32} {:<6} {}", z.iana_id, z.abbreviation, z.utc_offset))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        Command::Time { mut left, mut right, at, swap } => {
            if swap {
                std::mem::swap(&mut left, &mut right);
            }
            let response = commands::convert_time(
                &state,
                ConvertTimeRequest {
                    left_zone: left,
                    right_zone: right,
                    instant: at,
                },
            )?;
            emit(cli.json, &response, || {
                format!(
                    "{}: {} {}\n{}: {} {}\nDifference: {} hours",
                    response.left_zone,
                    response.left_time,
                    response.left_abbr,
                    response.right_zone,
                    response.right_time,
                    response.right_abbr,
                    response.difference_hours
                )
            })?;
        }
        Command::Theme { action } => {
            let response = match action {
                ThemeAction::Show => commands::get_theme(&state),
                ThemeAction::Toggle => commands::toggle_theme(&mut state).await?,
            };
            emit(cli.json, &response, || response.theme.clone())?;
        }
        Command::Board { swaps } => {
            let mut response = commands::get_board(&state);
            for pair in swaps.chunks(2) {
                if let [active, over] = pair {
                    response = commands::reorder_board(&mut state, active, Some(over.as_str()));
                }
            }
            emit(cli.json, &response, || {
                response
                    .order
                    .iter()
                    .zip(&response.titles)
                    .enumerate()
                    .map(|(i, (id, title))| format!("{}. {} ({})", i + 1, title, id))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
    }

    Ok(())
}

/// Print a widget display the way the board would render it. Errors go
/// to stderr; an empty display prints nothing.
fn show(display: &WidgetDisplay, value: impl FnOnce(&str) -> String) {
    match display {
        WidgetDisplay::Empty => {}
        WidgetDisplay::Value(v) => println!("{}", value(v)),
        WidgetDisplay::Error(msg) => eprintln!("{}", msg),
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}
