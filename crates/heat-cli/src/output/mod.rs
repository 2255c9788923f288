use heat_core::entities::HeatWithAssignments;
use heat_core::responses::GeneratedSheet;
use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_key_values(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Print a heat sheet: one table row per assignment in table mode, the
/// heats as JSON otherwise.
pub fn output_sheet(heats: &[HeatWithAssignments], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_sheet(heats));
            Ok(())
        }
        _ => output(&heats, format),
    }
}

/// Print a freshly generated sheet, with seeding warnings on stderr.
pub fn output_generated(sheet: &GeneratedSheet, format: OutputFormat) -> anyhow::Result<()> {
    if format != OutputFormat::Table {
        return output(sheet, format);
    }

    let seed = sheet
        .rng_seed
        .map(|seed| format!(", seed {seed}"))
        .unwrap_or_default();
    println!(
        "{} {}: {} / {}{seed}",
        sheet.event_id, sheet.round, sheet.series_method, sheet.lane_method
    );
    println!("{}", render_sheet(&sheet.heats));
    if !ui::prefs().quiet {
        for warning in &sheet.warnings {
            eprintln!(
                "warning: {} {} mark '{}' ignored: {}",
                warning.registration_id, warning.source, warning.mark, warning.reason
            );
        }
    }
    Ok(())
}

fn render_sheet(heats: &[HeatWithAssignments]) -> String {
    if heats.is_empty() {
        return String::from("(no heats)");
    }

    let headers = ["heat", "lane", "break", "registration", "seed", "rank", "status"];
    let rows = heats
        .iter()
        .flat_map(|h| {
            h.assignments.iter().map(move |a| {
                vec![
                    h.heat.heat_number.to_string(),
                    a.lane.map_or_else(|| String::from("-"), |lane| lane.to_string()),
                    a.break_group.map_or_else(String::new, |group| group.to_string()),
                    a.registration_id.clone(),
                    a.seed_time.clone().unwrap_or_else(|| String::from("unseeded")),
                    a.seed_rank.map_or_else(|| String::from("-"), |rank| rank.to_string()),
                    String::from(if a.is_present { "placed" } else { "bye" }),
                ]
            })
        })
        .collect::<Vec<_>>();
    table::render_table(&headers, &rows, table_options())
}

fn render_key_values<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let value = serde_json::to_value(value)?;
    let rows = match value {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| vec![key, value_to_cell(&value)])
            .collect::<Vec<_>>(),
        scalar => vec![vec![String::from("value"), value_to_cell(&scalar)]],
    };
    Ok(table::render_table(&["key", "value"], &rows, table_options()))
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}
