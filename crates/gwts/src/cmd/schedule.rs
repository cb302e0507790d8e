use serde::Serialize;

use gwts_frame::schedule_delays;

use crate::cmd::{parse_hex_args, resolve_markers, ScheduleArgs};
use crate::config::FileConfig;
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{new_table, print_json, OutputFormat};

#[derive(Debug, Serialize)]
struct ScheduleEntry {
    time: u64,
    key: String,
    marker: String,
    frame: String,
}

#[derive(Debug, Serialize)]
struct ScheduleOutput {
    offset: u64,
    step: u64,
    entries: Vec<ScheduleEntry>,
}

pub fn run(args: ScheduleArgs, format: OutputFormat, config: &FileConfig) -> CliResult<i32> {
    let body = parse_hex_args(&args.bytes)?;
    let markers = resolve_markers(args.markers, config)?;
    let scheduled = schedule_delays(args.offset, &body, &markers, args.step)
        .map_err(|err| frame_error("cannot schedule command", err))?;

    let output = ScheduleOutput {
        offset: args.offset,
        step: args.step,
        entries: scheduled
            .iter()
            .map(|s| ScheduleEntry {
                time: s.time,
                key: s.time_key(),
                marker: format!("{:02X}", s.marker),
                frame: s.frame.to_hex(),
            })
            .collect(),
    };

    match format {
        OutputFormat::Json => print_json(&output),
        OutputFormat::Table => {
            let mut table = new_table(vec!["KEY", "TIME", "MARKER", "FRAME"]);
            for entry in &output.entries {
                table.add_row(vec![
                    entry.key.clone(),
                    entry.time.to_string(),
                    entry.marker.clone(),
                    entry.frame.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for entry in &output.entries {
                println!("{} {}", entry.key, entry.frame);
            }
        }
    }
    Ok(SUCCESS)
}
