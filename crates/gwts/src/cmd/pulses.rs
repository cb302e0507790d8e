use serde::Serialize;

use gwts_frame::hex::format_hex;
use gwts_frame::{encode_pulses, format_pulses};

use crate::cmd::{parse_hex_args, PulsesArgs};
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{new_table, print_json, OutputFormat};

#[derive(Debug, Serialize)]
struct PulsesOutput {
    bytes: String,
    width: u32,
    pulses: Vec<u32>,
}

pub fn run(args: PulsesArgs, format: OutputFormat) -> CliResult<i32> {
    let mut bytes = parse_hex_args(&args.bytes)?;
    if let Some(family) = args.encode {
        let frame = family
            .encode(&bytes)
            .map_err(|err| frame_error("cannot encode payload", err))?;
        bytes = frame.as_bytes().to_vec();
    }

    let output = PulsesOutput {
        bytes: format_hex(&bytes),
        width: args.width,
        pulses: encode_pulses(&bytes, args.width),
    };

    match format {
        OutputFormat::Json => print_json(&output),
        OutputFormat::Table => {
            let mut table = new_table(vec!["BYTES", "WIDTH", "PULSES"]);
            table.add_row(vec![
                output.bytes.clone(),
                output.width.to_string(),
                format_pulses(&output.pulses),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => println!("{}", format_pulses(&output.pulses)),
    }
    Ok(SUCCESS)
}
