use serde::Serialize;

use gwts_frame::hex::format_hex;
use gwts_frame::ProtocolFamily;

use crate::cmd::{parse_hex_args, EncodeArgs};
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{new_table, print_json, OutputFormat};

#[derive(Debug, Serialize)]
struct EncodeOutput {
    family: &'static str,
    payload: String,
    frame: String,
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = parse_hex_args(&args.bytes)?;
    let frame = args
        .family
        .encode(&payload)
        .map_err(|err| frame_error("cannot encode payload", err))?;

    let output = EncodeOutput {
        family: ProtocolFamily::from(args.family).name(),
        payload: format_hex(&payload),
        frame: frame.to_hex(),
    };

    match format {
        OutputFormat::Json => print_json(&output),
        OutputFormat::Table => {
            let mut table = new_table(vec!["FAMILY", "PAYLOAD", "FRAME"]);
            table.add_row(vec![
                output.family.to_string(),
                output.payload.clone(),
                output.frame.clone(),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{} {} -> {}", output.family, output.payload, output.frame);
        }
        OutputFormat::Raw => println!("{}", output.frame),
    }
    Ok(SUCCESS)
}
