use serde::Serialize;

use gwts_frame::decode_tokens;

use crate::cmd::{hex_tokens, CheckArgs};
use crate::exit::{CliResult, DATA_INVALID, SUCCESS};
use crate::output::{new_table, print_json, OutputFormat};

#[derive(Debug, Serialize)]
struct CheckOutput {
    frame: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    family: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Exits with `DATA_INVALID` when the frame is rejected.
pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let tokens = hex_tokens(&args.bytes);
    let output = match decode_tokens(&tokens) {
        Ok(checked) => CheckOutput {
            frame: checked.frame.to_hex(),
            valid: true,
            family: Some(checked.family.name()),
            error: None,
        },
        Err(err) => {
            tracing::debug!(error = %err, "frame rejected");
            CheckOutput {
                frame: tokens.join(" "),
                valid: false,
                family: None,
                error: Some(err.to_string()),
            }
        }
    };

    match format {
        OutputFormat::Json => print_json(&output),
        OutputFormat::Table => {
            let mut table = new_table(vec!["FRAME", "VALID", "FAMILY", "ERROR"]);
            table.add_row(vec![
                output.frame.clone(),
                output.valid.to_string(),
                output.family.unwrap_or("-").to_string(),
                output.error.clone().unwrap_or_default(),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => match (&output.family, &output.error) {
            (Some(family), _) => println!("{}: valid {family} frame", output.frame),
            (None, Some(error)) => println!("{}: invalid ({error})", output.frame),
            (None, None) => println!("{}: invalid", output.frame),
        },
        OutputFormat::Raw => println!("{}", if output.valid { "valid" } else { "invalid" }),
    }

    if output.valid {
        Ok(SUCCESS)
    } else {
        Ok(DATA_INVALID)
    }
}
