//! Optional TOML configuration.
//!
//! ```toml
//! timestamp_tokens = 2
//! top_errors = 10
//!
//! [markers]
//! preset = "standard"            # or "wide"
//! standard = ["FB", "FA", "20"]  # overrides the preset countdown
//! extended = "0C"                # "none" disables the extended marker
//! ```
//!
//! Command-line flags and `GWTS_*` environment variables take precedence over
//! file values.

use std::path::{Path, PathBuf};

use gwts_frame::hex::parse_token;
use gwts_frame::MarkerTable;
use serde::Deserialize;

use crate::exit::{config_error, io_error, CliResult};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub timestamp_tokens: Option<usize>,
    pub top_errors: Option<usize>,
    pub markers: Option<MarkerConfig>,
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerConfig {
    pub preset: Option<String>,
    pub standard: Option<Vec<String>>,
    pub extended: Option<String>,
}

impl FileConfig {
    /// Load a config file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading config {}", path.display()), err))?;
        let mut config: Self = toml::from_str(&text).map_err(|err| config_error(path, err))?;
        config.source = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Marker table described by the file, if it has a `[markers]` section.
    pub fn marker_table(&self) -> CliResult<Option<MarkerTable>> {
        let Some(markers) = &self.markers else {
            return Ok(None);
        };
        let source = self.source.as_deref().unwrap_or(Path::new("<inline>"));
        markers
            .to_table()
            .map(Some)
            .map_err(|detail| config_error(source, detail))
    }
}

impl MarkerConfig {
    pub fn to_table(&self) -> Result<MarkerTable, String> {
        let base = match self.preset.as_deref() {
            Some(name) => {
                MarkerTable::preset(name).ok_or_else(|| format!("unknown marker preset {name:?}"))?
            }
            None => MarkerTable::standard(),
        };

        let standard = match &self.standard {
            Some(values) => values
                .iter()
                .map(|value| parse_token(value).map_err(|err| format!("markers.standard: {err}")))
                .collect::<Result<Vec<u8>, String>>()?,
            None => base.standard_markers().to_vec(),
        };

        let extended = match self.extended.as_deref() {
            None => base.extended_marker(),
            Some(value) if value.eq_ignore_ascii_case("none") => None,
            Some(value) => {
                Some(parse_token(value).map_err(|err| format!("markers.extended: {err}"))?)
            }
        };

        Ok(MarkerTable::new(standard, extended))
    }
}
