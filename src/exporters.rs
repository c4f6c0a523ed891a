use std::fs::File;
use std::io::Write;

use anyhow::{Context, Result};

use crate::structs::RunResult;

fn make_filename(basename: &str, ext: &str) -> String {
    if basename.to_lowercase().ends_with(&format!(".{}", ext)) {
        basename.to_owned()
    } else {
        format!("{}.{}", basename, ext)
    }
}

pub trait Exporter {
    fn save(&self, result: &RunResult, file_name: &str) -> Result<String>;
}

pub struct JSONExporter;
impl Exporter for JSONExporter {
    fn save(&self, result: &RunResult, file_name: &str) -> Result<String> {
        let file_name = make_filename(file_name, "json");
        let mut out = File::create(&file_name)
            .with_context(|| format!("Unable to create `{}`", &file_name))?;
        writeln!(
            &mut out,
            "{}",
            serde_json::to_string_pretty(&result)
                .context("Unable to serialize result into JSON")?
        )
        .context("Unable to write results")?;

        Ok(file_name)
    }
}

/// One repeat per line: pitch-class codes, then the start positions.
pub struct TextExporter;
impl Exporter for TextExporter {
    fn save(&self, result: &RunResult, file_name: &str) -> Result<String> {
        let file_name = make_filename(file_name, "txt");
        let mut out = File::create(&file_name)
            .with_context(|| format!("Unable to create `{}`", &file_name))?;

        writeln!(&mut out, "# {}", result.song).context("Unable to write results")?;
        for track in &result.tracks {
            writeln!(&mut out, "> {}", track.instrument).context("Unable to write results")?;
            for repeat in &track.repeats {
                writeln!(
                    &mut out,
                    "{symbols}\t@ {positions}",
                    symbols = repeat
                        .symbols
                        .iter()
                        .map(|s| s.to_string())
                        .collect::<Vec<_>>()
                        .join(" "),
                    positions = repeat
                        .positions
                        .iter()
                        .map(|p| p.to_string())
                        .collect::<Vec<_>>()
                        .join(","),
                )
                .context("Unable to write results")?;
            }
        }

        Ok(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_keep_existing_extension() {
        assert_eq!(make_filename("out", "json"), "out.json");
        assert_eq!(make_filename("out.json", "json"), "out.json");
        assert_eq!(make_filename("OUT.JSON", "json"), "OUT.JSON");
    }
}
