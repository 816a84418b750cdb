use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::Context;

/// Writes `value` as pretty JSON to `output_path`, or stdout when `None`.
pub fn save_json<T>(value: &T, output_path: Option<&PathBuf>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    match output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_json(&mut writer, value)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))
        }
        None => {
            let mut writer = io::stdout().lock();
            write_json(&mut writer, value).context("Failed to write JSON to stdout")
        }
    }
}

fn write_json<W, T>(writer: &mut W, value: &T) -> anyhow::Result<()>
where
    W: io::Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;
    let reader = io::BufReader::new(file);
    serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })
}
