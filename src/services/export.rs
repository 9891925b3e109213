use crate::models::episode::Episode;
use clap::ValueEnum;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// One pretty-printed JSON array
    #[default]
    Json,
    /// One compact JSON object per line
    Jsonl,
}

/// Writes the records as structured data, in catalog order.
pub fn export_episodes<W: Write>(
    episodes: &[Episode],
    format: ExportFormat,
    mut writer: W,
) -> anyhow::Result<()> {
    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, episodes)?;
            writeln!(writer)?;
        }
        ExportFormat::Jsonl => {
            for episode in episodes {
                serde_json::to_writer(&mut writer, episode)?;
                writeln!(writer)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}
