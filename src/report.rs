//! Key-value reports of analysis results
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use natclass_utils::{keys_by_count_desc, ConfidenceInterval};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::simulation::{
    GridComparisonResult, SimulationResult, SyllableCountResult,
};

/// How a report is rendered
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `key<TAB>value` lines
    #[default]
    Text,
    Yaml,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" | "txt" => Ok(Self::Text),
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(format!("cannot parse '{s}'")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Yaml => "yaml",
            Self::Json => "json",
        };
        write!(f, "{s}")
    }
}

/// A result that can be written as flat key-value text
pub trait KeyValueReport {
    fn write_key_values<W: Write>(&self, writer: &mut W) -> io::Result<()>;
}

/// Write `report` in the requested format
pub fn emit<T, W>(
    report: &T,
    format: OutputFormat,
    writer: &mut W,
) -> Result<(), ReportError>
where
    T: KeyValueReport + Serialize,
    W: Write,
{
    match format {
        OutputFormat::Text => report.write_key_values(writer)?,
        OutputFormat::Yaml => serde_yaml::to_writer(&mut *writer, report)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, report)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// Trailing column for classes with unreliable membership, as in the class
/// table output
pub fn ambiguity_marker(reliable: bool) -> &'static str {
    if reliable {
        ""
    } else {
        "\tambiguous"
    }
}

fn write_ci<W: Write>(
    writer: &mut W,
    name: &str,
    ci: &ConfidenceInterval,
) -> io::Result<()> {
    writeln!(writer, "{name}.mean\t{}", ci.mean)?;
    writeln!(writer, "{name}.ci_lower\t{}", ci.lower)?;
    writeln!(writer, "{name}.ci_upper\t{}", ci.upper)
}

impl KeyValueReport for SimulationResult {
    fn write_key_values<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "n_draws\t{}", self.n_draws)?;
        writeln!(writer, "sample_size\t{}", self.sample_size)?;
        writeln!(writer, "seed\t{}", self.seed)?;
        write_ci(writer, "max_syllables", &self.max_syllables)?;
        write_ci(writer, "min_syllables", &self.min_syllables)?;
        writeln!(writer, "threshold\t{}", self.threshold)?;
        writeln!(writer, "n_over_threshold\t{}", self.n_over_threshold)?;
        writeln!(
            writer,
            "sublexicon_max_syllables\t{}",
            self.sublexicon_max_syllables
        )?;
        writeln!(writer, "sublexicon_size\t{}", self.sublexicon_size)?;
        match self.sublexicon_tolerance {
            Some(tolerance) => {
                writeln!(writer, "sublexicon_tolerance\t{tolerance:.2}")?
            }
            None => writeln!(writer, "sublexicon_tolerance\tNone")?,
        }
        match &self.sublexicon_class {
            Some(class) => writeln!(
                writer,
                "sublexicon_class\t[{}]\t{}{}",
                class.description.join(","),
                class.segments.join(","),
                ambiguity_marker(class.reliable)
            )?,
            None => writeln!(writer, "sublexicon_class\tNone")?,
        }
        match self.joint {
            Some(joint) => writeln!(writer, "joint\t{joint}/{}", self.n_draws)?,
            None => writeln!(writer, "joint\tNone")?,
        }
        for class in keys_by_count_desc(&self.final_classes) {
            writeln!(
                writer,
                "final_class.{class}\t{}",
                self.final_classes[&class]
            )?;
        }
        for len in keys_by_count_desc(&self.max_lengths) {
            writeln!(
                writer,
                "max_length.{len}\t{}",
                self.max_lengths[&len]
            )?;
        }
        for class in &self.absent_classes {
            writeln!(
                writer,
                "absent.[{}]\t{}\t{}\t{}\t{}{}{}",
                class.description,
                class.segments,
                class.size,
                class.n_absent,
                class.ratio,
                if class.maximal { "\tmaximal" } else { "" },
                ambiguity_marker(class.reliable)
            )?;
        }
        Ok(())
    }
}

impl KeyValueReport for SyllableCountResult {
    fn write_key_values<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "n_draws\t{}", self.n_draws)?;
        writeln!(writer, "sample_size\t{}", self.sample_size)?;
        writeln!(writer, "seed\t{}", self.seed)?;
        write_ci(writer, "max_syllables", &self.max_syllables)?;
        write_ci(writer, "min_syllables", &self.min_syllables)?;
        writeln!(writer, "threshold\t{}", self.threshold)?;
        writeln!(writer, "n_over_threshold\t{}", self.n_over_threshold)?;
        writeln!(
            writer,
            "over_threshold_ratio\t{}",
            self.over_threshold_ratio
        )?;
        for len in keys_by_count_desc(&self.max_lengths) {
            writeln!(
                writer,
                "max_length.{len}\t{}",
                self.max_lengths[&len]
            )?;
        }
        Ok(())
    }
}

impl KeyValueReport for GridComparisonResult {
    fn write_key_values<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "n_draws\t{}", self.n_draws)?;
        writeln!(writer, "sample_size\t{}", self.sample_size)?;
        writeln!(writer, "seed\t{}", self.seed)?;
        writeln!(writer, "n_same_inventory\t{}", self.n_same_inventory)?;
        writeln!(
            writer,
            "same_inventory_ratio\t{}",
            self.same_inventory_ratio
        )?;
        let total: usize = self.type_counts.values().sum();
        for grid in keys_by_count_desc(&self.type_counts) {
            let count = self.type_counts[&grid];
            let share = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            };
            writeln!(writer, "drawn.{grid}\t{count}\t{share:.4}")?;
        }
        if let Some(capped) = &self.capped {
            writeln!(writer, "capped.syllables\t{}", capped.cap)?;
            writeln!(writer, "capped.n_draws\t{}", capped.n_draws)?;
            for (inventory, count) in &capped.inventories {
                writeln!(writer, "capped.{inventory}\t{count}")?;
            }
        }
        Ok(())
    }
}
