use std::fmt;

use common::storage::types::language::Language;

/// Examples found for one (class, language) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleReport {
    pub class_name: String,
    pub language: Language,
    /// Number of examples in the index before sampling.
    pub total: usize,
    pub requested: usize,
    pub examples: Vec<String>,
    /// True when `examples` is a random subset rather than the full list.
    pub sampled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Found(ExampleReport),
    NoExamples {
        class_name: String,
        language: Language,
    },
    UnsupportedLanguage {
        requested: String,
        supported: Vec<Language>,
    },
}

impl QueryOutcome {
    /// Total examples available; zero for every outcome other than a hit.
    pub fn total(&self) -> usize {
        match self {
            Self::Found(report) => report.total,
            Self::NoExamples { .. } | Self::UnsupportedLanguage { .. } => 0,
        }
    }

    pub fn examples(&self) -> &[String] {
        match self {
            Self::Found(report) => &report.examples,
            Self::NoExamples { .. } | Self::UnsupportedLanguage { .. } => &[],
        }
    }
}

impl fmt::Display for QueryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(report) if report.examples.is_empty() => write_no_examples(
                f,
                &report.class_name,
                report.language,
            ),
            Self::Found(report) => {
                writeln!(
                    f,
                    "VTK Class: {}, language: {}",
                    report.class_name, report.language
                )?;
                if report.sampled {
                    write!(
                        f,
                        "Number of example(s): {} with {} random sample(s) shown.",
                        report.total, report.requested
                    )?;
                } else {
                    write!(f, "Number of example(s): {}.", report.total)?;
                }
                for example in &report.examples {
                    write!(f, "\n{example}")?;
                }
                Ok(())
            }
            Self::NoExamples {
                class_name,
                language,
            } => write_no_examples(f, class_name, *language),
            Self::UnsupportedLanguage {
                requested,
                supported,
            } => {
                let choices = supported
                    .iter()
                    .map(|language| language.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(f, "The language: {requested} is not available.")?;
                write!(f, "Choose one of these: {choices}.")
            }
        }
    }
}

fn write_no_examples(f: &mut fmt::Formatter<'_>, class_name: &str, language: Language) -> fmt::Result {
    write!(
        f,
        "No examples for the VTK Class: {class_name} and language: {language}"
    )
}
