use clap::ValueEnum;
use serde::Deserialize;

/// How the resolved order is printed.
///
/// - `Lines`: one element per line (default).
/// - `Inline`: a single bracketed, space-separated line, e.g. `[A C E B D]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Lines,
    Inline,
}

impl OutputFormat {
    pub fn render<S: AsRef<str>>(self, elements: &[S]) -> String {
        match self {
            OutputFormat::Lines => elements
                .iter()
                .map(|e| format!("{}\n", e.as_ref()))
                .collect(),
            OutputFormat::Inline => {
                let joined: Vec<&str> = elements.iter().map(|e| e.as_ref()).collect();
                format!("[{}]\n", joined.join(" "))
            }
        }
    }
}
