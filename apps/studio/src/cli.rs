//! Command-line host. Each invocation restores the store from its snapshot
//! file, performs one operation and exits.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use crate::config::Config;
use crate::export::ExportController;
use crate::layout::{paginate, render_current};
use crate::models::{PersonalInfoPatch, ResumeContent, TemplateId};
use crate::scoring::score_resume;
use crate::store::{FileSnapshotStore, ResumeStore};

#[derive(Parser, Debug)]
#[command(name = "studio", version, about = "Resume authoring engine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the resume as the selected template lays it out
    Preview {
        #[arg(long, help = "Print the layout tree as JSON")]
        json: bool,
    },
    /// Export the resume to PDF
    Export {
        #[arg(long, value_name = "DIR", help = "Output directory (defaults to STUDIO_EXPORT_DIR)")]
        out: Option<PathBuf>,
    },
    /// Select a template by identifier
    Template { id: String },
    /// Set the accent colour, e.g. "#2563eb"
    Accent { color: String },
    /// Set the font preference
    Font { name: String },
    /// Replace the professional summary
    Summary { text: String },
    /// Discard all content and restore defaults
    Reset,
    /// Replace the whole resume with one read from a JSON file
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Update contact details; only the given fields change
    Personal {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        linkedin: Option<String>,
        #[arg(long)]
        github: Option<String>,
    },
    /// Score the resume for ATS compatibility
    Score {
        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },
}

/// Opens the store named by `config`.
pub fn open_store(config: &Config) -> ResumeStore {
    let persistence = FileSnapshotStore::new(&config.data_dir, &config.storage_key);
    debug!(path = %persistence.path().display(), "Opening resume store");
    ResumeStore::open(Arc::new(persistence))
}

/// Runs one command, writing its human-readable result to `out`.
pub async fn run(command: Command, config: &Config, out: &mut impl Write) -> Result<()> {
    let mut store = open_store(config);

    match command {
        Command::Preview { json } => {
            let content = store.snapshot();
            let tree = render_current(&content);
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&tree)?)?;
                return Ok(());
            }
            writeln!(out, "Template: {}", tree.template)?;
            for text in tree.texts().into_iter().filter(|t| !t.is_empty()) {
                writeln!(out, "{text}")?;
            }
            match paginate(&tree) {
                Ok(doc) => writeln!(out, "Pages: {}", doc.page_count())?,
                Err(e) => {
                    warn!("Preview could not be paginated: {e}");
                    writeln!(out, "Pages: unavailable ({})", e.user_message())?;
                }
            }
        }

        Command::Export { out: dir } => {
            let dir = dir.unwrap_or_else(|| config.export_dir.clone());
            let controller = ExportController::new();
            let artifact = controller
                .request(store.snapshot())
                .wait()
                .await
                .context("Export failed")?;
            let path = artifact.write_to(&dir)?;
            writeln!(
                out,
                "Exported {} ({} page(s), {} bytes) to {}",
                artifact.filename,
                artifact.page_count,
                artifact.size(),
                path.display()
            )?;
        }

        Command::Template { id } => {
            if TemplateId::parse(&id).is_none() {
                warn!("Unknown template '{id}', falling back to {}", TemplateId::default());
            }
            store.set_template(&id);
            writeln!(out, "Template: {}", store.snapshot().metadata.template)?;
        }

        Command::Accent { color } => {
            store.set_accent_color(color);
            writeln!(out, "Accent colour: {}", store.snapshot().metadata.accent_color)?;
        }

        Command::Font { name } => {
            store.set_font(name);
            writeln!(out, "Font: {}", store.snapshot().metadata.font)?;
        }

        Command::Summary { text } => {
            store.update_summary(text);
            writeln!(out, "Summary updated")?;
        }

        Command::Reset => {
            store.reset_resume();
            writeln!(out, "Resume reset to defaults")?;
        }

        Command::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let content: ResumeContent = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a resume JSON document", file.display()))?;
            let entries = content.experience.len()
                + content.education.len()
                + content.skills.len()
                + content.projects.len();
            store.import_resume(content);
            writeln!(out, "Imported {} ({entries} entries)", file.display())?;
        }

        Command::Personal {
            name,
            email,
            phone,
            location,
            website,
            linkedin,
            github,
        } => {
            store.update_personal_info(PersonalInfoPatch {
                full_name: name,
                email,
                phone,
                location,
                website,
                linkedin,
                github,
                avatar: None,
            });
            writeln!(out, "Personal info updated")?;
        }

        Command::Score { json } => {
            let report = score_resume(&store.snapshot());
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
                return Ok(());
            }
            writeln!(out, "ATS score: {}/100 ({})", report.score, report.rating())?;
            for issue in &report.issues {
                writeln!(out, "  [{:?}] {}", issue.severity, issue.message)?;
            }
        }
    }

    Ok(())
}
