use crate::cli::handlers;
use crate::error::Result;
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zbx_sdk::{ExportFormat, ObjectKind};

/// Export configurations from a Zabbix server
#[derive(Parser, Debug)]
#[command(
    name = "zbx-export",
    version,
    about = "Export configurations from a Zabbix server",
    long_about = "Export configurations from a Zabbix server.

EXAMPLES:
  zbx-export                                  # hosts as YAML into the current dir
  zbx-export -t hosts templates -f json       # two types as JSON
  zbx-export -t all -z -d /var/backups/zbx    # everything, zipped"
)]
pub struct Args {
    /// Directory where to save the exported configuration
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// The configuration file, relative to the program's location
    #[arg(short, long, default_value = "zbx_config.ini")]
    pub config: PathBuf,

    /// Which type(s) of configuration to export
    #[arg(
        short,
        long,
        value_enum,
        num_args = 1..,
        value_name = "TYPE",
        default_values_t = [TypeSelection::Hosts]
    )]
    pub types: Vec<TypeSelection>,

    /// The output format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Yaml)]
    pub format: ExportFormat,

    /// Compress the exported configuration data
    #[arg(short, long)]
    pub zip: bool,

    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,
}

impl Args {
    /// Execute the export
    pub async fn run(self) -> Result<()> {
        let summary = handlers::export::handle_export(&self).await?;

        if let Some(archive) = &summary.archive {
            info!("Compressed configuration file: {}", archive.display());
        } else if !self.zip {
            for path in &summary.written {
                info!("Written configuration file: {}", path.display());
            }
        }

        info!(
            "Exported {} of {} object types ({} failed)",
            summary.written.len(),
            summary.attempted,
            summary.failed.len()
        );

        Ok(())
    }

    /// Config file location after `~` expansion and executable-relative resolution
    pub fn config_path(&self) -> PathBuf {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        resolve_config_path(&self.config, exe_dir.as_deref())
    }

    /// Output directory after `~` expansion
    pub fn output_dir(&self) -> PathBuf {
        expand_tilde(&self.dir)
    }
}

/// Object type selectors accepted by `--types`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TypeSelection {
    All,
    Hosts,
    Hostgroups,
    Maps,
    Images,
    Mediatypes,
    Templategroups,
    Templates,
}

impl TypeSelection {
    /// The kind this selector names (`None` for `all`)
    pub fn kind(self) -> Option<ObjectKind> {
        match self {
            Self::All => None,
            Self::Hosts => Some(ObjectKind::Host),
            Self::Hostgroups => Some(ObjectKind::HostGroup),
            Self::Maps => Some(ObjectKind::Map),
            Self::Images => Some(ObjectKind::Image),
            Self::Mediatypes => Some(ObjectKind::MediaType),
            Self::Templategroups => Some(ObjectKind::TemplateGroup),
            Self::Templates => Some(ObjectKind::Template),
        }
    }
}

/// Turn selectors into the ordered, duplicate-free list of kinds to export
///
/// `all` anywhere in the list selects every kind in table order.
pub fn resolve_kinds(selections: &[TypeSelection]) -> Vec<ObjectKind> {
    if selections.contains(&TypeSelection::All) {
        return ObjectKind::ALL.to_vec();
    }

    let mut kinds = Vec::with_capacity(selections.len());
    for kind in selections.iter().filter_map(|s| s.kind()) {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    kinds
}

/// Resolve a config path against the executable's directory
///
/// Absolute paths (after `~` expansion) are used as given.
pub fn resolve_config_path(config: &Path, exe_dir: Option<&Path>) -> PathBuf {
    let expanded = expand_tilde(config);
    if expanded.is_absolute() {
        return expanded;
    }

    match exe_dir {
        Some(dir) => dir.join(expanded),
        None => {
            debug!("Executable location unknown, resolving config against the working directory");
            expanded
        }
    }
}

/// Expand tilde (~) in file paths to home directory
fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(path_str) => PathBuf::from(shellexpand::tilde(path_str).as_ref()),
        None => path.to_path_buf(),
    }
}
