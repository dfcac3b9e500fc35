//! Command-line interface for the converter.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use crate::converter::Converter;
use crate::error::Result;
use crate::spec::{default_options, presets, validate_spec, OptionsRegistry, Spec};
use crate::value::BuiltElement;

/// Jaxine - Build XML elements into JSON or YAML object trees.
#[derive(Parser)]
#[command(name = "jaxine")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build one element of an XML file.
    Build {
        /// XML file to read
        file: PathBuf,

        /// Tag name of the element to build
        #[arg(short, long)]
        tag: String,

        /// Attribute that identifies the element
        #[arg(long, default_value = "name")]
        id_attr: String,

        /// Value of the identifying attribute
        #[arg(short, long)]
        name: String,

        /// Preset name or path to a spec file (JSON or YAML)
        #[arg(short, long, default_value = "default")]
        spec: String,

        /// Element options file (JSON or YAML)
        #[arg(short, long)]
        options: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// List the built-in spec presets.
    Presets,

    /// Check a spec file or preset without building anything.
    Validate {
        /// Preset name or path to a spec file
        spec: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Yaml,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    execute(cli, &mut stdout.lock())
}

/// Execute a parsed command line, writing results to `out`.
pub fn execute(cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Commands::Build {
            file,
            tag,
            id_attr,
            name,
            spec,
            options,
            format,
        } => {
            let element = build_command(
                &file,
                &tag,
                &id_attr,
                &name,
                &spec,
                options.as_deref(),
            )?;
            write_element(&element, format, out)
        }
        Commands::Presets => {
            for name in presets::NAMES {
                writeln!(out, "{name}")?;
            }
            Ok(())
        }
        Commands::Validate { spec } => {
            let loaded = load_spec(&spec)?;
            validate_spec(&loaded)?;
            writeln!(out, "Spec {spec} is valid")?;
            Ok(())
        }
    }
}

/// Execute the build command.
fn build_command(
    file: &Path,
    tag: &str,
    id_attr: &str,
    name: &str,
    spec: &str,
    options: Option<&Path>,
) -> Result<BuiltElement> {
    let converter = Converter::new(load_spec(spec)?)?;

    // Without an options file every element is named by the selection attribute
    let registry = match options {
        Some(path) => OptionsRegistry::from_path(path)?,
        None => OptionsRegistry::new(default_options().with_id(id_attr)),
    };

    let xml = std::fs::read_to_string(file)?;
    tracing::debug!(file = %file.display(), tag, name, "Building element");
    converter.build_from_str(&xml, tag, id_attr, name, &registry)
}

/// Resolve a preset name, falling back to reading a spec file.
fn load_spec(spec: &str) -> Result<Spec> {
    match presets::by_name(spec) {
        Some(preset) => Ok(preset),
        None => Spec::from_path(Path::new(spec)),
    }
}

fn write_element(element: &BuiltElement, format: Format, out: &mut impl Write) -> Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, element)?;
            writeln!(out)?;
        }
        Format::Yaml => {
            write!(out, "{}", serde_yaml::to_string(element)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_build() {
        let cli = Cli::parse_from([
            "jaxine", "build", "commands.xml", "--tag", "Command", "--name", "run",
        ]);

        let Commands::Build {
            file,
            tag,
            id_attr,
            name,
            spec,
            options,
            format,
        } = cli.command
        else {
            panic!("expected build");
        };
        assert_eq!(file, PathBuf::from("commands.xml"));
        assert_eq!(tag, "Command");
        assert_eq!(id_attr, "name");
        assert_eq!(name, "run");
        assert_eq!(spec, "default");
        assert!(options.is_none());
        assert_eq!(format, Format::Json);
    }

    #[test]
    fn test_cli_parse_build_yaml_with_spec() {
        let cli = Cli::parse_from([
            "jaxine", "build", "a.xml", "-t", "Flag", "-n", "x", "--spec", "raw", "-f", "yaml",
        ]);

        let Commands::Build { spec, format, .. } = cli.command else {
            panic!("expected build");
        };
        assert_eq!(spec, "raw");
        assert_eq!(format, Format::Yaml);
    }

    #[test]
    fn test_presets_listed() {
        let mut out = Vec::new();
        execute(Cli::parse_from(["jaxine", "presets"]), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().collect::<Vec<_>>(), presets::NAMES.to_vec());
    }

    #[test]
    fn test_validate_preset() {
        let mut out = Vec::new();
        execute(Cli::parse_from(["jaxine", "validate", "full"]), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Spec full is valid\n");
    }
}
