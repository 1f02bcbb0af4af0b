use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{ClusterAppConfig, SolvateAppConfig};
use crate::cli::{ClusterArgs, SolvateArgs};
use crate::error::{CliError, Result};
use dowse::engine::config::{
    ClassifierKind, ClusterConfigBuilder, RadiusSource, SolvationConfigBuilder,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub fn build_solvate_config(args: &SolvateArgs) -> Result<SolvateAppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let grid_file = file_config.grid.take().unwrap_or_default();
    let surface_file = file_config.surface.take().unwrap_or_default();
    let solvent_file = file_config.solvent.take().unwrap_or_default();

    let grid_spacing = args
        .spacing
        .or(grid_file.spacing)
        .unwrap_or(defaults.grid_spacing);
    let search_radius = args
        .search_radius
        .or(surface_file.search_radius)
        .unwrap_or(defaults.search_radius);

    let classifier = match args.classifier.as_deref().or(surface_file.classifier.as_deref()) {
        Some(name) => parse_variant::<ClassifierKind>(name)?,
        None => defaults.classifier,
    };
    let radius_source = match solvent_file.radius_source.as_deref() {
        Some(name) => parse_variant::<RadiusSource>(name)?,
        None => defaults.radius_source,
    };

    let keep_isolated = args.keep_isolated
        || solvent_file
            .keep_isolated
            .unwrap_or(defaults.keep_isolated);

    let radii_path = solvent_file
        .radii_path
        .map(|path| resolve_relative_to_config(path, args.config.as_deref()));

    let core_config = SolvationConfigBuilder::new()
        .grid_spacing(grid_spacing)
        .hash_spacing(grid_file.hash_spacing.unwrap_or(defaults.hash_spacing))
        .padding(grid_file.padding.unwrap_or(defaults.padding))
        .max_lattice_cells(
            grid_file
                .max_lattice_cells
                .unwrap_or(defaults.max_lattice_cells),
        )
        .search_radius(search_radius)
        .classifier(classifier)
        .probe_diameter(
            solvent_file
                .probe_diameter
                .unwrap_or(defaults.probe_diameter),
        )
        .contact_cutoff(
            solvent_file
                .contact_cutoff
                .unwrap_or(defaults.contact_cutoff),
        )
        .keep_isolated(keep_isolated)
        .radius_source(radius_source)
        .radii_path(radii_path)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(SolvateAppConfig {
        pdb_path: args.pdb.clone(),
        vert_path: args.vert.clone(),
        output_prefix: args.output.clone(),
        write_intermediates: args.write_intermediates,
        core_config,
    })
}

pub fn build_cluster_config(args: &ClusterArgs) -> Result<ClusterAppConfig> {
    let defaults = DefaultsConfig::default();

    let core_config = ClusterConfigBuilder::new()
        .grid_spacing(args.spacing.unwrap_or(defaults.grid_spacing))
        .hash_spacing(args.hash_spacing.unwrap_or(defaults.hash_spacing))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(ClusterAppConfig {
        input_path: args.input.clone(),
        output_prefix: args.output.clone(),
        core_config,
    })
}

fn parse_variant<T>(name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    name.parse::<T>()
        .map_err(|e| CliError::Config(e.to_string()))
}

fn resolve_relative_to_config(path: PathBuf, config_path: Option<&Path>) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match config_path.and_then(Path::parent) {
        Some(dir) => dir.join(path),
        None => path,
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "grid.spacing" => {
                config.grid.get_or_insert_with(Default::default).spacing =
                    Some(parse_value(key, value_str, "float")?);
            }
            "grid.hash-spacing" => {
                config.grid.get_or_insert_with(Default::default).hash_spacing =
                    Some(parse_value(key, value_str, "float")?);
            }
            "grid.padding" => {
                config.grid.get_or_insert_with(Default::default).padding =
                    Some(parse_value(key, value_str, "float")?);
            }
            "grid.max-lattice-cells" => {
                config
                    .grid
                    .get_or_insert_with(Default::default)
                    .max_lattice_cells = Some(parse_value(key, value_str, "integer")?);
            }
            "surface.search-radius" => {
                config
                    .surface
                    .get_or_insert_with(Default::default)
                    .search_radius = Some(parse_value(key, value_str, "float")?);
            }
            "surface.classifier" => {
                config.surface.get_or_insert_with(Default::default).classifier =
                    Some(value_str.trim().to_string());
            }
            "solvent.probe-diameter" => {
                config
                    .solvent
                    .get_or_insert_with(Default::default)
                    .probe_diameter = Some(parse_value(key, value_str, "float")?);
            }
            "solvent.contact-cutoff" => {
                config
                    .solvent
                    .get_or_insert_with(Default::default)
                    .contact_cutoff = Some(parse_value(key, value_str, "float")?);
            }
            "solvent.keep-isolated" => {
                config
                    .solvent
                    .get_or_insert_with(Default::default)
                    .keep_isolated = Some(parse_value(key, value_str, "boolean")?);
            }
            "solvent.radius-source" => {
                config
                    .solvent
                    .get_or_insert_with(Default::default)
                    .radius_source = Some(value_str.trim().to_string());
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn base_solvate_args() -> SolvateArgs {
        SolvateArgs {
            pdb: PathBuf::from("in.pdb"),
            vert: PathBuf::from("in.vert"),
            output: PathBuf::from("out"),
            config: None,
            spacing: None,
            search_radius: None,
            classifier: None,
            keep_isolated: false,
            write_intermediates: false,
            set_values: vec![],
        }
    }

    #[test]
    fn build_solvate_config_uses_defaults_without_file() {
        let app = build_solvate_config(&base_solvate_args()).expect("build ok");
        let cfg = app.core_config;
        let defaults = DefaultsConfig::default();

        assert_eq!(cfg.grid.spacing, defaults.grid_spacing);
        assert_eq!(cfg.grid.hash_spacing, defaults.hash_spacing);
        assert_eq!(cfg.grid.padding, defaults.padding);
        assert_eq!(cfg.grid.max_lattice_cells, defaults.max_lattice_cells);
        assert_eq!(cfg.surface.search_radius, defaults.search_radius);
        assert_eq!(cfg.surface.classifier, ClassifierKind::Scatter);
        assert_eq!(cfg.solvent.probe_diameter, defaults.probe_diameter);
        assert_eq!(cfg.solvent.contact_cutoff, defaults.contact_cutoff);
        assert!(!cfg.solvent.keep_isolated);
        assert_eq!(cfg.solvent.radius_source, RadiusSource::Table);
        assert!(cfg.solvent.radii_path.is_none());
        assert_eq!(app.output_prefix, PathBuf::from("out"));
    }

    #[test]
    fn build_solvate_config_reads_file_and_merges() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("dowse.toml");
        let toml = r#"
            [grid]
            spacing = 0.5
            padding = 2.0
            max-lattice-cells = 1000000

            [surface]
            search-radius = 1.5
            classifier = "binned"

            [solvent]
            probe-diameter = 2.8
            radius-source = "temperature-factor"
            radii-path = "params/radii.csv"
            "#;
        fs::write(&cfg_path, toml).unwrap();

        let mut args = base_solvate_args();
        args.config = Some(cfg_path);

        let cfg = build_solvate_config(&args).expect("build ok").core_config;
        assert_eq!(cfg.grid.spacing, 0.5);
        assert_eq!(cfg.grid.padding, 2.0);
        assert_eq!(cfg.grid.max_lattice_cells, 1_000_000);
        assert_eq!(cfg.surface.search_radius, 1.5);
        assert_eq!(cfg.surface.classifier, ClassifierKind::Binned);
        assert_eq!(cfg.solvent.probe_diameter, 2.8);
        assert_eq!(cfg.solvent.radius_source, RadiusSource::TemperatureFactor);
        assert_eq!(
            cfg.solvent.radii_path,
            Some(dir.path().join("params/radii.csv"))
        );
    }

    #[test]
    fn cli_overrides_file_values() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("dowse.toml");
        let toml = r#"
            [grid]
            spacing = 0.5
            [surface]
            search-radius = 1.5
            classifier = "binned"
            "#;
        fs::write(&cfg_path, toml).unwrap();

        let mut args = base_solvate_args();
        args.config = Some(cfg_path);
        args.spacing = Some(0.2);
        args.search_radius = Some(3.0);
        args.classifier = Some("vote".to_string());
        args.keep_isolated = true;

        let cfg = build_solvate_config(&args).expect("build ok").core_config;
        assert_eq!(cfg.grid.spacing, 0.2);
        assert_eq!(cfg.surface.search_radius, 3.0);
        assert_eq!(cfg.surface.classifier, ClassifierKind::WeightedVote);
        assert!(cfg.solvent.keep_isolated);
    }

    #[test]
    fn set_values_override() {
        let mut args = base_solvate_args();
        args.set_values = vec![
            "grid.hash-spacing=4.5".to_string(),
            "grid.max-lattice-cells=2000".to_string(),
            "surface.classifier=weighted-vote".to_string(),
            "solvent.contact-cutoff=3.5".to_string(),
            "solvent.keep-isolated=true".to_string(),
            "solvent.radius-source=b-factor".to_string(),
        ];

        let cfg = build_solvate_config(&args).expect("build ok").core_config;
        assert_eq!(cfg.grid.hash_spacing, 4.5);
        assert_eq!(cfg.grid.max_lattice_cells, 2000);
        assert_eq!(cfg.surface.classifier, ClassifierKind::WeightedVote);
        assert!((cfg.solvent.contact_cutoff - 3.5).abs() < 1e-12);
        assert!(cfg.solvent.keep_isolated);
        assert_eq!(cfg.solvent.radius_source, RadiusSource::TemperatureFactor);
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for bad in [
            "grid.spacing",
            "grid.spacing=fast",
            "grid.unknown=1",
            "solvent.keep-isolated=maybe",
        ] {
            let mut args = base_solvate_args();
            args.set_values = vec![bad.to_string()];
            assert!(
                matches!(build_solvate_config(&args), Err(CliError::Config(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn invalid_values_surface_as_config_errors() {
        let mut args = base_solvate_args();
        args.spacing = Some(-0.25);
        assert!(matches!(build_solvate_config(&args), Err(CliError::Config(_))));

        let mut args = base_solvate_args();
        args.classifier = Some("nearest".to_string());
        assert!(matches!(build_solvate_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn build_cluster_config_applies_defaults_and_overrides() {
        let args = ClusterArgs {
            input: PathBuf::from("sites.pdb"),
            output: PathBuf::from("clusters"),
            spacing: Some(0.5),
            hash_spacing: None,
        };
        let app = build_cluster_config(&args).expect("build ok");
        assert_eq!(app.core_config.grid_spacing, 0.5);
        assert_eq!(app.core_config.hash_spacing, DefaultsConfig::default().hash_spacing);
        assert_eq!(app.input_path, PathBuf::from("sites.pdb"));
    }
}
