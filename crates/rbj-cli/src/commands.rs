use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::Table;

use rbj_cli::config::load_config;
use rbj_cli::pipeline::{
    ConvertSettings, check_file, convert_file, default_output_path, generate_tables,
};
use rbj_model::{
    CheckKind, ColumnPolicy, ConfigKey, ConversionOptions, GeometryType, SpecialsPolicy,
};

use crate::cli::{CheckArgs, ConvertArgs, GenerateArgs};
use crate::summary::{
    apply_table_style, header_cell, print_check_summary, print_convert_summary,
    print_generate_summary,
};

pub fn run_convert(args: &ConvertArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let settings = ConvertSettings::resolve(
        &config,
        args.database.as_deref(),
        args.lenient_columns,
        args.strict_specials,
    );
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    let outcome = convert_file(
        &args.input,
        &output,
        &settings,
        args.dry_run,
        args.name.as_deref(),
    )?;
    print_convert_summary(&outcome);
    Ok(())
}

pub fn run_check(args: &CheckArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let column_policy = if args.lenient_columns || config.conversion.lenient_columns {
        ColumnPolicy::Lenient
    } else {
        ColumnPolicy::Strict
    };
    let specials_policy = if args.strict_specials || config.conversion.strict_specials {
        SpecialsPolicy::Strict
    } else {
        SpecialsPolicy::Passthrough
    };
    let options = ConversionOptions::new().with_column_policy(column_policy);
    let assembly = check_file(&args.input, &options, specials_policy)?;
    if args.json {
        let json = serde_json::to_string_pretty(&assembly.document)
            .context("serialize document")?;
        println!("{json}");
    } else {
        print_check_summary(&args.input, &assembly);
    }
    Ok(())
}

pub fn run_kinds() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Check"),
        header_cell("Identifier"),
        header_cell("Geometry"),
        header_cell("Parameters"),
    ]);
    apply_table_style(&mut table);
    for kind in CheckKind::ALL {
        let geometry: String = kind
            .geometry_types()
            .iter()
            .map(GeometryType::code)
            .collect();
        let parameters: Vec<&str> = kind.config_keys().iter().map(ConfigKey::as_str).collect();
        table.add_row(vec![
            kind.as_str().to_string(),
            kind.identifier().to_string(),
            geometry,
            parameters.join(", "),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_generate(args: &GenerateArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let settings = if args.convert {
        Some(ConvertSettings::resolve(
            &config,
            args.database.as_deref(),
            false,
            false,
        ))
    } else {
        None
    };
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let generated = generate_tables(&args.feature_classes, &output_dir, settings.as_ref())?;
    print_generate_summary(&output_dir, &generated);
    Ok(())
}
