#![cfg(feature = "cli")]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::arg;
use tinydns_source::{
    SourceConfig, SourceError, TinyDnsFileSource,
    rr::{Name, TimeToLive, Zone},
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match import() {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

fn import() -> Result<(), ()> {
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let app = clap::Command::new("tinydns-import")
        .about("Read tinydns-data files and print the records they hold for a zone")
        .arg(
            arg!(--directory <DIR> "Directory of tinydns-data files")
                .required_unless_present("config")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            arg!(--"default-ttl" <SECONDS> "TTL for records whose lines carry none")
                .required(false)
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            arg!(--config <FILE> "TOML file with the source configuration")
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(arg!(--lenient "Drop invalid values instead of failing"))
        .arg(
            arg!(--"sub-zone" <NAME> "Subzone delegated away from ORIGIN")
                .required(false)
                .action(clap::ArgAction::Append),
        )
        .arg(arg!(<ORIGIN> "Zone to import").value_parser(clap::value_parser!(Name)));

    let args = app.get_matches();
    let mut origin = args
        .get_one::<Name>("ORIGIN")
        .expect("ORIGIN is required")
        .clone();
    origin.set_fqdn(true);
    let lenient = args.get_flag("lenient");
    let sub_zones: Vec<&String> = args.get_many("sub-zone").into_iter().flatten().collect();

    let config = match source_config(&args) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error reading configuration:");
            eprintln!("{error}");
            return Err(());
        }
    };

    let mut zone = match Zone::new(origin.clone()).with_sub_zones(sub_zones) {
        Ok(zone) => zone,
        Err(error) => {
            eprintln!("Invalid subzone for {origin}:");
            eprintln!("{error}");
            return Err(());
        }
    };

    let source = TinyDnsFileSource::from_config("tinydns", &config);
    match source.populate(&mut zone, lenient) {
        Ok(added) => {
            for record in zone.records() {
                println!("{record}");
            }
            eprintln!("Imported {added} record sets into '{}'", zone.name());
        }
        Err(error) => {
            eprintln!("Error importing {} from {}:", origin, config.directory);
            eprintln!("{error}");
            return Err(());
        }
    }

    Ok(())
}

fn source_config(args: &clap::ArgMatches) -> Result<SourceConfig, SourceError> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => SourceConfig::load(&utf8(path)?)?,
        None => {
            let directory = args
                .get_one::<PathBuf>("directory")
                .expect("directory is required without --config");
            SourceConfig::new(utf8(directory)?)
        }
    };

    if let Some(directory) = args.get_one::<PathBuf>("directory") {
        config.directory = utf8(directory)?;
    }
    if let Some(ttl) = args.get_one::<u32>("default-ttl") {
        config.default_ttl = TimeToLive::from_secs(*ttl);
    }
    Ok(config)
}

fn utf8(path: &Path) -> Result<Utf8PathBuf, SourceError> {
    Utf8PathBuf::try_from(path.to_path_buf()).map_err(|error| SourceError::NonUtf8Path {
        path: error.into_path_buf(),
    })
}
