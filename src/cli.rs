use clap::{
    crate_authors, crate_description, crate_version, value_parser, Arg, ArgAction, ArgMatches,
    Command,
};
use pretty_env_logger::env_logger::Builder;
use std::env;
use std::io::Write;
use std::process::exit;

use sweego_domains::common::Warning;
use sweego_domains::domain::DesiredDomain;
use sweego_domains::service::{Provisioner, Report};
use sweego_domains::sweego::SweegoClient;
use sweego_domains::Config;

fn set_logger_level(b: &mut Builder) {
    let mut b = b;
    if env::var("RUST_LOG").is_err() {
        b = b.filter_level(log::LevelFilter::Info)
    }
    b.init();
}

fn setup_logger() {
    // Adapted from env_logger examples. <3 Systemd support
    match std::env::var("RUST_LOG_STYLE") {
        Ok(s) if s == "SYSTEMD" => {
            let builder = &mut pretty_env_logger::env_logger::builder();
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "<{}>{}: {}",
                    match record.level() {
                        log::Level::Error => 3,
                        log::Level::Warn => 4,
                        log::Level::Info => 6,
                        log::Level::Debug => 7,
                        log::Level::Trace => 7,
                    },
                    record.target(),
                    record.args()
                )
            });
            set_logger_level(builder);
        }
        _ => {
            let builder = &mut pretty_env_logger::formatted_builder();
            set_logger_level(builder);
        }
    };
}

fn name_arg() -> Arg {
    Arg::new("name")
        .required(true)
        .help("Resource name in the state file")
}

fn command() -> Command {
    Command::new("sweego-domains")
        .about(format!(
            "{}\n{} {}",
            crate_description!(),
            "Configuration is managed using SWEEGO_* environment variables.",
            "See the docs for more information.",
        ))
        .arg(
            Arg::new("check")
                .action(ArgAction::SetTrue)
                .short('t')
                .long("test")
                .help("Check the configuration"),
        )
        .subcommand(Command::new("list").about("List the domains known to Sweego"))
        .subcommand(Command::new("show").about("Print the state file"))
        .subcommand(
            Command::new("apply")
                .about("Create, update or replace a domain to match the arguments")
                .arg(name_arg())
                .arg(
                    Arg::new("domain")
                        .long("domain")
                        .required(true)
                        .help("Domain name, e.g. my-domain.eu"),
                )
                .arg(
                    Arg::new("open-tracking")
                        .long("open-tracking")
                        .value_parser(value_parser!(bool))
                        .help("Enable open tracking (defaults to false)"),
                )
                .arg(
                    Arg::new("click-tracking")
                        .long("click-tracking")
                        .value_parser(value_parser!(bool))
                        .help("Enable click tracking (defaults to false)"),
                ),
        )
        .subcommand(
            Command::new("refresh")
                .about("Read a domain back from Sweego")
                .arg(name_arg()),
        )
        .subcommand(
            Command::new("destroy")
                .about("Delete a domain and forget it")
                .arg(name_arg()),
        )
        .subcommand(
            Command::new("import")
                .about("Adopt an existing domain by its uuid")
                .arg(name_arg())
                .arg(Arg::new("uuid").required(true).help("UUID of the domain")),
        )
        .subcommand(
            Command::new("check")
                .about("Check the DNS records of a domain")
                .arg(name_arg()),
        )
        .version(crate_version!())
        .author(crate_authors!("\n"))
}

fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("{err}");
            exit(1);
        }
    }
}

fn print_report(report: &Report) {
    print_warnings(&report.warnings);
    print_json(report);
}

fn string_arg<'a>(args: &'a ArgMatches, id: &str) -> &'a str {
    args.get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}

fn run(service: Provisioner<SweegoClient>, args: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match args.subcommand() {
        Some(("list", _)) => print_json(&service.list_remote()?),
        Some(("show", _)) => print_json(&service.show()?),
        Some(("apply", sub)) => {
            let desired = DesiredDomain {
                domain: string_arg(sub, "domain").to_string(),
                open_tracking_enabled: sub.get_one::<bool>("open-tracking").copied(),
                click_tracking_enabled: sub.get_one::<bool>("click-tracking").copied(),
            };
            print_report(&service.apply(string_arg(sub, "name"), &desired)?);
        }
        Some(("refresh", sub)) => match service.refresh(string_arg(sub, "name"))? {
            Some(report) => print_report(&report),
            None => tracing::warn!("Domain is gone and was removed from state"),
        },
        Some(("destroy", sub)) => service.destroy(string_arg(sub, "name"))?,
        Some(("import", sub)) => print_report(
            &service.import(string_arg(sub, "name"), string_arg(sub, "uuid"))?,
        ),
        Some(("check", sub)) => {
            let warnings = service.check(string_arg(sub, "name"))?;
            if warnings.is_empty() {
                tracing::info!("All DNS records verified");
            }
            print_warnings(&warnings);
        }
        _ => {
            command().print_help()?;
        }
    }
    Ok(())
}

pub(crate) fn main() {
    let args = command().get_matches();

    setup_logger();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(err) => {
            println!("{err}");
            exit(2);
        }
    };

    let service = match config.get_service() {
        Ok(s) => s,
        Err(err) => {
            println!("{err}");
            exit(2);
        }
    };

    if args.get_flag("check") {
        tracing::info!(
            base_url = service.reconciler().api().base_url(),
            tracking_mode = ?service.reconciler().config().tracking_mode,
            state_file = %service.store().path().display(),
            "Configuration is valid."
        );
        exit(0);
    }

    if let Err(err) = run(service, &args) {
        tracing::error!("{err}");
        exit(1);
    }
}
