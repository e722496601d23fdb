//! Manage command line arguments here.
use clap::{App, Arg};

use iterdns::error::DNSResult;

/// This structure holds the command line arguments.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub hostname: String,
    pub debug: bool,
}

impl CliOptions {
    pub fn options() -> DNSResult<Self> {
        let matches = App::new("iterative DNS resolver")
            .version("0.1")
            .about("Resolves a hostname to an IPv4 address by iterative resolution from the root servers, bypassing the host stub resolver")
            .arg(
                Arg::new("hostname")
                    .required(true)
                    .long_help("Hostname to resolve")
                    .takes_value(true),
            )
            .arg(
                Arg::new("debug")
                    .short('g')
                    .long("debug")
                    .required(false)
                    .long_help("Trace each pass of the resolver, even if RUST_LOG is unset")
                    .takes_value(false),
            )
            .get_matches();

        let mut options = CliOptions::default();
        options.hostname = String::from(matches.value_of("hostname").unwrap());
        options.debug = matches.is_present("debug");

        Ok(options)
    }
}
