//! A command-line front end for the iterative resolver: resolve one
//! hostname to its `A` record by walking the delegation chain from the
//! IANA root servers, with no recursive upstream involved.
use log::debug;

use iterdns::error::DNSResult;

mod args;
use args::CliOptions;

fn main() -> DNSResult<()> {
    let options = CliOptions::options()?;

    let mut builder = env_logger::Builder::new();
    if options.debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.parse_default_env().init();
    debug!("options: {:?}", &options);

    match iterdns::resolve(&options.hostname) {
        Ok(addr) => {
            println!("{}", addr);
            Ok(())
        }
        Err(e) => {
            eprintln!("resolve failed: {}", e);
            std::process::exit(1);
        }
    }
}
