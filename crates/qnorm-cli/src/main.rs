use anyhow::Result;
use clap::{Arg, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use qnorm_cli::normalize::input::NormalizeRun;
use qnorm_cli::normalize::runner::run_normalize;

fn build_cli() -> Command {
    Command::new("qnorm")
        .version(clap::crate_version!())
        .author("Justin Sing <justincsing@gmail.com>")
        .about("Min-max normalize ranking features within each query")
        .arg(
            Arg::new("file")
                .help("Input CSV with rows label,query_id,docno,f_1,...,f_k (no header)")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a JSON configuration file (delimiter, precision, short_rows)")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("output_file")
                .short('o')
                .long("output")
                .help("Write normalized rows to this file instead of stdout")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("short_rows")
                .long("short-rows")
                .help(
                    "How to treat rows with fewer features than the first row. \
                     Overrides the value in the configuration file.",
                )
                .value_parser(["lenient", "reject"])
                .ignore_case(true)
                .value_hint(ValueHint::Other),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("QNORM_LOG", "error,qnorm=info"))
        .init();

    // Usage errors exit with 1; --help and --version exit with 0.
    let matches = match build_cli().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let params = NormalizeRun::from_arguments(&matches)?;
    log::info!("[qnorm] Normalizing {:?}", params.input);

    match run_normalize(&params) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Normalization failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
