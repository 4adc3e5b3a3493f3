//! Checks that "Strumenti" is the last category heading on the homepage.
//!
//! Always exits 0 once the browser is up: the verdict is only reported on
//! stdout. Pass `--strict` to exit 1 when the check fails or errors.

use clap::Parser;

use physlab_e2e::categories::verify_categories;
use physlab_e2e::cli::{init_tracing, CommonArgs};
use physlab_e2e::{CategoryCheck, PlaywrightDriver, Reporter};

#[derive(Parser, Debug)]
#[command(name = "verify-categories")]
#[command(about = "Check that 'Strumenti' is the last category on the PhysLab homepage")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Exit non-zero when the check does not pass
    #[arg(long)]
    strict: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.common.verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };
    let code = rt.block_on(async_main(args));
    drop(rt);

    std::process::exit(code);
}

async fn async_main(args: Args) -> i32 {
    let config = args.common.driver_config();
    let mut reporter = Reporter::stdout();

    if let Err(e) = args.common.preflight(&config).await {
        reporter.line(format!("Error: {}", e));
        return 1;
    }

    let mut driver = match PlaywrightDriver::launch(&config).await {
        Ok(driver) => driver,
        Err(e) => {
            reporter.line(format!("Error: {}", e));
            return 1;
        }
    };

    let report =
        verify_categories(&mut driver, &config, &CategoryCheck::default(), &mut reporter).await;
    args.common.write_report(&report);

    if args.strict && !report.success {
        1
    } else {
        0
    }
}
