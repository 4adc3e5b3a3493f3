//! Checks the accessibility labels of a freshly added row on the pendulum page.
//!
//! Exits 1 on any error during the run, 0 otherwise. Missing labels are
//! reported on stdout but do not change the exit status.

use clap::Parser;

use physlab_e2e::a11y::{exit_code, verify_a11y};
use physlab_e2e::cli::{init_tracing, CommonArgs};
use physlab_e2e::{A11yCheck, PlaywrightDriver, Reporter};

#[derive(Parser, Debug)]
#[command(name = "verify-a11y")]
#[command(about = "Check aria-labels of measurement inputs on the PhysLab pendulum page")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
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

    let outcome = verify_a11y(&mut driver, &config, &A11yCheck::default(), &mut reporter).await;
    if let Ok(report) = &outcome {
        args.common.write_report(report);
    }

    exit_code(&outcome)
}
