//! PhysLab E2E smoke checks
//!
//! Two one-shot verifiers that drive a headless browser against a running
//! PhysLab instance:
//! - [`categories`]: "Strumenti" is the last category heading on the homepage
//! - [`a11y`]: after "Aggiungi riga", the new row's inputs carry their
//!   accessibility labels
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  verify-categories / verify-a11y (bin)                      │
//! │    ├── server::wait_until_reachable()   (opt-in check)      │
//! │    ├── PlaywrightDriver::launch()                           │
//! │    ├── verify_categories() / verify_a11y()                  │
//! │    │     └── &mut impl PageDriver ── goto, wait, click, ... │
//! │    └── VerificationReport::write_json() (opt-in)            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  PlaywrightDriver ── JSON lines ──> node -e bridge.js       │
//! │                                       └── playwright page   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod a11y;
pub mod bridge;
pub mod categories;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod playwright;
pub mod report;
pub mod retry;
pub mod selectors;
pub mod server;

pub use config::{A11yCheck, BrowserKind, CategoryCheck, DriverConfig};
pub use driver::PageDriver;
pub use error::{E2eError, E2eResult};
pub use playwright::PlaywrightDriver;
pub use report::{Reporter, VerificationReport};
