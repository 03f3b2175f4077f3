//! A tool to build a star-count popularity database for the F-Droid catalog.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use fdroid_popular_lib::{Host, run};
use std::io::{Write, stdout};

/// Default host that talks to the real terminal and process.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

#[cfg_attr(coverage_nightly, coverage(off))]
impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

#[tokio::main]
#[cfg_attr(coverage_nightly, coverage(off))]
async fn main() -> Result<(), ohno::AppError> {
    run(&mut RealHost, std::env::args()).await
}
