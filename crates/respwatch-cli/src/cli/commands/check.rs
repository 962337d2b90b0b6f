//! `respwatch check` – validate the request and grep files without sending.

use anyhow::Result;
use respwatch_core::pattern::PatternSet;
use respwatch_core::request::RequestSpec;
use std::path::Path;

use crate::cli::render;

pub fn run_check(req_file: &Path, grep_file: &Path) -> Result<()> {
    let patterns = PatternSet::load_path(grep_file)?;
    let request = RequestSpec::load_path(req_file)?;

    println!("{}", render::legend(&patterns));
    println!("\nRequest: {}", request.request_line());
    println!("Target URL: {}", request.url);
    if request.host().is_empty() {
        println!("  (no Host header: the target URL has an empty authority)");
    }
    println!(
        "{} pattern(s), {} header(s), body: {}",
        patterns.len(),
        request.headers.len(),
        request
            .body
            .as_ref()
            .map(|b| format!("{} bytes", b.len()))
            .unwrap_or_else(|| "none".to_string())
    );
    Ok(())
}
