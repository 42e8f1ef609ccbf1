//! Build the static site

use anyhow::Result;
use std::io::{self, Write};

use crate::generator::{BuildOptions, BuildReport, Generator};
use crate::Site;

/// Render every document of `site` into its output directory.
///
/// Per-document failures end up in the returned report; only problems that
/// prevent the build from starting at all (unreadable layouts) are errors.
pub fn run(site: &Site, options: BuildOptions) -> Result<BuildReport> {
    let start = std::time::Instant::now();

    let layouts = site.layouts()?;
    tracing::debug!(
        "Layouts: {}",
        layouts.names().collect::<Vec<_>>().join(", ")
    );

    let generator = Generator::new(&site.config, &layouts, &site.output_dir);
    let report = generator.build(&site.loader(), options);

    let duration = start.elapsed();
    if report.is_success() {
        tracing::info!(
            "Generated {} files in {:.2}s",
            report.written.len(),
            duration.as_secs_f64()
        );
    } else {
        tracing::warn!(
            "Generated {} files in {:.2}s, {} failed",
            report.written.len(),
            duration.as_secs_f64(),
            report.failures.len()
        );
    }

    Ok(report)
}

/// Build `site`, deleting its output directory first when `clean` is set
pub fn execute(site: &Site, options: BuildOptions, clean: bool) -> Result<BuildReport> {
    if clean {
        site.clean()?;
    }
    run(site, options)
}

/// Print the outcome of a build and return the process exit code: the file
/// count on success, otherwise every failure with its path.
pub fn print_report(
    report: &BuildReport,
    options: BuildOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<u8> {
    if report.is_success() {
        writeln!(out, "Generated {} files", report.written.len())?;
        return Ok(0);
    }

    for failure in &report.failures {
        writeln!(err, "failed: {}", failure)?;
    }
    if !options.continue_on_error {
        writeln!(
            err,
            "Stopped at the first failure (use --continue-on-error to build the rest)"
        )?;
    }
    Ok(1)
}
