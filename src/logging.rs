use colored::control::set_override;
use env_logger::{Builder, WriteStyle};
use log::LevelFilter;

pub fn init_logging(verbose: bool, no_color: bool) {
    // Disable colors globally if requested
    if no_color {
        set_override(false);
    }

    // Dependencies only report warnings; our own modules follow -verbose.
    Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("wsdl2cpp", level_filter(verbose))
        .format_timestamp(None)
        .format_target(false)
        .write_style(if no_color { WriteStyle::Never } else { WriteStyle::Auto })
        .init();
}

fn level_filter(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}
