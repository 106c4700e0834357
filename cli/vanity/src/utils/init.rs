use once_cell::sync::OnceCell;
use tracing::error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::reload::Handle;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::commands::Verbosity;

static LOGGER_HANDLE: OnceCell<Handle<EnvFilter, Registry>> = OnceCell::new();

pub(crate) fn init_logger(verbosity: Option<Verbosity>) {
    let verbosity = verbosity.unwrap_or_default();

    let log_filter = match verbosity {
        // Show only errors
        Verbosity::Quiet => "off,vanity=error",
        // Only show warnings
        Verbosity::Verbose(0) => "off,vanity=warn",
        // Show our own info logs
        Verbosity::Verbose(1) => "off,vanity=info",
        // Also show debug from our library
        Verbosity::Verbose(2) => "off,vanity=debug,vanity_catalog=debug",
        // Also show trace from our library
        Verbosity::Verbose(3) => "off,vanity=trace,vanity_catalog=trace",
        Verbosity::Verbose(_) => "trace",
    };

    let filter_handle = LOGGER_HANDLE.get_or_init(|| {
        // The first time this layer is set it establishes an upper boundary
        // for `log` verbosity; start permissive and narrow via `modify`.
        let filter = EnvFilter::try_new("trace").unwrap();
        let (filter, filter_reload_handle) = tracing_subscriber::reload::Layer::new(filter);
        let log_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(filter);

        tracing_subscriber::registry().with(log_layer).init();
        filter_reload_handle
    });

    update_filters(filter_handle, log_filter);
}

fn update_filters(filter_handle: &Handle<EnvFilter, Registry>, log_filter: &str) {
    let result = filter_handle.modify(|layer| {
        match EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_filter)) {
            Ok(new_filter) => *layer = new_filter,
            Err(err) => {
                error!("Updating logger filter failed: {}", err);
            },
        };
    });
    if let Err(err) = result {
        error!("Updating logger filter failed: {}", err);
    }
}
