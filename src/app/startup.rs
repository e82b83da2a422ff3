//! Application startup
//!
//! Configuration is resolved before logging starts so that file settings
//! (log level, format, colour) take effect from the first message.

use crate::app::cli::args::{Args, Command};
use crate::app::cli::config::{
    apply_file_defaults, default_plugin_dir, load_config_file, resolve_loader_config,
};
use crate::app::cli::display;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::{init_logging, level_for_verbosity};
use crate::plugin::api::{PluginLoader, StaticModuleLoader};
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Exit status for configuration problems
const EXIT_CONFIG: u8 = 2;

/// Parse arguments, build the loader and run the requested command
pub async fn startup() -> ExitCode {
    let mut args = Args::parse();

    let file = match load_config_file(args.config_file.as_deref()).await {
        Ok(file) => file.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    apply_file_defaults(&mut args, &file);

    let use_color = args.use_color(std::io::stdout().is_terminal());
    colored::control::set_override(use_color);

    let level = level_for_verbosity(args.verbose, args.quiet, args.log_level.as_deref());
    if let Err(e) = init_logging(
        Some(&level),
        args.log_format.as_deref(),
        args.log_file().map(|path| path.as_path()),
        use_color,
    ) {
        eprintln!("Error: failed to initialise logging: {}", e);
        return ExitCode::from(EXIT_CONFIG);
    }

    log::info!(
        "plugseek {} starting",
        crate::core::version::long_version()
    );

    let config = match resolve_loader_config(&args, &file, default_plugin_dir()) {
        Ok(config) => config,
        Err(e) => {
            log_error_with_context(&e, "Configuration");
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    log::debug!("Loader configuration: {:#?}", config);

    let modules = StaticModuleLoader::with_registered_modules();
    log::debug!("{} plugin modules registered", modules.len());

    let loader = match PluginLoader::with_npm_registry(&config, Arc::new(modules)) {
        Ok(loader) => loader,
        Err(e) => {
            log_error_with_context(&e, "Plugin loader setup");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("Interrupted, cancelling plugin discovery");
                cancel.cancel();
            }
        })
    };

    let status = run(&loader, args.selected_command(), use_color, &cancel).await;
    interrupt.abort();
    status
}

async fn run(
    loader: &PluginLoader,
    command: Command,
    use_color: bool,
    cancel: &CancellationToken,
) -> ExitCode {
    match command {
        Command::Discover { json } => match loader.discover_candidates_until(cancel).await {
            Ok(candidates) if json => emit_json(display::render_candidates_json(&candidates)),
            Ok(candidates) if candidates.is_empty() => {
                eprintln!("No plugin candidates found.");
                ExitCode::SUCCESS
            }
            Ok(candidates) => {
                print!("{}", display::render_candidates(&candidates, use_color));
                ExitCode::SUCCESS
            }
            Err(e) => {
                log_error_with_context(&e, "Plugin discovery");
                ExitCode::FAILURE
            }
        },
        Command::Load { json } => match loader.load_plugins_with_cancel(cancel).await {
            Ok(plugins) if json => emit_json(display::render_plugins_json(&plugins)),
            Ok(plugins) if plugins.is_empty() => {
                eprintln!("No plugins loaded.");
                ExitCode::SUCCESS
            }
            Ok(plugins) => {
                print!("{}", display::render_plugins(&plugins, use_color));
                ExitCode::SUCCESS
            }
            Err(e) => {
                log_error_with_context(&e, "Plugin loading");
                ExitCode::FAILURE
            }
        },
    }
}

fn emit_json(rendered: serde_json::Result<String>) -> ExitCode {
    match rendered {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("FATAL: could not serialise output: {}", e);
            ExitCode::FAILURE
        }
    }
}
