// src/main.rs

use bevy::{log::LogPlugin, prelude::*};
use clap::Parser;
use std::process::ExitCode;

use formdesk::cli::{self, settings::SettingsChanges, Cli, CliResult, Commands};
use formdesk::settings::{io::load_settings_from_file, AppSettings};
use formdesk::FormsPlugin;

fn main() -> ExitCode {
    let args = Cli::parse();

    // The app owns the log subscriber, so it is built before anything logs.
    let mut app = App::new();
    app.add_plugins(LogPlugin {
        level: if args.verbose {
            bevy::log::Level::INFO
        } else {
            bevy::log::Level::WARN
        },
        ..default()
    });

    let mut settings: AppSettings = match load_settings_from_file() {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Using default settings: {}", e);
            AppSettings::default()
        }
    };
    if let Some(dir) = args.forms_dir.clone() {
        settings.forms_dir = Some(dir);
    }

    match run(args.command, settings, app) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns `false` when the command ran but the form did not pass.
fn run(command: Commands, settings: AppSettings, mut app: App) -> CliResult<bool> {
    let registry = cli::load_registry(&settings);
    match command {
        Commands::List => {
            cli::list::run(&registry);
            Ok(true)
        }
        Commands::New { form, output } => {
            cli::new_form::run(&registry, &form, output.as_deref())?;
            Ok(true)
        }
        Commands::Validate { form, state } => cli::validate::run(&registry, &form, &state),
        Commands::Submit {
            form,
            state,
            export_dir,
        } => {
            let export_dir = export_dir.or_else(|| settings.export_dir.clone());
            cli::submit::run(&registry, &form, &state, export_dir.as_deref())
        }
        Commands::Replay {
            form,
            actions,
            export_dir,
        } => {
            let export_dir = export_dir.or_else(|| settings.export_dir.clone());
            let print_mode = settings.print_mode;
            app.insert_resource(settings).add_plugins(FormsPlugin);
            cli::replay::run(app, &form, &actions, export_dir.as_deref(), print_mode)
        }
        Commands::Print { form, state } => {
            cli::print::run(&registry, &form, &state)?;
            Ok(true)
        }
        Commands::Settings {
            set_forms_dir,
            set_export_dir,
            revalidate_on_change,
            print_mode,
        } => {
            let changes = SettingsChanges {
                forms_dir: set_forms_dir,
                export_dir: set_export_dir,
                revalidate_on_change,
                print_mode,
            };
            cli::settings::run(settings, changes)?;
            Ok(true)
        }
    }
}
